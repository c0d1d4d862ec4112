//! Expense linking — attaches expense rows to representatives through the
//! customer (executor) they were filed under.
//!
//! The index maps trimmed customer names to their RAW subgroup label, not
//! the resolved rep; resolution happens later in the aggregation pass so
//! that both ledgers go through the identical resolution chain.

use crate::ledger::{ExpenseRecord, PersonSalesRecord};
use std::collections::HashMap;

/// Attach each expense to the rep label of the customer it was filed
/// under. Expenses whose executor matches no person-sales customer are
/// dropped; they participate in nothing downstream.
pub fn link_expenses(
    expenses: &[ExpenseRecord],
    person_sales: &[PersonSalesRecord],
) -> Vec<ExpenseRecord> {
    // Duplicate customer names keep the last row seen.
    let mut customer_labels: HashMap<&str, &str> = HashMap::with_capacity(person_sales.len());
    for row in person_sales {
        let customer = row.customer_name.trim();
        if customer.is_empty() || row.subgroup_label.is_empty() {
            continue;
        }
        customer_labels.insert(customer, row.subgroup_label.as_str());
    }

    let mut linked = Vec::with_capacity(expenses.len());
    for exp in expenses {
        match customer_labels.get(exp.executor_name.trim()) {
            Some(label) => {
                let mut row = exp.clone();
                row.linked_rep = Some((*label).to_string());
                linked.push(row);
            }
            None => {
                log::debug!(
                    "linker: dropped expense '{}' (executor '{}' matches no customer)",
                    exp.description,
                    exp.executor_name
                );
            }
        }
    }
    log::info!("linker: {}/{} expenses linked", linked.len(), expenses.len());
    linked
}
