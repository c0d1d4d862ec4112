//! Ledger row types — the three raw monthly inputs plus manual deductions.
//!
//! Rows arrive already typed (the runner's CSV ingest or a caller builds
//! them); `net_sales` is already net of returns and return tax, so the
//! aggregation passes never re-derive it.

use crate::types::{Category, RepName};
use serde::{Deserialize, Serialize};

/// One row of the per-person sales ledger. The unit the resolver and the
/// expense linker key on: `customer_name` identifies the customer,
/// `subgroup_label` carries the (possibly proxy-group) representative label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonSalesRecord {
    pub customer_name: String,
    /// Raw label as ingested. May be a plain rep name or a proxy-group
    /// label like `"گروه غرب (مشتری Ali Rezaei)"`.
    pub subgroup_label: String,
    pub net_sales: f64,
    pub returns: f64,
    /// True when the row came in under a proxy ("Beta") group.
    pub is_proxy: bool,
}

/// One row of the per-goods sales ledger. `buyer_name` must match a
/// person-sales `customer_name` to participate in aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoodsSalesRecord {
    pub buyer_name: String,
    pub product_code: String,
    pub net_sales: f64,
    pub returns: f64,
}

/// One row of the expense ledger. `linked_rep` is filled by the expense
/// linker (the raw subgroup label of the executor's rep);
/// `assigned_category` is set by an operator after linking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub executor_name: String,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub linked_rep: Option<RepName>,
    #[serde(default)]
    pub assigned_category: Option<Category>,
}

/// An operator-entered deduction applied directly to a representative's
/// category bucket, bypassing the expense linker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualDeduction {
    pub id: String,
    pub rep_name: RepName,
    pub amount: f64,
    pub category: Category,
    pub description: String,
}
