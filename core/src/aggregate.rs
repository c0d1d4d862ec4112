//! Per-representative aggregation — five passes over the period's ledgers.
//!
//! PASS ORDER (fixed, documented, never reordered):
//!   1. Resolve person rows, build the customer index, seed aggregates.
//!   2. Classify goods rows into category gross buckets.
//!   3. Apply linked expenses to category deduction buckets.
//!   4. Apply manual deductions.
//!   5. Net out categories and evaluate commissions.
//!
//! Degradation is silent and well-defined: unknown buyers are ignored,
//! expenses without a category contribute nothing, a missing profile or
//! rule evaluates to zero commission. Category nets are NOT clamped; only
//! a non-finite total net collapses to zero.

use crate::{
    config::{CommissionProfile, EngineConfig},
    ledger::{ExpenseRecord, GoodsSalesRecord, ManualDeduction, PersonSalesRecord},
    resolver::{self, MappingIndex},
    tier,
    types::{Category, RepName},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Product codes with this prefix (case-insensitive) always classify as
/// Target, regardless of the owning customer's proxy flag.
pub const TARGET_PRODUCT_PREFIX: &str = "TG";

/// One representative's commission statement for the period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepAggregate {
    pub rep_name: RepName,
    pub gross_target: f64,
    pub gross_proxy: f64,
    pub gross_other: f64,
    pub deductions_target: f64,
    pub deductions_proxy: f64,
    pub deductions_other: f64,
    /// Gross minus deductions, negatives preserved.
    pub net_target: f64,
    pub net_proxy: f64,
    pub net_other: f64,
    /// Sum of the three nets, zeroed only when non-finite.
    pub total_net: f64,
    pub commission_target: f64,
    pub commission_proxy: f64,
    pub commission_other: f64,
    /// Volume bonus from the profile's Total rule, evaluated against
    /// `total_net`. Kept apart from `total_commission`.
    pub commission_total: f64,
    /// Sum of the three per-category commissions.
    pub total_commission: f64,
}

struct CustomerEntry {
    rep: RepName,
    is_proxy: bool,
}

/// Build one aggregate per representative from the period's ledgers.
/// Output order is the first-encounter order of reps in the person ledger.
pub fn aggregate(
    person_sales: &[PersonSalesRecord],
    goods_sales: &[GoodsSalesRecord],
    linked_expenses: &[ExpenseRecord],
    manual_deductions: &[ManualDeduction],
    config: &EngineConfig,
) -> Vec<RepAggregate> {
    let mappings = MappingIndex::build(&config.proxy_mappings);

    // Pass 1: resolve reps, index customers. Duplicate customer names keep
    // the last row seen; empty rep names never seed an aggregate.
    let mut reps: Vec<RepAggregate> = Vec::new();
    let mut rep_index: HashMap<RepName, usize> = HashMap::new();
    let mut customers: HashMap<&str, CustomerEntry> = HashMap::with_capacity(person_sales.len());
    for row in person_sales {
        let customer = row.customer_name.trim();
        if customer.is_empty() {
            continue;
        }
        let rep = resolver::resolve_rep_name(&row.subgroup_label, row.is_proxy, &mappings);
        if !rep.is_empty() && !rep_index.contains_key(rep.as_str()) {
            rep_index.insert(rep.clone(), reps.len());
            reps.push(RepAggregate {
                rep_name: rep.clone(),
                ..Default::default()
            });
        }
        customers.insert(
            customer,
            CustomerEntry {
                rep,
                is_proxy: row.is_proxy,
            },
        );
    }

    // Pass 2: classify goods. TG prefix beats the proxy flag.
    for good in goods_sales {
        let Some(entry) = customers.get(good.buyer_name.trim()) else {
            log::debug!(
                "aggregate: ignored goods row for unknown buyer '{}'",
                good.buyer_name
            );
            continue;
        };
        let Some(&idx) = rep_index.get(entry.rep.as_str()) else {
            continue;
        };
        let agg = &mut reps[idx];
        if good
            .product_code
            .to_ascii_uppercase()
            .starts_with(TARGET_PRODUCT_PREFIX)
        {
            agg.gross_target += good.net_sales;
        } else if entry.is_proxy {
            agg.gross_proxy += good.net_sales;
        } else {
            agg.gross_other += good.net_sales;
        }
    }

    // Pass 3: linked expenses. The raw label re-resolves through the same
    // chain the goods path used, so both land on the same aggregate.
    for exp in linked_expenses {
        let (Some(label), Some(category)) = (exp.linked_rep.as_deref(), exp.assigned_category)
        else {
            continue;
        };
        let rep = resolver::resolve_label(label, &mappings);
        let Some(&idx) = rep_index.get(rep.as_str()) else {
            continue;
        };
        if let Some(bucket) = deduction_bucket(&mut reps[idx], category) {
            *bucket += exp.amount;
        }
    }

    // Pass 4: manual deductions, matched by exact rep name.
    for ded in manual_deductions {
        let Some(&idx) = rep_index.get(ded.rep_name.as_str()) else {
            log::debug!(
                "aggregate: manual deduction '{}' names unknown rep '{}'",
                ded.id,
                ded.rep_name
            );
            continue;
        };
        if let Some(bucket) = deduction_bucket(&mut reps[idx], ded.category) {
            *bucket += ded.amount;
        }
    }

    // Pass 5: nets and commissions.
    let profiles = profile_index(&config.profiles);
    let bindings = binding_index(config);
    for agg in &mut reps {
        agg.net_target = agg.gross_target - agg.deductions_target;
        agg.net_proxy = agg.gross_proxy - agg.deductions_proxy;
        agg.net_other = agg.gross_other - agg.deductions_other;
        let total = agg.net_target + agg.net_proxy + agg.net_other;
        agg.total_net = if total.is_finite() { total } else { 0.0 };

        if let Some(profile) = bindings
            .get(agg.rep_name.as_str())
            .and_then(|id| profiles.get(id).copied())
        {
            agg.commission_target = rule_payout(profile, Category::Target, agg.net_target);
            agg.commission_proxy = rule_payout(profile, Category::Proxy, agg.net_proxy);
            agg.commission_other = rule_payout(profile, Category::Other, agg.net_other);
            agg.commission_total = rule_payout(profile, Category::Total, agg.total_net);
        }
        agg.total_commission = agg.commission_target + agg.commission_proxy + agg.commission_other;
    }

    log::info!(
        "aggregate: {} representatives from {} person rows, {} goods rows, {} linked expenses",
        reps.len(),
        person_sales.len(),
        goods_sales.len(),
        linked_expenses.len()
    );
    reps
}

/// Profiles indexed by id; duplicate ids keep the first entry, matching
/// scan order over the configured list.
pub(crate) fn profile_index(profiles: &[CommissionProfile]) -> HashMap<&str, &CommissionProfile> {
    let mut index = HashMap::with_capacity(profiles.len());
    for profile in profiles {
        index.entry(profile.id.as_str()).or_insert(profile);
    }
    index
}

fn binding_index(config: &EngineConfig) -> HashMap<&str, &str> {
    let mut index = HashMap::with_capacity(config.rep_bindings.len());
    for binding in &config.rep_bindings {
        index
            .entry(binding.rep_name.as_str())
            .or_insert(binding.profile_id.as_str());
    }
    index
}

pub(crate) fn rule_payout(profile: &CommissionProfile, category: Category, amount: f64) -> f64 {
    profile
        .rule(category)
        .map_or(0.0, |rule| tier::evaluate(amount, &rule.tiers))
}

/// Deductions always land in a concrete sales category; `Total` has no
/// bucket.
fn deduction_bucket(agg: &mut RepAggregate, category: Category) -> Option<&mut f64> {
    match category {
        Category::Target => Some(&mut agg.deductions_target),
        Category::Proxy => Some(&mut agg.deductions_proxy),
        Category::Other => Some(&mut agg.deductions_other),
        Category::Total => None,
    }
}
