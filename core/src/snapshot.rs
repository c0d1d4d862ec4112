//! Period snapshot serialization — frozen inputs plus the configuration
//! in force when the period was saved.
//!
//! Replay recomputes from the snapshot's own config, never from the live
//! one, so a saved period reproduces its original figures even after
//! profiles or mappings change.

use crate::{
    config::EngineConfig,
    ledger::{ExpenseRecord, GoodsSalesRecord, ManualDeduction, PersonSalesRecord},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub person_sales: Vec<PersonSalesRecord>,
    pub goods_sales: Vec<GoodsSalesRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub manual_deductions: Vec<ManualDeduction>,
    pub config: EngineConfig,
}

/// Listing row for saved periods; the state blob stays in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodMeta {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub created_at: String,
}
