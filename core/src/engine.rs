//! The payout engine — the pipeline wired to configuration and storage.
//!
//! PIPELINE ORDER (fixed, documented, never reordered):
//!   1. Expense linking against the person ledger.
//!   2. Per-representative aggregation and commission evaluation.
//!   3. Manager rollup over the rep aggregates.
//!
//! RULES:
//!   - The pipeline is pure. Any input or config change means a full
//!     recompute; nothing is patched incrementally.
//!   - Replay evaluates under the snapshot's saved config, never the
//!     live one.

use crate::{
    aggregate::{self, RepAggregate},
    config::EngineConfig,
    error::EngineResult,
    ledger::{ExpenseRecord, GoodsSalesRecord, ManualDeduction, PersonSalesRecord},
    linker,
    rollup::{self, ManagerAggregate},
    snapshot::{PeriodMeta, PeriodSnapshot},
    store::PayoutStore,
};
use serde::Serialize;

/// The four ledgers for one accounting period.
#[derive(Debug, Clone, Default)]
pub struct PeriodInputs {
    pub person_sales: Vec<PersonSalesRecord>,
    pub goods_sales: Vec<GoodsSalesRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub manual_deductions: Vec<ManualDeduction>,
}

/// Everything a period computation produces.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub reps: Vec<RepAggregate>,
    pub managers: Vec<ManagerAggregate>,
    /// Expenses that found a subgroup, with their link applied.
    pub linked_expenses: Vec<ExpenseRecord>,
}

pub struct PayoutEngine {
    pub config: EngineConfig,
    store: PayoutStore,
}

impl PayoutEngine {
    pub fn new(config: EngineConfig, store: PayoutStore) -> Self {
        Self { config, store }
    }

    /// Run the full pipeline over one period's inputs with the live
    /// config.
    pub fn compute(&self, inputs: &PeriodInputs) -> PeriodReport {
        Self::compute_with(&self.config, inputs)
    }

    fn compute_with(config: &EngineConfig, inputs: &PeriodInputs) -> PeriodReport {
        let linked_expenses = linker::link_expenses(&inputs.expenses, &inputs.person_sales);
        let reps = aggregate::aggregate(
            &inputs.person_sales,
            &inputs.goods_sales,
            &linked_expenses,
            &inputs.manual_deductions,
            config,
        );
        let managers = rollup::rollup(&config.managers, &reps, config);
        PeriodReport {
            reps,
            managers,
            linked_expenses,
        }
    }

    /// Freeze the period's inputs together with the live config. A
    /// later save for the same year and month replaces the snapshot.
    pub fn save_period(&self, year: i32, month: u32, inputs: &PeriodInputs) -> EngineResult<()> {
        let snapshot = PeriodSnapshot {
            person_sales: inputs.person_sales.clone(),
            goods_sales: inputs.goods_sales.clone(),
            expenses: inputs.expenses.clone(),
            manual_deductions: inputs.manual_deductions.clone(),
            config: self.config.clone(),
        };
        let created_at = chrono::Utc::now().to_rfc3339();
        self.store
            .save_period_snapshot(year, month, &created_at, &snapshot)?;
        log::info!("engine: saved period {year}-{month:02}");
        Ok(())
    }

    /// Recompute a saved period from its frozen inputs and config.
    pub fn replay_period(&self, year: i32, month: u32) -> EngineResult<PeriodReport> {
        let snapshot = self.store.load_period_snapshot(year, month)?;
        let inputs = PeriodInputs {
            person_sales: snapshot.person_sales,
            goods_sales: snapshot.goods_sales,
            expenses: snapshot.expenses,
            manual_deductions: snapshot.manual_deductions,
        };
        log::info!("engine: replaying period {year}-{month:02} under its saved config");
        Ok(Self::compute_with(&snapshot.config, &inputs))
    }

    pub fn list_periods(&self) -> EngineResult<Vec<PeriodMeta>> {
        self.store.list_periods()
    }
}
