//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};

/// A representative's canonical display name. Resolution output, ledger input.
pub type RepName = String;

/// A stable identifier for an administrator-authored entity (profile, manager).
pub type EntityId = String;

/// Sales category a goods row, deduction, or commission rule belongs to.
///
/// `Proxy` is the category historically labeled "Beta" in the ledgers.
/// `Total` never buckets sales rows; it exists so a profile can carry a
/// volume-bonus rule evaluated against a representative's total net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Target,
    Proxy,
    Other,
    Total,
}

impl Category {
    /// Human-readable label used in run summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Target => "Target",
            Category::Proxy => "Proxy (Beta)",
            Category::Other => "Other",
            Category::Total => "Total",
        }
    }
}
