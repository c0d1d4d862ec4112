//! Manager rollup — team totals from subordinate aggregates plus the
//! manager's own commission schedule applied to those totals.

use crate::{
    aggregate::{self, RepAggregate},
    config::{EngineConfig, Manager},
    types::{Category, RepName},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-subordinate line in a manager's statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubordinateDetail {
    pub rep_name: RepName,
    pub target_net: f64,
    pub proxy_net: f64,
    pub other_net: f64,
    pub total_net: f64,
}

/// One manager's rolled-up statement for the period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerAggregate {
    pub manager_id: String,
    pub manager_name: String,
    pub team_net_target: f64,
    pub team_net_proxy: f64,
    pub team_net_other: f64,
    /// All deduction buckets across the team, for reporting only.
    pub team_deductions: f64,
    /// Sum of subordinate total nets (already clamped per rep).
    pub team_total_net: f64,
    pub commission_target: f64,
    pub commission_proxy: f64,
    pub commission_other: f64,
    pub total_commission: f64,
    pub subordinate_details: Vec<SubordinateDetail>,
}

/// Roll subordinate aggregates up into one statement per configured
/// manager. Managers come out in configuration order; subordinates with
/// no aggregate this period are skipped.
pub fn rollup(
    managers: &[Manager],
    rep_aggregates: &[RepAggregate],
    config: &EngineConfig,
) -> Vec<ManagerAggregate> {
    let by_rep: HashMap<&str, &RepAggregate> = rep_aggregates
        .iter()
        .map(|agg| (agg.rep_name.as_str(), agg))
        .collect();
    let profiles = aggregate::profile_index(&config.profiles);

    let mut out = Vec::with_capacity(managers.len());
    for manager in managers {
        let mut stmt = ManagerAggregate {
            manager_id: manager.id.clone(),
            manager_name: manager.name.clone(),
            ..Default::default()
        };
        for name in &manager.subordinates {
            let Some(agg) = by_rep.get(name.as_str()) else {
                log::debug!(
                    "rollup: manager '{}' lists '{}' but no aggregate exists this period",
                    manager.name,
                    name
                );
                continue;
            };
            stmt.team_net_target += agg.net_target;
            stmt.team_net_proxy += agg.net_proxy;
            stmt.team_net_other += agg.net_other;
            stmt.team_deductions +=
                agg.deductions_target + agg.deductions_proxy + agg.deductions_other;
            stmt.team_total_net += agg.total_net;
            stmt.subordinate_details.push(SubordinateDetail {
                rep_name: agg.rep_name.clone(),
                target_net: agg.net_target,
                proxy_net: agg.net_proxy,
                other_net: agg.net_other,
                total_net: agg.total_net,
            });
        }

        if let Some(profile) = profiles.get(manager.profile_id.as_str()) {
            stmt.commission_target =
                aggregate::rule_payout(profile, Category::Target, stmt.team_net_target);
            stmt.commission_proxy =
                aggregate::rule_payout(profile, Category::Proxy, stmt.team_net_proxy);
            stmt.commission_other =
                aggregate::rule_payout(profile, Category::Other, stmt.team_net_other);
        }
        stmt.total_commission =
            stmt.commission_target + stmt.commission_proxy + stmt.commission_other;
        out.push(stmt);
    }

    log::info!("rollup: {} manager statements", out.len());
    out
}
