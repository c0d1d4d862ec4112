//! Per-representative aggregation: classification, deductions, nets,
//! and commission evaluation against the configured profiles.

use commission_core::{
    aggregate::{aggregate, RepAggregate},
    config::{CategoryRule, CommissionProfile, EngineConfig, RepBinding},
    ledger::{ExpenseRecord, GoodsSalesRecord, ManualDeduction, PersonSalesRecord},
    tier::{Tier, TierRate},
    types::Category,
};

fn person(customer: &str, subgroup: &str, net: f64, is_proxy: bool) -> PersonSalesRecord {
    PersonSalesRecord {
        customer_name: customer.to_string(),
        subgroup_label: subgroup.to_string(),
        net_sales: net,
        returns: 0.0,
        is_proxy,
    }
}

fn goods(buyer: &str, code: &str, net: f64) -> GoodsSalesRecord {
    GoodsSalesRecord {
        buyer_name: buyer.to_string(),
        product_code: code.to_string(),
        net_sales: net,
        returns: 0.0,
    }
}

fn linked_expense(label: &str, amount: f64, category: Category) -> ExpenseRecord {
    ExpenseRecord {
        executor_name: "ignored".to_string(),
        amount,
        description: "test expense".to_string(),
        linked_rep: Some(label.to_string()),
        assigned_category: Some(category),
    }
}

fn deduction(rep: &str, amount: f64, category: Category) -> ManualDeduction {
    ManualDeduction {
        id: format!("ded-{rep}-{amount}"),
        rep_name: rep.to_string(),
        amount,
        category,
        description: String::new(),
    }
}

fn find<'a>(reps: &'a [RepAggregate], name: &str) -> &'a RepAggregate {
    reps.iter()
        .find(|r| r.rep_name == name)
        .unwrap_or_else(|| panic!("no aggregate for rep '{name}'"))
}

#[test]
fn target_goods_pay_the_target_tier() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Acme", "Rep One", 1000.0, false)];
    let goods_sales = vec![goods("Acme", "TG-5", 1000.0)];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    assert_eq!(reps.len(), 1);
    let rep = &reps[0];
    assert_eq!(rep.rep_name, "Rep One");
    assert_eq!(rep.gross_target, 1000.0);
    assert_eq!(rep.net_target, 1000.0);
    assert_eq!(rep.total_net, 1000.0);
    // prof_standard pays 10% on Target.
    assert_eq!(rep.commission_target, 100.0);
    assert_eq!(rep.total_commission, 100.0);
}

#[test]
fn target_prefix_beats_the_proxy_flag() {
    let config = EngineConfig::default_test();
    // Proxy customer resolving to Rep One through the John Doe mapping.
    let person_sales = vec![person("Beta Cust", "گروه (مشتری John Doe)", 500.0, true)];
    let goods_sales = vec![
        goods("Beta Cust", "tg-9", 300.0),
        goods("Beta Cust", "MX-1", 200.0),
    ];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.gross_target, 300.0, "TG prefix is case-insensitive");
    assert_eq!(rep.gross_proxy, 200.0, "non-TG goods of a proxy customer");
    assert_eq!(rep.gross_other, 0.0);
    // 10% of 300 plus 5% of 200.
    assert_eq!(rep.commission_target, 30.0);
    assert_eq!(rep.commission_proxy, 10.0);
    assert_eq!(rep.total_commission, 40.0);
}

#[test]
fn non_proxy_goods_land_in_other() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Acme", "Rep One", 100.0, false)];
    let goods_sales = vec![goods("Acme", "MX-7", 400.0)];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.gross_other, 400.0);
    assert_eq!(rep.commission_other, 8.0, "prof_standard pays 2% on Other");
}

#[test]
fn goods_for_unknown_buyers_are_ignored() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Acme", "Rep One", 100.0, false)];
    let goods_sales = vec![goods("Ghost", "TG-1", 9999.0)];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.gross_target, 0.0);
    assert_eq!(rep.total_net, 0.0);
}

#[test]
fn linked_expenses_deduct_from_the_resolved_rep() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Beta Cust", "گروه (مشتری John Doe)", 500.0, true)];
    let goods_sales = vec![goods("Beta Cust", "MX-1", 1000.0)];
    // The linker stores the raw subgroup label; aggregation re-resolves
    // it through the same mapping chain the goods path used.
    let expenses = vec![linked_expense(
        "گروه (مشتری John Doe)",
        150.0,
        Category::Proxy,
    )];

    let reps = aggregate(&person_sales, &goods_sales, &expenses, &[], &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.deductions_proxy, 150.0);
    assert_eq!(rep.net_proxy, 850.0);
    assert_eq!(rep.commission_proxy, 42.5, "5% of the net, not the gross");
}

#[test]
fn expenses_without_a_category_deduct_nothing() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Acme", "Rep One", 100.0, false)];
    let mut expense = linked_expense("Rep One", 999.0, Category::Other);
    expense.assigned_category = None;

    let reps = aggregate(&person_sales, &[], &[expense], &[], &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.deductions_other, 0.0);
}

#[test]
fn manual_deductions_match_by_exact_rep_name() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Acme", "Rep One", 100.0, false)];
    let goods_sales = vec![goods("Acme", "TG-1", 1000.0)];
    let deductions = vec![
        deduction("Rep One", 200.0, Category::Target),
        deduction("Nobody", 5000.0, Category::Target),
    ];

    let reps = aggregate(&person_sales, &goods_sales, &[], &deductions, &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.deductions_target, 200.0, "the unknown rep's row is skipped");
    assert_eq!(rep.net_target, 800.0);
    assert_eq!(rep.commission_target, 80.0);
}

#[test]
fn negative_nets_are_preserved_and_pay_nothing() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Acme", "Rep One", 100.0, false)];
    let goods_sales = vec![goods("Acme", "TG-1", 300.0)];
    let deductions = vec![deduction("Rep One", 500.0, Category::Target)];

    let reps = aggregate(&person_sales, &goods_sales, &[], &deductions, &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.net_target, -200.0, "category nets are never clamped");
    assert_eq!(rep.total_net, -200.0);
    assert_eq!(rep.commission_target, 0.0);
    assert_eq!(rep.total_commission, 0.0);
}

#[test]
fn unbound_reps_earn_zero_commission() {
    let config = EngineConfig::default_test();
    // "Rep Three" has sales but no profile binding.
    let person_sales = vec![person("Acme", "Rep Three", 100.0, false)];
    let goods_sales = vec![goods("Acme", "TG-1", 1000.0)];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    let rep = find(&reps, "Rep Three");
    assert_eq!(rep.gross_target, 1000.0);
    assert_eq!(rep.commission_target, 0.0);
    assert_eq!(rep.total_commission, 0.0);
}

#[test]
fn total_rule_pays_the_volume_bonus_separately() {
    let pct = |value: f64| Tier {
        min: 0.0,
        max: 1_000_000.0,
        rate: TierRate::Percent(value),
    };
    let config = EngineConfig {
        profiles: vec![CommissionProfile {
            id: "prof_bonus".into(),
            name: "With volume bonus".into(),
            rules: vec![
                CategoryRule {
                    category: Category::Target,
                    tiers: vec![pct(10.0)],
                },
                CategoryRule {
                    category: Category::Total,
                    tiers: vec![Tier {
                        min: 0.0,
                        max: 1_000_000.0,
                        rate: TierRate::Fixed(50.0),
                    }],
                },
            ],
        }],
        managers: vec![],
        rep_bindings: vec![RepBinding {
            rep_name: "Rep One".into(),
            profile_id: "prof_bonus".into(),
        }],
        proxy_mappings: vec![],
    };
    let person_sales = vec![person("Acme", "Rep One", 100.0, false)];
    let goods_sales = vec![goods("Acme", "TG-1", 1000.0)];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    let rep = find(&reps, "Rep One");
    assert_eq!(rep.commission_target, 100.0);
    assert_eq!(rep.commission_total, 50.0, "evaluated against total net");
    assert_eq!(
        rep.total_commission, 100.0,
        "the volume bonus stays out of the per-category sum"
    );
}

#[test]
fn duplicate_customers_keep_the_last_row() {
    let config = EngineConfig::default_test();
    let person_sales = vec![
        person("Acme", "Rep One", 100.0, false),
        person("Acme", "Rep Two", 100.0, false),
    ];
    let goods_sales = vec![goods("Acme", "TG-1", 1000.0)];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    // Both reps were seeded, but the goods follow the last owner.
    assert_eq!(find(&reps, "Rep One").gross_target, 0.0);
    assert_eq!(find(&reps, "Rep Two").gross_target, 1000.0);
}

#[test]
fn output_follows_first_encounter_order() {
    let config = EngineConfig::default_test();
    let person_sales = vec![
        person("C1", "Rep Two", 100.0, false),
        person("C2", "Rep One", 100.0, false),
        person("C3", "Rep Two", 100.0, false),
    ];

    let reps = aggregate(&person_sales, &[], &[], &[], &config);

    let names: Vec<&str> = reps.iter().map(|r| r.rep_name.as_str()).collect();
    assert_eq!(names, ["Rep Two", "Rep One"]);
}

#[test]
fn rows_with_empty_names_never_seed_aggregates() {
    let config = EngineConfig::default_test();
    let person_sales = vec![
        person("   ", "Rep One", 100.0, false),
        person("Acme", "", 100.0, false),
    ];

    let reps = aggregate(&person_sales, &[], &[], &[], &config);

    // The blank customer is skipped entirely; the empty subgroup
    // resolves to an empty rep name, which seeds nothing.
    assert!(reps.is_empty(), "got {} aggregates", reps.len());
}

#[test]
fn non_finite_totals_collapse_to_zero() {
    let config = EngineConfig::default_test();
    let person_sales = vec![person("Acme", "Rep One", 100.0, false)];
    let goods_sales = vec![
        goods("Acme", "TG-1", f64::INFINITY),
        goods("Acme", "MX-1", f64::NEG_INFINITY),
    ];

    let reps = aggregate(&person_sales, &goods_sales, &[], &[], &config);

    let rep = find(&reps, "Rep One");
    assert!(rep.net_target.is_infinite(), "category nets stay raw");
    assert_eq!(rep.total_net, 0.0, "only the final total is clamped");
}
