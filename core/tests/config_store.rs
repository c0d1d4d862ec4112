//! Configuration persistence: transactional replace and faithful
//! reconstruction.

use commission_core::{
    config::{CommissionProfile, EngineConfig, Manager},
    store::PayoutStore,
    tier::TierRate,
    types::Category,
};

fn store() -> PayoutStore {
    let store = PayoutStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn a_fresh_store_has_no_config() {
    let store = store();
    assert!(!store.has_config().expect("has_config"));
}

#[test]
fn config_round_trips_through_the_store() {
    let mut store = store();
    let config = EngineConfig::default_test();

    store.save_config(&config).expect("save");
    assert!(store.has_config().expect("has_config"));
    let loaded = store.load_config().expect("load");

    assert_eq!(loaded.profiles.len(), config.profiles.len());
    assert_eq!(loaded.profiles[0].id, "prof_standard");
    assert_eq!(loaded.profiles[0].rules.len(), 3);
    assert_eq!(loaded.profiles[0].rules[0].category, Category::Target);
    assert_eq!(
        loaded.profiles[0].rules[0].tiers[0].rate,
        TierRate::Percent(10.0)
    );

    assert_eq!(loaded.managers.len(), 1);
    assert_eq!(loaded.managers[0].name, "Manager One");
    assert_eq!(
        loaded.managers[0].subordinates,
        vec!["Rep One".to_string(), "Rep Two".to_string()],
        "subordinate order survives the round trip"
    );

    assert_eq!(loaded.rep_bindings.len(), 2);
    assert_eq!(loaded.rep_bindings[0].rep_name, "Rep One");
    assert_eq!(loaded.proxy_mappings.len(), 1);
    assert_eq!(loaded.proxy_mappings[0].proxy_group_key, "John Doe");
}

#[test]
fn saving_replaces_the_previous_config_entirely() {
    let mut store = store();
    store
        .save_config(&EngineConfig::default_test())
        .expect("first save");

    let slim = EngineConfig {
        profiles: vec![CommissionProfile {
            id: "prof_only".into(),
            name: "Only profile".into(),
            rules: vec![],
        }],
        managers: vec![],
        rep_bindings: vec![],
        proxy_mappings: vec![],
    };
    store.save_config(&slim).expect("second save");
    let loaded = store.load_config().expect("load");

    assert_eq!(loaded.profiles.len(), 1);
    assert_eq!(loaded.profiles[0].id, "prof_only");
    assert!(loaded.managers.is_empty(), "old managers must not linger");
    assert!(loaded.rep_bindings.is_empty());
    assert!(loaded.proxy_mappings.is_empty());
}

#[test]
fn duplicate_subordinate_rows_collapse() {
    let mut store = store();
    let mut config = EngineConfig::default_test();
    config.managers = vec![Manager {
        id: "mgr_dup".into(),
        name: "Duplicated".into(),
        subordinates: vec!["Rep One".into(), "Rep One".into(), "Rep Two".into()],
        profile_id: "prof_lead".into(),
    }];

    store.save_config(&config).expect("save");
    let loaded = store.load_config().expect("load");

    assert_eq!(
        loaded.managers[0].subordinates,
        vec!["Rep One".to_string(), "Rep Two".to_string()]
    );
}

#[test]
fn builtin_catalog_round_trips_with_persian_names() {
    let mut store = store();
    let config = EngineConfig {
        profiles: EngineConfig::builtin_profiles(),
        managers: vec![],
        rep_bindings: vec![],
        proxy_mappings: vec![],
    };

    store.save_config(&config).expect("save");
    let loaded = store.load_config().expect("load");

    assert_eq!(loaded.profiles.len(), config.profiles.len());
    let shahrestan = loaded
        .profiles
        .iter()
        .find(|p| p.id == "prof_shahrestan")
        .expect("stock profile present");
    assert_eq!(shahrestan.name, "کارشناس فروش شهرستان");
    assert!(!shahrestan.rules.is_empty());
}
