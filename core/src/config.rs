//! Administrator-maintained configuration: commission profiles, the
//! manager hierarchy, rep-to-profile bindings, and the proxy mapping table.

use crate::{
    tier::{Tier, TierRate},
    types::{Category, EntityId, RepName},
};
use serde::{Deserialize, Serialize};

/// Commission schedule for one sales category inside a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionProfile {
    pub id: EntityId,
    pub name: String,
    pub rules: Vec<CategoryRule>,
}

impl CommissionProfile {
    /// First rule authored for `category`, if any.
    pub fn rule(&self, category: Category) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.category == category)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manager {
    pub id: EntityId,
    pub name: String,
    /// Rep names, matched against aggregate output by exact name.
    pub subordinates: Vec<RepName>,
    pub profile_id: EntityId,
}

/// Binds one representative to a commission profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepBinding {
    pub rep_name: RepName,
    pub profile_id: EntityId,
}

/// One row of the proxy mapping table. `proxy_group_key` is matched first
/// against the extracted customer name, then against the raw label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyMapping {
    pub proxy_group_key: String,
    pub assigned_rep_name: RepName,
}

#[derive(Debug, Clone, Deserialize)]
struct ProfilesFile {
    profiles: Vec<CommissionProfile>,
}

#[derive(Debug, Clone, Deserialize)]
struct ManagersFile {
    managers: Vec<Manager>,
}

#[derive(Debug, Clone, Deserialize)]
struct RepBindingsFile {
    bindings: Vec<RepBinding>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProxyMappingsFile {
    mappings: Vec<ProxyMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub profiles: Vec<CommissionProfile>,
    pub managers: Vec<Manager>,
    pub rep_bindings: Vec<RepBinding>,
    pub proxy_mappings: Vec<ProxyMapping>,
}

impl EngineConfig {
    /// Load from the data/ directory (one JSON file per section).
    /// In tests, use EngineConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let profiles_path = format!("{data_dir}/profiles.json");
        let profiles_content = std::fs::read_to_string(&profiles_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {profiles_path}: {e}"))?;
        let profiles_file: ProfilesFile = serde_json::from_str(&profiles_content)?;

        let managers_path = format!("{data_dir}/managers.json");
        let managers_content = std::fs::read_to_string(&managers_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {managers_path}: {e}"))?;
        let managers_file: ManagersFile = serde_json::from_str(&managers_content)?;

        let bindings_path = format!("{data_dir}/rep_bindings.json");
        let bindings_content = std::fs::read_to_string(&bindings_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {bindings_path}: {e}"))?;
        let bindings_file: RepBindingsFile = serde_json::from_str(&bindings_content)?;

        let mappings_path = format!("{data_dir}/proxy_mappings.json");
        let mappings_content = std::fs::read_to_string(&mappings_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {mappings_path}: {e}"))?;
        let mappings_file: ProxyMappingsFile = serde_json::from_str(&mappings_content)?;

        Ok(Self {
            profiles: profiles_file.profiles,
            managers: managers_file.managers,
            rep_bindings: bindings_file.bindings,
            proxy_mappings: mappings_file.mappings,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let pct = |min: f64, max: f64, value: f64| Tier {
            min,
            max,
            rate: TierRate::Percent(value),
        };

        let standard = CommissionProfile {
            id: "prof_standard".into(),
            name: "Standard rep".into(),
            rules: vec![
                CategoryRule {
                    category: Category::Target,
                    tiers: vec![pct(0.0, 1_000_000_000.0, 10.0)],
                },
                CategoryRule {
                    category: Category::Proxy,
                    tiers: vec![pct(0.0, 1_000_000_000.0, 5.0)],
                },
                CategoryRule {
                    category: Category::Other,
                    tiers: vec![pct(0.0, 1_000_000_000.0, 2.0)],
                },
            ],
        };

        let lead = CommissionProfile {
            id: "prof_lead".into(),
            name: "Team lead".into(),
            rules: vec![
                CategoryRule {
                    category: Category::Target,
                    tiers: vec![pct(0.0, 10_000_000_000.0, 1.0)],
                },
                CategoryRule {
                    category: Category::Proxy,
                    tiers: vec![],
                },
                CategoryRule {
                    category: Category::Other,
                    tiers: vec![],
                },
            ],
        };

        Self {
            profiles: vec![standard, lead],
            managers: vec![Manager {
                id: "mgr_one".into(),
                name: "Manager One".into(),
                subordinates: vec!["Rep One".into(), "Rep Two".into()],
                profile_id: "prof_lead".into(),
            }],
            rep_bindings: vec![
                RepBinding {
                    rep_name: "Rep One".into(),
                    profile_id: "prof_standard".into(),
                },
                RepBinding {
                    rep_name: "Rep Two".into(),
                    profile_id: "prof_standard".into(),
                },
            ],
            proxy_mappings: vec![ProxyMapping {
                proxy_group_key: "John Doe".into(),
                assigned_rep_name: "Rep One".into(),
            }],
        }
    }

    /// The stock profile catalog shipped with the engine, seeded into a
    /// fresh deployment before administrators author their own. Amounts
    /// are in Rials.
    pub fn builtin_profiles() -> Vec<CommissionProfile> {
        let pct = |min: f64, max: f64, value: f64| Tier {
            min,
            max,
            rate: TierRate::Percent(value),
        };
        let flat = |min: f64, max: f64, value: f64| Tier {
            min,
            max,
            rate: TierRate::Fixed(value),
        };
        let empty = |category: Category| CategoryRule {
            category,
            tiers: vec![],
        };

        vec![
            CommissionProfile {
                id: "prof_shahrestan".into(),
                name: "کارشناس فروش شهرستان".into(),
                rules: vec![
                    CategoryRule {
                        category: Category::Target,
                        tiers: vec![
                            pct(20_000_000_000.0, 70_000_000_000.0, 0.2),
                            pct(70_000_000_000.0, 100_000_000_000.0, 0.3),
                            pct(100_000_000_000.0, 150_000_000_000.0, 0.4),
                            pct(150_000_000_000.0, 1_500_000_000_000.0, 0.5),
                        ],
                    },
                    empty(Category::Proxy),
                    empty(Category::Other),
                ],
            },
            CommissionProfile {
                id: "prof_alborz".into(),
                name: "کارشناس فروش البرز".into(),
                rules: vec![
                    CategoryRule {
                        category: Category::Target,
                        tiers: vec![
                            pct(20_000_000_000.0, 100_000_000_000.0, 0.5),
                            pct(100_000_000_000.0, 200_000_000_000.0, 0.7),
                            pct(200_000_000_000.0, 2_000_000_000_000.0, 0.9),
                        ],
                    },
                    empty(Category::Proxy),
                    empty(Category::Other),
                ],
            },
            CommissionProfile {
                id: "prof_tehran".into(),
                name: "کارشناس فروش تهران".into(),
                rules: vec![
                    CategoryRule {
                        category: Category::Target,
                        tiers: vec![
                            pct(20_000_000_000.0, 100_000_000_000.0, 0.5),
                            pct(100_000_000_000.0, 150_000_000_000.0, 0.7),
                            pct(150_000_000_000.0, 1_500_000_000_000.0, 0.9),
                        ],
                    },
                    empty(Category::Proxy),
                    empty(Category::Other),
                ],
            },
            CommissionProfile {
                id: "prof_taavoni".into(),
                name: "کارشناس فروش تعاونی".into(),
                rules: vec![
                    CategoryRule {
                        category: Category::Target,
                        tiers: vec![
                            pct(20_000_000_000.0, 70_000_000_000.0, 0.2),
                            pct(70_000_000_000.0, 150_000_000_000.0, 0.3),
                            pct(150_000_000_000.0, 250_000_000_000.0, 0.4),
                            pct(250_000_000_000.0, 2_500_000_000_000.0, 0.5),
                        ],
                    },
                    empty(Category::Proxy),
                    empty(Category::Other),
                ],
            },
            CommissionProfile {
                id: "prof_solhi".into(),
                name: "کارشناس فروش (آقای صلحی)".into(),
                rules: vec![
                    CategoryRule {
                        category: Category::Target,
                        tiers: vec![pct(1.0, 7_000_000_000_000.0, 1.0)],
                    },
                    empty(Category::Proxy),
                    empty(Category::Other),
                ],
            },
            CommissionProfile {
                id: "prof_abdollahpour".into(),
                name: "مدیر فروش شهرستان (عبدالله پور)".into(),
                rules: vec![
                    CategoryRule {
                        category: Category::Target,
                        tiers: vec![
                            pct(100_000_000_000.0, 300_000_000_000.0, 0.3),
                            pct(300_000_000_000.0, 500_000_000_000.0, 0.4),
                            pct(500_000_000_000.0, 5_000_000_000_000.0, 0.5),
                        ],
                    },
                    empty(Category::Proxy),
                    empty(Category::Other),
                ],
            },
            CommissionProfile {
                id: "prof_modern".into(),
                name: "کارشناس فروش فروشگاه های مدرن".into(),
                rules: vec![
                    empty(Category::Target),
                    empty(Category::Proxy),
                    CategoryRule {
                        category: Category::Other,
                        tiers: vec![
                            pct(20_000_000_000.0, 100_000_000_000.0, 0.1),
                            pct(100_000_000_000.0, 300_000_000_000.0, 0.2),
                            pct(300_000_000_000.0, 3_000_000_000_000.0, 0.3),
                        ],
                    },
                ],
            },
            CommissionProfile {
                id: "prof_bazaar".into(),
                name: "کارشناس فروش بازار، سه راه امین حضور و شوش".into(),
                rules: vec![
                    empty(Category::Target),
                    empty(Category::Proxy),
                    CategoryRule {
                        category: Category::Other,
                        tiers: vec![
                            pct(20_000_000_000.0, 70_000_000_000.0, 0.3),
                            pct(70_000_000_000.0, 100_000_000_000.0, 0.4),
                            pct(100_000_000_000.0, 150_000_000_000.0, 0.5),
                            pct(150_000_000_000.0, 1_500_000_000_000.0, 0.6),
                        ],
                    },
                ],
            },
            // Transport allowance pays flat amounts per volume band.
            CommissionProfile {
                id: "prof_transport".into(),
                name: "کمک هزینه ایاب ذهاب".into(),
                rules: vec![
                    empty(Category::Target),
                    empty(Category::Proxy),
                    CategoryRule {
                        category: Category::Other,
                        tiers: vec![
                            flat(20_000_000_000.0, 60_000_000_000.0, 20_000_000.0),
                            flat(60_000_000_000.0, 100_000_000_000.0, 40_000_000.0),
                            flat(100_000_000_000.0, 1_000_000_000_000.0, 60_000_000.0),
                        ],
                    },
                ],
            },
        ]
    }
}
