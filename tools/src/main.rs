//! payout-runner: headless commission runner over CSV ledgers.
//!
//! Usage:
//!   payout-runner --person person.csv --goods goods.csv --db payout.db
//!   payout-runner --db payout.db --person p.csv --save-period 2024-03
//!   payout-runner --db payout.db --replay 2024-03
//!   payout-runner --db payout.db --list-periods

mod ingest;

use anyhow::{bail, Context, Result};
use commission_core::{
    config::EngineConfig,
    engine::{PayoutEngine, PeriodInputs, PeriodReport},
    store::PayoutStore,
    types::Category,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir");
    let person = flag_value(&args, "--person");
    let goods = flag_value(&args, "--goods");
    let expenses = flag_value(&args, "--expenses");
    let deductions = flag_value(&args, "--deductions");
    let expense_category = flag_value(&args, "--expense-category")
        .map(parse_category)
        .transpose()?;
    let save_period = flag_value(&args, "--save-period");
    let replay = flag_value(&args, "--replay");
    let list_only = args.iter().any(|a| a == "--list-periods");
    let json_output = args.iter().any(|a| a == "--json");

    if !json_output {
        println!("payout-runner");
        println!("  db:        {db}");
        println!("  person:    {}", person.unwrap_or("(none)"));
        println!("  goods:     {}", goods.unwrap_or("(none)"));
        println!("  expenses:  {}", expenses.unwrap_or("(none)"));
        println!();
    }

    let store = PayoutStore::open(db)?;
    store.migrate()?;

    if list_only {
        let periods = store.list_periods()?;
        if json_output {
            println!("{}", serde_json::to_string_pretty(&periods)?);
        } else if periods.is_empty() {
            println!("(no saved periods)");
        } else {
            println!("=== SAVED PERIODS ===");
            for period in &periods {
                println!(
                    "  {}-{:02} | saved {}",
                    period.year, period.month, period.created_at
                );
            }
        }
        return Ok(());
    }

    let config = resolve_config(&store, data_dir)?;
    let engine = PayoutEngine::new(config, store);

    if let Some(period) = replay {
        let (year, month) = parse_period(period)?;
        let report = engine.replay_period(year, month)?;
        return emit_report(&report, json_output);
    }

    if person.is_none() && goods.is_none() {
        bail!("no ledgers given; pass --person/--goods CSVs, or --replay/--list-periods");
    }

    let inputs = load_inputs(person, goods, expenses, deductions, expense_category)?;
    let report = engine.compute(&inputs);

    if let Some(period) = save_period {
        let (year, month) = parse_period(period)?;
        engine.save_period(year, month, &inputs)?;
        if !json_output {
            println!("Saved period {year}-{month:02}");
            println!();
        }
    }

    emit_report(&report, json_output)
}

fn load_inputs(
    person: Option<&str>,
    goods: Option<&str>,
    expenses: Option<&str>,
    deductions: Option<&str>,
    expense_category: Option<Category>,
) -> Result<PeriodInputs> {
    let mut inputs = PeriodInputs::default();
    if let Some(path) = person {
        inputs.person_sales = ingest::load_person_sales_file(path)?;
    }
    if let Some(path) = goods {
        inputs.goods_sales = ingest::load_goods_sales_file(path)?;
    }
    if let Some(path) = expenses {
        inputs.expenses = ingest::load_expenses_file(path, expense_category)?;
    }
    if let Some(path) = deductions {
        inputs.manual_deductions = ingest::load_manual_deductions_file(path)?;
    }
    Ok(inputs)
}

/// Config precedence: saved database config, then --data-dir JSON
/// files, then the built-in profile catalog.
fn resolve_config(store: &PayoutStore, data_dir: Option<&str>) -> Result<EngineConfig> {
    if store.has_config()? {
        log::info!("runner: using configuration from the database");
        return Ok(store.load_config()?);
    }
    if let Some(dir) = data_dir {
        log::info!("runner: loading configuration from {dir}");
        return EngineConfig::load(dir);
    }
    log::info!("runner: using the built-in profile catalog");
    Ok(EngineConfig {
        profiles: EngineConfig::builtin_profiles(),
        managers: Vec::new(),
        rep_bindings: Vec::new(),
        proxy_mappings: Vec::new(),
    })
}

fn emit_report(report: &PeriodReport, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &PeriodReport) {
    println!("=== PAYOUT SUMMARY ===");
    println!("  representatives: {}", report.reps.len());
    println!("  managers:        {}", report.managers.len());
    println!("  linked expenses: {}", report.linked_expenses.len());
    println!();

    if !report.reps.is_empty() {
        println!("=== REPRESENTATIVES ===");
        for rep in &report.reps {
            println!(
                "  {} | Target: {:.0} | Proxy: {:.0} | Other: {:.0} | Net: {:.0} | Commission: {:.0}",
                rep.rep_name,
                rep.net_target,
                rep.net_proxy,
                rep.net_other,
                rep.total_net,
                rep.total_commission
            );
        }
        println!();
    }

    if !report.managers.is_empty() {
        println!("=== MANAGERS ===");
        for manager in &report.managers {
            println!(
                "  {} | Team net: {:.0} | Deductions: {:.0} | Commission: {:.0}",
                manager.manager_name,
                manager.team_total_net,
                manager.team_deductions,
                manager.total_commission
            );
        }
    }
}

fn parse_period(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("period '{raw}' must be YEAR-MONTH, e.g. 2024-03"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("bad year in period '{raw}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("bad month in period '{raw}'"))?;
    if !(1..=12).contains(&month) {
        bail!("month in period '{raw}' must be 1-12");
    }
    Ok((year, month))
}

fn parse_category(raw: &str) -> Result<Category> {
    match raw.to_lowercase().as_str() {
        "target" => Ok(Category::Target),
        "proxy" | "beta" => Ok(Category::Proxy),
        "other" => Ok(Category::Other),
        _ => bail!("unknown category '{raw}', expected target, proxy, or other"),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
