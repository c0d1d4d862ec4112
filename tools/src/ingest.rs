//! CSV ledger ingestion.
//!
//! Reads the Persian-headed sales exports. The person and goods ledgers
//! use fixed headers; expense sheets come from several source systems,
//! so each field accepts a list of header spellings and the first
//! non-empty match wins.

use anyhow::{Context, Result};
use commission_core::{
    ledger::{ExpenseRecord, GoodsSalesRecord, ManualDeduction, PersonSalesRecord},
    types::Category,
};
use std::collections::HashMap;
use std::io::Read;

const PERSON_NAME: &str = "نام";
const PERSON_SUBGROUP: &str = "نام زیرگروه";
const GROSS_WITH_TAX: &str = "فروش خالص با احتساب عوارض و مالیات";
const RETURNS_NET: &str = "برگشت از فروش خالص";
const RETURNS_TAX: &str = "عوارض و مالیات برگشت از فروش";
const PROXY_FLAG: &str = "is beta";

const GOODS_BUYER: &str = "نام خریدار";
const GOODS_CODE: &str = "کد کالا";

const EXPENSE_NAME_KEYS: &[&str] = &[
    "نام مجری",
    "نام طرف حساب",
    "نام خریدار",
    "نام",
    "طرف حساب",
    "نام تفصیلی",
];
const EXPENSE_AMOUNT_KEYS: &[&str] = &[
    "مبلغ",
    "جمع کسورات",
    "بدهکار",
    "هزینه",
    "مبلغ هزینه",
    "مانده",
];
const EXPENSE_DESC_KEYS: &[&str] = &["شرح", "توضیحات", "بابت", "شرح سند"];

const DEFAULT_SUBGROUP: &str = "Unassigned";
const DEFAULT_EXECUTOR: &str = "Unknown";
const DEFAULT_EXPENSE_DESC: &str = "هزینه ثبت شده";

/// Person ledger: one row per customer with subgroup and net figures.
/// Rows without a customer name or with a zero effective net are
/// skipped.
pub fn load_person_sales<R: Read>(reader: R) -> Result<Vec<PersonSalesRecord>> {
    let mut csv_reader = csv_reader(reader);
    let positions = header_positions(csv_reader.headers().context("person sales headers")?);

    let mut rows = Vec::new();
    for (line, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("person sales row {}", line + 2))?;
        let field = |name: &str| field_at(&record, &positions, name);

        let gross = parse_amount(field(GROSS_WITH_TAX));
        let returns_net = parse_amount(field(RETURNS_NET));
        let returns_tax = parse_amount(field(RETURNS_TAX));
        // Effective net: gross including tax, minus returns and the tax
        // refunded on them.
        let net_sales = gross - returns_net - returns_tax;

        let customer_name = field(PERSON_NAME).to_string();
        let subgroup = field(PERSON_SUBGROUP);
        let subgroup_label = if subgroup.is_empty() {
            DEFAULT_SUBGROUP.to_string()
        } else {
            subgroup.to_string()
        };
        let is_proxy = parse_flag(field(PROXY_FLAG))
            || subgroup_label.contains("بتا")
            || subgroup_label.to_lowercase().contains("beta");

        if customer_name.is_empty() || net_sales == 0.0 {
            continue;
        }
        rows.push(PersonSalesRecord {
            customer_name,
            subgroup_label,
            net_sales,
            returns: returns_net + returns_tax,
            is_proxy,
        });
    }
    log::info!("ingest: {} person sales rows", rows.len());
    Ok(rows)
}

/// Goods ledger: one row per product sale with the buying customer.
/// Rows with no buyer, or with zero net and zero returns, are skipped.
pub fn load_goods_sales<R: Read>(reader: R) -> Result<Vec<GoodsSalesRecord>> {
    let mut csv_reader = csv_reader(reader);
    let positions = header_positions(csv_reader.headers().context("goods sales headers")?);

    let mut rows = Vec::new();
    for (line, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("goods sales row {}", line + 2))?;
        let field = |name: &str| field_at(&record, &positions, name);

        let gross = parse_amount(field(GROSS_WITH_TAX));
        let returns_net = parse_amount(field(RETURNS_NET));
        let returns_tax = parse_amount(field(RETURNS_TAX));
        let net_sales = gross - returns_net - returns_tax;
        let returns = returns_net + returns_tax;

        let buyer_name = field(GOODS_BUYER).to_string();
        if buyer_name.is_empty() || (net_sales == 0.0 && returns == 0.0) {
            continue;
        }
        rows.push(GoodsSalesRecord {
            buyer_name,
            product_code: field(GOODS_CODE).to_string(),
            net_sales,
            returns,
        });
    }
    log::info!("ingest: {} goods sales rows", rows.len());
    Ok(rows)
}

/// Expense sheet: executor, amount, description under varying headers.
/// Non-positive amounts are skipped. When `category` is given, every
/// expense is assigned to that deduction bucket; otherwise they stay
/// unassigned and deduct nothing.
pub fn load_expenses<R: Read>(
    reader: R,
    category: Option<Category>,
) -> Result<Vec<ExpenseRecord>> {
    let mut csv_reader = csv_reader(reader);
    let positions = header_positions(csv_reader.headers().context("expense headers")?);

    let mut rows = Vec::new();
    for (line, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("expense row {}", line + 2))?;

        let name = first_field(&record, &positions, EXPENSE_NAME_KEYS);
        let amount = parse_amount(first_field(&record, &positions, EXPENSE_AMOUNT_KEYS));
        let description = first_field(&record, &positions, EXPENSE_DESC_KEYS);

        if amount <= 0.0 {
            continue;
        }
        rows.push(ExpenseRecord {
            executor_name: if name.is_empty() {
                DEFAULT_EXECUTOR.to_string()
            } else {
                name.to_string()
            },
            amount,
            description: if description.is_empty() {
                DEFAULT_EXPENSE_DESC.to_string()
            } else {
                description.to_string()
            },
            linked_rep: None,
            assigned_category: category,
        });
    }
    log::info!("ingest: {} expense rows", rows.len());
    Ok(rows)
}

#[derive(Debug, serde::Deserialize)]
struct DeductionRow {
    rep_name: String,
    amount: f64,
    category: Category,
    description: Option<String>,
}

/// Manual deductions: plain English headers, one row per deduction.
/// Each row gets a fresh id.
pub fn load_manual_deductions<R: Read>(reader: R) -> Result<Vec<ManualDeduction>> {
    let mut csv_reader = csv_reader(reader);
    let mut rows = Vec::new();
    for (line, result) in csv_reader.deserialize().enumerate() {
        let row: DeductionRow = result.with_context(|| format!("deduction row {}", line + 2))?;
        rows.push(ManualDeduction {
            id: uuid::Uuid::new_v4().to_string(),
            rep_name: row.rep_name,
            amount: row.amount,
            category: row.category,
            description: row.description.unwrap_or_default(),
        });
    }
    log::info!("ingest: {} manual deductions", rows.len());
    Ok(rows)
}

pub fn load_person_sales_file(path: &str) -> Result<Vec<PersonSalesRecord>> {
    let file = open(path)?;
    load_person_sales(file)
}

pub fn load_goods_sales_file(path: &str) -> Result<Vec<GoodsSalesRecord>> {
    let file = open(path)?;
    load_goods_sales(file)
}

pub fn load_expenses_file(path: &str, category: Option<Category>) -> Result<Vec<ExpenseRecord>> {
    let file = open(path)?;
    load_expenses(file, category)
}

pub fn load_manual_deductions_file(path: &str) -> Result<Vec<ManualDeduction>> {
    let file = open(path)?;
    load_manual_deductions(file)
}

fn open(path: &str) -> Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("Cannot open {path}"))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn header_positions(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect()
}

fn field_at<'a>(
    record: &'a csv::StringRecord,
    positions: &HashMap<String, usize>,
    name: &str,
) -> &'a str {
    positions
        .get(name)
        .and_then(|&idx| record.get(idx))
        .unwrap_or("")
}

fn first_field<'a>(
    record: &'a csv::StringRecord,
    positions: &HashMap<String, usize>,
    names: &[&str],
) -> &'a str {
    names
        .iter()
        .map(|name| field_at(record, positions, name))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// Ledger amounts arrive as "1,234,567" or accounting-negative
/// "(1,234)". Anything unparseable or non-finite reads as zero.
fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let (text, sign) = match cleaned
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (inner, -1.0),
        None => (cleaned.as_str(), 1.0),
    };
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => sign * n,
        _ => 0.0,
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "yes" | "bale" | "بله"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON_CSV: &str = "\
نام,نام زیرگروه,فروش خالص با احتساب عوارض و مالیات,برگشت از فروش خالص,عوارض و مالیات برگشت از فروش,is beta
Acme Shop,Region North,\"1,200\",100,100,no
Beta Store,گروه بتا (مشتری John Doe),500,0,0,
Empty Net,Region North,100,50,50,no
,Region North,300,0,0,no
Paren Guy,Region South,(200),0,0,yes
";

    const GOODS_CSV: &str = "\
نام خریدار,کد کالا,فروش خالص با احتساب عوارض و مالیات,برگشت از فروش خالص,عوارض و مالیات برگشت از فروش
Acme Shop,TG-100,\"2,000\",0,0
Acme Shop,MX-1,800,100,0
Zeroed,MX-2,0,0,0
Returned Only,MX-3,0,100,0
";

    #[test]
    fn person_rows_compute_effective_net() {
        let rows = load_person_sales(PERSON_CSV.as_bytes()).unwrap();
        let acme = &rows[0];
        assert_eq!(acme.customer_name, "Acme Shop");
        assert!((acme.net_sales - 1000.0).abs() < 1e-9);
        assert!((acme.returns - 200.0).abs() < 1e-9);
        assert!(!acme.is_proxy);
    }

    #[test]
    fn person_rows_without_name_or_net_are_skipped() {
        let rows = load_person_sales(PERSON_CSV.as_bytes()).unwrap();
        assert!(rows.iter().all(|r| !r.customer_name.is_empty()));
        assert!(rows.iter().all(|r| r.net_sales != 0.0));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn proxy_flag_reads_from_column_or_subgroup() {
        let rows = load_person_sales(PERSON_CSV.as_bytes()).unwrap();
        let beta = rows.iter().find(|r| r.customer_name == "Beta Store").unwrap();
        assert!(beta.is_proxy, "subgroup containing the proxy word marks the row");
        let paren = rows.iter().find(|r| r.customer_name == "Paren Guy").unwrap();
        assert!(paren.is_proxy, "explicit yes flag marks the row");
        assert!((paren.net_sales - (-200.0)).abs() < 1e-9);
    }

    #[test]
    fn goods_rows_keep_returned_only_lines() {
        let rows = load_goods_sales(GOODS_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().any(|r| r.buyer_name == "Returned Only"));
        assert!(!rows.iter().any(|r| r.buyer_name == "Zeroed"));
    }

    #[test]
    fn expense_headers_fall_back_across_spellings() {
        let csv_data = "\
نام طرف حساب,جمع کسورات,بابت
Rep One,\"5,000\",تبلیغات
Rep Two,(300),
Rep Three,0,ignored
";
        let rows = load_expenses(csv_data.as_bytes(), Some(Category::Other)).unwrap();
        assert_eq!(rows.len(), 1, "negative and zero amounts are skipped");
        assert_eq!(rows[0].executor_name, "Rep One");
        assert!((rows[0].amount - 5000.0).abs() < 1e-9);
        assert_eq!(rows[0].description, "تبلیغات");
        assert_eq!(rows[0].assigned_category, Some(Category::Other));
    }

    #[test]
    fn expense_defaults_fill_missing_name_and_description() {
        let csv_data = "\
مبلغ,شرح
700,
";
        let rows = load_expenses(csv_data.as_bytes(), None).unwrap();
        assert_eq!(rows[0].executor_name, "Unknown");
        assert_eq!(rows[0].description, "هزینه ثبت شده");
        assert_eq!(rows[0].assigned_category, None);
    }

    #[test]
    fn deduction_rows_get_fresh_ids() {
        let csv_data = "\
rep_name,amount,category,description
Rep One,1000,target,advance
Rep One,500,other,
";
        let rows = load_manual_deductions(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].id, rows[1].id);
        assert_eq!(rows[0].category, Category::Target);
        assert_eq!(rows[1].description, "");
    }

    #[test]
    fn amounts_parse_separators_and_accounting_negatives() {
        assert!((parse_amount("1,234,567") - 1_234_567.0).abs() < 1e-9);
        assert!((parse_amount("(1,234)") - (-1234.0)).abs() < 1e-9);
        assert!((parse_amount(" 42 ") - 42.0).abs() < 1e-9);
        assert_eq!(parse_amount("garbage"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
    }
}
