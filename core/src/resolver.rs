//! Name resolution — turns raw subgroup labels into effective rep names.
//!
//! Proxy-group rows carry labels like `"گروه غرب (مشتری Ali Rezaei)"`; the
//! customer name inside the parenthesized marker is the real seller. One
//! extraction rule, one compiled pattern. The goods path and the expense
//! path both resolve through here, so a label always lands on the same
//! aggregate no matter which ledger mentioned it.

use crate::{config::ProxyMapping, types::RepName};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

static PROXY_LABEL_RE: OnceLock<Regex> = OnceLock::new();

/// The parenthesized customer marker: `(مشتری <name>)`, optional colon,
/// arbitrary interior whitespace.
fn proxy_label_re() -> &'static Regex {
    PROXY_LABEL_RE.get_or_init(|| {
        Regex::new(r"\(\s*مشتری\s*:?\s*(.+?)\s*\)").expect("proxy label pattern is valid")
    })
}

/// Administrator mapping table, indexed for O(1) lookup during a pass.
/// Duplicate keys keep the first entry, matching scan order over the
/// configured list.
pub struct MappingIndex {
    by_key: HashMap<String, RepName>,
}

impl MappingIndex {
    pub fn build(mappings: &[ProxyMapping]) -> Self {
        let mut by_key = HashMap::with_capacity(mappings.len());
        for m in mappings {
            by_key
                .entry(m.proxy_group_key.clone())
                .or_insert_with(|| m.assigned_rep_name.clone());
        }
        Self { by_key }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }
}

/// Pull the customer name out of a proxy-group label.
///
/// Falls back to the trimmed label itself when no marker is present, so
/// plain rep names pass through unchanged.
pub fn extract_proxy_name(raw_label: &str) -> &str {
    let trimmed = raw_label.trim();
    match proxy_label_re().captures(trimmed) {
        Some(caps) => caps.get(1).map_or(trimmed, |m| m.as_str().trim()),
        None => trimmed,
    }
}

/// Resolve a raw subgroup label to the effective rep name.
///
/// Non-proxy rows resolve to their label unchanged. Proxy rows extract the
/// customer name, then try the mapping table by extracted name, then by the
/// raw label, then keep the extracted name.
pub fn resolve_rep_name(raw_label: &str, is_proxy: bool, mappings: &MappingIndex) -> RepName {
    if !is_proxy {
        return raw_label.to_string();
    }
    resolve_label(raw_label, mappings)
}

/// The always-extract resolution used by the expense path, where the
/// proxy flag of the originating row is no longer at hand. For any label
/// this yields the same answer the proxy branch of [`resolve_rep_name`]
/// yields.
pub fn resolve_label(raw_label: &str, mappings: &MappingIndex) -> RepName {
    let extracted = extract_proxy_name(raw_label);
    if let Some(mapped) = mappings.get(extracted) {
        return mapped.to_string();
    }
    if let Some(mapped) = mappings.get(raw_label) {
        return mapped.to_string();
    }
    extracted.to_string()
}
