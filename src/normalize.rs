use regex::Regex;
use std::sync::LazyLock;

use crate::types::CustomerRecord;

static STATE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("hardcoded"));

/// Expands rows whose `state` lists several codes into one row per code.
///
/// Every other field is copied verbatim. Output keeps source row order, then
/// code order within a row. A state without commas passes through unchanged.
pub fn explode_states(records: Vec<CustomerRecord>) -> Vec<CustomerRecord> {
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let codes: Vec<&str> = STATE_SEPARATOR.split(&record.state).collect();
        if codes.len() == 1 {
            out.push(record);
            continue;
        }

        for code in codes {
            out.push(CustomerRecord {
                state: code.to_string(),
                ..record.clone()
            });
        }
    }

    out
}
