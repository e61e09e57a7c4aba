use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::parser::parse_expression;

lazy_static! {
    static ref INTERPOLATION_BLOCK: Regex = Regex::new(r"\{\{(.+?)\}\}").unwrap();
}

/// Sources of all `{{ ... }}` blocks in `text`, trimmed, in order.
pub fn interpolated_expressions(text: &str) -> Vec<&str> {
    INTERPOLATION_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .collect()
}

/// Parameters read by the `{{ ... }}` blocks of `text`.
///
/// Blocks that do not parse are skipped: they render as-is and cannot
/// refer to a parameter.
pub fn params_referenced_in(text: &str) -> BTreeSet<String> {
    let mut params = BTreeSet::new();
    for source in interpolated_expressions(text) {
        match parse_expression(source) {
            Ok(expr) => params.extend(expr.variables()),
            Err(e) => debug!(block = source, error = %e, "skipping unparseable interpolation"),
        }
    }
    params
}
