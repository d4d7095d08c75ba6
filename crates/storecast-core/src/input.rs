//! Inbound text parsing: bot commands and store-id lists.

use std::collections::HashSet;

use storecast_types::store::StoreId;

/// A recognized bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

impl Command {
    /// Match trimmed, case-insensitive `/start` or `/help`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("/start") {
            Some(Command::Start)
        } else if text.eq_ignore_ascii_case("/help") {
            Some(Command::Help)
        } else {
            None
        }
    }
}

/// Parse a comma-separated list of store ids.
///
/// Whitespace anywhere in the text is ignored and a leading `/` is dropped,
/// so `/25, 3` and `25,3` are equivalent. Tokens that are not plain ASCII
/// digits (or overflow `u32`) are skipped. Duplicates collapse onto their
/// first occurrence, which fixes the output order.
pub fn extract_store_ids(text: &str) -> Vec<StoreId> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact.strip_prefix('/').unwrap_or(&compact);

    let mut seen = HashSet::new();
    body.split(',')
        .filter_map(parse_store_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Canonical comma-joined form of a store-id list.
pub fn join_store_ids(ids: &[StoreId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_store_id(token: &str) -> Option<StoreId> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok().map(StoreId)
}
