// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Parsing of Slurm GRES strings and conversion of node objects into
//! [`GresEntry`] records.
//!
//! GRES strings look like `gpu:a100:4(S:0-1),shard:a100:8`. Items are
//! separated by commas, but annotations in parentheses may contain commas
//! themselves (`gpu:2(IDX:0,3)`), so splitting is depth-aware.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{GresEntry, NodeState, NodesResponse, SlurmNode};
use crate::error::{GresError, Result};

/// A single parsed GRES item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GresItem {
    /// `type[:model]`
    pub name: String,
    pub count: u64,
}

/// Flag segments Slurm may put between the model and the count
const GRES_FLAGS: [&str; 1] = ["no_consume"];

fn item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<spec>[^()]+?)(?::(?P<count>\d+)(?P<unit>[KMG])?)?(?:\(.*\))?$")
            .expect("GRES item regex is valid")
    })
}

/// Split a GRES list on commas that are not inside parentheses
fn split_items(s: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&s[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    items.push(&s[start..]);

    items.into_iter().map(str::trim).filter(|i| !i.is_empty()).collect()
}

/// Parse a GRES string such as `gpu:a100:4(S:0-1),shard:8`.
///
/// `(null)`, `N/A` and the empty string yield no items. An item without a
/// numeric count (`gpu:a100`) counts as a single unit; a trailing all-digit
/// segment is always the count, so `gpu:1080` is 1080 units of `gpu`.
/// Flags such as `no_consume` are not part of the name.
pub fn parse_gres(s: &str) -> Result<Vec<GresItem>> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "(null)" || trimmed == "N/A" {
        return Ok(Vec::new());
    }

    split_items(trimmed)
        .into_iter()
        .map(|item| {
            let caps = item_regex()
                .captures(item)
                .ok_or_else(|| GresError::Parse(format!("invalid GRES item '{}'", item)))?;

            let name = caps["spec"]
                .split(':')
                .filter(|segment| !GRES_FLAGS.contains(segment))
                .collect::<Vec<_>>()
                .join(":");
            let count = match caps.name("count") {
                Some(count) => {
                    let base: u64 = count
                        .as_str()
                        .parse()
                        .map_err(|_| GresError::Parse(format!("GRES count out of range in '{}'", item)))?;
                    let multiplier = match caps.name("unit").map(|u| u.as_str()) {
                        Some("K") => 1024,
                        Some("M") => 1024 * 1024,
                        Some("G") => 1024 * 1024 * 1024,
                        _ => 1,
                    };
                    base.checked_mul(multiplier)
                        .ok_or_else(|| GresError::Parse(format!("GRES count out of range in '{}'", item)))?
                }
                None => 1,
            };

            Ok(GresItem { name, count })
        })
        .collect()
}

/// Flatten one node into one entry per configured GRES type
pub fn node_entries(node: &SlurmNode) -> Result<Vec<GresEntry>> {
    let on_node = |err: GresError| match err {
        GresError::Parse(msg) => GresError::Parse(format!("node {}: {}", node.hostname, msg)),
        other => other,
    };
    let total = parse_gres(&node.gres).map_err(on_node)?;
    let used = parse_gres(&node.gres_used).map_err(on_node)?;

    let state: Vec<NodeState> = node.state.iter().map(|s| NodeState::from(s.as_str())).collect();

    Ok(total
        .into_iter()
        .map(|item| {
            let used_count = used
                .iter()
                .filter(|u| u.name == item.name)
                .map(|u| u.count)
                .sum::<u64>()
                .min(item.count);

            GresEntry {
                name: item.name,
                node: node.hostname.clone(),
                partitions: node.partitions.clone(),
                count: item.count,
                used: used_count,
                state: state.clone(),
                cpus: node.cpus,
                cpus_idle: node.alloc_idle_cpus,
                memory_mb: node.real_memory,
                memory_alloc_mb: node.alloc_memory,
            }
        })
        .collect())
}

/// Parse a complete `scontrol show nodes --json` document
pub fn parse_nodes_json(output: &str) -> Result<Vec<GresEntry>> {
    let response: NodesResponse = serde_json::from_str(output)?;

    let mut entries = Vec::new();
    for node in &response.nodes {
        entries.extend(node_entries(node)?);
    }
    Ok(entries)
}
