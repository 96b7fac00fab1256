// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Wire format of `scontrol show nodes --json` and the flattened GRES records
//! built from it.
//!
//! Only the fields needed for GRES reporting are deserialized; everything else
//! in the (large) node objects is ignored.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Node state flag as reported by Slurm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Idle,
    Mixed,
    Allocated,
    Completing,
    Drain,
    Draining,
    Drained,
    Down,
    Fail,
    Reserved,
    Planned,
    Unknown(String),
}

impl From<&str> for NodeState {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "IDLE" => NodeState::Idle,
            "MIXED" | "MIX" => NodeState::Mixed,
            "ALLOCATED" | "ALLOC" => NodeState::Allocated,
            "COMPLETING" | "COMP" => NodeState::Completing,
            "DRAIN" => NodeState::Drain,
            "DRAINING" | "DRNG" => NodeState::Draining,
            "DRAINED" => NodeState::Drained,
            "DOWN" => NodeState::Down,
            "FAIL" | "FAILING" => NodeState::Fail,
            "RESERVED" | "RESV" => NodeState::Reserved,
            "PLANNED" => NodeState::Planned,
            other => NodeState::Unknown(other.to_string()),
        }
    }
}

impl NodeState {
    pub fn as_str(&self) -> &str {
        match self {
            NodeState::Idle => "IDLE",
            NodeState::Mixed => "MIXED",
            NodeState::Allocated => "ALLOCATED",
            NodeState::Completing => "COMPLETING",
            NodeState::Drain => "DRAIN",
            NodeState::Draining => "DRAINING",
            NodeState::Drained => "DRAINED",
            NodeState::Down => "DOWN",
            NodeState::Fail => "FAIL",
            NodeState::Reserved => "RESERVED",
            NodeState::Planned => "PLANNED",
            NodeState::Unknown(s) => s,
        }
    }

    /// Node cannot take new work
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            NodeState::Drain | NodeState::Draining | NodeState::Drained | NodeState::Down | NodeState::Fail
        )
    }
}

impl Serialize for NodeState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Top-level document of `scontrol show nodes --json`
#[derive(Debug, Clone, Deserialize)]
pub struct NodesResponse {
    pub nodes: Vec<SlurmNode>,
}

/// A single node object. Older Slurm releases report `state` as a plain
/// string ("IDLE+DRAIN"), newer ones as a list of flags.
#[derive(Debug, Clone, Deserialize)]
pub struct SlurmNode {
    pub hostname: String,

    #[serde(default, deserialize_with = "deserialize_state")]
    pub state: Vec<String>,

    #[serde(default)]
    pub partitions: Vec<String>,

    #[serde(default)]
    pub cpus: u32,

    #[serde(default)]
    pub alloc_idle_cpus: u32,

    /// Configured memory in MB
    #[serde(default)]
    pub real_memory: u64,

    /// Allocated memory in MB
    #[serde(default)]
    pub alloc_memory: u64,

    #[serde(default)]
    pub gres: String,

    #[serde(default)]
    pub gres_used: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StateField {
    Flags(Vec<String>),
    Joined(String),
}

fn deserialize_state<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match StateField::deserialize(deserializer)? {
        StateField::Flags(flags) => flags,
        StateField::Joined(joined) => joined
            .split('+')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// One generic resource type on one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GresEntry {
    /// `type[:model]`, e.g. "gpu:a100"
    pub name: String,
    pub node: String,
    pub partitions: Vec<String>,
    /// Configured units
    pub count: u64,
    /// Allocated units, never above `count`
    pub used: u64,
    pub state: Vec<NodeState>,
    pub cpus: u32,
    pub cpus_idle: u32,
    pub memory_mb: u64,
    pub memory_alloc_mb: u64,
}

impl GresEntry {
    pub fn free(&self) -> u64 {
        self.count.saturating_sub(self.used)
    }

    pub fn memory_free_mb(&self) -> u64 {
        self.memory_mb.saturating_sub(self.memory_alloc_mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_state_from_str() {
        assert_eq!(NodeState::from("IDLE"), NodeState::Idle);
        assert_eq!(NodeState::from("mixed"), NodeState::Mixed);
        assert_eq!(NodeState::from("ALLOC"), NodeState::Allocated);
        assert_eq!(NodeState::from("DRAIN"), NodeState::Drain);
        assert!(matches!(NodeState::from("CLOUD"), NodeState::Unknown(_)));
        assert_eq!(NodeState::from("CLOUD").as_str(), "CLOUD");
    }

    #[test]
    fn test_node_state_is_unavailable() {
        assert!(NodeState::Down.is_unavailable());
        assert!(NodeState::Drain.is_unavailable());
        assert!(!NodeState::Idle.is_unavailable());
        assert!(!NodeState::Mixed.is_unavailable());
    }

    #[test]
    fn test_deserialize_node_with_state_list() {
        let json = r#"{
            "hostname": "gpu001",
            "state": ["IDLE", "DRAIN"],
            "partitions": ["gpu", "debug"],
            "cpus": 64,
            "alloc_idle_cpus": 48,
            "real_memory": 512000,
            "alloc_memory": 128000,
            "gres": "gpu:a100:4(S:0-1)",
            "gres_used": "gpu:a100:1(IDX:0)",
            "architecture": "x86_64"
        }"#;

        let node: SlurmNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.hostname, "gpu001");
        assert_eq!(node.state, vec!["IDLE", "DRAIN"]);
        assert_eq!(node.partitions, vec!["gpu", "debug"]);
        assert_eq!(node.alloc_idle_cpus, 48);
        assert_eq!(node.gres, "gpu:a100:4(S:0-1)");
    }

    #[test]
    fn test_deserialize_node_with_joined_state() {
        let json = r#"{"hostname": "cpu001", "state": "ALLOCATED+DRAIN"}"#;

        let node: SlurmNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.hostname, "cpu001");
        assert_eq!(node.state, vec!["ALLOCATED", "DRAIN"]);
        assert!(node.partitions.is_empty());
        assert_eq!(node.cpus, 0);
        assert!(node.gres.is_empty());
    }

    #[test]
    fn test_entry_free_units() {
        let entry = GresEntry {
            name: "gpu:a100".to_string(),
            node: "gpu001".to_string(),
            partitions: vec!["gpu".to_string()],
            count: 4,
            used: 3,
            state: vec![NodeState::Mixed],
            cpus: 64,
            cpus_idle: 16,
            memory_mb: 512000,
            memory_alloc_mb: 500000,
        };
        assert_eq!(entry.free(), 1);
        assert_eq!(entry.memory_free_mb(), 12000);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"state\":[\"MIXED\"]"));
    }
}
