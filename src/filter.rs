// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Name/partition filtering of GRES entries.

use crate::slurm::GresEntry;

/// The resolved query from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Substring of the GRES name, matched case-insensitively
    pub name: String,
    /// Substring of any partition the node belongs to. `Some("")` is the same as `None`.
    pub partition: Option<String>,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, partition: Option<String>) -> Self {
        Self {
            name: name.into(),
            partition,
        }
    }

    pub fn matches(&self, entry: &GresEntry) -> bool {
        if !contains_ignore_case(&entry.name, &self.name) {
            return false;
        }

        match self.partition.as_deref() {
            None | Some("") => true,
            Some(partition) => entry
                .partitions
                .iter()
                .any(|p| contains_ignore_case(p, partition)),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Keep entries matching `spec`, preserving source order
pub fn apply(entries: Vec<GresEntry>, spec: &FilterSpec) -> Vec<GresEntry> {
    entries.into_iter().filter(|e| spec.matches(e)).collect()
}
