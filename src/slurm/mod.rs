// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Slurm integration: node inventory via `scontrol show nodes --json`,
//! flattened into one [`GresEntry`] per node and GRES type.

pub mod parser;
pub mod source;
pub mod types;

pub use source::{FileInput, FileSource, ResourceSource, ScontrolSource};
pub use types::{GresEntry, NodeState};
