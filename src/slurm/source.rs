// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Resource sources: query node GRES inventory via scontrol, or read a saved
//! `scontrol show nodes --json` document.

use std::io::Read;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, info};

use super::parser::parse_nodes_json;
use super::types::GresEntry;
use crate::error::{GresError, Result};

/// Default query command
pub const SCONTROL: &str = "scontrol";

/// Default arguments producing the JSON node inventory
pub const SCONTROL_ARGS: [&str; 3] = ["show", "nodes", "--json"];

/// Something that can produce a point-in-time snapshot of GRES entries
pub trait ResourceSource {
    fn fetch(&self) -> Result<Vec<GresEntry>>;
}

/// Runs an external command (scontrol by default) and parses its JSON output
#[derive(Debug, Clone)]
pub struct ScontrolSource {
    pub command: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl ScontrolSource {
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }

    fn describe(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command with a timeout; the child is killed if it overruns
    async fn query(&self) -> Result<Vec<u8>> {
        let child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GresError::SourceUnavailable(format!("failed to execute {}: {}", self.command, e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                GresError::SourceUnavailable(format!(
                    "{} did not answer within {}s",
                    self.describe(),
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| GresError::SourceUnavailable(format!("{} failed: {}", self.describe(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GresError::SourceUnavailable(format!(
                "{} failed ({}): {}",
                self.describe(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl ResourceSource for ScontrolSource {
    fn fetch(&self) -> Result<Vec<GresEntry>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GresError::SourceUnavailable(format!("failed to start runtime: {}", e)))?;

        debug!(command = %self.describe(), timeout = ?self.timeout, "querying resource manager");
        let started = Instant::now();
        let stdout = rt.block_on(self.query())?;
        info!(
            bytes = stdout.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "resource manager answered"
        );

        let text = std::str::from_utf8(&stdout)
            .map_err(|e| GresError::Parse(format!("{} output is not UTF-8: {}", self.command, e)))?;
        parse_nodes_json(text)
    }
}

/// Where a saved node inventory is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileInput {
    Stdin,
    Path(PathBuf),
}

impl FileInput {
    fn describe(&self) -> String {
        match self {
            FileInput::Stdin => "stdin".to_string(),
            FileInput::Path(path) => path.display().to_string(),
        }
    }
}

impl From<&str> for FileInput {
    fn from(s: &str) -> Self {
        if s == "-" {
            FileInput::Stdin
        } else {
            FileInput::Path(PathBuf::from(s))
        }
    }
}

/// Reads a saved `scontrol show nodes --json` document
#[derive(Debug, Clone)]
pub struct FileSource {
    pub input: FileInput,
}

impl FileSource {
    pub fn new(input: FileInput) -> Self {
        Self { input }
    }
}

impl ResourceSource for FileSource {
    fn fetch(&self) -> Result<Vec<GresEntry>> {
        let content = match &self.input {
            FileInput::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .map_err(|e| GresError::SourceUnavailable(format!("failed to read stdin: {}", e)))?;
                buf
            }
            FileInput::Path(path) => std::fs::read(path).map_err(|e| {
                GresError::SourceUnavailable(format!("failed to read {}: {}", path.display(), e))
            })?,
        };

        debug!(input = ?self.input, bytes = content.len(), "read saved node inventory");
        let text = std::str::from_utf8(&content)
            .map_err(|e| GresError::Parse(format!("{} is not UTF-8: {}", self.input.describe(), e)))?;
        parse_nodes_json(text)
    }
}
