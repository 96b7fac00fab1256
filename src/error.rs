// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Error taxonomy and process exit codes.
//!
//! | code | kind                                   |
//! |------|----------------------------------------|
//! | 0    | success, including zero matches        |
//! | 1    | usage, config file or output failure   |
//! | 2    | source unavailable                     |
//! | 3    | malformed source output                |
//! | 4    | unknown style                          |

use std::process::ExitCode;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GresError {
    #[error("{0}")]
    Usage(String),

    #[error("configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error("resource source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("failed to parse resource data: {0}")]
    Parse(String),

    #[error("unknown style '{name}' (valid styles: {})", valid.join(", "))]
    UnknownStyle { name: String, valid: Vec<String> },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GresError>;

impl GresError {
    pub fn exit_code(&self) -> u8 {
        match self {
            GresError::Usage(_) | GresError::Config(_) | GresError::Output(_) => 1,
            GresError::SourceUnavailable(_) => 2,
            GresError::Parse(_) => 3,
            GresError::UnknownStyle { .. } => 4,
        }
    }
}

impl From<&GresError> for ExitCode {
    fn from(err: &GresError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

impl From<serde_json::Error> for GresError {
    fn from(err: serde_json::Error) -> Self {
        GresError::Parse(err.to_string())
    }
}
