// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Named rendering styles: built-in presets plus styles defined in the
//! config file.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{GresError, Result};

/// Style used when neither the command line nor the config names one
pub const DEFAULT_STYLE: &str = "default";

/// Machine-readable output, cannot be redefined by the config
pub const JSON_STYLE: &str = "json";

const BUILTIN_STYLES: &[&str] = &["compact", DEFAULT_STYLE, JSON_STYLE, "modern"];

/// A table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Node,
    Partition,
    Gres,
    Used,
    Total,
    Free,
    /// One glyph per unit, used glyphs first
    Usage,
    /// Idle/total CPUs
    Cpus,
    /// Free/total memory
    Memory,
    State,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Node => "NODE",
            Column::Partition => "PARTITION",
            Column::Gres => "GRES",
            Column::Used => "USED",
            Column::Total => "TOTAL",
            Column::Free => "FREE",
            Column::Usage => "USAGE",
            Column::Cpus => "CPUS",
            Column::Memory => "MEMORY",
            Column::State => "STATE",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Used | Column::Total | Column::Free | Column::Cpus | Column::Memory)
    }
}

/// Border set of a table style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// `+---+` borders around every row
    Ascii,
    /// Box drawing, no lines between rows
    Utf8,
    /// Box drawing with round corners
    Rounded,
    Markdown,
    /// Whitespace separated
    None,
}

fn default_used_glyph() -> char {
    'u'
}

fn default_free_glyph() -> char {
    'i'
}

fn default_true() -> bool {
    true
}

/// A table style as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleDef {
    pub preset: Preset,
    pub columns: Vec<Column>,
    #[serde(default = "default_used_glyph")]
    pub used_glyph: char,
    #[serde(default = "default_free_glyph")]
    pub free_glyph: char,
    /// Append an "N entries, F/T units free" line
    #[serde(default)]
    pub summary: bool,
    #[serde(default = "default_true")]
    pub header: bool,
}

/// Output format of a resolved style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Table(StyleDef),
    Json,
}

/// A fully resolved style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpec {
    pub name: String,
    pub format: Format,
}

fn builtin(name: &str) -> Option<Format> {
    let table = match name {
        DEFAULT_STYLE => StyleDef {
            preset: Preset::Ascii,
            columns: vec![
                Column::Node,
                Column::Cpus,
                Column::Memory,
                Column::Gres,
                Column::Usage,
                Column::State,
            ],
            used_glyph: 'u',
            free_glyph: 'i',
            summary: false,
            header: true,
        },
        "modern" => StyleDef {
            preset: Preset::Rounded,
            columns: vec![
                Column::Node,
                Column::Partition,
                Column::Gres,
                Column::Used,
                Column::Total,
                Column::Usage,
                Column::State,
            ],
            used_glyph: '■',
            free_glyph: '□',
            summary: true,
            header: true,
        },
        "compact" => StyleDef {
            preset: Preset::None,
            columns: vec![Column::Node, Column::Gres, Column::Used, Column::Total, Column::State],
            used_glyph: 'u',
            free_glyph: 'i',
            summary: false,
            header: true,
        },
        JSON_STYLE => return Some(Format::Json),
        _ => return None,
    };
    Some(Format::Table(table))
}

/// All style names that `resolve` accepts, sorted
pub fn style_names(custom: &BTreeMap<String, StyleDef>) -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_STYLES
        .iter()
        .map(|s| s.to_string())
        .chain(custom.keys().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}

impl StyleSpec {
    /// Resolve a style name. Config-defined styles shadow built-ins,
    /// except `json`.
    pub fn resolve(name: &str, custom: &BTreeMap<String, StyleDef>) -> Result<Self> {
        let format = match custom.get(name) {
            Some(def) if name != JSON_STYLE => Some(Format::Table(def.clone())),
            _ => builtin(name),
        };

        format
            .map(|format| StyleSpec {
                name: name.to_string(),
                format,
            })
            .ok_or_else(|| GresError::UnknownStyle {
                name: name.to_string(),
                valid: style_names(custom),
            })
    }
}
