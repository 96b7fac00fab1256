// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Rendering of filtered GRES entries.
//!
//! Whether to colour is decided once by the caller ([`crate::config::ColorMode`])
//! and passed in, so rendering never looks at the terminal.

mod json;
pub mod style;
mod table;

pub use style::{Format, StyleDef, StyleSpec, DEFAULT_STYLE};

use crate::slurm::GresEntry;

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
    header: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        if color {
            // Emit ANSI even when NO_COLOR is set; the caller already decided
            crossterm::style::force_color_output(true);
        }
        Self { color, header: true }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn render(&self, entries: &[GresEntry], style: &StyleSpec) -> String {
        match &style.format {
            Format::Table(def) => table::format(entries, def, self.color, self.header),
            Format::Json => json::format(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::filter::{self, FilterSpec};
    use crate::slurm::NodeState;

    fn entry(name: &str, node: &str, partition: &str, used: u64, state: NodeState) -> GresEntry {
        GresEntry {
            name: name.to_string(),
            node: node.to_string(),
            partitions: vec![partition.to_string()],
            count: 4,
            used,
            state: vec![state],
            cpus: 64,
            cpus_idle: 32,
            memory_mb: 256 * 1024,
            memory_alloc_mb: 64 * 1024,
        }
    }

    fn sample() -> Vec<GresEntry> {
        vec![
            entry("gpu:a100", "gpu001", "gpu", 2, NodeState::Mixed),
            entry("gpu:a6000", "gpu002", "gpu", 0, NodeState::Idle),
            entry("cpu:generic", "cpu001", "batch", 4, NodeState::Allocated),
        ]
    }

    fn style(name: &str) -> StyleSpec {
        StyleSpec::resolve(name, &BTreeMap::new()).unwrap()
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = Renderer::new(true);
        for name in ["default", "modern", "compact", "json"] {
            let first = renderer.render(&sample(), &style(name));
            let second = renderer.render(&sample(), &style(name));
            assert_eq!(first, second, "style {}", name);
        }
    }

    #[test]
    fn test_never_color_has_no_escapes() {
        let renderer = Renderer::new(false);
        for name in ["default", "modern", "compact"] {
            assert!(!renderer.render(&sample(), &style(name)).contains('\x1b'));
        }
    }

    #[test]
    fn test_always_color_has_escapes() {
        let output = Renderer::new(true).render(&sample(), &style("default"));
        assert!(output.contains('\x1b'));
    }

    #[test]
    fn test_default_style_layout() {
        let output = Renderer::new(false).render(&sample()[..1], &style("default"));
        assert!(output.contains("| NODE "));
        assert!(output.contains("uuii"));
        assert!(output.contains("32/64"));
        assert!(output.contains("192/256G"));
        assert!(output.contains("MIXED"));
    }

    #[test]
    fn test_modern_style_layout() {
        let output = Renderer::new(false).render(&sample()[..2], &style("modern"));
        assert!(output.starts_with('╭'));
        assert!(output.contains("■■□□"));
        assert!(output.contains("□□□□"));
        assert!(output.ends_with("2 entries, 6/8 units free"));
    }

    #[test]
    fn test_no_match_renders_header_only() {
        let matched = filter::apply(sample(), &FilterSpec::new("xyz", None));
        assert!(matched.is_empty());

        let output = Renderer::new(false).render(&matched, &style("compact"));
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("NODE"));

        let output = Renderer::new(false).render(&matched, &style("modern"));
        assert!(output.contains("NODE"));
        assert!(output.ends_with("0 entries, 0/0 units free"));

        assert_eq!(Renderer::new(false).render(&matched, &style("json")), "[]");
    }

    #[test]
    fn test_count_type_gres_keeps_bar_bounded() {
        let json = r#"{"nodes": [{"hostname": "io001", "state": ["IDLE"], "partitions": ["io"],
            "gres": "bandwidth:lustre:no_consume:4G", "gres_used": "bandwidth:lustre:1G"}]}"#;
        let entries = crate::slurm::parser::parse_nodes_json(json).unwrap();

        let output = Renderer::new(false).render(&entries, &style("default"));
        assert!(output.len() < 1024);
        assert!(output.contains("bandwidth:lustre "));
        assert!(output.contains(&format!("{}{}", "u".repeat(8), "i".repeat(24))));
    }

    #[test]
    fn test_without_header() {
        let output = Renderer::new(false)
            .with_header(false)
            .render(&sample(), &style("compact"));
        assert!(!output.contains("NODE"));
        assert_eq!(output.lines().count(), 3);
    }
}
