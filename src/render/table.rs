// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_FULL, ASCII_MARKDOWN, NOTHING, UTF8_FULL_CONDENSED};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use crossterm::style::Stylize;

use super::style::{Column, Preset, StyleDef};
use crate::slurm::{GresEntry, NodeState};

const MIB_PER_GIB: u64 = 1024;

/// Widest usage bar; larger counts are scaled down to this many glyphs
const MAX_BAR_GLYPHS: u64 = 32;

/// Render `entries` as a table. Colour codes are embedded in cell content, so
/// comfy-table never probes the terminal and the output only depends on the
/// arguments.
pub fn format(entries: &[GresEntry], style: &StyleDef, color: bool, header: bool) -> String {
    let mut table = Table::new();
    table.force_no_tty();
    table.set_content_arrangement(ContentArrangement::Disabled);

    match style.preset {
        Preset::Ascii => {
            table.load_preset(ASCII_FULL);
        }
        Preset::Utf8 => {
            table.load_preset(UTF8_FULL_CONDENSED);
        }
        Preset::Rounded => {
            table.load_preset(UTF8_FULL_CONDENSED).apply_modifier(UTF8_ROUND_CORNERS);
        }
        Preset::Markdown => {
            table.load_preset(ASCII_MARKDOWN);
        }
        Preset::None => {
            table.load_preset(NOTHING);
        }
    }

    if header && style.header {
        let cells: Vec<Cell> = style
            .columns
            .iter()
            .map(|col| {
                if color {
                    Cell::new(col.header().bold())
                } else {
                    Cell::new(col.header())
                }
            })
            .collect();
        table.set_header(cells);
    }

    for entry in entries {
        let cells: Vec<Cell> = style
            .columns
            .iter()
            .map(|col| Cell::new(cell_text(entry, *col, style, color)))
            .collect();
        table.add_row(cells);
    }

    for (idx, col) in style.columns.iter().enumerate() {
        if col.is_numeric() {
            if let Some(column) = table.column_mut(idx) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
    }

    let mut output = table.to_string();
    if style.preset == Preset::None {
        output = output.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    }

    if style.summary {
        output.push('\n');
        output.push_str(&summary(entries));
    }

    output
}

fn cell_text(entry: &GresEntry, column: Column, style: &StyleDef, color: bool) -> String {
    match column {
        Column::Node => entry.node.clone(),
        Column::Partition => entry.partitions.join(","),
        Column::Gres => entry.name.clone(),
        Column::Used => entry.used.to_string(),
        Column::Total => entry.count.to_string(),
        Column::Free => entry.free().to_string(),
        Column::Usage => usage_bar(entry, style.used_glyph, style.free_glyph, color),
        Column::Cpus => format_ratio(entry.cpus_idle as u64, entry.cpus as u64),
        Column::Memory => {
            format_ratio(entry.memory_free_mb() / MIB_PER_GIB, entry.memory_mb / MIB_PER_GIB) + "G"
        }
        Column::State => format_state(&entry.state, color),
    }
}

fn format_ratio(available: u64, total: u64) -> String {
    format!("{}/{}", available, total)
}

/// Number of (used, free) glyphs for a bar. One glyph per unit up to
/// [`MAX_BAR_GLYPHS`] units, proportional beyond that. Nonzero used or free
/// capacity always keeps at least one glyph.
fn bar_widths(used: u64, count: u64) -> (usize, usize) {
    let used = used.min(count);
    if count <= MAX_BAR_GLYPHS {
        return (used as usize, (count - used) as usize);
    }

    let scaled = (u128::from(used) * u128::from(MAX_BAR_GLYPHS)).div_ceil(u128::from(count)) as u64;
    let scaled = if used < count { scaled.min(MAX_BAR_GLYPHS - 1) } else { scaled };
    (scaled as usize, (MAX_BAR_GLYPHS - scaled) as usize)
}

/// Used glyphs first, then free ones
pub fn usage_bar(entry: &GresEntry, used_glyph: char, free_glyph: char, color: bool) -> String {
    let (used_width, free_width) = bar_widths(entry.used, entry.count);
    let used: String = std::iter::repeat(used_glyph).take(used_width).collect();
    let free: String = std::iter::repeat(free_glyph).take(free_width).collect();

    if !color {
        return used + &free;
    }

    let mut bar = String::new();
    if !used.is_empty() {
        bar.push_str(&used.as_str().red().to_string());
    }
    if !free.is_empty() {
        bar.push_str(&free.as_str().green().to_string());
    }
    bar
}

pub fn format_state(states: &[NodeState], color: bool) -> String {
    states
        .iter()
        .map(|state| {
            let text = state.as_str();
            if !color {
                return text.to_string();
            }
            match state {
                NodeState::Idle => text.green().to_string(),
                NodeState::Mixed => text.blue().to_string(),
                NodeState::Allocated => text.magenta().to_string(),
                NodeState::Down | NodeState::Fail => text.red().to_string(),
                s if s.is_unavailable() => text.yellow().to_string(),
                _ => text.to_string(),
            }
        })
        .collect::<Vec<String>>()
        .join(",")
}

fn summary(entries: &[GresEntry]) -> String {
    let total: u64 = entries.iter().map(|e| e.count).sum();
    let free: u64 = entries.iter().map(|e| e.free()).sum();
    format!("{} entries, {}/{} units free", entries.len(), free, total)
}
