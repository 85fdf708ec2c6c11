//! Text rendering of the arena.

use std::fmt::Write;
use std::sync::Arc;

use crate::simulation::agent::{Agent, AgentSnapshot};
use crate::simulation::params::Params;

/// Renders a coarse grid of the map, one character per `display_cell` square.
///
/// Each cell shows the glyph of the first living agent in roster order that
/// falls inside it, or `.` when the cell is empty.
pub fn render_map(agents: &[Arc<Agent>], params: &Params) -> String {
    let cell = params.display_cell.max(1);
    let cols = (params.map_width + cell - 1) / cell;
    let rows = (params.map_height + cell - 1) / cell;

    let mut grid = vec![vec!['.'; cols as usize]; rows as usize];
    for agent in agents.iter().filter(|a| a.is_alive()) {
        let pos = agent.position();
        let (col, row) = ((pos.x / cell) as usize, (pos.y / cell) as usize);
        if let Some(slot) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            if *slot == '.' {
                *slot = agent.kind().glyph();
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "=== MAP ({}x{}) ===", params.map_width, params.map_height);
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out.push_str("=========================\n");
    out
}

/// One line per agent, e.g. `[Bear] Bear3 @ (12, 40)`.
pub fn render_survivors(survivors: &[AgentSnapshot]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Survivors: {}", survivors.len());
    for s in survivors {
        let _ = writeln!(
            out,
            "[{}] {} @ ({}, {})",
            s.kind, s.name, s.position.x, s.position.y
        );
    }
    out
}
