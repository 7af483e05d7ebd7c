//! Output formatting utilities for CLI.

use enclave::{EvaluationReport, OwnershipGrid, PlayerId, Profile, Standing};
use serde::Serialize;

use super::CliError;

/// Serialize any result as pretty JSON.
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format standings as an aligned table.
pub(super) fn format_standings_text(standings: &[Standing]) -> String {
    if standings.is_empty() {
        return "No players yet.\n".to_string();
    }

    let width = standings.iter().map(|s| s.name.len()).max().unwrap_or(0).max(6);
    let mut output = format!("  {:<width$}  Tiles\n", "Player");
    for standing in standings {
        output.push_str(&format!("  {:<width$}  {:>5}\n", standing.name, standing.tiles));
    }
    output
}

/// Format a player profile.
pub(super) fn format_profile_text(profile: &Profile) -> String {
    format!(
        "Player {} ({})\n  Role:   {}\n  Points: {}\n  Tiles:  {}\n",
        profile.player.id, profile.player.name, profile.player.role, profile.player.points, profile.tiles
    )
}

/// Format an evaluation report.
pub(super) fn format_report_text(report: &EvaluationReport) -> String {
    let mut output = format!(
        "Evaluation resolved {} tiles, {} captures ({} cells)\n",
        report.processed,
        report.captures.len(),
        report.captured_cells()
    );
    for capture in &report.captures {
        output.push_str(&format!(
            "  Player {} took {} cells from player {}",
            capture.captor,
            capture.cells.len(),
            capture.previous_owner
        ));
        if let Some(first) = capture.cells.first() {
            output.push_str(&format!(" at {first}"));
        }
        output.push('\n');
    }
    output
}

/// One character per player id: 1-9, then a-z, then `#`.
fn owner_glyph(owner: Option<PlayerId>) -> char {
    match owner {
        None => '.',
        Some(id) => char::from_digit(id, 36)
            .filter(|_| id > 0)
            .unwrap_or('#'),
    }
}

/// Render the grid as ASCII art, one row per line, lowest `y` first.
pub(super) fn render_grid_ascii(grid: &OwnershipGrid) -> String {
    let range = grid.range();
    let label_width = range.min_y.to_string().len().max((range.max_y - 1).to_string().len());

    let mut output = format!("Grid {range}\n");
    for (y, row) in (range.min_y..).zip(grid.rows()) {
        output.push_str(&format!("{y:>label_width$} "));
        output.extend(row.iter().map(|&cell| owner_glyph(cell)));
        output.push('\n');
    }
    output
}
