//! Read-only commands.

use super::output::{format_standings_text, render_grid_ascii, to_json};
use super::{CliError, Context, OutputFormat};
use enclave::{GameError, Range};

/// Print the standings.
pub(crate) fn standings(ctx: &Context, format: OutputFormat) -> Result<(), CliError> {
    let engine = ctx.open()?;
    let standings = engine.standings();
    match format {
        OutputFormat::Text => print!("{}", format_standings_text(&standings)),
        OutputFormat::Json => println!("{}", to_json(&standings)?),
    }
    Ok(())
}

/// Print the ownership grid of the current range, or of a window inside it.
pub(crate) fn grid(ctx: &Context, window: Option<&[i32]>, format: OutputFormat) -> Result<(), CliError> {
    let engine = ctx.open()?;
    let grid = match window {
        Some(&[min_x, max_x, min_y, max_y]) => {
            engine.grid_snapshot_in(Range::new(min_x, max_x, min_y, max_y)?)?
        }
        Some(_) => return Err(CliError::new("--window takes four bounds")),
        None => engine.grid_snapshot().ok_or(GameError::NoRangeConfigured)?,
    };
    match format {
        OutputFormat::Text => print!("{}", render_grid_ascii(&grid)),
        OutputFormat::Json => println!("{}", to_json(&grid)?),
    }
    Ok(())
}
