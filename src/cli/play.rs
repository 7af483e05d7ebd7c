//! Player-facing commands: setup, registration, placement, profile.

use super::output::{format_profile_text, to_json};
use super::{CliError, Context, OutputFormat};
use enclave::{Coord, Engine, Role};

/// Create an empty state file.
pub(crate) fn init(ctx: &Context, force: bool) -> Result<(), CliError> {
    if ctx.state.exists() && !force {
        return Err(CliError::new(format!(
            "{} already exists (use --force to overwrite)",
            ctx.state.display()
        )));
    }
    let engine = Engine::new(ctx.engine_config()?);
    ctx.save(&engine)?;
    println!("Initialized {}", ctx.state.display());
    Ok(())
}

/// Register a player.
pub(crate) fn register(ctx: &Context, name: &str, admin: bool) -> Result<(), CliError> {
    let engine = ctx.open()?;
    let player = if admin {
        engine.register_player_with_role(name, Role::Admin)?
    } else {
        engine.register_player(name)?
    };
    ctx.save(&engine)?;
    println!(
        "Registered {} as player {} ({}, {} points)",
        player.name, player.id, player.role, player.points
    );
    Ok(())
}

/// Show a player's profile.
pub(crate) fn profile(ctx: &Context, player: u32, format: OutputFormat) -> Result<(), CliError> {
    let engine = ctx.open()?;
    let profile = engine.profile(player)?;
    match format {
        OutputFormat::Text => print!("{}", format_profile_text(&profile)),
        OutputFormat::Json => println!("{}", to_json(&profile)?),
    }
    Ok(())
}

/// Claim a cell. Coordinates arrive as raw text and are validated here.
pub(crate) fn place(ctx: &Context, player: u32, x: &str, y: &str) -> Result<(), CliError> {
    let coord = Coord::parse(x, y)?;
    let engine = ctx.open()?;
    let tile = engine.place_tile(player, coord)?;
    ctx.save(&engine)?;
    let remaining = engine.player(player)?.points;
    println!("Claimed {} ({remaining} points left)", tile.coord);
    Ok(())
}
