//! Admin commands: range, evaluation, points and roles.

use super::output::{format_report_text, to_json};
use super::{CliError, Context, OutputFormat};
use enclave::grid::parse_number;
use enclave::{Range, Role};

/// Grow the playable range.
pub(crate) fn range(ctx: &Context, actor: u32, bounds: [i32; 4]) -> Result<(), CliError> {
    let [min_x, max_x, min_y, max_y] = bounds;
    let requested = Range::new(min_x, max_x, min_y, max_y)?;
    let engine = ctx.open()?;
    let record = engine.expand_range(actor, requested)?;
    ctx.save(&engine)?;
    println!("Range {} is now {}", record.id, record.range);
    Ok(())
}

/// Run an evaluation pass.
pub(crate) fn evaluate(ctx: &Context, actor: u32, format: OutputFormat) -> Result<(), CliError> {
    let engine = ctx.open()?;
    let report = engine.run_evaluation(actor)?;
    ctx.save(&engine)?;
    match format {
        OutputFormat::Text => print!("{}", format_report_text(&report)),
        OutputFormat::Json => println!("{}", to_json(&report)?),
    }
    Ok(())
}

/// Add points to a player. The amount arrives as raw text.
pub(crate) fn grant(ctx: &Context, actor: u32, target: u32, points: &str) -> Result<(), CliError> {
    let delta: i64 = parse_number("points", points)?;
    let engine = ctx.open()?;
    let player = engine.grant_points(actor, target, delta)?;
    ctx.save(&engine)?;
    println!("{} now has {} points", player.name, player.points);
    Ok(())
}

/// Change a player's role. The role arrives as raw text.
pub(crate) fn role(ctx: &Context, actor: u32, target: u32, role: &str) -> Result<(), CliError> {
    let role: Role = role.parse()?;
    let engine = ctx.open()?;
    let player = engine.set_role(actor, target, role)?;
    ctx.save(&engine)?;
    println!("{} is now {}", player.name, player.role);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::play;

    fn context(dir: &tempfile::TempDir) -> Context {
        Context {
            state: dir.path().join("state.json"),
            config: None,
        }
    }

    #[test]
    fn test_role_parsed_from_text() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        play::init(&ctx, false).unwrap();
        play::register(&ctx, "root", true).unwrap();
        play::register(&ctx, "ada", false).unwrap();

        role(&ctx, 1, 2, " Admin").unwrap();
        assert_eq!(ctx.open().unwrap().player(2).unwrap().role, Role::Admin);

        assert!(role(&ctx, 1, 2, "owner").is_err());
        assert_eq!(ctx.open().unwrap().player(2).unwrap().role, Role::Admin);
    }
}
