//! Headless voxel sandbox runner
//!
//! Usage: voxel-sandbox [CONFIG.toml] [--ticks N] [--save SLOT]
//!
//! Builds a game session from the config (defaults if none is given), walks
//! the player forward for N ticks at 60 Hz and optionally saves the result.

use anyhow::{bail, Context, Result};

use voxel_sandbox::config::EngineConfig;
use voxel_sandbox::game::GameSession;
use voxel_sandbox::player::PlayerInput;

const TICK_SECONDS: f32 = 1.0 / 60.0;

struct Args {
    config: Option<String>,
    ticks: u64,
    save: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        ticks: 600,
        save: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = iter.next().context("--ticks needs a value")?;
                args.ticks = value.parse().with_context(|| format!("invalid tick count '{}'", value))?;
            }
            "--save" => args.save = Some(iter.next().context("--save needs a slot name")?),
            other if other.starts_with("--") => bail!("unknown option {}", other),
            path => args.config = Some(path.to_string()),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut session = GameSession::new(config)?;
    session.set_input(PlayerInput::walking_forward());

    let mut hits = 0;
    for _ in 0..args.ticks {
        let report = session.tick(TICK_SECONDS);
        hits += report.combat.hits;
        if report.player.fell_into_void {
            log::warn!("Player fell out of the world, respawning");
            session.respawn();
        }
    }

    let player = session.player();
    log::info!(
        "Simulated {} ticks: position {:?}, health {}/{}, phase {:?}, {} chunks, {} hits",
        session.tick_count(),
        player.position,
        player.health(),
        player.max_health(),
        session.day_phase(),
        session.world().chunk_count(),
        hits
    );

    if let Some(slot) = &args.save {
        let ack = session.save(slot)?;
        log::info!("Saved '{}' ({} bytes)", ack.slot, ack.bytes_written);
    }

    Ok(())
}
