//! Headless Bastion runner.
//!
//! Usage: `bastion [CONFIG] [TICKS]`
//!
//! Loads the configuration (default `bastion.toml`), builds the world and
//! plays a scripted fight at the configured tick rate until the round is
//! decided or `TICKS` ticks have run.

use std::collections::HashMap;

use anyhow::{Context, Result};
use bastion_common::{Rect, Vec2};
use bastion_engine::{
    render_frame, Color, FrameTiming, GameConfig, Renderer, RoundState, Theme, World, CONFIG_FILE,
};
use bastion_gameplay::{AimInput, EffectBus, EffectKind, InputSnapshot, InputSource, ScriptedInput};
use bastion_world::StreamingMode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Ticks run when no count is given (ten seconds at 60 Hz).
const DEFAULT_TICKS: u64 = 600;

/// Renderer that only counts what it is asked to draw.
#[derive(Debug, Default)]
struct CountingRenderer {
    rects: usize,
    circles: usize,
}

impl Renderer for CountingRenderer {
    fn clear(&mut self, _color: Color) {
        self.rects = 0;
        self.circles = 0;
    }

    fn draw_rect(&mut self, _rect: Rect, _color: Color) {
        self.rects += 1;
    }

    fn draw_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {
        self.circles += 1;
    }
}

/// Strafes around the spawn room while firing toward the boss spawn, for
/// at least `ticks` ticks.
fn demo_script(ticks: u64) -> ScriptedInput {
    let aim = AimInput::stick(Vec2::new(-1.0, -1.0));
    let mut script = ScriptedInput::default();
    while (script.remaining() as u64) < ticks {
        for direction in [Vec2::X, Vec2::Y, -Vec2::X, -Vec2::Y] {
            script.push_repeated(InputSnapshot::moving(direction).with_shot(aim), 45);
            script.push_repeated(InputSnapshot::moving(direction).with_sprint(), 15);
        }
    }
    script
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("bastion=info".parse()?))
        .init();

    info!("Bastion starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| CONFIG_FILE.to_string());
    let max_ticks = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid tick count '{arg}'"))?,
        None => DEFAULT_TICKS,
    };

    let config = GameConfig::load_from(&config_path);
    let tick_rate = config.window.fps;
    let bus = EffectBus::default();
    let mut world =
        World::new(config, bus.sink(), StreamingMode::Background).context("failed to build world")?;

    let theme = Theme::default();
    let mut renderer = CountingRenderer::default();
    let mut input = demo_script(max_ticks);
    let mut timing = FrameTiming::new(tick_rate);
    let mut effect_counts: HashMap<EffectKind, usize> = HashMap::new();
    let mut state = RoundState::Playing;

    while world.ticks() < max_ticks && !state.is_finished() {
        let dt = timing.delta_time();
        for _ in 0..timing.accumulate(dt) {
            state = world.tick(&input.sample());
            if state.is_finished() || world.ticks() >= max_ticks {
                break;
            }
        }

        render_frame(&world, &mut renderer, &theme);
        for effect in bus.drain() {
            *effect_counts.entry(effect.kind).or_default() += 1;
        }

        if world.ticks() % u64::from(tick_rate) == 0 {
            debug!(
                "t={}ms rects={} circles={} projectiles={} chunks={}",
                world.now_ms(),
                renderer.rects,
                renderer.circles,
                world.projectiles().len(),
                world.level().loaded_count()
            );
        }

        timing.sleep_remainder();
    }

    let player = world.player();
    info!(
        "Round {:?} after {} ticks ({} ms)",
        state,
        world.ticks(),
        world.now_ms()
    );
    info!(
        "Player health {:.0}, stamina {:.0}",
        player.health(),
        player.stamina()
    );
    match world.enemy() {
        Some(enemy) => info!("Boss phase {} with {:.0} health", enemy.phase(), enemy.health()),
        None => info!("Boss defeated"),
    }
    info!("Effects triggered: {effect_counts:?}");
    info!("Chunk streaming: {:?}", world.level().stats());

    info!("Bastion shutdown complete");
    Ok(())
}
