#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Station Defender match.

mod headless;
mod placement;

use std::{collections::VecDeque, fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use station_defender_core::{Command, Point, UnitId, UnitView};
use station_defender_rendering::{
    play_effects, Color, FrameInput, Presentation, RenderingBackend, Scene,
};
use station_defender_system_builder::{Builder, BuilderInput};
use station_defender_system_session::Session;
use station_defender_world::{apply, query, GameConfig, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    headless::{HeadlessBackend, LoggedAudio},
    placement::{PlacementOrder, QUICK_SLOTS},
};

const CLEAR_COLOR: Color = Color::from_rgb_u8(12, 14, 28);

/// Runs a Station Defender match without a window and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "station-defender", version)]
struct Args {
    /// TOML file overriding the default game configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Frames simulated before the match is abandoned.
    #[arg(long, default_value_t = 20_000)]
    max_frames: usize,
    /// Places an item before the match starts, written `item@lane:tile` with 1-based indices.
    ///
    /// Without any placements the whole inventory is spread across the lanes.
    #[arg(long = "place", value_name = "ORDER")]
    placements: Vec<PlacementOrder>,
    /// Buys a weapon upgrade whenever the player can afford one.
    #[arg(long)]
    auto_upgrade: bool,
}

/// Entry point for the Station Defender command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let mut world = World::with_config(config).context("invalid game configuration")?;
    println!("{}", query::welcome_banner(&world));

    let orders = if args.placements.is_empty() {
        placement::default_orders(&world)
    } else {
        args.placements
    };
    let script = orders
        .iter()
        .map(|order| order.frame_input(&world))
        .collect::<Result<VecDeque<_>>>()?;

    let mut builder = Builder::new(QUICK_SLOTS.to_vec());
    let mut session = Session::new();
    let mut audio = LoggedAudio;
    let mut events = Vec::new();
    let mut commands = Vec::new();
    let auto_upgrade = args.auto_upgrade;

    let backend = HeadlessBackend::new(
        Duration::from_millis(args.frame_ms),
        args.max_frames,
        script,
    );
    let presentation = Presentation::new(
        "Station Defender",
        CLEAR_COLOR,
        Scene::capture(&world, None),
    );

    let result = backend.run(presentation, |dt, input, scene| {
        events.clear();
        apply(&mut world, Command::Tick { dt }, &mut events);

        let cursor = input.pointer.map(|pointer| pointer.world_point());
        let view = query::unit_view(&world);
        builder.handle(
            &events,
            builder_input(&world, input, auto_upgrade),
            |point| upgradeable_weapon_at(&view, point),
            &mut commands,
        );
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }

        if let Some(outcome) = session.handle(&events) {
            info!(?outcome, tick = query::tick_index(&world), "match decided");
        }

        let explosions = play_effects(&events, &mut audio);
        *scene = Scene::capture(&world, cursor);
        scene.sprites.extend(explosions);

        query::outcome(&world).is_none()
    });

    let stats = session.stats();
    let player = query::player(&world);
    println!(
        "outcome: {}",
        session
            .outcome()
            .map_or_else(|| "undecided".to_owned(), |outcome| format!("{outcome:?}"))
    );
    println!(
        "elapsed {:.1}s, aliens spawned {}, destroyed {}, units placed {}, lost {}",
        stats.elapsed.as_secs_f64(),
        stats.aliens_spawned,
        stats.aliens_destroyed,
        stats.units_placed,
        stats.units_lost,
    );
    println!(
        "lanes cleared {}, overrun {}, money {}, score {}",
        stats.lanes_cleared,
        stats.lanes_overrun,
        player.money(),
        player.score(),
    );

    result
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    GameConfig::from_toml_str(&contents)
        .with_context(|| format!("failed to parse configuration in {}", path.display()))
}

fn upgradeable_weapon_at(view: &UnitView, point: Point) -> Option<UnitId> {
    view.unit_at(point)
        .filter(|unit| unit.built && unit.cost_to_upgrade.is_some())
        .map(|unit| unit.id)
}

fn builder_input(world: &World, input: FrameInput, auto_upgrade: bool) -> BuilderInput {
    if let Some(pointer) = input.pointer {
        return BuilderInput::new(
            pointer.pressed,
            input.upgrade_action,
            Some(pointer.world_point()),
            input.select_slot,
        );
    }
    if !auto_upgrade {
        return BuilderInput::default();
    }

    let money = query::player(world).money();
    let target = query::unit_view(world)
        .iter()
        .find(|unit| unit.built && unit.cost_to_upgrade.map_or(false, |cost| cost <= money))
        .map(|unit| unit.bounds.center());
    if target.is_none() {
        return BuilderInput::default();
    }
    BuilderInput::new(false, true, target, None)
}
