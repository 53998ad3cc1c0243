//! Block Shuffle Demo Host
//!
//! Runs a game against simulated players.
//!
//! ```text
//! block-shuffle [settings.json] [catalog.json]
//! ```
//!
//! Set `BLOCK_SHUFFLE_REALTIME=1` to run on the wall clock instead of
//! virtual time.

use anyhow::Context;
use tokio::sync::{broadcast, mpsc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use block_shuffle::{
    core::rng::{derive_game_seed, DeterministicRng},
    game::{collaborators::TeamRegistry, GameState, PlayerId},
    host::{
        run_realtime, CategoryCatalog, GameHost, HostCommand, InMemoryTeamRegistry, TracingSink,
    },
    GameConfig, TICKS_PER_SECOND, VERSION,
};

type DemoHost = GameHost<InMemoryTeamRegistry, CategoryCatalog, TracingSink>;

const DEFAULT_CATALOG: &str = r#"[
    { "name": "wood", "weight": 3, "entries": [["oak_log"], ["birch_planks"], ["spruce_log", "stripped_spruce_log"]] },
    { "name": "stone", "weight": 2, "entries": [["cobblestone"], ["andesite"], ["smooth_stone"]] },
    { "name": "nature", "weight": 2, "entries": [["grass_block"], ["sand"], ["blue_ice", "packed_ice"]] },
    { "name": "rare", "weight": 1, "entries": [["diamond_block"], ["emerald_ore"]] }
]"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Block Shuffle v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::from_file(&path)
            .with_context(|| format!("loading settings from {}", path))?,
        None => GameConfig {
            rounds_per_game: 3,
            round_time: 90,
            round_break_time: 5,
            eliminate_after_round: true,
            ..Default::default()
        },
    };

    let session_id = *uuid::Uuid::new_v4().as_bytes();
    let seed = derive_game_seed(&session_id, "catalog");
    info!("Catalog seed: {}", hex::encode(seed.to_le_bytes()));

    let catalog = match args.next() {
        Some(path) => CategoryCatalog::from_file(&path, seed)
            .with_context(|| format!("loading catalog from {}", path))?,
        None => CategoryCatalog::from_json_str(DEFAULT_CATALOG, seed)?,
    };

    let mut registry = InMemoryTeamRegistry::new();
    registry.add_team("Red", &["alice", "bob"]);
    registry.add_team("Blue", &["carol", "dave"]);
    registry.add_team("Green", &["erin"]);
    // No team: gets folded into a team of their own at start
    registry.set_online(&PlayerId::new("frank"), true);

    let host = GameHost::new(config, registry, catalog, TracingSink)?;
    let bots = DeterministicRng::new(derive_game_seed(&session_id, "bots"));

    let host = if std::env::var("BLOCK_SHUFFLE_REALTIME").is_ok_and(|v| v == "1") {
        run_wall_clock(host, bots).await?
    } else {
        run_virtual(host, bots)
    };

    if let Some(summary) = host.engine().last_summary() {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    Ok(())
}

/// Players still hunting, with a 1-in-`odds` chance per second of finding.
fn lucky_players(host: &DemoHost, rng: &mut DeterministicRng, odds: u32) -> Vec<PlayerId> {
    let engine = host.engine();
    engine
        .registry()
        .players_with_team()
        .into_iter()
        .filter(|player| engine.targets_of(player).is_some())
        .filter(|_| rng.next_int(odds) == 0)
        .collect()
}

/// Run the whole game in virtual time.
fn run_virtual(mut host: DemoHost, mut bots: DeterministicRng) -> DemoHost {
    host.set_game_state(GameState::Active);

    let mut ticks = 0u64;
    while host.engine().state() == GameState::Active {
        host.tick();
        ticks += 1;
        if ticks % TICKS_PER_SECOND as u64 == 0 {
            for player in lucky_players(&host, &mut bots, 40) {
                host.target_found(&player);
            }
        }
    }

    info!("Simulated {} ticks ({} seconds)", ticks, ticks / TICKS_PER_SECOND as u64);
    host
}

/// Run on the wall clock through the realtime driver.
async fn run_wall_clock(host: DemoHost, mut bots: DeterministicRng) -> anyhow::Result<DemoHost> {
    let (command_tx, command_rx) = mpsc::channel(64);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // Finds are sent blind; the engine drops the ones for players who owe nothing
    let players = host.engine().registry().online_players();
    let total_seconds = {
        let config = host.engine().config();
        config.rounds_per_game * (config.round_time + config.round_break_time)
    };

    let driver = tokio::spawn(run_realtime(host, command_rx, shutdown_rx));

    command_tx.send(HostCommand::Start).await?;
    for _ in 0..total_seconds {
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        for player in &players {
            if bots.next_int(40) == 0 {
                command_tx.send(HostCommand::TargetFound(player.clone())).await?;
            }
        }
    }

    // Game has run its course; stop it if still going and shut down
    command_tx.send(HostCommand::Stop).await?;
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    shutdown_tx.send(())?;

    Ok(driver.await?)
}
