//! Broadside Battle Simulator
//!
//! Plays a seeded demo battle, records its transcript and verifies it by
//! re-simulation. Set `RUST_LOG=broadside=debug` for per-turn summaries.

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use broadside::{
    replay_turns, verify_transcript, Action, BattleTranscript, Coord, DeterministicRng, GameEvent,
    GameEventData, RumBarrel, Ship, ShipOrder, Side, TracingObserver, TurnObserver, TurnOrders,
    TurnPhase, World, VERSION,
};

/// Seed for the order picker.
const DEMO_SEED: u64 = 12345;

/// Turn limit for the demo battle.
const MAX_TURNS: u32 = 200;

/// Chance (percent) that a ship fires instead of manoeuvring.
const FIRE_CHANCE: u32 = 30;

/// Actions a ship picks from when not firing.
const MANOEUVRES: [Action; 6] = [
    Action::Wait,
    Action::Faster,
    Action::Slower,
    Action::Port,
    Action::Starboard,
    Action::Mine,
];

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Broadside Engine v{}", VERSION);
    demo_battle()
}

/// Observer for the demo: tracing hooks plus a few headline events.
#[derive(Default)]
struct BattleLog {
    tracer: TracingObserver,
    shots: usize,
    sunk: usize,
}

impl TurnObserver for BattleLog {
    fn turn_started(&mut self, turn: u32, world: &World) {
        self.tracer.turn_started(turn, world);
    }

    fn phase_started(&mut self, turn: u32, phase: TurnPhase) {
        self.tracer.phase_started(turn, phase);
    }

    fn event(&mut self, event: &GameEvent) {
        self.tracer.event(event);
        match &event.data {
            GameEventData::CannonFired { .. } => self.shots += 1,
            GameEventData::ShipSunk { ship_id, side, position, reward } => {
                self.sunk += 1;
                info!(
                    "Turn {}: {} ship {} sunk at {} (reward {:?})",
                    event.turn, side, ship_id, position, reward
                );
            }
            GameEventData::GameOver { winner } => {
                info!("Turn {}: battle over, winner {:?}", event.turn, winner);
            }
            _ => {}
        }
    }

    fn turn_finished(&mut self, world: &World, events: &[GameEvent]) {
        self.tracer.turn_finished(world, events);
    }
}

/// Two fleets of three facing each other across the map.
fn demo_world() -> World {
    let allies = vec![
        Ship::new(0, Coord::new(3, 4), 0, Side::Ally),
        Ship::new(2, Coord::new(3, 10), 0, Side::Ally),
        Ship::new(4, Coord::new(3, 16), 0, Side::Ally),
    ];
    let enemies = vec![
        Ship::new(1, Coord::new(19, 4), 3, Side::Enemy),
        Ship::new(3, Coord::new(19, 10), 3, Side::Enemy),
        Ship::new(5, Coord::new(19, 16), 3, Side::Enemy),
    ];
    let barrels = vec![
        RumBarrel::new(Coord::new(11, 7), 15),
        RumBarrel::new(Coord::new(11, 13), 15),
        RumBarrel::new(Coord::new(11, 10), 20),
    ];

    World::new(allies.len(), barrels, vec![], vec![], allies, enemies)
}

/// Pick one order per ship: fire near the closest enemy or manoeuvre.
fn pick_orders(rng: &mut DeterministicRng, fleet: &[Ship], foes: &[Ship]) -> Vec<ShipOrder> {
    fleet
        .iter()
        .map(|ship| {
            let closest = foes.iter().min_by_key(|foe| ship.pos.distance_to(foe.pos));
            match closest {
                Some(foe) if rng.chance(FIRE_CHANCE) => {
                    ShipOrder::fire(rng.random_coord_near(foe.pos, 1))
                }
                _ => ShipOrder::new(rng.choose(&MANOEUVRES).copied().unwrap_or_default()),
            }
        })
        .collect()
}

/// Run the demo battle and verify its transcript.
fn demo_battle() -> Result<()> {
    info!("=== Starting Demo Battle ===");

    let initial = demo_world();
    let mut world = initial.copy();
    let mut rng = DeterministicRng::new(DEMO_SEED);
    let mut transcript = BattleTranscript::new(&world);
    let mut log = BattleLog::default();

    info!("RNG Seed: {}", DEMO_SEED);
    info!("Initial State Hash: {}", hex::encode(world.state_hash()));

    while world.turn() < MAX_TURNS {
        world.prepare();
        let orders = TurnOrders::new(
            pick_orders(&mut rng, world.my_ships(), world.enemy_ships()),
            pick_orders(&mut rng, world.enemy_ships(), world.my_ships()),
        );
        world
            .set_actions(Side::Ally, &orders.ally)
            .context("staging ally orders")?;
        world
            .set_actions(Side::Enemy, &orders.enemy)
            .context("staging enemy orders")?;

        let result = world.update_observed(&mut log);
        transcript.record_turn(orders, &world);

        match result {
            Ok(_) => {}
            Err(e) if e.is_game_over() => break,
            Err(e) => return Err(e).context(format!("resolving turn {}", world.turn())),
        }

        if world.turn() % 25 == 0 {
            info!(
                "Turn {}: {} allies, {} enemies, {} mines, {} barrels",
                world.turn(),
                world.my_ships().len(),
                world.enemy_ships().len(),
                world.mines().len(),
                world.barrels().len()
            );
        }
    }

    transcript.finish(&world);

    // Print final results
    info!("=== Battle Results ===");
    info!("Turns played: {}", world.turn());
    info!("Winner: {:?}", world.winner());
    info!("Shots fired: {}, ships sunk: {}", log.shots, log.sunk);
    for ship in world.ships() {
        info!(
            "{} ship {} at {} heading {} speed {} health {}",
            ship.owner, ship.id, ship.pos, ship.orientation, ship.speed, ship.health
        );
    }
    let hash = world.state_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let bytes = transcript.to_bytes().context("encoding transcript")?;
    info!("Transcript: {} turns, {} bytes", transcript.turn_count(), bytes.len());

    let decoded = BattleTranscript::from_bytes(&bytes).context("decoding transcript")?;
    let verification = verify_transcript(&decoded);
    if let Some(error) = verification.error {
        bail!("transcript verification failed: {}", error);
    }
    info!("Transcript verified: {} checkpoints", verification.turns_checked);

    let orders: Vec<TurnOrders> = decoded.turns.into_iter().map(|t| t.orders).collect();
    let replay = replay_turns(initial, &orders).context("replaying orders")?;
    let replay_hash = replay.world.state_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        bail!("DETERMINISM FAILURE: Hashes differ!")
    }
}
