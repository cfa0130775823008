//! Terminal entry point: plays one battle on autopilot against the bundled
//! content and prints the outcome.
mod autopilot;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use autopilot::{Autopilot, weakest_enemy};
use config::CliConfig;
use raid_content::ContentFactory;
use raid_core::{BattleSession, PlayerAction, TurnResult};
use raid_runtime::{
    BattleService, Clock, InMemoryLedger, ManualClock, RuntimeConfig, StaticDefinitions,
    SystemClock,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    setup_logging();

    let config = CliConfig::from_env()?;
    let bundle = ContentFactory::new(&config.data_dir)
        .load_bundle()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    info!(
        data_dir = %config.data_dir.display(),
        characters = bundle.characters.len(),
        missions = bundle.missions.len(),
        "content loaded"
    );

    let runtime_config = RuntimeConfig::with_combat(bundle.config.clone()).from_env();
    // Think time is simulated, so the clock only moves when the pilot "waits".
    let clock = Arc::new(ManualClock::new(SystemClock.now_ms()));
    let ledger = Arc::new(InMemoryLedger::new());
    let mut pilot = Autopilot::new(bundle.abilities.clone(), config.think_ms, config.seed);

    let service = BattleService::builder()
        .config(runtime_config)
        .definitions(Arc::new(StaticDefinitions::new(bundle)))
        .ledger(ledger.clone())
        .clock(clock.clone())
        .build()?;

    let session = play(&service, &config, &mut pilot, &clock)?;
    print_summary(&session, &ledger);

    let flags = service.validate_replay(session.id)?;
    if flags.is_empty() {
        println!("replay review: clean");
    }
    for flag in &flags {
        println!(
            "replay review: {} flag ({}) on {} with {} signal(s)",
            flag.kind,
            flag.severity,
            flag.subject,
            flag.evidence.len()
        );
    }
    Ok(())
}

fn play(
    service: &BattleService,
    config: &CliConfig,
    pilot: &mut Autopilot,
    clock: &ManualClock,
) -> Result<BattleSession> {
    let mut session =
        service.start_session(config.user, config.mode, config.team, config.opposition())?;
    println!(
        "{} started: {} vs {}",
        session.id,
        config.team,
        config.opposition()
    );
    for result in &session.log {
        print_turn(&session, result);
    }

    let mut submitted = 0;
    while !session.is_terminal() {
        if submitted == config.max_turns {
            warn!(turns = submitted, "turn limit reached, abandoning");
            return Ok(service.abandon_session(session.id, config.user)?);
        }

        let actor = session.current()?.actor;
        let Some(action) = pilot.choose(&session, actor) else {
            break;
        };
        clock.advance(pilot.think());

        let logged = session.log.len();
        let (next, _) = match service.submit_turn(session.id, config.user, actor, action) {
            Ok(done) => done,
            Err(err) if err.is_rejection() => {
                // Rules said no; a plain strike is always legal.
                warn!(error = %err, "action rejected, falling back to a basic attack");
                let target = weakest_enemy(&session).context("no enemy left to strike")?;
                service.submit_turn(
                    session.id,
                    config.user,
                    actor,
                    PlayerAction::BasicAttack { target },
                )?
            }
            Err(err) => return Err(err.into()),
        };
        session = next;
        submitted += 1;

        for result in &session.log[logged..] {
            print_turn(&session, result);
        }
    }
    Ok(session)
}

fn print_turn(session: &BattleSession, result: &TurnResult) {
    let name = |id| {
        session
            .combatant(id)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    };
    let target = result.target.map(name).unwrap_or("-");
    println!(
        "  r{:<3} {:<12} {:<10} -> {:<12} {:?}{}",
        result.round,
        name(result.actor),
        result.ability,
        target,
        result.outcome,
        if result.fainted.is_empty() {
            String::new()
        } else {
            format!(
                "  fainted: {}",
                result
                    .fainted
                    .iter()
                    .map(|id| name(*id))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
    );
}

fn print_summary(session: &BattleSession, ledger: &InMemoryLedger) {
    println!(
        "{} {} after {} turns over {} rounds (dealt {}, taken {})",
        session.id,
        session.status,
        session.turn,
        session.round(),
        session.damage_dealt,
        session.damage_taken
    );
    match session.reward {
        Some(reward) => println!(
            "reward: grade {} x{:.2} -> {} tokens, {} xp ({} postings)",
            reward.grade,
            reward.multiplier,
            reward.tokens,
            reward.xp,
            ledger.entries(session.id).len()
        ),
        None => println!("reward: none"),
    }
}

/// Setup logging to stderr, INFO unless `RUST_LOG` says otherwise.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
