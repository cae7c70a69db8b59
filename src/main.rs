use std::env;
use std::path::PathBuf;

use anyhow::{Context, bail};
use dotenv::dotenv;
use tracing::info;

use gridboss::game::{CombatEngine, GameConfig};
use gridboss::infra::init_logging;
use gridboss::planners::PolicyAgent;
use gridboss::planners::heuristic::{RandomPlayer, ScriptedAgent};
use gridboss::planners::rl::{TabularAgent, TabularConfig, TrainConfig, Trainer};

fn get_env_var_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|val| val.parse::<usize>().ok())
}

fn get_env_var_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|val| val.parse::<u64>().ok())
}

#[cfg(feature = "rl")]
fn approximate_agent() -> Box<dyn PolicyAgent> {
    use gridboss::TrainingBackend;
    use gridboss::planners::rl::{ApproximateAgent, ApproximateConfig};

    Box::new(ApproximateAgent::<TrainingBackend>::new(
        Default::default(),
        ApproximateConfig::default(),
    ))
}

#[cfg(not(feature = "rl"))]
fn approximate_agent() -> Box<dyn PolicyAgent> {
    tracing::warn!("Built without the rl feature, using the tabular agent instead");
    Box::new(TabularAgent::new(TabularConfig::default()))
}

fn build_agent(kind: &str) -> anyhow::Result<Box<dyn PolicyAgent>> {
    let agent: Box<dyn PolicyAgent> = match kind {
        "dqn" => approximate_agent(),
        "tabular" => Box::new(TabularAgent::new(TabularConfig::default())),
        "scripted" => Box::new(ScriptedAgent::default()),
        other => bail!("unknown BOSS_AGENT '{other}', expected tabular, dqn or scripted"),
    };
    Ok(agent)
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let agent_kind = env::var("BOSS_AGENT").unwrap_or_else(|_| "dqn".to_string());
    let defaults = TrainConfig::default();
    let config = TrainConfig {
        episodes: get_env_var_usize("BOSS_EPISODES").unwrap_or(defaults.episodes),
        save_every: get_env_var_usize("BOSS_SAVE_EVERY").unwrap_or(defaults.save_every),
        model_path: env::var("BOSS_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path.clone()),
        ..defaults
    };
    let seed = get_env_var_u64("BOSS_SEED");

    let mut agent = build_agent(&agent_kind)?;
    agent
        .load(&config.model_path)
        .with_context(|| format!("loading {}", config.model_path.display()))?;

    info!(
        "Agent: {}, episodes: {}, model: {}",
        agent.name(),
        config.episodes,
        config.model_path.display()
    );

    let (engine, player) = match seed {
        Some(seed) => (
            CombatEngine::with_seed(GameConfig::default(), agent, seed),
            RandomPlayer::with_seed(seed.wrapping_add(1)),
        ),
        None => (
            CombatEngine::new(GameConfig::default(), agent),
            RandomPlayer::new(),
        ),
    };

    let mut trainer = Trainer::new(engine, player, config);
    trainer.train().context("training failed")?;

    let metrics = trainer.metrics();
    info!(
        "Finished {} episodes in {:.1}s, boss won {}",
        metrics.episodes,
        metrics.training_duration_secs(),
        metrics.total_boss_wins
    );
    Ok(())
}
