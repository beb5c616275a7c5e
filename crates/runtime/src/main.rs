#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fastrand::Rng;
use physics::Simulation;
use rl::{Env, ResetOptions, WristConfig, WristEnv, WristVecEnv};
use tracing_subscriber::EnvFilter;

/// Drives the wrist reaching environment with uniformly random muscle
/// excitations.
#[derive(Parser)]
#[command(name = "wristex", version, about)]
struct Cli {
    /// JSON configuration file. Defaults are used for missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model description, overriding the configuration.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Total number of steps across all episodes.
    #[arg(long, default_value_t = 3000)]
    steps: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    time_limit: Option<usize>,

    /// Run behind the NaN-sanitising wrapper.
    #[arg(long)]
    vectorized: bool,

    /// Print the final state description as JSON.
    #[arg(long)]
    dump_state: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut rng = config.seed.map_or_else(Rng::new, Rng::with_seed);

    let desc = if cli.vectorized {
        let mut env = WristVecEnv::wrist(&config).context("failed to build environment")?;
        println!("{}", env.inner().sim().list_elements());
        rollout(&mut env, cli.steps, &mut rng)?;
        env.inner().get_state_desc()?
    } else {
        let mut env = WristEnv::wrist(&config).context("failed to build environment")?;
        println!("{}", env.sim().list_elements());
        rollout(&mut env, cli.steps, &mut rng)?;
        env.get_state_desc()?
    };

    if cli.dump_state {
        println!("{}", serde_json::to_string_pretty(&desc)?);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<WristConfig> {
    let mut config = match &cli.config {
        Some(path) => WristConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => WristConfig::default(),
    };
    if let Some(model) = &cli.model {
        config.model_path.clone_from(model);
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(limit) = cli.time_limit {
        config.time_limit = limit;
    }
    Ok(config)
}

/// Steps `env` with random actions, resetting whenever an episode ends.
/// Returns the total reward of every completed episode.
fn rollout<E: Env>(env: &mut E, steps: usize, rng: &mut Rng) -> Result<Vec<f64>> {
    let action_space = env.action_space();
    let mut returns = Vec::new();
    let mut episode_return = 0.0;
    let mut episode_len = 0_usize;

    env.reset(ResetOptions::vector())?;
    for _ in 0..steps {
        let action = action_space.sample(rng);
        let step = env.step(&action, false)?;
        episode_return += step.reward;
        episode_len += 1;
        if step.done {
            tracing::info!(
                episode = returns.len(),
                steps = episode_len,
                episode_return,
                "episode finished"
            );
            returns.push(episode_return);
            episode_return = 0.0;
            episode_len = 0;
            env.reset(ResetOptions::vector())?;
        }
    }

    if returns.is_empty() {
        tracing::info!(episodes = 0, steps, "rollout finished");
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
        tracing::info!(
            episodes = returns.len(),
            steps,
            mean_return,
            "rollout finished"
        );
    }
    Ok(returns)
}
