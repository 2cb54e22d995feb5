use anyhow::Result;
use blocksworld_core::{
    record::{BufferedRecorder, Record},
    util, Configurable, DefaultEvaluator, Env as _, Evaluator as _, Policy,
};
use blocksworld_env::{
    Action, BlocksWorldAct, BlocksWorldMatrixEnv, BlocksWorldMatrixEnvConfig, BlocksWorldObs,
    N_ACTIONS,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fs::File};

#[derive(Clone, Deserialize)]
struct RandomPolicyConfig {
    seed: u64,
}

struct RandomPolicy {
    rng: fastrand::Rng,
}

impl Configurable for RandomPolicy {
    type Config = RandomPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }
}

impl Policy<BlocksWorldMatrixEnv> for RandomPolicy {
    fn sample(&mut self, _: &BlocksWorldObs) -> BlocksWorldAct {
        BlocksWorldAct::new(Action::ALL[self.rng.usize(..N_ACTIONS)])
    }
}

#[derive(Debug, Serialize)]
struct BlocksWorldRecord {
    episode: usize,
    step: usize,
    reward: f32,
    action: String,
    num_blocks_in_position: usize,
}

impl TryFrom<&Record> for BlocksWorldRecord {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            step: record.get_scalar("step")? as _,
            reward: record.get_scalar("reward")?,
            action: record.get_string("action")?,
            num_blocks_in_position: record.get_scalar("num_blocks_in_position")? as _,
        })
    }
}

/// Runs a random policy in the Blocks World environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the environment configuration, defaults are used if not given
    #[arg(long)]
    config: Option<String>,

    /// Number of episodes
    #[arg(long, default_value_t = 5)]
    episodes: usize,

    /// Random seed of the environment and the policy
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Writes every step of the episodes into this CSV file
    #[arg(long)]
    csv: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let env_config = match &args.config {
        Some(path) => BlocksWorldMatrixEnvConfig::load(path)?,
        None => BlocksWorldMatrixEnvConfig::default().num_colors(3),
    };
    let mut policy = RandomPolicy::build(RandomPolicyConfig { seed: args.seed });

    let seed = args.seed as i64;
    let mut evaluator =
        DefaultEvaluator::<BlocksWorldMatrixEnv>::new(&env_config, seed, args.episodes)?;
    let record = evaluator.evaluate(&mut policy)?;
    println!(
        "Average return: {:.3}, success rate: {:.2}",
        record.get_scalar("Episode return")?,
        record.get_scalar("Success rate")?
    );

    if let Some(path) = &args.csv {
        let mut env = BlocksWorldMatrixEnv::build(&env_config, seed)?;
        let mut recorder = BufferedRecorder::new();
        let _ = util::eval_with_recorder(&mut env, &mut policy, args.episodes, &mut recorder)?;

        let mut wtr = csv::WriterBuilder::new().from_writer(File::create(path)?);
        for record in recorder.iter() {
            wtr.serialize(BlocksWorldRecord::try_from(record)?)?;
        }
        wtr.flush()?;
    }

    Ok(())
}
