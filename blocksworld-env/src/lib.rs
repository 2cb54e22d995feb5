//! Blocks World, a grid manipulation environment.
//!
//! An agent walks on top of towers of blocks, picks the block under its feet
//! and drops it on another column. The goal is to rebuild a target
//! arrangement: the exact stacking order of block colors, or just the number
//! of blocks per column when all blocks share one color.
//!
//! [`BlocksWorld`] is the simulation itself. [`BlocksWorldMatrixEnv`] pairs a
//! randomly generated input world with a target world and exposes them
//! through [`blocksworld_core::Env`].
//!
//! Here is an example of running the environment with a random policy.
//!
//! ```no_run
//! use anyhow::Result;
//! use blocksworld_core::{DefaultEvaluator, Evaluator as _, Policy};
//! use blocksworld_env::{
//!     Action, BlocksWorldAct, BlocksWorldMatrixEnv, BlocksWorldMatrixEnvConfig, BlocksWorldObs,
//! };
//!
//! struct RandomPolicy;
//!
//! impl Policy<BlocksWorldMatrixEnv> for RandomPolicy {
//!     fn sample(&mut self, _: &BlocksWorldObs) -> BlocksWorldAct {
//!         BlocksWorldAct::new(Action::ALL[fastrand::usize(..4)])
//!     }
//! }
//!
//! fn main() -> Result<()> {
//! #     env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
//! #         .init();
//!     let env_config = BlocksWorldMatrixEnvConfig::default()
//!         .num_blocks(6)
//!         .num_colors(3)
//!         .num_steps_cutoff(200);
//!     let mut policy = RandomPolicy;
//!     let mut evaluator = DefaultEvaluator::<BlocksWorldMatrixEnv>::new(&env_config, 0, 5)?;
//!     let _ = evaluator.evaluate(&mut policy)?;
//!
//!     Ok(())
//! }
//! ```
mod act;
mod env;
mod error;
mod obs;
pub mod world;
pub use act::BlocksWorldAct;
pub use env::{BlocksWorldInfo, BlocksWorldMatrixEnv, BlocksWorldMatrixEnvConfig};
pub use error::BlocksWorldError;
pub use obs::BlocksWorldObs;
pub use world::{
    Action, Agent, AgentState, Block, BlocksWorld, Cell, Grid, Location, Observation, Order,
    ResetOptions, WorldConfig,
};

/// Identifier of a block. `0` marks empty cells and is never a block id.
pub type BlockId = u32;

/// Identifier of the agent.
pub type AgentId = u32;

/// Size of the action table.
pub const N_ACTIONS: usize = 4;
