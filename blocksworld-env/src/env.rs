mod config;
use crate::{BlockId, BlocksWorld, BlocksWorldAct, BlocksWorldObs, Order, ResetOptions, N_ACTIONS};
use anyhow::Result;
use blocksworld_core::{
    record::{Record, RecordValue},
    Env, Info, Step,
};
pub use config::BlocksWorldMatrixEnvConfig;
use log::{debug, error};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::HashMap;

/// Progress of an episode, emitted with every [`Step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlocksWorldInfo {
    /// Blocks in their target slot (multi-color environments).
    pub num_blocks_in_position: usize,

    /// Steps since the last reset.
    pub num_steps: usize,
}

impl Info for BlocksWorldInfo {}

/// Pairs a target world with the world the agent acts in.
///
/// On reset, blocks `2, 3, ...` are stacked in id order into the target
/// world, and shuffled into the input world with the same tower sizes; both
/// layouts land in random columns. The agent solves the episode by rebuilding
/// the target arrangement (multi-color) or the target column heights
/// (colorless, `num_colors == 1`). Episodes are truncated after
/// `num_steps_cutoff` steps.
///
/// Observations stack the dense grids of the input and the target world.
pub struct BlocksWorldMatrixEnv {
    config: BlocksWorldMatrixEnvConfig,

    // Base of the seeds used by `reset_with_index`.
    seed: u64,

    rng: StdRng,

    input_world: BlocksWorld,

    target_world: BlocksWorld,

    num_steps_done: usize,
}

impl BlocksWorldMatrixEnv {
    /// Number of entries of the action table.
    pub fn action_dim(&self) -> usize {
        N_ACTIONS
    }

    /// Shape of [`BlocksWorldObs::grids`].
    pub fn obs_dim(&self) -> (usize, usize, usize) {
        (2, self.config.width, self.config.height)
    }

    /// The world the agent acts in.
    pub fn input_world(&self) -> &BlocksWorld {
        &self.input_world
    }

    /// The world holding the target arrangement.
    pub fn target_world(&self) -> &BlocksWorld {
        &self.target_world
    }

    /// Configuration of the environment.
    pub fn config(&self) -> &BlocksWorldMatrixEnvConfig {
        &self.config
    }

    fn observation(&self) -> BlocksWorldObs {
        BlocksWorldObs::new(self.input_world.as_dense(), self.target_world.as_dense())
    }

    fn towers(ids: &[usize], tower_height: usize) -> Vec<Vec<usize>> {
        ids.chunks(tower_height).map(<[usize]>::to_vec).collect()
    }
}

impl Env for BlocksWorldMatrixEnv {
    type Config = BlocksWorldMatrixEnvConfig;
    type Obs = BlocksWorldObs;
    type Act = BlocksWorldAct;
    type Info = BlocksWorldInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized,
    {
        config.validate()?;
        let seed = seed as u64;

        Ok(Self {
            config: config.clone(),
            seed,
            rng: StdRng::seed_from_u64(seed),
            input_world: BlocksWorld::new(config.world_config(true)),
            target_world: BlocksWorld::new(config.world_config(false)),
            num_steps_done: 0,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let num_colors = self.config.num_colors;
        let tower_height = self.config.tower_height();
        let ids = (0..self.config.num_blocks).map(|i| i + 2).collect::<Vec<_>>();
        let colors = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id as BlockId, (i % num_colors) as u32 + 1))
            .collect::<HashMap<_, _>>();

        let target_towers = Self::towers(&ids, tower_height);
        self.target_world.reset(
            &target_towers,
            ResetOptions::default().colors(colors.clone()),
            &mut self.rng,
        )?;

        let mut shuffled = ids;
        shuffled.shuffle(&mut self.rng);
        let input_towers = Self::towers(&shuffled, tower_height);
        let order: Order = self.target_world.order().clone();
        let options = ResetOptions::default()
            .colors(colors)
            .order(order)
            .target_heights(self.target_world.height_at_loc().to_vec());
        self.input_world.reset(&input_towers, options, &mut self.rng)?;

        self.num_steps_done = 0;
        debug!(
            "Target towers {:?}, input towers {:?}",
            target_towers, input_towers
        );

        Ok(self.observation())
    }

    fn step(&mut self, act: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized,
    {
        self.num_steps_done += 1;
        let (reward, is_terminated) = self.input_world.update(act.act);
        let is_truncated = !is_terminated && self.num_steps_done >= self.config.num_steps_cutoff;

        let info = BlocksWorldInfo {
            num_blocks_in_position: self.input_world.order().num_blocks_in_position(),
            num_steps: self.num_steps_done,
        };

        let mut record = Record::from_slice(&[
            ("reward", RecordValue::Scalar(reward)),
            (
                "num_blocks_in_position",
                RecordValue::Scalar(info.num_blocks_in_position as f32),
            ),
            ("action", RecordValue::String(act.act.to_string())),
        ]);
        let grid = self.input_world.as_dense();
        let shape = [grid.nrows(), grid.ncols()];
        record.insert("grid", RecordValue::Array2(grid.iter().copied().collect(), shape));
        if is_terminated || is_truncated {
            record.insert(
                "episode_length",
                RecordValue::Scalar(self.num_steps_done as f32),
            );
        }

        let step = Step::new(
            self.observation(),
            *act,
            reward,
            is_terminated,
            is_truncated,
            info,
            None,
        );

        (step, record)
    }

    fn step_with_reset(&mut self, act: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized,
    {
        let (mut step, record) = self.step(act);
        if step.is_done() {
            step.init_obs = match self.reset() {
                Ok(obs) => Some(obs),
                Err(e) => {
                    error!("Failed to reset the environment: {}", e);
                    None
                }
            };
        }
        (step, record)
    }

    /// Reseeds the environment with `seed + ix` before resetting.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(ix as u64));
        self.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;

    fn config() -> BlocksWorldMatrixEnvConfig {
        BlocksWorldMatrixEnvConfig::default()
            .width(5)
            .height(6)
            .num_blocks(6)
            .num_colors(3)
            .max_tower_height(3)
            .num_steps_cutoff(3)
    }

    fn sorted_blocks(grid: ndarray::ArrayView2<f32>) -> Vec<u32> {
        let mut ids = grid
            .iter()
            .filter(|&&v| v > 1.0)
            .map(|&v| v as u32)
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = config().width(1);
        assert!(BlocksWorldMatrixEnv::build(&config, 0).is_err());
    }

    #[test]
    fn test_reset_layouts() -> Result<()> {
        let mut env = BlocksWorldMatrixEnv::build(&config(), 42)?;
        let obs = env.reset()?;

        assert_eq!(obs.grids.dim(), env.obs_dim());
        assert_eq!(env.action_dim(), 4);
        assert_eq!(sorted_blocks(obs.target()), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(sorted_blocks(obs.input()), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(obs.input().iter().filter(|&&v| v == 1.0).count(), 1);
        assert!(obs.target().iter().all(|&v| v != 1.0));

        // Both layouts use towers of three blocks.
        let towers = |heights: &[usize]| {
            let mut towers = heights.iter().copied().filter(|&h| h > 0).collect::<Vec<_>>();
            towers.sort_unstable();
            towers
        };
        assert_eq!(towers(env.target_world().height_at_loc()), vec![3, 3]);
        assert_eq!(env.target_world().order().num_blocks_in_position(), 6);
        assert!(env.input_world().agent().is_some());
        assert!(env.target_world().agent().is_none());
        Ok(())
    }

    #[test]
    fn test_colors_cycle_over_blocks() -> Result<()> {
        let mut env = BlocksWorldMatrixEnv::build(&config(), 7)?;
        env.reset()?;
        let mut colors = env
            .input_world()
            .blocks()
            .iter()
            .map(|b| (b.id(), b.color()))
            .collect::<Vec<_>>();
        colors.sort_unstable();
        assert_eq!(colors, vec![(2, 1), (3, 2), (4, 3), (5, 1), (6, 2), (7, 3)]);
        Ok(())
    }

    #[test]
    fn test_reset_with_index_is_deterministic() -> Result<()> {
        let mut env1 = BlocksWorldMatrixEnv::build(&config(), 3)?;
        let mut env2 = BlocksWorldMatrixEnv::build(&config(), 3)?;
        env2.reset()?;
        assert_eq!(env1.reset_with_index(5)?, env2.reset_with_index(5)?);
        Ok(())
    }

    #[test]
    fn test_truncation() -> Result<()> {
        let mut env = BlocksWorldMatrixEnv::build(&config(), 0)?;
        env.reset()?;
        let act = BlocksWorldAct::new(Action::Left);

        for i in 1..=3 {
            let (step, record) = env.step(&act);
            assert!(!step.is_terminated);
            assert_eq!(step.is_truncated, i == 3);
            assert_eq!(step.info.num_steps, i);
            assert!((step.reward + 0.01 * i as f32).abs() < 1e-6);
            assert_eq!(record.get_string("action")?, "left");
            assert_eq!(record.get("episode_length").is_some(), i == 3);
            assert_eq!(record.get_array2("grid")?.1, [5, 6]);
        }
        Ok(())
    }

    #[test]
    fn test_colorless_env_reports_no_blocks_in_position() -> Result<()> {
        let config = config().num_colors(1).num_steps_cutoff(100);
        let mut env = BlocksWorldMatrixEnv::build(&config, 11)?;
        env.reset()?;
        assert_eq!(env.input_world().order().num_blocks_in_position(), 0);

        for i in 0..60 {
            let act = BlocksWorldAct::from_index(i % N_ACTIONS)?;
            let (step, record) = env.step(&act);
            assert_eq!(step.info.num_blocks_in_position, 0);
            assert_eq!(record.get_scalar("num_blocks_in_position")?, 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_step_with_reset() -> Result<()> {
        let mut env = BlocksWorldMatrixEnv::build(&config(), 0)?;
        env.reset()?;
        let act = BlocksWorldAct::new(Action::Right);

        for _ in 0..2 {
            let (step, _) = env.step_with_reset(&act);
            assert!(step.init_obs.is_none());
        }
        let (step, _) = env.step_with_reset(&act);
        assert!(step.is_truncated);
        assert!(step.init_obs.is_some());
        assert_eq!(env.input_world().num_steps(), 0);
        Ok(())
    }
}
