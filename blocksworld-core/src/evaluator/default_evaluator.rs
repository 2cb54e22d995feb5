//! Default implementation of the [`Evaluator`] trait.
//!
//! Runs a fixed number of episodes and reports the average return together
//! with the fraction of episodes that were solved, i.e., terminated before
//! being truncated by the step limit of the environment.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// A default implementation of the [`Evaluator`] trait.
///
/// ```ignore
/// let config = BlocksWorldMatrixEnvConfig::default();
/// let mut evaluator = DefaultEvaluator::<BlocksWorldMatrixEnv>::new(&config, 42, 10)?;
/// let record = evaluator.evaluate(&mut policy)?;
/// println!("Average return: {}", record.get_scalar("Episode return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    /// Episode `ix` is started with [`Env::reset_with_index`]`(ix)`, so that
    /// repeated evaluations see the same initial states.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let mut r_total = 0f32;
        let mut n_solved = 0usize;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let mut r_episode = 0f32;
            let mut n_steps = 0usize;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act);
                r_episode += step.reward;
                n_steps += 1;
                if step.is_done() {
                    if step.is_terminated {
                        n_solved += 1;
                    }
                    break;
                }
                prev_obs = step.obs;
            }

            info!(
                "Episode {}, {} steps, return = {:.3}",
                ix, n_steps, r_episode
            );
            r_total += r_episode;
        }

        let n = self.n_episodes.max(1) as f32;
        Ok(Record::from_slice(&[
            ("Episode return", RecordValue::Scalar(r_total / n)),
            ("Success rate", RecordValue::Scalar(n_solved as f32 / n)),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }
}
