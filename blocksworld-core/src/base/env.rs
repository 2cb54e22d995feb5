//! The environment contract.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// An episodic task driven one action at a time.
///
/// Episodes start with [`Env::reset`] and end when a [`Step`] reports the task
/// solved (`is_terminated`) or cut off by a step limit (`is_truncated`).
pub trait Env {
    /// Static parameters, used by [`Env::build`].
    type Config: Clone;

    /// What a policy sees after every step.
    type Obs: Obs;

    /// What a policy feeds back.
    type Act: Act;

    /// Extra per-step values carried by [`Step::info`].
    type Info: Info;

    /// Builds an environment with a given random seed.
    ///
    /// Two environments built with the same configuration and seed produce
    /// the same episodes for the same actions.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Applies an action. The [`Record`] holds values worth logging.
    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Like [`Env::step`], and starts a new episode when this one is over.
    ///
    /// The first observation of the new episode is stored in [`Step::init_obs`].
    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized;

    /// Starts episode number `ix`.
    ///
    /// Implementations derive the initial state from `ix` (typically through
    /// the random seed), so that the same index gives the same episode.
    /// [`DefaultEvaluator`] relies on this to compare policies on identical
    /// episodes.
    ///
    /// [`DefaultEvaluator`]: crate::DefaultEvaluator
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;
}
