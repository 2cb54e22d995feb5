//! This module is used for tests.
use crate::{record::Record, Act, Env, Info, Obs, Policy, Step};
use anyhow::Result;

/// Remaining number of steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Remaining(pub usize);

impl Obs for Remaining {}

/// The only action.
#[derive(Clone, Debug)]
pub struct Tick;

impl Act for Tick {}

#[derive(Clone, Debug)]
pub struct CountdownInfo;

impl Info for CountdownInfo {}

#[derive(Clone, Debug)]
pub struct CountdownConfig {
    pub length: usize,
    pub max_steps: usize,
}

/// Terminates after `length + ix` steps with reward 1 per step,
/// truncates after `max_steps` steps.
pub struct Countdown {
    config: CountdownConfig,
    ix: usize,
    remaining: usize,
    steps: usize,
}

impl Env for Countdown {
    type Config = CountdownConfig;
    type Obs = Remaining;
    type Act = Tick;
    type Info = CountdownInfo;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            ix: 0,
            remaining: config.length,
            steps: 0,
        })
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        self.remaining = self.remaining.saturating_sub(1);
        self.steps += 1;
        let is_terminated = self.remaining == 0;
        let is_truncated = !is_terminated && self.steps >= self.config.max_steps;
        let step = Step::new(
            Remaining(self.remaining),
            a.clone(),
            1.0,
            is_terminated,
            is_truncated,
            CountdownInfo,
            None,
        );
        (step, Record::from_scalar("remaining", self.remaining as f32))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.remaining = self.config.length + self.ix;
        self.steps = 0;
        Ok(Remaining(self.remaining))
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            step.init_obs = self.reset().ok();
        }
        (step, record)
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.ix = ix;
        self.reset()
    }
}

/// Always ticks.
pub struct Wait;

impl Policy<Countdown> for Wait {
    fn sample(&mut self, _obs: &Remaining) -> Tick {
        Tick
    }
}
