//! The Blocks World simulation.
//!
//! A [`BlocksWorld`] is a `width x height` grid holding towers of blocks and,
//! optionally, an [`Agent`] that walks on top of the towers, picks the block
//! under its feet and drops it elsewhere. Rewards are shaped towards a target
//! arrangement, described by an [`Order`] (multi-color worlds) or by target
//! column heights (colorless worlds).
mod action;
mod agent;
mod block;
mod grid;
mod order;
pub use action::Action;
pub use agent::{Agent, AgentState};
pub use block::Block;
pub use grid::{Cell, Grid, Location};
pub use order::Order;

use crate::{AgentId, BlockId, BlocksWorldError};
use log::{debug, trace};
use ndarray::{Array2, Array3};
use rand::{seq::index::sample, Rng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const DEFAULT_AGENT_ID: AgentId = 1;
const COLORLESS: u32 = 1;
const STEP_PENALTY: f32 = 0.01;
const SOLVED_REWARD: f32 = 10.0;

/// Static parameters of a [`BlocksWorld`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub height: usize,
    pub width: usize,

    /// Number of block channels of one-hot observations.
    pub max_num_blocks: usize,

    pub is_agent_present: bool,

    /// Blocks are interchangeable, only column heights matter.
    pub is_colorless: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            height: 50,
            width: 50,
            max_num_blocks: 20,
            is_agent_present: false,
            is_colorless: false,
        }
    }
}

impl WorldConfig {
    /// Sets the size of the grid.
    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn max_num_blocks(mut self, v: usize) -> Self {
        self.max_num_blocks = v;
        self
    }

    pub fn agent(mut self, v: bool) -> Self {
        self.is_agent_present = v;
        self
    }

    pub fn colorless(mut self, v: bool) -> Self {
        self.is_colorless = v;
        self
    }
}

/// Optional inputs of [`BlocksWorld::reset`].
#[derive(Clone, Debug, Default)]
pub struct ResetOptions {
    object_ids: Option<Vec<BlockId>>,
    colors: Option<HashMap<BlockId, u32>>,
    order: Option<Order>,
    target_heights: Option<Vec<usize>>,
    columns: Option<Vec<usize>>,
    agent_column: Option<usize>,
}

impl ResetOptions {
    /// Maps tower entries to block ids; entry `0` also gives the agent id.
    pub fn object_ids(mut self, ids: Vec<BlockId>) -> Self {
        self.object_ids = Some(ids);
        self
    }

    /// Colors of blocks by id. Blocks without an entry take their id as color.
    pub fn colors(mut self, colors: HashMap<BlockId, u32>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Target order, typically taken from a target world. Derived from the
    /// world's own layout if not given.
    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Target block count of every column, required by colorless worlds with an agent.
    pub fn target_heights(mut self, heights: Vec<usize>) -> Self {
        self.target_heights = Some(heights);
        self
    }

    /// Places tower `i` at `columns[i]` instead of a random column.
    pub fn columns(mut self, columns: Vec<usize>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Places the agent in column `x` instead of a random column.
    pub fn agent_column(mut self, x: usize) -> Self {
        self.agent_column = Some(x);
        self
    }
}

/// A snapshot of a world.
#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// Cell values of shape `(width, height)`: `0` for empty, the id otherwise.
    Dense(Array2<f32>),

    /// One channel per block slot (plus one for the agent, if present),
    /// shape `(channels, width, height)`.
    OneHot(Array3<f32>),
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Grid, towers and agent of one episode.
///
/// The agent alternates between two states; actions that are impossible in
/// the current state are no-ops that still cost a step.
///
/// ```mermaid
/// stateDiagram-v2
///     Empty --> Empty: left / right
///     Empty --> Holding: pick (block below)
///     Holding --> Holding: left / right
///     Holding --> Empty: drop
/// ```
///
/// Invariants kept by every update:
///
/// * occupied cells of a column form a contiguous run from the floor;
/// * `height_at_loc()[x]` counts the blocks of column `x`, plus one if the agent stands there;
/// * the block lookup holds exactly the cells occupied by blocks;
/// * in multi-color worlds, the order's counter equals the number of blocks flagged in position.
#[derive(Clone, Debug)]
pub struct BlocksWorld {
    config: WorldConfig,
    grid: Grid,
    height_at_loc: Vec<usize>,
    block_lookup: HashMap<Location, usize>,
    blocks: Vec<Block>,
    agent: Option<Agent>,
    order: Order,
    target_height_at_loc: Option<Vec<usize>>,
    num_steps: usize,
}

impl BlocksWorld {
    /// Constructs an empty world. Call [`BlocksWorld::reset`] to place blocks.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            height_at_loc: vec![0; config.width],
            block_lookup: HashMap::new(),
            blocks: Vec::new(),
            agent: None,
            order: Order::default(),
            target_height_at_loc: None,
            num_steps: 0,
            config,
        }
    }

    /// Starts an episode with `towers`, each a bottom-to-top list of objects.
    ///
    /// Towers go to distinct random columns, the agent (if present) on top of
    /// a random column. Nothing changes if an error is returned.
    ///
    /// The agent's column needs two free cells, one for the agent and one
    /// above it for a block the agent may pick and drop in place. A column
    /// with a single free cell fails with [`BlocksWorldError::NoHeadroom`],
    /// so a tower of `height - 1` blocks only fits when the agent lands
    /// elsewhere (use [`ResetOptions::agent_column`] to choose).
    ///
    /// In colorless worlds blocks are never flagged in position and the
    /// order's counter stays at zero.
    pub fn reset<R: Rng>(
        &mut self,
        towers: &[Vec<usize>],
        options: ResetOptions,
        rng: &mut R,
    ) -> Result<Array2<f32>, BlocksWorldError> {
        let WorldConfig {
            width,
            height,
            max_num_blocks,
            is_agent_present,
            is_colorless,
        } = self.config;

        if width == 0 || height == 0 {
            return Err(BlocksWorldError::InvalidConfig(format!(
                "grid of size {}x{}",
                width, height
            )));
        }
        if towers.len() > width {
            return Err(BlocksWorldError::TooManyTowers {
                num_towers: towers.len(),
                width,
            });
        }
        let num_blocks: usize = towers.iter().map(Vec::len).sum();
        if num_blocks > max_num_blocks {
            return Err(BlocksWorldError::TooManyBlocks {
                num_blocks,
                max_num_blocks,
            });
        }
        if let Some((tower, t)) = towers.iter().enumerate().find(|(_, t)| t.len() >= height) {
            return Err(BlocksWorldError::TowerTooTall {
                tower,
                len: t.len(),
                max: height - 1,
            });
        }

        let target_height_at_loc = match options.target_heights {
            Some(t) if t.len() != width => {
                return Err(BlocksWorldError::TargetHeightsMismatch {
                    expected: width,
                    got: t.len(),
                })
            }
            None if is_colorless && is_agent_present => {
                return Err(BlocksWorldError::MissingTargetHeights)
            }
            t => t,
        };

        let agent_id = match &options.object_ids {
            Some(ids) => *ids.first().ok_or(BlocksWorldError::UnknownObject(0))?,
            None => DEFAULT_AGENT_ID,
        };

        let mut blocks = Vec::with_capacity(num_blocks);
        let mut seen = HashSet::with_capacity(num_blocks);
        for &object in towers.iter().flatten() {
            let id = match &options.object_ids {
                Some(ids) => *ids
                    .get(object)
                    .ok_or(BlocksWorldError::UnknownObject(object))?,
                None => object as BlockId,
            };
            if id == 0 || (is_agent_present && id == agent_id) {
                return Err(BlocksWorldError::ReservedId(id));
            }
            if !seen.insert(id) {
                return Err(BlocksWorldError::DuplicateBlock(id));
            }
            let color = match (&options.colors, is_colorless) {
                (_, true) => COLORLESS,
                (Some(colors), false) => colors.get(&id).copied().unwrap_or(id),
                (None, false) => id,
            };
            blocks.push(Block::new(id, color));
        }

        let columns = match options.columns {
            Some(columns) => {
                check_columns(&columns, towers.len(), width)?;
                columns
            }
            None => sample(rng, width, towers.len()).into_vec(),
        };

        let mut grid = Grid::new(width, height);
        let mut heights = vec![0; width];
        let mut lookup = HashMap::with_capacity(num_blocks);
        let mut ix = 0;
        for (tower, &x) in towers.iter().zip(columns.iter()) {
            for _ in tower {
                let loc = Location::new(x, heights[x]);
                blocks[ix].set_location(loc);
                grid.set(loc, Cell::Block(blocks[ix].id()));
                lookup.insert(loc, ix);
                heights[x] += 1;
                ix += 1;
            }
        }

        let mut order = options
            .order
            .unwrap_or_else(|| Order::from_layout(&lookup, &blocks, &heights));
        order.reset_count();
        // Colorless worlds track column heights only; blocks are never flagged.
        if !is_colorless {
            for ix in 0..blocks.len() {
                let below = block_below(&blocks, &lookup, blocks[ix].location());
                blocks[ix].mark_in_position(&order, below.as_ref());
                if blocks[ix].in_position() {
                    order.adjust_count(1);
                }
            }
        }

        let agent = if is_agent_present {
            let x = match options.agent_column {
                Some(x) if x >= width => {
                    return Err(BlocksWorldError::InvalidPlacement(format!(
                        "agent column {} outside {} columns",
                        x, width
                    )))
                }
                Some(x) => x,
                None => rng.gen_range(0..width),
            };
            if height - heights[x] <= 1 {
                return Err(BlocksWorldError::NoHeadroom(x));
            }
            let loc = Location::new(x, heights[x]);
            grid.set(loc, Cell::Agent(agent_id));
            heights[x] += 1;
            Some(Agent::new(agent_id, loc))
        } else {
            None
        };

        debug!(
            "Reset: {} blocks in towers at columns {:?}, agent at {:?}, {} in position",
            num_blocks,
            columns,
            agent.as_ref().map(Agent::location),
            order.num_blocks_in_position()
        );

        self.grid = grid;
        self.height_at_loc = heights;
        self.block_lookup = lookup;
        self.blocks = blocks;
        self.agent = agent;
        self.order = order;
        self.target_height_at_loc = target_height_at_loc;
        self.num_steps = 0;

        Ok(self.grid.to_array())
    }

    /// Applies an action and returns the reward and whether the task is solved.
    ///
    /// Every call costs `0.01 * n` where `n` counts the updates of the episode.
    /// Impossible actions leave the world untouched apart from that count.
    pub fn update(&mut self, action: Action) -> (f32, bool) {
        self.num_steps += 1;
        let default_reward = -STEP_PENALTY * self.num_steps as f32;
        let (reward, done) = self.transition(action, default_reward);
        trace!(
            "Step {}: {} -> reward = {:.2}, done = {}\n{}",
            self.num_steps,
            action,
            reward,
            done,
            self.grid
        );
        (reward, done)
    }

    fn transition(&mut self, action: Action, default_reward: f32) -> (f32, bool) {
        let (width, height) = (self.config.width, self.config.height);
        let agent = match self.agent.as_mut() {
            Some(agent) => agent,
            None => return (default_reward, false),
        };
        let Location { x, y } = agent.location();

        match action {
            Action::Left | Action::Right => {
                let dest_x = match action {
                    Action::Left => x.checked_sub(1),
                    _ => Some(x + 1).filter(|&dest_x| dest_x < width),
                };
                if let Some(dest_x) = dest_x {
                    if height - self.height_at_loc[dest_x] > 1 {
                        let dest = Location::new(dest_x, self.height_at_loc[dest_x]);
                        agent.move_to(dest, &mut self.grid, &mut self.height_at_loc);
                    }
                }
                (default_reward, false)
            }
            Action::Pick => {
                if agent.is_holding() || y == 0 {
                    return (default_reward, false);
                }
                if let Some(&ix) = self.block_lookup.get(&Location::new(x, y - 1)) {
                    agent.pick_up(
                        ix,
                        &mut self.blocks[ix],
                        &mut self.grid,
                        &mut self.block_lookup,
                        &mut self.height_at_loc,
                    );
                }
                (default_reward, false)
            }
            Action::Drop => {
                let (ix, picked_from) = match agent.drop(
                    &mut self.blocks,
                    &mut self.grid,
                    &mut self.block_lookup,
                    &mut self.height_at_loc,
                ) {
                    Some(dropped) => dropped,
                    None => return (default_reward, false),
                };
                self.settle(ix, picked_from, default_reward)
            }
        }
    }

    /// Rewards the drop of block `ix`, which landed in the cell the agent stood on.
    fn settle(&mut self, ix: usize, picked_from: Location, default_reward: f32) -> (f32, bool) {
        let mut reward = default_reward;
        if !self.config.is_colorless {
            let in_position_before_drop = self.blocks[ix].in_position();
            let below = block_below(&self.blocks, &self.block_lookup, self.blocks[ix].location());
            self.blocks[ix].mark_in_position(&self.order, below.as_ref());
            let in_position_after_drop = self.blocks[ix].in_position();

            match (in_position_before_drop, in_position_after_drop) {
                (true, false) => {
                    reward -= 1.0;
                    self.order.adjust_count(-1);
                }
                (false, true) => {
                    reward += 1.0;
                    self.order.adjust_count(1);
                }
                _ => {}
            }
        } else if let (Some(target), Some(loc)) =
            (&self.target_height_at_loc, self.blocks[ix].location())
        {
            let x = loc.x;
            if picked_from.x != x {
                // The agent now stands on column `x`.
                if self.height_at_loc[x] - 1 <= target[x] {
                    reward += 1.0;
                }
                if target[picked_from.x] > self.height_at_loc[picked_from.x] {
                    reward -= 2.0;
                }
            }
        }

        let done = self.has_game_ended();
        if done && self.config.is_colorless {
            reward = SOLVED_REWARD;
        }
        (reward, done)
    }

    /// Returns `true` if the world matches its target arrangement.
    pub fn has_game_ended(&self) -> bool {
        if !self.config.is_colorless {
            return self.order.num_blocks_in_position() == self.blocks.len();
        }

        let target = match &self.target_height_at_loc {
            Some(target) => target,
            None => return false,
        };
        let agent_x = self.agent.as_ref().map(|agent| agent.location().x);
        self.height_at_loc
            .iter()
            .zip(target.iter())
            .enumerate()
            .all(|(x, (&height, &target_height))| {
                let effective_height = match agent_x {
                    Some(agent_x) if agent_x == x => height - 1,
                    _ => height,
                };
                effective_height == target_height
            })
    }

    /// Dense cell values of shape `(width, height)`.
    pub fn as_dense(&self) -> Array2<f32> {
        self.grid.to_array()
    }

    /// Returns a dense or one-hot snapshot of the world.
    ///
    /// In one-hot snapshots channel `i` marks block `i` in reset order and the
    /// last channel marks the agent. A held block is not on the grid and is
    /// not marked.
    pub fn observe(&self, one_hot: bool) -> Observation {
        if !one_hot {
            return Observation::Dense(self.as_dense());
        }

        let n_channels = self.config.max_num_blocks + self.agent.is_some() as usize;
        let mut world = Array3::zeros((n_channels, self.config.width, self.config.height));
        for (i, block) in self.blocks.iter().enumerate() {
            if let Some(loc) = block.location() {
                world[[i, loc.x, loc.y]] = 1.0;
            }
        }
        if let Some(agent) = &self.agent {
            let loc = agent.location();
            world[[n_channels - 1, loc.x, loc.y]] = 1.0;
        }
        Observation::OneHot(world)
    }

    /// Compares the cells of this world with those of `target`, with this
    /// world's agent cell read as empty.
    pub fn is_matching(&self, target: &BlocksWorld) -> bool {
        let masked = self
            .grid
            .to_array_masked(self.agent.as_ref().map(Agent::location));
        masked == target.as_dense()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Occupied cells per column, the agent's cell included.
    pub fn height_at_loc(&self) -> &[usize] {
        &self.height_at_loc
    }

    pub fn target_height_at_loc(&self) -> Option<&[usize]> {
        self.target_height_at_loc.as_deref()
    }

    pub fn agent(&self) -> Option<&Agent> {
        self.agent.as_ref()
    }

    /// Blocks in reset order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Number of updates since the last reset.
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// The block occupying `loc`, if any.
    pub fn block_at(&self, loc: Location) -> Option<&Block> {
        self.block_lookup.get(&loc).map(|&ix| &self.blocks[ix])
    }
}

fn block_below(
    blocks: &[Block],
    lookup: &HashMap<Location, usize>,
    loc: Option<Location>,
) -> Option<Block> {
    loc.and_then(|loc| loc.below())
        .and_then(|below| lookup.get(&below))
        .map(|&ix| blocks[ix])
}

fn check_columns(
    columns: &[usize],
    num_towers: usize,
    width: usize,
) -> Result<(), BlocksWorldError> {
    if columns.len() != num_towers {
        return Err(BlocksWorldError::InvalidPlacement(format!(
            "{} columns for {} towers",
            columns.len(),
            num_towers
        )));
    }
    let mut seen = HashSet::new();
    for &x in columns {
        if x >= width || !seen.insert(x) {
            return Err(BlocksWorldError::InvalidPlacement(format!(
                "column {} is outside the grid or used twice",
                x
            )));
        }
    }
    Ok(())
}
