use anyhow::Result;
use blocksworld_core::{Env as _, Step};
use blocksworld_env::{
    Action, BlocksWorld, BlocksWorldAct, BlocksWorldMatrixEnv, BlocksWorldMatrixEnvConfig,
    Location, ResetOptions, WorldConfig,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::thread;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run(world: &mut BlocksWorld, actions: &[Action]) -> Vec<(f32, bool)> {
    actions.iter().map(|&a| world.update(a)).collect()
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
}

/// Checks gravity, the height table, the block lookup and the order counter.
fn assert_consistent(world: &BlocksWorld) {
    let grid = world.grid();
    for x in 0..grid.width() {
        let occupied = (0..grid.height())
            .filter(|&y| !grid.get(Location::new(x, y)).is_empty())
            .count();
        assert_eq!(world.height_at_loc()[x], occupied, "column {}\n{}", x, grid);
        for y in 0..grid.height() {
            assert_eq!(grid.get(Location::new(x, y)).is_empty(), y >= occupied);
        }
    }
    for block in world.blocks() {
        if let Some(loc) = block.location() {
            assert_eq!(world.block_at(loc).map(|b| b.id()), Some(block.id()));
        }
    }
    let flagged = world.blocks().iter().filter(|b| b.in_position()).count();
    assert_eq!(world.order().num_blocks_in_position(), flagged);
}

#[test]
fn test_multi_color_episode() -> Result<()> {
    init();
    let mut rng = StdRng::seed_from_u64(0);
    let mut target = BlocksWorld::new(WorldConfig::default().size(3, 5).max_num_blocks(3));
    target.reset(&[vec![2, 3, 4]], ResetOptions::default().columns(vec![0]), &mut rng)?;

    let config = WorldConfig::default().size(3, 5).max_num_blocks(3).agent(true);
    let mut world = BlocksWorld::new(config);
    let options = ResetOptions::default()
        .order(target.order().clone())
        .columns(vec![2])
        .agent_column(2);
    world.reset(&[vec![4, 3, 2]], options, &mut rng)?;
    assert_eq!(world.order().num_blocks_in_position(), 0);

    use Action::*;
    let transfer = [Pick, Left, Left, Drop];
    let back = [Right, Right];
    let mut actions = transfer.to_vec();
    for _ in 0..2 {
        actions.extend_from_slice(&back);
        actions.extend_from_slice(&transfer);
    }

    let results = run(&mut world, &actions);
    assert_eq!(results.len(), 16);
    for (i, &(reward, done)) in results.iter().enumerate() {
        let n = (i + 1) as f32;
        match i {
            3 | 9 | 15 => assert_close(reward, 1.0 - 0.01 * n),
            _ => assert_close(reward, -0.01 * n),
        }
        assert_eq!(done, i == 15);
        assert_consistent(&world);
    }
    assert_eq!(world.order().num_blocks_in_position(), 3);
    assert!(world.has_game_ended());
    assert!(world.is_matching(&target));
    Ok(())
}

#[test]
fn test_single_color_episode() -> Result<()> {
    init();
    let mut rng = StdRng::seed_from_u64(0);
    let config = WorldConfig::default()
        .size(2, 4)
        .max_num_blocks(2)
        .agent(true)
        .colorless(true);
    let mut world = BlocksWorld::new(config);
    let options = ResetOptions::default()
        .target_heights(vec![2, 0])
        .columns(vec![1])
        .agent_column(1);
    world.reset(&[vec![2, 3]], options, &mut rng)?;

    use Action::*;
    let results = run(&mut world, &[Pick, Left, Drop]);
    assert_close(results[2].0, 0.97);
    assert!(!results[2].1);
    assert_eq!(world.height_at_loc(), &[2, 1]);
    assert_consistent(&world);

    let results = run(&mut world, &[Right, Pick, Left, Drop]);
    assert_eq!(results[3], (10.0, true));
    assert!(world.has_game_ended());
    Ok(())
}

#[test]
fn test_single_color_penalizes_emptying_a_target_column() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0);
    let config = WorldConfig::default()
        .size(3, 4)
        .max_num_blocks(2)
        .agent(true)
        .colorless(true);
    let mut world = BlocksWorld::new(config);
    let options = ResetOptions::default()
        .target_heights(vec![0, 2, 0])
        .columns(vec![1])
        .agent_column(1);
    world.reset(&[vec![2, 3]], options, &mut rng)?;

    use Action::*;
    let results = run(&mut world, &[Pick, Left, Drop]);
    // Column 0 goes over its target and column 1 falls below its target.
    assert_close(results[2].0, -2.03);
    Ok(())
}

fn colorless_world(width: usize, target_heights: Vec<usize>) -> Result<BlocksWorld> {
    let mut rng = StdRng::seed_from_u64(0);
    let config = WorldConfig::default()
        .size(width, 4)
        .max_num_blocks(2)
        .agent(true)
        .colorless(true);
    let mut world = BlocksWorld::new(config);
    let options = ResetOptions::default()
        .target_heights(target_heights)
        .columns(vec![1])
        .agent_column(1);
    world.reset(&[vec![2, 3]], options, &mut rng)?;
    Ok(world)
}

#[test]
fn test_single_color_drop_in_place_earns_nothing() -> Result<()> {
    let mut world = colorless_world(2, vec![2, 0])?;

    use Action::*;
    let results = run(&mut world, &[Pick, Drop]);
    assert_eq!(results[1], (-0.02, false));
    assert_eq!(world.height_at_loc(), &[0, 3]);
    assert_consistent(&world);
    Ok(())
}

#[test]
fn test_single_color_bonus_and_penalty_add_up() -> Result<()> {
    let mut world = colorless_world(3, vec![1, 2, 0])?;

    use Action::*;
    let results = run(&mut world, &[Pick, Left, Drop]);
    // Column 0 reaches its target while column 1 falls below its target.
    assert_close(results[2].0, 1.0 - 2.0 - 0.03);
    assert!(!results[2].1);
    assert_eq!(world.height_at_loc(), &[2, 1, 0]);
    Ok(())
}

#[test]
fn test_multi_color_block_leaving_its_slot() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(1);
    let config = WorldConfig::default().size(4, 5).max_num_blocks(4).agent(true);
    let mut world = BlocksWorld::new(config);
    let options = ResetOptions::default().columns(vec![0, 3]).agent_column(1);
    world.reset(&[vec![2, 3], vec![4]], options, &mut rng)?;
    assert_eq!(world.order().num_blocks_in_position(), 3);

    // Move block 3 off the top of column 0 onto the floor of column 1.
    use Action::*;
    let results = run(&mut world, &[Left, Pick, Right, Drop]);
    assert_close(results[3].0, -1.0 - 0.04);
    assert!(!results[3].1);
    assert_eq!(world.order().num_blocks_in_position(), 2);
    assert!(!world.has_game_ended());
    assert_consistent(&world);
    Ok(())
}

#[test]
fn test_solved_layout_ends_before_any_action() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(1);
    let config = WorldConfig::default().size(4, 5).max_num_blocks(4).agent(true);
    let mut world = BlocksWorld::new(config);
    let options = ResetOptions::default().columns(vec![0, 3]).agent_column(1);
    world.reset(&[vec![2, 3], vec![4]], options, &mut rng)?;

    // Without a given order the layout is its own target.
    assert!(world.has_game_ended());
    assert_eq!(world.order().num_blocks_in_position(), 3);

    // Put block 3 back where it was.
    use Action::*;
    let results = run(&mut world, &[Left, Pick, Drop]);
    assert_eq!(results[1], (-0.02, false));
    assert!(results[2].1);
    assert_consistent(&world);
    Ok(())
}

#[test]
fn test_random_actions_keep_the_world_consistent() -> Result<()> {
    init();
    let mut rng = StdRng::seed_from_u64(1234);

    for episode in 0..20 {
        let mut target = BlocksWorld::new(WorldConfig::default().size(5, 6).max_num_blocks(6));
        target.reset(&[vec![2, 3, 4], vec![5, 6], vec![7]], ResetOptions::default(), &mut rng)?;

        let config = WorldConfig::default().size(5, 6).max_num_blocks(6).agent(true);
        let mut world = BlocksWorld::new(config);
        let options = ResetOptions::default().order(target.order().clone());
        world.reset(&[vec![7, 2], vec![6, 5, 3], vec![4]], options, &mut rng)?;
        assert_consistent(&world);

        for step in 0..200 {
            let action = Action::ALL[rng.gen_range(0..Action::ALL.len())];
            let (_, done) = world.update(action);
            assert_consistent(&world);
            assert_eq!(world.num_steps(), step + 1);
            if done {
                assert!(world.is_matching(&target), "episode {}", episode);
                break;
            }
        }
    }
    Ok(())
}

#[test]
fn test_env_truncates_at_cutoff() -> Result<()> {
    init();
    let config = BlocksWorldMatrixEnvConfig::default()
        .width(6)
        .height(5)
        .num_blocks(4)
        .num_colors(2)
        .num_steps_cutoff(10);
    let mut env = BlocksWorldMatrixEnv::build(&config, 0)?;
    env.reset()?;

    // Walking never solves anything.
    let acts = [Action::Left, Action::Right];
    let mut steps: Vec<Step<BlocksWorldMatrixEnv>> = Vec::new();
    for i in 0..10 {
        let (step, _) = env.step(&BlocksWorldAct::new(acts[i % 2]));
        steps.push(step);
    }
    assert!(steps[..9].iter().all(|s| !s.is_done()));
    assert!(steps[9].is_truncated && !steps[9].is_terminated);
    assert_close(steps[9].reward, -0.1);
    Ok(())
}

#[test]
fn test_env_instances_are_independent() -> Result<()> {
    let config = BlocksWorldMatrixEnvConfig::default().num_colors(2);
    let handles = (0..4)
        .map(|_| {
            let config = config.clone();
            thread::spawn(move || -> Result<Vec<f32>> {
                let mut env = BlocksWorldMatrixEnv::build(&config, 7)?;
                let mut rewards = vec![];
                let mut rng = StdRng::seed_from_u64(7);
                env.reset()?;
                for _ in 0..50 {
                    let act = BlocksWorldAct::from_index(rng.gen_range(0..4))?;
                    rewards.push(env.step(&act).0.reward);
                }
                Ok(rewards)
            })
        })
        .collect::<Vec<_>>();

    let rewards = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect::<Result<Vec<_>>>()?;
    assert!(rewards.windows(2).all(|w| w[0] == w[1]));
    Ok(())
}
