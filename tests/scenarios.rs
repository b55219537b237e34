use survivor_rl::agent::{Agent, Outcome};
use survivor_rl::observation::ObservationEncoding;
use survivor_rl::reward::RewardProfile;
use survivor_rl::world::Placement;
use survivor_rl::{Config, Event, Layout, Movement, Pos, QLearning, QTable, SurvivorEnv, World};

use Movement::{Down, Left, Right, Up};

fn five_by_five(hazards: Vec<Pos>, pickups: Vec<Pos>) -> Layout {
    Layout {
        rows: 5,
        cols: 5,
        start: Pos::new(0, 0),
        goal: Pos::new(0, 4),
        placement: Placement::Fixed { hazards, pickups },
    }
}

fn play(env: &mut SurvivorEnv, actions: &[Movement]) -> Vec<Event> {
    env.reset(Some(0));
    let mut agent = Agent::new();
    let mut events = Vec::new();
    for movement in actions {
        if agent.finished() {
            break;
        }
        events.push(agent.r#move(env, *movement).event);
    }
    events
}

#[test]
fn hazard_next_to_start_ends_the_episode_on_the_first_step() {
    let mut env = SurvivorEnv::new(
        five_by_five(vec![Pos::new(0, 1)], vec![]),
        ObservationEncoding::PositionWithPickups,
        RewardProfile::survivor(),
        100,
    )
    .unwrap();

    let events = play(&mut env, &[Right, Right, Right, Right]);
    assert_eq!(events, vec![Event::Hazard]);
    assert_eq!(env.world().agent(), Pos::new(0, 1));
    assert_eq!(env.steps(), 1);
}

#[test]
fn detour_around_the_hazard_reaches_the_goal_once() {
    let mut env = SurvivorEnv::new(
        five_by_five(vec![Pos::new(0, 1)], vec![]),
        ObservationEncoding::PositionWithPickups,
        RewardProfile::survivor(),
        100,
    )
    .unwrap();

    let actions = [Down, Down, Down, Right, Right, Right, Right, Up, Up, Up];
    let events = play(&mut env, &actions);
    assert_eq!(events.len(), actions.len());
    assert_eq!(events.iter().filter(|e| **e == Event::Goal).count(), 1);
    assert_eq!(events.last(), Some(&Event::Goal));
    assert!(events[..actions.len() - 1].iter().all(|e| *e == Event::Floor));
    assert_eq!(env.world().agent(), Pos::new(0, 4));
}

#[test]
fn direct_walk_without_obstacles_only_hits_the_goal() {
    let mut world = World::new(five_by_five(vec![Pos::new(3, 3)], vec![Pos::new(4, 0)])).unwrap();
    let events: Vec<Event> = [Right, Right, Right, Right].iter().map(|m| world.step(*m)).collect();
    assert_eq!(events, vec![Event::Floor, Event::Floor, Event::Floor, Event::Goal]);
    assert_eq!(world.hazards().len(), 1);
    assert_eq!(world.pickups().len(), 1);
}

#[test]
fn pickup_then_goal_pays_the_bonus() {
    let mut env = SurvivorEnv::new(
        five_by_five(vec![], vec![Pos::new(1, 0)]),
        ObservationEncoding::PositionWithPickups,
        RewardProfile::survivor(),
        100,
    )
    .unwrap();
    env.reset(Some(0));
    let mut agent = Agent::new();
    for movement in [Down, Up, Right, Right, Right] {
        agent.r#move(&mut env, movement);
    }
    let last = agent.r#move(&mut env, Right);
    assert_eq!(last.event, Event::Goal);
    assert_eq!(last.reward, 20.0);
    assert_eq!(agent.outcome, Some(Outcome::Goal));
}

#[test]
fn saved_table_survives_a_round_trip_and_rejects_other_encodings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("q.bin");

    let mut config = Config::default();
    config.training.episodes = 300;
    let mut env = config.environment().unwrap();
    let mut table = config.empty_table();
    let mut strategy = config.exploration();
    QLearning::new(config.training.clone()).train(&mut env, &mut table, &mut strategy, 300);
    table.save(&path).unwrap();

    let loaded = QTable::load(&path, env.table_shape()).unwrap();
    assert_eq!(loaded, table);

    config.encoding = ObservationEncoding::Neighborhood;
    let other = config.environment().unwrap();
    assert!(matches!(
        QTable::load(&path, other.table_shape()),
        Err(survivor_rl::Error::ShapeMismatch { .. })
    ));
}

#[test]
fn random_placement_replays_under_the_same_seed() {
    let layout = Layout {
        placement: Placement::Random { hazards: 3, pickups: 2 },
        ..five_by_five(vec![], vec![])
    };
    let actions = [Down, Right, Down, Right, Right, Down, Left, Down, Right, Up, Up, Right];
    let run = |seed: u64| {
        let mut world = World::new(layout.clone()).unwrap();
        world.reset(Some(seed));
        let placed = (world.hazards().to_vec(), world.pickups().to_vec());
        let events: Vec<Event> = actions.iter().map(|m| world.step(*m)).collect();
        (placed, events)
    };
    assert_eq!(run(17), run(17));
}
