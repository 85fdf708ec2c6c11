#![allow(missing_docs)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use npc_arena::SimError;
use npc_arena::display::render_map;
use npc_arena::simulation::agent::Agent;
use npc_arena::simulation::combat::FightOutcome;
use npc_arena::simulation::event_log::EventLog;
use npc_arena::simulation::kind::AgentKind;
use npc_arena::simulation::params::Params;
use npc_arena::simulation::queue::{CombatQueue, CombatTask};
use npc_arena::simulation::roster::populate;
use npc_arena::simulation::scheduler::{Phase, Simulation};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn create_test_params() -> Params {
    Params {
        map_width: 100,
        map_height: 100,
        tick_millis: 5,
        population: 30,
        ..Params::default()
    }
}

#[test]
fn test_scan_queues_pairs_in_roster_order() {
    let agents = vec![
        Agent::shared(AgentKind::Bear, "Bear", 10, 10),
        Agent::shared(AgentKind::Duck, "Duck", 13, 14),
        Agent::shared(AgentKind::Desman, "Far", 90, 90),
    ];
    let sim = Simulation::new(create_test_params(), agents).expect("valid simulation");

    assert_eq!(sim.scan().unwrap(), 1);
    let task = sim.queue().try_pop().expect("one task");
    assert_eq!(task.attacker.name(), "Bear");
    assert_eq!(task.target.name(), "Duck");
    assert!(sim.queue().is_empty());
}

#[test]
fn test_scan_uses_earlier_agent_radius() {
    // Bear first: 15 apart is outside the bear's reach of 10
    let bear_first = vec![
        Agent::shared(AgentKind::Bear, "Bear", 0, 0),
        Agent::shared(AgentKind::Desman, "Desman", 15, 0),
    ];
    let sim = Simulation::new(create_test_params(), bear_first).unwrap();
    assert_eq!(sim.scan().unwrap(), 0);

    // Desman first: inside the desman's reach of 20
    let desman_first = vec![
        Agent::shared(AgentKind::Desman, "Desman", 15, 0),
        Agent::shared(AgentKind::Bear, "Bear", 0, 0),
    ];
    let sim = Simulation::new(create_test_params(), desman_first).unwrap();
    assert_eq!(sim.scan().unwrap(), 1);
}

#[test]
fn test_scan_skips_dead_agents() {
    let duck = Agent::shared(AgentKind::Duck, "Duck", 1, 1);
    duck.kill();
    let agents = vec![Agent::shared(AgentKind::Bear, "Bear", 0, 0), duck];
    let sim = Simulation::new(create_test_params(), agents).unwrap();

    assert_eq!(sim.scan().unwrap(), 0);
}

#[test]
fn test_process_resolves_and_counts_kill() {
    let log = Arc::new(EventLog::default());
    let bear = Agent::shared(AgentKind::Bear, "Bear", 0, 0);
    let duck = Agent::shared(AgentKind::Duck, "Duck", 1, 1);
    bear.subscribe(log.clone());

    let sim = Simulation::new(create_test_params(), vec![bear, duck]).unwrap();
    sim.scan().unwrap();
    assert_eq!(sim.process_pending(), 1);

    assert_eq!(sim.kills(), 1);
    assert_eq!(log.len(), 1);
    let survivors = sim.roster().survivors();
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].name, "Bear");
}

#[test]
fn test_stale_task_is_declined() {
    let bear = Agent::shared(AgentKind::Bear, "Bear", 0, 0);
    let duck = Agent::shared(AgentKind::Duck, "Duck", 1, 1);
    let sim = Simulation::new(
        create_test_params(),
        vec![Arc::clone(&bear), Arc::clone(&duck)],
    )
    .unwrap();

    let task = CombatTask {
        attacker: bear,
        target: Arc::clone(&duck),
    };
    duck.kill();
    assert_eq!(sim.process(&task), FightOutcome::Declined);
    assert_eq!(sim.kills(), 0);
}

#[test]
fn test_two_tasks_on_same_target_kill_once() {
    let log = Arc::new(EventLog::default());
    let b1 = Agent::shared(AgentKind::Bear, "B1", 5, 5);
    let b2 = Agent::shared(AgentKind::Desman, "S1", 5, 6);
    let target = Agent::shared(AgentKind::Bear, "Target", 6, 5);
    for agent in [&b1, &b2] {
        agent.subscribe(log.clone());
    }
    let sim = Arc::new(
        Simulation::new(
            create_test_params(),
            vec![Arc::clone(&b1), Arc::clone(&b2), Arc::clone(&target)],
        )
        .unwrap(),
    );

    let tasks = [
        CombatTask {
            attacker: b1,
            target: Arc::clone(&target),
        },
        CombatTask {
            attacker: b2,
            target: Arc::clone(&target),
        },
    ];
    let handles: Vec<_> = tasks
        .into_iter()
        .map(|task| {
            let sim = Arc::clone(&sim);
            thread::spawn(move || sim.process(&task))
        })
        .collect();
    let kills = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|o| o.kill().is_some_and(|e| e.victim == "Target"))
        .count();

    assert_eq!(kills, 1);
    assert_eq!(sim.kills(), 1);
    assert_eq!(log.len(), 1);
    assert!(!target.is_alive());
}

#[test]
fn test_move_pass_keeps_everyone_on_map() {
    let params = Params {
        map_width: 20,
        map_height: 10,
        ..create_test_params()
    };
    let mut rng = SmallRng::seed_from_u64(42);
    let agents = populate(40, params.map_width, params.map_height, &mut rng);
    let sim = Simulation::new(params, agents).unwrap();

    for _ in 0..100 {
        sim.move_pass(&mut rng);
    }
    for agent in sim.roster().snapshot() {
        let pos = agent.position();
        assert!((0..20).contains(&pos.x));
        assert!((0..10).contains(&pos.y));
    }
}

#[test]
fn test_tick_counts_and_queues() {
    let mut rng = SmallRng::seed_from_u64(1);
    // A 1x1 map keeps both agents on the same cell whatever they roll
    let params = Params {
        map_width: 1,
        map_height: 1,
        ..create_test_params()
    };
    let agents = vec![
        Agent::shared(AgentKind::Bear, "Bear", 0, 0),
        Agent::shared(AgentKind::Duck, "Duck", 0, 0),
    ];
    let sim = Simulation::new(params, agents).unwrap();

    assert_eq!(sim.tick(&mut rng).unwrap(), 1);
    assert_eq!(sim.ticks(), 1);
    assert_eq!(sim.queue().len(), 1);
}

#[test]
fn test_new_rejects_out_of_bounds_agent() {
    let agents = vec![Agent::shared(AgentKind::Duck, "Lost", 100, 5)];
    let result = Simulation::new(create_test_params(), agents);
    assert!(matches!(result, Err(SimError::OutOfBounds { x: 100, .. })));
}

#[test]
fn test_queue_drains_remaining_tasks_then_stops() {
    let queue = CombatQueue::new();
    let a = Agent::shared(AgentKind::Bear, "A", 0, 0);
    let b = Agent::shared(AgentKind::Duck, "B", 0, 0);
    queue.push(CombatTask {
        attacker: Arc::clone(&a),
        target: Arc::clone(&b),
    });
    queue.begin_drain();

    assert!(queue.pop_blocking().is_some());
    assert!(queue.pop_blocking().is_none());
}

#[test]
fn test_drain_wakes_blocked_worker() {
    let queue = Arc::new(CombatQueue::new());
    let worker = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop_blocking().is_none())
    };
    thread::sleep(Duration::from_millis(20));
    queue.begin_drain();

    assert!(worker.join().unwrap(), "worker should exit with no task");
}

#[test]
fn test_run_start_and_stop() {
    let mut rng = SmallRng::seed_from_u64(9);
    let params = create_test_params();
    let agents = populate(params.population, params.map_width, params.map_height, &mut rng);
    let total = agents.len();

    let running = Simulation::new(params.clone(), agents)
        .unwrap()
        .start()
        .expect("workers start");
    assert_eq!(running.simulation().phase(), Phase::Ticking);

    thread::sleep(Duration::from_millis(100));
    let map = render_map(&running.simulation().roster().snapshot(), &params);
    assert!(map.starts_with("=== MAP (100x100) ==="));

    let summary = running.stop();
    assert!(summary.ticks > 0);
    assert!(summary.survivors.len() <= total);
    assert!(summary.survivors.iter().all(|s| s.alive));
    // Every kill removes at least one agent
    assert!(total - summary.survivors.len() >= summary.kills);
    assert_eq!(summary.unprocessed, 0);
}

#[test]
fn test_stop_leaves_no_queued_tasks() {
    // Ducks never fight, so every tick re-queues the same pairs
    let params = Params {
        map_width: 1,
        map_height: 1,
        tick_millis: 1,
        ..create_test_params()
    };
    for round in 0..20 {
        let agents = (0..12)
            .map(|i| Agent::shared(AgentKind::Duck, format!("Duck{round}_{i}"), 0, 0))
            .collect();
        let running = Simulation::new(params.clone(), agents)
            .unwrap()
            .start()
            .expect("workers start");
        thread::sleep(Duration::from_millis(3 + round % 5));

        let summary = running.stop();
        assert_eq!(summary.unprocessed, 0, "round {round} left tasks behind");
        assert_eq!(summary.kills, 0);
        assert_eq!(summary.survivors.len(), 12);
    }
}
