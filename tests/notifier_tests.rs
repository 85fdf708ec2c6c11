#![allow(missing_docs)]

use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;

use npc_arena::SimError;
use npc_arena::simulation::agent::Agent;
use npc_arena::simulation::event_log::EventLog;
use npc_arena::simulation::events::FightObserver;
use npc_arena::simulation::kind::AgentKind;
use npc_arena::simulation::sinks::FileSink;

/// Appends its tag to a shared journal so delivery order can be checked.
struct Tagged {
    tag: &'static str,
    journal: Arc<Mutex<Vec<&'static str>>>,
}

impl FightObserver for Tagged {
    fn on_fight(&self, _attacker: &Agent, _defender: &Agent, _won: bool) {
        self.journal.lock().unwrap().push(self.tag);
    }
}

#[test]
fn test_fan_out_in_registration_order() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let bear = Agent::new(AgentKind::Bear, "Bear", 0, 0);
    let duck = Agent::new(AgentKind::Duck, "Duck", 0, 0);

    for tag in ["first", "second", "third"] {
        bear.subscribe(Arc::new(Tagged {
            tag,
            journal: Arc::clone(&journal),
        }));
    }
    bear.notify_fight(&duck, true);

    assert_eq!(*journal.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn test_only_attacker_subscribers_are_notified() {
    let attacker_log = Arc::new(EventLog::new(5));
    let defender_log = Arc::new(EventLog::new(5));
    let bear = Agent::new(AgentKind::Bear, "Bear", 0, 0);
    let duck = Agent::new(AgentKind::Duck, "Duck", 0, 0);
    bear.subscribe(attacker_log.clone());
    duck.subscribe(defender_log.clone());

    bear.notify_fight(&duck, true);

    assert_eq!(attacker_log.len(), 1);
    assert!(defender_log.is_empty());
    let fight = &attacker_log.events()[0];
    assert_eq!(fight.attacker, "Bear");
    assert_eq!(fight.defender, "Duck");
    assert!(fight.won);
}

#[test]
fn test_event_log_keeps_newest_first_and_bounded() {
    let log = EventLog::new(3);
    for i in 0..5 {
        log.log(&format!("A{i}"), "T", true);
    }

    let names: Vec<String> = log.events().into_iter().map(|e| e.attacker).collect();
    assert_eq!(names, vec!["A4", "A3", "A2"]);

    log.clear();
    assert!(log.is_empty());
}

#[test]
fn test_concurrent_subscribe_and_notify() {
    let bear = Arc::new(Agent::new(AgentKind::Bear, "Bear", 0, 0));
    let duck = Arc::new(Agent::new(AgentKind::Duck, "Duck", 0, 0));
    let log = Arc::new(EventLog::new(10_000));

    let subscriber = {
        let bear = Arc::clone(&bear);
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for _ in 0..50 {
                bear.subscribe(log.clone());
            }
        })
    };
    let notifier = {
        let bear = Arc::clone(&bear);
        let duck = Arc::clone(&duck);
        thread::spawn(move || {
            for _ in 0..50 {
                bear.notify_fight(&duck, false);
            }
        })
    };
    subscriber.join().unwrap();
    notifier.join().unwrap();

    assert_eq!(bear.subscribers().len(), 50);
    // Each notify saw a whole list, never more than fifty entries
    assert!(log.len() <= 50 * 50);

    log.clear();
    bear.notify_fight(&duck, true);
    assert_eq!(log.len(), 50);
}

#[test]
fn test_file_sink_appends_lines() {
    let path = std::env::temp_dir().join(format!("npc_arena_sink_{}.log", std::process::id()));
    fs::remove_file(&path).ok();

    let sink = FileSink::open(&path).expect("Failed to open log sink");
    let bear = Agent::new(AgentKind::Bear, "Bear", 0, 0);
    let duck = Agent::new(AgentKind::Duck, "Duck", 0, 0);
    sink.on_fight(&bear, &duck, true);
    sink.on_fight(&bear, &duck, false);
    drop(sink);

    // Reopening appends rather than truncating
    let sink = FileSink::open(&path).expect("Failed to reopen log sink");
    sink.on_fight(&duck, &bear, true);
    drop(sink);

    let content = fs::read_to_string(&path).expect("Failed to read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("Bear killed Duck"));
    assert!(lines[1].ends_with("Bear attacked Duck and lost"));
    assert!(lines[2].ends_with("Duck killed Bear"));

    fs::remove_file(&path).ok();
}

#[test]
fn test_file_sink_open_failure_is_reported() {
    let path = std::env::temp_dir()
        .join("npc_arena_missing_dir")
        .join("nested")
        .join("log.txt");

    let result = FileSink::open(&path);
    assert!(matches!(result, Err(SimError::SinkOpen { .. })));
}

#[cfg(target_os = "linux")]
#[test]
fn test_failing_sink_does_not_stop_fan_out() {
    // Every write to /dev/full fails with "no space left on device"
    let full = FileSink::open("/dev/full").expect("Failed to open /dev/full");
    let log = Arc::new(EventLog::new(5));
    let bear = Agent::new(AgentKind::Bear, "Bear", 0, 0);
    let duck = Agent::new(AgentKind::Duck, "Duck", 0, 0);
    bear.subscribe(Arc::new(full));
    bear.subscribe(log.clone());

    bear.notify_fight(&duck, true);
    bear.notify_fight(&duck, false);

    let events = log.events();
    assert_eq!(events.len(), 2);
    assert!(!events[0].won);
    assert!(events[1].won);
}
