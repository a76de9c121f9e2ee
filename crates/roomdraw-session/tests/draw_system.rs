//! Integration tests for draw sessions and the draw manager.
//!
//! All async tests run on tokio's paused clock, so preview ticks fire
//! deterministically without real delays.

use std::collections::HashSet;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use roomdraw_core::{Assignment, Entry, Gender};
use roomdraw_session::{
    DrawConfig, DrawError, DrawId, DrawManager, DrawState, RollSession, TickPolicy,
};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

type Update = (Vec<Assignment>, bool);

fn entry(id: &str, gender: Gender, room: &str) -> Entry {
    Entry::new(id, gender, room).unwrap()
}

/// Two two-bed rooms and two singles.
fn dataset() -> Vec<Entry> {
    vec![
        entry("E1", Gender::Male, "南-16-1-1001-A"),
        entry("E2", Gender::Female, "南-16-1-1001-B"),
        entry("E3", Gender::Male, "南-16-1-1002-A"),
        entry("E4", Gender::Female, "南-16-1-1002-B"),
        entry("E5", Gender::Male, "南-16-1-1003"),
        entry("E6", Gender::Female, "南-16-1-1004"),
    ]
}

fn spawn(seed: u64) -> RollSession {
    RollSession::spawn(DrawId(1), DrawConfig::default().with_seed(seed))
}

/// A callback that forwards every update into a channel.
fn collector() -> (
    impl FnMut(&[Assignment], bool) + Send + 'static,
    mpsc::UnboundedReceiver<Update>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback = move |rows: &[Assignment], rolling: bool| {
        let _ = tx.send((rows.to_vec(), rolling));
    };
    (callback, rx)
}

fn noop() -> impl FnMut(&[Assignment], bool) + Send + 'static {
    |_: &[Assignment], _: bool| {}
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Update>) -> Vec<Update> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn assert_valid_result(entries: &[Entry], result: &[Assignment]) {
    let ids: HashSet<&str> = result.iter().map(|a| a.employee_id.as_str()).collect();
    let slots: HashSet<&str> = result.iter().map(|a| a.room_slot.as_str()).collect();
    assert_eq!(ids.len(), result.len(), "duplicate employee");
    assert_eq!(slots.len(), result.len(), "duplicate slot");
    assert!(result.len() <= entries.len());
    for row in result {
        assert!(entries.iter().any(|e| e.employee_id() == &row.employee_id));
        assert!(entries.iter().any(|e| e.room_slot() == row.room_slot));
    }
}

// =========================================================================
// Lifecycle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_new_session_is_idle_and_empty() {
    let session = spawn(1);
    assert_eq!(session.state().await.unwrap(), DrawState::Idle);
    assert!(session.current_data().await.unwrap().is_empty());
    assert!(session.original_data().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_initialize_loads_dataset_as_current_snapshot() {
    let session = spawn(1);
    let entries = dataset();
    session.initialize(entries.clone()).await.unwrap();

    assert_eq!(session.state().await.unwrap(), DrawState::Loaded);
    let current = session.current_data().await.unwrap();
    let expected: Vec<Assignment> = entries.iter().map(Assignment::from).collect();
    assert_eq!(current, expected);
    assert_eq!(session.original_data().await.unwrap(), entries);
}

#[tokio::test(start_paused = true)]
async fn test_start_rolling_without_dataset_is_ignored() {
    let session = spawn(1);
    let (callback, mut rx) = collector();

    let state = session.start_rolling(callback).await.unwrap();
    assert_eq!(state, DrawState::Idle);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(drain(&mut rx).is_empty());
}

// =========================================================================
// Rolling
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_rolling_publishes_preview_frames_each_tick() {
    let session = spawn(2);
    let entries = dataset();
    session.initialize(entries.clone()).await.unwrap();

    let (callback, mut rx) = collector();
    assert_eq!(session.start_rolling(callback).await.unwrap(), DrawState::Rolling);

    // Ticks at 50, 100 and 150 ms.
    tokio::time::sleep(Duration::from_millis(175)).await;

    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 3);
    for (rows, rolling) in &frames {
        assert!(*rolling);
        assert_eq!(rows.len(), entries.len());
        for row in rows {
            let person = entries
                .iter()
                .find(|e| e.employee_id() == &row.employee_id)
                .unwrap();
            assert_eq!(person.gender(), row.gender);
        }
    }

    // Previews are display-only; the snapshot is still the dataset.
    let current = session.current_data().await.unwrap();
    assert_eq!(current, entries.iter().map(Assignment::from).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_rolling_with_drop_policy() {
    let config = DrawConfig {
        tick_policy: TickPolicy::Drop,
        tick_interval: Duration::from_millis(20),
        ..DrawConfig::default().with_seed(3)
    };
    let session = RollSession::spawn(DrawId(1), config);
    session.initialize(dataset()).await.unwrap();

    let (callback, mut rx) = collector();
    session.start_rolling(callback).await.unwrap();

    // Ticks at 20, 40, 60, 80 and 100 ms.
    tokio::time::sleep(Duration::from_millis(110)).await;
    assert_eq!(drain(&mut rx).len(), 5);

    session.stop_rolling(noop()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_rolling_twice_keeps_first_callback() {
    let session = spawn(3);
    session.initialize(dataset()).await.unwrap();

    let (first, mut first_rx) = collector();
    let (second, mut second_rx) = collector();
    session.start_rolling(first).await.unwrap();
    assert_eq!(session.start_rolling(second).await.unwrap(), DrawState::Rolling);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(drain(&mut first_rx).len(), 2);
    assert!(drain(&mut second_rx).is_empty());
}

// =========================================================================
// Stopping
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_rolling_commits_a_valid_draw() {
    let session = spawn(4);
    let entries = dataset();
    session.initialize(entries.clone()).await.unwrap();
    session.start_rolling(noop()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;

    let (callback, mut rx) = collector();
    let result = session.stop_rolling(callback).await.unwrap();

    assert_eq!(session.state().await.unwrap(), DrawState::Committed);
    assert_eq!(result.len(), entries.len());
    assert_valid_result(&entries, &result);
    assert_eq!(session.current_data().await.unwrap(), result);

    let updates = drain(&mut rx);
    assert_eq!(updates, vec![(result, false)]);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_room_label_is_drawn_once() {
    let session = spawn(6);
    let mut entries = dataset();
    entries.push(entry("E7", Gender::Male, "南-16-1-1003"));
    session.initialize(entries.clone()).await.unwrap();
    session.start_rolling(noop()).await.unwrap();

    let result = session.stop_rolling(noop()).await.unwrap();
    assert_eq!(result.len(), entries.len() - 1);
    assert_valid_result(&entries, &result);
}

#[tokio::test(start_paused = true)]
async fn test_no_preview_frames_after_stop() {
    let session = spawn(5);
    session.initialize(dataset()).await.unwrap();

    let (callback, mut rx) = collector();
    session.start_rolling(callback).await.unwrap();
    tokio::time::sleep(Duration::from_millis(110)).await;
    session.stop_rolling(noop()).await.unwrap();

    let before = drain(&mut rx).len();
    assert_eq!(before, 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(drain(&mut rx).is_empty(), "tick fired after stop");
}

#[tokio::test(start_paused = true)]
async fn test_stop_twice_returns_identical_snapshot() {
    let session = spawn(6);
    session.initialize(dataset()).await.unwrap();
    session.start_rolling(noop()).await.unwrap();

    let first = session.stop_rolling(noop()).await.unwrap();
    let (callback, mut rx) = collector();
    let second = session.stop_rolling(callback).await.unwrap();

    assert_eq!(first, second);
    assert!(drain(&mut rx).is_empty(), "idle stop must not call back");
    assert_eq!(session.state().await.unwrap(), DrawState::Committed);
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_roll_returns_current_snapshot() {
    let session = spawn(7);
    assert!(session.stop_rolling(noop()).await.unwrap().is_empty());

    let entries = dataset();
    session.initialize(entries.clone()).await.unwrap();
    let snapshot = session.stop_rolling(noop()).await.unwrap();
    assert_eq!(snapshot, entries.iter().map(Assignment::from).collect::<Vec<_>>());
    assert_eq!(session.state().await.unwrap(), DrawState::Loaded);
}

#[tokio::test(start_paused = true)]
async fn test_roll_again_after_commit() {
    let session = spawn(8);
    let entries = dataset();
    session.initialize(entries.clone()).await.unwrap();

    for _ in 0..3 {
        assert_eq!(session.start_rolling(noop()).await.unwrap(), DrawState::Rolling);
        tokio::time::sleep(Duration::from_millis(60)).await;
        let result = session.stop_rolling(noop()).await.unwrap();
        assert_valid_result(&entries, &result);
        assert_eq!(session.state().await.unwrap(), DrawState::Committed);
    }
}

#[tokio::test(start_paused = true)]
async fn test_initialize_cancels_active_roll() {
    let session = spawn(9);
    session.initialize(dataset()).await.unwrap();

    let (callback, mut rx) = collector();
    session.start_rolling(callback).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    let replacement = vec![entry("X1", Gender::Female, "北-1-1-101")];
    session.initialize(replacement.clone()).await.unwrap();
    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 1);
    assert!(frames.iter().all(|(_, rolling)| *rolling));

    assert_eq!(session.state().await.unwrap(), DrawState::Loaded);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(session.original_data().await.unwrap(), replacement);
}

// =========================================================================
// Randomness and isolation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_same_seed_same_result() {
    let a = spawn(42);
    let b = RollSession::spawn_with_rng(DrawId(2), DrawConfig::default(), StdRng::seed_from_u64(42));

    let mut results = Vec::new();
    for session in [&a, &b] {
        session.initialize(dataset()).await.unwrap();
        session.start_rolling(noop()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(130)).await;
        results.push(session.stop_rolling(noop()).await.unwrap());
    }
    assert_eq!(results[0], results[1]);
}

#[tokio::test(start_paused = true)]
async fn test_sessions_do_not_interfere() {
    let a = spawn(10);
    let b = spawn(11);
    let data_a = dataset();
    let data_b = vec![
        entry("Z1", Gender::Female, "西-2-2-201-A"),
        entry("Z2", Gender::Female, "西-2-2-201-B"),
    ];
    a.initialize(data_a.clone()).await.unwrap();
    b.initialize(data_b.clone()).await.unwrap();

    let (callback_a, mut rx_a) = collector();
    a.start_rolling(callback_a).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    // b never rolled; a keeps rolling while b is queried.
    assert_eq!(b.state().await.unwrap(), DrawState::Loaded);
    assert_eq!(a.state().await.unwrap(), DrawState::Rolling);

    let result_a = a.stop_rolling(noop()).await.unwrap();
    assert_valid_result(&data_a, &result_a);
    assert!(drain(&mut rx_a).iter().all(|(rows, _)| rows.len() == data_a.len()));

    b.start_rolling(noop()).await.unwrap();
    let result_b = b.stop_rolling(noop()).await.unwrap();
    assert_valid_result(&data_b, &result_b);
    assert!(result_b.iter().all(|row| row.gender == Gender::Female));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_makes_session_unavailable() {
    let session = spawn(12);
    session.initialize(dataset()).await.unwrap();
    session.shutdown().await.unwrap();

    // Let the actor observe the shutdown.
    tokio::task::yield_now().await;
    let err = session.current_data().await.unwrap_err();
    assert!(matches!(err, DrawError::Unavailable(DrawId(1))));
}

// =========================================================================
// DrawManager
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_manager_creates_distinct_draws() {
    let mut manager = DrawManager::new(DrawConfig::default().with_seed(1));
    let first = manager.create_draw();
    let second = manager.create_draw_with_rng(StdRng::seed_from_u64(2));

    assert_ne!(first, second);
    assert_eq!(manager.draw_count(), 2);
    let mut ids = manager.draw_ids();
    ids.sort_by_key(|id| id.0);
    assert_eq!(ids, vec![first, second]);

    let session = manager.session(first).unwrap();
    assert_eq!(session.draw_id(), first);
    session.initialize(dataset()).await.unwrap();
    assert_eq!(
        manager.session(second).unwrap().state().await.unwrap(),
        DrawState::Idle
    );
}

#[tokio::test(start_paused = true)]
async fn test_manager_destroy_draw() {
    let mut manager = DrawManager::default();
    let draw_id = manager.create_draw();
    let handle = manager.session(draw_id).unwrap();

    manager.destroy_draw(draw_id).await.unwrap();
    assert_eq!(manager.draw_count(), 0);
    assert!(matches!(manager.session(draw_id), Err(DrawError::NotFound(_))));
    assert!(matches!(
        manager.destroy_draw(draw_id).await,
        Err(DrawError::NotFound(_))
    ));

    tokio::task::yield_now().await;
    assert!(handle.state().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_manager_shutdown_all() {
    let mut manager = DrawManager::default();
    manager.create_draw();
    manager.create_draw();
    manager.shutdown_all().await;
    assert_eq!(manager.draw_count(), 0);
}
