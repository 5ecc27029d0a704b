use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sharad_chargen::*;
use std::time::Duration;
use tokio::time::advance;

fn with_body(body: i32, agility: Option<i32>) -> ChargenState {
    let mut state = ChargenState::default();
    state.attributes.insert("body".to_string(), body);
    if let Some(agility) = agility {
        state.attributes.insert("agility".to_string(), agility);
    }
    state
}

fn numbered(n: i32) -> ChargenState {
    with_body(n, None)
}

#[tokio::test(start_paused = true)]
async fn test_burst_collapses_into_one_entry_with_first_label() {
    let initial = with_body(1, None);
    let mut history = HistoryManager::new(initial.clone(), &ChargenOptions::default());

    assert!(history.set_state(with_body(1, Some(1)), Some("inc agility")));
    advance(Duration::from_millis(250)).await;
    assert!(!history.tick());
    assert!(history.set_state(with_body(2, Some(1)), Some("inc body")));
    // The present follows every edit immediately.
    assert_eq!(history.present(), &with_body(2, Some(1)));

    advance(Duration::from_millis(250)).await;
    assert!(!history.tick(), "the second edit pushed the deadline out");
    assert!(history.past().is_empty());

    advance(Duration::from_millis(50)).await;
    assert!(history.tick());
    assert_eq!(history.past().len(), 1);
    assert_eq!(history.past()[0].label.as_deref(), Some("inc agility"));
    assert_eq!(history.past()[0].state, initial);
}

#[tokio::test(start_paused = true)]
async fn test_settle_waits_for_the_quiet_period() {
    let mut history = HistoryManager::new(numbered(1), &ChargenOptions::default());
    history.set_state(numbered(2), Some("raise body"));
    assert!(history.settle().await);
    assert_eq!(history.past().len(), 1);
    assert!(!history.settle().await);
}

#[test]
fn test_equal_state_is_ignored() {
    let mut history = HistoryManager::new(numbered(1), &ChargenOptions::default());
    assert!(!history.set_state(numbered(1), Some("nothing")));
    assert!(!history.has_pending());
    assert!(!history.can_undo());
}

#[test]
fn test_undo_redo_round_trip() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    for n in 1..=5 {
        history.set_state(numbered(n), Some(&format!("step {n}")));
        history.commit_pending();
    }
    assert!(history.can_undo());
    assert!(!history.can_redo());

    for n in (0..5).rev() {
        assert!(history.undo());
        assert_eq!(history.present(), &numbered(n));
    }
    assert!(!history.can_undo());
    assert!(history.can_redo());
    assert!(!history.undo());

    for n in 1..=5 {
        assert!(history.redo());
        assert_eq!(history.present(), &numbered(n));
    }
    assert!(history.can_undo());
    assert!(!history.can_redo());
    assert!(!history.redo());
}

#[test]
fn test_undo_keeps_the_label_of_the_undone_edit() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), Some("raise body"));
    history.commit_pending();

    history.undo();
    assert_eq!(history.future()[0].label.as_deref(), Some("raise body"));
    assert_eq!(history.future()[0].state, numbered(1));

    history.redo();
    assert_eq!(history.past()[0].label.as_deref(), Some("raise body"));
    assert_eq!(history.past()[0].state, numbered(0));
}

#[test]
fn test_undo_flushes_the_pending_burst_first() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), Some("raise body"));
    assert!(history.has_pending());
    assert!(history.can_undo());

    assert!(history.undo());
    assert_eq!(history.present(), &numbered(0));
    assert!(!history.has_pending());
    assert_eq!(history.future().len(), 1);
}

#[test]
fn test_new_edit_discards_redo_branch() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    for n in 1..=3 {
        history.set_state(numbered(n), None);
        history.commit_pending();
    }
    history.undo();
    history.undo();
    assert_eq!(history.future().len(), 2);

    history.set_state(numbered(10), Some("branch"));
    // The redo branch survives until the burst commits.
    assert_eq!(history.future().len(), 2);
    history.commit_pending();
    assert!(history.future().is_empty());
    assert!(!history.can_redo());
    assert_eq!(history.past().len(), 2);
}

#[test]
fn test_history_depth_is_capped() {
    let options = ChargenOptions {
        max_history: 3,
        ..Default::default()
    };
    let mut history = HistoryManager::new(numbered(0), &options);
    for n in 1..=6 {
        history.set_state(numbered(n), None);
        history.commit_pending();
    }
    assert_eq!(history.past().len(), 3);
    // The oldest entries were dropped.
    assert_eq!(history.past()[0].state, numbered(3));
}

#[test]
fn test_burst_that_returns_to_start_records_nothing() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), Some("there"));
    history.set_state(numbered(0), Some("and back"));
    assert!(!history.commit_pending());
    assert!(history.past().is_empty());
}

#[test]
fn test_labeler_fills_in_missing_labels() {
    let mut history =
        HistoryManager::new(ChargenState::default(), &ChargenOptions::default())
            .with_labeler(describe_change);

    let mut next = ChargenState::default();
    next.lifestyle = "high".to_string();
    next.skills.insert("pistols".to_string(), 3);
    history.set_state(next, None);
    history.commit_pending();
    assert_eq!(
        history.past()[0].label.as_deref(),
        Some("Changed Skills, Lifestyle")
    );

    let mut explicit = history.present().clone();
    explicit.character_notes = "Owes a favor".to_string();
    history.set_state(explicit, Some("Edit notes"));
    history.commit_pending();
    assert_eq!(history.past()[1].label.as_deref(), Some("Edit notes"));
}

#[test]
fn test_external_sync_does_not_touch_stacks() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), None);
    history.commit_pending();

    assert!(history.sync_external(numbered(7)));
    assert_eq!(history.present(), &numbered(7));
    assert_eq!(history.past().len(), 1);
    assert!(history.future().is_empty());
}

#[test]
fn test_stale_sync_after_undo_is_dropped_once() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), None);
    history.commit_pending();
    history.undo();
    assert!(history.is_navigating());

    // A push still carrying the undone state does not clobber the undo.
    assert!(!history.sync_external(numbered(1)));
    assert_eq!(history.present(), &numbered(0));
    assert!(!history.is_navigating());

    assert!(history.sync_external(numbered(4)));
    assert_eq!(history.present(), &numbered(4));
    assert_eq!(history.future().len(), 1);
}

#[test]
fn test_echo_after_undo_ends_navigation() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), None);
    history.commit_pending();
    history.undo();

    assert!(!history.sync_external(numbered(0)));
    assert!(!history.is_navigating());
}

#[test]
fn test_server_change_after_undo_is_adopted() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), None);
    history.commit_pending();
    history.undo();

    // The server normalized the restored state before echoing it.
    assert!(history.sync_external(numbered(7)));
    assert_eq!(history.present(), &numbered(7));
    assert!(!history.is_navigating());
    assert!(history.sync_external(numbered(8)));
    assert!(history.sync_external(numbered(9)));
    assert_eq!(history.present(), &numbered(9));
}

#[test]
fn test_redo_guards_against_the_state_it_left() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), None);
    history.commit_pending();
    history.undo();
    history.sync_external(numbered(0));

    assert!(history.redo());
    assert!(!history.sync_external(numbered(0)));
    assert_eq!(history.present(), &numbered(1));
}

#[test]
fn test_keyboard_shortcuts() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    history.set_state(numbered(1), None);
    history.commit_pending();

    let ctrl_z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
    let ctrl_y = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL);
    let cmd_shift_z = KeyEvent::new(
        KeyCode::Char('Z'),
        KeyModifiers::SUPER | KeyModifiers::SHIFT,
    );
    let plain_z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);

    assert!(history.handle_key(&ctrl_z));
    assert_eq!(history.present(), &numbered(0));
    assert!(history.handle_key(&ctrl_y));
    assert_eq!(history.present(), &numbered(1));
    assert!(history.handle_key(&ctrl_z));
    assert!(history.handle_key(&cmd_shift_z));
    assert_eq!(history.present(), &numbered(1));
    assert!(!history.handle_key(&plain_z));

    history.set_keyboard_shortcuts(false);
    assert!(!history.handle_key(&ctrl_z));
    assert_eq!(history.present(), &numbered(1));
}

#[test]
fn test_clear_drops_both_stacks() {
    let mut history = HistoryManager::new(numbered(0), &ChargenOptions::default());
    for n in 1..=2 {
        history.set_state(numbered(n), None);
        history.commit_pending();
    }
    history.undo();
    history.set_state(numbered(9), None);
    history.clear();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.present(), &numbered(9));
}

#[tokio::test(start_paused = true)]
async fn test_debounce_only_fires_after_quiet_period() {
    use sharad_chargen::debounce::Debounce;
    use tokio::time::Instant;

    let mut debounce = Debounce::new(Duration::from_millis(300));
    assert_eq!(debounce.delay(), Duration::from_millis(300));
    assert!(!debounce.fire_if_due(Instant::now()));

    let start = Instant::now();
    debounce.schedule_at(start);
    debounce.schedule_at(start + Duration::from_millis(100));
    assert_eq!(
        debounce.deadline(),
        Some(start + Duration::from_millis(400))
    );
    assert!(!debounce.fire_if_due(start + Duration::from_millis(399)));
    assert!(debounce.fire_if_due(start + Duration::from_millis(400)));
    assert!(!debounce.is_armed());

    debounce.schedule();
    debounce.expired().await;
    assert!(Instant::now() >= start + Duration::from_millis(300));
    assert!(debounce.cancel());
    assert!(!debounce.cancel());
}
