use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use sharad_chargen::*;
use std::fs;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::advance;

type Events = UnboundedReceiver<SyncEvent<ChargenState>>;

fn load_state() -> ChargenState {
    let json_str = fs::read_to_string("tests/dummy_chargen_state.json")
        .expect("Failed to read dummy chargen state JSON file");
    serde_json::from_str(&json_str).expect("Failed to parse chargen state")
}

fn load_catalog() -> ChargenConstData {
    ChargenConstData::load_from_file("tests/dummy_chargen_catalog.json")
        .expect("Failed to load dummy catalog")
}

fn new_session(
    initial: ChargenState,
) -> (ChargenSession<UnboundedSender<SyncEvent<ChargenState>>>, Events) {
    let (tx, rx) = unbounded_channel();
    let session = ChargenSession::new(initial, load_catalog(), tx, &ChargenOptions::default());
    (session, rx)
}

fn flushed(rx: &mut Events) -> Vec<ChargenState> {
    let mut states = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SyncEvent::Flush(state) = event {
            states.push(state);
        }
    }
    states
}

#[tokio::test(start_paused = true)]
async fn test_edit_is_visible_then_flushed_and_recorded() {
    let (mut session, mut rx) = new_session(load_state());

    assert!(session.edit(json!({ "lifestyle": "high" }), None).unwrap());
    assert_eq!(session.present().lifestyle, "high");
    assert_eq!(session.dashboard().lifestyle_nuyen, 10_000);
    assert!(flushed(&mut rx).is_empty());

    advance(Duration::from_millis(300)).await;
    assert!(session.tick());

    let sent = flushed(&mut rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].lifestyle, "high");
    assert_eq!(session.history().past().len(), 1);
    assert_eq!(
        session.history().past()[0].label.as_deref(),
        Some("Changed Lifestyle")
    );
}

#[tokio::test(start_paused = true)]
async fn test_undo_sends_the_restored_state() {
    let initial = load_state();
    let (mut session, mut rx) = new_session(initial.clone());

    assert!(session.set_skill_rating("running", 6).unwrap());
    session.settle().await;
    let sent = flushed(&mut rx);
    assert_eq!(sent.len(), 1);
    // The whole skill map goes out, not just the edited rating.
    assert_eq!(sent[0].skills.len(), initial.skills.len());
    assert_eq!(sent[0].skill("running"), 6);

    assert!(session.undo().unwrap());
    assert_eq!(session.present(), &initial);
    assert!(session.history().can_redo());

    session.settle().await;
    let sent = flushed(&mut rx);
    assert_eq!(sent, vec![initial.clone()]);

    // The server echoes the undo back; it settles the navigation.
    session.receive_server_state(initial.clone());
    assert!(!session.history().is_navigating());

    assert!(session.redo().unwrap());
    assert_eq!(session.present().skill("running"), 6);
}

#[test]
fn test_server_push_waits_for_local_edits() {
    let (mut session, _rx) = new_session(load_state());
    session.edit(json!({ "religion": "Shinto" }), None).unwrap();

    let mut pushed = load_state();
    pushed.birthplace = "Tacoma".to_string();
    session.receive_server_state(pushed.clone());
    // Local edits are still in flight, so the visible state keeps them.
    assert_eq!(session.present().religion, "Shinto");
    assert_eq!(session.batcher().current(), Some(&pushed));

    assert!(session.flush());
    session.receive_server_state(ChargenState {
        religion: "Shinto".to_string(),
        ..pushed
    });
    assert_eq!(session.present().birthplace, "Tacoma");
    assert_eq!(session.present().religion, "Shinto");
}

#[test]
fn test_attribute_bumps_follow_metatype_bounds() {
    let elf = ChargenState {
        metatype_species: "elf".to_string(),
        ..Default::default()
    };
    let (mut session, _rx) = new_session(elf);

    assert!(session.bump_attribute("agility", 1).unwrap());
    assert_eq!(session.present().attribute("agility"), Some(3));

    assert!(session.set_attribute("charisma", 12).unwrap());
    assert_eq!(session.present().attribute("charisma"), Some(8));

    assert!(session.set_skill_rating("sneaking", 4).unwrap());
    session.flush();
    // Re-sending the flushed rating changes nothing on screen.
    assert!(!session.bump_skill("sneaking", 0).unwrap());
    assert_eq!(session.present().skill("sneaking"), 4);
}

#[test]
fn test_saved_character_is_read_only() {
    let saved = ChargenState {
        saved: true,
        ..load_state()
    };
    let (mut session, mut rx) = new_session(saved.clone());

    assert!(session.is_locked());
    assert!(!session.edit(json!({ "lifestyle": "low" }), None).unwrap());
    assert!(!session.bump_skill("pistols", 1).unwrap());
    assert!(!session.undo().unwrap());
    assert!(!session.flush());
    assert_eq!(session.present(), &saved);
    assert!(flushed(&mut rx).is_empty());
    assert_eq!(session.completion_percent(), 100);
}

#[test]
fn test_keyboard_undo() {
    let (mut session, _rx) = new_session(load_state());
    session.edit(json!({ "lifestyle": "low" }), None).unwrap();
    session.flush();

    let ctrl_z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
    assert!(session.handle_key(&ctrl_z).unwrap());
    assert_eq!(session.present().lifestyle, "middle");

    let plain = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
    assert!(!session.handle_key(&plain).unwrap());
}

#[test]
fn test_keyboard_shortcuts_can_be_disabled() {
    let options = ChargenOptions {
        enable_keyboard_shortcuts: false,
        ..Default::default()
    };
    let (tx, _rx) = unbounded_channel();
    let mut session = ChargenSession::new(load_state(), load_catalog(), tx, &options);
    session.edit(json!({ "lifestyle": "low" }), None).unwrap();
    session.flush();

    let ctrl_z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
    assert!(!session.handle_key(&ctrl_z).unwrap());
    assert_eq!(session.present().lifestyle, "low");
}

#[test]
fn test_read_outs_track_the_visible_state() {
    let (mut session, _rx) = new_session(load_state());
    assert!(session.validation().is_valid);
    assert_eq!(session.completion_percent(), 86);
    assert_eq!(session.derived_stats().social_limit, 4);

    assert!(session.set_skill_rating("sneaking", 6).unwrap());
    let result = session.validation();
    assert!(!result.is_valid);
    assert!(
        result
            .errors()
            .any(|issue| issue.message.contains("Overspent"))
    );
}
