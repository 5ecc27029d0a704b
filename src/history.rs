//! Undo/redo history over arbitrary snapshots.
//!
//! Edits land in `present` immediately. A burst of edits arriving within the
//! debounce window becomes a single history entry holding the snapshot from
//! before the burst, labelled with the first label the burst carried.

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use std::collections::VecDeque;
use std::mem;
use tokio::time::Instant;

use crate::debounce::Debounce;
use crate::keymap::{HistoryCommand, history_command};
use crate::settings::ChargenOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    pub state: T,
    pub timestamp: DateTime<Local>,
    pub label: Option<String>,
}

impl<T> HistoryEntry<T> {
    fn new(state: T, label: Option<String>) -> Self {
        HistoryEntry {
            state,
            timestamp: Local::now(),
            label,
        }
    }
}

/// Builds a label from the snapshot before a burst and the one after it.
pub type Labeler<T> = fn(Option<&T>, &T) -> String;

struct PendingBurst<T> {
    base: T,
    label: Option<String>,
}

pub struct HistoryManager<T> {
    past: Vec<HistoryEntry<T>>,
    present: T,
    future: VecDeque<HistoryEntry<T>>,
    pending: Option<PendingBurst<T>>,
    debounce: Debounce,
    max_history: usize,
    keyboard_shortcuts: bool,
    navigated_from: Option<T>, // State an undo/redo just left, until the next external sync.
    labeler: Option<Labeler<T>>,
}

impl<T: Clone + PartialEq> HistoryManager<T> {
    pub fn new(initial: T, options: &ChargenOptions) -> Self {
        HistoryManager {
            past: Vec::new(),
            present: initial,
            future: VecDeque::new(),
            pending: None,
            debounce: Debounce::new(options.debounce()),
            max_history: options.max_history,
            keyboard_shortcuts: options.enable_keyboard_shortcuts,
            navigated_from: None,
            labeler: None,
        }
    }

    pub fn with_labeler(mut self, labeler: Labeler<T>) -> Self {
        self.labeler = Some(labeler);
        self
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past(&self) -> &[HistoryEntry<T>] {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<HistoryEntry<T>> {
        &self.future
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_navigating(&self) -> bool {
        self.navigated_from.is_some()
    }

    pub fn set_keyboard_shortcuts(&mut self, enabled: bool) {
        self.keyboard_shortcuts = enabled;
    }

    /// Records a new edit. Returns `false` when `state` equals the present
    /// snapshot and nothing happened.
    pub fn set_state(&mut self, state: T, label: Option<&str>) -> bool {
        if state == self.present {
            return false;
        }
        self.navigated_from = None;

        let previous = mem::replace(&mut self.present, state);
        match self.pending.as_mut() {
            Some(burst) => {
                if burst.label.is_none() {
                    burst.label = label.map(str::to_string);
                }
            }
            None => {
                self.pending = Some(PendingBurst {
                    base: previous,
                    label: label.map(str::to_string),
                });
            }
        }
        self.debounce.schedule();
        true
    }

    /// Pushes the pending burst onto the undo stack right away.
    pub fn commit_pending(&mut self) -> bool {
        self.debounce.cancel();
        let Some(burst) = self.pending.take() else {
            return false;
        };
        if burst.base == self.present {
            log::debug!("History burst ended where it started, nothing to record");
            return false;
        }

        let label = burst.label.or_else(|| {
            self.labeler
                .map(|labeler| labeler(Some(&burst.base), &self.present))
        });
        log::debug!("History commit: {}", label.as_deref().unwrap_or("unlabelled"));

        self.past.push(HistoryEntry::new(burst.base, label));
        self.trim_past();
        self.future.clear();
        true
    }

    fn trim_past(&mut self) {
        if self.past.len() > self.max_history {
            let excess = self.past.len() - self.max_history;
            self.past.drain(..excess);
        }
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.debounce.fire_if_due(now) {
            self.commit_pending()
        } else {
            false
        }
    }

    /// Waits out the debounce window and commits the burst, if any.
    pub async fn settle(&mut self) -> bool {
        if !self.debounce.is_armed() {
            return false;
        }
        self.debounce.expired().await;
        self.commit_pending()
    }

    pub fn undo(&mut self) -> bool {
        self.commit_pending();
        let Some(entry) = self.past.pop() else {
            return false;
        };
        let undone = mem::replace(&mut self.present, entry.state);
        log::debug!("Undo: {}", entry.label.as_deref().unwrap_or("unlabelled"));
        self.navigated_from = Some(undone.clone());
        self.future.push_front(HistoryEntry::new(undone, entry.label));
        true
    }

    pub fn redo(&mut self) -> bool {
        self.commit_pending();
        let Some(entry) = self.future.pop_front() else {
            return false;
        };
        let redone_from = mem::replace(&mut self.present, entry.state);
        log::debug!("Redo: {}", entry.label.as_deref().unwrap_or("unlabelled"));
        self.navigated_from = Some(redone_from.clone());
        self.past.push(HistoryEntry::new(redone_from, entry.label));
        self.trim_past();
        true
    }

    /// Adopts a snapshot that arrived out of band without recording it.
    ///
    /// The first sync after an undo/redo ends the navigation. If it still
    /// carries the state the undo/redo left, it is stale and dropped; any
    /// other state is adopted.
    pub fn sync_external(&mut self, state: T) -> bool {
        if let Some(left) = self.navigated_from.take() {
            if state == left {
                log::debug!("Dropping stale external state after undo/redo");
                return false;
            }
        }
        if state == self.present {
            return false;
        }
        self.present = state;
        true
    }

    pub fn clear(&mut self) {
        self.debounce.cancel();
        self.pending = None;
        self.navigated_from = None;
        self.past.clear();
        self.future.clear();
    }

    /// Runs the history command bound to `key`. Returns whether the key was
    /// consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.keyboard_shortcuts {
            return false;
        }
        match history_command(key) {
            Some(HistoryCommand::Undo) => {
                self.undo();
                true
            }
            Some(HistoryCommand::Redo) => {
                self.redo();
                true
            }
            None => false,
        }
    }
}
