// One character generation session: the batcher talks to the server, the
// history tracks what the user sees, and the read-outs derive from it.
use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::batcher::{StateSink, UpdateBatcher};
use crate::calculations::{AttributeInputs, DerivedStats, calculate_derived_stats};
use crate::catalog::ChargenConstData;
use crate::dashboard::DashboardData;
use crate::error::Result;
use crate::history::HistoryManager;
use crate::keymap::{HistoryCommand, history_command};
use crate::labels::describe_change;
use crate::settings::ChargenOptions;
use crate::state::ChargenState;
use crate::validation::{ValidationResult, validate_chargen_state};

pub struct ChargenSession<S>
where
    S: StateSink<ChargenState>,
{
    catalog: ChargenConstData,
    batcher: UpdateBatcher<ChargenState, S>,
    history: HistoryManager<ChargenState>,
    keyboard_shortcuts: bool,
}

impl<S> ChargenSession<S>
where
    S: StateSink<ChargenState>,
{
    pub fn new(
        initial: ChargenState,
        catalog: ChargenConstData,
        sink: S,
        options: &ChargenOptions,
    ) -> Self {
        ChargenSession {
            catalog,
            history: HistoryManager::new(initial.clone(), options).with_labeler(describe_change),
            batcher: UpdateBatcher::new(Some(initial), sink, options),
            keyboard_shortcuts: options.enable_keyboard_shortcuts,
        }
    }

    /// What the user currently sees, pending edits included.
    pub fn present(&self) -> &ChargenState {
        self.history.present()
    }

    pub fn catalog(&self) -> &ChargenConstData {
        &self.catalog
    }

    pub fn history(&self) -> &HistoryManager<ChargenState> {
        &self.history
    }

    pub fn batcher(&self) -> &UpdateBatcher<ChargenState, S> {
        &self.batcher
    }

    pub fn is_locked(&self) -> bool {
        self.present().saved
    }

    fn record(&mut self, predicted: Option<ChargenState>, label: Option<&str>) -> bool {
        match predicted {
            Some(predicted) => self.history.set_state(predicted, label),
            None => false,
        }
    }

    /// Applies a partial state edit. Returns whether the visible state changed.
    pub fn edit(&mut self, patch: Value, label: Option<&str>) -> Result<bool> {
        if self.is_locked() {
            return Ok(false);
        }
        let predicted = self.batcher.queue_update(patch)?;
        Ok(self.record(predicted, label))
    }

    pub fn bump_skill(&mut self, skill: &str, delta: i32) -> Result<bool> {
        if self.is_locked() {
            return Ok(false);
        }
        let predicted = self.batcher.bump_skill(skill, delta)?;
        Ok(self.record(predicted, None))
    }

    pub fn set_skill_rating(&mut self, skill: &str, rating: i32) -> Result<bool> {
        if self.is_locked() {
            return Ok(false);
        }
        let predicted = self.batcher.set_skill_rating(skill, rating)?;
        Ok(self.record(predicted, None))
    }

    pub fn bump_attribute(&mut self, attribute: &str, delta: i32) -> Result<bool> {
        if self.is_locked() {
            return Ok(false);
        }
        let bounds = self
            .catalog
            .attribute_bounds(&self.present().metatype_species, attribute);
        let predicted = self.batcher.bump_attribute(attribute, delta, bounds)?;
        Ok(self.record(predicted, None))
    }

    pub fn set_attribute(&mut self, attribute: &str, value: i32) -> Result<bool> {
        if self.is_locked() {
            return Ok(false);
        }
        let bounds = self
            .catalog
            .attribute_bounds(&self.present().metatype_species, attribute);
        let predicted = self.batcher.set_attribute(attribute, value, bounds)?;
        Ok(self.record(predicted, None))
    }

    pub fn undo(&mut self) -> Result<bool> {
        if self.is_locked() || !self.history.undo() {
            return Ok(false);
        }
        self.batcher.queue_state(self.history.present().clone())?;
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        if self.is_locked() || !self.history.redo() {
            return Ok(false);
        }
        self.batcher.queue_state(self.history.present().clone())?;
        Ok(true)
    }

    /// Returns whether the key was an undo/redo shortcut.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<bool> {
        if !self.keyboard_shortcuts {
            return Ok(false);
        }
        match history_command(key) {
            Some(HistoryCommand::Undo) => self.undo().map(|_| true),
            Some(HistoryCommand::Redo) => self.redo().map(|_| true),
            None => Ok(false),
        }
    }

    /// Drives both debounce timers; call it from the host's tick.
    pub fn tick(&mut self) -> bool {
        let committed = self.history.tick();
        let flushed = self.batcher.tick();
        committed || flushed
    }

    pub async fn settle(&mut self) {
        self.history.settle().await;
        self.batcher.settle().await;
    }

    /// Commits the history burst and sends pending edits immediately.
    pub fn flush(&mut self) -> bool {
        self.history.commit_pending();
        self.batcher.flush_now()
    }

    /// Adopts a state pushed by the server. The visible state only follows
    /// when no local edits are waiting to be sent.
    pub fn receive_server_state(&mut self, state: ChargenState) {
        self.batcher.set_current(state.clone());
        if !self.batcher.has_pending() {
            self.history.sync_external(state);
        }
    }

    pub fn dashboard(&self) -> DashboardData {
        DashboardData::compute(self.present(), &self.catalog)
    }

    pub fn validation(&self) -> ValidationResult {
        let dashboard = self.dashboard();
        validate_chargen_state(Some(&dashboard), Some(self.present()))
    }

    pub fn derived_stats(&self) -> DerivedStats {
        let dashboard = self.dashboard();
        let inputs = AttributeInputs::from_attributes(
            &self.present().attributes,
            Some(dashboard.essence_remaining),
        );
        calculate_derived_stats(&inputs)
    }

    pub fn completion_percent(&self) -> i32 {
        self.dashboard().completion_percent(self.present().saved)
    }
}
