//! Optimistic update queue.
//!
//! Field edits are merged into one pending diff and shown to the UI at once
//! as a predicted state. Patches merge deeply with each other, but each
//! top-level field of the diff replaces the state's field whole, so a patch
//! must carry every key it wants to keep in a nested map. The merged state goes to the server only after the
//! edits go quiet for the debounce window, on an explicit flush, or when the
//! batcher is dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

use crate::catalog::AttributeBounds;
use crate::debounce::Debounce;
use crate::error::{ChargenError, Result};
use crate::merge::{deep_merge, empty_patch, is_empty_patch, overlay};
use crate::settings::ChargenOptions;
use crate::state::{ChargenState, Lockable};

pub const MIN_SKILL_RATING: i32 = 0;
pub const MAX_SKILL_RATING: i32 = 6;

/// Where the batcher sends its output: predicted states for the UI and
/// settled states for the server.
pub trait StateSink<T> {
    fn predicted(&mut self, state: &T);
    fn flush(&mut self, state: T);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent<T> {
    Predicted(T),
    Flush(T),
}

impl<T: Clone> StateSink<T> for UnboundedSender<SyncEvent<T>> {
    fn predicted(&mut self, state: &T) {
        if let Err(e) = self.send(SyncEvent::Predicted(state.clone())) {
            log::error!("Failed to send predicted state: {e:#?}");
        }
    }

    fn flush(&mut self, state: T) {
        if let Err(e) = self.send(SyncEvent::Flush(state)) {
            log::error!("Failed to send flushed state: {e:#?}");
        }
    }
}

/// Sink built from two closures.
pub struct CallbackSink<P, F> {
    on_predicted: P,
    on_flush: F,
}

impl<P, F> CallbackSink<P, F> {
    pub fn new(on_predicted: P, on_flush: F) -> Self {
        CallbackSink {
            on_predicted,
            on_flush,
        }
    }
}

impl<T, P, F> StateSink<T> for CallbackSink<P, F>
where
    P: FnMut(&T),
    F: FnMut(T),
{
    fn predicted(&mut self, state: &T) {
        (self.on_predicted)(state)
    }

    fn flush(&mut self, state: T) {
        (self.on_flush)(state)
    }
}

#[derive(Debug, Clone)]
struct PendingUpdate {
    replacement: Option<Value>, // Whole-state base set by `queue_state`.
    diff: Value,
}

impl Default for PendingUpdate {
    fn default() -> Self {
        PendingUpdate {
            replacement: None,
            diff: empty_patch(),
        }
    }
}

impl PendingUpdate {
    fn is_empty(&self) -> bool {
        self.replacement.is_none() && is_empty_patch(&self.diff)
    }
}

pub struct UpdateBatcher<T, S>
where
    T: Serialize + DeserializeOwned + Clone + Lockable,
    S: StateSink<T>,
{
    current: Option<T>,
    pending: Option<PendingUpdate>,
    debounce: Debounce,
    sink: S,
}

impl<T, S> UpdateBatcher<T, S>
where
    T: Serialize + DeserializeOwned + Clone + Lockable,
    S: StateSink<T>,
{
    pub fn new(current: Option<T>, sink: S, options: &ChargenOptions) -> Self {
        UpdateBatcher {
            current,
            pending: None,
            debounce: Debounce::new(options.debounce()),
            sink,
        }
    }

    /// Last state known to be authoritative.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_empty())
    }

    pub fn is_locked(&self) -> bool {
        self.current.as_ref().is_some_and(|state| state.is_locked())
    }

    /// Current state with the pending edits applied.
    pub fn predicted(&self) -> Result<Option<T>> {
        match &self.pending {
            Some(pending) => self.view_of(pending),
            None => Ok(self.current.clone()),
        }
    }

    fn view_of(&self, pending: &PendingUpdate) -> Result<Option<T>> {
        let mut base = match (&pending.replacement, &self.current) {
            (Some(replacement), _) => replacement.clone(),
            (None, Some(current)) => serde_json::to_value(current)?,
            (None, None) => return Ok(None),
        };
        overlay(&mut base, &pending.diff);
        serde_json::from_value(base)
            .map(Some)
            .map_err(|e| ChargenError::InvalidPatch(e.to_string()))
    }

    /// Merges `patch` into the pending diff and returns the predicted state.
    ///
    /// A patch that would not produce a valid state is rejected and leaves
    /// the pending diff as it was.
    pub fn queue_update(&mut self, patch: Value) -> Result<Option<T>> {
        if self.is_locked() {
            log::debug!("Ignoring update on a saved character");
            return Ok(None);
        }
        if !patch.is_object() {
            return Err(ChargenError::InvalidPatch(format!(
                "expected an object, got {patch}"
            )));
        }

        let mut next = self.pending.clone().unwrap_or_default();
        deep_merge(&mut next.diff, &patch);
        let view = self.view_of(&next)?;

        self.pending = Some(next);
        if let Some(view) = &view {
            self.sink.predicted(view);
        }
        self.debounce.schedule();
        Ok(view)
    }

    /// Queues a whole state, dropping any pending diff. Keys missing from
    /// `state` are removed when it flushes, which a patch cannot express.
    pub fn queue_state(&mut self, state: T) -> Result<()> {
        if self.is_locked() {
            log::debug!("Ignoring replacement of a saved character");
            return Ok(());
        }
        self.pending = Some(PendingUpdate {
            replacement: Some(serde_json::to_value(&state)?),
            diff: empty_patch(),
        });
        self.sink.predicted(&state);
        self.debounce.schedule();
        Ok(())
    }

    /// Sends the merged state now. Returns whether anything was flushed.
    pub fn flush_now(&mut self) -> bool {
        self.debounce.cancel();
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if pending.is_empty() {
            return false;
        }

        match self.view_of(&pending) {
            Ok(Some(merged)) => {
                log::debug!("Flushing batched chargen update");
                self.current = Some(merged.clone());
                self.sink.flush(merged);
                true
            }
            Ok(None) => {
                log::debug!("No current state yet, keeping the pending update");
                self.pending = Some(pending);
                false
            }
            Err(e) => {
                log::error!("Dropping pending update that no longer applies: {e:#}");
                false
            }
        }
    }

    /// Abandons the pending edits without sending them.
    pub fn cancel_pending(&mut self) {
        self.debounce.cancel();
        if self.pending.take().is_some() {
            if let Some(current) = &self.current {
                self.sink.predicted(current);
            }
        }
    }

    /// Takes in a fresh authoritative state from the server.
    pub fn set_current(&mut self, state: T) {
        self.current = Some(state);
        let view = match &self.pending {
            Some(pending) => self.view_of(pending).ok().flatten(),
            None => None,
        };
        if let Some(view) = view {
            self.sink.predicted(&view);
        }
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.debounce.fire_if_due(now) {
            self.flush_now()
        } else {
            false
        }
    }

    /// Waits out the debounce window and flushes.
    pub async fn settle(&mut self) -> bool {
        if !self.debounce.is_armed() {
            return false;
        }
        self.debounce.expired().await;
        self.flush_now()
    }
}

impl<S> UpdateBatcher<ChargenState, S>
where
    S: StateSink<ChargenState>,
{
    // Convenience edits read the changed key's authoritative value, not the
    // predicted one, so rapid repeats do not compound. They send the whole
    // predicted map with that key replaced, since the diff replaces the map
    // on flush.

    pub fn bump_skill(&mut self, skill: &str, delta: i32) -> Result<Option<ChargenState>> {
        let rating = self.current.as_ref().map_or(0, |state| state.skill(skill));
        self.set_skill_rating(skill, rating + delta)
    }

    pub fn set_skill_rating(&mut self, skill: &str, rating: i32) -> Result<Option<ChargenState>> {
        let mut skills = self
            .predicted()?
            .map(|state| state.skills)
            .unwrap_or_default();
        skills.insert(
            skill.to_string(),
            rating.clamp(MIN_SKILL_RATING, MAX_SKILL_RATING),
        );
        self.queue_update(json!({ "skills": skills }))
    }

    pub fn bump_attribute(
        &mut self,
        attribute: &str,
        delta: i32,
        bounds: AttributeBounds,
    ) -> Result<Option<ChargenState>> {
        let value = self
            .current
            .as_ref()
            .and_then(|state| state.attribute(attribute))
            .unwrap_or(bounds.min);
        self.set_attribute(attribute, value + delta, bounds)
    }

    pub fn set_attribute(
        &mut self,
        attribute: &str,
        value: i32,
        bounds: AttributeBounds,
    ) -> Result<Option<ChargenState>> {
        let mut attributes = self
            .predicted()?
            .map(|state| state.attributes)
            .unwrap_or_default();
        attributes.insert(attribute.to_string(), bounds.clamp(value));
        self.queue_update(json!({ "attributes": attributes }))
    }
}

impl<T, S> Drop for UpdateBatcher<T, S>
where
    T: Serialize + DeserializeOwned + Clone + Lockable,
    S: StateSink<T>,
{
    fn drop(&mut self) {
        if self.has_pending() {
            log::debug!("Batcher dropped with pending edits, flushing");
            self.flush_now();
        }
    }
}
