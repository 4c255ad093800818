//! Character notifications.
//!
//! Observers (health bars, particle spawners, loggers) register a
//! [`CharacterListener`] on a character. Events are delivered synchronously,
//! in registration order, while the emitting operation is still running.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use brawl_common::PlayerId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::ElementalMode;

/// Health changed (or was resynchronized by a reset).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthChange {
    /// Character whose health changed
    pub player_id: PlayerId,
    /// Health after the change
    pub current_health: f32,
    /// Maximum health
    pub max_health: f32,
    /// Damage taken; zero for a reset
    pub damage: f32,
}

/// Elemental mode changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChange {
    /// Character whose mode changed
    pub player_id: PlayerId,
    /// Mode now active
    pub new_mode: ElementalMode,
}

/// Notification emitted by a character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CharacterEvent {
    /// Health changed
    HealthChanged(HealthChange),
    /// Elemental mode changed
    ModeChanged(ModeChange),
}

impl CharacterEvent {
    /// Character that emitted the event.
    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        match self {
            Self::HealthChanged(change) => change.player_id,
            Self::ModeChanged(change) => change.player_id,
        }
    }
}

/// Receives character notifications.
pub trait CharacterListener {
    /// Handles an event.
    fn on_event(&mut self, event: &CharacterEvent);
}

impl<F> CharacterListener for F
where
    F: FnMut(&CharacterEvent),
{
    fn on_event(&mut self, event: &CharacterEvent) {
        self(event);
    }
}

/// Ordered list of listeners owned by one character.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<Box<dyn CharacterListener>>,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventEmitter {
    /// Creates an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener after all existing ones.
    pub fn subscribe(&mut self, listener: Box<dyn CharacterListener>) {
        self.listeners.push(listener);
    }

    /// Delivers an event to every listener in registration order.
    pub fn emit(&mut self, event: &CharacterEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Listener that records every event it sees.
///
/// Cloning yields another handle to the same record, so one handle can be
/// subscribed while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<CharacterEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of all recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<CharacterEvent> {
        self.events.borrow().clone()
    }

    /// Removes and returns all recorded events.
    pub fn drain(&self) -> Vec<CharacterEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Recorded mode changes.
    #[must_use]
    pub fn mode_changes(&self) -> Vec<ModeChange> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                CharacterEvent::ModeChanged(change) => Some(*change),
                CharacterEvent::HealthChanged(_) => None,
            })
            .collect()
    }

    /// Recorded health changes.
    #[must_use]
    pub fn health_changes(&self) -> Vec<HealthChange> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                CharacterEvent::HealthChanged(change) => Some(*change),
                CharacterEvent::ModeChanged(_) => None,
            })
            .collect()
    }
}

impl CharacterListener for EventLog {
    fn on_event(&mut self, event: &CharacterEvent) {
        self.events.borrow_mut().push(*event);
    }
}

/// Listener that writes every event to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl CharacterListener for TracingListener {
    fn on_event(&mut self, event: &CharacterEvent) {
        match event {
            CharacterEvent::HealthChanged(change) => debug!(
                player = %change.player_id,
                health = change.current_health,
                max = change.max_health,
                damage = change.damage,
                "health changed"
            ),
            CharacterEvent::ModeChanged(change) => debug!(
                player = %change.player_id,
                mode = change.new_mode.name(),
                "mode changed"
            ),
        }
    }
}
