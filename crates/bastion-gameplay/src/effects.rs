//! Visual effect triggers and the bus that carries them.
//!
//! Simulation code never draws particles; it only reports *where* something
//! happened. Entities hold an `Arc<dyn EffectsSink>` and call
//! [`EffectsSink::trigger`]; the presentation layer drains the bus once per
//! frame.

use std::sync::Arc;

use bastion_common::Vec2;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Kinds of visual effect the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Sprint trail behind the player
    Boost,
    /// Sparks where a bolt struck a wall or the boss
    WallHit,
    /// Burst when the boss enters a new phase
    PhaseChange,
    /// Ring when the boss switches behaviour
    MovementChange,
}

/// A request to spawn an effect at a world position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectTrigger {
    /// Effect kind
    pub kind: EffectKind,
    /// World X
    pub x: f32,
    /// World Y
    pub y: f32,
    /// Direction in radians (0 for undirected effects)
    pub angle: f32,
}

impl EffectTrigger {
    /// Creates a trigger at `position`.
    #[must_use]
    pub fn new(kind: EffectKind, position: Vec2, angle: f32) -> Self {
        Self {
            kind,
            x: position.x,
            y: position.y,
            angle,
        }
    }

    /// World position of the trigger.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Receiver of effect triggers.
pub trait EffectsSink: Send + Sync {
    /// Requests an effect. Must not block.
    fn trigger(&self, effect: EffectTrigger);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EffectsSink for NullSink {
    fn trigger(&self, _effect: EffectTrigger) {}
}

/// Sink that keeps every trigger in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    effects: Mutex<Vec<EffectTrigger>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<EffectTrigger> {
        self.effects.lock().clone()
    }

    /// Number of recorded triggers of `kind`.
    #[must_use]
    pub fn count(&self, kind: EffectKind) -> usize {
        self.effects.lock().iter().filter(|e| e.kind == kind).count()
    }

    /// Clears the recording.
    pub fn clear(&self) {
        self.effects.lock().clear();
    }
}

impl EffectsSink for RecordingSink {
    fn trigger(&self, effect: EffectTrigger) {
        self.effects.lock().push(effect);
    }
}

/// Cloneable handle that publishes into an [`EffectBus`].
#[derive(Debug, Clone)]
pub struct EffectSender {
    sender: Sender<EffectTrigger>,
}

impl EffectsSink for EffectSender {
    fn trigger(&self, effect: EffectTrigger) {
        // A closed bus means nobody is drawing; nothing to report
        if let Err(TrySendError::Full(effect)) = self.sender.try_send(effect) {
            trace!("Effect bus full, dropping {:?}", effect.kind);
        }
    }
}

/// Bounded channel of effect triggers.
#[derive(Debug)]
pub struct EffectBus {
    /// Sender for publishing effects
    sender: Sender<EffectTrigger>,
    /// Receiver for draining effects
    receiver: Receiver<EffectTrigger>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EffectBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EffectBus {
    /// Creates a new effect bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Returns a sink handle for injection into entities.
    #[must_use]
    pub fn sink(&self) -> Arc<dyn EffectsSink> {
        Arc::new(EffectSender {
            sender: self.sender.clone(),
        })
    }

    /// Drains all pending effects.
    pub fn drain(&self) -> Vec<EffectTrigger> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending effects.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
