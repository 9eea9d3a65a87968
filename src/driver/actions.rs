//! Action queue: Configuration changes handed to the owning thread.
//!
//! Native windowing calls must happen on the thread that owns the driver.
//! Configuration requests from anywhere else are queued as [`Action`]s and
//! applied at the start of the next flush, in the order they were queued.
//!
//! The queue is a small bounded channel and enqueueing never blocks: when it
//! is full the request is dropped. Actions describe a desired end state
//! (a tile manager, a scale, a title), so a caller that needs a change to
//! stick should check the driver state later and retry.

use crate::tiles::TileManager;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Number of actions that can wait for the next flush.
pub const ACTION_QUEUE_CAPACITY: usize = 4;

/// A deferred configuration change.
pub enum Action {
    /// Swap the tile manager. Clears the texture cache and resizes the
    /// window for the new tile size.
    SetTileManager(Arc<dyn TileManager>),
    /// Change the render scale and resize the window accordingly.
    SetScale {
        /// Horizontal factor.
        x: f32,
        /// Vertical factor.
        y: f32,
    },
    /// Change the window title.
    SetTitle(String),
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetTileManager(tm) => f
                .debug_tuple("SetTileManager")
                .field(&tm.tile_size())
                .finish(),
            Self::SetScale { x, y } => f.debug_struct("SetScale").field("x", x).field("y", y).finish(),
            Self::SetTitle(title) => f.debug_tuple("SetTitle").field(title).finish(),
        }
    }
}

/// Bounded, non-blocking FIFO of pending actions.
#[derive(Debug)]
pub struct ActionQueue {
    tx: Sender<Action>,
    rx: Receiver<Action>,
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionQueue {
    /// Create an empty queue with [`ACTION_QUEUE_CAPACITY`] slots.
    pub fn new() -> Self {
        let (tx, rx) = bounded(ACTION_QUEUE_CAPACITY);
        Self { tx, rx }
    }

    /// A sending end usable from any thread.
    pub fn sender(&self) -> ActionSender {
        ActionSender {
            tx: self.tx.clone(),
        }
    }

    /// Queue an action. Returns `false` if it was dropped.
    pub fn push(&self, action: Action) -> bool {
        try_push(&self.tx, action)
    }

    /// Take the oldest pending action.
    pub fn pop(&self) -> Option<Action> {
        self.rx.try_recv().ok()
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no action is pending.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Cloneable sending end of an [`ActionQueue`].
#[derive(Debug, Clone)]
pub struct ActionSender {
    tx: Sender<Action>,
}

impl ActionSender {
    /// Queue an action. Returns `false` if it was dropped.
    pub fn push(&self, action: Action) -> bool {
        try_push(&self.tx, action)
    }
}

fn try_push(tx: &Sender<Action>, action: Action) -> bool {
    match tx.try_send(action) {
        Ok(()) => true,
        Err(TrySendError::Full(action)) => {
            debug!(?action, "action queue full, dropping");
            false
        }
        Err(TrySendError::Disconnected(action)) => {
            debug!(?action, "driver gone, dropping action");
            false
        }
    }
}

/// Thread-safe handle for configuring a running driver.
///
/// Obtained from [`Driver::handle`](super::Driver::handle). All methods are
/// best-effort: changes are queued and take effect at the driver's next
/// flush (or at `init` if the driver is not running yet). Each method
/// returns whether the request was queued.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    actions: ActionSender,
    keep_alive: Arc<AtomicBool>,
}

impl DriverHandle {
    pub(crate) const fn new(actions: ActionSender, keep_alive: Arc<AtomicBool>) -> Self {
        Self {
            actions,
            keep_alive,
        }
    }

    /// Swap the tile manager.
    pub fn set_tile_manager(&self, tiles: Arc<dyn TileManager>) -> bool {
        self.actions.push(Action::SetTileManager(tiles))
    }

    /// Change the render scale. Integer values give the most accurate
    /// results.
    pub fn set_scale(&self, scale_x: f32, scale_y: f32) -> bool {
        self.actions.push(Action::SetScale {
            x: scale_x,
            y: scale_y,
        })
    }

    /// Change the window title.
    pub fn set_window_title(&self, title: impl Into<String>) -> bool {
        self.actions.push(Action::SetTitle(title.into()))
    }

    /// Make the next `close` keep the native session and window alive.
    pub fn keep_session_alive(&self) {
        self.keep_alive.store(true, Ordering::Relaxed);
    }
}
