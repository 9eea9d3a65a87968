//! Driver: Tile rendering and input translation on one owning thread.
//!
//! The driver owns the native backend. Frames flow in, messages flow out,
//! and configuration changes from other threads are queued as actions:
//!
//! # Architecture
//!
//! ```text
//!                 Frame                       textures, copies
//! ┌─────────────┐ ───────▶ ┌──────────────┐ ─────────────────▶ ┌─────────┐
//! │ Application │          │    Driver    │                    │ Backend │
//! └─────────────┘ ◀─────── └──────────────┘ ◀───────────────── └─────────┘
//!        │          Msg        ▲      │         NativeEvent
//!        │                     │      └──▶ TextureCache
//!        │   DriverHandle      │
//!        └──────────────▶ ActionQueue (bounded, drop on full)
//!          (any thread)
//! ```
//!
//! [`Driver::flush`] and [`Driver::poll_msgs`] must run on the thread that
//! created the driver. [`DriverHandle`] is `Send` and may be used anywhere.

mod actions;
mod cache;
#[allow(clippy::module_inception)]
mod driver;
mod messages;
mod poll;
mod translate;

pub use actions::{Action, ActionQueue, ActionSender, DriverHandle, ACTION_QUEUE_CAPACITY};
pub use cache::TextureCache;
pub use driver::{Driver, DriverConfig, DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_WIDTH};
pub use messages::{Key, ModMask, MouseAction, Msg};
pub use poll::{cancellation, CancelToken, Canceller, IDLE_WAIT};
pub use translate::{mod_mask, screen_msg, EventTranslator};
