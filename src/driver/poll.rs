//! Poll loop: Native events to messages, cancellable.
//!
//! [`Driver::poll_msg`] returns at most one message without blocking.
//! [`Driver::poll_msgs`] keeps polling and forwards messages over a channel
//! until the [`CancelToken`] fires. Both the idle pause and the send race
//! against cancellation.

use super::driver::Driver;
use super::messages::Msg;
use super::translate::screen_msg;
use crate::backend::Backend;
use crate::error::{DriverError, Result};
use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};
use std::time::Duration;
use tracing::debug;

/// Pause between polls when no native event is pending.
pub const IDLE_WAIT: Duration = Duration::from_millis(2);

/// Cancelling end of a [`CancelToken`]. Cancels when `cancel` is called or
/// when it is dropped.
#[derive(Debug)]
pub struct Canceller {
    _tx: Sender<()>,
}

impl Canceller {
    /// Signal every clone of the paired token.
    pub fn cancel(self) {
        drop(self);
    }
}

/// Cancellation signal observed by [`Driver::poll_msgs`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Receiver<()>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self {
            rx: crossbeam_channel::never(),
        }
    }

    /// Whether the paired [`Canceller`] has fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }
}

/// Create a linked canceller and token.
pub fn cancellation() -> (Canceller, CancelToken) {
    let (tx, rx) = bounded(0);
    (Canceller { _tx: tx }, CancelToken { rx })
}

impl<B: Backend> Driver<B> {
    /// Take the next message, if any, without blocking.
    ///
    /// A pending redraw (after a tile manager change) is reported first as
    /// a [`Msg::Screen`]. Native events that do not translate to a message
    /// are skipped. Returns `None` before `init`.
    pub fn poll_msg(&mut self) -> Option<Msg> {
        if !self.init {
            return None;
        }
        if std::mem::take(&mut self.redraw_requested) {
            return Some(screen_msg(&self.geometry, &self.backend));
        }
        while let Some(event) = self.backend.poll_event() {
            if let Some(msg) = self.translator.translate(event, &self.geometry, &self.backend) {
                return Some(msg);
            }
        }
        None
    }

    /// Forward messages to `msgs` until `cancel` fires.
    ///
    /// Returns `Ok(())` on cancellation, even if a message was ready to be
    /// sent, and [`DriverError::ChannelClosed`] if the receiving side is
    /// gone.
    pub fn poll_msgs(&mut self, cancel: &CancelToken, msgs: &Sender<Msg>) -> Result<()> {
        loop {
            let msg = self.poll_msg();
            if cancel.is_cancelled() {
                debug!("poll loop cancelled");
                return Ok(());
            }
            match msg {
                None => select! {
                    recv(cancel.rx) -> _ => {
                        debug!("poll loop cancelled while idle");
                        return Ok(());
                    }
                    default(IDLE_WAIT) => {}
                },
                Some(msg) => select! {
                    recv(cancel.rx) -> _ => {
                        debug!("poll loop cancelled before send");
                        return Ok(());
                    }
                    send(msgs, msg) -> res => res.map_err(|_| DriverError::ChannelClosed)?,
                },
            }
        }
    }
}
