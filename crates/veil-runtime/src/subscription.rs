#![forbid(unsafe_code)]

//! Background event sources feeding the interaction context.
//!
//! A [`Subscription`] runs on its own thread and sends messages through a
//! channel until its [`StopSignal`] fires or the receiver goes away. The only
//! built-in source is [`FrameTicker`], which stands in for the display's
//! refresh callback when the host has none.
//!
//! # How it works
//!
//! 1. [`spawn`] starts the subscription on a thread and returns a
//!    [`SubscriptionHandle`]
//! 2. The subscription loops, checking its stop signal between messages
//! 3. Dropping or stopping the handle triggers the signal

use std::sync::{Arc, Condvar, Mutex, PoisonError, mpsc};
use std::thread;
use std::time::Duration;

use web_time::Instant;

/// A unique identifier for a subscription.
pub type SubId = u64;

/// A subscription produces messages from an external event source.
pub trait Subscription<M: Send + 'static>: Send {
    /// Unique identifier, for logs.
    fn id(&self) -> SubId;

    /// Run until the channel disconnects or `stop` is triggered.
    ///
    /// Called on a background thread.
    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal);
}

/// Signal for stopping a subscription.
///
/// The subscription checks it periodically and exits its run loop when set.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl StopSignal {
    /// Create a new stop signal pair (signal, trigger).
    #[must_use]
    pub fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: Arc::clone(&inner),
        };
        (signal, StopTrigger { inner })
    }

    /// Check if the stop signal has been triggered.
    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if timed out.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            return true;
        }
        let (stopped, _) = cvar
            .wait_timeout_while(stopped, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

/// Trigger to stop a subscription from the owning side.
#[derive(Debug)]
pub struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    /// Signal the subscription to stop.
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        cvar.notify_all();
    }
}

/// A running subscription.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: SubId,
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Identifier of the running subscription.
    #[must_use]
    pub fn id(&self) -> SubId {
        self.id
    }

    /// Stop the subscription and join its thread.
    pub fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        tracing::debug!(message = "subscription.stop", sub_id = self.id);
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.trigger.stop();
        // Don't join in drop to avoid blocking.
    }
}

/// Start `sub` on a background thread.
pub fn spawn<M, S>(sub: S, sender: mpsc::Sender<M>) -> SubscriptionHandle
where
    M: Send + 'static,
    S: Subscription<M> + 'static,
{
    let id = sub.id();
    let (signal, trigger) = StopSignal::new();
    tracing::debug!(message = "subscription.start", sub_id = id);
    let thread = thread::spawn(move || sub.run(sender, signal));
    SubscriptionHandle {
        id,
        trigger,
        thread: Some(thread),
    }
}

// --- Built-in subscriptions ---

/// Emits one message per frame carrying the measured time since the last one.
///
/// # Example
///
/// ```ignore
/// let (tx, rx) = mpsc::channel();
/// let ticker = spawn(FrameTicker::new(Duration::from_millis(16), Msg::Frame), tx);
/// ```
pub struct FrameTicker<M: Send + 'static> {
    id: SubId,
    interval: Duration,
    make_msg: Box<dyn Fn(Duration) -> M + Send + Sync>,
}

impl<M: Send + 'static> FrameTicker<M> {
    /// Create a ticker with the given interval and message factory.
    pub fn new(interval: Duration, make_msg: impl Fn(Duration) -> M + Send + Sync + 'static) -> Self {
        // Stable ID from the interval.
        let id = interval.as_nanos() as u64 ^ 0x4652_414D; // "FRAM"
        Self {
            id,
            interval,
            make_msg: Box::new(make_msg),
        }
    }

    /// Configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<M: Send + 'static> Subscription<M> for FrameTicker<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal) {
        let mut last = Instant::now();
        loop {
            if stop.wait_timeout(self.interval) {
                break;
            }
            let now = Instant::now();
            let dt = now.duration_since(last);
            last = now;
            if sender.send((self.make_msg)(dt)).is_err() {
                break;
            }
        }
    }
}
