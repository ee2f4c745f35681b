//! Background sweeper for expired OTP records
//!
//! Read paths in the store already purge expired records lazily, so the
//! sweeper is only there to bound memory held by codes nobody asks about again.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use otp_shared::config::OtpConfig;

use super::store::OtpStore;

/// Periodic sweep of expired records
pub struct OtpSweeper {
    store: Arc<OtpStore>,
    interval: Duration,
}

impl OtpSweeper {
    /// Create a sweeper running every `interval`
    pub fn new(store: Arc<OtpStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Create a sweeper using `sweep_interval_seconds` from the configuration
    pub fn from_config(store: Arc<OtpStore>, config: &OtpConfig) -> Self {
        Self::new(store, Duration::from_secs(config.sweep_interval_seconds))
    }

    /// Run a single sweep; returns the number of records removed
    pub fn run_once(&self) -> usize {
        let removed = self.store.sweep_expired();
        if removed > 0 {
            info!(removed, event = "otp_sweep", "Swept expired OTP records");
        } else {
            debug!(event = "otp_sweep", "No expired OTP records to sweep");
        }
        removed
    }

    /// Start the sweeper as a background task
    ///
    /// The first sweep runs one full interval after start. The task stops when
    /// [`SweeperHandle::shutdown`] is called or the handle is dropped.
    pub fn start(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            info!(
                interval_seconds = self.interval.as_secs(),
                "OTP sweeper started"
            );

            let mut timer = tokio::time::interval_at(
                tokio::time::Instant::now() + self.interval,
                self.interval,
            );
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        self.run_once();
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("OTP sweeper stopped");
        });

        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running sweeper
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop and wait up to `timeout` for it to finish
    ///
    /// If the task does not finish in time it is aborted.
    ///
    /// # Returns
    ///
    /// `true` if the task stopped cleanly within the timeout
    pub async fn shutdown(self, timeout: Duration) -> bool {
        // A send error means the task already exited and dropped its receiver
        let _ = self.shutdown.send(true);

        let mut task = self.task;
        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!(error = %e, "OTP sweeper task failed");
                false
            }
            Err(_) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "OTP sweeper did not stop in time; aborting"
                );
                task.abort();
                false
            }
        }
    }

    /// Whether the background task has finished
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
