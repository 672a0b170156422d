//! Grace service: an actor task that owns the grace tracker.
//!
//! Host events and expiry timers are both processed inside one Tokio
//! task, so a second respawn and an expiry for the same player can never
//! race. The outside world talks to the task through a [`GraceHandle`].

use std::ops::ControlFlow;
use std::path::Path;
use std::time::Duration;

use respite_grace::{GraceConfig, GracePolicy, GraceTracker};
use respite_protocol::{Codec, EndReason, HostEvent, Notice, PlayerId, Verdict};
use respite_tick::{TickConfig, TickScheduler};
use tokio::sync::{mpsc, oneshot};

use crate::RespiteError;

/// Default command channel size for the service actor.
const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Channel sender for outbound chat notices.
pub type NoticeSender = mpsc::UnboundedSender<Notice>;

/// Channel receiver the host drains to deliver chat notices.
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

/// Commands sent to the service actor.
///
/// Variants with a `reply` carry a oneshot channel the caller awaits.
enum GraceCommand {
    Event {
        event: HostEvent,
        reply: oneshot::Sender<Verdict>,
    },
    IsActive {
        player: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    Remaining {
        player: PlayerId,
        reply: oneshot::Sender<Duration>,
    },
    End {
        player: PlayerId,
        reason: EndReason,
        reply: oneshot::Sender<bool>,
    },
    ActiveCount {
        reply: oneshot::Sender<usize>,
    },
    Shutdown {
        reply: oneshot::Sender<usize>,
    },
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running grace service.
///
/// Cheap to clone; every clone talks to the same task. When the last
/// handle is dropped the service ends all grace periods and stops.
#[derive(Clone)]
pub struct GraceHandle {
    sender: mpsc::Sender<GraceCommand>,
}

impl GraceHandle {
    /// Forwards a host event. For damage events the returned verdict is
    /// the cancel flag; for everything else it is `Allow`.
    pub async fn dispatch(&self, event: HostEvent) -> Result<Verdict, RespiteError> {
        self.request(|reply| GraceCommand::Event { event, reply })
            .await
    }

    /// Decodes one host event with `codec` and dispatches it.
    pub async fn dispatch_encoded<C: Codec>(
        &self,
        codec: &C,
        data: &[u8],
    ) -> Result<Verdict, RespiteError> {
        let event = codec.decode_event(data)?;
        self.dispatch(event).await
    }

    /// Whether `player` is currently in grace.
    pub async fn is_active(&self, player: PlayerId) -> Result<bool, RespiteError> {
        self.request(|reply| GraceCommand::IsActive { player, reply })
            .await
    }

    /// Time left in `player`'s grace period; zero if none.
    pub async fn remaining(&self, player: PlayerId) -> Result<Duration, RespiteError> {
        self.request(|reply| GraceCommand::Remaining { player, reply })
            .await
    }

    /// Ends `player`'s grace period early. Returns `false` if they had none.
    ///
    /// The player is sent a notice for early-action reasons.
    pub async fn end(&self, player: PlayerId, reason: EndReason) -> Result<bool, RespiteError> {
        self.request(|reply| GraceCommand::End {
            player,
            reason,
            reply,
        })
        .await
    }

    /// Number of players currently in grace.
    pub async fn active_count(&self) -> Result<usize, RespiteError> {
        self.request(|reply| GraceCommand::ActiveCount { reply })
            .await
    }

    /// Stops the service, ending every grace period. Returns how many
    /// were still active.
    pub async fn shutdown(&self) -> Result<usize, RespiteError> {
        self.request(|reply| GraceCommand::Shutdown { reply })
            .await
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(oneshot::Sender<R>) -> GraceCommand,
    ) -> Result<R, RespiteError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| RespiteError::Unavailable)?;
        reply_rx.await.map_err(|_| RespiteError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct GraceService {
    policy: GracePolicy,
    scheduler: TickScheduler,
    receiver: mpsc::Receiver<GraceCommand>,
    notices: NoticeSender,
}

impl GraceService {
    /// Runs until a shutdown command arrives or every handle is dropped.
    async fn run(mut self) {
        tracing::info!(
            duration_secs = self.policy.tracker().config().duration_secs,
            tick_rate_hz = self.scheduler.tick_rate_hz(),
            "grace service started"
        );

        loop {
            // Nothing can expire while no one is in grace.
            if self.policy.tracker().is_empty() {
                self.scheduler.pause();
            } else {
                self.scheduler.resume();
            }

            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd).is_break() {
                            break;
                        }
                    }
                    None => {
                        self.stop();
                        break;
                    }
                },
                info = self.scheduler.wait_for_tick() => {
                    let expired = self.policy.tracker_mut().advance(info.elapsed_ticks());
                    self.deliver(expired);
                    self.scheduler.record_tick_end();
                }
            }
        }

        tracing::info!("grace service stopped");
    }

    fn handle_command(&mut self, cmd: GraceCommand) -> ControlFlow<()> {
        match cmd {
            GraceCommand::Event { event, reply } => {
                tracing::trace!(kind = event.kind(), player = ?event.player(), "host event");
                let outcome = self.policy.handle(&event);
                self.deliver(outcome.notices);
                let _ = reply.send(outcome.verdict);
            }
            GraceCommand::IsActive { player, reply } => {
                let _ = reply.send(self.policy.tracker().is_active(player));
            }
            GraceCommand::Remaining { player, reply } => {
                let _ = reply.send(self.policy.tracker().remaining(player));
            }
            GraceCommand::End {
                player,
                reason,
                reply,
            } => {
                let tracker = self.policy.tracker_mut();
                let ended = if reason.is_early() {
                    let notice = tracker.revoke(player, reason);
                    let ended = notice.is_some();
                    self.deliver(notice);
                    ended
                } else {
                    tracker.end(player, reason).is_some()
                };
                let _ = reply.send(ended);
            }
            GraceCommand::ActiveCount { reply } => {
                let _ = reply.send(self.policy.tracker().len());
            }
            GraceCommand::Shutdown { reply } => {
                let ended = self.stop();
                let _ = reply.send(ended);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Ends every grace period and returns how many there were.
    fn stop(&mut self) -> usize {
        let notices = self.policy.tracker_mut().end_all(EndReason::Shutdown);
        let ended = notices.len();
        self.deliver(notices);
        tracing::info!(ended, "grace service shutting down");
        ended
    }

    /// Sends notices to the host. Silently drops them if the host stopped
    /// listening.
    fn deliver(&self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            tracing::debug!(player = %notice.player, kind = ?notice.kind, "notice");
            let _ = self.notices.send(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and spawning a grace service.
///
/// # Example
///
/// ```rust,ignore
/// let (grace, notices) = RespiteBuilder::new()
///     .config(GraceConfig::with_duration_secs(30))
///     .spawn();
/// ```
pub struct RespiteBuilder {
    config: GraceConfig,
    tick_config: Option<TickConfig>,
    channel_size: usize,
}

impl RespiteBuilder {
    /// Creates a builder with the default 60-second grace period.
    pub fn new() -> Self {
        Self {
            config: GraceConfig::default(),
            tick_config: None,
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }

    /// Sets the grace configuration.
    pub fn config(mut self, config: GraceConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the grace configuration from a YAML file, falling back to
    /// the defaults if it is missing or malformed.
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config = GraceConfig::load_or_default(path);
        self
    }

    /// Like [`config_file`](Self::config_file) but fails on a bad file.
    pub fn try_config_file(mut self, path: impl AsRef<Path>) -> Result<Self, RespiteError> {
        self.config = GraceConfig::load(path)?;
        Ok(self)
    }

    /// Overrides tick scheduler settings. The tick rate always follows
    /// the grace config's `ticks-per-second`.
    pub fn tick_config(mut self, tick_config: TickConfig) -> Self {
        self.tick_config = Some(tick_config);
        self
    }

    /// Sets the command channel capacity (minimum 1).
    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size.max(1);
        self
    }

    /// Spawns the service task on the current Tokio runtime.
    ///
    /// Returns the handle for host events and the receiver for notices.
    /// An out-of-range grace config is replaced by the defaults.
    pub fn spawn(self) -> (GraceHandle, NoticeReceiver) {
        let config = self.config.validated();
        let mut tick_config = self
            .tick_config
            .unwrap_or_else(|| config.tick_config());
        if tick_config.tick_rate_hz != config.ticks_per_second {
            tracing::warn!(
                tick_rate_hz = tick_config.tick_rate_hz,
                ticks_per_second = config.ticks_per_second,
                "tick rate overridden to match grace config"
            );
            tick_config.tick_rate_hz = config.ticks_per_second;
        }

        let (tx, rx) = mpsc::channel(self.channel_size);
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        let service = GraceService {
            policy: GracePolicy::new(GraceTracker::new(config)),
            scheduler: TickScheduler::new(tick_config),
            receiver: rx,
            notices: notice_tx,
        };
        tokio::spawn(service.run());

        (GraceHandle { sender: tx }, notice_rx)
    }
}

impl Default for RespiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}
