//! Animation player — loops one program on the LED strip until cancelled.
//!
//! The lifecycle is expressed in the types:
//!
//! 1. [`AnimationPlayer`] — idle, holds the program and the strip
//! 2. [`Playback`] — running on its own task (see [`AnimationPlayer::spawn`])
//! 3. [`Playback::stop`] — cancels, waits for the task, and returns a
//!    [`PlaybackSummary`]; the playback cannot be used afterwards

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use weatherbox_domain::animation::AnimationProgram;
use weatherbox_domain::condition::ConditionKey;

use crate::ports::LedStrip;

/// Counters reported once a playback has exited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Commands handed to the strip, including failed ones.
    pub commands_issued: u64,
    /// Commands the strip rejected.
    pub commands_failed: u64,
}

/// An idle player for one condition's program.
pub struct AnimationPlayer<L> {
    condition: ConditionKey,
    program: Arc<AnimationProgram>,
    strip: Arc<L>,
}

impl<L: LedStrip + 'static> AnimationPlayer<L> {
    pub fn new(condition: ConditionKey, program: Arc<AnimationProgram>, strip: Arc<L>) -> Self {
        Self {
            condition,
            program,
            strip,
        }
    }

    /// Play the program in a loop until `token` is cancelled.
    ///
    /// Each step's command is sent, then the step's duration is waited out
    /// unless cancellation arrives first. A rejected command is logged and
    /// the loop moves on to the next step. A command already in flight is
    /// never interrupted; cancellation is observed right after it.
    pub async fn play(&self, token: &CancellationToken) -> PlaybackSummary {
        let mut summary = PlaybackSummary::default();

        'playback: loop {
            for (index, step) in self.program.steps().iter().enumerate() {
                if token.is_cancelled() {
                    break 'playback;
                }

                summary.commands_issued += 1;
                if let Err(err) = self.strip.execute(step.command()).await {
                    summary.commands_failed += 1;
                    tracing::warn!(
                        %err,
                        condition = %self.condition,
                        step = index,
                        "error setting led colors"
                    );
                }

                tokio::select! {
                    biased;

                    () = token.cancelled() => break 'playback,
                    () = tokio::time::sleep(step.duration()) => {}
                }
            }
        }

        summary
    }

    /// Start playing on a new task bound to `token`.
    pub fn spawn(self, token: CancellationToken) -> Playback {
        let condition = self.condition.clone();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tracing::debug!(condition = %self.condition, steps = self.program.len(), "animation started");
            let summary = self.play(&task_token).await;
            tracing::debug!(
                condition = %self.condition,
                issued = summary.commands_issued,
                failed = summary.commands_failed,
                "animation stopped"
            );
            summary
        });

        Playback {
            condition,
            token,
            handle,
        }
    }
}

/// A running animation: its cancellation handle plus its completion signal.
pub struct Playback {
    condition: ConditionKey,
    token: CancellationToken,
    handle: JoinHandle<PlaybackSummary>,
}

impl Playback {
    /// The condition whose program is playing.
    #[must_use]
    pub fn condition(&self) -> &ConditionKey {
        &self.condition
    }

    /// Whether the playback task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the playback and wait until its task has exited.
    ///
    /// Once this returns no further command from this playback reaches the
    /// strip.
    pub async fn stop(self) -> PlaybackSummary {
        self.token.cancel();
        match self.handle.await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::error!(%err, condition = %self.condition, "animation task failed");
                PlaybackSummary::default()
            }
        }
    }
}
