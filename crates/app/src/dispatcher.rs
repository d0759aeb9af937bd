//! Dispatcher — keeps at most one animation playing for the current
//! condition.
//!
//! Owned by the polling task of a session, which calls [`Dispatcher::dispatch`]
//! serially. That ownership is what guarantees a single player.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use weatherbox_domain::catalog::AnimationCatalog;
use weatherbox_domain::condition::ConditionKey;

use crate::player::{AnimationPlayer, Playback, PlaybackSummary};
use crate::ports::LedStrip;

/// When a dispatch replaces the running animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Restart only when the condition differs from the one playing.
    #[default]
    OnChange,
    /// Restart on every dispatch, even for the same condition.
    Always,
}

/// What a single dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing was playing; a player was started.
    Started,
    /// The previous player was stopped and a new one started.
    Restarted { previous: ConditionKey },
    /// The same condition is already playing.
    Unchanged,
    /// The catalog has no program for the key; playback left as it was.
    Unknown,
}

pub struct Dispatcher<L> {
    strip: Arc<L>,
    catalog: Arc<AnimationCatalog>,
    policy: RestartPolicy,
    session: CancellationToken,
    current: Option<Playback>,
}

impl<L: LedStrip + 'static> Dispatcher<L> {
    /// Players started by this dispatcher are bound to children of `session`.
    pub fn new(
        strip: Arc<L>,
        catalog: Arc<AnimationCatalog>,
        policy: RestartPolicy,
        session: CancellationToken,
    ) -> Self {
        Self {
            strip,
            catalog,
            policy,
            session,
            current: None,
        }
    }

    /// Make `key`'s program the one playing.
    ///
    /// A running player is stopped, and its task awaited, before the next
    /// one is spawned.
    pub async fn dispatch(&mut self, key: ConditionKey) -> DispatchOutcome {
        let Some(program) = self.catalog.lookup(&key) else {
            tracing::warn!(condition = %key, "no animation for condition, playback unchanged");
            return DispatchOutcome::Unknown;
        };

        if self.policy == RestartPolicy::OnChange
            && self
                .current
                .as_ref()
                .is_some_and(|playback| playback.condition() == &key && playback.is_running())
        {
            return DispatchOutcome::Unchanged;
        }

        let previous = match self.current.take() {
            Some(playback) => {
                let previous = playback.condition().clone();
                playback.stop().await;
                Some(previous)
            }
            None => None,
        };

        tracing::info!(condition = %key, "playing animation");
        let player = AnimationPlayer::new(key, program, Arc::clone(&self.strip));
        self.current = Some(player.spawn(self.session.child_token()));

        match previous {
            Some(previous) => DispatchOutcome::Restarted { previous },
            None => DispatchOutcome::Started,
        }
    }

    /// The condition currently playing, if any.
    #[must_use]
    pub fn current_condition(&self) -> Option<&ConditionKey> {
        self.current.as_ref().map(Playback::condition)
    }

    /// Stop the current player and wait for it to exit.
    pub async fn stop(&mut self) -> Option<PlaybackSummary> {
        let playback = self.current.take()?;
        Some(playback.stop().await)
    }
}
