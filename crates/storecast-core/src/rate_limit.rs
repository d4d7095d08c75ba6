//! Per-chat cooldown gate.
//!
//! Each chat may have one accepted request per cooldown window. The map of
//! last-accepted instants is owned by the limiter (and thus by the
//! dispatcher that holds it); nothing is global.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use storecast_types::chat::ChatId;

/// Default minimum time between two accepted requests of the same chat.
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Per-chat cooldown rate limiter.
///
/// The check-and-record step runs under the map shard's write lock via the
/// entry API, so two concurrent calls for the same chat can never both be
/// accepted.
pub struct RateLimiter {
    cooldown: Duration,
    /// chat -> instant of the last accepted request.
    last_accepted: DashMap<ChatId, Instant>,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: DashMap::new(),
        }
    }

    /// Decide whether `chat_id` may make a request at `now`.
    ///
    /// Accepting records `now` as the chat's last accepted instant. Denying
    /// leaves the record untouched. An instant earlier than the recorded one
    /// counts as zero elapsed time.
    pub fn allow(&self, chat_id: ChatId, now: Instant) -> bool {
        match self.last_accepted.entry(chat_id) {
            Entry::Occupied(mut entry) => {
                if now.saturating_duration_since(*entry.get()) >= self.cooldown {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// Time left before `chat_id` is accepted again, or `None` if it would be
    /// accepted at `now`.
    pub fn remaining(&self, chat_id: ChatId, now: Instant) -> Option<Duration> {
        let last = *self.last_accepted.get(&chat_id)?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Number of chats seen so far.
    pub fn tracked_chats(&self) -> usize {
        self.last_accepted.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("cooldown", &self.cooldown)
            .field("tracked_chats", &self.last_accepted.len())
            .finish()
    }
}
