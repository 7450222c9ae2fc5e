//! Diagram render throttling
//!
//! Rendering a unit circle costs far more than answering a trig question, so
//! each user may start at most one render per cooldown period. Entries expire
//! on their own once the cooldown has passed.

use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Tracks when each user last started a render.
#[derive(Clone, Debug)]
pub struct RenderCooldown {
    /// user_id -> start of the last accepted render
    cache: Cache<i64, Instant>,
    cooldown: Duration,
    /// Requests rejected while in cooldown
    throttled_count: Arc<AtomicU64>,
}

impl RenderCooldown {
    /// Creates a new `RenderCooldown`.
    ///
    /// A `cooldown_secs` of 0 disables throttling.
    ///
    /// # Examples
    ///
    /// ```
    /// use axis_transport_telegram::bot::RenderCooldown;
    ///
    /// let cooldown = RenderCooldown::new(10, 10_000);
    /// assert_eq!(cooldown.cooldown().as_secs(), 10);
    /// ```
    #[must_use]
    pub fn new(cooldown_secs: u64, max_capacity: u64) -> Self {
        let cooldown = Duration::from_secs(cooldown_secs);
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(cooldown.max(Duration::from_secs(1)))
            .build();

        Self {
            cache,
            cooldown,
            throttled_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start a render for `user_id` if the user is not in cooldown.
    ///
    /// # Errors
    ///
    /// Returns the remaining wait when the previous render started less than
    /// one cooldown period ago.
    pub async fn try_acquire(&self, user_id: i64) -> Result<(), Duration> {
        if self.cooldown.is_zero() {
            return Ok(());
        }

        if let Some(started) = self.cache.get(&user_id).await {
            let remaining = self.cooldown.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                let count = self.throttled_count.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(
                    "Throttled diagram request from user {} ({:?} left, {} throttled in total)",
                    user_id, remaining, count
                );
                return Err(remaining);
            }
        }

        self.cache.insert(user_id, Instant::now()).await;
        Ok(())
    }

    /// Forget the user's last render so a failed attempt does not count.
    pub async fn release(&self, user_id: i64) {
        self.cache.invalidate(&user_id).await;
    }

    /// Returns the current number of entries in the cache
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Returns the total number of throttled requests
    #[must_use]
    pub fn throttled_count(&self) -> u64 {
        self.throttled_count.load(Ordering::Relaxed)
    }

    /// Returns the configured cooldown duration
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
