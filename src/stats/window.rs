//! Trailing time-window aggregation buffer
//!
//! A fixed ring of [`Aggregate`] slots, each covering one bucket of
//! `bucket_duration` on a grid anchored at the first record. `grid` is the
//! first grid point at or after the last observed instant; slot `j` holds
//! timestamps in `(grid - (j+1)d, grid - jd]`. Stale buckets are evicted
//! lazily: writers rotate the ring, readers skip the buckets that have aged
//! out since the last write without touching shared state.
//!
//! ```text
//! age index:        0               1          ...         n
//!           (grid - d, grid]  (grid - 2d, grid - d]  ...  (grid - (n+1)d, grid - nd]
//! ```
//!
//! The grid point can lead the last observed instant by up to `d - 1` ms,
//! so the ring keeps one slot beyond `bucket_count` for the partial bucket
//! at the tail of the window.

use super::aggregate::Aggregate;
use super::clock::{Clock, SystemClock};
use super::error::WindowError;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    /// Upper edge of age slot 0. `last_now <= grid < last_now + d`.
    grid: i64,
    /// Latest clock reading seen by a write.
    last_now: i64,
}

/// Slot ring and cursor, guarded together by one lock.
#[derive(Debug)]
struct WindowState {
    slots: Vec<Aggregate>,
    /// Physical index of age slot 0.
    head: usize,
    /// `None` until the first record.
    cursor: Option<Cursor>,
}

impl WindowState {
    fn new(bucket_count: usize) -> Self {
        Self {
            slots: vec![Aggregate::identity(); bucket_count + 1],
            head: 0,
            cursor: None,
        }
    }

    fn physical(&self, age_index: usize) -> usize {
        (self.head + age_index) % self.slots.len()
    }

    /// Shift every slot `buckets` positions toward older ages and reset the
    /// uncovered leading slots.
    fn rotate(&mut self, buckets: usize) {
        let len = self.slots.len();

        if buckets >= len {
            self.slots.fill(Aggregate::identity());
            self.head = 0;
            return;
        }

        for _ in 0..buckets {
            self.head = (self.head + len - 1) % len;
            self.slots[self.head] = Aggregate::identity();
        }
    }

    /// Move the cursor up to `now`, evicting whole buckets that elapsed.
    ///
    /// The grid moves in whole bucket steps so bucket boundaries stay fixed
    /// no matter how often writes arrive.
    fn advance(&mut self, now: i64, bucket_duration_ms: i64) -> Cursor {
        let mut cursor = match self.cursor {
            None => {
                let cursor = Cursor {
                    grid: now,
                    last_now: now,
                };
                self.cursor = Some(cursor);
                return cursor;
            }
            Some(cursor) => cursor,
        };

        if now < cursor.last_now {
            log::warn!(
                "Clock moved backwards by {}ms (last: {}, now: {}), skipping rotation",
                cursor.last_now - now,
                cursor.last_now,
                now
            );
            return cursor;
        }

        if now > cursor.grid {
            let buckets = (now - cursor.grid + bucket_duration_ms - 1) / bucket_duration_ms;
            self.rotate(usize::try_from(buckets).unwrap_or(usize::MAX));
            cursor.grid += buckets * bucket_duration_ms;
        }

        cursor.last_now = now;
        self.cursor = Some(cursor);
        cursor
    }
}

/// Rolling sum/avg/min/max/count over the trailing
/// `bucket_duration * bucket_count` of time.
///
/// `record` takes the write lock, `summary` and `would_accept` the read
/// lock; all are `O(bucket_count)` at worst regardless of how many events
/// were recorded.
pub struct WindowBuffer {
    bucket_duration_ms: i64,
    bucket_count: usize,
    window_ms: i64,
    state: RwLock<WindowState>,
    clock: Arc<dyn Clock>,
}

impl WindowBuffer {
    /// Create a buffer driven by the system wall clock.
    pub fn new(bucket_duration: Duration, bucket_count: usize) -> Result<Self, WindowError> {
        Self::new_with_clock(bucket_duration, bucket_count, Arc::new(SystemClock))
    }

    /// Create a buffer with a custom time source (deterministic tests).
    pub fn new_with_clock(
        bucket_duration: Duration,
        bucket_count: usize,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, WindowError> {
        if bucket_duration.is_zero() {
            return Err(WindowError::InvalidBucketDuration(
                "bucket duration must be > 0".to_string(),
            ));
        }
        if bucket_duration.subsec_nanos() % 1_000_000 != 0 {
            return Err(WindowError::InvalidBucketDuration(format!(
                "{:?} is not a whole number of milliseconds",
                bucket_duration
            )));
        }
        if bucket_count == 0 {
            return Err(WindowError::InvalidBucketCount(bucket_count));
        }

        let bucket_duration_ms = i64::try_from(bucket_duration.as_millis()).map_err(|_| {
            WindowError::InvalidBucketDuration(format!("{:?} overflows i64 milliseconds", bucket_duration))
        })?;
        let window_ms = i64::try_from(bucket_count)
            .ok()
            .and_then(|count| count.checked_mul(bucket_duration_ms))
            .ok_or(WindowError::WindowTooLong)?;

        log::debug!(
            "Window buffer created: {} buckets x {}ms = {}ms",
            bucket_count,
            bucket_duration_ms,
            window_ms
        );

        Ok(Self {
            bucket_duration_ms,
            bucket_count,
            window_ms,
            state: RwLock::new(WindowState::new(bucket_count)),
            clock,
        })
    }

    pub fn bucket_duration(&self) -> Duration {
        Duration::from_millis(self.bucket_duration_ms as u64)
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    pub fn window_length_millis(&self) -> i64 {
        self.window_ms
    }

    /// Add `value` observed at `timestamp` (epoch millis).
    ///
    /// Returns `Ok(false)` when the timestamp is a full window or more behind
    /// the latest clock reading; the value is dropped. Fails with
    /// [`WindowError::FutureTimestamp`] when the timestamp is ahead of the
    /// buffer clock.
    pub fn record(&self, value: f64, timestamp: i64) -> Result<bool, WindowError> {
        let mut state = self.write_state();
        let now = self.clock.now_millis();
        let cursor = state.advance(now, self.bucket_duration_ms);

        if timestamp > now {
            return Err(WindowError::FutureTimestamp { timestamp, now });
        }
        if cursor.last_now - timestamp >= self.window_ms {
            return Ok(false);
        }

        // grid - timestamp < window + d, so the index is at most bucket_count
        let index = usize::try_from((cursor.grid - timestamp) / self.bucket_duration_ms)
            .unwrap_or(usize::MAX)
            .min(self.bucket_count);

        let slot = state.physical(index);
        state.slots[slot] = state.slots[slot].observe(value);
        Ok(true)
    }

    /// Aggregate of every observation still inside the window.
    ///
    /// Staleness is counted in whole buckets since the last write. A bucket
    /// that straddles the tail of the window is reported whole.
    pub fn summary(&self) -> Aggregate {
        let state = self.read_state();
        let now = self.clock.now_millis();

        let cursor = match state.cursor {
            Some(cursor) => cursor,
            None => return Aggregate::identity(),
        };

        let stale = (now - cursor.last_now).max(0) / self.bucket_duration_ms;
        let live = match usize::try_from(stale) {
            Ok(stale) if stale < self.bucket_count => (self.bucket_count - stale) as i64,
            _ => return Aggregate::identity(),
        };

        let cutoff = cursor.last_now - live * self.bucket_duration_ms;
        let grid = cursor.grid;
        let d = self.bucket_duration_ms;
        Aggregate::merge_all(
            (0..=self.bucket_count)
                .take_while(|&j| grid - j as i64 * d > cutoff)
                .map(|j| state.slots[state.physical(j)]),
        )
    }

    /// Whether a `record` at this instant would keep the timestamp.
    ///
    /// Reads the clock and the last write's instant without mutating the
    /// ring, so it can answer callers synchronously while the actual write is
    /// still queued.
    pub fn would_accept(&self, timestamp: i64) -> bool {
        let state = self.read_state();
        let now = self.clock.now_millis();
        let reference = state
            .cursor
            .map_or(now, |cursor| cursor.last_now.max(now));

        timestamp <= now && reference - timestamp < self.window_ms
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, WindowState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, WindowState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for WindowBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowBuffer")
            .field("bucket_duration_ms", &self.bucket_duration_ms)
            .field("bucket_count", &self.bucket_count)
            .field("window_ms", &self.window_ms)
            .finish()
    }
}
