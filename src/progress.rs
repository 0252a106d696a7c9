// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::sync::RwLock;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};

use log::*;

const UPDATE_SECS: f64 = 5.0;

#[derive(Clone, Copy)]
struct UpdateState {
    count: usize,
    time: f64,
    rate: f64,
}

/// Progress reporter for long-running loops, written to the debug log.
///
/// Ticks may come from many threads; log lines are throttled to one every
/// few seconds.
pub(crate) struct ProgressHandle {
    label: String,
    total: usize,
    start: Instant,
    count: AtomicUsize,
    last_update: RwLock<Option<UpdateState>>,
}

impl ProgressHandle {
    pub fn new(label: &str, total: usize) -> Self {
        ProgressHandle {
            label: label.to_string(),
            total,
            count: AtomicUsize::new(0),
            start: Instant::now(),
            last_update: RwLock::new(None),
        }
    }

    pub fn tick(&self) {
        self.advance(1);
    }

    pub fn advance(&self, n: usize) {
        let count = self.count.fetch_add(n, Ordering::Relaxed) + n;

        let last_update = match self.last_update.read() {
            Ok(lock) => *lock,
            Err(_) => return,
        };

        let thresh = if let Some(lu) = last_update {
            // another thread may have stored a later count
            if count <= lu.count {
                return;
            }
            // bail early if the rate estimate says we don't need to update
            let n = (count - lu.count) as f64;
            if n / lu.rate < UPDATE_SECS * 0.95 {
                return;
            }

            lu.time
        } else {
            0.0
        };

        let time = self.start.elapsed().as_secs_f64();
        // bail if we haven't been running long enough
        if time < thresh + UPDATE_SECS {
            return;
        }

        // if someone else is writing, do nothing, they've handled it
        if let Ok(mut lock) = self.last_update.try_write() {
            *lock = Some(UpdateState {
                count,
                time,
                rate: count as f64 / time,
            });
            self.refresh(count, time);
        }
    }

    /// Get the number of completed items.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    fn refresh(&self, count: usize, time: f64) {
        debug!(
            "{}: {}/{} ({:.0}/s)",
            self.label,
            count,
            self.total,
            count as f64 / time
        );
    }

    /// Log completion of the loop.
    pub fn finish(&self) {
        debug!(
            "{}: finished {} in {:.2}s",
            self.label,
            self.count(),
            self.start.elapsed().as_secs_f64()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_counts_across_threads() {
        let progress = ProgressHandle::new("test", 1000);
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| (0..250).for_each(|_| progress.tick()));
            }
        });
        progress.advance(5);
        assert_eq!(progress.count(), 1005);
        progress.finish();
    }

    #[test]
    fn test_stale_update_count() {
        let progress = ProgressHandle::new("test", 100);
        *progress.last_update.write().unwrap() = Some(UpdateState {
            count: 50,
            time: 0.0,
            rate: 10.0,
        });
        progress.advance(1);
        assert_eq!(progress.count(), 1);
    }
}
