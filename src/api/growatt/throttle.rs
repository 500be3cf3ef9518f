use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::time::{Instant, sleep};

use crate::prelude::*;

/// Keeps the requests at least `min_interval` apart.
///
/// Each caller reserves the next slot under the lock and sleeps outside of it.
pub struct Throttle {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    pub const fn new(min_interval: Duration) -> Self {
        Self { min_interval, next_slot: Mutex::new(None) }
    }

    pub async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let now = Instant::now();
        let slot = {
            let mut next_slot = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = next_slot.map_or(now, |next_slot| next_slot.max(now));
            *next_slot = Some(slot + self.min_interval);
            slot
        };
        if slot > now {
            debug!(delay = ?(slot - now), "throttling…");
            sleep(slot - now).await;
        }
    }
}
