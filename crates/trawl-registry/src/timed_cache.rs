//! A wholesale-replacement cache with a fixed time-to-live.
//!
//! Readers share the slot through an `RwLock` and never block each other
//! while it is fresh. Population is serialized by a separate mutex with a
//! re-check after acquisition, so concurrent cold reads collapse into a
//! single fetch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use trawl_core::error::Result;

struct CacheSlot<T> {
    data: Arc<T>,
    populated_at: Instant,
}

pub struct TimedCache<T> {
    ttl: Duration,
    slot: RwLock<Option<CacheSlot<T>>>,
    populate: Mutex<()>,
}

impl<T> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        TimedCache {
            ttl,
            slot: RwLock::new(None),
            populate: Mutex::new(()),
        }
    }

    /// Returns the cached value, running `refresh` when the slot is empty
    /// or expired. The slot is only ever replaced wholesale; a failed
    /// refresh leaves it untouched and propagates the error.
    pub fn get<F>(&self, refresh: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(data) = self.fresh() {
            return Ok(data);
        }
        let _population = self.populate.lock();
        // Another caller may have repopulated while we waited.
        if let Some(data) = self.fresh() {
            return Ok(data);
        }
        let data = Arc::new(refresh()?);
        *self.slot.write() = Some(CacheSlot {
            data: Arc::clone(&data),
            populated_at: Instant::now(),
        });
        Ok(data)
    }

    fn fresh(&self) -> Option<Arc<T>> {
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|entry| entry.populated_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.data))
    }
}
