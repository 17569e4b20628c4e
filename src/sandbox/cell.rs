use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::ExecError;

/// Memoizes one lazily-built shared instance.
///
/// The build guard is held across construction, so every caller arriving
/// during a build awaits the same in-flight attempt and at most one instance
/// exists per cell until `clear` drops it. Failed builds are not memoized;
/// the next caller retries.
pub struct MemoCell<T> {
    slot: parking_lot::Mutex<Option<Arc<T>>>,
    building: tokio::sync::Mutex<()>,
    builds: AtomicU32,
}

impl<T> MemoCell<T> {
    pub const fn new() -> Self {
        Self {
            slot: parking_lot::Mutex::new(None),
            building: tokio::sync::Mutex::const_new(()),
            builds: AtomicU32::new(0),
        }
    }

    /// Returns the memoized instance, constructing it on first use.
    pub async fn get_or_build<F>(&self, build: F) -> Result<Arc<T>, ExecError>
    where
        F: FnOnce() -> Result<T, ExecError>,
    {
        if let Some(existing) = self.slot.lock().clone() {
            return Ok(existing);
        }

        let _guard = self.building.lock().await;
        // A concurrent caller may have finished the build while we waited
        if let Some(existing) = self.slot.lock().clone() {
            return Ok(existing);
        }

        let built = Arc::new(build()?);
        self.builds.fetch_add(1, Ordering::SeqCst);
        *self.slot.lock() = Some(Arc::clone(&built));
        Ok(built)
    }

    /// Drops the memoized instance. Safe before the first build and safe to
    /// call repeatedly. In-flight executions keep their `Arc` until they
    /// finish.
    pub fn clear(&self) {
        self.slot.lock().take();
    }

    /// How many builds have completed successfully.
    pub fn build_count(&self) -> u32 {
        self.builds.load(Ordering::SeqCst)
    }
}

impl<T> Default for MemoCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
