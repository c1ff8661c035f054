//! Reference-counted shared instances.
//!
//! A [`SharedInstance`] lazily builds a value on the first [`SharedInstance::get_instance`]
//! call and hands the same `Arc` to every caller until the reference count drops back to
//! zero. At that point the value is detached and closed once; the next call builds a fresh
//! one.

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::store::Closeable;

struct SlotState<R> {
    instance: Option<Arc<R>>,
    reference_count: usize,
}

pub struct SharedInstance<R> {
    name: &'static str,
    state: Mutex<SlotState<R>>,
}

impl<R: Closeable> SharedInstance<R> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(SlotState {
                instance: None,
                reference_count: 0,
            }),
        }
    }

    /// Return the live instance, building it with `init` if there is none, and take a
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns the error from `init`; the reference count is unchanged in that case.
    pub fn get_instance<E>(&self, init: impl FnOnce() -> Result<R, E>) -> Result<Arc<R>, E> {
        let mut state = self.state.lock();
        let instance = if let Some(existing) = &state.instance {
            Arc::clone(existing)
        } else {
            let created = Arc::new(init()?);
            state.instance = Some(Arc::clone(&created));
            debug!(instance = self.name, "shared instance created");
            created
        };
        state.reference_count += 1;
        Ok(instance)
    }

    /// Give back one reference. The last release closes the instance.
    pub async fn drop_instance(&self) {
        let detached = {
            let mut state = self.state.lock();
            state.reference_count = state.reference_count.saturating_sub(1);
            if state.reference_count == 0 {
                state.instance.take()
            } else {
                None
            }
        };
        if let Some(instance) = detached {
            debug!(instance = self.name, "closing shared instance");
            instance.close().await;
        }
    }

    /// Like [`get_instance`](Self::get_instance), returning a [`Lease`] that releases
    /// through this slot.
    ///
    /// # Errors
    ///
    /// Returns the error from `init`.
    pub fn lease<E>(&self, init: impl FnOnce() -> Result<R, E>) -> Result<Lease<'_, R>, E> {
        let instance = self.get_instance(init)?;
        Ok(Lease {
            instance,
            slot: self,
            released: false,
        })
    }

    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.state.lock().reference_count
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state.lock().instance.is_some()
    }
}

/// One reference to a [`SharedInstance`]. Call [`Lease::release`] when done; dropping
/// a lease without releasing keeps the instance alive and logs a warning.
#[must_use]
pub struct Lease<'a, R: Closeable> {
    instance: Arc<R>,
    slot: &'a SharedInstance<R>,
    released: bool,
}

impl<R: Closeable> Lease<'_, R> {
    #[must_use]
    pub fn instance(&self) -> &Arc<R> {
        &self.instance
    }

    pub async fn release(mut self) {
        self.released = true;
        self.slot.drop_instance().await;
    }
}

impl<R: Closeable> Drop for Lease<'_, R> {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                instance = self.slot.name,
                "lease dropped without release, shared instance stays open"
            );
        }
    }
}

impl<R: Closeable> Deref for Lease<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.instance
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tracing_test::traced_test;

    struct Connection;

    #[async_trait]
    impl Closeable for Connection {
        async fn close(&self) {}
    }

    fn connect() -> Result<Connection, std::convert::Infallible> {
        Ok(Connection)
    }

    #[tokio::test]
    #[traced_test]
    async fn dropped_lease_warns_and_keeps_reference() {
        let slot = SharedInstance::new("orders");
        drop(slot.lease(connect).unwrap());

        assert!(logs_contain("lease dropped without release"));
        assert_eq!(slot.reference_count(), 1);
        assert!(slot.is_live());
    }

    #[tokio::test]
    #[traced_test]
    async fn released_lease_does_not_warn() {
        let slot = SharedInstance::new("orders");
        slot.lease(connect).unwrap().release().await;

        assert!(!logs_contain("lease dropped without release"));
        assert_eq!(slot.reference_count(), 0);
        assert!(!slot.is_live());
    }
}
