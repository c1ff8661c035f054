#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Reference counting of shared instances.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cams_db::{Closeable, SharedInstance};

struct Pool {
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Closeable for Pool {
    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn slot() -> (SharedInstance<Pool>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    (
        SharedInstance::new("pool"),
        Arc::new(AtomicUsize::new(0)),
        Arc::new(AtomicUsize::new(0)),
    )
}

fn build(built: &AtomicUsize, closes: &Arc<AtomicUsize>) -> Result<Pool, Infallible> {
    built.fetch_add(1, Ordering::SeqCst);
    Ok(Pool {
        closes: Arc::clone(closes),
    })
}

#[tokio::test]
async fn same_instance_until_last_release() {
    let (slot, built, closes) = slot();

    let a = slot.get_instance(|| build(&built, &closes)).unwrap();
    let b = slot.get_instance(|| build(&built, &closes)).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(slot.reference_count(), 2);

    slot.drop_instance().await;
    assert_eq!(slot.reference_count(), 1);
    assert!(slot.is_live());
    assert_eq!(closes.load(Ordering::SeqCst), 0);

    slot.drop_instance().await;
    assert_eq!(slot.reference_count(), 0);
    assert!(!slot.is_live());
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fresh_instance_after_close() {
    let (slot, built, closes) = slot();

    let first = slot.get_instance(|| build(&built, &closes)).unwrap();
    slot.drop_instance().await;
    let second = slot.get_instance(|| build(&built, &closes)).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(built.load(Ordering::SeqCst), 2);
    assert_eq!(slot.reference_count(), 1);
}

#[tokio::test]
async fn extra_release_is_harmless() {
    let (slot, built, closes) = slot();

    slot.drop_instance().await;
    assert_eq!(slot.reference_count(), 0);

    let _held = slot.get_instance(|| build(&built, &closes)).unwrap();
    slot.drop_instance().await;
    slot.drop_instance().await;
    assert_eq!(slot.reference_count(), 0);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_init_takes_no_reference() {
    let slot: SharedInstance<Pool> = SharedInstance::new("pool");
    let err = slot
        .get_instance(|| Err::<Pool, _>("connection refused"))
        .err();
    assert_eq!(err, Some("connection refused"));
    assert_eq!(slot.reference_count(), 0);
    assert!(!slot.is_live());
}

#[tokio::test]
async fn lease_releases_through_slot() {
    let (slot, built, closes) = slot();

    let lease = slot.lease(|| build(&built, &closes)).unwrap();
    let other = slot.lease(|| build(&built, &closes)).unwrap();
    assert!(Arc::ptr_eq(lease.instance(), other.instance()));

    lease.release().await;
    assert_eq!(closes.load(Ordering::SeqCst), 0);
    other.release().await;
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_acquire_builds_once() {
    let (slot, built, closes) = slot();
    let slot = Arc::new(slot);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let slot = Arc::clone(&slot);
        let built = Arc::clone(&built);
        let closes = Arc::clone(&closes);
        handles.push(tokio::spawn(async move {
            slot.get_instance(|| build(&built, &closes)).unwrap()
        }));
    }
    let instances: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(slot.reference_count(), 16);
}
