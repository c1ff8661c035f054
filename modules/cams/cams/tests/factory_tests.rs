#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use cams::{OrdersRepository, RepositoryFactory, TrusteeNotesRepository};
use cams_db::memory::{InMemoryConnector, InMemoryDatabase};

fn factory() -> RepositoryFactory<InMemoryConnector> {
    RepositoryFactory::new(InMemoryConnector::new(InMemoryDatabase::new()))
}

#[tokio::test]
async fn leases_share_one_repository_until_released() {
    let factory = factory();

    let first = factory.orders_repository().unwrap();
    let second = factory.orders_repository().unwrap();
    assert!(Arc::ptr_eq(first.instance(), second.instance()));
    assert_eq!(factory.connector().opened(), 1);
    assert_eq!(factory.reference_counts(), [2, 0, 0, 0]);

    assert!(first.search(None).await.unwrap().is_empty());

    first.release().await;
    assert_eq!(factory.connector().closed(), 0);
    second.release().await;
    assert_eq!(factory.connector().closed(), 1);
    assert_eq!(factory.reference_counts(), [0, 0, 0, 0]);
}

#[tokio::test]
async fn released_repository_is_rebuilt_on_next_lease() {
    let factory = factory();

    let lease = factory.trustee_notes_repository().unwrap();
    lease.release().await;

    let lease = factory.trustee_notes_repository().unwrap();
    assert!(lease.get_notes_by_trustee_id("t-1").await.unwrap().is_empty());
    assert_eq!(factory.connector().opened(), 2);
    lease.release().await;
    assert_eq!(factory.connector().closed(), 2);
}

#[tokio::test]
async fn repositories_have_independent_slots() {
    let factory = factory();

    let orders = factory.orders_repository().unwrap();
    let consolidations = factory.consolidation_orders_repository().unwrap();
    let assignees = factory.office_assignees_repository().unwrap();
    assert_eq!(factory.reference_counts(), [1, 1, 0, 1]);
    assert_eq!(factory.connector().opened(), 3);

    consolidations.release().await;
    assert_eq!(factory.connector().closed(), 1);
    orders.release().await;
    assignees.release().await;
    assert_eq!(factory.connector().closed(), 3);
}
