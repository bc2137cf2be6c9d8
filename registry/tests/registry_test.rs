//! Integration tests for the event registry facade
//!
//! Covers event creation, the registration precondition order, oracle
//! outages, notifications and shutdown.

// Test code can use unwrap/expect/panic
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use gated_registry::{
    Category, EventId, EventRegistry, EventStatus, RegistryConfig, RegistryEnvironment,
    RegistryError, RegistryNotification,
};
use gated_registry_core::environment::Clock;
use gated_registry_runtime::StoreError;
use gated_registry_testing::mocks::FixedClock;
use gated_registry_testing::{
    MockOwnershipOracle, collection, drain_notifications, init_test_tracing, principal,
    test_clock,
};

// ============================================================================
// Test Fixtures
// ============================================================================

type TestRegistry = EventRegistry<MockOwnershipOracle, FixedClock>;

fn registry(oracle: &MockOwnershipOracle) -> TestRegistry {
    init_test_tracing();
    EventRegistry::new(RegistryEnvironment::new(oracle.clone(), test_clock()))
}

const ORGANIZER: u64 = 100;

/// Snapshot of the counters a rejected call must leave alone
async fn counters(registry: &TestRegistry, event_id: EventId) -> (u64, u64, Option<u64>) {
    (
        registry.event_count().await,
        registry.user_count().await,
        registry.event(event_id).await.map(|e| e.registration_count),
    )
}

// ============================================================================
// Event creation
// ============================================================================

#[tokio::test]
async fn test_create_event_assigns_sequential_ids() {
    let oracle = MockOwnershipOracle::new();
    let registry = registry(&oracle);

    for expected in 1..=3 {
        let before = registry.event_count().await;
        let id = registry
            .create_event(&principal(ORGANIZER), collection(1), "Meetup", Category::FREE)
            .await
            .unwrap();

        assert_eq!(id, EventId::new(expected));
        assert_eq!(registry.event_count().await, before + 1);
        assert_eq!(id.get(), registry.event_count().await);
    }
}

#[tokio::test]
async fn test_create_event_stores_fields() {
    let oracle = MockOwnershipOracle::new();
    let registry = registry(&oracle);

    let id = registry
        .create_event(&principal(ORGANIZER), collection(7), "Devfest", Category::PAID)
        .await
        .unwrap();
    let event = registry.event(id).await.unwrap();

    assert_eq!(event.manager, principal(ORGANIZER));
    assert_eq!(event.name, "Devfest");
    assert_eq!(event.nft_collection, collection(7));
    assert_eq!(event.category, Category::PAID);
    assert_eq!(event.registration_count, 0);
    assert_eq!(event.created_at, test_clock().now());
    assert!(event.max_registrations() > 1_000_000_000_000);
    assert_eq!(registry.event_status(id).await, Some(EventStatus::Open));
}

#[tokio::test]
async fn test_create_event_with_capacity_stores_exact_value() {
    let oracle = MockOwnershipOracle::new();
    let registry = registry(&oracle);

    let id = registry
        .create_event_with_capacity(
            &principal(ORGANIZER),
            collection(1),
            "Small",
            Category::FREE,
            37,
        )
        .await
        .unwrap();

    assert_eq!(registry.event(id).await.unwrap().max_registrations(), 37);
    assert_eq!(registry.remaining_capacity(id).await, Some(37));
}

#[tokio::test]
async fn test_zero_collection_is_rejected() {
    let oracle = MockOwnershipOracle::new();
    let registry = registry(&oracle);

    let result = registry
        .create_event(&principal(ORGANIZER), collection(0), "Ghost", Category::FREE)
        .await;

    assert_eq!(result, Err(RegistryError::InvalidCollection));
    assert_eq!(registry.event_count().await, 0);
}

#[tokio::test]
async fn test_zero_capacity_is_rejected() {
    let oracle = MockOwnershipOracle::new();
    let registry = registry(&oracle);

    let result = registry
        .create_event_with_capacity(
            &principal(ORGANIZER),
            collection(1),
            "Nobody",
            Category::FREE,
            0,
        )
        .await;

    assert_eq!(result, Err(RegistryError::InvalidCapacity));
    assert_eq!(registry.event_count().await, 0);
}

#[tokio::test]
async fn test_name_limits_follow_config() {
    let oracle = MockOwnershipOracle::new();
    let registry = EventRegistry::with_config(
        RegistryEnvironment::new(oracle, test_clock()),
        RegistryConfig::default().with_max_event_name_len(8),
    );

    assert_eq!(
        registry
            .create_event(&principal(ORGANIZER), collection(1), "", Category::FREE)
            .await,
        Err(RegistryError::EmptyEventName)
    );
    assert_eq!(
        registry
            .create_event(&principal(ORGANIZER), collection(1), "Rust Nation", Category::FREE)
            .await,
        Err(RegistryError::EventNameTooLong { len: 11, max: 8 })
    );
    assert_eq!(registry.event_count().await, 0);
}

#[tokio::test]
async fn test_long_names_accepted_by_default() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let event_name = "Annual Decentralized Builders Summit and Community Hackathon 2024 Edition";
    let display_name = "x".repeat(65);

    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), event_name, Category::FREE)
        .await
        .unwrap();
    registry
        .register_for_event(&principal(1), id, &display_name)
        .await
        .unwrap();

    assert_eq!(registry.event(id).await.unwrap().name, event_name);
    assert_eq!(
        registry
            .registration(&principal(1), id)
            .await
            .map(|r| r.display_name),
        Some(display_name)
    );
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_two_holders_and_a_stranger() {
    let oracle = MockOwnershipOracle::new()
        .with_holder(collection(1), principal(1))
        .with_holder(collection(1), principal(2));
    let registry = registry(&oracle);
    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();

    assert!(!registry.has_registered(&principal(1), id).await);

    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();
    registry.register_for_event(&principal(2), id, "Grace").await.unwrap();
    let stranger = registry.register_for_event(&principal(3), id, "Eve").await;

    assert_eq!(
        stranger,
        Err(RegistryError::NotEligible {
            participant: principal(3),
            collection: collection(1),
        })
    );
    assert!(registry.has_registered(&principal(1), id).await);
    assert!(registry.has_registered(&principal(2), id).await);
    assert!(!registry.has_registered(&principal(3), id).await);
    assert_eq!(registry.user_count().await, 2);
    assert_eq!(registry.event(id).await.unwrap().registration_count, 2);

    let names: Vec<_> = registry
        .registrations(id)
        .await
        .into_iter()
        .map(|r| r.display_name)
        .collect();
    assert_eq!(names, vec!["Ada".to_string(), "Grace".to_string()]);
}

#[tokio::test]
async fn test_capacity_one_fills_and_stays_full() {
    let oracle = MockOwnershipOracle::new()
        .with_holder(collection(1), principal(1))
        .with_holder(collection(1), principal(2));
    let registry = registry(&oracle);
    let id = registry
        .create_event_with_capacity(&principal(ORGANIZER), collection(1), "Tiny", Category::FREE, 1)
        .await
        .unwrap();

    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();
    assert_eq!(registry.event_status(id).await, Some(EventStatus::Full));
    assert_eq!(registry.remaining_capacity(id).await, Some(0));

    let before = counters(&registry, id).await;
    let second = registry.register_for_event(&principal(2), id, "Grace").await;

    assert_eq!(
        second,
        Err(RegistryError::EventFull {
            event_id: id,
            max_registrations: 1,
        })
    );
    assert_eq!(counters(&registry, id).await, before);
    assert_eq!(registry.event_status(id).await, Some(EventStatus::Full));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();

    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();
    let again = registry.register_for_event(&principal(1), id, "Ada again").await;

    assert_eq!(
        again,
        Err(RegistryError::AlreadyRegistered {
            event_id: id,
            participant: principal(1),
        })
    );
    assert_eq!(registry.user_count().await, 1);
    assert_eq!(registry.event(id).await.unwrap().registration_count, 1);
    assert_eq!(
        registry
            .registration(&principal(1), id)
            .await
            .map(|r| r.display_name),
        Some("Ada".to_string())
    );
}

#[tokio::test]
async fn test_unknown_event_is_rejected_without_state_change() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();

    for raw in [0, 2, u64::MAX] {
        let id = EventId::new(raw);
        let result = registry.register_for_event(&principal(1), id, "Ada").await;

        assert_eq!(result, Err(RegistryError::InvalidEventId { event_id: id }));
        assert!(!registry.has_registered(&principal(1), id).await);
    }
    assert_eq!(registry.user_count().await, 0);
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn test_registration_is_permanent_after_token_transfer() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();

    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();
    oracle.revoke(collection(1), principal(1));

    assert!(registry.has_registered(&principal(1), id).await);
    assert_eq!(
        registry.register_for_event(&principal(1), id, "Ada").await,
        Err(RegistryError::NotEligible {
            participant: principal(1),
            collection: collection(1),
        })
    );
}

#[tokio::test]
async fn test_not_eligible_reported_before_full() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let id = registry
        .create_event_with_capacity(&principal(ORGANIZER), collection(1), "Tiny", Category::FREE, 1)
        .await
        .unwrap();
    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();

    let result = registry.register_for_event(&principal(2), id, "Eve").await;

    assert!(matches!(result, Err(RegistryError::NotEligible { .. })));
}

#[tokio::test]
async fn test_already_registered_reported_before_full() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let id = registry
        .create_event_with_capacity(&principal(ORGANIZER), collection(1), "Tiny", Category::FREE, 1)
        .await
        .unwrap();
    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();

    let result = registry.register_for_event(&principal(1), id, "Ada").await;

    assert!(matches!(result, Err(RegistryError::AlreadyRegistered { .. })));
}

#[tokio::test]
async fn test_events_are_gated_independently() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let first = registry
        .create_event(&principal(ORGANIZER), collection(1), "Holders", Category::FREE)
        .await
        .unwrap();
    let second = registry
        .create_event(&principal(ORGANIZER), collection(2), "Others", Category::FREE)
        .await
        .unwrap();

    registry.register_for_event(&principal(1), first, "Ada").await.unwrap();
    let result = registry.register_for_event(&principal(1), second, "Ada").await;

    assert!(matches!(result, Err(RegistryError::NotEligible { .. })));
    assert!(registry.has_registered(&principal(1), first).await);
    assert!(!registry.has_registered(&principal(1), second).await);
}

#[tokio::test]
async fn test_events_managed_by() {
    let oracle = MockOwnershipOracle::new();
    let registry = registry(&oracle);
    registry
        .create_event(&principal(1), collection(1), "One", Category::FREE)
        .await
        .unwrap();
    registry
        .create_event(&principal(2), collection(1), "Two", Category::FREE)
        .await
        .unwrap();
    registry
        .create_event(&principal(1), collection(1), "Three", Category::FREE)
        .await
        .unwrap();

    let names: Vec<_> = registry
        .events_managed_by(&principal(1))
        .await
        .into_iter()
        .map(|e| e.name)
        .collect();

    assert_eq!(names, vec!["One".to_string(), "Three".to_string()]);
    assert!(registry.events_managed_by(&principal(3)).await.is_empty());
}

// ============================================================================
// Oracle outages
// ============================================================================

#[tokio::test]
async fn test_oracle_outage_changes_nothing() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();
    let before = counters(&registry, id).await;

    oracle.fail_with("rpc timeout");
    let result = registry.register_for_event(&principal(1), id, "Ada").await;

    let error = result.unwrap_err();
    assert!(matches!(error, RegistryError::OracleUnavailable { .. }));
    assert!(error.is_environmental());
    assert_eq!(counters(&registry, id).await, before);
    assert!(!registry.has_registered(&principal(1), id).await);

    oracle.restore();
    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();
    assert!(registry.has_registered(&principal(1), id).await);
}

// ============================================================================
// Notifications
// ============================================================================

#[tokio::test]
async fn test_notifications_follow_commit_order() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let mut rx = registry.subscribe();

    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();
    registry.register_for_event(&principal(2), id, "Eve").await.ok();
    registry.register_for_event(&principal(1), id, "Ada").await.unwrap();

    assert_eq!(
        drain_notifications(&mut rx),
        vec![
            RegistryNotification::EventCreated {
                event_id: id,
                name: "Devfest".to_string(),
                creator: principal(ORGANIZER),
                collection: collection(1),
            },
            RegistryNotification::EventRegistrationSuccessful {
                event_id: id,
                participant: principal(1),
                event_name: "Devfest".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_works_without_subscribers() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);

    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();

    assert!(registry.register_for_event(&principal(1), id, "Ada").await.is_ok());
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_close_rejects_mutations_but_serves_queries() {
    let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
    let registry = registry(&oracle);
    let id = registry
        .create_event(&principal(ORGANIZER), collection(1), "Devfest", Category::FREE)
        .await
        .unwrap();

    registry.close();

    assert_eq!(
        registry
            .create_event(&principal(ORGANIZER), collection(1), "Late", Category::FREE)
            .await,
        Err(RegistryError::Store(StoreError::ShutdownInProgress))
    );
    assert_eq!(
        registry.register_for_event(&principal(1), id, "Ada").await,
        Err(RegistryError::Store(StoreError::ShutdownInProgress))
    );
    assert_eq!(registry.event_count().await, 1);
    assert_eq!(oracle.call_count(), 0);
}
