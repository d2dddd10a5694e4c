//! Conversion flow integration tests
//!
//! Exercise the operation lock and audit trail together the way the
//! conversion flow drives them: acquire, record start/outcome, release.

mod common;

use std::time::Duration;

use rust_decimal_macros::dec;

use ethertron_core::{
    AuditLogEntry, AuditOperation, AuditRecord, AuditTrail, BalanceSnapshot, ConversionMode,
    DocumentStore, OperationLockManager,
};

#[test]
fn lock_round_trip_per_user() {
    common::init_tracing();
    let locks = OperationLockManager::new();

    assert!(locks.acquire("u1", "convert"));
    assert!(!locks.acquire("u1", "convert"));
    locks.release("u1");
    assert!(locks.acquire("u1", "convert"));
}

#[tokio::test]
async fn abandoned_lock_recovers_after_ttl() {
    common::init_tracing();
    let locks = OperationLockManager::with_ttl(Duration::from_millis(20));

    assert!(locks.acquire("u1", "convert"));
    // Simulated crash: no release ever happens.
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!locks.has_active("u1"));
    assert!(locks.acquire("u1", "convert2"));
}

#[tokio::test]
async fn audit_entries_accumulate_under_the_user_namespace() {
    let store = common::memory_store();
    let trail = AuditTrail::new(store.clone());

    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Start, "BRL", "USD", dec!(100), dec!(18.5))
                .mode(ConversionMode::FiatFiat)
                .balances_before(BalanceSnapshot::new(dec!(500.123456789), dec!(0))),
        )
        .await;

    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Success, "BRL", "USD", dec!(100), dec!(18.5))
                .mode(ConversionMode::FiatFiat)
                .balances_before(BalanceSnapshot::new(dec!(500.123456789), dec!(0)))
                .balances_after(BalanceSnapshot::new(dec!(400.123456789), dec!(18.5))),
        )
        .await;

    assert_eq!(store.collection_len("users/u1/auditLogs"), 2);
}

#[tokio::test]
async fn stored_entry_round_trips_with_rounded_snapshots() {
    let store = common::memory_store();
    let trail = AuditTrail::new(store.clone());

    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Success, "EUR", "GBP", dec!(10), dec!(8.6))
                .balances_before(BalanceSnapshot::new(dec!(1.123456789123), dec!(0)))
                .conversion_id("conv-42"),
        )
        .await;

    let (key, document) = {
        let results = store
            .query_eq("users/u1/auditLogs", "userId", "u1")
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        results.into_iter().next().unwrap()
    };

    let entry: AuditLogEntry = serde_json::from_value(document).unwrap();
    assert_eq!(entry.id, key);
    assert_eq!(entry.operation, AuditOperation::Success);
    assert_eq!(entry.conversion_id.as_deref(), Some("conv-42"));

    // Snapshots are rounded to 8 decimal places before storage.
    let before = entry.balances_before.unwrap();
    assert_eq!(before.from, dec!(1.12345679));
}

#[tokio::test]
async fn record_survives_permission_denied_and_latches_off() {
    let store = common::memory_store();
    let trail = AuditTrail::new(store.clone());

    store.deny_writes();

    // Must not panic or propagate the store failure.
    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Failed, "BRL", "USD", dec!(100), dec!(0))
                .error_message("store rejected the balance write"),
        )
        .await;

    assert!(trail.is_disabled());

    // Even after the store recovers, this session stays quiet.
    store.restore_writes();
    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Start, "BRL", "USD", dec!(100), dec!(0)),
        )
        .await;

    assert_eq!(store.collection_len("users/u1/auditLogs"), 0);
}

#[tokio::test]
async fn transient_failures_do_not_latch_the_trail() {
    let store = common::memory_store();
    let trail = AuditTrail::new(store.clone());

    store.fail_writes();
    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Start, "BRL", "USD", dec!(100), dec!(0)),
        )
        .await;

    // Unavailability is logged but does not disable the session.
    assert!(!trail.is_disabled());

    store.restore_writes();
    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Start, "BRL", "USD", dec!(100), dec!(0)),
        )
        .await;
    assert_eq!(store.collection_len("users/u1/auditLogs"), 1);
}

#[tokio::test]
async fn trail_can_start_disabled_from_config() {
    let store = common::memory_store();
    let config = ethertron_core::Config {
        audit_enabled: false,
        ..ethertron_core::Config::default()
    };
    let trail = AuditTrail::with_enabled(store.clone(), config.audit_enabled);

    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Start, "BRL", "USD", dec!(1), dec!(1)),
        )
        .await;

    assert!(trail.is_disabled());
    assert_eq!(store.collection_len("users/u1/auditLogs"), 0);
}

#[tokio::test]
async fn empty_user_id_is_rejected_quietly() {
    let store = common::memory_store();
    let trail = AuditTrail::new(store.clone());

    trail
        .record(
            "  ",
            AuditRecord::new(AuditOperation::Start, "BRL", "USD", dec!(1), dec!(1)),
        )
        .await;

    assert_eq!(store.collection_len("users/  /auditLogs"), 0);
}

#[tokio::test]
async fn full_conversion_flow_locks_records_and_releases() {
    let store = common::memory_store();
    let locks = OperationLockManager::new();
    let trail = AuditTrail::new(store.clone());

    assert!(locks.acquire("u1", "convert"));

    // A duplicate request arriving mid-flight is rejected outright.
    assert!(!locks.acquire("u1", "convert"));

    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Start, "BRL", "EUR", dec!(250), dec!(42.1))
                .mode(ConversionMode::FiatFiat)
                .balances_before(BalanceSnapshot::new(dec!(1000), dec!(5))),
        )
        .await;

    trail
        .record(
            "u1",
            AuditRecord::new(AuditOperation::Success, "BRL", "EUR", dec!(250), dec!(42.1))
                .mode(ConversionMode::FiatFiat)
                .balances_before(BalanceSnapshot::new(dec!(1000), dec!(5)))
                .balances_after(BalanceSnapshot::new(dec!(750), dec!(47.1))),
        )
        .await;

    locks.release("u1");

    assert!(locks.acquire("u1", "convert"));
    assert_eq!(store.collection_len("users/u1/auditLogs"), 2);
}
