//! Tests for the in-memory verification code store

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::entities::verification_code::VerificationCode;
use crate::domain::value_objects::EmailAddress;
use crate::repositories::verification_code::{
    InMemoryVerificationCodeRepository, VerificationCodeRepository,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
}

fn record(email: &str, code: &str, created_at: DateTime<Utc>) -> VerificationCode {
    let mut record = VerificationCode::issue(
        &EmailAddress::normalized(email),
        created_at,
        Duration::minutes(5),
    );
    record.code = code.to_string();
    record
}

#[tokio::test]
async fn test_insert_and_find_by_id() {
    let repo = InMemoryVerificationCodeRepository::new();
    let rec = record("user@example.com", "123456", t0());

    repo.insert(&rec).await.unwrap();

    assert_eq!(repo.len().await, 1);
    assert_eq!(repo.find_by_id(rec.id).await.unwrap(), Some(rec));
}

#[tokio::test]
async fn test_duplicate_id_is_rejected() {
    let repo = InMemoryVerificationCodeRepository::new();
    let rec = record("user@example.com", "123456", t0());

    repo.insert(&rec).await.unwrap();
    assert!(repo.insert(&rec).await.is_err());
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_count_issued_since_is_inclusive_and_per_email() {
    let repo = InMemoryVerificationCodeRepository::new();
    repo.insert(&record("user@example.com", "111111", t0())).await.unwrap();
    repo.insert(&record("user@example.com", "222222", t0() + Duration::minutes(2))).await.unwrap();
    repo.insert(&record("other@example.com", "333333", t0() + Duration::minutes(3))).await.unwrap();

    assert_eq!(repo.count_issued_since("user@example.com", t0()).await.unwrap(), 2);
    assert_eq!(
        repo.count_issued_since("user@example.com", t0() + Duration::minutes(2)).await.unwrap(),
        1
    );
    assert_eq!(
        repo.count_issued_since("user@example.com", t0() + Duration::minutes(3)).await.unwrap(),
        0
    );
    assert_eq!(repo.count_issued_since("nobody@example.com", t0()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_most_recent_issued_at() {
    let repo = InMemoryVerificationCodeRepository::new();
    assert_eq!(repo.most_recent_issued_at("user@example.com").await.unwrap(), None);

    repo.insert(&record("user@example.com", "111111", t0() + Duration::minutes(7))).await.unwrap();
    repo.insert(&record("user@example.com", "222222", t0())).await.unwrap();

    assert_eq!(
        repo.most_recent_issued_at("user@example.com").await.unwrap(),
        Some(t0() + Duration::minutes(7))
    );
}

#[tokio::test]
async fn test_find_consumable_excludes_used_expired_and_mismatched() {
    let repo = InMemoryVerificationCodeRepository::new();
    let rec = record("user@example.com", "123456", t0());
    repo.insert(&rec).await.unwrap();

    let now = t0() + Duration::minutes(1);
    assert_eq!(repo.find_consumable("user@example.com", "123456", now).await.unwrap(), Some(rec.id));
    assert_eq!(repo.find_consumable("user@example.com", "654321", now).await.unwrap(), None);
    assert_eq!(repo.find_consumable("other@example.com", "123456", now).await.unwrap(), None);

    // Expired exactly at expires_at
    let at_expiry = t0() + Duration::minutes(5);
    assert_eq!(repo.find_consumable("user@example.com", "123456", at_expiry).await.unwrap(), None);

    assert!(repo.mark_used(rec.id, now).await.unwrap());
    assert_eq!(repo.find_consumable("user@example.com", "123456", now).await.unwrap(), None);
}

#[tokio::test]
async fn test_find_consumable_prefers_most_recent() {
    let repo = InMemoryVerificationCodeRepository::new();
    let older = record("user@example.com", "123456", t0());
    let newer = record("user@example.com", "123456", t0() + Duration::minutes(1));
    repo.insert(&newer).await.unwrap();
    repo.insert(&older).await.unwrap();

    let found = repo
        .find_consumable("user@example.com", "123456", t0() + Duration::minutes(2))
        .await
        .unwrap();
    assert_eq!(found, Some(newer.id));
}

#[tokio::test]
async fn test_mark_used_only_once() {
    let repo = InMemoryVerificationCodeRepository::new();
    let rec = record("user@example.com", "123456", t0());
    repo.insert(&rec).await.unwrap();

    let first = t0() + Duration::seconds(10);
    assert!(repo.mark_used(rec.id, first).await.unwrap());
    assert!(!repo.mark_used(rec.id, first + Duration::seconds(1)).await.unwrap());

    let stored = repo.find_by_id(rec.id).await.unwrap().unwrap();
    assert!(stored.used);
    assert_eq!(stored.used_at, Some(first));
    // expires_at never changes
    assert_eq!(stored.expires_at, rec.expires_at);
}

#[tokio::test]
async fn test_mark_used_unknown_id() {
    let repo = InMemoryVerificationCodeRepository::new();
    assert!(!repo.mark_used(uuid::Uuid::new_v4(), t0()).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mark_used_single_winner() {
    let repo = Arc::new(InMemoryVerificationCodeRepository::new());
    let rec = record("user@example.com", "123456", t0());
    repo.insert(&rec).await.unwrap();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let repo = repo.clone();
            let id = rec.id;
            tokio::spawn(async move { repo.mark_used(id, t0() + Duration::seconds(1)).await.unwrap() })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
