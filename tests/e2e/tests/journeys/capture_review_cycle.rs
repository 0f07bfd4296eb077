//! Journey: Capture → Review → Mastery
//!
//! Walks a vocabulary item through its whole life: captured, surfaced as due,
//! reviewed across distinct sessions until ready to use, then knocked back by
//! a lapse. Everything runs against a real temporary database.

use chrono::{Duration, Utc};
use wordtrail_e2e_tests::harness::db_manager::{NATIVE_LANG, TARGET_LANG, TEST_USER};
use wordtrail_e2e_tests::harness::TestDatabaseManager;
use wordtrail_e2e_tests::mocks::TestDataFactory;

use wordtrail_core::{MasteryStatus, Rating, DEFAULT_NEW_ITEM_CAP};

#[test]
fn test_capture_to_mastery_journey() {
    let db = TestDatabaseManager::new_temp();
    let now = Utc::now();

    // Capture: new item is immediately eligible
    let item = TestDataFactory::capture_word(&db.storage, "pequeno-almoço", "breakfast")
        .expect("capture failed");

    let due = db
        .storage
        .due_items(TEST_USER, NATIVE_LANG, TARGET_LANG, now, DEFAULT_NEW_ITEM_CAP)
        .unwrap();
    assert_eq!(due.new_items.len(), 1);
    assert_eq!(due.new_items[0].id, item.id);

    // Three correct recalls in distinct sessions climb the mastery ladder
    let expected = [
        MasteryStatus::Learned,
        MasteryStatus::Learned,
        MasteryStatus::ReadyToUse,
    ];
    let mut when = now;
    let mut last_stability = item.stability;
    for want in expected {
        let session = db.storage.get_or_create_session(TEST_USER, when).unwrap();
        let updated = db
            .storage
            .apply_review(&item.id, Rating::Good, &session, when)
            .unwrap();
        assert_eq!(updated.mastery_status, want);
        assert!(updated.stability > last_stability, "stability must grow");
        last_stability = updated.stability;
        when += Duration::hours(3);
    }

    // Mastered item no longer shows up as due
    let due = db
        .storage
        .due_items(TEST_USER, NATIVE_LANG, TARGET_LANG, when, DEFAULT_NEW_ITEM_CAP)
        .unwrap();
    assert!(due.is_empty());

    let stats = db.storage.stats(TEST_USER, when).unwrap();
    assert_eq!(stats.total_items, 1);
    assert_eq!(stats.ready_to_use, 1);
}

#[test]
fn test_lapse_resets_mastery_but_keeps_history() {
    let mut db = TestDatabaseManager::new_temp();
    let ids = db.seed_with_mastery_states();
    let mastered_id = &ids[2];

    let before = db.storage.get_item(mastered_id).unwrap().unwrap();
    assert_eq!(before.mastery_status, MasteryStatus::ReadyToUse);

    // Forgetting wipes mastery progress entirely, even from ready_to_use
    let now = Utc::now() + Duration::days(30);
    let session = db.storage.get_or_create_session(TEST_USER, now).unwrap();
    let after = db
        .storage
        .apply_review(mastered_id, Rating::Again, &session, now)
        .unwrap();

    assert_eq!(after.mastery_status, MasteryStatus::Learning);
    assert_eq!(after.consecutive_correct_sessions, 0);
    assert!(after.last_correct_session_id.is_none());
    // Review history is preserved; only mastery resets
    assert_eq!(after.review_count, before.review_count + 1);
    assert_eq!(after.lapse_count, before.lapse_count + 1);
    assert!(after.stability < before.stability);
}

#[test]
fn test_same_session_repeats_never_double_count() {
    let db = TestDatabaseManager::new_temp();
    let now = Utc::now();

    let item =
        TestDataFactory::capture_word(&db.storage, "obrigado", "thank you").expect("capture");
    let session = db.storage.get_or_create_session(TEST_USER, now).unwrap();

    let first = db
        .storage
        .apply_review(&item.id, Rating::Good, &session, now)
        .unwrap();
    let second = db
        .storage
        .apply_review(&item.id, Rating::Good, &session, now)
        .unwrap();

    assert_eq!(first.consecutive_correct_sessions, 1);
    assert_eq!(second.consecutive_correct_sessions, 1);
    assert_eq!(second.review_count, 2);

    // Both reviews count toward session totals
    let session = db.storage.get_session(&session).unwrap().unwrap();
    assert_eq!(session.words_reviewed, 2);
    assert_eq!(session.correct_count, 2);
}

#[test]
fn test_new_item_cap_bounds_daily_load() {
    let mut db = TestDatabaseManager::new_temp();
    db.seed_items(40);

    let due = db
        .storage
        .due_items(
            TEST_USER,
            NATIVE_LANG,
            TARGET_LANG,
            Utc::now(),
            DEFAULT_NEW_ITEM_CAP,
        )
        .unwrap();

    assert_eq!(due.new_items.len(), DEFAULT_NEW_ITEM_CAP);
    assert!(due.review_items.is_empty());
    // Oldest captures surface first
    for pair in due.new_items.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[test]
fn test_overdue_reviews_are_never_capped() {
    let mut db = TestDatabaseManager::new_temp();
    let ids = db.seed_items(20);

    // Review everything once so nothing is "new", then jump far ahead
    let now = Utc::now();
    let session = db.storage.get_or_create_session(TEST_USER, now).unwrap();
    for id in &ids {
        db.storage
            .apply_review(id, Rating::Good, &session, now)
            .unwrap();
    }

    let later = now + Duration::days(365);
    let due = db
        .storage
        .due_items(TEST_USER, NATIVE_LANG, TARGET_LANG, later, DEFAULT_NEW_ITEM_CAP)
        .unwrap();

    assert!(due.new_items.is_empty());
    assert_eq!(due.review_items.len(), 20);
}
