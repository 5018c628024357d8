mod common;

use content_core::error::AppError;
use uuid::Uuid;

/// Counter/set invariants: like_count == |liked_by| and
/// save_count == |saved_by| before and after every ledger call.
#[tokio::test]
async fn counters_always_match_sets() {
    let store = common::store();
    let repo = common::repository(&store);
    let ledger = common::ledger(&store);

    let author = Uuid::new_v4();
    let post = repo.create_post(common::post_draft(author, "hi")).await.unwrap();
    let users: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

    for user in &users {
        ledger.like(post.id, *user).await.unwrap();
        ledger.save(post.id, *user).await.unwrap();
        let item = repo.get(post.id).await.unwrap();
        assert_eq!(item.like_count, item.liked_by.len() as i64);
        assert_eq!(item.save_count, item.saved_by.len() as i64);
    }
    for user in &users {
        ledger.unlike(post.id, *user).await.unwrap();
        let item = repo.get(post.id).await.unwrap();
        assert_eq!(item.like_count, item.liked_by.len() as i64);
        assert_eq!(item.save_count, item.saved_by.len() as i64);
    }
}

#[tokio::test]
async fn like_is_idempotent_for_the_same_user() {
    let store = common::store();
    let repo = common::repository(&store);
    let ledger = common::ledger(&store);

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hi"))
        .await
        .unwrap();
    let b = Uuid::new_v4();

    ledger.like(post.id, b).await.unwrap();
    ledger.like(post.id, b).await.unwrap();

    let item = repo.get(post.id).await.unwrap();
    assert_eq!(item.like_count, 1);
    assert_eq!(item.liked_by.len(), 1);
    assert!(item.liked_by.contains(&b));
}

#[tokio::test]
async fn unlike_without_prior_like_is_a_noop() {
    let store = common::store();
    let repo = common::repository(&store);
    let ledger = common::ledger(&store);

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hi"))
        .await
        .unwrap();
    let user = Uuid::new_v4();

    // repeated unlikes on an already-unliked post must never drive the
    // counter negative
    ledger.unlike(post.id, user).await.unwrap();
    ledger.unlike(post.id, user).await.unwrap();
    ledger.unsave(post.id, user).await.unwrap();

    let item = repo.get(post.id).await.unwrap();
    assert_eq!(item.like_count, 0);
    assert_eq!(item.save_count, 0);
}

#[tokio::test]
async fn like_then_unlike_returns_to_zero() {
    let store = common::store();
    let repo = common::repository(&store);
    let ledger = common::ledger(&store);

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hi"))
        .await
        .unwrap();
    let user = Uuid::new_v4();

    ledger.like(post.id, user).await.unwrap();
    ledger.unlike(post.id, user).await.unwrap();
    ledger.unlike(post.id, user).await.unwrap();

    let item = repo.get(post.id).await.unwrap();
    assert_eq!(item.like_count, 0);
    assert!(item.liked_by.is_empty());
}

/// Interleaved likes from many users must not lose updates; the atomic
/// counter+set primitive is the only ordering guarantee required.
#[tokio::test]
async fn concurrent_likes_are_never_lost() {
    let store = common::store();
    let repo = common::repository(&store);
    let ledger = common::ledger(&store);

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hi"))
        .await
        .unwrap();

    let users: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();
    let mut handles = Vec::new();
    for user in &users {
        let ledger = ledger.clone();
        let post_id = post.id;
        let user = *user;
        handles.push(tokio::spawn(async move {
            // each user double-taps; idempotence keeps the count right
            ledger.like(post_id, user).await.unwrap();
            ledger.like(post_id, user).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let item = repo.get(post.id).await.unwrap();
    assert_eq!(item.like_count, users.len() as i64);
    assert_eq!(item.liked_by.len(), users.len());
}

#[tokio::test]
async fn engagement_on_missing_post_is_not_found() {
    let store = common::store();
    let ledger = common::ledger(&store);

    let err = ledger.like(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
