mod common;

use chrono::Utc;
use content_core::error::AppError;
use uuid::Uuid;

#[tokio::test]
async fn new_post_extracts_tags_and_starts_with_clean_counters() {
    let store = common::store();
    let repo = common::repository(&store);

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hello #world"))
        .await
        .unwrap();

    assert_eq!(post.tags, vec!["world"]);
    assert_eq!(post.like_count, 0);
    assert!(post.liked_by.is_empty());
    assert_eq!(post.comment_count, 0);
}

#[tokio::test]
async fn created_at_is_store_assigned_and_monotonic() {
    let store = common::store();
    let repo = common::repository(&store);
    let author = Uuid::new_v4();

    let first = repo.create_post(common::post_draft(author, "one")).await.unwrap();
    let second = repo.create_post(common::post_draft(author, "two")).await.unwrap();
    let third = repo.create_post(common::post_draft(author, "three")).await.unwrap();

    assert!(first.created_at < second.created_at);
    assert!(second.created_at < third.created_at);
    // fresh stamps, not some client-supplied value
    assert!(Utc::now() - first.created_at < chrono::Duration::minutes(1));
}

#[tokio::test]
async fn list_recent_is_newest_first() {
    let store = common::store();
    let repo = common::repository(&store);
    let author = Uuid::new_v4();

    for i in 0..5 {
        repo.create_post(common::post_draft(author, &format!("post {}", i)))
            .await
            .unwrap();
    }

    let items = repo.list_recent(10).await.unwrap();
    assert_eq!(items.len(), 5);
    assert!(items
        .windows(2)
        .all(|w| w[0].created_at > w[1].created_at));
    assert_eq!(items[0].text.as_deref(), Some("post 4"));
}

#[tokio::test]
async fn empty_drafts_are_rejected_before_any_write() {
    let store = common::store();
    let repo = common::repository(&store);

    let draft = content_core::models::ContentDraft {
        author_id: Uuid::new_v4(),
        author_display_name: "alice".to_string(),
        ..Default::default()
    };
    let err = repo.create_post(draft).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(repo.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn stories_require_image_or_video() {
    let store = common::store();
    let repo = common::repository(&store);

    let text_only = content_core::models::ContentDraft {
        author_id: Uuid::new_v4(),
        author_display_name: "alice".to_string(),
        text: Some("words only".to_string()),
        ..Default::default()
    };
    let err = repo.create_story(text_only).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let with_image = common::story_draft(Uuid::new_v4(), "alice");
    assert!(repo.create_story(with_image).await.is_ok());
}

#[tokio::test]
async fn comments_increment_the_parent_counter_atomically() {
    let store = common::store();
    let repo = common::repository(&store);

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hi"))
        .await
        .unwrap();
    let commenter = Uuid::new_v4();

    repo.add_comment(post.id, common::comment_draft(commenter, "first"))
        .await
        .unwrap();
    repo.add_comment(post.id, common::comment_draft(commenter, "second"))
        .await
        .unwrap();

    let item = repo.get(post.id).await.unwrap();
    let comments = repo.list_comments(post.id).await.unwrap();
    assert_eq!(item.comment_count, 2);
    assert_eq!(comments.len(), 2);
    // conversation order, oldest first
    assert_eq!(comments[0].text, "first");
    assert_eq!(comments[1].text, "second");
}

#[tokio::test]
async fn blank_comments_are_rejected() {
    let store = common::store();
    let repo = common::repository(&store);

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hi"))
        .await
        .unwrap();
    let err = repo
        .add_comment(post.id, common::comment_draft(Uuid::new_v4(), "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(repo.get(post.id).await.unwrap().comment_count, 0);
}

#[tokio::test]
async fn delete_requires_author_or_admin() {
    let store = common::store();
    let repo = common::repository(&store);

    let author = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let post = repo.create_post(common::post_draft(author, "hi")).await.unwrap();
    repo.add_comment(post.id, common::comment_draft(stranger, "nice"))
        .await
        .unwrap();

    // neither author nor admin: rejected, store unchanged
    let err = repo.delete(post.id, stranger).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
    let item = repo.get(post.id).await.unwrap();
    assert_eq!(item.comment_count, 1);

    // the author may delete
    repo.delete(post.id, author).await.unwrap();
    assert!(matches!(
        repo.get(post.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn admins_may_delete_other_users_content() {
    let store = common::store();
    let repo = common::repository(&store);

    let admin = Uuid::new_v4();
    store
        .upsert_profile(common::profile(admin, Utc::now(), true))
        .await
        .unwrap();

    let post = repo
        .create_post(common::post_draft(Uuid::new_v4(), "hi"))
        .await
        .unwrap();
    repo.delete(post.id, admin).await.unwrap();
    assert!(matches!(
        repo.get(post.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn delete_removes_the_comment_subtree_with_the_parent() {
    let store = common::store();
    let repo = common::repository(&store);

    let author = Uuid::new_v4();
    let post = repo.create_post(common::post_draft(author, "hi")).await.unwrap();
    for i in 0..3 {
        repo.add_comment(post.id, common::comment_draft(author, &format!("c{}", i)))
            .await
            .unwrap();
    }

    repo.delete(post.id, author).await.unwrap();

    // no orphaned comments are observable
    assert!(matches!(
        repo.list_comments(post.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn delete_of_missing_post_is_not_found() {
    let store = common::store();
    let repo = common::repository(&store);

    let err = repo.delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn reads_surface_store_unavailability() {
    let store = common::store();
    let repo = common::repository(&store);

    store.set_available(false);
    let err = repo.list_recent(10).await.unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));
}
