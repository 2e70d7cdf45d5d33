use spot_server::db::DbService;
use spot_server::db::models::UserCreate;
use spot_server::db::repository::{RepoError, UserRepository};

async fn users() -> (UserRepository, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = DbService::new(dir.path().join("db")).await.unwrap().db;
    (UserRepository::new(db), dir)
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let (repo, _dir) = users().await;
    let data = UserCreate {
        username: "ak8257".to_string(),
        password: "correct-horse".to_string(),
        is_moderator: false,
    };
    repo.create(data.clone()).await.unwrap();
    assert!(matches!(repo.create(data).await, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn test_ensure_moderator_creates_then_promotes() {
    let (repo, _dir) = users().await;

    let created = repo.ensure_moderator("mod", "first-pass-123").await.unwrap();
    assert!(created.is_moderator);
    assert!(created.verify_password("first-pass-123").unwrap());

    repo.create(UserCreate {
        username: "promoted".to_string(),
        password: "old-pass-123".to_string(),
        is_moderator: false,
    })
    .await
    .unwrap();

    let promoted = repo.ensure_moderator("promoted", "new-pass-456").await.unwrap();
    assert!(promoted.is_moderator);
    assert!(promoted.verify_password("new-pass-456").unwrap());
    assert!(!promoted.verify_password("old-pass-123").unwrap());

    // running again on every start is harmless
    let again = repo.ensure_moderator("promoted", "new-pass-456").await.unwrap();
    assert_eq!(again.id, promoted.id);
}
