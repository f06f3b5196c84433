use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use url_shortener::domain::entities::{Click, NewLink};
use url_shortener::domain::repositories::LinkRepository;
use url_shortener::error::AppError;
use url_shortener::infrastructure::persistence::PgLinkRepository;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn new_link(code: &str, url: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        original_url: url.to_string(),
        created_at: t0(),
        expiry: t0() + Duration::minutes(30),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_if_absent(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let first = repo
        .insert_if_absent(new_link("abc123", "https://example.com"))
        .await
        .unwrap();
    let second = repo
        .insert_if_absent(new_link("abc123", "https://other.com"))
        .await
        .unwrap();

    assert!(first);
    assert!(!second);

    let link = repo.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(link.original_url, "https://example.com");
    assert_eq!(link.created_at, t0());
    assert_eq!(link.expiry, t0() + Duration::minutes(30));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_codes_are_case_sensitive(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.insert_if_absent(new_link("AbCd", "https://a.com")).await.unwrap());
    assert!(repo.insert_if_absent(new_link("abcd", "https://b.com")).await.unwrap());

    let upper = repo.find_by_code("AbCd").await.unwrap().unwrap();
    assert_eq!(upper.original_url, "https://a.com");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_missing(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.find_by_code("nothere").await.unwrap().is_none());
    assert!(repo.find_record("nothere").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_record_returns_clicks_in_append_order(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.insert_if_absent(new_link("hist1", "https://example.com"))
        .await
        .unwrap();

    // Same timestamp on purpose; append order must still win.
    let clicks = [
        Click::new(t0(), Some("https://first.example".into()), None),
        Click::new(t0(), None, Some("Berlin, DE".into())),
        Click::new(t0() + Duration::seconds(5), None, None),
    ];
    for click in clicks.clone() {
        repo.append_click("hist1", click).await.unwrap();
    }

    let record = repo.find_record("hist1").await.unwrap().unwrap();

    assert_eq!(record.link.code, "hist1");
    assert_eq!(record.clicks, clicks.to_vec());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_append_click_unknown_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo
        .append_click("ghost1", Click::new(t0(), None, None))
        .await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_appends_are_all_kept(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    repo.insert_if_absent(new_link("busy1", "https://example.com"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..50 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            let click = Click::new(t0() + Duration::seconds(i), None, None);
            repo.append_click("busy1", click).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let record = repo.find_record("busy1").await.unwrap().unwrap();
    assert_eq!(record.clicks.len(), 50);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
