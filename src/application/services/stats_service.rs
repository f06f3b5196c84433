//! Per-link click statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::link_service::LinkService;
use crate::domain::entities::Click;
use crate::error::AppError;

/// Aggregated view of one shortcode.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub shortcode: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
    pub total_clicks: usize,
    /// Clicks in chronological order.
    pub clicks: Vec<Click>,
}

/// Service for building the statistics view of a link.
pub struct StatsService {
    link_service: Arc<LinkService>,
}

impl StatsService {
    pub fn new(link_service: Arc<LinkService>) -> Self {
        Self { link_service }
    }

    /// Returns the statistics of a shortcode, including expired ones.
    ///
    /// `total_clicks` always equals the number of click records returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code was never created.
    /// Returns [`AppError::StoreUnavailable`] on storage failures.
    pub async fn get_stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let record = self.link_service.get_stats(code).await?;

        let mut clicks = record.clicks;
        // Stable: equal timestamps keep insertion order.
        clicks.sort_by_key(|click| click.timestamp);

        Ok(LinkStats {
            shortcode: record.link.code,
            original_url: record.link.original_url,
            created_at: record.link.created_at,
            expiry: record.link.expiry,
            total_clicks: clicks.len(),
            clicks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::link_service::LinkSettings;
    use crate::domain::clock::ManualClock;
    use crate::domain::entities::{Link, LinkRecord};
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;
    use tokio::sync::mpsc;

    fn service(repo: MockLinkRepository) -> StatsService {
        let (tx, _rx) = mpsc::channel(1);
        let link_service = LinkService::new(Arc::new(repo), tx, LinkSettings::default())
            .with_clock(Arc::new(ManualClock::new(Utc::now())));

        StatsService::new(Arc::new(link_service))
    }

    #[tokio::test]
    async fn test_get_stats_counts_and_orders_clicks() {
        let created = Utc::now();
        let link = Link::new(
            "abc123".to_string(),
            "https://example.com".to_string(),
            created,
            created + Duration::minutes(30),
        );
        let late = Click::new(created + Duration::seconds(20), None, None);
        let early = Click::new(
            created + Duration::seconds(5),
            Some("https://google.com".to_string()),
            Some("Berlin, DE".to_string()),
        );
        let tie = Click::new(created + Duration::seconds(20), Some("tie".to_string()), None);

        let record = LinkRecord {
            link,
            clicks: vec![late.clone(), early.clone(), tie.clone()],
        };

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_record()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let stats = service(mock_repo).get_stats("abc123").await.unwrap();

        assert_eq!(stats.shortcode, "abc123");
        assert_eq!(stats.original_url, "https://example.com");
        assert_eq!(stats.total_clicks, 3);
        assert_eq!(stats.clicks, vec![early, late, tie]);
    }

    #[tokio::test]
    async fn test_get_stats_without_clicks() {
        let created = Utc::now();
        let record = LinkRecord {
            link: Link::new(
                "empty1".to_string(),
                "https://example.com".to_string(),
                created,
                created + Duration::minutes(1),
            ),
            clicks: vec![],
        };

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_record()
            .returning(move |_| Ok(Some(record.clone())));

        let stats = service(mock_repo).get_stats("empty1").await.unwrap();

        assert_eq!(stats.total_clicks, 0);
        assert!(stats.clicks.is_empty());
    }

    #[tokio::test]
    async fn test_get_stats_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_record()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_repo).get_stats("notfound").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
