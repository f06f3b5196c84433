//! In-memory implementation of link repository.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{Click, Link, LinkRecord, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link storage on a sharded concurrent map.
///
/// Every operation holds the shard lock of its key for its whole duration, so
/// insert-if-absent and click appends are atomic per shortcode. Records are
/// never removed; expired links keep their code for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    records: DashMap<String, LinkRecord>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links, expired ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<bool, AppError> {
        match self.records.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(LinkRecord {
                    link: Link::from(new_link),
                    clicks: Vec::new(),
                });
                Ok(true)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.records.get(code).map(|record| record.link.clone()))
    }

    async fn find_record(&self, code: &str) -> Result<Option<LinkRecord>, AppError> {
        Ok(self.records.get(code).map(|record| record.clone()))
    }

    async fn append_click(&self, code: &str, click: Click) -> Result<(), AppError> {
        match self.records.get_mut(code) {
            Some(mut record) => {
                record.clicks.push(click);
                Ok(())
            }
            None => Err(AppError::NotFound {
                shortcode: code.to_string(),
            }),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
