//! Almacenamiento en memoria
//!
//! Implementación de `FuelingStore` sin base de datos, para tests y para
//! levantar la API en local.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::fueling::{FuelingFilter, FuelingRecord, NewFuelingRecord, PageRequest};
use crate::repositories::fueling_repository::FuelingStore;
use crate::utils::errors::AppResult;

#[derive(Default)]
pub struct InMemoryFuelingRepository {
    records: RwLock<Vec<FuelingRecord>>,
    next_id: AtomicI32,
}

impl InMemoryFuelingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn newest_first(records: &mut [FuelingRecord]) {
    records.sort_by_key(|r| (Reverse(r.timestamp), Reverse(r.id)));
}

#[async_trait]
impl FuelingStore for InMemoryFuelingRepository {
    async fn save(&self, record: NewFuelingRecord) -> AppResult<FuelingRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = record.into_record(id, Utc::now());

        self.records.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_driver_tax_id(&self, driver_tax_id: &str) -> AppResult<Vec<FuelingRecord>> {
        let mut found: Vec<FuelingRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.driver_tax_id == driver_tax_id)
            .cloned()
            .collect();

        newest_first(&mut found);
        Ok(found)
    }

    async fn find_page(
        &self,
        filter: &FuelingFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<FuelingRecord>, i64)> {
        let mut matching: Vec<FuelingRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        newest_first(&mut matching);
        let total = matching.len() as i64;

        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok((items, total))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
