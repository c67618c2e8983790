use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::fueling::{FuelingFilter, FuelingRecord, NewFuelingRecord, PageRequest};
use crate::utils::errors::{AppError, AppResult};

const RECORD_COLUMNS: &str = "id, id_posto, data_hora, tipo_combustivel, preco_por_litro, \
     volume_abastecido, cpf_motorista, improper_data, created_at";

/// Colaborador de persistencia de abastecimientos.
///
/// Cada `save` es un insert atómico; no hay transacciones entre registros.
#[async_trait]
pub trait FuelingStore: Send + Sync {
    /// Inserta el registro y lo devuelve con `id` y `created_at` asignados.
    async fn save(&self, record: NewFuelingRecord) -> AppResult<FuelingRecord>;

    /// Historial de un motorista, más reciente primero. Vacío si no hay registros.
    async fn find_by_driver_tax_id(&self, driver_tax_id: &str) -> AppResult<Vec<FuelingRecord>>;

    /// Página de registros filtrados, más reciente primero, junto al total filtrado.
    async fn find_page(
        &self,
        filter: &FuelingFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<FuelingRecord>, i64)>;

    async fn ping(&self) -> AppResult<()>;
}

pub struct PgFuelingRepository {
    pool: PgPool,
}

impl PgFuelingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &FuelingFilter) {
    let mut separator = " WHERE ";

    if let Some(fuel_type) = filter.fuel_type {
        builder.push(separator).push("tipo_combustivel = ").push_bind(fuel_type);
        separator = " AND ";
    }
    if let Some(start) = filter.start {
        builder.push(separator).push("data_hora >= ").push_bind(start);
        separator = " AND ";
    }
    if let Some(end) = filter.end {
        builder.push(separator).push("data_hora <= ").push_bind(end);
    }
}

#[async_trait]
impl FuelingStore for PgFuelingRepository {
    async fn save(&self, record: NewFuelingRecord) -> AppResult<FuelingRecord> {
        let query = format!(
            r#"
            INSERT INTO abastecimentos
                (id_posto, data_hora, tipo_combustivel, preco_por_litro,
                 volume_abastecido, cpf_motorista, improper_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let saved = sqlx::query_as::<_, FuelingRecord>(&query)
            .bind(record.station_id)
            .bind(record.timestamp)
            .bind(record.fuel_type)
            .bind(record.price_per_liter)
            .bind(record.volume_dispensed)
            .bind(record.driver_tax_id)
            .bind(record.is_anomalous)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn find_by_driver_tax_id(&self, driver_tax_id: &str) -> AppResult<Vec<FuelingRecord>> {
        let query = format!(
            "SELECT {} FROM abastecimentos WHERE cpf_motorista = $1 \
             ORDER BY data_hora DESC, id DESC",
            RECORD_COLUMNS
        );

        let records = sqlx::query_as::<_, FuelingRecord>(&query)
            .bind(driver_tax_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn find_page(
        &self,
        filter: &FuelingFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<FuelingRecord>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM abastecimentos");
        push_filters(&mut count_query, filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut items_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM abastecimentos", RECORD_COLUMNS));
        push_filters(&mut items_query, filter);
        items_query
            .push(" ORDER BY data_hora DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = items_query
            .build_query_as::<FuelingRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Database ping failed: {}", e)))?;
        Ok(())
    }
}
