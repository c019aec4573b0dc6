//! [`OutbreakStore`] over libSQL.

use epi_core::entities::{EntityTotal, ForecastPoint, YearlySeries};
use epi_core::store::OutbreakStore;

use crate::EpiDb;
use crate::error::DatabaseError;

impl OutbreakStore for EpiDb {
    type Error = DatabaseError;

    async fn list_totals(&self) -> Result<Vec<EntityTotal>, DatabaseError> {
        self.list_entity_totals().await
    }

    async fn count_yearly_rows(&self) -> Result<u64, DatabaseError> {
        Self::count_yearly_rows(self).await
    }

    async fn insert_yearly_series(&self, series: &[YearlySeries]) -> Result<usize, DatabaseError> {
        self.insert_yearly_if_absent(series).await
    }

    async fn load_yearly_series(&self) -> Result<Vec<YearlySeries>, DatabaseError> {
        self.load_series().await
    }

    async fn upsert_forecasts(&self, rows: &[ForecastPoint]) -> Result<usize, DatabaseError> {
        self.upsert_forecast_rows(rows).await
    }
}
