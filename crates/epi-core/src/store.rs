//! Persistence collaborator consumed by the forecasting pipeline.
//!
//! The pipeline never talks to a database directly. It reads aggregate totals
//! and yearly series through this trait and hands back forecast rows. Any
//! error returned here is an availability failure of the collaborator and
//! aborts the run; the pipeline does not retry.

use crate::entities::{EntityTotal, ForecastPoint, YearlySeries};

#[allow(async_fn_in_trait)]
pub trait OutbreakStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Aggregate totals, ordered by case count descending then name.
    ///
    /// The order is the synthesis generation order and must be stable.
    async fn list_totals(&self) -> Result<Vec<EntityTotal>, Self::Error>;

    /// Number of rows in the yearly series store, real or synthetic.
    async fn count_yearly_rows(&self) -> Result<u64, Self::Error>;

    /// Insert yearly rows, leaving any existing `(entity, year)` row untouched.
    /// Returns the number of rows actually inserted.
    async fn insert_yearly_series(&self, series: &[YearlySeries]) -> Result<usize, Self::Error>;

    /// Every stored series, ordered by entity then year.
    async fn load_yearly_series(&self) -> Result<Vec<YearlySeries>, Self::Error>;

    /// Insert or overwrite forecast rows keyed by `(entity, year)`.
    /// Returns the number of rows written.
    async fn upsert_forecasts(&self, rows: &[ForecastPoint]) -> Result<usize, Self::Error>;
}
