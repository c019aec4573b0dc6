//! Forecast rows keyed by `(disease, year)` with last-write-wins semantics.

use epi_core::entities::{ForecastPoint, StoredForecast};
use epi_core::enums::{ForecastMethod, Provenance};

use crate::EpiDb;
use crate::error::DatabaseError;
use crate::helpers::{get_i32, parse_datetime, round2};

fn row_to_forecast(row: &libsql::Row) -> Result<StoredForecast, DatabaseError> {
    let method = ForecastMethod::from_tag(&row.get::<String>(5)?)
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(StoredForecast {
        forecast: ForecastPoint {
            entity: row.get::<String>(0)?,
            year: get_i32(row, 1)?,
            point: row.get::<f64>(2)?,
            lower: row.get::<f64>(3)?,
            upper: row.get::<f64>(4)?,
            method,
            provenance: Provenance::from_source(&row.get::<String>(6)?),
        },
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

const SELECT_COLS: &str =
    "disease, year, forecast_cases, lower_ci, upper_ci, method, data_source, created_at";

impl EpiDb {
    /// Insert or overwrite forecast rows. Values are stored rounded to two
    /// decimals; `created_at` keeps the first write's timestamp.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails; the batch is rolled back.
    pub async fn upsert_forecast_rows(
        &self,
        rows: &[ForecastPoint],
    ) -> Result<usize, DatabaseError> {
        let tx = self.conn().transaction().await?;
        for row in rows {
            tx.execute(
                "INSERT INTO disease_forecasts
                    (disease, year, forecast_cases, lower_ci, upper_ci, method, data_source)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (disease, year) DO UPDATE SET
                    forecast_cases = excluded.forecast_cases,
                    lower_ci = excluded.lower_ci,
                    upper_ci = excluded.upper_ci,
                    method = excluded.method,
                    data_source = excluded.data_source",
                libsql::params![
                    row.entity.as_str(),
                    i64::from(row.year),
                    round2(row.point),
                    round2(row.lower),
                    round2(row.upper),
                    row.method.tag(),
                    row.provenance.as_str()
                ],
            )
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(rows = rows.len(), "upserted forecast rows");
        Ok(rows.len())
    }

    /// Stored forecasts ordered by disease then year, optionally for one disease.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_forecasts(
        &self,
        disease: Option<&str>,
    ) -> Result<Vec<StoredForecast>, DatabaseError> {
        let mut rows = match disease {
            Some(name) => {
                let sql = format!(
                    "SELECT {SELECT_COLS} FROM disease_forecasts WHERE disease = ?1 ORDER BY year ASC"
                );
                self.conn().query(&sql, [name]).await?
            }
            None => {
                let sql = format!(
                    "SELECT {SELECT_COLS} FROM disease_forecasts ORDER BY disease ASC, year ASC"
                );
                self.conn().query(&sql, ()).await?
            }
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_forecast(&row)?);
        }
        Ok(out)
    }
}
