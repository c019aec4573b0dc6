//! Per-year case series keyed by `(disease, year)`.
//!
//! The `source` column carries provenance. Synthetic rows are written with
//! `ON CONFLICT DO NOTHING` so they never overwrite anything; real rows from
//! ingestion overwrite whatever is stored for the same key.

use epi_core::entities::{YearCount, YearlySeries};
use epi_core::enums::Provenance;

use crate::EpiDb;
use crate::error::DatabaseError;
use crate::helpers::{get_count, get_i32, to_sql_int};

const INSERT_IF_ABSENT: &str = "INSERT INTO disease_cases_yearly (disease, year, cases, source)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (disease, year) DO NOTHING";

const UPSERT: &str = "INSERT INTO disease_cases_yearly (disease, year, cases, source)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (disease, year) DO UPDATE SET
        cases = excluded.cases,
        source = excluded.source";

impl EpiDb {
    /// Total rows in the yearly store, real or synthetic.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_yearly_rows(&self) -> Result<u64, DatabaseError> {
        self.count("SELECT COUNT(*) FROM disease_cases_yearly").await
    }

    /// Rows whose source is anything other than `synthetic`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_real_yearly_rows(&self) -> Result<u64, DatabaseError> {
        self.count("SELECT COUNT(*) FROM disease_cases_yearly WHERE source <> 'synthetic'")
            .await
    }

    /// Insert series rows, leaving existing `(disease, year)` rows untouched.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails; the batch is rolled back.
    pub async fn insert_yearly_if_absent(
        &self,
        series: &[YearlySeries],
    ) -> Result<usize, DatabaseError> {
        self.write_yearly(INSERT_IF_ABSENT, series).await
    }

    /// Insert or overwrite series rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails; the batch is rolled back.
    pub async fn upsert_yearly(&self, series: &[YearlySeries]) -> Result<usize, DatabaseError> {
        self.write_yearly(UPSERT, series).await
    }

    async fn write_yearly(
        &self,
        sql: &str,
        series: &[YearlySeries],
    ) -> Result<usize, DatabaseError> {
        let tx = self.conn().transaction().await?;
        let mut written = 0usize;
        for s in series {
            for point in &s.points {
                let affected = tx
                    .execute(
                        sql,
                        libsql::params![
                            s.entity.as_str(),
                            i64::from(point.year),
                            to_sql_int(point.cases, "cases")?,
                            s.provenance.as_str()
                        ],
                    )
                    .await?;
                if affected > 0 {
                    written += 1;
                }
            }
        }
        tx.commit().await?;
        tracing::debug!(series = series.len(), rows = written, "wrote yearly rows");
        Ok(written)
    }

    /// Every stored series, grouped by disease and ordered by year.
    ///
    /// A series is `real` if any of its rows has a non-synthetic source.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn load_series(&self) -> Result<Vec<YearlySeries>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT disease, year, cases, source FROM disease_cases_yearly
                 ORDER BY disease ASC, year ASC",
                (),
            )
            .await?;

        let mut out: Vec<YearlySeries> = Vec::new();
        while let Some(row) = rows.next().await? {
            let disease = row.get::<String>(0)?;
            let point = YearCount {
                year: get_i32(&row, 1)?,
                cases: get_count(&row, 2)?,
            };
            let provenance = Provenance::from_source(&row.get::<String>(3)?);

            match out.last_mut() {
                Some(current) if current.entity == disease => {
                    current.points.push(point);
                    if provenance == Provenance::Real {
                        current.provenance = Provenance::Real;
                    }
                }
                _ => out.push(YearlySeries::new(disease, vec![point], provenance)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MEMORY;

    fn series(entity: &str, start: i32, cases: &[u64], provenance: Provenance) -> YearlySeries {
        let points = cases
            .iter()
            .zip(start..)
            .map(|(&cases, year)| YearCount { year, cases })
            .collect();
        YearlySeries::new(entity.into(), points, provenance)
    }

    #[tokio::test]
    async fn insert_if_absent_skips_existing_keys() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        let first = series("Cholera", 2007, &[10, 20, 30], Provenance::Synthetic);
        assert_eq!(db.insert_yearly_if_absent(&[first]).await.unwrap(), 3);

        let overlapping = series("Cholera", 2009, &[99, 40], Provenance::Synthetic);
        assert_eq!(db.insert_yearly_if_absent(&[overlapping]).await.unwrap(), 1);

        let loaded = db.load_series().await.unwrap();
        assert_eq!(
            loaded,
            vec![series(
                "Cholera",
                2007,
                &[10, 20, 30, 40],
                Provenance::Synthetic
            )]
        );
    }

    #[tokio::test]
    async fn upsert_overwrites_with_real_rows() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        db.insert_yearly_if_absent(&[series("Measles", 2020, &[5, 6], Provenance::Synthetic)])
            .await
            .unwrap();
        db.upsert_yearly(&[series("Measles", 2021, &[60, 70], Provenance::Real)])
            .await
            .unwrap();

        assert_eq!(db.count_yearly_rows().await.unwrap(), 3);
        assert_eq!(db.count_real_yearly_rows().await.unwrap(), 2);

        let loaded = db.load_series().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].provenance, Provenance::Real);
        assert_eq!(
            loaded[0].points.iter().map(|p| p.cases).collect::<Vec<_>>(),
            vec![5, 60, 70]
        );
    }

    #[tokio::test]
    async fn failed_batch_writes_nothing() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        let batch = series("Cholera", 2021, &[12, u64::MAX], Provenance::Real);

        let result = db.upsert_yearly(&[batch]).await;
        assert!(matches!(result, Err(DatabaseError::Query(_))), "{result:?}");
        assert_eq!(db.count_yearly_rows().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_batch_keeps_earlier_rows() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        let existing = series("Measles", 2020, &[5, 6], Provenance::Synthetic);
        db.insert_yearly_if_absent(std::slice::from_ref(&existing))
            .await
            .unwrap();

        let result = db
            .insert_yearly_if_absent(&[
                series("Anthrax", 2020, &[1, 2], Provenance::Synthetic),
                series("Rabies", 2020, &[u64::MAX], Provenance::Synthetic),
            ])
            .await;
        assert!(result.is_err());
        assert_eq!(db.load_series().await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn load_groups_by_disease_in_year_order() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        db.insert_yearly_if_absent(&[
            series("Rabies", 2019, &[3, 1], Provenance::Synthetic),
            series("Anthrax", 2019, &[7, 8], Provenance::Synthetic),
        ])
        .await
        .unwrap();

        let loaded = db.load_series().await.unwrap();
        let names: Vec<&str> = loaded.iter().map(|s| s.entity.as_str()).collect();
        assert_eq!(names, vec!["Anthrax", "Rabies"]);
        assert!(loaded.iter().all(|s| s.len() == 2));
        assert!(loaded.iter().all(|s| s.provenance == Provenance::Synthetic));
    }
}
