//! Aggregate outbreak table: one row per disease over the whole window.

use epi_core::entities::{EntityTotal, OutbreakRecord};

use crate::EpiDb;
use crate::error::DatabaseError;
use crate::helpers::{get_count, get_i32, to_sql_int};

fn row_to_record(row: &libsql::Row) -> Result<OutbreakRecord, DatabaseError> {
    let rank = |idx| {
        get_i32(row, idx).and_then(|v| {
            u32::try_from(v).map_err(|_| DatabaseError::Query(format!("negative rank {v}")))
        })
    };
    Ok(OutbreakRecord {
        disease: row.get::<String>(0)?,
        cases: get_count(row, 1)?,
        case_proportion_pct: row.get::<f64>(2)?,
        case_rank: rank(3)?,
        deaths: get_count(row, 4)?,
        death_proportion_pct: row.get::<f64>(5)?,
        death_rank: rank(6)?,
        outbreak_reports: get_count(row, 7)?,
        mortality_rate_pct: row.get::<f64>(8)?,
    })
}

const SELECT_COLS: &str = "disease, cases, case_proportion_pct, case_rank, deaths, \
     death_proportion_pct, death_rank, outbreak_reports, mortality_rate_pct";

/// Synthesis generation order: largest burden first, ties by name.
const ORDER_BY: &str = "ORDER BY cases DESC, disease ASC";

impl EpiDb {
    /// Insert or replace aggregate rows keyed by disease.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails; the batch is rolled back.
    pub async fn upsert_aggregates(
        &self,
        records: &[OutbreakRecord],
    ) -> Result<usize, DatabaseError> {
        let tx = self.conn().transaction().await?;
        for record in records {
            tx.execute(
                "INSERT INTO outbreak_aggregates
                    (disease, cases, case_proportion_pct, case_rank, deaths,
                     death_proportion_pct, death_rank, outbreak_reports, mortality_rate_pct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT (disease) DO UPDATE SET
                    cases = excluded.cases,
                    case_proportion_pct = excluded.case_proportion_pct,
                    case_rank = excluded.case_rank,
                    deaths = excluded.deaths,
                    death_proportion_pct = excluded.death_proportion_pct,
                    death_rank = excluded.death_rank,
                    outbreak_reports = excluded.outbreak_reports,
                    mortality_rate_pct = excluded.mortality_rate_pct",
                libsql::params![
                    record.disease.as_str(),
                    to_sql_int(record.cases, "cases")?,
                    record.case_proportion_pct,
                    i64::from(record.case_rank),
                    to_sql_int(record.deaths, "deaths")?,
                    record.death_proportion_pct,
                    i64::from(record.death_rank),
                    to_sql_int(record.outbreak_reports, "outbreak_reports")?,
                    record.mortality_rate_pct
                ],
            )
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(rows = records.len(), "upserted aggregate rows");
        Ok(records.len())
    }

    /// All aggregate rows in synthesis generation order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_aggregates(&self) -> Result<Vec<OutbreakRecord>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM outbreak_aggregates {ORDER_BY}");
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_record(&row)?);
        }
        Ok(out)
    }

    /// `(disease, cases)` pairs in synthesis generation order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_entity_totals(&self) -> Result<Vec<EntityTotal>, DatabaseError> {
        let sql = format!("SELECT disease, cases FROM outbreak_aggregates {ORDER_BY}");
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(EntityTotal {
                name: row.get::<String>(0)?,
                total_cases: get_count(&row, 1)?,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{EpiDb, MEMORY};
    use epi_core::entities::OutbreakRecord;

    fn record(disease: &str, cases: u64) -> OutbreakRecord {
        OutbreakRecord {
            disease: disease.into(),
            cases,
            case_proportion_pct: 1.5,
            case_rank: 3,
            deaths: 12,
            death_proportion_pct: 0.25,
            death_rank: 4,
            outbreak_reports: 7,
            mortality_rate_pct: 0.8,
        }
    }

    #[tokio::test]
    async fn upsert_then_list_round_trips() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        let cholera = record("Cholera", 64_530);
        db.upsert_aggregates(std::slice::from_ref(&cholera))
            .await
            .unwrap();

        let listed = db.list_aggregates().await.unwrap();
        assert_eq!(listed, vec![cholera]);
    }

    #[tokio::test]
    async fn failed_batch_writes_nothing() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        let result = db
            .upsert_aggregates(&[record("Cholera", 64_530), record("Plague", u64::MAX)])
            .await;

        assert!(result.is_err());
        assert!(db.list_aggregates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_disease() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        db.upsert_aggregates(&[record("Measles", 100)]).await.unwrap();
        db.upsert_aggregates(&[record("Measles", 250)]).await.unwrap();

        let totals = db.list_entity_totals().await.unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_cases, 250);
    }

    #[tokio::test]
    async fn totals_ordered_by_cases_then_name() {
        let db = EpiDb::open_local(MEMORY).await.unwrap();
        db.upsert_aggregates(&[
            record("Anthrax", 900),
            record("Malaria", 1_250_000),
            record("Dengue", 900),
            record("Cholera", 64_530),
        ])
        .await
        .unwrap();

        let names: Vec<String> = db
            .list_entity_totals()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Malaria", "Cholera", "Anthrax", "Dengue"]);
    }
}
