//! End-to-end runs against an in-memory libSQL database.

use epi_core::entities::{OutbreakRecord, YearCount, YearlySeries};
use epi_core::enums::{ForecastMethod, Provenance};
use epi_db::{EpiDb, MEMORY};
use epi_pipeline::ForecastPipeline;
use pretty_assertions::assert_eq;

fn record(disease: &str, cases: u64) -> OutbreakRecord {
    OutbreakRecord {
        disease: disease.into(),
        cases,
        case_proportion_pct: 0.0,
        case_rank: 0,
        deaths: 0,
        death_proportion_pct: 0.0,
        death_rank: 0,
        outbreak_reports: 0,
        mortality_rate_pct: 0.0,
    }
}

async fn seeded_db() -> EpiDb {
    let db = EpiDb::open_local(MEMORY).await.unwrap();
    db.upsert_aggregates(&[
        record("Malaria", 1_250_000),
        record("Cholera", 64_530),
        record("Measles", 3_100),
        record("Rabies", 0),
    ])
    .await
    .unwrap();
    db
}

#[tokio::test]
async fn rerun_keeps_yearly_rows_and_forecast_keys() {
    let db = seeded_db().await;
    let pipeline = ForecastPipeline::default();

    let first = pipeline.run(&db).await.unwrap();
    assert!(first.synthesized);
    let yearly_after_first = db.count_yearly_rows().await.unwrap();
    assert_eq!(yearly_after_first, 4 * 16);

    let second = pipeline.run(&db).await.unwrap();
    assert!(!second.synthesized);
    assert_eq!(db.count_yearly_rows().await.unwrap(), yearly_after_first);

    for disease in ["Malaria", "Cholera", "Measles", "Rabies"] {
        let rows = db.list_forecasts(Some(disease)).await.unwrap();
        assert_eq!(rows.len(), 3, "{disease}");
        assert_eq!(
            rows.iter().map(|r| r.forecast.year).collect::<Vec<_>>(),
            vec![2023, 2024, 2025]
        );
    }
}

#[tokio::test]
async fn stored_series_sum_to_aggregate_totals() {
    let db = seeded_db().await;
    ForecastPipeline::default().seed_if_empty(&db).await.unwrap();

    let totals = db.list_entity_totals().await.unwrap();
    let series = db.load_series().await.unwrap();
    for total in totals {
        let s = series.iter().find(|s| s.entity == total.name).unwrap();
        assert_eq!(s.total(), total.total_cases, "{}", total.name);
        assert_eq!(s.provenance, Provenance::Synthetic);
    }
}

#[tokio::test]
async fn real_rows_flip_batch_provenance_on_next_run() {
    let db = seeded_db().await;
    let pipeline = ForecastPipeline::default();
    pipeline.run(&db).await.unwrap();
    assert!(
        db.list_forecasts(None)
            .await
            .unwrap()
            .iter()
            .all(|r| r.forecast.provenance == Provenance::Synthetic)
    );

    let real = YearlySeries::new(
        "Measles".into(),
        (2019..=2022)
            .zip([100, 120, 140, 160])
            .map(|(year, cases)| YearCount { year, cases })
            .collect(),
        Provenance::Real,
    );
    db.upsert_yearly(&[real]).await.unwrap();

    let summary = pipeline.run(&db).await.unwrap();
    assert_eq!(summary.provenance, Some(Provenance::Real));
    let stored = db.list_forecasts(None).await.unwrap();
    assert_eq!(stored.len(), 12);
    assert!(stored.iter().all(|r| r.forecast.provenance == Provenance::Real));
}

#[tokio::test]
async fn zero_burden_entity_gets_naive_mean_rows() {
    let db = seeded_db().await;
    ForecastPipeline::default().run(&db).await.unwrap();

    let rabies = db.list_forecasts(Some("Rabies")).await.unwrap();
    assert!(rabies.iter().all(|r| r.forecast.method == ForecastMethod::NaiveMean));
    assert!(rabies.iter().all(|r| r.forecast.point.abs() < f64::EPSILON));
}
