pub mod dispatch;
pub mod forecasts;
pub mod ingest;
pub mod run;
pub mod schema;
