//! Entity structs for all epicast domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `epi-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON output and schema validation.

mod aggregate;
mod forecast;
mod series;

pub use aggregate::{EntityTotal, OutbreakRecord};
pub use forecast::{ForecastPoint, StoredForecast};
pub use series::{YearCount, YearlySeries};
