use crate::{
    BaseTime, GridLocation,
    condition::{Condition, ConditionStyle},
    error::FetchError,
    model::Snapshot,
    provider::{ForecastQuery, ForecastSource},
};

/// Fetch-parse-format pipeline for one status line.
#[derive(Debug)]
pub struct ForecastFetcher {
    source: Box<dyn ForecastSource>,
    grid: GridLocation,
    style: ConditionStyle,
}

impl ForecastFetcher {
    pub fn new(source: Box<dyn ForecastSource>, grid: GridLocation, style: ConditionStyle) -> Self {
        Self { source, grid, style }
    }

    /// Run one lookup for `issuance` and render the status line.
    ///
    /// A missing or blank credential fails before any request is made.
    pub async fn fetch(
        &self,
        credential: Option<&str>,
        issuance: BaseTime,
    ) -> Result<String, FetchError> {
        let service_key = credential
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(FetchError::MissingKey)?;

        let query = ForecastQuery {
            service_key,
            base: issuance,
            grid: self.grid,
        };

        let items = self.source.village_forecast(&query).await?.into_items()?;
        let snapshot = Snapshot::select(&items)?;

        log::debug!(
            "selected slot {} {} with {} categories",
            snapshot.fcst_date.as_deref().unwrap_or("-"),
            snapshot.fcst_time,
            snapshot.len()
        );

        Ok(render(&snapshot, self.style))
    }
}

/// `"<condition> <temperature>°C"`
pub fn render(snapshot: &Snapshot, style: ConditionStyle) -> String {
    let condition = Condition::from_codes(snapshot.sky(), snapshot.precipitation());
    format!("{} {}°C", condition.label(style), snapshot.temperature())
}
