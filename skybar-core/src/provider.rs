use async_trait::async_trait;
use std::fmt::Debug;

use crate::{BaseTime, GridLocation, error::FetchError, model::VillageResponse};

pub mod kma;

pub use kma::KmaClient;

/// Records per page. One issuance for one grid cell fits well inside it.
pub const ROWS_PER_PAGE: u32 = 1000;

/// Parameters of one village forecast lookup.
#[derive(Debug, Clone)]
pub struct ForecastQuery<'a> {
    pub service_key: &'a str,
    pub base: BaseTime,
    pub grid: GridLocation,
}

impl ForecastQuery<'_> {
    /// Query string pairs in the order the provider documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("serviceKey", self.service_key.to_string()),
            ("pageNo", "1".to_string()),
            ("numOfRows", ROWS_PER_PAGE.to_string()),
            ("dataType", "JSON".to_string()),
            ("base_date", self.base.date_param()),
            ("base_time", self.base.time_param()),
            ("nx", self.grid.nx.to_string()),
            ("ny", self.grid.ny.to_string()),
        ]
    }
}

/// Anything that can answer a village forecast query.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn village_forecast(
        &self,
        query: &ForecastQuery<'_>,
    ) -> Result<VillageResponse, FetchError>;
}
