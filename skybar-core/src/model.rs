use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::FetchError;

/// Result code the provider reports for a successful call.
pub const SUCCESS_CODE: &str = "00";

/// Forecast grid cell (KMA Lambert conformal grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLocation {
    pub nx: i32,
    pub ny: i32,
}

impl Default for GridLocation {
    fn default() -> Self {
        Self { nx: 61, ny: 119 }
    }
}

/// Top-level JSON document returned by the village forecast endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VillageResponse {
    pub response: VillageEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VillageEnvelope {
    pub header: ResultHeader,
    #[serde(default)]
    pub body: Option<VillageBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VillageBody {
    #[serde(default)]
    pub items: Option<Items>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Items {
    #[serde(default)]
    pub item: Vec<ForecastItem>,
}

/// One (category, timestamp, value) record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForecastItem {
    pub category: String,
    #[serde(rename = "fcstDate", default)]
    pub fcst_date: Option<String>,
    #[serde(rename = "fcstTime")]
    pub fcst_time: String,
    #[serde(rename = "fcstValue")]
    pub fcst_value: String,
}

impl ForecastItem {
    fn same_slot(&self, other: &ForecastItem) -> bool {
        if self.fcst_time != other.fcst_time {
            return false;
        }
        match (&self.fcst_date, &other.fcst_date) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl VillageResponse {
    /// Check the result code and hand back the forecast records.
    pub fn into_items(self) -> Result<Vec<ForecastItem>, FetchError> {
        let VillageEnvelope { header, body } = self.response;

        if header.result_code != SUCCESS_CODE {
            return Err(FetchError::Api {
                code: header.result_code,
                message: header.result_msg,
            });
        }

        let items = body
            .and_then(|b| b.items)
            .map(|i| i.item)
            .unwrap_or_default();

        if items.is_empty() {
            return Err(FetchError::NoData);
        }

        Ok(items)
    }
}

/// Category values of the nearest forecast slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub fcst_date: Option<String>,
    pub fcst_time: String,
    values: HashMap<String, String>,
}

impl Snapshot {
    /// Merge every record sharing the first record's timestamp.
    ///
    /// The provider lists records in ascending timestamp order, so the first
    /// one carries the nearest forecast slot.
    pub fn select(items: &[ForecastItem]) -> Result<Self, FetchError> {
        let first = items.first().ok_or(FetchError::NoData)?;

        let values = items
            .iter()
            .filter(|item| item.same_slot(first))
            .map(|item| (item.category.clone(), item.fcst_value.clone()))
            .collect();

        Ok(Self {
            fcst_date: first.fcst_date.clone(),
            fcst_time: first.fcst_time.clone(),
            values,
        })
    }

    fn get(&self, category: &str) -> Option<&str> {
        self.values.get(category).map(String::as_str)
    }

    /// `TMP`, or `-` when the slot has no temperature.
    pub fn temperature(&self) -> &str {
        self.get("TMP").unwrap_or("-")
    }

    /// `SKY` code, `0` when absent.
    pub fn sky(&self) -> &str {
        self.get("SKY").unwrap_or("0")
    }

    /// `PTY` code, `0` when absent.
    pub fn precipitation(&self) -> &str {
        self.get("PTY").unwrap_or("0")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
