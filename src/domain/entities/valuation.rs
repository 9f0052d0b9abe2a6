//! Valuation entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which input the estimate was based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationBasis {
    WozValue,
    AskingPrice,
    LivingArea,
}

impl ValuationBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationBasis::WozValue => "woz_value",
            ValuationBasis::AskingPrice => "asking_price",
            ValuationBasis::LivingArea => "living_area",
        }
    }
}

impl FromStr for ValuationBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "woz_value" => Ok(ValuationBasis::WozValue),
            "asking_price" => Ok(ValuationBasis::AskingPrice),
            "living_area" => Ok(ValuationBasis::LivingArea),
            other => Err(format!("unknown valuation basis '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Valuation {
    pub id: i64,
    pub property_id: i64,
    pub requested_by: i64,
    pub estimated_value: i64,
    pub low_estimate: i64,
    pub high_estimate: i64,
    pub price_per_m2: Option<i64>,
    pub basis: ValuationBasis,
    pub region_source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewValuation {
    pub property_id: i64,
    pub requested_by: i64,
    pub estimated_value: i64,
    pub low_estimate: i64,
    pub high_estimate: i64,
    pub price_per_m2: Option<i64>,
    pub basis: ValuationBasis,
    pub region_source: String,
}
