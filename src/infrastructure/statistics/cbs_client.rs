//! CBS (Statistics Netherlands) OData client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, error};

use crate::domain::entities::RegionStatistic;
use crate::domain::gateways::{RegionalStatisticsSource, StatisticsError};

#[derive(Debug, Deserialize)]
struct ODataPage<T> {
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegionDimension {
    key: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct PriceObservation {
    #[serde(rename = "RegioS")]
    region_key: String,
    #[serde(rename = "Perioden")]
    period: String,
    #[serde(rename = "GemiddeldeVerkoopprijs_1")]
    average_sale_price: Option<f64>,
}

/// Reads average sale prices of existing homes per region.
///
/// The region dimension and the observations are fetched concurrently and
/// joined on the region key. Regions keep the order of the dimension table.
/// The yearly change compares the two most recent yearly periods.
pub struct CbsClient {
    http: Client,
    api_base: String,
    table_id: String,
}

impl CbsClient {
    pub fn new(http: Client, api_base: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            table_id: table_id.into(),
        }
    }

    async fn get<T>(&self, resource: &str, query: &[(&str, &str)]) -> Result<Vec<T>, StatisticsError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}/{}", self.api_base, self.table_id, resource);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "CBS request failed");
            return Err(StatisticsError::Status {
                status: status.as_u16(),
            });
        }

        let page = response.json::<ODataPage<T>>().await?;
        debug!("Fetched {} rows from CBS {}", page.value.len(), resource);
        Ok(page.value)
    }
}

/// Latest and previous yearly price per region key.
fn yearly_prices(observations: Vec<PriceObservation>) -> HashMap<String, Vec<(String, f64)>> {
    let mut by_region: HashMap<String, Vec<(String, f64)>> = HashMap::new();

    for obs in observations {
        // Yearly periods look like "2023JJ00".
        if !obs.period.contains("JJ") {
            continue;
        }
        if let Some(price) = obs.average_sale_price {
            by_region
                .entry(obs.region_key.trim().to_string())
                .or_default()
                .push((obs.period.trim().to_string(), price));
        }
    }

    for series in by_region.values_mut() {
        series.sort_by(|a, b| b.0.cmp(&a.0));
    }
    by_region
}

fn join_regions(
    dimension: Vec<RegionDimension>,
    observations: Vec<PriceObservation>,
) -> Vec<RegionStatistic> {
    let prices = yearly_prices(observations);

    dimension
        .into_iter()
        .map(|region| {
            let series = prices.get(region.key.trim());
            let latest = series.and_then(|s| s.first()).map(|(_, p)| *p);
            let previous = series.and_then(|s| s.get(1)).map(|(_, p)| *p);

            let yearly_change_pct = match (latest, previous) {
                (Some(latest), Some(previous)) if previous > 0.0 => {
                    Some((latest / previous - 1.0) * 100.0)
                }
                _ => None,
            };

            RegionStatistic {
                region_name: region.title.trim().to_string(),
                average_sale_price: latest,
                yearly_change_pct,
            }
        })
        .collect()
}

#[async_trait]
impl RegionalStatisticsSource for CbsClient {
    async fn fetch_regions(&self) -> Result<Vec<RegionStatistic>, StatisticsError> {
        let (dimension, observations) = tokio::try_join!(
            self.get::<RegionDimension>("RegioS", &[("$select", "Key,Title")]),
            self.get::<PriceObservation>(
                "TypedDataSet",
                &[("$select", "RegioS,Perioden,GemiddeldeVerkoopprijs_1")],
            ),
        )?;

        Ok(join_regions(dimension, observations))
    }
}
