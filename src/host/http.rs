use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::Host;
use crate::state::{Config, FunctionArea};
use crate::units::UnitSystem;

/// Area-metrics response: the gross-floor-area function breakdown nested
/// under the host's built-in metrics block.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AreaMetricsResponse {
    built_in_metrics: BuiltInMetrics,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuiltInMetrics {
    gross_floor_area: GrossFloorArea,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrossFloorArea {
    function_breakdown: Vec<FunctionArea>,
}

pub struct HttpHost {
    client: Client,
    base: String,
}

impl HttpHost {
    pub fn new(cfg: &Config) -> Result<Self> {
        let base = cfg
            .host_base
            .clone()
            .ok_or_else(|| anyhow!("host base url not configured"))?;
        Ok(Self { client: Client::new(), base })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("GET {} failed: {} {}", path, status, body));
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl Host for HttpHost {
    async fn fetch_area_breakdown(&self) -> Result<Vec<FunctionArea>> {
        let metrics: AreaMetricsResponse = self.get_json("/area-metrics").await?;
        Ok(metrics.built_in_metrics.gross_floor_area.function_breakdown)
    }

    async fn fetch_unit_system(&self) -> Result<UnitSystem> {
        let value: String = self.get_json("/presentation-unit-system").await?;
        Ok(UnitSystem::from_host(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AreaValue;

    #[test]
    fn parses_breakdown_with_sentinel_values() {
        let body = r##"{
            "builtInMetrics": {
                "grossFloorArea": {
                    "functionBreakdown": [
                        {"functionId": "res", "functionName": "Residential", "functionColor": "#ff0000", "value": 1234.5},
                        {"functionId": "retail", "functionName": "Retail", "functionColor": "#00ff00", "value": "UNABLE_TO_CALCULATE"}
                    ]
                }
            }
        }"##;
        let parsed: AreaMetricsResponse = serde_json::from_str(body).unwrap();
        let breakdown = parsed.built_in_metrics.gross_floor_area.function_breakdown;
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].value, AreaValue::Sqm(1234.5));
        assert_eq!(breakdown[1].value.sqm(), 0.0);
    }
}
