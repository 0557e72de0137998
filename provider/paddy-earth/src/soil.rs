use paddy::error::ProviderError;
use paddy::sources::{Coordinates, SoilProfile};
use serde::Deserialize;

use crate::client::Client;

const QUERY_PATH: &str = "soilgrids/v2.0/properties/query";
const DEPTH: &str = "0-5cm";

/// SoilGrids property names and the divisor that maps their integer
/// encoding onto model units.
const PH: (&str, f64) = ("phh2o", 10.0);
const CEC: (&str, f64) = ("cec", 10.0);
const SOC: (&str, f64) = ("soc", 100.0);

#[derive(Debug, Deserialize)]
struct QueryResponse {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    layers: Vec<Layer>,
}

#[derive(Debug, Deserialize)]
struct Layer {
    name: String,
    #[serde(default)]
    depths: Vec<Depth>,
}

#[derive(Debug, Deserialize)]
struct Depth {
    label: String,
    values: Values,
}

#[derive(Debug, Deserialize)]
struct Values {
    mean: Option<f64>,
}

impl QueryResponse {
    fn mean(&self, (name, divisor): (&str, f64)) -> Option<f64> {
        self.properties
            .layers
            .iter()
            .find(|layer| layer.name == name)?
            .depths
            .iter()
            .find(|depth| depth.label == DEPTH)?
            .values
            .mean
            .map(|v| v / divisor)
    }
}

impl Client {
    /// Topsoil pH, CEC (cmol/kg) and organic carbon (%) at a point.
    pub async fn topsoil(&self, at: Coordinates) -> Result<SoilProfile, ProviderError> {
        let response = self
            .soilgrids(QUERY_PATH)?
            .query(&[
                ("lon", at.lon.to_string()),
                ("lat", at.lat.to_string()),
                ("property", PH.0.to_string()),
                ("property", CEC.0.to_string()),
                ("property", SOC.0.to_string()),
                ("depth", DEPTH.to_string()),
                ("value", "mean".to_string()),
            ])
            .send()
            .await?;
        let body: QueryResponse = Client::read_json(response).await?;

        Ok(SoilProfile {
            ph: body.mean(PH),
            cec: body.mean(CEC),
            oc: body.mean(SOC),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use paddy::sources::EarthSource;
    use serde_json::json;

    fn layer(name: &str, mean: serde_json::Value) -> serde_json::Value {
        json!({
            "name": name,
            "unit_measure": { "d_factor": 10 },
            "depths": [{
                "label": "0-5cm",
                "range": { "top_depth": 0, "bottom_depth": 5 },
                "values": { "mean": mean }
            }]
        })
    }

    #[tokio::test]
    async fn converts_soilgrids_units() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/soilgrids/v2.0/properties/query")
                    .query_param("lat", "6.12")
                    .query_param("lon", "100.37")
                    .query_param("depth", "0-5cm")
                    .query_param("value", "mean");
                then.status(200).json_body(json!({
                    "type": "Feature",
                    "properties": { "layers": [
                        layer("phh2o", json!(52)),
                        layer("cec", json!(187)),
                        layer("soc", json!(null))
                    ] }
                }));
            })
            .await;
        let base = server.base_url();
        let client = Client::builder().soilgrids_base_url(&base).build().unwrap();

        let soil = client.soil(Coordinates::new(6.12, 100.37)).await.unwrap();
        mock.assert_async().await;
        assert_eq!(soil.ph, Some(5.2));
        assert_eq!(soil.cec, Some(18.7));
        assert_eq!(soil.oc, None);
    }

    #[tokio::test]
    async fn server_errors_are_provider_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/soilgrids/v2.0/properties/query");
                then.status(503).body("maintenance");
            })
            .await;
        let base = server.base_url();
        let client = Client::builder().soilgrids_base_url(&base).build().unwrap();

        let err = client.soil(Coordinates::new(6.12, 100.37)).await.unwrap_err();
        assert!(err.to_string().contains("maintenance"));
    }
}
