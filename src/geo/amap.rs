//! AMap geocoding backend
//!
//! Forward: `GET {endpoint}/geocode/geo?key=..&address=..`
//! Reverse: `GET {endpoint}/geocode/regeo?key=..&location=<lng>,<lat>`
//!
//! The provider writes points as `lng,lat`. Every failure (timeout, transport,
//! non-2xx, undecodable body, `status != "1"`, empty result) becomes `None`;
//! nothing is retried.

use crate::config::GeocodingConfig;
use crate::constants::geocoding::{COORD_PRECISION, STATUS_OK};
use crate::error::Result;
use crate::geo::parser::extract_numbers;
use crate::geo::{GeoBackend, ResolvedLocation};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("journal-geo/", env!("CARGO_PKG_VERSION"));

/// AMap geocoding backend
#[derive(Debug, Clone)]
pub struct AmapBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

/// Forward geocode response
///
/// Example: `{"status":"1","geocodes":[{"location":"87.617733,43.792818","adcode":"650100"}]}`
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    geocodes: Vec<Geocode>,
}

#[derive(Debug, Deserialize)]
struct Geocode {
    #[serde(default)]
    location: Value,
    #[serde(default, rename = "addressComponent")]
    address_component: Option<AddressComponent>,
    #[serde(default)]
    adcode: Value,
}

/// The provider sends `[]` instead of a string for empty fields
#[derive(Debug, Deserialize)]
struct AddressComponent {
    #[serde(default)]
    adcode: Value,
}

/// Reverse geocode response
#[derive(Debug, Deserialize)]
struct RegeoResponse {
    #[serde(default, alias = "regecode")]
    regeocode: Option<Regeocode>,
}

#[derive(Debug, Deserialize)]
struct Regeocode {
    #[serde(default, rename = "addressComponent")]
    address_component: Option<AddressComponent>,
}

impl AmapBackend {
    /// Create a backend against `endpoint` with a per-request timeout
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a backend from the `[geocoding]` config section
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        Self::new(&config.endpoint, &config.api_key, config.timeout())
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET a URL and decode its JSON body, logging and discarding any failure
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str, operation: &str) -> Option<T> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(operation, error = %e.without_url(), "geocoding request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(operation, status = %response.status(), "geocoding provider returned error status");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(operation, error = %e.without_url(), "failed to decode geocoding response");
                None
            }
        }
    }
}

impl GeoBackend for AmapBackend {
    async fn forward_geocode(&self, address: &str) -> Option<ResolvedLocation> {
        let url = format!(
            "{}/geocode/geo?key={}&address={}",
            self.endpoint,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(address)
        );

        let body: GeoResponse = self.fetch_json(&url, "forward").await?;
        let resolved = location_from_geo(body);
        if resolved.is_none() {
            debug!(address, "forward geocode returned no usable result");
        }
        resolved
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<String> {
        let url = format!(
            "{}/geocode/regeo?key={}&location={:.prec$},{:.prec$}",
            self.endpoint,
            urlencoding::encode(&self.api_key),
            lng,
            lat,
            prec = COORD_PRECISION
        );

        let body: RegeoResponse = self.fetch_json(&url, "reverse").await?;
        let adcode = admin_code_from_regeo(body);
        if adcode.is_none() {
            debug!(lat, lng, "reverse geocode returned no admin code");
        }
        adcode
    }
}

/// Non-empty trimmed string, or `None` for anything else the provider sent
fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn location_from_geo(body: GeoResponse) -> Option<ResolvedLocation> {
    if non_empty_text(&body.status).as_deref() != Some(STATUS_OK) {
        return None;
    }

    let first = body.geocodes.into_iter().next()?;
    let location = non_empty_text(&first.location)?;
    let numbers = extract_numbers(&location);
    let [lng, lat, ..] = numbers.as_slice() else {
        return None;
    };

    let admin_code = first
        .address_component
        .as_ref()
        .and_then(|c| non_empty_text(&c.adcode))
        .or_else(|| non_empty_text(&first.adcode));

    ResolvedLocation::new(*lat, *lng).map(|loc| loc.with_admin_code(admin_code))
}

fn admin_code_from_regeo(body: RegeoResponse) -> Option<String> {
    body.regeocode?
        .address_component
        .and_then(|c| non_empty_text(&c.adcode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geo(value: Value) -> GeoResponse {
        serde_json::from_value(value).unwrap()
    }

    fn regeo(value: Value) -> RegeoResponse {
        serde_json::from_value(value).unwrap()
    }

    fn backend_for(server: &MockServer) -> AmapBackend {
        AmapBackend::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_forward_swaps_provider_order() {
        let loc = location_from_geo(geo(json!({
            "status": "1",
            "geocodes": [{
                "location": "87.617733,43.792818",
                "addressComponent": {"adcode": "650100"}
            }]
        })))
        .unwrap();

        assert_abs_diff_eq!(loc.lat, 43.792818, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 87.617733, epsilon = 1e-9);
        assert_eq!(loc.admin_code.as_deref(), Some("650100"));
    }

    #[test]
    fn test_forward_top_level_adcode_fallback() {
        let loc = location_from_geo(geo(json!({
            "status": "1",
            "geocodes": [{"location": "116.407400,39.904200", "adcode": " 110000 "}]
        })))
        .unwrap();
        assert_eq!(loc.admin_code.as_deref(), Some("110000"));

        let loc = location_from_geo(geo(json!({
            "status": "1",
            "geocodes": [{
                "location": "116.407400,39.904200",
                "addressComponent": {"adcode": []},
                "adcode": []
            }]
        })))
        .unwrap();
        assert_eq!(loc.admin_code, None);
    }

    #[test]
    fn test_forward_rejects_failed_status_and_empty_results() {
        assert!(location_from_geo(geo(json!({
            "status": "0",
            "geocodes": [{"location": "116.4,39.9"}]
        })))
        .is_none());
        assert!(location_from_geo(geo(json!({"status": "1", "geocodes": []}))).is_none());
        assert!(location_from_geo(geo(json!({"status": "1"}))).is_none());
        assert!(location_from_geo(geo(json!({}))).is_none());
    }

    #[test]
    fn test_forward_rejects_unparseable_location() {
        assert!(location_from_geo(geo(json!({
            "status": "1",
            "geocodes": [{"location": "116.4"}]
        })))
        .is_none());
        assert!(location_from_geo(geo(json!({
            "status": "1",
            "geocodes": [{"location": []}]
        })))
        .is_none());
        // latitude 116 is not a latitude
        assert!(location_from_geo(geo(json!({
            "status": "1",
            "geocodes": [{"location": "39.9,116.4"}]
        })))
        .is_none());
    }

    #[test]
    fn test_regeo_adcode() {
        let code = admin_code_from_regeo(regeo(json!({
            "status": "1",
            "regeocode": {"addressComponent": {"adcode": "650102"}}
        })));
        assert_eq!(code.as_deref(), Some("650102"));

        let code = admin_code_from_regeo(regeo(json!({
            "regecode": {"addressComponent": {"adcode": "650102"}}
        })));
        assert_eq!(code.as_deref(), Some("650102"));
    }

    #[test]
    fn test_regeo_missing_or_blank_adcode() {
        assert!(admin_code_from_regeo(regeo(json!({}))).is_none());
        assert!(admin_code_from_regeo(regeo(json!({"regeocode": {}}))).is_none());
        assert!(admin_code_from_regeo(regeo(json!({
            "regeocode": {"addressComponent": {"adcode": "   "}}
        })))
        .is_none());
        assert!(admin_code_from_regeo(regeo(json!({
            "regeocode": {"addressComponent": {"adcode": []}}
        })))
        .is_none());
    }

    #[tokio::test]
    async fn test_forward_geocode_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/geo"))
            .and(query_param("key", "test-key"))
            .and(query_param("address", "乌鲁木齐"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "geocodes": [{
                    "location": "87.617733,43.792818",
                    "addressComponent": {"adcode": "650100"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let loc = backend_for(&server).forward_geocode("乌鲁木齐").await.unwrap();
        assert_abs_diff_eq!(loc.lat, 43.792818, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 87.617733, epsilon = 1e-9);
        assert_eq!(loc.admin_code.as_deref(), Some("650100"));
    }

    #[tokio::test]
    async fn test_reverse_geocode_sends_lng_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/regeo"))
            .and(query_param("location", "87.617733,43.792818"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "regeocode": {"addressComponent": {"adcode": "650102"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let code = backend_for(&server).reverse_geocode(43.792818, 87.617733).await;
        assert_eq!(code.as_deref(), Some("650102"));
    }

    #[tokio::test]
    async fn test_server_error_is_no_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        assert!(backend.forward_geocode("Paris").await.is_none());
        assert!(backend.reverse_geocode(48.8566, 2.3522).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_no_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        assert!(backend_for(&server).forward_geocode("Paris").await.is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_no_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "1", "geocodes": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let backend = AmapBackend::new(server.uri(), "k", Duration::from_millis(50)).unwrap();
        assert!(backend.forward_geocode("Paris").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_no_result() {
        let backend = AmapBackend::new("http://127.0.0.1:9", "", Duration::from_secs(1)).unwrap();
        assert!(backend.forward_geocode("Paris").await.is_none());
        assert!(backend.reverse_geocode(1.0, 2.0).await.is_none());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let backend = AmapBackend::new("http://localhost:1234/v3/", "", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:1234/v3");
    }
}
