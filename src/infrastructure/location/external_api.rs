//! GeoIP lookup through an external HTTP API (ip-api.com and compatibles).

use std::net::IpAddr;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use tracing::{trace, warn};
use ureq::Agent;

use super::resolver::LocationResolver;

const CACHE_TTL_SECS: u64 = 15 * 60;
const CACHE_MAX_CAPACITY: u64 = 10_000;
const HTTP_TIMEOUT_SECS: u64 = 2;

/// Placeholder substituted with the client address in the URL template.
pub const IP_PLACEHOLDER: &str = "{ip}";

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// Resolves locations with a blocking HTTP call on the blocking pool.
///
/// Results, including misses, are cached per address for 15 minutes; concurrent
/// lookups of one address share a single request.
pub struct ExternalApiLocationResolver {
    url_template: String,
    cache: Cache<IpAddr, Option<String>>,
}

impl ExternalApiLocationResolver {
    /// Creates a resolver for a URL template such as
    /// `http://ip-api.com/json/{ip}?fields=status,countryCode,city`.
    pub fn new(url_template: &str) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .max_capacity(CACHE_MAX_CAPACITY)
            .build();

        Self {
            url_template: url_template.to_string(),
            cache,
        }
    }

    fn fetch_sync(url: String) -> Option<String> {
        let response = match agent().get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "GeoIP request failed");
                return None;
            }
        };

        let json: Value = match response.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "GeoIP response could not be parsed");
                return None;
            }
        };

        format_location(&json)
    }

    async fn fetch(&self, ip: IpAddr) -> Option<String> {
        let url = self.url_template.replace(IP_PLACEHOLDER, &ip.to_string());

        tokio::task::spawn_blocking(move || Self::fetch_sync(url))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "GeoIP lookup task failed");
                None
            })
    }
}

#[async_trait]
impl LocationResolver for ExternalApiLocationResolver {
    async fn resolve(&self, ip: IpAddr) -> Option<String> {
        if !is_public(ip) {
            return None;
        }

        self.cache
            .get_with(ip, async {
                trace!(%ip, "GeoIP cache miss");
                self.fetch(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "ExternalApi"
    }
}

/// Builds `"City, CC"` or `"CC"` from a lookup response.
fn format_location(json: &Value) -> Option<String> {
    if json["status"].as_str() == Some("fail") {
        return None;
    }

    let country = json["countryCode"]
        .as_str()
        .or_else(|| json["country_code"].as_str())
        .or_else(|| json["country"].as_str())
        .filter(|c| !c.is_empty())?;

    match json["city"].as_str().filter(|c| !c.is_empty()) {
        Some(city) => Some(format!("{city}, {country}")),
        None => Some(country.to_string()),
    }
}

/// Addresses worth sending to a public GeoIP service.
fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation())
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public(IpAddr::V4(v4));
            }
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local())
        }
    }
}
