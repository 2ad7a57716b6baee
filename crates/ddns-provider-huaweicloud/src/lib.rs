// # Huawei Cloud DNS Provider
//
// This crate provides the Huawei Cloud DNS implementation of
// `ddns_core::DnsProvider`.
//
// ## Behaviour
//
// - One HTTP request per trait call
// - Full error propagation, no retry, no backoff (a failed call aborts the run)
// - HTTP timeout configured (30 seconds by default)
// - Specific error mapping for HTTP status codes (401/403, 404, 429, 5xx)
// - Typed response decoding; a malformed body is a schema error
// - AK/SK request signing (`SDK-HMAC-SHA256`)
//
// ## Security Requirements
//
// - The secret key NEVER appears in logs or `Debug` output
// - Construction fails if either key is empty
//
// ## API Reference
//
// - List public zones: GET `/v2/zones?type=public&offset=..&limit=..`
// - List record sets: GET `/v2/zones/:zone_id/recordsets?offset=..&limit=..`
// - Create record set: POST `/v2/zones/:zone_id/recordsets`
// - Update record set: PUT `/v2/zones/:zone_id/recordsets/:recordset_id`

pub mod models;
pub mod signer;

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::traits::{
    DnsProvider, NewRecordSet, Page, PageRequest, RecordSet, RecordSetId, Zone, ZoneId,
};
use ddns_core::{Error, Result};
use models::{
    ApiErrorBody, ListMetadata, ListRecordSetsResponse, ListZonesResponse, UpdateRecordSetBody,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use signer::{SDK_DATE_HEADER, SignableRequest, Signer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Provider name used in logs and errors
const PROVIDER_NAME: &str = "huaweicloud";

/// Header carrying the optional project ID
const PROJECT_ID_HEADER: &str = "X-Project-Id";

const CONTENT_TYPE_JSON: &str = "application/json";

/// Huawei Cloud DNS provider
///
/// Stateless between calls: every method issues exactly one signed request.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the secret key.
#[derive(Debug)]
pub struct HuaweiCloudProvider {
    /// Request signer holding the AK/SK pair
    signer: Signer,

    /// Base URL, without trailing slash
    endpoint: String,

    /// Host (and port) of `endpoint`, as signed
    host: String,

    /// Project ID header value, if configured
    project_id: Option<String>,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl HuaweiCloudProvider {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = config.endpoint_url();
        let host = extract_host(&endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            signer: Signer::new(config.access_key.clone(), config.secret_key.clone()),
            endpoint,
            host,
            project_id: config.project_id.clone(),
            client,
        })
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sign and send one request, decoding a 2xx body into `T`
    ///
    /// `action` names the call in error messages (e.g. "Zone listing").
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &BTreeMap<&str, String>,
        body: Option<Vec<u8>>,
        action: &str,
    ) -> Result<T> {
        let body = body.unwrap_or_default();

        let mut headers: Vec<(&str, &str)> = vec![("Content-Type", CONTENT_TYPE_JSON)];
        if let Some(project_id) = self.project_id.as_deref() {
            headers.push((PROJECT_ID_HEADER, project_id));
        }

        let signature = self.signer.sign(
            &SignableRequest {
                method: method.as_str(),
                host: &self.host,
                path,
                query,
                headers: &headers,
                body: &body,
            },
            chrono::Utc::now(),
        )?;

        let mut url = format!("{}{}", self.endpoint, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&signer::canonical_query_string(query));
        }

        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header(SDK_DATE_HEADER, &signature.sdk_date)
            .header(reqwest::header::AUTHORIZATION, &signature.authorization);
        for (name, value) in &headers {
            request = request.header(*name, *value);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(map_status(status, action, &ApiErrorBody::describe(&text)));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::schema(format!("{} response could not be decoded: {}", action, e))
        })
    }
}

/// Map a non-2xx status to the error taxonomy
fn map_status(status: reqwest::StatusCode, action: &str, detail: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid access key / secret key or insufficient permissions. Status: {} - {}",
            status, detail
        )),
        404 => Error::transport(format!("{} target not found: {} - {}", action, status, detail)),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::transport(format!(
            "Huawei Cloud server error (transient): {} - {}",
            status, detail
        )),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("{} failed: {} - {}", action, status, detail),
        ),
    }
}

/// Host as it appears in the `Host` header reqwest sends
///
/// The port is kept only when it is not the scheme's default, so
/// `https://host:443` signs as `host`.
fn extract_host(endpoint: &str) -> Result<String> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| Error::config(format!("Invalid endpoint {}: {}", endpoint, e)))?;
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| Error::config(format!("Invalid endpoint: {}", endpoint)))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn page_query(page: PageRequest) -> BTreeMap<&'static str, String> {
    let mut query = BTreeMap::new();
    query.insert("offset", page.offset.to_string());
    query.insert("limit", page.limit.to_string());
    query
}

#[async_trait]
impl DnsProvider for HuaweiCloudProvider {
    async fn list_zones(&self, page: PageRequest) -> Result<Page<Zone>> {
        let mut query = page_query(page);
        query.insert("type", "public".to_string());

        let response: ListZonesResponse = self
            .send(Method::GET, "/v2/zones", &query, None, "Zone listing")
            .await?;

        Ok(Page::new(
            response.zones,
            ListMetadata::total(response.metadata.as_ref()),
        ))
    }

    async fn list_record_sets(
        &self,
        zone_id: &ZoneId,
        page: PageRequest,
    ) -> Result<Page<RecordSet>> {
        let path = format!("/v2/zones/{}/recordsets", zone_id);
        let response: ListRecordSetsResponse = self
            .send(Method::GET, &path, &page_query(page), None, "Record set listing")
            .await?;

        Ok(Page::new(
            response.recordsets,
            ListMetadata::total(response.metadata.as_ref()),
        ))
    }

    async fn create_record_set(
        &self,
        zone_id: &ZoneId,
        record: &NewRecordSet,
    ) -> Result<RecordSet> {
        let path = format!("/v2/zones/{}/recordsets", zone_id);
        let body = serde_json::to_vec(record)?;

        self.send(
            Method::POST,
            &path,
            &BTreeMap::new(),
            Some(body),
            "Record set creation",
        )
        .await
    }

    async fn update_record_set(
        &self,
        zone_id: &ZoneId,
        record_id: &RecordSetId,
        records: &[String],
    ) -> Result<RecordSet> {
        let path = format!("/v2/zones/{}/recordsets/{}", zone_id, record_id);
        let body = serde_json::to_vec(&UpdateRecordSetBody { records })?;

        self.send(
            Method::PUT,
            &path,
            &BTreeMap::new(),
            Some(body),
            "Record set update",
        )
        .await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = HuaweiCloudProvider::new(&ProviderConfig::new("ak", "sk"));
        assert!(provider.is_ok());
    }

    #[test]
    fn test_missing_keys_rejected() {
        assert!(HuaweiCloudProvider::new(&ProviderConfig::new("", "sk")).is_err());
        assert!(HuaweiCloudProvider::new(&ProviderConfig::new("ak", "")).is_err());
    }

    #[test]
    fn test_endpoint_and_host() {
        let provider = HuaweiCloudProvider::new(
            &ProviderConfig::new("ak", "sk").with_endpoint("http://127.0.0.1:8080/"),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://127.0.0.1:8080");
        assert_eq!(provider.host, "127.0.0.1:8080");

        let provider =
            HuaweiCloudProvider::new(&ProviderConfig::new("ak", "sk").with_region("ap-southeast-1"))
                .unwrap();
        assert_eq!(provider.host, "dns.ap-southeast-1.myhuaweicloud.com");
    }

    #[test]
    fn test_default_port_not_signed() {
        assert_eq!(
            extract_host("https://dns.example.com:443").unwrap(),
            "dns.example.com"
        );
        assert_eq!(extract_host("http://127.0.0.1:80/").unwrap(), "127.0.0.1");
        assert_eq!(
            extract_host("https://dns.example.com:8443/v2").unwrap(),
            "dns.example.com:8443"
        );
        assert_eq!(extract_host("http://127.0.0.1:443").unwrap(), "127.0.0.1:443");
        assert!(extract_host("not a url").is_err());
    }

    #[test]
    fn test_provider_name() {
        let provider = HuaweiCloudProvider::new(&ProviderConfig::new("ak", "sk")).unwrap();
        assert_eq!(provider.provider_name(), "huaweicloud");
    }

    #[test]
    fn test_secret_key_not_exposed_in_debug() {
        let provider =
            HuaweiCloudProvider::new(&ProviderConfig::new("ak", "secret_key_12345")).unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("HuaweiCloudProvider"));
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;

        let err = map_status(StatusCode::UNAUTHORIZED, "Zone listing", "bad sig");
        assert!(matches!(err, Error::Authentication(_)));

        let err = map_status(StatusCode::TOO_MANY_REQUESTS, "Zone listing", "");
        assert!(matches!(err, Error::RateLimited(_)));

        let err = map_status(StatusCode::BAD_GATEWAY, "Zone listing", "");
        assert!(err.is_transport());

        let err = map_status(StatusCode::NOT_FOUND, "Record set update", "DNS.0304");
        assert!(err.is_transport());
        assert!(!err.is_not_found());

        let err = map_status(StatusCode::BAD_REQUEST, "Record set creation", "DNS.0308");
        assert!(matches!(err, Error::Provider { .. }));
        assert!(err.to_string().contains("Record set creation failed"));
    }
}
