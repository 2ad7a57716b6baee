//! AK/SK request signing (`SDK-HMAC-SHA256`)
//!
//! Every API request carries an `X-Sdk-Date` header and an `Authorization`
//! header computed over a canonical form of the request:
//!
//! ```text
//! CanonicalRequest = Method \n
//!                    CanonicalURI \n          (path segments escaped, trailing '/')
//!                    CanonicalQueryString \n  (sorted key=value pairs)
//!                    CanonicalHeaders \n      (sorted lowercase name:value lines)
//!                    SignedHeaders \n         (lowercase names joined by ';')
//!                    HexEncode(SHA256(body))
//!
//! StringToSign     = "SDK-HMAC-SHA256" \n X-Sdk-Date \n HexEncode(SHA256(CanonicalRequest))
//! Signature        = HexEncode(HMAC-SHA256(SK, StringToSign))
//! Authorization    = "SDK-HMAC-SHA256 Access=<AK>, SignedHeaders=<..>, Signature=<..>"
//! ```

use chrono::{DateTime, Utc};
use ddns_core::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Signing algorithm identifier
pub const ALGORITHM: &str = "SDK-HMAC-SHA256";

/// Header carrying the signing timestamp
pub const SDK_DATE_HEADER: &str = "X-Sdk-Date";

/// Timestamp format of `X-Sdk-Date`
const SDK_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// A request in the shape the signer needs
#[derive(Debug, Clone)]
pub struct SignableRequest<'a> {
    /// HTTP method, upper case
    pub method: &'a str,
    /// Host (with port when not the scheme default)
    pub host: &'a str,
    /// Absolute path, unescaped
    pub path: &'a str,
    /// Query parameters
    pub query: &'a BTreeMap<&'a str, String>,
    /// Extra headers to sign (besides host and `X-Sdk-Date`)
    pub headers: &'a [(&'a str, &'a str)],
    /// Request body
    pub body: &'a [u8],
}

/// Headers to attach to a signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Value for `X-Sdk-Date`
    pub sdk_date: String,
    /// Value for `Authorization`
    pub authorization: String,
}

/// Signs requests with an access key / secret key pair
#[derive(Clone)]
pub struct Signer {
    access_key: String,
    secret_key: String,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<REDACTED>")
            .finish()
    }
}

impl Signer {
    /// Create a signer
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Sign `request` as of `now`
    pub fn sign(&self, request: &SignableRequest<'_>, now: DateTime<Utc>) -> Result<Signature> {
        let sdk_date = now.format(SDK_DATE_FORMAT).to_string();

        let mut headers: BTreeMap<String, String> = request
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        headers.insert("host".to_string(), request.host.to_string());
        headers.insert(SDK_DATE_HEADER.to_ascii_lowercase(), sdk_date.clone());

        let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_request = canonical_request(request, &headers, &signed_headers);

        let string_to_sign = format!(
            "{}\n{}\n{}",
            ALGORITHM,
            sdk_date,
            hex_sha256(canonical_request.as_bytes())
        );

        let signature = hex::encode(hmac_sha256(
            self.secret_key.as_bytes(),
            string_to_sign.as_bytes(),
        )?);

        Ok(Signature {
            sdk_date,
            authorization: format!(
                "{} Access={}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key, signed_headers, signature
            ),
        })
    }
}

/// Build the canonical request string
fn canonical_request(
    request: &SignableRequest<'_>,
    headers: &BTreeMap<String, String>,
    signed_headers: &str,
) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect();

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method,
        canonical_uri(request.path),
        canonical_query_string(request.query),
        canonical_headers,
        signed_headers,
        hex_sha256(request.body)
    )
}

/// Escape each path segment and terminate with '/'
pub(crate) fn canonical_uri(path: &str) -> String {
    let mut uri = path
        .split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/");
    if !uri.ends_with('/') {
        uri.push('/');
    }
    uri
}

/// Sorted, escaped `key=value` pairs joined by '&'
pub(crate) fn canonical_query_string(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode everything outside the RFC 3986 unreserved set
fn uri_encode(value: &str) -> String {
    use std::fmt::Write;
    let mut result = String::with_capacity(value.len() * 3);
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                let _ = write!(result, "%{:02X}", b);
            }
        }
    }
    result
}

fn hex_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| Error::auth(format!("Invalid signing key: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
