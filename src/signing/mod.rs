//! AWS Signature V4 signing.
//!
//! Only what the secret store client needs: header-based signing of a single
//! request with the current time.

mod canonical;

pub use canonical::{build_canonical_request, build_signed_headers, uri_encode};

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use url::Url;

use crate::credentials::AwsCredentials;
use crate::error::SigningError;

type HmacSha256 = Hmac<Sha256>;

/// AWS Signature V4 algorithm identifier.
pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Calculate SHA-256 hash of data.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Calculate HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| SigningError::InvalidKey {
        message: e.to_string(),
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the signing key.
///
/// kDate = HMAC("AWS4" + SecretKey, Date)
/// kRegion = HMAC(kDate, Region)
/// kService = HMAC(kRegion, Service)
/// kSigning = HMAC(kService, "aws4_request")
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, SigningError> {
    let k_secret = format!("AWS4{}", secret_key);
    let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// `{date}/{region}/{service}/aws4_request`
pub fn build_credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/aws4_request", date_stamp, region, service)
}

/// `YYYYMMDD'T'HHMMSS'Z'`
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `YYYYMMDD`
pub fn format_date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

/// Check if a header should be signed.
pub fn should_sign_header(header_name: &str) -> bool {
    let name_lower = header_name.to_lowercase();
    name_lower == "host" || name_lower == "content-type" || name_lower.starts_with("x-amz-")
}

/// Request signer for one service in one region.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    region: String,
    service: String,
}

impl RequestSigner {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    /// Sign a request and return the headers to send, including the
    /// caller's headers, `host`, `x-amz-date`, `authorization` and, for
    /// temporary credentials, `x-amz-security-token`.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: &[u8],
        credentials: &AwsCredentials,
        timestamp: &DateTime<Utc>,
    ) -> Result<HashMap<String, String>, SigningError> {
        let host = url.host_str().ok_or_else(|| SigningError::InvalidUrl {
            url: url.to_string(),
        })?;
        let host_value = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let amz_date = format_datetime(timestamp);
        let date_stamp = format_date_stamp(timestamp);
        let payload_hash = sha256_hex(body);

        let mut signing_headers: Vec<(String, String)> = vec![
            ("host".to_string(), host_value),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        if let Some(token) = credentials.session_token() {
            signing_headers.push(("x-amz-security-token".to_string(), token.to_string()));
        }
        for (name, value) in headers {
            let name_lower = name.to_lowercase();
            if name_lower != "host" && name_lower != "x-amz-date" {
                signing_headers.push((name_lower, value.clone()));
            }
        }

        let canonical_request = build_canonical_request(
            method,
            url.path(),
            url.query().unwrap_or(""),
            &signing_headers,
            &payload_hash,
        );

        let credential_scope = build_credential_scope(&date_stamp, &self.region, &self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            AWS_ALGORITHM,
            amz_date,
            credential_scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let signing_key = derive_signing_key(
            credentials.secret_access_key(),
            &date_stamp,
            &self.region,
            &self.service,
        )?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            AWS_ALGORITHM,
            credentials.access_key_id(),
            credential_scope,
            build_signed_headers(&signing_headers),
            signature
        );

        let mut signed: HashMap<String, String> = signing_headers.into_iter().collect();
        signed.insert("authorization".to_string(), authorization);
        Ok(signed)
    }
}
