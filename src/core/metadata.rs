//! Host metadata.
//!
//! Reads the EC2 instance metadata service: user data (the zero-file source
//! for `exec` and `print`) and the instance identity document (region
//! fallback for the AWS session).

use std::cell::OnceCell;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::core::constants::{
    APP_NAME, IDENTITY_PATH, MISSING_SENTINEL, STAGE_NAME, USER_DATA_PATH, USER_DATA_SECTION,
};
use crate::error::MetadataError;

const RETRY_BACKOFF: Duration = Duration::from_millis(10);
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Source of instance metadata.
pub trait MetadataSource {
    /// Raw user data body.
    fn user_data(&self) -> Result<String, MetadataError>;

    /// Region the instance runs in.
    fn region(&self) -> Result<String, MetadataError>;
}

#[derive(Debug, Deserialize)]
struct IdentityDocument {
    region: String,
}

/// HTTP client for the instance metadata service.
///
/// Transport failures (connect, timeout) are retried with exponential
/// backoff; HTTP status codes are never retried.
pub struct HostMetadata {
    endpoint: String,
    timeout: Duration,
    retries: u32,
    client: OnceCell<Client>,
}

impl HostMetadata {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, retries: u32) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout,
            retries,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&Client, MetadataError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(MetadataError::Client)?;
        Ok(self.client.get_or_init(|| client))
    }

    fn get(&self, path: &str, what: &'static str) -> Result<String, MetadataError> {
        let url = format!("{}{}", self.endpoint, path);
        let client = self.client()?;

        let mut attempt = 0;
        let response = loop {
            debug!(url = %url, attempt, "requesting instance metadata");
            match client.get(&url).send() {
                Ok(response) => break response,
                Err(e) if attempt < self.retries && (e.is_connect() || e.is_timeout()) => {
                    let backoff = backoff(attempt);
                    warn!(error = %e, ?backoff, "metadata request failed, retrying");
                    thread::sleep(backoff);
                    attempt += 1;
                }
                Err(e) => return Err(MetadataError::Connect(e)),
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND => Err(MetadataError::NotFound(what)),
            status if !status.is_success() => Err(MetadataError::Status {
                status: status.as_u16(),
                what,
            }),
            _ => response.text().map_err(MetadataError::Connect),
        }
    }
}

/// Delay before retry number `attempt` (from 0), doubling up to a ceiling.
fn backoff(attempt: u32) -> Duration {
    2u32.checked_pow(attempt)
        .and_then(|factor| RETRY_BACKOFF.checked_mul(factor))
        .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
}

impl MetadataSource for HostMetadata {
    fn user_data(&self) -> Result<String, MetadataError> {
        self.get(USER_DATA_PATH, "user data")
    }

    fn region(&self) -> Result<String, MetadataError> {
        let body = self.get(IDENTITY_PATH, "instance identity")?;
        let identity: IdentityDocument = serde_json::from_str(&body)
            .map_err(|e| MetadataError::InvalidIdentity(e.to_string()))?;
        Ok(identity.region)
    }
}

/// Load the document stored under the `kmsenv` key of the user data.
///
/// With `ignore_missing`, a 404 yields a document holding only the reserved
/// keys set to `Missing` instead of an error.
///
/// # Errors
///
/// Returns `MetadataError` if the service is unreachable, the user data is
/// missing (and not ignored), not YAML, not a mapping, or lacks the section.
pub fn load_user_data(
    source: &dyn MetadataSource,
    ignore_missing: bool,
) -> Result<Value, MetadataError> {
    let body = match source.user_data() {
        Ok(body) => body,
        Err(MetadataError::NotFound(_)) if ignore_missing => {
            debug!("no user data, using placeholder document");
            return Ok(missing_document());
        }
        Err(e) => return Err(e),
    };

    let data: Value = serde_yaml::from_str(&body).map_err(MetadataError::InvalidYaml)?;
    let Value::Mapping(mut data) = data else {
        return Err(MetadataError::NotAMapping);
    };
    data.remove(USER_DATA_SECTION)
        .ok_or(MetadataError::MissingSection(USER_DATA_SECTION))
}

fn missing_document() -> Value {
    let mut map = Mapping::new();
    for key in [APP_NAME, STAGE_NAME] {
        map.insert(key.into(), MISSING_SENTINEL.into());
    }
    Value::Mapping(map)
}
