//! Blocking HTTP client for the MagicPod REST API.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ApiError, Collection, RemoteSource};
use crate::locale::Locale;
use crate::model::Record;

/// Connection settings for [`MagicPodClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, for example `https://app.magicpod.com/api/v1.0`.
    pub base_url: String,
    /// API token sent as `Authorization: Token <token>`.
    pub token: String,
    /// Organization name.
    pub organization: String,
    /// Project name.
    pub project: String,
    /// Language requested for step text.
    pub locale: Locale,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***REDACTED***")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("locale", &self.locale)
            .finish()
    }
}

/// [`RemoteSource`] backed by the MagicPod REST API.
///
/// Requests are issued one at a time on the calling thread. Timeouts are left
/// at the transport defaults and failed requests are not retried.
#[derive(Debug)]
pub struct MagicPodClient {
    agent: ureq::Agent,
    project_url: Url,
    authorization: String,
    locale: Locale,
}

impl MagicPodClient {
    /// Build a client for one project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the base URL cannot be parsed or
    /// cannot carry path segments.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut project_url = Url::parse(&config.base_url).map_err(|err| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            reason: err.to_string(),
        })?;
        project_url
            .path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: config.base_url.clone(),
                reason: String::from("URL cannot have path segments"),
            })?
            .pop_if_empty()
            .extend([config.organization.as_str(), config.project.as_str()]);
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build();
        Ok(Self {
            agent,
            project_url,
            authorization: format!("Token {}", config.token),
            locale: config.locale,
        })
    }

    /// URL of a collection listing, or of one record when `number` is given.
    fn url(&self, collection: Collection, number: Option<u64>) -> Url {
        let mut url = self.project_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection.path());
            if let Some(n) = number {
                segments.push(&n.to_string());
            }
            // Trailing slash, as the API expects.
            segments.push("");
        }
        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        debug!(url = %url, "request");
        let response = self
            .agent
            .request_url("GET", url)
            .set("Authorization", &self.authorization)
            .set("Content-Type", "application/json")
            .set("Accept-Language", self.locale.tag())
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => ApiError::Status {
                    url: url.to_string(),
                    status,
                    reason: response.status_text().to_owned(),
                },
                ureq::Error::Transport(transport) => ApiError::Transport {
                    url: url.to_string(),
                    source: Box::new(transport),
                },
            })?;
        serde_json::from_reader(response.into_reader()).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl RemoteSource for MagicPodClient {
    fn fetch_page(&self, collection: Collection, min_number: u64) -> Result<Vec<Record>, ApiError> {
        let mut url = self.url(collection, None);
        url.query_pairs_mut()
            .append_pair(collection.cursor_param(), &min_number.to_string());
        let mut page: Record = self.get_json(&url)?;
        let missing = || ApiError::MissingField {
            record: format!("{} page", collection.noun()),
            field: collection.list_key(),
        };
        let Some(Value::Array(items)) = page.remove(collection.list_key()) else {
            return Err(missing());
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(missing()),
            })
            .collect()
    }

    fn fetch_one(&self, collection: Collection, number: u64) -> Result<Record, ApiError> {
        self.get_json(&self.url(collection, Some(number)))
    }
}
