//! Remote service session bootstrap.
//!
//! Credential handling is a one-time setup step performed by the
//! hosting environment: it mints an access token and exposes it (plus
//! the service-account document, for the project id) through the
//! environment. If the bootstrap fails the whole system is unusable,
//! so callers treat [`StatsError::Authentication`] as fatal.

use serde_json::Value;

use crate::StatsError;

/// Default API endpoint of the remote geospatial service.
pub const DEFAULT_BASE_URL: &str = "https://earthengine.googleapis.com";

/// An authenticated session against the remote geospatial service.
#[derive(Debug, Clone)]
pub struct EeSession {
    client: reqwest::Client,
    base_url: String,
    project: String,
    token: String,
}

impl EeSession {
    /// Creates a session from explicit parts.
    #[must_use]
    pub fn new(base_url: impl Into<String>, project: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            project: project.into(),
            token: token.into(),
        }
    }

    /// Bootstraps a session from the environment.
    ///
    /// Reads `EE_ACCESS_TOKEN` (required), the project id from
    /// `EE_PROJECT` or the `project_id` field of the
    /// `SERVICE_ACCOUNT_JSON` document, and `EE_BASE_URL` (defaults to
    /// [`DEFAULT_BASE_URL`]).
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Authentication`] if the token or project
    /// id is missing, or [`StatsError::Json`] if the service-account
    /// document is not valid JSON.
    pub fn from_env() -> Result<Self, StatsError> {
        let token = non_empty_var("EE_ACCESS_TOKEN").ok_or_else(|| StatsError::Authentication {
            message: "EE_ACCESS_TOKEN is not set; mint one with the hosting environment's \
                      credential mechanism"
                .to_string(),
        })?;

        let account_project = match non_empty_var("SERVICE_ACCOUNT_JSON") {
            Some(raw) => {
                let account: Value = serde_json::from_str(&raw)?;
                account
                    .get("project_id")
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
            }
            None => None,
        };

        let project = non_empty_var("EE_PROJECT").or(account_project).ok_or_else(|| {
            StatsError::Authentication {
                message: "no project id: set EE_PROJECT or provide a SERVICE_ACCOUNT_JSON \
                          document with a project_id field"
                    .to_string(),
            }
        })?;

        let base_url =
            non_empty_var("EE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        log::info!("Remote service session ready (project {project})");
        Ok(Self::new(base_url, project, token))
    }

    /// The shared HTTP client for this session.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Bearer token presented on every request.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Endpoint for grouped area aggregation requests.
    #[must_use]
    pub fn zonal_statistics_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/zonalStatistics:compute",
            self.base_url.trim_end_matches('/'),
            self.project
        )
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_zonal_statistics_url() {
        let session = EeSession::new("https://example.test/", "demo-project", "tok");
        assert_eq!(
            session.zonal_statistics_url(),
            "https://example.test/v1/projects/demo-project/zonalStatistics:compute"
        );
    }
}
