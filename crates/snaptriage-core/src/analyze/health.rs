use tracing::debug;

use crate::consts::HEALTH_TIMEOUT;

/// Availability of the classification service, for a status indicator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Checking,
    /// Reachable; carries the status reported by the service, if any.
    Ok(Option<String>),
    Unavailable,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Short state tag: `pending`, `ok` or `error`.
    pub fn state(&self) -> &'static str {
        match self {
            Self::Checking => "pending",
            Self::Ok(_) => "ok",
            Self::Unavailable => "error",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checking => write!(f, "API: checking..."),
            Self::Ok(Some(status)) => write!(f, "API: {status}"),
            Self::Ok(None) => write!(f, "API: ok"),
            Self::Unavailable => write!(f, "API: unavailable"),
        }
    }
}

/// `GET {api_url}/health`, abandoned after [`HEALTH_TIMEOUT`].
///
/// Dropping the request future on timeout cancels the underlying request.
pub async fn ping(client: &reqwest::Client, api_url: &str) -> HealthStatus {
    let url = format!("{}/health", api_url.trim_end_matches('/'));
    match tokio::time::timeout(HEALTH_TIMEOUT, fetch_status(client, &url)).await {
        Ok(status) => status,
        Err(_) => {
            debug!(url, "Health check timed out");
            HealthStatus::Unavailable
        }
    }
}

/// [`ping`], reporting [`HealthStatus::Checking`] before the request goes out
/// and the final status once it settles.
pub async fn ping_reported(
    client: &reqwest::Client,
    api_url: &str,
    mut report: impl FnMut(&HealthStatus),
) -> HealthStatus {
    report(&HealthStatus::Checking);
    let status = ping(client, api_url).await;
    report(&status);
    status
}

async fn fetch_status(client: &reqwest::Client, url: &str) -> HealthStatus {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "Health check failed");
            return HealthStatus::Unavailable;
        }
    };
    let success = response.status().is_success();
    let Ok(body) = response.text().await else {
        return HealthStatus::Unavailable;
    };
    if !success {
        return HealthStatus::Unavailable;
    }
    HealthStatus::Ok(parse_status(&body))
}

/// The `status` field of a JSON health body, when present and truthy.
///
/// `null`, `false`, `""` and numeric zero all count as absent.
pub fn parse_status(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("status")? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
