use std::time::Duration;

use reqwest::Url;

use crate::error::SourceError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("beatsense/", env!("CARGO_PKG_VERSION"));

/// Guardrails for remote sources.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Only URLs starting with this prefix may be fetched.
    pub allowed_prefix: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            allowed_prefix: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Check a remote source against the policy before any request is made.
pub fn validate_url(raw: &str, policy: &FetchPolicy) -> Result<Url, SourceError> {
    let prefix = policy
        .allowed_prefix
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(SourceError::MissingConfig("fetch.allowed_prefix"))?;

    let url = Url::parse(raw).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
    if url.scheme() != "https" {
        return Err(SourceError::InsecureScheme);
    }
    if !raw.starts_with(prefix) {
        return Err(SourceError::NotAllowed {
            prefix: prefix.to_string(),
        });
    }

    Ok(url)
}

/// Download the body of `url` with a bounded, non-retrying GET.
pub fn fetch_bytes(url: Url, policy: &FetchPolicy) -> Result<Vec<u8>, SourceError> {
    log::info!("Fetching {}", url);

    let classify = |err: reqwest::Error| {
        if err.is_timeout() {
            SourceError::Timeout(policy.timeout)
        } else {
            SourceError::Transport(err)
        }
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(policy.timeout)
        .user_agent(policy.user_agent.as_str())
        .build()
        .map_err(SourceError::Transport)?;

    let response = client.get(url).send().map_err(classify)?;
    let status = response.status();
    if !status.is_success() {
        log::error!("Response not OK: {}", status);
        return Err(SourceError::Status { status });
    }

    let bytes = response.bytes().map_err(classify)?;
    log::debug!("Fetched {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "https://cdn.example.com/storage/v1/object/public/audio-files/";

    fn policy() -> FetchPolicy {
        FetchPolicy {
            allowed_prefix: Some(PREFIX.to_string()),
            ..FetchPolicy::default()
        }
    }

    #[test]
    fn accepts_allow_listed_https_url() {
        let url = validate_url(&format!("{}user/track.mp3", PREFIX), &policy()).unwrap();
        assert_eq!(url.host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn rejects_plain_http() {
        let err = validate_url(
            "http://cdn.example.com/storage/v1/object/public/audio-files/a.mp3",
            &policy(),
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::InsecureScheme));
    }

    #[test]
    fn rejects_other_hosts_and_buckets() {
        for url in [
            "https://evil.example.net/storage/v1/object/public/audio-files/a.mp3",
            "https://cdn.example.com/storage/v1/object/public/private/a.mp3",
            "https://cdn.example.com.evil.net/storage/v1/object/public/audio-files/a.mp3",
        ] {
            let err = validate_url(url, &policy()).unwrap_err();
            assert!(matches!(err, SourceError::NotAllowed { .. }), "{}", url);
        }
    }

    #[test]
    fn rejects_malformed_url() {
        let err = validate_url("https://", &policy()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidUrl(_)));
    }

    #[test]
    fn missing_prefix_is_a_configuration_error() {
        let err = validate_url(&format!("{}a.mp3", PREFIX), &FetchPolicy::default()).unwrap_err();
        assert!(matches!(err, SourceError::MissingConfig(_)));
        assert_eq!(err.to_string(), "fetch.allowed_prefix not configured");
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(FetchPolicy::default().timeout, Duration::from_secs(30));
    }
}
