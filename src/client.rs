use crate::error::{ApiError, Result};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "API_URL";

/// Create the default HTTP client for portal API requests
/// with settings suitable for connection pooling and timeouts
pub fn create_api_client() -> Client {
    ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .timeout(Duration::from_secs(300)) // 5 minutes
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

/// Configuration for the portal API client.
///
/// Holds the single external input this layer takes: the API base URL.
/// Construct it once at startup, either explicitly or from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: Url,
}

impl Config {
    /// Create a configuration from an explicit base URL
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Config {
            base_url: Url::parse(base_url)?,
        })
    }

    /// Create a configuration from the `API_URL` environment variable
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_VAR)
            .map_err(|_| ApiError::Config(format!("{} is not set", API_URL_VAR)))?;
        Config::new(&base_url)
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let config = Config::new("http://localhost:5000").unwrap();
        assert_eq!(
            config.endpoint("downloadable_files/1"),
            "http://localhost:5000/downloadable_files/1"
        );
    }

    #[test]
    fn test_endpoint_normalizes_slashes() {
        let config = Config::new("http://localhost:5000/").unwrap();
        assert_eq!(config.endpoint("/users"), "http://localhost:5000/users");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(Config::new("not a url").is_err());
    }
}
