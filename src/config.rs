use std::time::Duration;

// Local-development fallbacks, used when the environment provides nothing.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:5000";
pub const DEFAULT_PAYMENT_KEY: &str = "pk_test_staynest_local";

/// Every request shares the same fixed timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub upload_base_url: String,
    pub payment_publishable_key: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_URL.to_string(),
            payment_publishable_key: DEFAULT_PAYMENT_KEY.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the environment, falling back to the
    /// local-development defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("STAYNEST_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var("STAYNEST_UPLOAD_URL") {
            config.upload_base_url = url;
        }
        if let Ok(key) = std::env::var("STAYNEST_PAYMENT_KEY") {
            config.payment_publishable_key = key;
        }
        config
    }

    /// Resolve a server-relative asset path (listing images, avatars)
    /// against the upload base. Absolute URLs pass through untouched.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.upload_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_development() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.upload_base_url, DEFAULT_UPLOAD_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn asset_url_joins_relative_paths() {
        let config = ClientConfig::default();
        assert_eq!(
            config.asset_url("/uploads/listing-1.jpg"),
            "http://localhost:5000/uploads/listing-1.jpg"
        );
        assert_eq!(
            config.asset_url("uploads/listing-1.jpg"),
            "http://localhost:5000/uploads/listing-1.jpg"
        );
    }

    #[test]
    fn asset_url_passes_absolute_urls_through() {
        let config = ClientConfig::default();
        assert_eq!(
            config.asset_url("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
    }
}
