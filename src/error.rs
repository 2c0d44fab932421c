use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    HttpFetch(#[from] reqwest::Error),

    #[error("Failed to parse payload: {0}")]
    PayloadParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("Resource not found (404): {url}")]
    ResourceNotFound { url: String },

    #[error("Server error ({status}): {message} (URL: {url})")]
    ServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Client error ({status}): {message} (URL: {url})")]
    ClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Rate limit exceeded (429): {message} (URL: {url})")]
    RateLimit { message: String, url: String },

    #[error("Service unavailable ({status}): {message} (URL: {url})")]
    ServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Payload shape errors
    #[error("Resource returned malformed JSON: {message} (URL: {url})")]
    MalformedJson { message: String, url: String },

    #[error("Resource returned unexpected data structure: {message} (URL: {url})")]
    UnexpectedStructure { message: String, url: String },

    #[error("Resource returned empty or missing data: {message} (URL: {url})")]
    NoData { message: String, url: String },

    /// A required resource could not be loaded from any source and no
    /// cached copy exists. This is the page-level failure: nothing is
    /// rendered beyond an error indicator.
    #[error("Failed to load {resource} (tried {attempted})")]
    FetchFailed { resource: String, attempted: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date parsing error with context
    pub fn date_parse_error(msg: impl Into<String>) -> Self {
        Self::DateParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a resource not found error
    pub fn resource_not_found(url: impl Into<String>) -> Self {
        Self::ResourceNotFound { url: url.into() }
    }

    /// Create a server error (5xx status codes)
    pub fn server_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a client error (4xx status codes except 404 and 429)
    pub fn client_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::MalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::UnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a no data error
    pub fn no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::NoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a fetch failed error naming every attempted source
    pub fn fetch_failed(resource: impl Into<String>, attempted: &[String]) -> Self {
        Self::FetchFailed {
            resource: resource.into(),
            attempted: attempted.join(", "),
        }
    }

    /// Check if error is retryable (network issues, server errors, rate limits)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ServerError { .. }
                | AppError::ServiceUnavailable { .. }
                | AppError::RateLimit { .. }
        )
    }

    /// Check if error indicates data not found (business signal, not a
    /// technical failure). Drives the optional-resource degradation path.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ResourceNotFound { .. } | AppError::NoData { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_resource_not_found_helper() {
        let error = AppError::resource_not_found("https://example.com/data/seasons.json");
        assert!(matches!(error, AppError::ResourceNotFound { .. }));
        assert_eq!(
            error.to_string(),
            "Resource not found (404): https://example.com/data/seasons.json"
        );
    }

    #[test]
    fn test_server_error_helper() {
        let error = AppError::server_error(500, "Internal server error", "https://example.com");
        assert!(matches!(error, AppError::ServerError { .. }));
        assert_eq!(
            error.to_string(),
            "Server error (500): Internal server error (URL: https://example.com)"
        );
    }

    #[test]
    fn test_fetch_failed_names_all_sources() {
        let attempted = vec![
            "https://primary.example.com/seasons.json".to_string(),
            "https://backup.example.com/seasons.json".to_string(),
        ];
        let error = AppError::fetch_failed("seasons.json", &attempted);
        let display = error.to_string();
        assert!(display.contains("seasons.json"));
        assert!(display.contains("primary.example.com"));
        assert!(display.contains("backup.example.com"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::network_timeout("url").is_retryable());
        assert!(AppError::network_connection("url", "message").is_retryable());
        assert!(AppError::server_error(500, "message", "url").is_retryable());
        assert!(AppError::rate_limit("message", "url").is_retryable());
        assert!(AppError::service_unavailable(503, "message", "url").is_retryable());

        assert!(!AppError::resource_not_found("url").is_retryable());
        assert!(!AppError::client_error(400, "message", "url").is_retryable());
        assert!(!AppError::config_error("message").is_retryable());
        assert!(!AppError::malformed_json("message", "url").is_retryable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(AppError::resource_not_found("url").is_not_found());
        assert!(AppError::no_data("empty", "url").is_not_found());

        assert!(!AppError::server_error(500, "message", "url").is_not_found());
        assert!(!AppError::network_timeout("url").is_not_found());
        assert!(
            !AppError::fetch_failed("seasons.json", &["url".to_string()]).is_not_found(),
            "total fetch failure of a required resource is fatal, not a not-found signal"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::PayloadParse(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let invalid_toml = "invalid = [toml";
        let toml_error = toml::from_str::<serde_json::Value>(invalid_toml).unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_error_display_formats() {
        let errors = vec![
            AppError::config_error("test config error"),
            AppError::date_parse_error("test date error"),
            AppError::log_setup_error("test log error"),
            AppError::resource_not_found("https://example.com"),
            AppError::server_error(500, "server error", "https://example.com"),
            AppError::client_error(400, "client error", "https://example.com"),
            AppError::rate_limit("rate limit", "https://example.com"),
            AppError::service_unavailable(503, "unavailable", "https://example.com"),
            AppError::network_timeout("https://example.com"),
            AppError::network_connection("https://example.com", "connection failed"),
            AppError::malformed_json("bad json", "https://example.com"),
            AppError::unexpected_structure("bad structure", "https://example.com"),
            AppError::no_data("no data", "https://example.com"),
            AppError::fetch_failed("episodes.json", &["https://example.com".to_string()]),
        ];

        for error in errors {
            let display_string = error.to_string();
            assert!(
                display_string.len() > 5,
                "Error display should be descriptive: {error:?}"
            );
        }
    }
}
