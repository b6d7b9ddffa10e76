use thiserror::Error;

const LIST_FAILURE_MESSAGE: &str =
    "Failed to fetch photos. Please check your internet connection and try again.";
const DETAIL_FAILURE_MESSAGE: &str =
    "Failed to fetch photo details. This photo may not exist or may be temporarily unavailable.";

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Photo API returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Photo {id} not found")]
    NotFound { id: String },

    #[error("Failed to load photo {id}: {source}")]
    Detail {
        id: String,
        #[source]
        source: Box<GalleryError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GalleryError {
    /// Transport failures and non-success statuses from the photo API.
    pub fn is_network(&self) -> bool {
        match self {
            GalleryError::Network(_) | GalleryError::Status { .. } => true,
            GalleryError::Detail { source, .. } => source.is_network(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GalleryError::NotFound { .. })
    }

    /// Tags a failure from the single photo lookup so it is reported as such.
    pub fn for_photo(self, id: &str) -> Self {
        match self {
            GalleryError::NotFound { .. } | GalleryError::Detail { .. } => self,
            other => GalleryError::Detail {
                id: id.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Message suitable for showing to the person browsing the gallery.
    pub fn user_friendly_message(&self) -> String {
        match self {
            GalleryError::Network(_) | GalleryError::Status { .. } => {
                LIST_FAILURE_MESSAGE.to_string()
            }
            GalleryError::NotFound { .. } | GalleryError::Detail { .. } => {
                DETAIL_FAILURE_MESSAGE.to_string()
            }
            GalleryError::ConfigError { .. }
            | GalleryError::InvalidConfigValueError { .. }
            | GalleryError::MissingConfigError { .. }
            | GalleryError::UrlError(_) => format!("Invalid configuration: {}", self),
            GalleryError::IoError(_) | GalleryError::SerializationError(_) => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GalleryError::Network(_) | GalleryError::Status { .. } => {
                "Check your network connection and request the page again"
            }
            GalleryError::NotFound { .. } => "Go back to the gallery and pick another photo",
            GalleryError::Detail { source, .. } => source.recovery_suggestion(),
            GalleryError::ConfigError { .. }
            | GalleryError::InvalidConfigValueError { .. }
            | GalleryError::MissingConfigError { .. }
            | GalleryError::UrlError(_) => "Fix the configuration file or command line flags",
            GalleryError::IoError(_) => "Make sure the configuration file exists and is readable",
            GalleryError::SerializationError(_) => "The photo API returned an unexpected payload",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GalleryError::Network(_) | GalleryError::Status { .. } => ErrorSeverity::Medium,
            GalleryError::Detail { source, .. } => source.severity(),
            GalleryError::NotFound { .. } | GalleryError::SerializationError(_) => {
                ErrorSeverity::High
            }
            GalleryError::IoError(_)
            | GalleryError::UrlError(_)
            | GalleryError::ConfigError { .. }
            | GalleryError::InvalidConfigValueError { .. }
            | GalleryError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_network() {
        let err = GalleryError::Status {
            status: 503,
            url: "https://picsum.photos/v2/list".to_string(),
        };
        assert!(err.is_network());
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), LIST_FAILURE_MESSAGE);
    }

    #[test]
    fn test_not_found_message() {
        let err = GalleryError::NotFound {
            id: "9999".to_string(),
        };
        assert!(!err.is_network());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Photo 9999 not found");
        assert_eq!(err.user_friendly_message(), DETAIL_FAILURE_MESSAGE);
    }

    #[test]
    fn test_detail_failure_keeps_network_nature() {
        let err = GalleryError::Status {
            status: 502,
            url: "https://picsum.photos/id/7/info".to_string(),
        }
        .for_photo("7");

        assert!(err.is_network());
        assert!(!err.is_not_found());
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), DETAIL_FAILURE_MESSAGE);
        assert!(err.to_string().starts_with("Failed to load photo 7"));
    }

    #[test]
    fn test_for_photo_leaves_not_found_alone() {
        let err = GalleryError::NotFound {
            id: "7".to_string(),
        }
        .for_photo("7");
        assert!(err.is_not_found());
    }
}
