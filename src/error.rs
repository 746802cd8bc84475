//! Error types and handling for `RouteRisk`

use thiserror::Error;

/// Failure to turn a free-text address into a place.
///
/// All variants are recoverable: callers surface a message and allow a retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Address cannot be empty")]
    EmptyAddress,

    #[error("Address not found: {address}")]
    NotFound { address: String },

    #[error("Network error while geocoding: {0}")]
    Network(String),

    #[error("Invalid geocoding payload: {0}")]
    ParseFailure(String),
}

/// Failure to load an uploaded accident archive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Not a readable zip archive: {0}")]
    InvalidArchive(String),

    #[error("Archive contains no .csv or .xlsx file")]
    NoTabularFile,

    #[error("Archive contains more than one tabular file: {}", .0.join(", "))]
    MultipleTabularFiles(Vec<String>),

    #[error("No supported encoding/delimiter combination could parse the file")]
    UndecodableFormat,

    #[error("Required columns missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

/// Failure of a single external provider call.
///
/// These never reach the caller of the routing or weather components; they
/// only decide whether the next fallback tier is tried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("provider is not configured")]
    NotConfigured,

    #[error("request timed out")]
    Timeout,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("provider found no route: {0}")]
    NoRoute(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Main error type for the `RouteRisk` application
#[derive(Error, Debug)]
pub enum RouteRiskError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Address resolution errors
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Accident dataset errors
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl RouteRiskError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RouteRiskError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            RouteRiskError::Resolution(ResolutionError::EmptyAddress) => {
                "Please enter an address.".to_string()
            }
            RouteRiskError::Resolution(ResolutionError::NotFound { address }) => {
                format!("Could not find '{address}'. Try a more specific address.")
            }
            RouteRiskError::Resolution(ResolutionError::Network(_)) => {
                "Unable to reach the geocoding service. Please try again.".to_string()
            }
            RouteRiskError::Resolution(ResolutionError::ParseFailure(_)) => {
                "The geocoding service returned an unusable location. Please try again."
                    .to_string()
            }
            RouteRiskError::Load(LoadError::MissingColumns(columns)) => {
                format!("The accident file is missing columns: {}", columns.join(", "))
            }
            RouteRiskError::Load(err) => format!("Could not load the accident archive: {err}"),
        }
    }
}
