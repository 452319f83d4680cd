use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Pagination failed on {url}: {message}")]
    Pagination { url: String, message: String },

    #[error("Invalid score token '{token}'")]
    InvalidScore { token: String },

    #[error("Malformed date '{raw}': {reason}")]
    InvalidDate { raw: String, reason: String },

    #[error("Schema mismatch in season {season}: {details}")]
    SchemaMismatch { season: String, details: String },

    #[error("Invalid season range: {0}")]
    InvalidSeason(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Season {season} failed: {source}")]
    Season {
        season: String,
        #[source]
        source: Box<ScraperError>,
    },
}

impl ScraperError {
    /// Attach the season label a failure happened in.
    pub fn in_season(self, season: &str) -> Self {
        match self {
            already @ ScraperError::Season { .. } => already,
            other => ScraperError::Season {
                season: season.to_string(),
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
