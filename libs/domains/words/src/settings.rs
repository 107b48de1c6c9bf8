//! Named defaults for the word-association service.
//!
//! Every value can be read from the environment through [`WordsSettings::from_env`];
//! the embedding model and its dimension are fixed.

use core_config::{ConfigError, FromEnv, env_or_default};

/// Collection holding one vector per vocabulary word
pub const DEFAULT_COLLECTION_NAME: &str = "words_collection";

/// Matches must score strictly above this value
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.3;

/// Candidates requested from the vector store per search
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Sentence-transformers model every vector is produced with
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Output size of [`DEFAULT_EMBEDDING_MODEL`]
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

/// The fixed vocabulary, in presentation order.
pub const VOCABULARY: [&str; 25] = [
    "peace",
    "mountains",
    "apple",
    "travel",
    "dog",
    "art",
    "music",
    "book",
    "sun",
    "ocean",
    "friend",
    "family",
    "home",
    "food",
    "water",
    "sky",
    "earth",
    "fire",
    "wind",
    "rain",
    "snow",
    "tree",
    "flower",
    "bird",
    "love",
];

/// Search and bootstrap settings shared by the service layer
#[derive(Debug, Clone, PartialEq)]
pub struct WordsSettings {
    pub collection_name: String,
    pub score_threshold: f32,
    pub result_limit: usize,
    pub vocabulary: Vec<String>,
}

impl Default for WordsSettings {
    fn default() -> Self {
        Self {
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            result_limit: DEFAULT_RESULT_LIMIT,
            vocabulary: VOCABULARY.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl FromEnv for WordsSettings {
    /// Reads from environment variables with defaults:
    /// - WORDS_COLLECTION: defaults to "words_collection"
    /// - WORDS_SCORE_THRESHOLD: defaults to 0.3, must lie in [0, 1]
    /// - WORDS_RESULT_LIMIT: defaults to 5, must be positive
    fn from_env() -> Result<Self, ConfigError> {
        let collection_name = env_or_default("WORDS_COLLECTION", DEFAULT_COLLECTION_NAME);

        let score_threshold: f32 =
            parse_var("WORDS_SCORE_THRESHOLD", &DEFAULT_SCORE_THRESHOLD.to_string())?;
        if !(0.0..=1.0).contains(&score_threshold) {
            return Err(ConfigError::ParseError {
                key: "WORDS_SCORE_THRESHOLD".to_string(),
                details: format!("{} is outside [0, 1]", score_threshold),
            });
        }

        let result_limit: usize =
            parse_var("WORDS_RESULT_LIMIT", &DEFAULT_RESULT_LIMIT.to_string())?;
        if result_limit == 0 {
            return Err(ConfigError::ParseError {
                key: "WORDS_RESULT_LIMIT".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            collection_name,
            score_threshold,
            result_limit,
            ..Self::default()
        })
    }
}

fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}
