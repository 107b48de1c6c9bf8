use core_config::{AppInfo, ConfigError, FromEnv, app_info, server::ServerConfig};
use domain_words::{AzureOpenAIConfig, EmbeddingConfig, StoreConfig, WordsSettings};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from `core_config` and the words domain
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub words: WordsSettings,
    pub embedding: EmbeddingConfig,
    pub store: StoreConfig,
    /// `None` unless every GPT_* variable is set; annotations then use the fallback reason
    pub completion: Option<AzureOpenAIConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8000
        let words = WordsSettings::from_env()?;
        let embedding = EmbeddingConfig::from_env()?;
        let store = StoreConfig::from_env()?;

        let completion = match AzureOpenAIConfig::from_env() {
            Ok(completion) => Some(completion),
            Err(ConfigError::MissingEnvVar(_)) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            words,
            embedding,
            store,
            completion,
        })
    }
}
