use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::quiz::sampler::DEFAULT_QUESTIONS_PER_GAME;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("Failed to load config: {}", e)));

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub quiz: QuizConfig,
    pub storage: StorageConfig,
    pub local: LocalConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub code: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizConfig {
    pub questions_per_game: usize,
    pub positive_from: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
    pub questions_object: String,
    pub sign_ttl_secs: u64,
    pub cache_ttl_secs: u64,
}

impl StorageConfig {
    /// Remote storage is only used when every connection value is present.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.service_key.is_empty() && !self.bucket.is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalConfig {
    pub questions_path: String,
    pub media_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.address", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("admin.code", "admin246")?
            .set_default("quiz.questions_per_game", DEFAULT_QUESTIONS_PER_GAME as i64)?
            .set_default("quiz.positive_from", 61)?
            .set_default("storage.url", "")?
            .set_default("storage.service_key", "")?
            .set_default("storage.bucket", "")?
            .set_default("storage.questions_object", "data/questions.json")?
            .set_default("storage.sign_ttl_secs", 300)?
            .set_default("storage.cache_ttl_secs", 120)?
            .set_default("local.questions_path", "data/questions.json")?
            .set_default("local.media_dir", "media")?
            .set_default("session.idle_ttl_secs", 3600)?
            .set_default("session.sweep_interval_secs", 300)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<AppConfig>()?
            .validated()
    }

    /// Rejects values that would stall the sweeper or start empty games.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let positive = [
            ("quiz.questions_per_game", self.quiz.questions_per_game as u64),
            ("storage.sign_ttl_secs", self.storage.sign_ttl_secs),
            ("session.idle_ttl_secs", self.session.idle_ttl_secs),
            ("session.sweep_interval_secs", self.session.sweep_interval_secs),
        ];

        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Message(format!("{} must be greater than 0", key)));
        }

        Ok(self)
    }
}
