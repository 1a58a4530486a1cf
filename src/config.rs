use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Settings for the speech-recognition buttons in the recipe dialogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// OpenAI-compatible transcription endpoint the utterance is posted to.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Recognition locale sent with every request.
    pub locale: String,
    /// How long a session may stay listening before it is cut off.
    pub listen_timeout_secs: u64,
    /// Automatic retries for network-class recognition failures.
    pub network_retries: u32,
    /// Delay before each of those retries, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/audio/transcriptions".into(),
            api_key: String::new(),
            model: "whisper-1".into(),
            locale: "en-US".into(),
            listen_timeout_secs: 15,
            network_retries: 2,
            retry_backoff_ms: 1000,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the recipe API.
    pub api_base_url: String,
    pub speech: SpeechConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000/api/v1".into(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Config {
    /// Directory: ~/.config/recipe-desk/
    fn dir() -> PathBuf {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("recipe-desk");
        p
    }

    fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from disk, returning defaults if file doesn't exist or is invalid.
    pub fn load() -> Self {
        let path = Self::path();
        match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let dir = Self::dir();
        fs::create_dir_all(&dir)?;
        let data = serde_json::to_string_pretty(self)?;
        fs::write(Self::path(), data)?;
        Ok(())
    }
}
