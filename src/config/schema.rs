use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    pub default_model: Option<String>,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Speaker label used for the user's own transcript entries.
    #[serde(default = "default_display_name")]
    pub display_name: String,

    #[serde(default)]
    pub transcript: TranscriptConfig,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_display_name() -> String {
    "user".into()
}

// ── Transcript storage ───────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Base directory for session transcripts (default: workspace/chat_export)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let home = UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let parley_dir = home.join(".parley");
        Self {
            workspace_dir: parley_dir.join("workspace"),
            config_path: parley_dir.join("config.toml"),
            api_key: None,
            default_model: None,
            default_temperature: default_temperature(),
            display_name: default_display_name(),
            transcript: TranscriptConfig::default(),
        }
    }
}

impl Config {
    pub fn transcript_dir(&self) -> PathBuf {
        self.transcript
            .dir
            .clone()
            .unwrap_or_else(|| self.workspace_dir.join("chat_export"))
    }

    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        let parley_dir = home.join(".parley");
        let config_path = parley_dir.join("config.toml");

        if !parley_dir.exists() {
            fs::create_dir_all(&parley_dir)?;
            fs::create_dir_all(parley_dir.join("workspace"))?;
        }

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|error| ConfigError::Load(error.to_string()))?;
            // Set computed paths that are skipped during serialization
            config.config_path.clone_from(&config_path);
            config.workspace_dir = parley_dir.join("workspace");

            config.validate()?;
            Ok(config)
        } else {
            let config = Self {
                config_path,
                workspace_dir: parley_dir.join("workspace"),
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API key: PARLEY_API_KEY, then the Gemini conventions
        if let Ok(key) = std::env::var("PARLEY_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        // Model: PARLEY_MODEL
        if let Ok(model) = std::env::var("PARLEY_MODEL") {
            if !model.is_empty() {
                self.default_model = Some(model);
            }
        }

        // Display name: PARLEY_DISPLAY_NAME
        if let Ok(name) = std::env::var("PARLEY_DISPLAY_NAME") {
            if !name.is_empty() {
                self.display_name = name;
            }
        }

        // Transcript directory: PARLEY_TRANSCRIPT_DIR
        if let Ok(dir) = std::env::var("PARLEY_TRANSCRIPT_DIR") {
            if !dir.is_empty() {
                self.transcript.dir = Some(PathBuf::from(dir));
            }
        }

        // Temperature: PARLEY_TEMPERATURE
        if let Ok(temp_str) = std::env::var("PARLEY_TEMPERATURE") {
            if let Ok(temp) = temp_str.parse::<f64>() {
                if (0.0..=2.0).contains(&temp) {
                    self.default_temperature = temp;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::Validation(format!(
                "default_temperature must be within [0.0, 2.0], got {}",
                self.default_temperature
            )));
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|error| ConfigError::Load(format!("failed to serialize config: {error}")))?;
        fs::write(&self.config_path, toml_str)?;
        Ok(())
    }
}
