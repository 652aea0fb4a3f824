use crate::adapter::AttachmentKind;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_DOCUMENT_PROMPT: &str =
    "Tolong buat ringkasan dari dokumen berikut menggunakan bahasa inggris: ";
pub const DEFAULT_AUDIO_PROMPT: &str = "Tolong buatkan transkrip dari rekaman berikut";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Only ever taken from the environment or the command line
    #[serde(skip)]
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub max_upload_bytes: usize,
    pub default_prompts: DefaultPrompts,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_prompts: DefaultPrompts::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("default_prompts", &self.default_prompts)
            .finish()
    }
}

/// Prompt sent when the caller uploads a file without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPrompts {
    pub image: Option<String>,
    pub document: Option<String>,
    pub audio: Option<String>,
}

impl Default for DefaultPrompts {
    fn default() -> Self {
        DefaultPrompts {
            image: None,
            document: Some(DEFAULT_DOCUMENT_PROMPT.to_string()),
            audio: Some(DEFAULT_AUDIO_PROMPT.to_string()),
        }
    }
}

impl DefaultPrompts {
    pub fn for_kind(&self, kind: AttachmentKind) -> Option<&str> {
        match kind {
            AttachmentKind::Image => self.image.as_deref(),
            AttachmentKind::Document => self.document.as_deref(),
            AttachmentKind::Audio => self.audio.as_deref(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Default)]
pub struct Overrides {
    pub api_key: String,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub max_upload_bytes: Option<usize>,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        // An empty file is valid and means "all defaults"
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn load(path: Option<&str>, overrides: Overrides) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        config.api_key = overrides.api_key.trim().to_string();
        if let Some(model) = overrides.model {
            config.model = model;
        }
        if let Some(api_base) = overrides.api_base {
            config.api_base = api_base;
        }
        if let Some(max_upload_bytes) = overrides.max_upload_bytes {
            config.max_upload_bytes = max_upload_bytes;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!("GEMINI_API_KEY is not set");
        }
        if self.model.trim().is_empty() {
            anyhow::bail!("model must not be empty");
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            anyhow::bail!("api_base must be an http(s) url: {}", self.api_base);
        }
        Ok(())
    }
}
