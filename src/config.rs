use std::{fs::File, io::BufReader, path::Path};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    foundation::error::{ChatstripError, ChatstripResult},
    render::pipeline::RenderThreading,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Run settings for turning a script into a comic.
///
/// Every field has a default, so an empty JSON object is a valid config.
pub struct ComicConfig {
    /// Panels per grid row.
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Background asset name shared by every panel.
    #[serde(default = "default_background")]
    pub background: String,
    /// Font asset name used for bubble text.
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f32,
    /// Sprite expression drawn for every character.
    #[serde(default = "default_expression")]
    pub expression: String,
    /// Output PNG path, relative to the working directory.
    #[serde(default = "default_output")]
    pub output: String,
    /// Seed for casting speakers without a matching character; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub threading: RenderThreading,
}

fn default_columns() -> usize {
    4
}

fn default_background() -> String {
    "basket".to_string()
}

fn default_font() -> String {
    "ldfcomicsansb".to_string()
}

fn default_font_size_px() -> f32 {
    16.0
}

fn default_expression() -> String {
    "neutral".to_string()
}

fn default_output() -> String {
    "combined.png".to_string()
}

impl Default for ComicConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            background: default_background(),
            font: default_font(),
            font_size_px: default_font_size_px(),
            expression: default_expression(),
            output: default_output(),
            seed: None,
            threading: RenderThreading::default(),
        }
    }
}

impl ComicConfig {
    pub fn from_json_str(s: &str) -> ChatstripResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ChatstripError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ChatstripResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ChatstripError::config(format!("open config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            ChatstripError::config(format!("parse config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`ComicConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> ChatstripResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> ChatstripResult<()> {
        if self.columns == 0 {
            return Err(ChatstripError::config("columns must be >= 1"));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChatstripError::config("font_size_px must be finite and > 0"));
        }
        for (field, value) in [
            ("background", &self.background),
            ("font", &self.font),
            ("expression", &self.expression),
            ("output", &self.output),
        ] {
            if value.trim().is_empty() {
                return Err(ChatstripError::config(format!("{field} must be non-empty")));
            }
        }
        if self.threading.threads == Some(0) {
            return Err(ChatstripError::config("threading.threads must be >= 1 when set"));
        }
        Ok(())
    }

    /// RNG for casting: seeded when [`ComicConfig::seed`] is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
