use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use rand::{RngCore, seq::SliceRandom};

use crate::{
    assets::decode as assets_decode,
    foundation::error::{ChatstripError, ChatstripResult},
};

pub const CHARACTERS_DIR: &str = "characters";
pub const BACKGROUNDS_DIR: &str = "backgrounds";
pub const FONTS_DIR: &str = "fonts";

const FONT_EXTENSION: &str = "ttf";

#[derive(Clone, Debug)]
/// Decoded raster image in straight (non-premultiplied) RGBA8.
pub struct PreparedImage(Arc<image::RgbaImage>);

impl PreparedImage {
    pub fn new(rgba: image::RgbaImage) -> Self {
        Self(Arc::new(rgba))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn rgba(&self) -> &Arc<image::RgbaImage> {
        &self.0
    }
}

#[derive(Clone)]
/// Font file bytes that registered at least one family.
pub struct PreparedFont {
    /// Lookup name (file stem).
    pub name: String,
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for PreparedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFont")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Debug)]
/// Named character with one sprite per expression.
pub struct Character {
    name: String,
    sprites: BTreeMap<String, PreparedImage>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sprites: BTreeMap::new(),
        }
    }

    /// Builder form of [`Character::insert_sprite`].
    pub fn with_sprite(mut self, expression: impl Into<String>, sprite: PreparedImage) -> Self {
        self.insert_sprite(expression, sprite);
        self
    }

    /// Add a sprite unless the expression is already present. Returns whether it was added.
    pub fn insert_sprite(&mut self, expression: impl Into<String>, sprite: PreparedImage) -> bool {
        match self.sprites.entry(expression.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(sprite);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite(&self, expression: &str) -> Option<&PreparedImage> {
        self.sprites.get(expression)
    }

    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(String::as_str)
    }
}

/// Read-only access to characters, backgrounds and fonts.
///
/// Implementations are shared across render workers, hence `Sync`.
pub trait AssetProvider: Sync {
    fn character(&self, name: &str) -> Option<&Character>;

    /// Uniformly random loaded character, or `None` when nothing is loaded.
    fn random_character(&self, rng: &mut dyn RngCore) -> Option<&Character>;

    fn background(&self, name: &str) -> Option<&PreparedImage>;

    fn font(&self, name: &str) -> Option<&PreparedFont>;
}

#[derive(Clone, Debug, Default)]
/// In-memory asset catalog, filled from a directory tree or by hand.
pub struct AssetStore {
    characters: BTreeMap<String, Character>,
    backgrounds: BTreeMap<String, PreparedImage>,
    fonts: BTreeMap<String, PreparedFont>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every asset under `root`.
    ///
    /// Expected layout is `characters/<name>/<expression>.<ext>`, `backgrounds/<name>.<ext>` and
    /// `fonts/<name>.ttf`. Entries are visited in sorted order and the first file for a given stem
    /// wins. Files that fail to decode are logged and skipped, as are missing category
    /// directories.
    #[tracing::instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn load(root: impl AsRef<Path>) -> ChatstripResult<Self> {
        let root = root.as_ref();
        let mut out = Self::new();

        for char_dir in sorted_entries(&root.join(CHARACTERS_DIR))? {
            if !char_dir.is_dir() {
                continue;
            }
            let Some(name) = file_name(&char_dir) else {
                continue;
            };
            let mut character = Character::new(name.clone());
            for sprite_path in sorted_entries(&char_dir)? {
                let Some(expression) = file_stem(&sprite_path) else {
                    continue;
                };
                if character.sprite(&expression).is_some() {
                    continue;
                }
                match read_image(&sprite_path) {
                    Ok(img) => {
                        character.insert_sprite(expression, img);
                    }
                    Err(err) => {
                        tracing::warn!(
                            path = %sprite_path.display(),
                            error = %err,
                            "skipping sprite"
                        );
                    }
                }
            }
            if character.expressions().next().is_none() {
                tracing::warn!(character = %name, "character has no usable sprites");
                continue;
            }
            out.insert_character(character);
        }

        for bg_path in sorted_entries(&root.join(BACKGROUNDS_DIR))? {
            let Some(name) = file_stem(&bg_path) else {
                continue;
            };
            if out.backgrounds.contains_key(&name) {
                continue;
            }
            match read_image(&bg_path) {
                Ok(img) => {
                    out.insert_background(name, img);
                }
                Err(err) => {
                    tracing::warn!(path = %bg_path.display(), error = %err, "skipping background");
                }
            }
        }

        for font_path in sorted_entries(&root.join(FONTS_DIR))? {
            let is_ttf = font_path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(FONT_EXTENSION));
            if !is_ttf {
                continue;
            }
            let Some(name) = file_stem(&font_path) else {
                continue;
            };
            if out.fonts.contains_key(&name) {
                continue;
            }
            let loaded = std::fs::read(&font_path)
                .with_context(|| format!("read font '{}'", font_path.display()))
                .map_err(ChatstripError::from)
                .and_then(|bytes| assets_decode::decode_font(&name, bytes));
            match loaded {
                Ok(font) => {
                    out.insert_font(font);
                }
                Err(err) => {
                    tracing::warn!(path = %font_path.display(), error = %err, "skipping font");
                }
            }
        }

        tracing::info!(
            characters = out.character_count(),
            backgrounds = out.background_count(),
            fonts = out.font_count(),
            "assets loaded"
        );
        Ok(out)
    }

    /// Returns `false` (and keeps the existing entry) when the name is taken.
    pub fn insert_character(&mut self, character: Character) -> bool {
        if self.characters.contains_key(character.name()) {
            return false;
        }
        self.characters
            .insert(character.name().to_string(), character);
        true
    }

    pub fn insert_background(&mut self, name: impl Into<String>, image: PreparedImage) -> bool {
        let name = name.into();
        if self.backgrounds.contains_key(&name) {
            return false;
        }
        self.backgrounds.insert(name, image);
        true
    }

    pub fn insert_font(&mut self, font: PreparedFont) -> bool {
        if self.fonts.contains_key(&font.name) {
            return false;
        }
        self.fonts.insert(font.name.clone(), font);
        true
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn background_count(&self) -> usize {
        self.backgrounds.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

impl AssetProvider for AssetStore {
    fn character(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    fn random_character(&self, rng: &mut dyn RngCore) -> Option<&Character> {
        let all: Vec<&Character> = self.characters.values().collect();
        all.choose(rng).copied()
    }

    fn background(&self, name: &str) -> Option<&PreparedImage> {
        self.backgrounds.get(name)
    }

    fn font(&self, name: &str) -> Option<&PreparedFont> {
        self.fonts.get(name)
    }
}

fn read_image(path: &Path) -> ChatstripResult<PreparedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    assets_decode::decode_image(&bytes)
}

/// Sorted, non-hidden entries of `dir`; a missing directory is empty.
fn sorted_entries(dir: &Path) -> ChatstripResult<Vec<PathBuf>> {
    let rd = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "asset directory not found");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("list asset directory '{}'", dir.display()))
                .into());
        }
    };

    let mut paths = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if file_name(&path).is_some_and(|n| n.starts_with('.')) {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

fn file_stem(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
