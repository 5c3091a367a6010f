//! Image resolution and embedding.
//!
//! Pictures are read from local directories on every render and embedded
//! into the page as base64 `data:` URIs, so the served HTML is fully
//! self-contained. A missing character icon is an operator problem, not a
//! viewer problem: it logs a warning and the card renders without the
//! image.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::warn;

use crate::config::AssetsConfig;

/// Per-character accent colors, keyed by lowercased character name.
const CHARACTER_COLORS: &[(&str, &str)] = &[
    ("mario", "#ff4b4b"),
    ("luigi", "#4caf50"),
    ("peach", "#ffb6c1"),
    ("toad", "#f5e050"),
    ("yoshi", "#7ed957"),
    ("bowser", "#ff9f00"),
    ("donkey kong", "#a56b46"),
    ("wario", "#fdda24"),
    ("rosalina", "#66d3ff"),
];

const DEFAULT_COLOR: &str = "#ffffff";

/// Accent color for a character, with a neutral fallback.
pub fn character_color(character: Option<&str>) -> &'static str {
    let Some(character) = character else {
        return DEFAULT_COLOR;
    };
    let lowered = character.trim().to_lowercase();
    CHARACTER_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Card border color and glow shadow for a leaderboard position.
pub fn podium_style(rank: u32) -> (&'static str, &'static str) {
    match rank {
        1 => ("#FFD700", "0 0 15px #FFD700, 0 0 30px #FFF176"),
        2 => ("#C0C0C0", "0 0 15px #C0C0C0, 0 0 30px #E0E0E0"),
        3 => ("#CD7F32", "0 0 15px #CD7F32, 0 0 30px #FFB266"),
        _ => ("#FF4B4B", "0 0 15px #FF4B4B, 0 0 30px #FF9999"),
    }
}

/// Resolves and embeds image files for the renderer.
#[derive(Debug, Clone)]
pub struct AssetStore {
    player_dir: PathBuf,
    character_dir: PathBuf,
    background: PathBuf,
    crown: PathBuf,
}

impl AssetStore {
    pub fn new(config: &AssetsConfig) -> Self {
        Self {
            player_dir: config.player_pics.clone(),
            character_dir: config.character_pics.clone(),
            background: config.background.clone(),
            crown: config.crown.clone(),
        }
    }

    /// Data URI for a player picture filename from the roster.
    pub fn player_image(&self, filename: &str) -> Option<String> {
        data_uri(&self.player_dir.join(filename))
    }

    /// Data URI for a character icon, resolved as
    /// `<lowercase, spaces to underscores>.png`.
    ///
    /// Missing icons degrade to no image, with a warning for the
    /// operator.
    pub fn character_image(&self, character: &str) -> Option<String> {
        let name = character.trim().to_lowercase().replace(' ', "_");
        let path = self.character_dir.join(format!("{}.png", name));
        if !path.exists() {
            warn!("Missing character image: {}", path.display());
            return None;
        }
        data_uri(&path)
    }

    /// Data URI for the page background, when configured and present.
    pub fn background_image(&self) -> Option<String> {
        data_uri(&self.background)
    }

    /// Data URI for the rank-1 crown overlay.
    pub fn crown_image(&self) -> Option<String> {
        data_uri(&self.crown)
    }
}

/// Read a file and encode it as a `data:` URI. Any read failure yields
/// `None`; image problems never fail a page.
fn data_uri(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    };
    Some(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}
