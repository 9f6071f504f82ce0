//! JSON canvas descriptions
//!
//! A config names the canvas size and background plus an ordered list of
//! solid-color sprites. Building one yields a ready canvas with the visible
//! sprites already composited, lowest first.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buffer::PixelBuffer;
use crate::canvas::Canvas;
use crate::error::{CanvasError, Result};
use crate::sprite::check_sprite_size;

/// One sprite in a [`CanvasConfig`], filled with a single color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSpec {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub visible: bool,
    /// ARGB fill, transparent when absent
    #[serde(default)]
    pub fill: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background: u32,
    /// Bottom layer first
    #[serde(default)]
    pub sprites: Vec<SpriteSpec>,
}

impl CanvasConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: 0,
            sprites: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: u32) -> Self {
        self.background = background;
        self
    }

    pub fn add_sprite(&mut self, sprite: SpriteSpec) {
        self.sprites.push(sprite);
    }

    /// Reject sizes a canvas or sprite could not be built with
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(CanvasError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        for sprite in &self.sprites {
            check_sprite_size(sprite.width, sprite.height)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON description
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| CanvasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CanvasError::Config(e.to_string()))
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "saved canvas config");
        Ok(())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        debug!(path = %path.display(), sprites = config.sprites.len(), "loaded canvas config");
        Ok(config)
    }

    /// Create the described canvas and its sprites
    pub fn build(&self) -> Result<Canvas> {
        self.validate()?;
        let mut canvas = Canvas::with_color(self.width, self.height, self.background)?;
        for spec in &self.sprites {
            let content = PixelBuffer::filled(spec.width, spec.height, spec.fill)?;
            let id = canvas.create_sprite_from(spec.x, spec.y, content)?;
            if spec.visible {
                canvas.show_sprite(id)?;
            }
        }
        info!(
            width = self.width,
            height = self.height,
            sprites = self.sprites.len(),
            "built canvas from config"
        );
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanvasConfig {
        let mut config = CanvasConfig::new(6, 4).with_background(0xFF000000);
        config.add_sprite(SpriteSpec {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
            visible: true,
            fill: 0xFFFF0000,
        });
        config.add_sprite(SpriteSpec {
            x: 2,
            y: 2,
            width: 2,
            height: 2,
            visible: false,
            fill: 0xFF00FF00,
        });
        config
    }

    #[test]
    fn test_build_shows_visible_sprites() {
        let canvas = sample().build().unwrap();
        assert_eq!(canvas.sprite_count(), 2);
        assert_eq!(canvas.pick(1, 1).unwrap(), 0xFFFF0000);
        assert_eq!(canvas.pick(3, 3).unwrap(), 0xFF000000);
        assert!(!canvas.sprites()[1].is_visible());
    }

    #[test]
    fn test_json_defaults() {
        let config = CanvasConfig::from_json(
            r#"{ "width": 3, "height": 2, "sprites": [ { "x": 0, "y": 0, "width": 1, "height": 1 } ] }"#,
        )
        .unwrap();
        assert_eq!(config.background, 0);
        assert!(!config.sprites[0].visible);
        assert_eq!(config.sprites[0].fill, 0);
    }

    #[test]
    fn test_json_rejects_bad_input() {
        assert!(matches!(
            CanvasConfig::from_json("{ not json"),
            Err(CanvasError::Config(_))
        ));
        assert!(matches!(
            CanvasConfig::from_json(r#"{ "width": 0, "height": 2 }"#),
            Err(CanvasError::InvalidSize { .. })
        ));
        assert!(CanvasConfig::from_json(
            r#"{ "width": 2, "height": 2, "sprites": [ { "x": 0, "y": 0, "width": 0, "height": 1 } ] }"#
        )
        .is_err());
    }

    #[test]
    fn test_save_load_file() {
        let path = std::env::temp_dir().join(format!("spritecanvas-config-{}.json", std::process::id()));
        let config = sample();
        config.save(&path).unwrap();
        let loaded = CanvasConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("spritecanvas-config-does-not-exist.json");
        assert!(matches!(CanvasConfig::load(path), Err(CanvasError::Io(_))));
    }
}
