//! Renderer configuration
//!
//! Shadow defaults, render target formats and draw ordering for the deferred
//! pipeline.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::render::device::TextureFormat;

/// Shadow map settings shared by every light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Shadow map edge length used when a light does not request its own
    pub default_resolution: u32,
    /// Depth bias applied when sampling the shadow map
    pub depth_bias: f32,
    /// How dark shadowed areas get (0 = no shadow, 1 = fully dark)
    pub strength: f32,
    /// Blur radius in texels for soft shadows
    pub blur_radius: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            default_resolution: 1024,
            depth_bias: 0.005,
            strength: 0.8,
            blur_radius: 2.0,
        }
    }
}

/// Formats of the intermediate targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GBufferConfig {
    /// Albedo / material graphic target
    pub diffuse_format: TextureFormat,
    /// View-space normal target
    pub normal_format: TextureFormat,
    /// Linear depth target
    pub linear_depth_format: TextureFormat,
    /// Hardware depth-stencil buffer shared by the geometry phases
    pub depth_format: TextureFormat,
    /// Light accumulation target
    pub light_format: TextureFormat,
    /// Opaque and transparent color targets
    pub color_format: TextureFormat,
    /// Shadow map format
    pub shadow_format: TextureFormat,
}

impl Default for GBufferConfig {
    fn default() -> Self {
        Self {
            diffuse_format: TextureFormat::Rgba8Unorm,
            normal_format: TextureFormat::Rgba16Float,
            linear_depth_format: TextureFormat::R32Float,
            depth_format: TextureFormat::Depth24Stencil8,
            light_format: TextureFormat::Rgba16Float,
            color_format: TextureFormat::Rgba16Float,
            shadow_format: TextureFormat::R32Float,
        }
    }
}

/// Top-level renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color the intermediate color targets are cleared to
    pub clear_color: [f32; 4],
    /// Draw transparent buckets far-to-near instead of near-to-far
    pub sort_transparent_back_to_front: bool,
    // Tables last so the TOML form stays valid
    /// Shadow settings
    pub shadow: ShadowConfig,
    /// Intermediate target formats
    pub gbuffer: GBufferConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            sort_transparent_back_to_front: true,
            shadow: ShadowConfig::default(),
            gbuffer: GBufferConfig::default(),
        }
    }
}

impl Config for RenderConfig {}

impl RenderConfig {
    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shadow.default_resolution == 0 {
            return Err(ConfigError::Invalid(
                "shadow.default_resolution must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.shadow.strength) {
            return Err(ConfigError::Invalid(format!(
                "shadow.strength must be within 0..=1, got {}",
                self.shadow.strength
            )));
        }
        if self.shadow.blur_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "shadow.blur_radius must not be negative, got {}",
                self.shadow.blur_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shadow.default_resolution, 1024);
        assert!(config.sort_transparent_back_to_front);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RenderConfig = toml::from_str(
            r#"
            sort_transparent_back_to_front = false

            [shadow]
            default_resolution = 2048
            "#,
        )
        .unwrap();

        assert_eq!(config.shadow.default_resolution, 2048);
        assert_eq!(config.shadow.strength, ShadowConfig::default().strength);
        assert!(!config.sort_transparent_back_to_front);
        assert_eq!(config.gbuffer, GBufferConfig::default());
    }

    #[test]
    fn test_ron_config_parses() {
        let config: RenderConfig =
            ron::from_str("(shadow: (strength: 0.5), clear_color: (0.1, 0.2, 0.3, 1.0))").unwrap();

        assert_eq!(config.shadow.strength, 0.5);
        assert_eq!(config.clear_color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RenderConfig::default();
        config.shadow.default_resolution = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RenderConfig::default();
        config.shadow.strength = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_toml_file() {
        let path = std::env::temp_dir().join("deferred_engine_render_config_test.toml");

        let mut config = RenderConfig::default();
        config.shadow.default_resolution = 512;
        config.save_to_file(&path).unwrap();

        let loaded = RenderConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = RenderConfig::load_from_file("render.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let result = RenderConfig::default().save_to_file("render.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
