//! Layout and styling configuration
//!
//! Stored as YAML. Default location: ~/.config/strata-calibrate/config.yaml
//! Missing sections fall back to defaults, so a partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas geometry (margins, heights, row padding)
    pub canvas: CanvasConfig,
    /// Band drawing and emphasis settings
    pub bands: BandStyleConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            bands: BandStyleConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Validate and clamp every section
    pub fn validate(&mut self) {
        self.canvas.validate();
        self.bands.validate();
    }
}

/// Canvas geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Total canvas width in pixels
    pub width: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    /// Left margin holds the group labels
    pub margin_left: f32,
    /// Fixed canvas height in collapsed mode (also the expanded-mode floor)
    pub collapsed_height: f32,
    /// Pixel height per row in expanded mode
    pub expanded_row_height: f32,
    /// Fraction of each row step left as padding between rows (0.0-0.9)
    pub row_padding: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            margin_top: 30.0,
            margin_right: 40.0,
            margin_bottom: 40.0,
            margin_left: 180.0,
            collapsed_height: 600.0,
            expanded_row_height: 48.0,
            row_padding: 0.1,
        }
    }
}

impl CanvasConfig {
    /// Clamp to values the layout can work with
    pub fn validate(&mut self) {
        self.margin_top = self.margin_top.max(0.0);
        self.margin_right = self.margin_right.max(0.0);
        self.margin_bottom = self.margin_bottom.max(0.0);
        self.margin_left = self.margin_left.max(0.0);
        self.row_padding = self.row_padding.clamp(0.0, 0.9);
        self.expanded_row_height = self.expanded_row_height.max(8.0);

        // Plot area must keep at least 100px in each direction
        let min_width = self.margin_left + self.margin_right + 100.0;
        if self.width < min_width {
            self.width = min_width;
        }
        let min_height = self.margin_top + self.margin_bottom + 100.0;
        if self.collapsed_height < min_height {
            self.collapsed_height = min_height;
        }
    }

    /// Left edge of the plot area (x of depth 0)
    pub fn plot_left(&self) -> f32 {
        self.margin_left
    }

    /// Right edge of the plot area (x of depth 1)
    pub fn plot_right(&self) -> f32 {
        self.width - self.margin_right
    }
}

/// Band drawing and emphasis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandStyleConfig {
    /// Bands narrower than this are widened around their midpoint (display only)
    pub min_visual_width: f32,
    /// Width of each edge drag handle
    pub handle_width: f32,
    /// Band label font size
    pub label_size: f32,
    /// Group label font size
    pub group_label_size: f32,
    /// Fill opacity for bands in established groups
    pub established_opacity: f32,
    /// Fill opacity for bands in new groups
    pub new_group_opacity: f32,
    /// Border width for bands in new groups
    pub new_group_stroke_width: f32,
    /// Opacity of the background behind new groups
    pub new_group_background_opacity: f32,
    /// Opacity of the legend-highlighted formation
    pub highlight_opacity: f32,
    /// Outline width of the legend-highlighted formation
    pub highlight_stroke_width: f32,
    /// Opacity of the other formations while one is highlighted
    pub dimmed_opacity: f32,
    /// Opacity of formations hidden by exclusive visibility
    pub hidden_opacity: f32,
    /// Outline width while a band is being dragged
    pub drag_stroke_width: f32,
}

impl Default for BandStyleConfig {
    fn default() -> Self {
        Self {
            min_visual_width: 6.0,
            handle_width: 8.0,
            label_size: 11.0,
            group_label_size: 13.0,
            established_opacity: 0.8,
            new_group_opacity: 0.35,
            new_group_stroke_width: 1.5,
            new_group_background_opacity: 0.25,
            highlight_opacity: 0.95,
            highlight_stroke_width: 3.0,
            dimmed_opacity: 0.15,
            hidden_opacity: 0.02,
            drag_stroke_width: 2.0,
        }
    }
}

impl BandStyleConfig {
    /// Clamp opacities to 0-1 and sizes to positive values
    pub fn validate(&mut self) {
        for opacity in [
            &mut self.established_opacity,
            &mut self.new_group_opacity,
            &mut self.new_group_background_opacity,
            &mut self.highlight_opacity,
            &mut self.dimmed_opacity,
            &mut self.hidden_opacity,
        ] {
            *opacity = opacity.clamp(0.0, 1.0);
        }
        self.min_visual_width = self.min_visual_width.max(0.0);
        self.handle_width = self.handle_width.max(1.0);
        self.label_size = self.label_size.max(4.0);
        self.group_label_size = self.group_label_size.max(4.0);
        self.new_group_stroke_width = self.new_group_stroke_width.max(0.0);
        self.highlight_stroke_width = self.highlight_stroke_width.max(0.0);
        self.drag_stroke_width = self.drag_stroke_width.max(0.0);
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/strata-calibrate/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strata-calibrate")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> LayoutConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return LayoutConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<LayoutConfig>(&contents) {
            Ok(mut config) => {
                config.validate();
                log::info!(
                    "load_config: Loaded config - canvas {}px wide, collapsed height {}px",
                    config.canvas.width,
                    config.canvas.collapsed_height
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                LayoutConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: Failed to read config file: {}, using defaults", e);
            LayoutConfig::default()
        }
    }
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &LayoutConfig, path: &Path) -> Result<()> {
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: Config saved successfully");
    Ok(())
}
