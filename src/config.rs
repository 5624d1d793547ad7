use crate::errors::ConfigError;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CourtyardOffset {
    pub default: f64,
    pub connector: f64,
}

impl Default for CourtyardOffset {
    fn default() -> Self {
        Self { default: 0.25, connector: 0.5 }
    }
}

/// Drawing options shared by all generators. Every key is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub fab_line_width: f64,
    pub silk_line_width: f64,
    pub courtyard_line_width: f64,
    pub courtyard_offset: CourtyardOffset,
    pub courtyard_grid: f64,
    pub silk_fab_offset: f64,
    pub silk_pad_clearance: f64,
    pub fab_text_size: f64,
    pub silk_text_size: f64,
    pub text_thickness: f64,
    pub fp_name_format_string: String,
    pub lib_name_format_string: String,
    #[serde(alias = "3d_model_prefix")]
    pub model3d_path_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fab_line_width: 0.1,
            silk_line_width: 0.12,
            courtyard_line_width: 0.05,
            courtyard_offset: CourtyardOffset::default(),
            courtyard_grid: 0.01,
            silk_fab_offset: 0.11,
            silk_pad_clearance: 0.2,
            fab_text_size: 1.0,
            silk_text_size: 1.0,
            text_thickness: 0.15,
            fp_name_format_string: "{man}_{series}_{mpn}_1x{num_pins:02}_P{pitch:.2f}mm_{orientation}".into(),
            lib_name_format_string: "Connector_{man}".into(),
            model3d_path_prefix: "${KISYS3DMOD}/".into(),
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<GeneratorConfig, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config = Self::from_yaml(&data)?;
        debug!(path = %path.display(), "loaded generator configuration");
        Ok(config)
    }

    pub fn from_yaml(data: &str) -> Result<GeneratorConfig, ConfigError> {
        // an empty document deserializes to unit, not to a map of defaults
        if data.trim().is_empty() {
            return Ok(GeneratorConfig::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    /// `<prefix><lib>.3dshapes/<footprint>.wrl`
    pub fn model_path(&self, lib_name: &str, footprint_name: &str) -> String {
        format!("{}{lib_name}.3dshapes/{footprint_name}.wrl", self.model3d_path_prefix)
    }
}

/// Expands `{key}`, `{key:02}` (zero padded) and `{key:.2f}` (fixed decimals) placeholders.
pub fn render_template(template: &str, values: &[(&str, String)]) -> Result<String, ConfigError> {
    let re = Regex::new(r"\{(\w+)(?::(?:0?(\d+)d?|\.(\d+)f|s))?\}")?;
    let mut missing = None;
    let rendered = re.replace_all(template, |caps: &Captures| {
        let key = &caps[1];
        let Some((_, value)) = values.iter().find(|(name, _)| *name == key) else {
            missing.get_or_insert_with(|| key.to_string());
            return String::new();
        };
        if let Some(width) = caps.get(2).and_then(|w| w.as_str().parse::<usize>().ok()) {
            format!("{value:0>width$}")
        } else if let Some(precision) = caps.get(3).and_then(|p| p.as_str().parse::<usize>().ok()) {
            match value.parse::<f64>() {
                Ok(number) => format!("{number:.precision$}"),
                Err(_) => value.clone(),
            }
        } else {
            value.clone()
        }
    });
    match missing {
        Some(key) => Err(ConfigError::UnknownPlaceholder(key)),
        None => Ok(rendered.into_owned()),
    }
}
