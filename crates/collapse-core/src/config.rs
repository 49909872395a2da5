//! Engine configuration.
//!
//! A [`CollapseConfig`] is read once when a document session starts and handed to the
//! components that need it. It deserializes from YAML; every field is optional and falls back to
//! its default. The camel-case option names used by older setups (`doCollapsibleHeaders`,
//! `indentLevels`, ...) are accepted as aliases.
//!
//! ```rust
//! use collapse_core::CollapseConfig;
//!
//! let config = CollapseConfig::from_yaml_str("indentLevels: 4\nenable_list_collapse: false\n").unwrap();
//! assert_eq!(config.supported_indent_levels, 4);
//! assert!(!config.enable_list_collapse);
//! assert!(config.enable_heading_collapse);
//! ```

use crate::error::ConfigError;
use crate::indent::{DEFAULT_INDENT_LEVELS, DEFAULT_INDENT_STEP_PX, IndentCodec};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true() -> bool {
    true
}

fn default_levels() -> usize {
    DEFAULT_INDENT_LEVELS
}

fn default_step() -> u32 {
    DEFAULT_INDENT_STEP_PX
}

fn default_button_slot() -> usize {
    2
}

/// Options controlling which anchors exist and how the section walker treats special elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseConfig {
    /// Headings act as anchors.
    #[serde(default = "default_true", alias = "doCollapsibleHeaders")]
    pub enable_heading_collapse: bool,
    /// List bullets act as anchors.
    #[serde(default = "default_true", alias = "doCollapsibleLists")]
    pub enable_list_collapse: bool,
    /// Number of indentation levels recognized.
    #[serde(default = "default_levels", alias = "indentLevels")]
    pub supported_indent_levels: usize,
    /// Images join the section they sit in.
    #[serde(default = "default_true", alias = "indentImages")]
    pub indent_images: bool,
    /// Opaque blocks are skipped instead of ending a section.
    #[serde(default = "default_true", alias = "indentUnhandled")]
    pub indent_unhandled: bool,
    /// Same-level lists are folded into the section above them.
    #[serde(default = "default_true", alias = "considerListsIndented")]
    pub treat_lists_as_indented: bool,
    /// Every `h2`..`h6` is an anchor, marked collapsible or not.
    #[serde(default, alias = "allHeadingsCollapsible")]
    pub all_headings_collapsible: bool,
    /// Toolbar position of the collapsibility button. Placement only.
    #[serde(default = "default_button_slot", alias = "toolbarButtonPosition")]
    pub toolbar_button_slot: usize,
    /// Pixel size of one indentation level.
    #[serde(default = "default_step", alias = "indentStep")]
    pub indent_step_px: u32,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            enable_heading_collapse: true,
            enable_list_collapse: true,
            supported_indent_levels: DEFAULT_INDENT_LEVELS,
            indent_images: true,
            indent_unhandled: true,
            treat_lists_as_indented: true,
            all_headings_collapsible: false,
            toolbar_button_slot: default_button_slot(),
            indent_step_px: DEFAULT_INDENT_STEP_PX,
        }
    }
}

impl CollapseConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: CollapseConfig = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    /// Read, parse and validate a YAML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading collapse config");
        Self::from_yaml_str(&yaml)
    }

    /// Reject unusable values and clamp recoverable ones.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.indent_step_px == 0 {
            return Err(ConfigError::Invalid(
                "indent_step_px must be greater than zero".to_string(),
            ));
        }
        if self.supported_indent_levels == 0 {
            tracing::warn!("supported_indent_levels is 0, clamping to 1");
            self.supported_indent_levels = 1;
        }
        Ok(self)
    }

    /// Indentation codec for these settings.
    pub fn indent_codec(&self) -> IndentCodec {
        IndentCodec::new(self.indent_step_px, self.supported_indent_levels)
    }

    /// Serialize back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = CollapseConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, CollapseConfig::default());
    }

    #[test]
    fn test_legacy_aliases() {
        let yaml = "doCollapsibleHeaders: false\nconsiderListsIndented: false\ntoolbarButtonPosition: 5\n";
        let config = CollapseConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.enable_heading_collapse);
        assert!(!config.treat_lists_as_indented);
        assert_eq!(config.toolbar_button_slot, 5);
    }

    #[test]
    fn test_validation() {
        let err = CollapseConfig::from_yaml_str("indent_step_px: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = CollapseConfig::from_yaml_str("supported_indent_levels: 0").unwrap();
        assert_eq!(config.supported_indent_levels, 1);

        assert!(matches!(
            CollapseConfig::from_yaml_str("indent_images: [").unwrap_err(),
            ConfigError::Yaml(_)
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = CollapseConfig {
            all_headings_collapsible: true,
            indent_step_px: 24,
            ..CollapseConfig::default()
        };
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(CollapseConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
