//! Rule selection and configuration files.
//!
//! [`Options`] is the table of enabled rules. It can be built in code, or
//! loaded from a TOML file where every key is optional:
//!
//! ```toml
//! # Use rgb shorthand (#abc) where possible
//! shorthand_colors = true
//!
//! # Disable individual rules by their snake_case name
//! sort_attributes = false
//! remove_whitespace = false
//!
//! # Or pin an explicit order (kebab-case names); disabled rules are
//! # still skipped
//! order = ["flatten-groups", "convert-colors-to-hex", "sort-attributes"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::rules::RuleKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which rules run, and in what order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Strip redundant zeros from coordinates
    pub minify_coordinates: bool,
    /// Remove identity transforms
    pub minify_transforms: bool,
    /// Convert rgb() colors to hex
    pub convert_colors_to_hex: bool,
    /// Collapse groups into their children
    pub flatten_groups: bool,
    /// Replace xlink/xml attributes, drop obsolete ones
    pub remove_deprecated_attributes: bool,
    /// Remove fill="none" and stroke="none"
    pub remove_default_attributes: bool,
    /// Remove blank attributes
    pub remove_empty_attributes: bool,
    /// Remove redundant enable-background
    pub clean_enable_background: bool,
    /// Remove metadata elements and editor data
    pub remove_metadata: bool,
    /// Remove unused namespace declarations
    pub remove_unused_namespaces: bool,
    /// Sort attributes
    pub sort_attributes: bool,
    /// Remove DOCTYPE
    pub remove_doctype: bool,
    /// Remove comments
    pub remove_comments: bool,
    /// Remove zero-width and control characters
    pub remove_invisible_characters: bool,
    /// Write empty elements as self-closing tags
    pub convert_empty_tags_to_self_closing: bool,
    /// Remove whitespace between tags
    pub remove_whitespace: bool,
    /// Shorten hex colors to #rgb when possible
    pub shorthand_colors: bool,
    /// Explicit rule order. Defaults to [`RuleKind::ALL`].
    pub order: Option<Vec<RuleKind>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            minify_coordinates: true,
            minify_transforms: true,
            convert_colors_to_hex: true,
            flatten_groups: true,
            remove_deprecated_attributes: true,
            remove_default_attributes: true,
            remove_empty_attributes: true,
            clean_enable_background: true,
            remove_metadata: true,
            remove_unused_namespaces: true,
            sort_attributes: true,
            remove_doctype: true,
            remove_comments: true,
            remove_invisible_characters: true,
            convert_empty_tags_to_self_closing: true,
            remove_whitespace: true,
            shorthand_colors: false,
            order: None,
        }
    }
}

impl Options {
    /// Options with every rule turned off.
    pub fn none() -> Self {
        let mut options = Self::default();
        for kind in RuleKind::ALL {
            options.set_enabled(kind, false);
        }
        options
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let options: Options = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(order) = &self.order {
            for (i, kind) in order.iter().enumerate() {
                if order[..i].contains(kind) {
                    return Err(ConfigError::Validation(format!(
                        "rule `{}` appears more than once in order",
                        kind
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, kind: RuleKind) -> bool {
        *self.flag(kind)
    }

    pub fn set_enabled(&mut self, kind: RuleKind, enabled: bool) {
        *self.flag_mut(kind) = enabled;
    }

    /// Enabled rules in the order they will run.
    pub fn enabled_rules(&self) -> Vec<RuleKind> {
        let order = self.order.as_deref().unwrap_or(&RuleKind::ALL);
        order.iter().copied().filter(|&kind| self.is_enabled(kind)).collect()
    }

    fn flag(&self, kind: RuleKind) -> &bool {
        match kind {
            RuleKind::MinifyCoordinates => &self.minify_coordinates,
            RuleKind::MinifyTransforms => &self.minify_transforms,
            RuleKind::ConvertColorsToHex => &self.convert_colors_to_hex,
            RuleKind::FlattenGroups => &self.flatten_groups,
            RuleKind::RemoveDeprecatedAttributes => &self.remove_deprecated_attributes,
            RuleKind::RemoveDefaultAttributes => &self.remove_default_attributes,
            RuleKind::RemoveEmptyAttributes => &self.remove_empty_attributes,
            RuleKind::CleanEnableBackground => &self.clean_enable_background,
            RuleKind::RemoveMetadata => &self.remove_metadata,
            RuleKind::RemoveUnusedNamespaces => &self.remove_unused_namespaces,
            RuleKind::SortAttributes => &self.sort_attributes,
            RuleKind::RemoveDoctype => &self.remove_doctype,
            RuleKind::RemoveComments => &self.remove_comments,
            RuleKind::RemoveInvisibleCharacters => &self.remove_invisible_characters,
            RuleKind::ConvertEmptyTagsToSelfClosing => &self.convert_empty_tags_to_self_closing,
            RuleKind::RemoveWhitespace => &self.remove_whitespace,
        }
    }

    fn flag_mut(&mut self, kind: RuleKind) -> &mut bool {
        match kind {
            RuleKind::MinifyCoordinates => &mut self.minify_coordinates,
            RuleKind::MinifyTransforms => &mut self.minify_transforms,
            RuleKind::ConvertColorsToHex => &mut self.convert_colors_to_hex,
            RuleKind::FlattenGroups => &mut self.flatten_groups,
            RuleKind::RemoveDeprecatedAttributes => &mut self.remove_deprecated_attributes,
            RuleKind::RemoveDefaultAttributes => &mut self.remove_default_attributes,
            RuleKind::RemoveEmptyAttributes => &mut self.remove_empty_attributes,
            RuleKind::CleanEnableBackground => &mut self.clean_enable_background,
            RuleKind::RemoveMetadata => &mut self.remove_metadata,
            RuleKind::RemoveUnusedNamespaces => &mut self.remove_unused_namespaces,
            RuleKind::SortAttributes => &mut self.sort_attributes,
            RuleKind::RemoveDoctype => &mut self.remove_doctype,
            RuleKind::RemoveComments => &mut self.remove_comments,
            RuleKind::RemoveInvisibleCharacters => &mut self.remove_invisible_characters,
            RuleKind::ConvertEmptyTagsToSelfClosing => &mut self.convert_empty_tags_to_self_closing,
            RuleKind::RemoveWhitespace => &mut self.remove_whitespace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        assert_eq!(Options::default().enabled_rules(), RuleKind::ALL.to_vec());
        assert!(Options::none().enabled_rules().is_empty());
    }

    #[test]
    fn test_partial_toml() {
        let options = Options::from_toml("sort_attributes = false\nshorthand_colors = true\n").unwrap();
        assert!(!options.is_enabled(RuleKind::SortAttributes));
        assert!(options.is_enabled(RuleKind::FlattenGroups));
        assert!(options.shorthand_colors);
        assert_eq!(options.enabled_rules().len(), 15);
    }

    #[test]
    fn test_explicit_order() {
        let options = Options::from_toml(
            "order = [\"sort-attributes\", \"flatten-groups\", \"remove-comments\"]\nremove_comments = false\n",
        )
        .unwrap();
        assert_eq!(
            options.enabled_rules(),
            [RuleKind::SortAttributes, RuleKind::FlattenGroups]
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(Options::from_toml("minify_paths = true"), Err(ConfigError::Toml(_))));
        assert!(matches!(Options::from_toml("order = [\"nope\"]"), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_duplicate_order_rejected() {
        assert!(matches!(
            Options::from_toml("order = [\"sort-attributes\", \"sort-attributes\"]"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svgshrink.toml");
        fs::write(&path, "remove_whitespace = false\n").unwrap();
        let options = Options::load(&path).unwrap();
        assert!(!options.remove_whitespace);
        assert!(matches!(Options::load(&dir.path().join("missing.toml")), Err(ConfigError::Io(_))));
    }
}
