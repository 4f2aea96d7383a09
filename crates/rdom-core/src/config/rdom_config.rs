//! Configuration file format for rdom

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::DomError;
use crate::result::Result;

/// Top-level configuration
///
/// ```toml
/// [emit]
/// indentStyle = "tabs"
/// newline = "crlf"
/// emitComments = true
///
/// [model]
/// strict = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RdomConfig {
    /// Syntax emission settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit: Option<EmitConfiguration>,

    /// Model construction settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelConfiguration>,
}

impl RdomConfig {
    /// Load configuration from a file, picking the format by extension
    ///
    /// Supports TOML (.toml), JSON (.json) and YAML (.yaml, .yml).
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DomError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| DomError::config_error(e.to_string())),
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| DomError::config_error(e.to_string()))
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| DomError::config_error(e.to_string()))
            }
            _ => Err(DomError::config_error(
                "Unsupported file extension (expected .toml, .json, .yaml, or .yml)",
            )),
        }
    }

    /// Get emit configuration with defaults
    pub fn emit_config(&self) -> EmitConfiguration {
        self.emit.clone().unwrap_or_default()
    }

    /// Get model configuration with defaults
    pub fn model_config(&self) -> ModelConfiguration {
        self.model.clone().unwrap_or_default()
    }
}

/// Indent style for emitted syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces,
    /// Use tabs for indentation
    Tabs,
}

/// Line terminator for emitted syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineStyle {
    Lf,
    CrLf,
}

/// Emission settings
///
/// Unset fields fall back to four spaces, `\n`, and keeping comments and
/// blank lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmitConfiguration {
    /// Indent style (spaces or tabs)
    pub indent_style: Option<IndentStyle>,

    /// Indentation size in spaces (when indent_style is 'spaces')
    pub indent_size: Option<usize>,

    pub newline: Option<NewlineStyle>,

    /// Emit comment members
    pub emit_comments: Option<bool>,

    /// Emit blank-line members
    pub emit_blank_lines: Option<bool>,
}

impl EmitConfiguration {
    /// Text of one indentation level
    pub fn indent_unit(&self) -> String {
        match self.indent_style.unwrap_or(IndentStyle::Spaces) {
            IndentStyle::Tabs => "\t".to_string(),
            IndentStyle::Spaces => " ".repeat(self.indent_size.unwrap_or(4)),
        }
    }

    pub fn newline_str(&self) -> &'static str {
        match self.newline.unwrap_or(NewlineStyle::Lf) {
            NewlineStyle::Lf => "\n",
            NewlineStyle::CrLf => "\r\n",
        }
    }

    pub fn emit_comments(&self) -> bool {
        self.emit_comments.unwrap_or(true)
    }

    pub fn emit_blank_lines(&self) -> bool {
        self.emit_blank_lines.unwrap_or(true)
    }
}

/// Model construction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfiguration {
    /// Abort on the first construct that cannot be modelled instead of
    /// skipping it
    pub strict: Option<bool>,
}

impl ModelConfiguration {
    pub fn is_strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_defaults() {
        let config = RdomConfig::default().emit_config();
        assert_eq!(config.indent_unit(), "    ");
        assert_eq!(config.newline_str(), "\n");
        assert!(config.emit_comments());
        assert!(config.emit_blank_lines());
    }

    #[test]
    fn test_indent_size_only_applies_to_spaces() {
        let config = EmitConfiguration {
            indent_size: Some(2),
            ..EmitConfiguration::default()
        };
        assert_eq!(config.indent_unit(), "  ");

        let config = EmitConfiguration {
            indent_style: Some(IndentStyle::Tabs),
            indent_size: Some(2),
            ..EmitConfiguration::default()
        };
        assert_eq!(config.indent_unit(), "\t");
    }

    #[test]
    fn test_camel_case_json() {
        let config: RdomConfig = serde_json::from_str(
            r#"{ "emit": { "indentStyle": "tabs", "newline": "crlf", "emitBlankLines": false } }"#,
        )
        .unwrap();
        let emit = config.emit_config();
        assert_eq!(emit.indent_style, Some(IndentStyle::Tabs));
        assert_eq!(emit.newline_str(), "\r\n");
        assert!(!emit.emit_blank_lines());
        assert!(!config.model_config().is_strict());
    }

    #[test]
    fn test_serialize_skips_missing_sections() {
        let json = serde_json::to_string(&RdomConfig::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
