//! Style definitions and the id-keyed registry.
//!
//! These types mirror the registry file (`styles/registry.toml`) field for
//! field. They carry no behavior beyond lookup; composition lives in
//! [`crate::core::prompt`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::ComposeError;

/// One named style: five prose sections plus output metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub id: String,
    pub name: String,
    pub name_en: String,
    pub sections: Sections,
    pub output_format: OutputFormat,
}

/// The five prompt sections, emitted in declaration order.
///
/// Only `typography` may contain `{distance}`, `{pace}`, `{time}` or `{date}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    pub role: String,
    pub transform: String,
    pub preserve: String,
    pub typography: String,
    pub constraints: String,
}

impl Sections {
    /// `(name, text)` pairs in prompt order.
    pub fn named(&self) -> [(&'static str, &str); 5] {
        [
            ("role", self.role.as_str()),
            ("transform", self.transform.as_str()),
            ("preserve", self.preserve.as_str()),
            ("typography", self.typography.as_str()),
            ("constraints", self.constraints.as_str()),
        ]
    }
}

/// Output hints passed through to the generation call, never interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFormat {
    pub aspect_ratio: AspectRatio,
    pub style: RenderStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "9:16")]
    Story,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Story => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "4:5",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStyle {
    Illustration,
    Pixel,
    Voxel,
    PhotoOverlay,
    Editorial,
}

impl RenderStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderStyle::Illustration => "illustration",
            RenderStyle::Pixel => "pixel",
            RenderStyle::Voxel => "voxel",
            RenderStyle::PhotoOverlay => "photo-overlay",
            RenderStyle::Editorial => "editorial",
        }
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable id -> style table, built once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRegistry {
    styles: BTreeMap<String, StyleConfig>,
}

impl StyleRegistry {
    /// Build from already-validated styles. Later duplicates replace earlier ones;
    /// run [`crate::core::invariants::validate_registry_invariants`] first to
    /// reject them instead.
    pub fn from_styles(styles: impl IntoIterator<Item = StyleConfig>) -> Self {
        let styles = styles
            .into_iter()
            .map(|style| (style.id.clone(), style))
            .collect();
        Self { styles }
    }

    /// Look up a style by id.
    pub fn get(&self, id: &str) -> Result<&StyleConfig, ComposeError> {
        self.styles
            .get(id)
            .ok_or_else(|| ComposeError::UnknownStyle {
                id: id.to_string(),
                available: self.ids().map(str::to_string).collect(),
            })
    }

    /// Style ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Styles in id order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleConfig> {
        self.styles.values()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
