//! Test-only helpers for constructing styles, clocks, and registry files.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::core::clock::FixedClock;
use crate::core::style::{AspectRatio, OutputFormat, RenderStyle, Sections, StyleConfig};

/// Clock pinned to 2025-11-20 (renders as `November 2025`).
pub fn fixed_clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2025, 11, 20).expect("valid date"))
}

/// Create a deterministic style whose sections read `"{id} {section}"`.
pub fn style(id: &str) -> StyleConfig {
    StyleConfig {
        id: id.to_string(),
        name: format!("{} name", id),
        name_en: format!("{} name_en", id),
        sections: Sections {
            role: format!("{} role", id),
            transform: format!("{} transform", id),
            preserve: format!("{} preserve", id),
            typography: format!("{} typography", id),
            constraints: format!("{} constraints", id),
        },
        output_format: OutputFormat {
            aspect_ratio: AspectRatio::Story,
            style: RenderStyle::Illustration,
        },
    }
}

/// Create a deterministic style with an explicit typography template.
pub fn style_with_typography(id: &str, typography: &str) -> StyleConfig {
    let mut style = style(id);
    style.sections.typography = typography.to_string();
    style
}

/// Minimal registry TOML defining the given ids with placeholder typography.
pub fn registry_toml(ids: &[&str]) -> String {
    let mut buf = String::from("version = 1\n");
    for id in ids {
        buf.push_str(&format!(
            r#"
[[styles]]
id = "{id}"
name = "{id} name"
nameEn = "{id} name_en"

[styles.sections]
role = "{id} role"
transform = "{id} transform"
preserve = "{id} preserve"
typography = "{{distance}} KM | PACE {{pace}} | TIME {{time}} | {{date}}"
constraints = "{id} constraints"

[styles.outputFormat]
aspectRatio = "9:16"
style = "illustration"
"#
        ));
    }
    buf
}

/// Write `contents` to `name` inside a fresh temp dir.
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    (dir, path)
}
