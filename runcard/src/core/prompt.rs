//! Five-section prompt composition.
//!
//! Only the `typography` section goes through placeholder substitution. The
//! other four sections are copied verbatim so literal braces survive.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::clock::{Clock, month_year_label};
use crate::core::error::ComposeError;
use crate::core::stats::RunStats;
use crate::core::style::{OutputFormat, StyleConfig, StyleRegistry};

/// Matches the four stat placeholders and nothing else.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(distance|pace|time|date)\}").expect("placeholder pattern is valid")
});

/// Knobs for [`PromptComposer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Append an `[OUTPUT] aspectRatio=..., style=...` trailer after the sections.
    pub append_output_trailer: bool,
}

/// Registry-backed composer: looks the style up, then builds its prompt.
pub struct PromptComposer<'a, C: Clock> {
    registry: &'a StyleRegistry,
    clock: C,
    options: ComposeOptions,
}

impl<'a, C: Clock> PromptComposer<'a, C> {
    pub fn new(registry: &'a StyleRegistry, clock: C) -> Self {
        Self {
            registry,
            clock,
            options: ComposeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    /// Compose the prompt for `style_id`.
    ///
    /// Fails before any text is built when the id is not registered.
    pub fn compose(&self, style_id: &str, stats: &RunStats) -> Result<String, ComposeError> {
        let style = self.registry.get(style_id)?;
        let mut prompt = build_prompt(style, stats, &self.clock);
        if self.options.append_output_trailer {
            prompt.push_str("\n\n");
            prompt.push_str(&output_trailer(&style.output_format));
        }
        Ok(prompt)
    }
}

/// Join the five sections with one blank line between each.
pub fn build_prompt(style: &StyleConfig, stats: &RunStats, clock: &impl Clock) -> String {
    let sections = &style.sections;
    let typography = substitute_stats(&sections.typography, stats, clock);
    [
        sections.role.as_str(),
        sections.transform.as_str(),
        sections.preserve.as_str(),
        typography.as_str(),
        sections.constraints.as_str(),
    ]
    .join("\n\n")
}

/// Replace `{distance}`, `{pace}`, `{time}` and `{date}` in `template`.
///
/// Unset stats substitute as empty strings. A missing or empty date falls
/// back to the clock's month and year. Substituted values are not rescanned.
pub fn substitute_stats(template: &str, stats: &RunStats, clock: &impl Clock) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "distance" => stats.distance().to_string(),
            "pace" => stats.pace().to_string(),
            "time" => stats.time().to_string(),
            _ => date_or_fallback(stats, clock),
        })
        .into_owned()
}

/// The optional output-format trailer line.
pub fn output_trailer(format: &OutputFormat) -> String {
    format!(
        "[OUTPUT] aspectRatio={}, style={}",
        format.aspect_ratio, format.style
    )
}

fn date_or_fallback(stats: &RunStats, clock: &impl Clock) -> String {
    match stats.date() {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => month_year_label(clock.today()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::{AspectRatio, RenderStyle};
    use crate::test_support::{fixed_clock, style, style_with_typography};

    #[test]
    fn joins_sections_in_order_with_blank_lines() {
        let style = style("film");
        let prompt = build_prompt(&style, &RunStats::new(), &fixed_clock());
        assert_eq!(
            prompt,
            "film role\n\nfilm transform\n\nfilm preserve\n\nfilm typography\n\nfilm constraints"
        );
    }

    #[test]
    fn substitutes_every_occurrence_in_typography() {
        let style = style_with_typography(
            "receipt",
            "{distance} KM | PACE {pace} | TIME {time} | {date} | again {distance}",
        );
        let stats = RunStats::from_raw("5.2", "2814").with_date("2025. 11. 20.");
        let prompt = build_prompt(&style, &stats, &fixed_clock());
        assert!(prompt.contains("5.2 KM | PACE 5'26\" | TIME 28:14 | 2025. 11. 20. | again 5.2"));
    }

    #[test]
    fn empty_stats_substitute_as_empty_strings() {
        let style = style_with_typography("gta", "[{distance}] [{pace}] [{time}]");
        let prompt = build_prompt(&style, &RunStats::new(), &fixed_clock());
        assert!(prompt.contains("[] [] []"));
    }

    #[test]
    fn missing_date_uses_clock_month_and_year() {
        let style = style_with_typography("magazine", "{date}");
        let prompt = build_prompt(&style, &RunStats::new(), &fixed_clock());
        assert!(prompt.contains("\n\nNovember 2025\n\n"));

        let stats = RunStats::new().with_date("");
        let prompt = build_prompt(&style, &stats, &fixed_clock());
        assert!(prompt.contains("\n\nNovember 2025\n\n"));
    }

    #[test]
    fn other_sections_are_not_substituted() {
        let mut style = style_with_typography("pixel", "{distance}");
        style.sections.role = "Keep {distance} and {} literal".to_string();
        style.sections.constraints = "JSON like {\"a\": 1} stays".to_string();
        let stats = RunStats::from_raw("10", "50:00");
        let prompt = build_prompt(&style, &stats, &fixed_clock());
        assert!(prompt.starts_with("Keep {distance} and {} literal\n\n"));
        assert!(prompt.ends_with("\n\n10\n\nJSON like {\"a\": 1} stays"));
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let style = style_with_typography("crayon", "{date} / {pace}");
        let stats = RunStats::from_raw("10", "50:00").with_date("{pace}");
        let prompt = build_prompt(&style, &stats, &fixed_clock());
        assert!(prompt.contains("{pace} / 5'00\""));
    }

    #[test]
    fn composer_rejects_unknown_style_without_output() {
        let registry = StyleRegistry::from_styles([style("film")]);
        let composer = PromptComposer::new(&registry, fixed_clock());
        let err = composer.compose("nike", &RunStats::new()).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownStyle { ref id, .. } if id == "nike"));
    }

    #[test]
    fn composer_appends_trailer_only_when_asked() {
        let registry = StyleRegistry::from_styles([style("film")]);
        let stats = RunStats::from_raw("5", "25:00");

        let plain = PromptComposer::new(&registry, fixed_clock())
            .compose("film", &stats)
            .expect("compose");
        assert!(plain.ends_with("film constraints"));

        let trailed = PromptComposer::new(&registry, fixed_clock())
            .with_options(ComposeOptions {
                append_output_trailer: true,
            })
            .compose("film", &stats)
            .expect("compose");
        assert_eq!(
            trailed,
            format!("{plain}\n\n[OUTPUT] aspectRatio=9:16, style=illustration")
        );
    }

    #[test]
    fn trailer_formats_each_field() {
        let format = OutputFormat {
            aspect_ratio: AspectRatio::Square,
            style: RenderStyle::Voxel,
        };
        assert_eq!(output_trailer(&format), "[OUTPUT] aspectRatio=1:1, style=voxel");
    }
}
