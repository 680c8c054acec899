//! Accent color propagation.
//!
//! Inline `style` declarations that use one of a closed list of common
//! framework theme colors are rewritten to the accent color. Utility classes
//! carrying those colors cannot be rewritten and are only flagged for review.

use crate::engine::dom::Document;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

/// Marks an element whose inline style was rewritten.
pub const APPLIED_ATTR: &str = "data-accent-color-applied";
/// Marks an element whose classes reference a palette color.
pub const CLASS_ATTR: &str = "data-accent-class";

/// CSS properties whose values are candidates for replacement.
pub const COLOR_PROPERTIES: [&str; 4] = ["color", "background-color", "border-color", "outline-color"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    Blue,
    Red,
    Orange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub family: ColorFamily,
    pub value: &'static str,
}

const fn color(family: ColorFamily, value: &'static str) -> PaletteColor {
    PaletteColor { family, value }
}

/// Recognized theme colors.
pub static PALETTE: &[PaletteColor] = &[
    color(ColorFamily::Blue, "#3b82f6"),
    color(ColorFamily::Blue, "#2563eb"),
    color(ColorFamily::Blue, "#1d4ed8"),
    color(ColorFamily::Blue, "#1e40af"),
    color(ColorFamily::Blue, "#1e3a8a"),
    color(ColorFamily::Blue, "rgb(59, 130, 246)"),
    color(ColorFamily::Blue, "rgb(37, 99, 235)"),
    color(ColorFamily::Blue, "rgb(29, 78, 216)"),
    color(ColorFamily::Red, "#ef4444"),
    color(ColorFamily::Red, "#dc2626"),
    color(ColorFamily::Red, "#b91c1c"),
    color(ColorFamily::Red, "#991b1b"),
    color(ColorFamily::Red, "#7f1d1d"),
    color(ColorFamily::Red, "rgb(239, 68, 68)"),
    color(ColorFamily::Orange, "#f97316"),
    color(ColorFamily::Orange, "#ea580c"),
    color(ColorFamily::Orange, "#c2410c"),
    color(ColorFamily::Orange, "#9a3412"),
    color(ColorFamily::Orange, "#7c2d12"),
    color(ColorFamily::Orange, "rgb(249, 115, 22)"),
];

/// Class name prefixes that are flagged with [`CLASS_ATTR`].
pub static CLASS_PREFIXES: [&str; 12] = [
    "text-blue-",
    "bg-blue-",
    "border-blue-",
    "text-red-",
    "bg-red-",
    "border-red-",
    "text-orange-",
    "bg-orange-",
    "border-orange-",
    "hover:text-blue-",
    "hover:bg-blue-",
    "hover:border-blue-",
];

/// One compiled `property: value` pattern. Group 1 is the property and the
/// separator as the author wrote them.
static RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    COLOR_PROPERTIES
        .iter()
        .flat_map(|property| PALETTE.iter().map(move |c| (property, c.value)))
        .filter_map(|(property, value)| {
            let pattern = format!(
                r"(?i)({}\s*:\s*){}",
                regex::escape(property),
                value_pattern(value)
            );
            match Regex::new(&pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::error!("Invalid accent pattern {}: {}", pattern, e);
                    None
                }
            }
        })
        .collect()
});

fn value_pattern(value: &str) -> String {
    let escaped = regex::escape(value).replace(", ", r",\s*");
    if value.starts_with('#') {
        // #3b82f6 must not match the prefix of #3b82f6cc
        format!(r"{}\b", escaped)
    } else {
        escaped
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccentReport {
    /// Elements whose inline style was rewritten.
    pub restyled: usize,
    /// Elements flagged for class-based colors.
    pub flagged: usize,
}

/// Rewrites palette colors in every inline style to `accent` and flags
/// palette utility classes.
pub fn propagate(doc: &mut Document, accent: &str) -> AccentReport {
    let mut report = AccentReport::default();

    for node in doc.elements() {
        if let Some(style) = doc.attr(node, "style").map(str::to_string) {
            let rewritten = rewrite_style(&style, accent);
            if rewritten != style {
                doc.set_attr(node, "style", &rewritten);
                doc.set_attr(node, APPLIED_ATTR, "true");
                report.restyled += 1;
            }
        }

        let flagged = doc
            .attr(node, "class")
            .map(has_palette_class)
            .unwrap_or(false);
        if flagged {
            doc.set_attr(node, CLASS_ATTR, "true");
            report.flagged += 1;
        }
    }

    log::debug!(
        "Accent {} applied to {} styles, {} class-colored elements flagged",
        accent,
        report.restyled,
        report.flagged
    );
    report
}

/// Replaces every palette value assigned to a color property in `style`.
pub fn rewrite_style(style: &str, accent: &str) -> String {
    RULES.iter().fold(style.to_string(), |current, rule| {
        rule.replace_all(&current, |caps: &Captures| format!("{}{}", &caps[1], accent))
            .into_owned()
    })
}

fn has_palette_class(class: &str) -> bool {
    CLASS_PREFIXES.iter().any(|prefix| class.contains(prefix))
}
