//! Derives and writes the dependent dimension of one element.
//!
//! Every pass starts from scratch: both `width` and `height` overrides are
//! cleared, then at most one of them is written back. Anything invalid along
//! the way (missing or malformed declaration, non-positive ratio, infinite
//! result) leaves the element without an override for this pass.

use ratiokit_common::PolyfillConfig;
use tracing::trace;

use crate::tree::{RenderTree, ResolvedStyle};

/// The dimension taken as input; the other one is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

/// What a single apply pass did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    /// No usable ratio; nothing written.
    Disabled,
    /// Ratio usable but the derived size was not finite (or the element has
    /// no resolved style); nothing written.
    Skipped,
    /// Height written, in px.
    Height(f64),
    /// Width written, in px.
    Width(f64),
}

impl ApplyOutcome {
    pub fn wrote(&self) -> bool {
        matches!(self, ApplyOutcome::Height(_) | ApplyOutcome::Width(_))
    }
}

/// Box constraints read from resolved style, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxConstraints {
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl BoxConstraints {
    pub fn from_style(style: &ResolvedStyle) -> Self {
        Self {
            width: parse_length(&style.width, 0.0),
            height: parse_length(&style.height, 0.0),
            min_width: parse_length(&style.min_width, 0.0),
            min_height: parse_length(&style.min_height, 0.0),
            max_width: parse_length(&style.max_width, f64::INFINITY),
            max_height: parse_length(&style.max_height, f64::INFINITY),
        }
    }
}

/// Applies declarations to elements.
#[derive(Debug, Clone)]
pub struct Applier {
    attribute: String,
    clamp_width_to_max_height: bool,
}

impl Applier {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            clamp_width_to_max_height: false,
        }
    }

    pub fn from_config(config: &PolyfillConfig) -> Self {
        Self {
            attribute: config.attribute.clone(),
            clamp_width_to_max_height: config.clamp_width_to_max_height,
        }
    }

    /// Bound the height-governed width by max-height, as the older polyfill did.
    pub fn with_legacy_width_clamp(mut self, enabled: bool) -> Self {
        self.clamp_width_to_max_height = enabled;
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Drop both size overrides.
    pub fn release<T: RenderTree>(&self, tree: &mut T, element: T::ElementId) {
        tree.clear_style(element, "height");
        tree.clear_style(element, "width");
    }

    /// Recompute and write the dependent dimension of `element`.
    pub fn apply<T: RenderTree>(&self, tree: &mut T, element: T::ElementId) -> ApplyOutcome {
        self.release(tree, element);

        let Some(ratio) = ratio_of(tree.attribute(element, &self.attribute)) else {
            trace!(?element, "No usable ratio");
            return ApplyOutcome::Disabled;
        };

        let parent_style = tree
            .parent_element(element)
            .and_then(|parent| tree.resolved_style(parent));
        let axis = governing_axis(parent_style.as_ref());

        let Some(style) = tree.resolved_style(element) else {
            return ApplyOutcome::Skipped;
        };
        let outcome = self.derive(axis, ratio, &BoxConstraints::from_style(&style));

        match outcome {
            ApplyOutcome::Height(height) => tree.set_style(element, "height", &px(height)),
            ApplyOutcome::Width(width) => tree.set_style(element, "width", &px(width)),
            _ => {}
        }
        trace!(?element, ?axis, ratio, ?outcome, "Applied aspect ratio");
        outcome
    }

    /// The pure part of [`apply`](Self::apply).
    pub fn derive(&self, axis: Axis, ratio: f64, c: &BoxConstraints) -> ApplyOutcome {
        match axis {
            Axis::Width => {
                let height = clamp(c.width / ratio, c.min_height, c.max_height);
                if height.is_finite() {
                    ApplyOutcome::Height(height)
                } else {
                    ApplyOutcome::Skipped
                }
            }
            Axis::Height => {
                let max = if self.clamp_width_to_max_height {
                    c.max_height
                } else {
                    c.max_width
                };
                let width = clamp(c.height * ratio, c.min_width, max);
                if width.is_finite() {
                    ApplyOutcome::Width(width)
                } else {
                    ApplyOutcome::Skipped
                }
            }
        }
    }
}

/// Height governs only inside a `row` flex container; everything else,
/// including a missing parent, is width-governed.
pub fn governing_axis(parent: Option<&ResolvedStyle>) -> Axis {
    match parent {
        Some(style) if style.display.contains("flex") && style.flex_direction == "row" => {
            Axis::Height
        }
        _ => Axis::Width,
    }
}

/// Split a `"W/H"` declaration. Absent → `(0, 0)`.
pub fn parse_declaration(declaration: Option<&str>) -> (f64, f64) {
    match declaration {
        Some(s) if !s.is_empty() => {
            let mut parts = s.split('/');
            let w = parts.next().map(to_number).unwrap_or(f64::NAN);
            let h = parts.next().map(to_number).unwrap_or(f64::NAN);
            (w, h)
        }
        _ => (0.0, 0.0),
    }
}

/// The usable ratio of a declaration: finite and strictly positive.
pub fn ratio_of(declaration: Option<&str>) -> Option<f64> {
    let (w, h) = parse_declaration(declaration);
    let ratio = w / h;
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

/// Clamp into `[min, max]`; `max` wins when the bounds cross.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Whole-string numeric conversion. Surrounding whitespace is ignored, an
/// empty string is 0, unsigned `0x`/`0o`/`0b` integer literals are accepted,
/// anything else that is not a decimal literal is NaN.
fn to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    }
    match s.trim_start_matches(['+', '-']) {
        "Infinity" => {
            if s.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        }
        rest if rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            s.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Leading-number parse of a resolved length (`"200px"` → 200). Falls back
/// to `default` when no number leads the string.
pub fn parse_length(s: &str, default: f64) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return default;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(default)
}
