//! Inline style declarations and resolved (computed) style.
//!
//! The tree does not run a cascade. Each element carries the used values of
//! the host's last layout pass ([`BoxMetrics`], `display`, `flex-direction`)
//! and an inline style declaration; the resolved style is the inline value
//! where one is set and the layout value otherwise.

use smallvec::SmallVec;

/// Used box values from the host's layout pass. `None` means unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

impl BoxMetrics {
    /// Metrics with a resolved width and height and no min/max constraints.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_min_width(mut self, v: f64) -> Self {
        self.min_width = Some(v);
        self
    }

    pub fn with_min_height(mut self, v: f64) -> Self {
        self.min_height = Some(v);
        self
    }

    pub fn with_max_width(mut self, v: f64) -> Self {
        self.max_width = Some(v);
        self
    }

    pub fn with_max_height(mut self, v: f64) -> Self {
        self.max_height = Some(v);
        self
    }
}

/// An element's inline style declaration (`element.style`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    properties: SmallVec<[(String, String); 4]>,
}

impl InlineStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. An empty value removes it, as with
    /// `style.setProperty(name, "")`. Returns whether anything changed.
    pub fn set(&mut self, property: &str, value: &str) -> bool {
        if value.is_empty() {
            return self.remove(property);
        }
        match self.properties.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) if v == value => false,
            Some((_, v)) => {
                *v = value.to_string();
                true
            }
            None => {
                self.properties
                    .push((property.to_string(), value.to_string()));
                true
            }
        }
    }

    pub fn remove(&mut self, property: &str) -> bool {
        match self.properties.iter().position(|(p, _)| p == property) {
            Some(pos) => {
                self.properties.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialise as a `style` attribute value.
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Format a length the way resolved style reports it.
pub fn format_px(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 {
            "Infinitypx".to_string()
        } else {
            "-Infinitypx".to_string()
        }
    } else {
        format!("{}px", value)
    }
}

/// Read-only resolved style of one element, as strings
/// (`getComputedStyle` semantics).
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: String,
    pub flex_direction: String,
    pub width: String,
    pub height: String,
    pub min_width: String,
    pub min_height: String,
    pub max_width: String,
    pub max_height: String,
}

impl ComputedStyle {
    pub(crate) fn resolve(
        inline: &InlineStyle,
        metrics: &BoxMetrics,
        display: &str,
        flex_direction: &str,
    ) -> Self {
        let pick = |property: &str, base: Option<f64>, unresolved: &str| -> String {
            match inline.get(property) {
                Some(v) => v.to_string(),
                None => base.map(format_px).unwrap_or_else(|| unresolved.to_string()),
            }
        };

        Self {
            display: inline.get("display").unwrap_or(display).to_string(),
            flex_direction: inline
                .get("flex-direction")
                .unwrap_or(flex_direction)
                .to_string(),
            width: pick("width", metrics.width, "auto"),
            height: pick("height", metrics.height, "auto"),
            min_width: pick("min-width", metrics.min_width, "0px"),
            min_height: pick("min-height", metrics.min_height, "0px"),
            max_width: pick("max-width", metrics.max_width, "none"),
            max_height: pick("max-height", metrics.max_height, "none"),
        }
    }

    /// Look a property up by its CSS name.
    pub fn get_property_value(&self, property: &str) -> &str {
        match property {
            "display" => &self.display,
            "flex-direction" => &self.flex_direction,
            "width" => &self.width,
            "height" => &self.height,
            "min-width" => &self.min_width,
            "min-height" => &self.min_height,
            "max-width" => &self.max_width,
            "max-height" => &self.max_height,
            _ => "",
        }
    }
}
