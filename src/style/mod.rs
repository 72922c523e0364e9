//! Templates, colors, fonts, and the resolved text style fed to the measurer

use serde::{Deserialize, Serialize};

/// Vertical rhythm presets carried by templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    Wide,
    #[default]
    #[serde(other)]
    Normal,
}

impl Spacing {
    /// Multiplier applied to block margins and role padding.
    pub fn factor(&self) -> f32 {
        match self {
            Spacing::Compact => 0.85,
            Spacing::Normal => 1.0,
            Spacing::Wide => 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStyles {
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub heading_font: &'static str,
    pub body_font: &'static str,
    pub spacing: Spacing,
    /// Whether this template renders the personal header as a full-width
    /// band above both columns.
    pub top_band: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub styles: TemplateStyles,
}

pub const DEFAULT_TEMPLATE_ID: &str = "template-1";

/// The built-in template gallery.
pub fn builtin_templates() -> &'static [Template] {
    const TEMPLATES: [Template; 6] = [
        Template {
            id: "template-1",
            name: "Classic",
            description: "Traditional, ATS-friendly layout",
            styles: TemplateStyles {
                primary_color: "#1976D2",
                secondary_color: "#424242",
                heading_font: "Arial",
                body_font: "Arial",
                spacing: Spacing::Normal,
                top_band: false,
            },
        },
        Template {
            id: "template-2",
            name: "Modern",
            description: "Contemporary layout with a header band",
            styles: TemplateStyles {
                primary_color: "#00BCD4",
                secondary_color: "#607D8B",
                heading_font: "Roboto",
                body_font: "Roboto",
                spacing: Spacing::Wide,
                top_band: true,
            },
        },
        Template {
            id: "template-3",
            name: "Minimal",
            description: "Simple and elegant",
            styles: TemplateStyles {
                primary_color: "#212121",
                secondary_color: "#757575",
                heading_font: "Helvetica",
                body_font: "Helvetica",
                spacing: Spacing::Compact,
                top_band: false,
            },
        },
        Template {
            id: "template-4",
            name: "Left sidebar",
            description: "Sidebar on the left edge",
            styles: TemplateStyles {
                primary_color: "#2E7D32",
                secondary_color: "#546E7A",
                heading_font: "Arial",
                body_font: "Arial",
                spacing: Spacing::Normal,
                top_band: false,
            },
        },
        Template {
            id: "template-5",
            name: "Two columns",
            description: "Balanced two-column layout",
            styles: TemplateStyles {
                primary_color: "#6A1B9A",
                secondary_color: "#616161",
                heading_font: "Georgia",
                body_font: "Georgia",
                spacing: Spacing::Normal,
                top_band: false,
            },
        },
        Template {
            id: "template-6",
            name: "Timeline",
            description: "Chronological timeline emphasis",
            styles: TemplateStyles {
                primary_color: "#C62828",
                secondary_color: "#455A64",
                heading_font: "Arial",
                body_font: "Arial",
                spacing: Spacing::Compact,
                top_band: false,
            },
        },
    ];
    &TEMPLATES
}

pub fn template_by_id(id: &str) -> Option<&'static Template> {
    builtin_templates().iter().find(|t| t.id == id)
}

/// Base font size presets offered by the templates screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSizeKey {
    Xxs,
    Xs,
    S,
    #[default]
    M,
    L,
    Xl,
}

impl FontSizeKey {
    pub const ALL: [FontSizeKey; 6] = [
        FontSizeKey::Xxs,
        FontSizeKey::Xs,
        FontSizeKey::S,
        FontSizeKey::M,
        FontSizeKey::L,
        FontSizeKey::Xl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSizeKey::Xxs => "xxs",
            FontSizeKey::Xs => "xs",
            FontSizeKey::S => "s",
            FontSizeKey::M => "m",
            FontSizeKey::L => "l",
            FontSizeKey::Xl => "xl",
        }
    }

    /// Body text size in CSS pixels.
    pub fn px(&self) -> f32 {
        match self {
            FontSizeKey::Xxs => 11.0,
            FontSizeKey::Xs => 12.0,
            FontSizeKey::S => 13.0,
            FontSizeKey::M => 14.0,
            FontSizeKey::L => 16.0,
            FontSizeKey::Xl => 18.0,
        }
    }

    /// Parse a persisted value. Exact key names win; otherwise any number
    /// found in the string picks the nearest preset by pixel distance, and
    /// non-numeric junk coerces to the default.
    pub fn parse(raw: &str) -> FontSizeKey {
        let trimmed = raw.trim().to_ascii_lowercase();
        if let Some(key) = FontSizeKey::ALL.iter().find(|k| k.as_str() == trimmed) {
            return *key;
        }
        match extract_number(&trimmed) {
            Some(px) => FontSizeKey::ALL
                .iter()
                .copied()
                .min_by(|a, b| {
                    (a.px() - px)
                        .abs()
                        .partial_cmp(&(b.px() - px).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or_default(),
            None => FontSizeKey::M,
        }
    }
}

fn extract_number(raw: &str) -> Option<f32> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Normalize a `#RGB`/`#RRGGBB` color (leading `#` optional) to uppercase
/// `#RRGGBB` form; anything else is rejected.
pub fn normalize_hex(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_uppercase()))
}

/// Broad font classification driving the average-character-width factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontCategory {
    Sans,
    Serif,
    Mono,
    Cursive,
}

impl FontCategory {
    /// Classify a CSS font stack by its generic fallback.
    pub fn from_stack(stack: &str) -> FontCategory {
        let lower = stack.to_ascii_lowercase();
        if lower.contains("monospace") {
            FontCategory::Mono
        } else if lower.contains("cursive") {
            FontCategory::Cursive
        } else if lower.contains("serif") && !lower.contains("sans-serif") {
            FontCategory::Serif
        } else {
            FontCategory::Sans
        }
    }

    /// Average glyph width as a fraction of the font size.
    pub fn width_factor(&self) -> f32 {
        match self {
            FontCategory::Sans => 0.52,
            FontCategory::Serif => 0.50,
            FontCategory::Mono => 0.60,
            FontCategory::Cursive => 0.55,
        }
    }
}

pub const DEFAULT_PRIMARY_COLOR: &str = "#1976D2";
pub const DEFAULT_PAPER_COLOR: &str = "#FFFFFF";
pub const DEFAULT_FONT_FAMILY: &str =
    "'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif";

/// The user's style choices: template plus overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSettings {
    template_id: String,
    primary_color: String,
    paper_color: String,
    font_family: String,
    font_size: FontSizeKey,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            paper_color: DEFAULT_PAPER_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: FontSizeKey::M,
        }
    }
}

impl StyleSettings {
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn template(&self) -> &'static Template {
        template_by_id(&self.template_id)
            .unwrap_or_else(|| &builtin_templates()[0])
    }

    pub fn primary_color(&self) -> &str {
        &self.primary_color
    }

    pub fn paper_color(&self) -> &str {
        &self.paper_color
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> FontSizeKey {
        self.font_size
    }

    /// Unknown template ids keep the current selection.
    pub fn set_template(&mut self, id: &str) -> bool {
        if template_by_id(id).is_some() {
            self.template_id = id.to_string();
            true
        } else {
            false
        }
    }

    /// Invalid colors keep the previous value.
    pub fn set_primary_color(&mut self, raw: &str) -> bool {
        match normalize_hex(raw) {
            Some(hex) => {
                self.primary_color = hex;
                true
            }
            None => false,
        }
    }

    pub fn set_paper_color(&mut self, raw: &str) -> bool {
        match normalize_hex(raw) {
            Some(hex) => {
                self.paper_color = hex;
                true
            }
            None => false,
        }
    }

    pub fn set_font_family(&mut self, stack: &str) -> bool {
        if stack.trim().is_empty() {
            return false;
        }
        self.font_family = stack.trim().to_string();
        true
    }

    pub fn set_font_size(&mut self, key: FontSizeKey) {
        self.font_size = key;
    }

    pub fn set_font_size_raw(&mut self, raw: &str) {
        self.font_size = FontSizeKey::parse(raw);
    }

    /// Resolve the settings into the geometry inputs the measurer needs.
    pub fn resolve(&self) -> RenderStyle {
        let template = self.template();
        let base_px = self.font_size.px();
        let category = FontCategory::from_stack(&self.font_family);
        RenderStyle {
            body: TextStyle {
                font_px: base_px,
                line_height: (base_px * 1.45).round(),
                width_factor: category.width_factor(),
            },
            heading: TextStyle {
                font_px: (base_px * 1.25).round(),
                line_height: (base_px * 1.25 * 1.3).round(),
                width_factor: category.width_factor(),
            },
            spacing_factor: template.styles.spacing.factor(),
            top_band: template.styles.top_band,
        }
    }
}

/// Font geometry for one run kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_px: f32,
    pub line_height: f32,
    pub width_factor: f32,
}

/// Everything the layout engine reads from the style layer. Value type so
/// the measurer can key its cache on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub body: TextStyle,
    pub heading: TextStyle,
    pub spacing_factor: f32,
    pub top_band: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        StyleSettings::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates() {
        assert_eq!(builtin_templates().len(), 6);
        assert_eq!(builtin_templates()[0].id, DEFAULT_TEMPLATE_ID);
        assert!(template_by_id("template-2").unwrap().styles.top_band);
        assert!(template_by_id("template-9").is_none());
    }

    #[test]
    fn test_unknown_spacing_deserializes_to_normal() {
        let spacing: Spacing = serde_json::from_str("\"roomy\"").unwrap();
        assert_eq!(spacing, Spacing::Normal);
    }

    #[test]
    fn test_font_size_exact_keys() {
        assert_eq!(FontSizeKey::parse("xxs"), FontSizeKey::Xxs);
        assert_eq!(FontSizeKey::parse(" XL "), FontSizeKey::Xl);
    }

    #[test]
    fn test_font_size_numeric_coercion() {
        assert_eq!(FontSizeKey::parse("13px"), FontSizeKey::S);
        assert_eq!(FontSizeKey::parse("17"), FontSizeKey::L);
        assert_eq!(FontSizeKey::parse("40pt"), FontSizeKey::Xl);
    }

    #[test]
    fn test_font_size_junk_is_default() {
        assert_eq!(FontSizeKey::parse("huge"), FontSizeKey::M);
        assert_eq!(FontSizeKey::parse(""), FontSizeKey::M);
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("#abc").as_deref(), Some("#AABBCC"));
        assert_eq!(normalize_hex("1976d2").as_deref(), Some("#1976D2"));
        assert_eq!(normalize_hex("#12345"), None);
        assert_eq!(normalize_hex("red"), None);
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut settings = StyleSettings::default();
        assert!(settings.set_primary_color("#ff0000"));
        assert!(!settings.set_primary_color("nope"));
        assert_eq!(settings.primary_color(), "#FF0000");
    }

    #[test]
    fn test_unknown_template_keeps_selection() {
        let mut settings = StyleSettings::default();
        assert!(settings.set_template("template-3"));
        assert!(!settings.set_template("template-42"));
        assert_eq!(settings.template_id(), "template-3");
    }

    #[test]
    fn test_font_category() {
        assert_eq!(
            FontCategory::from_stack("Georgia, 'Times New Roman', serif"),
            FontCategory::Serif
        );
        assert_eq!(
            FontCategory::from_stack("'Fira Code', monospace"),
            FontCategory::Mono
        );
        assert_eq!(
            FontCategory::from_stack("'Pacifico', cursive"),
            FontCategory::Cursive
        );
        assert_eq!(FontCategory::from_stack(DEFAULT_FONT_FAMILY), FontCategory::Sans);
    }

    #[test]
    fn test_resolve_scales_with_font_size() {
        let mut settings = StyleSettings::default();
        let m = settings.resolve();
        settings.set_font_size(FontSizeKey::Xl);
        let xl = settings.resolve();
        assert!(xl.body.font_px > m.body.font_px);
        assert!(xl.body.line_height > m.body.line_height);
    }
}
