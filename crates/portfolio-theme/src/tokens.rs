//! Per-mode color and gradient tokens.
//!
//! Two constant token sets exist, [`LIGHT`] and [`DARK`]. They are defined at
//! build time and never mutated; a mode change swaps which one is current.
//!
//! Every token is exported to global styles as a CSS custom property named
//! `--color-<slot>` or `--gradient-<slot>`. Slot names keep their camelCase
//! spelling (`--color-textSecondary`) so existing stylesheets keep matching.

use cssparser::{ParseError, Parser, ParserInput, Token};
use serde::Serialize;

use crate::error::ThemeError;
use crate::mode::ThemeMode;

/// Custom property prefix for color tokens.
pub const COLOR_VARIABLE_PREFIX: &str = "--color-";

/// Custom property prefix for gradient tokens.
pub const GRADIENT_VARIABLE_PREFIX: &str = "--gradient-";

/// Named color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Primary,
    Secondary,
    Background,
    Surface,
    Text,
    TextSecondary,
    Accent,
    Border,
}

impl ColorSlot {
    pub const ALL: [ColorSlot; 8] = [
        ColorSlot::Primary,
        ColorSlot::Secondary,
        ColorSlot::Background,
        ColorSlot::Surface,
        ColorSlot::Text,
        ColorSlot::TextSecondary,
        ColorSlot::Accent,
        ColorSlot::Border,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorSlot::Primary => "primary",
            ColorSlot::Secondary => "secondary",
            ColorSlot::Background => "background",
            ColorSlot::Surface => "surface",
            ColorSlot::Text => "text",
            ColorSlot::TextSecondary => "textSecondary",
            ColorSlot::Accent => "accent",
            ColorSlot::Border => "border",
        }
    }
}

/// Named gradient slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientSlot {
    Primary,
    Secondary,
    Accent,
    Hero,
}

impl GradientSlot {
    pub const ALL: [GradientSlot; 4] = [
        GradientSlot::Primary,
        GradientSlot::Secondary,
        GradientSlot::Accent,
        GradientSlot::Hero,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GradientSlot::Primary => "primary",
            GradientSlot::Secondary => "secondary",
            GradientSlot::Accent => "accent",
            GradientSlot::Hero => "hero",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub accent: &'static str,
    pub border: &'static str,
}

impl ThemeColors {
    pub fn get(&self, slot: ColorSlot) -> &'static str {
        match slot {
            ColorSlot::Primary => self.primary,
            ColorSlot::Secondary => self.secondary,
            ColorSlot::Background => self.background,
            ColorSlot::Surface => self.surface,
            ColorSlot::Text => self.text,
            ColorSlot::TextSecondary => self.text_secondary,
            ColorSlot::Accent => self.accent,
            ColorSlot::Border => self.border,
        }
    }

    /// Iterates `(slot, value)` in slot declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (ColorSlot, &'static str)> + '_ {
        ColorSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeGradients {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub hero: &'static str,
}

impl ThemeGradients {
    pub fn get(&self, slot: GradientSlot) -> &'static str {
        match slot {
            GradientSlot::Primary => self.primary,
            GradientSlot::Secondary => self.secondary,
            GradientSlot::Accent => self.accent,
            GradientSlot::Hero => self.hero,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (GradientSlot, &'static str)> + '_ {
        GradientSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

/// The full token set for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeTokens {
    pub colors: ThemeColors,
    pub gradients: ThemeGradients,
}

pub static LIGHT: ThemeTokens = ThemeTokens {
    colors: ThemeColors {
        primary: "#2563eb",
        secondary: "#7c3aed",
        background: "#ffffff",
        surface: "#f8fafc",
        text: "#1e293b",
        text_secondary: "#64748b",
        accent: "#06b6d4",
        border: "#e2e8f0",
    },
    gradients: ThemeGradients {
        primary: "linear-gradient(135deg, #2563eb 0%, #7c3aed 100%)",
        secondary: "linear-gradient(135deg, #06b6d4 0%, #3b82f6 100%)",
        accent: "linear-gradient(135deg, #f59e0b 0%, #ef4444 100%)",
        hero: "linear-gradient(135deg, #1e40af 0%, #7c3aed 50%, #be185d 100%)",
    },
};

pub static DARK: ThemeTokens = ThemeTokens {
    colors: ThemeColors {
        primary: "#3b82f6",
        secondary: "#8b5cf6",
        background: "#0f172a",
        surface: "#1e293b",
        text: "#f1f5f9",
        text_secondary: "#94a3b8",
        accent: "#06b6d4",
        border: "#334155",
    },
    gradients: ThemeGradients {
        primary: "linear-gradient(135deg, #3b82f6 0%, #8b5cf6 100%)",
        secondary: "linear-gradient(135deg, #06b6d4 0%, #3b82f6 100%)",
        accent: "linear-gradient(135deg, #f59e0b 0%, #ef4444 100%)",
        hero: "linear-gradient(135deg, #1e3a8a 0%, #7c2d12 50%, #be123c 100%)",
    },
};

impl ThemeTokens {
    /// Returns the constant token set for `mode`.
    pub fn for_mode(mode: ThemeMode) -> &'static ThemeTokens {
        match mode {
            ThemeMode::Light => &LIGHT,
            ThemeMode::Dark => &DARK,
        }
    }

    /// Returns every token as a `(custom property, value)` pair.
    ///
    /// Colors come first, then gradients, each in slot order.
    pub fn css_variables(&self) -> Vec<(String, &'static str)> {
        let colors = self
            .colors
            .entries()
            .map(|(slot, value)| (format!("{}{}", COLOR_VARIABLE_PREFIX, slot.name()), value));
        let gradients = self.gradients.entries().map(|(slot, value)| {
            (
                format!("{}{}", GRADIENT_VARIABLE_PREFIX, slot.name()),
                value,
            )
        });
        colors.chain(gradients).collect()
    }

    /// Checks that colors are hex colors and gradients are gradient functions.
    ///
    /// Returns the first offending slot.
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (slot, value) in self.colors.entries() {
            match classify_style_value(value) {
                Ok(StyleValueKind::HexColor) => {}
                Ok(StyleValueKind::Gradient) => {
                    return Err(invalid(
                        format!("colors.{}", slot.name()),
                        "expected a hex color, found a gradient".to_string(),
                    ))
                }
                Err(reason) => return Err(invalid(format!("colors.{}", slot.name()), reason)),
            }
        }
        for (slot, value) in self.gradients.entries() {
            match classify_style_value(value) {
                Ok(StyleValueKind::Gradient) => {}
                Ok(StyleValueKind::HexColor) => {
                    return Err(invalid(
                        format!("gradients.{}", slot.name()),
                        "expected a gradient, found a color".to_string(),
                    ))
                }
                Err(reason) => {
                    return Err(invalid(format!("gradients.{}", slot.name()), reason))
                }
            }
        }
        Ok(())
    }
}

fn invalid(slot: String, reason: String) -> ThemeError {
    ThemeError::InvalidStyleValue { slot, reason }
}

/// What kind of style string a token value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleValueKind {
    /// `#` followed by 3, 4, 6 or 8 hex digits.
    HexColor,
    /// A single gradient function call.
    Gradient,
}

const GRADIENT_FUNCTIONS: &[&str] = &[
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
    "repeating-conic-gradient",
];

/// Classifies a style string, returning a reason when it is neither kind.
pub fn classify_style_value(value: &str) -> Result<StyleValueKind, String> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);

    let token = parser
        .next()
        .map_err(|_| "empty value".to_string())?
        .clone();

    let kind = match token {
        Token::Hash(ref hex) | Token::IDHash(ref hex) => {
            let valid_len = matches!(hex.len(), 3 | 4 | 6 | 8);
            if !valid_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("'#{}' is not a hex color", &**hex));
            }
            StyleValueKind::HexColor
        }
        Token::Function(ref name) => {
            let lower = name.to_ascii_lowercase();
            if !GRADIENT_FUNCTIONS.contains(&lower.as_str()) {
                return Err(format!("'{}()' is not a gradient function", &**name));
            }
            parser
                .parse_nested_block(|block| {
                    while block.next().is_ok() {}
                    Ok::<_, ParseError<'_, ()>>(())
                })
                .map_err(|_| format!("malformed arguments to '{}()'", &**name))?;
            StyleValueKind::Gradient
        }
        other => return Err(format!("unexpected token {:?}", other)),
    };

    parser
        .expect_exhausted()
        .map_err(|_| "unexpected trailing content".to_string())?;
    Ok(kind)
}
