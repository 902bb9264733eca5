//! Colors and appearance.
//!
//! [`Color`] is a raw, resolved RGBA value as stored on a view's layer. It
//! does not adapt to appearance changes on its own. [`DynamicColor`] pairs a
//! light and a dark variant and is resolved against the active
//! [`Appearance`] whenever the theme changes.

/// System-wide visual appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

/// Raw RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Appearance-aware color with a variant per appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicColor {
    pub light: Color,
    pub dark: Color,
}

impl DynamicColor {
    /// Color with a light and a dark variant.
    pub const fn new(light: Color, dark: Color) -> Self {
        Self { light, dark }
    }

    /// Same color in every appearance.
    pub const fn fixed(color: Color) -> Self {
        Self::new(color, color)
    }

    /// Pick the variant for `appearance`.
    pub fn resolve(&self, appearance: Appearance) -> Color {
        match appearance {
            Appearance::Light => self.light,
            Appearance::Dark => self.dark,
        }
    }
}

impl From<Color> for DynamicColor {
    fn from(color: Color) -> Self {
        Self::fixed(color)
    }
}
