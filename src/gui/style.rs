//! Popup colours and font sizes from the `ui` config section

use eframe::egui::Color32;
use tracing::warn;

use crate::config::UiSettings;
use crate::constants::defaults;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color32,
    pub text: Color32,
    pub font_normal: f32,
    pub font_large: f32,
}

impl Theme {
    pub fn from_settings(ui: &UiSettings) -> Self {
        Self {
            background: color_or_default(&ui.background_color, defaults::ui::BACKGROUND_COLOR),
            text: color_or_default(&ui.text_color, defaults::ui::TEXT_COLOR),
            font_normal: size_or_default(&ui.font_size_normal, defaults::ui::FONT_SIZE_NORMAL),
            font_large: size_or_default(&ui.font_size_large, defaults::ui::FONT_SIZE_LARGE),
        }
    }
}

fn color_or_default(value: &str, fallback: &str) -> Color32 {
    parse_hex_color(value).unwrap_or_else(|| {
        warn!(value = %value, fallback = %fallback, "Invalid colour in config, using default");
        parse_hex_color(fallback).unwrap_or(Color32::GRAY)
    })
}

fn size_or_default(value: &str, fallback: &str) -> f32 {
    parse_px(value).unwrap_or_else(|| {
        warn!(value = %value, fallback = %fallback, "Invalid font size in config, using default");
        parse_px(fallback).unwrap_or(14.0)
    })
}

/// Parse CSS-style hex colours:
/// - 3 digits: RGB shorthand (`#333`)
/// - 6 digits: RRGGBB, fully opaque
/// - 8 digits: AARRGGBB
///
/// The leading '#' is optional.
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let argb = match hex.len() {
        3 => {
            let short = u32::from_str_radix(hex, 16).ok()?;
            let expand = |nibble: u32| (nibble << 4) | nibble;
            0xFF_00_00_00
                | expand((short >> 8) & 0xF) << 16
                | expand((short >> 4) & 0xF) << 8
                | expand(short & 0xF)
        }
        6 => 0xFF_00_00_00 | u32::from_str_radix(hex, 16).ok()?,
        8 => u32::from_str_radix(hex, 16).ok()?,
        _ => return None,
    };

    let a = (argb >> 24) & 0xFF;
    let r = (argb >> 16) & 0xFF;
    let g = (argb >> 8) & 0xFF;
    let b = argb & 0xFF;
    Some(Color32::from_rgba_unmultiplied(r as u8, g as u8, b as u8, a as u8))
}

/// Parse `"14px"` (or a bare number) into points
pub fn parse_px(size: &str) -> Option<f32> {
    let size = size.trim();
    let number = size.strip_suffix("px").unwrap_or(size).trim();
    let value: f32 = number.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
