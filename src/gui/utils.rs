//! Generated application icon
//!
//! A filled circle with a soft edge, drawn at runtime so no image asset or
//! decoder is needed.

use eframe::egui;

use crate::constants::tray::{ICON_ARGB, ICON_SIZE};

/// RGBA pixels of the icon, `size * size * 4` bytes
pub fn icon_rgba(size: u32) -> Vec<u8> {
    let [alpha, r, g, b] = ICON_ARGB;
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;

    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let distance = (dx * dx + dy * dy).sqrt();
            // One pixel of linear falloff for anti-aliasing
            let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
            let a = (alpha as f32 * coverage).round() as u8;
            pixels.extend_from_slice(&[r, g, b, a]);
        }
    }
    pixels
}

/// Tray pixmap in the ARGB byte order the StatusNotifierItem protocol expects
#[cfg(target_os = "linux")]
pub fn tray_icon_pixmap() -> ksni::Icon {
    let size = ICON_SIZE as u32;
    let argb: Vec<u8> = icon_rgba(size)
        .chunks_exact(4)
        .flat_map(|chunk| [chunk[3], chunk[0], chunk[1], chunk[2]]) // RGBA → ARGB
        .collect();

    ksni::Icon {
        width: ICON_SIZE,
        height: ICON_SIZE,
        data: argb,
    }
}

pub fn window_icon() -> egui::IconData {
    let size = ICON_SIZE as u32;
    egui::IconData {
        rgba: icon_rgba(size),
        width: size,
        height: size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_dimensions() {
        assert_eq!(icon_rgba(32).len(), 32 * 32 * 4);
        let icon = window_icon();
        assert_eq!(icon.rgba.len() as u32, icon.width * icon.height * 4);
    }

    #[test]
    fn test_icon_is_round() {
        let size = 32;
        let pixels = icon_rgba(size);
        let alpha_at = |x: u32, y: u32| pixels[((y * size + x) * 4 + 3) as usize];

        assert_eq!(alpha_at(0, 0), 0);
        assert_eq!(alpha_at(size - 1, size - 1), 0);
        assert_eq!(alpha_at(size / 2, size / 2), ICON_ARGB[0]);
    }
}
