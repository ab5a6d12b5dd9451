//! Synthetic QR images for the integration tests

#![allow(dead_code)]

use qrcode::bits::Bits;
use qrcode::canvas::{Canvas, MaskPattern};
use qrcode::{Color, EcLevel, QrCode, Version};

/// An RGBA image plus its dimensions
pub struct Rendered {
    pub rgba: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Encode `data` at a fixed version, letting the encoder pick the mask
pub fn encode(data: &[u8], version: i16, ec: EcLevel) -> QrCode {
    QrCode::with_version(data, Version::Normal(version), ec).expect("payload fits")
}

/// Module colours of a QR code, row-major
pub fn colors(code: &QrCode) -> Vec<Color> {
    let width = code.width();
    let mut out = Vec::with_capacity(width * width);
    for y in 0..width {
        for x in 0..width {
            out.push(code[(x, y)]);
        }
    }
    out
}

/// Every mask pattern, in mask id order
pub const MASKS: [MaskPattern; 8] = [
    MaskPattern::Checkerboard,
    MaskPattern::HorizontalLines,
    MaskPattern::VerticalLines,
    MaskPattern::DiagonalLines,
    MaskPattern::LargeCheckerboard,
    MaskPattern::Fields,
    MaskPattern::Diamonds,
    MaskPattern::Meadow,
];

/// Numeric data laid out with mask pattern 0, regardless of penalty score
pub fn numeric_with_mask0(digits: &[u8], version: i16, ec: EcLevel) -> Vec<Color> {
    numeric_with_mask(digits, version, ec, MaskPattern::Checkerboard)
}

/// Numeric data laid out with a chosen mask pattern
pub fn numeric_with_mask(
    digits: &[u8],
    version: i16,
    ec: EcLevel,
    mask: MaskPattern,
) -> Vec<Color> {
    let version = Version::Normal(version);
    let mut bits = Bits::new(version);
    bits.push_numeric_data(digits).expect("digits fit");
    bits.push_terminator(ec).expect("terminator fits");
    let data = bits.into_bytes();
    let (data, ecc) = qrcode::ec::construct_codewords(&data, version, ec).expect("codewords");

    let mut canvas = Canvas::new(version, ec);
    canvas.draw_all_functional_patterns();
    canvas.draw_data(&data, &ecc);
    canvas.apply_mask(mask);
    canvas.into_colors()
}

/// Draw `modules` (row-major, `width` per side) at `scale` pixels per module
/// with a `quiet` module light border
pub fn render(modules: &[Color], width: usize, scale: usize, quiet: usize) -> Rendered {
    render_with(modules, width, scale, quiet, [0, 0, 0], [255, 255, 255])
}

pub fn render_code(code: &QrCode, scale: usize, quiet: usize) -> Rendered {
    render(&colors(code), code.width(), scale, quiet)
}

/// Like [`render`] with explicit dark and light colours
pub fn render_with(
    modules: &[Color],
    width: usize,
    scale: usize,
    quiet: usize,
    dark: [u8; 3],
    light: [u8; 3],
) -> Rendered {
    let side = (width + 2 * quiet) * scale;
    let mut rgba = Vec::with_capacity(side * side * 4);
    for _ in 0..side * side {
        rgba.extend_from_slice(&[light[0], light[1], light[2], 255]);
    }
    for my in 0..width {
        for mx in 0..width {
            if modules[my * width + mx] != Color::Dark {
                continue;
            }
            for py in 0..scale {
                for px in 0..scale {
                    let x = (mx + quiet) * scale + px;
                    let y = (my + quiet) * scale + py;
                    let idx = (y * side + x) * 4;
                    rgba[idx..idx + 3].copy_from_slice(&dark);
                }
            }
        }
    }
    Rendered {
        rgba,
        width: side,
        height: side,
    }
}

/// Swap light and dark, keeping alpha
pub fn invert(image: &Rendered) -> Rendered {
    let rgba = image
        .rgba
        .chunks_exact(4)
        .flat_map(|p| [255 - p[0], 255 - p[1], 255 - p[2], p[3]])
        .collect();
    Rendered {
        rgba,
        width: image.width,
        height: image.height,
    }
}

/// Rotate clockwise by `degrees` about the image centre onto a canvas
/// `margin` pixels larger on every side, nearest-neighbour, light fill
pub fn rotate(image: &Rendered, degrees: f32, margin: usize) -> Rendered {
    let width = image.width + 2 * margin;
    let height = image.height + 2 * margin;
    let (sin, cos) = degrees.to_radians().sin_cos();
    let cx_out = width as f32 / 2.0;
    let cy_out = height as f32 / 2.0;
    let cx_in = image.width as f32 / 2.0;
    let cy_in = image.height as f32 / 2.0;

    let mut rgba = vec![255u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - cx_out;
            let dy = y as f32 + 0.5 - cy_out;
            // Inverse rotation back into the source
            let sx = cos * dx + sin * dy + cx_in;
            let sy = -sin * dx + cos * dy + cy_in;
            if sx < 0.0 || sy < 0.0 {
                continue;
            }
            let (sx, sy) = (sx as usize, sy as usize);
            if sx >= image.width || sy >= image.height {
                continue;
            }
            let src = (sy * image.width + sx) * 4;
            let dst = (y * width + x) * 4;
            rgba[dst..dst + 4].copy_from_slice(&image.rgba[src..src + 4]);
        }
    }
    Rendered {
        rgba,
        width,
        height,
    }
}
