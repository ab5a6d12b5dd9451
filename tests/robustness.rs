//! Inverted, rotated, blank and off-colour inputs

mod common;

use common::{encode, init_logging, invert, render_code, render_with, rotate};
use qr_reader::{
    BilinearSampler, DecodeFailure, DecodeOptions, ImageError, InversionAttempts, PixelBuffer,
    PixelSampler, QrError, QrReader,
};
use qrcode::EcLevel;

fn buffer(image: &common::Rendered) -> PixelBuffer<'_> {
    PixelBuffer::new(&image.rgba, image.width, image.height).unwrap()
}

#[test]
fn test_inverted_symbol_matches_normal() {
    init_logging();
    let normal = render_code(&encode(b"light on dark", 3, EcLevel::M), 6, 4);
    let inverted = invert(&normal);
    let reader = QrReader::default();

    let a = reader.decode(&buffer(&normal)).unwrap();
    let b = reader.decode(&buffer(&inverted)).unwrap();
    assert!(!a.inverted);
    assert!(b.inverted);
    assert_eq!(a.payload, b.payload);
    assert_eq!(a.corners, b.corners);
    assert_eq!(a.version, b.version);
    assert_eq!(a.ec_level, b.ec_level);
}

#[test]
fn test_inverted_without_retry_fails() {
    init_logging();
    let inverted = invert(&render_code(&encode(b"light on dark", 3, EcLevel::M), 6, 4));
    let options = DecodeOptions::default().with_inversion(InversionAttempts::DoNotInvert);
    assert!(QrReader::new(options).decode(&buffer(&inverted)).is_err());
}

#[test]
fn test_blank_images_not_located() {
    init_logging();
    let reader = QrReader::default();
    for value in [0u8, 255] {
        let mut rgba = vec![value; 120 * 90 * 4];
        rgba.chunks_exact_mut(4).for_each(|p| p[3] = 255);
        let image = PixelBuffer::new(&rgba, 120, 90).unwrap();
        assert_eq!(reader.decode(&image).unwrap_err(), DecodeFailure::NotLocated);
    }
}

#[test]
fn test_single_pixel_image() {
    let rgba = [0u8, 0, 0, 255];
    let image = PixelBuffer::new(&rgba, 1, 1).unwrap();
    assert_eq!(
        QrReader::default().decode(&image).unwrap_err(),
        DecodeFailure::NotLocated
    );
}

#[test]
fn test_rejects_bad_buffers() {
    let rgba = vec![255u8; 10 * 10 * 4];
    assert_eq!(
        qr_reader::decode(&rgba, 10, 9, &DecodeOptions::default()).unwrap_err(),
        QrError::Image(ImageError::BufferSize {
            expected: 360,
            actual: 400
        })
    );
    assert!(matches!(
        qr_reader::decode(&[], 0, 0, &DecodeOptions::default()),
        Err(QrError::Image(ImageError::EmptyDimensions { .. }))
    ));
}

#[test]
fn test_quarter_turn() {
    init_logging();
    let upright = render_code(&encode(b"turned", 2, EcLevel::Q), 6, 4);
    let turned = rotate(&upright, 90.0, 0);

    let symbol = QrReader::default().decode(&buffer(&turned)).unwrap();
    assert_eq!(symbol.text, "turned");

    // The top-left finder ends up at the top-right of the image
    let c = symbol.corners;
    assert!(c.top_left.x > c.bottom_left.x);
    assert!(c.top_right.y > c.top_left.y);
}

#[test]
fn test_skewed_rotation() {
    init_logging();
    let upright = render_code(&encode(b"twenty degrees", 1, EcLevel::L), 8, 4);
    let rotated = rotate(&upright, 20.0, 60);

    let symbol = QrReader::default().decode(&buffer(&rotated)).unwrap();
    assert_eq!(symbol.text, "twenty degrees");
    assert_eq!(symbol.version.number(), 1);
}

#[test]
fn test_upside_down() {
    init_logging();
    let upright = render_code(&encode(b"half turn", 4, EcLevel::M), 5, 4);
    let flipped = rotate(&upright, 180.0, 0);
    let symbol = QrReader::default().decode(&buffer(&flipped)).unwrap();
    assert_eq!(symbol.text, "half turn");
}

/// Classifies on the red channel alone
struct RedChannel;

impl PixelSampler for RedChannel {
    fn is_dark(&self, image: &PixelBuffer<'_>, x: usize, y: usize) -> bool {
        image.rgba(x, y)[0] < 128
    }
}

#[test]
fn test_custom_pixel_sampler() {
    init_logging();
    let code = encode(b"cyan ink", 2, EcLevel::M);
    let modules = common::colors(&code);
    // Cyan reads as light to the luminance classifier
    let image = render_with(&modules, code.width(), 6, 4, [0, 255, 255], [255, 255, 255]);

    let options = DecodeOptions::default();
    assert!(QrReader::new(options).decode(&buffer(&image)).is_err());

    let reader = QrReader::with_collaborators(RedChannel, BilinearSampler, options);
    let symbol = reader.decode(&buffer(&image)).unwrap();
    assert_eq!(symbol.text, "cyan ink");
}

#[test]
fn test_luminance_threshold_option() {
    init_logging();
    let code = encode(b"grey ink", 2, EcLevel::M);
    let modules = common::colors(&code);
    let image = render_with(&modules, code.width(), 6, 4, [150, 150, 150], [255, 255, 255]);

    assert!(QrReader::default().decode(&buffer(&image)).is_err());
    let options = DecodeOptions::default().with_luminance_threshold(200);
    let symbol = QrReader::new(options).decode(&buffer(&image)).unwrap();
    assert_eq!(symbol.text, "grey ink");
}

#[test]
fn test_sample_grid_without_decoding() {
    init_logging();
    let code = encode(b"grid only", 3, EcLevel::H);
    let image = render_code(&code, 5, 4);
    let grid = QrReader::default().sample_grid(&buffer(&image)).unwrap();
    assert_eq!(grid.dimension(), code.width());
    assert_eq!(grid.version().number(), 3);
}
