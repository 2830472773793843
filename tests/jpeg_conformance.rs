//! JPEG conformance tests.
//!
//! Tests JPEG encoding for correctness and validates that encoded
//! images contain proper markers and a well-formed scan segment.

use basejpeg::{jpeg, ColorType, Error};
use image::GenericImageView;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Locate the first occurrence of a marker, returning its offset.
fn find_marker(data: &[u8], marker: u8) -> Option<usize> {
    data.windows(2).position(|w| w == [0xFF, marker])
}

/// Test that JPEG output has correct markers.
#[test]
fn test_jpeg_markers() {
    let pixels = vec![128u8; 8 * 8 * 3];
    let result = jpeg::encode(&pixels, 8, 8, 85).unwrap();

    // SOI marker
    assert_eq!(&result[0..2], &[0xFF, 0xD8]);

    // EOI marker at end
    assert_eq!(&result[result.len() - 2..], &[0xFF, 0xD9]);
}

/// Test APP0 (JFIF) marker.
#[test]
fn test_app0_marker() {
    let pixels = vec![128u8; 8 * 8 * 3];
    let result = jpeg::encode(&pixels, 8, 8, 85).unwrap();

    // APP0 should be right after SOI
    assert_eq!(&result[2..4], &[0xFF, 0xE0]);

    // JFIF identifier
    assert_eq!(&result[6..11], b"JFIF\0");

    // Thumbnail fields are zero
    assert_eq!(&result[18..20], &[0, 0]);
}

/// Test different quality levels.
#[test]
fn test_quality_levels() {
    let pixels: Vec<u8> = (0..64 * 64 * 3).map(|i| (i % 256) as u8).collect();

    let sizes: Vec<(u8, usize)> = [10, 25, 50, 75, 90, 100]
        .iter()
        .map(|&q| {
            let result = jpeg::encode(&pixels, 64, 64, q).unwrap();
            (q, result.len())
        })
        .collect();

    // Higher quality should produce larger files
    for i in 1..sizes.len() {
        assert!(
            sizes[i].1 >= sizes[i - 1].1,
            "Quality {} produced {} bytes, but quality {} produced {} bytes",
            sizes[i].0,
            sizes[i].1,
            sizes[i - 1].0,
            sizes[i - 1].1
        );
    }
}

/// Test different image sizes.
#[test]
fn test_various_sizes() {
    let sizes = [
        (1, 1),
        (7, 7),   // Not multiple of 8
        (8, 8),   // Exact MCU
        (9, 9),   // Just over one MCU
        (10, 10), // Partial rightmost/bottom blocks, edge-clamped
        (16, 16), // Two MCUs
        (100, 50),
        (50, 100),
    ];

    for (width, height) in sizes {
        let pixels = vec![128u8; (width * height * 3) as usize];
        let result = jpeg::encode(&pixels, width, height, 85);

        assert!(result.is_ok(), "Failed for size {}x{}", width, height);

        let data = result.unwrap();
        assert_eq!(&data[0..2], &[0xFF, 0xD8], "Missing SOI for {}x{}", width, height);
        assert_eq!(
            &data[data.len() - 2..],
            &[0xFF, 0xD9],
            "Missing EOI for {}x{}",
            width,
            height
        );
    }
}

/// Test grayscale encoding.
#[test]
fn test_grayscale() {
    let pixels = vec![128u8; 32 * 32];
    let result = jpeg::encode_with_color(&pixels, 32, 32, 85, ColorType::Gray).unwrap();

    // Should have proper markers
    assert_eq!(&result[0..2], &[0xFF, 0xD8]);
    assert_eq!(&result[result.len() - 2..], &[0xFF, 0xD9]);

    // Should be smaller than RGB (1 component vs 3)
    let rgb_pixels = vec![128u8; 32 * 32 * 3];
    let rgb_result = jpeg::encode(&rgb_pixels, 32, 32, 85).unwrap();
    assert!(result.len() < rgb_result.len());
}

/// Test error handling.
#[test]
fn test_error_handling() {
    let pixels = vec![0u8; 8 * 8 * 3];

    // Invalid dimensions
    assert!(jpeg::encode(&pixels, 0, 8, 85).is_err());
    assert!(jpeg::encode(&pixels, 8, 0, 85).is_err());

    // Wrong data length
    assert!(jpeg::encode(&[0, 0], 8, 8, 85).is_err());

    // Unsupported channel count (2 bytes per pixel)
    let ga = vec![0u8; 4 * 4 * 2];
    assert!(matches!(
        jpeg::encode_with_color(&ga, 4, 4, 85, ColorType::GrayAlpha),
        Err(Error::UnsupportedColorType)
    ));
}

#[test]
fn test_image_too_large() {
    // Just over the 16-bit frame header limit (65535)
    let width = 65_536;
    let height = 1;
    let pixels = vec![0u8; width as usize * 3];
    let err = jpeg::encode(&pixels, width, height, 85).unwrap_err();
    assert!(matches!(err, Error::ImageTooLarge { .. }));
}

/// Out-of-range quality clamps to the nearest valid bound instead of
/// erroring.
#[test]
fn test_quality_clamped_to_bounds() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut pixels = vec![0u8; 16 * 16 * 3];
    rng.fill(pixels.as_mut_slice());

    let q0 = jpeg::encode(&pixels, 16, 16, 0).unwrap();
    let q1 = jpeg::encode(&pixels, 16, 16, 1).unwrap();
    assert_eq!(q0, q1, "quality 0 must behave like the minimum");

    let q200 = jpeg::encode(&pixels, 16, 16, 200).unwrap();
    let q100 = jpeg::encode(&pixels, 16, 16, 100).unwrap();
    assert_eq!(q200, q100, "quality 200 must behave like the maximum");
}

/// Test that encoding produces deterministic output.
#[test]
fn test_deterministic() {
    let pixels = vec![100u8; 16 * 16 * 3];

    let result1 = jpeg::encode(&pixels, 16, 16, 85).unwrap();
    let result2 = jpeg::encode(&pixels, 16, 16, 85).unwrap();

    assert_eq!(result1, result2);
}

/// Test different patterns compress differently.
#[test]
fn test_pattern_compression() {
    // Solid color (should compress very well)
    let solid = vec![128u8; 64 * 64 * 3];
    let solid_result = jpeg::encode(&solid, 64, 64, 85).unwrap();

    // Gradient (compresses reasonably)
    let mut gradient = Vec::with_capacity(64 * 64 * 3);
    for y in 0..64 {
        for x in 0..64 {
            gradient.push(((x * 4) % 256) as u8);
            gradient.push(((y * 4) % 256) as u8);
            gradient.push((((x + y) * 2) % 256) as u8);
        }
    }
    let gradient_result = jpeg::encode(&gradient, 64, 64, 85).unwrap();

    // Random-ish (compresses poorly)
    let mut noisy = Vec::with_capacity(64 * 64 * 3);
    let mut seed = 42u32;
    for _ in 0..(64 * 64 * 3) {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        noisy.push((seed >> 16) as u8);
    }
    let noisy_result = jpeg::encode(&noisy, 64, 64, 85).unwrap();

    // Solid should be smallest, noisy should be largest
    assert!(solid_result.len() < gradient_result.len());
    assert!(gradient_result.len() < noisy_result.len());
}

/// Structural marker walk: a 16x16 RGB encode carries exactly 2 DQT
/// segments, 4 DHT segments, and one SOF0 declaring 3 components.
#[test]
fn test_jpeg_marker_structure_rgb() {
    let mut rng = StdRng::seed_from_u64(6262);
    let mut rgb = vec![0u8; 16 * 16 * 3];
    rng.fill(rgb.as_mut_slice());

    let jpeg_bytes = jpeg::encode(&rgb, 16, 16, 85).unwrap();

    assert!(jpeg_bytes.starts_with(&[0xFF, 0xD8]), "missing SOI");
    assert!(jpeg_bytes.ends_with(&[0xFF, 0xD9]), "missing EOI");

    let mut offset = 2; // after SOI
    let mut dqt_count = 0;
    let mut dht_count = 0;
    let mut sof0_components = None;
    let mut saw_app0 = false;
    let mut saw_sos = false;

    while offset + 4 <= jpeg_bytes.len() {
        assert_eq!(jpeg_bytes[offset], 0xFF, "marker sync lost at {offset}");
        let marker = jpeg_bytes[offset + 1];
        offset += 2;

        let len = u16::from_be_bytes([jpeg_bytes[offset], jpeg_bytes[offset + 1]]) as usize;
        assert!(len >= 2, "invalid length for marker 0x{:02X}", marker);
        assert!(
            offset + len <= jpeg_bytes.len(),
            "segment overruns buffer for marker 0x{:02X}",
            marker
        );

        match marker {
            0xE0 => saw_app0 = true,
            0xDB => dqt_count += 1,
            0xC4 => dht_count += 1,
            0xC0 => {
                // precision(1) + height(2) + width(2), then component count
                sof0_components = Some(jpeg_bytes[offset + 7]);
            }
            0xDA => {
                saw_sos = true;
                break; // entropy-coded data follows
            }
            _ => {}
        }

        offset += len;
    }

    assert!(saw_app0, "APP0 not found");
    assert!(saw_sos, "SOS not found");
    assert_eq!(dqt_count, 2, "expected exactly 2 DQT segments");
    assert_eq!(dht_count, 4, "expected exactly 4 DHT segments");
    assert_eq!(sof0_components, Some(3), "SOF0 must declare 3 components");
}

/// Grayscale sources declare a single component in SOF0 and SOS.
#[test]
fn test_grayscale_component_count() {
    let pixels = vec![77u8; 16 * 16];
    let jpeg_bytes = jpeg::encode_with_color(&pixels, 16, 16, 85, ColorType::Gray).unwrap();

    let sof0 = find_marker(&jpeg_bytes, 0xC0).expect("SOF0 not found");
    // marker(2) + length(2) + precision(1) + height(2) + width(2)
    assert_eq!(jpeg_bytes[sof0 + 9], 1, "SOF0 component count");

    let sos = find_marker(&jpeg_bytes, 0xDA).expect("SOS not found");
    assert_eq!(jpeg_bytes[sos + 4], 1, "SOS component count");
    // Single scan component referencing the luma table pair
    assert_eq!(jpeg_bytes[sos + 5], 1, "scan component id");
    assert_eq!(jpeg_bytes[sos + 6], 0x00, "luma DC/AC table selectors");
}

/// Every 0xFF inside the entropy-coded scan is followed by a 0x00
/// stuffing byte.
#[test]
fn test_bit_stuffing_in_scan() {
    let mut rng = StdRng::seed_from_u64(31337);
    let mut pixels = vec![0u8; 48 * 48 * 3];
    rng.fill(pixels.as_mut_slice());

    // High quality maximizes entropy bytes and the chance of 0xFF runs.
    let jpeg_bytes = jpeg::encode(&pixels, 48, 48, 100).unwrap();

    let sos = find_marker(&jpeg_bytes, 0xDA).expect("SOS not found");
    let sos_len = u16::from_be_bytes([jpeg_bytes[sos + 2], jpeg_bytes[sos + 3]]) as usize;
    let scan = &jpeg_bytes[sos + 2 + sos_len..jpeg_bytes.len() - 2];

    let mut i = 0;
    while i < scan.len() {
        if scan[i] == 0xFF {
            assert!(
                i + 1 < scan.len() && scan[i + 1] == 0x00,
                "unstuffed 0xFF at scan offset {i}"
            );
            i += 2;
        } else {
            i += 1;
        }
    }
}

/// A flat all-128 8x8 grayscale block at maximum quality encodes to a
/// zero DC diff and a single EOB: exactly one scan byte.
#[test]
fn test_flat_block_scan_is_single_byte() {
    let pixels = vec![128u8; 64];
    let jpeg_bytes = jpeg::encode_with_color(&pixels, 8, 8, 100, ColorType::Gray).unwrap();

    let sos = find_marker(&jpeg_bytes, 0xDA).expect("SOS not found");
    let sos_len = u16::from_be_bytes([jpeg_bytes[sos + 2], jpeg_bytes[sos + 3]]) as usize;
    let scan = &jpeg_bytes[sos + 2 + sos_len..jpeg_bytes.len() - 2];

    // DC category 0 (00) + EOB (1010), padded with 1-bits.
    assert_eq!(scan, &[0b00101011]);
}

/// Ensure encoded JPEGs decode via `image` for RGB and Gray.
#[test]
fn test_jpeg_decode_via_image() {
    // RGB pattern
    let mut rgb = vec![0u8; 8 * 8 * 3];
    for (i, p) in rgb.iter_mut().enumerate() {
        *p = (i as u8).wrapping_mul(31);
    }
    let jpeg_rgb = jpeg::encode(&rgb, 8, 8, 85).unwrap();
    let decoded_rgb = image::load_from_memory(&jpeg_rgb).expect("decode rgb");
    assert_eq!(decoded_rgb.width(), 8);
    assert_eq!(decoded_rgb.height(), 8);

    // Grayscale random
    let mut rng = StdRng::seed_from_u64(1337);
    let mut gray = vec![0u8; 7 * 5];
    rng.fill(gray.as_mut_slice());
    let jpeg_gray = jpeg::encode_with_color(&gray, 7, 5, 75, ColorType::Gray).unwrap();
    let decoded_gray = image::load_from_memory(&jpeg_gray).expect("decode gray");
    assert_eq!(decoded_gray.width(), 7);
    assert_eq!(decoded_gray.height(), 5);
}

/// Decoded pixel values stay close to the source at high quality.
#[test]
fn test_decode_roundtrip_accuracy() {
    // Smooth gradient, which baseline JPEG should preserve well.
    let width = 24u32;
    let height = 16u32;
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 8 + y * 4) % 256) as u8);
        }
    }

    let encoded =
        jpeg::encode_with_color(&pixels, width, height, 95, ColorType::Gray).unwrap();
    let decoded = image::load_from_memory(&encoded).expect("decode").to_luma8();

    let mut max_err = 0i32;
    for (src, dst) in pixels.iter().zip(decoded.as_raw().iter()) {
        max_err = max_err.max((*src as i32 - *dst as i32).abs());
    }
    assert!(max_err <= 8, "max per-pixel error {max_err} too large");
}

/// Randomized small-image decode across RGB/RGBA/Gray and multiple
/// qualities.
#[test]
fn test_jpeg_decode_random_small() {
    let mut rng = StdRng::seed_from_u64(2025);
    let dims = [(1, 1), (2, 3), (5, 4), (8, 8), (10, 10), (16, 9)];
    let qualities = [50u8, 85u8, 95u8];

    for &(w, h) in &dims {
        for color_type in [ColorType::Rgb, ColorType::Rgba, ColorType::Gray] {
            let mut data = vec![0u8; w * h * color_type.bytes_per_pixel()];
            rng.fill(data.as_mut_slice());
            for &q in &qualities {
                let encoded =
                    jpeg::encode_with_color(&data, w as u32, h as u32, q, color_type).unwrap();
                let decoded = image::load_from_memory(&encoded).expect("decode");
                assert_eq!(decoded.dimensions(), (w as u32, h as u32));
            }
        }
    }
}

fn jpeg_case_strategy() -> impl Strategy<Value = (u32, u32, u8, ColorType, Vec<u8>)> {
    (1u32..24, 1u32..24, 30u8..96).prop_flat_map(|(w, h, q)| {
        prop_oneof![
            Just(ColorType::Rgb),
            Just(ColorType::Rgba),
            Just(ColorType::Gray)
        ]
        .prop_flat_map(move |color_type| {
            let len = (w * h) as usize * color_type.bytes_per_pixel();
            proptest::collection::vec(any::<u8>(), len)
                .prop_map(move |data| (w, h, q, color_type, data))
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]
    #[test]
    fn prop_jpeg_decode_randomized(
        (w, h, quality, color_type, data) in jpeg_case_strategy()
    ) {
        let encoded = jpeg::encode_with_color(&data, w, h, quality, color_type).unwrap();

        prop_assert!(encoded.starts_with(&[0xFF, 0xD8]));
        prop_assert!(encoded.ends_with(&[0xFF, 0xD9]));

        let decoded = image::load_from_memory(&encoded).expect("decode");
        prop_assert_eq!(decoded.dimensions(), (w, h));
    }
}
