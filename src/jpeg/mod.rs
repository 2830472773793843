//! JPEG encoder implementation.
//!
//! Implements sequential baseline JPEG encoding (SOF0): quality-scaled
//! quantization tables, AAN forward DCT, fixed canonical Huffman tables,
//! and full-resolution 4:4:4 sampling for color sources. Output is
//! streamed to a caller-supplied [`Sink`] as bytes become ready.

pub mod dct;
pub mod huffman;
pub mod quantize;

use crate::bits::BitWriter;
use crate::color::{rgb_to_ycbcr, ColorType};
use crate::error::{Error, Result};
use crate::sink::Sink;

use dct::fdct_2d;
use huffman::{encode_block, HuffmanTables};
use quantize::{quantize_block, zigzag_reorder, QuantTable, QuantizationTables, ZIGZAG};

/// Maximum supported image dimension (the frame header stores 16 bits).
const MAX_DIMENSION: u32 = 65535;

/// JPEG markers.
const SOI: u16 = 0xFFD8; // Start of Image
const EOI: u16 = 0xFFD9; // End of Image
const APP0: u16 = 0xFFE0; // JFIF marker
const DQT: u16 = 0xFFDB; // Define Quantization Table
const SOF0: u16 = 0xFFC0; // Start of Frame (baseline DCT)
const DHT: u16 = 0xFFC4; // Define Huffman Table
const SOS: u16 = 0xFFDA; // Start of Scan

/// Encode raw RGB pixel data as JPEG.
///
/// # Arguments
/// * `data` - Raw pixel data (RGB, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - Quality level 1-100 (out-of-range values are clamped)
///
/// # Returns
/// Complete JPEG file as bytes.
pub fn encode(data: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
    encode_with_color(data, width, height, quality, ColorType::Rgb)
}

/// Encode raw pixel data as JPEG with the specified color type.
///
/// Accepts `Gray`, `Rgb`, and `Rgba` sources (the alpha channel is
/// ignored); `GrayAlpha` is rejected.
pub fn encode_with_color(
    data: &[u8],
    width: u32,
    height: u32,
    quality: u8,
    color_type: ColorType,
) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(
        width as usize * height as usize * color_type.bytes_per_pixel() / 4 + 1024,
    );
    encode_to_sink(&mut output, data, width, height, color_type, quality)?;
    Ok(output)
}

/// Encode raw pixel data as JPEG, appending the stream to `sink`.
///
/// The encoder is write-once and forward-only: validation happens before
/// the first byte is appended, and a sink failure aborts the encode with
/// whatever partial output the sink already accepted.
///
/// # Arguments
/// * `sink` - Destination for the encoded bytes
/// * `data` - Raw pixel data (Gray, RGB, or RGBA, row-major order)
/// * `width` - Image width in pixels (1-65535)
/// * `height` - Image height in pixels (1-65535)
/// * `color_type` - Source pixel layout
/// * `quality` - Quality level 1-100 (out-of-range values are clamped)
pub fn encode_to_sink<S: Sink>(
    sink: &mut S,
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    quality: u8,
) -> Result<()> {
    // Validate dimensions
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::ImageTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }

    // Validate color type (JPEG encodes 1-, 3-, or 4-channel sources)
    let bytes_per_pixel = match color_type {
        ColorType::Gray => 1,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::GrayAlpha => return Err(Error::UnsupportedColorType),
    };

    // Validate data length
    let expected_len = width as usize * height as usize * bytes_per_pixel;
    if data.len() != expected_len {
        return Err(Error::InvalidDataLength {
            expected: expected_len,
            actual: data.len(),
        });
    }

    // Tables are pure functions of the quality setting, built fresh per
    // call.
    let quant_tables = QuantizationTables::with_quality(quality);
    let huff_tables = HuffmanTables::new();

    // Write JPEG headers
    sink.append(&SOI.to_be_bytes())?;
    write_app0(sink)?;
    write_dqt(sink, &quant_tables.luminance, 0)?;
    write_dqt(sink, &quant_tables.chrominance, 1)?;
    write_sof0(sink, width, height, color_type)?;
    write_dht(sink, &huff_tables)?;
    write_sos(sink, color_type)?;

    // Entropy-coded scan data
    encode_scan(sink, data, width, height, color_type, &quant_tables, &huff_tables)?;

    // Write end marker
    sink.append(&EOI.to_be_bytes())
}

/// Write the APP0 (JFIF) segment: version 1.01, aspect-ratio units, no
/// thumbnail.
fn write_app0<S: Sink>(sink: &mut S) -> Result<()> {
    sink.append(&APP0.to_be_bytes())?;

    // Length (16 bytes including length field)
    sink.append(&16u16.to_be_bytes())?;

    // JFIF identifier
    sink.append(b"JFIF\0")?;

    // Version 1.01
    sink.append(&[1, 1])?;

    // Units: 0 = no units (aspect ratio only)
    sink.append(&[0])?;

    // X and Y density
    sink.append(&1u16.to_be_bytes())?;
    sink.append(&1u16.to_be_bytes())?;

    // Thumbnail dimensions (0x0 = no thumbnail)
    sink.append(&[0, 0])
}

/// Write one DQT (Define Quantization Table) segment.
///
/// Divisors are kept in natural order internally; the wire format wants
/// them in zigzag scan order.
fn write_dqt<S: Sink>(sink: &mut S, table: &QuantTable, id: u8) -> Result<()> {
    sink.append(&DQT.to_be_bytes())?;

    let length = 2 + 1 + table.values.len() as u16;
    sink.append(&length.to_be_bytes())?;

    // Table id, 8-bit precision
    sink.append(&[id])?;

    let mut zigzagged = [0u8; 64];
    for (i, out) in zigzagged.iter_mut().enumerate() {
        *out = table.values[ZIGZAG[i]];
    }
    sink.append(&zigzagged)
}

/// Write the SOF0 (Start of Frame, baseline) segment.
fn write_sof0<S: Sink>(sink: &mut S, width: u32, height: u32, color_type: ColorType) -> Result<()> {
    sink.append(&SOF0.to_be_bytes())?;

    let num_components: u8 = match color_type {
        ColorType::Gray => 1,
        _ => 3,
    };

    let length = 8 + 3 * num_components as u16;
    sink.append(&length.to_be_bytes())?;

    // Precision: 8 bits
    sink.append(&[8])?;

    // Height and width
    sink.append(&(height as u16).to_be_bytes())?;
    sink.append(&(width as u16).to_be_bytes())?;

    sink.append(&[num_components])?;

    if num_components == 1 {
        // Grayscale: single component, 1x1 sampling, quantization table 0
        sink.append(&[1, 0x11, 0])?;
    } else {
        // YCbCr, all components at 1x1 sampling (4:4:4)
        sink.append(&[1, 0x11, 0])?; // Y, quantization table 0
        sink.append(&[2, 0x11, 1])?; // Cb, quantization table 1
        sink.append(&[3, 0x11, 1])?; // Cr, quantization table 1
    }
    Ok(())
}

/// Write the four DHT (Define Huffman Table) segments.
fn write_dht<S: Sink>(sink: &mut S, tables: &HuffmanTables) -> Result<()> {
    // DC luminance
    write_huffman_table(sink, 0x00, &tables.dc_lum_bits, tables.dc_lum_vals)?;

    // DC chrominance
    write_huffman_table(sink, 0x01, &tables.dc_chrom_bits, tables.dc_chrom_vals)?;

    // AC luminance
    write_huffman_table(sink, 0x10, &tables.ac_lum_bits, tables.ac_lum_vals)?;

    // AC chrominance
    write_huffman_table(sink, 0x11, &tables.ac_chrom_bits, tables.ac_chrom_vals)
}

/// Write a single Huffman table segment.
fn write_huffman_table<S: Sink>(
    sink: &mut S,
    table_id: u8,
    bits: &[u8; 16],
    vals: &[u8],
) -> Result<()> {
    sink.append(&DHT.to_be_bytes())?;

    // Length: 2 + 1 + 16 + num_values
    let length = (2 + 1 + 16 + vals.len()) as u16;
    sink.append(&length.to_be_bytes())?;

    // Table class and ID
    sink.append(&[table_id])?;

    // Number of codes of each length, then the symbol values
    sink.append(bits)?;
    sink.append(vals)
}

/// Write the SOS (Start of Scan) segment.
fn write_sos<S: Sink>(sink: &mut S, color_type: ColorType) -> Result<()> {
    sink.append(&SOS.to_be_bytes())?;

    let num_components: u8 = match color_type {
        ColorType::Gray => 1,
        _ => 3,
    };

    let length = 6 + 2 * num_components as u16;
    sink.append(&length.to_be_bytes())?;

    sink.append(&[num_components])?;

    if num_components == 1 {
        sink.append(&[1, 0x00])?; // luma DC/AC tables
    } else {
        sink.append(&[1, 0x00])?; // Y: DC table 0, AC table 0
        sink.append(&[2, 0x11])?; // Cb: DC table 1, AC table 1
        sink.append(&[3, 0x11])?; // Cr: DC table 1, AC table 1
    }

    // Spectral selection 0..63, no successive approximation
    sink.append(&[0, 63, 0])
}

/// Encode the entropy-coded scan: iterate 8x8-aligned block positions in
/// raster order, emitting Y (and for color sources Cb, Cr) per position.
fn encode_scan<S: Sink>(
    sink: &mut S,
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    quant_tables: &QuantizationTables,
    huff_tables: &HuffmanTables,
) -> Result<()> {
    let width = width as usize;
    let height = height as usize;

    let padded_width = (width + 7) & !7;
    let padded_height = (height + 7) & !7;

    let mut writer = BitWriter::new(sink);

    // Previous DC values for differential encoding, one per component.
    let mut prev_dc_y = 0i16;
    let mut prev_dc_cb = 0i16;
    let mut prev_dc_cr = 0i16;

    for block_y in (0..padded_height).step_by(8) {
        for block_x in (0..padded_width).step_by(8) {
            if color_type == ColorType::Gray {
                let y_block = extract_luma_block(data, width, height, block_x, block_y);
                prev_dc_y = transform_and_encode(
                    &mut writer,
                    &y_block,
                    &quant_tables.luminance,
                    prev_dc_y,
                    true,
                    huff_tables,
                )?;
            } else {
                let (y_block, cb_block, cr_block) =
                    extract_block(data, width, height, block_x, block_y, color_type);

                prev_dc_y = transform_and_encode(
                    &mut writer,
                    &y_block,
                    &quant_tables.luminance,
                    prev_dc_y,
                    true,
                    huff_tables,
                )?;
                prev_dc_cb = transform_and_encode(
                    &mut writer,
                    &cb_block,
                    &quant_tables.chrominance,
                    prev_dc_cb,
                    false,
                    huff_tables,
                )?;
                prev_dc_cr = transform_and_encode(
                    &mut writer,
                    &cr_block,
                    &quant_tables.chrominance,
                    prev_dc_cr,
                    false,
                    huff_tables,
                )?;
            }
        }
    }

    // Pad the final partial byte with 1-bits.
    writer.flush()
}

/// Run one component block through DCT, quantization, zigzag reordering,
/// and entropy coding. Returns the block's DC value.
fn transform_and_encode<S: Sink>(
    writer: &mut BitWriter<'_, S>,
    block: &[f32; 64],
    table: &QuantTable,
    prev_dc: i16,
    is_luminance: bool,
    huff_tables: &HuffmanTables,
) -> Result<i16> {
    let coefficients = quantize_block(&fdct_2d(block), &table.scale);
    let zigzagged = zigzag_reorder(&coefficients);
    encode_block(writer, &zigzagged, prev_dc, is_luminance, huff_tables)
}

/// Extract an 8x8 level-shifted luma block from a grayscale source.
///
/// Sample coordinates past the right or bottom edge replicate the last
/// valid column/row instead of reading out of bounds.
fn extract_luma_block(
    data: &[u8],
    width: usize,
    height: usize,
    block_x: usize,
    block_y: usize,
) -> [f32; 64] {
    let mut block = [0.0f32; 64];

    for dy in 0..8 {
        for dx in 0..8 {
            let x = (block_x + dx).min(width - 1);
            let y = (block_y + dy).min(height - 1);
            block[dy * 8 + dx] = data[y * width + x] as f32 - 128.0;
        }
    }

    block
}

/// Extract an 8x8 block from an RGB/RGBA source as level-shifted YCbCr,
/// with the same replicate-border policy as [`extract_luma_block`].
fn extract_block(
    data: &[u8],
    width: usize,
    height: usize,
    block_x: usize,
    block_y: usize,
    color_type: ColorType,
) -> ([f32; 64], [f32; 64], [f32; 64]) {
    let mut y_block = [0.0f32; 64];
    let mut cb_block = [0.0f32; 64];
    let mut cr_block = [0.0f32; 64];

    let bpp = color_type.bytes_per_pixel();

    for dy in 0..8 {
        for dx in 0..8 {
            let x = (block_x + dx).min(width - 1);
            let y = (block_y + dy).min(height - 1);
            let idx = dy * 8 + dx;

            let pixel_idx = (y * width + x) * bpp;
            let r = data[pixel_idx];
            let g = data[pixel_idx + 1];
            let b = data[pixel_idx + 2];
            let (yc, cb, cr) = rgb_to_ycbcr(r, g, b);
            y_block[idx] = yc;
            cb_block[idx] = cb;
            cr_block[idx] = cr;
        }
    }

    (y_block, cb_block, cr_block)
}
