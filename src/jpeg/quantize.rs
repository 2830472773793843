//! JPEG quantization tables and functions.

/// Standard JPEG luminance quantization table (natural order).
const STD_LUMINANCE_TABLE: [u8; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81, 104, 113,
    92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
];

/// Standard JPEG chrominance quantization table (natural order).
const STD_CHROMINANCE_TABLE: [u8; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99, 18, 21, 26, 66, 99, 99, 99, 99, 24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
];

/// Zigzag scan order for an 8x8 block: `ZIGZAG[k]` is the natural
/// (row-major) position of the k-th coefficient in ascending-frequency
/// order.
pub const ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// AAN normalization factors: `scalefactor[0] = 1`,
/// `scalefactor[k] = cos(k*PI/16) * sqrt(2)` for k = 1..7.
///
/// The fast DCT in [`crate::jpeg::dct`] produces coefficients scaled by
/// `8 * AAN[row] * AAN[col]`; folding the correction into the reciprocal
/// quantization scale makes dequantization a single multiply per
/// coefficient.
const AAN_SCALE_FACTORS: [f32; 8] = [
    1.0,
    1.387039845,
    1.306562965,
    1.175875602,
    1.0,
    0.785694958,
    0.541196100,
    0.275899379,
];

/// Rounding bias for quantization: `floor(x + BIAS + 0.5) - BIAS` rounds
/// half up for both signs without relying on `round`'s negative-number
/// behavior.
const ROUND_BIAS: f32 = 1024.0;

/// One quantization table: the 8-bit divisors plus the per-position
/// reciprocal scales applied after the forward DCT.
pub struct QuantTable {
    /// Divisors in natural (row-major) order, each in [1, 255].
    pub values: [u8; 64],
    /// `1 / (values[i] * 8 * AAN[row] * AAN[col])`, natural order.
    pub scale: [f32; 64],
}

impl QuantTable {
    fn from_reference(reference: &[u8; 64], scale_pct: u32) -> Self {
        let mut values = [0u8; 64];
        let mut scale = [0.0f32; 64];

        for i in 0..64 {
            let val = ((reference[i] as u32 * scale_pct + 50) / 100).clamp(1, 255);
            values[i] = val as u8;
        }

        for row in 0..8 {
            for col in 0..8 {
                let i = row * 8 + col;
                scale[i] = 1.0
                    / (values[i] as f32
                        * 8.0
                        * AAN_SCALE_FACTORS[row]
                        * AAN_SCALE_FACTORS[col]);
            }
        }

        Self { values, scale }
    }
}

/// Quantization tables for JPEG encoding.
pub struct QuantizationTables {
    /// Luminance table.
    pub luminance: QuantTable,
    /// Chrominance table.
    pub chrominance: QuantTable,
}

impl QuantizationTables {
    /// Create quantization tables for the given quality.
    ///
    /// Quality follows the libjpeg 1-100 convention (out-of-range values
    /// are clamped): the reference matrices are scaled by `5000/q` below
    /// 50 and `200 - 2q` at and above, with every divisor floored at 1.
    /// At quality 100 all 64 divisors are 1.
    pub fn with_quality(quality: u8) -> Self {
        let quality = quality.clamp(1, 100) as u32;

        let scale_pct = if quality < 50 {
            5000 / quality
        } else {
            200 - 2 * quality
        };

        Self {
            luminance: QuantTable::from_reference(&STD_LUMINANCE_TABLE, scale_pct),
            chrominance: QuantTable::from_reference(&STD_CHROMINANCE_TABLE, scale_pct),
        }
    }
}

/// Quantize a transformed block: multiply each coefficient by its
/// reciprocal scale and round half up via the bias trick.
pub fn quantize_block(dct: &[f32; 64], scale: &[f32; 64]) -> [i16; 64] {
    let mut result = [0i16; 64];
    for i in 0..64 {
        let scaled = dct[i] * scale[i];
        result[i] = ((scaled + ROUND_BIAS + 0.5).floor() - ROUND_BIAS) as i16;
    }
    result
}

/// Gather a natural-order block into zigzag (ascending-frequency) order.
pub fn zigzag_reorder(block: &[i16; 64]) -> [i16; 64] {
    let mut result = [0i16; 64];
    for i in 0..64 {
        result[i] = block[ZIGZAG[i]];
    }
    result
}
