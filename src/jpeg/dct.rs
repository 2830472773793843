//! Forward Discrete Cosine Transform (DCT) for JPEG.
//!
//! Implements the Arai-Agui-Nakajima scaled 8-point DCT (the
//! factorization in figure 4-8 of Pennebaker & Mitchell), applied
//! separably: rows first, then columns. Output coefficients carry a
//! per-position scale of `8 * AAN[row] * AAN[col]` relative to the
//! standard JPEG DCT; the quantizer folds the correction into its
//! reciprocal divisor table, so no extra normalization pass is needed.

/// cos(4*PI/16), the c4 rotation factor.
const C4: f32 = 0.707106781;
/// cos(6*PI/16).
const C6: f32 = 0.382683433;
/// cos(2*PI/16) - cos(6*PI/16).
const C2_MINUS_C6: f32 = 0.541196100;
/// cos(2*PI/16) + cos(6*PI/16).
const C2_PLUS_C6: f32 = 1.306562965;

/// Perform the scaled 2D forward DCT on an 8x8 block.
pub fn fdct_2d(block: &[f32; 64]) -> [f32; 64] {
    let mut data = *block;

    // Pass 1: rows.
    for row in 0..8 {
        let start = row * 8;
        let mut v = [0.0f32; 8];
        v.copy_from_slice(&data[start..start + 8]);
        fdct_8(&mut v);
        data[start..start + 8].copy_from_slice(&v);
    }

    // Pass 2: columns.
    for col in 0..8 {
        let mut v = [0.0f32; 8];
        for row in 0..8 {
            v[row] = data[row * 8 + col];
        }
        fdct_8(&mut v);
        for row in 0..8 {
            data[row * 8 + col] = v[row];
        }
    }

    data
}

/// One 8-point AAN butterfly pass, in place.
fn fdct_8(v: &mut [f32; 8]) {
    let tmp0 = v[0] + v[7];
    let tmp7 = v[0] - v[7];
    let tmp1 = v[1] + v[6];
    let tmp6 = v[1] - v[6];
    let tmp2 = v[2] + v[5];
    let tmp5 = v[2] - v[5];
    let tmp3 = v[3] + v[4];
    let tmp4 = v[3] - v[4];

    // Even part
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    v[0] = tmp10 + tmp11;
    v[4] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * C4;
    v[2] = tmp13 + z1;
    v[6] = tmp13 - z1;

    // Odd part
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    // The rotator is modified from fig 4-8 to avoid extra negations.
    let z5 = (tmp10 - tmp12) * C6;
    let z2 = C2_MINUS_C6 * tmp10 + z5;
    let z4 = C2_PLUS_C6 * tmp12 + z5;
    let z3 = tmp11 * C4;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    v[5] = z13 + z2;
    v[3] = z13 - z2;
    v[1] = z11 + z4;
    v[7] = z11 - z4;
}
