//! Scalar quantization.
//!
//! Floats are mapped to `bits`-wide unsigned integers. Linear codecs clamp
//! into `[min, max]` and spread `2^bits` levels over the closed range. Angle
//! codecs first reduce modulo a full turn and then split `[0, 2π)` into
//! `2^bits` buckets, so congruent angles share a representation and decoding
//! always lands in `[0, 2π)`.

use std::f64::consts::TAU;

use bitstream::{BitReader, BitWriter};
use schema::{AngleQuant, LinearQuant, ScalarCodec};

use crate::error::CodecResult;

/// Largest `f32` strictly below a full turn.
const BELOW_FULL_TURN: f32 = 6.283_185;

/// Maps `value` onto the raw integer grid of `quant`.
///
/// Values outside the range are clamped. NaN maps to `min`.
#[must_use]
pub fn quantize_linear(quant: LinearQuant, value: f32) -> u64 {
    if value.is_nan() {
        return 0;
    }
    let max_raw = quant.max_raw();
    let min = f64::from(quant.min);
    let max = f64::from(quant.max);
    let clamped = f64::from(value).max(min).min(max);
    let t = (clamped - min) / (max - min);
    if !t.is_finite() {
        return 0;
    }
    ((t * max_raw as f64).round() as u64).min(max_raw)
}

/// Reconstructs the float represented by `raw`.
#[must_use]
pub fn dequantize_linear(quant: LinearQuant, raw: u64) -> f32 {
    let max_raw = quant.max_raw();
    if max_raw == 0 {
        return quant.min;
    }
    let raw = raw.min(max_raw);
    let min = f64::from(quant.min);
    let span = f64::from(quant.max) - min;
    (min + raw as f64 * span / max_raw as f64) as f32
}

/// Reduces an angle in radians into `[0, 2π)`. Non-finite input maps to 0.
#[must_use]
pub fn normalize_angle(radians: f32) -> f32 {
    if !radians.is_finite() {
        return 0.0;
    }
    let turn = f64::from(radians).rem_euclid(TAU) as f32;
    if turn >= std::f32::consts::TAU {
        0.0
    } else {
        turn
    }
}

/// Maps an angle onto the bucket grid of `quant`, wrapping around a full turn.
#[must_use]
pub fn quantize_angle(quant: AngleQuant, radians: f32) -> u64 {
    if !radians.is_finite() {
        return 0;
    }
    let turn = f64::from(radians).rem_euclid(TAU);
    let raw = (turn / quant.step()).round() as u64;
    // Rounding up from the last bucket lands on a full turn, which is zero.
    raw % quant.buckets()
}

/// Reconstructs the angle in `[0, 2π)` represented by `raw`.
#[must_use]
pub fn dequantize_angle(quant: AngleQuant, raw: u64) -> f32 {
    let raw = raw % quant.buckets();
    let angle = (raw as f64 * quant.step()) as f32;
    angle.min(BELOW_FULL_TURN)
}

/// Quantizes with either codec.
#[must_use]
pub fn quantize(codec: ScalarCodec, value: f32) -> u64 {
    match codec {
        ScalarCodec::Linear(quant) => quantize_linear(quant, value),
        ScalarCodec::Angle(quant) => quantize_angle(quant, value),
    }
}

/// Dequantizes with either codec.
#[must_use]
pub fn dequantize(codec: ScalarCodec, raw: u64) -> f32 {
    match codec {
        ScalarCodec::Linear(quant) => dequantize_linear(quant, raw),
        ScalarCodec::Angle(quant) => dequantize_angle(quant, raw),
    }
}

/// Distance between two raw values in steps. Angles measure the short way
/// around the circle.
#[must_use]
pub fn raw_distance(codec: ScalarCodec, a: u64, b: u64) -> u64 {
    let direct = a.abs_diff(b);
    match codec {
        ScalarCodec::Linear(_) => direct,
        ScalarCodec::Angle(quant) => direct.min(quant.buckets().saturating_sub(direct)),
    }
}

/// Returns `true` if `a` and `b` quantize to the same raw value.
#[must_use]
pub fn same_quantized(codec: ScalarCodec, a: f32, b: f32) -> bool {
    quantize(codec, a) == quantize(codec, b)
}

/// Returns `true` if `a` and `b` are at most one quantization step apart.
#[must_use]
pub fn within_one_step(codec: ScalarCodec, a: f32, b: f32) -> bool {
    raw_distance(codec, quantize(codec, a), quantize(codec, b)) <= 1
}

/// Quantizes `value` and writes it as a `bits`-wide field.
///
/// # Errors
///
/// Returns [`CodecError::Schema`](crate::CodecError::Schema) if `codec` has an
/// invalid width or range; nothing is written in that case.
pub fn write_scalar(codec: ScalarCodec, value: f32, writer: &mut BitWriter<'_>) -> CodecResult<()> {
    codec.validate()?;
    writer.write_bits(quantize(codec, value), usize::from(codec.bits()))?;
    Ok(())
}

/// Reads a `bits`-wide field and dequantizes it.
pub fn read_scalar(codec: ScalarCodec, reader: &mut BitReader<'_>) -> CodecResult<f32> {
    codec.validate()?;
    let raw = reader.read_bits(usize::from(codec.bits()))?;
    Ok(dequantize(codec, raw))
}
