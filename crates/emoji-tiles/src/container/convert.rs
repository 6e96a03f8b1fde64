//! Float payload to 8-bit conversion.
//!
//! Float containers come in two flavours: values already in `0..=255`, or
//! values normalized to `0..=1`. The flavour is guessed once for the whole
//! buffer from a leading sample, so a container mixing both scales is
//! misread.

/// Number of leading elements inspected to detect the value scale.
pub const SCALE_SAMPLE_LEN: usize = 5000;

/// Sampled maximum at or below which the buffer is treated as normalized.
pub const NORMALIZED_MAX: f32 = 1.5;

/// Returns true if the leading sample looks like `0..=1` data.
///
/// NaN values are ignored by the maximum. An empty buffer counts as
/// normalized (there is nothing to scale either way).
pub fn looks_normalized(values: &[f32]) -> bool {
    let max = values
        .iter()
        .take(SCALE_SAMPLE_LEN)
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    max <= NORMALIZED_MAX
}

/// Convert one float to a byte: clamp to `0..=255`, then round half up.
///
/// NaN maps to 0.
#[inline]
pub fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 255.0) + 0.5).floor() as u8
}

/// Decode little-endian float32 payload bytes and convert them to bytes.
///
/// `payload` must hold exactly `count * 4` bytes.
pub fn f32le_to_bytes(payload: &[u8]) -> Vec<u8> {
    let values: Vec<f32> = payload
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let scale = if looks_normalized(&values) { 255.0 } else { 1.0 };
    values.iter().map(|&v| to_byte(v * scale)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_normalized_values_are_scaled() {
        let out = f32le_to_bytes(&encode(&[1.0, 0.0, 0.5, 1.0]));
        assert_eq!(out, vec![255, 0, 128, 255]);
    }

    #[test]
    fn test_byte_range_values_pass_through() {
        let out = f32le_to_bytes(&encode(&[255.0, 0.0, 127.4, 127.5, 2.0]));
        assert_eq!(out, vec![255, 0, 127, 128, 2]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // max == 1.5 still counts as normalized, so 1.5 * 255 clamps to 255
        let out = f32le_to_bytes(&encode(&[1.5, 0.2]));
        assert_eq!(out, vec![255, 51]);

        let out = f32le_to_bytes(&encode(&[1.6, 0.2]));
        assert_eq!(out, vec![2, 0]);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let out = f32le_to_bytes(&encode(&[-20.0, 300.0, 10.0]));
        assert_eq!(out, vec![0, 255, 10]);
    }

    #[test]
    fn test_nan_maps_to_zero() {
        assert_eq!(to_byte(f32::NAN), 0);
        let out = f32le_to_bytes(&encode(&[f32::NAN, 1.0]));
        assert_eq!(out, vec![0, 255]);
    }

    #[test]
    fn test_scale_decision_only_samples_leading_elements() {
        // A large value beyond the sample window does not change the decision.
        let mut values = vec![1.0f32; SCALE_SAMPLE_LEN];
        values.push(200.0);
        let out = f32le_to_bytes(&encode(&values));
        assert_eq!(out[0], 255);
        assert_eq!(out[SCALE_SAMPLE_LEN], 255, "200 * 255 clamps to 255");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(to_byte(0.5), 1);
        assert_eq!(to_byte(1.49), 1);
        assert_eq!(to_byte(254.5), 255);
    }
}
