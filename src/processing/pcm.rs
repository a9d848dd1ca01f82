//! PCM sample conversion helpers.
//!
//! All operations work on plain slices with no platform dependencies.

/// Convert little-endian interleaved PCM bytes to i16 samples.
///
/// Writes into the prefix of `out` and returns the number of samples
/// produced. An odd trailing byte is dropped.
pub fn bytes_to_samples(bytes: &[u8], out: &mut [i16]) -> usize {
    let count = (bytes.len() / 2).min(out.len());
    for (i, sample) in out.iter_mut().take(count).enumerate() {
        *sample = i16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]);
    }
    count
}

/// De-interleave stereo samples `[L0, R0, L1, R1, ...]` into the prefixes
/// of `left` and `right`, returning the number of frames written.
///
/// An odd trailing sample with no channel partner is dropped.
pub fn split_stereo(samples: &[i16], left: &mut [i16], right: &mut [i16]) -> usize {
    let frames = (samples.len() / 2).min(left.len()).min(right.len());
    for i in 0..frames {
        left[i] = samples[2 * i];
        right[i] = samples[2 * i + 1];
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_samples_little_endian() {
        let bytes = [0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80];
        let mut out = [0i16; 3];

        let count = bytes_to_samples(&bytes, &mut out);

        assert_eq!(count, 3);
        assert_eq!(out, [1, -1, i16::MIN]);
    }

    #[test]
    fn bytes_to_samples_drops_odd_trailing_byte() {
        let bytes = [0x01, 0x00, 0x02];
        let mut out = [0i16; 4];

        let count = bytes_to_samples(&bytes, &mut out);

        assert_eq!(count, 1);
        assert_eq!(out[0], 1);
    }

    #[test]
    fn bytes_to_samples_bounded_by_out_len() {
        let bytes = [0u8; 8];
        let mut out = [0i16; 2];

        assert_eq!(bytes_to_samples(&bytes, &mut out), 2);
    }

    #[test]
    fn split_stereo_basic() {
        let samples = [10, 20, 11, 21, 12, 22];
        let mut left = [0i16; 3];
        let mut right = [0i16; 3];

        let frames = split_stereo(&samples, &mut left, &mut right);

        assert_eq!(frames, 3);
        assert_eq!(left, [10, 11, 12]);
        assert_eq!(right, [20, 21, 22]);
    }

    #[test]
    fn split_stereo_drops_odd_trailing_sample() {
        let samples = [10, 20, 11, 21, 12]; // trailing L with no R
        let mut left = [0i16; 4];
        let mut right = [0i16; 4];

        let frames = split_stereo(&samples, &mut left, &mut right);

        assert_eq!(frames, 2);
        assert_eq!(&left[..2], &[10, 11]);
        assert_eq!(&right[..2], &[20, 21]);
    }

    #[test]
    fn split_stereo_empty() {
        let mut left = [0i16; 2];
        let mut right = [0i16; 2];
        assert_eq!(split_stereo(&[], &mut left, &mut right), 0);
    }
}
