//! Conversion from accumulated radiance samples to display bytes.

use ember_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Convert one channel of an accumulated sample sum to an 8-bit value.
///
/// Averages over the sample count, applies gamma-2 correction and clamps
/// to [0, 0.999] before scaling by 256, so a fully saturated channel maps
/// to 255.
#[inline]
pub fn convert_channel(value: f64, samples_per_pixel: u32) -> u8 {
    let scale = 1.0 / samples_per_pixel as f64;
    let gamma = (scale * value).sqrt();
    (256.0 * gamma.clamp(0.0, 0.999)) as u8
}

/// Convert an accumulated pixel sample sum to RGBA8 with opaque alpha.
#[inline]
pub fn to_rgba8(color: Color, samples_per_pixel: u32) -> [u8; 4] {
    [
        convert_channel(color.x, samples_per_pixel),
        convert_channel(color.y, samples_per_pixel),
        convert_channel(color.z, samples_per_pixel),
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturated_channel_maps_to_255() {
        assert_eq!(convert_channel(1.0, 1), 255);
        assert_eq!(convert_channel(0.0, 1), 0);
        assert_eq!(to_rgba8(Color::new(1.0, 0.0, 0.0), 1), [255, 0, 0, 255]);
    }

    #[test]
    fn test_gamma_correction() {
        // 0.25 linear is 0.5 after gamma-2, which scales to 128.
        assert_eq!(convert_channel(0.25, 1), 128);
    }

    #[test]
    fn test_sample_averaging() {
        // Four accumulated white samples average back to white.
        assert_eq!(convert_channel(4.0, 4), 255);
    }

    #[test]
    fn test_overbright_clamps() {
        assert_eq!(convert_channel(100.0, 1), 255);
    }
}
