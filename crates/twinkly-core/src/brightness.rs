//! Brightness scale conversion.
//!
//! Devices report brightness as 0–100; hosts work in 0–255. Writes divide by
//! 2.55 and round to the nearest native step, reads multiply by 2.55 without
//! rounding. The two directions are deliberately not inverses:
//! `to_external(to_native(128))` is `127.5`, not `128`.
//!
//! Both directions are computed as `x * 100 / 255` and `x * 255 / 100` so that
//! exact results such as `100 → 255.0` and `50 → 127.5` come out exact in
//! floating point.

/// Top of the device's native scale.
pub const NATIVE_MAX: u8 = 100;

/// Top of the host-facing scale.
pub const EXTERNAL_MAX: u8 = 255;

/// Host scale (0–255) to native scale (0–100): `round(external / 2.55)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn to_native(external: u8) -> u8 {
    let scaled = f64::from(external) * f64::from(NATIVE_MAX) / f64::from(EXTERNAL_MAX);
    // scaled is within 0.0..=100.0, so the cast cannot truncate.
    scaled.round() as u8
}

/// Native scale (0–100) to host scale: `native * 2.55`, unrounded.
pub fn to_external(native: u8) -> f64 {
    f64::from(native) * f64::from(EXTERNAL_MAX) / f64::from(NATIVE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_bounds() {
        assert!((to_external(100) - 255.0).abs() < f64::EPSILON);
        assert!(to_external(0).abs() < f64::EPSILON);
    }

    #[test]
    fn write_rounds_to_nearest_step() {
        assert_eq!(to_native(128), 50);
        assert_eq!(to_native(255), 100);
        assert_eq!(to_native(0), 0);
        assert_eq!(to_native(1), 0);
        assert_eq!(to_native(2), 1);
        assert_eq!(to_native(254), 100);
    }

    #[test]
    fn mid_scale_read() {
        assert!((to_external(50) - 127.5).abs() < f64::EPSILON);
    }

    #[test]
    fn round_trip_drifts() {
        let back = to_external(to_native(128));
        assert!((back - 127.5).abs() < f64::EPSILON);
        assert!((back - 128.0).abs() > 0.1);
    }

    #[test]
    fn write_never_exceeds_native_max() {
        for external in 0..=u8::MAX {
            assert!(to_native(external) <= NATIVE_MAX);
        }
    }
}
