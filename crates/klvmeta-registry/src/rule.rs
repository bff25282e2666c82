use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{FieldError, Result};

/// How a field's value bytes become text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodeKind {
    /// Big-endian integer followed by a transform. `width` is the nominal
    /// size in bytes; shorter and longer values up to 8 bytes are accepted.
    Integer {
        width: usize,
        signed: bool,
        transform: Transform,
    },
    /// Each byte is a character code.
    Characters,
    /// Each byte is rendered as a decimal number, concatenated.
    VersionDigits,
    /// Each byte is rendered as `0x..`, space-joined.
    HexBytes,
}

/// Transform applied to an integer value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// The integer itself.
    Decimal,
    /// Microseconds since the Unix epoch, rendered as UTC calendar time.
    Timestamp,
    /// `numerator / denominator * value + offset`.
    Linear {
        numerator: f64,
        denominator: f64,
        offset: f64,
    },
    /// `round(2 * value)`.
    DoubledRounded,
}

/// Decode rule for one local set tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub tag: u8,
    /// Key used in decoded frames.
    pub name: &'static str,
    pub kind: DecodeKind,
}

const fn unsigned(width: usize, transform: Transform) -> DecodeKind {
    DecodeKind::Integer {
        width,
        signed: false,
        transform,
    }
}

const fn signed(width: usize, transform: Transform) -> DecodeKind {
    DecodeKind::Integer {
        width,
        signed: true,
        transform,
    }
}

const fn linear(numerator: f64, denominator: f64, offset: f64) -> Transform {
    Transform::Linear {
        numerator,
        denominator,
        offset,
    }
}

const fn rule(tag: u8, name: &'static str, kind: DecodeKind) -> FieldRule {
    FieldRule { tag, name, kind }
}

const LAT: Transform = linear(180.0, 4_294_967_294.0, 0.0);
const LON: Transform = linear(360.0, 4_294_967_294.0, 0.0);
const ALT: Transform = linear(19_900.0, 65_535.0, -900.0);
const FOV: Transform = linear(180.0, 65_535.0, 0.0);
const ANGLE32: Transform = linear(360.0, 4_294_967_294.0, 0.0);

/// Every tag the decoder understands, in ascending tag order.
pub const STANDARD_RULES: &[FieldRule] = &[
    rule(1, "checksum", unsigned(2, Transform::Decimal)),
    rule(2, "time_stamp", unsigned(8, Transform::Timestamp)),
    rule(5, "platform_heading_angle", unsigned(2, linear(360.0, 65_535.0, 0.0))),
    rule(6, "platform_pitch_angle", signed(2, linear(40.0, 65_534.0, 0.0))),
    rule(7, "platform_roll_angle", signed(2, linear(100.0, 65_534.0, 0.0))),
    rule(10, "platform_designation", DecodeKind::Characters),
    rule(11, "source_sensor", DecodeKind::Characters),
    rule(12, "coordinate_system", DecodeKind::Characters),
    rule(13, "sensor_latitude", signed(4, LAT)),
    rule(14, "sensor_longitude", signed(4, LON)),
    rule(15, "sensor_true_altitude", unsigned(2, ALT)),
    rule(16, "sensor_horizontal_fov", unsigned(2, FOV)),
    rule(17, "sensor_vertical_fov", unsigned(2, FOV)),
    rule(18, "sensor_relative_azimuth_angle", signed(4, ANGLE32)),
    rule(19, "sensor_relative_elevation_angle", signed(4, ANGLE32)),
    rule(20, "sensor_relative_roll_angle", unsigned(4, ANGLE32)),
    rule(21, "slant_range", unsigned(4, linear(5_000_000.0, 4_294_967_295.0, 0.0))),
    rule(22, "target_width", unsigned(2, linear(10_000.0, 65_535.0, 0.0))),
    rule(23, "frame_center_latitude", signed(4, LAT)),
    rule(24, "frame_center_longitude", signed(4, LON)),
    rule(25, "frame_center_elevation", unsigned(2, ALT)),
    rule(40, "target_location_latitude", signed(4, LAT)),
    rule(41, "target_location_longitude", signed(4, LON)),
    rule(42, "target_location_elevation", signed(2, ALT)),
    rule(43, "target_gate_width", unsigned(2, Transform::DoubledRounded)),
    rule(44, "target_gate_height", unsigned(2, Transform::DoubledRounded)),
    rule(65, "lds_version_number", DecodeKind::VersionDigits),
    rule(94, "miis_core", DecodeKind::HexBytes),
];

impl FieldRule {
    /// Decode raw value bytes into display text.
    ///
    /// Integer values may be shorter or longer than the nominal width, up to
    /// 8 bytes. Signed values are sign-extended from the actual length and an
    /// empty value decodes as 0.
    pub fn decode(&self, value: &[u8]) -> Result<String> {
        match self.kind {
            DecodeKind::Integer {
                signed, transform, ..
            } => {
                if value.len() > MAX_INTEGER_LEN {
                    return Err(FieldError::ValueTooLong {
                        tag: self.tag,
                        name: self.name,
                        max: MAX_INTEGER_LEN,
                        actual: value.len(),
                    });
                }
                let raw = read_be(value);
                let raw = if signed {
                    i128::from(sign_extend(raw, value.len()))
                } else {
                    i128::from(raw)
                };
                apply(raw, transform)
            }
            DecodeKind::Characters => Ok(value.iter().map(|&b| char::from(b)).collect()),
            DecodeKind::VersionDigits => Ok(value.iter().map(|b| b.to_string()).collect()),
            DecodeKind::HexBytes => Ok(value
                .iter()
                .map(|b| format!("{b:#x}"))
                .collect::<Vec<_>>()
                .join(" ")),
        }
    }
}

/// Longest integer value accepted, in bytes.
pub const MAX_INTEGER_LEN: usize = 8;

fn read_be(value: &[u8]) -> u64 {
    value.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

fn sign_extend(raw: u64, len: usize) -> i64 {
    if len == 0 {
        return 0;
    }
    let shift = 64 - 8 * len as u32;
    ((raw << shift) as i64) >> shift
}

/// Every `u64` and `i64` fits in `i128`, so one routine serves both.
fn apply(raw: i128, transform: Transform) -> Result<String> {
    match transform {
        Transform::Decimal => Ok(raw.to_string()),
        Transform::Timestamp => format_timestamp(raw),
        Transform::Linear {
            numerator,
            denominator,
            offset,
        } => Ok(format_real(scale(numerator, denominator, offset, raw as f64))),
        Transform::DoubledRounded => Ok((2 * raw).to_string()),
    }
}

/// Divide before multiplying: the published conversion tables depend on this
/// order down to the last bit.
fn scale(numerator: f64, denominator: f64, offset: f64, value: f64) -> f64 {
    numerator / denominator * value + offset
}

/// Shortest round-trip decimal, always with a fractional part or exponent.
///
/// Exponents carry a sign and at least two digits (`4.19e-08`, `1e+16`),
/// the same text the ground-station tooling has always produced.
pub(crate) fn format_real(value: f64) -> String {
    let text = format!("{value:?}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

fn format_timestamp(micros: i128) -> Result<String> {
    let stamp = i64::try_from(micros)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_micros)
        .ok_or(FieldError::TimestampOutOfRange { micros })?;
    Ok(stamp.format("%Y-%m-%dT%H:%M:%S%.6f UTC").to_string())
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Decimal => write!(f, "value"),
            Transform::Timestamp => write!(f, "UTC time (us since epoch)"),
            Transform::Linear {
                numerator,
                denominator,
                offset,
            } => {
                write!(f, "value * {numerator}/{denominator}")?;
                if *offset < 0.0 {
                    write!(f, " - {}", -offset)?;
                } else if *offset > 0.0 {
                    write!(f, " + {offset}")?;
                }
                Ok(())
            }
            Transform::DoubledRounded => write!(f, "round(2 * value)"),
        }
    }
}

impl fmt::Display for DecodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeKind::Integer {
                width,
                signed,
                transform,
            } => {
                let sign = if *signed { 'i' } else { 'u' };
                write!(f, "{sign}{} -> {transform}", width * 8)
            }
            DecodeKind::Characters => write!(f, "bytes -> characters"),
            DecodeKind::VersionDigits => write!(f, "bytes -> decimal digits"),
            DecodeKind::HexBytes => write!(f, "bytes -> hex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(tag: u8) -> &'static FieldRule {
        STANDARD_RULES
            .iter()
            .find(|rule| rule.tag == tag)
            .expect("tag should have a rule")
    }

    fn decode_f64(tag: u8, value: &[u8]) -> f64 {
        rule_for(tag)
            .decode(value)
            .unwrap()
            .parse()
            .expect("linear fields render as numbers")
    }

    #[test]
    fn table_is_sorted_and_unique() {
        assert_eq!(STANDARD_RULES.len(), 28);
        assert!(STANDARD_RULES.windows(2).all(|w| w[0].tag < w[1].tag));
    }

    #[test]
    fn checksum_is_decimal() {
        assert_eq!(rule_for(1).decode(&[0x00, 0x2A]).unwrap(), "42");
        assert_eq!(rule_for(1).decode(&[0xFF, 0xFF]).unwrap(), "65535");
    }

    #[test]
    fn timestamp_renders_utc_microseconds() {
        let micros: u64 = 1_231_798_102_000_000 + 123_456;
        assert_eq!(
            rule_for(2).decode(&micros.to_be_bytes()).unwrap(),
            "2009-01-12T22:08:22.123456 UTC"
        );
        assert_eq!(
            rule_for(2).decode(&0u64.to_be_bytes()).unwrap(),
            "1970-01-01T00:00:00.000000 UTC"
        );
    }

    #[test]
    fn timestamp_out_of_range() {
        let err = rule_for(2).decode(&u64::MAX.to_be_bytes()).unwrap_err();
        assert!(matches!(err, FieldError::TimestampOutOfRange { .. }));
    }

    #[test]
    fn heading_covers_zero_to_360() {
        assert_eq!(rule_for(5).decode(&[0xFF, 0xFF]).unwrap(), "360.0");
        assert_eq!(rule_for(5).decode(&[0x00, 0x00]).unwrap(), "0.0");
        for raw in 0..=u16::MAX {
            let deg = decode_f64(5, &raw.to_be_bytes());
            assert!((0.0..=360.0).contains(&deg), "{raw} -> {deg}");
        }
    }

    #[test]
    fn heading_matches_reference_value() {
        assert_eq!(rule_for(5).decode(&[0x71, 0xC2]).unwrap(), "159.97436484321355");
    }

    #[test]
    fn pitch_is_bounded_and_monotonic() {
        let mut previous = f64::NEG_INFINITY;
        for raw in i16::MIN..=i16::MAX {
            let deg = decode_f64(6, &raw.to_be_bytes());
            assert!(deg > previous);
            assert!((-20.001..=20.001).contains(&deg));
            previous = deg;
        }
    }

    #[test]
    fn roll_is_signed() {
        assert!(decode_f64(7, &(-1i16).to_be_bytes()) < 0.0);
        assert_eq!(
            decode_f64(7, &i16::MAX.to_be_bytes()),
            100.0 / 65_534.0 * f64::from(i16::MAX)
        );
    }

    #[test]
    fn latitude_divisor_is_asymmetric() {
        let max = decode_f64(13, &i32::MAX.to_be_bytes());
        let min = decode_f64(13, &i32::MIN.to_be_bytes());

        assert_eq!(max, 180.0 / 4_294_967_294.0 * f64::from(i32::MAX));
        assert_eq!(min, 180.0 / 4_294_967_294.0 * f64::from(i32::MIN));
        assert_eq!(max, 90.0);
        assert!(min < -90.0 && min > -90.0001);
    }

    #[test]
    fn frame_center_latitude_and_longitude() {
        assert_eq!(
            rule_for(24).decode(&[0xF1, 0x01, 0xA2, 0x29]).unwrap(),
            "-21.084777266292264"
        );
        assert_eq!(rule_for(23).decode(&0i32.to_be_bytes()).unwrap(), "0.0");
    }

    #[test]
    fn altitude_has_offset() {
        assert_eq!(rule_for(15).decode(&[0, 0]).unwrap(), "-900.0");
        assert_eq!(rule_for(25).decode(&[0xFF, 0xFF]).unwrap(), "19000.0");
    }

    #[test]
    fn target_elevation_is_signed() {
        // Same formula as altitude, but the raw value is two's complement.
        assert_eq!(
            decode_f64(42, &(-1i16).to_be_bytes()),
            19_900.0 / 65_535.0 * -1.0 - 900.0
        );
    }

    #[test]
    fn field_of_view() {
        assert_eq!(rule_for(16).decode(&[0xFF, 0xFF]).unwrap(), "180.0");
        assert_eq!(rule_for(17).decode(&[0, 0]).unwrap(), "0.0");
    }

    #[test]
    fn relative_angles() {
        assert!(decode_f64(18, &(-1i32).to_be_bytes()) < 0.0);
        assert!(decode_f64(19, &(-1i32).to_be_bytes()) < 0.0);
        // Relative roll is unsigned.
        assert!(decode_f64(20, &u32::MAX.to_be_bytes()) > 360.0);
    }

    #[test]
    fn slant_range_and_target_width() {
        assert_eq!(
            rule_for(21).decode(&u32::MAX.to_be_bytes()).unwrap(),
            "5000000.0"
        );
        assert_eq!(rule_for(22).decode(&[0xFF, 0xFF]).unwrap(), "10000.0");
    }

    #[test]
    fn gate_sizes_are_doubled_integers() {
        assert_eq!(rule_for(43).decode(&[0x00, 0x03]).unwrap(), "6");
        assert_eq!(rule_for(44).decode(&[0xFF, 0xFF]).unwrap(), "131070");
    }

    #[test]
    fn character_fields() {
        assert_eq!(rule_for(10).decode(b"MQ1-B").unwrap(), "MQ1-B");
        assert_eq!(rule_for(11).decode(b"EO").unwrap(), "EO");
        assert_eq!(rule_for(12).decode(b"WGS-84").unwrap(), "WGS-84");
        assert_eq!(rule_for(10).decode(&[]).unwrap(), "");
    }

    #[test]
    fn version_digits_concatenate() {
        assert_eq!(rule_for(65).decode(&[0x0B]).unwrap(), "11");
        assert_eq!(rule_for(65).decode(&[1, 2]).unwrap(), "12");
    }

    #[test]
    fn core_identifier_is_hex() {
        assert_eq!(
            rule_for(94).decode(&[0x01, 0xAB, 0x00]).unwrap(),
            "0x1 0xab 0x0"
        );
    }

    #[test]
    fn short_values_decode() {
        assert_eq!(rule_for(1).decode(&[0x2A]).unwrap(), "42");
        assert!(decode_f64(6, &[0xFF]) < 0.0);
        assert_eq!(decode_f64(6, &[0xFF]), 40.0 / 65_534.0 * -1.0);
        assert_eq!(rule_for(43).decode(&[0x05]).unwrap(), "10");
        assert_eq!(
            rule_for(13).decode(&[0x7F]).unwrap(),
            "5.322508516405946e-06"
        );
    }

    #[test]
    fn long_values_decode() {
        assert_eq!(rule_for(1).decode(&[0x00, 0x00, 0x01, 0x00]).unwrap(), "256");
        assert_eq!(
            decode_f64(7, &(-2i64).to_be_bytes()),
            100.0 / 65_534.0 * -2.0
        );
        assert_eq!(
            rule_for(44).decode(&u64::MAX.to_be_bytes()).unwrap(),
            (2 * u128::from(u64::MAX)).to_string()
        );
    }

    #[test]
    fn empty_integer_is_zero() {
        assert_eq!(rule_for(1).decode(&[]).unwrap(), "0");
        assert_eq!(rule_for(6).decode(&[]).unwrap(), "0.0");
        assert_eq!(rule_for(15).decode(&[]).unwrap(), "-900.0");
    }

    #[test]
    fn value_too_long() {
        let err = rule_for(13).decode(&[0x01; 9]).unwrap_err();
        assert_eq!(
            err,
            FieldError::ValueTooLong {
                tag: 13,
                name: "sensor_latitude",
                max: 8,
                actual: 9
            }
        );
    }

    #[test]
    fn small_values_use_two_digit_exponents() {
        assert_eq!(
            rule_for(13).decode(&1i32.to_be_bytes()).unwrap(),
            "4.190951587721217e-08"
        );
        assert_eq!(format_real(1e16), "1e+16");
        assert_eq!(format_real(-2.5e-123), "-2.5e-123");
        assert_eq!(format_real(0.0001), "0.0001");
    }

    #[test]
    fn display_describes_rule() {
        assert_eq!(
            rule_for(15).kind.to_string(),
            "u16 -> value * 19900/65535 - 900"
        );
        assert_eq!(rule_for(94).kind.to_string(), "bytes -> hex");
    }
}
