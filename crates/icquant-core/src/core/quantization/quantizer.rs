use super::QuantizationError;
use super::spec::{OutOfRangePolicy, QuantizationSpec};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Stateless affine quantize/dequantize primitives.
///
/// `discretize` normalizes a value into `[0, 1]`, scales it onto the code range of the
/// spec and rounds to the nearest code, ties away from zero. `decode` is the exact
/// algebraic inverse of the scaling step. Every operation is elementwise and
/// order-independent, so the slice variants fan out freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitQuantizer;

impl BitQuantizer {
    pub fn discretize(value: f64, spec: &QuantizationSpec) -> Result<i64, QuantizationError> {
        let value = Self::admit(value, spec)?;

        let t = (value - spec.min_val()) / spec.range_width();
        let scaled = spec.min_code() as f64 + t * spec.code_span() as f64;

        // f64::round rounds half away from zero.
        let code = scaled.round() as i64;
        Ok(code.clamp(spec.min_code(), spec.max_code()))
    }

    pub fn decode(code: i64, spec: &QuantizationSpec) -> Result<f64, QuantizationError> {
        if !spec.contains_code(code) {
            return Err(QuantizationError::CodeOutOfRange {
                code,
                min_code: spec.min_code(),
                max_code: spec.max_code(),
            });
        }
        // `min_val + width` can land one ulp past `max_val`.
        if code == spec.max_code() {
            return Ok(spec.max_val());
        }
        let t = (code - spec.min_code()) as f64 / spec.code_span() as f64;
        Ok((spec.min_val() + t * spec.range_width()).min(spec.max_val()))
    }

    pub fn discretize_all(
        values: &[f64],
        spec: &QuantizationSpec,
    ) -> Result<Vec<i64>, QuantizationError> {
        #[cfg(not(feature = "parallel"))]
        let iterator = values.iter();

        #[cfg(feature = "parallel")]
        let iterator = values.par_iter();

        iterator.map(|&v| Self::discretize(v, spec)).collect()
    }

    pub fn decode_all(
        codes: &[i64],
        spec: &QuantizationSpec,
    ) -> Result<Vec<f64>, QuantizationError> {
        #[cfg(not(feature = "parallel"))]
        let iterator = codes.iter();

        #[cfg(feature = "parallel")]
        let iterator = codes.par_iter();

        iterator.map(|&c| Self::decode(c, spec)).collect()
    }

    /// Applies the spec's out-of-range policy. Non-finite values never pass.
    fn admit(value: f64, spec: &QuantizationSpec) -> Result<f64, QuantizationError> {
        if spec.contains(value) {
            return Ok(value);
        }
        let out_of_range = QuantizationError::OutOfRange {
            value,
            min_val: spec.min_val(),
            max_val: spec.max_val(),
        };
        if !value.is_finite() {
            return Err(out_of_range);
        }
        match spec.out_of_range() {
            OutOfRangePolicy::Reject => Err(out_of_range),
            OutOfRangePolicy::Clamp => Ok(value.clamp(spec.min_val(), spec.max_val())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn spec(bits: u32, min_val: f64, max_val: f64, signed: bool) -> QuantizationSpec {
        QuantizationSpec::new(bits, min_val, max_val, signed).unwrap()
    }

    #[test]
    fn nine_bit_signed_value_decodes_within_half_a_step() {
        let spec = spec(9, 0.0, 2048.0, true);
        let code = BitQuantizer::discretize(1059.459, &spec).unwrap();
        let decoded = BitQuantizer::decode(code, &spec).unwrap();

        assert_eq!(code, 8);
        assert!(f64_approx_equal(decoded, 1058.0665362035224));
        assert!((decoded - 1059.459).abs() <= spec.max_error());
    }

    #[test]
    fn nine_bit_unsigned_value_decodes_to_same_level_as_signed() {
        let spec = spec(9, 0.0, 2048.0, false);
        let code = BitQuantizer::discretize(1059.459, &spec).unwrap();

        assert_eq!(code, 264);
        assert!(f64_approx_equal(
            BitQuantizer::decode(code, &spec).unwrap(),
            1058.0665362035224
        ));
    }

    #[test]
    fn one_bit_collapses_to_upper_endpoint() {
        let signed = spec(1, 0.0, 2048.0, true);
        let code = BitQuantizer::discretize(1059.459, &signed).unwrap();
        assert_eq!(code, 0);
        assert_eq!(BitQuantizer::decode(code, &signed).unwrap(), 2048.0);

        let unsigned = spec(1, 0.0, 2048.0, false);
        let code = BitQuantizer::discretize(1059.459, &unsigned).unwrap();
        assert_eq!(code, 1);
        assert_eq!(BitQuantizer::decode(code, &unsigned).unwrap(), 2048.0);
    }

    #[test]
    fn one_bit_collapses_to_lower_endpoint_below_midpoint() {
        let spec = spec(1, 0.0, 2048.0, true);
        let code = BitQuantizer::discretize(500.0, &spec).unwrap();
        assert_eq!(code, -1);
        assert_eq!(BitQuantizer::decode(code, &spec).unwrap(), 0.0);
    }

    #[test]
    fn sixteen_bit_value_is_much_closer() {
        let spec = spec(16, 0.0, 2048.0, true);
        let code = BitQuantizer::discretize(1059.459, &spec).unwrap();

        assert_eq!(code, 1134);
        assert!(f64_approx_equal(
            BitQuantizer::decode(code, &spec).unwrap(),
            1059.4536659800108
        ));
    }

    #[test]
    fn range_endpoints_map_to_extreme_codes() {
        for signed in [false, true] {
            let spec = spec(12, -0.35, 0.35, signed);
            assert_eq!(BitQuantizer::discretize(-0.35, &spec).unwrap(), spec.min_code());
            assert_eq!(BitQuantizer::discretize(0.35, &spec).unwrap(), spec.max_code());
            assert_eq!(BitQuantizer::decode(spec.min_code(), &spec).unwrap(), -0.35);
            assert_eq!(BitQuantizer::decode(spec.max_code(), &spec).unwrap(), 0.35);
        }
    }

    #[test]
    fn top_code_decodes_exactly_to_max_val() {
        // -0.1 + (0.2 - -0.1) is 0.20000000000000004 in f64.
        let spec = spec(6, -0.1, 0.2, false);
        let code = BitQuantizer::discretize(0.2, &spec).unwrap();
        let decoded = BitQuantizer::decode(code, &spec).unwrap();

        assert_eq!(code, 63);
        assert_eq!(decoded, 0.2);
        assert!(spec.contains(decoded));
        assert_eq!(BitQuantizer::discretize(decoded, &spec), Ok(code));
    }

    #[test]
    fn every_decoded_code_stays_in_range_and_re_encodes() {
        let spec = spec(6, -0.1, 0.2, false);
        for code in spec.min_code()..=spec.max_code() {
            let decoded = BitQuantizer::decode(code, &spec).unwrap();
            assert!(spec.contains(decoded), "code {code} decoded to {decoded}");
            assert_eq!(BitQuantizer::discretize(decoded, &spec), Ok(code));
        }
    }

    #[test]
    fn ties_round_away_from_zero() {
        // Two codes over [0, 1]: the midpoint scales to exactly -0.5 (signed) and 0.5 (unsigned).
        let signed = spec(1, 0.0, 1.0, true);
        assert_eq!(BitQuantizer::discretize(0.5, &signed).unwrap(), -1);

        let unsigned = spec(1, 0.0, 1.0, false);
        assert_eq!(BitQuantizer::discretize(0.5, &unsigned).unwrap(), 1);
    }

    #[test]
    fn out_of_range_value_is_rejected_by_default() {
        let spec = spec(6, -0.2, 0.2, true);
        let result = BitQuantizer::discretize(-1.329, &spec);
        assert_eq!(
            result,
            Err(QuantizationError::OutOfRange {
                value: -1.329,
                min_val: -0.2,
                max_val: 0.2,
            })
        );
    }

    #[test]
    fn out_of_range_value_saturates_under_clamp_policy() {
        let spec = spec(6, -0.2, 0.2, true).with_out_of_range(OutOfRangePolicy::Clamp);
        assert_eq!(BitQuantizer::discretize(-1.329, &spec).unwrap(), spec.min_code());
        assert_eq!(BitQuantizer::discretize(7.0, &spec).unwrap(), spec.max_code());
    }

    #[test]
    fn non_finite_values_are_rejected_even_when_clamping() {
        let spec = spec(6, -0.2, 0.2, true).with_out_of_range(OutOfRangePolicy::Clamp);
        assert!(BitQuantizer::discretize(f64::NAN, &spec).is_err());
        assert!(BitQuantizer::discretize(f64::INFINITY, &spec).is_err());
        assert!(BitQuantizer::discretize(f64::NEG_INFINITY, &spec).is_err());
    }

    #[test]
    fn decode_rejects_codes_outside_the_spec() {
        let spec = spec(6, -0.2, 0.2, true);
        assert_eq!(
            BitQuantizer::decode(32, &spec),
            Err(QuantizationError::CodeOutOfRange {
                code: 32,
                min_code: -32,
                max_code: 31,
            })
        );
        assert!(BitQuantizer::decode(-33, &spec).is_err());
    }

    #[test]
    fn slice_variants_preserve_order() {
        let spec = spec(8, 0.0, 255.0, false);
        let values = [3.0, 0.0, 255.0, 128.2, 17.6];

        let codes = BitQuantizer::discretize_all(&values, &spec).unwrap();
        assert_eq!(codes, vec![3, 0, 255, 128, 18]);

        let decoded = BitQuantizer::decode_all(&codes, &spec).unwrap();
        assert_eq!(decoded, vec![3.0, 0.0, 255.0, 128.0, 18.0]);
    }

    #[test]
    fn slice_variant_reports_first_failure() {
        let spec = spec(8, 0.0, 1.0, false);
        let result = BitQuantizer::discretize_all(&[0.5, 2.0], &spec);
        assert!(matches!(result, Err(QuantizationError::OutOfRange { .. })));
    }

    #[test]
    fn empty_slices_round_trip_to_empty() {
        let spec = spec(8, 0.0, 1.0, false);
        assert!(BitQuantizer::discretize_all(&[], &spec).unwrap().is_empty());
        assert!(BitQuantizer::decode_all(&[], &spec).unwrap().is_empty());
    }
}
