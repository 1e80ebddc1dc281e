use super::QuantizationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest supported code. Every code of a 32-bit spec fits an `i64` and converts to `f64` exactly.
pub const MAX_BITS: u32 = 32;

/// What to do with a value that falls outside `[min_val, max_val]`.
///
/// Non-finite values are rejected under every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Fail with [`QuantizationError::OutOfRange`].
    #[default]
    Reject,
    /// Saturate to the nearest endpoint code.
    Clamp,
}

impl fmt::Display for OutOfRangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfRangePolicy::Reject => write!(f, "reject"),
            OutOfRangePolicy::Clamp => write!(f, "clamp"),
        }
    }
}

/// An affine map between the continuous range `[min_val, max_val]` and an integer code range.
///
/// Unsigned codes span `[0, 2^bits - 1]`, signed codes span `[-2^(bits-1), 2^(bits-1) - 1]`.
/// Both layouts have the same number of levels, so signedness changes the representation
/// of a code but never its precision.
///
/// A spec can only be obtained through [`QuantizationSpec::builder`] (or the
/// [`QuantizationSpec::new`] shorthand), which rejects zero or oversized bit widths and
/// empty, inverted or non-finite ranges. Once built it is immutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationSpec {
    bits: u32,
    min_val: f64,
    max_val: f64,
    signed: bool,
    out_of_range: OutOfRangePolicy,
}

impl QuantizationSpec {
    /// Builds a spec with the default [`OutOfRangePolicy::Reject`] policy.
    pub fn new(
        bits: u32,
        min_val: f64,
        max_val: f64,
        signed: bool,
    ) -> Result<Self, QuantizationError> {
        Self::builder()
            .bits(bits)
            .range(min_val, max_val)
            .signed(signed)
            .build()
    }

    /// Compile-time presets only. Callers must pass a valid bit width and range.
    pub(crate) const fn preset(bits: u32, min_val: f64, max_val: f64, signed: bool) -> Self {
        Self {
            bits,
            min_val,
            max_val,
            signed,
            out_of_range: OutOfRangePolicy::Reject,
        }
    }

    pub fn builder() -> QuantizationSpecBuilder {
        QuantizationSpecBuilder::new()
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn min_val(&self) -> f64 {
        self.min_val
    }

    pub fn max_val(&self) -> f64 {
        self.max_val
    }

    pub fn signed(&self) -> bool {
        self.signed
    }

    pub fn out_of_range(&self) -> OutOfRangePolicy {
        self.out_of_range
    }

    /// Returns a copy of this spec with a different out-of-range policy.
    pub fn with_out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    #[inline]
    pub fn min_code(&self) -> i64 {
        if self.signed {
            -(1i64 << (self.bits - 1))
        } else {
            0
        }
    }

    #[inline]
    pub fn max_code(&self) -> i64 {
        if self.signed {
            (1i64 << (self.bits - 1)) - 1
        } else {
            (1i64 << self.bits) - 1
        }
    }

    /// Number of steps between the lowest and the highest code, `2^bits - 1`.
    #[inline]
    pub fn code_span(&self) -> i64 {
        self.max_code() - self.min_code()
    }

    #[inline]
    pub fn range_width(&self) -> f64 {
        self.max_val - self.min_val
    }

    /// Distance between two adjacent decoded values.
    pub fn step(&self) -> f64 {
        self.range_width() / self.code_span() as f64
    }

    /// Worst-case round-trip error for an in-range value: half a step.
    pub fn max_error(&self) -> f64 {
        self.range_width() / (2.0 * self.code_span() as f64)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_val && value <= self.max_val
    }

    pub fn contains_code(&self, code: i64) -> bool {
        code >= self.min_code() && code <= self.max_code()
    }
}

impl fmt::Display for QuantizationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-bit over [{}, {}] ({})",
            if self.signed { "signed" } else { "unsigned" },
            self.bits,
            self.min_val,
            self.max_val,
            self.out_of_range
        )
    }
}

#[derive(Debug, Default)]
pub struct QuantizationSpecBuilder {
    bits: Option<u32>,
    range: Option<(f64, f64)>,
    signed: bool,
    out_of_range: OutOfRangePolicy,
}

impl QuantizationSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits(mut self, bits: u32) -> Self {
        self.bits = Some(bits);
        self
    }
    pub fn range(mut self, min_val: f64, max_val: f64) -> Self {
        self.range = Some((min_val, max_val));
        self
    }
    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }
    pub fn out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn build(self) -> Result<QuantizationSpec, QuantizationError> {
        let bits = self.bits.ok_or_else(|| invalid("missing required parameter: bits"))?;
        let (min_val, max_val) = self
            .range
            .ok_or_else(|| invalid("missing required parameter: range"))?;

        if !(1..=MAX_BITS).contains(&bits) {
            return Err(invalid(format!(
                "bits must be within 1..={MAX_BITS}, got {bits}"
            )));
        }
        if !min_val.is_finite() || !max_val.is_finite() {
            return Err(invalid(format!(
                "range bounds must be finite, got [{min_val}, {max_val}]"
            )));
        }
        if max_val <= min_val {
            return Err(invalid(format!(
                "max_val must be greater than min_val, got [{min_val}, {max_val}]"
            )));
        }
        if !(max_val - min_val).is_finite() {
            return Err(invalid(format!(
                "range width overflows, got [{min_val}, {max_val}]"
            )));
        }

        Ok(QuantizationSpec {
            bits,
            min_val,
            max_val,
            signed: self.signed,
            out_of_range: self.out_of_range,
        })
    }
}

fn invalid(reason: impl Into<String>) -> QuantizationError {
    QuantizationError::InvalidSpec {
        reason: reason.into(),
    }
}
