// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use submax_core::SubmaxError;

/// Samples `{(1 + epsilon)^i : i in Z, lower <= (1 + epsilon)^i <= upper}`
/// in ascending order (Badanidiyuru et al., 2014).
///
/// The start index is `i0 = ceil(ln(lower) / ln(1 + epsilon))`; the result
/// is empty when `lower > upper`.
pub fn thresholds(lower: f64, upper: f64, epsilon: f64) -> Result<Vec<f64>, SubmaxError> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(SubmaxError::invalid_input(format!(
            "thresholds epsilon must be a positive real number; got {epsilon}"
        )));
    }
    if !lower.is_finite() || lower <= 0.0 {
        return Err(SubmaxError::invalid_input(format!(
            "thresholds lower bound must be finite and > 0; got {lower}"
        )));
    }
    if !upper.is_finite() {
        return Err(SubmaxError::invalid_input(format!(
            "thresholds upper bound must be finite; got {upper}"
        )));
    }

    let base = 1.0 + epsilon;
    let start = (lower.ln() / base.ln()).ceil();
    if start < f64::from(i32::MIN) || start > f64::from(i32::MAX) {
        return Err(SubmaxError::resource_limit(format!(
            "thresholds start index {start} out of range for lower={lower}, epsilon={epsilon}"
        )));
    }

    let mut ts = vec![];
    let mut index = start as i32;
    let mut value = base.powi(index);
    while value <= upper {
        ts.push(value);
        index += 1;
        value = base.powi(index);
    }
    Ok(ts)
}
