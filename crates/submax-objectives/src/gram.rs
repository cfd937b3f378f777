// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use submax_core::{Kernel, SymmetricMatrix};

/// Builds `I + K(S, S) / sigma^2` for the ordered solution `S`.
pub(crate) fn regularized_gram(
    kernel: &dyn Kernel,
    sigma: f64,
    solution: &[Vec<f64>],
) -> SymmetricMatrix {
    let n = solution.len();
    let sigma_sq = sigma * sigma;
    let mut mat = SymmetricMatrix::new(n);

    for i in 0..n {
        for j in i..n {
            let kval = kernel.eval(&solution[i], &solution[j]) / sigma_sq;
            if i == j {
                mat.set(i, j, 1.0 + kval);
            } else {
                mat.set(i, j, kval);
                mat.set(j, i, kval);
            }
        }
    }

    mat
}

/// Log-determinant of the regularized Gram matrix.
///
/// `I + K/sigma^2` is positive definite for any positive semi-definite
/// kernel; a factorization failure can only come from a non-PSD user kernel
/// or catastrophic conditioning, and maps to negative infinity so that any
/// argmax over candidates skips the offender.
pub(crate) fn reference_log_det(kernel: &dyn Kernel, sigma: f64, solution: &[Vec<f64>]) -> f64 {
    let gram = regularized_gram(kernel, sigma, solution);
    match gram.log_det(solution.len()) {
        Ok(value) => value,
        Err(_) => f64::NEG_INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::regularized_gram;
    use submax_core::ClosureKernel;

    #[test]
    fn gram_adds_identity_and_divides_by_sigma_squared() {
        let kernel = ClosureKernel::new(|_: &[f64], _: &[f64]| 1.0);
        let solution = vec![vec![0.0], vec![1.0]];
        let gram = regularized_gram(&kernel, 2.0, &solution);
        assert_eq!(gram.get(0, 0), 1.25);
        assert_eq!(gram.get(1, 1), 1.25);
        assert_eq!(gram.get(0, 1), 0.25);
        assert_eq!(gram.get(1, 0), 0.25);
    }
}
