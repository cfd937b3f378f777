// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::SubmaxError;
use std::fmt;

/// Dense symmetric matrix with a fixed capacity and an explicit active extent.
///
/// Storage is row-major over the full `n x n` capacity so the buffer is
/// allocated once and never grows while an incremental factorization extends
/// its active leading block. After `cholesky`, only the lower triangle and
/// the diagonal of the result are specified.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SymmetricMatrix {
    /// Creates a zero-initialized `n x n` matrix.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Copies the leading `n_sub x n_sub` block into a new matrix.
    pub fn leading(&self, n_sub: usize) -> Self {
        assert!(
            n_sub <= self.n,
            "leading block extent {n_sub} exceeds capacity {}",
            self.n
        );
        let mut out = Self::new(n_sub);
        for i in 0..n_sub {
            for j in 0..n_sub {
                out.set(i, j, self.get(i, j));
            }
        }
        out
    }

    /// Row/column capacity.
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.n && j < self.n,
            "matrix index ({i}, {j}) out of bounds for size {}",
            self.n
        );
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(
            i < self.n && j < self.n,
            "matrix index ({i}, {j}) out of bounds for size {}",
            self.n
        );
        self.data[i * self.n + j] = value;
    }

    /// Writes `x[i]` into `M[i, col]` for `i < x.len()`.
    ///
    /// Callers are responsible for restoring symmetry, either by pairing with
    /// [`SymmetricMatrix::replace_row`] or by a subsequent symmetric write.
    pub fn replace_column(&mut self, col: usize, x: &[f64]) {
        assert!(
            x.len() <= self.n,
            "column data length {} exceeds capacity {}",
            x.len(),
            self.n
        );
        for (i, value) in x.iter().enumerate() {
            self.set(i, col, *value);
        }
    }

    /// Writes `x[i]` into `M[row, i]` for `i < x.len()`.
    pub fn replace_row(&mut self, row: usize, x: &[f64]) {
        assert!(
            x.len() <= self.n,
            "row data length {} exceeds capacity {}",
            x.len(),
            self.n
        );
        for (i, value) in x.iter().enumerate() {
            self.set(row, i, *value);
        }
    }

    /// Symmetric rank-one style cross update: adds `x[r]` on the diagonal and
    /// `x[i]` to both `M[i, r]` and `M[r, i]` for `i != r`.
    pub fn rank_one_update(&mut self, r: usize, x: &[f64]) {
        assert!(
            x.len() <= self.n,
            "update data length {} exceeds capacity {}",
            x.len(),
            self.n
        );
        for (i, value) in x.iter().enumerate() {
            if i == r {
                let current = self.get(i, i);
                self.set(i, i, current + value);
            } else {
                let left = self.get(i, r);
                self.set(i, r, left + value);
                let right = self.get(r, i);
                self.set(r, i, right + value);
            }
        }
    }

    /// Cholesky factorization `A = L * L^T` of the leading `n_sub` block.
    ///
    /// Returns the lower-triangular factor; the strict upper triangle of the
    /// result is zero. Fails with `NonSpd` when a pivot is non-positive or
    /// non-finite.
    pub fn cholesky(&self, n_sub: usize) -> Result<SymmetricMatrix, SubmaxError> {
        assert!(
            n_sub <= self.n,
            "cholesky extent {n_sub} exceeds capacity {}",
            self.n
        );
        let mut l = SymmetricMatrix::new(n_sub);

        for j in 0..n_sub {
            let mut sum = 0.0;
            for k in 0..j {
                let v = l.get(j, k);
                sum += v * v;
            }

            let pivot = self.get(j, j) - sum;
            if !pivot.is_finite() || pivot <= 0.0 {
                return Err(SubmaxError::non_spd(format!(
                    "pivot {pivot} at row {j} of {n_sub}"
                )));
            }
            l.set(j, j, pivot.sqrt());

            for i in (j + 1)..n_sub {
                let mut cross = 0.0;
                for k in 0..j {
                    cross += l.get(i, k) * l.get(j, k);
                }
                l.set(i, j, (self.get(i, j) - cross) / l.get(j, j));
            }
        }

        Ok(l)
    }

    /// `log det` of the leading block via a fresh factorization.
    pub fn log_det(&self, n_sub: usize) -> Result<f64, SubmaxError> {
        let l = self.cholesky(n_sub)?;
        Ok(log_det_from_cholesky(&l, n_sub))
    }
}

/// `log det(L * L^T) = 2 * sum ln L[i, i]` over the leading `n_sub` diagonal.
pub fn log_det_from_cholesky(l: &SymmetricMatrix, n_sub: usize) -> f64 {
    assert!(
        n_sub <= l.size(),
        "log_det extent {n_sub} exceeds factor size {}",
        l.size()
    );
    let mut det = 0.0;
    for i in 0..n_sub {
        det += l.get(i, i).ln();
    }
    2.0 * det
}

impl fmt::Display for SymmetricMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.n {
            write!(f, "[")?;
            for j in 0..self.n {
                if j + 1 < self.n {
                    write!(f, "{},", self.get(i, j))?;
                } else {
                    write!(f, "{}", self.get(i, j))?;
                }
            }
            if i + 1 < self.n {
                writeln!(f, "],")?;
            } else {
                write!(f, "]")?;
            }
        }
        write!(f, "]")
    }
}
