//! Thomas algorithm (tridiagonal Gaussian elimination without pivoting), O(n).
//!
//! Row i of the system reads a[i-1]·v[i-1] + b[i]·v[i] + c[i]·v[i+1] = d[i], with
//! a the sub-diagonal (n-1), b the diagonal (n), c the super-diagonal (n-1).
use crate::numerical::BVP_error::{BvpError, BvpResult};
use nalgebra::DVector;

/// Solves the tridiagonal system with the Thomas algorithm.
///
/// The forward sweep produces the sweep coefficients p, q such that v[i] = p[i]·v[i+1] + q[i]:
/// p[0] = -c[0]/b[0], q[0] = d[0]/b[0] and for i = 1..n-2
/// p[i] = -c[i]/(b[i] + a[i-1]·p[i-1]), q[i] = (d[i] - a[i-1]·q[i-1])/(b[i] + a[i-1]·p[i-1]).
/// v[n-1] follows from the last row, then the back substitution runs downwards.
/// No pivoting: a zero pivot is reported as [`BvpError::ZeroPivot`].
pub fn thomas_solve(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> BvpResult<DVector<f64>> {
    let n = b.len();
    check_shape(a, b, c, d)?;

    if n == 1 {
        let pivot = check_pivot(b[0], 0)?;
        return Ok(DVector::from_element(1, d[0] / pivot));
    }

    let mut p = vec![0.0; n - 1];
    let mut q = vec![0.0; n - 1];

    let pivot = check_pivot(b[0], 0)?;
    p[0] = -c[0] / pivot;
    q[0] = d[0] / pivot;

    for i in 1..n - 1 {
        let pivot = check_pivot(b[i] + a[i - 1] * p[i - 1], i)?;
        p[i] = -c[i] / pivot;
        q[i] = (d[i] - a[i - 1] * q[i - 1]) / pivot;
    }

    let mut v = DVector::zeros(n);
    let pivot = check_pivot(b[n - 1] + a[n - 2] * p[n - 2], n - 1)?;
    v[n - 1] = (d[n - 1] - a[n - 2] * q[n - 2]) / pivot;
    for i in (0..n - 1).rev() {
        v[i] = p[i] * v[i + 1] + q[i];
    }
    Ok(v)
}

fn check_shape(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> BvpResult<()> {
    let n = b.len();
    if n == 0 {
        return Err(BvpError::InvalidInput(
            "tridiagonal system must have at least one row".to_string(),
        ));
    }
    if a.len() != n - 1 || c.len() != n - 1 || d.len() != n {
        return Err(BvpError::InvalidInput(format!(
            "tridiagonal shapes do not match: sub {}, diag {}, super {}, rhs {}",
            a.len(),
            n,
            c.len(),
            d.len()
        )));
    }
    Ok(())
}

fn check_pivot(pivot: f64, row: usize) -> BvpResult<f64> {
    if pivot == 0.0 || !pivot.is_finite() {
        Err(BvpError::ZeroPivot { row })
    } else {
        Ok(pivot)
    }
}

/// Owned tridiagonal system, assembled row by row and consumed by one solve
#[derive(Debug, Clone)]
pub struct TridiagonalSystem {
    pub sub: Vec<f64>,
    pub diag: Vec<f64>,
    pub sup: Vec<f64>,
    pub rhs: Vec<f64>,
}

impl TridiagonalSystem {
    /// n rows, all coefficients zero
    pub fn zeros(n: usize) -> Self {
        Self {
            sub: vec![0.0; n.saturating_sub(1)],
            diag: vec![0.0; n],
            sup: vec![0.0; n.saturating_sub(1)],
            rhs: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.diag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// row i: lower·v[i-1] + center·v[i] + upper·v[i+1] = rhs
    pub fn set_row(&mut self, i: usize, lower: f64, center: f64, upper: f64, rhs: f64) {
        if i > 0 {
            self.sub[i - 1] = lower;
        }
        self.diag[i] = center;
        if i + 1 < self.diag.len() {
            self.sup[i] = upper;
        }
        self.rhs[i] = rhs;
    }

    /// row i reduced to v[i] = value
    pub fn pin_row(&mut self, i: usize, value: f64) {
        self.set_row(i, 0.0, 1.0, 0.0, value);
    }

    pub fn solve(&self) -> BvpResult<DVector<f64>> {
        thomas_solve(&self.sub, &self.diag, &self.sup, &self.rhs)
    }

    /// A·v
    pub fn multiply(&self, v: &DVector<f64>) -> DVector<f64> {
        let n = self.diag.len();
        DVector::from_fn(n, |i, _| {
            let mut sum = self.diag[i] * v[i];
            if i > 0 {
                sum += self.sub[i - 1] * v[i - 1];
            }
            if i + 1 < n {
                sum += self.sup[i] * v[i + 1];
            }
            sum
        })
    }
}
