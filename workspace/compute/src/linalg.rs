//! Dense linear solves for the model's normal equations.

use crate::error::{ComputeError, Result};

const PIVOT_EPSILON: f64 = 1e-12;

/// Solves `a * x = b` by Gaussian elimination with partial pivoting.
///
/// `a` must be square with the same dimension as `b`.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(ComputeError::Fit(format!(
            "System dimensions do not match: {} equations for {} unknowns",
            a.len(),
            n
        )));
    }

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > a[max_row][i].abs() {
                max_row = k;
            }
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        if a[i][i].abs() < PIVOT_EPSILON {
            return Err(ComputeError::Fit(format!(
                "Singular system at column {}",
                i
            )));
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            if factor == 0.0 {
                continue;
            }
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
            b[k] -= factor * b[i];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_system() {
        // 2x + y = 5, x + 3y = 10
        let x = solve(vec![vec![2.0, 1.0], vec![1.0, 3.0]], vec![5.0, 10.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn pivots_on_zero_leading_entry() {
        let x = solve(
            vec![
                vec![0.0, 1.0, 1.0],
                vec![1.0, 0.0, 1.0],
                vec![1.0, 1.0, 0.0],
            ],
            vec![5.0, 4.0, 3.0],
        )
        .unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn singular_system_is_an_error() {
        let result = solve(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ComputeError::Fit(_))));
    }

    #[test]
    fn mismatched_dimensions_are_an_error() {
        assert!(solve(vec![vec![1.0, 0.0]], vec![1.0, 2.0]).is_err());
    }
}
