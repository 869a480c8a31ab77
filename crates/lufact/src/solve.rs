//! Triangular solves on the factorization.
//!
//! Given `PA = LU`, `Ax = b` is solved as `Ly = Pb` then `Uz = y` with the
//! column permutation unwound at the end; `A^T x = b` runs the transposed
//! pair in the opposite order. Nothing clever is done for sparse
//! right-hand sides; every stored nonzero of `L` and `U` is visited. The
//! solves double as consistency checks on the factor structure: a corrupt
//! bundle (bad permutation, misplaced or zero diagonal, out-of-place row
//! index) is reported rather than silently producing garbage.

use crate::error::LuError;
use crate::factor::LuFactors;

/// Which system to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trans {
    /// Solve `Ax = b`.
    NoTrans,
    /// Solve `A^T x = b`.
    Trans,
}

/// Solve `Ax = b` or `A^T x = b` for a single right-hand side, overwriting
/// `b` with `x`.
pub fn solve(lu: &LuFactors, trans: Trans, b: &mut [f64]) -> Result<(), LuError> {
    let n = lu.ncol;
    if n == 0 || lu.nrow != lu.ncol {
        return Err(LuError::InvalidMatrix {
            reason: format!("solve needs a square system, got {}x{}", lu.nrow, lu.ncol),
        });
    }
    if b.len() != n {
        return Err(LuError::InvalidMatrix {
            reason: format!("rhs length {} != dimension {}", b.len(), n),
        });
    }

    let mut work = vec![0.0f64; n];
    match trans {
        Trans::NoTrans => {
            lower_solve(lu, b, &mut work)?;
            upper_solve(lu, &work, b)?;
        }
        Trans::Trans => {
            upper_trans_solve(lu, b, &mut work)?;
            lower_trans_solve(lu, &work, b)?;
        }
    }
    Ok(())
}

/// Solve `Lx = Pb`. L is unit lower triangular with the unit diagonal not
/// stored, so the loop is a pure column-oriented scatter.
fn lower_solve(lu: &LuFactors, b: &[f64], x: &mut [f64]) -> Result<(), LuError> {
    let n = lu.ncol;

    // The row permutation must be a bijection on [0, n); x is free as
    // scratch here.
    for v in x.iter_mut() {
        *v = 0.0;
    }
    for i in 0..n {
        let p = lu.row_perm[i];
        if p >= n {
            return Err(LuError::SingularSolve {
                reason: format!("row permutation out of range at row {}", i),
            });
        }
        if x[p] != 0.0 {
            return Err(LuError::SingularSolve {
                reason: format!("row permutation repeats image {}", p),
            });
        }
        x[p] = 1.0;
    }

    for i in 0..n {
        x[lu.row_perm[i]] = b[i];
    }

    for j in 0..n {
        let nzst = lu.lcolptr[j];
        let nzend = lu.ucolptr[j + 1];
        if nzst > nzend {
            return Err(LuError::SingularSolve {
                reason: format!("inconsistent column {} of L", j),
            });
        }
        for nzptr in nzst..nzend {
            let i = lu.rowind[nzptr];
            if i <= j || i >= n {
                return Err(LuError::SingularSolve {
                    reason: format!("illegal row {} in column {} of L", i, j),
                });
            }
            x[i] -= lu.values[nzptr] * x[j];
        }
    }
    Ok(())
}

/// Solve `Uy = b`, then unwind the column permutation:
/// `x[cperm[i]] = y[i]`. Relies on the diagonal of each U column sitting
/// in the last slot.
fn upper_solve(lu: &LuFactors, b: &[f64], x: &mut [f64]) -> Result<(), LuError> {
    let n = lu.ncol;
    let mut y = b.to_vec();

    for j in (0..n).rev() {
        let nzst = lu.ucolptr[j];
        if lu.lcolptr[j] <= nzst {
            return Err(LuError::SingularSolve {
                reason: format!("inconsistent column {} of U", j),
            });
        }
        let dptr = lu.lcolptr[j] - 1;
        if lu.rowind[dptr] != j {
            return Err(LuError::SingularSolve {
                reason: format!("diagonal of column {} of U is not in last place", j),
            });
        }
        if lu.values[dptr] == 0.0 {
            return Err(LuError::SingularSolve {
                reason: format!("zero diagonal in column {} of U", j),
            });
        }
        y[j] /= lu.values[dptr];
        for nzptr in nzst..dptr {
            let i = lu.rowind[nzptr];
            if i >= j {
                return Err(LuError::SingularSolve {
                    reason: format!("illegal row {} in column {} of U", i, j),
                });
            }
            y[i] -= lu.values[nzptr] * y[j];
        }
    }

    for i in 0..n {
        x[lu.col_perm[i]] = y[i];
    }
    Ok(())
}

/// Solve `U^T y = Q^T b`. The gather `y[j] = b[cperm[j]]` puts the
/// right-hand side into factor column order; the forward sweep then uses
/// each U column as a row of `U^T`.
fn upper_trans_solve(lu: &LuFactors, b: &[f64], x: &mut [f64]) -> Result<(), LuError> {
    let n = lu.ncol;

    for j in 0..n {
        x[j] = b[lu.col_perm[j]];
    }

    for j in 0..n {
        let nzst = lu.ucolptr[j];
        if lu.lcolptr[j] <= nzst {
            return Err(LuError::SingularSolve {
                reason: format!("inconsistent column {} of U", j),
            });
        }
        let dptr = lu.lcolptr[j] - 1;
        if lu.rowind[dptr] != j {
            return Err(LuError::SingularSolve {
                reason: format!("diagonal of column {} of U is not in last place", j),
            });
        }
        if lu.values[dptr] == 0.0 {
            return Err(LuError::SingularSolve {
                reason: format!("zero diagonal in column {} of U", j),
            });
        }
        for nzptr in nzst..dptr {
            let i = lu.rowind[nzptr];
            if i >= j {
                return Err(LuError::SingularSolve {
                    reason: format!("illegal row {} in column {} of U", i, j),
                });
            }
            x[j] -= lu.values[nzptr] * x[i];
        }
        x[j] /= lu.values[dptr];
    }
    Ok(())
}

/// Solve `L^T w = b`, then scatter back through the row permutation:
/// `x[i] = w[rperm[i]]`.
fn lower_trans_solve(lu: &LuFactors, b: &[f64], x: &mut [f64]) -> Result<(), LuError> {
    let n = lu.ncol;
    let mut y = b.to_vec();

    for j in (0..n).rev() {
        let nzst = lu.lcolptr[j];
        let nzend = lu.ucolptr[j + 1];
        if nzst > nzend {
            return Err(LuError::SingularSolve {
                reason: format!("inconsistent column {} of L", j),
            });
        }
        for nzptr in nzst..nzend {
            let i = lu.rowind[nzptr];
            if i <= j || i >= n {
                return Err(LuError::SingularSolve {
                    reason: format!("illegal row {} in column {} of L", i, j),
                });
            }
            y[j] -= lu.values[nzptr] * y[i];
        }
    }

    for i in 0..n {
        x[i] = y[lu.row_perm[i]];
    }
    Ok(())
}
