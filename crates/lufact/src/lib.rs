//! Sparse LU factorization for unsymmetric matrices.
//!
//! This crate factors a sparse square or rectangular matrix `A`, stored in
//! compressed sparse column (CSC) form, into `PA = LU` with a row
//! permutation `P`, a unit lower triangular `L` and an upper triangular `U`,
//! both held sparsely in a single column-wise arena. The factorization is
//! left-looking: each column is built from the already-factored columns to
//! its left, so the total work is proportional to the arithmetic actually
//! performed rather than to the matrix dimension.
//!
//! # Algorithm
//!
//! Each major step processes one column, in four phases:
//!
//! 1. **Matching** (once, up front): a maximum bipartite matching between
//!    columns and rows picks a candidate diagonal entry for every column.
//! 2. **Symbolic**: a depth-first search through the columns of `L` lays out
//!    the nonzero pattern of the new column, with the `U` part in reverse
//!    topological order.
//! 3. **Numeric**: a scatter/gather update subtracts multiples of earlier
//!    `L` columns from a dense accumulator, allocating fill as it appears.
//! 4. **Pivot**: the accumulator is compacted into the arena, small entries
//!    are optionally dropped, a pivot is chosen (partial or threshold),
//!    swapped into the last slot of the `U` column, and the `L` column is
//!    divided by it.
//!
//! Forward/backward substitution for `Ax = b` and `A^T x = b` is provided on
//! the resulting factors.
//!
//! # Example
//!
//! ```ignore
//! use lufact::{factorize, solve, CscMatrix, FactorConfig, Trans};
//!
//! let a = CscMatrix {
//!     nrow: 2,
//!     ncol: 2,
//!     base: 0,
//!     colptr: &[0, 2, 3],
//!     rowind: &[0, 1, 1],
//!     values: &[2.0, 1.0, 3.0],
//! };
//! let lu = factorize(&FactorConfig::default(), &a)?;
//! let mut b = vec![4.0, 7.0];
//! lu.solve(Trans::NoTrans, &mut b)?;
//! ```
//!
//! # References
//!
//! - Gilbert, J.R., Peierls, T. "Sparse partial pivoting in time
//!   proportional to arithmetic operations" SIAM J. Sci. Stat. Comput., 1988.
//! - Duff, I.S. "On algorithms for obtaining a maximum transversal"
//!   ACM TOMS, Vol. 7, No. 3, 1981.
//! - Davis, T.A. "Direct Methods for Sparse Linear Systems", SIAM, 2006.

pub mod config;
pub mod error;
pub mod factor;
pub mod matching;
pub mod matrix;
pub mod solve;

mod numeric;
mod pivot;
mod symbolic;

pub use config::{FactorConfig, PivotPolicy};
pub use error::LuError;
pub use factor::{factorize, LuFactors};
pub use matrix::CscMatrix;
pub use solve::{solve, Trans};

/// Sentinel for "no entry" in permutation and matching vectors.
///
/// A row with `row_perm[r] == NONE` has not yet been used as a pivot; a
/// column with `col_to_row[c] == NONE` is unmatched.
pub const NONE: usize = usize::MAX;
