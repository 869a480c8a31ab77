//! Factorization driver and the resulting factor bundle.

use log::{debug, warn};

use crate::config::{FactorConfig, PivotPolicy};
use crate::error::LuError;
use crate::matching::maximum_matching;
use crate::matrix::CscMatrix;
use crate::solve::{self, Trans};
use crate::{numeric, pivot, symbolic, NONE};

/// Pattern marker: row is nonzero in the current column of `A`.
pub(crate) const IN_PATTERN: u8 = 1;
/// Pattern marker: row is the matched diagonal candidate of the column.
pub(crate) const DIAG_CANDIDATE: u8 = 2;

/// The factorization `PA = LU`.
///
/// Both factors live in one column-wise arena. For column `j`:
///
/// - `U` entries occupy `ucolptr[j]..lcolptr[j]` of `rowind`/`values`,
///   with the diagonal `U(j,j)` in the **last** slot;
/// - `L` entries (unit diagonal not stored) occupy
///   `lcolptr[j]..ucolptr[j+1]`.
///
/// Row indices are in PA-numbering: `row_perm[r] = s` means row `r` of `A`
/// is row `s` of `PA`. `col_perm[j]` is the column of `A` factored at
/// position `j`.
#[derive(Debug, Clone)]
pub struct LuFactors {
    pub(crate) lu_size: usize,
    pub(crate) values: Vec<f64>,
    pub(crate) rowind: Vec<usize>,
    pub(crate) lcolptr: Vec<usize>,
    pub(crate) ucolptr: Vec<usize>,
    pub(crate) row_perm: Vec<usize>,
    pub(crate) col_perm: Vec<usize>,
    pub(crate) last: usize,
    pub(crate) nrow: usize,
    pub(crate) ncol: usize,
}

impl LuFactors {
    /// Number of rows of the factored matrix.
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// Number of columns of the factored matrix.
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Current arena capacity, in entries.
    pub fn lu_size(&self) -> usize {
        self.lu_size
    }

    /// Number of stored entries in `L` and `U` together.
    pub fn nnz(&self) -> usize {
        self.last
    }

    /// Arena values, parallel to [`Self::row_indices`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Arena row indices, in PA-numbering.
    pub fn row_indices(&self) -> &[usize] {
        &self.rowind
    }

    /// Start of the `L` part of each column, length ncol.
    pub fn lcolptr(&self) -> &[usize] {
        &self.lcolptr
    }

    /// Start of the `U` part of each column, length ncol + 1.
    pub fn ucolptr(&self) -> &[usize] {
        &self.ucolptr
    }

    /// Row permutation: `row_perm[r]` is the PA-row of A-row `r`.
    pub fn row_perm(&self) -> &[usize] {
        &self.row_perm
    }

    /// Column permutation: `col_perm[j]` is the A-column at position `j`.
    pub fn col_perm(&self) -> &[usize] {
        &self.col_perm
    }

    /// Solve `Ax = b` or `A^T x = b`, overwriting `b` with the solution.
    pub fn solve(&self, trans: Trans, b: &mut [f64]) -> Result<(), LuError> {
        solve::solve(self, trans, b)
    }

    /// Grow the arena until the next column is guaranteed to fit. A column
    /// can add at most `nrow` new entries. Both parallel arrays grow in
    /// lockstep and the already-written prefix is preserved.
    fn ensure_column_capacity(&mut self, nrow: usize, expand_ratio: f64) {
        while self.last + nrow >= self.lu_size {
            let new_size = ((self.lu_size as f64) * expand_ratio).ceil() as usize;
            debug!(
                "expanding LU arena from {} to {} entries",
                self.lu_size, new_size
            );
            self.values.resize(new_size, 0.0);
            self.rowind.resize(new_size, 0);
            self.lu_size = new_size;
        }
    }
}

/// Factor a sparse matrix into `PA = LU`.
///
/// Columns are processed in the order given by the configured column
/// permutation (natural order by default). A maximum matching computed up
/// front assigns each column a candidate diagonal row; an imperfect
/// matching is reported as a warning and the affected columns fall back to
/// the best available pivot.
pub fn factorize(config: &FactorConfig, a: &CscMatrix<'_>) -> Result<LuFactors, LuError> {
    config.validate(a.ncol)?;
    a.validate()?;

    let nrow = a.nrow;
    let ncol = a.ncol;
    let nnz = a.nnz();

    debug!(
        "factorize {}x{} nnz={}: policy={:?} pivot_thr={} drop_thr={} col_fill={} fill={} expand={}",
        nrow,
        ncol,
        nnz,
        config.pivot_policy,
        config.pivot_threshold,
        config.drop_threshold,
        config.col_fill_ratio,
        config.fill_ratio,
        config.expand_ratio
    );

    let (colptr, rowind_a) = a.to_zero_based();
    let colptr = colptr.as_ref();
    let rowind_a = rowind_a.as_ref();
    let anz = a.values;

    // Per-column transient state. `found` doubles as the DFS visit marker;
    // advancing its sentinel (the column number) avoids re-initialization,
    // which keeps the per-column cost proportional to the active nonzeros.
    let mut dense = vec![0.0f64; nrow];
    let mut twork = vec![0.0f64; nrow];
    let mut found = vec![NONE; nrow];
    let mut parent = vec![NONE; nrow];
    let mut child = vec![0usize; nrow];
    let mut pattern = vec![0u8; nrow];
    let mut rnd: u64 = 0;

    let lu_size = ((nnz as f64) * config.fill_ratio).max(1.0) as usize;
    let mut lu = LuFactors {
        lu_size,
        values: vec![0.0; lu_size],
        rowind: vec![0; lu_size],
        lcolptr: vec![0; ncol],
        ucolptr: vec![0; ncol + 1],
        row_perm: vec![NONE; nrow],
        col_perm: vec![0; ncol],
        last: 0,
        nrow,
        ncol,
    };

    // Initial diagonal assignment.
    let matching = maximum_matching(nrow, ncol, colptr, rowind_a)?;
    let mut cmatch = matching.col_to_row;
    let mut rmatch = matching.row_to_col;
    if cmatch.iter().any(|&r| r == NONE) {
        warn!("perfect matching not found; affected columns pivot on the best available row");
    }

    match &config.col_perm {
        None => {
            for (j, q) in lu.col_perm.iter_mut().enumerate() {
                *q = j;
            }
        }
        Some(perm) => {
            for (j, q) in lu.col_perm.iter_mut().enumerate() {
                *q = perm[j] - config.col_perm_base;
            }
        }
    }

    for jcol in 0..ncol {
        lu.ensure_column_capacity(nrow, config.expand_ratio);

        // Mark the pattern of A(:, Q(jcol)) and the matched candidate row.
        let qcol = lu.col_perm[jcol];
        for nzaptr in colptr[qcol]..colptr[qcol + 1] {
            pattern[rowind_a[nzaptr]] = IN_PATTERN;
        }
        let orig_row = cmatch[qcol];
        if orig_row != NONE {
            pattern[orig_row] = DIAG_CANDIDATE;
            if lu.row_perm[orig_row] != NONE {
                return Err(LuError::MatchingViolation {
                    reason: format!(
                        "matched pivot row {} for column {} already used",
                        orig_row, jcol
                    ),
                });
            }
        }

        symbolic::column_dfs(
            jcol, anz, rowind_a, colptr, &mut lu, &mut dense, &mut found, &mut parent,
            &mut child,
        );

        numeric::update_column(jcol, &mut lu, &mut dense, &mut found);

        let nz_count_limit =
            (config.col_fill_ratio * ((colptr[qcol + 1] - colptr[qcol] + 1) as f64)) as i64;

        // Once every row has been pivoted, the remaining columns of a wide
        // matrix have no diagonal.
        let policy = if jcol >= nrow {
            PivotPolicy::NoDiagonal
        } else {
            config.pivot_policy
        };

        let pivot = pivot::pivot_column(
            policy,
            config.pivot_threshold,
            config.drop_threshold,
            nz_count_limit,
            jcol,
            &mut lu,
            &mut dense,
            &pattern,
            &mut twork,
            &mut rnd,
        )?;

        // Clear the pattern markers for the next column.
        for nzaptr in colptr[qcol]..colptr[qcol + 1] {
            pattern[rowind_a[nzaptr]] = 0;
        }
        if orig_row != NONE {
            pattern[orig_row] = 0;
        }

        // Keep the matching aligned with the pivot that was actually
        // chosen, so later columns mark the right candidate rows.
        if let Some(pivrow) = pivot {
            let othr_col = rmatch[pivrow];
            if orig_row != NONE && othr_col != NONE {
                cmatch[qcol] = pivrow;
                cmatch[othr_col] = orig_row;
                rmatch[orig_row] = othr_col;
                rmatch[pivrow] = qcol;
            } else {
                if orig_row != NONE {
                    rmatch[orig_row] = NONE;
                }
                if othr_col != NONE {
                    cmatch[othr_col] = NONE;
                }
                cmatch[qcol] = pivrow;
                rmatch[pivrow] = qcol;
            }
        }
    }

    // Extend the row permutation to a full bijection: rows never used as
    // pivots are numbered in order after the pivoted ones.
    let mut next = ncol;
    for r in lu.row_perm.iter_mut() {
        if *r == NONE {
            *r = next;
            next += 1;
        }
    }

    // Renumber the arena from A-rows to PA-rows, exactly once.
    for k in 0..lu.last {
        lu.rowind[k] = lu.row_perm[lu.rowind[k]];
    }

    if log::log_enabled!(log::Level::Debug) {
        let mut min_ujj = f64::INFINITY;
        for jcol in 0..ncol.min(nrow) {
            let ujj = lu.values[lu.lcolptr[jcol] - 1].abs();
            if ujj < min_ujj {
                min_ujj = ujj;
            }
        }
        debug!("factored with nnz={} min |U(j,j)|={:e}", lu.last, min_ujj);
    }

    Ok(lu)
}
