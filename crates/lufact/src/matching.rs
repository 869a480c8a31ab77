//! Maximum bipartite matching between columns and rows.
//!
//! The matching assigns each column a distinct nonzero row, so that every
//! column enters the factorization with a candidate diagonal entry. This is
//! the same maximum-transversal problem solved ahead of block triangular
//! decomposition in sparse direct solvers.
//!
//! # Algorithm
//!
//! For each column node the search grows an augmenting path in two phases:
//!
//! 1. **Cheap assignment**: scan the column's rows for one that is still
//!    unmatched. Each column remembers how far this scan has advanced
//!    (`nxtchp`) so rows are considered for cheap assignment at most once.
//! 2. **Deep search**: when every adjacent row is matched, step through a
//!    matched row into its partner column and retry from there, recording
//!    the `(prevrw, prevcl)` breadcrumbs back toward the root.
//!
//! When an unmatched row is found the path is flipped: walking the
//! breadcrumbs back to the root, every row on the path is reassigned to the
//! previous column. If the search backtracks past the root, the column
//! stays unmatched and the matching is not perfect.
//!
//! # Complexity
//!
//! O(n · nnz) worst case; near linear on most sparse patterns thanks to the
//! cheap-assignment pass and the per-pass row markers.
//!
//! # References
//!
//! - Duff, I.S. "On algorithms for obtaining a maximum transversal"
//!   ACM TOMS, Vol. 7, No. 3, pp. 315-330, 1981.
//! - Pothen, A., Fan, C.-J. "Computing the block triangular form of a
//!   sparse matrix" ACM TOMS, Vol. 16, No. 4, 1990.

use crate::error::LuError;
use crate::NONE;

/// A column/row matching.
///
/// `col_to_row[c] == r` and `row_to_col[r] == c` describe the same matched
/// edge; unmatched nodes hold [`NONE`].
#[derive(Debug, Clone)]
pub struct Matching {
    /// Row matched to each column, or [`NONE`].
    pub col_to_row: Vec<usize>,
    /// Column matched to each row, or [`NONE`].
    pub row_to_col: Vec<usize>,
}

impl Matching {
    /// Number of matched columns (the structural rank of the pattern).
    pub fn rank(&self) -> usize {
        self.col_to_row.iter().filter(|&&r| r != NONE).count()
    }

    /// True when every column is matched.
    pub fn is_perfect(&self) -> bool {
        self.rank() == self.col_to_row.len()
    }
}

/// Compute a maximum matching on the bipartite graph whose edges are the
/// nonzeros of a CSC pattern (columns on one side, rows on the other).
///
/// `colptr` and `rowind` must be 0-based.
pub fn maximum_matching(
    nrow: usize,
    ncol: usize,
    colptr: &[usize],
    rowind: &[usize],
) -> Result<Matching, LuError> {
    let mut row_to_col = vec![NONE; nrow];

    // prevcl/prevrw: breadcrumbs toward the root of the current search.
    // tryrow: deep-search cursor per column.
    // nxtchp: cheap-assignment cursor per column, NONE once exhausted.
    // marker: root column whose search last visited the row.
    let mut prevcl = vec![NONE; ncol];
    let mut prevrw = vec![NONE; ncol];
    let mut tryrow = vec![0usize; ncol];
    let mut nxtchp = vec![0usize; ncol];
    let mut marker = vec![NONE; nrow];

    for root in 0..ncol {
        let mut col = root;
        prevrw[col] = NONE;
        prevcl[col] = NONE;
        nxtchp[col] = colptr[col];

        'search: loop {
            // Cheap assignment: look for an unmatched row adjacent to col.
            let mut found_row = NONE;
            if nxtchp[col] != NONE {
                for ptr in nxtchp[col]..colptr[col + 1] {
                    let row = rowind[ptr];
                    if row_to_col[row] == NONE {
                        found_row = row;
                        break;
                    }
                }
                if found_row == NONE {
                    // All adjacent rows considered; never scan again.
                    nxtchp[col] = NONE;
                }
            }

            if found_row == NONE {
                // Deep search: step forward through a matched row, or
                // backtrack when every row has been visited this pass.
                tryrow[col] = colptr[col];
                let mut advanced = false;
                let mut ptr = tryrow[col];
                while ptr < colptr[col + 1] {
                    let row = rowind[ptr];
                    ptr += 1;
                    if marker[row] == root {
                        continue;
                    }
                    tryrow[col] = ptr;
                    marker[row] = root;
                    let nxtcol = row_to_col[row];
                    if nxtcol == col {
                        return Err(LuError::MatchingViolation {
                            reason: format!(
                                "search followed a matching edge at column {}",
                                col
                            ),
                        });
                    }
                    if nxtcol != NONE {
                        // Try to extend the path from the column matched
                        // by this row.
                        prevcl[nxtcol] = col;
                        prevrw[nxtcol] = row;
                        tryrow[nxtcol] = colptr[nxtcol];
                        col = nxtcol;
                        advanced = true;
                    } else {
                        found_row = row;
                    }
                    break;
                }
                if advanced {
                    continue 'search;
                }
                if found_row == NONE {
                    let back = prevcl[col];
                    if back == NONE {
                        // Backtracked past the root: col stays unmatched.
                        break 'search;
                    }
                    col = back;
                    continue 'search;
                }
            }

            // Flip the augmenting path back toward the root.
            row_to_col[found_row] = col;
            let mut prow = prevrw[col];
            let mut pcol = prevcl[col];
            while pcol != NONE {
                if row_to_col[prow] != col {
                    return Err(LuError::MatchingViolation {
                        reason: format!(
                            "path toward root disagrees with matching at column {}",
                            col
                        ),
                    });
                }
                row_to_col[prow] = pcol;
                col = pcol;
                prow = prevrw[col];
                pcol = prevcl[col];
            }
            break 'search;
        }
    }

    // Derive the column view from the row view.
    let mut col_to_row = vec![NONE; ncol];
    for (row, &col) in row_to_col.iter().enumerate() {
        if col != NONE {
            col_to_row[col] = row;
        }
    }

    Ok(Matching {
        col_to_row,
        row_to_col,
    })
}
