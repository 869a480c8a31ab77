//! Symbolic step: per-column depth-first search.
//!
//! For the current column the search determines which rows become nonzero
//! in `U` and lays them out in the arena in reverse topological order with
//! respect to the dependency graph of the already-computed `L` columns.
//! The numeric update can then walk the `U` entries backward and always
//! see predecessors before successors. The non-fill rows of `L` (those
//! already present in `A`) are appended afterwards, in no particular order.
//!
//! The search is iterative: `parent` holds the DFS tree edge of each
//! visited vertex and `child` the resume position in its adjacency list,
//! so pathological columns cannot exhaust the call stack.

use crate::factor::LuFactors;
use crate::NONE;

/// Lay out the nonzero pattern of column `jcol` and scatter the column of
/// `A` into the dense accumulator.
///
/// On entry `found[i] != jcol` for all rows and `dense` is zero. On exit
/// `dense` holds column `Q(jcol)` of `A`, `lurow` holds the above-diagonal
/// pattern in reverse topological order followed by the non-fill lower
/// rows, `lcolptr[jcol]` marks the start of the lower part, and
/// `found[i] == jcol` for every row that was given a slot. Row indices are
/// in A-numbering throughout; the final renumbering to PA happens once,
/// after the last column.
pub(crate) fn column_dfs(
    jcol: usize,
    anz: &[f64],
    arowind: &[usize],
    acolptr: &[usize],
    lu: &mut LuFactors,
    dense: &mut [f64],
    found: &mut [usize],
    parent: &mut [usize],
    child: &mut [usize],
) {
    let qcol = lu.col_perm[jcol];
    let nzast = acolptr[qcol];
    let nzaend = acolptr[qcol + 1];

    // Depth-first search from each nonzero of the column that is above the
    // diagonal in PA, i.e. whose row has already been pivoted.
    for nzaptr in nzast..nzaend {
        let mut krow = arowind[nzaptr];
        dense[krow] = anz[nzaptr];
        if lu.row_perm[krow] == NONE || found[krow] == jcol || dense[krow] == 0.0 {
            continue;
        }
        parent[krow] = NONE;
        found[krow] = jcol;
        let mut chdptr = lu.lcolptr[lu.row_perm[krow]];

        loop {
            // Step forward to an unvisited child of krow if one exists.
            let chdend = lu.ucolptr[lu.row_perm[krow] + 1];
            let mut advanced = false;
            while chdptr < chdend {
                let nextk = lu.rowind[chdptr];
                chdptr += 1;
                if lu.row_perm[nextk] == NONE || found[nextk] == jcol {
                    continue;
                }
                child[krow] = chdptr;
                parent[nextk] = krow;
                krow = nextk;
                found[krow] = jcol;
                chdptr = lu.lcolptr[lu.row_perm[krow]];
                advanced = true;
                break;
            }
            if advanced {
                continue;
            }
            // All children done: emit krow. Post-order emission is what
            // yields the reverse topological order of the U pattern.
            lu.rowind[lu.last] = krow;
            lu.last += 1;
            if parent[krow] == NONE {
                break;
            }
            krow = parent[krow];
            chdptr = child[krow];
        }
    }

    // Close off the U part and append the non-fill rows of L. The future
    // diagonal element travels in L until the pivot step moves it.
    lu.lcolptr[jcol] = lu.last;
    for nzaptr in nzast..nzaend {
        let krow = arowind[nzaptr];
        if lu.row_perm[krow] == NONE {
            found[krow] = jcol;
            lu.rowind[lu.last] = krow;
            lu.last += 1;
        }
    }
}
