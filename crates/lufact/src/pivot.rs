//! Copy, drop, pivot and scale one column.
//!
//! The dense accumulator produced by the numeric step is compacted into
//! the arena slots reserved by the symbolic step. Along the way entries
//! below the drop threshold (and outside the pattern of `A`) are thrown
//! out, a pivot is chosen according to the configured policy, swapped into
//! the last slot of the `U` part, recorded in the row permutation, and the
//! remaining `L` entries are divided by it.

use crate::config::PivotPolicy;
use crate::error::LuError;
use crate::factor::{LuFactors, DIAG_CANDIDATE};
use crate::NONE;

/// Transfer column `jcol` from `dense` to the sparse structure, pivot and
/// scale.
///
/// Returns the pivot row (in A-numbering), or `None` under
/// [`PivotPolicy::NoDiagonal`]. Every touched `dense` entry is cleared so
/// the accumulator can be reused for the next column.
pub(crate) fn pivot_column(
    policy: PivotPolicy,
    pivot_threshold: f64,
    drop_threshold: f64,
    nz_count_limit: i64,
    jcol: usize,
    lu: &mut LuFactors,
    dense: &mut [f64],
    pattern: &[u8],
    twork: &mut [f64],
    rnd: &mut u64,
) -> Result<Option<usize>, LuError> {
    // Arena position the pivot lands in during the copy.
    let mut ujjptr = NONE;

    match policy {
        PivotPolicy::NoPivoting | PivotPolicy::NoDiagonal => {
            if lu.ucolptr[jcol + 1] <= lu.ucolptr[jcol] {
                return Err(LuError::ColumnLength { col: jcol });
            }

            // Copy the U part, keeping only entries in the pattern of A.
            let mut nzcpy = lu.ucolptr[jcol];
            for nzptr in lu.ucolptr[jcol]..lu.lcolptr[jcol] {
                let irow = lu.rowind[nzptr];
                if pattern[irow] != 0 || irow == lu.col_perm[jcol] {
                    lu.rowind[nzcpy] = irow;
                    lu.values[nzcpy] = dense[irow];
                    nzcpy += 1;
                }
                dense[irow] = 0.0;
            }
            let lastu = nzcpy;

            // Same for L, watching for the matched diagonal candidate.
            for nzptr in lu.lcolptr[jcol]..lu.ucolptr[jcol + 1] {
                let irow = lu.rowind[nzptr];
                if pattern[irow] == DIAG_CANDIDATE {
                    ujjptr = nzcpy;
                }
                if pattern[irow] != 0 {
                    lu.rowind[nzcpy] = irow;
                    lu.values[nzcpy] = dense[irow];
                    nzcpy += 1;
                }
                dense[irow] = 0.0;
            }

            lu.lcolptr[jcol] = lastu;
            lu.ucolptr[jcol + 1] = nzcpy;
            lu.last = nzcpy;

            if policy == PivotPolicy::NoDiagonal {
                return Ok(None);
            }
        }

        PivotPolicy::Partial | PivotPolicy::Threshold => {
            if lu.ucolptr[jcol + 1] <= lu.lcolptr[jcol] {
                return Err(LuError::ColumnLength { col: jcol });
            }

            let (udthresh, ldthresh) = drop_thresholds(
                drop_threshold,
                nz_count_limit,
                jcol,
                lu,
                dense,
                twork,
                rnd,
            );

            // Copy the U part, throwing out small entries outside the
            // pattern.
            let mut nzcpy = lu.ucolptr[jcol];
            for nzptr in lu.ucolptr[jcol]..lu.lcolptr[jcol] {
                let irow = lu.rowind[nzptr];
                if pattern[irow] != 0 || dense[irow].abs() >= udthresh {
                    lu.rowind[nzcpy] = irow;
                    lu.values[nzcpy] = dense[irow];
                    nzcpy += 1;
                }
                dense[irow] = 0.0;
            }
            let lastu = nzcpy;

            // Scan the L part for the pivot before compacting it.
            let mut diag_row = NONE;
            let mut diag_mag = 0.0f64;
            let mut max_row = NONE;
            let mut max_mag = -1.0f64;
            for nzptr in lu.lcolptr[jcol]..lu.ucolptr[jcol + 1] {
                let irow = lu.rowind[nzptr];
                let mag = dense[irow].abs();
                if pattern[irow] == DIAG_CANDIDATE {
                    diag_row = irow;
                    diag_mag = mag;
                }
                if mag > max_mag {
                    max_row = irow;
                    max_mag = mag;
                }
            }
            let pivot_row = match policy {
                PivotPolicy::Threshold
                    if diag_row != NONE && diag_mag >= pivot_threshold * max_mag =>
                {
                    diag_row
                }
                _ => max_row,
            };
            if pivot_row == NONE {
                return Err(LuError::NoPivot { col: jcol });
            }

            // Copy the L part; the pivot and pattern entries are always
            // kept.
            for nzptr in lu.lcolptr[jcol]..lu.ucolptr[jcol + 1] {
                let irow = lu.rowind[nzptr];
                let mag = dense[irow].abs();
                if pattern[irow] == 0 && irow != pivot_row && mag < ldthresh {
                    dense[irow] = 0.0;
                } else {
                    if irow == pivot_row {
                        ujjptr = nzcpy;
                    }
                    lu.rowind[nzcpy] = irow;
                    lu.values[nzcpy] = dense[irow];
                    dense[irow] = 0.0;
                    nzcpy += 1;
                }
            }

            lu.lcolptr[jcol] = lastu;
            lu.ucolptr[jcol + 1] = nzcpy;
            lu.last = nzcpy;
        }
    }

    // The pivot has been located. Swap it from L into the last slot of U,
    // record it in P, and divide the column of L through by it.
    if ujjptr == NONE {
        return Err(LuError::NoPivot { col: jcol });
    }
    let pivrow = lu.rowind[ujjptr];
    let ujj = lu.values[ujjptr];
    if ujj == 0.0 {
        return Err(LuError::ZeroPivot { col: jcol });
    }

    let dptr = lu.lcolptr[jcol];
    lu.rowind[ujjptr] = lu.rowind[dptr];
    lu.values[ujjptr] = lu.values[dptr];
    lu.rowind[dptr] = pivrow;
    lu.values[dptr] = ujj;
    lu.lcolptr[jcol] = dptr + 1;

    lu.row_perm[pivrow] = jcol;

    for nzptr in lu.lcolptr[jcol]..lu.ucolptr[jcol + 1] {
        lu.values[nzptr] /= ujj;
    }

    Ok(Some(pivrow))
}

/// Drop thresholds for the U and L parts of the column.
///
/// With no per-column cap they are a fixed fraction of the largest
/// magnitude in each part. With a cap, the order-statistic selector finds
/// the threshold that keeps at most `nz_count_limit` entries per part.
fn drop_thresholds(
    drop_threshold: f64,
    nz_count_limit: i64,
    jcol: usize,
    lu: &LuFactors,
    dense: &[f64],
    twork: &mut [f64],
    rnd: &mut u64,
) -> (f64, f64) {
    if nz_count_limit <= 0 {
        let mut maxu = -1.0f64;
        for nzptr in lu.ucolptr[jcol]..lu.lcolptr[jcol] {
            let mag = dense[lu.rowind[nzptr]].abs();
            if mag > maxu {
                maxu = mag;
            }
        }
        let mut maxl = -1.0f64;
        for nzptr in lu.lcolptr[jcol]..lu.ucolptr[jcol + 1] {
            let mag = dense[lu.rowind[nzptr]].abs();
            if mag > maxl {
                maxl = mag;
            }
        }
        (drop_threshold * maxu, drop_threshold * maxl)
    } else {
        let cap = nz_count_limit as usize;

        let mut cnt = 0;
        for nzptr in lu.ucolptr[jcol]..lu.lcolptr[jcol] {
            twork[cnt] = dense[lu.rowind[nzptr]].abs();
            cnt += 1;
        }
        let udthresh = if cap < cnt {
            kth_smallest(&mut twork[..cnt], cnt - cap + 1, rnd)
        } else {
            0.0
        };

        let mut cnt = 0;
        for nzptr in lu.lcolptr[jcol]..lu.ucolptr[jcol + 1] {
            twork[cnt] = dense[lu.rowind[nzptr]].abs();
            cnt += 1;
        }
        let ldthresh = if cap < cnt {
            kth_smallest(&mut twork[..cnt], cnt - cap + 1, rnd)
        } else {
            0.0
        };

        (udthresh, ldthresh)
    }
}

/// Randomized quickselect: the k-th smallest element of `work` (k is
/// 1-based). Reorders `work` in place.
///
/// Uses Hoare partitioning with a pivot drawn from a small linear
/// congruential generator whose state lives with the factorization call.
pub(crate) fn kth_smallest(work: &mut [f64], k: usize, rnd: &mut u64) -> f64 {
    let n = work.len();
    debug_assert!(k >= 1 && k <= n);

    let mut p = 0usize;
    let mut r = n - 1;
    while p != r {
        if r - p >= 8 {
            *rnd = (1366 * *rnd + 150889) % 714025;
            let q = p + (*rnd as usize) % (r - p + 1);
            work.swap(p, q);
        }
        let x = work[p];
        let mut i = p as isize - 1;
        let mut j = r as isize + 1;
        loop {
            j -= 1;
            while work[j as usize] > x {
                j -= 1;
            }
            i += 1;
            while work[i as usize] < x {
                i += 1;
            }
            if i < j {
                work.swap(i as usize, j as usize);
            } else {
                if (j as usize) < k - 1 {
                    p = j as usize + 1;
                } else {
                    r = j as usize;
                }
                break;
            }
        }
    }
    work[p]
}

#[cfg(test)]
mod tests {
    use super::kth_smallest;

    #[test]
    fn test_kth_smallest_matches_sort() {
        let data = [0.3, 1.7, 0.04, 2.4, 0.09, 1.1, 0.44, 3.2, 0.06, 0.19];
        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for k in 1..=data.len() {
            let mut work = data.to_vec();
            let mut rnd = 0u64;
            let kth = kth_smallest(&mut work, k, &mut rnd);
            assert_eq!(kth, sorted[k - 1], "rank {}", k);
        }
    }

    #[test]
    fn test_kth_smallest_single() {
        let mut work = vec![5.0];
        let mut rnd = 0u64;
        assert_eq!(kth_smallest(&mut work, 1, &mut rnd), 5.0);
    }

    #[test]
    fn test_kth_smallest_duplicates() {
        let mut work = vec![2.0, 1.0, 2.0, 1.0, 2.0];
        let mut rnd = 0u64;
        assert_eq!(kth_smallest(&mut work, 3, &mut rnd), 2.0);
    }
}
