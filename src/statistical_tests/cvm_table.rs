//! statistical_tests::cvm_table — Crow's Cramér–von Mises critical values.
//!
//! Critical values of the Cramér–von Mises statistic for the power-law NHPP
//! (MIL-HDBK-189), tabulated by sample size M and significance level.
//! Lookups between tabulated points interpolate linearly in both directions
//! and clamp at the table edges.

/// Tabulated significance levels, ascending.
pub const SIGNIFICANCE_LEVELS: [f64; 5] = [0.01, 0.05, 0.10, 0.15, 0.20];

/// Tabulated sample sizes, ascending.
pub const SAMPLE_SIZES: [usize; 22] =
    [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 30, 60, 100];

/// Rows aligned with [`SAMPLE_SIZES`], columns with [`SIGNIFICANCE_LEVELS`].
const CRITICAL_VALUES: [[f64; 5]; 22] = [
    [0.186, 0.175, 0.162, 0.149, 0.138],
    [0.230, 0.184, 0.154, 0.135, 0.121],
    [0.280, 0.191, 0.155, 0.134, 0.121],
    [0.300, 0.199, 0.160, 0.137, 0.121],
    [0.310, 0.204, 0.162, 0.139, 0.123],
    [0.320, 0.208, 0.165, 0.140, 0.124],
    [0.320, 0.210, 0.165, 0.141, 0.124],
    [0.320, 0.212, 0.167, 0.142, 0.125],
    [0.320, 0.212, 0.167, 0.142, 0.125],
    [0.320, 0.214, 0.169, 0.143, 0.126],
    [0.320, 0.214, 0.169, 0.144, 0.126],
    [0.330, 0.214, 0.169, 0.144, 0.126],
    [0.330, 0.214, 0.169, 0.144, 0.126],
    [0.330, 0.215, 0.169, 0.144, 0.126],
    [0.330, 0.216, 0.171, 0.145, 0.127],
    [0.330, 0.217, 0.171, 0.145, 0.127],
    [0.330, 0.217, 0.171, 0.146, 0.127],
    [0.330, 0.217, 0.171, 0.146, 0.127],
    [0.330, 0.217, 0.172, 0.146, 0.128],
    [0.330, 0.218, 0.172, 0.146, 0.128],
    [0.330, 0.220, 0.173, 0.147, 0.128],
    [0.340, 0.220, 0.173, 0.147, 0.129],
];

/// Critical value for `sample_size` at `significance`.
///
/// Parameters
/// ----------
/// - `sample_size`: `usize`
///   M in the statistic (N − 1 for failure-terminated tests, N otherwise).
/// - `significance`: `f64`
///   Test level, `1 − confidence`.
///
/// Returns
/// -------
/// `f64`
///   The interpolated critical value. Sizes outside [2, 100] and levels
///   outside [0.01, 0.20] are clamped to the nearest tabulated edge.
pub fn critical_value(sample_size: usize, significance: f64) -> f64 {
    let (r0, r1, wr) = bracket(
        &SAMPLE_SIZES.map(|m| m as f64),
        (sample_size as f64).clamp(2.0, 100.0),
    );
    let (c0, c1, wc) = bracket(&SIGNIFICANCE_LEVELS, significance.clamp(0.01, 0.20));

    let row = |r: usize| {
        CRITICAL_VALUES[r][c0] + wc * (CRITICAL_VALUES[r][c1] - CRITICAL_VALUES[r][c0])
    };
    row(r0) + wr * (row(r1) - row(r0))
}

// ---- Helper Methods ----

/// Indices `(i, i+1)` around `x` in ascending `grid` and the weight of
/// `grid[i+1]`. `x` must lie within the grid.
fn bracket(grid: &[f64], x: f64) -> (usize, usize, f64) {
    let last = grid.len() - 1;
    let hi = grid.iter().position(|&g| g >= x).unwrap_or(last);
    if hi == 0 {
        return (0, 0, 0.0);
    }
    let lo = hi - 1;
    let span = grid[hi] - grid[lo];
    (lo, hi, (x - grid[lo]) / span)
}
