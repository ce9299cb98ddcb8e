//! Log-spaced frequency grid and linear interpolation onto it.

/// `n` log-spaced frequencies from `f_min` to `f_max`, endpoints exact.
///
/// `None` when the grid would be degenerate: fewer than 2 points, a
/// non-positive or non-finite bound, `f_max <= f_min`, or a range too narrow
/// to stay strictly ascending in floating point.
pub(crate) fn log_grid(f_min: f64, f_max: f64, n: usize) -> Option<Vec<f64>> {
    if n < 2 || !f_min.is_finite() || !f_max.is_finite() || f_min <= 0.0 || f_max <= f_min {
        return None;
    }

    let (lo, hi) = (f_min.log10(), f_max.log10());
    let step = (hi - lo) / (n - 1) as f64;
    let mut grid: Vec<f64> = (0..n).map(|i| 10f64.powf(lo + step * i as f64)).collect();
    grid[0] = f_min;
    grid[n - 1] = f_max;

    grid.windows(2).all(|w| w[0] < w[1]).then_some(grid)
}

/// Piecewise-linear interpolation of `(x, y)` at `at`; `x` must be strictly
/// ascending and non-empty. Values outside the range clamp to the end points.
pub(crate) fn interpolate(x: &[f64], y: &[f64], at: f64) -> f64 {
    let upper = x.partition_point(|&xi| xi <= at);
    match upper {
        0 => y[0],
        u if u >= x.len() => y[x.len() - 1],
        u => {
            let (x0, x1) = (x[u - 1], x[u]);
            let (y0, y1) = (y[u - 1], y[u]);
            y0 + (y1 - y0) * (at - x0) / (x1 - x0)
        }
    }
}
