//! Evenly spaced parameter grids shared by the models and demos.

/// `n` evenly spaced points from `lo` to `hi`, both included.
///
/// Points are `lo + i * step`, so a step that is exact in binary gives exact
/// grid points. The last point is always exactly `hi`.
#[must_use]
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            #[allow(clippy::cast_precision_loss)]
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        hi
                    } else {
                        #[allow(clippy::cast_precision_loss)]
                        let offset = step * i as f64;
                        lo + offset
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn includes_both_ends() {
        let grid = linspace(0.01, 1.0, 100);

        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], 0.01);
        assert_eq!(grid[99], 1.0);
        assert_relative_eq!(grid[1] - grid[0], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn binary_steps_are_exact() {
        let grid = linspace(0.0, 24.0, 49);

        assert!(grid.iter().enumerate().all(|(i, &x)| x == 0.5 * i as f64));
    }

    #[test]
    fn degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
    }
}
