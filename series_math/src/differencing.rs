//! Repeated first-differencing and its inverse
//!
//! Differencing is applied `d` times to remove trend before the ARIMA
//! recursion runs. To rebuild the original scale, each pass is undone in
//! reverse order, starting from an anchor: the true value that immediately
//! precedes the first differenced point at that level.

use crate::{MathError, Result};

/// Apply first-differencing `d` times.
///
/// Each pass computes `s[i] - s[i - 1]` and shrinks the series by one.
/// `d = 0` returns the series unchanged, and a series shorter than `d + 1`
/// yields an empty vector.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() < 2 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo a single differencing pass.
///
/// `anchor` is the last true value preceding the first differenced point;
/// the result is the running cumulative sum seeded with it.
pub fn undifference(diff: &[f64], anchor: f64) -> Vec<f64> {
    let mut level = anchor;
    diff.iter()
        .map(|&delta| {
            level += delta;
            level
        })
        .collect()
}

/// Undo several differencing passes.
///
/// `anchors` must be ordered the way [`anchors_at`] returns them, i.e. the
/// anchor of the last forward pass first.
pub fn undifference_n(diff: &[f64], anchors: &[f64]) -> Vec<f64> {
    anchors
        .iter()
        .fold(diff.to_vec(), |current, &anchor| undifference(&current, anchor))
}

/// Undo several differencing passes for a single value.
///
/// Same as `undifference_n(&[value], anchors)[0]`: each pass adds its
/// anchor to the value.
pub fn undifference_point(value: f64, anchors: &[f64]) -> f64 {
    anchors.iter().fold(value, |level, anchor| level + anchor)
}

/// Anchors needed to rebuild `series[position..]` from its `d`-times
/// differenced form.
///
/// Only `series[..position]` is read, so the same call works for a
/// one-step reconstruction inside the series and for extending it past
/// its end (`position == series.len()`).
pub fn anchors_at(series: &[f64], d: usize, position: usize) -> Result<Vec<f64>> {
    if position > series.len() {
        return Err(MathError::InvalidInput(format!(
            "Anchor position {} is past the end of a series of length {}",
            position,
            series.len()
        )));
    }
    if position < d {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} values before position to undo {} differencing passes, got {}",
            d, d, position
        )));
    }

    let mut anchors = Vec::with_capacity(d);
    let mut level = series[..position].to_vec();
    for _ in 0..d {
        // position >= d keeps every level non-empty here
        if let Some(&last) = level.last() {
            anchors.push(last);
        }
        level = difference(&level, 1);
    }
    anchors.reverse();
    Ok(anchors)
}

/// Anchors that rebuild `series[d..]` from `difference(series, d)`.
pub fn difference_anchors(series: &[f64], d: usize) -> Result<Vec<f64>> {
    anchors_at(series, d, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{} != {}", x, y);
        }
    }

    #[test]
    fn test_difference_orders() {
        let series = [1.0, 4.0, 9.0, 16.0, 25.0];

        assert_eq!(difference(&series, 0), series.to_vec());
        assert_eq!(difference(&series, 1), vec![3.0, 5.0, 7.0, 9.0]);
        assert_eq!(difference(&series, 2), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_difference_short_series() {
        assert!(difference(&[5.0], 1).is_empty());
        assert!(difference(&[5.0, 6.0], 2).is_empty());
        assert!(difference(&[], 1).is_empty());
    }

    #[test]
    fn test_undifference_single_pass() {
        let restored = undifference(&[3.0, 5.0, 7.0], 1.0);
        assert_eq!(restored, vec![4.0, 9.0, 16.0]);
    }

    #[test]
    fn test_round_trip_all_orders() {
        let series = [3.0, -1.5, 4.0, 4.25, 10.0, 7.5, 2.0, 8.0];

        for d in 0..=2 {
            let diff = difference(&series, d);
            let anchors = difference_anchors(&series, d).unwrap();
            assert_eq!(anchors.len(), d);
            assert_close(&undifference_n(&diff, &anchors), &series[d..]);
        }
    }

    #[test]
    fn test_second_order_anchors() {
        let series = [2.0, 5.0, 11.0, 20.0];
        // last first-difference before index 2, then the value at index 1
        assert_eq!(difference_anchors(&series, 2).unwrap(), vec![3.0, 5.0]);
    }

    #[test]
    fn test_anchors_at_end_extend_series() {
        let series = [1.0, 2.0, 4.0, 7.0];
        let anchors = anchors_at(&series, 2, series.len()).unwrap();

        // next second difference of 1 continues 1, 2, 3 spacing with 4
        let extended = undifference_n(&[1.0], &anchors);
        assert_close(&extended, &[11.0]);
    }

    #[test]
    fn test_undifference_point_matches_series_form() {
        let anchors = [3.0, 7.0];
        assert_eq!(undifference_point(1.5, &anchors), undifference_n(&[1.5], &anchors)[0]);
        assert_eq!(undifference_point(1.5, &[]), 1.5);
    }

    #[test]
    fn test_anchors_at_rejects_bad_position() {
        let series = [1.0, 2.0, 3.0];
        assert!(anchors_at(&series, 2, 1).is_err());
        assert!(anchors_at(&series, 1, 4).is_err());
        assert!(anchors_at(&series, 0, 0).unwrap().is_empty());
    }
}
