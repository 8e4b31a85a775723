//! Hysteresis loop analysis: branch splitting, enclosed area, and
//! temperature statistics.
//!
//! A VSM hysteresis measurement sweeps the field from its maximum down to
//! its minimum and back, producing a closed loop. The loop is split at the
//! field minimum into a descending and an ascending branch; the enclosed
//! area is estimated by integrating each branch separately and differencing.

use thiserror::Error;

use crate::core::table::{ColumnRole, DataTable, RoleMap, TableError};

/// Errors that can occur during hysteresis analysis.
#[derive(Debug, Error)]
pub enum HysteresisError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("No samples to analyze")]
    EmptyInput,
}

/// Result type for hysteresis operations.
pub type Result<T> = std::result::Result<T, HysteresisError>;

/// One monotonic branch of a hysteresis loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Field values.
    pub x: Vec<f64>,
    /// Moment values.
    pub y: Vec<f64>,
}

impl Curve {
    /// Returns the number of samples in the branch.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the branch has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Trapezoidal quadrature of y over x.
///
/// Sums 0.5 * (y[i] + y[i+1]) * (x[i+1] - x[i]) over consecutive samples.
/// NaN samples propagate into the result; x need not be ascending (the
/// integral is signed).
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "x and y must have same length");

    let mut sum = 0.0;
    for i in 1..x.len() {
        sum += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
    }
    sum
}

/// Index of the first global minimum of a sequence. NaN values are skipped.
fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, min)) if v >= min => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Split a closed field-sweep loop into its two branches.
///
/// The loop is cut at the first global minimum of x: curve1 covers
/// `[0..=idx_min]`, curve2 covers `[idx_min..]` (the minimum sample is
/// shared). Loop closure is then forced: the branch whose maximum x is
/// lower gets its outer endpoint (curve1's first sample, curve2's last)
/// overwritten with the other branch's corresponding endpoint, so both
/// branches start and end at the same field values.
///
/// # Errors
///
/// `EmptyInput` if x is empty or all-NaN.
pub fn split_loop(x: &[f64], y: &[f64]) -> Result<(Curve, Curve)> {
    debug_assert_eq!(x.len(), y.len(), "x and y must have same length");

    let idx_min = argmin(x).ok_or(HysteresisError::EmptyInput)?;

    let mut curve1 = Curve {
        x: x[..=idx_min].to_vec(),
        y: y[..=idx_min].to_vec(),
    };
    let mut curve2 = Curve {
        x: x[idx_min..].to_vec(),
        y: y[idx_min..].to_vec(),
    };

    let max1 = curve1.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let max2 = curve2.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if max1 < max2 {
        // curve1 never reaches curve2's peak field; pin its start to
        // curve2's end so the loop closes
        let last = curve2.len() - 1;
        curve1.x[0] = curve2.x[last];
        curve1.y[0] = curve2.y[last];
    } else {
        let last = curve2.len() - 1;
        curve2.x[last] = curve1.x[0];
        curve2.y[last] = curve1.y[0];
    }

    Ok((curve1, curve2))
}

/// Area between two curves with independent x sampling.
///
/// Each curve's y values are shifted so their minimum is zero (keeping the
/// integrals positive regardless of sign), each shifted curve is integrated
/// over its own x domain, and the absolute difference of the absolute
/// integrals is returned.
///
/// This is an approximation, not a true polygon area between curves: it is
/// only valid when both branches span comparable x ranges, which holds for
/// a closed hysteresis loop after [`split_loop`].
pub fn area_between_curves(curve1: &Curve, curve2: &Curve) -> f64 {
    let int1 = shifted_integral(curve1);
    let int2 = shifted_integral(curve2);

    (int1.abs() - int2.abs()).abs()
}

fn shifted_integral(curve: &Curve) -> f64 {
    let min = curve.y.iter().cloned().fold(f64::INFINITY, f64::min);
    if !min.is_finite() {
        return 0.0;
    }

    let shifted: Vec<f64> = curve.y.iter().map(|v| v - min).collect();
    trapezoid(&shifted, &curve.x)
}

/// Enclosed hysteresis area of a loaded table.
///
/// Resolves the field and moment columns by role, splits the loop, and
/// integrates. Fails with `MissingColumn` when either role is unresolved.
pub fn hysteresis_area(table: &DataTable) -> Result<f64> {
    let roles = RoleMap::resolve(table);
    let field_name = roles.require(ColumnRole::Field)?;
    let moment_name = roles.require(ColumnRole::Moment)?;

    // Names came from the table, so the columns exist
    let field = table
        .column(field_name)
        .ok_or(TableError::MissingColumn(ColumnRole::Field))?;
    let moment = table
        .column(moment_name)
        .ok_or(TableError::MissingColumn(ColumnRole::Moment))?;

    let (curve1, curve2) = split_loop(&field.values, &moment.values)?;

    Ok(area_between_curves(&curve1, &curve2))
}

/// Arithmetic mean of the temperature column.
///
/// Fails with `MissingColumn` if no temperature column is recognized and
/// `EmptyInput` if the table has no rows.
pub fn temperature_average(table: &DataTable) -> Result<f64> {
    let roles = RoleMap::resolve(table);
    let name = roles.require(ColumnRole::Temperature)?;
    let col = table
        .column(name)
        .ok_or(TableError::MissingColumn(ColumnRole::Temperature))?;

    if col.values.is_empty() {
        return Err(HysteresisError::EmptyInput);
    }

    Ok(col.values.iter().sum::<f64>() / col.values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Column;

    fn table(columns: &[(&str, &[f64])]) -> DataTable {
        DataTable {
            columns: columns
                .iter()
                .map(|(name, values)| Column {
                    name: name.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_trapezoid_linear() {
        // y = x over [0, 2]: integral is 2
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 1.0, 2.0];
        assert!((trapezoid(&y, &x) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_trapezoid_descending_x_is_signed() {
        let x = vec![2.0, 1.0, 0.0];
        let y = vec![2.0, 1.0, 0.0];
        assert!((trapezoid(&y, &x) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_loop_synthetic() {
        // Loop starting and ending at the field minimum
        let x = vec![0.0, 1.0, 2.0, 1.0, 0.0];
        let y = vec![0.0, 1.0, 0.0, -1.0, 0.0];

        let (curve1, curve2) = split_loop(&x, &y).unwrap();

        // Minimum is at index 0, so curve1 degenerates to one sample
        assert_eq!(curve1.len(), 1);
        assert_eq!(curve2.len(), 5);

        // Endpoints match after closure-forcing
        assert_eq!(curve1.x[0], curve2.x[curve2.len() - 1]);
        assert_eq!(curve1.y[0], curve2.y[curve2.len() - 1]);
    }

    #[test]
    fn test_split_loop_descending_then_ascending() {
        // Typical sweep: +max -> -max -> +max
        let x = vec![2.0, 1.0, 0.0, -1.0, -2.0, -1.0, 0.0, 1.0, 2.0];
        let y = vec![1.0, 0.9, 0.5, -0.5, -1.0, -0.9, -0.5, 0.5, 1.0];

        let (curve1, curve2) = split_loop(&x, &y).unwrap();

        assert_eq!(curve1.len(), 5);
        assert_eq!(curve2.len(), 5);

        // Both branches share the minimum sample and the peak endpoint
        assert_eq!(curve1.x[curve1.len() - 1], curve2.x[0]);
        assert_eq!(curve1.x[0], curve2.x[curve2.len() - 1]);
        assert_eq!(curve1.y[0], curve2.y[curve2.len() - 1]);
    }

    #[test]
    fn test_split_loop_forces_closure_on_short_branch() {
        // Ascending branch stops short of the starting field
        let x = vec![2.0, 0.0, -2.0, 0.0, 1.5];
        let y = vec![1.0, 0.5, -1.0, -0.5, 0.8];

        let (curve1, curve2) = split_loop(&x, &y).unwrap();

        // curve2's peak (1.5) is below curve1's (2.0), so curve2's last
        // sample is overwritten with curve1's first
        assert_eq!(curve2.x[curve2.len() - 1], 2.0);
        assert_eq!(curve2.y[curve2.len() - 1], 1.0);
        assert_eq!(curve1.x[0], 2.0);
    }

    #[test]
    fn test_split_loop_empty() {
        let result = split_loop(&[], &[]);
        assert!(matches!(result, Err(HysteresisError::EmptyInput)));
    }

    #[test]
    fn test_area_identical_curves_is_zero() {
        let curve = Curve {
            x: vec![0.0, 1.0, 2.0],
            y: vec![-1.0, 0.5, 1.0],
        };
        assert_eq!(area_between_curves(&curve, &curve.clone()), 0.0);
    }

    #[test]
    fn test_area_between_offset_curves() {
        // Two constant curves over [0, 2], separated by 1 after shifting:
        // both shift to y=0, so the difference vanishes by construction
        let low = Curve {
            x: vec![0.0, 2.0],
            y: vec![0.0, 0.0],
        };
        let high = Curve {
            x: vec![0.0, 2.0],
            y: vec![1.0, 1.0],
        };
        assert_eq!(area_between_curves(&low, &high), 0.0);

        // A branch with extra lobe area shows up in the difference
        let bulged = Curve {
            x: vec![0.0, 1.0, 2.0],
            y: vec![0.0, 1.0, 0.0],
        };
        assert!((area_between_curves(&low, &bulged) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hysteresis_area_open_loop() {
        // Descending branch near m=+1, ascending branch at m=-1. Closure
        // forcing pins curve2's last sample to curve1's start (y=1), so
        // curve1 shifts to [2, 2, 0] over x = [2, 0, -2] (|integral| = 6)
        // and curve2 shifts to [0, 0, 2] over x = [-2, 0, 2] (|integral| = 2)
        let t = table(&[
            ("B", &[2.0, 0.0, -2.0, 0.0, 2.0][..]),
            ("m", &[1.0, 1.0, -1.0, -1.0, -1.0][..]),
        ]);
        let area = hysteresis_area(&t).unwrap();
        assert!((area - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_hysteresis_area_missing_moment() {
        let t = table(&[("B", &[1.0, 0.0][..])]);
        let result = hysteresis_area(&t);
        assert!(matches!(
            result,
            Err(HysteresisError::Table(TableError::MissingColumn(
                ColumnRole::Moment
            )))
        ));
    }

    #[test]
    fn test_temperature_average() {
        let t = table(&[("T", &[290.0, 300.0, 310.0][..])]);
        assert_eq!(temperature_average(&t).unwrap(), 300.0);
    }

    #[test]
    fn test_temperature_average_missing_column() {
        let t = table(&[("B", &[1.0][..]), ("m", &[1.0][..])]);
        assert!(matches!(
            temperature_average(&t),
            Err(HysteresisError::Table(TableError::MissingColumn(
                ColumnRole::Temperature
            )))
        ));
    }

    #[test]
    fn test_temperature_average_empty() {
        let t = table(&[("T", &[][..])]);
        assert!(matches!(
            temperature_average(&t),
            Err(HysteresisError::EmptyInput)
        ));
    }

    #[test]
    fn test_nan_propagates_through_area() {
        let x = vec![2.0, 0.0, -2.0, 0.0, 2.0];
        let y = vec![1.0, f64::NAN, -1.0, -0.5, 1.0];

        // The NaN lands in curve1's branch and survives shifting and
        // integration
        let (curve1, curve2) = split_loop(&x, &y).unwrap();
        let area = area_between_curves(&curve1, &curve2);
        assert!(area.is_nan());
    }
}
