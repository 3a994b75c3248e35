use crate::error::{Error, Result};

// external crates
use itertools::Itertools;

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use artistools_utils::SliceExt;
    /// # use artistools_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1_f64, 0.5, 2.2].try_min(), Ok(0.5));
    /// assert_eq!([1.1_f64, f64::MIN, 2.2].try_min(), Ok(f64::MIN));
    ///
    /// // Error cases
    /// assert_eq!([1.1_f64, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// Uses `total_cmp` to always produce an ordering in accordance to the
    /// totalOrder predicate as defined in the IEEE 754 (2008 revision)
    /// floating point standard.
    fn try_min(&self) -> Result<T>;

    /// Find the maximum value in float arrays
    ///
    /// Only provides the maximum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use artistools_utils::SliceExt;
    /// # use artistools_utils::Error;
    /// assert_eq!([1.1_f64, 0.5, 2.2].try_max(), Ok(2.2));
    /// assert_eq!([1.1_f64, f64::INFINITY, 2.2].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// ```
    fn try_max(&self) -> Result<T>;

    /// Find index bin containing 'value', where bins are low <= value < high
    ///
    /// A value on a bin edge returns the bin above. Values equal to the highest
    /// bound are considered part of the last bin.
    ///
    /// ```rust
    /// # use artistools_utils::SliceExt;
    /// let bounds: Vec<f64> = vec![0.0, 0.1, 1.0, 20.0];
    ///
    /// assert_eq!(bounds.find_bin_exclusive(0.0 ), Ok(0));
    /// assert_eq!(bounds.find_bin_exclusive(0.5 ), Ok(1));
    /// assert_eq!(bounds.find_bin_exclusive(1.0 ), Ok(2));
    /// assert_eq!(bounds.find_bin_exclusive(20.0), Ok(2));
    ///
    /// // Values outside the bin bounds are an error case
    /// assert!(bounds.find_bin_exclusive(-1.0).is_err());
    /// assert!(bounds.find_bin_exclusive(21.0).is_err());
    /// ```
    fn find_bin_exclusive(&self, value: T) -> Result<usize>;

    /// Integrate `self` over the sample points `x` with the trapezoidal rule
    ///
    /// ```rust
    /// # use artistools_utils::SliceExt;
    /// let y = [1.0_f64, 2.0, 3.0];
    /// let x = [0.0, 1.0, 2.0];
    /// assert_eq!(y.trapz(&x), Ok(4.0));
    /// ```
    fn trapz(&self, x: &[T]) -> Result<T>;

    /// Linear interpolation of `values` sampled at the ascending points in
    /// `self`, returning `fill` outside of the sampled range
    ///
    /// ```rust
    /// # use artistools_utils::SliceExt;
    /// let x = [0.0_f64, 10.0, 20.0];
    /// let y = [0.0, 1.0, 0.0];
    /// assert_eq!(x.interp(5.0, &y, 0.0), 0.5);
    /// assert_eq!(x.interp(25.0, &y, 0.0), 0.0);
    /// ```
    fn interp(&self, value: T, values: &[T], fill: T) -> T;

    /// Indices that would sort the slice in ascending order
    ///
    /// ```rust
    /// # use artistools_utils::SliceExt;
    /// assert_eq!([3.0_f64, 1.0, 2.0].argsort(), vec![1, 2, 0]);
    /// ```
    fn argsort(&self) -> Vec<usize>;
}

impl SliceExt<f64> for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .min_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .max_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn find_bin_exclusive(&self, value: f64) -> Result<usize> {
        // make sure there are bin edges to check against
        let n = self.len();
        let (Some(lower_bound), Some(upper_bound)) = (self.first(), self.last()) else {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        };

        if n < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        }

        // is the value relevant?
        if &value < lower_bound || &value > upper_bound {
            return Err(Error::ValueOutsideOfBounds {
                value,
                lower_bound: *lower_bound,
                upper_bound: *upper_bound,
            });
        }

        // special case for being on the upper edge
        if &value == upper_bound {
            return Ok(n - 2);
        }

        self.iter()
            .tuple_windows()
            .position(|(low, high)| low <= &value && &value < high)
            .ok_or(Error::UncapturedErrorCondition)
    }

    fn trapz(&self, x: &[f64]) -> Result<f64> {
        if self.len() != x.len() {
            return Err(Error::MismatchedSliceLengths {
                left: self.len(),
                right: x.len(),
            });
        }

        Ok(self
            .iter()
            .zip(x.iter())
            .tuple_windows()
            .map(|((y0, x0), (y1, x1))| 0.5 * (y0 + y1) * (x1 - x0))
            .sum())
    }

    fn interp(&self, value: f64, values: &[f64], fill: f64) -> f64 {
        match self.find_bin_exclusive(value) {
            Ok(i) if i + 1 < values.len() => {
                let (x0, x1) = (self[i], self[i + 1]);
                let (y0, y1) = (values[i], values[i + 1]);
                if x1 == x0 {
                    y0
                } else {
                    y0 + (y1 - y0) * (value - x0) / (x1 - x0)
                }
            }
            _ => fill,
        }
    }

    fn argsort(&self) -> Vec<usize> {
        (0..self.len())
            .sorted_by(|&a, &b| self[a].total_cmp(&self[b]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapz_needs_matching_lengths() {
        let result = [1.0_f64, 2.0].trapz(&[0.0]);
        assert_eq!(
            result,
            Err(Error::MismatchedSliceLengths { left: 2, right: 1 })
        );
    }

    #[test]
    fn interp_at_sample_points() {
        let x = [1.0_f64, 2.0, 4.0];
        let y = [10.0, 20.0, 40.0];
        assert_eq!(x.interp(1.0, &y, -1.0), 10.0);
        assert_eq!(x.interp(3.0, &y, -1.0), 30.0);
        assert_eq!(x.interp(0.5, &y, -1.0), -1.0);
    }

    #[test]
    fn single_edge_is_not_a_bin() {
        assert!([1.0_f64].find_bin_exclusive(1.0).is_err());
    }
}
