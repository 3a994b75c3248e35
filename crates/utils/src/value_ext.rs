use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Scientific number formatting with a signed, padded exponent
    ///
    /// Rust's `{:e}` formatting drops the exponent sign and padding, whereas
    /// most ARTIS and comparison file formats expect values like `1.23e+04`.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    ///
    /// ```rust
    /// # use artistools_utils::ValueExt;
    /// assert_eq!(12345.0_f64.sci(2, 2), "1.23e+04".to_string());
    /// assert_eq!((-1.0_f64).sci(4, 2), "-1.0000e+00".to_string());
    /// assert_eq!(2.5e-30_f64.sci(1, 2), "2.5e-30".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", &self, precision = precision);
        let (mantissa, exp) = formatted
            .split_once('e')
            .unwrap_or((formatted.as_str(), "0"));

        // make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix('-') {
            Some(exp) => ('-', exp),
            None => ('+', exp),
        };

        f!("{mantissa}e{sign}{exp:0>exp_pad$}")
    }
}
