use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Display the contained value or "all" when unset
    ///
    /// Optional timestep and cell filters read more naturally in log messages
    /// this way, since `None` means no restriction.
    ///
    /// ```rust
    /// # use artistools_utils::OptionExt;
    /// let timestep: Option<usize> = Some(12);
    /// assert_eq!(timestep.display(), "12");
    ///
    /// let timestep: Option<usize> = None;
    /// assert_eq!(timestep.display(), "all");
    /// ```
    fn display(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "all".to_string(),
        }
    }
}
