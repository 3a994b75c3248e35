/// Extends string types with useful functions
pub trait StringExt {
    /// Capilalises the first letter in a string
    ///
    /// ```rust
    /// # use artistools_utils::StringExt;
    /// assert_eq!("test string".capitalise(), "Test string".to_string());
    /// ```
    fn capitalise(&self) -> String;

    /// Upper case first letter and lower case for the rest
    ///
    /// Element symbols are matched in this form, so `FE`, `fe` and `Fe` all
    /// refer to iron.
    ///
    /// ```rust
    /// # use artistools_utils::StringExt;
    /// assert_eq!("FE".titlecase(), "Fe".to_string());
    /// assert_eq!("co".titlecase(), "Co".to_string());
    /// ```
    fn titlecase(&self) -> String;
}

impl<T: AsRef<str>> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
            None => String::new(),
        }
    }

    fn titlecase(&self) -> String {
        self.as_ref().to_lowercase().capitalise()
    }
}
