/// Extension trait for reordering slices in-place by a gather index
pub trait SortExt<T> {
    /// Reorder so that `self[i]` becomes the old `self[indices[i]]`
    ///
    /// Used with the output of `argsort()` to reorder several paired columns
    /// consistently. The `indices` are consumed in the process.
    ///
    /// ```rust
    /// # use artistools_utils::{SliceExt, SortExt};
    /// let wavelengths = [300.0_f64, 100.0, 200.0];
    /// let mut fluxes = vec!['c', 'a', 'b'];
    /// fluxes.sort_by_index(&mut wavelengths.argsort());
    /// assert_eq!(fluxes, vec!['a', 'b', 'c']);
    /// ```
    fn sort_by_index(&mut self, indices: &mut [usize]);
}

impl<T> SortExt<T> for [T] {
    fn sort_by_index(&mut self, indices: &mut [usize]) {
        for idx in 0..self.len() {
            if indices[idx] == usize::MAX {
                continue;
            }

            // follow each permutation cycle once
            let mut current_idx = idx;
            loop {
                let target_idx = indices[current_idx];
                indices[current_idx] = usize::MAX;
                if indices[target_idx] == usize::MAX {
                    break;
                }
                self.swap(current_idx, target_idx);
                current_idx = target_idx;
            }
        }
    }
}
