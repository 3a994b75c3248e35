// standard library
use std::path::{Component, Path};

/// Whether a path refers to a code comparison model rather than a folder
///
/// These are virtual paths of the form `codecomparison/<model>/<code>`.
pub fn is_codecomparison_path<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    !path.exists()
        && matches!(
            path.components().next(),
            Some(Component::Normal(first)) if first == "codecomparison"
        )
}

/// Name of a model, from the path to its folder or any file inside it
///
/// The first line of `plotlabel.txt` is used if it exists, otherwise the name
/// of the folder.
///
/// ```rust
/// # use artistools_model::get_model_name;
/// assert_eq!(get_model_name("codecomparison/ddc10/artisnebular"), "codecomparison/ddc10/artisnebular");
/// ```
pub fn get_model_name<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if is_codecomparison_path(path) {
        return path.display().to_string();
    }

    let abspath = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let modelpath = match abspath.is_dir() {
        true => abspath.as_path(),
        false => abspath.parent().unwrap_or(abspath.as_path()),
    };

    match std::fs::read_to_string(modelpath.join("plotlabel.txt")) {
        Ok(text) => text.lines().next().unwrap_or_default().trim().to_string(),
        Err(_) => modelpath
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_name_or_plot_label() {
        let dir = tempfile::tempdir().unwrap();
        let modelpath = dir.path().join("mymodel");
        std::fs::create_dir(&modelpath).unwrap();
        std::fs::write(modelpath.join("input.txt"), "").unwrap();

        assert_eq!(get_model_name(&modelpath), "mymodel");
        assert_eq!(get_model_name(modelpath.join("input.txt")), "mymodel");

        std::fs::write(modelpath.join("plotlabel.txt"), "  Nice label \nsecond\n").unwrap();
        assert_eq!(get_model_name(&modelpath), "Nice label");
    }
}
