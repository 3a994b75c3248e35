//! Preprocessor definitions from the ARTIS source headers

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};

// external crates
use log::debug;
use regex::Regex;

/// Read `#define NAME body` macros from a C source or header file
///
/// Continuation lines ending in `\` are joined and comments are removed from
/// the body.
pub fn parse_cdefines<P: AsRef<Path>>(srcfilepath: P) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(srcfilepath.as_ref())?;
    parse_cdefines_str(&text)
}

/// Read `#define` macros from C source text, see [parse_cdefines]
pub fn parse_cdefines_str(text: &str) -> Result<BTreeMap<String, String>> {
    let p_define = Regex::new(r"^[\t ]*#[\t ]*define[\t ]+([a-zA-Z0-9_]+)")?;
    let p_comment = Regex::new(r"/\*([^*]+|\*+[^/])*(\*+/)?")?;
    let p_cpp_comment = Regex::new(r"//.*")?;

    let mut definedict = BTreeMap::new();
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let Some(captures) = p_define.captures(line) else {
            continue;
        };

        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        // gobble up continuation lines
        let mut body = line[whole.end()..].to_string();
        while let Some(stripped) = body.strip_suffix('\\') {
            body = stripped.to_string();
            match lines.next() {
                Some(nextline) => {
                    body.push(' ');
                    body.push_str(nextline);
                }
                None => break,
            }
        }

        let body = p_comment.replace_all(&body, " ");
        let body = p_cpp_comment.replace_all(&body, " ");
        definedict.insert(name.as_str().to_string(), body.trim().to_string());
    }

    Ok(definedict)
}

/// Options set as macros in `artisoptions.h` of the ARTIS source
///
/// The source folder defaults to `artis` inside the model folder.
pub fn get_artis_constants(
    modelpath: Option<&Path>,
    srcpath: Option<&Path>,
) -> Result<BTreeMap<String, String>> {
    let srcpath = match (srcpath, modelpath) {
        (Some(srcpath), _) => srcpath.to_path_buf(),
        (None, Some(modelpath)) => modelpath.join("artis"),
        (None, None) => return Err(Error::MissingSourcePath),
    };

    let mut definedict = BTreeMap::from([
        ("true".to_string(), "true".to_string()),
        ("false".to_string(), "false".to_string()),
    ]);

    for filename in ["artisoptions.h"] {
        let filepath = srcpath.join(filename);
        debug!("Reading {}", filepath.display());
        definedict.extend(parse_cdefines(filepath)?);
    }

    Ok(definedict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_with_comments_and_continuations() {
        let text = "\
#pragma once
#define MPKTS 1000000  // packets per rank
  # define TRACK_ION_STATS false
#define LONG_MACRO (1 + \\
    2) /* two lines */
int x = 3;
";
        let defines = parse_cdefines_str(text).unwrap();
        assert_eq!(defines["MPKTS"], "1000000");
        assert_eq!(defines["TRACK_ION_STATS"], "false");
        assert_eq!(defines["LONG_MACRO"], "(1 +      2)");
        assert_eq!(defines.len(), 3);
    }

    #[test]
    fn source_path_is_required() {
        assert!(matches!(
            get_artis_constants(None, None),
            Err(Error::MissingSourcePath)
        ));
    }
}
