//! LaTeX labels for level configurations and terms

// crate modules
use crate::error::Result;

// external crates
use artistools_utils::f;
use regex::Regex;

/// Split keeping single-letter separators, like a capturing split
fn split_keep_letters(term: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for (i, c) in term.char_indices() {
        if c == '_' || c.is_ascii_alphabetic() {
            pieces.push(&term[last..i]);
            pieces.push(&term[i..i + c.len_utf8()]);
            last = i + c.len_utf8();
        }
    }
    pieces.push(&term[last..]);
    pieces.retain(|p| !p.is_empty());
    pieces
}

/// Typeset a term symbol such as `a6Dd[7/2]` as `$^{6}$D$_{7/2}$`
///
/// ```rust
/// # use artistools_atomic::texifyterm;
/// assert_eq!(texifyterm("3Po"), "$^{3}$P$^{\\rm o}$");
/// assert_eq!(texifyterm("a6Dd[7/2]"), "$^{6}$D$_{7/2}$");
/// ```
pub fn texifyterm(strterm: &str) -> String {
    let starts_digit = |s: &str| s.starts_with(|c: char| c.is_ascii_digit());

    let mut strtermtex = String::new();
    let mut passed_term_lchar = false;

    for termpiece in split_keep_letters(strterm) {
        if starts_digit(termpiece) && !passed_term_lchar {
            strtermtex += &f!("$^{{{termpiece}}}$");
        } else if termpiece.starts_with(|c: char| c.is_ascii_uppercase()) {
            strtermtex += termpiece;
            passed_term_lchar = true;
        } else if termpiece.starts_with(['e', 'o']) && passed_term_lchar {
            if termpiece != "e" {
                strtermtex += &f!("$^{{\\rm {termpiece}}}$");
            }
        } else if termpiece.contains(']') {
            let (prefix, _) = termpiece.split_once('[').unwrap_or((termpiece, ""));
            let j = termpiece
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_matches(['[', ']']);
            strtermtex += &f!("{prefix}$_{{{j}}}$");
        } else if starts_digit(termpiece) && passed_term_lchar {
            strtermtex += termpiece;
        }
    }

    strtermtex.replace("$$", "")
}

/// Typeset a full level name such as `3d6(5D)4s_a6Dd[7/2]`
///
/// ```rust
/// # use artistools_atomic::texifyconfiguration;
/// assert_eq!(
///     texifyconfiguration("3d6(5D)4s_a6Dd[7/2]").unwrap(),
///     "3d$^{6}$($^{5}$D)4s $^{6}$D$_{7/2}$"
/// );
/// ```
pub fn texifyconfiguration(levelname: &str) -> Result<String> {
    let orbital = Regex::new(r"[0-9][a-z][0-9]?[#(]")?;
    let parent_term = Regex::new(r"\([0-9][A-Z][^)]?\)")?;

    let (configuration, strterm) = match levelname.rsplit_once('_') {
        Some((configuration, strterm)) => (configuration.replace('_', "#"), strterm),
        None => (String::new(), levelname),
    };
    let mut strout = configuration + "#";

    let orbitals = orbital
        .find_iter(&strout)
        .map(|m| m.as_str().to_string())
        .collect::<Vec<String>>();
    for strorbitalocc in orbitals {
        let mut chars = strorbitalocc.chars();
        let (Some(n), Some(lchar)) = (chars.next(), chars.next()) else {
            continue;
        };
        let occ = chars.as_str();
        let lastchar = match occ.ends_with('(') {
            true => '(',
            false => '#',
        };
        let occ = occ.trim_end_matches(['#', '(']);
        let occtex = match occ.is_empty() {
            true => String::new(),
            false => f!("$^{{{occ}}}$"),
        };
        strout = strout.replace(&strorbitalocc, &f!("{n}{lchar}{occtex}{lastchar}"));
    }

    let parents = parent_term
        .find_iter(&strout)
        .map(|m| m.as_str().to_string())
        .collect::<Vec<String>>();
    for parentterm in parents {
        let inner = &parentterm[1..parentterm.len() - 1];
        strout = strout.replace(&parentterm, &f!("({})", texifyterm(inner)));
    }

    strout += &f!(" {}", texifyterm(strterm));
    Ok(strout.replace('#', "").replace("$$", ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5D", "$^{5}$D")]
    #[case("4Fe", "$^{4}$F")]
    #[case("3Po", "$^{3}$P$^{\\rm o}$")]
    #[case("a6Dd[7/2]", "$^{6}$D$_{7/2}$")]
    #[case("2S", "$^{2}$S")]
    fn terms(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(texifyterm(term), expected);
    }

    #[test]
    fn pieces_keep_separators() {
        assert_eq!(split_keep_letters("a6Dd[7/2]"), vec!["a", "6", "D", "d", "[7/2]"]);
    }

    #[test]
    fn configuration_without_parent() {
        assert_eq!(
            texifyconfiguration("3d7_4Fe").unwrap(),
            "3d$^{7}$ $^{4}$F"
        );
    }
}
