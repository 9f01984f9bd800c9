//! "Did you mean" matching.
//!
//! The dispatcher accepts prefixes in either direction; filesystem lookups
//! only suggest names that prefix the missing one.

/// Find the best candidate for a mistyped `target`.
///
/// A case-insensitive exact match wins. Otherwise the first candidate (in the
/// order given) that is a case-insensitive prefix of the target, or that the
/// target is a prefix of, is returned. An empty target never matches.
pub fn best_match<'a, I>(target: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    find_match(target, candidates, true)
}

/// Like [`best_match`], but a candidate only matches when it is a prefix of
/// the target (`documentsx` finds `documents`, `doc` finds nothing).
pub fn prefix_match<'a, I>(target: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    find_match(target, candidates, false)
}

fn find_match<'a, I>(target: &str, candidates: I, either_way: bool) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if target.is_empty() {
        return None;
    }

    let target_lower = target.to_lowercase();
    let mut found = None;

    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        let candidate_lower = candidate.to_lowercase();
        if candidate_lower == target_lower {
            return Some(candidate);
        }
        if found.is_none()
            && (target_lower.starts_with(&candidate_lower)
                || (either_way && candidate_lower.starts_with(&target_lower)))
        {
            found = Some(candidate);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_exact_wins() {
        let names = ["helper", "help"];
        assert_eq!(best_match("HELP", names), Some("help"));
    }

    #[test]
    fn test_prefix_either_direction() {
        assert_eq!(best_match("doc", ["documents"]), Some("documents"));
        assert_eq!(best_match("documentsx", ["documents"]), Some("documents"));
    }

    #[test]
    fn test_prefix_match_is_one_way() {
        assert_eq!(prefix_match("doc", ["documents"]), None);
        assert_eq!(prefix_match("documentsx", ["documents"]), Some("documents"));
        assert_eq!(prefix_match("DOCUMENTS", ["documents"]), Some("documents"));
        assert_eq!(prefix_match("", ["documents"]), None);
    }

    #[test]
    fn test_first_prefix_in_order() {
        assert_eq!(best_match("c", ["cd", "cat"]), Some("cd"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(best_match("xyzzy", ["ls", "cd", "help"]), None);
        assert_eq!(best_match("", ["ls"]), None);
    }
}
