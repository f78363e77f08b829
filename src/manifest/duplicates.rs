use std::collections::HashSet;

/// Returns every value that recurs in `items`, once per repeated occurrence.
///
/// Comparison is exact (case-sensitive). A value seen three times is reported
/// twice, in the order the repeats appear.
pub fn find_duplicates<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for item in items {
        let item = item.as_ref();
        if !seen.insert(item.to_string()) {
            duplicates.push(item.to_string());
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_repeat() {
        assert_eq!(find_duplicates(["a", "b", "a"]), vec!["a"]);
    }

    #[test]
    fn test_no_repeats() {
        assert!(find_duplicates(["a", "b", "c"]).is_empty());
        assert!(find_duplicates(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_filenames_with_extensions() {
        assert_eq!(
            find_duplicates(["a.jpg", "b.png", "c.png", "a.jpg"]),
            vec!["a.jpg"]
        );
    }

    #[test]
    fn test_multiplicity_is_kept() {
        assert_eq!(find_duplicates(["a", "a", "a"]), vec!["a", "a"]);
        assert_eq!(
            find_duplicates(["x", "y", "x", "y", "x"]),
            vec!["x", "y", "x"]
        );
    }

    #[test]
    fn test_case_sensitive() {
        assert!(find_duplicates(["a.jpg", "A.JPG", "_b.png", "c.PNG"]).is_empty());
    }
}
