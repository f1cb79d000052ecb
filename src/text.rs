//! Small string helpers shared by the config parsers and path builders.

/// Count non-overlapping occurrences of `needle` in `haystack`.
///
/// The search moves forward past each match, so `"aaa"` contains one
/// `"aa"`, not two. An empty needle never matches.
///
/// # Examples
///
/// ```
/// use multihome::text::count_occurrences;
///
/// assert_eq!(count_occurrences("one two three", " "), 2);
/// assert_eq!(count_occurrences("a::b::c", "::"), 2);
/// assert_eq!(count_occurrences("abc", "x"), 0);
/// ```
#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Split `haystack` on every occurrence of `delimiter`.
///
/// Behaves like shell field splitting on a fixed separator: the result always
/// has `count_occurrences(haystack, delimiter) + 1` fields, and empty
/// leading, trailing or adjacent fields are kept as empty strings.
///
/// # Examples
///
/// ```
/// use multihome::text::split_on;
///
/// assert_eq!(split_on("one two three", " "), ["one", "two", "three"]);
/// assert_eq!(split_on("/usr/local", "/"), ["", "usr", "local"]);
/// assert_eq!(split_on("nothing", ","), ["nothing"]);
/// ```
#[must_use]
pub fn split_on(haystack: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        return vec![haystack.to_string()];
    }
    let mut fields = Vec::with_capacity(count_occurrences(haystack, delimiter) + 1);
    fields.extend(haystack.split(delimiter).map(String::from));
    fields
}
