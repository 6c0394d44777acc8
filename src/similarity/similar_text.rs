//! Longest-common-substring similarity percentage.
//!
//! The classic recursive algorithm: find the longest common substring, then
//! recurse on the text to its left and to its right, summing the matched
//! lengths. The percentage is `matched * 200 / (len_a + len_b)`, so two
//! identical strings score 100 and two disjoint strings score 0.

/// Similarity between two strings as a percentage in `0.0..=100.0`.
///
/// Operates on characters, not bytes, so multi-byte input never splits a
/// code point. Case-sensitive; fold case first for case-blind comparison.
pub fn similar_text_percent(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let matched = matched_chars(&a, &b);
    (matched * 200) as f64 / total as f64
}

/// Total characters matched by the recursive longest-common-substring
/// decomposition.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let (pos_a, pos_b, max) = longest_common(a, b);
    if max == 0 {
        return 0;
    }
    let mut sum = max;
    sum += matched_chars(&a[..pos_a], &b[..pos_b]);
    sum += matched_chars(&a[pos_a + max..], &b[pos_b + max..]);
    sum
}

/// Position and length of the longest common substring. Ties resolve to the
/// earliest position in `a`, then in `b`, which keeps the score
/// deterministic.
fn longest_common(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let (mut pos_a, mut pos_b, mut max) = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut k = 0;
            while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
                k += 1;
            }
            if k > max {
                pos_a = i;
                pos_b = j;
                max = k;
            }
        }
    }
    (pos_a, pos_b, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similar_text_percent("duplicate", "duplicate"), 100.0);
        assert_eq!(similar_text_percent("", ""), 100.0);
    }

    #[test]
    fn disjoint_strings_score_0() {
        assert_eq!(similar_text_percent("abc", "xyz"), 0.0);
    }

    #[test]
    fn empty_against_non_empty_scores_0() {
        assert_eq!(similar_text_percent("", "abc"), 0.0);
    }

    #[test]
    fn world_against_word_matches_the_classic_algorithm() {
        // longest common "wor" (3), then "d" from the tails: 4 of 9 chars,
        // 4 * 200 / 9.
        let pct = similar_text_percent("world", "word");
        assert!((pct - 800.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn case_matters_until_the_caller_folds() {
        assert!(similar_text_percent("World", "world") < 100.0);
        assert_eq!(similar_text_percent("world", "world"), 100.0);
    }

    #[test]
    fn multibyte_input_is_compared_per_char() {
        assert_eq!(similar_text_percent("été", "été"), 100.0);
        // one char of three differs: "étè" keeps "ét" and nothing after.
        let pct = similar_text_percent("été", "étè");
        assert!((pct - 400.0 / 6.0).abs() < 1e-9);
    }
}
