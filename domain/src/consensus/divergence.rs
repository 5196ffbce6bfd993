//! Textual divergence between proposal versions
//!
//! Similarity is the Ratcliff/Obershelp ratio over characters: find the
//! longest common block, recurse on both sides of it, and report
//! `2 * matched / (len_a + len_b)`.

use std::collections::HashMap;

/// Similarity ratio in `[0, 1]`; two empty strings are identical
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// `1 - similarity_ratio`, clamped into `[0, 1]`
pub fn divergence(a: &str, b: &str) -> f64 {
    (1.0 - similarity_ratio(a, b)).clamp(0.0, 1.0)
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b_index.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b_index, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }
    matched
}

/// Longest common block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`, earliest
/// in `a` on ties
fn longest_match(
    a: &[char],
    b_index: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);
    // run length of the match ending at b[j], for the previous row of a
    let mut run_at: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_run = HashMap::new();
        if let Some(positions) = b_index.get(c) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let size = j
                    .checked_sub(1)
                    .and_then(|prev| run_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        run_at = next_run;
    }
    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_texts() {
        assert!(approx(similarity_ratio("同一政策文本", "同一政策文本"), 1.0));
        assert!(approx(divergence("same", "same"), 0.0));
    }

    #[test]
    fn test_disjoint_texts() {
        assert!(approx(divergence("abcd", "wxyz"), 1.0));
        assert!(divergence("关税减免", "carbon credits") > 0.95);
    }

    #[test]
    fn test_overlapping_block() {
        assert!(approx(similarity_ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn test_recurses_on_both_sides() {
        // "ab" and "de" match around the differing middle
        assert!(approx(similarity_ratio("abXde", "abYde"), 0.8));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(approx(similarity_ratio("", ""), 1.0));
        assert!(approx(similarity_ratio("abc", ""), 0.0));
        assert!(approx(divergence("", "abc"), 1.0));
    }

    #[test]
    fn test_multibyte_counts_chars() {
        // 4 chars each, 3 shared in one block
        assert!(approx(similarity_ratio("降低关税", "降低关卡"), 0.75));
    }
}
