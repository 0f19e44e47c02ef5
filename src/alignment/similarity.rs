//! Ratcliff/Obershelp "gestalt pattern matching" similarity.
//!
//! Matches Python's `difflib.SequenceMatcher(None, a, b).ratio()` for inputs
//! short enough that difflib's auto-junk heuristic never triggers (anything
//! word-sized). Longest-block ties resolve to the leftmost block in `a`, then
//! the leftmost in `b`, so `ratio(a, b)` and `ratio(b, a)` can differ on some
//! inputs in the same way difflib's results do.

/// Similarity in `[0, 1]`: `2 * matched_chars / (len(a) + len(b))`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_char_count(&a, &b);
    2.0 * matched as f64 / total as f64
}

fn matching_char_count(a: &[char], b: &[char]) -> usize {
    let mut matched = 0usize;
    let mut pending = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0usize);
    // run[j + 1 - blo] = length of the common suffix ending at a[i], b[j].
    let width = bhi.saturating_sub(blo) + 1;
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];
    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j + 1 - blo;
            if a[i] == b[j] {
                let k = prev[slot - 1] + 1;
                cur[slot] = k;
                if k > best_len {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_len = k;
                }
            } else {
                cur[slot] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (best_i, best_j, best_len)
}
