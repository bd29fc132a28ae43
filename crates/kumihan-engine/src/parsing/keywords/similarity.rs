//! Ratcliff/Obershelp string similarity over characters.

/// Similarity in `[0.0, 1.0]`: twice the number of matching characters
/// divided by the total number of characters.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Counts characters in recursively found longest common blocks.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let Some((i, j, len)) = longest_common_block(a, b) else {
        return 0;
    };
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Leftmost longest common substring as `(start_a, start_b, len)`.
fn longest_common_block(a: &[char], b: &[char]) -> Option<(usize, usize, usize)> {
    let mut best = (0, 0, 0);
    // cur[j + 1] is the length of the common run ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                cur[j + 1] = prev[j] + 1;
                if cur[j + 1] > best.2 {
                    best = (i + 1 - cur[j + 1], j + 1 - cur[j + 1], cur[j + 1]);
                }
            }
        }
        prev = cur;
    }
    (best.2 > 0).then_some(best)
}

/// Candidates scoring at least `cutoff`, best first, at most `max`.
///
/// Ties keep the candidates' original order.
pub fn close_matches<'a>(
    word: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max: usize,
    cutoff: f64,
) -> Vec<&'a str> {
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|c| (ratio(word, c), c))
        .filter(|(score, _)| *score >= cutoff)
        .collect();
    scored.sort_by(|x, y| y.0.total_cmp(&x.0));
    scored.into_iter().take(max).map(|(_, c)| c).collect()
}
