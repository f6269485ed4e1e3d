//! Similarity Scorer: Ratcliff/Obershelp ratio over characters.
//!
//! ratio = 2 × M / (len(a) + len(b)), where M is the number of characters
//! covered by recursively finding the longest common block and repeating on
//! the unmatched text to its left and right.

use std::collections::HashMap;

/// Similarity of `a` and `b` in [0, 1]. Returns 0.0 if either side is empty.
///
/// Inputs are put in a canonical order first, so the result does not depend on
/// argument order even where longest-block tie-breaking would.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let matched = matching_characters(&a, &b);
    (2.0 * matched as f64 / (a.len() + b.len()) as f64).clamp(0.0, 1.0)
}

/// Total size of all matching blocks between `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    // positions of each char in `b`, ascending
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        positions.entry(*c).or_default().push(j);
    }

    let mut rows = RunRows::new(b.len());
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_block(a, &positions, &mut rows, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        total += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    total
}

/// Run lengths of common blocks ending at each `b` position, for the previous
/// and current row of `a`. Index `j + 1` holds the run ending at `b[j]`.
/// Only touched slots are non-zero, and they are reset after each row, so the
/// buffers are allocated once per `ratio` call.
struct RunRows {
    prev: Vec<usize>,
    cur: Vec<usize>,
    prev_touched: Vec<usize>,
    cur_touched: Vec<usize>,
}

impl RunRows {
    fn new(b_len: usize) -> Self {
        Self {
            prev: vec![0; b_len + 1],
            cur: vec![0; b_len + 1],
            prev_touched: Vec::new(),
            cur_touched: Vec::new(),
        }
    }

    /// Moves the current row into `prev` and clears the old previous row.
    fn advance(&mut self) {
        for &k in &self.prev_touched {
            self.prev[k] = 0;
        }
        self.prev_touched.clear();
        std::mem::swap(&mut self.prev, &mut self.cur);
        std::mem::swap(&mut self.prev_touched, &mut self.cur_touched);
    }
}

/// Longest common block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]` as
/// `(start_in_a, start_in_b, len)`. Ties resolve to the earliest block in `a`,
/// then the earliest in `b`.
fn longest_block(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    rows: &mut RunRows,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (a_lo, b_lo, 0);

    for (i, c) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        if let Some(js) = positions.get(c) {
            let from = js.partition_point(|&j| j < b_lo);
            let to = js.partition_point(|&j| j < b_hi);
            for &j in &js[from..to] {
                let len = rows.prev[j] + 1;
                rows.cur[j + 1] = len;
                rows.cur_touched.push(j + 1);
                if len > best_len {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_len = len;
                }
            }
        }
        rows.advance();
    }
    // clear the last row for the next call
    rows.advance();

    (best_i, best_j, best_len)
}
