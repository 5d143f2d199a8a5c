//! Line-oriented diffing for multi-line values

use serde::Serialize;

/// Classification of a single diffed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineTag {
    /// Line is identical on both sides
    Unchanged,
    /// Line only exists on the after side
    Added,
    /// Line only exists on the before side
    Removed,
}

/// One line of diff output, without its trailing newline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiffEntry {
    pub tag: LineTag,
    pub text: String,
}

impl LineDiffEntry {
    fn new(tag: LineTag, text: &str) -> Self {
        Self {
            tag,
            text: text.to_string(),
        }
    }
}

/// Split text into lines, normalizing `\r\n` and `\r` to `\n` first.
pub fn split_lines(value: &str) -> Vec<String> {
    value
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::to_string)
        .collect()
}

/// Compute a line-level diff between two multi-line texts.
///
/// Common lines are anchored with a longest-common-subsequence pairing.
/// Around each anchor, remaining before-lines are emitted as `Removed`
/// (in original order) followed by remaining after-lines as `Added`
/// (in original order). A line is only ever reported `Unchanged` when it
/// is byte-identical on both sides.
pub fn diff_lines(before: &str, after: &str) -> Vec<LineDiffEntry> {
    let before_lines = split_lines(before);
    let after_lines = split_lines(after);
    build_line_diff(&before_lines, &after_lines)
}

pub(crate) fn build_line_diff(before: &[String], after: &[String]) -> Vec<LineDiffEntry> {
    let pairs = compute_lcs_pairs(before, after);
    let mut result = Vec::new();

    let mut before_index = 0;
    let mut after_index = 0;

    for (pair_before, pair_after) in pairs {
        while before_index < pair_before {
            result.push(LineDiffEntry::new(LineTag::Removed, &before[before_index]));
            before_index += 1;
        }

        while after_index < pair_after {
            result.push(LineDiffEntry::new(LineTag::Added, &after[after_index]));
            after_index += 1;
        }

        result.push(LineDiffEntry::new(LineTag::Unchanged, &before[pair_before]));
        before_index += 1;
        after_index += 1;
    }

    while before_index < before.len() {
        result.push(LineDiffEntry::new(LineTag::Removed, &before[before_index]));
        before_index += 1;
    }

    while after_index < after.len() {
        result.push(LineDiffEntry::new(LineTag::Added, &after[after_index]));
        after_index += 1;
    }

    result
}

/// Longest-common-subsequence index pairs between two line slices.
fn compute_lcs_pairs(before: &[String], after: &[String]) -> Vec<(usize, usize)> {
    let m = before.len();
    let n = after.len();
    let mut lengths = vec![vec![0usize; n + 1]; m + 1];

    for i in (0..m).rev() {
        for j in (0..n).rev() {
            if before[i] == after[j] {
                lengths[i][j] = lengths[i + 1][j + 1] + 1;
            } else {
                lengths[i][j] = lengths[i + 1][j].max(lengths[i][j + 1]);
            }
        }
    }

    let mut pairs = Vec::new();
    let mut x = 0;
    let mut y = 0;
    while x < m && y < n {
        if before[x] == after[y] {
            pairs.push((x, y));
            x += 1;
            y += 1;
        } else if lengths[x + 1][y] >= lengths[x][y + 1] {
            x += 1;
        } else {
            y += 1;
        }
    }

    pairs
}
