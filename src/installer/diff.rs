//! Unified diff rendering
//!
//! Produces plain `diff -u` style text: `---`/`+++` headers, `@@` hunk
//! headers and ` `/`-`/`+` prefixed lines with three lines of context.
//! Colorizing is left to the terminal presentation layer.

/// Context lines around each change
const CONTEXT: usize = 3;

/// Largest middle section compared line by line; beyond this the whole
/// middle is reported as replaced
const MAX_LCS_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal(usize, usize),
    Delete(usize),
    Insert(usize),
}

/// Render a unified diff from `old` to `new`, labelling both sides with `label`.
///
/// Returns `None` when the texts have no line-level difference.
pub fn unified_diff(old: &str, new: &str, label: &str) -> Option<String> {
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();

    let ops = diff_lines(&old_lines, &new_lines);
    if ops.iter().all(|op| matches!(op, Op::Equal(..))) {
        return None;
    }

    let mut out = format!("--- a/{label}\n+++ b/{label}\n");
    for (start, end) in hunk_ranges(&ops) {
        render_hunk(&mut out, &ops[start..end], &old_lines, &new_lines);
    }
    Some(out)
}

/// Line-level edit script: common prefix and suffix are matched directly, the
/// middle with a longest-common-subsequence table.
fn diff_lines(old: &[&str], new: &[&str]) -> Vec<Op> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut ops: Vec<Op> = (0..prefix).map(|i| Op::Equal(i, i)).collect();

    let cells = (old_mid.len() + 1).saturating_mul(new_mid.len() + 1);
    if cells <= MAX_LCS_CELLS {
        ops.extend(lcs_ops(old_mid, new_mid, prefix));
    } else {
        ops.extend((0..old_mid.len()).map(|i| Op::Delete(prefix + i)));
        ops.extend((0..new_mid.len()).map(|j| Op::Insert(prefix + j)));
    }

    let old_tail = old.len() - suffix;
    let new_tail = new.len() - suffix;
    ops.extend((0..suffix).map(|k| Op::Equal(old_tail + k, new_tail + k)));
    ops
}

fn lcs_ops(old: &[&str], new: &[&str], offset: usize) -> Vec<Op> {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;
    // table[i * width + j] = LCS length of old[i..] and new[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(Op::Equal(offset + i, offset + j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            ops.push(Op::Delete(offset + i));
            i += 1;
        } else {
            ops.push(Op::Insert(offset + j));
            j += 1;
        }
    }
    ops.extend((i..n).map(|i| Op::Delete(offset + i)));
    ops.extend((j..m).map(|j| Op::Insert(offset + j)));
    ops
}

/// Group changes into hunks, merging changes separated by at most
/// `2 * CONTEXT` unchanged lines. Returns half-open index ranges into `ops`.
fn hunk_ranges(ops: &[Op]) -> Vec<(usize, usize)> {
    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, Op::Equal(..)))
        .map(|(idx, _)| idx)
        .collect();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in changes {
        let start = idx.saturating_sub(CONTEXT);
        let end = (idx + 1 + CONTEXT).min(ops.len());
        match ranges.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => ranges.push((start, end)),
        }
    }
    ranges
}

fn render_hunk(out: &mut String, ops: &[Op], old: &[&str], new: &[&str]) {
    let old_start = ops.iter().find_map(|op| match op {
        Op::Equal(i, _) | Op::Delete(i) => Some(*i),
        Op::Insert(_) => None,
    });
    let new_start = ops.iter().find_map(|op| match op {
        Op::Equal(_, j) | Op::Insert(j) => Some(*j),
        Op::Delete(_) => None,
    });
    let old_len = ops.iter().filter(|op| !matches!(op, Op::Insert(_))).count();
    let new_len = ops.iter().filter(|op| !matches!(op, Op::Delete(_))).count();

    out.push_str(&format!(
        "@@ -{} +{} @@\n",
        hunk_range(old_start, old_len),
        hunk_range(new_start, new_len),
    ));

    for op in ops {
        let (prefix, line) = match *op {
            Op::Equal(i, _) => (' ', old[i]),
            Op::Delete(i) => ('-', old[i]),
            Op::Insert(j) => ('+', new[j]),
        };
        out.push(prefix);
        match line.strip_suffix('\n') {
            Some(body) => {
                out.push_str(body);
                out.push('\n');
            }
            None => {
                out.push_str(line);
                out.push_str("\n\\ No newline at end of file\n");
            }
        }
    }
}

/// Format one side of a hunk header (1-based start, GNU conventions)
fn hunk_range(start: Option<usize>, len: usize) -> String {
    match (start, len) {
        (Some(start), 1) => format!("{}", start + 1),
        (Some(start), len) => format!("{},{}", start + 1, len),
        // A side with no lines at all only happens for an empty file
        (None, _) => "0,0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_diff() {
        assert_eq!(unified_diff("a\nb\n", "a\nb\n", "f"), None);
    }

    #[test]
    fn test_single_line_change() {
        let diff = unified_diff("a\nb\nc\n", "a\nB\nc\n", "f.md").unwrap();
        assert_eq!(
            diff,
            "--- a/f.md\n+++ b/f.md\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n"
        );
    }

    #[test]
    fn test_context_is_limited_to_three_lines() {
        let old = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
        let new = "1\n2\n3\n4\n5\n6\n7\n8\nnine\n";
        let diff = unified_diff(old, new, "f").unwrap();
        assert!(diff.contains("@@ -6,4 +6,4 @@\n 6\n 7\n 8\n-9\n+nine\n"));
        assert!(!diff.contains(" 5\n"));
    }

    #[test]
    fn test_distant_changes_make_two_hunks() {
        let old: String = (1..=20).map(|i| format!("line {i}\n")).collect();
        let new = old
            .replace("line 2\n", "line two\n")
            .replace("line 19\n", "line nineteen\n");
        let diff = unified_diff(&old, &new, "f").unwrap();
        assert_eq!(diff.matches("@@ -").count(), 2);
    }

    #[test]
    fn test_insertion_into_empty_file() {
        let diff = unified_diff("", "hello\n", "f").unwrap();
        assert!(diff.contains("@@ -0,0 +1 @@\n+hello\n"));
    }

    #[test]
    fn test_deletion_to_empty_file() {
        let diff = unified_diff("bye\n", "", "f").unwrap();
        assert!(diff.contains("@@ -1 +0,0 @@\n-bye\n"));
    }

    #[test]
    fn test_missing_trailing_newline_is_marked() {
        let diff = unified_diff("a\n", "a\nb", "f").unwrap();
        assert!(diff.contains("+b\n\\ No newline at end of file\n"));
    }

    #[test]
    fn test_pure_insertion_in_middle() {
        let diff = unified_diff("a\nb\n", "a\nx\nb\n", "f").unwrap();
        assert!(diff.contains("@@ -1,2 +1,3 @@\n a\n+x\n b\n"));
    }

    #[test]
    fn test_large_change_still_renders() {
        let old: String = (0..3000).map(|i| format!("old {i}\n")).collect();
        let new: String = (0..3000).map(|i| format!("new {i}\n")).collect();
        let diff = unified_diff(&old, &new, "f").unwrap();
        assert!(diff.contains("-old 0\n"));
        assert!(diff.contains("+new 2999\n"));
    }
}
