/// A comment-free, trimmed, non-empty source statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 0-based line number in the source file
    pub idx: usize,
    pub code: String,
}

pub const COMMENT: char = '#';

pub fn preprocess<S: AsRef<str>>(raw: &[S]) -> Vec<Line> {
    raw.iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.as_ref();
            let code = match line.split_once(COMMENT) {
                Some((code, _)) => code,
                None => line,
            }
            .trim();
            (!code.is_empty()).then(|| Line {
                idx,
                code: code.to_string(),
            })
        })
        .collect()
}
