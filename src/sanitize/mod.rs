//! Input Sanitization
//!
//! Word-list and score hygiene.
//!
//! Functions:
//! - Comma-separated word list splitting
//! - Taxonomy lookup key normalisation
//! - Similarity score sanitization

/// 拆分逗号分隔的单词列表，去除首尾空白
///
/// A string without commas is a single entry. Empty entries from stray commas are dropped.
pub fn split_entries(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// 规范化查询键: 小写，空格转下划线
///
/// Multi-word entries such as `loch ness` are stored as `loch_ness` in the taxonomy.
pub fn lookup_key(word: &str) -> String {
    word.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// 清理相似度分数: 无效值返回 None，其余限制在 [0, 1]
pub fn sanitize_similarity(score: f64) -> Option<f64> {
    if score.is_nan() || score.is_infinite() {
        None
    } else {
        Some(score.clamp(0.0, 1.0))
    }
}

/// 检查阈值是否位于 [0, 1]
pub fn is_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// 取前 `n` 个字符 (按 Unicode 字符计)
pub fn leading_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
