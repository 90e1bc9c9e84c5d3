//! 問題文同士の類似度
//!
//! 編集距離ベースの類似度とキーワード集合の重なりを加重平均する。
//! OCRの乱れは文字単位の対応を崩しやすいので、キーワード側を重くしている。

use crate::keywords::keywords;
use crate::tables;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// スコアの重み
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// 編集距離類似度の重み
    pub edit: f64,
    /// キーワード類似度の重み
    pub keyword: f64,
    /// キーワード類似度内のJaccard係数の重み
    pub jaccard: f64,
    /// キーワード類似度内の平均被覆率の重み
    pub coverage: f64,
    /// 一方が他方を部分文字列として含む場合の加点（0で無効）
    pub containment_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            edit: 0.4,
            keyword: 0.6,
            jaccard: 0.6,
            coverage: 0.4,
            containment_bonus: 0.0,
        }
    }
}

/// 編集距離比較用の形（記号・空白除去、小文字化）
pub fn edit_form(text: &str) -> String {
    text.chars()
        .filter(|c| !tables::is_strippable(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// レーベンシュタイン距離を計算（コードポイント単位）
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // 1行分だけ保持する
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// 編集距離ベースの類似度（どちらかが空なら0）
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / a_len.max(b_len) as f64)
}

/// キーワード集合同士の類似度
pub fn keyword_set_similarity(
    keywords1: &HashSet<String>,
    keywords2: &HashSet<String>,
    weights: &ScoringWeights,
) -> f64 {
    if keywords1.is_empty() || keywords2.is_empty() {
        return 0.0;
    }

    let intersection = keywords1.intersection(keywords2).count() as f64;
    let union = keywords1.union(keywords2).count() as f64;
    let jaccard = intersection / union;

    let coverage1 = intersection / keywords1.len() as f64;
    let coverage2 = intersection / keywords2.len() as f64;
    let avg_coverage = (coverage1 + coverage2) / 2.0;

    jaccard * weights.jaccard + avg_coverage * weights.coverage
}

/// テキスト同士のキーワード類似度
pub fn keyword_similarity(text1: &str, text2: &str, weights: &ScoringWeights) -> f64 {
    keyword_set_similarity(&keywords(text1), &keywords(text2), weights)
}

/// 既定の重みで総合類似度を計算する
pub fn similarity(candidate_stem: &str, ocr_stem: &str) -> f64 {
    similarity_with(candidate_stem, ocr_stem, &ScoringWeights::default())
}

/// 総合類似度を計算する（0.0-1.0）
pub fn similarity_with(candidate_stem: &str, ocr_stem: &str, weights: &ScoringWeights) -> f64 {
    let form1 = edit_form(candidate_stem);
    let form2 = edit_form(ocr_stem);
    if form1.is_empty() || form2.is_empty() {
        return 0.0;
    }

    let edit = edit_similarity(&form1, &form2);
    let keyword = keyword_similarity(candidate_stem, ocr_stem, weights);
    let mut score = edit * weights.edit + keyword * weights.keyword;

    if weights.containment_bonus > 0.0 && (form1.contains(&form2) || form2.contains(&form1)) {
        score += weights.containment_bonus;
    }

    score.clamp(0.0, 1.0)
}
