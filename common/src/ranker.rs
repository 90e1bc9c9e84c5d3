//! 題庫の照合と順位付け
//!
//! 1. 問題文を1回だけ抽出
//! 2. 題庫の各問と類似度を計算（並列）
//! 3. 閾値で足切りし、類似度の降順に安定ソート（同点は題庫順）
//! 4. 高信頼の候補があればそれを全て、なければ上位N件

use crate::corpus::Corpus;
use crate::normalizer::CorrectionTable;
use crate::similarity::{similarity_with, ScoringWeights};
use crate::stem::extract_stem_with;
use crate::types::{Candidate, QuestionRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// 既定の足切り閾値
pub const DEFAULT_THRESHOLD: f64 = 0.25;

/// 照合オプション
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// この値を超えた候補だけを残す
    pub threshold: f64,
    /// この値を超える候補があればそれらを全て返す
    pub high_confidence: f64,
    /// 高信頼の候補がないときに返す最大件数
    pub fallback_limit: usize,
    pub weights: ScoringWeights,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            high_confidence: 0.4,
            fallback_limit: 10,
            weights: ScoringWeights::default(),
        }
    }
}

impl MatchOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }
}

/// 照合器（補正テーブルとオプションを保持）
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    corrections: CorrectionTable,
    options: MatchOptions,
}

impl Matcher {
    pub fn new(corrections: CorrectionTable, options: MatchOptions) -> Self {
        Self {
            corrections,
            options,
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn corrections(&self) -> &CorrectionTable {
        &self.corrections
    }

    /// 照合用の問題文を抽出する
    pub fn extract_stem(&self, raw: &str) -> String {
        extract_stem_with(raw, &self.corrections)
    }

    /// OCRテキストに近い問題を返す
    pub fn find_matches(&self, raw: &str, corpus: &Corpus) -> Vec<Candidate> {
        self.find_matches_in(raw, corpus.records())
    }

    /// レコード列に対して照合する
    pub fn find_matches_in(&self, raw: &str, records: &[QuestionRecord]) -> Vec<Candidate> {
        if records.is_empty() {
            warn!("題庫が空のため照合できません");
            return Vec::new();
        }

        let stem = self.extract_stem(raw);
        debug!(stem = %stem, "抽出した問題文");

        let scored = score_records(&stem, records, &self.options);
        let result = select_candidates(scored, &self.options);

        debug!(count = result.len(), "照合完了");
        result
    }
}

/// 全レコードを採点し、閾値を超えたものを題庫順で返す
pub fn score_records(stem: &str, records: &[QuestionRecord], options: &MatchOptions) -> Vec<Candidate> {
    if stem.trim().is_empty() {
        return Vec::new();
    }

    // rayonのcollectは元の順序を保つ
    records
        .par_iter()
        .filter_map(|record| {
            let similarity = similarity_with(&record.stem, stem, &options.weights);
            (similarity > options.threshold).then(|| Candidate::new(record.clone(), similarity))
        })
        .collect()
}

/// 閾値通過済みの候補を並べ替えて件数を決める
pub fn select_candidates(mut candidates: Vec<Candidate>, options: &MatchOptions) -> Vec<Candidate> {
    // 安定ソートなので同点は入力順
    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });

    let high = candidates
        .iter()
        .take_while(|c| c.similarity > options.high_confidence)
        .count();

    if high > 0 {
        candidates.truncate(high);
    } else {
        candidates.truncate(options.fallback_limit);
    }
    candidates
}

/// 既定の設定で照合する
pub fn rank(raw: &str, corpus: &[QuestionRecord], threshold: f64) -> Vec<Candidate> {
    Matcher::new(CorrectionTable::builtin(), MatchOptions::with_threshold(threshold))
        .find_matches_in(raw, corpus)
}
