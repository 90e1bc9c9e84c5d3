//! ラベル付きOCRサンプルによる照合精度の評価
//!
//! フォルダ直下の`*.txt`をサンプルとし、正解IDは次の順で決める:
//! 1. 同じフォルダの`labels.json`（`{"ファイル名": ID}`）
//! 2. ファイル名先頭の`<ID>_`
//!
//! ラベルのないサンプル、読み込めないサンプルは読み飛ばす。

use crate::error::{MatcherError, Result};
use exam_matcher_common::{Corpus, MatchOptions, Matcher};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// ラベルファイル名
pub const LABELS_FILE: &str = "labels.json";

/// 評価サンプル
#[derive(Debug, Clone)]
pub struct Sample {
    pub path: PathBuf,
    pub file_name: String,
    pub expected_id: u32,
}

/// サンプル1件の結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleOutcome {
    pub file_name: String,
    pub expected_id: u32,
    pub top_id: Option<u32>,
    pub top_similarity: Option<f64>,
    pub candidates: usize,
    /// 正解が候補のどこかに含まれるか
    pub hit: bool,
}

impl SampleOutcome {
    pub fn is_top1(&self) -> bool {
        self.top_id == Some(self.expected_id)
    }
}

/// 評価結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalReport {
    pub samples: usize,
    pub top1_correct: usize,
    pub hits: usize,
    pub top1_accuracy: f64,
    pub hit_rate: f64,
    pub mean_candidates: f64,
    /// 読み込めずに除外したサンプル数
    pub unreadable: usize,
    /// 補正テーブルの識別子
    pub table_fingerprint: String,
    pub options: MatchOptions,
    pub outcomes: Vec<SampleOutcome>,
}

impl EvalReport {
    fn from_outcomes(outcomes: Vec<SampleOutcome>, unreadable: usize, matcher: &Matcher) -> Self {
        let samples = outcomes.len();
        let top1_correct = outcomes.iter().filter(|o| o.is_top1()).count();
        let hits = outcomes.iter().filter(|o| o.hit).count();
        let total_candidates: usize = outcomes.iter().map(|o| o.candidates).sum();

        let ratio = |n: usize| if samples == 0 { 0.0 } else { n as f64 / samples as f64 };

        Self {
            samples,
            top1_correct,
            hits,
            top1_accuracy: ratio(top1_correct),
            hit_rate: ratio(hits),
            mean_candidates: ratio(total_candidates),
            unreadable,
            table_fingerprint: matcher.corrections().fingerprint(),
            options: *matcher.options(),
            outcomes,
        }
    }
}

/// ファイル名先頭の`<ID>_`から正解IDを得る
pub fn label_from_file_name(file_name: &str) -> Option<u32> {
    lazy_static::lazy_static! {
        static ref LABEL_RE: Regex = Regex::new(r"^(\d+)_").unwrap();
    }

    LABEL_RE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn load_labels(folder: &Path) -> Result<HashMap<String, u32>> {
    let path = folder.join(LABELS_FILE);
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// フォルダからラベル付きサンプルを集める
pub fn scan_samples(folder: &Path) -> Result<Vec<Sample>> {
    if !folder.exists() {
        return Err(MatcherError::FolderNotFound(folder.display().to_string()));
    }

    let labels = load_labels(folder)?;
    let mut samples = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().map(|e| e != "txt").unwrap_or(true) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let expected_id = labels
            .get(&file_name)
            .copied()
            .or_else(|| label_from_file_name(&file_name));

        match expected_id {
            Some(expected_id) => samples.push(Sample {
                path: path.to_path_buf(),
                file_name,
                expected_id,
            }),
            None => warn!(file = %file_name, "正解IDがないサンプルを読み飛ばしました"),
        }
    }

    if samples.is_empty() {
        return Err(MatcherError::NoSamplesFound(folder.display().to_string()));
    }

    // ファイル名でソート
    samples.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(samples)
}

/// サンプル1件を照合する
pub fn evaluate_sample(sample: &Sample, corpus: &Corpus, matcher: &Matcher) -> Result<SampleOutcome> {
    let raw = std::fs::read_to_string(&sample.path)?;
    let candidates = matcher.find_matches(&raw, corpus);
    debug!(file = %sample.file_name, candidates = candidates.len(), "サンプル照合");

    let top = candidates.first();
    Ok(SampleOutcome {
        file_name: sample.file_name.clone(),
        expected_id: sample.expected_id,
        top_id: top.map(|c| c.id()),
        top_similarity: top.map(|c| c.similarity),
        candidates: candidates.len(),
        hit: candidates.iter().any(|c| c.id() == sample.expected_id),
    })
}

/// 全サンプルを並列に評価する
///
/// 読み込めないサンプルは警告を出して除外し、件数だけを記録する。
pub fn evaluate(samples: &[Sample], corpus: &Corpus, matcher: &Matcher, show_progress: bool) -> EvalReport {
    let progress = if show_progress {
        let bar = ProgressBar::new(samples.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<Option<SampleOutcome>> = samples
        .par_iter()
        .map(|sample| {
            let outcome = match evaluate_sample(sample, corpus, matcher) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(file = %sample.file_name, error = %e, "サンプルを読み込めないため除外しました");
                    None
                }
            };
            progress.inc(1);
            outcome
        })
        .collect();

    progress.finish_and_clear();

    let unreadable = results.iter().filter(|r| r.is_none()).count();
    let outcomes = results.into_iter().flatten().collect();
    EvalReport::from_outcomes(outcomes, unreadable, matcher)
}
