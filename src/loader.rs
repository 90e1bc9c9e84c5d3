//! 題庫・補正テーブル・OCRテキストの読み込み

use crate::error::{MatcherError, Result};
use exam_matcher_common::{CorrectionTable, Corpus};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// 題庫JSONを読み込む
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    if !path.exists() {
        return Err(MatcherError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let corpus = Corpus::from_json(&content).map_err(|e| match e {
        exam_matcher_common::Error::InvalidCorpus(msg) => {
            MatcherError::InvalidCorpus(format!("{}: {}", path.display(), msg))
        }
        exam_matcher_common::Error::Json(e) => {
            MatcherError::InvalidCorpus(format!("{}: JSONパースエラー: {}", path.display(), e))
        }
        other => other.into(),
    })?;

    if corpus.skipped() > 0 {
        warn!(skipped = corpus.skipped(), path = %path.display(), "不正なエントリを読み飛ばしました");
    }
    info!(count = corpus.len(), path = %path.display(), "題庫を読み込みました");

    Ok(corpus)
}

/// 補正テーブルを読み込む（未指定なら組み込み）
pub fn load_corrections(path: Option<&Path>) -> Result<CorrectionTable> {
    let Some(path) = path else {
        return Ok(CorrectionTable::builtin());
    };

    if !path.exists() {
        return Err(MatcherError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let table = CorrectionTable::from_json(&content)?;
    info!(rules = table.len(), fingerprint = %table.fingerprint(), "補正テーブルを読み込みました");
    Ok(table)
}

/// OCRテキストを読み込む（未指定なら標準入力）
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(MatcherError::FileNotFound(path.display().to_string()));
            }
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
