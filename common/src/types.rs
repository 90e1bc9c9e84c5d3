//! 照合で扱う型定義
//!
//! - QuestionRecord: 題庫の1問（読み込み後は不変）
//! - Candidate: 照合結果（QuestionRecord + 類似度）

use serde::{Deserialize, Serialize};

/// 題庫の1問
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// 1始まりの連番ID
    pub id: u32,

    /// 問題文（選択肢を含まない）
    #[serde(alias = "question")]
    pub stem: String,

    #[serde(default)]
    pub options: Vec<String>,     // 選択肢

    pub answer: String,           // 正解（記号または文字列）

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,    // 画像URL
}

/// 照合候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub record: QuestionRecord,

    /// 類似度 (0.0-1.0)
    pub similarity: f64,
}

impl Candidate {
    pub fn new(record: QuestionRecord, similarity: f64) -> Self {
        Self { record, similarity }
    }

    pub fn id(&self) -> u32 {
        self.record.id
    }
}
