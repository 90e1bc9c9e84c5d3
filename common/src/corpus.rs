//! 題庫
//!
//! 読み込み後は読み取り専用。不正なエントリは読み込み時に読み飛ばす。

use crate::error::{Error, Result};
use crate::types::QuestionRecord;
use std::collections::HashSet;
use tracing::warn;

/// 題庫（IDで一意な問題の列）
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<QuestionRecord>,
    skipped: usize,
}

impl Corpus {
    /// レコード列から構築（IDの重複はエラー）
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self> {
        let mut ids = HashSet::with_capacity(records.len());
        for record in &records {
            if !ids.insert(record.id) {
                return Err(Error::InvalidCorpus(format!("IDが重複しています: {}", record.id)));
            }
        }
        Ok(Self { records, skipped: 0 })
    }

    /// JSON配列から読み込み
    ///
    /// 必須項目（id・問題文・答案）の欠けたエントリ、IDが0のエントリ、問題文が空のエントリは
    /// 警告を出して読み飛ばす。
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let entries = match value {
            serde_json::Value::Array(entries) => entries,
            _ => return Err(Error::InvalidCorpus("JSON配列ではありません".into())),
        };

        let mut records = Vec::with_capacity(entries.len());
        let mut skipped = 0;
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<QuestionRecord>(entry) {
                Ok(record) if record.id > 0 && !record.stem.trim().is_empty() => records.push(record),
                Ok(record) => {
                    warn!(index, id = record.id, "IDまたは問題文が不正なエントリを読み飛ばしました");
                    skipped += 1;
                }
                Err(e) => {
                    warn!(index, error = %e, "不正なエントリを読み飛ばしました");
                    skipped += 1;
                }
            }
        }

        let mut corpus = Self::from_records(records)?;
        corpus.skipped = skipped;
        Ok(corpus)
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 読み込み時に読み飛ばしたエントリ数
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// IDで取得
    pub fn get(&self, id: u32) -> Option<&QuestionRecord> {
        // IDは通常1始まりの連番
        let guess = (id as usize).checked_sub(1).and_then(|i| self.records.get(i));
        match guess {
            Some(record) if record.id == id => Some(record),
            _ => self.records.iter().find(|r| r.id == id),
        }
    }

    /// 問題文・選択肢の部分一致検索（大文字小文字を区別しない）
    pub fn search(&self, keyword: &str) -> Vec<&QuestionRecord> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Vec::new();
        }

        self.records
            .iter()
            .filter(|r| {
                r.stem.to_lowercase().contains(&keyword)
                    || r.options.iter().any(|o| o.to_lowercase().contains(&keyword))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": 1, "question": "驾驶机动车在雨天临时停车时，应开启什么灯？", "options": ["A、危险报警闪光灯", "B、前后雾灯"], "answer": "A"},
        {"id": 2, "question": "ABS系统的主要作用是什么？", "options": ["A、防止车轮抱死", "B、提高车速"], "answer": "A", "explanation": "防抱死制动系统"},
        {"id": 3, "question": "驾驶人在饮酒后可以驾驶机动车。", "options": [], "answer": "错误"}
    ]"#;

    #[test]
    fn test_from_json() {
        let corpus = Corpus::from_json(SAMPLE).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.skipped(), 0);
        assert_eq!(corpus.get(2).unwrap().explanation.as_deref(), Some("防抱死制动系统"));
    }

    #[test]
    fn test_skip_malformed_entries() {
        let json = r#"[
            {"id": 1, "question": "驾驶机动车在雨天临时停车时，应开启什么灯？", "answer": "A"},
            {"question": "IDのないエントリ", "answer": "A"},
            {"id": 3, "question": "   ", "answer": "A"},
            {"id": 0, "question": "ID 0", "answer": "A"},
            {"id": 5, "question": "答案のないエントリ"},
            "文字列",
            {"id": 4, "question": "高速公路上行驶的最低车速是多少？", "answer": "A"}
        ]"#;
        let corpus = Corpus::from_json(json).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.skipped(), 5);
        assert!(corpus.get(5).is_none());
        assert_eq!(corpus.records()[1].id, 4);
    }

    #[test]
    fn test_duplicate_id_is_error() {
        let json = r#"[{"id": 1, "question": "第一题", "answer": "A"}, {"id": 1, "question": "第二题", "answer": "B"}]"#;
        assert!(matches!(Corpus::from_json(json), Err(Error::InvalidCorpus(_))));
    }

    #[test]
    fn test_not_array_is_error() {
        assert!(matches!(Corpus::from_json(r#"{"id": 1}"#), Err(Error::InvalidCorpus(_))));
        assert!(matches!(Corpus::from_json("["), Err(Error::Json(_))));
    }

    #[test]
    fn test_get_non_contiguous() {
        let corpus = Corpus::from_records(vec![
            QuestionRecord { id: 5, stem: "五".into(), ..Default::default() },
            QuestionRecord { id: 1, stem: "一".into(), ..Default::default() },
        ])
        .unwrap();
        assert_eq!(corpus.get(1).unwrap().stem, "一");
        assert_eq!(corpus.get(5).unwrap().stem, "五");
        assert!(corpus.get(0).is_none());
        assert!(corpus.get(2).is_none());
    }

    #[test]
    fn test_search() {
        let corpus = Corpus::from_json(SAMPLE).unwrap();
        let ids: Vec<u32> = corpus.search("abs").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
        let ids: Vec<u32> = corpus.search("闪光灯").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(corpus.search("  ").is_empty());
    }
}
