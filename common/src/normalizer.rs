//! OCRテキストの正規化
//!
//! ## 処理フロー
//! 1. 誤認識補正テーブルを上から順に適用（各ルールは全置換）
//! 2. 空白・タブの連続を1つに、行頭・行末の空白を除去
//! 3. 3行以上の連続改行を空行1つに
//!
//! 補正テーブルはバージョン管理される資産として扱い、`fingerprint()`で識別する。

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

/// `apply`の反復上限
const MAX_APPLY_PASSES: usize = 16;

/// 補正ルール（`from`を`to`に全置換）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRule {
    pub from: String,
    pub to: String,
}

impl CorrectionRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    fn is_deletion(&self) -> bool {
        self.to.is_empty()
    }
}

/// OCR誤認識の補正テーブル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionTable {
    rules: Vec<CorrectionRule>,
}

impl Default for CorrectionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CorrectionTable {
    /// 組み込みテーブル
    ///
    /// 削除ルールを先に置く。置換で新しい削除対象が生まれないため冪等になる。
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                // 装飾記号
                CorrectionRule::new("○", ""),
                CorrectionRule::new("●", ""),
                // 疑問符の残骸
                CorrectionRule::new("？", ""),
                CorrectionRule::new("?", ""),
                // 誤認識
                CorrectionRule::new("抑图所示", "如图所示"),
                CorrectionRule::new("机同", "机向"),
            ],
        }
    }

    /// ルールを検証してテーブルを構築
    pub fn new(rules: Vec<CorrectionRule>) -> Result<Self> {
        let table = Self { rules };
        table.validate()?;
        Ok(table)
    }

    /// JSON文字列から読み込み（`{"rules": [{"from": .., "to": ..}]}`）
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn rules(&self) -> &[CorrectionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 冪等性を崩すテーブルを拒否する
    ///
    /// - 空の`from`は不可
    /// - `from`に空白を含めない（空白の圧縮後にしか一致しないため）
    /// - 置換結果に他ルールの`from`を含めない
    /// - 削除ルールは置換ルールより前
    ///
    /// 置換結果と前後の文字で`from`が再びできる場合は`apply`の反復で吸収する。
    fn validate(&self) -> Result<()> {
        let mut seen_replacement = false;
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.from.is_empty() {
                return Err(Error::InvalidCorrectionTable(format!(
                    "{}番目のルールの置換元が空です",
                    i + 1
                )));
            }
            if rule.from.chars().any(char::is_whitespace) {
                return Err(Error::InvalidCorrectionTable(format!(
                    "置換元「{}」に空白を含めることはできません",
                    rule.from
                )));
            }
            if rule.is_deletion() {
                if seen_replacement {
                    return Err(Error::InvalidCorrectionTable(format!(
                        "削除ルール「{}」は置換ルールより前に置いてください",
                        rule.from
                    )));
                }
            } else {
                seen_replacement = true;
            }
            if let Some(other) = self.rules.iter().find(|r| rule.to.contains(r.from.as_str())) {
                return Err(Error::InvalidCorrectionTable(format!(
                    "「{}」の置換結果「{}」に「{}」が含まれています",
                    rule.from, rule.to, other.from
                )));
            }
        }
        Ok(())
    }

    /// 補正ルールのみを適用（空白処理なし）
    ///
    /// 1巡で変化がなくなるまで繰り返す。
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for _ in 0..MAX_APPLY_PASSES {
            let next = self.apply_once(&result);
            if next == result {
                return result;
            }
            result = next;
        }
        warn!(passes = MAX_APPLY_PASSES, "補正テーブルの適用が収束しませんでした");
        result
    }

    fn apply_once(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            if result.contains(rule.from.as_str()) {
                result = result.replace(rule.from.as_str(), &rule.to);
            }
        }
        result
    }

    /// ルール列のSHA-256（16進）
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for rule in &self.rules {
            hasher.update(rule.from.as_bytes());
            hasher.update([0x1fu8]);
            hasher.update(rule.to.as_bytes());
            hasher.update([0x1eu8]);
        }
        hex::encode(hasher.finalize())
    }

    /// テキストを正規化する
    pub fn normalize(&self, text: &str) -> String {
        lazy_static::lazy_static! {
            // 半角・全角スペースとタブの連続
            static ref HSPACE_RE: Regex = Regex::new(r"[ \t\u{3000}]+").unwrap();
            static ref BLANK_RE: Regex = Regex::new(r"\n{3,}").unwrap();
        }

        let corrected = self.apply(text);
        let collapsed = HSPACE_RE.replace_all(&corrected, " ");
        let lines: Vec<&str> = collapsed.lines().map(str::trim).collect();
        let joined = lines.join("\n");

        BLANK_RE.replace_all(&joined, "\n\n").trim().to_string()
    }
}

/// 組み込みテーブルで正規化する
pub fn normalize(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref BUILTIN: CorrectionTable = CorrectionTable::builtin();
    }
    BUILTIN.normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_are_valid() {
        let builtin = CorrectionTable::builtin();
        assert!(CorrectionTable::new(builtin.rules().to_vec()).is_ok());
    }

    #[test]
    fn test_normalize_fixes_known_misreads() {
        assert_eq!(normalize("抑图所示，该车"), "如图所示，该车");
        assert_eq!(normalize("机同车驶入路口"), "机向车驶入路口");
    }

    #[test]
    fn test_normalize_removes_glyphs() {
        assert_eq!(normalize("○A:有交通警察指挥"), "A:有交通警察指挥");
        assert_eq!(normalize("可以通行？"), "可以通行");
        assert_eq!(normalize("●●"), "");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize("  驾驶  机动车\t\t上路  "), "驾驶 机动车 上路");
        assert_eq!(normalize("第一行\n\n\n\n第二行"), "第一行\n\n第二行");
        assert_eq!(normalize("第一行\n   \n  \n\n第二行"), "第一行\n\n第二行");
        assert_eq!(normalize("全角\u{3000}\u{3000}空白"), "全角 空白");
        assert_eq!(normalize("一\r\n二"), "一\n二");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "3、机同车驶入路口遇有下列哪种情况可以通行？\nA:有交通警察指挥\nB:对面无来车",
            "  ○  抑图所示 ?\n\n\n\n ● 这个标志是何含义？ \t",
            "抑○图所示",
            "机?同",
            "",
            "\n\n\n",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "冪等でない: {:?}", sample);
        }
    }

    #[test]
    fn test_apply_is_top_to_bottom() {
        let table = CorrectionTable::new(vec![
            CorrectionRule::new("○", ""),
            CorrectionRule::new("ab", "x"),
            CorrectionRule::new("xc", "y"),
        ]);
        // 前のルールの結果に後続ルールが適用される
        let table = table.unwrap();
        assert_eq!(table.apply("a○bc"), "y");
    }

    #[test]
    fn test_apply_reaches_fixed_point() {
        // "ab"→"a" は直後の"b"と結合して再び"ab"になる
        let table = CorrectionTable::new(vec![CorrectionRule::new("ab", "a")]).unwrap();
        let once = table.normalize("abbb 车");
        assert_eq!(once, "a 车");
        assert_eq!(table.normalize(&once), once);
    }

    #[test]
    fn test_reject_whitespace_in_from() {
        for from in ["机 同", "机\u{3000}同", "机\t同", " 机同", "机同 "] {
            let result = CorrectionTable::new(vec![CorrectionRule::new(from, "机向")]);
            assert!(
                matches!(result, Err(Error::InvalidCorrectionTable(_))),
                "受理された: {:?}",
                from
            );
        }
        let json = r#"{"rules": [{"from": "机 同", "to": "机向"}]}"#;
        assert!(CorrectionTable::from_json(json).is_err());
    }

    #[test]
    fn test_reject_empty_from() {
        let result = CorrectionTable::new(vec![CorrectionRule::new("", "x")]);
        assert!(matches!(result, Err(Error::InvalidCorrectionTable(_))));
    }

    #[test]
    fn test_reject_deletion_after_replacement() {
        let result = CorrectionTable::new(vec![
            CorrectionRule::new("抑图", "如图"),
            CorrectionRule::new("○", ""),
        ]);
        assert!(matches!(result, Err(Error::InvalidCorrectionTable(_))));
    }

    #[test]
    fn test_reject_self_feeding_rule() {
        let result = CorrectionTable::new(vec![CorrectionRule::new("同", "同向")]);
        assert!(matches!(result, Err(Error::InvalidCorrectionTable(_))));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"rules": [{"from": "●", "to": ""}, {"from": "机同", "to": "机向"}]}"#;
        let table = CorrectionTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.normalize("● 机同"), "机向");
    }

    #[test]
    fn test_fingerprint_tracks_rule_order() {
        let a = CorrectionTable::new(vec![
            CorrectionRule::new("●", ""),
            CorrectionRule::new("○", ""),
        ])
        .unwrap();
        let b = CorrectionTable::new(vec![
            CorrectionRule::new("○", ""),
            CorrectionRule::new("●", ""),
        ])
        .unwrap();
        assert_eq!(a.fingerprint().len(), 64);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
    }
}
