//! キーワード（漢字2〜4文字のn-gram）の抽出

use crate::tables::{self, STOP_WORD_SET};
use std::collections::HashSet;

/// n-gramの長さ
pub const KEYWORD_LENGTHS: std::ops::RangeInclusive<usize> = 2..=4;

/// テキストからキーワード集合を抽出する
///
/// 記号・空白を除いたテキスト上で長さ2〜4の窓をずらし、
/// 全て漢字で除外語でないものを集める。
pub fn keywords(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().filter(|c| !tables::is_strippable(*c)).collect();
    let mut result = HashSet::new();

    for len in KEYWORD_LENGTHS {
        if chars.len() < len {
            break;
        }
        for window in chars.windows(len) {
            if !window.iter().all(|c| tables::is_cjk(*c)) {
                continue;
            }
            let word: String = window.iter().collect();
            if !STOP_WORD_SET.contains(word.as_str()) {
                result.insert(word);
            }
        }
    }

    result
}
