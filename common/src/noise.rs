//! ノイズ行の判定
//!
//! 選択肢記号だけの行、ページ番号、問題種別ラベル、透かし・広告の断片を
//! 内容行と区別する。誤判定（内容をノイズとみなす）は許容し、
//! 誤判定が見つかった場合は`tables::AD_FRAGMENTS`を見直す。

use crate::tables::{self, AD_FRAGMENTS};
use regex::Regex;

/// 行がノイズかどうか（前後の空白は除去済みであること）
///
/// 判定順（最初に一致したもの）:
/// 1. 空行
/// 2. 2文字以下
/// 3. 4文字以下で漢字2文字の連続を含まない
/// 4. 構造パターン（選択肢記号のみ、記号のみ、番号のみ、種別ラベル、透かし）
/// 5. 広告・透かし断片を含む
pub fn is_noise(line: &str) -> bool {
    if line.is_empty() {
        return true;
    }

    let len = line.chars().count();
    if len <= 2 {
        return true;
    }
    if len <= 4 && !has_cjk_run(line, 2) {
        return true;
    }

    if is_structural(line) {
        return true;
    }

    AD_FRAGMENTS.iter().any(|fragment| line.contains(fragment))
}

fn is_structural(line: &str) -> bool {
    lazy_static::lazy_static! {
        // 選択肢記号だけ（"A:" "B：" "C、"）
        static ref BARE_OPTION_RE: Regex = Regex::new(r"^[A-D][:：、]\s*$").unwrap();
        // 番号だけ（"12、" "3."）
        static ref BARE_NUMBER_RE: Regex = Regex::new(r"^\d+[、.]\s*$").unwrap();
    }

    BARE_OPTION_RE.is_match(line)
        || BARE_NUMBER_RE.is_match(line)
        || tables::is_bullet_only(line)
        || tables::is_category_label(line)
        || tables::is_watermark(line)
}

/// 漢字が`n`文字以上連続する箇所があるか
fn has_cjk_run(line: &str, n: usize) -> bool {
    let mut run = 0;
    for c in line.chars() {
        if tables::is_cjk(c) {
            run += 1;
            if run >= n {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
