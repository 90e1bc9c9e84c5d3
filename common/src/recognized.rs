//! 表示用のOCRテキスト整形
//!
//! 照合には使わない。認識結果をユーザーに見せるときに、ノイズ行を除き
//! 問題文の後に選択肢を「A. 本文」の形で並べる。

use crate::noise::is_noise;
use crate::normalizer::CorrectionTable;
use crate::stem::{is_bare_number, is_category_line, is_option_line, strip_marker};
use crate::tables;
use regex::Regex;

/// 認識結果を表示用に整形する
pub fn clean_recognized_text(raw: &str, table: &CorrectionTable) -> String {
    lazy_static::lazy_static! {
        static ref OPTION_LABEL_RE: Regex = Regex::new(r"^[○●]?\s*([A-D])\s*[:：、.．]\s*").unwrap();
    }

    let normalized = table.normalize(raw);
    let lines: Vec<&str> = normalized
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut output: Vec<String> = Vec::new();
    let mut found_question = false;
    let mut found_options = false;

    for line in &lines {
        if is_bare_number(line) || is_category_line(line) || tables::is_watermark(line) {
            continue;
        }
        if is_noise(line) {
            continue;
        }

        if !found_question {
            if is_option_line(line) {
                continue;
            }
            found_question = true;
            let question = strip_marker(line).unwrap_or(line);
            let question = question.trim_start_matches(tables::BULLET_GLYPHS).trim();
            if !question.is_empty() {
                output.push(question.to_string());
            }
            continue;
        }

        if is_option_line(line) {
            found_options = true;
            output.push(OPTION_LABEL_RE.replace(line, "$1. ").into_owned());
        } else if !found_options || line.chars().count() > 3 {
            output.push(line.to_string());
        }
    }

    if output.is_empty() {
        return lines
            .into_iter()
            .filter(|l| !is_noise(l))
            .collect::<Vec<_>>()
            .join("\n");
    }

    output.join("\n")
}
