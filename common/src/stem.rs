//! 問題文（ステム）の抽出
//!
//! OCR結果には文法がないため、行単位の状態機械で問題文を切り出す。
//!
//! ```text
//! SeekingStem --(番号付き行 / 6文字以上の行)--> CollectingStem --(選択肢行 / ノイズ行)--> Done
//! ```
//!
//! 行は区切りなしで連結する（OCRの改行は文の区切りと一致しない）。

use crate::noise::is_noise;
use crate::normalizer::CorrectionTable;
use crate::tables;
use regex::Regex;

lazy_static::lazy_static! {
    static ref BARE_NUMBER_RE: Regex = Regex::new(r"^\d+$").unwrap();
    // 番号・疑問符の見出し（"3、" "12." "？" "?3、"）
    static ref MARKER_RE: Regex =
        Regex::new(r"^(?:[?？]+\s*(?:\d+\s*[、.．])?|\d+\s*[、.．])\s*").unwrap();
    static ref OPTION_LINE_RE: Regex = Regex::new(r"^[○●]?\s*[A-D]\s*[:：、.．]").unwrap();
    static ref OPTION_ANYWHERE_RE: Regex = Regex::new(r"(?m)^[○●]?\s*[A-D]\s*[:：、.．]").unwrap();
}

/// 抽出の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemState {
    SeekingStem,
    CollectingStem,
    Done,
}

/// 行を1つずつ受け取る抽出器
#[derive(Debug, Clone)]
pub struct StemExtractor {
    state: StemState,
    stem: String,
}

impl Default for StemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StemExtractor {
    pub fn new() -> Self {
        Self {
            state: StemState::SeekingStem,
            stem: String::new(),
        }
    }

    pub fn state(&self) -> StemState {
        self.state
    }

    /// 1行を処理して遷移後の状態を返す（行は前後の空白除去済み）
    pub fn feed(&mut self, line: &str) -> StemState {
        self.state = match self.state {
            StemState::SeekingStem => self.seek(line),
            StemState::CollectingStem => self.collect(line),
            StemState::Done => StemState::Done,
        };
        self.state
    }

    fn seek(&mut self, line: &str) -> StemState {
        if line.is_empty() || is_bare_number(line) || is_category_line(line) || is_option_line(line) {
            return StemState::SeekingStem;
        }

        if let Some(body) = strip_marker(line) {
            let body = strip_bullets(body);
            if body.is_empty() {
                return StemState::SeekingStem;
            }
            self.stem.push_str(body);
            return StemState::CollectingStem;
        }

        let body = strip_bullets(line);
        if body.chars().count() > 5 && !tables::is_watermark(body) && !is_noise(body) {
            self.stem.push_str(body);
            return StemState::CollectingStem;
        }

        StemState::SeekingStem
    }

    fn collect(&mut self, line: &str) -> StemState {
        if is_option_line(line) || is_noise(line) {
            return StemState::Done;
        }
        self.stem.push_str(line);
        StemState::CollectingStem
    }

    /// 集めた問題文
    pub fn finish(self) -> String {
        self.stem
    }
}

/// 組み込み補正テーブルで問題文を抽出する
pub fn extract_stem(raw: &str) -> String {
    extract_stem_with(raw, &CorrectionTable::builtin())
}

/// 指定の補正テーブルで問題文を抽出する
///
/// 状態機械で何も得られなかった場合:
/// 1. 番号・種別ラベル・選択肢・ノイズ行を除いた残りを連結
/// 2. それも空なら最初の選択肢行より前（なければ全体）
pub fn extract_stem_with(raw: &str, table: &CorrectionTable) -> String {
    let normalized = table.normalize(raw);
    let lines: Vec<&str> = normalized
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut extractor = StemExtractor::new();
    for line in &lines {
        if extractor.feed(line) == StemState::Done {
            break;
        }
    }
    let mut stem = extractor.finish();

    if stem.trim().is_empty() {
        stem = lines
            .iter()
            .filter(|l| {
                !is_bare_number(l) && !is_category_line(l) && !is_option_line(l) && !is_noise(l)
            })
            .copied()
            .collect();
    }

    if stem.trim().is_empty() {
        let head = match OPTION_ANYWHERE_RE.find(&normalized) {
            Some(m) => &normalized[..m.start()],
            None => normalized.as_str(),
        };
        stem = head.lines().map(str::trim).collect();
    }

    table.apply(&stem).trim().to_string()
}

/// 数字だけの行（ページ番号など）
pub fn is_bare_number(line: &str) -> bool {
    BARE_NUMBER_RE.is_match(line)
}

/// 問題種別ラベルの行（"单选题" "单选题 3/100" など）
pub fn is_category_line(line: &str) -> bool {
    let cjk: String = line.chars().filter(|c| tables::is_cjk(*c)).collect();
    tables::is_category_label(&cjk)
}

/// 選択肢の行（"A:" "B、" "○C：" など）
pub fn is_option_line(line: &str) -> bool {
    OPTION_LINE_RE.is_match(line)
}

/// 行頭の番号・疑問符を除いた本文（見出しがなければNone）
pub(crate) fn strip_marker(line: &str) -> Option<&str> {
    let m = MARKER_RE.find(line)?;
    let rest = &line[m.end()..];
    // "3.5米" のような小数は見出しではない
    if m.as_str().trim_end().ends_with('.') && rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(rest)
}

fn strip_bullets(line: &str) -> &str {
    line.trim_start_matches(tables::BULLET_GLYPHS).trim_start()
}
