//! 照合結果の表示

use crate::eval::EvalReport;
use exam_matcher_common::{Candidate, QuestionRecord};
use std::fmt::Write;

/// 問題1件を表示用に整形
pub fn format_record(record: &QuestionRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", record.id, record.stem);
    for option in &record.options {
        let _ = writeln!(out, "    {}", option);
    }
    if !record.answer.is_empty() {
        let _ = writeln!(out, "  答案: {}", record.answer);
    }
    if let Some(explanation) = &record.explanation {
        let _ = writeln!(out, "  解析: {}", explanation);
    }
    if let Some(image) = &record.image {
        let _ = writeln!(out, "  画像: {}", image);
    }
    out
}

/// 候補一覧を整形
pub fn format_candidates(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "一致する問題が見つかりませんでした\n".to_string();
    }

    let mut out = String::new();
    for (rank, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. 類似度 {:.1}%",
            rank + 1,
            candidate.similarity * 100.0
        );
        out.push_str(&format_record(&candidate.record));
    }
    out
}

/// 評価結果の要約
pub fn format_eval_summary(report: &EvalReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "サンプル数: {}", report.samples);
    if report.unreadable > 0 {
        let _ = writeln!(out, "読み込めないサンプル: {}", report.unreadable);
    }
    let _ = writeln!(
        out,
        "1位正解率: {:.1}% ({}/{})",
        report.top1_accuracy * 100.0,
        report.top1_correct,
        report.samples
    );
    let _ = writeln!(
        out,
        "候補内正解率: {:.1}% ({}/{})",
        report.hit_rate * 100.0,
        report.hits,
        report.samples
    );
    let _ = writeln!(out, "平均候補数: {:.2}", report.mean_candidates);
    let _ = writeln!(out, "補正テーブル: {}", report.table_fingerprint);
    out
}
