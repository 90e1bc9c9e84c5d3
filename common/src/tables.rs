//! 照合で使う固定テーブル
//!
//! プロセス全体で共有する読み取り専用データ。

use std::collections::HashSet;

/// 問題種別ラベル
pub const CATEGORY_LABELS: &[&str] = &["判断题", "单选题", "多选题"];

/// 透かし文言を構成する文字（この文字だけで構成された行はノイズ）
pub const WATERMARK_CHARS: &[char] = &['学', '法', '减', '分'];

/// 装飾記号
pub const BULLET_GLYPHS: &[char] = &['○', '●'];

/// 広告・透かしの断片
pub const AD_FRAGMENTS: &[&str] = &[
    "钢结构",
    "四代宅",
    "创意展示",
    "超云动",
    "天题云",
    "云动从",
    "盈多世",
    "多世好",
    "留大是",
    "名章任",
    "血天",
    "私亨",
    "私享会",
    "留久",
    "留太",
    "名草",
    "告",
];

/// キーワード抽出の除外語
pub const STOP_WORDS: &[&str] = &[
    "的", "了", "是", "在", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "那",
    "为", "与", "及", "或", "等", "个", "中", "对", "能", "可", "以", "向", "从", "被", "由",
    "把", "给", "让", "使", "将",
];

lazy_static::lazy_static! {
    pub static ref STOP_WORD_SET: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// 問題種別ラベルか
pub fn is_category_label(line: &str) -> bool {
    CATEGORY_LABELS.contains(&line)
}

/// 透かし文字だけで構成されているか
pub fn is_watermark(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| WATERMARK_CHARS.contains(&c))
}

/// 装飾記号だけで構成されているか
pub fn is_bullet_only(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| BULLET_GLYPHS.contains(&c))
}

/// CJK統合漢字（U+4E00-U+9FA5）か
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// 照合用に取り除く記号・空白か
pub fn is_strippable(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || BULLET_GLYPHS.contains(&c)
        || matches!(
            c,
            '，' | '。' | '、' | '；' | '：' | '！' | '？' | '“' | '”' | '‘' | '’'
                | '（' | '）' | '【' | '】' | '《' | '》' | '…' | '—' | '·'
        )
}
