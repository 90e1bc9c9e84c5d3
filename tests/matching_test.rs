//! 照合の結合テスト
//!
//! 題庫ファイルの読み込みからOCRテキストの照合まで

use exam_matcher::loader;
use exam_matcher_common::{
    extract_stem, is_noise, normalize, rank, similarity, Corpus, MatchOptions, Matcher,
    QuestionRecord, DEFAULT_THRESHOLD,
};
use tempfile::tempdir;

const CORPUS_JSON: &str = r#"[
    {"id": 1, "question": "驾驶机动车在雨天临时停车时，应开启什么灯？", "options": ["A、危险报警闪光灯", "B、前后雾灯", "C、示廓灯", "D、近光灯"], "answer": "A"},
    {"id": 2, "question": "机向车驶入路口遇有下列哪种情况可以通行？", "options": ["A、有交通警察指挥", "B、对面无来车", "C、路口无人", "D、信号灯为黄灯"], "answer": "A", "explanation": "有交通警察指挥时，按照指挥通行。"},
    {"id": 3, "question": "高速公路上行驶的最低车速是多少？", "options": ["A、每小时60公里", "B、每小时50公里"], "answer": "A"},
    {"id": 4, "question": "驾驶人在饮酒后可以驾驶机动车。", "options": ["正确", "错误"], "answer": "错误"},
    {"id": 5, "question": "如图所示，这个标志是何含义？", "options": ["A、注意行人", "B、人行横道"], "answer": "B", "image": "https://example.com/sign.png"}
]"#;

fn load_fixture() -> Corpus {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("questions.json");
    std::fs::write(&path, CORPUS_JSON).unwrap();
    loader::load_corpus(&path).expect("題庫の読み込みに失敗")
}

#[test]
fn test_end_to_end_scenario() {
    let corpus = load_fixture();
    let raw = "3、机同车驶入路口遇有下列哪种情况可以通行？\nA:有交通警察指挥\nB:对面无来车";

    assert_eq!(extract_stem(raw), "机向车驶入路口遇有下列哪种情况可以通行");

    let result = Matcher::default().find_matches(raw, &corpus);
    assert_eq!(result[0].id(), 2);
    assert!((result[0].similarity - 1.0).abs() < 1e-9);
    assert_eq!(
        result[0].record.explanation.as_deref(),
        Some("有交通警察指挥时，按照指挥通行。")
    );
}

#[test]
fn test_noisy_photo_text() {
    let corpus = load_fixture();
    let raw = "钢结构四代宅\n单选题\n27\n15、驾驶机动车在雨天临时\n停车时，应开启什么灯？\n○A:危险报警闪光灯\n○B:前后雾灯\n学法减分";

    let result = Matcher::default().find_matches(raw, &corpus);
    assert!(!result.is_empty());
    assert_eq!(result[0].id(), 1);
    assert!(result[0].similarity > 0.9);
}

#[test]
fn test_misread_figure_reference() {
    let corpus = load_fixture();
    let raw = "抑图所示，这个标志是何含义？\nA、注意行人\nB、人行横道";

    let result = Matcher::default().find_matches(raw, &corpus);
    assert_eq!(result[0].id(), 5);
    assert_eq!(result[0].record.image.as_deref(), Some("https://example.com/sign.png"));
}

#[test]
fn test_empty_corpus() {
    assert!(rank("任意文本", &[], DEFAULT_THRESHOLD).is_empty());
    assert!(Matcher::default().find_matches("任意文本", &Corpus::default()).is_empty());
}

#[test]
fn test_no_match_above_threshold() {
    let corpus = load_fixture();
    let result = Matcher::default().find_matches("今天天气很好适合出去散步", &corpus);
    assert!(result.is_empty());
}

#[test]
fn test_results_sorted_and_in_range() {
    let corpus = load_fixture();
    let options = MatchOptions::with_threshold(0.0);
    let matcher = Matcher::new(Default::default(), options);
    let result = matcher.find_matches("驾驶机动车", &corpus);

    assert!(result.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    assert!(result.iter().all(|c| (0.0..=1.0).contains(&c.similarity)));
}

#[test]
fn test_deterministic() {
    let corpus = load_fixture();
    let raw = "驾驶人饮酒后可以驾驶机动车吗\n正确\n错误";
    let first = Matcher::default().find_matches(raw, &corpus);
    for _ in 0..5 {
        assert_eq!(Matcher::default().find_matches(raw, &corpus), first);
    }
}

#[test]
fn test_properties() {
    // 冪等性
    let text = "  ○ 3、机同车驶入路口？\n\n\n\nA:有交通警察指挥 ";
    assert_eq!(normalize(&normalize(text)), normalize(text));

    // 同一性
    let stem = "驾驶机动车在雨天临时停车时应开启什么灯";
    assert!((similarity(stem, stem) - 1.0).abs() < 1e-9);

    // ノイズ判定
    assert!(is_noise("A:"));
    assert!(is_noise("判断题"));
    assert!(!is_noise("这是一道关于交通信号灯的判断题目"));
}

#[test]
fn test_rank_with_slice() {
    let records: Vec<QuestionRecord> = serde_json::from_str(CORPUS_JSON).unwrap();
    let result = rank("高速公路上行驶的最低车速是多少", &records, DEFAULT_THRESHOLD);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id(), 3);
}
