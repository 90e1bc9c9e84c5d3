//! Exam Matcher Common Library
//!
//! OCRで読み取った問題文を題庫と照合するエンジン
//!
//! 正規化 → ノイズ行判定 → 問題文抽出 → キーワード抽出 → 類似度 → 順位付け

pub mod types;
pub mod error;
pub mod tables;
pub mod normalizer;
pub mod noise;
pub mod stem;
pub mod keywords;
pub mod similarity;
pub mod corpus;
pub mod ranker;
pub mod recognized;

pub use types::{Candidate, QuestionRecord};
pub use error::{Error, Result};
pub use normalizer::{normalize, CorrectionRule, CorrectionTable};
pub use noise::is_noise;
pub use stem::{extract_stem, extract_stem_with, StemExtractor, StemState};
pub use keywords::keywords;
pub use similarity::{similarity, similarity_with, ScoringWeights};
pub use corpus::Corpus;
pub use ranker::{rank, select_candidates, MatchOptions, Matcher, DEFAULT_THRESHOLD};
pub use recognized::clean_recognized_text;
