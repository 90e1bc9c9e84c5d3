//! exam-matcher
//!
//! 照合エンジン（exam-matcher-common）を使うCLI側の機能:
//! 設定、題庫ファイルの読み込み、結果表示、ラベル付きサンプルでの評価

pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod loader;
pub mod output;
