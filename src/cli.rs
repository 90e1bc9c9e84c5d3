use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "exam-matcher")]
#[command(about = "OCRで読み取った問題を題庫と照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 題庫JSONファイル（設定・環境変数より優先）
    #[arg(short, long, global = true)]
    pub corpus: Option<PathBuf>,

    /// 補正テーブルJSONファイル
    #[arg(long, global = true)]
    pub corrections: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OCRテキストを題庫と照合
    Match {
        /// OCRテキストファイル（省略時は標準入力）
        input: Option<PathBuf>,

        /// 足切り閾値（0.0-1.0）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// 認識テキストの整形結果も表示
        #[arg(long)]
        show_text: bool,
    },

    /// 題庫をキーワードで検索
    Search {
        /// 検索語
        #[arg(required = true)]
        keyword: String,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// IDで問題を表示
    Show {
        #[arg(required = true)]
        id: u32,
    },

    /// ラベル付きOCRサンプルで照合精度を評価
    Eval {
        /// サンプルフォルダ（*.txt と labels.json）
        #[arg(required = true)]
        folder: PathBuf,

        /// 足切り閾値（0.0-1.0）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// 部分一致の加点（0で無効）
        #[arg(long)]
        containment_bonus: Option<f64>,

        /// 評価結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 補正テーブルを表示
    Tables,

    /// 設定を表示/編集
    Config {
        /// 題庫パスを設定
        #[arg(long)]
        set_corpus: Option<PathBuf>,

        /// 足切り閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
