use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("題庫が指定されていません。`exam-matcher config --set-corpus PATH` か環境変数 EXAM_MATCHER_CORPUS で指定してください")]
    MissingCorpus,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("題庫ファイルが不正: {0}")]
    InvalidCorpus(String),

    #[error("評価用サンプルが見つかりません: {0}")]
    NoSamplesFound(String),

    #[error("問題が見つかりません: ID {0}")]
    QuestionNotFound(u32),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] exam_matcher_common::Error),
}

pub type Result<T> = std::result::Result<T, MatcherError>;
