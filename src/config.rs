use crate::error::{MatcherError, Result};
use exam_matcher_common::{MatchOptions, ScoringWeights};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 題庫パスを上書きする環境変数
pub const CORPUS_ENV: &str = "EXAM_MATCHER_CORPUS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub corpus_path: Option<PathBuf>,
    /// 補正テーブルJSON（省略時は組み込み）
    pub corrections_path: Option<PathBuf>,
    pub threshold: f64,
    pub high_confidence: f64,
    pub fallback_limit: usize,
    pub containment_bonus: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 既定の場所から読み込む（ファイルがなければ既定値）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default_config());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| MatcherError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// `~/.config/exam-matcher/config.json`
    pub fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config").join("exam-matcher").join("config.json"))
            .ok_or_else(|| MatcherError::Config("ホームディレクトリが見つかりません".into()))
    }

    fn default_config() -> Self {
        let options = MatchOptions::default();
        Self {
            corpus_path: None,
            corrections_path: None,
            threshold: options.threshold,
            high_confidence: options.high_confidence,
            fallback_limit: options.fallback_limit,
            containment_bonus: options.weights.containment_bonus,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("threshold", self.threshold),
            ("high_confidence", self.high_confidence),
            ("containment_bonus", self.containment_bonus),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MatcherError::Config(format!(
                    "{} は0.0-1.0の範囲で指定してください: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// 題庫パスを決める
    ///
    /// 優先順: コマンドライン引数 > 環境変数`EXAM_MATCHER_CORPUS` > 設定ファイル
    pub fn resolve_corpus_path(&self, cli_path: Option<&Path>) -> Result<PathBuf> {
        let env_path = std::env::var_os(CORPUS_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        cli_path
            .map(Path::to_path_buf)
            .or(env_path)
            .or_else(|| self.corpus_path.clone())
            .ok_or(MatcherError::MissingCorpus)
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            threshold: self.threshold,
            high_confidence: self.high_confidence,
            fallback_limit: self.fallback_limit,
            weights: ScoringWeights {
                containment_bonus: self.containment_bonus,
                ..Default::default()
            },
        }
    }

    pub fn set_corpus_path(&mut self, path: PathBuf) -> Result<()> {
        self.corpus_path = Some(path);
        self.save()
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.threshold = threshold;
        self.validate()?;
        self.save()
    }
}
