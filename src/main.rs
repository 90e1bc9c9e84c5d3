use anyhow::Context;
use clap::Parser;
use exam_matcher::{cli, config, error, eval, loader, output};
use exam_matcher_common::{clean_recognized_text, Matcher};
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    let corpus_path = || config.resolve_corpus_path(cli.corpus.as_deref());
    let corrections_path = cli.corrections.clone().or_else(|| config.corrections_path.clone());

    match &cli.command {
        Commands::Match { input, threshold, json, show_text } => {
            let raw = loader::read_input(input.as_deref())?;
            let corpus = loader::load_corpus(&corpus_path()?)?;
            let corrections = loader::load_corrections(corrections_path.as_deref())?;

            let mut options = config.match_options();
            if let Some(threshold) = threshold {
                options.threshold = *threshold;
            }
            let matcher = Matcher::new(corrections, options);

            if *show_text {
                println!("認識テキスト:");
                println!("{}\n", clean_recognized_text(&raw, matcher.corrections()));
                println!("抽出した問題文: {}\n", matcher.extract_stem(&raw));
            }

            let candidates = matcher.find_matches(&raw, &corpus);

            if *json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                print!("{}", output::format_candidates(&candidates));
            }
        }

        Commands::Search { keyword, json } => {
            let corpus = loader::load_corpus(&corpus_path()?)?;
            let found = corpus.search(keyword);

            if *json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                println!("「{}」: {}件\n", keyword, found.len());
                for record in found {
                    println!("{}", output::format_record(record));
                }
            }
        }

        Commands::Show { id } => {
            let corpus = loader::load_corpus(&corpus_path()?)?;
            let record = corpus.get(*id).ok_or(error::MatcherError::QuestionNotFound(*id))?;
            print!("{}", output::format_record(record));
        }

        Commands::Eval { folder, threshold, containment_bonus, output: report_path } => {
            println!("📝 exam-matcher - 照合精度評価\n");

            println!("[1/3] サンプルをスキャン中...");
            let samples = eval::scan_samples(folder)?;
            println!("✔ {}件のサンプルを検出\n", samples.len());

            println!("[2/3] 題庫を読み込み中...");
            let corpus = loader::load_corpus(&corpus_path()?)?;
            let corrections = loader::load_corrections(corrections_path.as_deref())?;
            println!("✔ {}問\n", corpus.len());

            let mut options = config.match_options();
            if let Some(threshold) = threshold {
                options.threshold = *threshold;
            }
            if let Some(bonus) = containment_bonus {
                options.weights.containment_bonus = *bonus;
            }
            let matcher = Matcher::new(corrections, options);

            println!("[3/3] 照合中...");
            let report = eval::evaluate(&samples, &corpus, &matcher, true);
            println!("✔ 評価完了\n");
            print!("{}", output::format_eval_summary(&report));

            if let Some(path) = report_path {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(path, json)
                    .with_context(|| format!("評価結果の保存に失敗しました: {}", path.display()))?;
                println!("\n✔ 結果を保存: {}", path.display());
            }
        }

        Commands::Tables => {
            let table = loader::load_corrections(corrections_path.as_deref())?;
            println!("補正テーブル ({}件)", table.len());
            for rule in table.rules() {
                if rule.to.is_empty() {
                    println!("  「{}」 → (削除)", rule.from);
                } else {
                    println!("  「{}」 → 「{}」", rule.from, rule.to);
                }
            }
            println!("fingerprint: {}", table.fingerprint());
        }

        Commands::Config { set_corpus, set_threshold, show } => {
            let mut config = config.clone();

            if let Some(path) = set_corpus {
                config.set_corpus_path(path.clone())?;
                println!("✔ 題庫パスを設定しました");
            }

            if let Some(threshold) = set_threshold {
                config.set_threshold(*threshold)?;
                println!("✔ 閾値を設定しました");
            }

            if *show || (set_corpus.is_none() && set_threshold.is_none()) {
                println!("設定:");
                println!(
                    "  題庫: {}",
                    config
                        .corpus_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!(
                    "  補正テーブル: {}",
                    config
                        .corrections_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".into())
                );
                println!("  閾値: {}", config.threshold);
                println!("  高信頼: {}", config.high_confidence);
                println!("  最大候補数: {}", config.fallback_limit);
                println!("  部分一致加点: {}", config.containment_bonus);
            }
        }
    }

    Ok(())
}
