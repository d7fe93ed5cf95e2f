// ==========================================
// 牛只排放因子计算系统 - 批量计算入口
// ==========================================
// 用法:
//   afolu-ef <畜群文件.csv|.xlsx> [db_path] [--config engine.json] [--locale en]
//
// 输出: 每行一个 JSON 对象（stdout），日志写 stderr
// ==========================================

use afolu_ef::config::{ConfigManager, EngineConfig};
use afolu_ef::engine::{BatchEvaluator, EmissionEngine};
use afolu_ef::i18n::{set_locale, t_with_args};
use afolu_ef::importer::ProfileImporter;
use afolu_ef::repository::SqliteReferenceRepository;
use afolu_ef::{db, logging};
use anyhow::{anyhow, bail, Context};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    db_path: PathBuf,
    config_path: Option<PathBuf>,
    locale: Option<String>,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut positional = Vec::new();
    let mut config_path = None;
    let mut locale = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(args.next().context("--config 需要文件路径")?));
            }
            "--locale" => {
                locale = Some(args.next().context("--locale 需要语言代码")?);
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let input = match positional.next() {
        Some(p) => PathBuf::from(p),
        None => bail!("用法: afolu-ef <畜群文件.csv|.xlsx> [db_path] [--config engine.json] [--locale en]"),
    };
    let db_path = positional.next().map(PathBuf::from).unwrap_or_else(db::default_db_path);

    Ok(CliArgs {
        input,
        db_path,
        config_path,
        locale,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = parse_args()?;

    if let Some(locale) = &args.locale {
        set_locale(locale);
    }

    tracing::info!(version = afolu_ef::VERSION, "{}", afolu_ef::APP_NAME);
    tracing::info!(db = %args.db_path.display(), "使用参考数据库");

    let db_path = args
        .db_path
        .to_str()
        .ok_or_else(|| anyhow!("数据库路径不是有效 UTF-8: {}", args.db_path.display()))?;
    let repo = SqliteReferenceRepository::new(db_path)
        .with_context(|| format!("无法打开参考数据库 {}", db_path))?;

    // 配置: JSON 文件优先,否则读 config_kv
    let config = match &args.config_path {
        Some(path) => EngineConfig::from_json_file(path).map_err(|e| anyhow!("{}", e))?,
        None => ConfigManager::from_connection(repo.connection())
            .and_then(|m| m.load_engine_config())
            .map_err(|e| anyhow!("{}", e))?,
    };

    // 参考数据一次性载入内存
    let provider = Arc::new(repo.snapshot()?);
    let engine = Arc::new(EmissionEngine::new(config));

    let outcome = ProfileImporter::new().import_file(&args.input)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for rejected in &outcome.rejected {
        writeln!(
            out,
            "{}",
            json!({
                "row": rejected.row(),
                "status": "rejected",
                "message": rejected.to_string(),
            })
        )?;
    }

    let summary = BatchEvaluator::new(engine, provider).run(outcome.records).await;
    for row in &summary.rows {
        writeln!(out, "{}", serde_json::to_string(row)?)?;
    }
    out.flush()?;

    eprintln!(
        "{}",
        t_with_args(
            "batch.summary",
            &[
                ("total", &(summary.total + outcome.rejected.len()).to_string()),
                ("succeeded", &summary.succeeded.to_string()),
                ("failed", &(summary.failed + outcome.rejected.len()).to_string()),
                ("warned", &summary.warned.to_string()),
            ],
        )
    );

    Ok(())
}
