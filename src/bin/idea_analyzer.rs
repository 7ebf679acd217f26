//! idea-analyzer: 提交创业想法到分析服务并打印规范化结果的命令行工具
//!
//! Usage:
//!   idea-analyzer analyze <text...> [--config <path>]    Analyze an idea given inline
//!   idea-analyzer analyze --file <path>                  Analyze an idea read from a file
//!   idea-analyzer analyze -                              Analyze an idea read from stdin
//!   idea-analyzer check-config [--config <path>]         Validate endpoint configuration

use anyhow::Context;
use idea_analyzer::client::InputGauge;
use idea_analyzer::lifecycle::TracingLifecycleSink;
use idea_analyzer::{AnalysisOrchestrator, AnalysisOutcome, AnalyzerConfig};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const EXIT_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_REJECTED: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::from(EXIT_USAGE);
    }

    let result = match args[1].as_str() {
        "analyze" => cmd_analyze(&args[2..]).await,
        "check-config" => cmd_check_config(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(ExitCode::SUCCESS)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(ExitCode::SUCCESS)
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            Ok(ExitCode::from(EXIT_USAGE))
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn print_usage() {
    println!(
        r#"idea-analyzer: startup idea analysis client

USAGE:
    idea-analyzer <COMMAND> [OPTIONS]

COMMANDS:
    analyze <text...>           Analyze an idea given on the command line
    analyze --file <path>       Analyze an idea read from a file
    analyze -                   Analyze an idea read from stdin
    check-config                Validate the configured endpoint
    version                     Show version information
    help                        Show this help message

OPTIONS:
    --config <path>             YAML config file (environment overrides it)

ENVIRONMENT:
    IDEA_ANALYZER_ENDPOINT      Analysis service URL
    IDEA_ANALYZER_TIMEOUT_MS    Request deadline in milliseconds (default 30000)
    IDEA_ANALYZER_PROXY_URL     Optional HTTP(S) proxy
    RUST_LOG                    Log filter (default: warn)"#
    );
}

fn cmd_version() {
    println!("idea-analyzer {}", env!("CARGO_PKG_VERSION"));
}

/// Pull `--flag <value>` out of `args`, returning the value and the remaining args.
fn take_flag(args: &[String], flag: &str) -> anyhow::Result<(Option<String>, Vec<String>)> {
    let mut value = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            let v = iter
                .next()
                .with_context(|| format!("{flag} requires a value"))?;
            value = Some(v.clone());
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((value, rest))
}

fn load_config(path: Option<String>) -> anyhow::Result<AnalyzerConfig> {
    let Some(p) = path else {
        return Ok(AnalyzerConfig::from_env());
    };
    let path = PathBuf::from(&p);
    let file = AnalyzerConfig::from_yaml_file(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    Ok(file.with_env_overrides())
}

fn read_idea(args: &[String]) -> anyhow::Result<String> {
    let (file, rest) = take_flag(args, "--file")?;
    if let Some(file) = file {
        return std::fs::read_to_string(&file).with_context(|| format!("failed to read {file}"));
    }
    if rest.len() == 1 && rest[0] == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read idea from stdin")?;
        return Ok(buf);
    }
    Ok(rest.join(" "))
}

async fn cmd_analyze(args: &[String]) -> anyhow::Result<ExitCode> {
    let (config_path, rest) = take_flag(args, "--config")?;
    let config = load_config(config_path)?;
    let idea = read_idea(&rest)?;

    let gauge = InputGauge::measure(&idea);
    if gauge.near_limit && !gauge.over_limit {
        eprintln!(
            "note: idea is {} characters; {} remaining before the limit",
            gauge.chars, gauge.remaining
        );
    }

    let orchestrator = AnalysisOrchestrator::builder()
        .config(config)
        .sink(Arc::new(TracingLifecycleSink))
        .build()?;

    match orchestrator.submit(&idea).await {
        Ok(AnalysisOutcome::Complete(analysis)) => {
            let mut json = serde_json::to_value(&analysis)?;
            if let Some(obj) = json.as_object_mut() {
                obj.insert(
                    "verdictTone".to_string(),
                    serde_json::to_value(analysis.verdict_tone())?,
                );
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(AnalysisOutcome::Failed(err)) => {
            eprintln!("{}", err.message);
            if !err.missing.is_empty() {
                let names: Vec<&str> = err.missing.iter().map(|f| f.name()).collect();
                eprintln!("missing fields: {}", names.join(", "));
            }
            if err.retryable {
                match err.retry_after {
                    Some(after) => eprintln!("(retryable after {}s)", after.as_secs()),
                    None => eprintln!("(retryable)"),
                }
            }
            Ok(ExitCode::from(EXIT_FAILED))
        }
        Err(rejected) => {
            eprintln!("{rejected}");
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

fn cmd_check_config(args: &[String]) -> anyhow::Result<ExitCode> {
    let (config_path, _) = take_flag(args, "--config")?;
    let config = load_config(config_path)?;

    match config.resolve_endpoint() {
        Ok(url) => {
            println!("endpoint:   {url}");
            println!("timeout_ms: {}", config.timeout().as_millis());
            if let Some(proxy) = config.proxy_url.as_deref() {
                println!("proxy:      {proxy}");
            }
            println!("✓ configuration OK");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("✗ {e}");
            Ok(ExitCode::from(EXIT_FAILED))
        }
    }
}
