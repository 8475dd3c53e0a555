use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use log::{LevelFilter, info, warn};
use services::{
    AppServices, Clock, QuestionSource, QuizConfig, QuizRunner, SheetQuestionSource, convert_file,
};
use ui::{App, UiApp, build_app_context};

const DEFAULT_CONVERT_INPUT: &str = "data.json";
const DEFAULT_CONVERT_OUTPUT: &str = "converted_data.csv";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidExamSecs { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidExamSecs { raw } => write!(f, "invalid --exam-secs value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    runner: Arc<QuizRunner>,
}

impl UiApp for DesktopApp {
    fn runner(&self) -> Arc<QuizRunner> {
        Arc::clone(&self.runner)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [--db <sqlite_url>] [--sheet-url <url>] [--snapshot <path>] [--exam-secs <n>]");
    eprintln!("  cargo run -p app -- refresh [--sheet-url <url>] [--snapshot <path>]");
    eprintln!("  cargo run -p app -- years   [--sheet-url <url>] [--snapshot <path>]");
    eprintln!("  cargo run -p app -- convert [--input <json>] [--output <csv>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --snapshot data.json");
    eprintln!("  --exam-secs 3600");
    eprintln!("  --input {DEFAULT_CONVERT_INPUT} --output {DEFAULT_CONVERT_OUTPUT}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_SHEET_CSV_URL, QUIZ_SNAPSHOT_PATH, QUIZ_CACHE_TTL_SECS, QUIZ_EXAM_SECS");
    eprintln!("  QUIZ_REMOTE_BASE_URL, QUIZ_REMOTE_UID, QUIZ_REMOTE_TOKEN, QUIZ_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Refresh,
    Years,
    Convert,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "refresh" => Some(Self::Refresh),
            "years" => Some(Self::Years),
            "convert" => Some(Self::Convert),
            _ => None,
        }
    }
}

/// Environment configuration with command-line overrides applied.
fn parse_config(args: &mut impl Iterator<Item = String>) -> Result<QuizConfig, ArgsError> {
    let mut config = QuizConfig::from_env();
    config.db_url = normalize_sqlite_url(config.db_url);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let value = require_value(args, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                config.db_url = normalize_sqlite_url(value);
            }
            "--sheet-url" => {
                config.sheet.csv_url = Some(require_value(args, "--sheet-url")?);
            }
            "--snapshot" => {
                config.sheet.snapshot_path = Some(PathBuf::from(require_value(args, "--snapshot")?));
            }
            "--exam-secs" => {
                let value = require_value(args, "--exam-secs")?;
                let secs: i64 = value
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ArgsError::InvalidExamSecs { raw: value.clone() })?;
                config.exam_duration = chrono::Duration::seconds(secs);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(config)
}

fn parse_convert(args: &mut impl Iterator<Item = String>) -> Result<(PathBuf, PathBuf), ArgsError> {
    let mut input = PathBuf::from(DEFAULT_CONVERT_INPUT);
    let mut output = PathBuf::from(DEFAULT_CONVERT_OUTPUT);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => input = PathBuf::from(require_value(args, "--input")?),
            "--output" => output = PathBuf::from(require_value(args, "--output")?),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok((input, output))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_logging() -> Result<(), fern::InitError> {
    let level = std::env::var("QUIZ_LOG")
        .ok()
        .and_then(|raw| raw.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(level)
        // sqlx and the webview are chatty at info.
        .level_for("sqlx", LevelFilter::Warn)
        .level_for("tao", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Launch the UI when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }
    let mut iter = argv.into_iter();
    let report_args = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };

    match cmd {
        Command::Convert => {
            let (input, output) = parse_convert(&mut iter).map_err(report_args)?;
            let report = convert_file(&input, &output).await?;
            println!(
                "Processed {} records ({} with options recovered) into {}",
                report.processed,
                report.recovered,
                output.display()
            );
            Ok(())
        }
        Command::Refresh => {
            let config = parse_config(&mut iter).map_err(report_args)?;
            let source = SheetQuestionSource::new(config.sheet, Clock::system())?;
            let questions = source.refresh().await?;
            println!("Loaded {} questions", questions.len());
            Ok(())
        }
        Command::Years => {
            let config = parse_config(&mut iter).map_err(report_args)?;
            let source = SheetQuestionSource::new(config.sheet, Clock::system())?;
            for entry in source.list_years().await? {
                println!("{}\t{}", entry.id, entry.description);
            }
            Ok(())
        }
        Command::Ui => {
            let config = parse_config(&mut iter).map_err(report_args)?;

            // Open + migrate SQLite at startup. Keep this in the binary glue.
            prepare_sqlite_file(&config.db_url)?;
            let services = AppServices::new_sqlite(&config, Clock::system()).await?;
            if config.sheet.csv_url.is_none() {
                warn!("no sheet URL configured; questions come from the snapshot only");
            }
            info!("opening quiz window (db={})", config.db_url);

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                runner: services.runner(),
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
