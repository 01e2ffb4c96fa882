mod command;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

use command::{Command, ExportFormat, HELP};
use kazper_core::domain::LoadError;
use kazper_core::export::ExportError;
use kazper_core::impls::{JsonFileStore, source_for};
use kazper_core::ports::CsvSource;
use kazper_core::{Bucket, PickerConfig, PickerSession, SessionBuilder};

#[derive(Parser, Debug)]
#[command(name = "kazper", about = "Swipe through candidate names, keep or reject each one")]
struct Args {
    /// Config file (default: <config dir>/kazper/picker.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Names CSV: a file path or an http(s) URL
    #[arg(long)]
    source: Option<String>,

    /// JSON file holding picks and preferences
    #[arg(long)]
    storage: Option<PathBuf>,

    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Lock window after each judgment, in milliseconds
    #[arg(long)]
    transition_ms: Option<u64>,

    /// Fixed shuffle seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Source(#[from] LoadError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// 設定ファイル → CLI フラグの順に上書き
fn resolve_config(args: &Args) -> PickerConfig {
    let loaded = match &args.config {
        Some(path) => PickerConfig::load_from(path),
        None => PickerConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|error| {
        tracing::warn!(%error, "ignoring unusable config file");
        PickerConfig::default()
    });

    if let Some(source) = &args.source {
        config.source = source.clone();
    }
    if let Some(storage) = &args.storage {
        config.storage_path = storage.clone();
    }
    if let Some(export_dir) = &args.export_dir {
        config.export_dir = export_dir.clone();
    }
    if let Some(transition_ms) = args.transition_ms {
        config.transition_ms = transition_ms;
    }
    config
}

struct Shell {
    session: PickerSession,
    source: Box<dyn CsvSource>,
    config: PickerConfig,
    lines: Lines<BufReader<Stdin>>,
}

impl Shell {
    /// Judge through the same lock window an animated front end would use.
    async fn swipe(&mut self, bucket: Bucket) {
        let Some(pending) = self.session.begin_swipe(bucket) else {
            println!("Nothing to judge right now.");
            return;
        };
        sleep(self.config.transition()).await;
        self.session.complete_swipe(pending);
    }

    async fn confirm(&mut self, question: &str) -> Result<bool, CliError> {
        println!("{question} [y/N]");
        let answer = self.lines.next_line().await?.unwrap_or_default();
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    async fn export(&mut self, format: ExportFormat) -> Result<(), CliError> {
        let file = match format {
            ExportFormat::Csv => self.session.export_csv()?,
            ExportFormat::Json => self.session.export_json()?,
        };
        let Some(file) = file else {
            println!("No picks to export yet.");
            return Ok(());
        };

        let path = self.config.export_dir.join(&file.file_name);
        tokio::fs::create_dir_all(&self.config.export_dir).await?;
        tokio::fs::write(&path, file.contents.as_bytes()).await?;
        tracing::info!(path = %path.display(), mime = file.mime_type, "exported picks");
        println!("Wrote {}", path.display());
        Ok(())
    }

    /// Returns `false` when the user asked to quit.
    async fn apply(&mut self, command: Command) -> Result<bool, CliError> {
        match command {
            Command::Keep => self.swipe(Bucket::Kept).await,
            Command::Reject => self.swipe(Bucket::Rejected).await,
            Command::Undo => {
                if !self.session.undo() {
                    println!("Nothing to undo.");
                }
            }
            Command::Restart => {
                self.session.restart();
            }
            Command::Locale(locale) => self.session.set_locale(locale),
            Command::Gender(mode) => self.session.set_gender_mode(mode),
            Command::Move(number) => {
                match render::pick_at(&self.session.snapshot(), number) {
                    Some((id, from)) => {
                        self.session.transfer(&id, from);
                    }
                    None => println!("There is no pick #{number}."),
                }
            }
            Command::Reset => {
                if self
                    .confirm("Clear all saved picks and reset filters to defaults?")
                    .await?
                {
                    self.session.reset_all();
                }
            }
            Command::Export(format) => self.export(format).await?,
            Command::Retry => {
                self.session.load(self.source.as_ref()).await;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn run(&mut self) -> Result<(), CliError> {
        self.session.load(self.source.as_ref()).await;
        print!("{}", render::frame(&self.session.snapshot()));

        while let Some(line) = self.lines.next_line().await? {
            match command::parse(&line) {
                Ok(Some(command)) => {
                    if !self.apply(command).await? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(error) => println!("{error}"),
            }
            print!("{}", render::frame(&self.session.snapshot()));
        }
        Ok(())
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = resolve_config(&args);
    tracing::debug!(?config, "configuration resolved");

    // (A) ストアと CSV ソース
    let store = Arc::new(JsonFileStore::new(&config.storage_path));
    let source = source_for(&config.source)?;

    // (B) セッション（設定はここで読み込まれる）
    let mut builder = SessionBuilder::from_config(&config).store(store);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let session = builder.build();

    // (C) 入力ループ
    let mut shell = Shell {
        session,
        source,
        config,
        lines: BufReader::new(tokio::io::stdin()).lines(),
    };
    shell.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,kazper_core=info,kazper_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "kazper stopped");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
