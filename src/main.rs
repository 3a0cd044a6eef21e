// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::sync::Arc;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use catdesc::app_config::{self, Config, ConfigOverrides, TranslationProvider};
use catdesc::sql::databricks::DatabricksSession;
use catdesc::sql::dry_run::DryRunSession;
use catdesc::sql::SqlSession;
use catdesc::translation::TranslationService;
use catdesc::walker::{CatalogWalker, WalkerConfig};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "libretranslate")]
    LibreTranslate,
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::LibreTranslate => TranslationProvider::LibreTranslate,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate, translate and write catalog descriptions (default command)
    Run(RunArgs),

    /// Write a default configuration file
    InitConfig {
        /// Where to write the configuration
        #[arg(value_name = "PATH", default_value = "catdesc.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions for catdesc
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "catdesc.json")]
    config_path: PathBuf,

    /// Catalog to walk
    #[arg(long)]
    catalog: Option<String>,

    /// Schema to walk (repeat for several; replaces the configured list)
    #[arg(long = "schema", value_name = "SCHEMA")]
    schemas: Vec<String>,

    /// Source language code (e.g., 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'pt')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name for LLM translation providers
    #[arg(short, long)]
    model: Option<String>,

    /// Workspace host
    #[arg(long, env = "DATABRICKS_HOST")]
    host: Option<String>,

    /// Workspace access token
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// SQL warehouse id
    #[arg(long, env = "DATABRICKS_WAREHOUSE_ID")]
    warehouse_id: Option<String>,

    /// Log ALTER statements instead of executing them
    #[arg(long)]
    dry_run: bool,

    /// Record failing tables and keep going
    #[arg(long)]
    continue_on_error: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// catdesc - catalog descriptions, generated and translated
///
/// Walks the schemas of a catalog, generates missing English table and column
/// descriptions with the warehouse AI function, translates them and writes
/// them back as comments.
#[derive(Parser, Debug)]
#[command(name = "catdesc")]
#[command(version)]
#[command(about = "Generate and translate data catalog descriptions")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "catdesc fills in table and column descriptions of a data warehouse catalog and writes them back translated.

EXAMPLES:
    catdesc                                         # Run with catdesc.json
    catdesc --catalog main --schema sales           # Walk a single schema
    catdesc -s en -t pt -p ollama -m llama3.2:3b    # Translate with a local LLM
    catdesc --dry-run --log-level debug             # Show the ALTER statements only
    catdesc init-config                             # Write a default catdesc.json
    catdesc completions bash > catdesc.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in catdesc.json by default. If the file doesn't
    exist, a default one is created. Warehouse credentials can also come from
    DATABRICKS_HOST, DATABRICKS_TOKEN and DATABRICKS_WAREHOUSE_ID.

SUPPORTED PROVIDERS:
    libretranslate - LibreTranslate / Argos Translate server (default: http://localhost:5000)
    ollama         - Local Ollama server (default: llama3.2:3b)
    anthropic      - Anthropic API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            catalog: self.catalog.clone(),
            schemas: self.schemas.clone(),
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
            provider: self.provider.clone().map(Into::into),
            model: self.model.clone(),
            host: self.host.clone(),
            token: self.token.clone(),
            warehouse_id: self.warehouse_id.clone(),
            continue_on_error: self.continue_on_error,
            log_level: self.log_level.clone().map(Into::into),
        }
    }
}

// @struct: Custom logger implementation
// The level is read from log::max_level() so it can change after config load
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code and tag for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "catdesc", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::InitConfig { path, force }) => init_config(&path, force),
        Some(Commands::Run(args)) => run(args).await,
        None => run(cli.run).await,
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!("Config file already exists: {} (use --force to overwrite)", path.display()));
    }
    Config::default().save(path)?;
    info!("Default configuration written to {}", path.display());
    Ok(())
}

/// Load the config file (creating a default one when missing) and apply CLI overrides
fn load_config(options: &RunArgs) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path.display());
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    config.apply_overrides(options.overrides());

    Ok(config)
}

async fn run(options: RunArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&level));
    }

    let config = load_config(&options)?;
    log::set_max_level(level_filter(&config.log_level));

    config.validate()
        .context("Configuration validation failed")?;
    config.validate_warehouse()
        .context("Configuration validation failed")?;

    let warehouse = DatabricksSession::new(&config.warehouse)?;
    let session: Arc<dyn SqlSession> = if options.dry_run {
        info!("Dry run: ALTER statements will be logged, not executed");
        Arc::new(DryRunSession::new(warehouse))
    } else {
        Arc::new(warehouse)
    };

    let translator = Arc::new(TranslationService::new(config.translation.clone()));
    let walker = CatalogWalker::with_session(
        WalkerConfig::from_config(&config),
        session,
        config.generation.clone(),
        translator,
    );

    let summary = walker.run().await?;

    if !summary.failures.is_empty() {
        return Err(anyhow!("{} schema(s)/table(s) failed, see the log above", summary.failures.len()));
    }

    Ok(())
}
