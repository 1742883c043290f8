use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, Select};
use skybar_core::{
    BaseTime, Config, ConditionStyle, DiagnosticStream, FetchError, ForecastFetcher, KmaClient,
    report, resolve,
};
use std::io;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skybar", version, about = "KMA village forecast line for status bars")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the forecast once and print the status line (default).
    Show,

    /// Print the issuance (base date and time) that would be requested.
    BaseTime {
        /// Local instant as "YYYY-MM-DD HH:MM"; if absent, means "now".
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
    },

    /// Interactively choose grid, style and diagnostic stream.
    Configure,
}

/// Options that take precedence over the config file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Grid x coordinate.
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub nx: Option<i32>,

    /// Grid y coordinate.
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub ny: Option<i32>,

    /// Condition text: "icons" or "words".
    #[arg(long, global = true)]
    pub style: Option<ConditionStyle>,

    /// Where diagnostics go: "stderr" or "stdout".
    #[arg(long, global = true)]
    pub diagnostics: Option<DiagnosticStream>,

    /// Log request details to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    /// HTTP timeout in seconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl Overrides {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(nx) = self.nx {
            config.grid.nx = nx;
        }
        if let Some(ny) = self.ny {
            config.grid.ny = ny;
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(stream) = self.diagnostics {
            config.diagnostic_stream = stream;
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        config.debug_output |= self.debug;
        config
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let loaded = Config::load();
        let config = self.overrides.apply(loaded.as_ref().ok().cloned().unwrap_or_default());

        init_logging(config.debug_output);

        match self.command.unwrap_or(Command::Show) {
            Command::Show => {
                let outcome = match loaded {
                    Ok(_) => show(&config).await,
                    Err(e) => {
                        log::error!("{e:#}");
                        Err(FetchError::Fatal(e.to_string()))
                    }
                };

                report(
                    &outcome,
                    config.diagnostic_stream,
                    &mut io::stdout().lock(),
                    &mut io::stderr().lock(),
                )?;
            }
            Command::BaseTime { at } => {
                let base = at.map(resolve).unwrap_or_else(BaseTime::current);
                println!("{base}");
            }
            Command::Configure => {
                if let Err(e) = &loaded {
                    log::warn!("ignoring unreadable config: {e:#}");
                }
                configure(config)?;
            }
        }

        Ok(())
    }
}

async fn show(config: &Config) -> Result<String, FetchError> {
    let issuance = BaseTime::current();
    log::debug!(
        "base time {issuance}, grid {}/{}",
        config.grid.nx,
        config.grid.ny
    );

    let client = KmaClient::new(config.base_url.as_str(), config.timeout())?;
    let fetcher = ForecastFetcher::new(Box::new(client), config.grid, config.style);

    fetcher.fetch(config.credential().as_deref(), issuance).await
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    config.grid.nx = CustomType::<i32>::new("Grid nx:")
        .with_default(config.grid.nx)
        .prompt()?;
    config.grid.ny = CustomType::<i32>::new("Grid ny:")
        .with_default(config.grid.ny)
        .prompt()?;

    let styles = ConditionStyle::all();
    let cursor = styles.iter().position(|s| *s == config.style).unwrap_or(0);
    config.style = Select::new("Condition style:", styles.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    let streams = DiagnosticStream::all();
    let cursor = streams
        .iter()
        .position(|s| *s == config.diagnostic_stream)
        .unwrap_or(0);
    config.diagnostic_stream = Select::new("Print diagnostics to:", streams.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    config.debug_output = Confirm::new("Log request details to stderr?")
        .with_default(config.debug_output)
        .prompt()?;

    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    println!("The service key is read from ${}.", config.api_key_env);

    Ok(())
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or(if debug { "debug" } else { "off" });
    env_logger::init_from_env(env);
}

fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}
