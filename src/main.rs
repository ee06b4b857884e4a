mod app;
mod calendar;
mod carousel;
mod help;
mod theme;
mod yearmonth;
use crate::app::App;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use datepick::{
    config::{ConfigFile, Weekends},
    date::parse_date,
    DatePicker, FirstDayOfWeek, PickerConfig,
};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use time::{Date, OffsetDateTime};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    config: Option<PathBuf>,
    min: Option<Date>,
    max: Option<Date>,
    disabled: Vec<Date>,
    first_day: Option<FirstDayOfWeek>,
    random_markers: bool,
    no_weekends: bool,
    log: Option<PathBuf>,
    date: Option<Date>,
}

impl RunOptions {
    /// Build the picker configuration from the config file, if any, with the
    /// command-line options taking precedence
    fn picker_config(self) -> anyhow::Result<PickerConfig> {
        let mut builder = match self.config {
            Some(ref path) => ConfigFile::load(path)?.into_builder()?,
            None => PickerConfig::builder(),
        };
        if let Some(date) = self.min {
            builder = builder.min_date(date);
        }
        if let Some(date) = self.max {
            builder = builder.max_date(date);
        }
        builder = builder.disable_dates(self.disabled);
        if let Some(first_day) = self.first_day {
            builder = builder.first_day(first_day);
        }
        if self.random_markers {
            builder = builder.generated_markers(true);
        }
        if self.no_weekends {
            builder = builder.disable_rule(Weekends);
        }
        if let Some(date) = self.date {
            builder = builder.initial_date(date);
        }
        Ok(builder.build()?)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("config") => opts.config = Some(PathBuf::from(parser.value()?)),
                Arg::Long("min") => opts.min = Some(date_value(parser.value()?)?),
                Arg::Long("max") => opts.max = Some(date_value(parser.value()?)?),
                Arg::Long("disable") => opts.disabled.push(date_value(parser.value()?)?),
                Arg::Long("sunday") => opts.first_day = Some(FirstDayOfWeek::Sunday),
                Arg::Long("monday") => opts.first_day = Some(FirstDayOfWeek::Monday),
                Arg::Long("random-markers") => opts.random_markers = true,
                Arg::Long("no-weekends") => opts.no_weekends = true,
                Arg::Long("log") => opts.log = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if opts.date.is_none() => opts.date = Some(date_value(value)?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(ref path) = opts.log {
                    init_logging(path)?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let config = opts.picker_config()?;
                let confirmed = with_terminal(|terminal| {
                    let app = App::new(DatePicker::new(config), today, Instant::now());
                    Ok(app.run(terminal)?)
                })?;
                if let Some(date) = confirmed {
                    println!("{date}");
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: datepick [<options>] [YYYY-MM-DD]");
                println!();
                println!("Pick a date from a paged terminal calendar and print it");
                println!();
                println!("Options:");
                println!("  --config FILE     Read picker settings from a TOML file");
                println!("  --min DATE        Earliest selectable date");
                println!("  --max DATE        Latest selectable date");
                println!("  --disable DATE    Make DATE unselectable (may be repeated)");
                println!("  --sunday          Start weeks on Sunday");
                println!("  --monday          Start weeks on Monday (default)");
                println!("  --random-markers  Decorate days with generated markers");
                println!("  --no-weekends     Make Saturdays and Sundays unselectable");
                println!("  --log FILE        Write debug logs to FILE");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn date_value(value: OsString) -> Result<Date, lexopt::Error> {
    let value = value.string()?;
    parse_date(&value).map_err(|e| lexopt::Error::ParsingFailed {
        value,
        error: Box::new(e),
    })
}

/// Send logs to `path`, as the terminal belongs to the UI
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("datepick=debug"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    let teardown = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    finish(r, teardown)
}

/// Combine the session's result with that of restoring the terminal.  A
/// session error wins; the teardown error is then only logged.
fn finish<T>(r: anyhow::Result<T>, teardown: io::Result<()>) -> anyhow::Result<T> {
    match (r, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e).context("failed to disable mouse capture"),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(teardown_err)) => {
            warn!(error = %teardown_err, "Failed to disable mouse capture");
            Err(e)
        }
    }
}
