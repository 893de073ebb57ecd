use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use argh::FromArgs;
use console::style;

use snipgen::core::{KeywordStore, Prompter, StdioPrompter};

use self::env::SystemEnvironment;
use self::input::LineReader;
use self::shell::Shell;
use self::util::PacedWriter;

mod commands;
mod env;
mod input;
mod shell;
mod util;

/// Interactive generator of C++17 example programs. Type a line with
/// keywords to get a program, `:help` for commands or `exit` to quit
#[derive(FromArgs)]
struct App {
    /// path to the user keyword store.
    /// If not indicated, $SNIPGEN_STORE or `user_keywords.db` is used instead
    #[argh(option, short = 's')]
    store: Option<String>,

    /// delay in milliseconds between printed characters of generated programs
    #[argh(option, default = "0")]
    delay_ms: u64,

    /// log level filter (error, warn, info, debug, trace).
    /// If not indicated, $RUST_LOG or `warn` is used instead
    #[argh(option)]
    log_level: Option<String>,

    /// print version information and exit
    #[argh(switch, short = 'V')]
    version: bool,
}

fn main() -> Result<ExitCode> {
    let app: App = argh::from_env();
    if app.version {
        println!("snipgen {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    setup_logging(app.log_level.as_deref());

    let env = SystemEnvironment;
    let store = KeywordStore::open(env.store_path(app.store.as_deref()));
    tracing::info!(path = ?store.path(), keywords = store.len(), "store opened");

    let output = PacedWriter::new(std::io::stdout(), Duration::from_millis(app.delay_ms));

    let mut prompter: Box<dyn Prompter> = if std::io::stdin().is_terminal() {
        Box::new(LineReader::new()?)
    } else {
        Box::new(StdioPrompter::new(std::io::stdin().lock(), std::io::stdout()))
    };

    let ctx = snipgen::Context::new(store, prompter.as_mut()).with_basic_modules()?;
    let mut shell = Shell::new(ctx, output);

    if let Err(e) = shell.run() {
        eprintln!("{} {e:?}", style("error:").red().bold());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn setup_logging(level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(true);

    tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .init();
}
