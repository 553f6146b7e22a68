mod ascii;
mod config;
mod quotes;
mod system;
mod ui;
mod update;

use chrono::Local;
use config::Config;
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use std::io::{self, Write};
use system::Collector;
use tokio::io::BufReader;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use ui::{Splash, display_output};
use update::{SystemRunner, prompt_update};

enum Outcome {
    Completed,
    Interrupted,
    Failed(anyhow::Error),
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load();
    let mut stdout = io::stdout();
    ui::clear_screen(&mut stdout)?;

    let info = if config.show_system_info {
        let collector = Collector::default();
        let info = tokio::task::spawn_blocking(move || collector.collect()).await?;
        debug!("collected system info, {} probe(s) fell back", info.fallbacks());
        Some(info)
    } else {
        None
    };
    let art = if info.is_some() {
        ascii::get_ascii_art(&config.ascii_style)
    } else {
        Vec::new()
    };
    let quote = config.show_quotes.then(quotes::random_quote);

    display_output(
        &mut stdout,
        &Splash {
            width: ui::terminal_width(),
            art: &art,
            info: info.as_ref(),
            quote,
            now: Local::now(),
        },
    )?;

    let mut stdin = BufReader::new(tokio::io::stdin());
    let outcome = prompt_update(&config, &SystemRunner, &mut stdin, &mut stdout).await?;
    debug!("update step: {outcome:?}");
    Ok(())
}

/// Drives `run` to completion unless `interrupt` resolves with `Ok` first.
/// An `Err` from `interrupt` (no signal handler) leaves `run` unraced.
async fn race_interrupt<R, I>(run: R, interrupt: I) -> Outcome
where
    R: Future<Output = anyhow::Result<()>>,
    I: Future<Output = io::Result<()>>,
{
    tokio::select! {
        result = run => match result {
            Ok(()) => Outcome::Completed,
            Err(e) => Outcome::Failed(e),
        },
        Ok(()) = interrupt => Outcome::Interrupted,
    }
}

/// Reports how the run ended and returns the process exit code.
fn finish<W: Write>(outcome: &Outcome, out: &mut W) -> i32 {
    let (line, code) = match outcome {
        Outcome::Completed => return 0,
        Outcome::Interrupted => ("\n[!] Interrupted".to_string(), 0),
        Outcome::Failed(e) => {
            error!("splash failed: {e:?}");
            (format!("[!] Error: {e:#}"), 1)
        }
    };
    // nothing left to report to if stdout itself is gone
    let _ = writeln!(out, "{}{}{}", SetForegroundColor(Color::Red), line, ResetColor)
        .and_then(|_| out.flush());
    code
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let outcome = race_interrupt(run(), tokio::signal::ctrl_c()).await;

    let code = finish(&outcome, &mut io::stdout());
    // exit here rather than returning: a pending stdin read would otherwise
    // hold up runtime shutdown
    std::process::exit(code);
}
