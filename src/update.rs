use crate::config::Config;
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use std::io::{self, Write};
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::process::Command;
use tracing::{debug, info};

/// A program and its arguments, run directly without a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLine {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl CommandLine {
    pub fn argv(&self) -> Vec<&'static str> {
        std::iter::once(self.program).chain(self.args.iter().copied()).collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct PackageManager {
    pub name: &'static str,
    pub commands: &'static [CommandLine],
}

/// Probe order matters: the first one found is used.
pub const PACKAGE_MANAGERS: &[PackageManager] = &[
    PackageManager {
        name: "pacman",
        commands: &[CommandLine { program: "sudo", args: &["pacman", "-Syu"] }],
    },
    PackageManager {
        name: "apt",
        commands: &[
            CommandLine { program: "sudo", args: &["apt", "update"] },
            CommandLine { program: "sudo", args: &["apt", "upgrade"] },
        ],
    },
    PackageManager {
        name: "dnf",
        commands: &[CommandLine { program: "sudo", args: &["dnf", "upgrade"] }],
    },
    PackageManager {
        name: "yum",
        commands: &[CommandLine { program: "sudo", args: &["yum", "update"] }],
    },
];

#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Disabled,
    NoManager,
    Declined(&'static str),
    Ran(&'static str),
}

pub trait ProcessRunner {
    /// Whether `program` is on the PATH.
    async fn exists(&self, program: &str) -> bool;
    /// Runs the command attached to the terminal. Only a failure to start
    /// it is an error; the exit status is not reported back.
    async fn run(&self, command: &CommandLine) -> io::Result<()>;
}

pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn exists(&self, program: &str) -> bool {
        match Command::new("which")
            .arg(program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("which {program} failed: {e}");
                false
            }
        }
    }

    async fn run(&self, command: &CommandLine) -> io::Result<()> {
        let status = Command::new(command.program)
            .args(command.args)
            .status()
            .await?;
        debug!("{} exited with {status}", command.argv().join(" "));
        Ok(())
    }
}

pub async fn detect_package_manager<R: ProcessRunner>(runner: &R) -> Option<&'static PackageManager> {
    for pm in PACKAGE_MANAGERS {
        if runner.exists(pm.name).await {
            debug!("found package manager {}", pm.name);
            return Some(pm);
        }
    }
    None
}

fn is_yes(reply: &str) -> bool {
    matches!(reply.trim().to_lowercase().as_str(), "y" | "yes")
}

pub async fn prompt_update<R, I, W>(
    config: &Config,
    runner: &R,
    input: &mut I,
    out: &mut W,
) -> io::Result<UpdateOutcome>
where
    R: ProcessRunner,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    if !config.ask_update {
        return Ok(UpdateOutcome::Disabled);
    }
    let Some(pm) = detect_package_manager(runner).await else {
        return Ok(UpdateOutcome::NoManager);
    };

    write!(
        out,
        "{}[?]{} Update system packages using {}? {}(y/N){}: ",
        SetForegroundColor(Color::Yellow),
        ResetColor,
        pm.name,
        SetForegroundColor(Color::DarkGrey),
        ResetColor
    )?;
    out.flush()?;

    let mut reply = String::new();
    if input.read_line(&mut reply).await? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no answer to the update prompt",
        ));
    }

    if !is_yes(&reply) {
        writeln!(
            out,
            "{}[*] Skipping update{}",
            SetForegroundColor(Color::DarkGrey),
            ResetColor
        )?;
        return Ok(UpdateOutcome::Declined(pm.name));
    }

    writeln!(
        out,
        "\n{}[*]{} Running system update...",
        SetForegroundColor(Color::Cyan),
        ResetColor
    )?;
    writeln!(
        out,
        "{}Note: You may need to enter your password and confirm updates{}",
        SetForegroundColor(Color::Yellow),
        ResetColor
    )?;
    out.flush()?;

    for command in pm.commands {
        info!("running {}", command.argv().join(" "));
        runner.run(command).await.map_err(|e| {
            io::Error::new(e.kind(), format!("could not start {}: {e}", command.program))
        })?;
    }
    Ok(UpdateOutcome::Ran(pm.name))
}
