use crate::system::SystemInfo;
use chrono::{DateTime, Local};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use regex::Regex;
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::LazyLock;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 80;
pub const QUOTE_WIDTH: usize = 76;
const DIVIDER_WIDTH: usize = 80;
const CPU_MAX_CHARS: usize = 50;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid escape regex"));

/// Everything the splash needs, gathered before anything is printed.
pub struct Splash<'a> {
    pub width: usize,
    pub art: &'a [String],
    pub info: Option<&'a SystemInfo>,
    pub quote: Option<&'a str>,
    pub now: DateTime<Local>,
}

pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        Ok(_) => DEFAULT_WIDTH,
        Err(e) => {
            debug!("terminal size unavailable ({e}), assuming {DEFAULT_WIDTH} columns");
            DEFAULT_WIDTH
        }
    }
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}

pub fn strip_ansi(text: &str) -> String {
    ANSI_RE.replace_all(text, "").into_owned()
}

pub fn visible_width(text: &str) -> usize {
    strip_ansi(text).chars().count()
}

pub fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(text)) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Greedy word wrap. A word longer than `max` gets a line to itself.
pub fn wrap_quote(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len < max {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn paint(color: Color, text: impl Display) -> String {
    format!("{}{}{}", SetForegroundColor(color), text, ResetColor)
}

fn bright(color: Color, text: impl Display) -> String {
    format!(
        "{}{}{}{}",
        SetAttribute(Attribute::Bold),
        SetForegroundColor(color),
        text,
        SetAttribute(Attribute::Reset)
    )
}

fn bracket(outer: Color, inner: Color, text: &str) -> String {
    format!(
        "{}{}{}",
        bright(outer, "["),
        bright(inner, text),
        bright(outer, "]")
    )
}

fn divider() -> String {
    paint(Color::DarkGrey, "─".repeat(DIVIDER_WIDTH))
}

fn status_banner() -> String {
    format!(
        "{} {} {}",
        bracket(Color::Green, Color::White, "SYSTEM STATUS"),
        paint(Color::Green, "●"),
        bright(Color::Green, "ONLINE")
    )
}

fn info_row(label: &str, value: String) -> String {
    format!(
        "{}{}{}  {}",
        paint(Color::Magenta, "├──"),
        bracket(Color::Cyan, Color::White, label),
        " ".repeat(8usize.saturating_sub(label.len())),
        value
    )
}

fn info_panel(info: &SystemInfo) -> Vec<String> {
    let memory = info.memory.value();
    let cpu: String = info.cpu.value().chars().take(CPU_MAX_CHARS).collect();
    vec![
        bracket(Color::Magenta, Color::Cyan, "SYSTEM INFORMATION"),
        paint(Color::DarkGrey, "-".repeat(50)),
        info_row(
            "USER",
            paint(
                Color::Green,
                format!("{}@{}", info.user.value(), info.hostname.value()),
            ),
        ),
        info_row("OS", paint(Color::White, info.os.value())),
        info_row("KERNEL", paint(Color::White, info.kernel.value())),
        info_row("SHELL", paint(Color::White, info.shell.value())),
        info_row("UPTIME", paint(Color::White, info.uptime.value())),
        info_row(
            "MEMORY",
            format!(
                "{} {}",
                paint(
                    Color::White,
                    format!("{}MB / {}MB", memory.used_mb, memory.total_mb)
                ),
                paint(Color::Magenta, format!("({:.1}%)", memory.percent))
            ),
        ),
        format!(
            "{}{} {}",
            paint(Color::DarkGrey, "----->"),
            bracket(Color::Cyan, Color::White, "CPU"),
            paint(Color::Yellow, cpu)
        ),
    ]
}

fn quote_panel(quote: &str) -> Vec<String> {
    let mut lines = vec![
        bracket(Color::Green, Color::White, "QUOTE OF THE DAY"),
        paint(Color::DarkGrey, "-".repeat(21)),
    ];
    lines.extend(
        wrap_quote(quote, QUOTE_WIDTH)
            .into_iter()
            .map(|line| paint(Color::White, line)),
    );
    lines
}

fn timestamp(now: &DateTime<Local>) -> String {
    format!(
        "{} {}",
        bracket(Color::Magenta, Color::Cyan, &now.format("%A, %B %d, %Y").to_string()),
        bracket(Color::Magenta, Color::Cyan, &now.format("%H:%M:%S").to_string())
    )
}

pub fn display_output<W: Write>(out: &mut W, splash: &Splash) -> io::Result<()> {
    let width = splash.width;
    let divider = divider();

    writeln!(out)?;
    writeln!(out, "{}", center(&divider, width))?;
    writeln!(out)?;
    writeln!(out, "{}", center(&status_banner(), width))?;
    writeln!(out)?;
    writeln!(out)?;

    if let Some(info) = splash.info {
        for line in splash.art {
            writeln!(out, "{}", center(line, width))?;
        }
        writeln!(out)?;
        for line in info_panel(info) {
            writeln!(out, "{}", center(&line, width))?;
        }
        writeln!(out)?;
    }

    if let Some(quote) = splash.quote {
        for line in quote_panel(quote) {
            writeln!(out, "{}", center(&line, width))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", center(&timestamp(&splash.now), width))?;
    writeln!(out)?;
    writeln!(out, "{}", center(&divider, width))?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::QUOTES;
    use crate::system::{Memory, Probe};
    use chrono::TimeZone;

    fn sample_info() -> SystemInfo {
        let s = |v: &str| Probe::Gathered(v.to_string());
        SystemInfo {
            os: s("Arch Linux Rolling Release"),
            user: s("neo"),
            hostname: s("nebuchadnezzar"),
            uptime: s("3h 25m"),
            memory: Probe::Gathered(Memory {
                used_mb: 6000,
                total_mb: 10000,
                percent: 60.0,
            }),
            cpu: s("AMD Ryzen 9 7950X 16-Core Processor with an unusually long marketing name"),
            kernel: s("6.9.1-arch1-1"),
            shell: s("zsh"),
        }
    }

    fn render(splash: &Splash) -> String {
        let mut buf = Vec::new();
        display_output(&mut buf, splash).unwrap();
        strip_ansi(&String::from_utf8(buf).unwrap())
    }

    #[test]
    fn center_ignores_escape_codes() {
        let colored = paint(Color::Cyan, "0123456789");
        assert_eq!(visible_width(&colored), 10);
        let centered = center(&colored, 80);
        assert!(centered.starts_with(&" ".repeat(35)));
        assert!(!centered.starts_with(&" ".repeat(36)));
    }

    #[test]
    fn center_wider_than_terminal_has_no_padding() {
        let long = "x".repeat(100);
        assert_eq!(center(&long, 80), long);
    }

    #[test]
    fn strip_handles_compound_sequences() {
        assert_eq!(strip_ansi("\x1b[1;35m[\x1b[0mok\x1b[38;5;14m]"), "[ok]");
    }

    #[test]
    fn wrap_stays_within_width_and_keeps_words() {
        for quote in QUOTES {
            let lines = wrap_quote(quote, QUOTE_WIDTH);
            assert!(lines.iter().all(|l| l.chars().count() <= QUOTE_WIDTH));
            assert!(lines.iter().all(|l| !l.is_empty()));
            let words: Vec<&str> = quote.split_whitespace().collect();
            assert_eq!(lines.join(" "), words.join(" "));
        }
        assert!(wrap_quote(QUOTES[0], QUOTE_WIDTH).len() > 1);
    }

    #[test]
    fn wrap_short_quote_is_one_line() {
        assert_eq!(
            wrap_quote("Talk is cheap.", QUOTE_WIDTH),
            vec!["Talk is cheap.".to_string()]
        );
        assert!(wrap_quote("   ", QUOTE_WIDTH).is_empty());
    }

    #[test]
    fn wrap_overlong_word_stands_alone() {
        let word = "y".repeat(90);
        let text = format!("a {word} b");
        assert_eq!(wrap_quote(&text, QUOTE_WIDTH), vec!["a".to_string(), word, "b".to_string()]);
    }

    #[test]
    fn sections_render_in_order() {
        let info = sample_info();
        let art = crate::ascii::get_ascii_art("cyberpunk");
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
        let out = render(&Splash {
            width: 120,
            art: &art,
            info: Some(&info),
            quote: Some(QUOTES[1]),
            now,
        });

        let pos = |needle: &str| out.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        assert!(pos("SYSTEM STATUS") < pos("⣿"));
        assert!(pos("⣿") < pos("SYSTEM INFORMATION"));
        assert!(pos("SYSTEM INFORMATION") < pos("QUOTE OF THE DAY"));
        assert!(pos("QUOTE OF THE DAY") < pos("[Saturday, March 09, 2024] [07:05:03]"));
        assert!(out.contains("neo@nebuchadnezzar"));
        assert!(out.contains("6000MB / 10000MB (60.0%)"));
        assert!(out.contains("Talk is cheap. Show me the code. - Linus Torvalds"));
        assert!(!out.contains("marketing name"));
        assert_eq!(out.matches(&"─".repeat(80)).count(), 2);
    }

    #[test]
    fn disabled_sections_are_omitted() {
        let art = crate::ascii::get_ascii_art("cyberpunk");
        let out = render(&Splash {
            width: 80,
            art: &art,
            info: None,
            quote: None,
            now: Local::now(),
        });
        assert!(out.contains("SYSTEM STATUS"));
        assert!(!out.contains("SYSTEM INFORMATION"));
        assert!(!out.contains("QUOTE OF THE DAY"));
        assert!(!out.contains("⣿"));
    }
}
