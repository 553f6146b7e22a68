use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use include_dir::{Dir, include_dir};
use tracing::debug;

static ART_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/art");

const DEFAULT_STYLE: &str = "cyberpunk";

// $1..$4 in the art files
fn marker_style(idx: u32) -> String {
    match idx {
        1 => format!("{}", SetForegroundColor(Color::Magenta)),
        2 => format!("{}", SetForegroundColor(Color::Cyan)),
        3 => format!(
            "{}{}",
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Cyan)
        ),
        4 => format!("{}", SetAttribute(Attribute::Dim)),
        _ => String::new(),
    }
}

/// Replaces `$N` colour markers with escape sequences and resets at the end
/// of the line, so each line can be centered on its own.
pub fn process_art_colors(line: &str) -> String {
    let mut result = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' {
            if let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                chars.next();
                result.push_str(&marker_style(digit));
                continue;
            }
        }
        result.push(c);
    }
    result.push_str(&format!("{}{}", SetAttribute(Attribute::Reset), ResetColor));
    result
}

fn raw_art(style: &str) -> &'static str {
    let file = ART_DIR
        .get_file(format!("{style}.txt"))
        .or_else(|| {
            debug!("no art for style {style:?}, using {DEFAULT_STYLE}");
            ART_DIR.get_file(format!("{DEFAULT_STYLE}.txt"))
        });
    file.and_then(|f| f.contents_utf8()).unwrap_or("")
}

pub fn get_ascii_art(style: &str) -> Vec<String> {
    raw_art(style).lines().map(process_art_colors).collect()
}
