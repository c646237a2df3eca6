//! Terminal colors for highlighted nodes

use crate::tree::Highlight;

/// Escape sequence closing every colored value
pub const ANSI_RESET: &str = "\u{1b}[0m";

const ANSI_WHITE_BACKGROUND: &str = "\u{1b}[47m";
const ANSI_BLUE_BACKGROUND: &str = "\u{1b}[44m";
const ANSI_RED_BACKGROUND: &str = "\u{1b}[41m";
const ANSI_BLACK: &str = "\u{1b}[30m";

/// How highlights are expressed in rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorStyle {
    /// ANSI background colors around each value
    #[default]
    Ansi,

    /// No escape codes; front ends tag colors themselves
    Plain,
}

impl ColorStyle {
    /// Prefix emitted before a value with this highlight
    pub fn prefix(self, highlight: Highlight) -> String {
        match self {
            ColorStyle::Ansi => ansi_color(highlight),
            ColorStyle::Plain => String::new(),
        }
    }

    /// Suffix emitted after every value
    pub fn suffix(self) -> &'static str {
        match self {
            ColorStyle::Ansi => ANSI_RESET,
            ColorStyle::Plain => "",
        }
    }
}

/// Full ANSI color string for a highlight (background + black foreground)
pub fn ansi_color(highlight: Highlight) -> String {
    let background = match highlight {
        Highlight::Default => ANSI_WHITE_BACKGROUND,
        Highlight::Path => ANSI_BLUE_BACKGROUND,
        Highlight::Compute => ANSI_RED_BACKGROUND,
    };
    format!("{}{}", background, ANSI_BLACK)
}

/// Inverse of [`ansi_color`]
pub fn highlight_from_ansi(color: &str) -> Option<Highlight> {
    [Highlight::Default, Highlight::Path, Highlight::Compute]
        .into_iter()
        .find(|&highlight| ansi_color(highlight) == color)
}

/// Remove SGR escape sequences (`ESC [ digits/semicolons m`)
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' || chars.peek() != Some(&'[') {
            out.push(ch);
            continue;
        }
        chars.next();
        while let Some(&next) = chars.peek() {
            chars.next();
            if next == 'm' || !(next.is_ascii_digit() || next == ';') {
                break;
            }
        }
    }

    out
}

/// Legend explaining the highlight colors
pub fn legend() -> &'static str {
    "Legend:\n\
     Blue -> Highlights path\n\
     Red  -> Highlights nodes used for computing results/performing updates"
}
