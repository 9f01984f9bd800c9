//! Markup helpers for terminal output.
//!
//! Output is an HTML fragment. User-controlled text is always escaped before
//! it is wrapped; class names map onto the renderer's theme stylesheet.

/// Semantic style of a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Error message (red)
    Error,
    /// Success message (green)
    Success,
    /// Info message (yellow)
    Info,
    /// Directory entry (cyan, bold)
    Directory,
    /// Regular file entry
    File,
    /// Hidden entry (dimmed)
    Hidden,
    /// Section heading
    Heading,
    /// Secondary text
    Muted,
    /// Inline command reference
    Command,
}

impl Style {
    fn class(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
            Self::Directory => "dir",
            Self::File => "file",
            Self::Hidden => "hidden",
            Self::Heading => "heading",
            Self::Muted => "muted",
            Self::Command => "cmd",
        }
    }
}

/// Escape text for inclusion in markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap escaped text in a styled span.
pub fn span(style: Style, text: &str) -> String {
    format!("<span class=\"{}\">{}</span>", style.class(), escape(text))
}

pub fn error(text: &str) -> String {
    span(Style::Error, text)
}

pub fn success(text: &str) -> String {
    span(Style::Success, text)
}

pub fn info(text: &str) -> String {
    span(Style::Info, text)
}

/// Escape text and convert newlines into display breaks.
pub fn breaks(text: &str) -> String {
    escape(text).replace('\n', "<br>")
}

/// Join markup lines with display breaks.
pub fn lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| l.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Markup block consumed by the renderer's QR collaborator.
pub fn qr_block(data: &str) -> String {
    format!("<div class=\"qr\" data-qr=\"{}\"></div>", escape(data))
}
