//! Input line parsing.
//!
//! Supports:
//! - Whitespace tokenization: `cmd arg1 arg2`
//! - Recall expansion: `!!` (last command), `!n` (nth command), `!-n` (nth from last)
//! - A single output redirect for `echo`: `> file` or `>> file`

/// A command name with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Re-join the command as the user would have typed it.
    pub fn line(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse a raw line. Returns `None` for blank input.
pub fn parse_input(input: &str, recall: &[String]) -> Option<ParsedCommand> {
    let mut words = Vec::new();
    for token in input.split_whitespace() {
        match expand_recall(token, recall) {
            Some(expanded) => words.extend(expanded.split_whitespace().map(str::to_string)),
            None => words.push(token.to_string()),
        }
    }

    let mut words = words.into_iter();
    let name = words.next()?;
    Some(ParsedCommand {
        name,
        args: words.collect(),
    })
}

/// Expand a recall token. `None` when the token is not a recall reference.
///
/// Out-of-range references expand to nothing.
fn expand_recall(token: &str, recall: &[String]) -> Option<String> {
    if token == "!!" {
        return Some(recall.last().cloned().unwrap_or_default());
    }

    let index = token.strip_prefix('!')?;
    let n: i64 = index.parse().ok()?;
    let position = if n >= 0 {
        usize::try_from(n).ok()
    } else {
        isize::try_from(n)
            .ok()
            .and_then(|back| recall.len().checked_add_signed(back))
    };
    let entry = position.and_then(|i| recall.get(i));
    Some(entry.cloned().unwrap_or_default())
}

/// Output redirect parsed from an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub append: bool,
}

/// Why a redirect could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    /// `>` or `>>` with nothing after it.
    MissingTarget,
    /// More than one redirect, or words after the target.
    Unexpected(String),
}

/// Split `args` at the first `>`/`>>` token.
///
/// Returns the words before the operator and the redirect, if any.
pub fn split_redirect(args: &[String]) -> Result<(Vec<String>, Option<Redirect>), RedirectError> {
    let Some(pos) = args.iter().position(|a| a == ">" || a == ">>") else {
        return Ok((args.to_vec(), None));
    };

    let append = args[pos] == ">>";
    let rest = &args[pos + 1..];
    match rest {
        [] => Err(RedirectError::MissingTarget),
        [target] => Ok((
            args[..pos].to_vec(),
            Some(Redirect {
                target: target.clone(),
                append,
            }),
        )),
        [_, extra, ..] => Err(RedirectError::Unexpected(extra.clone())),
    }
}

/// Strip one layer of matching quotes from text.
pub fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2
            && let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
