//! Filesystem commands: `ls`, `cd`, `pwd`, `cat`, `touch`, `mkdir`, `rm`,
//! `echo`, `grep`, `tree`.
//!
//! Paths are resolved against the session's working directory. Errors are
//! reported with the path as the user typed it.

use regex::{Regex, RegexBuilder};

use crate::core::error::FsError;
use crate::core::filesystem::Touched;
use crate::core::parser::{RedirectError, split_redirect, unquote};
use crate::core::path::{display_path, home, resolve_path};
use crate::models::{DirEntry, Directory, Node};
use crate::utils::format::{format_date_short, format_size};
use crate::utils::markup::{self, Style};
use crate::utils::now_secs;

use super::{CommandEntry, Context, Output};

const LS_HELP: &str = "\
Usage: ls [-l] [-a] [path]
List directory contents.

  -l    long format with size and modification date
  -a    include hidden entries";

const CD_HELP: &str = "\
Usage: cd [path]
Change the working directory. Without a path, go home (~).";

const PWD_HELP: &str = "\
Usage: pwd
Print the working directory.";

const CAT_HELP: &str = "\
Usage: cat <file>
Print the contents of a file.";

const TOUCH_HELP: &str = "\
Usage: touch <file>...
Create empty files, or update the timestamp of existing ones.";

const MKDIR_HELP: &str = "\
Usage: mkdir [-p] <directory>...
Create directories.

  -p    create missing parents, no error if the directory exists";

const RM_HELP: &str = "\
Usage: rm [-r] <path>...
Remove files or directories.

  -r    remove directories and their contents recursively";

const ECHO_HELP: &str = "\
Usage: echo <text> [> file | >> file]
Print text, or write it to a file.

  >     overwrite the file
  >>    append to the file";

const GREP_HELP: &str = "\
Usage: grep [-i] <pattern> <file>
Print lines of a file matching a regular expression.

  -i    ignore case";

const TREE_HELP: &str = "\
Usage: tree [path]
Show a directory as a tree.";

pub fn commands() -> Vec<CommandEntry> {
    vec![
        CommandEntry {
            name: "ls",
            handler: ls,
            summary: "List directory contents",
            help: Some(LS_HELP),
        },
        CommandEntry {
            name: "cd",
            handler: cd,
            summary: "Change directory",
            help: Some(CD_HELP),
        },
        CommandEntry {
            name: "pwd",
            handler: pwd,
            summary: "Print working directory",
            help: Some(PWD_HELP),
        },
        CommandEntry {
            name: "cat",
            handler: cat,
            summary: "Print file contents",
            help: Some(CAT_HELP),
        },
        CommandEntry {
            name: "touch",
            handler: touch,
            summary: "Create an empty file",
            help: Some(TOUCH_HELP),
        },
        CommandEntry {
            name: "mkdir",
            handler: mkdir,
            summary: "Create a directory",
            help: Some(MKDIR_HELP),
        },
        CommandEntry {
            name: "rm",
            handler: rm,
            summary: "Remove files or directories",
            help: Some(RM_HELP),
        },
        CommandEntry {
            name: "echo",
            handler: echo,
            summary: "Print text or write it to a file",
            help: Some(ECHO_HELP),
        },
        CommandEntry {
            name: "grep",
            handler: grep,
            summary: "Search a file for a pattern",
            help: Some(GREP_HELP),
        },
        CommandEntry {
            name: "tree",
            handler: tree,
            summary: "Show a directory tree",
            help: Some(TREE_HELP),
        },
    ]
}

/// Split arguments into single-letter flags and operands.
///
/// A lone `-` is an operand.
fn split_flags(args: &[String]) -> (Vec<char>, Vec<&str>) {
    let mut flags = Vec::new();
    let mut operands = Vec::new();
    for arg in args {
        match arg.strip_prefix('-') {
            Some(letters) if !letters.is_empty() => flags.extend(letters.chars()),
            _ => operands.push(arg.as_str()),
        }
    }
    (flags, operands)
}

/// Render the outcome of a multi-operand command.
fn report(ctx: &Context<'_>, lines: Vec<String>, failed: bool) -> Output {
    if failed {
        ctx.host.failure_cue();
    }
    Output::text(markup::lines(lines))
}

// =============================================================================
// Navigation
// =============================================================================

fn ls(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let (flags, operands) = split_flags(args);
    if let Some(bad) = flags.iter().find(|f| !matches!(**f, 'l' | 'a')) {
        return ctx.fail(format!("ls: invalid option -- '{}'", bad));
    }
    let long = flags.contains(&'l');
    let all = flags.contains(&'a');

    let target = operands.first().copied().unwrap_or(".");
    let segments = resolve_path(target, &ctx.session.cwd);
    let entries: Vec<DirEntry> = match ctx.session.fs.lookup(&segments) {
        Ok(Node::Directory(dir)) => dir
            .children
            .iter()
            .map(|(name, node)| DirEntry::from_node(name, node))
            .filter(|entry| all || !entry.is_hidden())
            .collect(),
        Ok(node) => vec![DirEntry::from_node(target, node)],
        Err(e) => return ctx.fail(format!("ls: {}", e.relabel(target))),
    };

    if long {
        Output::text(markup::lines(entries.iter().map(render_long)))
    } else {
        Output::text(
            entries
                .iter()
                .map(render_name)
                .collect::<Vec<_>>()
                .join("  "),
        )
    }
}

fn render_name(entry: &DirEntry) -> String {
    if entry.is_dir {
        markup::span(Style::Directory, &format!("{}/", entry.name))
    } else if entry.is_hidden() {
        markup::span(Style::Hidden, &entry.name)
    } else {
        markup::span(Style::File, &entry.name)
    }
}

fn render_long(entry: &DirEntry) -> String {
    let kind = if entry.is_dir { 'd' } else { '-' };
    format!(
        "{} {} {} {}",
        kind,
        markup::escape(&format_size(entry.size)),
        markup::span(Style::Muted, &format_date_short(entry.modified)),
        render_name(entry)
    )
}

fn cd(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let Some(target) = args.first() else {
        ctx.session.cwd = home();
        return Output::empty();
    };

    let segments = resolve_path(target, &ctx.session.cwd);
    if let Err(e) = ctx.session.fs.lookup_dir(&segments) {
        return ctx.fail(format!("cd: {}", e.relabel(target)));
    }
    ctx.session.cwd = segments;
    Output::empty()
}

fn pwd(ctx: &mut Context<'_>, _args: &[String]) -> Output {
    Output::text(markup::escape(&display_path(&ctx.session.cwd)))
}

fn tree(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let target = args.first().map(String::as_str).unwrap_or(".");
    let segments = resolve_path(target, &ctx.session.cwd);
    let dir = match ctx.session.fs.lookup_dir(&segments) {
        Ok(dir) => dir,
        Err(e) => return ctx.fail(format!("tree: {}", e.relabel(target))),
    };

    let mut lines = vec![markup::span(Style::Directory, target)];
    let mut counts = (0, 0);
    render_tree(dir, "", &mut lines, &mut counts);
    lines.push(String::new());
    lines.push(markup::span(
        Style::Muted,
        &format!("{} directories, {} files", counts.0, counts.1),
    ));
    Output::text(markup::lines(lines))
}

/// Append one line per visible descendant of `dir`.
fn render_tree(dir: &Directory, prefix: &str, lines: &mut Vec<String>, counts: &mut (usize, usize)) {
    let visible: Vec<_> = dir
        .children
        .iter()
        .filter(|(name, _)| !name.starts_with('.'))
        .collect();

    for (i, (name, node)) in visible.iter().enumerate() {
        let last = i + 1 == visible.len();
        let branch = if last { "└── " } else { "├── " };
        match node {
            Node::Directory(child) => {
                counts.0 += 1;
                lines.push(format!(
                    "{}{}{}",
                    prefix,
                    branch,
                    markup::span(Style::Directory, name)
                ));
                let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
                render_tree(child, &nested, lines, counts);
            }
            Node::File(_) => {
                counts.1 += 1;
                lines.push(format!(
                    "{}{}{}",
                    prefix,
                    branch,
                    markup::span(Style::File, name)
                ));
            }
        }
    }
}

// =============================================================================
// Reading
// =============================================================================

fn cat(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let Some(target) = args.first() else {
        return ctx.usage("cat");
    };

    let segments = resolve_path(target, &ctx.session.cwd);
    let file = match ctx.session.fs.lookup_file(&segments) {
        Ok(file) => file,
        Err(e) => return ctx.fail(format!("cat: {}", e.relabel(target))),
    };

    match &file.source {
        Some(source) => {
            let url = ctx.config.content_url(source);
            fetch_body(ctx, "cat", url, |body| markup::breaks(&body))
        }
        None => Output::text(markup::breaks(&file.content)),
    }
}

fn grep(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let (flags, operands) = split_flags(args);
    if let Some(bad) = flags.iter().find(|f| **f != 'i') {
        return ctx.fail(format!("grep: invalid option -- '{}'", bad));
    }
    let [pattern, target, ..] = operands[..] else {
        return ctx.usage("grep");
    };

    let pattern = unquote(pattern);
    let Some(regex) = build_pattern(pattern, flags.contains(&'i')) else {
        return ctx.fail(format!("grep: invalid pattern '{}'", pattern));
    };

    let segments = resolve_path(target, &ctx.session.cwd);
    let file = match ctx.session.fs.lookup_file(&segments) {
        Ok(file) => file,
        Err(e) => return ctx.fail(format!("grep: {}", e.relabel(target))),
    };

    match &file.source {
        Some(source) => {
            let url = ctx.config.content_url(source);
            fetch_body(ctx, "grep", url, move |body| matching_lines(&regex, &body))
        }
        None => Output::text(matching_lines(&regex, &file.content)),
    }
}

/// Compile `pattern`, falling back to a literal match when it is not a valid
/// regular expression.
fn build_pattern(pattern: &str, ignore_case: bool) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(ignore_case)
                .build()
        })
        .ok()
}

/// Lines of `text` matching `regex`, with the matches highlighted.
fn matching_lines(regex: &Regex, text: &str) -> String {
    markup::lines(
        text.lines()
            .filter(|line| regex.is_match(line))
            .map(|line| highlight(regex, line)),
    )
}

fn highlight(regex: &Regex, line: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for m in regex.find_iter(line) {
        if m.is_empty() {
            continue;
        }
        out.push_str(&markup::escape(&line[last..m.start()]));
        out.push_str(&markup::span(Style::Info, m.as_str()));
        last = m.end();
    }
    out.push_str(&markup::escape(&line[last..]));
    out
}

/// Fetch an externally stored body and render it once it arrives.
///
/// Cancellation is checked before and after the request.
fn fetch_body(
    ctx: &Context<'_>,
    command: &'static str,
    url: String,
    render: impl FnOnce(String) -> String + 'static,
) -> Output {
    let host = ctx.host.clone();
    let cancel = ctx.cancel.clone();
    Output::deferred(async move {
        if cancel.is_cancelled() {
            return markup::info(&format!("{}: cancelled", command));
        }
        let result = host.fetch(&url).await;
        if cancel.is_cancelled() {
            return markup::info(&format!("{}: cancelled", command));
        }
        match result {
            Ok(body) => render(body),
            Err(e) => {
                log::warn!("{} fetch of {} failed: {}", command, url, e);
                host.failure_cue();
                markup::error(&format!("{}: failed: {}", command, e))
            }
        }
    })
}

// =============================================================================
// Mutation
// =============================================================================

fn touch(ctx: &mut Context<'_>, args: &[String]) -> Output {
    if args.is_empty() {
        return ctx.usage("touch");
    }

    let now = now_secs();
    let mut lines = Vec::new();
    let mut failed = false;
    for target in args {
        let segments = resolve_path(target, &ctx.session.cwd);
        match ctx.session.fs.create_file(&segments, now) {
            Ok(Touched::Created) => {
                lines.push(markup::success(&format!("touch: created '{}'", target)))
            }
            Ok(Touched::Updated) => lines.push(markup::info(&format!(
                "touch: timestamp updated for '{}'",
                target
            ))),
            Err(e) => {
                failed = true;
                lines.push(markup::error(&format!("touch: {}", e.relabel(target))));
            }
        }
    }
    report(ctx, lines, failed)
}

fn mkdir(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let (flags, operands) = split_flags(args);
    if let Some(bad) = flags.iter().find(|f| **f != 'p') {
        return ctx.fail(format!("mkdir: invalid option -- '{}'", bad));
    }
    if operands.is_empty() {
        return ctx.usage("mkdir");
    }
    let parents = flags.contains(&'p');

    let mut lines = Vec::new();
    for target in operands {
        let segments = resolve_path(target, &ctx.session.cwd);
        let result = if parents {
            ctx.session.fs.create_dir_all(&segments)
        } else {
            ctx.session.fs.create_dir(&segments)
        };
        if let Err(e) = result {
            lines.push(markup::error(&format!("mkdir: {}", e.relabel(target))));
        }
    }
    let failed = !lines.is_empty();
    report(ctx, lines, failed)
}

fn rm(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let (flags, operands) = split_flags(args);
    if let Some(bad) = flags.iter().find(|f| !matches!(**f, 'r' | 'R')) {
        return ctx.fail(format!("rm: invalid option -- '{}'", bad));
    }
    if operands.is_empty() {
        return ctx.usage("rm");
    }
    let recursive = !flags.is_empty();

    let mut lines = Vec::new();
    for target in operands {
        let segments = resolve_path(target, &ctx.session.cwd);
        let result = if ctx.session.cwd.starts_with(&segments) {
            Err(FsError::Busy {
                path: display_path(&segments),
            })
        } else {
            ctx.session.fs.remove(&segments, recursive)
        };
        if let Err(e) = result {
            lines.push(markup::error(&format!("rm: {}", e.relabel(target))));
        }
    }
    let failed = !lines.is_empty();
    report(ctx, lines, failed)
}

fn echo(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let (words, redirect) = match split_redirect(args) {
        Ok(parts) => parts,
        Err(RedirectError::MissingTarget) => {
            return ctx.fail("echo: syntax error: expected a file after the redirect");
        }
        Err(RedirectError::Unexpected(word)) => {
            return ctx.fail(format!("echo: unexpected argument '{}'", word));
        }
    };
    let joined = words.join(" ");
    let text = unquote(&joined);

    let Some(redirect) = redirect else {
        return Output::text(markup::breaks(text));
    };
    let segments = resolve_path(&redirect.target, &ctx.session.cwd);
    match ctx
        .session
        .fs
        .write_file(&segments, text, redirect.append, now_secs())
    {
        Ok(()) => Output::empty(),
        Err(e) => ctx.fail(format!("echo: {}", e.relabel(&redirect.target))),
    }
}
