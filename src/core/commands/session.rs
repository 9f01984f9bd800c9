//! Session and meta commands: `help`, `clear`, `history`, `theme`, `demo`,
//! `reset`, `whoami`, and the hidden tutorial check.

use crate::config::{APP_NAME, THEMES, TUTORIAL_CHECK_COMMAND, USER_NAME};
use crate::core::fuzzy::best_match;
use crate::utils::markup::{self, Style};

use super::{CommandEntry, Context, Output};

const HELP_HELP: &str = "\
Usage: help [command]
List available commands, or show help for one command.";

const CLEAR_HELP: &str = "\
Usage: clear
Clear the screen. Command recall (up/down) is kept.";

const HISTORY_HELP: &str = "\
Usage: history
List previously entered commands.

Re-run one with !n, or the last one with !!.";

const THEME_HELP: &str = "\
Usage: theme <list | current | set <name>>
Change the color theme.

  list          show available themes
  current       show the active theme
  set <name>    switch to a theme";

const DEMO_HELP: &str = "\
Usage: demo
Start the guided tour. Press Ctrl+C to leave it.";

const RESET_HELP: &str = "\
Usage: reset
Restore the initial filesystem and clear all history.";

const WHOAMI_HELP: &str = "\
Usage: whoami
Print the current user.";

pub fn commands() -> Vec<CommandEntry> {
    vec![
        CommandEntry {
            name: "help",
            handler: help,
            summary: "Show available commands",
            help: Some(HELP_HELP),
        },
        CommandEntry {
            name: "clear",
            handler: clear,
            summary: "Clear the screen",
            help: Some(CLEAR_HELP),
        },
        CommandEntry {
            name: "history",
            handler: history,
            summary: "Show command history",
            help: Some(HISTORY_HELP),
        },
        CommandEntry {
            name: "theme",
            handler: theme,
            summary: "Change the color theme",
            help: Some(THEME_HELP),
        },
        CommandEntry {
            name: "demo",
            handler: demo,
            summary: "Start the guided tour",
            help: Some(DEMO_HELP),
        },
        CommandEntry {
            name: "reset",
            handler: reset,
            summary: "Reset the filesystem and history",
            help: Some(RESET_HELP),
        },
        CommandEntry {
            name: "whoami",
            handler: whoami,
            summary: "Print the current user",
            help: Some(WHOAMI_HELP),
        },
        CommandEntry {
            name: TUTORIAL_CHECK_COMMAND,
            handler: tutorial_check,
            summary: "",
            help: None,
        },
    ]
}

fn help(ctx: &mut Context<'_>, args: &[String]) -> Output {
    if let Some(name) = args.first() {
        if ctx.registry.contains(name) {
            return Output::text(ctx.registry.help_text(name));
        }
        return ctx.fail(format!("help: no such command '{}'", name));
    }

    let entries = ctx.registry.visible_entries();
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut lines = vec![markup::span(Style::Heading, "Available commands:")];
    lines.extend(entries.iter().map(|entry| {
        format!(
            "  {}{}  {}",
            markup::span(Style::Command, entry.name),
            " ".repeat(width - entry.name.len()),
            markup::escape(entry.summary)
        )
    }));
    lines.push(String::new());
    lines.push(markup::span(
        Style::Muted,
        "Run '<command> --help' for details, or 'demo' for a guided tour.",
    ));
    Output::text(markup::lines(lines))
}

fn clear(ctx: &mut Context<'_>, _args: &[String]) -> Output {
    ctx.session.history.clear_display();
    Output::empty()
}

fn history(ctx: &mut Context<'_>, _args: &[String]) -> Output {
    let recall = ctx.session.history.recall();
    Output::text(markup::lines(recall.iter().enumerate().map(|(i, line)| {
        format!(
            "{} {}",
            markup::span(Style::Muted, &format!("{:4}", i)),
            markup::escape(line)
        )
    })))
}

fn theme(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let Some(subcommand) = args.first() else {
        return ctx.usage("theme");
    };

    match subcommand.as_str() {
        "list" => Output::text(markup::lines(THEMES.iter().map(|name| {
            if *name == ctx.session.theme {
                format!("* {}", markup::span(Style::Success, name))
            } else {
                format!("  {}", markup::escape(name))
            }
        }))),
        "current" => Output::text(markup::escape(&ctx.session.theme)),
        "set" => {
            let Some(name) = args.get(1) else {
                return ctx.usage("theme");
            };
            if THEMES.contains(&name.as_str()) {
                ctx.session.theme = name.clone();
                return Output::text(markup::success(&format!("Theme set to '{}'", name)));
            }
            match best_match(name, THEMES.iter().copied()) {
                Some(suggestion) => ctx.fail(format!(
                    "theme: unknown theme '{}'. Did you mean '{}'?",
                    name, suggestion
                )),
                None => ctx.fail(format!(
                    "theme: unknown theme '{}'. Run 'theme list' to see available themes.",
                    name
                )),
            }
        }
        _ => ctx.usage("theme"),
    }
}

fn demo(ctx: &mut Context<'_>, _args: &[String]) -> Output {
    ctx.session.scheduled.clear();
    Output::text(ctx.session.tutorial.start())
}

fn reset(ctx: &mut Context<'_>, _args: &[String]) -> Output {
    ctx.session.reset();
    Output::empty()
}

fn whoami(_ctx: &mut Context<'_>, _args: &[String]) -> Output {
    Output::text(format!(
        "{}@{}",
        markup::escape(USER_NAME),
        markup::escape(APP_NAME)
    ))
}

/// Match the re-joined arguments against the current tutorial step.
///
/// Always prints nothing; a match queues an advance on the session.
fn tutorial_check(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let line = args.join(" ");
    let commands = ctx.registry.visible_names();
    if let Some(advance) = ctx.session.tutorial.check(&line, &commands) {
        ctx.session.scheduled.push(advance);
    }
    Output::empty()
}
