//! Command dispatch.
//!
//! Resolution order for a parsed line:
//! 1. Hidden (`_`-prefixed) commands run directly
//! 2. Any `--help`/`-h` argument shows help without running the command
//! 3. Exact registry match runs the handler
//! 4. Otherwise "command not found", with a suggestion when one is close

use crate::config::HELP_FLAGS;
use crate::core::commands::{Context, Output};
use crate::core::fuzzy::best_match;
use crate::core::parser::ParsedCommand;
use crate::utils::markup;

/// Run `command` against the context.
pub fn dispatch(ctx: &mut Context<'_>, command: &ParsedCommand) -> Output {
    let name = command.name.as_str();
    log::debug!("dispatch: {}", command.line());

    let entry = ctx.registry.get(name).copied();

    if let Some(entry) = entry
        && entry.is_hidden()
    {
        return (entry.handler)(ctx, &command.args);
    }

    if command.args.iter().any(|a| HELP_FLAGS.contains(&a.as_str())) {
        return Output::text(ctx.registry.help_text(name));
    }

    if let Some(entry) = entry {
        return (entry.handler)(ctx, &command.args);
    }

    log::debug!("unknown command '{}'", name);
    let visible = ctx.registry.visible_names();
    match best_match(name, visible.iter().copied()) {
        Some(suggestion) => ctx.fail(format!(
            "command not found: {}. Did you mean '{}'?",
            name, suggestion
        )),
        None => ctx.fail(format!(
            "command not found: {}. Type 'help' for available commands.",
            name
        )),
    }
}
