//! Terminal prompts and status lines
//!
//! Every prompt shares one dialoguer theme; status lines are prefixed with a
//! colored marker so results stand out from task text.

use anyhow::Result;
use console::{StyledObject, style};
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Pick one of `items` with the arrow keys, returning its index
pub fn select<T: std::fmt::Display>(
    prompt: &str,
    items: &[T],
    default: Option<usize>,
) -> Result<usize> {
    let theme = theme();
    let picker = Select::with_theme(&theme).with_prompt(prompt).items(items);
    let picker = match default {
        Some(idx) => picker.default(idx),
        None => picker,
    };
    Ok(picker.interact()?)
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Free text; Enter on an empty line accepts `default` when one is given
pub fn input(prompt: &str, default: Option<&str>) -> Result<String> {
    let theme = theme();
    let field = Input::<String>::with_theme(&theme).with_prompt(prompt);
    let field = match default {
        Some(value) => field.default(value.to_string()),
        None => field,
    };
    Ok(field.interact_text()?)
}

pub fn header(text: &str) {
    println!();
    println!("{}", style(text).bold().cyan());
    println!();
}

pub fn success(text: &str) {
    println!("{}", status(style("✓").green().bold(), text));
}

pub fn error(text: &str) {
    eprintln!("{}", status(style("✗").red().bold(), text));
}

pub fn info(text: &str) {
    println!("{}", status(style("ℹ").blue(), text));
}

fn status(marker: StyledObject<&str>, text: &str) -> String {
    format!("{marker} {text}")
}

/// Render a level in `[0, 1]` as a fixed-width bar
pub fn level_bar(level: f32, width: usize) -> String {
    let filled = ((level.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
