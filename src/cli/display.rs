// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output helpers for the sieve CLI.
//!
//! Boxes, tier badges and size columns. Colors are plain 16-color ANSI so
//! they follow the terminal's own palette. `NO_COLOR` and non-TTY stdout
//! turn styling off, so piped output stays clean.

use sieve::Tier;

/// Inner width of boxes, between the two `│`.
pub const BOX_WIDTH: usize = 72;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";

pub fn use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Wrap `text` in `styles` when colors are on.
pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.concat(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Length as displayed, ignoring ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        match c {
            '\x1b' => in_escape = true,
            'm' if in_escape => in_escape = false,
            _ if !in_escape => len += 1,
            _ => {}
        }
    }
    len
}

pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(s));
    format!("{}{}", s, " ".repeat(pad))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(s));
    format!("{}{}", " ".repeat(pad), s)
}

/// `┌─ LABEL ───┐`
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("┌{}{}┐", label_part, "─".repeat(remaining));
}

/// `├─ LABEL ───┤`
pub fn section_mid(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("├{}{}┤", label_part, "─".repeat(remaining));
}

/// `└──────────┘`
pub fn section_bot() {
    println!("└{}┘", "─".repeat(BOX_WIDTH));
}

/// `│ content   │`, truncated if it would overflow the box.
pub fn row(content: &str) {
    let content = if visible_len(content) > BOX_WIDTH {
        content.chars().take(BOX_WIDTH - 1).collect::<String>() + "…"
    } else {
        content.to_string()
    };
    println!("│{}│", pad_right(&content, BOX_WIDTH));
}

pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Share of `raw` saved by compression, green when positive.
pub fn savings(raw: usize, compressed: usize) -> String {
    if raw == 0 {
        return styled(&[DIM], "   n/a");
    }
    let saved = (1.0 - compressed as f64 / raw as f64) * 100.0;
    if saved.abs() < 0.5 {
        styled(&[DIM], "    0%")
    } else if saved > 0.0 {
        styled(&[GREEN], &format!("{:>5.0}%", saved))
    } else {
        styled(&[RED], &format!("{:>+5.0}%", saved))
    }
}

pub fn tier_label(tier: Tier) -> String {
    let label = format!("T{}", tier.number());
    match tier {
        Tier::Exact => styled(&[GREEN], &label),
        Tier::Prefix => styled(&[BLUE], &label),
        Tier::Fuzzy => styled(&[MAGENTA], &label),
    }
}

pub fn score_value(score: f64) -> String {
    let text = format!("{:>8.2}", score);
    if score >= 100.0 {
        styled(&[BOLD, GREEN], &text)
    } else if score >= 50.0 {
        styled(&[GREEN], &text)
    } else if score >= 15.0 {
        styled(&[YELLOW], &text)
    } else {
        styled(&[DIM], &text)
    }
}
