//! Colors and style helpers for the fundraiser TUI.
//!
//! All colors are RGB truecolor. Views import from here instead of using
//! inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::core::campaign::{CampaignStatus, Category};
use crate::tui::events::NotificationLevel;

// ── Palette ─────────────────────────────────────────────────────────────────

/// Evergreen: primary accent, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x2E, 0x7D, 0x5B);
/// Mint: hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x66, 0xC2, 0x9A);
/// Marigold: calls to action (submit, approve).
pub const ACCENT: Color = Color::Rgb(0xF2, 0xA9, 0x00);

pub const BG_BASE: Color = Color::Rgb(0x10, 0x17, 0x14);

pub const TEXT: Color = Color::Rgb(0xE6, 0xE6, 0xE6);
pub const TEXT_MUTED: Color = Color::Rgb(0x8A, 0x8A, 0x8A);
pub const TEXT_DIM: Color = Color::Rgb(0x55, 0x55, 0x55);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xE0, 0x4F, 0x5F);
pub const SUCCESS: Color = Color::Rgb(0x4C, 0xB8, 0x7A);
pub const WARNING: Color = Color::Rgb(0xF0, 0x9A, 0x3E);
pub const INFO: Color = Color::Rgb(0x5B, 0x9B, 0xD5);

// ── Domain ──────────────────────────────────────────────────────────────────

pub fn status_color(status: CampaignStatus) -> Color {
    match status {
        CampaignStatus::Pending => WARNING,
        CampaignStatus::Active => SUCCESS,
        CampaignStatus::Rejected => ERROR,
    }
}

pub fn level_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => INFO,
        NotificationLevel::Success => SUCCESS,
        NotificationLevel::Warning => WARNING,
        NotificationLevel::Error => ERROR,
    }
}

pub fn category_color(category: Category) -> Color {
    match category {
        Category::Health => Color::Rgb(0xE5, 0x73, 0x73),
        Category::Education => INFO,
        Category::DisasterRelief => ACCENT,
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn heading() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(BG_BASE).bg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[a]:approve").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default().fg(BG_BASE).bg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Marker for a required field that is still empty.
pub fn required_missing() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

fn framed(title: &str, border: Style) -> Block<'static> {
    Block::bordered().title(format!(" {title} ")).border_style(border)
}

/// Block around the pane that has keyboard focus.
pub fn block_focused(title: &str) -> Block<'static> {
    framed(title, border_focused())
}

pub fn block_default(title: &str) -> Block<'static> {
    framed(title, border_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors_are_distinct() {
        assert_ne!(status_color(CampaignStatus::Pending), status_color(CampaignStatus::Active));
        assert_ne!(status_color(CampaignStatus::Active), status_color(CampaignStatus::Rejected));
    }

    #[test]
    fn test_every_category_has_a_color() {
        let colors: Vec<Color> = Category::ALL.iter().map(|c| category_color(*c)).collect();
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }

    #[test]
    fn test_required_marker_stands_out() {
        assert_eq!(required_missing().fg, Some(ERROR));
        assert_ne!(highlight().bg, None);
    }
}
