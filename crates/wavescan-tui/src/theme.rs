//! SilkCircuit Neon palette mapped onto scan-list highlights.

use ratatui::style::{Color, Modifier, Style};

use wavescan_core::{Attr, ScanClass};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4

// ── Scan classes ──────────────────────────────────────────────────────

/// Foreground shared by the name and address of a row.
pub fn class_color(class: ScanClass) -> Color {
    match class {
        ScanClass::EncryptedAp => CORAL,
        ScanClass::OpenAp => SUCCESS_GREEN,
        ScanClass::NonAp => ELECTRIC_YELLOW,
    }
}

/// Style for a run written by the render pipeline.
pub fn attr_style(attr: Attr) -> Style {
    let mut style = match attr.class {
        Some(class) => Style::default().fg(class_color(class)),
        None => Style::default().fg(DIM_WHITE),
    };
    if attr.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if attr.reverse {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

// ── Chrome ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Side note in the title bar: sort mode and last scan time.
pub fn title_note() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Key hint text (e.g., "q quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_runs_use_body_text_color() {
        assert_eq!(attr_style(Attr::PLAIN), Style::default().fg(DIM_WHITE));
    }

    #[test]
    fn class_color_and_modifiers_combine() {
        let style = attr_style(Attr::class(ScanClass::OpenAp).bolded(true));
        assert_eq!(style.fg, Some(SUCCESS_GREEN));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(!style.add_modifier.contains(Modifier::REVERSED));

        let heading = attr_style(Attr::REVERSE);
        assert!(heading.add_modifier.contains(Modifier::REVERSED));
    }
}
