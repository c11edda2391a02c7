use crossterm::style::{Color, Stylize};
use std::fmt::Display;

/// Colors for terminal output
#[derive(Debug, Clone)]
pub struct Theme {
    /// Whether to emit ANSI styling at all
    pub enabled: bool,
    /// Section titles and table headers
    pub header: Color,
    /// Commander badge
    pub commander: Color,
    /// Non-zero chain counts
    pub active: Color,
    /// Full-length chain counts
    pub highlight: Color,
    /// Zero counts, separators
    pub dim: Color,
    /// Reaction arrows and state labels
    pub state: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark terminal theme (default)
    pub fn dark() -> Self {
        Self {
            enabled: true,
            header: Color::Rgb { r: 255, g: 210, b: 100 },
            commander: Color::Rgb { r: 221, g: 51, b: 51 },
            active: Color::Rgb { r: 80, g: 180, b: 255 },
            highlight: Color::Rgb { r: 90, g: 255, b: 130 },
            dim: Color::Rgb { r: 110, g: 115, b: 130 },
            state: Color::Rgb { r: 160, g: 165, b: 185 },
        }
    }

    /// No styling, for pipes and `--color never`
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::dark()
        }
    }

    pub fn paint(&self, text: impl Display, color: Color) -> String {
        if self.enabled {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: impl Display, color: Color) -> String {
        if self.enabled {
            text.to_string().with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Count cell: dimmed when zero
    pub fn count(&self, n: usize, width: usize, color: Color) -> String {
        let cell = format!("{:>width$}", n, width = width);
        if n == 0 {
            self.paint(cell, self.dim)
        } else {
            self.paint(cell, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_emits_no_escapes() {
        let theme = Theme::plain();
        assert_eq!(theme.paint("Stun", theme.state), "Stun");
        assert_eq!(theme.count(3, 4, theme.active), "   3");
    }

    #[test]
    fn test_dark_theme_styles() {
        let theme = Theme::dark();
        assert!(theme.bold("Top", theme.header).contains('\u{1b}'));
    }
}
