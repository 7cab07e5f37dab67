//! UI Theme Module - colour palette and style helpers
//!
//! A `Theme` is built once at startup and handed to the renderer; nothing here is global.

use ratatui::style::{Color, Modifier, Style};

use docmon_core::config::ThemeName;
use docmon_core::model::Tone;

/// Colour slots used by the list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Neutral status text
    pub text: Color,
    /// Muted text (help footer, loading)
    pub text_muted: Color,
    /// Entry name and identifier
    pub name: Color,
    /// Image / scope tag
    pub tag: Color,
    /// Default block border
    pub border: Color,
    /// Border of the block under the cursor
    pub border_selected: Color,
    /// Running containers
    pub success: Color,
    /// Created / restarting containers
    pub warn: Color,
    /// Exited containers and command failures
    pub error: Color,
    pub dot_active: Color,
    pub dot_inactive: Color,
    /// Expanded help legend
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    /// 256-colour dark theme
    pub fn dark() -> Self {
        Self {
            text: Color::Indexed(252),
            text_muted: Color::Indexed(244),
            name: Color::Indexed(223),
            tag: Color::Indexed(212),
            border: Color::Indexed(240),
            border_selected: Color::Indexed(3),
            success: Color::Indexed(114),
            warn: Color::Indexed(179),
            error: Color::Indexed(203),
            dot_active: Color::Indexed(252),
            dot_inactive: Color::Indexed(238),
            key_hint: Color::Indexed(180),
        }
    }

    /// 16-colour variant for terminals without a 256-colour palette
    pub fn high_contrast() -> Self {
        Self {
            text: Color::White,
            text_muted: Color::Gray,
            name: Color::White,
            tag: Color::Cyan,
            border: Color::White,
            border_selected: Color::Yellow,
            success: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            dot_active: Color::White,
            dot_inactive: Color::DarkGray,
            key_hint: Color::Yellow,
        }
    }
}

/// Styles handed to the renderer, built once from the configured `ThemeName`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::new(Palette::dark()),
            ThemeName::HighContrast => Self::new(Palette::high_contrast()),
        }
    }

    pub fn border_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.palette.border_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.border)
        }
    }

    pub fn name_style(&self) -> Style {
        Style::default()
            .fg(self.palette.name)
            .add_modifier(Modifier::BOLD)
    }

    pub fn detail_style(&self) -> Style {
        Style::default().fg(self.palette.name)
    }

    pub fn tag_style(&self) -> Style {
        Style::default().fg(self.palette.tag)
    }

    /// Style for the raw status string
    pub fn tone_style(&self, tone: Tone) -> Style {
        let color = match tone {
            Tone::Up => self.palette.success,
            Tone::Transitioning => self.palette.warn,
            Tone::Down => self.palette.error,
            Tone::Neutral => self.palette.text,
        };
        Style::default().fg(color)
    }

    pub fn dot_style(&self, active: bool) -> Style {
        let color = if active {
            self.palette.dot_active
        } else {
            self.palette.dot_inactive
        };
        Style::default().fg(color)
    }

    pub fn help_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }
}
