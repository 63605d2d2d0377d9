use std::path::PathBuf;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Card accent colours, cycled by list position.
pub const CARD_PALETTE: [Color; 4] = [
    Color::Rgb(126, 139, 255),
    Color::Rgb(255, 183, 116),
    Color::Rgb(93, 214, 192),
    Color::Rgb(255, 130, 177),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Reads a persisted preference. Anything unrecognised is light.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub mode: ThemeMode,
    pub base: Style,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub error: Style,
    pub success: Style,
}

impl Theme {
    /// Built-in palette for `mode` with overrides from `theme.toml` applied.
    pub fn load(mode: ThemeMode) -> Self {
        let config = config_path()
            .filter(|path| path.exists())
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|content| toml::from_str::<ThemeConfig>(&content).ok())
            .unwrap_or_default();
        config.into_theme(mode)
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Get a built-in preset by name. Presets recolour the accents and keep
    /// the background of `mode`.
    pub fn preset(name: &str, mode: ThemeMode) -> Self {
        let base = Self::for_mode(mode);
        match name {
            "dracula" => Self::dracula(base),
            "gruvbox" => Self::gruvbox(base),
            "nord" => Self::nord(base),
            _ => base,
        }
    }

    pub fn card_color(index: usize) -> Color {
        CARD_PALETTE[index % CARD_PALETTE.len()]
    }

    fn light() -> Self {
        Self {
            name: "light".to_string(),
            mode: ThemeMode::Light,
            base: Style::default()
                .fg(Color::Rgb(46, 42, 66))
                .bg(Color::Rgb(250, 248, 255)),
            today: Style::default().fg(Color::White).bg(Color::Rgb(255, 130, 177)),
            selected: Style::default().fg(Color::White).bg(Color::Rgb(126, 139, 255)),
            header: Style::default()
                .fg(Color::Rgb(46, 42, 66))
                .add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(130, 126, 150)),
            border: Style::default().fg(Color::Rgb(200, 196, 220)),
            status: Style::default()
                .fg(Color::Rgb(46, 42, 66))
                .bg(Color::Rgb(232, 228, 245)),
            highlight: Style::default()
                .bg(Color::Rgb(236, 233, 252))
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::White).bg(Color::Rgb(220, 70, 90)),
            success: Style::default().fg(Color::Rgb(30, 130, 90)),
        }
    }

    fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            mode: ThemeMode::Dark,
            base: Style::default()
                .fg(Color::Rgb(228, 226, 240))
                .bg(Color::Rgb(22, 21, 32)),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(255, 183, 116)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(93, 214, 192)),
            header: Style::default()
                .fg(Color::Rgb(240, 238, 250))
                .add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(120, 118, 140)),
            border: Style::default().fg(Color::Rgb(70, 68, 92)),
            status: Style::default()
                .fg(Color::Rgb(228, 226, 240))
                .bg(Color::Rgb(44, 42, 60)),
            highlight: Style::default()
                .bg(Color::Rgb(44, 42, 60))
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::White).bg(Color::Rgb(170, 40, 60)),
            success: Style::default().fg(Color::Rgb(93, 214, 192)),
        }
    }

    fn dracula(base: Self) -> Self {
        Self {
            name: "dracula".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)), // purple
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)), // cyan
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            ..base
        }
    }

    fn gruvbox(base: Self) -> Self {
        Self {
            name: "gruvbox".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)), // yellow
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)), // aqua
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            ..base
        }
    }

    fn nord(base: Self) -> Self {
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)), // yellow
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)), // frost
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            ..base
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("countdown-tui").join("theme.toml"))
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct ThemeConfig {
    preset: Option<String>,
    today_fg: Option<String>,
    today_bg: Option<String>,
    selected_fg: Option<String>,
    selected_bg: Option<String>,
    header_fg: Option<String>,
    dim_fg: Option<String>,
    border_fg: Option<String>,
    status_fg: Option<String>,
    status_bg: Option<String>,
    highlight_bg: Option<String>,
}

impl ThemeConfig {
    fn into_theme(self, mode: ThemeMode) -> Theme {
        let mut theme = match self.preset.as_deref() {
            Some(name) => Theme::preset(name, mode),
            None => Theme::for_mode(mode),
        };

        // Override individual colors
        if let Some(c) = self.today_fg.as_deref().and_then(parse_color) {
            theme.today = theme.today.fg(c);
        }
        if let Some(c) = self.today_bg.as_deref().and_then(parse_color) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = self.selected_fg.as_deref().and_then(parse_color) {
            theme.selected = theme.selected.fg(c);
        }
        if let Some(c) = self.selected_bg.as_deref().and_then(parse_color) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = self.header_fg.as_deref().and_then(parse_color) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = self.dim_fg.as_deref().and_then(parse_color) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = self.border_fg.as_deref().and_then(parse_color) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = self.status_fg.as_deref().and_then(parse_color) {
            theme.status = theme.status.fg(c);
        }
        if let Some(c) = self.status_bg.as_deref().and_then(parse_color) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = self.highlight_bg.as_deref().and_then(parse_color) {
            theme.highlight = theme.highlight.bg(c);
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(s.get(1..3)?, 16).ok()?;
        let g = u8::from_str_radix(s.get(3..5)?, 16).ok()?;
        let b = u8::from_str_radix(s.get(5..7)?, 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}
