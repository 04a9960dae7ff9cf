use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Priority, UiConfig};

/// Colors used by the agenda screen. Built from `[ui]` in config.toml on top
/// of the defaults below.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Indexed low, medium, high
    priority: [Color; 3],
    tags: HashMap<String, Color>,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const DEFAULT_TAGS: [(&str, u32); 5] = [
    ("work", 0x5B8DEF),
    ("home", 0x4FC1C9),
    ("health", 0x6BD68A),
    ("urgent", 0xF05D5E),
    ("errand", 0xB68CF2),
];

impl Default for Theme {
    fn default() -> Self {
        let red = rgb(0xF05D5E);
        let yellow = rgb(0xF2C14E);
        let dim = rgb(0x6C7A96);
        Theme {
            background: rgb(0x10141F),
            text: rgb(0xC5CEE0),
            text_bright: rgb(0xFFFFFF),
            highlight: rgb(0xFF8A3D),
            dim,
            red,
            yellow,
            green: rgb(0x6BD68A),
            cyan: rgb(0x4FC1C9),
            purple: rgb(0xB68CF2),
            selection_bg: rgb(0x27314A),
            search_match_bg: rgb(0xF2C14E),
            search_match_fg: rgb(0x10141F),
            priority: [dim, yellow, red],
            tags: DEFAULT_TAGS
                .iter()
                .map(|(tag, hex)| (tag.to_string(), rgb(*hex)))
                .collect(),
        }
    }
}

fn priority_slot(priority: Priority) -> usize {
    match priority {
        Priority::Low => 0,
        Priority::Medium => 1,
        Priority::High => 2,
    }
}

impl Theme {
    /// Apply `[ui]` overrides. Values that don't parse as colors are skipped.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (name, value) in &ui.colors {
            if let (Some(slot), Ok(color)) = (theme.named_slot(name), value.parse::<Color>()) {
                *slot = color;
            }
        }
        for (name, value) in &ui.priority_colors {
            if let (Ok(priority), Ok(color)) = (name.parse::<Priority>(), value.parse::<Color>()) {
                theme.priority[priority_slot(priority)] = color;
            }
        }
        for (tag, value) in &ui.tag_colors {
            if let Ok(color) = value.parse::<Color>() {
                theme.tags.insert(tag.clone(), color);
            }
        }

        theme
    }

    fn named_slot(&mut self, name: &str) -> Option<&mut Color> {
        Some(match name {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "yellow" => &mut self.yellow,
            "green" => &mut self.green,
            "cyan" => &mut self.cyan,
            "purple" => &mut self.purple,
            "selection_bg" => &mut self.selection_bg,
            "search_match_bg" => &mut self.search_match_bg,
            "search_match_fg" => &mut self.search_match_fg,
            _ => return None,
        })
    }

    pub fn tag_color(&self, tag: &str) -> Color {
        self.tags.get(tag).copied().unwrap_or(self.text)
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        self.priority[priority_slot(priority)]
    }
}
