use anyhow::{Result, anyhow};
use ratatui::crossterm::style::{Color as TermColor, Stylize, style};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::StatusKind;
use crate::storage::DisplayConfig;

/// When to emit ANSI colors
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Decide whether to colorize given the terminal capability
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Foreground colors for the well-known statuses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusPalette {
    pub available: Color,
    pub sold: Color,
    pub rented: Color,
}

impl StatusPalette {
    /// Parse the palette from display settings
    pub fn from_config(display: &DisplayConfig) -> Result<Self> {
        Ok(StatusPalette {
            available: parse_color("available", &display.available)?,
            sold: parse_color("sold", &display.sold)?,
            rented: parse_color("rented", &display.rented)?,
        })
    }

    fn color_for(&self, kind: StatusKind) -> Option<Color> {
        match kind {
            StatusKind::Available => Some(self.available),
            StatusKind::Sold => Some(self.sold),
            StatusKind::Rented => Some(self.rented),
            StatusKind::Other => None,
        }
    }
}

impl Default for StatusPalette {
    fn default() -> Self {
        StatusPalette {
            available: Color::LightGreen,
            sold: Color::LightRed,
            rented: Color::LightYellow,
        }
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color> {
    Color::from_str(value).map_err(|_| anyhow!("Invalid color for display.{}: {:?}", field, value))
}

/// Renders status values either plain or with ANSI colors
#[derive(Debug, Clone, Default)]
pub struct StatusPainter {
    palette: Option<StatusPalette>,
}

impl StatusPainter {
    /// Painter that never emits escape codes
    pub fn plain() -> Self {
        StatusPainter { palette: None }
    }

    /// Painter that colors known statuses
    pub fn colored(palette: StatusPalette) -> Self {
        StatusPainter {
            palette: Some(palette),
        }
    }

    /// Pick a painter from the display settings and terminal capability
    pub fn detect(display: &DisplayConfig, mode: ColorMode, is_terminal: bool) -> Result<Self> {
        if mode.enabled(is_terminal) {
            Ok(Self::colored(StatusPalette::from_config(display)?))
        } else {
            Ok(Self::plain())
        }
    }

    pub fn is_colored(&self) -> bool {
        self.palette.is_some()
    }

    /// Render a status, colorizing it when a palette is active
    pub fn paint(&self, status: &str) -> String {
        let color = self
            .palette
            .as_ref()
            .and_then(|palette| palette.color_for(StatusKind::classify(status)));
        match color {
            Some(color) => style(status).with(TermColor::from(color)).to_string(),
            None => status.to_string(),
        }
    }
}
