use std::fmt;

use serde::{Deserialize, Serialize};

pub type CityId = u16;
pub type RouteId = u16;
pub type PlayerId = u8;

/// The fixed train-card colors. Discriminants double as hand indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Color {
    Red,
    Blue,
    Black,
    White,
    Orange,
    Yellow,
    Pink,
    Green,
}

impl Color {
    pub const COUNT: usize = 8;

    #[inline]
    pub fn all() -> [Color; Color::COUNT] {
        [
            Color::Red,
            Color::Blue,
            Color::Black,
            Color::White,
            Color::Orange,
            Color::Yellow,
            Color::Pink,
            Color::Green,
        ]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Color> {
        Color::all()
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::White => "White",
            Color::Orange => "Orange",
            Color::Yellow => "Yellow",
            Color::Pink => "Pink",
            Color::Green => "Green",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Color printed on a route. Gray routes accept any single color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackColor {
    Fixed(Color),
    Gray,
}

impl TrackColor {
    const WILD_NAMES: [&'static str; 5] = ["gray", "grey", "unspecified", "wild", "any"];

    /// Parse an import color string; `None` for unknown names.
    pub fn parse(s: &str) -> Option<TrackColor> {
        let s = s.trim();
        if s.is_empty() || Self::WILD_NAMES.iter().any(|w| w.eq_ignore_ascii_case(s)) {
            return Some(TrackColor::Gray);
        }
        Color::from_name(s).map(TrackColor::Fixed)
    }

    #[inline]
    pub fn is_gray(self) -> bool {
        matches!(self, TrackColor::Gray)
    }
}

impl fmt::Display for TrackColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackColor::Fixed(c) => c.fmt(f),
            TrackColor::Gray => f.write_str("Gray"),
        }
    }
}

/// A single train card: a colored card or a locomotive (wild).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Train(Color),
    Locomotive,
}

impl Card {
    #[inline]
    pub fn is_wild(self) -> bool {
        matches!(self, Card::Locomotive)
    }

    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Card::Train(c) => Some(c),
            Card::Locomotive => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Train(c) => c.fmt(f),
            Card::Locomotive => f.write_str("Locomotive"),
        }
    }
}
