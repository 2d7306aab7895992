use std::collections::HashMap;

use palette::{FromColor, Lch, Srgb};

use crate::engine::round::Card;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(f: Rgb) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: f.r,
            g: f.g,
            b: f.b,
        }
    }
}

impl From<Lch> for Rgb {
    fn from(lch: Lch) -> Rgb {
        let rgb = Srgb::from_color(lch).into_format::<u8>();
        Rgb::new(rgb.red, rgb.green, rgb.blue)
    }
}

const FALLBACK_CARD: (Rgb, Rgb) = (Rgb::new(255, 255, 255), Rgb::new(90, 0, 0));

/// Theme holds every color the renderer needs. Built once at startup and
/// handed to the renderer; nothing else sees it.
pub(crate) struct Theme {
    card_colors: HashMap<Card, (Rgb, Rgb)>,
    pub(crate) screen_bg: Rgb,
    pub(crate) board_bg: Rgb,
    pub(crate) empty_bg: Rgb,
    pub(crate) text_fg: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        // one hue step per power of two, a fixed dark foreground opposite
        // the background hue
        let bg_hue = 28.0;
        let fg_hue = bg_hue + 180.0;
        let card_colors = HashMap::from_iter((1..=11).map(|i| {
            (
                2u16.pow(i),
                (
                    Rgb::from(Lch::new(80.0, 90.0, i as f32 * 360.0 / 10.0)),
                    Rgb::from(Lch::new(20.0, 50.0, fg_hue)),
                ),
            )
        }));
        Self {
            card_colors,
            screen_bg: Rgb::new(250, 248, 239),
            board_bg: Rgb::new(187, 173, 160),
            empty_bg: Rgb::new(205, 193, 180),
            text_fg: Rgb::new(119, 110, 101),
        }
    }
}

impl Theme {
    /// Background and foreground for a card of the given value. Values past
    /// the end of the ramp all share one fallback pair.
    pub(crate) fn card(&self, value: Card) -> (Rgb, Rgb) {
        self.card_colors
            .get(&value)
            .copied()
            .unwrap_or(FALLBACK_CARD)
    }
}
