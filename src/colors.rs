use std::convert::TryInto;
use std::fmt;
use std::str::FromStr;

use log::warn;
use rand::distributions::{Distribution, Standard};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of swatches offered each round.
pub const OPTION_COUNT: usize = 4;

// plenty for 256^3 colors; the odds of a collision per draw are ~4 in 16 million
const MAX_DRAWS: usize = 1024;

/// An RGB color. Two colors are the same only if every channel matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Opaque RGBA pixel, the layout `pixels` wants in its frame.
pub type Rgba = [u8; 4];

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn rgba(&self) -> Rgba {
        [self.r, self.g, self.b, 0xff]
    }

    /// Walks the whole color space in a fixed order, `0..2^24`.
    fn from_index(index: u32) -> Self {
        let [_, r, g, b] = index.to_be_bytes();
        Color { r, g, b }
    }
}

impl Distribution<Color> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        Color {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("could not draw {wanted} distinct colors in {draws} draws")]
    Exhausted { wanted: usize, draws: usize },
    #[error("not a color: {0:?}")]
    Parse(String),
}

impl FromStr for Color {
    type Err = ColorError;

    /// Accepts `rgb(r, g, b)` and `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ColorError::Parse(s.to_string());
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(bad());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
            return Ok(Color::new(channel(0)?, channel(2)?, channel(4)?));
        }
        let inner = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(bad)?;
        let channels = inner
            .split(',')
            .map(|c| c.trim().parse::<u8>().map_err(|_| bad()))
            .collect::<Result<Vec<_>, _>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Color::new(*r, *g, *b)),
            _ => Err(bad()),
        }
    }
}

/// Uniform over all 2^24 colors.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    rng.gen()
}

/// Builds the four swatches for a round: `target` plus three distinct decoys, shuffled.
pub fn generate_options<R: Rng + ?Sized>(rng: &mut R, target: Color) -> [Color; OPTION_COUNT] {
    match generate_options_with(rng, target, MAX_DRAWS, |rng| random_color(rng)) {
        Ok(options) => options,
        Err(e) => {
            warn!("{}, sweeping for decoys instead", e);
            let mut options = vec![target];
            let mut index = 0;
            while options.len() < OPTION_COUNT {
                let color = Color::from_index(index);
                if !options.contains(&color) {
                    options.push(color);
                }
                index += 1;
            }
            options.shuffle(rng);
            into_array(options)
        }
    }
}

/// Rejection-samples decoys from `draw` until there are [`OPTION_COUNT`] distinct colors, then shuffles them.
///
/// Gives up after `max_draws` draws, so a source with too few colors can't hang the caller.
pub fn generate_options_with<R, F>(
    rng: &mut R,
    target: Color,
    max_draws: usize,
    mut draw: F,
) -> Result<[Color; OPTION_COUNT], ColorError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Color,
{
    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(target);
    let mut draws = 0;
    while options.len() < OPTION_COUNT {
        if draws == max_draws {
            return Err(ColorError::Exhausted {
                wanted: OPTION_COUNT,
                draws,
            });
        }
        draws += 1;
        let color = draw(rng);
        if !options.contains(&color) {
            options.push(color);
        }
    }
    // Fisher-Yates
    options.shuffle(rng);
    Ok(into_array(options))
}

fn into_array(options: Vec<Color>) -> [Color; OPTION_COUNT] {
    match options.try_into() {
        Ok(array) => array,
        Err(v) => unreachable!("built {} options", v.len()),
    }
}

// palette for the screen
pub(crate) const WHITE: Color = Color::new(0xff, 0xff, 0xff); // FFFFFF
pub(crate) const DARK: Color = Color::new(0x20, 0x2a, 0x25); // 202A25
pub(crate) const GRAY: Color = Color::new(0xeb, 0xe9, 0xe9); // EBE9E9
pub(crate) const GREEN: Color = Color::new(0x00, 0xa8, 0x78); // 00A878
pub(crate) const YELLOW: Color = Color::new(0xf8, 0xf3, 0x2b); // F8F32B
pub(crate) const FLAME: Color = Color::new(0xcf, 0x5c, 0x36); // CF5C36

pub(crate) const LOGO: [Color; 4] = [
    Color::new(0xb0, 0xdb, 0xca), // B0DBCA
    Color::new(0xb7, 0xe1, 0xbc), // B7E1BC
    Color::new(0xfb, 0xb9, 0xa3), // FBB9A3
    Color::new(0xf6, 0x74, 0x7f), // F6747F
];

pub(crate) const BACKGROUND: Color = DARK;
pub(crate) const TEXT: Color = WHITE;
pub(crate) const LABEL: Color = GRAY;
