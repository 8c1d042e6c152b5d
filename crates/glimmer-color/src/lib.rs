//! RGB light colours: an additive triplet type and colour-string parsing.
#![forbid(unsafe_code)]

mod named;
mod parse;

use core::fmt;
use core::ops::{Add, AddAssign, Index, IndexMut};

pub use parse::{ColorError, from_string};

/// Additive RGB triplet. Channels are not clamped to 255; values above it
/// are legal and only clamp when converted for display. Addition saturates
/// at `u32::MAX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl Rgb {
    pub const ZERO: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[inline]
    pub const fn new(r: u32, g: u32, b: u32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn from_array(c: [u32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    #[inline]
    pub const fn to_array(self) -> [u32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Rgb::ZERO
    }

    /// Channel sum, used as the intensity of a colour.
    #[inline]
    pub fn sum(self) -> u64 {
        self.r as u64 + self.g as u64 + self.b as u64
    }

    /// Multiplies every channel by `factor` and rounds each to the nearest
    /// integer. Negative or NaN products become 0.
    #[inline]
    pub fn scaled(self, factor: f64) -> Rgb {
        Rgb::new(
            scale_channel(self.r, factor),
            scale_channel(self.g, factor),
            scale_channel(self.b, factor),
        )
    }

    /// Tints `self` by `light`: `round(a * b / 255)` per channel.
    pub fn multiply(self, light: Rgb) -> Rgb {
        let mul = |a: u32, b: u32| ((a as f64 * b as f64) / 255.0).round() as u32;
        Rgb::new(mul(self.r, light.r), mul(self.g, light.g), mul(self.b, light.b))
    }

    /// Channels clamped to a displayable byte.
    #[inline]
    pub fn to_u8(self) -> [u8; 3] {
        let c = |v: u32| v.min(255) as u8;
        [c(self.r), c(self.g), c(self.b)]
    }

    /// `#rrggbb`, clamping channels above 255.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[inline]
fn scale_channel(v: u32, factor: f64) -> u32 {
    // `as` saturates: negatives and NaN land on 0.
    (v as f64 * factor).round() as u32
}

/// Adds `source` into `target` channel by channel.
#[inline]
pub fn add(target: &mut Rgb, source: Rgb) {
    *target += source;
}

impl Add for Rgb {
    type Output = Rgb;
    #[inline]
    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(
            self.r.saturating_add(rhs.r),
            self.g.saturating_add(rhs.g),
            self.b.saturating_add(rhs.b),
        )
    }
}

impl AddAssign for Rgb {
    #[inline]
    fn add_assign(&mut self, rhs: Rgb) {
        *self = *self + rhs;
    }
}

impl Index<usize> for Rgb {
    type Output = u32;
    fn index(&self, channel: usize) -> &u32 {
        match channel {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            _ => panic!("rgb channel index out of range: {channel}"),
        }
    }
}

impl IndexMut<usize> for Rgb {
    fn index_mut(&mut self, channel: usize) -> &mut u32 {
        match channel {
            0 => &mut self.r,
            1 => &mut self.g,
            2 => &mut self.b,
            _ => panic!("rgb channel index out of range: {channel}"),
        }
    }
}

impl From<[u32; 3]> for Rgb {
    #[inline]
    fn from(c: [u32; 3]) -> Self {
        Rgb::from_array(c)
    }
}

impl From<Rgb> for [u32; 3] {
    #[inline]
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

impl core::str::FromStr for Rgb {
    type Err = ColorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_string(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_rounds_each_channel() {
        let c = Rgb::new(100, 15, 1);
        assert_eq!(c.scaled(0.5), Rgb::new(50, 8, 1));
        assert_eq!(c.scaled(0.0), Rgb::ZERO);
        assert_eq!(c.scaled(-1.0), Rgb::ZERO);
        assert_eq!(c.scaled(f64::NAN), Rgb::ZERO);
    }

    #[test]
    fn add_is_in_place_and_unclamped() {
        let mut t = Rgb::new(200, 0, 10);
        add(&mut t, Rgb::new(100, 5, 0));
        assert_eq!(t, Rgb::new(300, 5, 10));
        assert_eq!(t.sum(), 315);
    }

    #[test]
    fn add_saturates_at_channel_max() {
        let big = Rgb::new(3_000_000_000, 1, u32::MAX);
        assert_eq!(big + big, Rgb::new(u32::MAX, 2, u32::MAX));
        let mut t = big;
        add(&mut t, Rgb::new(2_000_000_000, 0, 1));
        assert_eq!(t, Rgb::new(u32::MAX, 1, u32::MAX));
    }

    #[test]
    fn hex_clamps_for_display() {
        assert_eq!(Rgb::new(300, 16, 0).to_hex(), "#ff1000");
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1,2,3)");
    }

    #[test]
    fn multiply_tints() {
        assert_eq!(Rgb::new(200, 100, 50).multiply(Rgb::WHITE), Rgb::new(200, 100, 50));
        assert_eq!(Rgb::new(200, 100, 50).multiply(Rgb::ZERO), Rgb::ZERO);
        assert_eq!(Rgb::new(255, 255, 255).multiply(Rgb::new(128, 0, 64)), Rgb::new(128, 0, 64));
    }

    #[test]
    fn channel_indexing() {
        let mut c = Rgb::new(1, 2, 3);
        c[1] += 10;
        assert_eq!((c[0], c[1], c[2]), (1, 12, 3));
    }
}
