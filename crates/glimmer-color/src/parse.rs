use thiserror::Error;

use crate::Rgb;
use crate::named::named_color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty colour string")]
    Empty,
    #[error("malformed hex colour `{0}`")]
    InvalidHex(String),
    #[error("malformed rgb() colour `{0}`")]
    InvalidRgb(String),
    #[error("unknown colour name `{0}`")]
    UnknownName(String),
}

/// Parses `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a CSS colour name.
pub fn from_string(input: &str) -> Result<Rgb, ColorError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(input.to_string()));
    }
    let lower = s.to_ascii_lowercase();
    if let Some(body) = lower.strip_prefix("rgb(") {
        return body
            .strip_suffix(')')
            .and_then(parse_rgb_body)
            .ok_or_else(|| ColorError::InvalidRgb(input.to_string()));
    }
    named_color(&lower).ok_or_else(|| ColorError::UnknownName(input.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u32::from_str_radix(&hex[i..i + 1], 16).ok();
    let pair = |i: usize| u32::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        // #abc expands each digit: a -> aa
        3 => Some(Rgb::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some(Rgb::new(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

fn parse_rgb_body(body: &str) -> Option<Rgb> {
    let mut parts = body.split(',').map(|p| p.trim().parse::<u32>().ok());
    let r = parts.next()??;
    let g = parts.next()??;
    let b = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}
