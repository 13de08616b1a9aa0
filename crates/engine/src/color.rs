//! RGBA colors parsed from CSS color notation
//!
//! Accepts what a canvas `fillStyle` accepts for plain colors: hex, named
//! colors, `transparent`, `rgb()`/`rgba()` and `hsl()`/`hsla()`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrailError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_u32(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        )
    }

    /// Alpha channel as a 0..=1 factor
    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// CSS string for canvas fill/stroke styles
    pub fn to_css(self) -> String {
        if self.a == 0xff {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.alpha())
        }
    }
}

fn invalid(input: &str, reason: &'static str) -> TrailError {
    TrailError::InvalidColor {
        input: input.to_string(),
        reason,
    }
}

fn parse_hex(input: &str, hex: &str) -> Result<Color, TrailError> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(input, "non-hex digit"));
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

    let parsed = match hex.len() {
        3 => (nibble(0), nibble(1), nibble(2), Ok(0xff)),
        4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
        6 => (byte(0), byte(2), byte(4), Ok(0xff)),
        8 => (byte(0), byte(2), byte(4), byte(6)),
        _ => return Err(invalid(input, "expected 3, 4, 6 or 8 hex digits")),
    };

    match parsed {
        (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Color { r, g, b, a }),
        _ => Err(invalid(input, "non-hex digit")),
    }
}

/// A number, or a percentage of `full`
fn component(arg: &str, full: f64) -> Option<f64> {
    let value = match arg.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0 * full,
        None => arg.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

fn to_byte(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

fn alpha_byte(arg: Option<&&str>) -> Option<u8> {
    arg.map_or(Some(0xff), |a| component(a, 1.0).map(|a| to_byte(a * 255.0)))
}

fn hsl_to_rgb(hue: f64, sat: f64, light: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0) / 30.0;
    let sat = sat.clamp(0.0, 1.0);
    let light = light.clamp(0.0, 1.0);
    let a = sat * light.min(1.0 - light);
    let channel = |n: f64| {
        let k = (n + hue) % 12.0;
        255.0 * (light - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0))
    };
    (channel(0.0), channel(8.0), channel(4.0))
}

fn rgb_args(args: &[&str]) -> Option<Color> {
    Some(Color {
        r: to_byte(component(args[0], 255.0)?),
        g: to_byte(component(args[1], 255.0)?),
        b: to_byte(component(args[2], 255.0)?),
        a: alpha_byte(args.get(3))?,
    })
}

fn hsl_args(args: &[&str]) -> Option<Color> {
    let hue = args[0].strip_suffix("deg").unwrap_or(args[0]).parse::<f64>().ok()?;
    let (r, g, b) = hsl_to_rgb(hue, component(args[1], 1.0)?, component(args[2], 1.0)?);
    Some(Color {
        r: to_byte(r),
        g: to_byte(g),
        b: to_byte(b),
        a: alpha_byte(args.get(3))?,
    })
}

/// `rgb(...)`, `rgba(...)`, `hsl(...)`, `hsla(...)` in comma or space syntax
fn parse_functional(input: &str, lower: &str) -> Result<Color, TrailError> {
    let (name, rest) = lower
        .split_once('(')
        .ok_or_else(|| invalid(input, "expected `(`"))?;
    let body = rest
        .strip_suffix(')')
        .ok_or_else(|| invalid(input, "missing closing `)`"))?;
    let args: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|a| !a.is_empty())
        .collect();
    if !(3..=4).contains(&args.len()) {
        return Err(invalid(input, "expected 3 or 4 components"));
    }

    let color = match name.trim() {
        "rgb" | "rgba" => rgb_args(&args),
        "hsl" | "hsla" => hsl_args(&args),
        _ => return Err(invalid(input, "unknown color function")),
    };
    color.ok_or_else(|| invalid(input, "malformed color component"))
}

impl FromStr for Color {
    type Err = TrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(s, hex);
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.contains('(') {
            return parse_functional(s, &lower);
        }
        if lower == "transparent" {
            return Ok(Self::TRANSPARENT);
        }
        NAMED
            .binary_search_by(|(name, _)| name.cmp(&lower.as_str()))
            .map(|i| Self::from_u32(NAMED[i].1))
            .map_err(|_| invalid(s, "unknown color"))
    }
}

impl TryFrom<String> for Color {
    type Error = TrailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// CSS named colors, sorted for binary search
const NAMED: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF),
    ("antiquewhite", 0xFAEBD7),
    ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4),
    ("azure", 0xF0FFFF),
    ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4),
    ("black", 0x000000),
    ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF),
    ("blueviolet", 0x8A2BE2),
    ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887),
    ("cadetblue", 0x5F9EA0),
    ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E),
    ("coral", 0xFF7F50),
    ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkcyan", 0x008B8B),
    ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xA9A9A9),
    ("darkkhaki", 0xBDB76B),
    ("darkmagenta", 0x8B008B),
    ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00),
    ("darkorchid", 0x9932CC),
    ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A),
    ("darkseagreen", 0x8FBC8F),
    ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F),
    ("darkslategrey", 0x2F4F4F),
    ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493),
    ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222),
    ("floralwhite", 0xFFFAF0),
    ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF),
    ("gainsboro", 0xDCDCDC),
    ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xADFF2F),
    ("grey", 0x808080),
    ("honeydew", 0xF0FFF0),
    ("hotpink", 0xFF69B4),
    ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0),
    ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5),
    ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD),
    ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF),
    ("lightgoldenrodyellow", 0xFAFAD2),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightgrey", 0xD3D3D3),
    ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A),
    ("lightseagreen", 0x20B2AA),
    ("lightskyblue", 0x87CEFA),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0),
    ("lime", 0x00FF00),
    ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6),
    ("magenta", 0xFF00FF),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66CDAA),
    ("mediumblue", 0x0000CD),
    ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB),
    ("mediumseagreen", 0x3CB371),
    ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A),
    ("mediumturquoise", 0x48D1CC),
    ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xF5FFFA),
    ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD),
    ("navy", 0x000080),
    ("oldlace", 0xFDF5E6),
    ("olive", 0x808000),
    ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA),
    ("palegreen", 0x98FB98),
    ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5),
    ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F),
    ("pink", 0xFFC0CB),
    ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xFF0000),
    ("rosybrown", 0xBC8F8F),
    ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513),
    ("salmon", 0xFA8072),
    ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57),
    ("seashell", 0xFFF5EE),
    ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F),
    ("steelblue", 0x4682B4),
    ("tan", 0xD2B48C),
    ("teal", 0x008080),
    ("thistle", 0xD8BFD8),
    ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0),
    ("violet", 0xEE82EE),
    ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF),
    ("whitesmoke", 0xF5F5F5),
    ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];
