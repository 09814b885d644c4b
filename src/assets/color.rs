use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Return `true` when nothing would be drawn with this colour.
    pub fn is_invisible(self) -> bool {
        self.a == 0
    }

    /// Same colour with alpha scaled by `factor` in `0..=1`.
    pub fn with_alpha_scaled(self, factor: f64) -> Self {
        let a = (f64::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// `#rrggbbaa` (or `#rrggbb` when opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Parse a CSS-ish colour string.
    ///
    /// Supported: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
    /// (alpha as `0..1` or a percentage), `transparent`, and a handful of named colours.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty colour string".to_owned());
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_fn(args);
        }
        named(&lower).ok_or_else(|| format!("unrecognized colour \"{s}\""))
    }
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    fn nibble(c: u8) -> Result<u8, String> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| format!("invalid hex digit '{}'", c as char))
    }
    fn byte(pair: &[u8]) -> Result<u8, String> {
        Ok(nibble(pair[0])? << 4 | nibble(pair[1])?)
    }
    fn short(c: u8) -> Result<u8, String> {
        let n = nibble(c)?;
        Ok(n << 4 | n)
    }

    let b = s.as_bytes();
    match b.len() {
        3 => Ok(Rgba8::opaque(short(b[0])?, short(b[1])?, short(b[2])?)),
        4 => Ok(Rgba8::new(
            short(b[0])?,
            short(b[1])?,
            short(b[2])?,
            short(b[3])?,
        )),
        6 => Ok(Rgba8::opaque(byte(&b[0..2])?, byte(&b[2..4])?, byte(&b[4..6])?)),
        8 => Ok(Rgba8::new(
            byte(&b[0..2])?,
            byte(&b[2..4])?,
            byte(&b[4..6])?,
            byte(&b[6..8])?,
        )),
        _ => Err("hex colour must be #rgb, #rgba, #rrggbb or #rrggbbaa".to_owned()),
    }
}

fn parse_rgb_fn(args: &str) -> Result<Rgba8, String> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("rgb() expects 3 or 4 components, got {}", parts.len()));
    }

    fn channel(p: &str) -> Result<u8, String> {
        let v = if let Some(pct) = p.strip_suffix('%') {
            pct.parse::<f64>().map(|v| v / 100.0 * 255.0)
        } else {
            p.parse::<f64>()
        }
        .map_err(|_| format!("invalid colour channel \"{p}\""))?;
        Ok(v.round().clamp(0.0, 255.0) as u8)
    }

    fn alpha(p: &str) -> Result<u8, String> {
        let v = if let Some(pct) = p.strip_suffix('%') {
            pct.parse::<f64>().map(|v| v / 100.0)
        } else {
            p.parse::<f64>()
        }
        .map_err(|_| format!("invalid alpha \"{p}\""))?;
        Ok((v.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    let a = match parts.get(3) {
        Some(p) => alpha(p)?,
        None => 255,
    };
    Ok(Rgba8::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        a,
    ))
}

fn named(s: &str) -> Option<Rgba8> {
    Some(match s {
        "transparent" => Rgba8::transparent(),
        "black" => Rgba8::opaque(0, 0, 0),
        "white" => Rgba8::opaque(255, 255, 255),
        "red" => Rgba8::opaque(255, 0, 0),
        "green" => Rgba8::opaque(0, 128, 0),
        "lime" => Rgba8::opaque(0, 255, 0),
        "blue" => Rgba8::opaque(0, 0, 255),
        "yellow" => Rgba8::opaque(255, 255, 0),
        "orange" => Rgba8::opaque(255, 165, 0),
        "purple" => Rgba8::opaque(128, 0, 128),
        "gray" | "grey" => Rgba8::opaque(128, 128, 128),
        "lightgray" | "lightgrey" => Rgba8::opaque(211, 211, 211),
        "darkgray" | "darkgrey" => Rgba8::opaque(169, 169, 169),
        "silver" => Rgba8::opaque(192, 192, 192),
        "navy" => Rgba8::opaque(0, 0, 128),
        "teal" => Rgba8::opaque(0, 128, 128),
        "cyan" | "aqua" => Rgba8::opaque(0, 255, 255),
        "magenta" | "fuchsia" => Rgba8::opaque(255, 0, 255),
        _ => return None,
    })
}

/// A colour as written in a layout file.
///
/// Deserialization never fails: values that cannot be understood are kept as
/// [`ColorValue::Invalid`] so the renderer can report them and carry on.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    /// Successfully parsed colour.
    Rgba(Rgba8),
    /// Unparseable input, kept verbatim for diagnostics and write-back.
    Invalid(String),
}

impl ColorValue {
    /// Parsed colour, or the reason it could not be parsed.
    pub fn resolve(&self) -> Result<Rgba8, String> {
        match self {
            Self::Rgba(c) => Ok(*c),
            Self::Invalid(raw) => Err(format!("unrecognized colour {raw}")),
        }
    }
}

impl From<Rgba8> for ColorValue {
    fn from(c: Rgba8) -> Self {
        Self::Rgba(c)
    }
}

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Css(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
            Any(serde_json::Value),
        }

        fn one() -> f64 {
            1.0
        }

        fn unit(v: f64) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Css(s) => match Rgba8::parse(&s) {
                Ok(c) => Self::Rgba(c),
                Err(_) => Self::Invalid(s),
            },
            Repr::RgbaObj { r, g, b, a } => Self::Rgba(Rgba8::new(unit(r), unit(g), unit(b), unit(a))),
            Repr::Arr(v) if v.len() == 3 || v.len() == 4 => Self::Rgba(Rgba8::new(
                unit(v[0]),
                unit(v[1]),
                unit(v[2]),
                unit(v.get(3).copied().unwrap_or(1.0)),
            )),
            Repr::Arr(v) => Self::Invalid(format!("{v:?}")),
            Repr::Any(v) => Self::Invalid(v.to_string()),
        })
    }
}

impl Serialize for ColorValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Rgba(c) => serializer.serialize_str(&c.to_hex()),
            Self::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
