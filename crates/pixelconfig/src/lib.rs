use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Cell shape the coverage field is masked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Square,
    Circle,
    Triangle,
    Diamond,
}

impl Variant {
    /// Index consumed by the fragment shader's shape switch.
    pub fn shader_index(self) -> i32 {
        match self {
            Variant::Square => 0,
            Variant::Circle => 1,
            Variant::Triangle => 2,
            Variant::Diamond => 3,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Square => f.write_str("square"),
            Variant::Circle => f.write_str("circle"),
            Variant::Triangle => f.write_str("triangle"),
            Variant::Diamond => f.write_str("diamond"),
        }
    }
}

/// Gamma-encoded colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `#RGB` (the leading `#` is optional).
    pub fn from_hex(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(format!("invalid colour '{trimmed}'"));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
            6 => digits.to_string(),
            _ => return Err(format!("invalid colour '{trimmed}'; expected #RRGGBB or #RGB")),
        };
        let channel = |offset: usize| {
            u8::from_str_radix(&expanded[offset..offset + 2], 16)
                .map(|value| value as f32 / 255.0)
                .map_err(|err| format!("invalid colour '{trimmed}': {err}"))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(self) -> String {
        let byte = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw).map_err(de::Error::custom)
    }
}

/// Every tunable of the background renderer.
///
/// Values are not range-checked; callers own sanity. `antialias`, `liquid` and
/// whether `noise_amount` is non-zero are structural (see [`StructuralKey`]);
/// everything else can be patched onto a live surface.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixelBlastConfig {
    pub variant: Variant,
    /// Cell size in device-independent pixels.
    pub pixel_size: f32,
    pub color: Rgb,
    pub antialias: bool,
    pub pattern_scale: f32,
    pub pattern_density: f32,
    pub pixel_size_jitter: f32,
    pub enable_ripples: bool,
    pub ripple_speed: f32,
    pub ripple_thickness: f32,
    pub ripple_intensity_scale: f32,
    pub liquid: bool,
    pub liquid_strength: f32,
    pub liquid_radius: f32,
    pub liquid_wobble_speed: f32,
    pub auto_pause_offscreen: bool,
    /// Time multiplier; negative values run the pattern backwards.
    pub speed: f32,
    pub transparent: bool,
    pub edge_fade: f32,
    pub noise_amount: f32,
}

impl Default for PixelBlastConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Square,
            pixel_size: 3.0,
            color: Rgb::new(177.0 / 255.0, 158.0 / 255.0, 239.0 / 255.0),
            antialias: true,
            pattern_scale: 2.0,
            pattern_density: 1.0,
            pixel_size_jitter: 0.0,
            enable_ripples: true,
            ripple_speed: 0.3,
            ripple_thickness: 0.1,
            ripple_intensity_scale: 1.0,
            liquid: false,
            liquid_strength: 0.1,
            liquid_radius: 1.0,
            liquid_wobble_speed: 4.5,
            auto_pause_offscreen: true,
            speed: 0.5,
            transparent: true,
            edge_fade: 0.5,
            noise_amount: 0.0,
        }
    }
}

/// The subset of a configuration that shapes GPU resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructuralKey {
    pub antialias: bool,
    pub liquid: bool,
    pub noise: bool,
}

impl PixelBlastConfig {
    pub fn structural_key(&self) -> StructuralKey {
        StructuralKey {
            antialias: self.antialias,
            liquid: self.liquid,
            noise: self.noise_enabled(),
        }
    }

    /// True when moving from `previous` to `self` needs fresh GPU resources.
    pub fn requires_rebuild(&self, previous: &Self) -> bool {
        self.structural_key() != previous.structural_key()
    }

    pub fn noise_enabled(&self) -> bool {
        self.noise_amount > 0.0
    }
}

/// On-disk TOML document wrapping a [`PixelBlastConfig`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigDocument {
    pub version: u32,
    #[serde(default)]
    pub background: PixelBlastConfig,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            background: PixelBlastConfig::default(),
        }
    }
}

impl ConfigDocument {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: ConfigDocument = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }
        Ok(())
    }

    pub fn into_config(self) -> PixelBlastConfig {
        self.background
    }
}
