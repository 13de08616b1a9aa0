//! Effect options and engine settings
//!
//! Options use the camelCase prop names of the browser API, every field
//! optional: an absent field takes the effect's default. The same
//! struct loads from a JS object (via JSON) or from a TOML file.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Result, TrailError};

pub const DEFAULT_MAX_PARTICLES: usize = 4096;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrailOptions {
    pub color: Option<Color>,
    /// Gradient stops for effects that paint with two colors
    pub colors: Option<Vec<Color>>,
    pub size: Option<f64>,
    /// Stroke width for line effects
    pub width: Option<f64>,
    /// Particles per pointer move
    #[serde(alias = "count")]
    pub trails: Option<usize>,
    pub speed: Option<f64>,
    /// Particle lifespan in milliseconds
    pub lifespan: Option<f64>,
    pub dampening: Option<f64>,
    pub spread: Option<f64>,
    pub amplitude: Option<f64>,
    pub frequency: Option<f64>,
    pub wavelength: Option<f64>,
    pub turns: Option<f64>,
    pub spacing: Option<f64>,
    pub length: Option<f64>,
    pub burst_size: Option<f64>,
    pub spiral_speed: Option<f64>,
    pub twinkle_intensity: Option<f64>,
    pub glow_intensity: Option<f64>,
    pub rainbow_speed: Option<f64>,
    pub step_size: Option<f64>,
    pub line_count: Option<usize>,
    pub line_length: Option<f64>,
    pub line_width: Option<f64>,
    pub grid_size: Option<f64>,
    pub line_spacing: Option<f64>,

    pub max_particles: Option<usize>,
    pub seed: Option<u64>,
}

impl TrailOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Like [`from_json_str`](Self::from_json_str), but a field that fails to
    /// parse or validate is dropped on its own instead of failing the whole
    /// object. Returns the options and every rejected field with its error.
    pub fn from_json_lenient(json: &str) -> Result<(Self, Vec<(String, TrailError)>)> {
        if let Ok(options) = Self::from_json_str(json) {
            return Ok((options, Vec::new()));
        }
        let serde_json::Value::Object(fields) = serde_json::from_str(json)? else {
            return Err(TrailError::InvalidOption {
                name: "options",
                reason: "expected an object".to_string(),
            });
        };

        let mut accepted = serde_json::Map::new();
        let mut rejected = Vec::new();
        for (key, value) in fields {
            let mut candidate = accepted.clone();
            candidate.insert(key.clone(), value.clone());
            match Self::from_json_value(candidate) {
                Ok(_) => {
                    accepted.insert(key, value);
                }
                Err(e) => rejected.push((key, e)),
            }
        }
        Ok((Self::from_json_value(accepted)?, rejected))
    }

    fn from_json_value(fields: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let options: Self = serde_json::from_value(serde_json::Value::Object(fields))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let options: Self = toml::from_str(toml)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject negative or non-finite numeric options
    pub fn validate(&self) -> Result<()> {
        let numeric = [
            ("size", self.size),
            ("width", self.width),
            ("speed", self.speed),
            ("lifespan", self.lifespan),
            ("dampening", self.dampening),
            ("spread", self.spread),
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("wavelength", self.wavelength),
            ("turns", self.turns),
            ("spacing", self.spacing),
            ("length", self.length),
            ("burstSize", self.burst_size),
            ("spiralSpeed", self.spiral_speed),
            ("twinkleIntensity", self.twinkle_intensity),
            ("glowIntensity", self.glow_intensity),
            ("rainbowSpeed", self.rainbow_speed),
            ("stepSize", self.step_size),
            ("lineLength", self.line_length),
            ("lineWidth", self.line_width),
            ("gridSize", self.grid_size),
            ("lineSpacing", self.line_spacing),
        ];
        for (name, value) in numeric {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(TrailError::InvalidOption {
                        name,
                        reason: format!("expected a non-negative number, got {v}"),
                    });
                }
            }
        }
        if let Some(colors) = &self.colors {
            if colors.is_empty() {
                return Err(TrailError::InvalidOption {
                    name: "colors",
                    reason: "needs at least one color".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_particles: self.max_particles.unwrap_or(DEFAULT_MAX_PARTICLES),
            seed: self.seed,
        }
    }
}

/// Settings of the engine itself, independent of the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Live particle cap; oldest particles are evicted first. `0` = unbounded.
    pub max_particles: usize,
    /// RNG seed for randomized effect parameters; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            seed: None,
        }
    }
}
