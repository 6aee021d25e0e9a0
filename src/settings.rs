//! Match rules and presets
//!
//! Two layouts of the game exist: a portrait one (paddles on the top and bottom
//! edges, short matches) and a landscape one (paddles on the side edges, longer
//! matches, a lazier AI). Custom rules can be loaded from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::AI_SPEED;
use crate::sim::Orientation;

/// Built-in rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulesPreset {
    #[default]
    Portrait,
    Landscape,
}

impl RulesPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesPreset::Portrait => "Portrait",
            RulesPreset::Landscape => "Landscape",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "portrait" | "classic" => Some(RulesPreset::Portrait),
            "landscape" | "wide" => Some(RulesPreset::Landscape),
            _ => None,
        }
    }

    pub fn rules(&self) -> Rules {
        match self {
            RulesPreset::Portrait => Rules {
                orientation: Orientation::Horizontal,
                win_score: 5,
                ai_dead_zone: 20.0,
                ai_speed: AI_SPEED,
                serve_velocity: Vec2::new(2.0, 1.5),
            },
            RulesPreset::Landscape => Rules {
                orientation: Orientation::Vertical,
                win_score: 10,
                ai_dead_zone: 35.0,
                ai_speed: AI_SPEED,
                serve_velocity: Vec2::new(2.0, 1.5),
            },
        }
    }
}

/// Rules of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Which edges the paddles sit on
    pub orientation: Orientation,
    /// First side to reach this many points wins
    pub win_score: u32,
    /// AI holds still while its center is within this distance of the ball
    pub ai_dead_zone: f32,
    /// AI paddle speed (pixels per tick)
    pub ai_speed: f32,
    /// Ball velocity on every serve, in lane space: (along paddles, toward player)
    pub serve_velocity: Vec2,
}

impl Default for Rules {
    fn default() -> Self {
        RulesPreset::default().rules()
    }
}

impl Rules {
    /// Parse rules from JSON; missing fields take the portrait defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rules: Rules = serde_json::from_str(json)?;
        Ok(rules.sanitized())
    }

    /// Replace out-of-range values with usable ones
    pub fn sanitized(mut self) -> Self {
        let defaults = Rules::default();
        self.win_score = self.win_score.max(1);
        if !self.ai_dead_zone.is_finite() || self.ai_dead_zone < 0.0 {
            self.ai_dead_zone = defaults.ai_dead_zone;
        }
        if !self.ai_speed.is_finite() || self.ai_speed < 0.0 {
            self.ai_speed = defaults.ai_speed;
        }
        // A serve with no motion toward the paddles would never score
        if !self.serve_velocity.is_finite() || self.serve_velocity.y == 0.0 {
            self.serve_velocity = defaults.serve_velocity;
        }
        self
    }

    /// Resolve rules from an optional preset name and optional JSON override.
    /// JSON wins when it parses; anything unusable falls back with a warning.
    pub fn load(preset: Option<&str>, json: Option<&str>) -> Self {
        if let Some(json) = json {
            match Self::from_json(json) {
                Ok(rules) => {
                    log::info!("Loaded custom rules");
                    return rules;
                }
                Err(e) => log::warn!("Ignoring invalid rules JSON: {}", e),
            }
        }

        let preset = match preset {
            Some(name) => RulesPreset::from_str(name).unwrap_or_else(|| {
                log::warn!("Unknown rules preset '{}', using default", name);
                RulesPreset::default()
            }),
            None => RulesPreset::default(),
        };
        log::info!("Using {} rules", preset.as_str());
        preset.rules()
    }

    /// Resolve rules from a URL query such as `?rules=landscape&orientation=horizontal`.
    /// `orientation` overrides the edges the preset puts the paddles on.
    pub fn from_query(query: &str) -> Self {
        let mut rules = Self::load(query_param(query, "rules"), None);
        if let Some(name) = query_param(query, "orientation") {
            match Orientation::from_str(name) {
                Some(orientation) => rules.orientation = orientation,
                None => log::warn!(
                    "Unknown orientation '{}', keeping {}",
                    name,
                    rules.orientation.as_str()
                ),
            }
        }
        rules
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_portrait() {
        let rules = Rules::default();
        assert_eq!(rules.orientation, Orientation::Horizontal);
        assert_eq!(rules.win_score, 5);
        assert_eq!(rules.ai_dead_zone, 20.0);
        assert_eq!(rules.ai_speed, 4.0);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(RulesPreset::from_str("LANDSCAPE"), Some(RulesPreset::Landscape));
        assert_eq!(RulesPreset::from_str("classic"), Some(RulesPreset::Portrait));
        assert_eq!(RulesPreset::from_str("tennis"), None);
    }

    #[test]
    fn test_from_json_partial() {
        let rules = Rules::from_json(r#"{ "win_score": 11, "orientation": "Vertical" }"#).unwrap();
        assert_eq!(rules.win_score, 11);
        assert_eq!(rules.orientation, Orientation::Vertical);
        assert_eq!(rules.ai_dead_zone, 20.0);
    }

    #[test]
    fn test_from_json_sanitizes() {
        let rules =
            Rules::from_json(r#"{ "win_score": 0, "ai_speed": -3.0, "serve_velocity": [1.0, 0.0] }"#)
                .unwrap();
        assert_eq!(rules.win_score, 1);
        assert_eq!(rules.ai_speed, 4.0);
        assert_eq!(rules.serve_velocity, Vec2::new(2.0, 1.5));
    }

    #[test]
    fn test_load_falls_back() {
        assert_eq!(Rules::load(None, Some("not json")), Rules::default());
        assert_eq!(Rules::load(Some("nope"), None), Rules::default());
        assert_eq!(
            Rules::load(Some("landscape"), None),
            RulesPreset::Landscape.rules()
        );
    }

    #[test]
    fn test_from_query() {
        assert_eq!(Rules::from_query(""), Rules::default());
        assert_eq!(
            Rules::from_query("?rules=landscape"),
            RulesPreset::Landscape.rules()
        );

        let rules = Rules::from_query("?orientation=horizontal&rules=landscape");
        assert_eq!(rules.orientation, Orientation::Horizontal);
        assert_eq!(rules.win_score, 10);

        let rules = Rules::from_query("?orientation=V");
        assert_eq!(rules.orientation, Orientation::Vertical);
        assert_eq!(rules.win_score, 5);

        assert_eq!(Rules::from_query("?orientation=diagonal"), Rules::default());
    }
}
