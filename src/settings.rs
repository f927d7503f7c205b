//! Cosmetic feature toggles
//!
//! These are owned by the simulation state so that toggles arrive through the
//! same command stream as everything else, but the core only ever reads one
//! of them (tracers). The rest are for the presentation side.

use serde::{Deserialize, Serialize};

/// A toggleable feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Antialias,
    Axes,
    Crosshair,
    Dust,
    /// Shield flash and windshield debris
    ShieldEffect,
    TorpedoLensFlare,
    /// Every fifth torpedo is a tracer
    Tracers,
    NebulaTexture,
    AsteroidTextures,
    TorpedoTextures,
    Sound,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::Antialias,
        Feature::Axes,
        Feature::Crosshair,
        Feature::Dust,
        Feature::ShieldEffect,
        Feature::TorpedoLensFlare,
        Feature::Tracers,
        Feature::NebulaTexture,
        Feature::AsteroidTextures,
        Feature::TorpedoTextures,
        Feature::Sound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Antialias => "antialias",
            Feature::Axes => "axes",
            Feature::Crosshair => "crosshair",
            Feature::Dust => "dust",
            Feature::ShieldEffect => "shield_effect",
            Feature::TorpedoLensFlare => "torpedo_lens_flare",
            Feature::Tracers => "tracers",
            Feature::NebulaTexture => "nebula_texture",
            Feature::AsteroidTextures => "asteroid_textures",
            Feature::TorpedoTextures => "torpedo_textures",
            Feature::Sound => "sound",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

/// Shape drawn around the locked target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetBox {
    #[default]
    Cube,
    Octahedron,
    Sphere,
    Tetrahedron,
}

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub antialias: bool,
    pub axes: bool,
    pub crosshair: bool,
    pub dust: bool,
    pub shield_effect: bool,
    pub torpedo_lens_flare: bool,
    pub tracers: bool,
    pub nebula_texture: bool,
    pub asteroid_textures: bool,
    pub torpedo_textures: bool,
    pub sound: bool,
    pub target_box: TargetBox,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            antialias: true,
            axes: false,
            crosshair: true,
            dust: true,
            shield_effect: true,
            torpedo_lens_flare: true,
            tracers: true,
            nebula_texture: false,
            asteroid_textures: true,
            torpedo_textures: true,
            sound: true,
            target_box: TargetBox::Cube,
        }
    }
}

impl Settings {
    fn flag_mut(&mut self, feature: Feature) -> &mut bool {
        match feature {
            Feature::Antialias => &mut self.antialias,
            Feature::Axes => &mut self.axes,
            Feature::Crosshair => &mut self.crosshair,
            Feature::Dust => &mut self.dust,
            Feature::ShieldEffect => &mut self.shield_effect,
            Feature::TorpedoLensFlare => &mut self.torpedo_lens_flare,
            Feature::Tracers => &mut self.tracers,
            Feature::NebulaTexture => &mut self.nebula_texture,
            Feature::AsteroidTextures => &mut self.asteroid_textures,
            Feature::TorpedoTextures => &mut self.torpedo_textures,
            Feature::Sound => &mut self.sound,
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Antialias => self.antialias,
            Feature::Axes => self.axes,
            Feature::Crosshair => self.crosshair,
            Feature::Dust => self.dust,
            Feature::ShieldEffect => self.shield_effect,
            Feature::TorpedoLensFlare => self.torpedo_lens_flare,
            Feature::Tracers => self.tracers,
            Feature::NebulaTexture => self.nebula_texture,
            Feature::AsteroidTextures => self.asteroid_textures,
            Feature::TorpedoTextures => self.torpedo_textures,
            Feature::Sound => self.sound,
        }
    }

    /// Flip a feature, returning its new state
    pub fn toggle(&mut self, feature: Feature) -> bool {
        let flag = self.flag_mut(feature);
        *flag = !*flag;
        *flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut settings = Settings::default();
        for feature in Feature::ALL {
            let before = settings.is_enabled(feature);
            assert_eq!(settings.toggle(feature), !before);
            assert_eq!(settings.is_enabled(feature), !before);
        }
    }

    #[test]
    fn test_feature_names() {
        assert_eq!(Feature::from_str("Tracers"), Some(Feature::Tracers));
        assert_eq!(Feature::from_str("shield_effect"), Some(Feature::ShieldEffect));
        assert_eq!(Feature::from_str("warp_drive"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"axes": true}"#).unwrap();
        assert!(settings.axes);
        assert!(settings.tracers);
        assert_eq!(settings.target_box, TargetBox::Cube);
    }
}
