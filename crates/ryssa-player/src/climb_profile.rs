//! Authored climbing parameters attached to climbable surfaces.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Read-only climbing parameters for a surface.
///
/// One profile is typically shared (behind an `Arc`) by every surface of the
/// same material, e.g. all ivy walls in a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbProfile {
    /// Climb speed in m/s along each permitted axis.
    pub climb_speed: f32,
    /// Whether sideways movement is allowed while climbing.
    pub allow_strafe: bool,
    /// Whether climbing this surface drains stamina.
    pub use_stamina: bool,
    /// Stamina drained per second of climbing.
    pub stamina_drain_per_second: f32,
}

impl Default for ClimbProfile {
    fn default() -> Self {
        Self {
            climb_speed: 3.0,
            allow_strafe: false,
            use_stamina: false,
            stamina_drain_per_second: 1.0,
        }
    }
}

impl ClimbProfile {
    /// Parse and validate a profile from RON text.
    ///
    /// Missing fields take their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ProfileError> {
        let profile: ClimbProfile = ron::from_str(source).map_err(ProfileError::Parse)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if !self.climb_speed.is_finite() || self.climb_speed < 0.0 {
            return Err(ProfileError::Invalid("climb_speed must be finite and >= 0"));
        }
        if !self.stamina_drain_per_second.is_finite() || self.stamina_drain_per_second < 0.0 {
            return Err(ProfileError::Invalid(
                "stamina_drain_per_second must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_uses_defaults() {
        let profile = ClimbProfile::from_ron_str("()").unwrap();
        assert_eq!(profile, ClimbProfile::default());
        assert_eq!(profile.climb_speed, 3.0);
        assert!(!profile.allow_strafe);
    }

    #[test]
    fn test_partial_profile() {
        let profile =
            ClimbProfile::from_ron_str("(climb_speed: 1.5, allow_strafe: true)").unwrap();
        assert_eq!(profile.climb_speed, 1.5);
        assert!(profile.allow_strafe);
        assert!(!profile.use_stamina);
    }

    #[test]
    fn test_negative_speed_rejected() {
        let err = ClimbProfile::from_ron_str("(climb_speed: -1.0)").unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn test_malformed_profile_rejected() {
        let err = ClimbProfile::from_ron_str("(climb_speed: fast)").unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }
}
