use crate::Error;
use crate::rotation::RotationMapping;

/// Substrings that mark a joint as belonging to one side of the body.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MirrorMarkers {
    pub left: String,
    pub right: String,
}

impl Default for MirrorMarkers {
    fn default() -> Self {
        Self {
            left: "Left".to_string(),
            right: "Right".to_string(),
        }
    }
}

impl MirrorMarkers {
    pub fn is_sided(&self, name: &str) -> bool {
        name.contains(self.left.as_str()) || name.contains(self.right.as_str())
    }

    /// The opposite-side name, or `None` when `name` carries no marker.
    pub fn counterpart(&self, name: &str) -> Option<String> {
        if name.contains(self.left.as_str()) {
            Some(name.replace(self.left.as_str(), &self.right))
        } else if name.contains(self.right.as_str()) {
            Some(name.replace(self.right.as_str(), &self.left))
        } else {
            None
        }
    }
}

/// Options for [`crate::PoseRetargeter`].
///
/// Smoothing uses `weight = elapsed * smoothing_rate` for both the position
/// lerp and the rotation slerp. The weight is not clamped unless
/// `clamp_weight` is set: a weight above 1 extrapolates past the target
/// instead of converging on it, so pick a rate that matches the tick interval.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetargetConfig {
    /// Uniform scale applied to retargeted X/Z root motion.
    pub scale: f32,
    /// Drive left joints from right-side data and vice versa.
    pub mirror: bool,
    pub mirror_markers: MirrorMarkers,
    pub smoothing_rate: f32,
    pub clamp_weight: bool,
    pub rotation: RotationMapping,
    /// Prepended to clean joint names when looking up bind-pose rotations.
    pub bone_prefix: String,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            scale: 0.01,
            mirror: true,
            mirror_markers: MirrorMarkers::default(),
            smoothing_rate: 30.0,
            clamp_weight: false,
            rotation: RotationMapping::default(),
            bone_prefix: String::new(),
        }
    }
}

impl RetargetConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.scale.is_finite() {
            return Err(Error::InvalidValue {
                message: format!("scale must be finite, got {}", self.scale),
            });
        }
        if !self.smoothing_rate.is_finite() || self.smoothing_rate < 0.0 {
            return Err(Error::InvalidValue {
                message: format!(
                    "smoothing_rate must be a non-negative number, got {}",
                    self.smoothing_rate
                ),
            });
        }
        let markers = &self.mirror_markers;
        if markers.left.is_empty() || markers.right.is_empty() || markers.left == markers.right {
            return Err(Error::InvalidValue {
                message: format!(
                    "mirror markers must be distinct and non-empty, got '{}' / '{}'",
                    markers.left, markers.right
                ),
            });
        }
        Ok(())
    }

    /// Interpolation weight for a tick that took `elapsed` seconds.
    pub fn smoothing_weight(&self, elapsed: f32) -> f32 {
        let weight = elapsed * self.smoothing_rate;
        if self.clamp_weight {
            weight.clamp(0.0, 1.0)
        } else {
            weight
        }
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(input).map_err(|e| Error::JsonParse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "json")]
    pub fn to_json_string(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::JsonParse {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_swaps_markers() {
        let markers = MirrorMarkers::default();
        assert_eq!(markers.counterpart("LeftArm").as_deref(), Some("RightArm"));
        assert_eq!(markers.counterpart("RightUpLeg").as_deref(), Some("LeftUpLeg"));
        assert_eq!(markers.counterpart("Spine"), None);
        assert!(markers.is_sided("LeftHand"));
        assert!(!markers.is_sided("Head"));
    }

    #[test]
    fn weight_is_unclamped_by_default() {
        let mut config = RetargetConfig {
            smoothing_rate: 120.0,
            ..RetargetConfig::default()
        };
        assert!((config.smoothing_weight(0.5) - 60.0).abs() <= 1.0e-4);
        config.clamp_weight = true;
        assert_eq!(config.smoothing_weight(0.5), 1.0);
        assert_eq!(config.smoothing_weight(-1.0), 0.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(RetargetConfig::default().validate().is_ok());

        let config = RetargetConfig {
            smoothing_rate: -1.0,
            ..RetargetConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RetargetConfig {
            mirror_markers: MirrorMarkers {
                left: "L".to_string(),
                right: "L".to_string(),
            },
            ..RetargetConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_config_fills_defaults() {
        let config = RetargetConfig::from_json_str(
            r#"{ "scale": 1.0, "mirror": false, "rotation": { "order": "ZXY", "sign_y": -1 } }"#,
        )
        .unwrap();
        assert_eq!(config.scale, 1.0);
        assert!(!config.mirror);
        assert_eq!(config.rotation.order, crate::AxisOrder::Zxy);
        assert_eq!(config.rotation.sign_y, crate::Sign::Negative);
        assert_eq!(config.rotation.sign_x, crate::Sign::Positive);
        assert_eq!(config.smoothing_rate, 30.0);
        assert_eq!(config.mirror_markers, MirrorMarkers::default());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_config_rejects_bad_sign() {
        let err = RetargetConfig::from_json_str(r#"{ "rotation": { "sign_x": 2 } }"#).unwrap_err();
        assert!(matches!(err, Error::JsonParse { .. }));
    }
}
