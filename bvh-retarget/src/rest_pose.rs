//! Source skeleton geometry as plain data, for hosts that want to draw it.

use crate::MotionBuffer;
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct RestJoint {
    pub name: String,
    pub parent: Option<usize>,
    pub position: Vec3,
    /// Tip of the joint's end site, if it has one.
    pub end_site: Option<Vec3>,
}

/// Joint positions obtained by accumulating hierarchy offsets from the root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestPose {
    pub joints: Vec<RestJoint>,
}

impl RestPose {
    pub fn from_motion(buffer: &MotionBuffer, scale: f32) -> Self {
        let mut joints: Vec<RestJoint> = Vec::with_capacity(buffer.joints().len());
        for joint in buffer.joints() {
            // Parents are declared before their children.
            let base = joint
                .parent
                .and_then(|p| joints.get(p))
                .map(|p| p.position)
                .unwrap_or(Vec3::ZERO);
            let position = base + joint.offset * scale;
            joints.push(RestJoint {
                name: joint.name.clone(),
                parent: joint.parent,
                position,
                end_site: joint.end_site.map(|tip| position + tip * scale),
            });
        }
        Self { joints }
    }

    pub fn position(&self, name: &str) -> Option<Vec3> {
        self.joints
            .iter()
            .find(|j| j.name == name)
            .map(|j| j.position)
    }

    /// Bone segments `(from, to)`, end sites included; zero-length ones are dropped.
    pub fn segments(&self) -> Vec<(Vec3, Vec3)> {
        let mut out = Vec::new();
        for joint in &self.joints {
            if let Some(parent) = joint.parent.and_then(|p| self.joints.get(p)) {
                out.push((parent.position, joint.position));
            }
            if let Some(tip) = joint.end_site {
                out.push((joint.position, tip));
            }
        }
        out.retain(|(a, b)| a != b);
        out
    }
}
