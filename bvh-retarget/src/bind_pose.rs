use crate::target::{TargetSkeleton, depth_first};
use glam::{Quat, Vec3};
use std::collections::HashMap;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BindTransform {
    pub world_rotation: Quat,
    pub local_position: Vec3,
}

/// Target pose captured before playback, keyed by raw node name.
#[derive(Clone, Debug, Default)]
pub struct BindPose {
    entries: HashMap<String, BindTransform>,
}

impl BindPose {
    /// Records every node reachable from the root. When two nodes share a raw
    /// name the first one visited is kept.
    pub fn capture<S: TargetSkeleton + ?Sized>(skeleton: &S) -> Self {
        let mut entries = HashMap::new();
        for node in depth_first(skeleton) {
            entries
                .entry(skeleton.name(node).to_string())
                .or_insert_with(|| BindTransform {
                    world_rotation: skeleton.world_rotation(node),
                    local_position: skeleton.local_position(node),
                });
        }
        log::debug!("captured bind pose for {} nodes", entries.len());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&BindTransform> {
        self.entries.get(key)
    }

    pub fn rotation(&self, key: &str) -> Option<Quat> {
        self.entries.get(key).map(|t| t.world_rotation)
    }

    pub fn position(&self, key: &str) -> Option<Vec3> {
        self.entries.get(key).map(|t| t.local_position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindTransform)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
