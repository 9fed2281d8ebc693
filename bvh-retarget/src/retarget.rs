use crate::binding::{Bindings, clean_name};
use crate::bind_pose::BindPose;
use crate::motion::{FrameView, MotionBuffer};
use crate::target::TargetSkeleton;
use crate::{Error, RetargetConfig};
use glam::{Quat, Vec3};
use std::borrow::Cow;
use std::hash::Hash;

/// Bindings and bind pose for one target skeleton.
#[derive(Clone, Debug)]
pub struct Rig<N> {
    pub bindings: Bindings<N>,
    pub bind_pose: BindPose,
}

impl<N: Copy + Eq + Hash> Rig<N> {
    /// Captures the bind pose, then binds the buffer's joints to `skeleton`.
    pub fn capture<S>(skeleton: &S, buffer: &MotionBuffer) -> Self
    where
        S: TargetSkeleton<Node = N> + ?Sized,
    {
        let bind_pose = BindPose::capture(skeleton);
        let bindings = Bindings::bind(skeleton, buffer.joint_names());
        Self {
            bindings,
            bind_pose,
        }
    }

    pub fn recapture_bind_pose<S>(&mut self, skeleton: &S)
    where
        S: TargetSkeleton<Node = N> + ?Sized,
    {
        self.bind_pose = BindPose::capture(skeleton);
    }

    pub fn rebind<S>(&mut self, skeleton: &S, buffer: &MotionBuffer)
    where
        S: TargetSkeleton<Node = N> + ?Sized,
    {
        self.bindings = Bindings::bind(skeleton, buffer.joint_names());
    }
}

/// Result of [`PoseRetargeter::step`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Step {
    Applied(usize),
    Finished,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum JointOutcome {
    Applied,
    Skipped,
    /// Applied against an identity bind rotation.
    NoBindRotation,
}

/// Applies parsed frames to a target skeleton.
#[derive(Clone, Debug, Default)]
pub struct PoseRetargeter {
    config: RetargetConfig,
}

impl PoseRetargeter {
    pub fn new(config: RetargetConfig) -> Self {
        Self { config }
    }

    pub fn try_new(config: RetargetConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RetargetConfig {
        &self.config
    }

    /// Name of the joint whose data drives `clean_joint`.
    pub fn source_joint<'a>(&self, clean_joint: &'a str) -> Cow<'a, str> {
        if !self.config.mirror {
            return Cow::Borrowed(clean_joint);
        }
        match self.config.mirror_markers.counterpart(clean_joint) {
            Some(name) => Cow::Owned(name),
            None => Cow::Borrowed(clean_joint),
        }
    }

    /// `bind⁻¹ * R(euler) * bind`: the source rotation expressed in the
    /// target's bind frame.
    pub fn target_rotation(&self, euler_degrees: Vec3, bind_rotation: Quat) -> Quat {
        let raw = self.config.rotation.to_quat(euler_degrees);
        (bind_rotation.inverse() * raw * bind_rotation).normalize()
    }

    /// Writes frame `frame_index` into every bound node. The cursor is not
    /// touched. Returns `false` if the frame does not exist.
    pub fn apply_frame<S>(
        &self,
        buffer: &MotionBuffer,
        frame_index: usize,
        rig: &Rig<S::Node>,
        skeleton: &mut S,
        elapsed: f32,
    ) -> bool
    where
        S: TargetSkeleton + ?Sized,
    {
        let Some(frame) = buffer.frame(frame_index) else {
            log::warn!(
                "frame {frame_index} out of range (frame count {})",
                buffer.frame_count()
            );
            return false;
        };

        let weight = self.config.smoothing_weight(elapsed);
        let mut applied = 0usize;
        let mut without_bind = Vec::new();
        for joint in buffer.joints() {
            match self.apply_joint(buffer, &frame, &joint.name, rig, skeleton, weight) {
                JointOutcome::Applied => applied += 1,
                JointOutcome::NoBindRotation => {
                    applied += 1;
                    without_bind.push(clean_name(&joint.name));
                }
                JointOutcome::Skipped => {}
            }
        }

        if !without_bind.is_empty() {
            log::warn!(
                "no bind rotation for {} joint(s), using identity: {}",
                without_bind.len(),
                without_bind.join(", ")
            );
        }
        log::trace!("frame {frame_index}: {applied} joints retargeted");
        true
    }

    /// Applies the frame under the buffer's cursor and advances it.
    pub fn step<S>(
        &self,
        buffer: &mut MotionBuffer,
        rig: &Rig<S::Node>,
        skeleton: &mut S,
        elapsed: f32,
    ) -> Step
    where
        S: TargetSkeleton + ?Sized,
    {
        if buffer.is_empty() {
            log::warn!("no motion data to apply");
            return Step::Finished;
        }
        let index = buffer.current_frame();
        if index >= buffer.frame_count() {
            log::debug!("motion finished after {index} frames");
            return Step::Finished;
        }
        self.apply_frame(buffer, index, rig, skeleton, elapsed);
        buffer.advance();
        Step::Applied(index)
    }

    fn apply_joint<S>(
        &self,
        buffer: &MotionBuffer,
        frame: &FrameView<'_>,
        joint_name: &str,
        rig: &Rig<S::Node>,
        skeleton: &mut S,
        weight: f32,
    ) -> JointOutcome
    where
        S: TargetSkeleton + ?Sized,
    {
        let clean = clean_name(joint_name);
        let Some(node) = rig.bindings.get(clean) else {
            log::trace!("joint '{clean}' has no target node");
            return JointOutcome::Skipped;
        };

        // Motion data is keyed by the raw joint name, so keep its namespace.
        let namespace = &joint_name[..joint_name.len() - clean.len()];
        let source = self.source_joint(clean);
        let source_name = format!("{namespace}{source}");
        let (Some(source_joint), Some(values)) =
            (buffer.joint(&source_name), frame.channels(&source_name))
        else {
            log::trace!("no motion data for '{source_name}' (driving '{clean}')");
            return JointOutcome::Skipped;
        };

        let (position, euler) = if source_joint.has_position() {
            (
                Some(Vec3::from_slice(&values[0..3])),
                Vec3::from_slice(&values[3..6]),
            )
        } else if values.len() >= 3 {
            (None, Vec3::from_slice(&values[0..3]))
        } else {
            log::trace!("joint '{source_name}' has too few channels to drive '{clean}'");
            return JointOutcome::Skipped;
        };

        if let Some(mut raw) = position {
            if self.config.mirror && self.config.mirror_markers.is_sided(clean) {
                raw.x = -raw.x;
            }
            let current = skeleton.local_position(node);
            let offset = source_joint.offset;
            // Y is left to the target so its own vertical placement survives.
            let candidate = Vec3::new(
                raw.x * self.config.scale + offset.x,
                current.y,
                raw.z * self.config.scale + offset.z,
            );
            skeleton.set_local_position(node, current.lerp(candidate, weight));
        }

        let (bind_rotation, outcome) = self.bind_rotation(rig, clean, skeleton.name(node));
        let target = self.target_rotation(euler, bind_rotation);
        let current = skeleton.local_rotation(node);
        skeleton.set_local_rotation(node, current.slerp(target, weight).normalize());
        outcome
    }

    fn bind_rotation<N: Copy + Eq + Hash>(
        &self,
        rig: &Rig<N>,
        clean: &str,
        node_name: &str,
    ) -> (Quat, JointOutcome) {
        let key = format!("{}{clean}", self.config.bone_prefix);
        if let Some(rotation) = rig.bind_pose.rotation(&key) {
            return (rotation, JointOutcome::Applied);
        }
        match rig.bind_pose.rotation(node_name) {
            Some(rotation) => (rotation, JointOutcome::Applied),
            None => (Quat::IDENTITY, JointOutcome::NoBindRotation),
        }
    }
}
