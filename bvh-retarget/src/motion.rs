use crate::Error;
use crate::parser::{ParseOptions, parse_with_options};
use glam::Vec3;
use std::collections::HashMap;
use std::str::FromStr;

/// A joint declared by `ROOT` or `JOINT` in the hierarchy section.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub name: String,
    pub parent: Option<usize>,
    pub offset: Vec3,
    pub channel_count: usize,
    pub channel_names: Vec<String>,
    /// Offset of the terminating `End Site`, if the joint has one.
    pub end_site: Option<Vec3>,
    pub(crate) channel_start: usize,
}

impl Joint {
    pub(crate) fn new(name: String, parent: Option<usize>) -> Self {
        Self {
            name,
            parent,
            offset: Vec3::ZERO,
            channel_count: 0,
            channel_names: Vec::new(),
            end_site: None,
            channel_start: 0,
        }
    }

    /// Index of this joint's first value inside a motion row.
    pub fn channel_start(&self) -> usize {
        self.channel_start
    }

    pub fn has_position(&self) -> bool {
        self.channel_count == 6
    }
}

/// Parsed hierarchy and motion samples, plus the playback cursor.
///
/// The joint list is the layout key for every frame: a frame stores the values
/// of each joint back to back, in joint order, `channel_count` values each.
#[derive(Clone, Debug, Default)]
pub struct MotionBuffer {
    joints: Vec<Joint>,
    joint_index: HashMap<String, usize>,
    channels_per_frame: usize,
    frames: Vec<Vec<f32>>,
    declared_frames: usize,
    frame_time: f32,
    playable: usize,
    cursor: usize,
}

impl MotionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        parse_with_options(input.lines(), ParseOptions::default())
    }

    pub fn parse_with(input: &str, options: ParseOptions) -> Result<Self, Error> {
        parse_with_options(input.lines(), options)
    }

    /// Replaces the whole buffer with the result of parsing `input`.
    ///
    /// On failure the current contents are left untouched.
    pub fn reload(&mut self, input: &str) -> Result<(), Error> {
        self.reload_with(input, ParseOptions::default())
    }

    pub fn reload_with(&mut self, input: &str, options: ParseOptions) -> Result<(), Error> {
        let parsed = Self::parse_with(input, options)?;
        *self = parsed;
        Ok(())
    }

    /// Drops all joints and frames and resets the cursor.
    pub fn clear(&mut self) {
        log::debug!("clearing motion data");
        *self = Self::default();
    }

    pub(crate) fn from_parts(
        joints: Vec<Joint>,
        frames: Vec<Vec<f32>>,
        declared_frames: Option<usize>,
        frame_time: f32,
    ) -> Self {
        let joint_index = joints
            .iter()
            .enumerate()
            .map(|(i, joint)| (joint.name.clone(), i))
            .collect();
        let channels_per_frame = joints.iter().map(|j| j.channel_count).sum();

        let declared = declared_frames.unwrap_or(frames.len());
        if declared != frames.len() {
            log::warn!(
                "header declares {declared} frames but {} motion rows were parsed",
                frames.len()
            );
        }

        let mut buffer = Self {
            joints,
            joint_index,
            channels_per_frame,
            frames,
            declared_frames: declared,
            frame_time,
            playable: 0,
            cursor: 0,
        };
        buffer.playable = buffer.available_frames();
        buffer
    }

    fn available_frames(&self) -> usize {
        self.declared_frames.min(self.frames.len())
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joint_index.get(name).map(|&i| &self.joints[i])
    }

    pub fn joint_position(&self, name: &str) -> Option<usize> {
        self.joint_index.get(name).copied()
    }

    /// Joint names in depth-first declaration order.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(|j| j.name.as_str())
    }

    pub fn channels_per_frame(&self) -> usize {
        self.channels_per_frame
    }

    /// Number of frames available for playback.
    pub fn frame_count(&self) -> usize {
        self.playable
    }

    /// Number of motion rows actually parsed.
    pub fn parsed_frames(&self) -> usize {
        self.frames.len()
    }

    /// The `Frames:` value from the header.
    pub fn declared_frames(&self) -> usize {
        self.declared_frames
    }

    /// Seconds per frame from the `Frame Time:` header.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn duration(&self) -> f32 {
        self.frame_time * self.playable as f32
    }

    pub fn is_empty(&self) -> bool {
        self.playable == 0
    }

    pub fn frame(&self, index: usize) -> Option<FrameView<'_>> {
        if index >= self.playable {
            return None;
        }
        let values = self.frames.get(index)?;
        Some(FrameView {
            buffer: self,
            values,
        })
    }

    pub fn current_frame(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.playable
    }

    /// Moves the cursor to `frame`. Out-of-range requests are logged and ignored.
    pub fn seek(&mut self, frame: usize) -> bool {
        if frame < self.playable {
            self.cursor = frame;
            true
        } else {
            log::warn!(
                "frame index {frame} out of range (frame count {})",
                self.playable
            );
            false
        }
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn advance(&mut self) {
        if self.cursor < self.playable {
            self.cursor += 1;
        }
    }

    /// Restricts playback to the first `frames` frames.
    ///
    /// The window never extends past what was both declared and parsed.
    /// Returns the resulting frame count.
    pub fn limit_frames(&mut self, frames: usize) -> usize {
        self.playable = frames.min(self.available_frames());
        self.cursor = self.cursor.min(self.playable);
        self.playable
    }

    /// Restricts playback to `seconds` of motion, rounded to whole frames.
    pub fn limit_duration(&mut self, seconds: f32) -> Result<usize, Error> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(Error::InvalidValue {
                message: format!("playback duration must be a non-negative number, got {seconds}"),
            });
        }
        if !(self.frame_time.is_finite() && self.frame_time > 0.0) {
            return Err(Error::InvalidValue {
                message: format!("cannot convert a duration with frame time {}", self.frame_time),
            });
        }
        let frames = (seconds / self.frame_time).round() as usize;
        Ok(self.limit_frames(frames))
    }
}

impl FromStr for MotionBuffer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One frame of channel values, addressable by joint name.
#[derive(Copy, Clone, Debug)]
pub struct FrameView<'a> {
    buffer: &'a MotionBuffer,
    values: &'a [f32],
}

impl<'a> FrameView<'a> {
    /// All values of the row, in layout order.
    pub fn values(&self) -> &'a [f32] {
        self.values
    }

    pub fn channels(&self, joint: &str) -> Option<&'a [f32]> {
        let joint = self.buffer.joint(joint)?;
        self.channels_at(joint)
    }

    fn channels_at(&self, joint: &Joint) -> Option<&'a [f32]> {
        let start = joint.channel_start;
        self.values.get(start..start + joint.channel_count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a [f32])> + 'a {
        let values = self.values;
        let buffer = self.buffer;
        buffer.joints.iter().filter_map(move |joint| {
            let start = joint.channel_start;
            values
                .get(start..start + joint.channel_count)
                .map(|v| (joint.name.as_str(), v))
        })
    }
}
