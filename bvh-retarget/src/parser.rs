//! Line-oriented BVH parser.
//!
//! Each trimmed line is classified into a [`Token`] by [`tokenize_line`], and a
//! [`ParserState`] folds the tokens into a [`MotionBuffer`]. The state is a
//! plain value owned by one parse, so separate documents never share anything.

use crate::Error;
use crate::motion::{Joint, MotionBuffer};
use glam::Vec3;
use std::collections::HashMap;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseOptions {
    /// Reject any content that appears before the `HIERARCHY` keyword.
    pub strict: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    Blank,
    HierarchyMarker,
    MotionMarker,
    JointOpen { root: bool, name: &'a str },
    EndSite,
    Open,
    Close,
    Offset(Vec3),
    Channels { count: usize, names: Vec<&'a str> },
    FramesHeader(usize),
    FrameTimeHeader(f32),
    /// Anything else; a motion row once inside the `MOTION` section.
    Row(&'a str),
}

fn parse_number<T: std::str::FromStr>(token: &str, line: usize) -> Result<T, Error> {
    token.parse().map_err(|_| Error::NumericFormat {
        line,
        token: token.to_string(),
    })
}

/// Classifies one source line. `line` is only used for error reporting.
pub fn tokenize_line(raw: &str, line: usize) -> Result<Token<'_>, Error> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(Token::Blank);
    }
    if text == "HIERARCHY" {
        return Ok(Token::HierarchyMarker);
    }
    if text == "MOTION" {
        return Ok(Token::MotionMarker);
    }
    if text.starts_with('{') {
        return Ok(Token::Open);
    }
    if text.starts_with('}') {
        return Ok(Token::Close);
    }
    if let Some(rest) = text.strip_prefix("Frames:") {
        return parse_number(rest.trim(), line).map(Token::FramesHeader);
    }
    if let Some(rest) = text.strip_prefix("Frame Time:") {
        return parse_number(rest.trim(), line).map(Token::FrameTimeHeader);
    }

    let mut words = text.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(Token::Blank);
    };
    match keyword {
        "ROOT" | "JOINT" => {
            let name = words.next().ok_or_else(|| Error::Malformed {
                line,
                message: format!("{keyword} without a joint name"),
            })?;
            Ok(Token::JointOpen {
                root: keyword == "ROOT",
                name,
            })
        }
        "End" if matches!(words.next(), Some("Site" | "site")) => Ok(Token::EndSite),
        "OFFSET" => {
            let mut axes = [0.0f32; 3];
            for axis in axes.iter_mut() {
                let token = words.next().ok_or_else(|| Error::Malformed {
                    line,
                    message: "OFFSET expects three values".to_string(),
                })?;
                *axis = parse_number(token, line)?;
            }
            Ok(Token::Offset(Vec3::from_array(axes)))
        }
        "CHANNELS" => {
            let count = words.next().ok_or_else(|| Error::Malformed {
                line,
                message: "CHANNELS without a channel count".to_string(),
            })?;
            let count = parse_number(count, line)?;
            Ok(Token::Channels {
                count,
                names: words.collect(),
            })
        }
        _ => Ok(Token::Row(text)),
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
enum Section {
    #[default]
    Preamble,
    Hierarchy,
    Motion,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum StackEntry {
    Joint(usize),
    /// `<owner>_EndSite`; its offset belongs to the owner's end site.
    EndSite(usize),
}

/// In-progress parse.
#[derive(Debug, Default)]
pub struct ParserState {
    options: ParseOptions,
    section: Section,
    stack: Vec<StackEntry>,
    joints: Vec<Joint>,
    joint_index: HashMap<String, usize>,
    channels_declared: Vec<bool>,
    channels_per_frame: usize,
    missing_channels: Option<usize>,
    frames: Vec<Vec<f32>>,
    declared_frames: Option<usize>,
    frame_time: f32,
    last_line: usize,
}

impl ParserState {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn in_motion(&self) -> bool {
        self.section == Section::Motion
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Feeds one token. `line` is 1-based.
    pub fn apply(&mut self, line: usize, token: Token<'_>) -> Result<(), Error> {
        self.last_line = line;
        match self.section {
            Section::Preamble => match token {
                Token::Blank => Ok(()),
                Token::HierarchyMarker => {
                    self.section = Section::Hierarchy;
                    Ok(())
                }
                Token::MotionMarker => self.enter_motion(line),
                other if self.options.strict => Err(Error::UnknownSection {
                    line,
                    content: describe(&other),
                }),
                other => self.apply_hierarchy(line, other),
            },
            Section::Hierarchy => match token {
                Token::MotionMarker => self.enter_motion(line),
                other => self.apply_hierarchy(line, other),
            },
            Section::Motion => self.apply_motion(line, token),
        }
    }

    fn apply_hierarchy(&mut self, line: usize, token: Token<'_>) -> Result<(), Error> {
        match token {
            Token::JointOpen { name, .. } => {
                if self.joint_index.contains_key(name) {
                    return Err(Error::DuplicateJoint {
                        line,
                        name: name.to_string(),
                    });
                }
                let parent = self.stack.iter().rev().find_map(|entry| match entry {
                    StackEntry::Joint(index) => Some(*index),
                    StackEntry::EndSite(_) => None,
                });
                let index = self.joints.len();
                self.joints.push(Joint::new(name.to_string(), parent));
                self.joint_index.insert(name.to_string(), index);
                self.channels_declared.push(false);
                self.stack.push(StackEntry::Joint(index));
            }
            Token::EndSite => {
                let owner = self.top_joint(line, "End Site")?;
                self.stack.push(StackEntry::EndSite(owner));
            }
            Token::Offset(offset) => match self.stack.last() {
                Some(StackEntry::Joint(index)) => self.joints[*index].offset = offset,
                Some(StackEntry::EndSite(owner)) => self.joints[*owner].end_site = Some(offset),
                None => {
                    return Err(Error::HierarchyImbalance {
                        line,
                        message: "OFFSET outside of any joint".to_string(),
                    });
                }
            },
            Token::Channels { count, names } => {
                let index = self.top_joint(line, "CHANNELS")?;
                let joint = &mut self.joints[index];
                joint.channel_count = count;
                joint.channel_names = names.into_iter().map(str::to_string).collect();
                self.channels_declared[index] = true;
            }
            Token::Close => {
                if self.stack.pop().is_none() {
                    return Err(Error::HierarchyImbalance {
                        line,
                        message: "closing brace without an open joint".to_string(),
                    });
                }
            }
            Token::HierarchyMarker => self.section = Section::Hierarchy,
            // Braces open implicitly with the declaration; stray header and
            // row lines carry nothing in this section.
            Token::Open
            | Token::Blank
            | Token::FramesHeader(_)
            | Token::FrameTimeHeader(_)
            | Token::Row(_)
            | Token::MotionMarker => {}
        }
        Ok(())
    }

    fn top_joint(&self, line: usize, keyword: &str) -> Result<usize, Error> {
        match self.stack.last() {
            Some(StackEntry::Joint(index)) => Ok(*index),
            Some(StackEntry::EndSite(owner)) => Err(Error::Malformed {
                line,
                message: format!(
                    "{keyword} inside the end site of '{}'",
                    self.joints[*owner].name
                ),
            }),
            None => Err(Error::HierarchyImbalance {
                line,
                message: format!("{keyword} outside of any joint"),
            }),
        }
    }

    fn enter_motion(&mut self, line: usize) -> Result<(), Error> {
        if let Some(open) = self.open_joint_name() {
            return Err(Error::HierarchyImbalance {
                line,
                message: format!("joint '{open}' is not closed before MOTION"),
            });
        }

        let mut start = 0usize;
        for joint in &mut self.joints {
            joint.channel_start = start;
            start += joint.channel_count;
        }
        self.channels_per_frame = start;
        self.missing_channels = self.channels_declared.iter().position(|declared| !declared);
        self.section = Section::Motion;
        Ok(())
    }

    fn apply_motion(&mut self, line: usize, token: Token<'_>) -> Result<(), Error> {
        match token {
            Token::Blank | Token::MotionMarker => Ok(()),
            Token::FramesHeader(frames) => {
                self.declared_frames = Some(frames);
                Ok(())
            }
            Token::FrameTimeHeader(seconds) => {
                self.frame_time = seconds;
                Ok(())
            }
            Token::Row(text) => self.push_row(line, text),
            other => Err(Error::Malformed {
                line,
                message: format!("unexpected {} in MOTION section", describe(&other)),
            }),
        }
    }

    fn push_row(&mut self, line: usize, text: &str) -> Result<(), Error> {
        if let Some(index) = self.missing_channels {
            return Err(Error::MissingChannels {
                line,
                joint: self.joints[index].name.clone(),
            });
        }

        let values = text
            .split_whitespace()
            .map(|token| parse_number::<f32>(token, line))
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != self.channels_per_frame {
            return Err(Error::ChannelCountMismatch {
                line,
                expected: self.channels_per_frame,
                found: values.len(),
            });
        }

        self.frames.push(values);
        Ok(())
    }

    fn open_joint_name(&self) -> Option<&str> {
        self.stack.last().map(|entry| match entry {
            StackEntry::Joint(index) | StackEntry::EndSite(index) => self.joints[*index].name.as_str(),
        })
    }

    /// Completes the parse, checking that every joint was closed.
    pub fn finish(self) -> Result<MotionBuffer, Error> {
        if let Some(open) = self.open_joint_name() {
            return Err(Error::HierarchyImbalance {
                line: self.last_line,
                message: format!("joint '{open}' is never closed"),
            });
        }

        let mut joints = self.joints;
        if self.section != Section::Motion {
            // No MOTION section: still hand out a consistent layout.
            let mut start = 0usize;
            for joint in &mut joints {
                joint.channel_start = start;
                start += joint.channel_count;
            }
        }

        log::debug!(
            "parsed {} joints, {} motion rows",
            joints.len(),
            self.frames.len()
        );
        Ok(MotionBuffer::from_parts(
            joints,
            self.frames,
            self.declared_frames,
            self.frame_time,
        ))
    }
}

fn describe(token: &Token<'_>) -> String {
    match token {
        Token::Blank => "blank line".to_string(),
        Token::HierarchyMarker => "HIERARCHY".to_string(),
        Token::MotionMarker => "MOTION".to_string(),
        Token::JointOpen { root: true, name } => format!("ROOT {name}"),
        Token::JointOpen { root: false, name } => format!("JOINT {name}"),
        Token::EndSite => "End Site".to_string(),
        Token::Open => "{".to_string(),
        Token::Close => "}".to_string(),
        Token::Offset(_) => "OFFSET".to_string(),
        Token::Channels { .. } => "CHANNELS".to_string(),
        Token::FramesHeader(_) => "Frames:".to_string(),
        Token::FrameTimeHeader(_) => "Frame Time:".to_string(),
        Token::Row(text) => (*text).to_string(),
    }
}

/// Parses pre-split lines, e.g. from `BufRead::lines`.
pub fn parse_lines<'a, I>(lines: I, options: ParseOptions) -> Result<MotionBuffer, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    parse_with_options(lines, options)
}

pub(crate) fn parse_with_options<'a, I>(lines: I, options: ParseOptions) -> Result<MotionBuffer, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut state = ParserState::new(options);
    for (i, raw) in lines.into_iter().enumerate() {
        let line = i + 1;
        let token = tokenize_line(raw, line)?;
        state.apply(line, token)?;
    }
    state.finish()
}
