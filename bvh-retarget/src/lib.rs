//! BVH motion-capture parsing and pose retargeting.
//!
//! The crate is scene-graph agnostic: hosts implement [`TargetSkeleton`] for
//! their node type, capture a [`Rig`] once, then drive
//! [`PoseRetargeter::step`] from their own clock.

#![forbid(unsafe_code)]

mod bind_pose;
mod binding;
mod config;
mod error;
mod motion;
mod parser;
mod rest_pose;
mod retarget;
mod rotation;
mod target;

pub use bind_pose::*;
pub use binding::*;
pub use config::*;
pub use error::*;
pub use motion::*;
pub use parser::{ParseOptions, ParserState, Token, parse_lines, tokenize_line};
pub use rest_pose::*;
pub use retarget::*;
pub use rotation::*;
pub use target::{Node, NodeId, NodeTree, TargetSkeleton};

#[cfg(test)]
mod test_support;


#[cfg(test)]
mod binding_tests;
