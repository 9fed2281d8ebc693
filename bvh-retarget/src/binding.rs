use crate::target::{TargetSkeleton, depth_first};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Separator between a namespace prefix and the bone name, e.g. `mixamorig:Hips`.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Strips any namespace prefix, keeping the part after the last separator.
pub fn clean_name(name: &str) -> &str {
    match name.rsplit_once(NAMESPACE_SEPARATOR) {
        Some((_, rest)) => rest,
        None => name,
    }
}

/// Clean joint name → target node.
#[derive(Clone, Debug)]
pub struct Bindings<N> {
    nodes: HashMap<String, N>,
}

impl<N> Default for Bindings<N> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> Bindings<N> {
    /// Walks the target depth-first and binds each node whose clean name
    /// matches a joint. The first matching node wins; unmatched joints and
    /// nodes are left out.
    pub fn bind<'a, S, I>(skeleton: &S, joint_names: I) -> Self
    where
        S: TargetSkeleton<Node = N> + ?Sized,
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = joint_names.into_iter().map(clean_name).collect();
        let mut nodes = HashMap::new();

        for node in depth_first(skeleton) {
            let name = clean_name(skeleton.name(node));
            if wanted.contains(name) && !nodes.contains_key(name) {
                nodes.insert(name.to_string(), node);
            }
        }

        log::debug!(
            "bound {} of {} joints to the target skeleton",
            nodes.len(),
            wanted.len()
        );
        Self { nodes }
    }

    pub fn get(&self, clean_joint: &str) -> Option<N> {
        self.nodes.get(clean_joint).copied()
    }

    pub fn contains(&self, clean_joint: &str) -> bool {
        self.nodes.contains_key(clean_joint)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, N)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Joints from `joint_names` that have no target node.
    pub fn unbound<'a, I>(&self, joint_names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        joint_names
            .into_iter()
            .filter(|name| !self.contains(clean_name(name)))
            .collect()
    }
}
