use crate::MotionBuffer;
use glam::{Quat, Vec3};
use std::fmt::Debug;
use std::hash::Hash;

/// What the retargeter needs from a host scene graph.
pub trait TargetSkeleton {
    type Node: Copy + Eq + Hash + Debug;

    fn root(&self) -> Option<Self::Node>;
    fn name(&self, node: Self::Node) -> &str;
    fn children(&self, node: Self::Node) -> &[Self::Node];

    fn local_position(&self, node: Self::Node) -> Vec3;
    fn set_local_position(&mut self, node: Self::Node, position: Vec3);

    fn local_rotation(&self, node: Self::Node) -> Quat;
    fn set_local_rotation(&mut self, node: Self::Node, rotation: Quat);

    fn world_rotation(&self, node: Self::Node) -> Quat;
}

/// Pre-order depth-first walk from the root; children in declaration order.
pub(crate) fn depth_first<S: TargetSkeleton + ?Sized>(skeleton: &S) -> Vec<S::Node> {
    let mut out = Vec::new();
    let Some(root) = skeleton.root() else {
        return out;
    };
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(skeleton.children(node).iter().rev().copied());
    }
    out
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub local_position: Vec3,
    pub local_rotation: Quat,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A minimal index-based node tree implementing [`TargetSkeleton`].
#[derive(Clone, Debug, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. The first node added without a parent becomes the root.
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        local_position: Vec3,
        local_rotation: Quat,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            parent,
            children: Vec::new(),
            local_position,
            local_rotation,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Builds a tree with the same shape as the parsed hierarchy: offsets
    /// scaled by `scale`, identity rotations.
    pub fn from_motion(buffer: &MotionBuffer, scale: f32) -> Self {
        let mut tree = Self::new();
        for joint in buffer.joints() {
            tree.add_node(
                joint.parent.map(NodeId),
                joint.name.clone(),
                joint.offset * scale,
                Quat::IDENTITY,
            );
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        let node = &self.nodes[id.0];
        match node.parent {
            Some(parent) => {
                self.world_position(parent) + self.world_rotation(parent) * node.local_position
            }
            None => node.local_position,
        }
    }
}

impl TargetSkeleton for NodeTree {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.parent.is_none()).map(NodeId)
    }

    fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn local_position(&self, node: NodeId) -> Vec3 {
        self.nodes[node.0].local_position
    }

    fn set_local_position(&mut self, node: NodeId, position: Vec3) {
        self.nodes[node.0].local_position = position;
    }

    fn local_rotation(&self, node: NodeId) -> Quat {
        self.nodes[node.0].local_rotation
    }

    fn set_local_rotation(&mut self, node: NodeId, rotation: Quat) {
        self.nodes[node.0].local_rotation = rotation;
    }

    fn world_rotation(&self, node: NodeId) -> Quat {
        let mut rotation = self.nodes[node.0].local_rotation;
        let mut parent = self.nodes[node.0].parent;
        while let Some(p) = parent {
            let n = &self.nodes[p.0];
            rotation = n.local_rotation * rotation;
            parent = n.parent;
        }
        rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_rotation_accumulates_parents() {
        let mut tree = NodeTree::new();
        let root = tree.add_node(None, "root", Vec3::ZERO, Quat::from_rotation_y(0.5));
        let child = tree.add_node(
            Some(root),
            "child",
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_y(0.25),
        );
        let world = tree.world_rotation(child);
        assert!(world.dot(Quat::from_rotation_y(0.75)).abs() >= 1.0 - 1.0e-6);
    }

    #[test]
    fn world_position_rotates_child_offset() {
        let mut tree = NodeTree::new();
        let root = tree.add_node(
            None,
            "root",
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let tip = tree.add_node(Some(root), "tip", Vec3::X, Quat::IDENTITY);
        let p = tree.world_position(tip);
        assert!((p - Vec3::new(0.0, 1.0, -1.0)).length() <= 1.0e-5);
        assert_eq!(tree.find("tip"), Some(tip));
    }

    #[test]
    fn depth_first_visits_children_in_order() {
        let mut tree = NodeTree::new();
        let root = tree.add_node(None, "root", Vec3::ZERO, Quat::IDENTITY);
        let a = tree.add_node(Some(root), "a", Vec3::ZERO, Quat::IDENTITY);
        let b = tree.add_node(Some(root), "b", Vec3::ZERO, Quat::IDENTITY);
        let a1 = tree.add_node(Some(a), "a1", Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(depth_first(&tree), vec![root, a, a1, b]);
    }
}
