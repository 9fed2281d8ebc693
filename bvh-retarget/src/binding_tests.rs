use crate::test_support::{assert_rotation_approx, assert_vec_approx};
use crate::{BindPose, Bindings, NodeTree, TargetSkeleton, clean_name};
use glam::{Quat, Vec3};

fn namespaced_rig() -> NodeTree {
    let mut tree = NodeTree::new();
    let armature = tree.add_node(None, "Armature", Vec3::ZERO, Quat::from_rotation_x(0.5));
    let hips = tree.add_node(
        Some(armature),
        "mixamorig:Hips",
        Vec3::new(0.0, 1.0, 0.0),
        Quat::IDENTITY,
    );
    let spine = tree.add_node(
        Some(hips),
        "mixamorig:Spine",
        Vec3::new(0.0, 0.1, 0.0),
        Quat::from_rotation_y(0.25),
    );
    // A later node that cleans to the same name must not steal the binding.
    tree.add_node(Some(spine), "backup:Hips", Vec3::ZERO, Quat::IDENTITY);
    tree.add_node(Some(armature), "Camera", Vec3::ZERO, Quat::IDENTITY);
    tree
}

#[test]
fn clean_name_strips_namespace() {
    assert_eq!(clean_name("mixamorig:Hips"), "Hips");
    assert_eq!(clean_name("Hips"), "Hips");
    assert_eq!(clean_name("rig:mixamorig:LeftArm"), "LeftArm");
    assert_eq!(clean_name(":Head"), "Head");
}

#[test]
fn first_match_wins() {
    let tree = namespaced_rig();
    let bindings = Bindings::bind(&tree, ["Hips", "Spine"]);

    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings.get("Hips"), tree.find("mixamorig:Hips"));
    assert_eq!(bindings.get("Spine"), tree.find("mixamorig:Spine"));
    assert_ne!(bindings.get("Hips"), tree.find("backup:Hips"));
}

#[test]
fn unmatched_joints_and_nodes_are_tolerated() {
    let tree = namespaced_rig();
    let joints = ["Hips", "LeftArm", "Spine", "RightArm"];
    let bindings = Bindings::bind(&tree, joints);

    assert!(!bindings.contains("Camera"));
    assert!(!bindings.contains("Armature"));
    assert_eq!(bindings.unbound(joints), vec!["LeftArm", "RightArm"]);
}

#[test]
fn namespaced_joint_names_bind_by_clean_name() {
    let tree = namespaced_rig();
    let bindings = Bindings::bind(&tree, ["mocap:Hips"]);
    assert_eq!(bindings.get("Hips"), tree.find("mixamorig:Hips"));
}

#[test]
fn empty_tree_binds_nothing() {
    let tree = NodeTree::new();
    let bindings = Bindings::bind(&tree, ["Hips"]);
    assert!(bindings.is_empty());
    assert!(BindPose::capture(&tree).is_empty());
}

#[test]
fn bind_pose_uses_raw_names_and_world_rotation() {
    let tree = namespaced_rig();
    let pose = BindPose::capture(&tree);

    assert_eq!(pose.len(), 5);
    assert!(pose.rotation("Spine").is_none());

    let spine = tree.find("mixamorig:Spine").unwrap();
    assert_rotation_approx(
        pose.rotation("mixamorig:Spine").unwrap(),
        Quat::from_rotation_x(0.5) * Quat::from_rotation_y(0.25),
    );
    assert_rotation_approx(
        pose.rotation("mixamorig:Spine").unwrap(),
        tree.world_rotation(spine),
    );
    assert_vec_approx(
        pose.position("mixamorig:Spine").unwrap(),
        Vec3::new(0.0, 0.1, 0.0),
    );
}

#[test]
fn bind_pose_is_a_snapshot() {
    let mut tree = namespaced_rig();
    let pose = BindPose::capture(&tree);

    let hips = tree.find("mixamorig:Hips").unwrap();
    tree.set_local_rotation(hips, Quat::from_rotation_z(1.0));
    tree.set_local_position(hips, Vec3::splat(9.0));

    assert_rotation_approx(
        pose.rotation("mixamorig:Hips").unwrap(),
        Quat::from_rotation_x(0.5),
    );
    assert_vec_approx(
        pose.get("mixamorig:Hips").unwrap().local_position,
        Vec3::new(0.0, 1.0, 0.0),
    );
}
