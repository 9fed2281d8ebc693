use bvh_retarget::{
    MotionBuffer, NodeTree, PoseRetargeter, RestPose, RetargetConfig, Rig, Step, TargetSkeleton,
};
use serde_json::json;
use std::path::PathBuf;

fn load_config(path: Option<&PathBuf>) -> RetargetConfig {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).expect("read config");
            RetargetConfig::from_json_str(&text).expect("parse config")
        }
        None => RetargetConfig::default(),
    }
}

fn main() {
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut config_path: Option<PathBuf> = None;
    let mut rest_only = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = args.get(i + 1).map(PathBuf::from);
                i += 2;
            }
            "--rest" => {
                rest_only = true;
                i += 1;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let Some(bvh_path) = positional.first().map(PathBuf::from) else {
        eprintln!("usage: pose_dump <file.bvh> [--config retarget.json] [--rest] [frames]");
        std::process::exit(2);
    };
    let max_frames: Option<usize> = positional.get(1).and_then(|s| s.parse().ok());

    let config = load_config(config_path.as_ref());
    let text = std::fs::read_to_string(&bvh_path).expect("read bvh");
    let mut buffer = MotionBuffer::parse(&text).expect("parse bvh");
    if let Some(max) = max_frames {
        buffer.limit_frames(max);
    }

    if rest_only {
        let rest = RestPose::from_motion(&buffer, config.scale);
        let joints: Vec<_> = rest
            .joints
            .iter()
            .map(|j| {
                json!({
                    "name": j.name,
                    "parent": j.parent,
                    "position": j.position.to_array(),
                    "endSite": j.end_site.map(|tip| tip.to_array()),
                })
            })
            .collect();
        let out = json!({ "joints": joints, "segments": rest.segments().len() });
        println!("{}", serde_json::to_string_pretty(&out).expect("serialize"));
        return;
    }

    // The parsed hierarchy doubles as the target when no host rig is around.
    let mut skeleton = NodeTree::from_motion(&buffer, config.scale);
    let rig = Rig::capture(&skeleton, &buffer);
    let retargeter = PoseRetargeter::try_new(config).expect("valid config");
    let frame_time = buffer.frame_time();

    let mut frames = Vec::new();
    while let Step::Applied(index) = retargeter.step(&mut buffer, &rig, &mut skeleton, frame_time)
    {
        let nodes: Vec<_> = skeleton
            .iter()
            .map(|(id, node)| {
                let rotation = skeleton.local_rotation(id);
                json!({
                    "name": node.name,
                    "position": node.local_position.to_array(),
                    "rotation": rotation.to_array(),
                })
            })
            .collect();
        frames.push(json!({ "frame": index, "nodes": nodes }));
    }

    let out = json!({
        "source": bvh_path.display().to_string(),
        "frameTime": frame_time,
        "frameCount": buffer.frame_count(),
        "unbound": rig.bindings.unbound(buffer.joint_names()),
        "frames": frames,
    });
    println!("{}", serde_json::to_string_pretty(&out).expect("serialize"));
}
