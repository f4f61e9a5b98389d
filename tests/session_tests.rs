//! End-to-end session tests: startup files, frame loop and accumulation.

use std::fs;

use glam::Vec3;
use sdfedit::prelude::*;
use tempfile::TempDir;

const MATERIALS: &str = "\
3
0.8
0.8
0.8
1
0
0
0
0
0.9
0.1
0.1
1
0
0
0
0
1
1
1
1
5
5
5
0
";

fn write_startup(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let materials = dir.path().join("map.txt");
    let edits = dir.path().join("edits.json");
    fs::write(&materials, MATERIALS).expect("write materials");
    fs::write(
        &edits,
        r#"[
            { "shape": "plane", "material_id": 0 },
            { "translation": [0, 1, 0], "shape": "box", "blend": "smooth_union", "material_id": 1 },
            { "translation": [0, 3, 0], "scale": [0.5, 0.5, 0.5], "material_id": 2 }
        ]"#,
    )
    .expect("write edits");
    (materials, edits)
}

fn hidden_settings() -> Settings {
    Settings { preview_mode: PreviewMode::Hidden, initial_capacity: 2, ..Default::default() }
}

#[test]
fn test_startup_scene_commits_in_order() {
    let dir = TempDir::new().expect("temp dir");
    let (materials, edits) = write_startup(&dir);

    let scene = StartupScene::load(Some(&materials), Some(&edits)).expect("load scene");
    let material_count = scene.material_count(1);
    assert_eq!(material_count, 3);

    let camera = OrbitCamera::default();
    let mut session = EditSession::new(&hidden_settings(), material_count, camera.pose()).expect("session");
    let ids = session.load_startup(&scene, material_count).expect("startup");
    assert_eq!(ids, vec![ObjectId(0), ObjectId(1), ObjectId(2)]);
    assert_eq!(session.stack().capacity(), 4);

    let shapes: Vec<Option<ShapeKind>> = session.stack().committed().iter().map(|p| p.shape()).collect();
    assert_eq!(shapes, vec![Some(ShapeKind::Plane), Some(ShapeKind::Box), Some(ShapeKind::Sphere)]);

    let mut buffer = HostSceneBuffer::new();
    let report = session.frame(FrameInput::from_camera(&camera, &[]), &mut buffer).expect("frame");
    assert_eq!(report.sync.count, 3);
    assert_eq!(buffer.records()[1].blend(), Some(BlendKind::SmoothUnion));
}

#[test]
fn test_startup_rejects_unknown_material() {
    let dir = TempDir::new().expect("temp dir");
    let (materials, _) = write_startup(&dir);
    let edits = dir.path().join("bad.json");
    fs::write(&edits, r#"[{ "material_id": 7 }]"#).expect("write edits");

    let scene = StartupScene::load(Some(&materials), Some(&edits)).expect("load scene");
    let camera = OrbitCamera::default();
    let mut session = EditSession::new(&hidden_settings(), 3, camera.pose()).expect("session");
    let err = session.load_startup(&scene, scene.material_count(3)).unwrap_err();
    assert!(matches!(err, Error::InvalidScene(_)), "{err}");
    assert!(session.stack().is_empty());
}

#[test]
fn test_missing_startup_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.txt");
    let err = StartupScene::load(Some(&missing), None).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(ref p) if p == &missing), "{err}");
    assert!(err.is_startup());
}

#[test]
fn test_accumulation_through_frames() {
    let mut camera = OrbitCamera::default();
    let mut session = EditSession::new(&hidden_settings(), 3, camera.pose()).expect("session");
    let mut buffer = HostSceneBuffer::new();

    let mut run = |session: &mut EditSession, camera: &OrbitCamera, events: &[EditCommand]| {
        session.frame(FrameInput::from_camera(camera, events), &mut buffer).expect("frame")
    };

    // Still camera, no edits: the counter climbs from 1.
    let mut last = 0;
    for _ in 0..10 {
        let r = run(&mut session, &camera, &[]);
        assert!(r.sample_index > last);
        last = r.sample_index;
    }
    assert_eq!(last, 11);

    // Camera move resets.
    camera.orbit(0.3, 0.0);
    camera.update(1.0);
    let r = run(&mut session, &camera, &[]);
    assert_eq!(r.accumulation, AccumulationOutcome::Reset(ResetReason::CameraMoved));
    assert_eq!(r.sample_index, 2);

    // Commit resets.
    let r = run(&mut session, &camera, &[]);
    assert_eq!(r.sample_index, 3);
    let r = run(&mut session, &camera, &[EditCommand::Commit]);
    assert_eq!(r.accumulation, AccumulationOutcome::Reset(ResetReason::SceneEdited));
    assert_eq!(r.sample_index, 2);

    // Forced reset (viewport resize).
    session.reset_accumulation();
    let r = run(&mut session, &camera, &[]);
    assert_eq!(r.accumulation, AccumulationOutcome::Reset(ResetReason::Forced));
    assert_eq!(r.sample_index, 2);
}

#[test]
fn test_commit_lands_in_front_of_camera() {
    let camera = OrbitCamera::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    let settings = Settings { brush_distance: 4.0, ..hidden_settings() };
    let mut session = EditSession::new(&settings, 3, camera.pose()).expect("session");
    let mut buffer = HostSceneBuffer::new();

    session
        .frame(FrameInput::from_camera(&camera, &[EditCommand::Commit]), &mut buffer)
        .expect("frame");

    let record = buffer.records()[0];
    let inverse = glam::Mat4::from_cols_array_2d(&record.inverse_transform);
    let center = inverse.inverse().transform_point3(Vec3::ZERO);
    assert!((center - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-3, "center at {center}");
}

#[test]
fn test_input_edits_reach_commit() {
    let camera = OrbitCamera::default();
    let mut session = EditSession::new(&hidden_settings(), 3, camera.pose()).expect("session");
    let mut buffer = HostSceneBuffer::new();

    let frames: [&[EditCommand]; 4] = [
        &[EditCommand::CycleShapeNext, EditCommand::CycleShapeNext],
        &[EditCommand::MaterialNext],
        &[EditCommand::CycleBlendNext],
        &[EditCommand::Commit],
    ];
    for events in frames {
        session.frame(FrameInput::from_camera(&camera, events), &mut buffer).expect("frame");
    }

    let p = session.stack().committed()[0];
    // Repeated key in one frame counts once.
    assert_eq!(p.shape(), Some(ShapeKind::Box));
    assert_eq!(p.material_id(), 1);
    assert_eq!(p.blend(), Some(BlendKind::Difference));
}
