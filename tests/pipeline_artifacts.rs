use std::fs;
use std::path::Path;

use image::RgbImage;
use serde_json::Value;
use tempfile::TempDir;

use pose_extract::config::ExtractConfig;
use pose_extract::detect::backends::StubPoseBackend;
use pose_extract::detect::{Keypoint, Landmark, PersonDetection};
use pose_extract::pipeline::Pipeline;

fn write_png(path: &Path, width: u32, height: u32) {
    RgbImage::new(width, height)
        .save(path)
        .expect("write png fixture");
}

/// Seventeen keypoints spanning (100,50)-(700,550), all at the given score.
fn full_person(score: f32) -> PersonDetection {
    let keypoints = (0..Landmark::COUNT)
        .map(|i| {
            let t = i as f32 / (Landmark::COUNT - 1) as f32;
            Keypoint::new(
                Landmark::from_index(i).expect("canonical index"),
                100.0 + 600.0 * t,
                50.0 + 500.0 * t,
                score,
            )
        })
        .collect();
    PersonDetection::new(keypoints, score)
}

/// A person whose valid keypoints cluster around the given x column.
fn person_around_x(x: f32, score: f32) -> PersonDetection {
    let keypoints = vec![
        Keypoint::new(Landmark::Nose, x - 10.0, 80.0, score),
        Keypoint::new(Landmark::LeftShoulder, x + 10.0, 160.0, score),
        Keypoint::new(Landmark::LeftHip, x, 300.0, score),
    ];
    PersonDetection::new(keypoints, score)
}

fn run_pipeline(root: &Path, people: Vec<PersonDetection>, overwrite: bool) {
    let mut config = ExtractConfig::new(root.to_path_buf());
    config.overwrite = overwrite;
    config.min_confidence = 0.3;
    let backend = Box::new(StubPoseBackend::with_people(people));
    let mut pipeline = Pipeline::new(config, backend);
    let summary = pipeline.run().expect("pipeline run");
    assert_eq!(summary.failed, 0, "no image should fail");
}

fn read_json(path: &Path) -> Value {
    let raw = fs::read_to_string(path).expect("read artifact");
    serde_json::from_str(&raw).expect("parse artifact")
}

#[test]
fn detected_person_produces_both_documents() {
    let dir = TempDir::new().expect("tempdir");
    let image_path = dir.path().join("shot.png");
    write_png(&image_path, 800, 600);

    run_pipeline(dir.path(), vec![full_person(0.9)], false);

    let single = read_json(&dir.path().join("shot.json"));
    let multi = read_json(&dir.path().join("shot.multi.json"));

    assert_eq!(single["version"], "1.1");
    assert_eq!(single["source_size"]["w"], 800);
    assert_eq!(single["source_size"]["h"], 600);
    assert_eq!(single["source_size"], multi["source_size"]);

    assert_eq!(single["bbox_px"]["x"], 100);
    assert_eq!(single["bbox_px"]["y"], 50);
    assert_eq!(single["bbox_px"]["w"], 600);
    assert_eq!(single["bbox_px"]["h"], 500);

    let bbox = &single["bbox"];
    assert!((bbox["x"].as_f64().unwrap() - 0.125).abs() < 1e-9);
    assert!((bbox["y"].as_f64().unwrap() - 0.0833).abs() < 1e-3);
    assert!((bbox["w"].as_f64().unwrap() - 0.75).abs() < 1e-9);
    assert!((bbox["h"].as_f64().unwrap() - 0.8333).abs() < 1e-3);

    assert!((single["score"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert_eq!(single["slot"], 0);
    assert_eq!(single["keypoints_px"].as_array().unwrap().len(), 17);
    assert_eq!(single["keypoints"].as_array().unwrap().len(), 17);

    // Normalized keypoints stay within the unit square.
    for kp in single["keypoints"].as_array().unwrap() {
        let x = kp["x"].as_f64().unwrap();
        let y = kp["y"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&x));
        assert!((0.0..=1.0).contains(&y));
    }
}

#[test]
fn single_document_equals_top_ranked_multi_entry() {
    let dir = TempDir::new().expect("tempdir");
    let image_path = dir.path().join("pair.png");
    write_png(&image_path, 640, 480);

    // The stronger person is emitted second; ranking must not care.
    let weak = person_around_x(500.0, 0.5);
    let strong = full_person(0.95);
    run_pipeline(dir.path(), vec![weak, strong], false);

    let single = read_json(&dir.path().join("pair.json"));
    let multi = read_json(&dir.path().join("pair.multi.json"));

    let people = multi["people"].as_array().expect("people array");
    assert_eq!(people.len(), 2);

    let top = &people[0];
    for key in ["slot", "bbox_px", "bbox", "keypoints_px", "keypoints", "score"] {
        assert_eq!(single[key], top[key], "single/multi mismatch on {key}");
    }

    // Rank order: the 17-point person outranks the 3-point person.
    assert_eq!(top["keypoints_px"].as_array().unwrap().len(), 17);
}

#[test]
fn slots_follow_mean_x_not_emission_order() {
    let dir = TempDir::new().expect("tempdir");
    let image_path = dir.path().join("duo.png");
    write_png(&image_path, 640, 480);

    // Right-hand person emitted first.
    let right = person_around_x(500.0, 0.9);
    let left = person_around_x(100.0, 0.6);
    run_pipeline(dir.path(), vec![right, left], false);

    let multi = read_json(&dir.path().join("duo.multi.json"));
    for person in multi["people"].as_array().unwrap() {
        let x = person["bbox_px"]["x"].as_u64().unwrap();
        let slot = person["slot"].as_u64().unwrap();
        if x < 300 {
            assert_eq!(slot, 0, "left person takes slot 0");
        } else {
            assert_eq!(slot, 1, "right person takes slot 1");
        }
    }
}

#[test]
fn rerun_without_overwrite_performs_no_writes() {
    let dir = TempDir::new().expect("tempdir");
    let image_path = dir.path().join("once.png");
    write_png(&image_path, 320, 240);

    run_pipeline(dir.path(), vec![full_person(0.9)], false);

    // Replace both artifacts with sentinels; a second run with overwrite
    // disabled must leave them untouched.
    let single_path = dir.path().join("once.json");
    let multi_path = dir.path().join("once.multi.json");
    fs::write(&single_path, "{\"sentinel\":1}").expect("plant sentinel");
    fs::write(&multi_path, "{\"sentinel\":2}").expect("plant sentinel");

    run_pipeline(dir.path(), vec![full_person(0.9)], false);
    assert_eq!(read_json(&single_path)["sentinel"], 1);
    assert_eq!(read_json(&multi_path)["sentinel"], 2);

    // With overwrite enabled the sentinels are replaced.
    run_pipeline(dir.path(), vec![full_person(0.9)], true);
    assert_eq!(read_json(&single_path)["version"], "1.1");
    assert_eq!(read_json(&multi_path)["version"], "1.1");
}

#[test]
fn discovery_is_sorted_and_pattern_filtered() {
    let dir = TempDir::new().expect("tempdir");
    write_png(&dir.path().join("b.png"), 16, 16);
    write_png(&dir.path().join("a.png"), 16, 16);
    fs::write(dir.path().join("notes.txt"), "not an image").expect("write");

    let mut config = ExtractConfig::new(dir.path().to_path_buf());
    config.patterns = vec!["*.png".to_string()];
    let backend = Box::new(StubPoseBackend::with_people(vec![full_person(0.9)]));
    let pipeline = Pipeline::new(config, backend);

    let images = pipeline.discover_images().expect("discover");
    let names: Vec<_> = images
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.png", "b.png"]);
}
