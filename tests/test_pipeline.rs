use bvr_postprocess::common::{BvrDetection, BvrRect, ModelArchitecture, ModelGeometry};
use bvr_postprocess::data::{ConfigPost, RawOutputTensor, ViewLayout, DEFAULT_CONFIDENCE, DEFAULT_IOU};
use bvr_postprocess::detection_runners::DetectionPipeline;
use bvr_postprocess::{run_detection, PostprocessError};
use ndarray::{Array3, ArrayD};

fn v8_tensor(boxes: &[([f32; 4], usize, f32)], classes: usize, n: usize) -> ArrayD<f32> {
    let mut arr = Array3::<f32>::zeros((1, 4 + classes, n));
    for (i, (geometry, class_index, score)) in boxes.iter().enumerate() {
        for (k, &v) in geometry.iter().enumerate() {
            arr[[0, k, i]] = v;
        }
        arr[[0, 4 + class_index, i]] = *score;
    }
    arr.into_dyn()
}

fn run(pipeline: &DetectionPipeline, arr: &ArrayD<f32>, geometry: &ModelGeometry, original: (u32, u32), threshold: f32) -> Result<Vec<BvrDetection>, PostprocessError> {
    let view = arr.view();
    let layout = ViewLayout::of(&view)?;
    let tensor = RawOutputTensor::from_view(&view, &layout)?;
    pipeline.run(&tensor, geometry, original, threshold)
}

#[test]
fn scenario_a_end_to_end() {
    let arr = v8_tensor(&[([10., 10., 4., 4.], 1, 0.9)], 2, 4);
    let geometry = ModelGeometry::new(50, 50, ModelArchitecture::V8OrLater, 2);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();

    let detections = run(&pipeline, &arr, &geometry, (100, 100), 0.5).unwrap();
    assert_eq!(detections, vec![BvrDetection::new(1, BvrRect::new(16, 16, 8, 8), None, 0.9)]);
}

#[test]
fn duplicates_collapse_and_labels_attach() {
    let arr = v8_tensor(
        &[
            ([100., 100., 40., 40.], 0, 0.6),
            ([102., 100., 40., 40.], 0, 0.9),
            ([100., 100., 40., 40.], 1, 0.7),
            ([300., 300., 20., 20.], 0, 0.5),
        ],
        2,
        8,
    );
    let geometry = ModelGeometry::new(640, 640, ModelArchitecture::V8OrLater, 2).with_names(&["person", "car"]);
    let pipeline = DetectionPipeline::new(ConfigPost::new().with_max_workers(2)).unwrap();

    let detections = pipeline_detect(&pipeline, &arr, &geometry, (1280, 1280));
    let summary: Vec<(String, f32, BvrRect)> = detections.iter().map(|d| (d.get_label(), d.confidence, d.bbox)).collect();
    assert_eq!(
        summary,
        vec![
            ("person".to_string(), 0.9, BvrRect::new(164, 160, 80, 80)),
            ("car".to_string(), 0.7, BvrRect::new(160, 160, 80, 80)),
            ("person".to_string(), 0.5, BvrRect::new(580, 580, 40, 40)),
        ]
    );
}

fn pipeline_detect(pipeline: &DetectionPipeline, arr: &ArrayD<f32>, geometry: &ModelGeometry, original: (u32, u32)) -> Vec<BvrDetection> {
    let view = arr.view();
    let layout = ViewLayout::of(&view).unwrap();
    let tensor = RawOutputTensor::from_view(&view, &layout).unwrap();
    pipeline.detect(&tensor, geometry, original).unwrap()
}

#[test]
fn v5_pipeline_maps_boxes_back() {
    let mut arr = Array3::<f32>::zeros((1, 2, 7));
    arr.slice_mut(ndarray::s![0, 0, ..]).assign(&ndarray::arr1(&[320., 320., 64., 32., 0.9, 0.1, 0.8]));
    arr.slice_mut(ndarray::s![0, 1, ..]).assign(&ndarray::arr1(&[100., 100., 10., 10., 0.3, 0.9, 0.9]));
    let arr = arr.into_dyn();

    let geometry = ModelGeometry::new(640, 640, ModelArchitecture::V5, 2);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();
    let detections = run(&pipeline, &arr, &geometry, (1280, 640), DEFAULT_CONFIDENCE).unwrap();

    assert_eq!(detections.len(), 1);
    let d = &detections[0];
    assert_eq!(d.class_index, 1);
    assert!((d.confidence - 0.72).abs() < 1e-6);
    assert_eq!(d.bbox, BvrRect::new(576, 304, 128, 32));
}

#[test]
fn nothing_found_is_not_an_error() {
    let arr = v8_tensor(&[([10., 10., 4., 4.], 1, 0.2)], 2, 4);
    let geometry = ModelGeometry::new(640, 640, ModelArchitecture::V8OrLater, 2);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();

    assert!(run(&pipeline, &arr, &geometry, (640, 640), 0.35).unwrap().is_empty());
}

#[test]
fn zero_model_size_filters_detections() {
    let arr = v8_tensor(&[([10., 10., 4., 4.], 1, 0.9)], 2, 4);
    let geometry = ModelGeometry::new(0, 0, ModelArchitecture::V8OrLater, 2);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();

    assert!(run(&pipeline, &arr, &geometry, (640, 480), 0.35).unwrap().is_empty());
}

#[test]
fn negative_box_size_is_dropped() {
    let arr = ndarray::Array::from_shape_vec((1, 5, 1), vec![10., 10., -4., 4., 0.9]).unwrap().into_dyn();
    let geometry = ModelGeometry::new(50, 50, ModelArchitecture::V8OrLater, 1);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();

    assert!(run(&pipeline, &arr, &geometry, (100, 100), 0.5).unwrap().is_empty());
}

#[test]
fn mismatched_names_still_detect() {
    let arr = v8_tensor(&[([10., 10., 4., 4.], 1, 0.9), ([40., 40., 4., 4.], 0, 0.8)], 2, 4);
    let geometry = ModelGeometry::new(50, 50, ModelArchitecture::V8OrLater, 2).with_names(&["cat"]);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();

    let detections = run(&pipeline, &arr, &geometry, (100, 100), 0.5).unwrap();
    let labels: Vec<Option<&str>> = detections.iter().map(|d| d.label.as_deref()).collect();
    assert_eq!(labels, vec![None, Some("cat")]);
}

#[test]
fn profiling_keeps_results() {
    let arr = v8_tensor(&[([10., 10., 4., 4.], 1, 0.9)], 2, 4);
    let geometry = ModelGeometry::new(50, 50, ModelArchitecture::V8OrLater, 2);
    let config = ConfigPost::new().with_confidence(0.5).with_profile(true);
    assert!(config.profile);

    let pipeline = DetectionPipeline::new(config).unwrap();
    let detections = pipeline_detect(&pipeline, &arr, &geometry, (100, 100));
    assert_eq!(detections, vec![BvrDetection::new(1, BvrRect::new(16, 16, 8, 8), None, 0.9)]);
}

#[test]
fn every_detection_meets_the_threshold() {
    let arr = v8_tensor(
        &[
            ([10., 10., 4., 4.], 0, 0.36),
            ([50., 50., 4., 4.], 1, 0.34),
            ([90., 90., 4., 4.], 0, 0.99),
        ],
        2,
        3,
    );
    let geometry = ModelGeometry::new(100, 100, ModelArchitecture::V8OrLater, 2);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();

    let detections = run(&pipeline, &arr, &geometry, (100, 100), 0.35).unwrap();
    assert_eq!(detections.len(), 2);
    assert!(detections.iter().all(|d| d.confidence >= 0.35));
}

#[test]
fn wrong_architecture_fails_fast() {
    let arr = v8_tensor(&[([10., 10., 4., 4.], 1, 0.9)], 2, 4);
    let geometry = ModelGeometry::new(50, 50, ModelArchitecture::V5, 2);
    let pipeline = DetectionPipeline::new(ConfigPost::new()).unwrap();

    assert!(matches!(
        run(&pipeline, &arr, &geometry, (100, 100), 0.5),
        Err(PostprocessError::LayoutMismatch { layout: "YoloV5", .. })
    ));
}

#[test]
fn run_detection_uses_defaults() {
    let arr = v8_tensor(&[([10., 10., 4., 4.], 1, 0.9)], 2, 4);
    let view = arr.view();
    let layout = ViewLayout::of(&view).unwrap();
    let tensor = RawOutputTensor::from_view(&view, &layout).unwrap();
    let geometry = ModelGeometry::new(50, 50, ModelArchitecture::V8OrLater, 2).with_names(&["cat", "dog"]);

    let detections = run_detection(&tensor, &geometry, (100, 100), 0.5).unwrap();
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].label.as_deref(), Some("dog"));

    let err = run_detection(&tensor, &geometry.clone().with_class_count(5), (100, 100), 0.5).unwrap_err();
    assert!(err.to_string().contains("Failed to post-process"));
}

#[test]
fn config_loads_from_json() {
    let config = ConfigPost::from_json_str(r#"{ "confidence": 0.5, "max_workers": 2 }"#).unwrap();
    assert_eq!(config.confidence, 0.5);
    assert_eq!(config.iou, DEFAULT_IOU);
    assert_eq!(config.max_workers, Some(2));
    assert!(!config.profile);

    assert!(ConfigPost::from_json_str(r#"{ "max_workers": 0 }"#).is_err());
    assert!(ConfigPost::from_json_str("not json").is_err());
}
