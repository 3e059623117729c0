pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
    fn class_index(&self) -> usize;
}

/// Class-aware greedy non-maximum suppression.
///
/// Boxes are visited by descending confidence (stable, so equal scores keep
/// their emission order) and kept unless an already kept box of the same
/// class overlaps them by more than `iou_threshold`. The result is in the
/// order boxes were accepted.
pub fn suppress<T: Nms + Clone>(boxes: &[T], iou_threshold: f32) -> Vec<T> {
    if boxes.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&T> = boxes.iter().collect();
    sorted.sort_by(|b1, b2| b2.confidence().total_cmp(&b1.confidence()));

    let mut kept: Vec<T> = Vec::with_capacity(8);
    'outer: for candidate in sorted {
        for accepted in kept.iter() {
            if accepted.class_index() != candidate.class_index() {
                continue;
            }
            if accepted.iou(candidate) > iou_threshold {
                continue 'outer;
            }
        }
        kept.push(candidate.clone());
    }

    kept
}
