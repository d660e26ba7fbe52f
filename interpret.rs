use crate::error::{Error, Result};
use crate::models::ClassificationResult;

/// Reduce the raw output scores to the arg-max class. Single linear scan;
/// on ties the lowest index wins, so the result is deterministic for any
/// fixed score vector.
pub fn interpret(scores: &[f32]) -> Result<ClassificationResult> {
    let (class_index, score) = arg_max(scores).ok_or(Error::EmptyOutput)?;
    Ok(ClassificationResult {
        class_index,
        score,
        display: format!("Predicted class: {class_index} (score {score:.4})"),
    })
}

fn arg_max(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best
}
