use serde::Serialize;

use crate::model::activation::softmax;

/// Whether the raw scores leaving the model are already a probability
/// distribution or still unnormalized logits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Logits,
    Probabilities,
}

/// Final verdict for one image: the winning class and how much probability
/// mass it carries.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Prediction {
    pub class_index: usize,
    pub label: String,
    pub confidence: f64,
}

/// Index of the largest score. Ties resolve to the lowest index because
/// the comparison is strict.
pub fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

/// Turns raw scores into a `Prediction`.
///
/// Logits are pushed through softmax first so the reported confidence is
/// always a probability, whatever the model's output activation was.
/// `labels` must have one entry per score; the classifier guarantees that
/// at load time.
pub fn decide(scores: &[f64], kind: ScoreKind, labels: &[String]) -> Prediction {
    debug_assert_eq!(scores.len(), labels.len());

    let probs = match kind {
        ScoreKind::Logits => softmax(scores),
        ScoreKind::Probabilities => scores.to_vec(),
    };
    let winner = argmax(&probs);

    Prediction {
        class_index: winner,
        label: labels[winner].clone(),
        confidence: probs[winner],
    }
}
