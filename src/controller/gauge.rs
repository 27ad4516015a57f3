use crate::relay::{SentimentLabel, SentimentScores};

/// Start and width of each label's band on the 0-100 gauge.
const fn band(label: SentimentLabel) -> (f64, f64) {
    match label {
        SentimentLabel::Negative => (0.0, 33.0),
        SentimentLabel::Neutral => (33.0, 34.0),
        SentimentLabel::Positive => (67.0, 33.0),
    }
}

/// Gauge offset: the predicted label's band, scaled by that label's own score.
pub fn gauge_position(label: SentimentLabel, scores: &SentimentScores) -> f64 {
    let (start, width) = band(label);
    let score = scores.for_label(label);
    let score = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 };
    start + score * width
}

/// Confidence as a percentage with one decimal, e.g. `"91.5"`.
pub fn confidence_percent(confidence: f64) -> String {
    format!("{:.1}", confidence * 100.0)
}
