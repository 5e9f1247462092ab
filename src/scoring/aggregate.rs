//! Final score, product-quality rating, grade and notes.

use crate::models::Grade;
use indexmap::IndexMap;

/// Dimensions averaged into the product-quality rating
pub const QUALITY_DIMENSIONS: &[&str] = &["maintainability", "security", "scalability"];

/// Dimensions below this score get a note
const WEAK_DIMENSION_THRESHOLD: f64 = 50.0;

/// Weighted sum of dimension scores.
///
/// Dimensions without a weight contribute nothing. The sum is not
/// renormalized, so weights that do not add up to 1 move the result outside
/// the grade table's range.
pub fn final_score<F>(scores: &IndexMap<String, f64>, weight_for: F) -> f64
where
    F: Fn(&str) -> f64,
{
    scores
        .iter()
        .map(|(key, score)| score * weight_for(key))
        .sum()
}

/// Map the average of the quality dimensions from [0, 100] onto [1, 10].
///
/// Rounded to one decimal; `1.0` when none of the quality dimensions is scored.
pub fn product_quality_rating(scores: &IndexMap<String, f64>) -> f64 {
    let present: Vec<f64> = QUALITY_DIMENSIONS
        .iter()
        .filter_map(|key| scores.get(*key).copied())
        .collect();
    if present.is_empty() {
        return 1.0;
    }

    let average = present.iter().sum::<f64>() / present.len() as f64;
    round_to(1.0 + average / 100.0 * 9.0, 1)
}

pub fn grade_for(final_score: f64) -> Grade {
    Grade::from_score(final_score)
}

/// Lowest-dimension warning (if under 50) plus one overall assessment
pub fn assessment_notes(scores: &IndexMap<String, f64>, final_score: f64) -> Vec<String> {
    let mut notes = Vec::new();

    let lowest = scores
        .iter()
        .fold(None::<(&String, f64)>, |lowest, (key, &score)| match lowest {
            Some((_, low)) if low <= score => lowest,
            _ => Some((key, score)),
        });
    if let Some((key, score)) = lowest {
        if score < WEAK_DIMENSION_THRESHOLD {
            notes.push(format!(
                "Lowest scoring dimension: {key} ({score:.1}/100). Needs improvement."
            ));
        }
    }

    let assessment = if final_score >= 80.0 {
        "Strong engineering practices. Ready for VC evaluation."
    } else if final_score >= 60.0 {
        "Good engineering foundation. Some areas need improvement."
    } else {
        "Engineering practices need significant improvement before VC evaluation."
    };
    notes.push(assessment.to_string());

    notes
}

/// Round to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
