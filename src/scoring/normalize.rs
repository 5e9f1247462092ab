//! Raw metric value → 0-100 sub-score
//!
//! Three policies: a threshold ladder (optionally interpolated), a boolean,
//! and a categorical mapping. Every result is clamped to `[0, 100]`; an absent
//! value scores 0.

use crate::config::{Direction, NormalizationSpec, ThresholdPoint};
use serde_json::Value;

/// Normalize a raw value under the given policy
pub fn normalize(value: Option<&Value>, spec: &NormalizationSpec) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    let score = match spec {
        NormalizationSpec::Thresholds {
            thresholds,
            direction,
            interpolate_between_points,
        } => match numeric_value(value) {
            Some(number) => {
                normalize_thresholds(number, thresholds, *direction, *interpolate_between_points)
            }
            None => 0.0,
        },
        NormalizationSpec::Boolean {
            true_score,
            false_score,
        } => {
            if is_truthy(value) {
                *true_score
            } else {
                *false_score
            }
        }
        NormalizationSpec::Mapping { mapping } => {
            mapping.get(&mapping_key(value)).copied().unwrap_or(0.0)
        }
        NormalizationSpec::Unknown => 0.0,
    };

    clamp_score(score)
}

/// Clamp to `[0, 100]`; NaN scores 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Score a number against a threshold ladder.
///
/// A single-kind ladder matching the direction (`lte` + lower-is-better,
/// `gte` + higher-is-better) is walked in order. Ladders mixing both kinds,
/// or whose only kind does not match the direction, are evaluated as mixed.
pub fn normalize_thresholds(
    value: f64,
    thresholds: &[ThresholdPoint],
    direction: Direction,
    interpolate: bool,
) -> f64 {
    if thresholds.is_empty() {
        return 0.0;
    }

    let lte: Vec<(f64, f64)> = thresholds
        .iter()
        .filter_map(|t| t.lte.map(|bound| (bound, t.score)))
        .collect();
    let gte: Vec<(f64, f64)> = thresholds
        .iter()
        .filter_map(|t| t.gte.map(|bound| (bound, t.score)))
        .collect();

    if !lte.is_empty() && !gte.is_empty() {
        return mixed(value, thresholds);
    }
    match direction {
        Direction::LowerIsBetter if !lte.is_empty() => lower_is_better(value, lte, interpolate),
        Direction::HigherIsBetter if !gte.is_empty() => higher_is_better(value, gte, interpolate),
        _ => mixed(value, thresholds),
    }
}

/// Ascending `lte` ladder: the first bound at or above the value wins.
/// Past the last bound the last rung's score applies.
fn lower_is_better(value: f64, mut ladder: Vec<(f64, f64)>, interpolate: bool) -> f64 {
    ladder.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (i, &(bound, score)) in ladder.iter().enumerate() {
        if value > bound {
            continue;
        }
        if value == bound || !interpolate || i == 0 {
            return score;
        }
        let (prev_bound, prev_score) = ladder[i - 1];
        if bound == prev_bound {
            return score;
        }
        let ratio = (value - prev_bound) / (bound - prev_bound);
        return prev_score + (score - prev_score) * ratio;
    }

    ladder.last().map(|&(_, score)| score).unwrap_or(0.0)
}

/// Descending `gte` ladder: the first bound at or below the value wins,
/// interpolating toward the higher rung visited just before it.
/// Below the last bound the last (smallest) rung's score applies.
fn higher_is_better(value: f64, mut ladder: Vec<(f64, f64)>, interpolate: bool) -> f64 {
    ladder.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (i, &(bound, score)) in ladder.iter().enumerate() {
        if value < bound {
            continue;
        }
        if value == bound || !interpolate || i == 0 {
            return score;
        }
        let (next_bound, next_score) = ladder[i - 1];
        if next_bound == bound {
            return score;
        }
        let ratio = (value - bound) / (next_bound - bound);
        return score + (next_score - score) * ratio;
    }

    ladder.last().map(|&(_, score)| score).unwrap_or(0.0)
}

/// Mixed ladder: keep the tightest satisfied bound. A candidate is compared
/// with the current best's bound of the same kind, a missing bound counting as 0.
fn mixed(value: f64, thresholds: &[ThresholdPoint]) -> f64 {
    let mut best: Option<&ThresholdPoint> = None;

    for threshold in thresholds {
        let replaces = if threshold.lte.is_some_and(|bound| value <= bound) {
            best.map_or(true, |b| {
                threshold.lte.unwrap_or(0.0) < b.lte.unwrap_or(0.0)
            })
        } else if threshold.gte.is_some_and(|bound| value >= bound) {
            best.map_or(true, |b| {
                threshold.gte.unwrap_or(0.0) > b.gte.unwrap_or(0.0)
            })
        } else {
            false
        };
        if replaces {
            best = Some(threshold);
        }
    }

    best.map(|t| t.score).unwrap_or(0.0)
}

/// Numeric reading of a value: numbers, booleans as 1/0, numeric strings
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Truthiness: false, 0, "", [] and {} are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Key used for categorical mapping lookups.
///
/// Strings are used verbatim, booleans as `True`/`False`, integers as digits
/// and integral floats with one decimal (`3.0`).
pub fn mapping_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.1}"),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}
