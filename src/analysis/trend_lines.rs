//! Greedy trend line fitting through swing points.
//!
//! The algorithm is deliberately order-dependent: candidate start positions
//! are scanned left to right, each accepted point is added permanently and
//! the line refit, and points claimed by an emitted line are skipped by
//! later scans. Results are therefore path-dependent, not globally optimal.

use std::collections::HashSet;

use crate::config::analysis::TrendLineSettings;
use crate::models::geometry::{LevelKind, SwingPoint, TrendLine, TrendLineSet};
use crate::models::timeseries::OhlcvTimeSeries;
use crate::utils::maths_utils::{linear_fit, relative_distance};

/// Fit trend lines through both swing families. Resistance lines connect
/// swing highs, support lines swing lows. Each emitted line also carries its
/// value at every candle timestamp and at the latest candle, for downstream
/// breakout testing.
pub fn find_trend_lines(
    series: &OhlcvTimeSeries,
    swing_highs: &[SwingPoint],
    swing_lows: &[SwingPoint],
    settings: &TrendLineSettings,
) -> TrendLineSet {
    TrendLineSet {
        resistance: fit_lines(series, swing_highs, LevelKind::Resistance, settings),
        support: fit_lines(series, swing_lows, LevelKind::Support, settings),
    }
}

fn fit_lines(
    series: &OhlcvTimeSeries,
    points: &[SwingPoint],
    kind: LevelKind,
    settings: &TrendLineSettings,
) -> Vec<TrendLine> {
    let min_points = settings.min_points;
    if points.len() < min_points {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut used: HashSet<usize> = HashSet::new();

    // Try to grow a line from each start position
    for start in 0..=points.len() - min_points {
        if used.contains(&start) {
            continue;
        }

        // Seed from the next min_points swing points in scan order. Only the
        // start index is checked against the used set; seed members may
        // overlap a previously emitted line.
        let mut members: Vec<usize> = (start..start + min_points).collect();
        let Some((mut slope, mut intercept)) = fit_members(points, &members) else {
            continue;
        };

        // Extend forward. Additions are permanent: the refit after each
        // accepted point may worsen residuals for earlier members, but
        // nothing is retracted.
        for j in start + min_points..points.len() {
            if used.contains(&j) {
                continue;
            }

            let candidate = &points[j];
            if candidate.price == 0.0 {
                continue;
            }

            let predicted = slope * candidate.elapsed_secs + intercept;
            if relative_distance(candidate.price, predicted) <= settings.max_distance {
                members.push(j);
                if let Some(refit) = fit_members(points, &members) {
                    (slope, intercept) = refit;
                }
            }
        }

        if members.len() >= min_points {
            used.extend(members.iter().copied());
            lines.push(build_line(series, points, &members, kind, slope, intercept));
        }
    }

    // Strongest lines first
    lines.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    lines
}

fn fit_members(points: &[SwingPoint], members: &[usize]) -> Option<(f64, f64)> {
    let times: Vec<f64> = members.iter().map(|&i| points[i].elapsed_secs).collect();
    let prices: Vec<f64> = members.iter().map(|&i| points[i].price).collect();
    linear_fit(&times, &prices)
}

fn build_line(
    series: &OhlcvTimeSeries,
    points: &[SwingPoint],
    members: &[usize],
    kind: LevelKind,
    slope: f64,
    intercept: f64,
) -> TrendLine {
    let times: Vec<f64> = members.iter().map(|&i| points[i].elapsed_secs).collect();
    let first = times.iter().copied().fold(f64::INFINITY, f64::min);
    let last = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Rewards both point density and the duration the line has held
    let timespan_secs = last - first;
    let strength = members.len() as f64 * timespan_secs / 3600.0;

    let values: Vec<f64> = (0..series.len())
        .map(|idx| slope * series.elapsed_seconds(idx) + intercept)
        .collect();
    let current_value = values.last().copied().unwrap_or(intercept);

    TrendLine {
        kind,
        slope,
        intercept,
        points: members
            .iter()
            .map(|&i| (points[i].price, points[i].elapsed_secs))
            .collect(),
        strength,
        values,
        current_value,
    }
}
