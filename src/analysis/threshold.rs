//! Leak-detection threshold from daily minimum flows.
//!
//! The rule: take the lowest overnight flow of each day, average those
//! minima, and alert above 130% of that mean. A DMA with no leaks should
//! see its night flow hover near the same floor every day; a rising floor
//! is the leak signature this threshold is meant to catch.
//!
//! The whole computation is a pure function of the reading sequence plus a
//! wall-clock stamp, recomputed from scratch on every call.

use std::collections::HashMap;

use chrono::Local;

use crate::domain::{DailyMinimum, FlowReading, ThresholdSummary};

/// Ratio of the alert threshold to the mean of daily minimums.
pub const THRESHOLD_RATIO: f64 = 1.3;

/// Compute the threshold summary, stamping it with the current local time.
pub fn compute_threshold(readings: &[FlowReading]) -> ThresholdSummary {
    compute_threshold_at(readings, Local::now().format("%d/%m/%Y %H:%M:%S").to_string())
}

/// Compute the threshold summary with an explicit `computed_at` stamp.
///
/// Deterministic given its inputs. An empty reading set yields zeros and an
/// empty per-day table; callers decide whether that is an error.
pub fn compute_threshold_at(readings: &[FlowReading], computed_at: String) -> ThresholdSummary {
    let daily_minimums = daily_minimums(readings);

    let mean = if daily_minimums.is_empty() {
        0.0
    } else {
        let total: f64 = daily_minimums.iter().map(|d| d.min_flow).sum();
        total / daily_minimums.len() as f64
    };

    // The threshold is derived from the unrounded mean; both values are then
    // rounded to 2 decimal places for reporting.
    let threshold = mean * THRESHOLD_RATIO;

    ThresholdSummary {
        mean_of_daily_minimums: round_2dp(mean),
        threshold: round_2dp(threshold),
        daily_minimums,
        computed_at,
    }
}

/// Group readings by calendar date and keep each date's minimum flow.
///
/// The date key is the literal text before the first space of the timestamp.
/// Grouping is by that exact text, NOT by parsed date: `2/1/2024` and
/// `02/01/2024` form separate groups. Downstream consumers rely on seeing
/// the date spelled the way the export spelled it, so this must not be
/// "fixed" to semantic date equality without confirming with them.
///
/// Output order is first-seen order over the reading sequence.
pub fn daily_minimums(readings: &[FlowReading]) -> Vec<DailyMinimum> {
    let mut out: Vec<DailyMinimum> = Vec::new();
    let mut index_by_date: HashMap<String, usize> = HashMap::new();

    for reading in readings {
        let date = date_key(&reading.timestamp);

        match index_by_date.get(date) {
            Some(&idx) => {
                if reading.flow < out[idx].min_flow {
                    out[idx].min_flow = reading.flow;
                }
            }
            None => {
                index_by_date.insert(date.to_string(), out.len());
                out.push(DailyMinimum {
                    date: date.to_string(),
                    min_flow: reading.flow,
                });
            }
        }
    }

    out
}

/// The literal date portion of a raw timestamp (text before the first space).
fn date_key(timestamp: &str) -> &str {
    match timestamp.split_once(' ') {
        Some((date, _)) => date,
        None => timestamp,
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(timestamp: &str, flow: f64) -> FlowReading {
        FlowReading {
            timestamp: timestamp.to_string(),
            flow,
        }
    }

    #[test]
    fn empty_input_yields_zeros() {
        let summary = compute_threshold_at(&[], "now".to_string());
        assert_eq!(summary.mean_of_daily_minimums, 0.0);
        assert_eq!(summary.threshold, 0.0);
        assert!(summary.daily_minimums.is_empty());
        assert_eq!(summary.computed_at, "now");
    }

    #[test]
    fn groups_by_date_and_keeps_true_minimum() {
        let readings = vec![
            reading("02/01/2024 02:15", 10.0),
            reading("02/01/2024 03:00", 5.0),
            reading("03/01/2024 01:30", 20.0),
            reading("03/01/2024 02:45", 22.5),
        ];
        let minima = daily_minimums(&readings);
        assert_eq!(minima.len(), 2);
        assert_eq!(minima[0].date, "02/01/2024");
        assert_eq!(minima[0].min_flow, 5.0);
        assert_eq!(minima[1].date, "03/01/2024");
        assert_eq!(minima[1].min_flow, 20.0);
    }

    #[test]
    fn dates_appear_in_first_seen_order_not_sorted() {
        let readings = vec![
            reading("05/01/2024 02:00", 3.0),
            reading("03/01/2024 02:00", 1.0),
            reading("05/01/2024 03:00", 2.0),
            reading("04/01/2024 02:00", 4.0),
        ];
        let minima = daily_minimums(&readings);
        let dates: Vec<&str> = minima.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["05/01/2024", "03/01/2024", "04/01/2024"]);
    }

    #[test]
    fn grouping_is_by_literal_date_text() {
        // Same calendar day, different spelling: these intentionally do NOT
        // merge. See `daily_minimums` doc comment before changing this.
        let readings = vec![
            reading("02/01/2024 02:00", 5.0),
            reading("2/1/2024 03:00", 4.0),
        ];
        let minima = daily_minimums(&readings);
        assert_eq!(minima.len(), 2);
        assert_eq!(minima[0].min_flow, 5.0);
        assert_eq!(minima[1].min_flow, 4.0);
    }

    #[test]
    fn threshold_is_130_percent_of_mean_rounded() {
        let readings = vec![
            reading("02/01/2024 02:00", 10.0),
            reading("03/01/2024 02:00", 15.0),
        ];
        let summary = compute_threshold_at(&readings, "now".to_string());
        assert_eq!(summary.mean_of_daily_minimums, 12.5);
        assert_eq!(summary.threshold, 16.25);
    }

    #[test]
    fn values_are_rounded_to_two_decimal_places() {
        let readings = vec![
            reading("02/01/2024 02:00", 1.0),
            reading("03/01/2024 02:00", 1.0),
            reading("04/01/2024 02:00", 2.0),
        ];
        // mean = 4/3 = 1.333..., threshold = 1.7333...
        let summary = compute_threshold_at(&readings, "now".to_string());
        assert_eq!(summary.mean_of_daily_minimums, 1.33);
        assert_eq!(summary.threshold, 1.73);
    }

    #[test]
    fn recomputation_is_idempotent_up_to_the_stamp() {
        let readings = vec![
            reading("02/01/2024 02:00", 7.25),
            reading("03/01/2024 04:30", 9.5),
        ];
        let a = compute_threshold_at(&readings, "t1".to_string());
        let b = compute_threshold_at(&readings, "t2".to_string());
        assert_eq!(a.mean_of_daily_minimums, b.mean_of_daily_minimums);
        assert_eq!(a.threshold, b.threshold);
        assert_eq!(a.daily_minimums, b.daily_minimums);
    }

    #[test]
    fn end_to_end_example() {
        // Matches the worked example from the project notes: the hour-6 row
        // never reaches this layer, so feed the three in-window readings.
        let readings = vec![
            reading("02/01/2024 02:15", 10.0),
            reading("02/01/2024 03:00", 5.0),
            reading("03/01/2024 01:30", 20.0),
        ];
        let summary = compute_threshold_at(&readings, "now".to_string());
        assert_eq!(
            summary.daily_minimums,
            vec![
                DailyMinimum {
                    date: "02/01/2024".to_string(),
                    min_flow: 5.0
                },
                DailyMinimum {
                    date: "03/01/2024".to_string(),
                    min_flow: 20.0
                },
            ]
        );
        assert_eq!(summary.mean_of_daily_minimums, 12.5);
        assert_eq!(summary.threshold, 16.25);
    }
}
