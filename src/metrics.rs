use crate::classifier::HIGH_PRIORITY_THRESHOLD;
use crate::models::{Case, CaseMetrics, Priority};

/// Cases overdue strictly longer than this are at risk.
pub const AT_RISK_DAYS: i64 = 90;

fn round_to_4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Summarises the collection in a single pass.
///
/// A case is high priority when its probability reaches the High threshold
/// or its priority is High. The average is 0 for an empty collection.
pub fn aggregate(cases: &[Case]) -> CaseMetrics {
    let mut metrics = CaseMetrics::default();
    let mut probability_sum = 0.0;

    for case in cases {
        metrics.total_cases += 1;
        probability_sum += case.recovery_probability();

        if case.recovery_probability() >= HIGH_PRIORITY_THRESHOLD
            || case.priority() == Priority::High
        {
            metrics.high_priority_cases += 1;
        }
        if case.days_overdue() > AT_RISK_DAYS {
            metrics.cases_at_risk += 1;
        }
        if case.recovered() {
            metrics.resolved_cases += 1;
        } else {
            metrics.active_cases += 1;
        }
    }

    if metrics.total_cases > 0 {
        metrics.avg_recovery_probability =
            round_to_4(probability_sum / metrics.total_cases as f64);
    }

    metrics
}
