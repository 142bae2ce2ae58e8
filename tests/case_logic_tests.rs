/// Unit tests for the case pipeline
/// Tests normalization, priority classification, the dashboard views and metrics
use dca_cases_api::classifier::classify;
use dca_cases_api::metrics::aggregate;
use dca_cases_api::models::Priority;
use dca_cases_api::normalizer::{normalize_rows, SkipReason};
use dca_cases_api::source::parse_csv;
use dca_cases_api::views::{assigned_view, full_view, EvenIdAssignment};

const HEADER: &str = "case_id,amount_due,days_overdue,past_defaults,region,recovery_probability,recovered";

fn csv(rows: &[&str]) -> String {
    let mut text = format!("{}\n", HEADER);
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[test]
    fn test_threshold_bands() {
        assert_eq!(classify(0.95), Priority::High);
        assert_eq!(classify(0.70), Priority::High);
        assert_eq!(classify(0.50), Priority::Medium);
        assert_eq!(classify(0.30), Priority::Medium);
        assert_eq!(classify(0.29), Priority::Low);
        assert_eq!(classify(0.0), Priority::Low);
    }

    #[test]
    fn test_medium_starts_at_030_not_040() {
        // The retired batch pipeline labelled 0.35 as Low
        assert_eq!(classify(0.35), Priority::Medium);
    }
}

#[cfg(test)]
mod view_tests {
    use super::*;

    #[test]
    fn test_assigned_view_returns_even_ids_in_source_order() {
        let rows = parse_csv(&csv(&[
            "1,100,10,0,North,0.5,0",
            "2,200,20,0,South,0.5,0",
            "3,300,30,0,East,0.5,0",
            "4,400,40,0,West,0.5,0",
        ]));
        let batch = normalize_rows(&rows);
        let ids: Vec<i64> = assigned_view(&batch.cases, &EvenIdAssignment)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_assigned_view_preserves_unsorted_order() {
        let rows = parse_csv(&csv(&[
            "8,100,10,0,North,0.5,0",
            "2,200,20,0,South,0.5,0",
            "6,300,30,0,East,0.5,0",
        ]));
        let batch = normalize_rows(&rows);
        let ids: Vec<i64> = assigned_view(&batch.cases, &EvenIdAssignment)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![8, 2, 6]);
    }

    #[test]
    fn test_derived_priority_in_full_view() {
        let rows = parse_csv(&csv(&["11,5000,30,1,North,0.75,0"]));
        let batch = normalize_rows(&rows);
        let view = full_view(&batch.cases);
        assert_eq!(view[0].ai_priority, Priority::High);
        assert_eq!(view[0].debtor_name, "Debtor #11");
        assert_eq!(view[0].status, "active");
        assert_eq!(aggregate(&batch.cases).high_priority_cases, 1);
    }

    #[test]
    fn test_supplied_priority_wins_over_derived() {
        let text = "case_id,amount_due,days_overdue,recovery_probability,priority\n\
                    1,100,10,0.75,Medium\n\
                    2,100,10,0.10,High\n";
        let batch = normalize_rows(&parse_csv(text));
        let view = full_view(&batch.cases);
        assert_eq!(view[0].ai_priority, Priority::Medium);
        assert_eq!(view[1].ai_priority, Priority::High);

        // Both still count: one by probability, one by stored label
        assert_eq!(aggregate(&batch.cases).high_priority_cases, 2);
    }
}

#[cfg(test)]
mod malformed_row_tests {
    use super::*;

    #[test]
    fn test_row_missing_amount_is_excluded_everywhere() {
        let text = "case_id,days_overdue,recovery_probability,amount_due\n\
                    2,100,0.9\n\
                    4,120,0.2,800\n";
        let rows = parse_csv(text);
        let batch = normalize_rows(&rows);

        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(
            batch.skipped[0].reason,
            SkipReason::MissingField("amount_due")
        );

        let full: Vec<i64> = full_view(&batch.cases).iter().map(|c| c.id).collect();
        let assigned: Vec<i64> = assigned_view(&batch.cases, &EvenIdAssignment)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(full, vec![4]);
        assert_eq!(assigned, vec![4]);

        let metrics = aggregate(&batch.cases);
        assert_eq!(metrics.total_cases, 1);
        assert_eq!(metrics.high_priority_cases, 0);
        assert_eq!(metrics.cases_at_risk, 1);
    }

    #[test]
    fn test_garbage_rows_do_not_stop_later_rows() {
        let rows = parse_csv(&csv(&[
            "abc,100,10,0,North,0.5,0",
            "2,lots,10,0,North,0.5,0",
            "3,100,10,0,North,likely,0",
            "4,100,10,0,North,0.5,0",
        ]));
        let batch = normalize_rows(&rows);
        assert_eq!(batch.cases.len(), 1);
        assert_eq!(batch.cases[0].id(), 4);
        let skipped_rows: Vec<usize> = batch.skipped.iter().map(|s| s.row).collect();
        assert_eq!(skipped_rows, vec![1, 2, 3]);
    }
}

#[cfg(test)]
mod metrics_tests {
    use super::*;

    #[test]
    fn test_cases_at_risk_is_strictly_over_90() {
        let rows = parse_csv(&csv(&[
            "1,100,50,0,North,0.5,0",
            "2,100,91,0,North,0.5,0",
            "3,100,200,0,North,0.5,0",
        ]));
        assert_eq!(aggregate(&normalize_rows(&rows).cases).cases_at_risk, 2);
    }

    #[test]
    fn test_average_of_single_case() {
        let rows = parse_csv(&csv(&["1,100,10,0,North,0.5,0"]));
        assert_eq!(
            aggregate(&normalize_rows(&rows).cases).avg_recovery_probability,
            0.5
        );
    }

    #[test]
    fn test_average_of_empty_collection() {
        assert_eq!(aggregate(&[]).avg_recovery_probability, 0.0);
    }

    #[test]
    fn test_active_and_resolved_partition() {
        let rows = parse_csv(&csv(&[
            "1,100,10,0,North,0.5,1",
            "2,100,10,0,North,0.5,0",
            "3,100,10,0,North,0.5,2",
            "4,100,10,0,North,0.5,",
        ]));
        let metrics = aggregate(&normalize_rows(&rows).cases);
        assert_eq!(metrics.total_cases, 4);
        assert_eq!(metrics.resolved_cases, 1);
        assert_eq!(metrics.active_cases, 3);
    }
}
