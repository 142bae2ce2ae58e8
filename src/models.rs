use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============ Source Models ============

/// One row of the tabular source, keyed by header name.
///
/// Values are kept as raw text; all type coercion happens in the normalizer.
pub type RawRow = HashMap<String, String>;

/// Ordinal urgency label attached to every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parses a stored priority label. Matching ignores case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Domain Models ============

/// A debt-recovery case after normalization.
///
/// Cases are built fresh for every request and never mutated afterwards,
/// so all fields are private and exposed through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    id: i64,
    amount_due: f64,
    days_overdue: i64,
    past_defaults: i64,
    region: String,
    recovery_probability: f64,
    recovered: bool,
    priority: Priority,
}

impl Case {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        amount_due: f64,
        days_overdue: i64,
        past_defaults: i64,
        region: String,
        recovery_probability: f64,
        recovered: bool,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            amount_due,
            days_overdue,
            past_defaults,
            region,
            recovery_probability,
            recovered,
            priority,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn amount_due(&self) -> f64 {
        self.amount_due
    }

    pub fn days_overdue(&self) -> i64 {
        self.days_overdue
    }

    pub fn past_defaults(&self) -> i64 {
        self.past_defaults
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn recovery_probability(&self) -> f64 {
        self.recovery_probability
    }

    pub fn recovered(&self) -> bool {
        self.recovered
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// "resolved" once the debt has been recovered, "active" otherwise.
    pub fn status(&self) -> &'static str {
        if self.recovered {
            "resolved"
        } else {
            "active"
        }
    }

    /// Display label shown on the admin dashboard in place of a real debtor name.
    pub fn debtor_name(&self) -> String {
        format!("Debtor #{}", self.id)
    }
}

// ============ View Models ============

/// Admin dashboard record: every case field plus display label and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullCaseView {
    pub id: i64,
    pub debtor_name: String,
    pub amount: f64,
    pub days_overdue: i64,
    pub status: String,
    pub recovery_probability: f64,
    pub ai_priority: Priority,
    pub region: String,
    pub past_defaults: i64,
}

/// Collections-agent record: the reduced field set for assigned cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedCaseView {
    pub id: i64,
    pub amount: f64,
    pub days_overdue: i64,
    pub ai_priority: Priority,
    pub recovery_probability: f64,
    pub region: String,
}

/// Aggregate figures for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseMetrics {
    pub total_cases: usize,
    pub high_priority_cases: usize,
    pub avg_recovery_probability: f64,
    pub cases_at_risk: usize,
    pub active_cases: usize,
    pub resolved_cases: usize,
}

// ============ Response Envelopes ============

/// Success body for the case list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasesResponse<T> {
    pub success: bool,
    pub cases: Vec<T>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> CasesResponse<T> {
    /// Wraps a view, attaching `empty_message` when there is nothing to show.
    pub fn new(cases: Vec<T>, empty_message: &str) -> Self {
        let message = cases.is_empty().then(|| empty_message.to_string());
        Self {
            success: true,
            total: cases.len(),
            cases,
            message,
        }
    }
}

/// Success body for the metrics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub success: bool,
    pub metrics: CaseMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness body, including whether the case source can currently be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub source_available: bool,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Capability listing returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: std::collections::BTreeMap<String, String>,
}
