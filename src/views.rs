use crate::models::{AssignedCaseView, Case, FullCaseView};

/// Decides which cases are routed to a collections agent.
pub trait AssignmentPolicy: Send + Sync {
    fn is_assigned(&self, case: &Case) -> bool;
}

/// Placeholder assignment: every case with an even identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenIdAssignment;

impl AssignmentPolicy for EvenIdAssignment {
    fn is_assigned(&self, case: &Case) -> bool {
        case.id() % 2 == 0
    }
}

impl<F> AssignmentPolicy for F
where
    F: Fn(&Case) -> bool + Send + Sync,
{
    fn is_assigned(&self, case: &Case) -> bool {
        self(case)
    }
}

impl From<&Case> for FullCaseView {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id(),
            debtor_name: case.debtor_name(),
            amount: case.amount_due(),
            days_overdue: case.days_overdue(),
            status: case.status().to_string(),
            recovery_probability: case.recovery_probability(),
            ai_priority: case.priority(),
            region: case.region().to_string(),
            past_defaults: case.past_defaults(),
        }
    }
}

impl From<&Case> for AssignedCaseView {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id(),
            amount: case.amount_due(),
            days_overdue: case.days_overdue(),
            ai_priority: case.priority(),
            recovery_probability: case.recovery_probability(),
            region: case.region().to_string(),
        }
    }
}

/// Admin view: every case, in source order.
pub fn full_view(cases: &[Case]) -> Vec<FullCaseView> {
    cases.iter().map(FullCaseView::from).collect()
}

/// Agent view: only the cases `policy` assigns, in source order.
pub fn assigned_view(cases: &[Case], policy: &dyn AssignmentPolicy) -> Vec<AssignedCaseView> {
    cases
        .iter()
        .filter(|case| policy.is_assigned(case))
        .map(AssignedCaseView::from)
        .collect()
}
