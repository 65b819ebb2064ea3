//! Grouping of leads into stage columns for the pipeline board.

use crate::lead::Lead;
use crate::pipeline::Stage;

/// One kanban column: a stage and the leads currently in it.
#[derive(Debug, Clone, PartialEq)]
pub struct StageColumn<'a> {
    pub stage: &'a Stage,
    pub leads: Vec<&'a Lead>,
}

impl StageColumn<'_> {
    /// Number of leads in the column.
    #[must_use]
    pub fn count(&self) -> usize {
        self.leads.len()
    }

    /// Sum of lead values in the column.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.leads.iter().map(|l| l.value).sum()
    }
}

/// Builds one column per stage in stage order.
///
/// Leads whose stage is not in `stages` are left out; the board only
/// renders leads it has a column for.
#[must_use]
pub fn group_by_stage<'a>(stages: &'a [Stage], leads: &[&'a Lead]) -> Vec<StageColumn<'a>> {
    stages
        .iter()
        .map(|stage| StageColumn {
            stage,
            leads: leads
                .iter()
                .copied()
                .filter(|lead| lead.stage_id == stage.id)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_core::{LeadId, PipelineId, StageId};
    use chrono::Utc;

    fn lead(id: &str, stage: &str, value: f64) -> Lead {
        let mut lead = Lead::new(
            LeadId::new(id),
            id,
            PipelineId::new("p"),
            StageId::new(stage),
            Utc::now(),
        );
        lead.value = value;
        lead
    }

    #[test]
    fn groups_in_stage_order() {
        let stages = vec![
            Stage::new(StageId::new("new"), "New", "#aaa", 0),
            Stage::new(StageId::new("won"), "Won", "#0f0", 1),
        ];
        let leads = [
            lead("a", "won", 500.0),
            lead("b", "new", 100.0),
            lead("c", "won", 250.0),
            lead("orphan", "deleted", 9.0),
        ];
        let refs: Vec<&Lead> = leads.iter().collect();

        let columns = group_by_stage(&stages, &refs);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].count(), 1);
        assert_eq!(columns[1].count(), 2);
        assert!((columns[1].total_value() - 750.0).abs() < f64::EPSILON);
    }
}
