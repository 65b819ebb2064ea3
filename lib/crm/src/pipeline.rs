//! Pipelines and their ordered stages.
//!
//! Stage `order` values within one pipeline are always the dense sequence
//! `0..len` once a reorder has been applied. The full order is re-submitted
//! to the backend on every reorder.

use crate::error::CrmError;
use agentdesk_core::{PipelineId, StageId};
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};

/// A named, colored bucket within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[serde(alias = "_id")]
    pub id: StageId,
    pub name: String,
    /// Display color, usually a hex string.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub order: u32,
}

impl Stage {
    #[must_use]
    pub fn new(id: StageId, name: impl Into<String>, color: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            order,
        }
    }
}

/// A user-defined ordered sequence of stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    #[serde(alias = "_id")]
    pub id: PipelineId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Returns the stage with the given id.
    #[must_use]
    pub fn stage(&self, stage_id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| &s.id == stage_id)
    }

    /// Returns the position of a stage in display order.
    #[must_use]
    pub fn stage_index(&self, stage_id: &StageId) -> Option<usize> {
        self.stages.iter().position(|s| &s.id == stage_id)
    }

    /// Sorts stages by their `order` field.
    ///
    /// The backend does not guarantee array order matches `order`, so this
    /// runs on every pipeline received.
    pub fn sort_stages(&mut self) {
        self.stages.sort_by_key(|s| s.order);
    }

    /// Reassigns every stage's `order` to its current position.
    pub fn normalize_order(&mut self) {
        renumber(&mut self.stages);
    }

    /// Returns the first stage, where new leads land by default.
    #[must_use]
    pub fn first_stage(&self) -> Option<&Stage> {
        self.stages.first()
    }

    /// Returns the `(stage, order)` list submitted on reorder.
    #[must_use]
    pub fn stage_order(&self) -> Vec<StageOrder> {
        self.stages
            .iter()
            .map(|s| StageOrder {
                stage_id: s.id.clone(),
                order: s.order,
            })
            .collect()
    }
}

/// One entry of the order list submitted after a reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOrder {
    pub stage_id: StageId,
    pub order: u32,
}

/// Moves the stage at `from` to position `to` and renumbers all stages.
///
/// The input is left untouched; the returned sequence has `order` equal to
/// each stage's 0-based position.
///
/// # Errors
///
/// Returns `CrmError::StageIndexOutOfRange` if either index is past the end.
pub fn reorder_stages(
    stages: &[Stage],
    from: usize,
    to: usize,
) -> Result<Vec<Stage>, Report<CrmError>> {
    let len = stages.len();
    for index in [from, to] {
        if index >= len {
            return Err(CrmError::StageIndexOutOfRange { index, len }.into());
        }
    }

    let mut reordered = stages.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    renumber(&mut reordered);
    Ok(reordered)
}

fn renumber(stages: &mut [Stage]) {
    for (position, stage) in stages.iter_mut().enumerate() {
        stage.order = position as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stages(names: &[&str]) -> Vec<Stage> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Stage::new(StageId::new(*n), *n, "#3b82f6", i as u32))
            .collect()
    }

    fn names(stages: &[Stage]) -> Vec<&str> {
        stages.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn move_forward() {
        let input = stages(&["new", "contacted", "qualified", "won"]);
        let out = reorder_stages(&input, 0, 2).unwrap();
        assert_eq!(names(&out), vec!["contacted", "qualified", "new", "won"]);
        let orders: Vec<u32> = out.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn move_backward() {
        let input = stages(&["new", "contacted", "qualified", "won"]);
        let out = reorder_stages(&input, 3, 1).unwrap();
        assert_eq!(names(&out), vec!["new", "won", "contacted", "qualified"]);
    }

    #[test]
    fn same_position_renumbers_sparse_orders() {
        let mut input = stages(&["a", "b"]);
        input[0].order = 10;
        input[1].order = 40;
        let out = reorder_stages(&input, 1, 1).unwrap();
        assert_eq!(out[0].order, 0);
        assert_eq!(out[1].order, 1);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let input = stages(&["a", "b"]);
        assert!(reorder_stages(&input, 0, 2).is_err());
        assert!(reorder_stages(&input, 5, 0).is_err());
        assert!(reorder_stages(&[], 0, 0).is_err());
    }

    #[test]
    fn sort_and_stage_order() {
        let mut pipeline = Pipeline {
            id: PipelineId::new("p"),
            name: "Sales".to_string(),
            description: None,
            is_default: true,
            stages: stages(&["a", "b", "c"]),
        };
        pipeline.stages.reverse();
        pipeline.sort_stages();
        assert_eq!(names(&pipeline.stages), vec!["a", "b", "c"]);

        let order = pipeline.stage_order();
        assert_eq!(order[2].stage_id.as_str(), "c");
        assert_eq!(order[2].order, 2);
        assert_eq!(pipeline.stage_index(&StageId::new("b")), Some(1));
    }

    proptest! {
        #[test]
        fn reorder_yields_contiguous_order(len in 1usize..12, from_seed in 0usize..64, to_seed in 0usize..64) {
            let labels: Vec<String> = (0..len).map(|i| format!("s{i}")).collect();
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let input = stages(&refs);
            let from = from_seed % len;
            let to = to_seed % len;

            let out = reorder_stages(&input, from, to).unwrap();

            prop_assert_eq!(out.len(), len);
            for (i, stage) in out.iter().enumerate() {
                prop_assert_eq!(stage.order as usize, i);
            }
            prop_assert_eq!(&out[to].id, &input[from].id);

            let mut expected: Vec<StageId> = input.iter().map(|s| s.id.clone()).collect();
            let moved = expected.remove(from);
            expected.insert(to, moved);
            let actual: Vec<StageId> = out.iter().map(|s| s.id.clone()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
