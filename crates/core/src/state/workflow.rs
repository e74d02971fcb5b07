//! Workflow state machine.
//!
//! `WorkflowState` owns at most one dataset, one variable selection and one
//! trained model, in that containment order. Each later entity is dropped
//! whenever an earlier one is replaced:
//!
//! ```text
//! Empty --ingest--> DatasetLoaded --select--> VariablesSelected --train--> ModelTrained
//!   any state --ingest--> DatasetLoaded
//!   VariablesSelected | ModelTrained --select--> VariablesSelected
//! ```
//!
//! Failed transitions never modify anything.

use chrono::Utc;
use log::info;
use rk_protocol::workflow_models::{
    Dataset, PlotArtifact, TrainedModel, VariableSelection, WorkflowAction, WorkflowSnapshot,
    WorkflowStage,
};

use crate::error::{ColumnRole, StateError, ValidationError};

/// Fitted values reported by the service, before they are tied to a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFit {
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
    pub mse: Option<f64>,
    pub plot: PlotArtifact,
}

/// The client-side workflow state.
#[derive(Debug, Default)]
pub struct WorkflowState {
    dataset: Option<Dataset>,
    selection: Option<VariableSelection>,
    model: Option<TrainedModel>,
    busy: Option<WorkflowAction>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_dataset(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn selection(&self) -> Option<&VariableSelection> {
        self.selection.as_ref()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Replace the dataset and drop everything built on the previous one.
    pub fn set_dataset(&mut self, columns: Vec<String>, label: String) -> &Dataset {
        self.selection = None;
        self.model = None;

        let dataset = Dataset::new(columns, label);
        info!(
            "dataset '{}' loaded with {} column(s)",
            dataset.label,
            dataset.columns.len()
        );
        self.dataset.insert(dataset)
    }

    /// Choose the independent and dependent columns.
    ///
    /// Empty and duplicate names are rejected before the dataset is
    /// consulted. A successful call always drops the trained model, even when
    /// the same pair is chosen again.
    pub fn set_selection(&mut self, x: &str, y: &str) -> Result<(), ValidationError> {
        let selection = self.validate_selection(x, y)?;

        if self.model.take().is_some() {
            info!("variable selection changed, trained model discarded");
        }
        info!("selected X='{}', Y='{}'", selection.x, selection.y);
        self.selection = Some(selection);
        Ok(())
    }

    fn validate_selection(&self, x: &str, y: &str) -> Result<VariableSelection, ValidationError> {
        let x = x.trim();
        let y = y.trim();

        if x.is_empty() {
            return Err(ValidationError::EmptyColumn {
                role: ColumnRole::Independent,
            });
        }
        if y.is_empty() {
            return Err(ValidationError::EmptyColumn {
                role: ColumnRole::Dependent,
            });
        }
        if x == y {
            return Err(ValidationError::SameColumn {
                column: x.to_string(),
            });
        }

        for column in [x, y] {
            let known = self
                .dataset
                .as_ref()
                .is_some_and(|dataset| dataset.has_column(column));
            if !known {
                return Err(ValidationError::UnknownColumn {
                    column: column.to_string(),
                });
            }
        }

        Ok(VariableSelection::new(x, y))
    }

    /// Store a trained model for the current selection.
    pub fn set_model(&mut self, fit: ModelFit) -> Result<&TrainedModel, StateError> {
        if self.dataset.is_none() {
            return Err(StateError::NoDataset);
        }
        let selection = self.selection.clone().ok_or(StateError::NoSelection)?;

        let model = TrainedModel {
            selection,
            slope: fit.slope,
            intercept: fit.intercept,
            r2: fit.r2,
            mse: fit.mse,
            plot: fit.plot,
            trained_at: Utc::now(),
        };
        info!("model trained: {} (R² = {:.4})", model.equation(), model.r2);
        Ok(&*self.model.insert(model))
    }

    /// Dataset present and a valid selection chosen.
    pub fn can_train(&self) -> bool {
        self.dataset.is_some() && self.selection.is_some()
    }

    /// A model exists for the current selection.
    pub fn can_predict(&self) -> bool {
        self.model.is_some()
    }

    pub fn stage(&self) -> WorkflowStage {
        if self.dataset.is_none() {
            WorkflowStage::Empty
        } else if self.model.is_some() {
            WorkflowStage::ModelTrained
        } else if self.selection.is_some() {
            WorkflowStage::VariablesSelected
        } else {
            WorkflowStage::DatasetLoaded
        }
    }

    /// Action whose network call is pending, if any.
    pub fn busy(&self) -> Option<WorkflowAction> {
        self.busy
    }

    /// Mark `action` as in flight.
    ///
    /// Fails while another action is pending; exactly one action may be in
    /// flight at a time.
    pub fn begin(&mut self, action: WorkflowAction) -> Result<(), StateError> {
        if let Some(pending) = self.busy {
            return Err(StateError::Busy { action: pending });
        }
        self.busy = Some(action);
        Ok(())
    }

    /// Clear the busy flag.
    pub fn finish(&mut self) {
        self.busy = None;
    }

    /// Fail with `StateError::Busy` while an action is pending.
    pub fn ensure_idle(&self) -> Result<(), StateError> {
        match self.busy {
            Some(action) => Err(StateError::Busy { action }),
            None => Ok(()),
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            stage: self.stage(),
            dataset: self.dataset.clone(),
            selection: self.selection.clone(),
            model: self.model.clone(),
            busy: self.busy,
        }
    }
}
