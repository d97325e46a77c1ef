//! Segment form state machine.
//!
//! ```text
//! Closed --open_create/open_edit--> Open --begin_submit--> Submitting
//! Submitting --finish_submit(ok)--> Closed + Saved overlay
//! Submitting --finish_submit(err)--> Open + Failed overlay (form kept)
//! Open --request_close (dirty)--> ConfirmingDiscard --confirm--> Closed
//!                                                   --cancel---> Open
//! ```
//!
//! The relay call itself happens outside: the view calls [`SegmentForm::begin_submit`],
//! posts the returned request, then hands the outcome to
//! [`SegmentForm::finish_submit`].

use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use crate::allocator;
use crate::catalog::SchemaCatalog;
use crate::store::SegmentStore;
use crate::types::{RelayResponse, SaveSegmentRequest, SchemaRow, Segment};

/// How long a status overlay stays up before closing itself
pub const OVERLAY_DISMISS_MS: u32 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

/// Coarse state of the form, as the view needs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    Open(FormMode),
    Submitting(FormMode),
    ConfirmingDiscard(FormMode),
}

/// Why the form cannot be submitted, in the order they are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("Enter a name for the segment")]
    MissingName,
    #[error("Add at least one schema to proceed")]
    NoRows,
    #[error("Please select a schema from the drop-down, or remove it")]
    EmptyRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("The segment form is not open")]
    NotOpen,
    #[error("No schema row at index {0}")]
    InvalidRow(usize),
    #[error("Schema '{0}' is unknown or already used by another row")]
    ValueUnavailable(String),
    #[error("All available schemas have been selected")]
    Saturated,
    #[error("{0}")]
    Invalid(#[from] ValidationIssue),
    #[error("A save is already in progress")]
    SubmissionInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    Saved { webhook_response: Option<String> },
    Failed { message: String },
    ConfirmDiscard,
}

/// Status dialog shown over the page. `generation` identifies it so a late
/// auto-dismiss timer can tell it has been superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOverlay {
    pub kind: OverlayKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Closed,
    Open,
    ConfirmingDiscard,
}

/// What was sent to the relay, kept until the answer arrives
#[derive(Debug, Clone)]
struct PendingSave {
    id: String,
    name: String,
    schemas: Vec<String>,
}

/// The segment form: name, schema rows and the save lifecycle
#[derive(Clone)]
pub struct SegmentForm {
    catalog: SchemaCatalog,
    store: SegmentStore,
    stage: Stage,
    mode: FormMode,
    name: String,
    rows: Vec<SchemaRow>,
    pending: Option<PendingSave>,
    overlay: Option<StatusOverlay>,
    generation: u64,
}

impl SegmentForm {
    pub fn new(catalog: SchemaCatalog, store: SegmentStore) -> Self {
        Self {
            catalog,
            store,
            stage: Stage::Closed,
            mode: FormMode::Create,
            name: String::new(),
            rows: Vec::new(),
            pending: None,
            overlay: None,
            generation: 0,
        }
    }

    // ---- Queries ----

    pub fn phase(&self) -> FormPhase {
        match self.stage {
            Stage::Closed => FormPhase::Closed,
            Stage::ConfirmingDiscard => FormPhase::ConfirmingDiscard(self.mode.clone()),
            Stage::Open if self.pending.is_some() => FormPhase::Submitting(self.mode.clone()),
            Stage::Open => FormPhase::Open(self.mode.clone()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.stage != Stage::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[SchemaRow] {
        &self.rows
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn overlay(&self) -> Option<&StatusOverlay> {
        self.overlay.as_ref()
    }

    pub fn available_for(&self, index: usize) -> Vec<crate::types::SchemaOption> {
        allocator::available_for(&self.catalog, &self.rows, index)
    }

    pub fn can_add_row(&self) -> bool {
        !allocator::all_saturated(&self.catalog, &self.rows)
    }

    /// First reason the form can't be submitted, by priority
    pub fn validation_issue(&self) -> Option<ValidationIssue> {
        if self.name.trim().is_empty() {
            Some(ValidationIssue::MissingName)
        } else if self.rows.is_empty() {
            Some(ValidationIssue::NoRows)
        } else if self.rows.iter().any(SchemaRow::is_empty) {
            Some(ValidationIssue::EmptyRow)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation_issue().is_none()
    }

    pub fn can_submit(&self) -> bool {
        self.stage == Stage::Open && self.is_valid() && !self.is_submitting()
    }

    /// Whether closing now would lose input
    pub fn is_dirty(&self) -> bool {
        !self.name.trim().is_empty() || self.rows.iter().any(|r| !r.is_empty())
    }

    // ---- Opening ----

    /// Start a new segment. Ignored while a save is in flight, since the
    /// relay reply would otherwise land on the new draft.
    pub fn open_create(&mut self) {
        if self.refuse_while_saving("open a new segment") {
            return;
        }
        self.reset();
        self.mode = FormMode::Create;
        self.stage = Stage::Open;
        log::debug!("Segment form opened for a new segment");
    }

    /// Open prefilled from a saved segment; an unknown id opens an empty form.
    pub fn open_edit(&mut self, id: &str) {
        if self.refuse_while_saving("edit a segment") {
            return;
        }
        match self.store.find(id) {
            Some(segment) => {
                self.reset();
                self.mode = FormMode::Edit(segment.id);
                self.name = segment.name;
                self.rows = segment.schemas.into_iter().map(SchemaRow::with_value).collect();
                self.stage = Stage::Open;
                log::debug!("Segment form opened to edit '{}'", id);
            }
            None => {
                log::debug!("Segment '{}' not found, opening an empty form", id);
                self.open_create();
            }
        }
    }

    // ---- Editing ----

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.name = name.into();
        Ok(())
    }

    pub fn add_row(&mut self) -> Result<(), FormError> {
        self.ensure_editable()?;
        if !self.can_add_row() {
            return Err(FormError::Saturated);
        }
        self.rows.push(SchemaRow::empty());
        Ok(())
    }

    /// Set a row's schema. Values outside the catalog or held by another row
    /// are refused, so duplicates can't appear even if the view misbehaves.
    pub fn select_row(&mut self, index: usize, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        if index >= self.rows.len() {
            return Err(FormError::InvalidRow(index));
        }
        if !self.available_for(index).iter().any(|o| o.value == value) {
            return Err(FormError::ValueUnavailable(value.to_string()));
        }
        self.rows[index].value = Some(value.to_string());
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<(), FormError> {
        self.ensure_editable()?;
        if index >= self.rows.len() {
            return Err(FormError::InvalidRow(index));
        }
        self.rows.remove(index);
        Ok(())
    }

    // ---- Saving ----

    /// Move to Submitting and build the relay request.
    pub fn begin_submit(&mut self) -> Result<SaveSegmentRequest, FormError> {
        if self.stage != Stage::Open {
            return Err(FormError::NotOpen);
        }
        if self.is_submitting() {
            return Err(FormError::SubmissionInFlight);
        }
        if let Some(issue) = self.validation_issue() {
            return Err(issue.into());
        }

        let id = match &self.mode {
            FormMode::Edit(id) => id.clone(),
            FormMode::Create => uuid::Uuid::new_v4().to_string(),
        };
        let name = self.name.trim().to_string();
        let schemas: Vec<String> = self.rows.iter().filter_map(|r| r.value.clone()).collect();

        let request = SaveSegmentRequest {
            segment_name: name.clone(),
            schemas: schemas.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.pending = Some(PendingSave { id, name, schemas });
        log::debug!("Submitting segment '{}'", request.segment_name);
        Ok(request)
    }

    /// Apply the relay outcome and return the generation of the overlay shown.
    ///
    /// Success stores the segment exactly as submitted and closes the form.
    /// Failure leaves the form as it is so the user can retry.
    pub fn finish_submit(&mut self, outcome: Result<RelayResponse, String>) -> Option<u64> {
        let pending = self.pending.take()?;

        match outcome {
            Ok(response) if response.success => {
                self.store.upsert(Segment {
                    id: pending.id,
                    name: pending.name,
                    schemas: pending.schemas,
                    timestamp: None,
                });
                self.reset();
                self.stage = Stage::Closed;
                log::info!("Segment saved");
                Some(self.show_overlay(OverlayKind::Saved {
                    webhook_response: response.response.filter(|r| !r.is_empty()),
                }))
            }
            Ok(response) => {
                let message = response
                    .error
                    .or_else(|| response.status.map(|s| format!("Webhook responded with status {}", s)))
                    .unwrap_or_else(|| "Webhook rejected the segment".to_string());
                log::warn!("Segment save rejected: {}", message);
                Some(self.show_failure(message))
            }
            Err(message) => {
                log::warn!("Segment save failed: {}", message);
                Some(self.show_failure(message))
            }
        }
    }

    fn show_failure(&mut self, message: String) -> u64 {
        // The failure dialog replaces a pending discard prompt; the form stays open
        if self.stage == Stage::ConfirmingDiscard {
            self.stage = Stage::Open;
        }
        self.show_overlay(OverlayKind::Failed { message })
    }

    // ---- Closing ----

    /// Close the form, asking first if there is unsaved input. The form
    /// stays open while a save is in flight.
    pub fn request_close(&mut self) {
        if self.refuse_while_saving("close the form") {
            return;
        }
        match self.stage {
            Stage::Open if self.is_dirty() => {
                self.stage = Stage::ConfirmingDiscard;
                self.show_overlay(OverlayKind::ConfirmDiscard);
            }
            Stage::Open => {
                self.reset();
                self.stage = Stage::Closed;
            }
            Stage::ConfirmingDiscard | Stage::Closed => {}
        }
    }

    pub fn confirm_discard(&mut self) {
        if self.stage != Stage::ConfirmingDiscard {
            return;
        }
        self.reset();
        self.stage = Stage::Closed;
        self.overlay = None;
        log::debug!("Unsaved segment discarded");
    }

    pub fn cancel_discard(&mut self) {
        if self.stage != Stage::ConfirmingDiscard {
            return;
        }
        self.stage = Stage::Open;
        self.overlay = None;
    }

    // ---- Overlay ----

    pub fn dismiss_overlay(&mut self) {
        if self.stage == Stage::ConfirmingDiscard {
            self.cancel_discard();
        } else {
            self.overlay = None;
        }
    }

    /// Timer callback: only closes the overlay it was scheduled for.
    /// Returns whether anything was dismissed.
    pub fn dismiss_overlay_if_current(&mut self, generation: u64) -> bool {
        match &self.overlay {
            Some(overlay)
                if overlay.generation == generation
                    && overlay.kind != OverlayKind::ConfirmDiscard =>
            {
                self.overlay = None;
                true
            }
            _ => false,
        }
    }

    fn show_overlay(&mut self, kind: OverlayKind) -> u64 {
        self.generation += 1;
        self.overlay = Some(StatusOverlay {
            kind,
            generation: self.generation,
        });
        self.generation
    }

    fn refuse_while_saving(&self, action: &str) -> bool {
        if self.is_submitting() {
            log::debug!("Cannot {} while a save is in flight", action);
            return true;
        }
        false
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.stage == Stage::Open {
            Ok(())
        } else {
            Err(FormError::NotOpen)
        }
    }

    /// Clear input. A save still in flight keeps its pending record.
    fn reset(&mut self) {
        self.mode = FormMode::Create;
        self.name.clear();
        self.rows.clear();
    }
}
