//! Per-user session state: `Idle → Filtered → Edited → Saved`.
//!
//! Every transition takes the session by value and hands back the next one.
//! On error the caller simply keeps the value it had, which is how a failed
//! action leaves the previous state in place.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::ImplementationStatus;
use crate::types::Timestamp;
use crate::view::FilteredView;

/// Where a session stands.
///
/// A stored [`Session`] is never `Saved`: that phase is held by a
/// [`PendingSave`] for the length of one store write, and commits back to
/// `Filtered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Filtered,
    Edited,
    Saved,
}

/// A change to one row's mutable cells.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowEdit {
    pub status: Option<ImplementationStatus>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    phase: SessionPhase,
    view: Option<FilteredView>,
    save_confirmed: bool,
    last_saved_at: Option<Timestamp>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            view: None,
            save_confirmed: false,
            last_saved_at: None,
        }
    }

    /// Start from a previously saved snapshot.
    pub fn restored(view: FilteredView) -> Self {
        Self {
            phase: SessionPhase::Filtered,
            view: Some(view),
            ..Self::new()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn view(&self) -> Option<&FilteredView> {
        self.view.as_ref()
    }

    pub fn save_confirmed(&self) -> bool {
        self.save_confirmed
    }

    pub fn last_saved_at(&self) -> Option<Timestamp> {
        self.last_saved_at
    }

    /// Replace the current view with a freshly filtered one.
    pub fn apply_filter(self, view: FilteredView) -> Self {
        Self {
            phase: SessionPhase::Filtered,
            view: Some(view),
            save_confirmed: false,
            last_saved_at: self.last_saved_at,
        }
    }

    pub fn edit_row(mut self, index: usize, edit: RowEdit) -> Result<Self, CoreError> {
        if edit.status.is_none() && edit.comments.is_none() {
            return Err(CoreError::Validation(
                "Edit must change status or comments".to_string(),
            ));
        }
        let view = self.editable_view()?;
        if let Some(comments) = edit.comments {
            view.set_comments(index, comments)?;
        }
        if let Some(status) = edit.status {
            view.set_status(index, status)?;
        }
        self.phase = SessionPhase::Edited;
        self.save_confirmed = false;
        Ok(self)
    }

    /// Enter `Saved`, handing out the view that must be written.
    pub fn begin_save(self) -> Result<PendingSave, CoreError> {
        match (self.phase, self.view) {
            (SessionPhase::Filtered | SessionPhase::Edited, Some(view)) => {
                Ok(PendingSave { view })
            }
            _ => Err(CoreError::Validation("Nothing to save".to_string())),
        }
    }

    pub fn acknowledge_save(self) -> Self {
        Self {
            save_confirmed: false,
            ..self
        }
    }

    fn editable_view(&mut self) -> Result<&mut FilteredView, CoreError> {
        match (self.phase, self.view.as_mut()) {
            (SessionPhase::Filtered | SessionPhase::Edited, Some(view)) => Ok(view),
            _ => Err(CoreError::Validation(
                "No filtered data to edit; run a filter first".to_string(),
            )),
        }
    }
}

/// A session in the `Saved` phase, waiting for its single store write.
#[derive(Debug)]
pub struct PendingSave {
    view: FilteredView,
}

impl PendingSave {
    pub fn phase(&self) -> SessionPhase {
        SessionPhase::Saved
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// The write succeeded: keep the saved view as the new baseline.
    pub fn commit(self, saved_at: Timestamp) -> Session {
        Session {
            phase: SessionPhase::Filtered,
            view: Some(self.view),
            save_confirmed: true,
            last_saved_at: Some(saved_at),
        }
    }
}
