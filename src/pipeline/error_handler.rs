use anyhow::Result;
use std::mem;
use std::path::Path;
use std::sync::PoisonError;

use crate::SkippedFile;

use super::context::BuildState;

/// Check build result: in strict mode return the first recorded error; otherwise summarize the
/// skipped files and hand them back. Call after joining the walk thread and all workers.
pub fn check_for_first_error_or_skipped(state: &BuildState, root: &Path) -> Result<Vec<SkippedFile>> {
    if state.strict
        && let Some(err) = state
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    {
        return Err(err.into());
    }
    let skipped = mem::take(&mut *state.skipped.lock().unwrap_or_else(PoisonError::into_inner));
    if !skipped.is_empty() {
        log::warn!(
            "Skipped {} unreadable paths under {}; they are treated as absent",
            skipped.len(),
            root.display()
        );
    }
    Ok(skipped)
}
