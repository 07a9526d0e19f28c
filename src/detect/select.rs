//! Capability-based backend selection.
//!
//! The backend set is closed: selection is a pure function of the declared
//! capabilities of the candidates, never of their runtime types. Automatic
//! mode prefers the multi-person capability and logs an explicit warning
//! when it falls back, because the fallback changes the landmark subset the
//! run produces. A forced choice never falls back.

use clap::ValueEnum;

use crate::detect::backend::{PoseBackend, PoseCapability};
use crate::error::PipelineError;

/// Requested backend, as exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    /// Prefer multi-person, fall back to single-person.
    Auto,
    /// Require the multi-person detector.
    Multi,
    /// Require the single-person detector.
    Single,
}

impl BackendChoice {
    fn describe(self) -> &'static str {
        match self {
            BackendChoice::Auto => "auto",
            BackendChoice::Multi => "multi-person",
            BackendChoice::Single => "single-person",
        }
    }
}

fn take_with_capability(
    candidates: &mut Vec<Box<dyn PoseBackend>>,
    capability: PoseCapability,
) -> Option<Box<dyn PoseBackend>> {
    let idx = candidates.iter().position(|b| b.supports(capability))?;
    Some(candidates.remove(idx))
}

/// Pick a backend from the candidate set according to `choice`.
///
/// Returns `BackendUnavailable` when no candidate declares the required
/// capability. In auto mode the multi → single fallback is logged; a forced
/// choice fails fast instead of silently substituting a different landmark
/// set.
pub fn select_backend(
    choice: BackendChoice,
    mut candidates: Vec<Box<dyn PoseBackend>>,
) -> Result<Box<dyn PoseBackend>, PipelineError> {
    let unavailable = || PipelineError::BackendUnavailable {
        requested: choice.describe().to_string(),
    };

    match choice {
        BackendChoice::Multi => {
            take_with_capability(&mut candidates, PoseCapability::MultiPerson).ok_or_else(unavailable)
        }
        BackendChoice::Single => {
            take_with_capability(&mut candidates, PoseCapability::SinglePerson)
                .ok_or_else(unavailable)
        }
        BackendChoice::Auto => {
            if let Some(backend) = take_with_capability(&mut candidates, PoseCapability::MultiPerson)
            {
                log::info!("backend=auto -> {} (multi-person)", backend.name());
                return Ok(backend);
            }
            let backend = take_with_capability(&mut candidates, PoseCapability::SinglePerson)
                .ok_or_else(unavailable)?;
            log::warn!(
                "backend=auto -> falling back to {} (single-person); landmark subset differs from the multi-person detector",
                backend.name()
            );
            Ok(backend)
        }
    }
}
