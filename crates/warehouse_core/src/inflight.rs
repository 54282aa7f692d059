use std::collections::BTreeMap;

use crate::{commands::CallKind, error::SessionError};

/// Outstanding service calls by kind. Single-flight kinds hold at most one
/// slot; notification kinds are only counted.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pending: BTreeMap<CallKind, usize>,
}

impl InFlight {
    /// Fails without recording anything when `kind` is single-flight and
    /// already pending.
    pub fn check(&self, kind: CallKind) -> Result<(), SessionError> {
        if kind.is_single_flight() && self.is_pending(kind) {
            Err(SessionError::ConcurrentOperationRejected(kind))
        } else {
            Ok(())
        }
    }

    pub fn begin(&mut self, kind: CallKind) -> Result<(), SessionError> {
        self.check(kind)?;
        *self.pending.entry(kind).or_default() += 1;
        Ok(())
    }

    /// Releases one slot of `kind`. Returns false if nothing was pending.
    pub fn finish(&mut self, kind: CallKind) -> bool {
        match self.pending.get_mut(&kind) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.pending.remove(&kind);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, kind: CallKind) -> bool {
        self.pending.contains_key(&kind)
    }

    pub fn blocks_grid(&self) -> bool {
        self.pending.keys().any(|kind| kind.blocks_grid())
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = CallKind> + '_ {
        self.pending.keys().copied()
    }
}
