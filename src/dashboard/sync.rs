use super::coordinator::SelectionCoordinator;
use super::view::{ViewId, ViewModel};
use crate::core::{DashError, Result};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    Primary,
    Alternate,
}

/// Keeps two renderings of the same logical chart showing the same
/// selection. Only one of them is visible at a time, so the copy happens on
/// layout changes, from whichever view the user touched last.
#[derive(Debug, Clone)]
pub struct DualViewSync {
    primary: ViewId,
    alternate: ViewId,
    last_interacted: Option<PairSide>,
}

impl DualViewSync {
    pub fn new(primary: ViewId, alternate: ViewId) -> Result<Self> {
        if primary == alternate {
            return Err(DashError::InvalidConfig(
                "a synchronized pair needs two distinct views".into(),
            ));
        }
        Ok(Self {
            primary,
            alternate,
            last_interacted: None,
        })
    }

    pub fn primary(&self) -> ViewId {
        self.primary
    }

    pub fn alternate(&self) -> ViewId {
        self.alternate
    }

    pub fn last_interacted(&self) -> Option<PairSide> {
        self.last_interacted
    }

    /// Record a click on a view. Views outside the pair are ignored.
    pub fn observe_interaction(&mut self, view: ViewId) {
        if view == self.primary {
            self.last_interacted = Some(PairSide::Primary);
        } else if view == self.alternate {
            self.last_interacted = Some(PairSide::Alternate);
        }
    }

    /// Copy the last-touched view's selection onto its partner, replacing
    /// whatever the partner had. Returns `None` when neither view has been
    /// touched yet.
    pub fn on_layout_change(
        &self,
        coordinator: &mut SelectionCoordinator,
    ) -> Result<Option<Vec<ViewModel>>> {
        let (source, target) = match self.last_interacted {
            None => return Ok(None),
            Some(PairSide::Primary) => (self.primary, self.alternate),
            Some(PairSide::Alternate) => (self.alternate, self.primary),
        };
        let keys = coordinator.view(source)?.selection().clone();
        debug!(
            "Layout change: copying {} selected keys from view #{} to #{}",
            keys.len(),
            source.index(),
            target.index()
        );
        coordinator.select(target, keys).map(Some)
    }
}
