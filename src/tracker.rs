use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use log::debug;

use crate::AtomId;

/// One contiguous stay of one atom inside the shell.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Residence {
    pub atom_id: AtomId,
    /// The frame in which the atom was first seen inside the shell.
    pub first_frame: usize,
    /// The frame in which the atom was first seen outside the shell again.
    pub last_frame: usize,
    /// `(last_frame - first_frame) * frame_time`.
    pub time: f64,
}

/// The membership changes at one frame boundary.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Transition {
    /// Ids in the current shell that were not in the previous one, in current shell order.
    pub entering: Vec<AtomId>,
    /// Ids in the previous shell that are not in the current one, in previous shell order.
    pub leaving: Vec<AtomId>,
    /// Indices into [`ResidenceTracker::completed`] of the residences closed by this transition.
    pub closed: Range<usize>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.leaving.is_empty()
    }
}

/// Ids of `current` that are absent from `previous`.
///
/// Repeated ids in `current` are reported as often as they occur.
pub fn entering_atoms(previous: &[AtomId], current: &[AtomId]) -> Vec<AtomId> {
    difference(current, previous)
}

/// Ids of `previous` that are absent from `current`.
pub fn leaving_atoms(previous: &[AtomId], current: &[AtomId]) -> Vec<AtomId> {
    difference(previous, current)
}

fn difference(from: &[AtomId], without: &[AtomId]) -> Vec<AtomId> {
    let without: HashSet<AtomId> = without.iter().copied().collect();
    from.iter()
        .copied()
        .filter(|id| !without.contains(id))
        .collect()
}

/// Turns consecutive shell memberships into [`Residence`]s.
#[derive(Debug, Clone)]
pub struct ResidenceTracker {
    frame_time: f64,
    open: BTreeMap<AtomId, Residence>,
    completed: Vec<Residence>,
}

impl ResidenceTracker {
    pub fn new(frame_time: f64) -> Self {
        Self {
            frame_time,
            open: BTreeMap::new(),
            completed: Vec::new(),
        }
    }

    /// Compare the shell of the previous frame with the shell of frame `frame` and update the
    /// open and completed residences accordingly.
    ///
    /// Entering atoms open a fresh residence, replacing any residence that is still open for the
    /// same id. Leaving atoms close theirs. A leaving atom without an open residence closes a
    /// zeroed one, so its record reports atom id 0 and a first frame of 0.
    pub fn update(&mut self, previous: &[AtomId], current: &[AtomId], frame: usize) -> Transition {
        let entering = entering_atoms(previous, current);
        let leaving = leaving_atoms(previous, current);

        for &atom_id in &entering {
            let residence = Residence {
                atom_id,
                first_frame: frame,
                ..Residence::default()
            };
            self.open.insert(atom_id, residence);
        }

        let start = self.completed.len();
        for &atom_id in &leaving {
            let residence = self.open.remove(&atom_id).unwrap_or_else(|| {
                debug!("atom {atom_id} left the shell at frame {frame} without having entered");
                Residence::default()
            });
            self.close(residence, frame);
        }

        Transition {
            entering,
            leaving,
            closed: start..self.completed.len(),
        }
    }

    /// Close every residence that is still open as of frame `frame`, in ascending atom id order.
    ///
    /// Returns the indices of the newly completed residences.
    pub fn flush(&mut self, frame: usize) -> Range<usize> {
        let start = self.completed.len();
        for (_, residence) in std::mem::take(&mut self.open) {
            self.close(residence, frame);
        }
        start..self.completed.len()
    }

    fn close(&mut self, mut residence: Residence, frame: usize) {
        residence.last_frame = frame;
        residence.time = frame.saturating_sub(residence.first_frame) as f64 * self.frame_time;
        self.completed.push(residence);
    }

    /// Residences that are still open.
    pub fn open(&self) -> impl Iterator<Item = &Residence> {
        self.open.values()
    }

    pub fn completed(&self) -> &[Residence] {
        &self.completed
    }

    pub fn into_completed(self) -> Vec<Residence> {
        self.completed
    }
}
