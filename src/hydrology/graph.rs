//! Descent graph: one downhill edge per point plus maintained in-degrees.

use serde::{Deserialize, Serialize};

/// Where water leaving a point goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Downhill {
    /// No lower neighbor (a sink root until an escape is found).
    #[default]
    Unknown,
    /// Water leaves the map across the boundary.
    OffMap,
    /// Water flows into this point.
    Point(usize),
}

impl Downhill {
    /// Target point, if the edge leads to one.
    pub fn target(self) -> Option<usize> {
        match self {
            Downhill::Point(p) => Some(p),
            _ => None,
        }
    }
}

/// The terminal destination of a point's water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sink {
    #[default]
    Unknown,
    Ocean,
    OffMap,
    /// Local depression whose lowest point is the given index.
    Root(usize),
}

impl Sink {
    /// True once water from this point is known to leave the land.
    pub fn is_drained(self) -> bool {
        matches!(self, Sink::Ocean | Sink::OffMap)
    }
}

/// A point whose maintained in-degree disagrees with a recount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMismatch {
    pub index: usize,
    /// Value kept up to date by [`DownhillGraph::point_to`].
    pub maintained: u32,
    /// Value obtained by counting incoming edges.
    pub counted: u32,
}

/// Result of comparing maintained in-degrees against a recount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceAudit {
    pub mismatches: Vec<ReferenceMismatch>,
}

impl ReferenceAudit {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Downhill edges with incrementally maintained reference counts.
///
/// Every edge change goes through [`DownhillGraph::point_to`], so
/// `references[p]` always equals the number of points whose edge targets `p`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownhillGraph {
    downhill: Vec<Downhill>,
    references: Vec<u32>,
}

impl DownhillGraph {
    pub fn new(len: usize) -> Self {
        Self {
            downhill: vec![Downhill::Unknown; len],
            references: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.downhill.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downhill.is_empty()
    }

    pub fn get(&self, index: usize) -> Downhill {
        self.downhill[index]
    }

    pub fn downhill(&self) -> &[Downhill] {
        &self.downhill
    }

    /// Number of points draining directly into `index`.
    pub fn references(&self, index: usize) -> u32 {
        self.references[index]
    }

    pub fn all_references(&self) -> &[u32] {
        &self.references
    }

    /// Replaces the edge leaving `index`, moving the reference from the old
    /// target to the new one.
    pub fn point_to(&mut self, index: usize, target: Downhill) {
        if let Downhill::Point(old) = self.downhill[index] {
            self.references[old] = self.references[old].saturating_sub(1);
        }
        if let Downhill::Point(new) = target {
            self.references[new] += 1;
        }
        self.downhill[index] = target;
    }

    /// Recounts incoming edges from land points and compares them with the
    /// maintained counts. Mismatches are logged, never fatal.
    pub fn audit(&self, oceanic: &[bool]) -> ReferenceAudit {
        let mut recount = vec![0u32; self.len()];
        for (p, edge) in self.downhill.iter().enumerate() {
            if oceanic[p] {
                continue;
            }
            if let Downhill::Point(d) = edge {
                recount[*d] += 1;
            }
        }

        let mut audit = ReferenceAudit::default();
        for (index, (&maintained, &counted)) in self.references.iter().zip(&recount).enumerate() {
            if maintained != counted {
                log::warn!(
                    "Reference count mismatch at point {}: maintained {}, counted {}",
                    index,
                    maintained,
                    counted
                );
                audit.mismatches.push(ReferenceMismatch { index, maintained, counted });
            }
        }
        audit
    }
}
