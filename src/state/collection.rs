//! Ordered collection of courts

use tracing::debug;

use super::Court;

/// Indices touched by a resize
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resize {
    pub added: Vec<usize>,
    pub removed: Vec<usize>,
}

impl Resize {
    /// Whether the resize changed the collection at all
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Courts in display order; a court's index is its position
#[derive(Debug, Clone, Default)]
pub struct CourtCollection {
    courts: Vec<Court>,
}

impl CourtCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow or shrink to exactly `count` courts.
    ///
    /// New courts are appended blank. Removal happens from the end, so
    /// surviving courts keep their index and state.
    pub fn set_desired_count(&mut self, count: usize) -> Resize {
        let mut resize = Resize::default();

        for index in self.courts.len()..count {
            self.courts.push(Court::new(index));
            resize.added.push(index);
        }

        while self.courts.len() > count {
            if let Some(court) = self.courts.pop() {
                resize.removed.push(court.index());
            }
        }

        if !resize.is_empty() {
            debug!("Resized court collection to {}: {:?}", count, resize);
        }
        resize
    }

    /// Apply an elapsed delta to every court; returns whether any court changed
    pub fn tick(&mut self, delta_ms: u64) -> bool {
        let mut changed = false;
        for court in &mut self.courts {
            changed |= court.subtract(delta_ms);
        }
        changed
    }

    pub fn get(&self, index: usize) -> Option<&Court> {
        self.courts.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Court> {
        self.courts.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Court> {
        self.courts.iter()
    }

    pub fn len(&self) -> usize {
        self.courts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courts.is_empty()
    }

    /// Copy of every court's current state
    pub fn snapshot(&self) -> Vec<Court> {
        self.courts.clone()
    }
}
