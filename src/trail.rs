//! Trail history for fading particle trails.
//!
//! A fixed-capacity ring of particle snapshots. Frame storage is allocated
//! once per slot and reused when the slot is overwritten, so steady-state
//! recording does not allocate. The physics never reads from here.

use crate::particle::{Particle, ParticleVertex};

/// One recorded snapshot of every particle's position and color.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrailFrame {
    /// Step number the snapshot was taken after (1-based).
    pub step: u64,
    pub vertices: Vec<ParticleVertex>,
}

/// Ring buffer of the most recent [`TrailFrame`]s.
#[derive(Clone, Debug, Default)]
pub struct TrailBuffer {
    slots: Vec<TrailFrame>,
    /// Slot holding the oldest frame.
    head: usize,
    len: usize,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            len: 0,
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a snapshot, evicting the oldest frame when full.
    ///
    /// With zero capacity nothing is stored.
    pub fn record(&mut self, step: u64, particles: &[Particle]) {
        if self.capacity == 0 {
            return;
        }

        let slot = if self.len < self.capacity {
            let slot = (self.head + self.len) % self.capacity;
            self.len += 1;
            slot
        } else {
            let slot = self.head;
            self.head = (self.head + 1) % self.capacity;
            slot
        };

        if slot == self.slots.len() {
            self.slots.push(TrailFrame::default());
        }
        let frame = &mut self.slots[slot];
        frame.step = step;
        frame.vertices.clear();
        frame.vertices.extend(particles.iter().map(Particle::to_vertex));
    }

    /// Drop every frame. Slot storage is kept for reuse.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Change the capacity, keeping the most recent frames that still fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        if capacity == self.capacity {
            return;
        }
        let keep = self.len.min(capacity);
        let skip = self.len - keep;
        let kept: Vec<TrailFrame> = self.iter().skip(skip).cloned().collect();

        self.slots = kept;
        self.head = 0;
        self.len = keep;
        self.capacity = capacity;
    }

    /// Frames in chronological order, oldest first.
    ///
    /// Each call starts a fresh pass over the current contents.
    pub fn iter(&self) -> TrailIter<'_> {
        TrailIter {
            buffer: self,
            offset: 0,
        }
    }

    /// Most recent frame.
    pub fn latest(&self) -> Option<&TrailFrame> {
        if self.len == 0 {
            None
        } else {
            Some(&self.slots[(self.head + self.len - 1) % self.capacity])
        }
    }
}

/// Chronological iterator over a [`TrailBuffer`].
pub struct TrailIter<'a> {
    buffer: &'a TrailBuffer,
    offset: usize,
}

impl<'a> Iterator for TrailIter<'a> {
    type Item = &'a TrailFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.buffer.len {
            return None;
        }
        let slot = (self.buffer.head + self.offset) % self.buffer.capacity;
        self.offset += 1;
        Some(&self.buffer.slots[slot])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len - self.offset;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrailIter<'_> {}

impl<'a> IntoIterator for &'a TrailBuffer {
    type Item = &'a TrailFrame;
    type IntoIter = TrailIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleId;
    use glam::{Vec2, Vec4};

    fn particles(x: f32) -> Vec<Particle> {
        vec![Particle::new(ParticleId(0), Vec2::new(x, 0.0), Vec2::ZERO, 1.0, Vec4::ONE)]
    }

    fn steps(buffer: &TrailBuffer) -> Vec<u64> {
        buffer.iter().map(|f| f.step).collect()
    }

    #[test]
    fn test_fills_in_order() {
        let mut buffer = TrailBuffer::new(3);
        buffer.record(1, &particles(1.0));
        buffer.record(2, &particles(2.0));
        assert_eq!(steps(&buffer), vec![1, 2]);
        assert_eq!(buffer.latest().unwrap().vertices[0].position, [2.0, 0.0]);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut buffer = TrailBuffer::new(3);
        for step in 1..=7 {
            buffer.record(step, &particles(step as f32));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(steps(&buffer), vec![5, 6, 7]);
        assert_eq!(buffer.iter().next().unwrap().vertices[0].position, [5.0, 0.0]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut buffer = TrailBuffer::new(2);
        buffer.record(1, &particles(1.0));
        buffer.record(2, &particles(2.0));
        assert_eq!(steps(&buffer), steps(&buffer));
        assert_eq!(buffer.iter().len(), 2);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut buffer = TrailBuffer::new(0);
        buffer.record(1, &particles(1.0));
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
    }

    #[test]
    fn test_clear() {
        let mut buffer = TrailBuffer::new(2);
        buffer.record(1, &particles(1.0));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.iter().count(), 0);

        buffer.record(2, &particles(2.0));
        assert_eq!(steps(&buffer), vec![2]);
    }

    #[test]
    fn test_shrink_keeps_most_recent() {
        let mut buffer = TrailBuffer::new(4);
        for step in 1..=6 {
            buffer.record(step, &particles(step as f32));
        }
        buffer.set_capacity(2);
        assert_eq!(steps(&buffer), vec![5, 6]);

        buffer.record(7, &particles(7.0));
        assert_eq!(steps(&buffer), vec![6, 7]);
    }

    #[test]
    fn test_grow_keeps_everything() {
        let mut buffer = TrailBuffer::new(2);
        for step in 1..=3 {
            buffer.record(step, &particles(step as f32));
        }
        buffer.set_capacity(4);
        for step in 4..=5 {
            buffer.record(step, &particles(step as f32));
        }
        assert_eq!(steps(&buffer), vec![2, 3, 4, 5]);
    }
}
