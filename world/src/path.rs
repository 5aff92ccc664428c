//! Bounded FIFO of player waypoints.

use std::collections::VecDeque;

use labyrinth_core::PixelPoint;

#[derive(Clone, Debug)]
pub(crate) struct PathQueue {
    waypoints: VecDeque<PixelPoint>,
    capacity: usize,
}

impl PathQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            waypoints: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a waypoint, returning `false` when the queue is full.
    pub(crate) fn push(&mut self, waypoint: PixelPoint) -> bool {
        if self.waypoints.len() >= self.capacity {
            return false;
        }
        self.waypoints.push_back(waypoint);
        true
    }

    pub(crate) fn pop_front(&mut self) -> Option<PixelPoint> {
        self.waypoints.pop_front()
    }

    /// Empties the queue, yielding the discarded waypoints in order.
    pub(crate) fn take_all(&mut self) -> Vec<PixelPoint> {
        self.waypoints.drain(..).collect()
    }

    pub(crate) fn last(&self) -> Option<PixelPoint> {
        self.waypoints.back().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = PixelPoint> + '_ {
        self.waypoints.iter().copied()
    }
}
