//! The navigation state machine.
//!
//! A flip is a two-phase affair: the request locks the machine immediately,
//! the slot commits only when the animation deadline passes. While locked,
//! every further slot-changing request is dropped on the floor (not queued),
//! so at most one commit is ever in flight. Callers are expected to consult
//! `can_go_next`/`can_go_prev` before issuing steps; an out-of-bounds
//! request is likewise silently dropped.

use std::time::{Duration, Instant};

use log::debug;
use varak_core::PageAtlas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipDirection {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy)]
struct PendingFlip {
    target: usize,
    due: Instant,
}

#[derive(Debug)]
pub struct Navigator {
    total_slots: usize,
    current_slot: usize,
    pending: Option<PendingFlip>,
}

impl Navigator {
    pub fn new(total_slots: usize) -> Self {
        Self {
            total_slots: total_slots.max(1),
            current_slot: 0,
            pending: None,
        }
    }

    /// Synchronous, non-animated positioning for the startup restore path.
    /// Clamps, because the persisted value may predate a catalogue change.
    pub fn restore(&mut self, slot: usize) {
        self.current_slot = slot.min(self.total_slots - 1);
        self.pending = None;
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn current_slot(&self) -> usize {
        self.current_slot
    }

    pub fn is_flipping(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_go_next(&self) -> bool {
        self.current_slot + 1 < self.total_slots
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_slot > 0
    }

    /// Step one slot forward or back. Returns whether the request was
    /// accepted.
    pub fn flip(&mut self, direction: FlipDirection, now: Instant, duration: Duration) -> bool {
        let target = match direction {
            FlipDirection::Next => self.current_slot + 1,
            FlipDirection::Prev => match self.current_slot.checked_sub(1) {
                Some(slot) => slot,
                None => return false,
            },
        };
        self.request(target, now, duration)
    }

    pub fn go_to_slot(&mut self, slot: usize, now: Instant, duration: Duration) -> bool {
        self.request(slot, now, duration)
    }

    /// Jump by logical page number, mapped through the atlas. Bounds are
    /// checked on the resulting slot, same as `go_to_slot`.
    pub fn go_to_page(
        &mut self,
        page: u32,
        atlas: &PageAtlas,
        now: Instant,
        duration: Duration,
    ) -> bool {
        self.request(atlas.slot_for_page(page), now, duration)
    }

    pub fn first(&mut self, now: Instant, duration: Duration) -> bool {
        self.request(0, now, duration)
    }

    pub fn last(&mut self, now: Instant, duration: Duration) -> bool {
        self.request(self.total_slots - 1, now, duration)
    }

    fn request(&mut self, target: usize, now: Instant, duration: Duration) -> bool {
        if self.pending.is_some() {
            return false;
        }
        if target >= self.total_slots || target == self.current_slot {
            return false;
        }
        debug!(
            "flip requested: {} -> {} ({}ms)",
            self.current_slot,
            target,
            duration.as_millis()
        );
        self.pending = Some(PendingFlip {
            target,
            due: now + duration,
        });
        true
    }

    /// Commit the pending flip once its deadline has passed. Returns the
    /// newly committed slot exactly once, so the caller can persist it and
    /// kick off preloading.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        self.current_slot = pending.target;
        debug!("flip committed: slot {}", pending.target);
        Some(pending.target)
    }

    /// Drop a pending flip without committing it. Used on teardown so a
    /// deferred commit cannot land after the owner is gone.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLIP: Duration = Duration::from_millis(800);

    fn nav(total_slots: usize) -> Navigator {
        Navigator::new(total_slots)
    }

    #[test]
    fn starts_idle_at_slot_zero() {
        let nav = nav(341);
        assert_eq!(nav.current_slot(), 0);
        assert!(!nav.is_flipping());
        assert!(nav.can_go_next());
        assert!(!nav.can_go_prev());
    }

    #[test]
    fn flip_next_commits_after_deadline() {
        let mut nav = nav(341);
        let start = Instant::now();
        assert!(nav.flip(FlipDirection::Next, start, FLIP));
        assert!(nav.is_flipping());
        assert_eq!(nav.current_slot(), 0);

        assert_eq!(nav.tick(start + Duration::from_millis(799)), None);
        assert_eq!(nav.tick(start + FLIP), Some(1));
        assert_eq!(nav.current_slot(), 1);
        assert!(!nav.is_flipping());
        // The commit is reported once.
        assert_eq!(nav.tick(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn requests_during_flip_are_dropped() {
        let mut nav = nav(341);
        let start = Instant::now();
        assert!(nav.flip(FlipDirection::Next, start, FLIP));
        assert!(!nav.flip(FlipDirection::Next, start, FLIP));
        assert!(!nav.go_to_slot(200, start, FLIP));
        assert!(!nav.first(start, FLIP));
        assert!(!nav.last(start, FLIP));

        // The original request wins; nothing was queued behind it.
        assert_eq!(nav.tick(start + FLIP), Some(1));
        assert_eq!(nav.current_slot(), 1);
    }

    #[test]
    fn flip_prev_at_start_is_rejected() {
        let mut nav = nav(341);
        let now = Instant::now();
        assert!(!nav.flip(FlipDirection::Prev, now, FLIP));
        assert!(!nav.is_flipping());
        assert_eq!(nav.current_slot(), 0);
    }

    #[test]
    fn flip_next_at_end_is_rejected() {
        let mut nav = nav(3);
        nav.restore(2);
        let now = Instant::now();
        assert!(!nav.can_go_next());
        assert!(!nav.flip(FlipDirection::Next, now, FLIP));
        assert_eq!(nav.current_slot(), 2);
    }

    #[test]
    fn go_to_slot_out_of_bounds_is_rejected() {
        let mut nav = nav(348);
        let now = Instant::now();
        assert!(!nav.go_to_slot(348, now, FLIP));
        assert!(!nav.go_to_slot(usize::MAX, now, FLIP));
        assert!(!nav.is_flipping());
        assert_eq!(nav.current_slot(), 0);
    }

    #[test]
    fn go_to_current_slot_is_rejected() {
        let mut nav = nav(341);
        nav.restore(5);
        let now = Instant::now();
        assert!(!nav.go_to_slot(5, now, FLIP));
        assert!(!nav.is_flipping());
    }

    #[test]
    fn go_to_page_maps_through_atlas() {
        let atlas = PageAtlas::sevki_mushaf();
        let mut nav = nav(atlas.total_slots());
        let now = Instant::now();
        assert!(nav.go_to_page(9, &atlas, now, FLIP));
        assert_eq!(nav.tick(now + FLIP), Some(4));
        assert_eq!(nav.current_slot(), atlas.slot_for_page(9));
    }

    #[test]
    fn last_from_first_slot() {
        // The end-to-end scenario on a synthetic 348-slot catalogue.
        let mut nav = nav(348);
        let now = Instant::now();
        assert!(nav.last(now, FLIP));
        assert_eq!(nav.tick(now + FLIP), Some(347));
        assert_eq!(nav.current_slot(), 347);
        assert!(!nav.can_go_next());
        assert!(nav.can_go_prev());
    }

    #[test]
    fn can_go_next_false_only_on_last_slot() {
        let mut nav = nav(348);
        for slot in 0..348 {
            nav.restore(slot);
            assert_eq!(nav.can_go_next(), slot != 347);
            assert_eq!(nav.can_go_prev(), slot != 0);
        }
    }

    #[test]
    fn restore_clamps_stale_slot() {
        let mut nav = nav(341);
        nav.restore(10_000);
        assert_eq!(nav.current_slot(), 340);
    }

    #[test]
    fn cancel_pending_prevents_stale_commit() {
        let mut nav = nav(341);
        let now = Instant::now();
        assert!(nav.flip(FlipDirection::Next, now, FLIP));
        nav.cancel_pending();
        assert!(!nav.is_flipping());
        assert_eq!(nav.tick(now + Duration::from_secs(5)), None);
        assert_eq!(nav.current_slot(), 0);
    }

    #[test]
    fn zero_duration_commits_on_next_tick() {
        let mut nav = nav(341);
        let now = Instant::now();
        assert!(nav.go_to_slot(7, now, Duration::ZERO));
        assert_eq!(nav.tick(now), Some(7));
    }
}
