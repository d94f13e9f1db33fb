//! Deferred work scheduled against a scene's frame clock.
//!
//! Tasks are only ever run from inside a frame step, when the clock reaches
//! their due time, so they observe the same single-threaded ordering as the
//! rest of the frame. A paused scene does not advance its clock, so nothing
//! comes due while paused.
//!
//! Times are `f64` seconds: the clock is a running sum of frame deltas and
//! must stay exact enough over long sessions that a delay of N frames fires
//! on the Nth frame.

/// Slack allowed when comparing a due time against the clock, absorbing
/// rounding in the summed frame deltas.
const DUE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due: f64,
    seq: u64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    pending: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run once the clock reaches `due`.
    pub fn schedule(&mut self, due: f64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due, seq, task });
    }

    /// Remove and return every task due at or before `now`, earliest first.
    /// Tasks with equal due times come out in scheduling order.
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|s| s.due <= now + DUE_TOLERANCE);
        self.pending = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|s| s.due).min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancel everything still pending.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_runs_before_due() {
        let mut q = DeferredQueue::new();
        q.schedule(1.0, "a");
        assert!(q.drain_due(0.5).is_empty());
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_due(1.0), vec!["a"]);
        assert!(q.is_empty());
    }

    #[test]
    fn drains_in_due_then_schedule_order() {
        let mut q = DeferredQueue::new();
        q.schedule(2.0, 'c');
        q.schedule(1.0, 'a');
        q.schedule(1.0, 'b');
        q.schedule(5.0, 'z');
        assert_eq!(q.next_due(), Some(1.0));
        assert_eq!(q.drain_due(3.0), vec!['a', 'b', 'c']);
        assert_eq!(q.next_due(), Some(5.0));
    }

    #[test]
    fn summed_frames_reach_due_on_time() {
        let mut q = DeferredQueue::new();
        let frame = 1.0 / 60.0;
        let mut clock = 0.0f64;
        for _ in 0..1000 {
            clock += frame;
        }
        q.schedule(clock + 1.0, ());
        for _ in 0..59 {
            clock += frame;
            assert!(q.drain_due(clock).is_empty());
        }
        clock += frame;
        assert_eq!(q.drain_due(clock).len(), 1);
    }

    #[test]
    fn one_second_is_sixty_frames_hours_in() {
        let frame = f64::from(1.0f32 / 60.0);
        let mut q = DeferredQueue::new();
        let mut clock = 7200.0;
        q.schedule(clock + 1.0, ());
        let mut frames = 0;
        while q.drain_due(clock).is_empty() {
            clock += frame;
            frames += 1;
        }
        assert_eq!(frames, 60);
    }

    #[test]
    fn clear_cancels_pending() {
        let mut q = DeferredQueue::new();
        q.schedule(0.0, 1);
        q.clear();
        assert!(q.drain_due(10.0).is_empty());
    }
}
