use std::rc::{Rc, Weak};

/// Identifier of a scheduled timer, unique per scheduler.
pub type TimerId = u64;

/// Keeps a cancellable timer alive. Dropping the handle cancels the timer.
///
/// Handles are `!Send`: the scheduler and every handle it hands out live on
/// one thread.
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    _alive: Rc<()>,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Cancel explicitly. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

#[derive(Debug)]
struct Entry<A> {
    id: TimerId,
    due: f64,
    interval: Option<f64>,
    action: A,
    /// `None` for fire-and-forget timers.
    guard: Option<Weak<()>>,
}

impl<A> Entry<A> {
    fn is_live(&self) -> bool {
        self.guard.as_ref().is_none_or(|g| g.strong_count() > 0)
    }
}

/// Frame-quantized timer queue.
///
/// Time only moves when [`Scheduler::advance`] is called, so a timer fires on
/// the first advance that reaches its due time, never earlier.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: f64,
    next_id: TimerId,
    entries: Vec<Entry<A>>,
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Seconds elapsed since the scheduler was created.
    pub fn now(&self) -> f64 {
        self.now
    }

    fn push(
        &mut self,
        delay: f32,
        interval: Option<f32>,
        action: A,
        guarded: bool,
    ) -> (TimerId, Option<Rc<()>>) {
        let id = self.next_id;
        self.next_id += 1;
        let alive = guarded.then(|| Rc::new(()));
        self.entries.push(Entry {
            id,
            due: self.now + f64::from(delay.max(0.0)),
            interval: interval.map(|i| f64::from(i.max(f32::EPSILON))),
            action,
            guard: alive.as_ref().map(Rc::downgrade),
        });
        (id, alive)
    }

    /// Fire `action` once after `delay` seconds. Cannot be cancelled.
    pub fn schedule_once(&mut self, delay: f32, action: A) -> TimerId {
        self.push(delay, None, action, false).0
    }

    /// Fire `action` once after `delay` seconds unless the handle is dropped first.
    pub fn schedule(&mut self, delay: f32, action: A) -> TimerHandle {
        let (id, alive) = self.push(delay, None, action, true);
        TimerHandle {
            id,
            _alive: alive.unwrap_or_default(),
        }
    }

    /// Fire `action` every `interval` seconds until the handle is dropped.
    pub fn schedule_repeating(&mut self, interval: f32, action: A) -> TimerHandle {
        let (id, alive) = self.push(interval, Some(interval), action, true);
        TimerHandle {
            id,
            _alive: alive.unwrap_or_default(),
        }
    }

    /// Move the clock forward and return the actions that came due, ordered
    /// by due time then by scheduling order. Repeating timers fire at most
    /// once per advance; if the frame was long enough to miss several
    /// intervals they are coalesced.
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        self.now += f64::from(dt.max(0.0));
        self.entries.retain(Entry::is_live);

        let now = self.now;
        let mut due: Vec<(f64, TimerId, A)> = Vec::new();
        for entry in &mut self.entries {
            if entry.due > now {
                continue;
            }
            due.push((entry.due, entry.id, entry.action.clone()));
            if let Some(interval) = entry.interval {
                entry.due += interval;
                if entry.due <= now {
                    entry.due = now + interval;
                }
            }
        }
        self.entries.retain(|e| e.interval.is_some() || e.due > now);

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, action)| action).collect()
    }

    /// Number of timers that can still fire.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_live()).count()
    }

    /// Number of live timers whose action matches `pred`.
    pub fn live_count_where(&self, pred: impl Fn(&A) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|e| e.is_live() && pred(&e.action))
            .count()
    }
}

impl<A: Clone> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_fires_after_delay_and_only_once() {
        let mut sched = Scheduler::new();
        sched.schedule_once(0.1, "ouch");
        assert!(sched.advance(0.05).is_empty());
        assert_eq!(sched.advance(0.05), vec!["ouch"]);
        assert!(sched.advance(1.0).is_empty());
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn dropping_handle_cancels() {
        let mut sched = Scheduler::new();
        let handle = sched.schedule(1.0, "decay");
        assert_eq!(sched.live_count(), 1);
        drop(handle);
        assert_eq!(sched.live_count(), 0);
        assert!(sched.advance(2.0).is_empty());
    }

    #[test]
    fn replacing_handle_debounces() {
        let mut sched = Scheduler::new();
        let first = sched.schedule(1.0, "reset");
        sched.advance(0.6);
        let _second = sched.schedule(1.0, "reset");
        drop(first);
        assert!(sched.advance(0.6).is_empty(), "first timer was replaced");
        assert_eq!(sched.advance(0.5), vec!["reset"]);
    }

    #[test]
    fn repeating_fires_each_interval() {
        let mut sched = Scheduler::new();
        let _handle = sched.schedule_repeating(3.0, "spawn");
        let mut fired = 0;
        for _ in 0..600 {
            fired += sched.advance(1.0 / 60.0).len();
        }
        // 10 seconds of frames
        assert_eq!(fired, 3);
        assert_eq!(sched.live_count(), 1);
    }

    #[test]
    fn repeating_coalesces_long_frames() {
        let mut sched = Scheduler::new();
        let _handle = sched.schedule_repeating(1.0, "spawn");
        assert_eq!(sched.advance(5.0).len(), 1);
        assert!(sched.advance(0.5).is_empty());
        assert_eq!(sched.advance(0.5).len(), 1);
    }

    #[test]
    fn actions_ordered_by_due_time() {
        let mut sched = Scheduler::new();
        sched.schedule_once(1.0, "restore");
        sched.schedule_once(0.1, "knockback");
        assert_eq!(sched.advance(2.0), vec!["knockback", "restore"]);
    }

    #[test]
    fn live_count_where_filters() {
        let mut sched = Scheduler::new();
        let _a = sched.schedule_repeating(3.0, 1);
        let _b = sched.schedule_repeating(3.0, 1);
        sched.schedule_once(1.0, 2);
        assert_eq!(sched.live_count_where(|a| *a == 1), 2);
        assert_eq!(sched.live_count(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn live_count_matches_held_handles(
                steps in proptest::collection::vec((0u8..4, 0.0f32..2.0), 1..100),
            ) {
                let mut sched = Scheduler::new();
                let mut held: Vec<TimerHandle> = Vec::new();
                for (op, dt) in steps {
                    match op {
                        0 => held.push(sched.schedule_repeating(dt.max(0.1), ())),
                        1 if !held.is_empty() => {
                            held.remove(0);
                        },
                        _ => {
                            let fired = sched.advance(dt);
                            prop_assert!(fired.len() <= held.len());
                        },
                    }
                    prop_assert_eq!(sched.live_count(), held.len());
                }
                held.clear();
                prop_assert!(sched.advance(10.0).is_empty());
                prop_assert_eq!(sched.live_count(), 0);
            }
        }
    }
}
