//! Deferred work driven by the surrounding frame loop.
//!
//! Placement calls sometimes need to wait for the next frame or for a short delay
//! after an event. The scheduler only stores tasks and reports which ones are due;
//! running them is the caller's job.

struct Scheduled<T> {
    due: f64,
    seq: u64,
    task: T,
}

/// FIFO queue of tasks keyed by the time they become due.
pub struct FrameScheduler<T> {
    queue: Vec<Scheduled<T>>,
    now: f64,
    next_seq: u64,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            now: 0.0,
            next_seq: 0,
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` on the next call to [`tick`](Self::tick).
    pub fn next_tick(&mut self, task: T) {
        self.after(0.0, task);
    }

    /// Runs `task` on the first tick at least `seconds` from now. Negative or non-finite
    /// delays behave like [`next_tick`](Self::next_tick).
    pub fn after(&mut self, seconds: f32, task: T) {
        let delay = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.queue.push(Scheduled {
            due: self.now + f64::from(delay),
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Advances the clock by `dt` seconds and returns due tasks, earliest first and in
    /// scheduling order among equally due tasks.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) = self.queue.drain(..).partition(|s| s.due <= now);
        self.queue = rest;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.task).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Seconds accumulated by [`tick`](Self::tick).
    pub fn elapsed(&self) -> f64 {
        self.now
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
