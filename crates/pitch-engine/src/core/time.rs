/// Fixed timestep accumulator.
/// Drives the drag integrator at a constant rate regardless of frame time,
/// so the spring feels the same at 30 and 144 fps.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    /// Cap on steps per frame after a stall (tab switch, breakpoint).
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * Self::MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any partial step (used when a drag starts, so the first move
    /// doesn't inherit time from the idle period).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Delayed work, advanced by the host's frame clock.
///
/// There are no OS timers: `advance` is fed the same `dt` as the board tick
/// and hands back every task whose delay has elapsed, oldest deadline first.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: f32,
    pending: Vec<(f32, T)>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            pending: Vec::new(),
        }
    }

    /// Run `task` once `delay` seconds of frame time have passed.
    pub fn schedule(&mut self, delay: f32, task: T) {
        let due = self.now + delay.max(0.0);
        // Stable insert keeps equal deadlines in submission order.
        let idx = self.pending.partition_point(|(d, _)| *d <= due);
        self.pending.insert(idx, (due, task));
    }

    /// Advance the clock and return the tasks that became due.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        self.now += dt.max(0.0);
        let ready = self.pending.partition_point(|(d, _)| *d <= self.now);
        let due = self.pending.drain(..ready).map(|(_, task)| task).collect();
        self.rewind_if_idle();
        due
    }

    /// Drop pending tasks matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        self.pending.retain(|(_, task)| !pred(task));
        self.rewind_if_idle();
    }

    /// Restart the clock once nothing is pending; deadlines stay near zero.
    fn rewind_if_idle(&mut self) {
        if self.pending.is_empty() {
            self.now = 0.0;
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
