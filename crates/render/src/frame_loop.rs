use crate::renderer::Renderer;
use mediawall_kernel::{FrameSnapshot, Navigator, Wall};
use std::time::Duration;

/// Why the host could not schedule another frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("render surface is gone")]
    SurfaceGone,
    #[error("host refused to schedule a frame: {0}")]
    Host(String),
}

/// The display-refresh source: asks the host for one more frame callback.
pub trait FrameHost {
    fn request_frame(&mut self) -> Result<(), ScheduleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Rolling frame-delta history.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.history[..count].iter().sum();
        total / count as u32
    }

    pub fn max(&self) -> Duration {
        self.history[..self.count()]
            .iter()
            .copied()
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

/// Loop instrumentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStats {
    pub frames: u64,
    pub average_dt: Duration,
    pub max_dt: Duration,
}

/// Drives a wall once per display refresh.
///
/// Each callback computes `dt` from the previous timestamp, steps the wall,
/// and asks the host for the next frame. The loop never holds the wall;
/// callers lend it per frame, so stopping the loop leaves nothing referencing
/// wall state.
pub struct RenderLoop<H: FrameHost> {
    host: H,
    state: LoopState,
    last_timestamp: Option<Duration>,
    timer: FrameTimer,
    frames: u64,
}

impl<H: FrameHost> RenderLoop<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: LoopState::Idle,
            last_timestamp: None,
            timer: FrameTimer::new(120),
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn stats(&self) -> LoopStats {
        LoopStats {
            frames: self.frames,
            average_dt: self.timer.average(),
            max_dt: self.timer.max(),
        }
    }

    /// Request the first frame. Only an idle loop can start.
    pub fn start(&mut self) -> Result<(), ScheduleError> {
        if self.state != LoopState::Idle {
            return Ok(());
        }
        self.state = LoopState::Running;
        if let Err(e) = self.host.request_frame() {
            self.halt(&e);
            return Err(e);
        }
        tracing::info!("render loop started");
        Ok(())
    }

    /// Frame callback: step the wall and schedule the next frame. Returns
    /// `None` once the loop is not running.
    pub fn advance<N: Navigator>(
        &mut self,
        timestamp: Duration,
        wall: &mut Wall<N>,
    ) -> Option<FrameSnapshot> {
        if self.state != LoopState::Running {
            return None;
        }
        let dt = match self.last_timestamp {
            Some(last) => timestamp.saturating_sub(last),
            None => Duration::ZERO,
        };
        self.last_timestamp = Some(timestamp);
        self.timer.record(dt);
        self.frames += 1;

        let snapshot = wall.step(dt.as_secs_f32());
        tracing::trace!(frame = self.frames, dt = dt.as_secs_f32(), "frame");

        if let Err(e) = self.host.request_frame() {
            self.halt(&e);
        }
        Some(snapshot)
    }

    /// [`advance`](Self::advance) and hand the frame to `renderer`.
    pub fn frame<N: Navigator, R: Renderer>(
        &mut self,
        timestamp: Duration,
        wall: &mut Wall<N>,
        renderer: &R,
    ) -> Option<R::Output> {
        let snapshot = self.advance(timestamp, wall)?;
        Some(renderer.render(&snapshot, wall.layout()))
    }

    /// Stop scheduling. Callbacks already queued by the host become no-ops.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.last_timestamp = None;
        tracing::info!(frames = self.frames, "render loop stopped");
    }

    /// Stop and give the host back.
    pub fn teardown(mut self) -> H {
        self.stop();
        self.host
    }

    fn halt(&mut self, error: &ScheduleError) {
        tracing::warn!("cannot schedule next frame: {error}; stopping render loop");
        self.stop();
    }
}
