use std::time::Instant;

use pattern::{Click, ClickRing, TouchTrail};
use pixelconfig::PixelBlastConfig;
use rand::prelude::*;
use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, Frame, FrameError, RenderBackend, RenderSurface};
use crate::metrics::{ContainerSize, SurfaceMetrics};
use crate::uniforms::UniformState;

/// Initialisation polls allowed before giving up on a zero-sized container.
pub const MAX_INIT_ATTEMPTS: u32 = 100;
const TIME_OFFSET_RANGE: f32 = 1000.0;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("container still has no dimensions after {attempts} attempts")]
    NoDimensions { attempts: u32 },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized { attempts: u32 },
    Live,
    /// Initialisation was abandoned. The host keeps running without a surface.
    Failed,
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOutcome {
    /// Stored for the next initialisation; nothing is live to update.
    Deferred,
    Rebuilt,
    Patched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Initializing,
    Rendered,
    Paused,
    Skipped,
    ContextLost,
    Failed,
    Detached,
}

/// Single owner of a render surface and all state that feeds it.
pub struct Lifecycle<B: RenderBackend> {
    backend: B,
    surface: Option<B::Surface>,
    phase: Phase,
    config: PixelBlastConfig,
    container: ContainerSize,
    device_pixel_ratio: f64,
    metrics: Option<SurfaceMetrics>,
    visible: bool,
    uniforms: UniformState,
    clicks: ClickRing,
    trail: Option<TouchTrail>,
    last_tick: Option<Instant>,
    last_error: Option<InitError>,
    rng: StdRng,
}

impl<B: RenderBackend> Lifecycle<B> {
    pub fn new(backend: B, config: PixelBlastConfig) -> Self {
        Self::with_rng(backend, config, StdRng::from_entropy())
    }

    /// Deterministic time offsets for tests and still exports.
    pub fn with_seed(backend: B, config: PixelBlastConfig, seed: u64) -> Self {
        Self::with_rng(backend, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(backend: B, config: PixelBlastConfig, rng: StdRng) -> Self {
        let uniforms = UniformState::from_config(&config, 0.0);
        Self {
            backend,
            surface: None,
            phase: Phase::Uninitialized { attempts: 0 },
            config,
            container: ContainerSize::default(),
            device_pixel_ratio: 1.0,
            metrics: None,
            visible: true,
            uniforms,
            clicks: ClickRing::new(),
            trail: None,
            last_tick: None,
            last_error: None,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase == Phase::Live
    }

    pub fn config(&self) -> &PixelBlastConfig {
        &self.config
    }

    pub fn uniforms(&self) -> &UniformState {
        &self.uniforms
    }

    pub fn metrics(&self) -> Option<&SurfaceMetrics> {
        self.metrics.as_ref()
    }

    pub fn clicks(&self) -> &ClickRing {
        &self.clicks
    }

    pub fn trail(&self) -> Option<&TouchTrail> {
        self.trail.as_ref()
    }

    pub fn surface(&self) -> Option<&B::Surface> {
        self.surface.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn last_error(&self) -> Option<&InitError> {
        self.last_error.as_ref()
    }

    /// Makes one initialisation attempt if the surface is not live yet.
    pub fn poll_initialize(&mut self) -> Phase {
        let Phase::Uninitialized { attempts } = self.phase else {
            return self.phase;
        };
        let attempts = attempts + 1;

        let Some(metrics) =
            SurfaceMetrics::compute(self.container, self.device_pixel_ratio, self.config.pixel_size)
        else {
            if attempts >= MAX_INIT_ATTEMPTS {
                let err = InitError::NoDimensions { attempts };
                error!(
                    width = self.container.width,
                    height = self.container.height,
                    "{err}"
                );
                self.fail(err);
            } else {
                debug!(attempt = attempts, "waiting for container dimensions");
                self.phase = Phase::Uninitialized { attempts };
            }
            return self.phase;
        };

        match self.backend.create_surface(&self.config, &metrics) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.metrics = Some(metrics);
                let offset = self.rng.gen_range(0.0..TIME_OFFSET_RANGE);
                self.uniforms = UniformState::from_config(&self.config, offset);
                self.uniforms.apply_metrics(&metrics);
                self.clicks.clear();
                self.trail = self
                    .config
                    .liquid
                    .then(|| TouchTrail::new(self.config.liquid_radius));
                self.last_tick = None;
                self.phase = Phase::Live;
                info!(
                    width = metrics.width,
                    height = metrics.height,
                    ratio = metrics.ratio,
                    variant = %self.config.variant,
                    liquid = self.config.liquid,
                    noise = self.config.noise_enabled(),
                    "pixelblast surface live"
                );
            }
            Err(err) => {
                error!("failed to initialise pixelblast surface: {err}");
                self.fail(err.into());
            }
        }
        self.phase
    }

    fn fail(&mut self, err: InitError) {
        self.last_error = Some(err);
        self.phase = Phase::Failed;
    }

    fn release_surface(&mut self) {
        if let Some(surface) = self.surface.take() {
            surface.release();
        }
        self.metrics = None;
    }

    /// Replaces the current configuration, rebuilding GPU resources only when a
    /// structural key changed.
    pub fn apply_configuration(&mut self, config: PixelBlastConfig) -> ConfigOutcome {
        let previous = std::mem::replace(&mut self.config, config);
        if self.phase != Phase::Live {
            debug!(phase = ?self.phase, "configuration stored until the surface is live");
            self.uniforms.apply_dynamic(&self.config);
            return ConfigOutcome::Deferred;
        }

        if self.config.requires_rebuild(&previous) {
            debug!(
                from = ?previous.structural_key(),
                to = ?self.config.structural_key(),
                "structural change; rebuilding surface"
            );
            self.release_surface();
            self.phase = Phase::Uninitialized { attempts: 0 };
            self.poll_initialize();
            ConfigOutcome::Rebuilt
        } else {
            debug!("patching live uniforms");
            self.uniforms.apply_dynamic(&self.config);
            if let Some(metrics) = self.metrics.as_mut() {
                metrics.pixel_size = self.uniforms.pixel_size;
            }
            if let Some(trail) = self.trail.as_mut() {
                trail.set_radius_scale(self.config.liquid_radius);
            }
            ConfigOutcome::Patched
        }
    }

    /// Records a new container size; a live surface is resized before the next frame.
    pub fn resize(&mut self, container: ContainerSize, device_pixel_ratio: f64) {
        if self.phase == Phase::Detached {
            return;
        }
        if self.phase != Phase::Live {
            self.container = container;
            self.device_pixel_ratio = device_pixel_ratio;
            return;
        }
        // a live surface keeps its last non-empty container, which pointer
        // mapping divides by
        let Some(metrics) = SurfaceMetrics::compute(container, device_pixel_ratio, self.config.pixel_size)
        else {
            debug!(
                width = container.width,
                height = container.height,
                "ignoring resize to an empty container"
            );
            return;
        };
        self.container = container;
        self.device_pixel_ratio = device_pixel_ratio;
        if self.metrics == Some(metrics) {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(&metrics);
        }
        self.uniforms.apply_metrics(&metrics);
        self.metrics = Some(metrics);
        debug!(width = metrics.width, height = metrics.height, ratio = metrics.ratio, "surface resized");
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Stamps a click at container coordinates with the current uniform time.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.phase != Phase::Live {
            return;
        }
        let Some(metrics) = self.metrics else {
            return;
        };
        let position = metrics.to_device(self.container, x, y);
        self.clicks.push(Click {
            position,
            time: self.uniforms.time,
        });
    }

    /// Feeds the touch trail while the liquid pass is live.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.phase != Phase::Live {
            return;
        }
        let (Some(metrics), Some(trail)) = (self.metrics, self.trail.as_mut()) else {
            return;
        };
        let device = metrics.to_device(self.container, x, y);
        trail.add_sample([device[0] / metrics.width as f32, device[1] / metrics.height as f32]);
    }

    /// Advances time and renders one frame, initialising first if needed.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        match self.phase {
            Phase::Detached => return TickOutcome::Detached,
            Phase::Failed => return TickOutcome::Failed,
            Phase::Uninitialized { .. } => {
                if self.poll_initialize() != Phase::Live {
                    return match self.phase {
                        Phase::Failed => TickOutcome::Failed,
                        _ => TickOutcome::Initializing,
                    };
                }
            }
            Phase::Live => {}
        }

        let elapsed = self
            .last_tick
            .map(|previous| now.saturating_duration_since(previous).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        if self.config.auto_pause_offscreen && !self.visible {
            return TickOutcome::Paused;
        }

        self.uniforms.time += elapsed * self.config.speed;
        if let Some(trail) = self.trail.as_mut() {
            trail.update();
        }

        let Some(surface) = self.surface.as_mut() else {
            return TickOutcome::Skipped;
        };
        let frame = Frame {
            uniforms: &self.uniforms,
            clicks: &self.clicks,
            trail: self.trail.as_ref().map(TouchTrail::raster),
        };
        match surface.render(&frame) {
            Ok(()) => TickOutcome::Rendered,
            Err(FrameError::Lost) => {
                warn!("render context lost; rebuilding on the next frame");
                self.release_surface();
                self.phase = Phase::Uninitialized { attempts: 0 };
                TickOutcome::ContextLost
            }
            Err(err) => {
                warn!("{err}");
                TickOutcome::Skipped
            }
        }
    }

    /// Releases the surface, then detaches input. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if self.phase == Phase::Detached {
            return;
        }
        self.release_surface();
        self.trail = None;
        self.backend.detach();
        self.phase = Phase::Detached;
        info!("pixelblast surface torn down");
    }

    /// Tears down and hands the backend back to the caller.
    pub fn into_backend(mut self) -> B {
        self.teardown();
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use pixelconfig::{Rgb, StructuralKey, Variant};

    use super::*;

    #[derive(Debug, Default)]
    struct Log {
        created: Vec<(u32, StructuralKey)>,
        released: Vec<u32>,
        resized: Vec<(u32, u32)>,
        rendered: Vec<(u32, f32, bool)>,
        detached: u32,
        events: Vec<&'static str>,
        lose_next_frame: bool,
    }

    struct MockBackend {
        log: Rc<RefCell<Log>>,
        next_id: u32,
        fail: bool,
    }

    struct MockSurface {
        id: u32,
        log: Rc<RefCell<Log>>,
    }

    impl MockBackend {
        fn new() -> (Self, Rc<RefCell<Log>>) {
            let log = Rc::new(RefCell::new(Log::default()));
            let backend = Self {
                log: log.clone(),
                next_id: 0,
                fail: false,
            };
            (backend, log)
        }
    }

    impl RenderBackend for MockBackend {
        type Surface = MockSurface;

        fn create_surface(
            &mut self,
            config: &PixelBlastConfig,
            _metrics: &SurfaceMetrics,
        ) -> Result<MockSurface, BackendError> {
            if self.fail {
                return Err(BackendError::Adapter("mock".into()));
            }
            self.next_id += 1;
            let mut log = self.log.borrow_mut();
            log.created.push((self.next_id, config.structural_key()));
            log.events.push("create");
            Ok(MockSurface {
                id: self.next_id,
                log: self.log.clone(),
            })
        }

        fn detach(&mut self) {
            let mut log = self.log.borrow_mut();
            log.detached += 1;
            log.events.push("detach");
        }
    }

    impl RenderSurface for MockSurface {
        fn resize(&mut self, metrics: &SurfaceMetrics) {
            self.log.borrow_mut().resized.push((metrics.width, metrics.height));
        }

        fn render(&mut self, frame: &Frame<'_>) -> Result<(), FrameError> {
            let mut log = self.log.borrow_mut();
            if std::mem::take(&mut log.lose_next_frame) {
                return Err(FrameError::Lost);
            }
            log.rendered
                .push((self.id, frame.uniforms.time, frame.trail.is_some()));
            Ok(())
        }

        fn release(self) {
            let mut log = self.log.borrow_mut();
            log.released.push(self.id);
            log.events.push("release");
        }
    }

    fn live(config: PixelBlastConfig) -> (Lifecycle<MockBackend>, Rc<RefCell<Log>>) {
        let (backend, log) = MockBackend::new();
        let mut lifecycle = Lifecycle::with_seed(backend, config, 7);
        lifecycle.resize(ContainerSize::new(400.0, 300.0), 1.0);
        assert_eq!(lifecycle.poll_initialize(), Phase::Live);
        (lifecycle, log)
    }

    fn surface_id(lifecycle: &Lifecycle<MockBackend>) -> Option<u32> {
        lifecycle.surface().map(|surface| surface.id)
    }

    #[test]
    fn dynamic_changes_keep_the_surface() {
        let (mut lifecycle, log) = live(PixelBlastConfig::default());
        let before = surface_id(&lifecycle);

        let mut next = lifecycle.config().clone();
        next.variant = Variant::Diamond;
        next.color = Rgb::new(0.2, 0.4, 0.6);
        next.speed = 2.0;
        next.ripple_thickness = 0.3;
        next.noise_amount = 0.0;
        assert_eq!(lifecycle.apply_configuration(next), ConfigOutcome::Patched);

        assert_eq!(surface_id(&lifecycle), before);
        assert_eq!(log.borrow().created.len(), 1);
        assert!(log.borrow().released.is_empty());
        assert_eq!(lifecycle.uniforms().variant, Variant::Diamond);
        assert_eq!(lifecycle.uniforms().ripple.thickness, 0.3);
    }

    #[test]
    fn structural_change_rebuilds_exactly_once() {
        let (mut lifecycle, log) = live(PixelBlastConfig::default());

        let mut next = lifecycle.config().clone();
        next.liquid = true;
        next.noise_amount = 0.2;
        assert_eq!(lifecycle.apply_configuration(next), ConfigOutcome::Rebuilt);

        let log = log.borrow();
        assert_eq!(log.released, vec![1]);
        assert_eq!(log.created.len(), 2);
        let (id, key) = log.created[1];
        assert_eq!(id, 2);
        assert!(key.liquid && key.noise && key.antialias);
        assert_eq!(log.events, vec!["create", "release", "create"]);
        drop(log);

        assert_eq!(surface_id(&lifecycle), Some(2));
        assert!(lifecycle.trail().is_some());
    }

    #[test]
    fn configuration_before_init_is_deferred() {
        let (backend, log) = MockBackend::new();
        let mut lifecycle = Lifecycle::with_seed(backend, PixelBlastConfig::default(), 1);
        let mut next = PixelBlastConfig::default();
        next.liquid = true;
        assert_eq!(lifecycle.apply_configuration(next), ConfigOutcome::Deferred);
        lifecycle.resize(ContainerSize::new(10.0, 10.0), 1.0);
        lifecycle.poll_initialize();
        assert!(log.borrow().created[0].1.liquid);
    }

    #[test]
    fn initialisation_gives_up_after_bounded_attempts() {
        let (backend, log) = MockBackend::new();
        let mut lifecycle = Lifecycle::with_seed(backend, PixelBlastConfig::default(), 1);
        for attempt in 1..MAX_INIT_ATTEMPTS {
            assert_eq!(
                lifecycle.poll_initialize(),
                Phase::Uninitialized { attempts: attempt }
            );
        }
        assert_eq!(lifecycle.poll_initialize(), Phase::Failed);
        assert!(matches!(
            lifecycle.last_error(),
            Some(InitError::NoDimensions { attempts: MAX_INIT_ATTEMPTS })
        ));
        // a late size does not revive a failed surface
        lifecycle.resize(ContainerSize::new(100.0, 100.0), 1.0);
        assert_eq!(lifecycle.tick(Instant::now()), TickOutcome::Failed);
        assert!(log.borrow().created.is_empty());
    }

    #[test]
    fn backend_failure_is_not_fatal() {
        let (mut backend, _log) = MockBackend::new();
        backend.fail = true;
        let mut lifecycle = Lifecycle::with_seed(backend, PixelBlastConfig::default(), 1);
        lifecycle.resize(ContainerSize::new(100.0, 100.0), 1.0);
        assert_eq!(lifecycle.poll_initialize(), Phase::Failed);
        assert!(matches!(lifecycle.last_error(), Some(InitError::Backend(_))));
        lifecycle.pointer_down(1.0, 1.0);
        assert!(lifecycle.clicks().is_empty());
        lifecycle.teardown();
    }

    #[test]
    fn first_live_tick_happens_once_dimensions_arrive() {
        let (backend, log) = MockBackend::new();
        let mut lifecycle = Lifecycle::with_seed(backend, PixelBlastConfig::default(), 3);
        let now = Instant::now();
        assert_eq!(lifecycle.tick(now), TickOutcome::Initializing);
        lifecycle.resize(ContainerSize::new(64.0, 64.0), 2.0);
        assert_eq!(lifecycle.tick(now), TickOutcome::Rendered);
        assert_eq!(log.borrow().rendered.len(), 1);
        let offset = lifecycle.uniforms().time;
        assert!((0.0..1000.0).contains(&offset));
        assert_eq!(lifecycle.uniforms().resolution, [128.0, 128.0]);
    }

    #[test]
    fn hidden_surface_does_not_advance_time() {
        let (mut lifecycle, log) = live(PixelBlastConfig::default());
        let start = Instant::now();
        lifecycle.tick(start);
        let t0 = lifecycle.uniforms().time;

        lifecycle.tick(start + Duration::from_secs(1));
        let t1 = lifecycle.uniforms().time;
        assert!((t1 - t0 - 0.5).abs() < 1e-3);

        lifecycle.set_visible(false);
        assert_eq!(lifecycle.tick(start + Duration::from_secs(2)), TickOutcome::Paused);
        assert_eq!(lifecycle.tick(start + Duration::from_secs(5)), TickOutcome::Paused);
        assert_eq!(lifecycle.uniforms().time, t1);

        lifecycle.set_visible(true);
        lifecycle.tick(start + Duration::from_secs(6));
        let t2 = lifecycle.uniforms().time;
        assert!((t2 - t1 - 0.5).abs() < 1e-3, "paused interval must not count");
        assert_eq!(log.borrow().rendered.len(), 3);
    }

    #[test]
    fn hidden_surface_keeps_running_without_auto_pause() {
        let config = PixelBlastConfig {
            auto_pause_offscreen: false,
            ..PixelBlastConfig::default()
        };
        let (mut lifecycle, _log) = live(config);
        let start = Instant::now();
        lifecycle.set_visible(false);
        lifecycle.tick(start);
        assert_eq!(
            lifecycle.tick(start + Duration::from_secs(2)),
            TickOutcome::Rendered
        );
    }

    #[test]
    fn speed_is_read_every_tick() {
        let (mut lifecycle, _log) = live(PixelBlastConfig::default());
        let start = Instant::now();
        lifecycle.tick(start);
        let t0 = lifecycle.uniforms().time;

        let mut reversed = lifecycle.config().clone();
        reversed.speed = -1.0;
        lifecycle.apply_configuration(reversed);
        lifecycle.tick(start + Duration::from_secs(2));
        assert!((lifecycle.uniforms().time - (t0 - 2.0)).abs() < 1e-3);
    }

    #[test]
    fn resize_updates_targets_and_uniforms_together() {
        let (mut lifecycle, log) = live(PixelBlastConfig::default());
        lifecycle.resize(ContainerSize::new(1000.0, 500.0), 3.0);
        assert_eq!(log.borrow().resized, vec![(2000, 1000)]);
        assert_eq!(lifecycle.uniforms().resolution, [2000.0, 1000.0]);
        assert_eq!(lifecycle.uniforms().pixel_size, 6.0);

        lifecycle.resize(ContainerSize::new(0.0, 0.0), 1.0);
        assert_eq!(log.borrow().resized.len(), 1);
        assert_eq!(lifecycle.uniforms().resolution, [2000.0, 1000.0]);
    }

    #[test]
    fn pointer_mapping_survives_an_empty_resize() {
        let (mut lifecycle, _log) = live(PixelBlastConfig::default());
        lifecycle.tick(Instant::now());
        lifecycle.resize(ContainerSize::new(0.0, 0.0), 1.0);
        lifecycle.pointer_down(100.0, 50.0);

        let click = *lifecycle.clicks().events().next().unwrap();
        assert!(click.position.iter().all(|v| v.is_finite()));
        assert_eq!(click.position, [100.0, 250.0]);
    }

    #[test]
    fn clicks_are_visible_to_the_next_tick() {
        let (mut lifecycle, _log) = live(PixelBlastConfig::default());
        let now = Instant::now();
        lifecycle.tick(now);
        lifecycle.pointer_down(100.0, 50.0);
        let click = *lifecycle.clicks().events().next().unwrap();
        assert_eq!(click.position, [100.0, 250.0]);
        assert_eq!(click.time, lifecycle.uniforms().time);
    }

    #[test]
    fn pointer_moves_only_feed_a_live_liquid_trail() {
        let (mut lifecycle, _log) = live(PixelBlastConfig::default());
        lifecycle.pointer_move(10.0, 10.0);
        assert!(lifecycle.trail().is_none());

        let config = PixelBlastConfig {
            liquid: true,
            liquid_radius: 1.5,
            ..PixelBlastConfig::default()
        };
        let (mut lifecycle, log) = live(config);
        lifecycle.pointer_move(200.0, 150.0);
        lifecycle.pointer_move(220.0, 150.0);
        let trail = lifecycle.trail().unwrap();
        assert_eq!(trail.particles().len(), 2);
        assert_eq!(trail.particles()[0].position, [0.5, 0.5]);

        let mut wider = lifecycle.config().clone();
        wider.liquid_radius = 3.0;
        assert_eq!(lifecycle.apply_configuration(wider), ConfigOutcome::Patched);
        assert_eq!(lifecycle.trail().unwrap().radius_scale(), 3.0);

        lifecycle.tick(Instant::now());
        assert!(log.borrow().rendered[0].2);
    }

    #[test]
    fn lost_context_rebuilds_on_the_next_tick() {
        let (mut lifecycle, log) = live(PixelBlastConfig::default());
        let now = Instant::now();
        lifecycle.pointer_down(5.0, 5.0);
        log.borrow_mut().lose_next_frame = true;
        assert_eq!(lifecycle.tick(now), TickOutcome::ContextLost);
        assert_eq!(log.borrow().released, vec![1]);
        assert!(lifecycle.surface().is_none());

        assert_eq!(lifecycle.tick(now), TickOutcome::Rendered);
        assert_eq!(surface_id(&lifecycle), Some(2));
        assert!(lifecycle.clicks().is_empty());
    }

    #[test]
    fn teardown_releases_then_detaches_once() {
        let (mut lifecycle, log) = live(PixelBlastConfig::default());
        lifecycle.teardown();
        lifecycle.teardown();
        assert_eq!(lifecycle.phase(), Phase::Detached);
        assert_eq!(log.borrow().events, vec!["create", "release", "detach"]);
        assert_eq!(lifecycle.tick(Instant::now()), TickOutcome::Detached);
        assert_eq!(
            lifecycle.apply_configuration(PixelBlastConfig::default()),
            ConfigOutcome::Deferred
        );

        let (backend, log) = MockBackend::new();
        let mut never_live = Lifecycle::with_seed(backend, PixelBlastConfig::default(), 1);
        never_live.teardown();
        never_live.teardown();
        assert_eq!(log.borrow().detached, 1);
        assert!(log.borrow().released.is_empty());
    }

    #[test]
    fn time_offsets_desynchronise_instances() {
        let (a, _) = MockBackend::new();
        let (b, _) = MockBackend::new();
        let mut first = Lifecycle::with_seed(a, PixelBlastConfig::default(), 1);
        let mut second = Lifecycle::with_seed(b, PixelBlastConfig::default(), 2);
        for lifecycle in [&mut first, &mut second] {
            lifecycle.resize(ContainerSize::new(10.0, 10.0), 1.0);
            lifecycle.poll_initialize();
        }
        assert_ne!(first.uniforms().time, second.uniforms().time);
    }
}
