//! The game core: one owned context and a single-threaded event dispatcher.
//!
//! All game state (session, creature, pickups, held input, hazard light, asset
//! readiness) lives in [`GameContext`]. Input, asset polling, the countdown
//! clock and the frame clock only *produce* [`GameEvent`]s; the dispatcher
//! applies them to the context strictly in arrival order and emits
//! [`GameSignal`]s for the presentation systems (UI, audio, animation).
//!
//! # Example
//! ```ignore
//! let mut ctx = GameContext::new(Settings::default(), StdRng::seed_from_u64(1));
//! ctx.dispatch(GameEvent::AssetReady(AssetKind::Model));
//! ctx.dispatch(GameEvent::StartRequested);
//! ctx.dispatch(GameEvent::FrameRendered);
//! ```
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::actor::{step_actor, Actor, Steering};
use crate::animation::{ActorClip, MotionEdge};
use crate::hazard::{compute_escalation, HazardLight};
use crate::input::{Direction, InputSource, InputState};
use crate::pickup::PickupPool;
use crate::session::{Session, TickOutcome};
use crate::settings::Settings;

pub use crate::assets::{AssetKind, AssetReadiness, AssetStatus};

/// Everything that can happen to the game.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A directional flag was pressed or released.
    InputChanged { direction: Direction, pressed: bool, source: InputSource },
    AssetReady(AssetKind),
    AssetFailed { kind: AssetKind, reason: String },
    /// One countdown step elapsed.
    TickElapsed,
    /// A display frame is about to be drawn.
    FrameRendered,
    StartRequested,
    Resized { width: f32, height: f32 },
    /// First touch seen on this device.
    TouchDetected,
}

/// Edges the presentation layer reacts to.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSignal {
    SessionStarted,
    SessionEnded { score: u32 },
    ClipChanged(ActorClip),
    ModelReady,
    TouchDetected,
}

/// Last known window size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Width over height, or `None` for a degenerate (minimised) window.
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

#[derive(Resource)]
pub struct GameContext {
    settings: Settings,
    session: Session,
    actor: Actor,
    pickups: PickupPool,
    input: InputState,
    motion: MotionEdge,
    hazard: HazardLight,
    assets: AssetReadiness,
    viewport: Viewport,
    touch_detected: bool,
    rng: StdRng,
    signals: Vec<GameSignal>,
}

impl GameContext {
    #[must_use]
    pub fn new(settings: Settings, rng: StdRng) -> Self {
        let hazard = compute_escalation(0.0, &settings.hazard);
        Self {
            session: Session::new(settings.session.duration_secs),
            actor: Actor::new(settings.actor.scale),
            pickups: PickupPool::default(),
            input: InputState::default(),
            motion: MotionEdge::default(),
            hazard,
            assets: AssetReadiness::default(),
            viewport: Viewport::default(),
            touch_detected: false,
            rng,
            signals: Vec::new(),
            settings,
        }
    }

    /// Context seeded from the OS RNG.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Self::new(settings, StdRng::from_entropy())
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    #[must_use]
    pub fn pickups(&self) -> &PickupPool {
        &self.pickups
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn hazard(&self) -> HazardLight {
        self.hazard
    }

    #[must_use]
    pub fn assets(&self) -> &AssetReadiness {
        &self.assets
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn touch_detected(&self) -> bool {
        self.touch_detected
    }

    /// The model has loaded; movement and camera only run once this holds.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.assets.status(AssetKind::Model) == AssetStatus::Ready
    }

    /// Replace the tuning. Takes effect on the next frame; session length and
    /// pickup count take effect on the next start.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.actor.scale = settings.actor.scale;
        self.hazard = compute_escalation(self.session.progress(), &settings.hazard);
        self.settings = settings;
    }

    /// Signals produced since the last drain, oldest first.
    pub fn drain_signals(&mut self) -> Vec<GameSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Apply one event.
    pub fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::InputChanged { direction, pressed, source } => self.on_input(direction, pressed, source),
            GameEvent::AssetReady(kind) => self.on_asset_ready(kind),
            GameEvent::AssetFailed { kind, reason } => self.on_asset_failed(kind, &reason),
            GameEvent::TickElapsed => self.on_tick(),
            GameEvent::FrameRendered => self.on_frame(),
            GameEvent::StartRequested => self.on_start(),
            GameEvent::Resized { width, height } => self.on_resize(width, height),
            GameEvent::TouchDetected => self.on_touch(),
        }
    }

    fn on_input(&mut self, direction: Direction, pressed: bool, source: InputSource) {
        if pressed && source == InputSource::Keyboard && !self.session.is_active() {
            return;
        }
        self.input.set(direction, pressed);
    }

    fn on_asset_ready(&mut self, kind: AssetKind) {
        if !self.assets.settle(kind, AssetStatus::Ready) {
            return;
        }
        debug!("asset ready: {kind:?}");
        if kind == AssetKind::Model {
            self.signals.push(GameSignal::ModelReady);
        }
    }

    fn on_asset_failed(&mut self, kind: AssetKind, reason: &str) {
        if !self.assets.settle(kind, AssetStatus::Failed) {
            return;
        }
        match kind {
            AssetKind::Model => error!("failed to load creature model, movement disabled: {reason}"),
            AssetKind::Music => warn!("failed to load music, playing without sound: {reason}"),
            _ => error!("failed to load {kind:?}: {reason}"),
        }
    }

    fn on_tick(&mut self) {
        match self.session.tick() {
            TickOutcome::Ignored => {}
            TickOutcome::Running { remaining } => {
                self.hazard = compute_escalation(self.session.progress(), &self.settings.hazard);
                debug!("countdown: {remaining}s");
            }
            TickOutcome::Expired => {
                self.hazard = compute_escalation(self.session.progress(), &self.settings.hazard);
                let score = self.session.score();
                info!("session ended, score {score}");
                self.signals.push(GameSignal::SessionEnded { score });
            }
        }
    }

    fn on_frame(&mut self) {
        if !self.session.is_active() || !self.is_ready() {
            return;
        }

        let actor = &self.settings.actor;
        let steering = Steering {
            move_speed: if self.touch_detected { actor.touch_move_speed } else { actor.move_speed },
            rotation_speed: actor.rotation_speed,
            half_extent: self.settings.arena.half_extent,
        };
        step_actor(&mut self.actor, &self.input, &steering);

        if let Some(clip) = self.motion.observe(self.input.is_moving()) {
            self.signals.push(GameSignal::ClipChanged(clip));
        }

        let collected = self.pickups.collect_near(
            self.actor.position,
            self.settings.pickups.collect_radius,
            self.settings.arena.spawn_extent,
            &mut self.rng,
        );
        if !collected.is_empty() {
            self.session.add_score(u32::try_from(collected.len()).unwrap_or(u32::MAX));
            debug!("collected {:?}, score {}", collected, self.session.score());
        }
    }

    fn on_start(&mut self) {
        if !self.session.start(self.settings.session.duration_secs) {
            debug!("start ignored: session already active");
            return;
        }
        self.hazard = compute_escalation(0.0, &self.settings.hazard);
        self.actor.position = Vec3::ZERO;
        self.pickups.repopulate(self.settings.pickups.count, self.settings.arena.spawn_extent, &mut self.rng);
        info!("session started: {}s, {} pickups", self.session.remaining(), self.pickups.len());
        self.signals.push(GameSignal::SessionStarted);
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport = Viewport { width, height };
    }

    fn on_touch(&mut self) {
        if self.touch_detected {
            return;
        }
        self.touch_detected = true;
        self.signals.push(GameSignal::TouchDetected);
    }

    #[cfg(test)]
    pub(crate) fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    #[cfg(test)]
    pub(crate) fn pickups_mut(&mut self) -> &mut PickupPool {
        &mut self.pickups
    }
}

/// Drives the countdown while a round is active.
#[derive(Resource)]
pub struct CountdownClock(pub Timer);

impl CountdownClock {
    #[must_use]
    pub fn new(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds.max(0.01), TimerMode::Repeating))
    }
}

/// Emit one `TickElapsed` per elapsed countdown step; restart on a new round.
#[allow(clippy::needless_pass_by_value)]
pub fn countdown_clock(
    time: Res<Time>,
    ctx: Res<GameContext>,
    mut clock: ResMut<CountdownClock>,
    mut signals: EventReader<GameSignal>,
    mut events: EventWriter<GameEvent>,
) {
    if signals.read().any(|s| *s == GameSignal::SessionStarted) {
        *clock = CountdownClock::new(ctx.settings().session.tick_seconds);
    }
    if !ctx.session().is_active() {
        return;
    }
    clock.0.tick(time.delta());
    for _ in 0..clock.0.times_finished_this_tick() {
        events.send(GameEvent::TickElapsed);
    }
}

/// One `FrameRendered` per app update.
pub fn frame_clock(mut events: EventWriter<GameEvent>) {
    events.send(GameEvent::FrameRendered);
}

/// Apply queued events in arrival order and publish the resulting signals.
pub fn dispatch_game_events(
    mut ctx: ResMut<GameContext>,
    mut events: EventReader<GameEvent>,
    mut signals: EventWriter<GameSignal>,
) {
    for event in events.read() {
        ctx.dispatch(event.clone());
    }
    for signal in ctx.drain_signals() {
        signals.send(signal);
    }
}

/// Feed hot-reloaded settings into the context.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_context_settings(settings: Res<Settings>, mut ctx: ResMut<GameContext>) {
    if settings.is_changed() && !settings.is_added() {
        ctx.apply_settings(settings.clone());
    }
}
