//! Frame-advance loop for the animations.
//!
//! A [`Player`] owns one optional surface per animation and the busy token
//! that keeps at most one play request active at a time. Sessions do not
//! reschedule themselves: each tick is a one-shot callback handed to a
//! [`Scheduler`], and the tick decides whether to ask for another.

mod manual;

pub use manual::{ManualScheduler, ManualTimer};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::curve;
use crate::kind::AnimationKind;
use crate::params;
use crate::render::{self, Frame};
use crate::surface::Surface;

/// Runs a callback once, before the next repaint.
pub trait Scheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>);
}

/// Runs a callback once, after `delay_ms`.
pub trait Timer {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>);
}

/// Called when the busy token of a play request is given back.
pub type ReleaseHook = Box<dyn FnOnce()>;

/// When the busy token taken by a play request is given back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleasePolicy {
    /// A fixed delay after the request, whether or not the frames are done.
    /// With the stock budgets at 60Hz the frames finish well before it.
    #[default]
    FixedTimeout,
    /// As soon as the session reaches its frame budget.
    OnCompletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    pub release: ReleasePolicy,
    /// Only used by [`ReleasePolicy::FixedTimeout`].
    pub release_delay_ms: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            release: ReleasePolicy::default(),
            release_delay_ms: params::RELEASE_DELAY_MS,
        }
    }
}

/// Where one animation's loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// `frame` is the index the next tick will draw.
    Running { frame: u32 },
    Done,
}

/// Proof that a play request holds the page. Only the holder's release
/// can clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyToken {
    pub id: u64,
    pub kind: AnimationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Another request still holds the busy token.
    Busy,
    /// Nothing to draw on, and the release policy does not hold the token
    /// for surfaceless requests.
    NoSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started(BusyToken),
    /// No surface for this animation; the token is held until the release
    /// timer fires anyway.
    HeldWithoutSurface(BusyToken),
    Rejected(Rejection),
}

impl PlayOutcome {
    /// Whether the caller now owns the page until its release hook runs.
    pub fn holds_busy(&self) -> bool {
        !matches!(self, PlayOutcome::Rejected(_))
    }
}

/// One running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    id: u64,
    kind: AnimationKind,
    frame: u32,
    total: u32,
}

impl Session {
    fn new(id: u64, kind: AnimationKind) -> Self {
        Self {
            id,
            kind,
            frame: 0,
            total: kind.total_frames(),
        }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn total_frames(&self) -> u32 {
        self.total
    }

    pub fn progress(&self) -> f64 {
        curve::progress(self.frame, self.total)
    }

    /// Moves to the next frame; false once the budget is spent.
    fn advance(&mut self) -> bool {
        self.frame += 1;
        self.frame < self.total
    }
}

#[derive(Default)]
struct Slot {
    surface: Option<Box<dyn Surface>>,
    session: Option<Session>,
    phase: Phase,
}

#[derive(Default)]
struct Stage {
    slots: [Slot; 3],
    busy: Option<BusyToken>,
    hook: Option<(u64, ReleaseHook)>,
    next_id: u64,
}

impl Stage {
    fn slot(&self, kind: AnimationKind) -> &Slot {
        &self.slots[slot_index(kind)]
    }

    fn slot_mut(&mut self, kind: AnimationKind) -> &mut Slot {
        &mut self.slots[slot_index(kind)]
    }

    /// Clears the busy token if `id` holds it, handing back its hook.
    fn release(&mut self, id: u64) -> Option<ReleaseHook> {
        if self.busy.map(|t| t.id) != Some(id) {
            return None;
        }
        self.busy = None;
        match self.hook.take() {
            Some((owner, hook)) if owner == id => Some(hook),
            other => {
                self.hook = other;
                None
            }
        }
    }
}

fn slot_index(kind: AnimationKind) -> usize {
    match kind {
        AnimationKind::Derivative => 0,
        AnimationKind::Circle => 1,
        AnimationKind::SineWave => 2,
    }
}

struct Inner {
    stage: RefCell<Stage>,
    scheduler: Box<dyn Scheduler>,
    timer: Box<dyn Timer>,
    config: PlayerConfig,
}

/// Orchestrates the three animations. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Player {
    inner: Rc<Inner>,
}

impl Player {
    pub fn new(
        scheduler: impl Scheduler + 'static,
        timer: impl Timer + 'static,
        config: PlayerConfig,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                stage: RefCell::new(Stage::default()),
                scheduler: Box::new(scheduler),
                timer: Box::new(timer),
                config,
            }),
        }
    }

    pub fn config(&self) -> PlayerConfig {
        self.inner.config
    }

    /// Gives `kind` a surface to draw on, replacing any previous one. A
    /// session running on the old surface is dropped.
    pub fn attach(&self, kind: AnimationKind, surface: impl Surface + 'static) {
        let hook = {
            let mut stage = self.inner.stage.borrow_mut();
            let dropped = drop_session(stage.slot_mut(kind));
            stage.slot_mut(kind).surface = Some(Box::new(surface));
            match dropped {
                Some(id) => self.release_on_drop(&mut stage, id),
                None => None,
            }
        };
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Takes `kind`'s surface away; a running session on it stops.
    pub fn detach(&self, kind: AnimationKind) -> Option<Box<dyn Surface>> {
        let (surface, hook) = {
            let mut stage = self.inner.stage.borrow_mut();
            let dropped = drop_session(stage.slot_mut(kind));
            let surface = stage.slot_mut(kind).surface.take();
            let hook = match dropped {
                Some(id) => self.release_on_drop(&mut stage, id),
                None => None,
            };
            (surface, hook)
        };
        if let Some(hook) = hook {
            hook();
        }
        surface
    }

    pub fn has_surface(&self, kind: AnimationKind) -> bool {
        self.inner.stage.borrow().slot(kind).surface.is_some()
    }

    pub fn phase(&self, kind: AnimationKind) -> Phase {
        self.inner.stage.borrow().slot(kind).phase
    }

    pub fn session(&self, kind: AnimationKind) -> Option<Session> {
        self.inner.stage.borrow().slot(kind).session
    }

    pub fn busy(&self) -> Option<BusyToken> {
        self.inner.stage.borrow().busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy().is_some()
    }

    /// Draws the still preview of `kind`, if it has a surface.
    pub fn preview(&self, kind: AnimationKind) {
        let mut stage = self.inner.stage.borrow_mut();
        draw(&mut stage.slot_mut(kind).surface, kind, Frame::Preview);
    }

    pub fn preview_all(&self) {
        for kind in AnimationKind::ALL {
            self.preview(kind);
        }
    }

    pub fn play(&self, kind: AnimationKind) -> PlayOutcome {
        self.play_with(kind, None)
    }

    /// Starts `kind` unless the page is busy. `on_release` runs when the
    /// busy token taken here is given back; it is dropped uncalled when the
    /// request is rejected.
    pub fn play_with(&self, kind: AnimationKind, on_release: Option<ReleaseHook>) -> PlayOutcome {
        let policy = self.inner.config.release;
        let (token, has_surface) = {
            let mut stage = self.inner.stage.borrow_mut();
            if let Some(owner) = stage.busy {
                tracing::debug!(%kind, owner = %owner.kind, "play rejected, busy");
                return PlayOutcome::Rejected(Rejection::Busy);
            }
            let has_surface = stage.slot(kind).surface.is_some();
            if !has_surface && policy == ReleasePolicy::OnCompletion {
                tracing::debug!(%kind, "play rejected, no surface");
                return PlayOutcome::Rejected(Rejection::NoSurface);
            }

            stage.next_id += 1;
            let token = BusyToken {
                id: stage.next_id,
                kind,
            };
            stage.busy = Some(token);
            stage.hook = on_release.map(|hook| (token.id, hook));
            if has_surface {
                let slot = stage.slot_mut(kind);
                slot.session = Some(Session::new(token.id, kind));
                slot.phase = Phase::Running { frame: 0 };
            }
            (token, has_surface)
        };

        if policy == ReleasePolicy::FixedTimeout {
            let weak = Rc::downgrade(&self.inner);
            self.inner.timer.after(
                self.inner.config.release_delay_ms,
                Box::new(move || release(&weak, token.id)),
            );
        }

        if has_surface {
            tracing::info!(%kind, frames = kind.total_frames(), "animation started");
            schedule_tick(&self.inner, kind, token.id);
            PlayOutcome::Started(token)
        } else {
            tracing::debug!(%kind, "no surface, holding busy token until release");
            PlayOutcome::HeldWithoutSurface(token)
        }
    }

    fn release_on_drop(&self, stage: &mut Stage, id: u64) -> Option<ReleaseHook> {
        match self.inner.config.release {
            ReleasePolicy::OnCompletion => stage.release(id),
            // the timer still owns the release
            ReleasePolicy::FixedTimeout => None,
        }
    }
}

fn draw(surface: &mut Option<Box<dyn Surface>>, kind: AnimationKind, frame: Frame) {
    match surface {
        Some(s) => render::render(Some(&mut **s), kind, frame),
        None => render::render(None, kind, frame),
    }
}

/// Stops whatever session `slot` holds, returning its id.
fn drop_session(slot: &mut Slot) -> Option<u64> {
    let session = slot.session.take()?;
    slot.phase = Phase::Idle;
    tracing::debug!(kind = %session.kind, frame = session.frame, "session dropped");
    Some(session.id)
}

fn schedule_tick(inner: &Rc<Inner>, kind: AnimationKind, id: u64) {
    let weak = Rc::downgrade(inner);
    inner.scheduler.request_frame(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            tick(&inner, kind, id);
        }
    }));
}

fn release(weak: &Weak<Inner>, id: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let hook = inner.stage.borrow_mut().release(id);
    tracing::debug!(id, "busy token released");
    if let Some(hook) = hook {
        hook();
    }
}

fn tick(inner: &Rc<Inner>, kind: AnimationKind, id: u64) {
    let (more, hook) = {
        let mut stage = inner.stage.borrow_mut();
        let Slot {
            surface,
            session,
            phase,
        } = stage.slot_mut(kind);

        let Some(current) = session.as_mut().filter(|s| s.id == id) else {
            tracing::trace!(%kind, id, "stale tick");
            return;
        };

        tracing::trace!(%kind, frame = current.frame, "tick");
        draw(surface, kind, Frame::Progress(current.progress()));

        if current.advance() {
            *phase = Phase::Running {
                frame: current.frame,
            };
            (true, None)
        } else {
            *phase = Phase::Done;
            *session = None;
            tracing::info!(%kind, "animation done");
            let hook = match inner.config.release {
                ReleasePolicy::OnCompletion => stage.release(id),
                ReleasePolicy::FixedTimeout => None,
            };
            (false, hook)
        }
    };

    if let Some(hook) = hook {
        hook();
    }
    if more {
        schedule_tick(inner, kind, id);
    }
}
