use std::cell::Cell;
use std::rc::Rc;

use math_anim_wasm::{
    AnimationKind, DrawCall, ManualScheduler, ManualTimer, Phase, PlayOutcome, Player,
    PlayerConfig, Recorder, Rejection, ReleaseHook, ReleasePolicy,
};

struct Rig {
    player: Player,
    frames: ManualScheduler,
    timer: ManualTimer,
}

impl Rig {
    fn new(release: ReleasePolicy) -> Self {
        let frames = ManualScheduler::new();
        let timer = ManualTimer::new();
        let config = PlayerConfig {
            release,
            ..PlayerConfig::default()
        };
        let player = Player::new(frames.clone(), timer.clone(), config);
        Self {
            player,
            frames,
            timer,
        }
    }

    fn attach(&self, kind: AnimationKind, width: u32, height: u32) -> Recorder {
        let rec = Recorder::new(width, height);
        self.player.attach(kind, rec.clone());
        rec
    }
}

fn counting_hook() -> (Rc<Cell<u32>>, ReleaseHook) {
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    (calls, Box::new(move || c.set(c.get() + 1)))
}

/// Splits a call log into one chunk per cleared frame.
fn frames(calls: Vec<DrawCall>) -> Vec<Vec<DrawCall>> {
    let mut out: Vec<Vec<DrawCall>> = Vec::new();
    for call in calls {
        if matches!(call, DrawCall::ClearRect { .. }) {
            out.push(Vec::new());
        }
        if let Some(last) = out.last_mut() {
            last.push(call);
        }
    }
    out
}

#[test]
fn sine_run_is_exactly_120_scheduled_ticks() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    let rec = rig.attach(AnimationKind::SineWave, 300, 200);

    let outcome = rig.player.play(AnimationKind::SineWave);
    assert!(matches!(outcome, PlayOutcome::Started(_)));
    // nothing is drawn until the first tick
    assert!(rec.is_empty());
    assert_eq!(rig.frames.pending(), 1);

    assert_eq!(rig.frames.run_until_idle(), 120);
    assert_eq!(rig.frames.requested(), 120);
    assert_eq!(rig.player.phase(AnimationKind::SineWave), Phase::Done);
    assert_eq!(rig.player.session(AnimationKind::SineWave), None);

    let ticks = frames(rec.take());
    assert_eq!(ticks.len(), 120);
    for tick in &ticks {
        let moves = tick.iter().filter(|c| matches!(c, DrawCall::MoveTo { .. })).count();
        let lines = tick.iter().filter(|c| matches!(c, DrawCall::LineTo { .. })).count();
        let strokes = tick.iter().filter(|c| matches!(c, DrawCall::Stroke)).count();
        assert_eq!(moves, 2);
        assert_eq!(lines, 1 + 299);
        assert_eq!(strokes, 2);
        assert_eq!(tick[1], DrawCall::StrokeStyle("#ccc".into()));
    }
}

#[test]
fn circle_frames_count_up_from_zero() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    let rec = rig.attach(AnimationKind::Circle, 200, 200);
    rig.player.play(AnimationKind::Circle);

    assert_eq!(rig.player.phase(AnimationKind::Circle), Phase::Running { frame: 0 });
    for expected in 0..120u32 {
        let session = rig.player.session(AnimationKind::Circle).expect("running");
        assert_eq!(session.frame(), expected);
        assert!(rig.frames.run_next());
    }
    assert!(!rig.frames.run_next());
    assert_eq!(rig.player.phase(AnimationKind::Circle), Phase::Done);

    let ticks = frames(rec.take());
    assert_eq!(ticks.len(), 120);
    for (frame, tick) in ticks.iter().enumerate() {
        let radius = tick
            .iter()
            .find_map(|c| match c {
                DrawCall::Arc { radius, .. } => Some(*radius),
                _ => None,
            })
            .expect("circle arc");
        assert_eq!(radius, frame as f64 / 120.0 * 60.0);
        let has_radius_line = tick.iter().any(|c| matches!(c, DrawCall::LineTo { .. }));
        assert_eq!(has_radius_line, frame > 0, "frame {frame}");
    }
    let last_line_end = ticks[119].iter().find_map(|c| match c {
        DrawCall::LineTo { x, .. } => Some(*x),
        _ => None,
    });
    assert!((last_line_end.expect("radius line") - 159.5).abs() < 1e-9);
}

#[test]
fn derivative_run_draws_sixty_double_frames() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    let rec = rig.attach(AnimationKind::Derivative, 400, 300);
    rig.player.play(AnimationKind::Derivative);
    assert_eq!(rig.frames.run_until_idle(), 60);
    assert_eq!(rec.count(|c| matches!(c, DrawCall::ClearRect { .. })), 120);
    assert_eq!(rec.count(|c| matches!(c, DrawCall::GlobalAlpha(_))), 120);
    assert_eq!(rec.calls().last(), Some(&DrawCall::GlobalAlpha(1.0)));
}

#[test]
fn busy_player_rejects_new_requests_without_drawing() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    let _circle = rig.attach(AnimationKind::Circle, 200, 200);
    let sine = rig.attach(AnimationKind::SineWave, 300, 200);

    let token = match rig.player.play(AnimationKind::Circle) {
        PlayOutcome::Started(token) => token,
        other => panic!("unexpected {other:?}"),
    };
    let (hook_calls, hook) = counting_hook();
    assert_eq!(
        rig.player.play_with(AnimationKind::SineWave, Some(hook)),
        PlayOutcome::Rejected(Rejection::Busy)
    );
    assert_eq!(rig.player.busy(), Some(token));
    assert_eq!(rig.player.phase(AnimationKind::SineWave), Phase::Idle);

    rig.frames.run_until_idle();
    rig.timer.advance(10_000);
    assert!(sine.is_empty());
    assert_eq!(hook_calls.get(), 0);
}

#[test]
fn fixed_timeout_releases_on_the_clock_not_on_completion() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    rig.attach(AnimationKind::Derivative, 400, 300);
    let (hook_calls, hook) = counting_hook();
    rig.player.play_with(AnimationKind::Derivative, Some(hook));

    rig.frames.run_until_idle();
    assert_eq!(rig.player.phase(AnimationKind::Derivative), Phase::Done);
    assert!(rig.player.is_busy());

    rig.timer.advance(2999);
    assert!(rig.player.is_busy());
    assert_eq!(hook_calls.get(), 0);
    rig.timer.advance(1);
    assert!(!rig.player.is_busy());
    assert_eq!(hook_calls.get(), 1);
}

#[test]
fn fixed_timeout_can_release_before_frames_finish() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    rig.attach(AnimationKind::Circle, 200, 200);
    let sine = rig.attach(AnimationKind::SineWave, 300, 200);
    rig.player.play(AnimationKind::Circle);

    for _ in 0..10 {
        rig.frames.run_next();
    }
    rig.timer.advance(3000);
    assert!(!rig.player.is_busy());
    assert_eq!(rig.player.phase(AnimationKind::Circle), Phase::Running { frame: 10 });

    assert!(matches!(rig.player.play(AnimationKind::SineWave), PlayOutcome::Started(_)));
    // both loops keep ticking on their own surfaces
    assert_eq!(rig.frames.run_until_idle(), 110 + 120);
    assert_eq!(rig.player.phase(AnimationKind::Circle), Phase::Done);
    assert_eq!(frames(sine.take()).len(), 120);
}

#[test]
fn on_completion_releases_at_done() {
    let rig = Rig::new(ReleasePolicy::OnCompletion);
    rig.attach(AnimationKind::SineWave, 300, 200);
    let (hook_calls, hook) = counting_hook();
    rig.player.play_with(AnimationKind::SineWave, Some(hook));
    assert_eq!(rig.timer.pending(), 0);

    for _ in 0..119 {
        rig.frames.run_next();
    }
    assert!(rig.player.is_busy());
    rig.frames.run_next();
    assert!(!rig.player.is_busy());
    assert_eq!(hook_calls.get(), 1);

    // a finished animation can be played again from frame zero
    assert!(matches!(rig.player.play(AnimationKind::SineWave), PlayOutcome::Started(_)));
    assert_eq!(rig.player.phase(AnimationKind::SineWave), Phase::Running { frame: 0 });
}

#[test]
fn missing_surface_still_holds_the_page_under_fixed_timeout() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    let derivative = rig.attach(AnimationKind::Derivative, 400, 300);
    let sine = rig.attach(AnimationKind::SineWave, 300, 200);
    let (hook_calls, hook) = counting_hook();

    let outcome = rig.player.play_with(AnimationKind::Circle, Some(hook));
    assert!(matches!(outcome, PlayOutcome::HeldWithoutSurface(_)));
    assert!(outcome.holds_busy());
    assert!(rig.player.is_busy());
    assert_eq!(rig.frames.pending(), 0);
    assert_eq!(rig.player.phase(AnimationKind::Circle), Phase::Idle);
    assert_eq!(
        rig.player.play(AnimationKind::SineWave),
        PlayOutcome::Rejected(Rejection::Busy)
    );

    rig.timer.advance(3000);
    assert!(!rig.player.is_busy());
    assert_eq!(hook_calls.get(), 1);
    assert!(derivative.is_empty());
    assert!(sine.is_empty());
}

#[test]
fn missing_surface_is_a_noop_under_on_completion() {
    let rig = Rig::new(ReleasePolicy::OnCompletion);
    let sine = rig.attach(AnimationKind::SineWave, 300, 200);
    let (hook_calls, hook) = counting_hook();

    let outcome = rig.player.play_with(AnimationKind::Circle, Some(hook));
    assert_eq!(outcome, PlayOutcome::Rejected(Rejection::NoSurface));
    assert!(!outcome.holds_busy());
    assert!(!rig.player.is_busy());
    assert_eq!(rig.frames.pending(), 0);
    assert_eq!(rig.timer.pending(), 0);
    assert_eq!(rig.player.phase(AnimationKind::Circle), Phase::Idle);
    assert_eq!(hook_calls.get(), 0);
    assert!(sine.is_empty());
}

#[test]
fn detaching_mid_run_stops_the_loop() {
    let rig = Rig::new(ReleasePolicy::OnCompletion);
    let rec = rig.attach(AnimationKind::SineWave, 300, 200);
    let (hook_calls, hook) = counting_hook();
    rig.player.play_with(AnimationKind::SineWave, Some(hook));
    for _ in 0..5 {
        rig.frames.run_next();
    }

    assert!(rig.player.detach(AnimationKind::SineWave).is_some());
    assert_eq!(rig.player.phase(AnimationKind::SineWave), Phase::Idle);
    assert!(!rig.player.is_busy());
    assert_eq!(hook_calls.get(), 1);

    // the tick already queued finds no session and stops
    assert_eq!(rig.frames.run_until_idle(), 1);
    assert_eq!(frames(rec.take()).len(), 5);
}

#[test]
fn replacing_a_surface_supersedes_the_running_session() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    let old = rig.attach(AnimationKind::Circle, 200, 200);
    rig.player.play(AnimationKind::Circle);
    rig.frames.run_next();

    let new = rig.attach(AnimationKind::Circle, 200, 200);
    assert_eq!(rig.player.phase(AnimationKind::Circle), Phase::Idle);
    // fixed-timeout release still belongs to the timer
    assert!(rig.player.is_busy());
    rig.frames.run_until_idle();
    assert_eq!(frames(old.take()).len(), 1);
    assert!(new.is_empty());
}

#[test]
fn preview_all_draws_each_attached_surface() {
    let rig = Rig::new(ReleasePolicy::FixedTimeout);
    let derivative = rig.attach(AnimationKind::Derivative, 400, 300);
    let circle = rig.attach(AnimationKind::Circle, 200, 200);

    rig.player.preview_all();
    assert_eq!(frames(derivative.take()).len(), 1);
    let circle_calls = circle.take();
    assert!(circle_calls.contains(&DrawCall::FillText { text: "r".into(), x: 130.0, y: 90.0 }));
    assert!(!rig.player.has_surface(AnimationKind::SineWave));
    assert!(!rig.player.is_busy());
    assert_eq!(rig.frames.pending(), 0);
}
