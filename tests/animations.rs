/// Tests for sprite-sheet clip playback.
///
/// `Animator` is driven purely by `update(dt)`, so no window is needed.
use gridquiz::anim::{AnimKey, AnimationSink, Animator, player_clips};
use gridquiz::grid::Direction;

const WALK_FRAME: f32 = 0.1; // 10 fps
const TURN_FRAME: f32 = 0.05; // 20 fps

fn animator() -> Animator {
    Animator::new(player_clips(), AnimKey::Turn)
}

// ── Clip table ───────────────────────────────────────────────────────────────

#[test]
fn player_sheet_has_three_clips() {
    let clips = player_clips();
    let left = clips.iter().find(|c| c.key == AnimKey::Left).expect("left clip");
    let turn = clips.iter().find(|c| c.key == AnimKey::Turn).expect("turn clip");
    let right = clips.iter().find(|c| c.key == AnimKey::Right).expect("right clip");

    assert_eq!(left.frames, vec![0, 1, 2, 3]);
    assert_eq!(turn.frames, vec![4]);
    assert_eq!(right.frames, vec![5, 6, 7, 8]);
    assert!(left.looping && right.looping, "walk cycles loop");
    assert!(!turn.looping, "turn plays once");
    assert!((left.frame_duration() - WALK_FRAME).abs() < 1e-6);
    assert!((turn.frame_duration() - TURN_FRAME).abs() < 1e-6);
}

#[test]
fn direction_to_clip() {
    assert_eq!(AnimKey::for_direction(Direction::Left), AnimKey::Left);
    assert_eq!(AnimKey::for_direction(Direction::Right), AnimKey::Right);
    assert_eq!(AnimKey::for_direction(Direction::Up), AnimKey::Turn);
    assert_eq!(AnimKey::for_direction(Direction::Down), AnimKey::Turn);
}

// ── Playback ─────────────────────────────────────────────────────────────────

#[test]
fn new_animator_shows_initial_clip_without_playing() {
    let a = animator();
    assert_eq!(a.current_key(), Some(AnimKey::Turn));
    assert_eq!(a.current_frame(), 4);
    assert!(!a.is_playing());
}

#[test]
fn walk_cycle_advances_and_loops() {
    let mut a = animator();
    a.play(AnimKey::Left, false);
    assert_eq!(a.current_frame(), 0);

    a.update(WALK_FRAME * 0.5);
    assert_eq!(a.current_frame(), 0, "half a frame should not advance");

    a.update(WALK_FRAME * 0.6);
    assert_eq!(a.current_frame(), 1);

    // Three more frames wrap back to the start.
    a.update(WALK_FRAME * 3.0);
    assert_eq!(a.current_frame(), 0, "looping clip should wrap");
    assert!(a.is_playing());
}

#[test]
fn one_shot_clip_holds_its_last_frame() {
    let mut a = animator();
    a.play(AnimKey::Turn, false);
    assert!(a.is_playing());
    a.update(TURN_FRAME * 4.0);
    assert!(!a.is_playing(), "turn should stop after one pass");
    assert_eq!(a.current_frame(), 4);
}

#[test]
fn ignore_if_playing_keeps_current_progress() {
    let mut a = animator();
    a.play(AnimKey::Right, true);
    a.update(WALK_FRAME * 2.5);
    assert_eq!(a.current_frame(), 7);

    a.play(AnimKey::Right, true);
    assert_eq!(a.current_frame(), 7, "same clip with ignore flag should not restart");

    a.play(AnimKey::Right, false);
    assert_eq!(a.current_frame(), 5, "without the flag the clip restarts");
}

#[test]
fn switching_clip_restarts_at_its_first_frame() {
    let mut a = animator();
    a.play(AnimKey::Left, true);
    a.update(WALK_FRAME * 2.5);
    a.play(AnimKey::Right, true);
    assert_eq!(a.current_key(), Some(AnimKey::Right));
    assert_eq!(a.current_frame(), 5);
}

#[test]
fn finished_one_shot_replays_even_with_ignore_flag() {
    let mut a = animator();
    a.play(AnimKey::Turn, true);
    a.update(1.0);
    assert!(!a.is_playing());
    a.play(AnimKey::Turn, true);
    assert!(a.is_playing(), "a stopped clip is not 'playing' and may restart");
}

#[test]
fn unknown_initial_key_falls_back_to_first_clip() {
    let clips: Vec<_> = player_clips().into_iter().filter(|c| c.key != AnimKey::Turn).collect();
    let a = Animator::new(clips, AnimKey::Turn);
    assert_eq!(a.current_key(), Some(AnimKey::Left));
}
