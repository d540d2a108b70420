use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand::rngs::StdRng;

use gridquiz::challenge::{Challenge, default_challenges};
use gridquiz::dispatcher::{
    InteractionDispatcher, ModalSurface, Notification, Notifier, Outcome, RegistrationError,
};
use gridquiz::grid::{GridBounds, GridPosition};

const BOARD: GridBounds = GridBounds::new(25, 19, 32);

/// Answers prompts from a script and records everything it was shown.
#[derive(Default)]
struct ScriptedSurface {
    replies: VecDeque<Option<String>>,
    asked: Vec<String>,
    notices: Vec<Notification>,
}

impl ScriptedSurface {
    fn replying(replies: &[Option<&str>]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.map(str::to_string)).collect(),
            ..Self::default()
        }
    }
}

impl Notifier for ScriptedSurface {
    fn notify(&mut self, notification: Notification) {
        self.notices.push(notification);
    }
}

impl ModalSurface for ScriptedSurface {
    fn prompt(&mut self, text: &str) -> Option<String> {
        self.asked.push(text.to_string());
        self.replies.pop_front().flatten()
    }
}

fn math() -> Challenge {
    Challenge::new("Solve this math problem: 2 + 2 = ?", "4")
}

// ── Activation ───────────────────────────────────────────────────────────────

#[test]
fn wrong_then_right_answer_removes_npc() {
    let mut npcs = InteractionDispatcher::new();
    let id = npcs.spawn(GridPosition::new(5, 5));
    npcs.register_challenge(id, math()).unwrap();

    let mut surface = ScriptedSurface::replying(&[Some("5"), Some("4")]);

    assert_eq!(npcs.on_activate(id, &mut surface), Some(Outcome::Retry));
    assert!(npcs.is_alive(id), "a wrong answer must leave the NPC in place");

    assert_eq!(npcs.on_activate(id, &mut surface), Some(Outcome::Solved));
    assert!(!npcs.is_alive(id), "a correct answer removes the NPC");
    assert!(npcs.is_empty());

    assert_eq!(surface.asked, vec![math().text, math().text]);
    assert_eq!(surface.notices, vec![Notification::Retry, Notification::Success]);
}

#[test]
fn answers_match_ignoring_case() {
    let mut npcs = InteractionDispatcher::new();
    let id = npcs.spawn(GridPosition::new(4, 4));
    npcs.register_challenge(id, Challenge::new("What color is the sky?", "blue")).unwrap();

    let mut surface = ScriptedSurface::default();
    assert_eq!(npcs.resolve(id, Some("BLUE"), &mut surface), Some(Outcome::Solved));
}

#[test]
fn cancelled_prompt_is_a_retry() {
    let mut npcs = InteractionDispatcher::new();
    let id = npcs.spawn(GridPosition::new(4, 4));
    npcs.register_challenge(id, math()).unwrap();

    let mut surface = ScriptedSurface::replying(&[None]);
    assert_eq!(npcs.on_activate(id, &mut surface), Some(Outcome::Retry));
    assert!(npcs.is_alive(id));
    assert_eq!(surface.notices, vec![Notification::Retry]);
}

#[test]
fn solved_npc_cannot_be_activated_again() {
    let mut npcs = InteractionDispatcher::new();
    let id = npcs.spawn(GridPosition::new(4, 4));
    npcs.register_challenge(id, math()).unwrap();
    let mut surface = ScriptedSurface::default();
    npcs.resolve(id, Some("4"), &mut surface);

    let mut again = ScriptedSurface::replying(&[Some("4")]);
    assert_eq!(npcs.on_activate(id, &mut again), None);
    assert!(again.asked.is_empty(), "a removed NPC must not prompt");
    assert!(again.notices.is_empty());
}

/// The frame-driven flow (show the question, judge the reply later) ends up
/// exactly where the blocking activation does.
#[test]
fn deferred_answer_matches_blocking_activation() {
    let mut blocking = InteractionDispatcher::new();
    let mut deferred = InteractionDispatcher::new();
    let a = blocking.spawn(GridPosition::new(5, 5));
    let b = deferred.spawn(GridPosition::new(5, 5));
    blocking.register_challenge(a, math()).unwrap();
    deferred.register_challenge(b, math()).unwrap();

    for reply in [Some("5"), None, Some("4")] {
        let mut surface = ScriptedSurface::replying(&[reply]);
        let mut notices = ScriptedSurface::default();
        let question = deferred.get(b).and_then(|n| n.challenge()).map(|c| c.text.clone());

        assert_eq!(
            blocking.on_activate(a, &mut surface),
            deferred.resolve(b, reply, &mut notices),
            "reply {reply:?}"
        );
        assert_eq!(surface.asked, question.into_iter().collect::<Vec<_>>());
        assert_eq!(surface.notices, notices.notices);
        assert_eq!(blocking.is_alive(a), deferred.is_alive(b));
    }
    assert!(blocking.is_empty() && deferred.is_empty());
}

#[test]
fn npc_without_challenge_does_nothing() {
    let mut npcs = InteractionDispatcher::new();
    let id = npcs.spawn(GridPosition::new(4, 4));
    let mut surface = ScriptedSurface::replying(&[Some("anything")]);
    assert_eq!(npcs.on_activate(id, &mut surface), None);
    assert!(surface.asked.is_empty());
    assert!(npcs.is_alive(id));
}

#[test]
fn solving_one_npc_leaves_the_others() {
    let mut npcs = InteractionDispatcher::new();
    let a = npcs.spawn(GridPosition::new(3, 3));
    let b = npcs.spawn(GridPosition::new(6, 6));
    npcs.register_challenge(a, math()).unwrap();
    npcs.register_challenge(b, math()).unwrap();

    let mut surface = ScriptedSurface::default();
    npcs.resolve(a, Some("4"), &mut surface);
    assert!(!npcs.is_alive(a));
    assert!(npcs.is_alive(b));
    assert_eq!(npcs.len(), 1);
}

// ── Registration ─────────────────────────────────────────────────────────────

#[test]
fn challenge_registers_once() {
    let mut npcs = InteractionDispatcher::new();
    let id = npcs.spawn(GridPosition::new(1, 1));
    assert_eq!(npcs.register_challenge(id, math()), Ok(()));
    assert_eq!(
        npcs.register_challenge(id, Challenge::new("other", "x")),
        Err(RegistrationError::AlreadyRegistered(id))
    );
    assert_eq!(npcs.get(id).and_then(|n| n.challenge()), Some(&math()));
}

#[test]
fn stale_id_is_rejected_after_slot_reuse() {
    let mut npcs = InteractionDispatcher::new();
    let old = npcs.spawn(GridPosition::new(1, 1));
    npcs.register_challenge(old, math()).unwrap();
    let mut surface = ScriptedSurface::default();
    npcs.resolve(old, Some("4"), &mut surface);

    let new = npcs.spawn(GridPosition::new(2, 2));
    assert_eq!(new.index(), old.index(), "slot should be reused");
    assert_ne!(new.generation(), old.generation());

    assert!(npcs.get(old).is_none());
    assert_eq!(npcs.register_challenge(old, math()), Err(RegistrationError::Unknown(old)));
    assert_eq!(npcs.resolve(old, Some("4"), &mut surface), None);
    assert!(npcs.is_alive(new));
}

// ── Lookup ───────────────────────────────────────────────────────────────────

#[test]
fn hit_test_maps_pixels_to_npc() {
    let mut npcs = InteractionDispatcher::new();
    let id = npcs.spawn(GridPosition::new(5, 7));

    // Cell (5, 7) spans x 160..192, y 224..256.
    assert_eq!(npcs.hit_test(160.0, 224.0, &BOARD), Some(id));
    assert_eq!(npcs.hit_test(191.9, 255.9, &BOARD), Some(id));
    assert_eq!(npcs.hit_test(192.0, 224.0, &BOARD), None);
    assert_eq!(npcs.hit_test(-1.0, 224.0, &BOARD), None);
    assert_eq!(npcs.hit_test(10_000.0, 10_000.0, &BOARD), None);
}

#[test]
fn overlapping_npcs_pick_the_newest() {
    let mut npcs = InteractionDispatcher::new();
    let cell = GridPosition::new(8, 8);
    let _first = npcs.spawn(cell);
    let second = npcs.spawn(cell);
    assert_eq!(npcs.interactable_at(cell), Some(second));
}

// ── Population ───────────────────────────────────────────────────────────────

#[test]
fn populate_places_one_npc_per_challenge_inside_margin() {
    let mut npcs = InteractionDispatcher::new();
    let challenges = default_challenges();
    let mut rng = StdRng::seed_from_u64(7);

    let ids = npcs.populate(BOARD, 3, &challenges, challenges.len(), &mut rng);
    assert_eq!(ids.len(), 3);

    let mut cells = HashSet::new();
    for (i, id) in ids.iter().enumerate() {
        let npc = npcs.get(*id).expect("spawned npc should be alive");
        assert!((3..22).contains(&npc.cell.x), "x {} outside spawn area", npc.cell.x);
        assert!((3..16).contains(&npc.cell.y), "y {} outside spawn area", npc.cell.y);
        assert!(cells.insert(npc.cell), "two NPCs share {:?}", npc.cell);
        assert_eq!(npc.challenge(), Some(&challenges[i]));
    }
}

#[test]
fn populate_cycles_challenges_and_is_seed_stable() {
    let challenges = default_challenges();

    let mut a = InteractionDispatcher::new();
    let ids = a.populate(BOARD, 3, &challenges, 7, &mut StdRng::seed_from_u64(42));
    assert_eq!(ids.len(), 7);
    assert_eq!(a.get(ids[4]).and_then(|n| n.challenge()), Some(&challenges[1]));

    let mut b = InteractionDispatcher::new();
    let again = b.populate(BOARD, 3, &challenges, 7, &mut StdRng::seed_from_u64(42));
    let cells_a: Vec<_> = ids.iter().map(|id| a.get(*id).map(|n| n.cell)).collect();
    let cells_b: Vec<_> = again.iter().map(|id| b.get(*id).map(|n| n.cell)).collect();
    assert_eq!(cells_a, cells_b, "same seed should give the same layout");
}

#[test]
fn populate_stops_when_area_is_full() {
    let mut npcs = InteractionDispatcher::new();
    let tiny = GridBounds::new(4, 4, 32);
    let ids = npcs.populate(tiny, 1, &default_challenges(), 10, &mut StdRng::seed_from_u64(1));
    assert_eq!(ids.len(), 4, "a 4x4 board with margin 1 has four free cells");
}

#[test]
fn populate_with_no_challenges_spawns_nothing() {
    let mut npcs = InteractionDispatcher::new();
    let ids = npcs.populate(BOARD, 3, &[], 5, &mut StdRng::seed_from_u64(1));
    assert!(ids.is_empty());
    assert!(npcs.is_empty());
}
