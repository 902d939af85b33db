use crate::content::{Action, Comparison, Sprite, Tile, World};

use super::config::PlayConfig;
use super::error::{ErrorKind, PlayError};
use super::input::{InputEvent, Key};
use super::movement::{Direction, Facing};
use super::session::{MoveOutcome, Session};
use super::testing::{world, RecordingRender, ScriptedDialog};

type TestSession = Session<RecordingRender, ScriptedDialog>;

fn config() -> PlayConfig {
    PlayConfig {
        shuffle_seed: Some(7),
        max_action_depth: 16,
        ..PlayConfig::default()
    }
}

fn begin(world: World) -> TestSession {
    Session::begin(
        world,
        config(),
        RecordingRender::default(),
        ScriptedDialog::default(),
    )
    .expect("session begins")
}

fn give(item: &str) -> Action {
    Action::GiveItem {
        sprite_name: item.to_string(),
        quantity: 1,
        is_giving: true,
    }
}

fn say(text: &str) -> Action {
    Action::Dialog {
        text: text.to_string(),
    }
}

fn trigger(event: &str) -> Action {
    Action::TriggerEvent {
        event_name: event.to_string(),
    }
}

fn position(session: &TestSession) -> (usize, i32, i32) {
    let state = session.state();
    (state.room_index, state.avatar.x, state.avatar.y)
}

fn key_down(key: Key) -> InputEvent {
    InputEvent::KeyDown { key, repeat: false }
}

#[test]
fn avatar_starts_on_its_last_tile() {
    let sprites = vec![Sprite::new("tree"), Sprite::new("hero").avatar()];
    let session = begin(world(
        sprites,
        vec![
            vec![Tile::new("hero", 1, 1)],
            vec![Tile::new("tree", 0, 0), Tile::new("hero", 3, 2)],
        ],
    ));
    assert_eq!(position(&session), (1, 3, 2));
    assert_eq!(session.state().avatar.facing, Facing::Right);
    assert_eq!(session.render().cache_clears, 1);
}

#[test]
fn first_sprite_stands_in_when_no_avatar_is_flagged() {
    let session = begin(world(
        vec![Sprite::new("ghost"), Sprite::new("tree")],
        vec![vec![Tile::new("tree", 2, 2)]],
    ));
    assert_eq!(position(&session), (0, 0, 0));
    assert!(session
        .render()
        .cached
        .contains(&("ghost".to_string(), true)));
}

#[test]
fn world_without_sprites_cannot_begin() {
    let error = Session::begin(
        world(Vec::new(), vec![vec![]]),
        config(),
        RecordingRender::default(),
        ScriptedDialog::default(),
    )
    .err()
    .expect("no sprites");
    assert_eq!(error, PlayError::NoSprites);
}

#[test]
fn leaving_the_world_edge_without_wrap_is_rejected() {
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar()],
        vec![vec![Tile::new("hero", 0, 0)]],
    ));
    let outcome = session.evaluate_move(Some(Direction::Left)).expect("evaluate");
    assert_eq!(outcome, MoveOutcome::BoundaryRejected);
    assert_eq!(position(&session), (0, 0, 0));
    assert_eq!(session.state().avatar.facing, Facing::Left);
}

#[test]
fn horizontal_wrap_in_a_single_room_world_lands_on_the_far_column() {
    let mut world = world(
        vec![Sprite::new("hero").avatar()],
        vec![vec![Tile::new("hero", 4, 2)]],
    );
    world.dimensions = world.dimensions.with_wrap(true, false);
    let mut session = begin(world);
    let outcome = session.evaluate_move(Some(Direction::Right)).expect("evaluate");
    assert_eq!(outcome, MoveOutcome::Committed { room_changed: false });
    assert_eq!(position(&session), (0, 0, 2));
}

#[test]
fn walking_onto_an_item_collects_it() {
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("key").item()],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("key", 1, 0)]],
    ));
    let outcome = session.evaluate_move(Some(Direction::Right)).expect("evaluate");
    assert_eq!(outcome, MoveOutcome::Committed { room_changed: false });
    assert_eq!(session.state().inventory.get("key"), 1);
    assert!(session.world().rooms[0]
        .tiles
        .iter()
        .all(|tile| tile.sprite_name != "key"));
}

#[test]
fn walls_block_and_leave_the_avatar_in_place() {
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("wall").wall()],
        vec![vec![Tile::new("hero", 2, 2), Tile::new("wall", 2, 1)]],
    ));
    let outcome = session.evaluate_move(Some(Direction::Up)).expect("evaluate");
    assert_eq!(outcome, MoveOutcome::Blocked);
    assert_eq!(position(&session), (0, 2, 2));
    assert_eq!(session.state().avatar.facing, Facing::Right);
}

#[test]
fn conditional_gate_opens_once_enough_items_are_held() {
    let door = Sprite::new("door").wall().with_behavior(
        "push",
        vec![Action::Conditional {
            comparison: Comparison::GreaterOrEqual,
            sprite_name: "key".to_string(),
            quantity: 2,
            action_list: vec![Action::RemoveSelf],
        }],
    );
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("key").item(), door],
        vec![vec![
            Tile::new("hero", 0, 0),
            Tile::new("key", 0, 1),
            Tile::new("key", 0, 2),
            Tile::new("door", 1, 2),
        ]],
    ));
    session.evaluate_move(Some(Direction::Down)).expect("first key");
    session.evaluate_move(Some(Direction::Right)).expect("step");
    // At (1, 1) with one key: the door at (1, 2) stays shut.
    assert_eq!(
        session.evaluate_move(Some(Direction::Down)).expect("door"),
        MoveOutcome::Blocked
    );
    session.evaluate_move(Some(Direction::Left)).expect("left");
    session.evaluate_move(Some(Direction::Down)).expect("second key");
    assert_eq!(session.state().inventory.get("key"), 2);
    assert_eq!(
        session.evaluate_move(Some(Direction::Right)).expect("door opens"),
        MoveOutcome::Blocked
    );
    assert!(session.world().rooms[0]
        .tiles
        .iter()
        .all(|tile| tile.sprite_name != "door"));
    assert_eq!(
        session.evaluate_move(Some(Direction::Right)).expect("walk through"),
        MoveOutcome::Committed { room_changed: false }
    );
    assert_eq!(position(&session), (0, 1, 2));
}

#[test]
fn actions_after_a_dialog_wait_for_confirmation() {
    let sign = Sprite::new("sign").wall().with_behavior("push", vec![say("hi"), give("coin")]);
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("coin").item(), sign],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("sign", 1, 0)]],
    ));
    assert_eq!(
        session.evaluate_move(Some(Direction::Right)).expect("push"),
        MoveOutcome::Blocked
    );
    assert!(session.dialog_showing());
    assert_eq!(session.dialog().begun, vec![("hi".to_string(), true)]);
    assert_eq!(session.state().inventory.get("coin"), 0);
    assert_eq!(session.state().gate.deferred_len(), 1);

    session.confirm_dialog().expect("confirm");
    assert!(!session.dialog_showing());
    assert_eq!(session.dialog().ended, 1);
    assert_eq!(session.state().inventory.get("coin"), 1);
    assert_eq!(session.state().gate.deferred_len(), 0);
}

#[test]
fn multi_page_dialog_needs_one_confirmation_per_page() {
    let sign = Sprite::new("sign").wall().with_behavior("push", vec![say("long"), give("coin")]);
    let mut session = Session::begin(
        world(
            vec![Sprite::new("hero").avatar(), Sprite::new("coin").item(), sign],
            vec![vec![Tile::new("hero", 0, 0), Tile::new("sign", 1, 0)]],
        ),
        config(),
        RecordingRender::default(),
        ScriptedDialog {
            pages: 2,
            ..ScriptedDialog::default()
        },
    )
    .expect("begin");
    session.evaluate_move(Some(Direction::Right)).expect("push");
    session.handle_input(key_down(Key::ArrowUp)).expect("page");
    assert!(session.dialog_showing());
    assert_eq!(session.state().inventory.get("coin"), 0);
    session.handle_input(key_down(Key::ArrowUp)).expect("close");
    assert!(!session.dialog_showing());
    assert_eq!(session.state().inventory.get("coin"), 1);
}

#[test]
fn no_movement_is_evaluated_while_a_dialog_shows() {
    let sign = Sprite::new("sign").wall().with_behavior("push", vec![say("wait")]);
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), sign],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("sign", 1, 0)]],
    ));
    session.handle_input(key_down(Key::ArrowDown)).expect("press");
    session.evaluate_move(Some(Direction::Right)).expect("push");
    let report = session.tick(500.0).expect("tick");
    assert_eq!(report.movement, None);
    assert_eq!(position(&session), (0, 0, 0));
}

#[test]
fn a_failing_evaluation_rolls_back_every_effect() {
    let trap = Sprite::new("trap").with_behavior(
        "push",
        vec![
            give("coin"),
            Action::TransformSelf {
                sprite_name: "rubble".to_string(),
            },
            give("ghost"),
        ],
    );
    let mut session = begin(world(
        vec![
            Sprite::new("hero").avatar(),
            Sprite::new("coin").item(),
            Sprite::new("rubble"),
            trap,
        ],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("trap", 1, 0)]],
    ));
    let error = session
        .evaluate_move(Some(Direction::Right))
        .expect_err("ghost is unknown");
    assert_eq!(
        error,
        PlayError::SpriteNotFound {
            name: "ghost".to_string()
        }
    );
    assert_eq!(session.state().inventory.get("coin"), 0);
    assert_eq!(session.world().rooms[0].tiles[1].sprite_name, "trap");
    assert_eq!(position(&session), (0, 0, 0));
}

#[test]
fn rollback_closes_a_dialog_opened_by_the_failed_evaluation() {
    let portal = Sprite::new("portal").with_behavior(
        "push",
        vec![Action::MoveAvatar {
            room_index: 9,
            tile_x: 1,
            tile_y: 0,
        }],
    );
    let sign = Sprite::new("sign").with_behavior("push", vec![say("hello")]);
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), portal, sign],
        vec![vec![
            Tile::new("hero", 0, 0),
            Tile::new("portal", 1, 0),
            Tile::new("sign", 1, 0),
        ]],
    ));
    let error = session
        .evaluate_move(Some(Direction::Right))
        .expect_err("room 9 does not exist");
    assert_eq!(error, PlayError::RoomNotFound { index: 9, room_count: 1 });
    assert!(!session.dialog_showing());
    assert_eq!(session.dialog().begun.len(), 1);
    assert_eq!(session.dialog().ended, 1);
    assert_eq!(position(&session), (0, 0, 0));
}

#[test]
fn failing_deferred_invocation_is_dropped_and_the_rest_still_run() {
    let trap = Sprite::new("trap").with_behavior(
        "push",
        vec![Action::Conditional {
            comparison: Comparison::Equal,
            sprite_name: "ghost".to_string(),
            quantity: 0,
            action_list: Vec::new(),
        }],
    );
    let sign = Sprite::new("sign").with_behavior("push", vec![say("hello")]);
    let bell = Sprite::new("bell").with_behavior("push", vec![give("coin")]);
    let mut session = begin(world(
        vec![
            Sprite::new("hero").avatar(),
            Sprite::new("coin").item(),
            sign,
            trap,
            bell,
        ],
        vec![vec![
            Tile::new("hero", 0, 0),
            Tile::new("sign", 1, 0),
            Tile::new("trap", 1, 0),
            Tile::new("bell", 1, 0),
        ]],
    ));
    // Both pushes after the sign wait behind its dialog, so this move succeeds.
    session.evaluate_move(Some(Direction::Right)).expect("deferred");
    assert_eq!(session.state().gate.deferred_len(), 2);

    let error = session.confirm_dialog().expect_err("trap fails");
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(!session.dialog_showing());
    assert_eq!(session.dialog().ended, 1);
    assert_eq!(session.state().gate.deferred_len(), 0);
    assert_eq!(session.state().inventory.get("coin"), 1);
    assert_eq!(position(&session), (0, 1, 0));

    // Nothing is left to replay, so a second confirmation is a no-op.
    session.confirm_dialog().expect("nothing pending");
    assert_eq!(session.state().inventory.get("coin"), 1);
}

#[test]
fn moving_the_avatar_outside_the_room_grid_is_refused() {
    let portal = Sprite::new("portal").with_behavior(
        "push",
        vec![Action::MoveAvatar {
            room_index: 0,
            tile_x: 99,
            tile_y: -7,
        }],
    );
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), portal],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("portal", 1, 0)]],
    ));
    let error = session
        .evaluate_move(Some(Direction::Right))
        .expect_err("cell is off the grid");
    assert_eq!(
        error,
        PlayError::CellOutOfRoom {
            room_index: 0,
            x: 99,
            y: -7
        }
    );
    assert_eq!(error.kind(), ErrorKind::InvalidState);
    assert_eq!(position(&session), (0, 0, 0));
}

#[test]
fn quick_swipe_moves_once_after_release() {
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar()],
        vec![vec![Tile::new("hero", 0, 0)]],
    ));
    session.tick(0.0).expect("first tick");
    session
        .handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0 })
        .expect("down");
    session
        .handle_input(InputEvent::PointerMove { x: 100.0, y: 0.0 })
        .expect("move");
    session.handle_input(InputEvent::PointerUp).expect("up");

    let report = session.tick(16.0).expect("replay");
    assert_eq!(
        report.movement,
        Some(MoveOutcome::Committed { room_changed: false })
    );
    assert_eq!(position(&session), (0, 1, 0));

    session.tick(200.0).expect("idle");
    assert_eq!(position(&session), (0, 1, 0));
}

#[test]
fn key_press_is_evaluated_on_the_next_tick() {
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar()],
        vec![vec![Tile::new("hero", 2, 2)]],
    ));
    session.tick(0.0).expect("first tick");
    assert_eq!(session.tick(50.0).expect("quiet").movement, None);
    session.handle_input(key_down(Key::ArrowLeft)).expect("press");
    session
        .handle_input(InputEvent::KeyDown {
            key: Key::ArrowUp,
            repeat: true,
        })
        .expect("repeat ignored");
    let report = session.tick(10.0).expect("tick");
    assert_eq!(
        report.movement,
        Some(MoveOutcome::Committed { room_changed: false })
    );
    assert_eq!(position(&session), (0, 1, 2));
    assert_eq!(session.state().avatar.facing, Facing::Left);
    assert_eq!(
        session.render().avatars.last(),
        Some(&(1, 2, Facing::Left))
    );
}

#[test]
fn draw_skips_avatar_tiles() {
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("tree")],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("tree", 3, 3)]],
    ));
    session.tick(0.0).expect("tick");
    assert_eq!(session.render().tiles, vec![("tree".to_string(), 3, 3)]);
    assert_eq!(session.render().backgrounds, 1);
}

#[test]
fn crossing_into_a_new_room_rebuilds_the_cache() {
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("tree")],
        vec![
            vec![Tile::new("hero", 4, 2)],
            vec![Tile::new("tree", 3, 3)],
        ],
    ));
    let outcome = session.evaluate_move(Some(Direction::Right)).expect("cross");
    assert_eq!(outcome, MoveOutcome::Committed { room_changed: true });
    assert_eq!(position(&session), (1, 0, 2));
    assert_eq!(session.render().cache_clears, 2);
    assert_eq!(
        session.render().cached,
        vec![
            ("tree".to_string(), false),
            ("hero".to_string(), false),
            ("hero".to_string(), true),
        ]
    );
}

#[test]
fn push_can_redirect_the_move_to_another_room() {
    let portal = Sprite::new("portal").with_behavior(
        "push",
        vec![Action::MoveAvatar {
            room_index: 1,
            tile_x: 2,
            tile_y: 3,
        }],
    );
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), portal],
        vec![
            vec![Tile::new("hero", 0, 0), Tile::new("portal", 1, 0)],
            vec![],
        ],
    ));
    let outcome = session.evaluate_move(Some(Direction::Right)).expect("portal");
    assert_eq!(outcome, MoveOutcome::Committed { room_changed: true });
    assert_eq!(position(&session), (1, 2, 3));
}

#[test]
fn looping_sequence_cycles_across_pushes() {
    let bell = Sprite::new("bell").wall().with_behavior(
        "push",
        vec![Action::Sequence {
            is_looping: true,
            is_shuffled: false,
            action_list: vec![give("a"), give("b")],
        }],
    );
    let mut session = begin(world(
        vec![
            Sprite::new("hero").avatar(),
            Sprite::new("a"),
            Sprite::new("b"),
            bell,
        ],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("bell", 1, 0)]],
    ));
    for _ in 0..3 {
        session.evaluate_move(Some(Direction::Right)).expect("ring");
    }
    assert_eq!(session.state().inventory.get("a"), 2);
    assert_eq!(session.state().inventory.get("b"), 1);
    assert_eq!(session.state().sequences.len(), 1);
}

#[test]
fn shuffled_sequence_visits_every_action_once_per_cycle() {
    let bell = Sprite::new("bell").wall().with_behavior(
        "push",
        vec![Action::Sequence {
            is_looping: true,
            is_shuffled: true,
            action_list: vec![give("a"), give("b"), give("c")],
        }],
    );
    let mut session = begin(world(
        vec![
            Sprite::new("hero").avatar(),
            Sprite::new("a"),
            Sprite::new("b"),
            Sprite::new("c"),
            bell,
        ],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("bell", 1, 0)]],
    ));
    for _ in 0..3 {
        session.evaluate_move(Some(Direction::Right)).expect("ring");
    }
    for item in ["a", "b", "c"] {
        assert_eq!(session.state().inventory.get(item), 1, "{item}");
    }
}

#[test]
fn broadcast_handlers_do_not_retrigger_their_own_event() {
    let lever = Sprite::new("lever").wall().with_behavior("push", vec![trigger("ring")]);
    let bell = Sprite::new("bell").with_behavior("ring", vec![give("coin"), trigger("ring")]);
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("coin"), lever, bell],
        vec![
            vec![
                Tile::new("hero", 0, 0),
                Tile::new("lever", 1, 0),
                Tile::new("bell", 4, 4),
            ],
            vec![Tile::new("bell", 2, 2)],
        ],
    ));
    session.evaluate_move(Some(Direction::Right)).expect("pull");
    assert_eq!(session.state().inventory.get("coin"), 2);
}

#[test]
fn indirect_event_cycles_hit_the_depth_limit() {
    let lever = Sprite::new("lever").wall().with_behavior("push", vec![trigger("ping")]);
    let ping = Sprite::new("ping").with_behavior("ping", vec![give("coin"), trigger("pong")]);
    let pong = Sprite::new("pong").with_behavior("pong", vec![trigger("ping")]);
    let mut session = begin(world(
        vec![
            Sprite::new("hero").avatar(),
            Sprite::new("coin"),
            lever,
            ping,
            pong,
        ],
        vec![vec![
            Tile::new("hero", 0, 0),
            Tile::new("lever", 1, 0),
            Tile::new("ping", 3, 3),
            Tile::new("pong", 4, 4),
        ]],
    ));
    let error = session
        .evaluate_move(Some(Direction::Right))
        .expect_err("cycle");
    assert!(matches!(error, PlayError::RecursionLimit { limit: 16, .. }));
    assert_eq!(session.state().inventory.get("coin"), 0);
}

#[test]
fn ending_reports_abandoned_deferred_actions() {
    let sign = Sprite::new("sign").wall().with_behavior("push", vec![say("bye"), give("coin")]);
    let mut session = begin(world(
        vec![Sprite::new("hero").avatar(), Sprite::new("coin"), sign],
        vec![vec![Tile::new("hero", 0, 0), Tile::new("sign", 1, 0)]],
    ));
    session.evaluate_move(Some(Direction::Right)).expect("push");
    let summary = session.end();
    assert_eq!(summary.abandoned_deferred, 1);
    assert_eq!((summary.room_index, summary.x, summary.y), (0, 0, 0));
    assert!(summary.inventory.is_empty());
}
