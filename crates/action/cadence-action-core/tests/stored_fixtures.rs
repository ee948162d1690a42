use cadence_action_core::{parse_action_json, Action, Callbacks, Config, Host, Sprite};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn load_action(name: &str) -> Action {
    let json = cadence_test_fixtures::actions::json(name).expect("load action fixture");
    parse_action_json(&json).expect("parse action fixture")
}

fn walker_host() -> Host<Sprite> {
    let sprite: Sprite = cadence_test_fixtures::sprites::load("walker").expect("load walker");
    Host::new(
        sprite,
        Config {
            seed: Some(3),
            ..Config::default()
        },
    )
}

fn run_until_idle(host: &mut Host<Sprite>, dt: f32, max_frames: usize) -> usize {
    let mut frames = 0;
    while !host.is_idle() {
        assert!(frames < max_frames, "host still busy after {max_frames} frames");
        host.step(dt).expect("step");
        frames += 1;
    }
    frames
}

#[test]
fn stored_sequence_matches_the_builder_form() {
    let parsed = load_action("place-then-move");
    let built = Action::place([0.0, 0.0, 0.0]) + Action::move_by([100.0, 0.0, 0.0], 2.0);
    assert_eq!(parsed, built);
    assert_eq!(parsed.nominal_duration(), Some(2.0));
}

#[test]
fn every_stored_action_validates_against_the_walker() {
    let host = walker_host();
    let callbacks = Callbacks::new();
    for key in cadence_test_fixtures::actions::keys() {
        let action = load_action(&key);
        action
            .validate_for(host.target(), &callbacks)
            .unwrap_or_else(|e| panic!("fixture {key} failed validation: {e}"));
    }
}

#[test]
fn patrol_forever_ping_pongs_between_endpoints() {
    let mut host = walker_host();
    let id = host.do_action(&load_action("patrol-forever")).unwrap();

    for _ in 0..4 {
        host.step(0.25).unwrap();
    }
    approx(host.target().position[0], 50.0, 1e-4);
    // One sliver past the end finishes the lap and turns it around.
    host.step(0.25).unwrap();
    approx(host.target().position[0], 50.0, 1e-4);
    host.step(0.25).unwrap();
    approx(host.target().position[0], 40.0, 1e-4);

    for _ in 0..1_000 {
        host.step(0.25).unwrap();
        let x = host.target().position[0];
        assert!((10.0 - 1e-3..=50.0 + 1e-3).contains(&x), "x={x}");
    }
    assert!(host.is_running(id));
    approx(host.target().position[1], 20.0, 1e-6);
}

#[test]
fn hop_and_fade_lands_and_disappears() {
    let mut host = walker_host();
    host.do_action(&load_action("hop-and-fade")).unwrap();
    assert_eq!(host.len(), 2);

    host.step(0.25).unwrap();
    // Halfway through the first of two hops: peak height.
    approx(host.target().position[0], 25.0, 1e-4);
    approx(host.target().position[1], 45.0, 1e-3);
    assert!(host.target().visible);

    run_until_idle(&mut host, 0.25, 40);
    let sprite = host.target();
    approx(sprite.position[0], 70.0, 1e-3);
    approx(sprite.position[1], 20.0, 1e-3);
    approx(sprite.opacity, 0.0, 1e-6);
    assert!(!sprite.visible);
}

#[test]
fn walk_cycle_plays_the_animation_twice() {
    let mut host = walker_host();
    host.do_action(&load_action("walk-cycle")).unwrap();
    assert_eq!(host.target().current_animation.as_deref(), Some("walk"));
    assert_eq!(host.target().frame, 0);

    let mut frames_seen = Vec::new();
    let mut steps = 0;
    while !host.is_idle() {
        assert!(steps < 100, "walk cycle never finished");
        host.step(0.1).unwrap();
        frames_seen.push(host.target().frame);
        steps += 1;
    }
    assert_eq!(host.target().frame, 3);
    // The second lap rewinds to frame 0 before animating again.
    let first_three = frames_seen.iter().position(|f| *f == 3).unwrap();
    assert!(frames_seen[first_three..].contains(&0));
}
