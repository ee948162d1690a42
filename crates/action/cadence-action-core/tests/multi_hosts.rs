use cadence_action_core::{Action, Config, Host, Sprite};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn host_at(position: [f32; 3]) -> Host<Sprite> {
    Host::new(
        Sprite::at(position),
        Config {
            seed: Some(17),
            ..Config::default()
        },
    )
}

#[test]
fn one_template_drives_independent_runs() {
    let jump = Action::jump_by([30.0, 0.0, 0.0], 10.0, 1, 1.0);
    let before = jump.clone();

    let mut a = host_at([0.0, 0.0, 0.0]);
    let mut b = host_at([100.0, 0.0, 0.0]);
    let id_a = a.do_action(&jump).unwrap();
    let id_b = b.do_action(&jump).unwrap();

    // Seeking one run leaves the other untouched.
    a.instance_mut(id_a).unwrap().set_runtime(0.9);
    assert_eq!(b.instance(id_b).unwrap().runtime(), 0.0);

    a.step(0.05).unwrap();
    b.step(0.5).unwrap();
    approx(a.target().position[0], 28.5, 1e-4);
    approx(b.target().position[0], 115.0, 1e-4);
    approx(b.target().position[1], 10.0, 1e-4);

    // The template itself never carries run state.
    assert_eq!(jump, before);
}

#[test]
fn same_template_twice_on_one_host_gets_two_runs() {
    let mut host = host_at([0.0, 0.0, 0.0]);
    let spin = Action::rotate(90.0, 1.0);
    let first = host.do_action(&spin).unwrap();
    host.step(0.5).unwrap();
    let second = host.do_action(&spin).unwrap();

    assert_ne!(first, second);
    assert_eq!(host.instance(first).unwrap().runtime(), 0.5);
    assert_eq!(host.instance(second).unwrap().runtime(), 0.0);

    // Both write rotation; the later run captured 45 as its baseline and wins.
    host.step(0.5).unwrap();
    approx(host.target().rotation, 90.0, 1e-4);
    assert!(host.is_running(first));

    host.step(0.1).unwrap();
    assert!(!host.is_running(first));
    assert!(host.is_running(second));
}

#[test]
fn hosts_reuse_a_shared_sequence_template() {
    let patrol = (Action::move_by([10.0, 0.0, 0.0], 1.0) + Action::move_by([-10.0, 0.0, 0.0], 1.0))
        .repeat(2);
    let mut hosts: Vec<Host<Sprite>> = (0..3).map(|i| host_at([i as f32, 0.0, 0.0])).collect();
    for host in &mut hosts {
        host.do_action(&patrol).unwrap();
    }
    for (i, host) in hosts.iter_mut().enumerate() {
        // Stagger the hosts so their runs drift apart.
        for _ in 0..(2 + i) {
            host.step(0.4).unwrap();
        }
    }
    let xs: Vec<f32> = hosts.iter().map(|h| h.target().position[0]).collect();
    approx(xs[0], 8.0, 1e-4);
    approx(xs[1], 11.0, 1e-4);
    // Third host is already on the way back from 12.
    approx(xs[2], 8.0, 1e-4);
}
