use pretty_assertions::assert_eq;
use sphere_flyer::{
    agent::TrainingStage,
    server::{Command, Response, ServerSession},
};

fn step_response(session: &mut ServerSession, flap: i64, strafe: i64) -> Response {
    session
        .handle(Command::Step { flap, strafe })
        .expect("step should succeed")
}

#[test]
fn test_full_session() {
    let mut session = ServerSession::new();
    let ready = session
        .handle(Command::Initialize {
            config: serde_json::json!({ "seed": 1, "agent": { "max_episode_steps": 20 } }),
        })
        .unwrap();
    assert!(matches!(ready, Response::Ready { .. }));

    session
        .handle(Command::SetStage {
            stage: TrainingStage::SimplePipes,
        })
        .unwrap();
    session.handle(Command::Reset { seed: None }).unwrap();

    let mut last = None;
    for _ in 0..20 {
        last = Some(step_response(&mut session, 0, 1));
    }
    let Some(Response::Step {
        obs,
        truncated,
        terminated,
        info,
        ..
    }) = last
    else {
        panic!("expected a step response");
    };
    assert_eq!(obs.len(), 9);
    assert!(truncated);
    assert!(!terminated);
    assert_eq!(info.stage, TrainingStage::SimplePipes);
    assert_eq!(info.steps, 20);

    let json = session.handle_line(r#"{"Reset": {"seed": 5}}"#);
    let Response::Step { info, .. } = json else {
        panic!("expected a step response");
    };
    assert_eq!(info.steps, 0);

    assert!(matches!(
        session.handle(Command::Close).unwrap(),
        Response::Status { .. }
    ));
}

#[test]
fn test_same_seed_same_trajectory() {
    let run = || {
        let mut session = ServerSession::new();
        session.handle_line(r#"{"Initialize": {"config": {"curriculum": {"start_stage": "FullGame"}}}}"#);
        session.handle_line(r#"{"Reset": {"seed": 11}}"#);
        (0..100)
            .map(|i| step_response(&mut session, (i % 15 == 0) as i64, (i % 3) as i64))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
