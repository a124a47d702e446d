//! Scripted conformance run against a live server
//!
//! The steps run in order over one connection and share state: later steps
//! depend on avatars created and moved by earlier ones.

use crate::error::{ClientError, Result};
use crate::network::Client;
use avatar_shared::{ErrorReason, Position, Request, Response};
use log::info;

#[derive(Debug, Clone)]
pub struct Step {
    pub description: &'static str,
    pub request: Request,
    pub expected: Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub steps_passed: usize,
}

fn spawn(id: &str, x: i64, y: i64) -> Request {
    Request::Spawn {
        id: id.to_string(),
        x,
        y,
    }
}

fn move_up(id: &str, distance: i64) -> Request {
    Request::MoveUp {
        id: id.to_string(),
        distance,
    }
}

fn move_right(id: &str, distance: i64) -> Request {
    Request::MoveRight {
        id: id.to_string(),
        distance,
    }
}

fn position(id: &str) -> Request {
    Request::Position { id: id.to_string() }
}

fn at(x: i64, y: i64) -> Response {
    Response::Position(Position::new(x, y))
}

pub fn conformance_steps() -> Vec<Step> {
    let step = |description, request, expected| Step {
        description,
        request,
        expected,
    };
    let ok = Response::Success;
    let not_found = Response::Error(ErrorReason::AvatarNotFound);

    vec![
        step("Spawn avatar1 at (50, 50)", spawn("avatar1", 50, 50), ok),
        step("Move avatar1 up by -30", move_up("avatar1", -30), ok),
        step("Move avatar1 right by 120", move_right("avatar1", 120), ok),
        step("Query avatar1 position", position("avatar1"), at(20, 170)),
        step("Spawn avatar3 at (0, 0)", spawn("avatar3", 0, 0), ok),
        step("Move avatar3 to top edge", move_up("avatar3", -50), ok),
        step("Move avatar3 to bottom edge", move_up("avatar3", 200), ok),
        step("Move avatar3 to left edge", move_right("avatar3", -200), ok),
        step("Move avatar3 to right edge", move_right("avatar3", 200), ok),
        step("Query avatar3 corner", position("avatar3"), at(200, 200)),
        step(
            "Move non-existent avatar",
            move_up("nonExistentAvatar", 10),
            not_found,
        ),
        step(
            "Move avatar3 by a large negative value",
            move_up("avatar3", -500),
            ok,
        ),
        step("Query avatar3 after -500", position("avatar3"), at(0, 200)),
        step(
            "Spawn avatar4 at negative coordinates",
            spawn("avatar4", -10, -10),
            Response::Error(ErrorReason::OutOfBounds),
        ),
        step("Query rejected avatar4", position("avatar4"), not_found),
        step("First move of avatar1", move_right("avatar1", 20), ok),
        step("Query after first move", position("avatar1"), at(20, 190)),
        step("Second move of avatar1", move_right("avatar1", 20), ok),
        step("Query after second move", position("avatar1"), at(20, 200)),
    ]
}

/// Runs every step, stopping at the first reply that does not match
pub async fn run(client: &mut Client) -> Result<Report> {
    run_steps(client, &conformance_steps()).await
}

pub async fn run_steps(client: &mut Client, steps: &[Step]) -> Result<Report> {
    for (index, step) in steps.iter().enumerate() {
        let actual = client.send(&step.request).await?;

        if let (Request::Position { id }, Response::Position(p)) = (&step.request, &actual) {
            info!("Avatar {} is at position ({}, {})", id, p.x, p.y);
        }

        if actual != step.expected {
            return Err(ClientError::UnexpectedResponse {
                step: index + 1,
                description: step.description.to_string(),
                expected: step.expected.encode(),
                actual: actual.encode(),
            });
        }
    }

    Ok(Report {
        steps_passed: steps.len(),
    })
}
