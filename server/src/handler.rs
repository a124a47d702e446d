//! Request dispatch from decoded wire messages onto the avatar store

use crate::error::StoreError;
use crate::store::AvatarStore;
use avatar_shared::{ErrorReason, Request, Response};
use log::{debug, warn};
use tokio::sync::RwLock;

/// Applies a single request to the store and builds the reply
///
/// The wire actions `moveUp` and `moveRight` translate along the x and y axes
/// respectively.
pub fn dispatch(store: &mut AvatarStore, request: Request) -> Response {
    let result = match request {
        Request::Spawn { id, x, y } => store.spawn(&id, x, y),
        Request::MoveUp { id, distance } => store.move_along_x(&id, distance),
        Request::MoveRight { id, distance } => store.move_along_y(&id, distance),
        request => return query(store, request),
    };

    reply(result.map(|_| Response::Success))
}

/// Answers the requests that never mutate the store
///
/// Mutations are rejected with `Invalid action`; they only reach the store
/// through [`dispatch`].
pub fn query(store: &AvatarStore, request: Request) -> Response {
    match request {
        Request::Position { id } => reply(store.position(&id).map(Response::Position)),
        Request::Unknown => {
            warn!("Invalid action in request");
            Response::Error(ErrorReason::InvalidAction)
        }
        request => {
            warn!("{} needs write access to the store", request.action());
            Response::Error(ErrorReason::InvalidAction)
        }
    }
}

fn reply(result: Result<Response, StoreError>) -> Response {
    result.unwrap_or_else(|e| {
        debug!("Request rejected: {}", e);
        Response::Error(e.reason())
    })
}

/// Decodes a text message and runs it against the shared store
///
/// Read-only requests take the read side of the lock; every other request
/// holds the write side for the duration of one store operation.
pub async fn handle_message(store: &RwLock<AvatarStore>, text: &str) -> Response {
    let request = match Request::decode(text) {
        Ok(request) => request,
        Err(e) => {
            warn!("Malformed request: {}", e);
            return Response::Error(ErrorReason::MalformedRequest);
        }
    };

    debug!("Handling {} for {:?}", request.action(), request.id());

    if request.is_read_only() {
        query(&*store.read().await, request)
    } else {
        dispatch(&mut *store.write().await, request)
    }
}
