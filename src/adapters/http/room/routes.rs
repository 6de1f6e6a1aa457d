//! HTTP routes for room endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    close_room, create_room, delete_room, get_participant, get_room, join_room,
    kick_participant, leave_room, list_rooms, update_room, RoomAppState,
};

/// Creates the room router with all endpoints, nested under `/api`.
pub fn room_router(state: RoomAppState) -> Router {
    let rooms = Router::new()
        .route("/create", post(create_room))
        .route("/join", post(join_room))
        .route("/leave", post(leave_room))
        .route("/close", delete(close_room))
        .route("/", get(list_rooms))
        .route(
            "/:room_id",
            get(get_room).put(update_room).delete(delete_room),
        );

    let participants = Router::new().route("/", get(get_participant).delete(kick_participant));

    Router::new()
        .nest("/api/rooms", rooms)
        .nest("/api/participants", participants)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::adapters::{InMemoryRoomCache, InMemoryRoomNotifier, InMemoryRoomRepository};
    use crate::application::handlers::room::{
        CloseRoomHandler, CreateRoomHandler, DeleteRoomHandler, GetParticipantHandler,
        GetRoomHandler, JoinRoomHandler, LeaveRoomHandler, ListRoomsHandler, RoomAccessPolicy,
        UpdateRoomHandler,
    };
    use crate::ports::{RoomCache, RoomNotifier, RoomRepository};

    fn state() -> RoomAppState {
        let repository: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
        let cache: Arc<dyn RoomCache> = Arc::new(InMemoryRoomCache::new());
        let notifier: Arc<dyn RoomNotifier> = Arc::new(InMemoryRoomNotifier::new());

        RoomAppState {
            create_handler: Arc::new(CreateRoomHandler::new(repository.clone(), cache.clone())),
            join_handler: Arc::new(JoinRoomHandler::new(
                repository.clone(),
                cache.clone(),
                notifier.clone(),
            )),
            leave_handler: Arc::new(LeaveRoomHandler::new(
                repository.clone(),
                cache.clone(),
                notifier.clone(),
            )),
            close_handler: Arc::new(CloseRoomHandler::new(
                repository.clone(),
                cache.clone(),
                notifier,
            )),
            get_handler: Arc::new(GetRoomHandler::new(repository.clone(), cache.clone())),
            update_handler: Arc::new(UpdateRoomHandler::new(repository.clone(), cache.clone())),
            delete_handler: Arc::new(DeleteRoomHandler::new(repository.clone(), cache.clone())),
            list_handler: Arc::new(ListRoomsHandler::new(repository.clone())),
            get_participant_handler: Arc::new(GetParticipantHandler::new(
                repository.clone(),
                cache.clone(),
            )),
            access_policy: Arc::new(RoomAccessPolicy::new(repository, cache)),
        }
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips_through_router() {
        let app = room_router(state());

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/rooms/create",
                serde_json::json!({ "hoster": "alice" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let room_id = created["room_id"].as_str().unwrap().to_string();
        assert_eq!(created["join_password"].as_str().unwrap().len(), 6);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/rooms/{}", room_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["room_id"].as_str().unwrap(), room_id);
        assert_eq!(fetched["hoster_user_id"].as_str().unwrap(), "alice");
    }

    #[tokio::test]
    async fn join_with_wrong_password_maps_to_forbidden() {
        let app = room_router(state());

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/rooms/create",
                serde_json::json!({ "hoster": "alice" }),
            ))
            .await
            .unwrap();
        let room_id = body_json(response).await["room_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(json_post(
                "/api/rooms/join",
                serde_json::json!({
                    "room_id": room_id,
                    "password": "000000",
                    "user_id": "bob"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn unknown_room_maps_to_not_found() {
        let app = room_router(state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/rooms/{}",
                        crate::domain::foundation::RoomId::new()
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_room_id_is_bad_request() {
        let app = room_router(state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/rooms/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
