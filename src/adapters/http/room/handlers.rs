//! HTTP handlers for room endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::room::{
    CloseRoomCommand, CloseRoomHandler, CreateRoomCommand, CreateRoomHandler,
    DeleteRoomCommand, DeleteRoomHandler, GetParticipantHandler, GetParticipantQuery,
    GetRoomHandler, GetRoomQuery, JoinRoomCommand, JoinRoomHandler, LeaveRoomCommand,
    LeaveRoomHandler, ListRoomsHandler, RoomAccessPolicy, UpdateRoomCommand, UpdateRoomHandler,
};
use crate::domain::foundation::{RoomId, UserId};
use crate::domain::room::RoomError;

use super::dto::{
    CloseRoomParams, CreateRoomRequest, CreateRoomResponse, ErrorResponse, JoinRoomRequest,
    KickParticipantParams, LeaveRoomRequest, MessageResponse, ParticipantParams,
    ParticipantResponse, RoomResponse, UpdateRoomRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct RoomAppState {
    pub create_handler: Arc<CreateRoomHandler>,
    pub join_handler: Arc<JoinRoomHandler>,
    pub leave_handler: Arc<LeaveRoomHandler>,
    pub close_handler: Arc<CloseRoomHandler>,
    pub get_handler: Arc<GetRoomHandler>,
    pub update_handler: Arc<UpdateRoomHandler>,
    pub delete_handler: Arc<DeleteRoomHandler>,
    pub list_handler: Arc<ListRoomsHandler>,
    pub get_participant_handler: Arc<GetParticipantHandler>,
    pub access_policy: Arc<RoomAccessPolicy>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/rooms/create - Create a new room
pub async fn create_room(
    State(state): State<RoomAppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Response {
    let hoster = match parse_user_id(&req.hoster) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .create_handler
        .handle(CreateRoomCommand { hoster_user_id: hoster })
        .await
    {
        Ok(result) => {
            let response = CreateRoomResponse {
                room_id: result.room.room_id().to_string(),
                join_password: result.room.join_secret().as_str().to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_room_error(e),
    }
}

/// POST /api/rooms/join - Join a room with its password
pub async fn join_room(
    State(state): State<RoomAppState>,
    Json(req): Json<JoinRoomRequest>,
) -> Response {
    let (room_id, user_id) = match parse_room_and_user(&req.room_id, &req.user_id) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    let cmd = JoinRoomCommand {
        room_id,
        password: req.password,
        user_id,
    };

    match state.join_handler.handle(cmd).await {
        Ok(result) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: result.message().to_string(),
            }),
        )
            .into_response(),
        Err(e) => handle_room_error(e),
    }
}

/// POST /api/rooms/leave - Leave a room
pub async fn leave_room(
    State(state): State<RoomAppState>,
    Json(req): Json<LeaveRoomRequest>,
) -> Response {
    let (room_id, user_id) = match parse_room_and_user(&req.room_id, &req.user_id) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    match state
        .leave_handler
        .handle(LeaveRoomCommand { room_id, user_id })
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: result.message().to_string(),
            }),
        )
            .into_response(),
        Err(e) => handle_room_error(e),
    }
}

/// DELETE /api/rooms/close - Close a room (host only)
pub async fn close_room(
    State(state): State<RoomAppState>,
    Query(params): Query<CloseRoomParams>,
) -> Response {
    let (room_id, user_id) = match parse_room_and_user(&params.room_id, &params.hoster) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    match state
        .close_handler
        .handle(CloseRoomCommand { room_id, user_id })
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: result.message().to_string(),
            }),
        )
            .into_response(),
        Err(e) => handle_room_error(e),
    }
}

/// GET /api/rooms/:room_id - Get room details
pub async fn get_room(
    State(state): State<RoomAppState>,
    Path(room_id): Path<String>,
) -> Response {
    let room_id = match parse_room_id(&room_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.get_handler.handle(GetRoomQuery { room_id }).await {
        Ok(room) => (StatusCode::OK, Json(RoomResponse::from(&room))).into_response(),
        Err(e) => handle_room_error(e),
    }
}

/// GET /api/rooms - List all rooms
pub async fn list_rooms(State(state): State<RoomAppState>) -> Response {
    match state.list_handler.handle().await {
        Ok(rooms) => {
            let response: Vec<RoomResponse> = rooms.iter().map(RoomResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_room_error(e),
    }
}

/// PUT /api/rooms/:room_id - Update a room
pub async fn update_room(
    State(state): State<RoomAppState>,
    Path(room_id): Path<String>,
    Json(req): Json<UpdateRoomRequest>,
) -> Response {
    let room_id = match parse_room_id(&room_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if req.room_id != room_id.to_string() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Body room_id must match path")),
        )
            .into_response();
    }

    match state.update_handler.handle(UpdateRoomCommand { room_id }).await {
        Ok(room) => (StatusCode::OK, Json(RoomResponse::from(&room))).into_response(),
        Err(e) => handle_room_error(e),
    }
}

/// DELETE /api/rooms/:room_id - Delete a room
pub async fn delete_room(
    State(state): State<RoomAppState>,
    Path(room_id): Path<String>,
) -> Response {
    let room_id = match parse_room_id(&room_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.delete_handler.handle(DeleteRoomCommand { room_id }).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_room_error(e),
    }
}

/// GET /api/participants - Look up one membership record
pub async fn get_participant(
    State(state): State<RoomAppState>,
    Query(params): Query<ParticipantParams>,
) -> Response {
    let (room_id, user_id) = match parse_room_and_user(&params.room_id, &params.user_id) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    match state
        .get_participant_handler
        .handle(GetParticipantQuery { room_id, user_id })
        .await
    {
        Ok(participant) => {
            (StatusCode::OK, Json(ParticipantResponse::from(&participant))).into_response()
        }
        Err(e) => handle_room_error(e),
    }
}

/// DELETE /api/participants - Remove a member (host only)
///
/// The host check runs at the transport edge; the removal itself goes
/// through the leave flow so succession and teardown rules apply to kicks
/// exactly as they do to voluntary departures.
pub async fn kick_participant(
    State(state): State<RoomAppState>,
    Query(params): Query<KickParticipantParams>,
) -> Response {
    let (room_id, user_id) = match parse_room_and_user(&params.room_id, &params.user_id) {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    let hoster = match parse_user_id(&params.hoster) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if !state.access_policy.is_host(&room_id, &hoster).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::forbidden("Only the host may remove participants")),
        )
            .into_response();
    }

    match state
        .leave_handler
        .handle(LeaveRoomCommand { room_id, user_id })
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_room_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Parsing and error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_room_id(raw: &str) -> Result<RoomId, Response> {
    raw.parse::<RoomId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid room ID")),
        )
            .into_response()
    })
}

fn parse_user_id(raw: &str) -> Result<UserId, Response> {
    UserId::new(raw.to_string()).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid user ID: {}", e))),
        )
            .into_response()
    })
}

fn parse_room_and_user(room_id: &str, user_id: &str) -> Result<(RoomId, UserId), Response> {
    Ok((parse_room_id(room_id)?, parse_user_id(user_id)?))
}

fn handle_room_error(error: RoomError) -> Response {
    let status = match &error {
        RoomError::NotFound(_) | RoomError::ParticipantNotFound { .. } => StatusCode::NOT_FOUND,
        RoomError::Forbidden => StatusCode::FORBIDDEN,
        RoomError::AlreadyJoined { .. } => StatusCode::CONFLICT,
        RoomError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorResponse::new(error.code().to_string(), error.message());
    (status, Json(body)).into_response()
}
