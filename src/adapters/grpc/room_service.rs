//! gRPC implementation of the room service.
//!
//! Exposes the same five lifecycle operations as the HTTP adapter with the
//! same semantics; only the envelope differs.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::debug;

use crate::application::handlers::room::{
    CloseRoomCommand, CloseRoomHandler, CreateRoomCommand, CreateRoomHandler, GetRoomHandler,
    GetRoomQuery, JoinRoomCommand, JoinRoomHandler, LeaveRoomCommand, LeaveRoomHandler,
};
use crate::domain::foundation::{RoomId, UserId};
use crate::domain::room::{RoomError, RoomStatus};

pub mod proto {
    tonic::include_proto!("room.v1");
}

use proto::room_service_server::RoomService;
use proto::{
    CloseRoomRequest, CloseRoomResponse, CreateRoomRequest, CreateRoomResponse, GetRoomRequest,
    GetRoomResponse, JoinRoomRequest, JoinRoomResponse, LeaveRoomRequest, LeaveRoomResponse,
};

/// Room gRPC service implementation.
pub struct RoomGrpcService {
    create_handler: Arc<CreateRoomHandler>,
    join_handler: Arc<JoinRoomHandler>,
    leave_handler: Arc<LeaveRoomHandler>,
    close_handler: Arc<CloseRoomHandler>,
    get_handler: Arc<GetRoomHandler>,
}

impl RoomGrpcService {
    pub fn new(
        create_handler: Arc<CreateRoomHandler>,
        join_handler: Arc<JoinRoomHandler>,
        leave_handler: Arc<LeaveRoomHandler>,
        close_handler: Arc<CloseRoomHandler>,
        get_handler: Arc<GetRoomHandler>,
    ) -> Self {
        Self {
            create_handler,
            join_handler,
            leave_handler,
            close_handler,
            get_handler,
        }
    }
}

#[tonic::async_trait]
impl RoomService for RoomGrpcService {
    async fn create_room(
        &self,
        request: Request<CreateRoomRequest>,
    ) -> Result<Response<CreateRoomResponse>, Status> {
        let req = request.into_inner();
        debug!(hoster = %req.hoster_user_id, "gRPC CreateRoom");

        let hoster_user_id = parse_user_id(&req.hoster_user_id)?;
        let result = self
            .create_handler
            .handle(CreateRoomCommand { hoster_user_id })
            .await
            .map_err(room_error_to_status)?;

        Ok(Response::new(CreateRoomResponse {
            room_id: result.room.room_id().to_string(),
            join_password: result.room.join_secret().as_str().to_string(),
        }))
    }

    async fn join_room(
        &self,
        request: Request<JoinRoomRequest>,
    ) -> Result<Response<JoinRoomResponse>, Status> {
        let req = request.into_inner();

        let cmd = JoinRoomCommand {
            room_id: parse_room_id(&req.room_id)?,
            password: req.password,
            user_id: parse_user_id(&req.user_id)?,
        };
        let result = self
            .join_handler
            .handle(cmd)
            .await
            .map_err(room_error_to_status)?;

        Ok(Response::new(JoinRoomResponse {
            message: result.message().to_string(),
        }))
    }

    async fn leave_room(
        &self,
        request: Request<LeaveRoomRequest>,
    ) -> Result<Response<LeaveRoomResponse>, Status> {
        let req = request.into_inner();

        let cmd = LeaveRoomCommand {
            room_id: parse_room_id(&req.room_id)?,
            user_id: parse_user_id(&req.user_id)?,
        };
        let result = self
            .leave_handler
            .handle(cmd)
            .await
            .map_err(room_error_to_status)?;

        Ok(Response::new(LeaveRoomResponse {
            message: result.message().to_string(),
        }))
    }

    async fn close_room(
        &self,
        request: Request<CloseRoomRequest>,
    ) -> Result<Response<CloseRoomResponse>, Status> {
        let req = request.into_inner();

        let cmd = CloseRoomCommand {
            room_id: parse_room_id(&req.room_id)?,
            user_id: parse_user_id(&req.hoster_user_id)?,
        };
        let result = self
            .close_handler
            .handle(cmd)
            .await
            .map_err(room_error_to_status)?;

        Ok(Response::new(CloseRoomResponse {
            message: result.message().to_string(),
        }))
    }

    async fn get_room(
        &self,
        request: Request<GetRoomRequest>,
    ) -> Result<Response<GetRoomResponse>, Status> {
        let req = request.into_inner();

        let room = self
            .get_handler
            .handle(GetRoomQuery {
                room_id: parse_room_id(&req.room_id)?,
            })
            .await
            .map_err(room_error_to_status)?;

        Ok(Response::new(GetRoomResponse {
            room_id: room.room_id().to_string(),
            hoster_user_id: room.hoster_user_id().to_string(),
            join_password: room.join_secret().as_str().to_string(),
            status: room_status_to_str(room.status()).to_string(),
        }))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Conversions
// ════════════════════════════════════════════════════════════════════════════

fn parse_room_id(raw: &str) -> Result<RoomId, Status> {
    raw.parse::<RoomId>()
        .map_err(|_| Status::invalid_argument("Invalid room ID"))
}

fn parse_user_id(raw: &str) -> Result<UserId, Status> {
    UserId::new(raw.to_string())
        .map_err(|e| Status::invalid_argument(format!("Invalid user ID: {}", e)))
}

fn room_status_to_str(status: RoomStatus) -> &'static str {
    match status {
        RoomStatus::Active => "ACTIVE",
        RoomStatus::Closed => "CLOSED",
    }
}

fn room_error_to_status(error: RoomError) -> Status {
    match &error {
        RoomError::NotFound(_) | RoomError::ParticipantNotFound { .. } => {
            Status::not_found(error.message())
        }
        RoomError::Forbidden => Status::permission_denied(error.message()),
        RoomError::AlreadyJoined { .. } => Status::already_exists(error.message()),
        RoomError::Storage(_) => Status::internal(error.message()),
    }
}
