//! PostgreSQL implementation of RoomRepository.
//!
//! Persists Room aggregates and their participant records. The
//! `participants` table carries a composite (user_id, room_id) primary key;
//! `insert_participant` leans on it with `ON CONFLICT DO NOTHING` so a
//! concurrent duplicate join is reported as a `Duplicate` outcome instead of
//! an error.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, Timestamp, UserId};
use crate::domain::room::{JoinSecret, Participant, Role, Room, RoomStatus};
use crate::ports::{ParticipantInsert, RoomRepository};

/// PostgreSQL implementation of RoomRepository.
#[derive(Clone)]
pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    /// Creates a new PostgresRoomRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    async fn create(&self, room: &Room) -> Result<(), DomainError> {
        // Room row and seed participants land in one transaction so no
        // reader ever observes a hostless room.
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO rooms (
                room_id, hoster_user_id, join_password, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(room.room_id().as_uuid())
        .bind(room.hoster_user_id().as_str())
        .bind(room.join_secret().as_str())
        .bind(room_status_to_str(room.status()))
        .bind(room.created_at().as_datetime())
        .bind(room.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert room: {}", e),
            )
        })?;

        for participant in room.participants() {
            sqlx::query(
                r#"
                INSERT INTO participants (user_id, room_id, role, joined_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(participant.user_id().as_str())
            .bind(participant.room_id().as_uuid())
            .bind(role_to_str(participant.role()))
            .bind(participant.joined_at().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert participant: {}", e),
                )
            })?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit room creation: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT room_id, hoster_user_id, join_password, status, created_at, updated_at
            FROM rooms
            WHERE room_id = $1
            "#,
        )
        .bind(room_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch room: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_room(row, Vec::new())?)),
            None => Ok(None),
        }
    }

    async fn find_with_participants(
        &self,
        room_id: &RoomId,
    ) -> Result<Option<Room>, DomainError> {
        let room_row = sqlx::query(
            r#"
            SELECT room_id, hoster_user_id, join_password, status, created_at, updated_at
            FROM rooms
            WHERE room_id = $1
            "#,
        )
        .bind(room_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch room: {}", e),
            )
        })?;

        let Some(room_row) = room_row else {
            return Ok(None);
        };

        let participant_rows = sqlx::query(
            r#"
            SELECT user_id, room_id, role, joined_at
            FROM participants
            WHERE room_id = $1
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(room_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch participants: {}", e),
            )
        })?;

        let participants: Result<Vec<Participant>, DomainError> =
            participant_rows.into_iter().map(row_to_participant).collect();

        Ok(Some(row_to_room(room_row, participants?)?))
    }

    async fn find_all(&self) -> Result<Vec<Room>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT room_id, hoster_user_id, join_password, status, created_at, updated_at
            FROM rooms
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch rooms: {}", e),
            )
        })?;

        rows.into_iter().map(|row| row_to_room(row, Vec::new())).collect()
    }

    async fn update(&self, room: &Room) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE rooms SET
                hoster_user_id = $2,
                status = $3,
                updated_at = $4
            WHERE room_id = $1
            "#,
        )
        .bind(room.room_id().as_uuid())
        .bind(room.hoster_user_id().as_str())
        .bind(room_status_to_str(room.status()))
        .bind(room.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update room: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::RoomNotFound,
                format!("Room not found: {}", room.room_id()),
            ));
        }

        Ok(())
    }

    async fn delete(&self, room_id: &RoomId) -> Result<(), DomainError> {
        // ON DELETE CASCADE takes the participant rows with it.
        sqlx::query("DELETE FROM rooms WHERE room_id = $1")
            .bind(room_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete room: {}", e),
                )
            })?;

        Ok(())
    }

    async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> Result<ParticipantInsert, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO participants (user_id, room_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, room_id) DO NOTHING
            "#,
        )
        .bind(participant.user_id().as_str())
        .bind(participant.room_id().as_uuid())
        .bind(role_to_str(participant.role()))
        .bind(participant.joined_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert participant: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            Ok(ParticipantInsert::Duplicate)
        } else {
            Ok(ParticipantInsert::Inserted)
        }
    }

    async fn transfer_host(
        &self,
        room: &Room,
        successor: &Participant,
        departed: &UserId,
    ) -> Result<(), DomainError> {
        // Promotion, departure, and the room's host field move together;
        // a rollback leaves the old host fully in place.
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        let result = sqlx::query(
            r#"
            UPDATE participants SET role = $3
            WHERE user_id = $1 AND room_id = $2
            "#,
        )
        .bind(successor.user_id().as_str())
        .bind(successor.room_id().as_uuid())
        .bind(role_to_str(successor.role()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to promote participant: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ParticipantNotFound,
                format!(
                    "Participant not found: {} in room {}",
                    successor.user_id(),
                    successor.room_id()
                ),
            ));
        }

        sqlx::query("DELETE FROM participants WHERE user_id = $1 AND room_id = $2")
            .bind(departed.as_str())
            .bind(room.room_id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete departed host: {}", e),
                )
            })?;

        sqlx::query(
            r#"
            UPDATE rooms SET
                hoster_user_id = $2,
                status = $3,
                updated_at = $4
            WHERE room_id = $1
            "#,
        )
        .bind(room.room_id().as_uuid())
        .bind(room.hoster_user_id().as_str())
        .bind(room_status_to_str(room.status()))
        .bind(room.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update room host: {}", e),
            )
        })?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit host transfer: {}", e),
            )
        })?;

        Ok(())
    }

    async fn delete_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM participants WHERE user_id = $1 AND room_id = $2")
            .bind(user_id.as_str())
            .bind(room_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete participant: {}", e),
                )
            })?;

        Ok(())
    }

    async fn delete_participants(&self, room_id: &RoomId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM participants WHERE room_id = $1")
            .bind(room_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete participants: {}", e),
                )
            })?;

        Ok(())
    }

    async fn find_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, room_id, role, joined_at
            FROM participants
            WHERE user_id = $1 AND room_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(room_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch participant: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_participant(row)?)),
            None => Ok(None),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn room_status_to_str(status: RoomStatus) -> &'static str {
    match status {
        RoomStatus::Active => "ACTIVE",
        RoomStatus::Closed => "CLOSED",
    }
}

fn str_to_room_status(s: &str) -> Result<RoomStatus, DomainError> {
    match s {
        "ACTIVE" => Ok(RoomStatus::Active),
        "CLOSED" => Ok(RoomStatus::Closed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid room status: {}", s),
        )),
    }
}

fn role_to_str(role: Role) -> &'static str {
    match role {
        Role::Hoster => "HOSTER",
        Role::Participant => "PARTICIPANT",
    }
}

fn str_to_role(s: &str) -> Result<Role, DomainError> {
    match s {
        "HOSTER" => Ok(Role::Hoster),
        "PARTICIPANT" => Ok(Role::Participant),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid participant role: {}", s),
        )),
    }
}

fn row_to_room(
    row: sqlx::postgres::PgRow,
    participants: Vec<Participant>,
) -> Result<Room, DomainError> {
    let room_id: uuid::Uuid = row.try_get("room_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get room_id: {}", e),
        )
    })?;

    let hoster_user_id: String = row.try_get("hoster_user_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get hoster_user_id: {}", e),
        )
    })?;

    let join_password: String = row.try_get("join_password").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get join_password: {}", e),
        )
    })?;

    let status_str: String = row.try_get("status").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get status: {}", e),
        )
    })?;
    let status = str_to_room_status(&status_str)?;

    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get created_at: {}", e),
        )
    })?;

    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get updated_at: {}", e),
        )
    })?;

    Ok(Room::reconstitute(
        RoomId::from_uuid(room_id),
        UserId::new(hoster_user_id).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid hoster_user_id: {}", e),
            )
        })?,
        JoinSecret::from_string(join_password),
        status,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
        participants,
    ))
}

fn row_to_participant(row: sqlx::postgres::PgRow) -> Result<Participant, DomainError> {
    let user_id: String = row.try_get("user_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get user_id: {}", e),
        )
    })?;

    let room_id: uuid::Uuid = row.try_get("room_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get room_id: {}", e),
        )
    })?;

    let role_str: String = row.try_get("role").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get role: {}", e),
        )
    })?;
    let role = str_to_role(&role_str)?;

    let joined_at: chrono::DateTime<chrono::Utc> = row.try_get("joined_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get joined_at: {}", e),
        )
    })?;

    Ok(Participant::new(
        UserId::new(user_id).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid user_id: {}", e),
            )
        })?,
        RoomId::from_uuid(room_id),
        role,
        Timestamp::from_datetime(joined_at),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_status_conversion_roundtrips() {
        for status in [RoomStatus::Active, RoomStatus::Closed] {
            assert_eq!(str_to_room_status(room_status_to_str(status)).unwrap(), status);
        }
    }

    #[test]
    fn role_conversion_roundtrips() {
        for role in [Role::Hoster, Role::Participant] {
            assert_eq!(str_to_role(role_to_str(role)).unwrap(), role);
        }
    }

    #[test]
    fn invalid_enum_strings_are_rejected() {
        assert!(str_to_room_status("OPEN").is_err());
        assert!(str_to_role("ADMIN").is_err());
    }
}
