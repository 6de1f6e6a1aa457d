//! Room aggregate entity.
//!
//! A Room is a named session with a host, a join secret, a status, and the
//! canonical set of Participants. All membership mutations go through this
//! aggregate; repositories only persist what it decides.
//!
//! # Invariants
//!
//! - While status is `Active` and the participant set is non-empty, exactly
//!   one participant holds the `Hoster` role and its user id equals
//!   `hoster_user_id`.
//! - No two participants share a user id.
//! - When the participant set becomes empty, the room must be closed.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RoomId, Timestamp, UserId};

use super::{JoinSecret, Participant, Role, RoomError};

/// Room lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Active,
    Closed,
}

/// Room aggregate - a session group with a host and a membership set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    room_id: RoomId,
    hoster_user_id: UserId,
    join_secret: JoinSecret,
    status: RoomStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
    /// Canonical membership set. May be empty when the room was loaded
    /// without participants; mutating operations require a materialized set.
    participants: Vec<Participant>,
}

impl Room {
    /// Creates a new active room hosted by `hoster_user_id`.
    ///
    /// The host is seeded as the sole participant with the `Hoster` role.
    pub fn new(room_id: RoomId, hoster_user_id: UserId, join_secret: JoinSecret) -> Self {
        let now = Timestamp::now();
        let host = Participant::new(hoster_user_id.clone(), room_id, Role::Hoster, now);
        Self {
            room_id,
            hoster_user_id,
            join_secret,
            status: RoomStatus::Active,
            created_at: now,
            updated_at: now,
            participants: vec![host],
        }
    }

    /// Reconstitutes a room from persistence (no validation).
    pub fn reconstitute(
        room_id: RoomId,
        hoster_user_id: UserId,
        join_secret: JoinSecret,
        status: RoomStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            room_id,
            hoster_user_id,
            join_secret,
            status,
            created_at,
            updated_at,
            participants,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the room identifier.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Returns the current host's user identifier.
    pub fn hoster_user_id(&self) -> &UserId {
        &self.hoster_user_id
    }

    /// Returns the join secret.
    pub fn join_secret(&self) -> &JoinSecret {
        &self.join_secret
    }

    /// Returns the current status.
    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// Returns when the room was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the room was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns the loaded participant set.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Whether the room accepts operations.
    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }

    /// Whether the loaded participant set is empty.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Whether the given user is the current host.
    pub fn is_host(&self, user_id: &UserId) -> bool {
        &self.hoster_user_id == user_id
    }

    /// Finds a loaded participant by user id.
    pub fn participant(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id() == user_id)
    }

    /// Whether a participant with the given user id is loaded.
    pub fn contains(&self, user_id: &UserId) -> bool {
        self.participant(user_id).is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Join policy
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether a join attempt with the presented password may proceed.
    ///
    /// The secret check and the active-status check are deliberately merged:
    /// a caller must not be able to tell which one failed.
    pub fn verify_join(&self, presented: &str) -> bool {
        self.join_secret.matches(presented) && self.is_active()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds `user_id` to the membership set with the `Participant` role.
    ///
    /// Returns the new membership record for persistence.
    ///
    /// # Errors
    ///
    /// - `AlreadyJoined` if a participant with this user id exists
    pub fn admit(&mut self, user_id: UserId) -> Result<Participant, RoomError> {
        if self.contains(&user_id) {
            return Err(RoomError::AlreadyJoined { user_id });
        }

        let participant =
            Participant::new(user_id, self.room_id, Role::Participant, Timestamp::now());
        self.participants.push(participant.clone());
        self.touch();
        Ok(participant)
    }

    /// Removes `user_id` from the membership set.
    ///
    /// Returns the removed record so the caller can inspect its role.
    ///
    /// # Errors
    ///
    /// - `ParticipantNotFound` if no participant matches
    pub fn remove(&mut self, user_id: &UserId) -> Result<Participant, RoomError> {
        let index = self
            .participants
            .iter()
            .position(|p| p.user_id() == user_id)
            .ok_or_else(|| RoomError::ParticipantNotFound {
                room_id: self.room_id,
                user_id: user_id.clone(),
            })?;

        let removed = self.participants.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Promotes the next host after the current host left.
    ///
    /// Succession is deterministic: earliest `joined_at`, user id as the
    /// tie-break. Updates `hoster_user_id` and returns the promoted record
    /// for persistence, or `None` if no participants remain.
    pub fn promote_next_host(&mut self) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (*p.joined_at(), p.user_id().clone()))
            .map(|(i, _)| i)?;

        self.participants[index].promote();
        let promoted = self.participants[index].clone();
        self.hoster_user_id = promoted.user_id().clone();
        self.touch();
        Some(promoted)
    }

    /// Closes the room: status becomes `Closed` and the membership set is
    /// cleared. Participant records are deleted by the caller.
    pub fn close(&mut self) {
        self.status = RoomStatus::Closed;
        self.participants.clear();
        self.touch();
    }

    /// Refreshes the last-update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn test_room() -> Room {
        Room::new(
            RoomId::new(),
            user("alice"),
            JoinSecret::from_string("123456".to_string()),
        )
    }

    /// The core invariant: an active non-empty room has exactly one hoster
    /// whose user id equals the room's host field.
    fn assert_host_invariant(room: &Room) {
        if room.is_active() && !room.is_empty() {
            let hosters: Vec<_> = room.participants().iter().filter(|p| p.is_hoster()).collect();
            assert_eq!(hosters.len(), 1, "expected exactly one hoster");
            assert_eq!(hosters[0].user_id(), room.hoster_user_id());
        }
    }

    // Construction

    #[test]
    fn new_room_is_active_with_host_participant() {
        let room = test_room();
        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(room.participants().len(), 1);
        assert_eq!(room.participants()[0].user_id().as_str(), "alice");
        assert_eq!(room.participants()[0].role(), Role::Hoster);
        assert_host_invariant(&room);
    }

    // Join policy

    #[test]
    fn verify_join_accepts_correct_secret_on_active_room() {
        let room = test_room();
        assert!(room.verify_join("123456"));
    }

    #[test]
    fn verify_join_rejects_wrong_secret() {
        let room = test_room();
        assert!(!room.verify_join("000000"));
    }

    #[test]
    fn verify_join_rejects_closed_room_even_with_correct_secret() {
        let mut room = test_room();
        room.close();
        assert!(!room.verify_join("123456"));
    }

    // Admission

    #[test]
    fn admit_adds_participant_with_member_role() {
        let mut room = test_room();
        let p = room.admit(user("bob")).unwrap();
        assert_eq!(p.role(), Role::Participant);
        assert_eq!(p.room_id(), room.room_id());
        assert_eq!(room.participants().len(), 2);
        assert_host_invariant(&room);
    }

    #[test]
    fn admit_rejects_duplicate_user() {
        let mut room = test_room();
        room.admit(user("bob")).unwrap();
        let result = room.admit(user("bob"));
        assert!(matches!(result, Err(RoomError::AlreadyJoined { .. })));
        assert_eq!(room.participants().len(), 2);
    }

    #[test]
    fn admit_rejects_host_rejoining() {
        let mut room = test_room();
        assert!(room.admit(user("alice")).is_err());
    }

    // Removal

    #[test]
    fn remove_returns_removed_record() {
        let mut room = test_room();
        room.admit(user("bob")).unwrap();
        let removed = room.remove(&user("bob")).unwrap();
        assert_eq!(removed.user_id().as_str(), "bob");
        assert_eq!(room.participants().len(), 1);
    }

    #[test]
    fn remove_unknown_user_fails() {
        let mut room = test_room();
        let result = room.remove(&user("nobody"));
        assert!(matches!(result, Err(RoomError::ParticipantNotFound { .. })));
    }

    // Host succession

    #[test]
    fn promote_next_host_picks_earliest_joiner() {
        let mut room = test_room();
        room.admit(user("carol")).unwrap();
        room.admit(user("bob")).unwrap();

        room.remove(&user("alice")).unwrap();
        let promoted = room.promote_next_host().unwrap();

        // carol joined before bob
        assert_eq!(promoted.user_id().as_str(), "carol");
        assert_eq!(promoted.role(), Role::Hoster);
        assert_eq!(room.hoster_user_id().as_str(), "carol");
        assert_host_invariant(&room);
    }

    #[test]
    fn promote_next_host_on_empty_room_returns_none() {
        let mut room = test_room();
        room.remove(&user("alice")).unwrap();
        assert!(room.promote_next_host().is_none());
    }

    // Close

    #[test]
    fn close_clears_participants_and_sets_status() {
        let mut room = test_room();
        room.admit(user("bob")).unwrap();
        room.close();
        assert_eq!(room.status(), RoomStatus::Closed);
        assert!(room.is_empty());
    }

    #[test]
    fn is_host_matches_only_the_host() {
        let room = test_room();
        assert!(room.is_host(&user("alice")));
        assert!(!room.is_host(&user("bob")));
    }

    // Property: random join/leave sequences never break the host invariant
    // when leaves run the same succession policy the engine uses.

    proptest! {
        #[test]
        fn host_invariant_holds_under_random_membership_churn(
            ops in prop::collection::vec((0u8..2, 0usize..8), 1..40)
        ) {
            let users: Vec<UserId> = (0..8)
                .map(|i| UserId::new(format!("user-{}", i)).unwrap())
                .collect();
            // Host is part of the churn pool so succession gets exercised.
            let mut room = Room::new(
                RoomId::new(),
                users[0].clone(),
                JoinSecret::from_string("123456".to_string()),
            );

            for (op, idx) in ops {
                if !room.is_active() {
                    break;
                }
                let target = users[idx].clone();
                if op == 0 {
                    let _ = room.admit(target);
                } else if let Ok(removed) = room.remove(&target) {
                    if removed.is_hoster() && room.promote_next_host().is_none() {
                        room.close();
                    }
                }
                assert_host_invariant(&room);
            }
        }
    }
}
