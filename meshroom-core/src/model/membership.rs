use crate::model::{PeerId, RoomId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipKind {
    Joined,
    Left,
}

/// A join or leave in a room, as seen by the other members.
///
/// `member_count` is the size of the member set right after the mutation
/// that produced the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipEvent {
    pub room_id: RoomId,
    pub subject: PeerId,
    pub kind: MembershipKind,
    pub member_count: usize,
}

impl MembershipEvent {
    pub fn joined(room_id: RoomId, subject: PeerId, member_count: usize) -> Self {
        Self {
            room_id,
            subject,
            kind: MembershipKind::Joined,
            member_count,
        }
    }

    pub fn left(room_id: RoomId, subject: PeerId, member_count: usize) -> Self {
        Self {
            room_id,
            subject,
            kind: MembershipKind::Left,
            member_count,
        }
    }
}
