use meshroom_core::PeerId;
use std::collections::HashSet;

/// Member set of one room.
#[derive(Debug, Default)]
pub struct Room {
    members: HashSet<PeerId>,
}

impl Room {
    /// `false` when the peer was already a member.
    pub fn insert(&mut self, peer_id: PeerId) -> bool {
        self.members.insert(peer_id)
    }

    pub fn remove(&mut self, peer_id: &PeerId) -> bool {
        self.members.remove(peer_id)
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.members.contains(peer_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Everyone except `peer_id`.
    pub fn others<'a>(&'a self, peer_id: &'a PeerId) -> impl Iterator<Item = &'a PeerId> + 'a {
        self.members.iter().filter(move |member| *member != peer_id)
    }

    pub fn members(&self) -> impl Iterator<Item = &PeerId> {
        self.members.iter()
    }
}
