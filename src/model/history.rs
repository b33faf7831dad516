use serde::Serialize;
use super::identity::{IdentityId, IdentityRef};
use super::user::UserId;

// What identities did during a round
#[derive(Serialize, Default, PartialEq, Clone, Copy, Debug)]
pub struct VoteCounts {
    // Upvotes between identities of the same User
    pub self_serving: usize,

    // Votes on other Users' content
    pub social: usize,

    // Identities that sat the round out or
    // found nothing to vote on
    pub skipped: usize,
}

impl VoteCounts {
    pub fn total(&self) -> usize {
        self.self_serving + self.social
    }
}

#[derive(Serialize, PartialEq, Clone, Debug)]
pub struct IdentityReputation {
    pub user: UserId,
    pub identity: IdentityId,
    pub reputation: f64,
}

impl IdentityReputation {
    pub fn r(&self) -> IdentityRef {
        IdentityRef { user: self.user, identity: self.identity }
    }
}

// Reputations of every identity at the end of a round,
// ordered by user then identity
#[derive(Serialize, PartialEq, Clone, Debug)]
pub struct Snapshot {
    pub round: usize,
    pub reputations: Vec<IdentityReputation>,
    pub votes: VoteCounts,
}

impl Snapshot {
    pub fn reputation(&self, r: IdentityRef) -> Option<f64> {
        self.reputations.iter()
            .find(|rep| rep.r() == r)
            .map(|rep| rep.reputation)
    }
}
