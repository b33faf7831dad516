use fnv::FnvHashMap;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use super::content::{Tag, Vote};
use super::cost::{CostFunction, DownstreamCost};
use super::error::{SimError, SimResult};
use super::history::{IdentityReputation, Snapshot, VoteCounts};
use super::identity::{Identity, IdentityRef};
use super::user::{User, UserId, UserParams};

pub struct System {
    // Indexed by UserId
    users: Vec<User>,

    cost_function: Box<dyn CostFunction>,

    // Reputation every new identity starts with
    pub initial_reputation: f64,

    // Completed rounds
    round: usize,

    // Emptied each round
    votes: VoteCounts,

    // One snapshot per completed round
    reputation_history: Vec<Snapshot>,
}

impl Default for System {
    fn default() -> System {
        System::new(Box::new(DownstreamCost), 0.)
    }
}

impl System {
    pub fn new(cost_function: Box<dyn CostFunction>, initial_reputation: f64) -> System {
        System {
            users: Vec::new(),
            cost_function: cost_function,
            initial_reputation: initial_reputation,
            round: 0,
            votes: VoteCounts::default(),
            reputation_history: Vec::new(),
        }
    }

    pub fn create_user(&mut self, params: UserParams) -> SimResult<&mut User> {
        let id = self.users.len();
        let user = User::new(id, &params, self.initial_reputation)?;
        debug!("created user {} with {} identities", id, params.identities);
        self.users.push(user);
        Ok(&mut self.users[id])
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: UserId) -> SimResult<&User> {
        self.users.get(id).ok_or(SimError::UnknownUser(id))
    }

    pub fn user_mut(&mut self, id: UserId) -> SimResult<&mut User> {
        self.users.get_mut(id).ok_or(SimError::UnknownUser(id))
    }

    pub fn identities(&self) -> impl Iterator<Item=&Identity> {
        self.users.iter().flat_map(|u| u.identities().iter())
    }

    pub fn identity(&self, r: IdentityRef) -> SimResult<&Identity> {
        self.user(r.user)?
            .identity(r.identity)
            .ok_or(SimError::UnknownIdentity(r))
    }

    fn identity_mut(&mut self, r: IdentityRef) -> SimResult<&mut Identity> {
        self.user_mut(r.user)?
            .identity_mut(r.identity)
            .ok_or(SimError::UnknownIdentity(r))
    }

    pub fn upload(&mut self, user: UserId, video: &str) -> SimResult<IdentityRef> {
        Ok(self.user_mut(user)?.upload(video))
    }

    pub fn get_rating(&self, owner: IdentityRef, video: &str) -> SimResult<i64> {
        self.identity(owner)?.get_rating(video)
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn reputation_history(&self) -> &[Snapshot] {
        &self.reputation_history
    }

    pub fn reputations(&self) -> FnvHashMap<IdentityRef, f64> {
        self.identities()
            .map(|i| (i.r(), i.reputation()))
            .collect()
    }

    pub fn interact(&mut self, rounds: usize, rng: &mut StdRng) -> SimResult<()> {
        for _ in 0..rounds {
            // Shuffle so list order
            // doesn't favor early users
            let mut order: Vec<UserId> = (0..self.users.len()).collect();
            order.shuffle(rng);
            for id in order {
                self.interact_user(id, rng)?;
            }

            self.round += 1;
            let snapshot = self.snapshot();
            debug!("round {}: {} votes, {} skipped", self.round, snapshot.votes.total(), snapshot.votes.skipped);
            self.reputation_history.push(snapshot);
            self.votes = VoteCounts::default();
        }
        Ok(())
    }

    // Every identity of the User gets one
    // chance to act, in identity order
    fn interact_user(&mut self, id: UserId, rng: &mut StdRng) -> SimResult<()> {
        let n_identities = self.user(id)?.identities().len();
        for i in 0..n_identities {
            let decision = self.users[id].identities()[i].interact(self, rng);
            match decision {
                Some(vote) => self.apply(vote)?,
                None => self.votes.skipped += 1,
            }
        }
        Ok(())
    }

    fn apply(&mut self, vote: Vote) -> SimResult<()> {
        if vote.voter.user == vote.target.user {
            self.votes.self_serving += 1;
        } else {
            self.votes.social += 1;
        }
        self.vote(vote.voter, vote.target, &vote.video, vote.tag)?;
        Ok(())
    }

    // `voter` tags `target`'s video and every identity that
    // has voted that tag on it gets its reputation recomputed.
    // Identities can't vote on themselves; such votes are
    // dropped and `Ok(false)` is returned.
    pub fn vote(&mut self, voter: IdentityRef, target: IdentityRef, video: &str, tag: Tag) -> SimResult<bool> {
        self.identity(voter)?;
        if voter == target {
            trace!("{} tried to vote on itself", voter);
            return Ok(false);
        }

        let voters = {
            let votes = self.identity_mut(target)?.votes_mut(video)?;
            let voters = votes.voters_mut(tag);
            voters.push(voter);
            voters.clone()
        };
        trace!("{} voted {} on {} ({:?})", voter, tag, target, video);

        self.update_reputation(&voters)?;
        Ok(true)
    }

    // Recompute the reputation of every voter in the list,
    // oldest vote first. All new values are computed from
    // the reputations as they stood before any are assigned.
    pub fn update_reputation(&mut self, voters: &[IdentityRef]) -> SimResult<()> {
        let reputations = voters.iter()
            .map(|r| self.identity(*r).map(|i| i.reputation()))
            .collect::<SimResult<Vec<f64>>>()?;

        let updated: Vec<f64> = (0..reputations.len())
            .map(|i| self.cost_function.cost(i, &reputations))
            .collect();

        for (r, reputation) in voters.iter().zip(updated) {
            self.identity_mut(*r)?.set_reputation(reputation);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let reputations = self.identities()
            .map(|i| IdentityReputation {
                user: i.user,
                identity: i.id,
                reputation: i.reputation(),
            })
            .collect();

        Snapshot {
            round: self.round,
            reputations: reputations,
            votes: self.votes,
        }
    }
}
