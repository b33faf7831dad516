use fnv::FnvHashMap;
use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use super::content::{Tag, Video, Vote, Votes};
use super::error::{SimError, SimResult};
use super::sim::System;
use super::user::{UserId, UserParams};

pub type IdentityId = usize;

// Non-owning handle to an Identity,
// resolved through the System
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize)]
pub struct IdentityRef {
    pub user: UserId,
    pub identity: IdentityId,
}

impl fmt::Display for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.user, self.identity)
    }
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub user: UserId,

    // Odds of doing anything in a round
    pub activity: f64,

    // Odds of upvoting one of the owning
    // User's other identities instead of
    // voting on someone else's content
    pub malice: f64,

    // Odds of following a positive majority
    pub conformity: f64,

    reputation: f64,

    // Votes per uploaded video, plus
    // the order the videos were uploaded in
    uploads: FnvHashMap<Video, Votes>,
    videos: Vec<Video>,
}

impl Identity {
    pub fn new(id: IdentityId, user: UserId, params: &UserParams, reputation: f64) -> Identity {
        Identity {
            id: id,
            user: user,
            activity: params.activity,
            malice: params.malice,
            conformity: params.conformity,
            reputation: reputation,
            uploads: FnvHashMap::default(),
            videos: Vec::new(),
        }
    }

    pub fn r(&self) -> IdentityRef {
        IdentityRef { user: self.user, identity: self.id }
    }

    pub fn reputation(&self) -> f64 {
        self.reputation
    }

    pub(crate) fn set_reputation(&mut self, reputation: f64) {
        self.reputation = reputation;
    }

    // Uploading a label that already exists
    // wipes that video's votes.
    pub fn upload(&mut self, video: &str) {
        if self.uploads.insert(video.to_string(), Votes::default()).is_none() {
            self.videos.push(video.to_string());
        }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn has_uploads(&self) -> bool {
        !self.videos.is_empty()
    }

    pub fn votes(&self, video: &str) -> SimResult<&Votes> {
        self.uploads.get(video).ok_or_else(|| self.missing(video))
    }

    pub(crate) fn votes_mut(&mut self, video: &str) -> SimResult<&mut Votes> {
        let owner = self.r();
        self.uploads.get_mut(video).ok_or_else(|| SimError::MissingUpload {
            owner: owner,
            video: video.to_string(),
        })
    }

    pub fn get_rating(&self, video: &str) -> SimResult<i64> {
        Ok(self.votes(video)?.rating())
    }

    fn missing(&self, video: &str) -> SimError {
        SimError::MissingUpload {
            owner: self.r(),
            video: video.to_string(),
        }
    }

    // Decide what, if anything, to vote on this round.
    // The System applies the returned vote.
    pub fn interact(&self, system: &System, rng: &mut StdRng) -> Option<Vote> {
        let roll: f64 = rng.gen();
        if roll >= self.activity {
            return None;
        }

        let roll: f64 = rng.gen();
        if roll < self.malice {
            self.self_serving_vote(system, rng)
        } else {
            self.social_vote(system, rng)
        }
    }

    // Upvote content of another identity
    // controlled by the same User
    fn self_serving_vote(&self, system: &System, rng: &mut StdRng) -> Option<Vote> {
        let user = system.user(self.user).ok()?;
        let others: Vec<&Identity> = user.identities()
            .iter()
            .filter(|i| i.id != self.id)
            .collect();

        let target = match others.choose(rng) {
            Some(target) => target,
            None => {
                trace!("{} has no other identities to upvote", self.r());
                return None;
            }
        };
        let video = match target.videos.choose(rng) {
            Some(video) => video,
            None => {
                trace!("{} has nothing uploaded for {} to upvote", target.r(), self.r());
                return None;
            }
        };

        Some(Vote {
            voter: self.r(),
            target: target.r(),
            video: video.clone(),
            tag: Tag::ThumbsUp,
        })
    }

    // Vote on another User's content,
    // going along with the majority only
    // when the majority is positive
    fn social_vote(&self, system: &System, rng: &mut StdRng) -> Option<Vote> {
        let candidates: Vec<&Identity> = system.users()
            .iter()
            .filter(|u| u.id != self.user)
            .flat_map(|u| u.identities().iter())
            .filter(|i| i.has_uploads())
            .collect();

        let target = match candidates.choose(rng) {
            Some(target) => target,
            None => {
                trace!("no content from other users for {} to vote on", self.r());
                return None;
            }
        };
        let video = target.videos.choose(rng)?;
        let rating = target.get_rating(video).ok()?;
        let majority_vote = rating > 0;

        let roll: f64 = rng.gen();
        let tag = if roll < self.conformity && majority_vote {
            Tag::ThumbsUp
        } else {
            Tag::ThumbsDown
        };

        Some(Vote {
            voter: self.r(),
            target: target.r(),
            video: video.clone(),
            tag: tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params(activity: f64, malice: f64, conformity: f64) -> UserParams {
        UserParams { activity, malice, conformity, identities: 1 }
    }

    #[test]
    fn test_upload_and_rating() {
        let mut identity = Identity::new(0, 0, &params(1., 0., 1.), 0.);
        assert!(!identity.has_uploads());

        identity.upload("first video");
        assert!(identity.has_uploads());
        assert_eq!(identity.get_rating("first video"), Ok(0));

        let missing = identity.get_rating("other video");
        assert_eq!(missing, Err(SimError::MissingUpload {
            owner: IdentityRef { user: 0, identity: 0 },
            video: "other video".to_string(),
        }));
    }

    #[test]
    fn test_reupload_resets_votes() {
        let voter = IdentityRef { user: 1, identity: 0 };
        let mut identity = Identity::new(0, 0, &params(1., 0., 1.), 0.);
        identity.upload("a");
        identity.upload("b");
        identity.votes_mut("a").unwrap().voters_mut(Tag::ThumbsUp).push(voter);
        assert_eq!(identity.get_rating("a"), Ok(1));

        identity.upload("a");
        assert_eq!(identity.get_rating("a"), Ok(0));
        assert_eq!(identity.videos(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_inactive_identity_does_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut system = System::default();
        system.create_user(params(0., 0., 1.)).unwrap();
        system.create_user(params(1., 0., 1.)).unwrap().upload("video");

        let idle = system.identity(IdentityRef { user: 0, identity: 0 }).unwrap();
        for _ in 0..100 {
            assert_eq!(idle.interact(&system, &mut rng), None);
        }
    }

    #[test]
    fn test_social_vote_without_content() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut system = System::default();
        system.create_user(params(1., 0., 1.)).unwrap().upload("mine");
        system.create_user(params(1., 0., 1.)).unwrap();

        // Only the identity's own user has content
        let identity = system.identity(IdentityRef { user: 0, identity: 0 }).unwrap();
        for _ in 0..100 {
            assert_eq!(identity.interact(&system, &mut rng), None);
        }
    }

    #[test]
    fn test_social_vote_downvotes_without_positive_majority() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut system = System::default();
        system.create_user(params(1., 0., 1.)).unwrap();
        system.create_user(params(1., 0., 1.)).unwrap().upload("video");

        // Rating is 0, so even full conformity downvotes
        let identity = system.identity(IdentityRef { user: 0, identity: 0 }).unwrap();
        for _ in 0..20 {
            let vote = identity.interact(&system, &mut rng).unwrap();
            assert_eq!(vote.tag, Tag::ThumbsDown);
            assert_eq!(vote.target, IdentityRef { user: 1, identity: 0 });
            assert_eq!(vote.video, "video");
        }
    }

    #[test]
    fn test_social_vote_follows_positive_majority() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut system = System::default();
        system.create_user(params(1., 0., 1.)).unwrap();
        system.create_user(params(1., 0., 1.)).unwrap().upload("video");
        system.create_user(params(1., 0., 1.)).unwrap();

        let owner = IdentityRef { user: 1, identity: 0 };
        let fan = IdentityRef { user: 2, identity: 0 };
        system.vote(fan, owner, "video", Tag::ThumbsUp).unwrap();

        let identity = system.identity(IdentityRef { user: 0, identity: 0 }).unwrap();
        for _ in 0..20 {
            let vote = identity.interact(&system, &mut rng).unwrap();
            assert_eq!(vote.tag, Tag::ThumbsUp);
        }
    }

    #[test]
    fn test_self_serving_vote_needs_other_identity() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut system = System::default();
        system.create_user(params(1., 1., 1.)).unwrap().upload("video");

        let identity = system.identity(IdentityRef { user: 0, identity: 0 }).unwrap();
        for _ in 0..20 {
            assert_eq!(identity.interact(&system, &mut rng), None);
        }
    }

    #[test]
    fn test_self_serving_vote_skips_sibling_without_uploads() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut system = System::default();
        let params = UserParams { activity: 1., malice: 1., conformity: 1., identities: 2 };
        let owner = system.create_user(params).unwrap().upload("video");
        assert_eq!(owner, IdentityRef { user: 0, identity: 0 });

        // Identity 1 upvotes identity 0's only video
        let voter = system.identity(IdentityRef { user: 0, identity: 1 }).unwrap();
        for _ in 0..20 {
            let vote = voter.interact(&system, &mut rng).unwrap();
            assert_eq!(vote.target, owner);
            assert_eq!(vote.video, "video");
            assert_eq!(vote.tag, Tag::ThumbsUp);
        }

        // Identity 0's only sibling has nothing to upvote
        let stuck = system.identity(owner).unwrap();
        for _ in 0..20 {
            assert_eq!(stuck.interact(&system, &mut rng), None);
        }

        system.interact(1, &mut rng).unwrap();
        let counts = system.reputation_history()[0].votes;
        assert_eq!(counts.self_serving, 1);
        assert_eq!(counts.social, 0);
        assert_eq!(counts.skipped, 1);
    }
}
