mod sim;
mod util;
mod cost;
mod user;
mod error;
mod content;
mod history;
mod identity;

pub use self::sim::System;
pub use self::user::{User, UserId, UserParams};
pub use self::identity::{Identity, IdentityId, IdentityRef};
pub use self::content::{Tag, Video, Vote, Votes};
pub use self::cost::{CostFunction, CostPolicy, DownstreamCost, FrozenCost};
pub use self::history::{Snapshot, IdentityReputation, VoteCounts};
pub use self::error::{SimError, SimResult};
