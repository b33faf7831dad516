use serde::Deserialize;
use super::error::{SimError, SimResult};
use super::identity::{Identity, IdentityId, IdentityRef};
use super::util::check_probability;

pub type UserId = usize;

// Behavior shared by every identity
// a User controls
#[derive(Deserialize, PartialEq, Clone, Copy, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub struct UserParams {
    pub activity: f64,
    pub malice: f64,
    pub conformity: f64,

    // How many identities the User controls.
    // More than one means sybils.
    pub identities: usize,
}

impl Default for UserParams {
    fn default() -> UserParams {
        UserParams {
            activity: 1.0,
            malice: 0.5,
            conformity: 0.5,
            identities: 1,
        }
    }
}

impl UserParams {
    pub fn validate(&self) -> SimResult<()> {
        check_probability("activity", self.activity)?;
        check_probability("malice", self.malice)?;
        check_probability("conformity", self.conformity)?;
        if self.identities == 0 {
            return Err(SimError::NoIdentities);
        }
        Ok(())
    }
}

// A single real-world actor,
// acting through one or more identities
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    identities: Vec<Identity>,

    // Identity that receives the next upload
    next_upload: usize,
}

impl User {
    pub fn new(id: UserId, params: &UserParams, reputation: f64) -> SimResult<User> {
        params.validate()?;
        let identities = (0..params.identities)
            .map(|i| Identity::new(i, id, params, reputation))
            .collect();

        Ok(User {
            id: id,
            identities: identities,
            next_upload: 0,
        })
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn identity(&self, id: IdentityId) -> Option<&Identity> {
        self.identities.get(id)
    }

    pub(crate) fn identity_mut(&mut self, id: IdentityId) -> Option<&mut Identity> {
        self.identities.get_mut(id)
    }

    // Uploads go to each identity in turn.
    pub fn upload(&mut self, video: &str) -> IdentityRef {
        let identity = &mut self.identities[self.next_upload];
        identity.upload(video);
        let owner = identity.r();
        self.next_upload = (self.next_upload + 1) % self.identities.len();
        owner
    }
}
