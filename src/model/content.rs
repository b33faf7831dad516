use serde::Serialize;
use strum_macros::{Display, EnumIter};
use super::identity::IdentityRef;

pub type Video = String;

#[derive(Display, EnumIter, PartialEq, Eq, Hash, Debug, Serialize, Clone, Copy)]
pub enum Tag {
    #[strum(serialize = "thumbs_up")]
    #[serde(rename = "thumbs_up")]
    ThumbsUp,

    #[strum(serialize = "thumbs_down")]
    #[serde(rename = "thumbs_down")]
    ThumbsDown,
}

// Voters for each tag on a single video,
// in the order they voted. The same identity
// can appear more than once.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Votes {
    pub thumbs_up: Vec<IdentityRef>,
    pub thumbs_down: Vec<IdentityRef>,
}

impl Votes {
    pub fn voters(&self, tag: Tag) -> &Vec<IdentityRef> {
        match tag {
            Tag::ThumbsUp => &self.thumbs_up,
            Tag::ThumbsDown => &self.thumbs_down,
        }
    }

    pub fn voters_mut(&mut self, tag: Tag) -> &mut Vec<IdentityRef> {
        match tag {
            Tag::ThumbsUp => &mut self.thumbs_up,
            Tag::ThumbsDown => &mut self.thumbs_down,
        }
    }

    pub fn rating(&self) -> i64 {
        self.thumbs_up.len() as i64 - self.thumbs_down.len() as i64
    }
}

// A single vote, decided by the voter
// and applied by the System
#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub voter: IdentityRef,
    pub target: IdentityRef,
    pub video: Video,
    pub tag: Tag,
}
