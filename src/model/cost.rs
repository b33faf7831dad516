use log::debug;
use serde::Deserialize;
use strum_macros::{Display, EnumIter};

// Maps a voter's position in a tag's voter list
// to that voter's new reputation. `reputations` holds
// every voter's reputation, oldest vote first, as it
// stood before the current recomputation.
pub trait CostFunction {
    fn cost(&self, i: usize, reputations: &[f64]) -> f64;
}

impl<F> CostFunction for F where F: Fn(usize, &[f64]) -> f64 {
    fn cost(&self, i: usize, reputations: &[f64]) -> f64 {
        self(i, reputations)
    }
}

// Rewards a voter in proportion to the reputation
// of everyone who voted the same way after them.
//
// A lone voter earns nothing. If later voters carry no
// positive reputation, the voter keeps what they had.
// Otherwise the new reputation is
// `old * |total / (total - old)|` where `total` is the
// summed reputation of the later voters.
//
// When `total == old` the denominator vanishes;
// the voter's reputation is then left unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DownstreamCost;

impl CostFunction for DownstreamCost {
    fn cost(&self, i: usize, reputations: &[f64]) -> f64 {
        if reputations.len() == 1 {
            return 0.;
        }

        let old = reputations[i];
        let total: f64 = reputations[i+1..].iter().sum();
        if total <= 0. {
            return old;
        }

        let denom = total - old;
        if denom == 0. {
            debug!("degenerate cost input at position {} (total {}), keeping {}", i, total, old);
            return old;
        }
        old * (total / denom).abs()
    }
}

// Reputations never move.
// Useful as a baseline run.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrozenCost;

impl CostFunction for FrozenCost {
    fn cost(&self, i: usize, reputations: &[f64]) -> f64 {
        reputations[i]
    }
}

#[derive(Display, EnumIter, PartialEq, Debug, Deserialize, Clone, Copy)]
pub enum CostPolicy {
    Downstream,
    Frozen,
}

impl Default for CostPolicy {
    fn default() -> CostPolicy {
        CostPolicy::Downstream
    }
}

impl CostPolicy {
    pub fn build(&self) -> Box<dyn CostFunction> {
        match self {
            CostPolicy::Downstream => Box::new(DownstreamCost),
            CostPolicy::Frozen => Box::new(FrozenCost),
        }
    }
}
