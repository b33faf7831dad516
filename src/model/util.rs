use super::error::{SimError, SimResult};

pub fn check_probability(name: &'static str, value: f64) -> SimResult<f64> {
    if value >= 0. && value <= 1. {
        Ok(value)
    } else {
        Err(SimError::InvalidProbability { name: name, value: value })
    }
}
