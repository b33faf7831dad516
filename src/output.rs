use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use sybilsim::model::{Snapshot, System, Tag, User};
use super::config::{Config, CONFIG_PATH};

pub struct Recorder {
    history: Vec<Value>,
}

// Reputation spread across a User's identities
fn user_summary(user: &User, snapshot: &Snapshot) -> Value {
    let reputations: Vec<f64> = snapshot.reputations.iter()
        .filter(|rep| rep.user == user.id)
        .map(|rep| rep.reputation)
        .collect();
    let n = reputations.len() as f64;
    let total: f64 = reputations.iter().sum();
    let max = reputations.iter().cloned().fold(std::f64::NEG_INFINITY, f64::max);
    let min = reputations.iter().cloned().fold(std::f64::INFINITY, f64::min);
    json!({
        "id": user.id,
        "identities": reputations.len(),
        "mean": total / n,
        "max": max,
        "min": min,
    })
}

// Votes cast per tag over the whole run
fn tag_totals(system: &System) -> Value {
    let mut totals = serde_json::Map::new();
    for tag in Tag::iter() {
        let n: usize = system.identities()
            .flat_map(|i| i.videos().iter().map(move |v| (i, v)))
            .filter_map(|(i, v)| i.votes(v).ok())
            .map(|votes| votes.voters(tag).len())
            .sum();
        totals.insert(tag.to_string(), json!(n));
    }
    Value::Object(totals)
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder {
            history: Vec::new(),
        }
    }

    // Summarize the latest round
    pub fn record(&mut self, system: &System) {
        let snapshot = match system.reputation_history().last() {
            Some(snapshot) => snapshot,
            None => return,
        };
        let users: Vec<Value> = system.users().iter()
            .map(|u| user_summary(u, snapshot))
            .collect();
        self.history.push(json!({
            "round": snapshot.round,
            "votes": snapshot.votes,
            "users": users,
        }));
    }

    pub fn save(&self, conf: &Config, system: &System) -> io::Result<PathBuf> {
        let now: DateTime<Utc> = Utc::now();
        let now_str = now.format("%Y.%m.%d.%H.%M.%S").to_string();
        let results = json!({
            "history": self.history,
            "reputations": system.snapshot().reputations,
            "tags": tag_totals(system),
            "meta": {
                "seed": conf.seed,
                "steps": conf.steps,
                "cost": conf.cost.to_string(),
                "initial_reputation": conf.initial_reputation,
                "users": system.users().len(),
            }
        })
        .to_string();

        let dir = format!("runs/{}", now_str);
        let fname = format!("runs/{}/output.json", now_str);

        let path = Path::new(&dir);
        let run_path = Path::new(&now_str);
        let latest_path = Path::new("runs/latest");
        fs::create_dir_all(path)?;
        fs::write(fname, results)?;
        if latest_path.exists() {
            fs::remove_file(latest_path)?;
        }
        symlink(run_path, latest_path)?;

        let conf_path = Path::join(path, Path::new(CONFIG_PATH));
        fs::copy(Path::new(CONFIG_PATH), conf_path)?;
        log::info!("Wrote output to {:?}", path);
        Ok(path.to_path_buf())
    }
}
