mod config;
mod output;

use itertools::Itertools;
use pbr::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use sybilsim::model::{SimResult, System};
use self::config::Config;
use self::output::Recorder;

// Number of identities listed in the final summary
static TOP_N: usize = 10;

fn populate(system: &mut System, conf: &Config) -> SimResult<()> {
    for group in &conf.population {
        for _ in 0..group.count {
            let user = system.create_user(group.params)?;
            let id = user.id;
            for v in 0..group.uploads {
                user.upload(&format!("user {} video {}", id, v));
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let conf = config::load_config()?;
    let steps = conf.steps;
    let mut rng: StdRng = SeedableRng::seed_from_u64(conf.seed);

    let mut system = System::new(conf.cost.build(), conf.initial_reputation);
    populate(&mut system, &conf)?;

    if conf.debug {
        let mut recorder = Recorder::new();
        let mut pb = ProgressBar::new(steps as u64);
        for _ in 0..steps {
            system.interact(1, &mut rng)?;
            recorder.record(&system);
            pb.inc();
        }
        pb.finish();
        recorder.save(&conf, &system)?;
    } else {
        system.interact(steps, &mut rng)?;
    }

    let ranked = system.identities()
        .map(|i| (i.r(), i.reputation()))
        .sorted_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    println!("Top identities after {} rounds:", system.round());
    for (r, reputation) in ranked.take(TOP_N) {
        println!("  {}\t{:.4}", r, reputation);
    }

    Ok(())
}
