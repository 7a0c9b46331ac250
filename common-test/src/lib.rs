use std::{
    collections::HashMap,
    env,
    error::Error,
    sync::{Arc, Mutex, OnceLock, PoisonError, RwLock},
};

use rand::{random, rngs::StdRng, SeedableRng};

pub const DEFAULT_TEST_SEED_ENV: &str = "ORDER_EVENTS_TEST_SEED";

static SEEDS: OnceLock<RwLock<HashMap<&'static str, u64>>> = OnceLock::new();

fn seeds() -> &'static RwLock<HashMap<&'static str, u64>> {
    SEEDS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Seed for `scope`: read once from the env var of the same name, random otherwise.
fn seed_for(scope: &'static str) -> Result<u64, Box<dyn Error>> {
    let mut seeds = seeds().write()?;
    let seed = *seeds.entry(scope).or_insert_with(|| {
        let seed = env::var(scope)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or_else(random);
        println!("Using seed {seed} for {scope}");
        seed
    });
    Ok(seed)
}

fn seeded_rng(scope: &'static str) -> Result<StdRng, Box<dyn Error>> {
    Ok(StdRng::seed_from_u64(seed_for(scope)?))
}

pub fn get_seeded_rng() -> Result<StdRng, Box<dyn Error>> {
    seeded_rng(DEFAULT_TEST_SEED_ENV)
}

/// Ordered record of `(observer, identifier)` pairs, shareable across threads.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, observer: &str, identifier: &str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((observer.to_owned(), identifier.to_owned()));
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn observers(&self) -> Vec<String> {
        self.calls().into_iter().map(|(observer, _)| observer).collect()
    }

    pub fn identifiers_for(&self, observer: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == observer)
            .map(|(_, identifier)| identifier)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
