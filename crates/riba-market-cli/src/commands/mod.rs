//! Command handlers.

pub mod account;
pub mod catalogue;
pub mod item;
pub mod market;

use anyhow::{bail, Result};
use serde::Serialize;

use riba_market_core::models::CatalogueId;
use riba_market_core::{CatalogueManager, Config, LocalCache};

/// Shortest id prefix accepted in place of a full id.
const MIN_ID_PREFIX: usize = 4;

pub struct Context {
    pub cache: LocalCache,
    pub config: Config,
    pub json: bool,
}

impl Context {
    pub fn new(cache: LocalCache, config: Config, json: bool) -> Self {
        Self { cache, config, json }
    }

    pub fn catalogues(&self) -> CatalogueManager {
        CatalogueManager::open(self.cache.clone())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a full catalogue id or a unique prefix of one.
pub fn resolve_catalogue(catalogues: &CatalogueManager, input: &str) -> Result<CatalogueId> {
    let input = input.trim();
    let exact = CatalogueId::new(input);
    if catalogues.get(&exact).is_some() {
        return Ok(exact);
    }
    if input.len() < MIN_ID_PREFIX {
        bail!("No catalogue with id '{}'", input);
    }

    let mut matches = catalogues
        .catalogues()
        .iter()
        .filter(|c| c.id.as_str().starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(c), None) => Ok(c.id.clone()),
        (Some(_), Some(_)) => bail!("Id prefix '{}' matches several catalogues", input),
        (None, _) => bail!("No catalogue with id '{}'", input),
    }
}
