use std::collections::BTreeSet;
use std::fs;

use blake3::Hasher;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ModifierError;
use crate::modifier::PriceModifier;
use crate::types::{GameId, ServiceTypeId};

/// Immutable per-call snapshot of the modifier catalog. The engine never
/// mutates it and never holds it beyond one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ModifierCatalog {
    pub modifiers: Vec<PriceModifier>,
}

impl ModifierCatalog {
    pub fn new(modifiers: Vec<PriceModifier>) -> Self {
        Self { modifiers }
    }

    /// Selects the applicable modifiers for one calculation.
    ///
    /// Explicit codes are looked up within the game/service-type scope;
    /// a missing code is an error, an inactive one is filtered after the
    /// existence check. With no codes, every active in-scope modifier is
    /// returned ordered by `sort_order` (ties broken by code).
    pub fn resolve(
        &self,
        game: GameId,
        service_type: ServiceTypeId,
        codes: &[String],
    ) -> Result<Vec<PriceModifier>, ModifierError> {
        if codes.is_empty() {
            return Ok(self.scoped_active(game, service_type));
        }
        let mut resolved = Vec::with_capacity(codes.len());
        for code in codes {
            let found = self
                .modifiers
                .iter()
                .find(|m| m.code == *code && in_scope(m, game, service_type))
                .ok_or_else(|| ModifierError::NotFound(code.clone()))?;
            if found.active {
                resolved.push(found.clone());
            }
        }
        Ok(resolved)
    }

    fn scoped_active(&self, game: GameId, service_type: ServiceTypeId) -> Vec<PriceModifier> {
        let mut scoped: Vec<PriceModifier> = self
            .modifiers
            .iter()
            .filter(|m| m.active && in_scope(m, game, service_type))
            .cloned()
            .collect();
        scoped.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.code.cmp(&b.code))
        });
        scoped
    }
}

fn in_scope(modifier: &PriceModifier, game: GameId, service_type: ServiceTypeId) -> bool {
    modifier.scope.game == game
        && modifier
            .scope
            .service_type
            .map_or(true, |scoped| scoped == service_type)
}

/// A resolved set must not contain duplicate codes; deduplicating
/// silently would hide caller mistakes.
pub fn validate_compatibility(modifiers: &[PriceModifier]) -> Result<(), ModifierError> {
    let mut seen = BTreeSet::new();
    for modifier in modifiers {
        if !seen.insert(modifier.code.as_str()) {
            return Err(ModifierError::Duplicate(modifier.code.clone()));
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to hash catalog: {0}")]
    Hash(#[from] serde_json::Error),
}

pub fn load_catalog(path: &str) -> Result<ModifierCatalog, CatalogError> {
    let raw = fs::read_to_string(path)?;
    let catalog: ModifierCatalog = toml::from_str(&raw)?;
    log_schema_hash(&catalog)?;
    Ok(catalog)
}

fn log_schema_hash(catalog: &ModifierCatalog) -> Result<(), CatalogError> {
    let bytes = serde_json::to_vec(catalog)?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    let hash = hasher.finalize();
    info!("catalog_schema_hash={}", hash.to_hex());
    Ok(())
}
