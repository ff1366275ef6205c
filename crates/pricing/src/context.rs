use std::collections::BTreeMap;

use crate::money::Cents;

/// Read-only bundle of values visible to modifier calculators during
/// one calculation. Built once per request from the formula output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalculationContext {
    pub base_price: Cents,
    pub from_level: i32,
    pub to_level: i32,
    pub level_difference: i32,
    pub extra: BTreeMap<String, i64>,
}

impl CalculationContext {
    pub fn new(base_price: Cents, from_level: i32, to_level: i32) -> Self {
        Self {
            base_price,
            from_level,
            to_level,
            level_difference: (to_level - from_level).max(0),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: i64) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
