//! Effect catalog - purchasable cosmetic overlays

use std::collections::HashMap;

use lumen_core::{EffectInfo, HubError, HubResult};

/// Static definition of a purchasable effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectDef {
    pub name: &'static str,
    pub label: &'static str,
    /// Point cost, debited all-or-nothing on activation
    pub cost: u32,
    /// How long the effect stays visible once activated
    pub duration_secs: u32,
}

impl EffectDef {
    pub fn info(&self) -> EffectInfo {
        EffectInfo {
            name: self.name.to_owned(),
            label: self.label.to_owned(),
            cost: self.cost,
            duration_secs: self.duration_secs,
        }
    }
}

/// The built-in effect table
const BUILTIN_EFFECTS: &[EffectDef] = &[
    EffectDef {
        name: "rainbow_trail",
        label: "Rainbow Trail",
        cost: 50,
        duration_secs: 10,
    },
    EffectDef {
        name: "sparkle_aura",
        label: "Sparkle Aura",
        cost: 30,
        duration_secs: 8,
    },
    EffectDef {
        name: "neon_pulse",
        label: "Neon Pulse",
        cost: 75,
        duration_secs: 12,
    },
    EffectDef {
        name: "golden_glow",
        label: "Golden Glow",
        cost: 120,
        duration_secs: 15,
    },
    EffectDef {
        name: "echo_voice",
        label: "Echo Voice",
        cost: 40,
        duration_secs: 10,
    },
    EffectDef {
        name: "pixel_storm",
        label: "Pixel Storm",
        cost: 200,
        duration_secs: 20,
    },
];

/// Immutable name -> effect mapping, validated at construction
#[derive(Clone, Debug)]
pub struct EffectCatalog {
    entries: Vec<EffectDef>,
    index: HashMap<&'static str, usize>,
}

impl EffectCatalog {
    /// Build the built-in catalog
    pub fn builtin() -> Self {
        let mut index = HashMap::with_capacity(BUILTIN_EFFECTS.len());
        for (i, def) in BUILTIN_EFFECTS.iter().enumerate() {
            index.insert(def.name, i);
        }
        EffectCatalog {
            entries: BUILTIN_EFFECTS.to_vec(),
            index,
        }
    }

    /// Build a catalog from custom definitions, rejecting duplicate names
    pub fn from_defs(defs: Vec<EffectDef>) -> HubResult<Self> {
        let mut index = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if index.insert(def.name, i).is_some() {
                return Err(HubError::InvalidCatalog(format!(
                    "duplicate effect name: {}",
                    def.name
                )));
            }
        }
        Ok(EffectCatalog {
            entries: defs,
            index,
        })
    }

    /// Look up an effect by name; unknown names are an explicit miss
    pub fn get(&self, name: &str) -> Option<&EffectDef> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in table order
    pub fn iter(&self) -> impl Iterator<Item = &EffectDef> {
        self.entries.iter()
    }

    /// Wire-shaped catalog listing for the welcome payload
    pub fn infos(&self) -> Vec<EffectInfo> {
        self.entries.iter().map(EffectDef::info).collect()
    }
}

impl Default for EffectCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
