//! Achievement catalog - one-time badges with point rewards

use std::collections::HashMap;

use lumen_core::{AchievementInfo, HubError, HubResult};

/// Well-known achievement ids
pub const FIRST_CONTACT: &str = "first_contact";
pub const CREATIVE_GENIUS: &str = "creative_genius";
pub const EFFECT_MASTER: &str = "effect_master";

/// Static definition of an achievement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub label: &'static str,
    /// Points credited once, when the badge is unlocked
    pub reward: u32,
}

impl AchievementDef {
    pub fn info(&self) -> AchievementInfo {
        AchievementInfo {
            id: self.id.to_owned(),
            label: self.label.to_owned(),
            reward: self.reward,
        }
    }
}

const BUILTIN_ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: FIRST_CONTACT,
        label: "First Contact",
        reward: 100,
    },
    AchievementDef {
        id: CREATIVE_GENIUS,
        label: "Creative Genius",
        reward: 250,
    },
    AchievementDef {
        id: EFFECT_MASTER,
        label: "Effect Master",
        reward: 200,
    },
];

/// Immutable id -> achievement mapping
#[derive(Clone, Debug)]
pub struct AchievementCatalog {
    entries: Vec<AchievementDef>,
    index: HashMap<&'static str, usize>,
}

impl AchievementCatalog {
    pub fn builtin() -> Self {
        let mut index = HashMap::with_capacity(BUILTIN_ACHIEVEMENTS.len());
        for (i, def) in BUILTIN_ACHIEVEMENTS.iter().enumerate() {
            index.insert(def.id, i);
        }
        AchievementCatalog {
            entries: BUILTIN_ACHIEVEMENTS.to_vec(),
            index,
        }
    }

    pub fn from_defs(defs: Vec<AchievementDef>) -> HubResult<Self> {
        let mut index = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if index.insert(def.id, i).is_some() {
                return Err(HubError::InvalidCatalog(format!(
                    "duplicate achievement id: {}",
                    def.id
                )));
            }
        }
        Ok(AchievementCatalog {
            entries: defs,
            index,
        })
    }

    pub fn get(&self, id: &str) -> Option<&AchievementDef> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AchievementDef> {
        self.entries.iter()
    }

    pub fn infos(&self) -> Vec<AchievementInfo> {
        self.entries.iter().map(AchievementDef::info).collect()
    }
}

impl Default for AchievementCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
