//! Ambient-responder personalities
//!
//! A personality is a name plus a fixed phrase table. The responder picks
//! one phrase uniformly at random; no state beyond the table is consulted.

/// A fixed phrase set for the ambient responder
#[derive(Clone, Copy, Debug)]
pub struct Personality {
    pub name: &'static str,
    pub phrases: &'static [&'static str],
}

pub const SAGE: Personality = Personality {
    name: "sage",
    phrases: &[
        "Every message ripples further than you think.",
        "The quiet ones are watching too.",
        "A good question outlives a hundred answers.",
        "Patience. The leaderboard is a snapshot, not a verdict.",
        "What you send returns in kind.",
        "Small sparks, long trails.",
    ],
};

pub const HYPE: Personality = Personality {
    name: "hype",
    phrases: &[
        "LET'S GOOO, chat is on fire today!",
        "That message deserved a rainbow trail!",
        "Who's taking the top spot tonight?!",
        "Points are flying, keep it coming!",
        "Somebody unlock an achievement already!",
        "This room has ENERGY!",
    ],
};

pub const DEADPAN: Personality = Personality {
    name: "deadpan",
    phrases: &[
        "Another message. Riveting.",
        "I have recorded your enthusiasm.",
        "The particles will dissipate. They always do.",
        "Points were exchanged. Society continues.",
        "A vote was cast. Democracy, of a sort.",
        "Noted.",
    ],
};

const BUILTIN_PERSONALITIES: &[Personality] = &[SAGE, HYPE, DEADPAN];

/// Lookup table for configured personalities
#[derive(Clone, Debug)]
pub struct PersonalityCatalog {
    entries: Vec<Personality>,
}

impl PersonalityCatalog {
    pub fn builtin() -> Self {
        PersonalityCatalog {
            entries: BUILTIN_PERSONALITIES.to_vec(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Personality> {
        self.entries.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Personality> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PersonalityCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
