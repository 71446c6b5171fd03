//! Hub configuration

use std::time::Duration;

/// Tunable hub parameters
///
/// Defaults match the documented behavior; tests override the seed (and
/// sometimes the probabilities) for determinism.
#[derive(Clone, Debug)]
pub struct HubConfig {
    /// Active ambient-responder personality (must exist in the catalog)
    pub personality: String,
    /// Chance that a chat message schedules an ambient response
    pub ambient_probability: f64,
    /// Ambient response delay range
    pub ambient_delay_min: Duration,
    pub ambient_delay_max: Duration,
    /// Cleanup sweep cadence
    pub sweep_interval: Duration,
    /// How often the runtime checks for due deferred broadcasts
    pub pulse_interval: Duration,
    /// Flat points credited per chat message
    pub message_reward: i64,
    /// Extra points per effect requested with a message
    pub effect_bonus: i64,
    /// Messages shown to a newly connected participant
    pub recent_window: usize,
    /// Leaderboard rows kept after recompute
    pub leaderboard_top_n: usize,
    /// Fixed RNG seed; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            personality: "sage".to_owned(),
            ambient_probability: 0.3,
            ambient_delay_min: Duration::from_secs(1),
            ambient_delay_max: Duration::from_secs(3),
            sweep_interval: Duration::from_secs(30),
            pulse_interval: Duration::from_millis(250),
            message_reward: 10,
            effect_bonus: 5,
            recent_window: lumen_state::RECENT_WINDOW,
            leaderboard_top_n: lumen_state::LEADERBOARD_SIZE,
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();

        assert_eq!(config.personality, "sage");
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
        assert!(config.ambient_delay_min <= config.ambient_delay_max);
    }
}
