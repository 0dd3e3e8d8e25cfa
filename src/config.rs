// Configuration module for reading Snake.toml
// Every tunable constant of the simulation and the decision engine lives here

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub board: BoardConfig,
    pub rules: RulesConfig,
    pub placement: PlacementConfig,
    pub pathfinding: PathfindingConfig,
    pub flood_fill: FloodFillConfig,
    pub oscillation: OscillationConfig,
    pub scores: ScoresConfig,
    pub adversarial: AdversarialConfig,
    pub debug: DebugConfig,
}

/// Board geometry
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    pub size: i32,
    pub min_size: i32,
}

impl BoardConfig {
    pub fn area(&self) -> usize {
        (self.size * self.size) as usize
    }
}

/// Scoring and session-ending rules
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RulesConfig {
    pub food_score: u32,
    pub kill_bonus: u32,
    /// Player score that completes a classic or shadow game (0 disables)
    pub target_score: u32,
    /// Player score that completes an adversarial game (0 disables)
    pub adversarial_target_score: u32,
    /// Ticks after which the session completes (0 disables)
    pub max_ticks: u64,
}

/// Starting layout and respawn constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlacementConfig {
    pub initial_length: usize,
    pub opponent_offset: i32,
    pub shadow_offset: i32,
    pub respawn_attempts: u32,
    pub respawn_margin: i32,
}

/// A* search constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PathfindingConfig {
    pub budget_fraction: f64,
    pub budget_cap: usize,
    pub prune_threshold: f64,
    pub max_heuristic_discount: f64,
}

impl PathfindingConfig {
    /// Maximum number of node expansions for a board of the given area
    pub fn budget(&self, area: usize) -> usize {
        (((area as f64) * self.budget_fraction) as usize)
            .min(self.budget_cap)
            .max(1)
    }
}

/// Reachable-space evaluation constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FloodFillConfig {
    pub budget_fraction: f64,
    pub budget_cap: usize,
    pub spread_weight: f64,
    pub spread_cap: i32,
    pub boundary_penalty: f64,
    pub late_game_threshold: f64,
    pub wide_boundary_threshold: f64,
    pub late_game_scale: f64,
}

impl FloodFillConfig {
    /// Maximum number of cells discovered before the score saturates
    pub fn budget(&self, area: usize) -> usize {
        (((area as f64) * self.budget_fraction) as usize)
            .min(self.budget_cap)
            .max(1)
    }
}

/// Oscillation (looping) detection constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OscillationConfig {
    pub min_length: usize,
    pub min_history: usize,
    pub history_capacity: usize,
    pub distinct_window: usize,
    pub min_distinct: usize,
    pub distance_min_history: usize,
    pub distance_window: usize,
    pub distance_threshold: f64,
    pub late_distance_threshold: f64,
    pub late_game_threshold: f64,
    pub reversal_window: usize,
    pub max_reversals: usize,
}

/// Move scoring weights
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoresConfig {
    pub space_weight: f64,
    pub food_weight: f64,
    pub food_scale: f64,
    pub border_weight: f64,
    pub border_scale: f64,
    pub oscillation_penalty: f64,
    pub diversity_penalty: f64,
    pub diversity_min_history: usize,
    pub direction_history: usize,
    pub trap_penalty: f64,
    pub near_best_ratio: f64,
    pub min_safe_space: f64,
}

/// Rival-aware scoring terms
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AdversarialConfig {
    pub attack_adjacent_bonus: f64,
    pub attack_near_bonus: f64,
    pub encircle_bonus: f64,
    pub defense_bonus: f64,
    pub defense_space_threshold: f64,
    pub defense_distance: i32,
    pub defense_min_rival_length: usize,
    pub food_contention_bonus: f64,
    pub lead_margin: i64,
    pub aggression_leading: f64,
    pub aggression_even: f64,
    pub aggression_trailing: f64,
    pub caution_leading: f64,
    pub caution_even: f64,
    pub caution_trailing: f64,
}

impl AdversarialConfig {
    /// Weights for (aggressive terms, defensive terms) given our lead in points
    pub fn weights_for_lead(&self, lead: i64) -> (f64, f64) {
        if lead > self.lead_margin {
            (self.aggression_leading, self.caution_leading)
        } else if lead < -self.lead_margin {
            (self.aggression_trailing, self.caution_trailing)
        } else {
            (self.aggression_even, self.caution_even)
        }
    }
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Checks cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.board.min_size < 3 {
            return Err(format!(
                "board.min_size must be at least 3 (got {})",
                self.board.min_size
            ));
        }
        if self.board.size < self.board.min_size {
            return Err(format!(
                "board.size {} is below board.min_size {}",
                self.board.size, self.board.min_size
            ));
        }
        if self.placement.initial_length == 0 {
            return Err("placement.initial_length must be positive".to_string());
        }
        if self.oscillation.history_capacity < self.oscillation.reversal_window {
            return Err(format!(
                "oscillation.history_capacity ({}) must cover reversal_window ({})",
                self.oscillation.history_capacity, self.oscillation.reversal_window
            ));
        }
        if self.flood_fill.late_game_scale > 1.0 {
            // Late-game weights must never exceed early-game weights, otherwise
            // adding an obstacle could raise the space score across the phase switch
            return Err(format!(
                "flood_fill.late_game_scale must be at most 1.0 (got {})",
                self.flood_fill.late_game_scale
            ));
        }
        if !(0.0..=1.0).contains(&self.flood_fill.boundary_penalty) {
            return Err(format!(
                "flood_fill.boundary_penalty must be within [0, 1] (got {})",
                self.flood_fill.boundary_penalty
            ));
        }
        Ok(())
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                size: 40,
                min_size: 3,
            },
            rules: RulesConfig {
                food_score: 10,
                kill_bonus: 50,
                target_score: 0,
                adversarial_target_score: 1000,
                max_ticks: 0,
            },
            placement: PlacementConfig {
                initial_length: 3,
                opponent_offset: 5,
                shadow_offset: 5,
                respawn_attempts: 10,
                respawn_margin: 2,
            },
            pathfinding: PathfindingConfig {
                budget_fraction: 0.5,
                budget_cap: 1000,
                prune_threshold: 0.6,
                max_heuristic_discount: 0.5,
            },
            flood_fill: FloodFillConfig {
                budget_fraction: 0.5,
                budget_cap: 500,
                spread_weight: 0.25,
                spread_cap: 8,
                boundary_penalty: 0.5,
                late_game_threshold: 0.6,
                wide_boundary_threshold: 0.7,
                late_game_scale: 1.0,
            },
            oscillation: OscillationConfig {
                min_length: 8,
                min_history: 12,
                history_capacity: 30,
                distinct_window: 10,
                min_distinct: 4,
                distance_min_history: 16,
                distance_window: 8,
                distance_threshold: 3.0,
                late_distance_threshold: 2.5,
                late_game_threshold: 0.6,
                reversal_window: 15,
                max_reversals: 2,
            },
            scores: ScoresConfig {
                space_weight: 0.4,
                food_weight: 0.3,
                food_scale: 100.0,
                border_weight: 0.2,
                border_scale: 10.0,
                oscillation_penalty: 0.3,
                diversity_penalty: 0.7,
                diversity_min_history: 4,
                direction_history: 10,
                trap_penalty: 0.1,
                near_best_ratio: 0.95,
                min_safe_space: 10.0,
            },
            adversarial: AdversarialConfig {
                attack_adjacent_bonus: 300.0,
                attack_near_bonus: 150.0,
                encircle_bonus: 100.0,
                defense_bonus: 50.0,
                defense_space_threshold: 20.0,
                defense_distance: 5,
                defense_min_rival_length: 5,
                food_contention_bonus: 80.0,
                lead_margin: 50,
                aggression_leading: 0.1,
                aggression_even: 0.2,
                aggression_trailing: 0.3,
                caution_leading: 0.3,
                caution_even: 0.2,
                caution_trailing: 0.1,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_ticks.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Same configuration on a different board size
    pub fn with_board_size(mut self, size: i32) -> Self {
        self.board.size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.board.size, 40);
        assert_eq!(config.rules.food_score, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        assert_eq!(file_config.board, hardcoded_config.board);
        assert_eq!(file_config.rules, hardcoded_config.rules);
        assert_eq!(file_config.placement, hardcoded_config.placement);
        assert_eq!(file_config.pathfinding, hardcoded_config.pathfinding);
        assert_eq!(file_config.flood_fill, hardcoded_config.flood_fill);
        assert_eq!(file_config.oscillation, hardcoded_config.oscillation);
        assert_eq!(file_config.scores, hardcoded_config.scores);
        assert_eq!(file_config.adversarial, hardcoded_config.adversarial);
        assert_eq!(file_config.debug, hardcoded_config.debug);
    }

    #[test]
    fn test_budgets_scale_with_area_and_cap() {
        let config = Config::default_hardcoded();
        assert_eq!(config.pathfinding.budget(100), 50);
        assert_eq!(config.pathfinding.budget(1600), 800);
        assert_eq!(config.pathfinding.budget(10_000), 1000);
        assert_eq!(config.flood_fill.budget(100), 50);
        assert_eq!(config.flood_fill.budget(1600), 500);
    }

    #[test]
    fn test_lead_weights() {
        let adv = Config::default_hardcoded().adversarial;
        assert_eq!(adv.weights_for_lead(100), (0.1, 0.3));
        assert_eq!(adv.weights_for_lead(-100), (0.3, 0.1));
        assert_eq!(adv.weights_for_lead(0), (0.2, 0.2));
    }

    #[test]
    fn test_rejects_oversized_late_game_scale() {
        let mut config = Config::default_hardcoded();
        config.flood_fill.late_game_scale = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        // Test with a non-existent file
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
