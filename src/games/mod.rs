pub mod types;
pub mod entropy;
pub mod validator;
pub mod processor;
pub mod analyzer;
pub mod kelly;

pub use types::*;
pub use entropy::{generate_outcome, EntropySource, OsEntropy, SeededEntropy, SequenceEntropy};
pub use validator::{is_valid_wager, quick_chips, ChipKind, QuickChip};
pub use processor::{process_wager, FlipProcessor};
pub use analyzer::analyze;
pub use kelly::{
    capped_stake, kelly_fraction, kelly_stake, simulate_optimal_play, simulate_with_config,
    OptimalPlayResult, DEFAULT_MAX_STEPS,
};
