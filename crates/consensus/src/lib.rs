pub mod aggregator;
pub mod extractor;
pub mod tally;

pub use aggregator::{Consensus, ConsensusAggregator, ConsensusError};
pub use extractor::extract_final_answer;
pub use tally::{TallyEntry, VoteTally};
