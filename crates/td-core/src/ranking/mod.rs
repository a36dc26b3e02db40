pub mod engine;
pub mod view;
pub mod weights;

pub use engine::{RankingEngine, RankingOutcome};
pub use view::{apply_view, SortDir, SortKey, SortState, ViewOptions};
pub use weights::{CriteriaWeights, CriterionWeight};
