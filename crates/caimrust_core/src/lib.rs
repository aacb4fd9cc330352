mod candidates;
mod discretize;
mod errors;
mod model;
mod monitor;
mod quanta;
mod scheme;
mod utils;

pub use candidates::{generate_candidates, CandidateList, CandidatePolicy, ColumnStats};
pub use discretize::{CaimConfig, CaimDiscretizer, ColumnSource};
pub use errors::CaimError;
pub use model::{CaimModel, ColumnModel};
pub use monitor::{CancelFlag, NoProgress, ProgressMonitor};
pub use quanta::{ClassTable, QuantaMatrix};
pub use scheme::{DiscretizationScheme, Interval};
