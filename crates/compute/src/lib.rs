pub mod analysis;
pub mod buckets;
pub mod filter;
pub mod season;

pub use analysis::spatial::{ContainmentIndexer, IndexSummary};
pub use analysis::statistics::{MonthlyAverages, Statistics};
pub use analysis::temporal::{
    DatasetSpan, TIME_FRAME_PREFIX, YearMonth, calendar_year_in, fire_year_of, time_frame_label,
    time_frame_runs,
};
pub use buckets::*;
pub use filter::*;
pub use season::*;
