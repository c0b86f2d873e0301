pub mod chart;
pub mod fire;
pub mod labels;
pub mod layer;
pub mod regions;
pub mod symbology;
pub mod tooltip;

pub use chart::{ChartFrame, ChartLayout, ChartStyle};
pub use fire::{FireLayer, FireMark, FireTransitions, MarkOp};
pub use labels::{GraticuleLabel, graticule_labels};
pub use layer::*;
pub use regions::{RegionLayer, RegionStyle};
pub use symbology::{FireSymbology, LinearScale, Rgb, SymbologyStyle};
pub use tooltip::{TooltipFields, describe_record};
