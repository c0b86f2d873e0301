use foundation::ids::RegionId;
use scene::RegionTable;
use scene::selection::SelectionSet;

use crate::layer::{Layer, LayerId};
use crate::symbology::Rgb;

pub const SELECTED_FILL: Rgb = Rgb::new(0xdc, 0xdc, 0xdc);
pub const UNSELECTED_FILL: Rgb = Rgb::new(0x1b, 0x1b, 0x1b);
pub const BOUNDARY_STROKE: Rgb = Rgb::new(0x33, 0x33, 0x33);

#[derive(Debug, Clone, PartialEq)]
pub struct RegionStyle {
    pub id: RegionId,
    pub name: String,
    pub selected: bool,
    pub fill: Rgb,
    pub stroke: Rgb,
}

/// Region boundary layer. Only styling lives here; path drawing belongs to
/// the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RegionLayer {
    id: LayerId,
}

impl RegionLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    /// One style per region, in table order.
    pub fn styles(&self, regions: &RegionTable, selection: &SelectionSet) -> Vec<RegionStyle> {
        regions
            .iter()
            .map(|r| {
                let selected = selection.contains(r.id);
                RegionStyle {
                    id: r.id,
                    name: r.name.clone(),
                    selected,
                    fill: if selected { SELECTED_FILL } else { UNSELECTED_FILL },
                    stroke: BOUNDARY_STROKE,
                }
            })
            .collect()
    }
}

impl Layer for RegionLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "regions"
    }
}
