//! Top-level session: owns the datasets, the filter state and the layers,
//! and turns input events into redraw instructions.
//!
//! Every handler re-derives the visible set from the current state in full.
//! Nothing is patched incrementally.

use chrono::Datelike;
use compute::{
    BucketedDataset, ContainmentIndexer, DatasetSpan, FilterState, IndexSummary, MonthlyAverages,
    NotchSet, Season, derive_chart_subset, derive_visible, time_frame_label,
};
use foundation::ids::RecordId;
use foundation::math::Projection;
use foundation::time::Time;
use layers::chart::{ChartFrame, ChartLayout, ChartStyle};
use layers::fire::{FireLayer, MarkOp};
use layers::labels::{GraticuleLabel, graticule_labels};
use layers::regions::{RegionLayer, RegionStyle};
use layers::tooltip::{TooltipFields, describe_record};
use runtime::{DeferredTask, EventBus};
use scene::viewport::{FitOptions, ViewportSize, ViewportTransform, fit_bounds, selection_bounds};
use scene::{FireRecord, RegionTable};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ExplorerConfig};

pub const EVENT_LOADING: &str = "loading";
pub const EVENT_INDEXED: &str = "indexed";
pub const EVENT_VIEWPORT: &str = "viewport";

const FIRE_LAYER_ID: u64 = 1;
const REGION_LAYER_ID: u64 = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadingState {
    /// Containment indexing has not finished; region filters see no tags yet.
    Loading,
    Ready,
}

/// Visibility of the map's selection buttons.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SelectionControls {
    pub reset_visible: bool,
    pub zoom_in_visible: bool,
    pub zoom_out_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitles {
    pub regions: String,
    pub time_frame: String,
}

/// Pixel sizes of the map and the chart containers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Surface {
    pub map: ViewportSize,
    pub chart: ViewportSize,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            map: ViewportSize::new(975.0, 610.0),
            chart: ViewportSize::new(320.0, 200.0),
        }
    }
}

/// Animated move of the map layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportChange {
    pub transform: ViewportTransform,
    pub duration_ms: u32,
}

/// What the host has to redraw after an event. The chart is always current
/// in [`Explorer::chart`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Refresh {
    pub marks: Vec<MarkOp>,
    /// Present when region fills changed.
    pub regions: Option<Vec<RegionStyle>>,
    pub viewport: Option<ViewportChange>,
}

#[derive(Debug)]
struct IndexJob {
    padding_deg: f64,
}

pub struct Explorer {
    config: ExplorerConfig,
    records: Vec<FireRecord>,
    regions: RegionTable,
    buckets: BucketedDataset,
    filter: FilterState,
    span: DatasetSpan,
    index_task: DeferredTask<IndexJob>,
    index_summary: Option<IndexSummary>,
    loading: LoadingState,
    events: EventBus,
    projection: Box<dyn Projection>,
    surface: Surface,
    fire_layer: FireLayer,
    region_layer: RegionLayer,
    chart_style: ChartStyle,
    fit: FitOptions,
    viewport: ViewportTransform,
    controls: SelectionControls,
    visible: Vec<usize>,
    averages: MonthlyAverages,
    chart: ChartFrame,
}

impl Explorer {
    /// Builds the session and schedules the containment pass
    /// `config.index_delay_s` after `now`. Call [`Explorer::redraw`] for the
    /// first frame.
    pub fn new(
        records: Vec<FireRecord>,
        regions: RegionTable,
        config: ExplorerConfig,
        projection: Box<dyn Projection>,
        surface: Surface,
        now: Time,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let notches: NotchSet = config.notch_set()?;
        let filter = FilterState {
            selected_seasons: config.initial_seasons.iter().copied().collect(),
            brightness_threshold: notches.first(),
            ..FilterState::default()
        };
        let buckets = BucketedDataset::build(&records, notches);
        let span = DatasetSpan::from_records(&records)
            .unwrap_or_else(|| DatasetSpan::fire_year(chrono::Local::now().year()));

        let index_task = DeferredTask::schedule(
            "containment-index",
            now,
            config.index_delay_s,
            IndexJob {
                padding_deg: config.bbox_padding_deg,
            },
        );
        let mut events = EventBus::new();
        events.emit(
            EVENT_LOADING,
            format!("indexing {} records against {} regions", records.len(), regions.len()),
        );
        info!(
            records = records.len(),
            regions = regions.len(),
            "explorer session created"
        );

        let chart_style = config.chart_style();
        let averages = MonthlyAverages::default();
        let chart = ChartLayout::compute(
            &averages,
            surface.chart,
            &filter.selected_seasons.months(),
            &chart_style,
        );

        Ok(Self {
            fire_layer: FireLayer::new(
                FIRE_LAYER_ID,
                config.fire_symbology(),
                config.fire_transitions(),
            ),
            region_layer: RegionLayer::new(REGION_LAYER_ID),
            fit: config.fit_options(),
            chart_style,
            config,
            records,
            regions,
            buckets,
            filter,
            span,
            index_task,
            index_summary: None,
            loading: LoadingState::Loading,
            events,
            projection,
            surface,
            viewport: ViewportTransform::identity(),
            controls: SelectionControls::default(),
            visible: Vec::new(),
            averages,
            chart,
        })
    }

    /// Advances the session clock. Runs the containment pass once it is due
    /// and returns the resulting redraw.
    pub fn tick(&mut self, now: Time) -> Option<Refresh> {
        let job = self.index_task.take_due(now)?;
        Some(self.run_index(job))
    }

    /// Runs the containment pass now if it has not run yet.
    pub fn finish_loading(&mut self) -> Option<Refresh> {
        let job = self.index_task.take_now()?;
        Some(self.run_index(job))
    }

    fn run_index(&mut self, job: IndexJob) -> Refresh {
        let summary =
            ContainmentIndexer::new(&self.regions, job.padding_deg).run(&mut self.records);
        self.index_summary = Some(summary);
        self.loading = LoadingState::Ready;
        self.events.emit(
            EVENT_INDEXED,
            format!(
                "{} of {} records inside a region",
                summary.matched, summary.records
            ),
        );
        self.redraw()
    }

    /// Full re-derivation and redraw, including region styles.
    pub fn redraw(&mut self) -> Refresh {
        let mut refresh = self.rederive();
        refresh.regions = Some(self.region_styles());
        refresh
    }

    pub fn on_season_toggle(&mut self, season: Season, checked: bool) -> Refresh {
        self.filter.selected_seasons.set(season, checked);
        debug!(%season, checked, "season toggled");
        self.rederive()
    }

    /// Brightness slider input. Values between notches are snapped.
    pub fn on_brightness_change(&mut self, value: f64) -> Refresh {
        let snapped = self.buckets.notches().snap(value);
        if snapped != value {
            debug!(value, snapped, "brightness snapped to notch");
        }
        self.filter.brightness_threshold = snapped;
        self.rederive()
    }

    /// Toggles a region by name. Unknown names change nothing.
    pub fn on_region_click(&mut self, name: &str) -> Refresh {
        let Some(id) = self.regions.id_of(name) else {
            warn!(name, "click on unknown region ignored");
            return Refresh::default();
        };
        let selected = self.filter.selected_regions.toggle(id);
        debug!(name, selected, "region toggled");
        let any = !self.filter.selected_regions.is_empty();
        self.controls = SelectionControls {
            reset_visible: any,
            zoom_in_visible: any,
            zoom_out_visible: false,
        };
        let mut refresh = self.rederive();
        refresh.regions = Some(self.region_styles());
        refresh
    }

    /// Relays out the chart for new container sizes. Point positions come
    /// from the host projection and are unaffected.
    pub fn on_resize(&mut self, surface: Surface) -> &ChartFrame {
        self.surface = surface;
        self.layout_chart();
        &self.chart
    }

    /// Tooltip fields for a drawn mark.
    pub fn on_hover(&self, id: &RecordId) -> Option<TooltipFields> {
        let index = self.fire_layer.record_at(id)?;
        let record = self.records.get(index)?;
        Some(describe_record(record, &self.regions))
    }

    /// Zooms to the selected regions. No-op without a selection or when the
    /// selection has no projected area.
    pub fn fit_to_selection(&mut self) -> Option<ViewportChange> {
        if self.filter.selected_regions.is_empty() {
            return None;
        }
        let bounds = selection_bounds(
            &self.regions,
            &self.filter.selected_regions,
            self.projection.as_ref(),
        )?;
        let Some(transform) = fit_bounds(bounds, self.surface.map, self.fit) else {
            debug!(?bounds, "selection bounds are degenerate; fit skipped");
            return None;
        };
        self.viewport = transform;
        self.controls.zoom_out_visible = true;
        self.events.emit(
            EVENT_VIEWPORT,
            format!("fit to {} regions", self.filter.selected_regions.len()),
        );
        Some(ViewportChange {
            transform,
            duration_ms: self.config.transitions.viewport_ms,
        })
    }

    /// Reverts the zoom but keeps the selection.
    pub fn zoom_out(&mut self) -> Option<ViewportChange> {
        self.controls.zoom_out_visible = false;
        if self.viewport.is_identity() {
            return None;
        }
        self.viewport = ViewportTransform::identity();
        self.events.emit(EVENT_VIEWPORT, "zoom out");
        Some(ViewportChange {
            transform: self.viewport,
            duration_ms: self.config.transitions.viewport_ms,
        })
    }

    /// Clears the selection and reverts the viewport.
    pub fn reset_selection(&mut self) -> Refresh {
        self.filter.selected_regions.clear();
        self.controls = SelectionControls::default();
        let viewport = (!self.viewport.is_identity()).then(|| {
            self.viewport = ViewportTransform::identity();
            self.events.emit(EVENT_VIEWPORT, "reset");
            ViewportChange {
                transform: self.viewport,
                duration_ms: self.config.transitions.reset_ms,
            }
        });
        let mut refresh = self.rederive();
        refresh.regions = Some(self.region_styles());
        refresh.viewport = viewport;
        refresh
    }

    /// Indices into [`Explorer::records`] of the currently visible records.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &FireRecord> + '_ {
        self.visible.iter().filter_map(|&i| self.records.get(i))
    }

    pub fn chart(&self) -> &ChartFrame {
        &self.chart
    }

    pub fn monthly_averages(&self) -> &MonthlyAverages {
        &self.averages
    }

    pub fn loading_state(&self) -> LoadingState {
        self.loading
    }

    pub fn controls(&self) -> SelectionControls {
        self.controls
    }

    pub fn subtitles(&self) -> Subtitles {
        let mut names: Vec<&str> = self
            .filter
            .selected_regions
            .iter()
            .filter_map(|id| self.regions.name(id))
            .collect();
        names.sort_unstable();
        let regions = if names.is_empty() {
            "States: all states".to_string()
        } else {
            format!("States: {}", names.join(", "))
        };
        Subtitles {
            regions,
            time_frame: time_frame_label(&self.span, self.filter.selected_seasons.months()),
        }
    }

    /// Checkbox labels such as `"Winter (November 2023–January 2024)"`.
    pub fn season_labels(&self) -> Vec<(Season, String)> {
        Season::ALL
            .into_iter()
            .map(|s| (s, s.range_label(self.span.label_fire_year())))
            .collect()
    }

    pub fn graticule(&self, step_deg: u32) -> Vec<GraticuleLabel> {
        graticule_labels(
            self.projection.as_ref(),
            self.surface.map.width,
            self.surface.map.height,
            step_deg,
        )
    }

    pub fn region_styles(&self) -> Vec<RegionStyle> {
        self.region_layer
            .styles(&self.regions, &self.filter.selected_regions)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn records(&self) -> &[FireRecord] {
        &self.records
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn buckets(&self) -> &BucketedDataset {
        &self.buckets
    }

    pub fn viewport(&self) -> ViewportTransform {
        self.viewport
    }

    pub fn index_summary(&self) -> Option<IndexSummary> {
        self.index_summary
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    fn rederive(&mut self) -> Refresh {
        self.visible = derive_visible(&self.buckets, &self.records, &self.filter);
        let chart_subset = derive_chart_subset(&self.buckets, &self.records, &self.filter);
        self.averages =
            MonthlyAverages::from_records(chart_subset.iter().filter_map(|&i| self.records.get(i)));
        self.layout_chart();
        let marks = self
            .fire_layer
            .render(&self.records, &self.visible, self.projection.as_ref());
        debug!(
            visible = self.visible.len(),
            chart_records = chart_subset.len(),
            ops = marks.len(),
            "view re-derived"
        );
        Refresh {
            marks,
            regions: None,
            viewport: None,
        }
    }

    fn layout_chart(&mut self) {
        self.chart = ChartLayout::compute(
            &self.averages,
            self.surface.chart,
            &self.filter.selected_seasons.months(),
            &self.chart_style,
        );
    }
}
