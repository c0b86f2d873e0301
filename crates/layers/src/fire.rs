use std::collections::HashMap;

use foundation::ids::RecordId;
use foundation::math::{Projection, Vec2};
use scene::FireRecord;
use scene::reconcile::{KeyedCallbacks, apply_keyed, diff_keyed};
use tracing::debug;

use crate::layer::{Layer, LayerId};
use crate::symbology::{FireSymbology, PointStyle};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FireTransitions {
    pub enter_ms: u32,
    pub update_ms: u32,
}

impl Default for FireTransitions {
    fn default() -> Self {
        Self {
            enter_ms: 150,
            update_ms: 150,
        }
    }
}

/// Target state of one rendered hotspot, in projected pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FireMark {
    pub id: RecordId,
    /// Index into the session's record slice.
    pub record: usize,
    pub position: Vec2,
    pub style: PointStyle,
}

/// Instruction for the drawing host.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkOp {
    Exit { id: RecordId },
    /// New mark: starts at `from_radius` and animates to `mark.style.radius`.
    Enter {
        mark: FireMark,
        from_radius: f64,
        duration_ms: u32,
    },
    /// Existing mark moved or restyled.
    Update { mark: FireMark, duration_ms: u32 },
}

/// Hotspot point layer reconciled by record id.
///
/// Ordering contract:
/// - `render` emits every exit, then enters, then updates.
/// - Enters and updates follow the order of the visible sequence.
#[derive(Debug, Clone)]
pub struct FireLayer {
    id: LayerId,
    symbology: FireSymbology,
    transitions: FireTransitions,
    rendered: Vec<RecordId>,
    by_id: HashMap<RecordId, usize>,
}

impl FireLayer {
    pub fn new(id: u64, symbology: FireSymbology, transitions: FireTransitions) -> Self {
        Self {
            id: LayerId(id),
            symbology,
            transitions,
            rendered: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Reconciles the drawn marks against `visible` (indices into
    /// `records`). Records without a position, or that the projection
    /// cannot place, are not drawn.
    pub fn render(
        &mut self,
        records: &[FireRecord],
        visible: &[usize],
        projection: &dyn Projection,
    ) -> Vec<MarkOp> {
        let mut marks: HashMap<RecordId, FireMark> = HashMap::with_capacity(visible.len());
        let mut keys: Vec<RecordId> = Vec::with_capacity(visible.len());
        for &i in visible {
            let Some(record) = records.get(i) else {
                continue;
            };
            let Some(pos) = record.position else {
                continue;
            };
            let Some(position) = projection
                .project(pos.lon, pos.lat)
                .filter(|p| p.is_finite())
            else {
                continue;
            };
            if marks.contains_key(&record.id) {
                continue;
            }
            keys.push(record.id.clone());
            marks.insert(
                record.id.clone(),
                FireMark {
                    id: record.id.clone(),
                    record: i,
                    position,
                    style: self.symbology.encode(record.brightness),
                },
            );
        }

        let diff = diff_keyed(&self.rendered, &keys);
        let mut emitter = OpEmitter {
            marks: &marks,
            transitions: self.transitions,
            ops: Vec::with_capacity(diff.entered.len() + diff.updated.len() + diff.exited.len()),
        };
        apply_keyed(&diff, &mut emitter);
        debug!(
            entered = diff.entered.len(),
            updated = diff.updated.len(),
            exited = diff.exited.len(),
            "fire layer reconciled"
        );

        let ops = emitter.ops;
        self.by_id = marks.into_iter().map(|(id, m)| (id, m.record)).collect();
        self.rendered = keys;
        ops
    }

    /// Record index behind a drawn mark, for hover lookups.
    pub fn record_at(&self, id: &RecordId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn rendered(&self) -> &[RecordId] {
        &self.rendered
    }

    pub fn symbology(&self) -> &FireSymbology {
        &self.symbology
    }
}

impl Layer for FireLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "fires"
    }
}

struct OpEmitter<'a> {
    marks: &'a HashMap<RecordId, FireMark>,
    transitions: FireTransitions,
    ops: Vec<MarkOp>,
}

impl KeyedCallbacks<RecordId> for OpEmitter<'_> {
    fn exit(&mut self, key: &RecordId) {
        self.ops.push(MarkOp::Exit { id: key.clone() });
    }

    fn enter(&mut self, key: &RecordId) {
        if let Some(mark) = self.marks.get(key) {
            self.ops.push(MarkOp::Enter {
                mark: mark.clone(),
                from_radius: 0.0,
                duration_ms: self.transitions.enter_ms,
            });
        }
    }

    fn update(&mut self, key: &RecordId) {
        if let Some(mark) = self.marks.get(key) {
            self.ops.push(MarkOp::Update {
                mark: mark.clone(),
                duration_ms: self.transitions.update_ms,
            });
        }
    }
}
