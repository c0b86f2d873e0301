use std::fmt;

use scene::FireRecord;
use tracing::info;

const NOTCH_EPS: f64 = 1e-9;

/// Upper bound on the notch count a range may expand to.
pub const MAX_NOTCHES: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum NotchError {
    NonFinite,
    NonPositiveStep(f64),
    Reversed { start: f64, end: f64 },
    TooMany { count: f64 },
}

impl fmt::Display for NotchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotchError::NonFinite => write!(f, "notch bounds must be finite"),
            NotchError::NonPositiveStep(step) => {
                write!(f, "notch step must be positive, got {step}")
            }
            NotchError::Reversed { start, end } => {
                write!(f, "notch start {start} is above end {end}")
            }
            NotchError::TooMany { count } => {
                write!(f, "notch range yields {count} notches, limit is {MAX_NOTCHES}")
            }
        }
    }
}

impl std::error::Error for NotchError {}

/// Ascending brightness thresholds the slider can emit.
#[derive(Debug, Clone, PartialEq)]
pub struct NotchSet {
    start: f64,
    step: f64,
    values: Vec<f64>,
}

impl NotchSet {
    /// `start, start + step, ...` up to and including `end`.
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, NotchError> {
        if !start.is_finite() || !end.is_finite() || !step.is_finite() {
            return Err(NotchError::NonFinite);
        }
        if step <= 0.0 {
            return Err(NotchError::NonPositiveStep(step));
        }
        if start > end {
            return Err(NotchError::Reversed { start, end });
        }
        let count = ((end - start) / step + NOTCH_EPS).floor() + 1.0;
        if !count.is_finite() || count > MAX_NOTCHES as f64 {
            return Err(NotchError::TooMany { count });
        }
        let count = count as usize;
        let values = (0..count).map(|i| start + i as f64 * step).collect();
        Ok(Self {
            start,
            step,
            values,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lowest notch; the default threshold.
    pub fn first(&self) -> f64 {
        self.start
    }

    pub fn index_of(&self, value: f64) -> Option<usize> {
        self.values
            .iter()
            .position(|n| (n - value).abs() <= NOTCH_EPS)
    }

    /// Nearest notch, clamped to the range. Non-finite input maps to the
    /// lowest notch.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.start;
        }
        let last = self.values.len().saturating_sub(1);
        let i = ((value - self.start) / self.step).round().clamp(0.0, last as f64) as usize;
        self.values[i]
    }
}

impl Default for NotchSet {
    fn default() -> Self {
        Self {
            start: 325.0,
            step: 25.0,
            values: (0..8).map(|i| 325.0 + 25.0 * i as f64).collect(),
        }
    }
}

/// Record indices per brightness notch: `bucket(n)` holds every record with
/// `brightness >= n`, in input order.
///
/// Buckets store indices into the session's record slice rather than copies,
/// so region tags added by a later indexing pass are seen through them.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedDataset {
    notches: NotchSet,
    buckets: Vec<Vec<usize>>,
}

impl BucketedDataset {
    pub fn build(records: &[FireRecord], notches: NotchSet) -> Self {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); notches.len()];
        for (i, record) in records.iter().enumerate() {
            let Some(b) = record.brightness else {
                continue;
            };
            for (bucket, notch) in buckets.iter_mut().zip(notches.values()) {
                if b >= *notch {
                    bucket.push(i);
                } else {
                    // Notches ascend, so no later bucket can take it either.
                    break;
                }
            }
        }
        info!(
            records = records.len(),
            notches = notches.len(),
            lowest = buckets.first().map_or(0, Vec::len),
            "built brightness buckets"
        );
        Self { notches, buckets }
    }

    pub fn notches(&self) -> &NotchSet {
        &self.notches
    }

    /// Records at or above `notch`. Values that are not notches get an empty
    /// slice; callers snap first.
    pub fn bucket(&self, notch: f64) -> &[usize] {
        self.notches
            .index_of(notch)
            .and_then(|i| self.buckets.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(notch, record count)` in ascending notch order.
    pub fn counts(&self) -> Vec<(f64, usize)> {
        self.notches
            .values()
            .iter()
            .zip(&self.buckets)
            .map(|(n, b)| (*n, b.len()))
            .collect()
    }
}
