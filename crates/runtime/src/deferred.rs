use foundation::time::Time;
use tracing::debug;

/// A single job payload that becomes available no earlier than `due`.
///
/// The host clock drives it through [`DeferredTask::take_due`]. There is no
/// cancellation and no rescheduling: the payload is released exactly once and
/// the caller runs it to completion.
#[derive(Debug)]
pub struct DeferredTask<J> {
    label: &'static str,
    due: Time,
    job: Option<J>,
}

impl<J> DeferredTask<J> {
    pub fn schedule(label: &'static str, now: Time, delay_s: f64, job: J) -> Self {
        let due = now.after(delay_s.max(0.0));
        debug!(task = label, due_s = due.0, "deferred task scheduled");
        Self {
            label,
            due,
            job: Some(job),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn due(&self) -> Time {
        self.due
    }

    /// Releases the payload if it is due and was not released before.
    pub fn take_due(&mut self, now: Time) -> Option<J> {
        if now.0 < self.due.0 {
            return None;
        }
        let job = self.job.take()?;
        debug!(task = self.label, now_s = now.0, "deferred task released");
        Some(job)
    }

    /// Releases the payload immediately regardless of the due time. Returns
    /// `None` once it has been released either way.
    pub fn take_now(&mut self) -> Option<J> {
        self.job.take()
    }
}
