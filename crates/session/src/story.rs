use serde::{Deserialize, Serialize};

/// One narration card. The text itself is supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStep {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub text: String,
}

/// Step-through narration shown before the map is unlocked.
///
/// Reaching the last step completes the presentation; advancing past it
/// hides the box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    steps: Vec<StoryStep>,
    index: usize,
    active: bool,
    completed: bool,
    box_visible: bool,
}

impl Presentation {
    pub fn new(steps: Vec<StoryStep>) -> Self {
        Self {
            steps,
            index: 0,
            active: false,
            completed: false,
            box_visible: false,
        }
    }

    pub fn start(&mut self) {
        self.index = 0;
        if self.steps.is_empty() {
            self.complete();
            return;
        }
        self.active = true;
        self.box_visible = true;
        self.completed = false;
        if self.on_last_step() {
            self.complete();
        }
    }

    pub fn next(&mut self) {
        if !self.box_visible {
            return;
        }
        if self.on_last_step() {
            self.box_visible = false;
            return;
        }
        self.index += 1;
        if self.on_last_step() {
            self.complete();
        }
    }

    pub fn previous(&mut self) {
        if self.box_visible && self.index > 0 {
            self.index -= 1;
        }
    }

    /// Step on screen, `None` once the box is hidden.
    pub fn current(&self) -> Option<&StoryStep> {
        if !self.box_visible {
            return None;
        }
        self.steps.get(self.index)
    }

    /// `"2 / 5"` style progress text.
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.index + 1, self.steps.len())
    }

    pub fn next_label(&self) -> &'static str {
        if self.on_last_step() { "End" } else { "→" }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the map has been unlocked.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn box_visible(&self) -> bool {
        self.box_visible
    }

    fn on_last_step(&self) -> bool {
        self.index + 1 >= self.steps.len()
    }

    fn complete(&mut self) {
        self.completed = true;
        self.active = false;
    }
}
