//! Screen selection and render view-models
//!
//! The rendering layer only ever sees these read-only views. Interactions go
//! back through the events produced by `ChecklistView::toggle` and
//! `ChecklistView::edit`.

use crate::checklist::{Checklist, ChecklistStore, StepMark};
use crate::state_machine::{Event, SessionState};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Prefix added to utterances sent from the initial screen
pub const START_LIST_PREFIX: &str = "Start a list about: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Initial,
    Checklists,
}

impl Screen {
    pub fn select(store: &ChecklistStore) -> Self {
        if store.is_empty() {
            Screen::Initial
        } else {
            Screen::Checklists
        }
    }

    pub fn chips(self) -> ChipSet {
        match self {
            Screen::Initial => ChipSet {
                title: "How about:",
                chips: INITIAL_SCREEN_CHIPS,
            },
            Screen::Checklists => ChipSet {
                title: "Try saying:",
                chips: LIST_SCREEN_CHIPS,
            },
        }
    }
}

/// A canned utterance offered as a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub label: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChipSet {
    pub title: &'static str,
    pub chips: &'static [Chip],
}

pub const INITIAL_SCREEN_CHIPS: &[Chip] = &[
    Chip {
        label: "📸 Start Diagnosis",
        message: "Please help me diagnose my washing machine issue",
    },
    Chip {
        label: "🔊 Sound Check",
        message: "My washing machine is making unusual sounds",
    },
    Chip {
        label: "💧 Water Leak",
        message: "I see water leaking from my machine",
    },
    Chip {
        label: "⚠️ Error Help",
        message: "I need help with an error code",
    },
];

pub const LIST_SCREEN_CHIPS: &[Chip] = &[
    Chip {
        label: "📷 Adjust Camera",
        message: "Help me position the camera better",
    },
    Chip {
        label: "✅ Mark Complete",
        message: "I've completed this step",
    },
    Chip {
        label: "❓ Need Help",
        message: "I need more detailed instructions",
    },
    Chip {
        label: "🔄 Start Over",
        message: "Let's start the diagnosis again",
    },
];

/// One step as rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub raw: String,
    pub text: String,
    /// `None` for steps without a checkbox marker
    pub mark: Option<StepMark>,
}

impl StepView {
    fn from_raw(raw: &str) -> Self {
        match StepMark::parse(raw) {
            Some((mark, text)) => Self {
                raw: raw.to_string(),
                text: text.to_string(),
                mark: Some(mark),
            },
            None => Self {
                raw: raw.to_string(),
                text: raw.to_string(),
                mark: None,
            },
        }
    }
}

/// One checklist card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistView {
    pub id: String,
    pub heading: String,
    pub steps: Vec<StepView>,
}

impl ChecklistView {
    pub fn from_checklist(list: &Checklist) -> Self {
        Self {
            id: list.id.clone(),
            heading: list.heading.clone(),
            steps: list.steps.iter().map(|s| StepView::from_raw(s)).collect(),
        }
    }

    /// Event for a click on step `index`
    pub fn toggle(&self, index: usize) -> Event {
        Event::ToggleStep {
            list_id: self.id.clone(),
            index,
        }
    }

    /// Event for an inline edit replacing all steps
    pub fn edit(&self, steps: Vec<String>) -> Event {
        Event::EditList {
            list_id: self.id.clone(),
            steps,
        }
    }
}

/// Everything the front-end needs to draw the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub screen: Screen,
    pub lists: Vec<ChecklistView>,
    pub chips: ChipSet,
    pub camera_active: bool,
    /// Initial screen is hidden while this is set
    pub awaiting_first_response: bool,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    pub fn from_state(state: &SessionState) -> Self {
        let screen = Screen::select(&state.store);
        Self {
            screen,
            lists: state
                .store
                .iter()
                .map(|list| ChecklistView::from_checklist(list))
                .collect(),
            chips: screen.chips(),
            camera_active: state.camera_active,
            awaiting_first_response: state.awaiting_first_response,
            updated_at: Utc::now(),
        }
    }
}

impl Default for SessionView {
    fn default() -> Self {
        Self::from_state(&SessionState::default())
    }
}
