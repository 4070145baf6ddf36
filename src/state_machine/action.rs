//! Typed actions parsed from function calls

use crate::protocol::FunctionCall;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names of the function calls the dispatcher recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    StartCamera,
    StopCamera,
    AnalyzeVisual,
    CreateChecklist,
    UpdateChecklist,
    CreateList,
    EditList,
    RemoveList,
    LookAtLists,
}

impl ActionName {
    pub const ALL: [ActionName; 9] = [
        ActionName::StartCamera,
        ActionName::StopCamera,
        ActionName::AnalyzeVisual,
        ActionName::CreateChecklist,
        ActionName::UpdateChecklist,
        ActionName::CreateList,
        ActionName::EditList,
        ActionName::RemoveList,
        ActionName::LookAtLists,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::StartCamera => "start_camera",
            ActionName::StopCamera => "stop_camera",
            ActionName::AnalyzeVisual => "analyze_visual",
            ActionName::CreateChecklist => "create_checklist",
            ActionName::UpdateChecklist => "update_checklist",
            ActionName::CreateList => "create_list",
            ActionName::EditList => "edit_list",
            ActionName::RemoveList => "remove_list",
            ActionName::LookAtLists => "look_at_lists",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }
}

/// Arguments of `analyze_visual`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeVisualArgs {
    pub focus_area: String,
}

/// Arguments of `create_checklist`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChecklistArgs {
    pub issue_type: String,
    pub steps: Vec<String>,
}

/// Arguments of `update_checklist`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateChecklistArgs {
    pub issue_type: String,
    pub completed_steps: Vec<String>,
}

/// Arguments of `create_list` and `edit_list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListArgs {
    pub id: String,
    #[serde(default)]
    pub heading: String,
    pub list_array: Vec<String>,
}

/// Arguments of `remove_list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveListArgs {
    pub id: String,
}

/// A function call resolved to what it asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StartCamera,
    StopCamera,
    AnalyzeVisual(AnalyzeVisualArgs),
    CreateChecklist(CreateChecklistArgs),
    UpdateChecklist(UpdateChecklistArgs),
    CreateList(ListArgs),
    EditList(ListArgs),
    RemoveList(RemoveListArgs),
    LookAtLists,
    /// Known name whose arguments did not match the expected shape
    Malformed { name: ActionName, reason: String },
    /// Name this client does not handle
    Unknown { name: String },
}

impl Action {
    /// Resolve a function call. Never fails: bad input becomes
    /// `Malformed` or `Unknown`.
    pub fn from_call(call: &FunctionCall) -> Self {
        let Some(name) = ActionName::from_name(&call.name) else {
            return Action::Unknown {
                name: call.name.clone(),
            };
        };
        let args = &call.args;
        let parsed = match name {
            ActionName::StartCamera => Ok(Action::StartCamera),
            ActionName::StopCamera => Ok(Action::StopCamera),
            ActionName::LookAtLists => Ok(Action::LookAtLists),
            ActionName::AnalyzeVisual => parse_args(args).map(Action::AnalyzeVisual),
            ActionName::CreateChecklist => parse_args(args).map(Action::CreateChecklist),
            ActionName::UpdateChecklist => parse_args(args).map(Action::UpdateChecklist),
            ActionName::CreateList => parse_args(args).map(Action::CreateList),
            ActionName::EditList => parse_args(args).map(Action::EditList),
            ActionName::RemoveList => parse_args(args).map(Action::RemoveList),
        };
        parsed.unwrap_or_else(|reason| Action::Malformed { name, reason })
    }
}

fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, String> {
    T::deserialize(args).map_err(|e| e.to_string())
}
