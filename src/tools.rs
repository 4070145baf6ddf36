//! Function declarations advertised to the agent
//!
//! One declaration per name the dispatcher recognizes. The schema uses the
//! Gemini type names (`OBJECT`, `STRING`, `ARRAY`).

use crate::state_machine::action::ActionName;
use serde::Serialize;
use serde_json::{json, Value};

/// A callable function as described to the agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Tool entry of the setup message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSet {
    pub function_declarations: Vec<FunctionDeclaration>,
}

impl ToolSet {
    /// Every recognized action
    pub fn standard() -> Self {
        Self {
            function_declarations: ActionName::ALL.into_iter().map(declaration).collect(),
        }
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.function_declarations.iter().map(|d| d.name)
    }
}

fn string_array(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "description": description,
        "items": { "type": "STRING" }
    })
}

fn list_parameters() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": {
                "type": "STRING",
                "description": "Descriptive identifier, e.g. 'water-leak-front'"
            },
            "heading": {
                "type": "STRING",
                "description": "Heading shown above the list, with an emoji"
            },
            "list_array": string_array("Steps formatted as '- [ ] step' or '- [x] step'")
        },
        "required": ["id", "heading", "list_array"]
    })
}

fn declaration(name: ActionName) -> FunctionDeclaration {
    let (description, parameters) = match name {
        ActionName::StartCamera => ("Requests camera access and initiates video feed", None),
        ActionName::StopCamera => ("Stops the video feed and releases the camera", None),
        ActionName::AnalyzeVisual => (
            "Analyzes current camera feed for issues",
            Some(json!({
                "type": "OBJECT",
                "properties": {
                    "focus_area": {
                        "type": "STRING",
                        "description": "Area to analyze: 'display', 'connection', 'drum', 'filter', etc."
                    }
                },
                "required": ["focus_area"]
            })),
        ),
        ActionName::CreateChecklist => (
            "Creates diagnostic checklist based on visual analysis",
            Some(json!({
                "type": "OBJECT",
                "properties": {
                    "issue_type": { "type": "STRING" },
                    "steps": string_array("Diagnostic steps")
                },
                "required": ["issue_type", "steps"]
            })),
        ),
        ActionName::UpdateChecklist => (
            "Updates checklist based on completed steps",
            Some(json!({
                "type": "OBJECT",
                "properties": {
                    "issue_type": { "type": "STRING" },
                    "completed_steps": string_array("Full replacement list of steps")
                },
                "required": ["issue_type", "completed_steps"]
            })),
        ),
        ActionName::CreateList => ("Creates a new checklist card", Some(list_parameters())),
        ActionName::EditList => (
            "Replaces the steps of an existing checklist",
            Some(list_parameters()),
        ),
        ActionName::RemoveList => (
            "Removes a checklist",
            Some(json!({
                "type": "OBJECT",
                "properties": {
                    "id": { "type": "STRING" }
                },
                "required": ["id"]
            })),
        ),
        ActionName::LookAtLists => (
            "Returns every checklist currently shown, including checked state",
            None,
        ),
    };

    FunctionDeclaration {
        name: name.as_str(),
        description,
        parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_declared() {
        let tools = ToolSet::standard();
        let names: Vec<_> = tools.names().collect();

        for action in ActionName::ALL {
            assert!(names.contains(&action.as_str()), "Missing {}", action.as_str());
        }
        assert_eq!(names.len(), ActionName::ALL.len());
    }

    #[test]
    fn test_declaration_wire_shape() {
        let value = serde_json::to_value(ToolSet::standard()).unwrap();
        let decls = value["functionDeclarations"].as_array().unwrap();

        let start = decls.iter().find(|d| d["name"] == "start_camera").unwrap();
        assert!(start.get("parameters").is_none());

        let create = decls.iter().find(|d| d["name"] == "create_checklist").unwrap();
        assert_eq!(create["parameters"]["type"], "OBJECT");
        assert_eq!(create["parameters"]["properties"]["steps"]["items"]["type"], "STRING");
    }
}
