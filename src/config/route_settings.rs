use serde::{Deserialize, Serialize};

/// One route as declared in a routes file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RouteSettings {
    pub template: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
}
