use serde::Deserialize;
use serde_json::{Map, Value};

use mdp_core::GatewayError;

/// A row object: column name → scalar.
pub type RowObject = Map<String, Value>;

/// Gateway actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Save,
    Add,
    Delete,
    Update,
}

impl Action {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Action::Read),
            "save" => Some(Action::Save),
            "add" => Some(Action::Add),
            "delete" => Some(Action::Delete),
            "update" => Some(Action::Update),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Save => "save",
            Action::Add => "add",
            Action::Delete => "delete",
            Action::Update => "update",
        }
    }
}

/// Query string of `GET ?action=read&sheet=...`.
#[derive(Debug, Default, Deserialize)]
pub struct ReadQuery {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
}

/// JSON body of a POST request. Which fields matter depends on `action`.
#[derive(Debug, Default, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
    /// Rows for `save`.
    #[serde(default)]
    pub data: Option<Value>,
    /// Row for `add`, partial row for `update`.
    #[serde(default)]
    pub row: Option<Value>,
    /// Target id for `delete` and `update`.
    #[serde(default)]
    pub id: Option<Value>,
}

impl ActionRequest {
    pub fn parse(body: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(body)
            .map_err(|e| GatewayError::BadRequest(format!("invalid request body: {e}")))
    }

    pub fn sheet(&self) -> Result<&str, GatewayError> {
        self.sheet.as_deref().ok_or_else(|| missing("sheet"))
    }

    pub fn id(&self) -> Result<&Value, GatewayError> {
        match &self.id {
            Some(id @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => Ok(id),
            Some(_) => Err(GatewayError::BadRequest("id must be a scalar".into())),
            None => Err(missing("id")),
        }
    }

    pub fn row(&self) -> Result<&RowObject, GatewayError> {
        match &self.row {
            Some(Value::Object(row)) => Ok(row),
            Some(_) => Err(GatewayError::BadRequest("row must be an object".into())),
            None => Err(missing("row")),
        }
    }

    /// Rows of a `save` request. Every element must be an object.
    pub fn data(&self) -> Result<Vec<&RowObject>, GatewayError> {
        let items = match &self.data {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(GatewayError::BadRequest("data must be an array".into())),
            None => return Err(missing("data")),
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object().ok_or_else(|| {
                    GatewayError::BadRequest(format!("data[{i}] must be an object"))
                })
            })
            .collect()
    }
}

fn missing(field: &str) -> GatewayError {
    GatewayError::BadRequest(format!("missing field: {field}"))
}
