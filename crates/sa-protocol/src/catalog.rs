//! Tool definitions: names, descriptions, and declared parameter schemas.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::intent::ToolName;

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    /// `YYYY-MM-DD`.
    Date,
    /// `HH:MM`, 24-hour.
    Time,
    /// Array of weekday numbers, 0 = Sunday.
    WeekdayList,
}

impl ParamKind {
    fn json_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Date => json!({ "type": "string", "format": "date" }),
            Self::Time => json!({ "type": "string", "pattern": "^\\d{2}:\\d{2}$" }),
            Self::WeekdayList => json!({
                "type": "array",
                "items": { "type": "integer", "minimum": 0, "maximum": 6 }
            }),
        }
    }

    /// Whether a JSON value has the right shape for this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String | Self::Date | Self::Time => value.is_string(),
            Self::Integer => value.is_u64() || value.is_i64(),
            Self::Boolean => value.is_boolean(),
            Self::WeekdayList => value
                .as_array()
                .is_some_and(|a| a.iter().all(|v| v.as_u64().is_some_and(|d| d <= 6))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: false,
            allowed: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| (*v).to_string()).collect());
        self
    }

    /// Kind check plus enum membership, when declared.
    pub fn accepts(&self, value: &Value) -> bool {
        if !self.kind.accepts(value) {
            return false;
        }
        match (&self.allowed, value.as_str()) {
            (Some(allowed), Some(s)) => allowed.iter().any(|a| a == s),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// Name, description, and parameter schema of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: ToolName,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDefinition {
    pub fn new(name: ToolName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.required)
    }

    /// JSON Schema object for the parameters.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for p in &self.parameters {
            let mut schema = p.kind.json_schema();
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("description".into(), Value::String(p.description.clone()));
                if let Some(allowed) = &p.allowed {
                    obj.insert("enum".into(), json!(allowed));
                }
            }
            properties.insert(p.name.clone(), schema);
        }
        let required: Vec<&str> = self.required_parameters().map(|p| p.name.as_str()).collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Drop keys the schema does not declare or whose values do not fit.
    pub fn retain_declared(&self, params: Map<String, Value>) -> Map<String, Value> {
        params
            .into_iter()
            .filter(|(k, v)| self.parameter(k).is_some_and(|spec| spec.accepts(v)))
            .collect()
    }
}

/// Immutable registry of tool definitions, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolCatalog {
    definitions: Vec<ToolDefinition>,
}

impl ToolCatalog {
    /// Build a catalog; a later definition with a duplicate name replaces
    /// the earlier one.
    pub fn new(definitions: impl IntoIterator<Item = ToolDefinition>) -> Self {
        let mut catalog = Self::default();
        for def in definitions {
            match catalog.definitions.iter_mut().find(|d| d.name == def.name) {
                Some(existing) => *existing = def,
                None => catalog.definitions.push(def),
            }
        }
        catalog
    }

    pub fn get(&self, name: ToolName) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: ToolName) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// True if any tool declares a parameter with this name.
    pub fn any_declares(&self, param: &str) -> bool {
        self.definitions.iter().any(|d| d.declares(param))
    }

    /// `[{name, description, parameters}]` as sent to the completion service.
    pub fn to_tool_specs(&self) -> Vec<Value> {
        self.definitions
            .iter()
            .map(|d| {
                json!({
                    "name": d.name,
                    "description": d.description,
                    "parameters": d.parameters_schema(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ToolDefinition {
        ToolDefinition::new(ToolName::GetAvailabilityData, "Query slots")
            .param(ParameterSpec::new("startDate", ParamKind::Date, "First day").required())
            .param(
                ParameterSpec::new("status", ParamKind::String, "Slot status")
                    .one_of(&["available", "booked", "all"]),
            )
            .param(ParameterSpec::new("weekdays", ParamKind::WeekdayList, "Days"))
    }

    #[test]
    fn schema_lists_required_and_enum() {
        let schema = sample().parameters_schema();
        assert_eq!(schema["required"], json!(["startDate"]));
        assert_eq!(schema["properties"]["status"]["enum"][1], "booked");
        assert_eq!(schema["properties"]["weekdays"]["type"], "array");
    }

    #[test]
    fn retain_declared_drops_unknown_and_mistyped() {
        let mut params = Map::new();
        params.insert("startDate".into(), json!("2024-01-16"));
        params.insert("status".into(), json!("pending"));
        params.insert("weekdays".into(), json!([1, 3, 9]));
        params.insert("bogus".into(), json!(true));
        let kept = sample().retain_declared(params);
        assert_eq!(kept.len(), 1);
        assert!(kept.contains_key("startDate"));
    }

    #[test]
    fn catalog_replaces_duplicates() {
        let catalog = ToolCatalog::new([
            sample(),
            ToolDefinition::new(ToolName::GetAvailabilityData, "Replacement"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(ToolName::GetAvailabilityData).unwrap().description,
            "Replacement"
        );
    }

    #[test]
    fn tool_specs_use_wire_names() {
        let catalog = ToolCatalog::new([sample()]);
        let specs = catalog.to_tool_specs();
        assert_eq!(specs[0]["name"], "get_availability_data");
        assert!(specs[0]["parameters"]["properties"].is_object());
    }
}
