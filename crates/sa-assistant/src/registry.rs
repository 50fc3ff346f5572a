//! Tool registry: the fixed `ToolName` → handler mapping built at startup.
//!
//! Names arriving as strings (from the remote completion service) are
//! resolved here; anything that does not parse as a known tool misses.

use std::collections::HashMap;

use sa_protocol::{ToolCatalog, ToolName};
use sa_tools::AvailabilityTool;

pub struct ToolRegistry {
    tools: Vec<Box<dyn AvailabilityTool>>,
    /// Map from tool name → index into `tools`.
    index: HashMap<ToolName, usize>,
    catalog: ToolCatalog,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn AvailabilityTool>>) -> Self {
        let index = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name(), i))
            .collect();
        let catalog = ToolCatalog::new(tools.iter().map(|t| t.definition()));
        Self {
            tools,
            index,
            catalog,
        }
    }

    /// Build with every availability tool.
    pub fn with_defaults() -> Self {
        Self::new(sa_tools::all_tools())
    }

    pub fn get(&self, name: ToolName) -> Option<&dyn AvailabilityTool> {
        self.index.get(&name).map(|&i| self.tools[i].as_ref())
    }

    /// Resolve a tool from its wire name.
    pub fn lookup(&self, name: &str) -> Option<&dyn AvailabilityTool> {
        name.parse::<ToolName>().ok().and_then(|n| self.get(n))
    }

    /// Definitions of the registered tools.
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_with_defaults() {
        let reg = ToolRegistry::with_defaults();
        assert_eq!(reg.len(), 5);
        assert_eq!(reg.catalog().len(), 5);
    }

    #[test]
    fn lookup_by_wire_name() {
        let reg = ToolRegistry::with_defaults();
        let tool = reg.lookup("create_recurring_slots").unwrap();
        assert_eq!(tool.name(), ToolName::CreateRecurringSlots);
    }

    #[test]
    fn lookup_unknown_returns_none() {
        let reg = ToolRegistry::with_defaults();
        assert!(reg.lookup("export_calendar").is_none());
    }

    #[test]
    fn partial_registry_misses_unregistered_tools() {
        let reg = ToolRegistry::new(vec![Box::new(sa_tools::tools::GetAvailabilityData)]);
        assert!(reg.get(ToolName::GetAvailabilityData).is_some());
        assert!(reg.lookup("delete_availability_slots").is_none());
        assert!(!reg.catalog().contains(ToolName::DeleteAvailabilitySlots));
    }
}
