//! The immutable set of tools produced by one provider connection

use super::tool::Tool;
use super::types::ToolSchema;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Ordered, name-unique sequence of tools.
///
/// Cloning is cheap and every clone shares the same allocation, so
/// [`ToolSet::ptr_eq`] tells whether two sets came from the same connection.
#[derive(Clone)]
pub struct ToolSet {
    tools: Arc<[Arc<dyn Tool>]>,
}

impl ToolSet {
    /// Build a set, keeping the first tool of each name in order
    pub fn new(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut seen = HashSet::new();
        let tools: Vec<Arc<dyn Tool>> = tools
            .into_iter()
            .filter(|tool| {
                let fresh = seen.insert(tool.name().to_string());
                if !fresh {
                    warn!(tool_name = tool.name(), "Dropping duplicate tool");
                }
                fresh
            })
            .collect();

        Self {
            tools: tools.into(),
        }
    }

    /// An empty set
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Tool names in order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Schemas for every tool, in order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Whether both sets share the same allocation
    pub fn ptr_eq(&self, other: &ToolSet) -> bool {
        Arc::ptr_eq(&self.tools, &other.tools)
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolCall, ToolError, ToolResult};
    use async_trait::async_trait;
    use serde_json::json;

    struct NamedTool {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema::new(self.name, self.description, json!({"type": "object"}))
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success(&call.id, self.name, self.description))
        }
    }

    fn tool(name: &'static str, description: &'static str) -> Arc<dyn Tool> {
        Arc::new(NamedTool { name, description })
    }

    #[test]
    fn test_duplicates_keep_first() {
        let set = ToolSet::new(vec![
            tool("search_engine", "first"),
            tool("scrape_as_markdown", "scrape"),
            tool("search_engine", "second"),
        ]);

        assert_eq!(set.names(), vec!["search_engine", "scrape_as_markdown"]);
        assert_eq!(set.get("search_engine").unwrap().description(), "first");
        assert_eq!(set.schemas().len(), 2);
    }

    #[test]
    fn test_clones_share_identity() {
        let set = ToolSet::new(vec![tool("search_engine", "s")]);
        let clone = set.clone();
        let rebuilt = ToolSet::new(set.iter().cloned());

        assert!(set.ptr_eq(&clone));
        assert!(!set.ptr_eq(&rebuilt));
    }

    #[test]
    fn test_empty() {
        let set = ToolSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.get("anything").is_none());
    }
}
