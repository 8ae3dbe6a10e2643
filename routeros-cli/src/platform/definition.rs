//! Platform definition for device-family specific configuration.

use std::fmt;

use crate::channel::PatternRegistry;
use crate::config::ParserOptions;
use crate::facts::FactQuery;

/// Everything the driver needs to know about a device family.
#[derive(Clone)]
pub struct PlatformDefinition {
    /// Platform name used for registry lookups (e.g., "routeros").
    pub name: String,

    /// Value reported as `network_os` in device facts.
    pub network_os: String,

    /// Prompt, error and interactive prompt patterns.
    pub patterns: PatternRegistry,

    /// Informational commands run by fact extraction, in order.
    pub fact_queries: Vec<FactQuery>,

    /// Command that prints the running configuration.
    pub config_command: String,

    /// How configuration text is parsed for diffing.
    pub parser: ParserOptions,
}

impl PlatformDefinition {
    /// Create a new platform definition with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            network_os: name.clone(),
            name,
            patterns: PatternRegistry::new(),
            fact_queries: vec![],
            config_command: String::new(),
            parser: ParserOptions::default(),
        }
    }

    /// Set the reported device family.
    pub fn with_network_os(mut self, network_os: impl Into<String>) -> Self {
        self.network_os = network_os.into();
        self
    }

    /// Set the terminal patterns.
    pub fn with_patterns(mut self, patterns: PatternRegistry) -> Self {
        self.patterns = patterns;
        self
    }

    /// Add a fact query.
    pub fn with_fact_query(mut self, query: FactQuery) -> Self {
        self.fact_queries.push(query);
        self
    }

    /// Set the configuration export command.
    pub fn with_config_command(mut self, command: impl Into<String>) -> Self {
        self.config_command = command.into();
        self
    }

    /// Set the configuration parser settings.
    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }
}

impl fmt::Debug for PlatformDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformDefinition")
            .field("name", &self.name)
            .field("network_os", &self.network_os)
            .field("prompt_patterns", &self.patterns.prompt_patterns().len())
            .field("error_patterns", &self.patterns.error_patterns().len())
            .field(
                "interactive_prompt_patterns",
                &self.patterns.interactive_prompt_patterns().len(),
            )
            .field(
                "fact_queries",
                &self.fact_queries.iter().map(|q| q.command.as_str()).collect::<Vec<_>>(),
            )
            .field("config_command", &self.config_command)
            .field("parser", &self.parser)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FactField;

    #[test]
    fn test_builder() {
        let platform = PlatformDefinition::new("lab")
            .with_network_os("LabOS")
            .with_config_command("show running")
            .with_fact_query(FactQuery::new("show version", FactField::Version, r"v(\S+)").unwrap());

        assert_eq!(platform.name, "lab");
        assert_eq!(platform.network_os, "LabOS");
        assert_eq!(platform.fact_queries.len(), 1);
        assert!(format!("{platform:?}").contains("show version"));
    }

    #[test]
    fn test_network_os_defaults_to_name() {
        assert_eq!(PlatformDefinition::new("lab").network_os, "lab");
    }
}
