//! Output command chain.
//!
//! Commands run strictly in registration order against one already-built,
//! already-reduced catalog and one metadata source; the catalog is never
//! cloned between commands, and commands treat it as read-only.

mod list;

pub use list::ListCommand;

use tracing::{debug, info};

use crate::crawl::{DatabaseSpecificOptions, MetadataSource};
use crate::error::Result;
use crate::model::Catalog;

/// One output-producing operation executed against a shared catalog
pub trait CatalogCommand {
    fn name(&self) -> &str;

    /// Receives the shared database-specific options before execution.
    fn set_database_options(&mut self, options: &DatabaseSpecificOptions);

    fn execute(&mut self, catalog: &Catalog, source: &dyn MetadataSource) -> Result<()>;
}

/// Runs registered commands in order against one catalog and one source
#[derive(Default)]
pub struct CommandChain {
    commands: Vec<Box<dyn CatalogCommand>>,
    database_options: Option<DatabaseSpecificOptions>,
}

impl CommandChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_next(&mut self, command: Box<dyn CatalogCommand>) -> &mut Self {
        self.commands.push(command);
        self
    }

    /// Options may arrive after commands are registered; they are propagated
    /// to each command immediately before it runs.
    pub fn set_database_options(&mut self, options: DatabaseSpecificOptions) {
        self.database_options = Some(options);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn execute_chain(
        &mut self,
        catalog: &Catalog,
        source: &dyn MetadataSource,
    ) -> Result<()> {
        if self.commands.is_empty() {
            info!("No commands to execute");
            return Ok(());
        }
        for command in &mut self.commands {
            if let Some(options) = &self.database_options {
                command.set_database_options(options);
            }
            debug!(command = command.name(), "Executing command");
            command.execute(catalog, source)?;
        }
        Ok(())
    }
}
