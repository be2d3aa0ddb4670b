use std::path::Path;

use helpdesk::Config;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Departments to offer instead of the built-in list
    #[arg(long = "department", value_name = "NAME")]
    departments: Vec<String>,

    /// Issue categories to offer instead of the built-in list
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Default recipient of the email hand-off
    #[arg(long, value_name = "ADDRESS")]
    support_address: Option<String>,
}

impl Command {
    #[instrument]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!("Configuration already exists at {}", path.display());
        }

        let mut config = Config::default();
        for department in self.departments {
            config.add_department(department);
        }
        for category in self.categories {
            config.add_category(category);
        }
        config.support_address = self.support_address;

        config
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;

        println!(
            "{}",
            format!("Created configuration {}", path.display()).success()
        );
        println!();
        println!("Next steps:");
        println!("  helpdesk new  # Fill in a request");

        Ok(())
    }
}
