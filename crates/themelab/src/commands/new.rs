//! `themelab new` command implementation.

use std::path::PathBuf;

use clap::Args;
use themelab_config::{CliSettings, Config};
use themelab_scaffold::GeneratorSettings;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the new command.
#[derive(Args)]
pub(crate) struct NewArgs {
    /// Directory to create the project in.
    project_dir: PathBuf,

    /// Path to configuration file (default: auto-discover themelab.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generator template (overrides config).
    #[arg(long)]
    template: Option<String>,

    /// Use the TypeScript template.
    #[arg(long, conflicts_with = "template")]
    typescript: bool,

    /// Force the generator to install with npm.
    #[arg(long)]
    use_npm: bool,

    /// Enable verbose output (passed through to the generator as well).
    #[arg(short, long)]
    pub verbose: bool,
}

impl NewArgs {
    /// Execute the new command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the project name is invalid
    /// or the generator fails.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            template: self.template,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let template = if self.typescript {
            config.generator.typescript_template.clone()
        } else {
            config.generator.template.clone()
        };

        output.info_value("themelab version: ", version);
        output.info_value("companion scripts: ", &config.generator.scripts_version);
        output.info("");
        output.info(&format!(
            "Creating a new themed project in {}.",
            self.project_dir.display()
        ));
        output.info(&format!(
            "Using {} to scaffold the project's source code...",
            config.generator.package_spec()
        ));
        output.info("");

        let settings = GeneratorSettings {
            command: config.generator.command.clone(),
            package_spec: config.generator.package_spec(),
            app_subdir: config.generator.app_subdir.clone(),
            template,
            scripts_version: config.generator.scripts_version.clone(),
            verbose: self.verbose,
            use_npm: self.use_npm,
        };

        match themelab_scaffold::scaffold(&self.project_dir, &settings).await {
            Ok(root) => {
                output.success(&format!("Project created at {}", root.display()));
                Ok(())
            }
            Err(err) => {
                output.error("Aborting installation.");
                Err(err.into())
            }
        }
    }
}
