//! External generator invocation.
//!
//! The generator runs as a subprocess with inherited stdio so its own
//! progress output reaches the user directly. Exit code 0 is success;
//! anything else surfaces as a structured failure carrying the full
//! rendered command line.

use std::path::Path;

use tokio::process::Command;

use crate::ScaffoldError;

/// A fully rendered generator command, ready to spawn.
#[derive(Clone, Debug)]
pub struct GeneratorInvocation {
    program: String,
    args: Vec<String>,
}

/// Settings for building a [`GeneratorInvocation`].
#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    /// Program used to run the generator, e.g. `npx`.
    pub command: String,
    /// Versioned generator package spec, e.g. `create-react-app@5.1.0`.
    pub package_spec: String,
    /// Subdirectory of the project root the generated app lands in.
    pub app_subdir: String,
    /// Template passed via `--template`.
    pub template: String,
    /// Pinned companion-scripts reference passed via `--scripts-version`.
    pub scripts_version: String,
    /// Pass `--verbose` through to the generator.
    pub verbose: bool,
    /// Force npm instead of the generator's default package manager.
    pub use_npm: bool,
}

impl GeneratorInvocation {
    /// Render the command for the given settings.
    #[must_use]
    pub fn new(settings: &GeneratorSettings) -> Self {
        let mut args = vec![
            settings.package_spec.clone(),
            settings.app_subdir.clone(),
        ];

        if settings.verbose {
            args.push("--verbose".to_owned());
        }
        if settings.use_npm {
            args.push("--use-npm".to_owned());
        }

        args.push("--template".to_owned());
        args.push(settings.template.clone());
        args.push("--scripts-version".to_owned());
        args.push(settings.scripts_version.clone());

        Self {
            program: settings.command.clone(),
            args,
        }
    }

    /// The full command line, for diagnostics and failure reports.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run the generator in `cwd` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::GeneratorSpawn`] when the process cannot be
    /// started and [`ScaffoldError::GeneratorFailed`] on a non-zero exit,
    /// both carrying the command line.
    pub async fn run(&self, cwd: &Path) -> Result<(), ScaffoldError> {
        tracing::debug!(command = %self.command_line(), cwd = %cwd.display(), "Running external generator");

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(cwd)
            .status()
            .await
            .map_err(|source| ScaffoldError::GeneratorSpawn {
                command: self.command_line(),
                source,
            })?;

        if !status.success() {
            return Err(ScaffoldError::GeneratorFailed {
                command: self.command_line(),
            });
        }

        Ok(())
    }
}
