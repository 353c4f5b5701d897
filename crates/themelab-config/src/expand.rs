//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// `field` names the config field for error reporting.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let context = |name: &str| -> Result<Option<String>, String> {
        let (var, default) = match name.split_once(":-") {
            Some((var, default)) => (var, Some(default)),
            None => (name, None),
        };
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => match default {
                Some(default) => Ok(Some(default.to_owned())),
                None => Err(format!("${{{var}}} not set")),
            },
        }
    };

    shellexpand::env_with_context(value, context)
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: err.cause,
        })
}
