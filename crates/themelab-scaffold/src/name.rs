//! Project name validation.
//!
//! Enforces package-registry naming rules on the project directory basename
//! before anything touches the filesystem, and rejects names that collide
//! with the generator's own companion packages.

/// Names of companion packages the generated project will depend on.
///
/// A project with one of these names would shadow its own dependency.
const RESERVED_NAMES: &[&str] = &[
    "react",
    "react-dom",
    "react-scripts",
    "react-scripts-labtheme",
];

/// Project name validation error.
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// The name is empty.
    #[error("project name cannot be empty")]
    Empty,
    /// The name violates naming restrictions.
    #[error("cannot create a project called \"{name}\" because of naming restrictions:\n{}",
        violations.iter().map(|v| format!("  * {v}")).collect::<Vec<_>>().join("\n"))]
    Invalid {
        /// The rejected name.
        name: String,
        /// Every rule the name violated.
        violations: Vec<String>,
    },
    /// The name collides with a companion package.
    #[error(
        "cannot create a project called \"{0}\" because a dependency with the same name exists; \
         please choose a different project name"
    )]
    Reserved(String),
}

/// Validate a project name.
///
/// # Errors
///
/// Returns a [`NameError`] describing every violated rule.
pub fn validate_project_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    let mut violations = Vec::new();

    if name.chars().any(char::is_uppercase) {
        violations.push("name must not contain uppercase letters".to_owned());
    }
    if name.starts_with(['.', '_', '-']) {
        violations.push("name must start with a letter or digit".to_owned());
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '_' | '-'))
    {
        violations.push(format!("name contains the invalid character '{bad}'"));
    }

    if !violations.is_empty() {
        return Err(NameError::Invalid {
            name: name.to_owned(),
            violations,
        });
    }

    if RESERVED_NAMES.contains(&name) {
        return Err(NameError::Reserved(name.to_owned()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_names() {
        for name in ["my-theme", "theme2", "a", "my_theme", "my.theme"] {
            assert!(validate_project_name(name).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(matches!(validate_project_name(""), Err(NameError::Empty)));
    }

    #[test]
    fn test_rejects_uppercase() {
        assert!(matches!(
            validate_project_name("MyTheme"),
            Err(NameError::Invalid { .. })
        ));
    }

    #[test]
    fn test_rejects_leading_punctuation() {
        for name in [".theme", "_theme", "-theme"] {
            assert!(
                matches!(validate_project_name(name), Err(NameError::Invalid { .. })),
                "accepted {name}"
            );
        }
    }

    #[test]
    fn test_rejects_invalid_characters() {
        let err = validate_project_name("my theme!").unwrap_err();
        let NameError::Invalid { violations, .. } = err else {
            panic!("expected Invalid");
        };
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_collects_every_violation() {
        let err = validate_project_name("_My theme").unwrap_err();
        let NameError::Invalid { violations, .. } = err else {
            panic!("expected Invalid");
        };
        // uppercase + leading underscore + space
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_rejects_reserved_names() {
        assert!(matches!(
            validate_project_name("react-scripts"),
            Err(NameError::Reserved(_))
        ));
    }
}
