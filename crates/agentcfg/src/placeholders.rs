//! Deferred `${VAR}` substitution.
//!
//! Parsing stores reference-bearing strings verbatim; nothing is substituted
//! until a consumer asks for a resolved view, normally just before spawning a
//! server process. An unresolved reference is an error, never an empty
//! string.

use std::collections::BTreeMap;

use crate::error::{ConfigError, PlaceholderError};
use crate::schema::{McpServerSettings, Settings};

fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Replace each `${NAME}` in `template` with `lookup(NAME)`. Text without
/// references passes through unchanged.
pub fn expand<F>(template: &str, lookup: F) -> Result<String, PlaceholderError>
where
    F: Fn(&str) -> Option<String>,
{
    if !template.contains("${") {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(PlaceholderError::Unterminated);
        };
        let name = &after[..end];
        if !is_env_var_name(name) {
            return Err(PlaceholderError::InvalidName {
                name: name.to_string(),
            });
        }
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                return Err(PlaceholderError::Unresolved {
                    name: name.to_string(),
                });
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Validate reference form without resolving anything.
pub fn check(template: &str) -> Result<(), PlaceholderError> {
    expand(template, |_| Some(String::new())).map(|_| ())
}

/// Expand against the process environment.
pub fn expand_env(template: &str) -> Result<String, PlaceholderError> {
    expand(template, |name| std::env::var(name).ok())
}

impl McpServerSettings {
    /// Environment map with every `${VAR}` substituted from the process
    /// environment. The stored settings are left untouched.
    pub fn resolved_env(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let Some(env) = self.env.as_ref() else {
            return Ok(BTreeMap::new());
        };
        let mut out = BTreeMap::new();
        for (key, value) in env {
            let resolved = expand_env(value).map_err(|source| ConfigError::Placeholder {
                key: key.clone(),
                source,
            })?;
            out.insert(key.clone(), resolved);
        }
        Ok(out)
    }
}

impl Settings {
    /// Resolve every server's environment, keyed by server name. Fails on the
    /// first unresolved or malformed reference.
    pub fn resolve_placeholders(
        &self,
    ) -> Result<BTreeMap<String, BTreeMap<String, String>>, ConfigError> {
        let mut out = BTreeMap::new();
        for (name, server) in &self.mcp.servers {
            let resolved = server
                .resolved_env()
                .map_err(|e| ConfigError::Invalid(format!("mcp server {name}: {e}")))?;
            out.insert(name.clone(), resolved);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn text_without_references_is_unchanged() {
        assert_eq!(expand("plain value", |_| None).unwrap(), "plain value");
        assert_eq!(expand("", |_| None).unwrap(), "");
        // A bare `$` is not a reference.
        assert_eq!(expand("cost: $5", |_| None).unwrap(), "cost: $5");
    }

    #[test]
    fn references_substitute_in_place() {
        let lookup = |name: &str| match name {
            "HOST" => Some("db.internal".to_string()),
            "PORT" => Some("5432".to_string()),
            _ => None,
        };
        assert_eq!(
            expand("postgres://${HOST}:${PORT}/app", lookup).unwrap(),
            "postgres://db.internal:5432/app"
        );
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        let err = expand("${MISSING}", |_| None).unwrap_err();
        assert_eq!(
            err,
            PlaceholderError::Unresolved {
                name: "MISSING".to_string()
            }
        );
    }

    #[test]
    fn unterminated_reference_is_an_error() {
        assert_eq!(
            expand("${OOPS", |_| Some(String::new())).unwrap_err(),
            PlaceholderError::Unterminated
        );
    }

    #[test]
    fn invalid_names_are_rejected() {
        for template in ["${}", "${1BAD}", "${A-B}"] {
            assert!(matches!(
                expand(template, |_| Some(String::new())).unwrap_err(),
                PlaceholderError::InvalidName { .. }
            ));
        }
    }

    #[test]
    fn resolved_env_reads_the_process_environment() {
        // PATH is present in any test environment.
        let path = std::env::var("PATH").expect("PATH set");
        let doc = "mcp:\n  servers:\n    fs:\n      command: npx\n      env:\n        BIN_PATH: ${PATH}\n        STATIC: fixed\n";
        let settings = Settings::from_yaml_str(doc).expect("parse ok");
        let server = settings.mcp.servers.get("fs").expect("fs present");

        let resolved = server.resolved_env().expect("resolve ok");
        assert_eq!(resolved.get("BIN_PATH"), Some(&path));
        assert_eq!(resolved.get("STATIC").map(String::as_str), Some("fixed"));
        // The stored settings still carry the reference.
        assert_eq!(
            server.env.as_ref().unwrap().get("BIN_PATH").unwrap(),
            "${PATH}"
        );
    }

    #[test]
    fn resolve_placeholders_names_the_failing_server() {
        let doc = "mcp:\n  servers:\n    gh:\n      command: npx\n      env:\n        TOKEN: ${AGENTCFG_TEST_SURELY_UNSET_8F3A}\n";
        let settings = Settings::from_yaml_str(doc).expect("parse ok");
        let msg = format!("{}", settings.resolve_placeholders().unwrap_err());
        assert!(msg.contains("mcp server gh"), "err={msg}");
        assert!(msg.contains("AGENTCFG_TEST_SURELY_UNSET_8F3A"), "err={msg}");
    }

    proptest! {
        #[test]
        fn passthrough_without_dollar(s in "[^$]*") {
            prop_assert_eq!(expand(&s, |_| None).unwrap(), s);
        }

        #[test]
        fn single_reference_substitutes(
            name in "[A-Za-z_][A-Za-z0-9_]{0,15}",
            value in "[a-z0-9 ]{0,12}",
        ) {
            let template = format!("pre ${{{name}}} post");
            let out = expand(&template, |n| (n == name).then(|| value.clone())).unwrap();
            prop_assert_eq!(out, format!("pre {value} post"));
        }
    }
}
