// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! valid key listings and "did you mean?" suggestions using Jaro-Winkler
//! string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `admin_idss` -> `admin_ids` while
/// filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(escrowd::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value has the wrong type.
    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(escrowd::config::invalid_value))]
    InvalidValue {
        /// The key with the bad value.
        key: String,
        /// Description of the mismatch.
        detail: String,
    },

    /// A semantic validation failure after deserialization.
    #[error("{message}")]
    #[diagnostic(code(escrowd::config::validation))]
    Validation { message: String },

    /// Any other configuration loading failure.
    #[error("{message}")]
    #[diagnostic(code(escrowd::config::parse))]
    Parse { message: String },
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Suggest the closest valid key to `key`, if any candidate is close enough.
pub fn suggest_key<S: AsRef<str>>(key: &str, candidates: &[S]) -> Option<String> {
    candidates
        .iter()
        .map(|c| (strsim::jaro_winkler(key, c.as_ref()), c))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, c)| c.as_ref().to_string())
}

/// Convert a Figment extraction error into diagnostics.
///
/// Unknown-field errors get fuzzy-match suggestions; everything else is
/// passed through with the dotted key path attached.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    let mut out = Vec::new();
    for e in err {
        let path = e
            .path
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".");
        match &e.kind {
            figment::error::Kind::UnknownField(field, expected) => {
                let candidates: Vec<String> =
                    expected.iter().map(|s| s.to_string()).collect();
                let key = if path.is_empty() {
                    field.clone()
                } else {
                    format!("{path}.{field}")
                };
                out.push(ConfigError::UnknownKey {
                    key,
                    suggestion: suggest_key(field, &candidates),
                    valid_keys: candidates.join(", "),
                });
            }
            figment::error::Kind::InvalidType(actual, expected) => {
                out.push(ConfigError::InvalidValue {
                    key: path,
                    detail: format!("found {actual}, expected {expected}"),
                });
            }
            figment::error::Kind::InvalidValue(actual, expected) => {
                out.push(ConfigError::InvalidValue {
                    key: path,
                    detail: format!("found {actual}, expected {expected}"),
                });
            }
            other => {
                out.push(ConfigError::Parse {
                    message: if path.is_empty() {
                        format!("{other}")
                    } else {
                        format!("{path}: {other}")
                    },
                });
            }
        }
    }
    out
}

/// Render configuration errors to stderr, one diagnostic per error.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("error: {err}");
        if let Some(help) = err.help() {
            eprintln!("  help: {help}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_typos() {
        let candidates = ["bot_token", "admin_ids", "escrow_group_id"];
        assert_eq!(
            suggest_key("bot_tken", &candidates).as_deref(),
            Some("bot_token")
        );
        assert_eq!(
            suggest_key("admin_idss", &candidates).as_deref(),
            Some("admin_ids")
        );
    }

    #[test]
    fn does_not_suggest_for_distant_keys() {
        let candidates = ["bot_token", "admin_ids"];
        assert_eq!(suggest_key("zzzzzz", &candidates), None);
    }

    #[test]
    fn unknown_key_help_mentions_suggestion() {
        let err = ConfigError::UnknownKey {
            key: "telegram.bot_tken".into(),
            suggestion: Some("bot_token".into()),
            valid_keys: "bot_token, admin_ids".into(),
        };
        let help = err.help().expect("should have help").to_string();
        assert!(help.contains("bot_token"));
    }
}
