//! Environment variable helpers used by configuration loaders

use std::str::FromStr;
use thiserror::Error;

/// Error raised when an environment variable is present but malformed
#[derive(Debug, Error, PartialEq, Eq)]
#[error("environment variable {name} has invalid value '{value}': {reason}")]
pub struct EnvError {
    /// Variable name
    pub name: String,
    /// Raw value found in the environment
    pub value: String,
    /// Parser message
    pub reason: String,
}

/// Read a non-empty environment variable
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read the first non-empty variable among `names`, or fall back to `default`
pub fn env_or(names: &[&str], default: &str) -> String {
    names
        .iter()
        .find_map(|name| env_var(name))
        .unwrap_or_else(|| default.to_string())
}

/// Parse an optional environment variable into `T`
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn env_parse<T>(name: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        None => Ok(None),
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|e| EnvError {
            name: name.to_string(),
            value,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_prefers_first_set_name() {
        unsafe {
            std::env::remove_var("CREW_UTILS_TEST_A");
            std::env::set_var("CREW_UTILS_TEST_B", "second");
        }

        let value = env_or(&["CREW_UTILS_TEST_A", "CREW_UTILS_TEST_B"], "fallback");
        assert_eq!(value, "second");

        let value = env_or(&["CREW_UTILS_TEST_A"], "fallback");
        assert_eq!(value, "fallback");

        unsafe {
            std::env::remove_var("CREW_UTILS_TEST_B");
        }
    }

    #[test]
    fn test_env_parse() {
        unsafe {
            std::env::set_var("CREW_UTILS_TEST_NUM", " 42 ");
            std::env::set_var("CREW_UTILS_TEST_BAD", "forty-two");
        }

        assert_eq!(env_parse::<u32>("CREW_UTILS_TEST_NUM"), Ok(Some(42)));
        assert_eq!(env_parse::<u32>("CREW_UTILS_TEST_MISSING"), Ok(None));

        let err = env_parse::<u32>("CREW_UTILS_TEST_BAD").unwrap_err();
        assert_eq!(err.name, "CREW_UTILS_TEST_BAD");
        assert_eq!(err.value, "forty-two");

        unsafe {
            std::env::remove_var("CREW_UTILS_TEST_NUM");
            std::env::remove_var("CREW_UTILS_TEST_BAD");
        }
    }

    #[test]
    fn test_blank_is_unset() {
        unsafe {
            std::env::set_var("CREW_UTILS_TEST_BLANK", "   ");
        }
        assert_eq!(env_var("CREW_UTILS_TEST_BLANK"), None);
        unsafe {
            std::env::remove_var("CREW_UTILS_TEST_BLANK");
        }
    }
}
