//! API key resolution from the environment.

use secrecy::SecretString;

/// Read the first non-empty env var among `names`.
pub fn read_secret(names: &[String]) -> Option<SecretString> {
    read_secret_with(names, |key| std::env::var(key).ok())
}

pub fn read_secret_with<F>(names: &[String], lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .map(SecretString::from)
}
