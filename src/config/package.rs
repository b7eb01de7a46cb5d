//! Raw contents of a `package.yaml` before defaults are applied.
use serde::{Deserialize, Deserializer};

/// Deserialized package configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageConfig {
    /// Install target; `~` and environment variables are expanded later.
    #[serde(default)]
    pub target: Option<String>,
    /// User that should own the package files; environment-expanded later.
    #[serde(default)]
    pub owner: Option<String>,
    /// Statements run before stowing, after ownership transfer.
    #[serde(default, deserialize_with = "hook_list")]
    pub pre_stow: Vec<String>,
    /// Statements run after all stow invocations.
    #[serde(default, deserialize_with = "hook_list")]
    pub post_stow: Vec<String>,
    /// Statements run before unstowing.
    #[serde(default, deserialize_with = "hook_list")]
    pub pre_unstow: Vec<String>,
    /// Statements run after all unstow invocations.
    #[serde(default, deserialize_with = "hook_list")]
    pub post_unstow: Vec<String>,
}

/// A hook key holds either one statement or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HookEntry {
    /// `PreStow: make`
    Single(String),
    /// `PreStow: [make, make install]`
    List(Vec<String>),
}

fn hook_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<HookEntry>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(HookEntry::Single(statement)) => vec![statement],
        Some(HookEntry::List(statements)) => statements,
    })
}
