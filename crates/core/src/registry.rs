//! Static allow-list of runnable commands.
//!
//! A [`CommandRegistry`] maps a short public name to the literal shell
//! command that is executed for it. It is built once at startup and only
//! ever read afterwards. Names that are not in the table are rejected,
//! never executed.

use std::collections::BTreeMap;

/// Builtin `(name, shell command)` pairs exposed by the daemon.
pub const BUILTIN_COMMANDS: &[(&str, &str)] = &[
    ("uptime", "uptime"),
    ("date", "date"),
    ("hostname", "hostname"),
    ("whoami", "whoami"),
    ("disk", "df -h"),
    ("memory", "free -m"),
];

/// Immutable name -> shell command lookup table.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, String>,
}

impl CommandRegistry {
    /// Registry populated with [`BUILTIN_COMMANDS`].
    pub fn builtin() -> Self {
        BUILTIN_COMMANDS.iter().copied().collect()
    }

    /// Exact, case-sensitive lookup of the shell command mapped to `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.commands.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Public command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CommandRegistry
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            commands: iter
                .into_iter()
                .map(|(name, command)| (name.into(), command.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
