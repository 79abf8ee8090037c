/// Keyword registry: maps rule option names to their setup functions
use super::signature::SigMatch;
use super::window::WindowMatch;
use crate::error::{KsError, Result};
use ahash::AHashMap;
use std::fmt;
use tracing::debug;

/// Builds a compiled match from the raw option argument
pub type SetupFn = fn(&str) -> Result<SigMatch>;

/// A registered rule keyword
#[derive(Clone, Copy)]
pub struct Keyword {
    pub name: &'static str,
    pub description: &'static str,
    pub setup: SetupFn,
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyword")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Every keyword this crate knows how to compile
pub const BUILTIN_KEYWORDS: &[Keyword] = &[Keyword {
    name: "window",
    description: "match on the TCP window size, optionally negated",
    setup: window_setup,
}];

fn window_setup(arg: &str) -> Result<SigMatch> {
    WindowMatch::parse(arg).map(SigMatch::Window)
}

/// Lookup table consulted while loading signatures.
///
/// Built once at engine startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    keywords: AHashMap<&'static str, Keyword>,
    disabled: Vec<String>,
}

impl KeywordTable {
    /// Empty table; nothing can be set up until keywords are registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every built-in keyword registered
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for kw in BUILTIN_KEYWORDS {
            table.register(*kw);
        }
        table
    }

    /// Register a keyword, replacing any previous entry with the same name
    pub fn register(&mut self, keyword: Keyword) {
        debug!("Registering rule keyword: {}", keyword.name);
        self.keywords.insert(keyword.name, keyword);
    }

    /// Remove the named keywords so rules using them fail to load
    pub fn without<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        for name in names {
            let name = name.as_ref();
            if self.keywords.remove(name).is_some() {
                debug!("Disabled rule keyword: {}", name);
                self.disabled.push(name.to_string());
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Keyword> {
        self.keywords.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keywords.contains_key(name)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d == name)
    }

    /// Registered keyword names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.keywords.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Compile one option occurrence through its keyword's setup function
    pub fn setup(&self, name: &str, arg: &str) -> Result<SigMatch> {
        match self.get(name) {
            Some(kw) => (kw.setup)(arg),
            None if self.is_disabled(name) => Err(KsError::DisabledKeyword(name.to_string())),
            None => Err(KsError::UnknownKeyword(name.to_string())),
        }
    }
}

/// True if `name` is one of the built-in keywords
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_KEYWORDS.iter().any(|kw| kw.name == name)
}
