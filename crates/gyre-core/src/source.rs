//! Abstract menu sources and the resolver contract that turns them into
//! concrete configurations.

use crate::menu::{MenuConfiguration, MenuName};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Where a menu comes from. The surface form used by the CLI and socket
/// protocol is `default`, `name:<menu>`, `file:<path>` or `inline:<json>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MenuSource {
    #[default]
    Default,
    Named(MenuName),
    File(PathBuf),
    Inline(String),
}

impl FromStr for MenuSource {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "default" {
            return Ok(Self::Default);
        }
        match s.split_once(':') {
            Some(("name", rest)) => Ok(Self::Named(MenuName::new(rest))),
            Some(("file", rest)) => Ok(Self::File(PathBuf::from(rest))),
            Some(("inline", rest)) => Ok(Self::Inline(rest.to_string())),
            _ => Err(SourceError::Malformed(format!("unknown menu source '{s}'"))),
        }
    }
}

/// Structured, recoverable resolution failures. The caller decides whether
/// to fall back to the default menu.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("menu not found: {0}")]
    NotFound(String),
    #[error("menu source unreadable: {0}")]
    Unreadable(String),
    #[error("menu definition malformed: {0}")]
    Malformed(String),
    #[error("menu definition schema invalid: {0}")]
    SchemaInvalid(String),
    #[error("menu definition has no items")]
    EmptyItems,
}

impl SourceError {
    /// Stable tag used in wire responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::Unreadable(_) => "unreadable",
            Self::Malformed(_) => "malformed",
            Self::SchemaInvalid(_) => "schema-invalid",
            Self::EmptyItems => "empty-items",
        }
    }
}

pub trait MenuSourceResolver {
    fn resolve(&self, source: &MenuSource) -> Result<MenuConfiguration, SourceError>;

    /// Named menus currently available, for the read-only listing surface.
    fn named_menus(&self) -> Vec<MenuName> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_forms_parse() {
        assert_eq!("default".parse::<MenuSource>().unwrap(), MenuSource::Default);
        assert_eq!("".parse::<MenuSource>().unwrap(), MenuSource::Default);
        assert_eq!(
            "name:media".parse::<MenuSource>().unwrap(),
            MenuSource::Named(MenuName::new("media"))
        );
        assert_eq!(
            "file:/tmp/m.json".parse::<MenuSource>().unwrap(),
            MenuSource::File(PathBuf::from("/tmp/m.json"))
        );
        assert!(matches!(
            "inline:{\"items\":[]}".parse::<MenuSource>().unwrap(),
            MenuSource::Inline(_)
        ));
        assert!(matches!(
            "bogus".parse::<MenuSource>(),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn error_kinds_are_stable() {
        assert_eq!(SourceError::NotFound("x".into()).kind(), "not-found");
        assert_eq!(SourceError::EmptyItems.kind(), "empty-items");
    }
}
