use crate::document::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading a [`crate::CollapseConfig`].
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Reading the configuration file failed.
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    /// A value was out of range.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by [`crate::CommandExecutor::execute`].
pub enum CommandError {
    #[error("node {0:?} is not part of the document")]
    /// The node id is foreign or was removed.
    UnknownNode(NodeId),

    #[error("node {0:?} is not a collapsible heading")]
    /// The target is not an `h2`..`h6` heading (or not collapsible when required).
    NotAHeading(NodeId),

    #[error("node {0:?} is not the first child of a list item with a sublist")]
    /// The target is not a bullet that owns a sublist.
    NotABullet(NodeId),

    #[error("no cursor position available")]
    /// The host reported no cursor.
    NoCursor,

    #[error("{0} is disabled by configuration")]
    /// The requested feature is switched off.
    FeatureDisabled(&'static str),
}
