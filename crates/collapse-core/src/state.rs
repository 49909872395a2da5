//! Collapse State Interface
//!
//! Wraps a [`CommandExecutor`] with version tracking and change notifications, so a frontend
//! can redraw and persist only when something actually changed.
//!
//! # Overview
//!
//! - **State Queries**: summary counts of collapsed headings, hidden elements and orphan
//!   warnings
//! - **Version Tracking**: every change that reaches the document bumps the version
//! - **Change Notifications**: subscribe to [`StateChange`] events
//!
//! # Example
//!
//! ```rust
//! use collapse_core::{
//!     CollapseConfig, CollapseStateManager, Command, Document, Element, Marker, MemoryHost,
//! };
//!
//! let mut doc = Document::new();
//! let heading = doc.push(Element::heading(2).with_marker(Marker::Collapsible));
//! doc.push(Element::paragraph("body").with_style("margin-left:40px;"));
//!
//! let mut manager = CollapseStateManager::new(doc, CollapseConfig::default(), MemoryHost::new());
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! manager.execute(Command::ToggleHeading { heading }).unwrap();
//! let state = manager.get_document_state();
//! assert_eq!(state.collapsed_headings, 1);
//! assert_eq!(state.version, 1);
//! ```

use crate::commands::{Command, CommandExecutor, CommandResult};
use crate::config::CollapseConfig;
use crate::document::{Document, NodeId};
use crate::error::CommandError;
use crate::guards::{DocRange, EditKind, EditVerdict};
use crate::host::Host;
use crate::markers::Marker;

/// Document state summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Attached element count
    pub element_count: usize,
    /// Collapsed headings
    pub collapsed_headings: usize,
    /// Elements carrying `hidden` (placeholders included)
    pub hidden_elements: usize,
    /// Placeholders currently shown as orphan warnings
    pub orphaned_placeholders: usize,
    /// Whether the document changed since load or the last [`CollapseStateManager::mark_saved`]
    pub is_modified: bool,
    /// Version number (incremented after each change)
    pub version: u64,
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// A heading section was collapsed or expanded
    SectionToggled,
    /// A bullet sublist was folded or unfolded
    BulletToggled,
    /// A heading's collapsibility changed
    CollapsibilityChanged,
    /// Orphaned hidden runs were revealed
    OrphansRepaired,
    /// The host edited the document directly
    DocumentModified,
    /// The document was replaced wholesale
    DocumentReplaced,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Nodes touched by the change, when known
    pub affected: Vec<NodeId>,
}

impl StateChange {
    /// Create a new state change record without affected nodes.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            affected: Vec::new(),
        }
    }

    /// Attach the affected nodes to this change record.
    pub fn with_affected(mut self, affected: Vec<NodeId>) -> Self {
        self.affected = affected;
        self
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Versioned, observable wrapper around a [`CommandExecutor`].
pub struct CollapseStateManager<H: Host> {
    executor: CommandExecutor<H>,
    state_version: u64,
    is_modified: bool,
    callbacks: Vec<StateChangeCallback>,
}

impl<H: Host> CollapseStateManager<H> {
    /// Create a new state manager.
    pub fn new(document: Document, config: CollapseConfig, host: H) -> Self {
        Self::from_executor(CommandExecutor::new(document, config, host))
    }

    /// Wrap an existing executor.
    pub fn from_executor(executor: CommandExecutor<H>) -> Self {
        Self {
            executor,
            state_version: 0,
            is_modified: false,
            callbacks: Vec::new(),
        }
    }

    /// Get a reference to the executor.
    pub fn executor(&self) -> &CommandExecutor<H> {
        &self.executor
    }

    /// Get a mutable reference to the executor. Changes made through it are not tracked; call
    /// [`Self::mark_modified`] afterwards.
    pub fn executor_mut(&mut self) -> &mut CommandExecutor<H> {
        &mut self.executor
    }

    /// The document.
    pub fn document(&self) -> &Document {
        self.executor.document()
    }

    /// Execute a command and record the change it made.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        let result = self.executor.execute(command)?;
        if let Some((change_type, affected)) = Self::change_of(&result) {
            self.record(change_type, affected);
        }
        Ok(result)
    }

    fn change_of(result: &CommandResult) -> Option<(StateChangeType, Vec<NodeId>)> {
        match result {
            CommandResult::Section(outcome) => {
                let mut affected = outcome.members.clone();
                affected.extend(outcome.placeholder_inserted);
                affected.extend(outcome.placeholder_removed);
                Some((StateChangeType::SectionToggled, affected))
            }
            CommandResult::Bullet(outcome) if !outcome.changed.is_empty() => {
                Some((StateChangeType::BulletToggled, outcome.changed.clone()))
            }
            CommandResult::Collapsibility { heading, .. } => {
                Some((StateChangeType::CollapsibilityChanged, vec![*heading]))
            }
            CommandResult::Repaired(report) if !report.is_empty() => {
                let mut affected = report.revealed.clone();
                affected.extend(report.placeholders_removed.iter().copied());
                Some((StateChangeType::OrphansRepaired, affected))
            }
            _ => None,
        }
    }

    /// Whether a destructive edit may proceed.
    pub fn check_edit(&self, kind: EditKind, range: DocRange) -> EditVerdict {
        self.executor.check_edit(kind, range)
    }

    /// Replace the whole document.
    pub fn replace_document(&mut self, document: Document) {
        self.executor.replace_document(document);
        self.record(StateChangeType::DocumentReplaced, Vec::new());
    }

    /// Get document state summary.
    pub fn get_document_state(&self) -> DocumentState {
        let doc = self.executor.document();
        let render = self.executor.render_model();
        let mut state = DocumentState {
            element_count: 0,
            collapsed_headings: 0,
            hidden_elements: 0,
            orphaned_placeholders: render.orphaned_placeholders().len(),
            is_modified: self.is_modified,
            version: self.state_version,
        };
        for id in doc.iter() {
            state.element_count += 1;
            if render.is_collapsed_heading(id) {
                state.collapsed_headings += 1;
            }
            if doc.element(id).has(Marker::Hidden) {
                state.hidden_elements += 1;
            }
        }
        state
    }

    /// Get current version number.
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Subscribe to state change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Check if state has changed since a version.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    /// Mark document as modified and increment version number.
    pub fn mark_modified(&mut self, change_type: StateChangeType) {
        self.record(change_type, Vec::new());
    }

    /// Mark the document as persisted.
    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }

    fn record(&mut self, change_type: StateChangeType, affected: Vec<NodeId>) {
        let old_version = self.state_version;
        self.state_version += 1;
        if change_type != StateChangeType::DocumentReplaced {
            self.is_modified = true;
        }

        let change =
            StateChange::new(change_type, old_version, self.state_version).with_affected(affected);
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}
