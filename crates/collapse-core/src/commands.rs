//! Command interface.
//!
//! [`CommandExecutor`] owns a document, its configuration and the [`Host`] it is embedded in,
//! and is the single entry point for user actions. Every command that changes the document
//! finishes the same way: all in-memory mutation first, then one full-document save request to
//! the host, then (for toggles) the cursor is placed at the end of the anchor.
//!
//! # Example
//!
//! ```rust
//! use collapse_core::{
//!     Command, CommandExecutor, CommandResult, CollapseConfig, Document, Element, Marker,
//!     MemoryHost,
//! };
//!
//! let mut doc = Document::new();
//! let heading = doc.push(Element::heading(2).with_text("Plan").with_marker(Marker::Collapsible));
//! doc.push(Element::paragraph("step one").with_style("margin-left:40px;"));
//!
//! let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), MemoryHost::new());
//! let result = executor.execute(Command::ToggleHeading { heading }).unwrap();
//!
//! match result {
//!     CommandResult::Section(outcome) => assert_eq!(outcome.members.len(), 1),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! assert_eq!(executor.host().save_count(), 1);
//! ```

use crate::anchor::{AnchorResolver, ClickTarget, Point};
use crate::config::CollapseConfig;
use crate::document::{Document, NodeId};
use crate::error::CommandError;
use crate::guards::{DocRange, EditGuard, EditKind, EditVerdict};
use crate::host::Host;
use crate::markers::Marker;
use crate::toggle::{BulletOutcome, RepairReport, ToggleOutcome, VisibilityToggle};
use crate::visibility::RenderModel;

/// User-level actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Collapse or expand a heading's section.
    ToggleHeading {
        /// Anchor heading.
        heading: NodeId,
    },
    /// Collapse a heading's section (no-op if already collapsed).
    CollapseHeading {
        /// Anchor heading.
        heading: NodeId,
    },
    /// Expand a heading's section (no-op if not collapsed).
    ExpandHeading {
        /// Anchor heading.
        heading: NodeId,
    },
    /// Fold or unfold a bullet's sublist.
    ToggleBullet {
        /// First child of the list item.
        bullet: NodeId,
    },
    /// Make the heading under the cursor collapsible, or stop it being collapsible.
    ToggleCollapsibility,
    /// Same as [`Command::ToggleCollapsibility`] for an explicit heading.
    ToggleCollapsibilityAt {
        /// Target heading.
        heading: NodeId,
    },
    /// Reveal every hidden run that lost its anchor.
    RepairOrphans,
    /// A click at a page point, dispatched through the hit zones.
    Click {
        /// Click location.
        point: Point,
    },
}

/// Command execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// A heading section was toggled.
    Section(ToggleOutcome),
    /// A bullet was toggled.
    Bullet(BulletOutcome),
    /// A heading's collapsibility changed.
    Collapsibility {
        /// The heading.
        heading: NodeId,
        /// Whether it is now collapsible.
        collapsible: bool,
        /// The expansion performed first, when a collapsed heading lost collapsibility.
        expanded: Option<ToggleOutcome>,
    },
    /// An orphan repair pass ran.
    Repaired(RepairReport),
    /// The command hit nothing actionable.
    Ignored,
}

/// Executes [`Command`]s against a document.
pub struct CommandExecutor<H: Host> {
    document: Document,
    config: CollapseConfig,
    toggle: VisibilityToggle,
    host: H,
    command_history: Vec<Command>,
}

impl<H: Host> CommandExecutor<H> {
    /// Create an executor.
    pub fn new(document: Document, config: CollapseConfig, host: H) -> Self {
        let toggle = VisibilityToggle::new(&config);
        Self {
            document,
            config,
            toggle,
            host,
            command_history: Vec::new(),
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document, for host-driven edits.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Replace the whole document (e.g. after the host reloads it).
    pub fn replace_document(&mut self, document: Document) -> Document {
        std::mem::replace(&mut self.document, document)
    }

    /// The configuration.
    pub fn config(&self) -> &CollapseConfig {
        &self.config
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Rendering rules evaluated over the current document.
    pub fn render_model(&self) -> RenderModel<'_> {
        RenderModel::new(&self.document, &self.config)
    }

    /// Anchor resolution over the current document.
    pub fn anchors(&self) -> AnchorResolver<'_> {
        AnchorResolver::new(&self.document, &self.config)
    }

    /// Get command history.
    pub fn get_command_history(&self) -> &[Command] {
        &self.command_history
    }

    /// Whether a destructive edit may proceed.
    pub fn check_edit(&self, kind: EditKind, range: DocRange) -> EditVerdict {
        EditGuard::new(&self.document, &self.config).check(kind, range)
    }

    /// Execute a command.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        self.command_history.push(command.clone());

        match command {
            Command::ToggleHeading { heading } => {
                self.require_heading_anchor(heading)?;
                let outcome = self.toggle.toggle_heading(&mut self.document, heading);
                self.finish(Some(heading));
                Ok(CommandResult::Section(outcome))
            }
            Command::CollapseHeading { heading } => {
                self.require_heading_anchor(heading)?;
                let outcome = self.toggle.collapse_section(&mut self.document, heading);
                self.finish(Some(heading));
                Ok(CommandResult::Section(outcome))
            }
            Command::ExpandHeading { heading } => {
                self.require_heading_anchor(heading)?;
                let outcome = self.toggle.expand_section(&mut self.document, heading);
                self.finish(Some(heading));
                Ok(CommandResult::Section(outcome))
            }
            Command::ToggleBullet { bullet } => self.execute_bullet(bullet),
            Command::ToggleCollapsibility => {
                let cursor = self.host.cursor().ok_or(CommandError::NoCursor)?;
                let anchors = self.anchors();
                let heading = anchors
                    .heading_at(cursor)
                    .or_else(|| anchors.block_at(cursor))
                    .ok_or(CommandError::UnknownNode(cursor.node))?;
                self.execute_collapsibility(heading)
            }
            Command::ToggleCollapsibilityAt { heading } => self.execute_collapsibility(heading),
            Command::RepairOrphans => Ok(self.execute_repair()),
            Command::Click { point } => self.execute_click(point),
        }
    }

    /// Batch execute commands, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, CommandError> {
        let mut results = Vec::new();

        for command in commands {
            let result = self.execute(command)?;
            results.push(result);
        }

        Ok(results)
    }

    fn require_known(&self, id: NodeId) -> Result<(), CommandError> {
        if self.document.contains(id) {
            Ok(())
        } else {
            Err(CommandError::UnknownNode(id))
        }
    }

    fn require_heading_anchor(&self, heading: NodeId) -> Result<(), CommandError> {
        self.require_known(heading)?;
        if !self.config.enable_heading_collapse {
            return Err(CommandError::FeatureDisabled("heading collapse"));
        }
        if !self.anchors().is_heading_anchor(heading) {
            return Err(CommandError::NotAHeading(heading));
        }
        Ok(())
    }

    fn execute_bullet(&mut self, bullet: NodeId) -> Result<CommandResult, CommandError> {
        self.require_known(bullet)?;
        if !self.config.enable_list_collapse {
            return Err(CommandError::FeatureDisabled("list collapse"));
        }
        if !self.anchors().is_bullet(bullet) {
            return Err(CommandError::NotABullet(bullet));
        }
        let outcome = self.toggle.toggle_bullet(&mut self.document, bullet);
        if !outcome.changed.is_empty() {
            self.finish(Some(bullet));
        }
        Ok(CommandResult::Bullet(outcome))
    }

    fn execute_collapsibility(&mut self, heading: NodeId) -> Result<CommandResult, CommandError> {
        self.require_known(heading)?;
        if !self.config.enable_heading_collapse {
            return Err(CommandError::FeatureDisabled("heading collapse"));
        }
        if !self.document.element(heading).kind.is_collapsible_heading() {
            return Err(CommandError::NotAHeading(heading));
        }

        let expanded = if self.document.element(heading).has(Marker::Collapsed) {
            Some(self.toggle.expand_section(&mut self.document, heading))
        } else {
            None
        };
        let collapsible = self
            .document
            .element_mut(heading)
            .markers
            .toggle(Marker::Collapsible);
        tracing::debug!(?heading, collapsible, "toggled heading collapsibility");
        self.finish(None);
        Ok(CommandResult::Collapsibility {
            heading,
            collapsible,
            expanded,
        })
    }

    fn execute_repair(&mut self) -> CommandResult {
        let report = self.toggle.repair_orphaned_sections(&mut self.document);
        if !report.is_empty() {
            self.finish(None);
        }
        CommandResult::Repaired(report)
    }

    fn execute_click(&mut self, point: Point) -> Result<CommandResult, CommandError> {
        let Some(target) = self
            .host
            .element_at(&self.document, point)
            .and_then(|id| self.document.enclosing_block(id))
        else {
            return Ok(CommandResult::Ignored);
        };
        let Some(rect) = self.host.element_rect(&self.document, target) else {
            return Ok(CommandResult::Ignored);
        };

        match self.anchors().classify_click(target, point, rect) {
            ClickTarget::Heading(heading) => self.execute(Command::ToggleHeading { heading }),
            ClickTarget::Bullet(bullet) => self.execute(Command::ToggleBullet { bullet }),
            ClickTarget::Repair(_) => self.execute(Command::RepairOrphans),
            ClickTarget::None => Ok(CommandResult::Ignored),
        }
    }

    fn finish(&mut self, anchor: Option<NodeId>) {
        self.host.request_save(&self.document);
        if let Some(anchor) = anchor.filter(|a| self.document.contains(*a)) {
            let end = self.anchors().end_of(anchor);
            self.host.set_cursor(end);
        }
    }
}
