#![warn(missing_docs)]
//! Collapse Core - Headless Collapsible Section Engine
//!
//! # Overview
//!
//! `collapse-core` infers and toggles collapsible sections in block documents whose nesting is
//! only expressed through left-margin indentation. Headings and list bullets act as anchors; the
//! section an anchor owns is the run of following siblings indented deeper than it, discovered
//! on demand by a single forward walk. Nothing about sections is stored except the markers the
//! walk leaves behind.
//!
//! The engine does not render, lay out, or persist. It mutates an in-memory [`Document`] and
//! reports back to its embedder through the [`Host`] trait.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface & State Management       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Anchor Resolution & Editing Guards         │  ← Clicks, cursor, edits
//! ├─────────────────────────────────────────────┤
//! │  Visibility Toggle (collapse/expand/repair) │  ← Marker bookkeeping
//! ├─────────────────────────────────────────────┤
//! │  Section Walker + Render Model              │  ← Section inference
//! ├─────────────────────────────────────────────┤
//! │  Indent Codec + Marker Codec                │  ← Element annotations
//! ├─────────────────────────────────────────────┤
//! │  Document arena                             │  ← Block tree
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use collapse_core::{
//!     Command, CommandExecutor, CollapseConfig, Document, Element, Marker, MemoryHost,
//! };
//!
//! let mut doc = Document::new();
//! let heading = doc.push(Element::heading(2).with_text("Groceries").with_marker(Marker::Collapsible));
//! let milk = doc.push(Element::paragraph("milk").with_style("margin-left:40px;"));
//! let eggs = doc.push(Element::paragraph("eggs").with_style("margin-left:40px;"));
//! let next = doc.push(Element::paragraph("Chores").with_style("margin-left:0px;"));
//!
//! let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), MemoryHost::new());
//! executor.execute(Command::ToggleHeading { heading }).unwrap();
//!
//! let doc = executor.document();
//! assert!(doc.element(milk).has(Marker::Hidden));
//! assert!(doc.element(eggs).has(Marker::Hidden));
//! assert!(!doc.element(next).has(Marker::Hidden));
//! ```
//!
//! # Module Description
//!
//! - [`document`] - Block tree arena
//! - [`style`] - Inline style declarations
//! - [`markers`] - Marker vocabulary and sentinel codec
//! - [`indent`] - Indentation levels and storage conventions
//! - [`visibility`] - Evaluation of the hiding rules
//! - [`walker`] - Section inference
//! - [`toggle`] - Collapse, expand, bullet folding and orphan repair
//! - [`anchor`] - Click and cursor resolution
//! - [`guards`] - Edit protection for collapsed headings
//! - [`config`] - Configuration
//! - [`stylesheet`] - CSS generation for hosts
//! - [`host`] - Host interface
//! - [`commands`] - Command interface
//! - [`state`] - Versioned state management

pub mod anchor;
pub mod commands;
pub mod config;
pub mod document;
mod error;
pub mod guards;
pub mod host;
pub mod indent;
pub mod markers;
pub mod state;
pub mod style;
pub mod stylesheet;
pub mod toggle;
pub mod visibility;
pub mod walker;

pub use anchor::{AnchorResolver, ClickTarget, DocPosition, Point, Rect};
pub use commands::{Command, CommandExecutor, CommandResult};
pub use config::CollapseConfig;
pub use document::{Document, Element, ElementKind, NodeId, UnhandledKind};
pub use error::{CommandError, ConfigError};
pub use guards::{DocRange, EditGuard, EditKind, EditVerdict};
pub use host::{Host, MemoryHost};
pub use indent::{IndentCodec, IndentConvention};
pub use markers::{Marker, MarkerSet, StyleHint};
pub use state::{CollapseStateManager, DocumentState, StateChange, StateChangeType};
pub use style::StyleProps;
pub use stylesheet::{Stylesheet, ToolbarButton};
pub use toggle::{BulletAction, BulletOutcome, RepairReport, ToggleOutcome, VisibilityToggle};
pub use visibility::RenderModel;
pub use walker::{SectionWalker, WalkMode};
