//! Applying and reverting section visibility.
//!
//! [`VisibilityToggle`] turns walker output into marker changes. Collapsing marks every member
//! `hidden` and drops a `[Hidden Section]` placeholder (`hidden` + `error`, one level deeper
//! than the anchor) right after the anchor. While the anchor exists the placeholder is hidden
//! along with the section; if the anchor is deleted the placeholder becomes the only visible
//! trace of the run and the entry point for [`VisibilityToggle::repair_orphaned_sections`].
//!
//! Bullet toggles do not walk at all: folding a sublist is a single `list-collapsed` marker on
//! the bullet (or on its inline spans) and the rendering rules hide the sublist that follows.

use crate::config::CollapseConfig;
use crate::document::{Document, Element, ElementKind, NodeId};
use crate::indent::IndentCodec;
use crate::markers::Marker;
use crate::visibility::RenderModel;
use crate::walker::{SectionWalker, WalkMode};

/// Text of the placeholder inserted for a collapsed section.
pub const PLACEHOLDER_TEXT: &str = "[Hidden Section]";

/// Result of a heading toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the anchor ended up collapsed.
    pub collapsed: bool,
    /// Elements whose `hidden` marker was added (collapse) or removed (expand).
    pub members: Vec<NodeId>,
    /// Placeholder inserted by a collapse.
    pub placeholder_inserted: Option<NodeId>,
    /// Placeholder removed by an expand.
    pub placeholder_removed: Option<NodeId>,
}

impl ToggleOutcome {
    /// Whether anything in the document changed besides the anchor's own marker.
    pub fn changed_section(&self) -> bool {
        !self.members.is_empty()
            || self.placeholder_inserted.is_some()
            || self.placeholder_removed.is_some()
    }
}

/// What a bullet click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletAction {
    /// The bullet is empty; nothing happened.
    Ignored,
    /// The marker was flipped on the bullet itself.
    ToggledBullet,
    /// The marker was flipped on each inline span of the bullet.
    ToggledSpans,
    /// Every marked descendant was unfolded.
    Unfolded,
}

/// Result of a bullet toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletOutcome {
    /// What happened.
    pub action: BulletAction,
    /// Nodes whose `list-collapsed` marker changed.
    pub changed: Vec<NodeId>,
}

/// Result of an orphan repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Rendered `hidden` elements found at the start of the pass.
    pub orphans: Vec<NodeId>,
    /// Elements whose `hidden` marker was removed.
    pub revealed: Vec<NodeId>,
    /// Placeholders removed.
    pub placeholders_removed: Vec<NodeId>,
}

impl RepairReport {
    /// Whether the pass changed the document.
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty() && self.placeholders_removed.is_empty()
    }
}

/// Applies collapse, expand, bullet and repair operations to a document.
#[derive(Debug, Clone)]
pub struct VisibilityToggle {
    config: CollapseConfig,
    walker: SectionWalker,
}

impl VisibilityToggle {
    /// Create a toggle for `config`.
    pub fn new(config: &CollapseConfig) -> Self {
        Self {
            config: config.clone(),
            walker: SectionWalker::new(config),
        }
    }

    /// The walker used to compute sections.
    pub fn walker(&self) -> &SectionWalker {
        &self.walker
    }

    fn codec(&self) -> &IndentCodec {
        self.walker.codec()
    }

    /// The placeholder element for a section owned by an anchor at `threshold`.
    pub fn placeholder(&self, threshold: usize) -> Element {
        let mut element = Element::paragraph(PLACEHOLDER_TEXT)
            .with_marker(Marker::Hidden)
            .with_marker(Marker::Error);
        self.codec().set_indent_level(&mut element, threshold + 1);
        element
    }

    /// Flip `anchor` between collapsed and expanded.
    pub fn toggle_heading(&self, doc: &mut Document, anchor: NodeId) -> ToggleOutcome {
        if doc.element(anchor).has(Marker::Collapsed) {
            self.expand_section(doc, anchor)
        } else {
            self.collapse_section(doc, anchor)
        }
    }

    /// Collapse `anchor`'s section. A no-op on an already collapsed anchor.
    pub fn collapse_section(&self, doc: &mut Document, anchor: NodeId) -> ToggleOutcome {
        if !doc.element_mut(anchor).markers.insert(Marker::Collapsed) {
            return ToggleOutcome {
                collapsed: true,
                ..ToggleOutcome::default()
            };
        }
        let threshold = self.codec().indent_level(doc.element(anchor));
        let members = self
            .walker
            .compute_section(doc, anchor, threshold, WalkMode::Collapsing);
        if members.is_empty() {
            tracing::debug!(?anchor, threshold, "collapsed anchor owns no section");
            return ToggleOutcome {
                collapsed: true,
                ..ToggleOutcome::default()
            };
        }

        let placeholder = doc.insert_after(anchor, self.placeholder(threshold));
        // Images and opaque blocks left hidden by a nested collapse are walked again.
        let mut members = members;
        members.retain(|id| doc.element_mut(*id).markers.insert(Marker::Hidden));
        tracing::debug!(
            ?anchor,
            threshold,
            hidden = members.len(),
            ?placeholder,
            "collapsed section"
        );
        ToggleOutcome {
            collapsed: true,
            members,
            placeholder_inserted: Some(placeholder),
            placeholder_removed: None,
        }
    }

    /// Expand `anchor`'s section. A no-op on an anchor that is not collapsed.
    pub fn expand_section(&self, doc: &mut Document, anchor: NodeId) -> ToggleOutcome {
        if !doc.element_mut(anchor).markers.remove(Marker::Collapsed) {
            return ToggleOutcome::default();
        }
        let threshold = self.codec().indent_level(doc.element(anchor));

        // The placeholder goes first: past the deepest supported level its indentation matches
        // no group and would end the walk before the section.
        let placeholder_removed = doc
            .next_sibling(anchor)
            .filter(|s| doc.element(*s).has(Marker::Error));
        if let Some(placeholder) = placeholder_removed {
            doc.remove(placeholder);
        }

        let members = self
            .walker
            .compute_section(doc, anchor, threshold, WalkMode::Expanding);
        for id in &members {
            doc.element_mut(*id).markers.remove(Marker::Hidden);
        }
        tracing::debug!(
            ?anchor,
            threshold,
            revealed = members.len(),
            ?placeholder_removed,
            "expanded section"
        );
        ToggleOutcome {
            collapsed: false,
            members,
            placeholder_inserted: None,
            placeholder_removed,
        }
    }

    /// Fold or unfold the sublist owned by bullet `target`.
    pub fn toggle_bullet(&self, doc: &mut Document, target: NodeId) -> BulletOutcome {
        if doc.element(target).has_blank_text() && !doc.has_children(target) {
            return BulletOutcome {
                action: BulletAction::Ignored,
                changed: Vec::new(),
            };
        }

        let marked = doc.find_descendants(target, |e| e.has(Marker::ListCollapsed));
        let spans = doc.find_descendants(target, |e| e.kind == ElementKind::Span);

        let (action, changed) = if marked.is_empty() && spans.is_empty() {
            doc.element_mut(target).markers.toggle(Marker::ListCollapsed);
            (BulletAction::ToggledBullet, vec![target])
        } else if marked.is_empty() {
            for span in &spans {
                doc.element_mut(*span).markers.toggle(Marker::ListCollapsed);
            }
            (BulletAction::ToggledSpans, spans)
        } else {
            for id in &marked {
                doc.element_mut(*id).markers.remove(Marker::ListCollapsed);
            }
            (BulletAction::Unfolded, marked)
        };
        tracing::debug!(?target, ?action, changed = changed.len(), "toggled bullet");
        BulletOutcome { action, changed }
    }

    /// Reveal every run of `hidden` elements that lost its anchor.
    ///
    /// Each `hidden` element that is currently rendered is treated as the head of an orphaned
    /// run: the run is recomputed by an expanding walk from that element at one level above
    /// its own, its `hidden` markers are stripped, and the element is removed if it is a
    /// placeholder.
    pub fn repair_orphaned_sections(&self, doc: &mut Document) -> RepairReport {
        let orphans: Vec<NodeId> = {
            let render = RenderModel::new(doc, &self.config);
            doc.iter()
                .filter(|id| doc.element(*id).has(Marker::Hidden) && render.is_rendered(*id))
                .collect()
        };
        let mut report = RepairReport {
            orphans: orphans.clone(),
            ..RepairReport::default()
        };
        if orphans.is_empty() {
            return report;
        }
        tracing::warn!(count = orphans.len(), "repairing orphaned hidden elements");

        for orphan in orphans {
            if !doc.contains(orphan) || !doc.element(orphan).has(Marker::Hidden) {
                continue;
            }
            let level = self.codec().indent_level(doc.element(orphan));
            let run =
                self.walker
                    .walk_from(doc, orphan, level.saturating_sub(1), WalkMode::Expanding);
            for id in std::iter::once(orphan).chain(run) {
                if doc.element_mut(id).markers.remove(Marker::Hidden) {
                    report.revealed.push(id);
                }
            }
            if doc.element(orphan).has(Marker::Error) {
                doc.remove(orphan);
                report.placeholders_removed.push(orphan);
            }
        }
        report.revealed.retain(|id| !report.placeholders_removed.contains(id));
        tracing::debug!(
            revealed = report.revealed.len(),
            removed = report.placeholders_removed.len(),
            "orphan repair finished"
        );
        report
    }
}
