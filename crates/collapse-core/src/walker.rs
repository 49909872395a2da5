//! Section walker.
//!
//! A section is never stored: it is the run of siblings after an anchor that the walker keeps
//! consuming before it meets the first element that breaks contiguity. "Belongs to the section"
//! means "indented deeper than the anchor" under whichever [`IndentConvention`] the element's
//! kind uses, with a few exceptions:
//!
//! - while collapsing, elements that are already not rendered are passed over; they belong to
//!   a nested collapsed subsection and must not be marked twice;
//! - while expanding, a nested collapsed heading is revealed but its own contents are passed
//!   over (the *subsection guard*), so they stay hidden;
//! - opaque blocks carry no indentation, so a single one is skipped and two in a row end the
//!   walk;
//! - images join the section they sit in;
//! - with `treat_lists_as_indented`, an empty unindented list ends the walk while collapsing.
//!
//! Collapsing extracts one representative per list (the first item's first child, or that
//! child's inline children); the rendering rules hide the whole list from there. Expanding
//! therefore searches lists deeply for everything that carries `hidden`.
//!
//! [`IndentConvention`]: crate::indent::IndentConvention

use crate::config::CollapseConfig;
use crate::document::{Document, ElementKind, NodeId};
use crate::indent::{GroupMatch, GroupSelectors, IndentCodec};
use crate::markers::Marker;
use crate::visibility::RenderModel;

/// Direction of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Computing the visible members to hide.
    Collapsing,
    /// Computing the hidden members to reveal.
    Expanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    EndOfSiblings,
    Boundary,
    OpaqueRun,
    EmptyList,
}

/// Computes sections under a fixed configuration.
#[derive(Debug, Clone)]
pub struct SectionWalker {
    config: CollapseConfig,
    codec: IndentCodec,
}

impl SectionWalker {
    /// Create a walker for `config`.
    pub fn new(config: &CollapseConfig) -> Self {
        Self {
            config: config.clone(),
            codec: config.indent_codec(),
        }
    }

    /// The indentation codec in use.
    pub fn codec(&self) -> &IndentCodec {
        &self.codec
    }

    /// The section owned by `anchor`: the walk starting at the anchor's next sibling.
    ///
    /// Returns an empty list when the anchor has no following sibling or owns nothing.
    pub fn compute_section(
        &self,
        doc: &Document,
        anchor: NodeId,
        threshold: usize,
        mode: WalkMode,
    ) -> Vec<NodeId> {
        match doc.next_sibling(anchor) {
            Some(start) => self.walk_from(doc, start, threshold, mode),
            None => Vec::new(),
        }
    }

    /// Walk forward from `start` (inclusive), collecting members deeper than `threshold`.
    pub fn walk_from(
        &self,
        doc: &Document,
        start: NodeId,
        threshold: usize,
        mode: WalkMode,
    ) -> Vec<NodeId> {
        let selectors = self
            .codec
            .group_selectors(threshold, self.config.treat_lists_as_indented);
        let render = RenderModel::new(doc, &self.config);
        let mut members = Vec::new();
        let mut guard: Option<GroupSelectors> = None;
        let mut current = Some(start);
        let mut stop = StopReason::EndOfSiblings;

        while let Some(id) = current {
            let next = doc.next_sibling(id);
            let element = doc.element(id);
            let matched = self.codec.classify(doc, id, &selectors);
            let next_is_opaque = next.is_some_and(|n| doc.element(n).kind.is_unhandled());

            if mode == WalkMode::Collapsing && matched.is_some() && !render.is_rendered(id) {
                tracing::trace!(?id, "already hidden, passing over");
                current = next;
                continue;
            }

            if let Some(sub) = guard {
                if self.codec.classify(doc, id, &sub).is_some()
                    || element.kind == ElementKind::Image
                {
                    current = next;
                    continue;
                }
                if element.kind.is_unhandled() && self.config.indent_unhandled && !next_is_opaque {
                    current = next;
                    continue;
                }
                tracing::trace!(?id, "leaving nested collapsed subsection");
                guard = None;
            }

            if mode == WalkMode::Expanding && element.has(Marker::Collapsed) {
                let level = self.codec.indent_level(element);
                tracing::trace!(?id, level, "entering nested collapsed subsection");
                guard = Some(self.codec.subsection_selectors(level));
            }

            if mode == WalkMode::Collapsing
                && self.config.treat_lists_as_indented
                && self.codec.is_unindented_list(doc, id)
                && first_bullet_is_empty(doc, id)
            {
                stop = StopReason::EmptyList;
                break;
            }

            match matched {
                Some(GroupMatch::Direct) => members.push(id),
                Some(GroupMatch::ChildDelegated) => members.extend(doc.children(id)),
                Some(GroupMatch::GrandchildDelegated) => match mode {
                    WalkMode::Collapsing => members.extend(list_representatives(doc, id)),
                    WalkMode::Expanding => {
                        members.extend(doc.find_descendants(id, |e| e.has(Marker::Hidden)))
                    }
                },
                None if element.kind == ElementKind::Image && self.config.indent_images => {
                    members.push(id)
                }
                None if element.kind.is_unhandled() && self.config.indent_unhandled => {
                    if next_is_opaque {
                        stop = StopReason::OpaqueRun;
                        break;
                    }
                }
                None => {
                    stop = StopReason::Boundary;
                    break;
                }
            }
            current = next;
        }

        tracing::debug!(
            ?start,
            threshold,
            ?mode,
            ?stop,
            members = members.len(),
            "section walk finished"
        );
        members
    }
}

/// Whether a list's first item opens with an empty inline filler.
fn first_bullet_is_empty(doc: &Document, list: NodeId) -> bool {
    doc.first_child(list)
        .filter(|li| doc.element(*li).kind == ElementKind::ListItem)
        .and_then(|li| doc.first_child(li))
        .is_some_and(|first| {
            let element = doc.element(first);
            element.kind == ElementKind::Span
                && element.has_blank_text()
                && !doc.has_children(first)
        })
}

/// The nodes that stand in for a whole list when collapsing.
fn list_representatives(doc: &Document, list: NodeId) -> Vec<NodeId> {
    let Some(first) = doc.first_child(list).and_then(|li| doc.first_child(li)) else {
        return Vec::new();
    };
    if doc.element(first).kind == ElementKind::Span && doc.has_children(first) {
        doc.children(first).collect()
    } else {
        vec![first]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Element, UnhandledKind};

    fn indented(level: usize) -> Element {
        Element::paragraph(format!("@{level}")).with_style(&format!("margin-left:{}px;", level * 40))
    }

    #[test]
    fn test_stops_at_threshold_level() {
        let mut doc = Document::new();
        let h = doc.push(Element::heading(2).with_style("margin-left:0px;"));
        let a = doc.push(indented(1));
        let b = doc.push(indented(2));
        doc.push(indented(0));
        doc.push(indented(1));

        let walker = SectionWalker::new(&CollapseConfig::default());
        assert_eq!(
            walker.compute_section(&doc, h, 0, WalkMode::Collapsing),
            vec![a, b]
        );
    }

    #[test]
    fn test_single_opaque_skipped_pair_stops() {
        let mut doc = Document::new();
        let h = doc.push(Element::heading(2));
        let a = doc.push(indented(1));
        doc.push(Element::unhandled(UnhandledKind::CodeBlock));
        let b = doc.push(indented(1));
        doc.push(Element::unhandled(UnhandledKind::Table));
        doc.push(Element::unhandled(UnhandledKind::Mermaid));
        doc.push(indented(1));

        let walker = SectionWalker::new(&CollapseConfig::default());
        assert_eq!(
            walker.compute_section(&doc, h, 0, WalkMode::Collapsing),
            vec![a, b]
        );
    }

    #[test]
    fn test_opaque_is_boundary_when_not_indented() {
        let mut doc = Document::new();
        let h = doc.push(Element::heading(2));
        let a = doc.push(indented(1));
        doc.push(Element::unhandled(UnhandledKind::HorizontalLine));
        doc.push(indented(1));

        let config = CollapseConfig {
            indent_unhandled: false,
            ..CollapseConfig::default()
        };
        let walker = SectionWalker::new(&config);
        assert_eq!(walker.compute_section(&doc, h, 0, WalkMode::Collapsing), vec![a]);
    }

    #[test]
    fn test_images_follow_config() {
        let mut doc = Document::new();
        let h = doc.push(Element::heading(2));
        let a = doc.push(indented(1));
        let img = doc.push(Element::image());
        let b = doc.push(indented(1));

        let walker = SectionWalker::new(&CollapseConfig::default());
        assert_eq!(
            walker.compute_section(&doc, h, 0, WalkMode::Collapsing),
            vec![a, img, b]
        );

        let config = CollapseConfig {
            indent_images: false,
            ..CollapseConfig::default()
        };
        let walker = SectionWalker::new(&config);
        assert_eq!(walker.compute_section(&doc, h, 0, WalkMode::Collapsing), vec![a]);
    }

    #[test]
    fn test_child_delegated_container_contributes_children() {
        let mut doc = Document::new();
        let h = doc.push(Element::heading(2));
        let aside = doc.push(Element::other("aside"));
        let inner = doc.append_child(aside, indented(1));
        let inner2 = doc.append_child(aside, Element::paragraph("plain"));

        let walker = SectionWalker::new(&CollapseConfig::default());
        assert_eq!(
            walker.compute_section(&doc, h, 0, WalkMode::Collapsing),
            vec![inner, inner2]
        );
    }

    #[test]
    fn test_empty_unindented_list_ends_walk() {
        let mut doc = Document::new();
        let h = doc.push(Element::heading(2));
        let a = doc.push(indented(1));
        let list = doc.push(Element::list(false));
        let li = doc.append_child(list, Element::list_item());
        doc.append_child(li, Element::span(""));

        let walker = SectionWalker::new(&CollapseConfig::default());
        assert_eq!(walker.compute_section(&doc, h, 0, WalkMode::Collapsing), vec![a]);
    }

    #[test]
    fn test_no_next_sibling() {
        let mut doc = Document::new();
        let h = doc.push(Element::heading(2));
        let walker = SectionWalker::new(&CollapseConfig::default());
        assert!(walker.compute_section(&doc, h, 0, WalkMode::Expanding).is_empty());
    }
}
