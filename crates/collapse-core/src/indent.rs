//! Indentation codec.
//!
//! Indentation is a left margin in whole multiples of a fixed step (40px by default), but the
//! surrounding editor does not store it uniformly. Depending on the element kind the margin sits
//! on the element itself, on a direct child, or two levels down inside a list. The
//! [`IndentConvention`] enum names those storage rules and is resolved once from
//! [`ElementKind`]; [`IndentCodec::classify`] then answers "is this element indented deeper than
//! level N, and by which convention".
//!
//! Levels are bounded by the configured level count: margins deeper than the last supported
//! level never match.

use crate::document::{Document, Element, ElementKind, NodeId};
use crate::style::StyleProps;

/// Default pixel size of one indentation level.
pub const DEFAULT_INDENT_STEP_PX: u32 = 40;

/// Default number of supported indentation levels.
pub const DEFAULT_INDENT_LEVELS: usize = 10;

const MARGIN_LEFT: &str = "margin-left";

/// Where an element kind keeps its indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentConvention {
    /// The element's own `margin-left`.
    Direct,
    /// A direct child's `margin-left` (asides, callouts, quotes).
    ChildDelegated,
    /// A list item's paragraph `margin-left` (list containers).
    GrandchildDelegated,
    /// The kind cannot carry indentation at all (images, opaque blocks).
    Unrepresentable,
}

impl IndentConvention {
    /// Resolve the convention for an element kind.
    pub fn of(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Heading(_)
            | ElementKind::Paragraph
            | ElementKind::ListItem
            | ElementKind::Span => IndentConvention::Direct,
            ElementKind::Other(_) => IndentConvention::ChildDelegated,
            ElementKind::List { .. } => IndentConvention::GrandchildDelegated,
            ElementKind::Image | ElementKind::Unhandled(_) => IndentConvention::Unrepresentable,
        }
    }
}

/// Inclusive range of indentation levels. Empty when `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    /// Lowest matching level.
    pub min: usize,
    /// Highest matching level.
    pub max: usize,
}

impl LevelRange {
    /// Whether `level` falls in the range.
    pub fn contains(&self, level: usize) -> bool {
        self.min <= level && level <= self.max
    }

    /// Whether no level matches.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Matching criteria for the three representable conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSelectors {
    /// Levels matched on the element itself.
    pub direct: LevelRange,
    /// Levels matched on a direct child.
    pub child_delegated: LevelRange,
    /// Levels matched on a list item's child.
    pub grandchild_delegated: LevelRange,
}

/// Which convention an element matched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMatch {
    /// Matched on its own margin.
    Direct,
    /// Matched through a direct child.
    ChildDelegated,
    /// Matched through a list item's child.
    GrandchildDelegated,
}

/// Reads and writes indentation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentCodec {
    step_px: u32,
    levels: usize,
}

impl Default for IndentCodec {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_STEP_PX, DEFAULT_INDENT_LEVELS)
    }
}

impl IndentCodec {
    /// Create a codec. A zero step is bumped to one pixel.
    pub fn new(step_px: u32, levels: usize) -> Self {
        Self {
            step_px: step_px.max(1),
            levels,
        }
    }

    /// Pixel size of one level.
    pub fn step_px(&self) -> u32 {
        self.step_px
    }

    /// Number of supported levels.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Parse a `40px`-style length. Anything else yields `None`.
    pub fn parse_px(value: &str) -> Option<u32> {
        value.trim().strip_suffix("px")?.trim().parse().ok()
    }

    /// Level encoded by `style`, if it carries an exact multiple of the step.
    pub fn exact_level(&self, style: &StyleProps) -> Option<usize> {
        let px = Self::parse_px(style.get(MARGIN_LEFT)?)?;
        (px % self.step_px == 0).then(|| (px / self.step_px) as usize)
    }

    /// Indentation level of an element's own margin.
    ///
    /// Absent, non-numeric, or off-grid margins read as level 0; this never fails.
    pub fn indent_level(&self, element: &Element) -> usize {
        self.exact_level(&element.style).unwrap_or(0)
    }

    /// Pixel margin for `level`.
    pub fn level_to_px(&self, level: usize) -> u32 {
        level as u32 * self.step_px
    }

    /// Write `level` into an element's `margin-left`.
    pub fn set_indent_level(&self, element: &mut Element, level: usize) {
        element
            .style
            .set(MARGIN_LEFT, format!("{}px", self.level_to_px(level)));
    }

    fn deeper_than(&self, level: usize) -> LevelRange {
        LevelRange {
            min: level + 1,
            max: self.levels,
        }
    }

    /// Criteria for "deeper than `threshold`" under all three conventions.
    ///
    /// With `lists_as_indented`, list containers at `threshold` itself also match, so a
    /// same-level list directly under a heading is folded into its section.
    pub fn group_selectors(&self, threshold: usize, lists_as_indented: bool) -> GroupSelectors {
        let deeper = self.deeper_than(threshold);
        let lists = if lists_as_indented {
            LevelRange {
                min: threshold,
                max: self.levels,
            }
        } else {
            deeper
        };
        GroupSelectors {
            direct: deeper,
            child_delegated: deeper,
            grandchild_delegated: lists,
        }
    }

    /// Criteria used while passing over a nested collapsed subsection at `level`.
    pub fn subsection_selectors(&self, level: usize) -> GroupSelectors {
        let deeper = self.deeper_than(level);
        GroupSelectors {
            direct: deeper,
            child_delegated: deeper,
            grandchild_delegated: deeper,
        }
    }

    /// Level contributed by a list item's child: a margin-carrying paragraph reports its own
    /// level, anything else counts as unindented.
    fn list_child_level(&self, element: &Element) -> Option<usize> {
        if element.kind == ElementKind::Paragraph && element.style.contains(MARGIN_LEFT) {
            self.exact_level(&element.style)
        } else {
            Some(0)
        }
    }

    fn list_levels<'a>(
        &'a self,
        doc: &'a Document,
        list: NodeId,
    ) -> impl Iterator<Item = usize> + 'a {
        doc.descendants(list)
            .filter(move |d| doc.element(*d).kind == ElementKind::ListItem)
            .flat_map(move |li| doc.children(li))
            .filter_map(move |c| self.list_child_level(doc.element(c)))
    }

    /// Whether `list` is a list container holding at least one unindented item.
    pub fn is_unindented_list(&self, doc: &Document, list: NodeId) -> bool {
        doc.element(list).kind.is_list() && self.list_levels(doc, list).any(|l| l == 0)
    }

    /// Classify `id` against `selectors`, honouring its kind's convention.
    pub fn classify(
        &self,
        doc: &Document,
        id: NodeId,
        selectors: &GroupSelectors,
    ) -> Option<GroupMatch> {
        let element = doc.element(id);
        match IndentConvention::of(&element.kind) {
            IndentConvention::Direct => self
                .exact_level(&element.style)
                .filter(|l| selectors.direct.contains(*l))
                .map(|_| GroupMatch::Direct),
            IndentConvention::ChildDelegated => doc
                .children(id)
                .filter_map(|c| self.exact_level(&doc.element(c).style))
                .any(|l| selectors.child_delegated.contains(l))
                .then_some(GroupMatch::ChildDelegated),
            IndentConvention::GrandchildDelegated => self
                .list_levels(doc, id)
                .any(|l| selectors.grandchild_delegated.contains(l))
                .then_some(GroupMatch::GrandchildDelegated),
            IndentConvention::Unrepresentable => None,
        }
    }

    /// Effective level of an element for display purposes: its own margin, its first indented
    /// child's, or its first list paragraph's, depending on convention.
    pub fn effective_level(&self, doc: &Document, id: NodeId) -> usize {
        let element = doc.element(id);
        match IndentConvention::of(&element.kind) {
            IndentConvention::Direct => self.indent_level(element),
            IndentConvention::ChildDelegated => doc
                .children(id)
                .find_map(|c| self.exact_level(&doc.element(c).style))
                .unwrap_or(0),
            IndentConvention::GrandchildDelegated => {
                self.list_levels(doc, id).next().unwrap_or(0)
            }
            IndentConvention::Unrepresentable => 0,
        }
    }
}
