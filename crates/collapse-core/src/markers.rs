//! Marker vocabulary.
//!
//! Markers are the boolean flags the engine attaches to elements: whether a heading may be
//! collapsed, whether it currently is, whether a bullet's sublist is folded, whether an element
//! belongs to a hidden run, and whether it is the recovery placeholder for such a run.
//!
//! In memory they live in a [`MarkerSet`] next to the element's style. The host, however, only
//! persists an element's inline style string, so at the storage boundary each marker is encoded
//! as a sentinel comment (`/*▼hidden▼*/`) spliced into that string just before its final
//! character. The free functions in this module are that codec; they are pure string transforms.
//!
//! # Example
//!
//! ```rust
//! use collapse_core::markers::{self, Marker, StyleHint};
//!
//! let style = markers::add_marker(Some("margin-left:40px;"), Marker::Hidden, StyleHint::Text);
//! assert_eq!(style, "margin-left:40px/*▼hidden▼*/;");
//! assert!(markers::has_marker(&style, Marker::Hidden));
//!
//! let (clean, set) = markers::extract_markers(&style);
//! assert_eq!(clean, "margin-left:40px;");
//! assert!(set.contains(Marker::Hidden));
//! ```

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A single boolean flag carried by an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    /// Heading may be collapsed.
    Collapsible,
    /// Heading is currently collapsed.
    Collapsed,
    /// Bullet's sublist is folded.
    ListCollapsed,
    /// Element belongs to a hidden section run.
    Hidden,
    /// Element is a recovery placeholder for a hidden run.
    Error,
}

impl Marker {
    /// All markers, in serialization order.
    pub const ALL: [Marker; 5] = [
        Marker::Collapsible,
        Marker::Collapsed,
        Marker::ListCollapsed,
        Marker::Hidden,
        Marker::Error,
    ];

    /// The marker's persisted name.
    pub fn name(self) -> &'static str {
        match self {
            Marker::Collapsible => "collapsible",
            Marker::Collapsed => "collapsed",
            Marker::ListCollapsed => "list-collapsed",
            Marker::Hidden => "hidden",
            Marker::Error => "error",
        }
    }

    /// Look a marker up by its persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// The sentinel comment embedded in style strings, e.g. `/*▼collapsed▼*/`.
    pub fn sentinel(self) -> String {
        format!("/*▼{}▼*/", self.name())
    }

    fn bit(self) -> u8 {
        match self {
            Marker::Collapsible => 1 << 0,
            Marker::Collapsed => 1 << 1,
            Marker::ListCollapsed => 1 << 2,
            Marker::Hidden => 1 << 3,
            Marker::Error => 1 << 4,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Small set of [`Marker`]s attached to one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkerSet(u8);

impl MarkerSet {
    /// An empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether `marker` is present.
    pub fn contains(&self, marker: Marker) -> bool {
        self.0 & marker.bit() != 0
    }

    /// Add `marker`. Returns `true` if it was not already present.
    pub fn insert(&mut self, marker: Marker) -> bool {
        let added = !self.contains(marker);
        self.0 |= marker.bit();
        added
    }

    /// Remove `marker`. Returns `true` if it was present.
    pub fn remove(&mut self, marker: Marker) -> bool {
        let removed = self.contains(marker);
        self.0 &= !marker.bit();
        removed
    }

    /// Flip `marker` and return its new state.
    ///
    /// Turning [`Marker::Collapsible`] off also clears [`Marker::Collapsed`]: a heading that
    /// can no longer be collapsed must not stay collapsed.
    pub fn toggle(&mut self, marker: Marker) -> bool {
        if self.remove(marker) {
            if marker == Marker::Collapsible {
                self.remove(Marker::Collapsed);
            }
            false
        } else {
            self.insert(marker);
            true
        }
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate present markers in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = Marker> + '_ {
        Marker::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<Marker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        let mut set = MarkerSet::empty();
        for marker in iter {
            set.insert(marker);
        }
        set
    }
}

/// Which harmless base declaration to synthesize when an element has no style to carry a
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleHint {
    /// Block text elements: `margin-left:0px;`.
    #[default]
    Text,
    /// Images: `height:auto;`.
    Image,
    /// Inline spans: `background-color:auto;`.
    Span,
}

impl StyleHint {
    /// The base style used when the element has none.
    pub fn default_style(self) -> &'static str {
        match self {
            StyleHint::Text => "margin-left:0px;",
            StyleHint::Image => "height:auto;",
            StyleHint::Span => "background-color:auto;",
        }
    }
}

static SENTINEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*▼([a-z-]+)▼\*/").expect("valid sentinel regex"));

fn base_style(style: Option<&str>, hint: StyleHint) -> String {
    match style {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => hint.default_style().to_string(),
    }
}

fn splice_before_last(style: &str, sentinel: &str) -> String {
    match style.char_indices().last() {
        Some((idx, _)) => {
            let mut out = String::with_capacity(style.len() + sentinel.len());
            out.push_str(&style[..idx]);
            out.push_str(sentinel);
            out.push_str(&style[idx..]);
            out
        }
        None => sentinel.to_string(),
    }
}

/// Whether `style` carries the sentinel for `marker`.
pub fn has_marker(style: &str, marker: Marker) -> bool {
    style.contains(&marker.sentinel())
}

/// Flip `marker` in `style`.
///
/// Removing [`Marker::Collapsible`] also strips [`Marker::Collapsed`].
pub fn toggle_marker(style: Option<&str>, marker: Marker, hint: StyleHint) -> String {
    let style = base_style(style, hint);
    let sentinel = marker.sentinel();
    if style.contains(&sentinel) {
        let mut out = style.replace(&sentinel, "");
        if marker == Marker::Collapsible {
            out = out.replace(&Marker::Collapsed.sentinel(), "");
        }
        out
    } else {
        splice_before_last(&style, &sentinel)
    }
}

/// Ensure `style` carries `marker`.
pub fn add_marker(style: Option<&str>, marker: Marker, hint: StyleHint) -> String {
    let style = base_style(style, hint);
    let sentinel = marker.sentinel();
    if style.contains(&sentinel) {
        style
    } else {
        splice_before_last(&style, &sentinel)
    }
}

/// Ensure `style` does not carry `marker`.
pub fn remove_marker(style: Option<&str>, marker: Marker, hint: StyleHint) -> String {
    base_style(style, hint).replace(&marker.sentinel(), "")
}

/// Split a stored style string into its plain declarations and the markers it carries.
///
/// Sentinels with unknown names are left in place.
pub fn extract_markers(style: &str) -> (String, MarkerSet) {
    let mut set = MarkerSet::empty();
    let clean = SENTINEL_RE.replace_all(style, |caps: &regex::Captures<'_>| {
        match Marker::from_name(&caps[1]) {
            Some(marker) => {
                set.insert(marker);
                String::new()
            }
            None => caps[0].to_string(),
        }
    });
    (clean.into_owned(), set)
}

/// Embed `markers` into `style` for storage.
///
/// An empty set leaves the style untouched, so unmarked elements keep whatever (possibly empty)
/// style they had.
pub fn embed_markers(style: &str, markers: MarkerSet, hint: StyleHint) -> String {
    markers.iter().fold(style.to_string(), |acc, marker| {
        let base = (!acc.is_empty()).then_some(acc.as_str());
        add_marker(base, marker, hint)
    })
}
