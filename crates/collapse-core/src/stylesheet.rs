//! Stylesheet generation.
//!
//! The host hides collapsed content and draws the toggle indicators with plain CSS keyed on the
//! persisted marker sentinels, so hiding works even before the engine has loaded. This module
//! produces that rule set from a [`CollapseConfig`]; [`crate::visibility::RenderModel`]
//! evaluates the same rules in Rust.
//!
//! Heading rules are emitted only when heading collapse is enabled, bullet rules only when list
//! collapse is enabled, and the per-level margin rules only when images or opaque blocks are
//! indented.

use crate::config::CollapseConfig;
use crate::markers::Marker;
use std::fmt;

/// Selectors for the opaque blocks the host renders.
pub const UNHANDLED_SELECTORS: &str =
    "div:has(> .ck-horizontal-line), .include-note, .ck-mermaid__wrapper, .hljs, .table, .page-break";

/// DOM id of the toolbar button.
pub const TOOLBAR_BUTTON_ID: &str = "collapsible-section-toggle";

/// Tooltip of the toolbar button.
pub const TOOLBAR_BUTTON_TOOLTIP: &str = "Collapsible Section";

/// One CSS rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Comma-joined into the rule's selector list.
    pub selectors: Vec<String>,
    /// `property: value` declarations.
    pub declarations: Vec<(String, String)>,
}

impl StyleRule {
    fn new(selectors: Vec<String>) -> Self {
        Self {
            selectors,
            declarations: Vec::new(),
        }
    }

    fn decl(mut self, property: &str, value: impl Into<String>) -> Self {
        self.declarations.push((property.to_string(), value.into()));
        self
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selectors.join(",\n"))?;
        for (property, value) in &self.declarations {
            writeln!(f, "    {property}: {value};")?;
        }
        writeln!(f, "}}")
    }
}

/// Toolbar button descriptor for the collapsibility toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    /// DOM id.
    pub id: &'static str,
    /// Tooltip text.
    pub tooltip: &'static str,
    /// Insert before the toolbar item at this index.
    pub slot: usize,
}

impl ToolbarButton {
    /// The button for `config`, or `None` when heading collapse is disabled.
    pub fn for_config(config: &CollapseConfig) -> Option<Self> {
        config.enable_heading_collapse.then(|| Self {
            id: TOOLBAR_BUTTON_ID,
            tooltip: TOOLBAR_BUTTON_TOOLTIP,
            slot: config.toolbar_button_slot,
        })
    }
}

fn has(marker: Marker) -> String {
    format!("[style*=\"{}\"]", marker.sentinel())
}

fn margin(px: u32) -> String {
    format!("[style*=\"margin-left:{px}px\"]")
}

/// Generated rule set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Generate the rules for `config`, every selector prefixed with `scope` (the editable root's
    /// selector; may be empty).
    pub fn generate(config: &CollapseConfig, scope: &str) -> Self {
        let scoped = |sel: &str| -> String {
            if scope.is_empty() {
                sel.to_string()
            } else {
                format!("{scope} {sel}")
            }
        };
        let hidden = has(Marker::Hidden);
        let hidden_like = format!(
            ":is({hidden}, :has(> {hidden}), :is(ul, ol):has({hidden}))"
        );
        let collapsed_headings = format!(":is(h2, h3, h4, h5, h6){}", has(Marker::Collapsed));
        let collapsible_headings = format!(":is(h2, h3, h4, h5, h6){}", has(Marker::Collapsible));
        let mut rules = Vec::new();

        if config.enable_list_collapse {
            let bullet = "ul:not(.todo-list) > li:has(> :is(ul, ol)) > :first-child";
            let folded = has(Marker::ListCollapsed);
            rules.push(
                StyleRule::new(vec![scoped(&format!("{bullet}::before"))])
                    .decl("content", "\"▾\"")
                    .decl("cursor", "pointer"),
            );
            rules.push(
                StyleRule::new(vec![
                    scoped(&format!("{bullet}{folded}::before")),
                    scoped(&format!("{bullet}:has(> {folded})::before")),
                ])
                .decl("content", "\"▸\""),
            );
            rules.push(
                StyleRule::new(vec![
                    scoped(&format!(":has(> {folded}) + :is(ul, ol)")),
                    scoped(&format!("{folded} + :is(ul, ol)")),
                ])
                .decl("display", "none"),
            );
        }

        if config.enable_heading_collapse {
            let anchor = if config.all_headings_collapsible {
                ":is(h2, h3, h4, h5, h6)".to_string()
            } else {
                collapsible_headings.clone()
            };
            rules.push(
                StyleRule::new(vec![scoped(&format!("{anchor}:not(ul *)::before"))])
                    .decl("content", "\"▾\"")
                    .decl("cursor", "pointer"),
            );
            rules.push(
                StyleRule::new(vec![scoped(&format!("{collapsed_headings}::before"))])
                    .decl("content", "\"▸\""),
            );
            rules.push(
                StyleRule::new(vec![scoped(&format!(
                    ":not({collapsed_headings}, {hidden_like}) + {}",
                    has(Marker::Error)
                ))])
                .decl("display", "block !important")
                .decl("border-bottom", "1px solid red")
                .decl("cursor", "pointer"),
            );
        }

        if config.indent_images || config.indent_unhandled {
            let mut members = Vec::new();
            if config.indent_images {
                members.push(".image".to_string());
            }
            if config.indent_unhandled {
                members.push(UNHANDLED_SELECTORS.to_string());
            }
            let members = members.join(", ");
            let codec = config.indent_codec();
            for level in 1..=config.supported_indent_levels {
                let px = codec.level_to_px(level);
                let m = margin(px);
                rules.push(
                    StyleRule::new(vec![scoped(&format!(
                        ":is({m}, :has(> {m}), :is(ul, ol):has(li > p{m})) + :is({members})"
                    ))])
                    .decl("margin-left", format!("{px}px")),
                );
            }
        }

        if config.enable_heading_collapse {
            rules.push(
                StyleRule::new(vec![
                    scoped(&format!(
                        ":is({collapsed_headings}, {hidden_like}) + :is({UNHANDLED_SELECTORS})"
                    )),
                    scoped(&hidden_like),
                ])
                .decl("display", "none !important"),
            );
        }

        Self { rules }
    }

    /// The generated rules, in cascade order.
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Render as CSS text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sheet_contains_hiding_rules() {
        let css = Stylesheet::generate(&CollapseConfig::default(), ".editor").render();
        assert!(css.contains(".editor [style*=\"/*▼list-collapsed▼*/\"] + :is(ul, ol)"));
        assert!(css.contains("display: none !important;"));
        assert!(css.contains("margin-left: 400px;"));
        assert!(css.contains("[style*=\"/*▼error▼*/\"]"));
    }

    #[test]
    fn test_disabled_features_emit_nothing() {
        let config = CollapseConfig {
            enable_heading_collapse: false,
            enable_list_collapse: false,
            indent_images: false,
            indent_unhandled: false,
            ..CollapseConfig::default()
        };
        assert!(Stylesheet::generate(&config, "").rules().is_empty());
        assert_eq!(ToolbarButton::for_config(&config), None);
    }

    #[test]
    fn test_toolbar_button_slot() {
        let config = CollapseConfig {
            toolbar_button_slot: 4,
            ..CollapseConfig::default()
        };
        let button = ToolbarButton::for_config(&config).unwrap();
        assert_eq!(button.id, TOOLBAR_BUTTON_ID);
        assert_eq!(button.slot, 4);
    }
}
