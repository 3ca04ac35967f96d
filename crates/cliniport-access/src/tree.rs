//! Hierarchical permission tree evaluation.
//!
//! Each tenant configures a permission tree gating UI and API capabilities.
//! The tree is addressed by dot-separated paths that name the nesting
//! explicitly: `section.features.<name>.components.<name>.tabs.<name>`.
//! A node is either a plain boolean leaf or a section object with an optional
//! `enabled` flag and `features`/`components`/`tabs` child maps.
//!
//! # Usage
//!
//! ```ignore
//! use cliniport_access::tree::{PermissionTree, has_permission};
//!
//! let tree = PermissionTree::from_json(r#"{
//!     "patients": { "enabled": true, "features": { "create": true } }
//! }"#)?;
//!
//! assert!(has_permission(Some(&tree), "patients.features.create", false));
//! ```
//!
//! Evaluation rules:
//!
//! - A clinic owner is allowed immediately, even with no tree at all.
//! - An absent tree denies everything for non-owners.
//! - `enabled: false` on a node is absolute for the whole subtree; children
//!   are unreachable once a disabled ancestor is hit.
//! - An object node with no `enabled` key is enabled.
//! - A boolean leaf is final; paths cannot descend through it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::AccessResult;
use crate::context::Ownership;
use crate::decision::{AccessDecision, DenyReason};
use crate::error::AccessError;
use crate::scope::ViewScope;

// =============================================================================
// Tree Model
// =============================================================================

/// A node in the permission tree: a boolean leaf or a section object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionNode {
    /// Plain boolean leaf; the boolean is the decision.
    Leaf(bool),
    /// Section object with an optional enabled flag and child maps.
    Section(SectionNode),
}

/// A section-shaped node with nested child maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionNode {
    /// Explicit enable flag. Absent means enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Patient visibility scope tag on section-level nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_scope: Option<ViewScope>,

    /// Feature-level children.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub features: HashMap<String, PermissionNode>,

    /// Component-level children.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub components: HashMap<String, PermissionNode>,

    /// Tab-level children.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tabs: HashMap<String, PermissionNode>,
}

impl SectionNode {
    /// Returns `true` unless the node is explicitly disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// A tenant's full permission tree, keyed by top-level section name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionTree {
    /// Top-level sections.
    #[serde(flatten)]
    pub sections: HashMap<String, PermissionNode>,
}

impl PermissionTree {
    /// Parse a permission tree from its JSON document form.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or does not have
    /// the tree shape.
    pub fn from_json(json: &str) -> AccessResult<Self> {
        serde_json::from_str(json).map_err(|e| AccessError::invalid_permission_tree(e.to_string()))
    }

    /// Build a permission tree from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not have the tree shape.
    pub fn from_value(value: serde_json::Value) -> AccessResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| AccessError::invalid_permission_tree(e.to_string()))
    }

    /// Look up a top-level section node.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&PermissionNode> {
        self.sections.get(name)
    }

    /// The patient view scope configured on a section, if any.
    ///
    /// Used by callers to feed the view-scope evaluator with the scope the
    /// tenant configured for that part of the product.
    #[must_use]
    pub fn view_scope(&self, section: &str) -> Option<&ViewScope> {
        match self.sections.get(section)? {
            PermissionNode::Section(node) => node.view_scope.as_ref(),
            PermissionNode::Leaf(_) => None,
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluate a dot-separated permission path against a tree.
///
/// Owner override is applied first: a clinic owner is allowed regardless of
/// tree contents, including when `tree` is `None` or the path does not exist.
/// Tenant isolation is NOT this evaluator's concern; callers gate on tenant
/// before consulting feature permissions.
#[must_use]
pub fn evaluate_permission(
    tree: Option<&PermissionTree>,
    path: &str,
    actor: impl Ownership,
) -> AccessDecision {
    if actor.is_owner() {
        tracing::trace!(path, "owner override grants permission");
        return AccessDecision::Allow;
    }

    let Some(tree) = tree else {
        return deny(DenyReason::no_permissions());
    };

    if path.is_empty() {
        return deny(DenyReason::invalid_path(path));
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return deny(DenyReason::invalid_path(path));
    }

    let Some(first) = segments.first() else {
        return deny(DenyReason::invalid_path(path));
    };
    let Some(mut node) = tree.sections.get(*first) else {
        return deny(DenyReason::unknown_path(path));
    };
    let mut consumed = 1;

    loop {
        match node {
            PermissionNode::Leaf(allowed) => {
                if consumed < segments.len() {
                    // Cannot descend into a boolean leaf.
                    return deny(DenyReason::unknown_path(path));
                }
                return if *allowed {
                    AccessDecision::Allow
                } else {
                    deny(DenyReason::not_enabled(&segments[..consumed].join(".")))
                };
            }
            PermissionNode::Section(section) => {
                if !section.is_enabled() {
                    // Disabled ancestor short-circuits the whole subtree.
                    return deny(DenyReason::not_enabled(&segments[..consumed].join(".")));
                }
                let Some(container) = segments.get(consumed) else {
                    // All segments consumed on an enabled object node.
                    return AccessDecision::Allow;
                };
                let children = match *container {
                    "features" => &section.features,
                    "components" => &section.components,
                    "tabs" => &section.tabs,
                    _ => return deny(DenyReason::unknown_path(path)),
                };
                consumed += 1;
                let Some(key) = segments.get(consumed) else {
                    // Path ends on the container map itself; nothing at this
                    // level is disabled, so the walk succeeds.
                    return AccessDecision::Allow;
                };
                let Some(child) = children.get(*key) else {
                    return deny(DenyReason::unknown_path(path));
                };
                node = child;
                consumed += 1;
            }
        }
    }
}

/// Boolean projection of [`evaluate_permission`].
#[must_use]
pub fn has_permission(tree: Option<&PermissionTree>, path: &str, actor: impl Ownership) -> bool {
    evaluate_permission(tree, path, actor).is_allowed()
}

fn deny(reason: DenyReason) -> AccessDecision {
    tracing::debug!(code = %reason.code, message = %reason.message, "permission denied");
    AccessDecision::Deny(reason)
}

// =============================================================================
// Tests
// =============================================================================
