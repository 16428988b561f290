//! Error types for regions and map configuration.
//!
//! Two very different kinds of failure live here:
//!
//! - [`RegionError`] is a contract violation: asking a region for something its
//!   geometry cannot provide. It is fatal to the calling operation only.
//! - [`ConfigError`] describes a bad map declaration. It is collected as a
//!   diagnostic at load time and never surfaces while a match is running.

use thiserror::Error;

use crate::node::SourcePosition;

/// Unsupported operation on a region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    /// The region's geometry does not support the requested operation.
    #[error("{operation} is unsupported for {reason} region")]
    UnsupportedGeometry {
        /// Operation that was attempted (`blocks`, `random_point`)
        operation: &'static str,
        /// Why the region cannot provide it (`unbounded`, `non-randomizable`)
        reason: &'static str,
    },
}

/// A configuration problem found while parsing a map document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required attribute was absent.
    #[error("missing attribute `{attribute}`{}", at(.position))]
    MissingAttribute {
        /// Attribute name
        attribute: String,
        /// Where the declaration starts
        position: Option<SourcePosition>,
    },

    /// An attribute was present but could not be interpreted.
    #[error("invalid value `{value}` for attribute `{attribute}`{}", at(.position))]
    InvalidAttribute {
        /// Attribute name
        attribute: String,
        /// Raw attribute value
        value: String,
        /// Where the declaration starts
        position: Option<SourcePosition>,
    },

    /// A material token did not name a known material or had a bad variant.
    #[error("\"{token}\" cannot be mapped to a material")]
    InvalidMaterial {
        /// The offending token
        token: String,
    },

    /// A proximity metric name was not recognised.
    #[error("unknown proximity metric `{name}`{}", at(.position))]
    UnknownProximityMetric {
        /// Name as written
        name: String,
        /// Where the declaration starts
        position: Option<SourcePosition>,
    },

    /// A region was required to be bounded but is not.
    #[error("region for {owner} must be a bounded region{}", at(.position))]
    UnboundedRegion {
        /// What needed the region (`core`, `destroyable`)
        owner: String,
        /// Where the declaration starts
        position: Option<SourcePosition>,
    },

    /// No region was given, or a reference named an unknown region.
    #[error("no region {}specified{}", referenced(.id), at(.position))]
    UnknownRegion {
        /// Referenced id, if any
        id: Option<String>,
        /// Where the declaration starts
        position: Option<SourcePosition>,
    },

    /// Two named regions share an id.
    #[error("region id `{id}` is already defined{}", at(.position))]
    DuplicateRegion {
        /// The duplicated id
        id: String,
        /// Where the second declaration starts
        position: Option<SourcePosition>,
    },

    /// A team reference did not match any team in the match.
    #[error("invalid team `{id}`{}", at(.position))]
    UnknownTeam {
        /// Referenced team id
        id: String,
        /// Where the declaration starts
        position: Option<SourcePosition>,
    },

    /// An element that must carry text was empty.
    #[error("no text specified for `{element}`{}", at(.position))]
    MissingText {
        /// Element name
        element: String,
        /// Where the element starts
        position: Option<SourcePosition>,
    },

    /// An element name was not recognised where a specific kind was expected.
    #[error("unknown element `{element}`{}", at(.position))]
    UnknownElement {
        /// Element name
        element: String,
        /// Where the element starts
        position: Option<SourcePosition>,
    },
}

impl ConfigError {
    /// Source position of the offending declaration, when known.
    #[must_use]
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            Self::MissingAttribute { position, .. }
            | Self::InvalidAttribute { position, .. }
            | Self::UnknownProximityMetric { position, .. }
            | Self::UnboundedRegion { position, .. }
            | Self::UnknownRegion { position, .. }
            | Self::DuplicateRegion { position, .. }
            | Self::UnknownTeam { position, .. }
            | Self::MissingText { position, .. }
            | Self::UnknownElement { position, .. } => *position,
            Self::InvalidMaterial { .. } => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn at(position: &Option<SourcePosition>) -> String {
    position.map_or_else(String::new, |p| format!(" at {p}"))
}

#[allow(clippy::ref_option)]
fn referenced(id: &Option<String>) -> String {
    id.as_deref().map_or_else(String::new, |id| format!("`{id}` "))
}
