//! Parsing of attribute values and region declarations.
//!
//! [`AttributeScope`] resolves attributes with parent fallback and converts
//! them into typed values, producing [`ConfigError`]s that point back at the
//! declaration. [`RegionParser`] turns region elements into [`Region`]s.
//!
//! # Region elements
//!
//! | Element        | Meaning                                                  |
//! |----------------|----------------------------------------------------------|
//! | `<cuboid>`     | `min` and `max` corners, `x,y,z` each (`oo` = infinity)  |
//! | `<union>`      | any child                                                |
//! | `<intersect>`  | every child                                              |
//! | `<complement>` | first child minus the remaining children                 |
//! | `<negative>`   | outside the union of the children                        |
//! | `<everywhere>` | every point                                              |
//! | `<nowhere>`    | no point                                                 |
//! | `<region>`     | reference to a named region via `id`                     |

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::DVec3;

use crate::error::ConfigError;
use crate::material::MaterialPattern;
use crate::node::{Node, SourcePosition};
use crate::region::Region;
use crate::Bounds;

/// Parse an `x,y,z` vector. Components may be `oo`, `+oo` or `-oo` for infinity.
#[must_use]
pub fn parse_vector(input: &str) -> Option<DVec3> {
    let mut parts = input.split(',').map(parse_coordinate);
    let x = parts.next()??;
    let y = parts.next()??;
    let z = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    Some(DVec3::new(x, y, z))
}

fn parse_coordinate(input: &str) -> Option<f64> {
    match input.trim() {
        "oo" | "+oo" => Some(f64::INFINITY),
        "-oo" => Some(f64::NEG_INFINITY),
        other => other.parse::<f64>().ok().filter(|v| !v.is_nan()),
    }
}

/// Parse a boolean (`true`/`false`, `yes`/`no`, `on`/`off`, `allow`/`deny`).
#[must_use]
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "allow" => Some(true),
        "false" | "no" | "off" | "deny" => Some(false),
        _ => None,
    }
}

/// Parse an integer; `oo` stands for the largest value.
#[must_use]
pub fn parse_int(input: &str) -> Option<i32> {
    match input.trim() {
        "oo" | "+oo" => Some(i32::MAX),
        "-oo" => Some(i32::MIN),
        other => other.parse().ok(),
    }
}

/// Parse a percentage in `0..=100`, with or without a trailing `%`.
#[must_use]
pub fn parse_percentage(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=100.0).contains(v))
}

/// Attribute lookup over an element and its ancestors.
///
/// Nodes are ordered innermost first. Every typed accessor reports errors at
/// the innermost node's position.
#[derive(Clone)]
pub struct AttributeScope<'a> {
    nodes: Vec<&'a dyn Node>,
}

impl<'a> AttributeScope<'a> {
    /// Create a scope from innermost to outermost node.
    #[must_use]
    pub fn new(nodes: &[&'a dyn Node]) -> Self {
        Self {
            nodes: nodes.to_vec(),
        }
    }

    /// The nodes in lookup order.
    #[must_use]
    pub fn nodes(&self) -> &[&'a dyn Node] {
        &self.nodes
    }

    /// Position of the innermost node.
    #[must_use]
    pub fn position(&self) -> Option<SourcePosition> {
        self.nodes.first().and_then(|n| n.position())
    }

    /// Raw attribute value from the first node that carries it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        crate::node::first_attribute(name, &self.nodes)
    }

    /// Raw value of the first attribute present among several spellings.
    #[must_use]
    pub fn get_any(&self, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Attribute that must be present.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingAttribute`] if no node carries it.
    pub fn required(&self, name: &str) -> Result<&'a str, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::MissingAttribute {
            attribute: name.to_string(),
            position: self.position(),
        })
    }

    /// Error for an attribute whose value could not be interpreted.
    #[must_use]
    pub fn invalid(&self, name: &str, value: &str) -> ConfigError {
        ConfigError::InvalidAttribute {
            attribute: name.to_string(),
            value: value.to_string(),
            position: self.position(),
        }
    }

    /// Convert an optional attribute, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidAttribute`] if `convert` rejects the value.
    pub fn parse_or<T>(
        &self,
        name: &str,
        default: T,
        convert: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, ConfigError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => convert(value).ok_or_else(|| self.invalid(name, value)),
        }
    }

    /// Boolean attribute with a default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidAttribute`] for anything but a boolean word.
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, ConfigError> {
        self.parse_or(name, default, parse_bool)
    }

    /// Integer attribute with a default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidAttribute`] if the value is not an integer.
    pub fn int_or(&self, name: &str, default: i32) -> Result<i32, ConfigError> {
        self.parse_or(name, default, parse_int)
    }

    /// Percentage attribute with a default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidAttribute`] if the value is not in `0..=100`.
    pub fn percentage_or(&self, name: &str, default: f64) -> Result<f64, ConfigError> {
        self.parse_or(name, default, parse_percentage)
    }

    /// Material pattern from the first present spelling, if any.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidMaterial`] naming the bad token.
    pub fn material_pattern(&self, names: &[&str]) -> Result<Option<MaterialPattern>, ConfigError> {
        self.get_any(names).map(MaterialPattern::parse).transpose()
    }
}

/// Builds regions from declarations, resolving references to named regions.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use glam::DVec3;
/// use lattice::{Element, RegionParser};
///
/// let named = BTreeMap::new();
/// let parser = RegionParser::new(&named);
/// let region = parser
///     .parse(&Element::new("cuboid").attr("min", "2,2,2").attr("max", "0,0,0"))
///     .unwrap();
/// assert!(region.contains(DVec3::splat(1.0)));
/// ```
pub struct RegionParser<'r> {
    named: &'r BTreeMap<String, Arc<Region>>,
}

impl<'r> RegionParser<'r> {
    /// Element names that declare a region.
    pub const ELEMENTS: &'static [&'static str] = &[
        "cuboid",
        "union",
        "intersect",
        "complement",
        "negative",
        "everywhere",
        "nowhere",
        "region",
    ];

    /// Create a parser that resolves references against `named`.
    #[must_use]
    pub fn new(named: &'r BTreeMap<String, Arc<Region>>) -> Self {
        Self { named }
    }

    /// Whether an element name declares a region.
    #[must_use]
    pub fn is_region_element(name: &str) -> bool {
        Self::ELEMENTS.contains(&name)
    }

    /// Parse one region element.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] found in the element or its children.
    pub fn parse(&self, node: &dyn Node) -> Result<Arc<Region>, ConfigError> {
        let region = match node.name() {
            "cuboid" => Region::cuboid(Self::parse_cuboid(node)?),
            "union" => Region::union(self.parse_children(node)?),
            "intersect" => Region::intersect(self.parse_children(node)?),
            "complement" => {
                let mut children = self.parse_children(node)?.into_iter();
                let base = children.next().ok_or(ConfigError::UnknownRegion {
                    id: None,
                    position: node.position(),
                })?;
                Region::complement(base, children.collect())
            }
            "negative" => {
                let mut children = self.parse_children(node)?;
                let inner = if children.len() == 1 {
                    children.remove(0)
                } else {
                    Arc::new(Region::union(children))
                };
                Region::negative(inner)
            }
            "everywhere" => Region::everywhere(),
            "nowhere" => Region::nowhere(),
            "region" => {
                let id = node.attribute("id").ok_or_else(|| ConfigError::MissingAttribute {
                    attribute: "id".into(),
                    position: node.position(),
                })?;
                return self.lookup(id, node.position());
            }
            other => {
                return Err(ConfigError::UnknownElement {
                    element: other.to_string(),
                    position: node.position(),
                })
            }
        };
        Ok(Arc::new(region))
    }

    /// Parse the `min` and `max` attributes of a cuboid element.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingAttribute`] or [`ConfigError::InvalidAttribute`]
    /// naming the corner.
    pub fn parse_cuboid(node: &dyn Node) -> Result<Bounds, ConfigError> {
        let scope = AttributeScope::new(&[node]);
        let min = scope.required("min")?;
        let min = parse_vector(min).ok_or_else(|| scope.invalid("min", min))?;
        let max = scope.required("max")?;
        let max = parse_vector(max).ok_or_else(|| scope.invalid("max", max))?;
        Ok(Bounds::between(min, max))
    }

    /// Resolve the region an objective declaration refers to.
    ///
    /// Each node in the scope is tried innermost first: a `region` attribute
    /// names a registered region, otherwise the first region child element is
    /// parsed inline.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownRegion`] if nothing declares a region, or the
    /// parse error of the declaration that was found.
    pub fn resolve(&self, scope: &AttributeScope<'_>) -> Result<Arc<Region>, ConfigError> {
        for node in scope.nodes() {
            if let Some(id) = node.attribute("region") {
                return self.lookup(id, scope.position());
            }
            let inline = node
                .children()
                .into_iter()
                .find(|child| Self::is_region_element(child.name()));
            if let Some(child) = inline {
                return self.parse(child);
            }
        }
        Err(ConfigError::UnknownRegion {
            id: None,
            position: scope.position(),
        })
    }

    fn lookup(&self, id: &str, position: Option<SourcePosition>) -> Result<Arc<Region>, ConfigError> {
        self.named
            .get(id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownRegion {
                id: Some(id.to_string()),
                position,
            })
    }

    fn parse_children(&self, node: &dyn Node) -> Result<Vec<Arc<Region>>, ConfigError> {
        node.children().into_iter().map(|c| self.parse(c)).collect()
    }
}
