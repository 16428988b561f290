//! Materials and material patterns.
//!
//! A [`Material`] names a block or item type. Together with a small variant
//! number (colour, wood species, ...) it forms a [`MaterialData`], which is how
//! every block in the world is classified.
//!
//! A [`MaterialPattern`] is a predicate over `(type, variant)` pairs. Each entry
//! matches one type and either one variant or any variant. An empty pattern
//! matches everything and is used to express "no restriction".
//!
//! # Grammar
//!
//! ```text
//! pattern := single (';' single)*
//! single  := type [':' variant]
//! type    := material name (case-insensitive, spaces/hyphens allowed) | numeric id
//! variant := integer in 0..=255, or -1 for "any"
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

macro_rules! materials {
    ($($variant:ident = $id:literal => $name:literal,)*) => {
        /// A block or item type.
        ///
        /// Discriminants are the legacy numeric ids, which map documents may use
        /// in place of names.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u16)]
        #[allow(missing_docs)]
        pub enum Material {
            $($variant = $id,)*
        }

        impl Material {
            /// Get all materials as a slice.
            #[must_use]
            pub const fn all() -> &'static [Material] {
                &[$(Material::$variant,)*]
            }

            /// Canonical upper-case name (e.g. `STATIONARY_LAVA`).
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Material::$variant => $name,)*
                }
            }
        }
    };
}

materials! {
    Air = 0 => "AIR",
    Stone = 1 => "STONE",
    Grass = 2 => "GRASS",
    Dirt = 3 => "DIRT",
    Cobblestone = 4 => "COBBLESTONE",
    Wood = 5 => "WOOD",
    Sapling = 6 => "SAPLING",
    Bedrock = 7 => "BEDROCK",
    Water = 8 => "WATER",
    StationaryWater = 9 => "STATIONARY_WATER",
    Lava = 10 => "LAVA",
    StationaryLava = 11 => "STATIONARY_LAVA",
    Sand = 12 => "SAND",
    Gravel = 13 => "GRAVEL",
    GoldOre = 14 => "GOLD_ORE",
    IronOre = 15 => "IRON_ORE",
    CoalOre = 16 => "COAL_ORE",
    Log = 17 => "LOG",
    Leaves = 18 => "LEAVES",
    Sponge = 19 => "SPONGE",
    Glass = 20 => "GLASS",
    LapisOre = 21 => "LAPIS_ORE",
    LapisBlock = 22 => "LAPIS_BLOCK",
    Sandstone = 24 => "SANDSTONE",
    Wool = 35 => "WOOL",
    GoldBlock = 41 => "GOLD_BLOCK",
    IronBlock = 42 => "IRON_BLOCK",
    DoubleStep = 43 => "DOUBLE_STEP",
    Step = 44 => "STEP",
    Brick = 45 => "BRICK",
    Tnt = 46 => "TNT",
    Bookshelf = 47 => "BOOKSHELF",
    MossyCobblestone = 48 => "MOSSY_COBBLESTONE",
    Obsidian = 49 => "OBSIDIAN",
    Torch = 50 => "TORCH",
    Fire = 51 => "FIRE",
    Chest = 54 => "CHEST",
    DiamondOre = 56 => "DIAMOND_ORE",
    DiamondBlock = 57 => "DIAMOND_BLOCK",
    Workbench = 58 => "WORKBENCH",
    Ladder = 65 => "LADDER",
    Ice = 79 => "ICE",
    SnowBlock = 80 => "SNOW_BLOCK",
    Clay = 82 => "CLAY",
    Fence = 85 => "FENCE",
    Netherrack = 87 => "NETHERRACK",
    SoulSand = 88 => "SOUL_SAND",
    Glowstone = 89 => "GLOWSTONE",
    StainedGlass = 95 => "STAINED_GLASS",
    SmoothBrick = 98 => "SMOOTH_BRICK",
    IronFence = 101 => "IRON_FENCE",
    ThinGlass = 102 => "THIN_GLASS",
    NetherBrick = 112 => "NETHER_BRICK",
    EnderStone = 121 => "ENDER_STONE",
    EmeraldOre = 129 => "EMERALD_ORE",
    EmeraldBlock = 133 => "EMERALD_BLOCK",
    Beacon = 138 => "BEACON",
    RedstoneBlock = 152 => "REDSTONE_BLOCK",
    QuartzBlock = 155 => "QUARTZ_BLOCK",
    StainedClay = 159 => "STAINED_CLAY",
    StainedGlassPane = 160 => "STAINED_GLASS_PANE",
    HardClay = 172 => "HARD_CLAY",
    CoalBlock = 173 => "COAL_BLOCK",
    PackedIce = 174 => "PACKED_ICE",
    IronSword = 267 => "IRON_SWORD",
    Bow = 261 => "BOW",
    Arrow = 262 => "ARROW",
    Bucket = 325 => "BUCKET",
    WaterBucket = 326 => "WATER_BUCKET",
    LavaBucket = 327 => "LAVA_BUCKET",
    Snowball = 332 => "SNOW_BALL",
    Bone = 352 => "BONE",
    Seeds = 295 => "SEEDS",
    RottenFlesh = 367 => "ROTTEN_FLESH",
    Web = 30 => "WEB",
    Sulphur = 289 => "SULPHUR",
    Feather = 288 => "FEATHER",
    GoldenApple = 322 => "GOLDEN_APPLE",
}

impl Material {
    /// Legacy numeric id of this material.
    #[must_use]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Look up a material by its legacy numeric id.
    #[must_use]
    pub fn from_id(id: u16) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.id() == id)
    }

    /// Resolve a material from a name or numeric id as written in a map.
    ///
    /// Names are case-insensitive; runs of whitespace and hyphens are treated
    /// as underscores, and other punctuation is ignored, so `"Stationary Lava"`,
    /// `"stationary-lava"` and `"STATIONARY_LAVA"` all resolve identically.
    #[must_use]
    pub fn match_name(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(id) = trimmed.parse::<u16>() {
            return Self::from_id(id);
        }
        let technical = technical_name(trimmed);
        Self::all().iter().copied().find(|m| m.name() == technical)
    }

    /// Flowing or stationary lava.
    #[must_use]
    pub const fn is_lava(self) -> bool {
        matches!(self, Material::Lava | Material::StationaryLava)
    }

    /// Empty space.
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Material::Air)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Air
    }
}

/// Normalise a free-form name into `UPPER_SNAKE` form.
///
/// Shared with other enum-like attributes (e.g. proximity metrics) so that every
/// name in a map document follows the same spelling rules.
#[must_use]
pub fn technical_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;
    for c in input.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = !out.is_empty();
        } else if c.is_alphanumeric() {
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.extend(c.to_uppercase());
        }
    }
    out
}

/// A concrete block or item state: a type plus its variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialData {
    /// Block or item type
    pub material: Material,
    /// Variant (colour, species, ...)
    pub data: u8,
}

impl MaterialData {
    /// Empty space.
    pub const AIR: Self = Self::new(Material::Air, 0);

    /// Create material data.
    #[must_use]
    pub const fn new(material: Material, data: u8) -> Self {
        Self { material, data }
    }
}

impl From<Material> for MaterialData {
    fn from(material: Material) -> Self {
        Self::new(material, 0)
    }
}

impl fmt::Display for MaterialData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.material, self.data)
    }
}

/// One entry of a [`MaterialPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Type to match
    pub material: Material,
    /// Variant to match, or `None` for any variant
    pub variant: Option<u8>,
}

impl MaterialEntry {
    /// Entry matching every variant of `material`.
    #[must_use]
    pub const fn any(material: Material) -> Self {
        Self {
            material,
            variant: None,
        }
    }

    /// Entry matching exactly one variant of `material`.
    #[must_use]
    pub const fn exact(material: Material, variant: u8) -> Self {
        Self {
            material,
            variant: Some(variant),
        }
    }

    /// Whether this entry matches the given type and variant.
    #[must_use]
    pub fn matches(&self, material: Material, data: u8) -> bool {
        self.material == material && self.variant.map_or(true, |v| v == data)
    }

    /// Parse a single `type[:variant]` token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaterial`] naming the offending token if the
    /// type is unknown or the variant is not an integer in `-1..=255`.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let invalid = |token: &str| ConfigError::InvalidMaterial {
            token: token.trim().to_string(),
        };
        match input.split_once(':') {
            Some((name, variant)) => {
                let material = Material::match_name(name).ok_or_else(|| invalid(name))?;
                let variant = match variant.trim().parse::<i32>() {
                    Ok(-1) => None,
                    Ok(v) => Some(u8::try_from(v).map_err(|_| invalid(input))?),
                    Err(_) => return Err(invalid(input)),
                };
                Ok(Self { material, variant })
            }
            None => Material::match_name(input)
                .map(Self::any)
                .ok_or_else(|| invalid(input)),
        }
    }
}

impl fmt::Display for MaterialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            Some(v) => write!(f, "{}:{v}", self.material),
            None => write!(f, "{}", self.material),
        }
    }
}

/// Ordered predicate over `(type, variant)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialPattern {
    entries: Vec<MaterialEntry>,
}

impl MaterialPattern {
    /// Create an empty pattern (matches everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pattern matching every variant of one material.
    #[must_use]
    pub fn single(material: Material) -> Self {
        Self {
            entries: vec![MaterialEntry::any(material)],
        }
    }

    /// Pattern matching exactly one type and variant.
    #[must_use]
    pub fn exact(material: Material, variant: u8) -> Self {
        Self {
            entries: vec![MaterialEntry::exact(material, variant)],
        }
    }

    /// Append an entry.
    pub fn add(&mut self, entry: MaterialEntry) {
        self.entries.push(entry);
    }

    /// Append every entry of `other`, preserving its order.
    pub fn extend(&mut self, other: &MaterialPattern) {
        self.entries.extend_from_slice(&other.entries);
    }

    /// The entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[MaterialEntry] {
        &self.entries
    }

    /// Whether the pattern has no entries (and therefore matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a type and variant are matched by this pattern.
    #[must_use]
    pub fn contains(&self, material: Material, data: u8) -> bool {
        self.entries.is_empty() || self.entries.iter().any(|e| e.matches(material, data))
    }

    /// Whether a block or item state is matched by this pattern.
    #[must_use]
    pub fn matches(&self, data: MaterialData) -> bool {
        self.contains(data.material, data.data)
    }

    /// Parse a `;`-separated list of single patterns.
    ///
    /// Empty segments between separators are ignored; a string with no
    /// segments at all is an error rather than an open pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaterial`] for the first bad token.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let entries = input
            .split(';')
            .filter(|segment| !segment.trim().is_empty())
            .map(MaterialEntry::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if entries.is_empty() {
            return Err(ConfigError::InvalidMaterial {
                token: input.trim().to_string(),
            });
        }
        Ok(Self { entries })
    }
}

impl FromStr for MaterialPattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<MaterialEntry> for MaterialPattern {
    fn from_iter<T: IntoIterator<Item = MaterialEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for MaterialPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod material_tests {
        use super::*;

        #[test]
        fn ids_are_unique() {
            let mut ids: Vec<u16> = Material::all().iter().map(|m| m.id()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), Material::all().len());
        }

        #[test]
        fn match_name_is_lenient() {
            assert_eq!(Material::match_name("obsidian"), Some(Material::Obsidian));
            assert_eq!(
                Material::match_name("  Stationary Lava "),
                Some(Material::StationaryLava)
            );
            assert_eq!(Material::match_name("gold-block"), Some(Material::GoldBlock));
            assert_eq!(Material::match_name("35"), Some(Material::Wool));
            assert_eq!(Material::match_name("unobtainium"), None);
            assert_eq!(Material::match_name(""), None);
        }

        #[test]
        fn classification() {
            assert!(Material::Lava.is_lava());
            assert!(Material::StationaryLava.is_lava());
            assert!(!Material::Water.is_lava());
            assert!(Material::Air.is_air());
        }
    }

    mod pattern_tests {
        use super::*;

        #[test]
        fn parse_one_entry_without_variant() {
            let pattern = MaterialPattern::parse("STONE").unwrap();
            assert_eq!(pattern.entries(), &[MaterialEntry::any(Material::Stone)]);
        }

        #[test]
        fn parse_one_entry_with_variant() {
            let pattern = MaterialPattern::parse("STONE:1").unwrap();
            assert_eq!(pattern.entries(), &[MaterialEntry::exact(Material::Stone, 1)]);
        }

        #[test]
        fn parse_list_keeps_order() {
            let pattern = MaterialPattern::parse("STONE:1;WOOL:14").unwrap();
            assert_eq!(
                pattern.entries(),
                &[
                    MaterialEntry::exact(Material::Stone, 1),
                    MaterialEntry::exact(Material::Wool, 14),
                ]
            );
        }

        #[test]
        fn parse_minus_one_is_any() {
            let pattern = MaterialPattern::parse("wool:-1").unwrap();
            assert_eq!(pattern.entries(), &[MaterialEntry::any(Material::Wool)]);
        }

        #[test]
        fn parse_errors_name_token() {
            assert_eq!(
                MaterialPattern::parse("stone;kryptonite"),
                Err(ConfigError::InvalidMaterial {
                    token: "kryptonite".into()
                })
            );
            assert_eq!(
                MaterialPattern::parse("wool:red"),
                Err(ConfigError::InvalidMaterial {
                    token: "wool:red".into()
                })
            );
            assert!(MaterialPattern::parse("wool:256").is_err());
            assert!(MaterialPattern::parse("  ").is_err());
        }

        #[test]
        fn trailing_separator_is_ignored() {
            let pattern = MaterialPattern::parse("stone;").unwrap();
            assert_eq!(pattern.entries().len(), 1);
        }

        #[test]
        fn empty_pattern_matches_everything() {
            let pattern = MaterialPattern::new();
            assert!(pattern.contains(Material::Bedrock, 3));
            assert!(pattern.matches(MaterialData::AIR));
        }

        #[test]
        fn extend_is_union() {
            let mut pattern = MaterialPattern::single(Material::Stone);
            pattern.extend(&MaterialPattern::exact(Material::Wool, 14));
            assert!(pattern.contains(Material::Stone, 7));
            assert!(pattern.contains(Material::Wool, 14));
            assert!(!pattern.contains(Material::Wool, 13));
        }

        #[test]
        fn display_round_trips() {
            let pattern = MaterialPattern::parse("stone:1; wool").unwrap();
            assert_eq!(pattern.to_string(), "STONE:1;WOOL");
            assert_eq!(pattern.to_string().parse::<MaterialPattern>().unwrap(), pattern);
        }
    }

    fn any_material() -> impl Strategy<Value = Material> {
        proptest::sample::select(Material::all())
    }

    fn any_entry() -> impl Strategy<Value = MaterialEntry> {
        (any_material(), proptest::option::of(any::<u8>()))
            .prop_map(|(material, variant)| MaterialEntry { material, variant })
    }

    proptest! {
        #[test]
        fn contains_matches_definition(
            entries in proptest::collection::vec(any_entry(), 0..6),
            material in any_material(),
            data in any::<u8>(),
        ) {
            let pattern: MaterialPattern = entries.iter().copied().collect();
            let expected = entries.is_empty()
                || entries.iter().any(|e| e.material == material
                    && (e.variant.is_none() || e.variant == Some(data)));
            prop_assert_eq!(pattern.contains(material, data), expected);
        }

        #[test]
        fn names_resolve_to_themselves(material in any_material()) {
            prop_assert_eq!(Material::match_name(material.name()), Some(material));
            prop_assert_eq!(Material::match_name(&material.name().to_lowercase()), Some(material));
        }
    }
}
