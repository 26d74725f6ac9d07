//! Plant catalog entries.
//!
//! A `PlantSpec` describes a species: how long it takes to mature, how far
//! apart it should be planted, and how it is watered and harvested. Specs are
//! immutable and shared between every cell they are planted in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag used to filter the plant library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantCategory {
    Vegetable,
    Herb,
    Flower,
}

impl PlantCategory {
    /// Tag string as stored and matched by `plants_by_category`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantCategory::Vegetable => "vegetable",
            PlantCategory::Herb => "herb",
            PlantCategory::Flower => "flower",
        }
    }

    /// Get all categories.
    pub fn all() -> &'static [PlantCategory] {
        &[
            PlantCategory::Vegetable,
            PlantCategory::Herb,
            PlantCategory::Flower,
        ]
    }
}

impl fmt::Display for PlantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PlantCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "vegetable" => Ok(PlantCategory::Vegetable),
            "herb" => Ok(PlantCategory::Herb),
            "flower" => Ok(PlantCategory::Flower),
            _ => Err(format!("Unknown plant category: {}", s)),
        }
    }
}

/// How a vegetable is picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestStyle {
    /// One harvest when the whole plant is mature
    #[default]
    Single,
    /// Repeated picking keeps the plant producing
    Continuous,
}

impl std::str::FromStr for HarvestStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(HarvestStyle::Single),
            "continuous" => Ok(HarvestStyle::Continuous),
            _ => Err(format!("Unknown harvest style: {}", s)),
        }
    }
}

/// Variant-specific traits of a plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum PlantKind {
    Vegetable {
        #[serde(default)]
        harvest_style: HarvestStyle,
    },
    Herb {
        #[serde(default)]
        perennial: bool,
    },
    Flower {
        bloom_color: String,
        #[serde(default = "default_attracts_pollinators")]
        attracts_pollinators: bool,
    },
}

fn default_attracts_pollinators() -> bool {
    true
}

/// Spacing in inches for well-known vegetables.
const VEGETABLE_SPACING: &[(&str, f64)] = &[
    ("lettuce", 6.0),
    ("tomato", 24.0),
    ("pepper", 18.0),
    ("carrot", 3.0),
    ("cucumber", 24.0),
    ("bean", 6.0),
    ("squash", 36.0),
];

const HERB_SPACING: &[(&str, f64)] = &[
    ("basil", 10.0),
    ("parsley", 8.0),
    ("cilantro", 6.0),
    ("oregano", 12.0),
    ("thyme", 8.0),
    ("rosemary", 18.0),
];

const FLOWER_SPACING: &[(&str, f64)] = &[
    ("marigold", 8.0),
    ("zinnia", 12.0),
    ("sunflower", 24.0),
    ("petunia", 10.0),
    ("cosmos", 18.0),
];

/// Vegetables that survive a light frost.
const FROST_TOLERANT_VEGETABLES: &[&str] = &["lettuce", "kale", "broccoli", "carrot"];

/// Herbs that survive a hard frost.
const FROST_HARDY_HERBS: &[&str] = &["oregano", "thyme", "sage", "chives"];

/// A species in the plant library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSpec {
    /// Unique identifier (e.g., "v1")
    pub id: String,

    /// Common name (e.g., "Tomato")
    pub common_name: String,

    /// Scientific name (e.g., "Solanum lycopersicum")
    pub scientific_name: String,

    /// Days from planting to expected harvest
    pub maturity_days: u32,

    /// Variant-specific traits
    #[serde(flatten)]
    pub kind: PlantKind,
}

impl PlantSpec {
    /// Create a plant spec from its parts.
    pub fn new(
        id: impl Into<String>,
        common_name: impl Into<String>,
        scientific_name: impl Into<String>,
        maturity_days: u32,
        kind: PlantKind,
    ) -> Self {
        Self {
            id: id.into(),
            common_name: common_name.into(),
            scientific_name: scientific_name.into(),
            maturity_days,
            kind,
        }
    }

    /// A single-harvest vegetable.
    pub fn vegetable(
        id: impl Into<String>,
        common_name: impl Into<String>,
        scientific_name: impl Into<String>,
        maturity_days: u32,
    ) -> Self {
        Self::new(
            id,
            common_name,
            scientific_name,
            maturity_days,
            PlantKind::Vegetable {
                harvest_style: HarvestStyle::Single,
            },
        )
    }

    /// An annual herb.
    pub fn herb(
        id: impl Into<String>,
        common_name: impl Into<String>,
        scientific_name: impl Into<String>,
        maturity_days: u32,
    ) -> Self {
        Self::new(
            id,
            common_name,
            scientific_name,
            maturity_days,
            PlantKind::Herb { perennial: false },
        )
    }

    /// A pollinator-friendly flower of the given bloom color.
    pub fn flower(
        id: impl Into<String>,
        common_name: impl Into<String>,
        scientific_name: impl Into<String>,
        maturity_days: u32,
        bloom_color: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            common_name,
            scientific_name,
            maturity_days,
            PlantKind::Flower {
                bloom_color: bloom_color.into(),
                attracts_pollinators: true,
            },
        )
    }

    /// Days from planting to expected harvest.
    pub fn maturity_days(&self) -> u32 {
        self.maturity_days
    }

    /// Category tag derived from the variant.
    pub fn category(&self) -> PlantCategory {
        match self.kind {
            PlantKind::Vegetable { .. } => PlantCategory::Vegetable,
            PlantKind::Herb { .. } => PlantCategory::Herb,
            PlantKind::Flower { .. } => PlantCategory::Flower,
        }
    }

    fn lookup_name(&self) -> String {
        self.common_name.to_lowercase()
    }

    /// Spacing between plants in inches.
    pub fn spacing_requirement(&self) -> f64 {
        let (table, default) = match self.kind {
            PlantKind::Vegetable { .. } => (VEGETABLE_SPACING, 12.0),
            PlantKind::Herb { .. } => (HERB_SPACING, 8.0),
            PlantKind::Flower { .. } => (FLOWER_SPACING, 12.0),
        };
        let name = self.lookup_name();
        table
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, spacing)| *spacing)
            .unwrap_or(default)
    }

    /// Watering guidance for this kind of plant.
    pub fn water_frequency(&self) -> &'static str {
        match self.kind {
            PlantKind::Vegetable { .. } => "Daily to every other day, keep soil consistently moist",
            PlantKind::Herb { .. } => "Every 2-3 days, allow soil to dry slightly between watering",
            PlantKind::Flower { .. } => "Daily during blooming season, keep evenly moist",
        }
    }

    /// How to harvest this plant.
    pub fn harvest_method(&self) -> &'static str {
        match self.kind {
            PlantKind::Vegetable {
                harvest_style: HarvestStyle::Continuous,
            } => "Cut or pick regularly to encourage more production",
            PlantKind::Vegetable {
                harvest_style: HarvestStyle::Single,
            } => "Single harvest when fully mature",
            PlantKind::Herb { .. } => "Cut stems regularly, leaving 1/3 of plant to continue growing",
            PlantKind::Flower { .. } => {
                "Cut stems in early morning for longest vase life, deadhead spent blooms"
            }
        }
    }

    /// Whether a frost will damage this plant.
    pub fn is_frost_sensitive(&self) -> bool {
        let name = self.lookup_name();
        match self.kind {
            PlantKind::Vegetable { .. } => !FROST_TOLERANT_VEGETABLES.contains(&name.as_str()),
            PlantKind::Herb { .. } => !FROST_HARDY_HERBS.contains(&name.as_str()),
            PlantKind::Flower { .. } => true,
        }
    }

    /// Pollinator notes for flowers; `None` for other categories.
    pub fn pollinator_benefits(&self) -> Option<String> {
        match self.kind {
            PlantKind::Flower {
                attracts_pollinators: true,
                ..
            } => Some(format!(
                "{} attracts bees and butterflies, supporting garden ecosystem",
                self.common_name
            )),
            PlantKind::Flower {
                attracts_pollinators: false,
                ..
            } => Some(format!(
                "{} is ornamental but less attractive to pollinators",
                self.common_name
            )),
            _ => None,
        }
    }
}

impl fmt::Display for PlantSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.common_name, self.scientific_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tomato() -> PlantSpec {
        PlantSpec::vegetable("v1", "Tomato", "Solanum lycopersicum", 75)
    }

    fn basil() -> PlantSpec {
        PlantSpec::herb("h1", "Basil", "Ocimum basilicum", 21)
    }

    fn marigold() -> PlantSpec {
        PlantSpec::flower("f1", "Marigold", "Tagetes", 45, "orange")
    }

    #[test]
    fn test_category_from_variant() {
        assert_eq!(tomato().category(), PlantCategory::Vegetable);
        assert_eq!(basil().category(), PlantCategory::Herb);
        assert_eq!(marigold().category(), PlantCategory::Flower);
    }

    #[test]
    fn test_category_from_str_is_case_sensitive() {
        assert_eq!(
            "vegetable".parse::<PlantCategory>().unwrap(),
            PlantCategory::Vegetable
        );
        assert_eq!("herb".parse::<PlantCategory>().unwrap(), PlantCategory::Herb);
        assert!("Herb".parse::<PlantCategory>().is_err());
        assert!("shrub".parse::<PlantCategory>().is_err());
    }

    #[test]
    fn test_spacing_lookup() {
        assert_eq!(tomato().spacing_requirement(), 24.0);
        assert_eq!(basil().spacing_requirement(), 10.0);
        assert_eq!(marigold().spacing_requirement(), 8.0);
    }

    #[test]
    fn test_spacing_defaults_for_unknown_names() {
        let okra = PlantSpec::vegetable("v9", "Okra", "Abelmoschus esculentus", 60);
        let dill = PlantSpec::herb("h9", "Dill", "Anethum graveolens", 40);
        let aster = PlantSpec::flower("f9", "Aster", "Aster amellus", 90, "purple");
        assert_eq!(okra.spacing_requirement(), 12.0);
        assert_eq!(dill.spacing_requirement(), 8.0);
        assert_eq!(aster.spacing_requirement(), 12.0);
    }

    #[test]
    fn test_spacing_lookup_ignores_case() {
        let lettuce = PlantSpec::vegetable("v2", "LETTUCE", "Lactuca sativa", 30);
        assert_eq!(lettuce.spacing_requirement(), 6.0);
    }

    #[test]
    fn test_frost_sensitivity() {
        assert!(tomato().is_frost_sensitive());
        assert!(!PlantSpec::vegetable("v3", "Kale", "Brassica oleracea", 55).is_frost_sensitive());
        assert!(basil().is_frost_sensitive());
        assert!(!PlantSpec::herb("h2", "Thyme", "Thymus vulgaris", 70).is_frost_sensitive());
        assert!(marigold().is_frost_sensitive());
    }

    #[test]
    fn test_watering_differs_by_category() {
        assert_ne!(tomato().water_frequency(), basil().water_frequency());
        assert_ne!(basil().water_frequency(), marigold().water_frequency());
    }

    #[test]
    fn test_harvest_method() {
        let continuous = PlantSpec::new(
            "v1",
            "Tomato",
            "Solanum lycopersicum",
            75,
            PlantKind::Vegetable {
                harvest_style: HarvestStyle::Continuous,
            },
        );
        assert!(continuous.harvest_method().contains("regularly"));
        assert!(tomato().harvest_method().contains("Single harvest"));
        assert!(basil().harvest_method().contains("Cut stems"));
        assert!(marigold().harvest_method().contains("Cut stems"));
    }

    #[test]
    fn test_pollinator_benefits() {
        assert!(marigold().pollinator_benefits().unwrap().contains("bees"));
        let shy = PlantSpec::new(
            "f2",
            "Petunia",
            "Petunia hybrida",
            60,
            PlantKind::Flower {
                bloom_color: "pink".to_string(),
                attracts_pollinators: false,
            },
        );
        assert!(shy.pollinator_benefits().unwrap().contains("ornamental"));
        assert!(tomato().pollinator_benefits().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(tomato().to_string(), "Tomato (Solanum lycopersicum)");
    }

    #[test]
    fn test_serialization_carries_category_tag() {
        let json = serde_json::to_value(marigold()).unwrap();
        assert_eq!(json["category"], "flower");
        assert_eq!(json["bloom_color"], "orange");

        let parsed: PlantSpec = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, marigold());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id":"v1","common_name":"Bean","scientific_name":"Phaseolus vulgaris","maturity_days":55,"category":"vegetable"}"#;
        let bean: PlantSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            bean.kind,
            PlantKind::Vegetable {
                harvest_style: HarvestStyle::Single
            }
        );
    }
}
