//! Static knowledge base for okra leaf diseases.
//!
//! Everything the bot knows without asking a model lives here: the seven
//! class labels the vision model predicts, per-disease keyword vocabularies
//! for text matching, authored progression timelines, and curated resource
//! links. The data is fixed at compile time; updating it is a code change,
//! which keeps the bot's claims reviewable.

/// Labels in vision-model output order. Index 3 is the healthy sentinel.
pub const CLASS_LABELS: [&str; 7] = [
    "Alternaria Leaf Spot",
    "Cercospora Leaf Spot",
    "Downy Mildew",
    "Healthy",
    "Leaf Curl Virus",
    "Phyllosticta Leaf Spot",
    "Bhendi Yellow Vein Mosaic Disease",
];

/// Label the vision model uses for a leaf without findings.
pub const HEALTHY: &str = "Healthy";

/// Substitute label for class indices outside [`CLASS_LABELS`].
pub const UNKNOWN_DISEASE: &str = "Unknown Disease";

/// One entry of the disease catalog.
pub struct DiseaseProfile {
    pub name: &'static str,
    /// Trigger substrings for text matching, most specific first.
    pub keywords: &'static [&'static str],
    /// Authored progression data. `None` falls back to [`DEFAULT_TIMELINE`].
    pub timeline: Option<Timeline>,
    pub resource_link: Option<&'static str>,
}

/// Progression stages and factors for one disease.
pub struct Timeline {
    pub early: &'static str,
    pub middle: &'static str,
    pub late: &'static str,
    pub critical: &'static str,
    pub speed_factors: &'static [&'static str],
    pub slow_factors: &'static [&'static str],
    pub special_notes: &'static [&'static str],
}

/// Fallback timeline for labels without authored data.
pub static DEFAULT_TIMELINE: Timeline = Timeline {
    early: "3-7 days: Initial symptoms appear",
    middle: "1-2 weeks: Disease progresses",
    late: "2+ weeks: Severe damage occurs",
    critical: "When symptoms become irreversible",
    speed_factors: &["Environmental stress", "Pest pressure"],
    slow_factors: &["Proper care", "Early treatment"],
    special_notes: &["🔹 Consult local agricultural extension for specific advice"],
};

/// The catalog, in keyword-scan order. First match wins, so broad
/// vocabularies (like Downy Mildew's "white") sit after specific ones.
/// `Healthy` closes the list with no keywords; it can never match text.
pub static PROFILES: [DiseaseProfile; 7] = [
    DiseaseProfile {
        name: "Alternaria Leaf Spot",
        keywords: &["alternaria", "dark", "leaf spot", "yellow circle", "yellow halo"],
        timeline: Some(Timeline {
            early: "3-5 days: Small brown spots with concentric rings (2-5mm diameter)",
            middle: "1-2 weeks: Spots enlarge (up to 1cm) with yellow halos",
            late: "2+ weeks: Leaves turn yellow and drop prematurely",
            critical: "When 30% of leaves are affected",
            speed_factors: &[
                "Wet conditions (leaf wetness >12hrs)",
                "Temperatures 20-30°C",
                "Poor air circulation",
            ],
            slow_factors: &[
                "Dry weather",
                "Morning watering (avoids long leaf wetness)",
                "Proper plant spacing",
            ],
            special_notes: &[
                "🔹 The fungus survives in plant debris - clean fields thoroughly after harvest",
                "🔹 Rotate with non-host crops for at least 2 years",
                "🔹 Chlorothalonil-based fungicides are most effective when applied preventatively",
            ],
        }),
        resource_link: Some("https://example.com/alternaria-guide"),
    },
    DiseaseProfile {
        name: "Cercospora Leaf Spot",
        keywords: &["cercospora", "circular", "brown", "spots"],
        timeline: Some(Timeline {
            early: "4-7 days: Small circular brown spots with reddish margins",
            middle: "1-2 weeks: Spots develop gray centers with dark borders",
            late: "3 weeks: Severe defoliation starting from lower leaves",
            critical: "When spots merge covering >50% leaf surface",
            speed_factors: &[
                "High humidity (>85%)",
                "Overhead irrigation",
                "Infected plant debris in soil",
            ],
            slow_factors: &[
                "Drip irrigation",
                "Regular fungicide sprays",
                "Resistant varieties",
            ],
            special_notes: &[
                "🔹 The pathogen can survive in seeds - use certified disease-free seeds",
                "🔹 Mancozeb fungicides work well when applied at first sign of spots",
                "🔹 Remove and destroy infected leaves immediately to slow spread",
            ],
        }),
        resource_link: Some("https://example.com/cercospora-guide"),
    },
    DiseaseProfile {
        name: "Downy Mildew",
        keywords: &["downy", "mildew", "white", "powdery", "powder"],
        timeline: Some(Timeline {
            early: "2-4 days: Pale green/yellow angular spots on upper leaf surfaces",
            middle: "5-7 days: White fluffy growth appears on leaf undersides",
            late: "10-14 days: Leaves curl, turn brown and die",
            critical: "When white spores appear on stems",
            speed_factors: &[
                "Cool nights (15-20°C) with dew",
                "High humidity",
                "Dense plant canopy",
            ],
            slow_factors: &[
                "Copper-based fungicides",
                "Morning sunlight exposure",
                "Good weed control",
            ],
            special_notes: &[
                "🔹 Fungus spreads rapidly during rainy seasons - be extra vigilant",
                "🔹 Apply fungicides to both upper and lower leaf surfaces",
                "🔹 The pathogen doesn't survive in soil but can overwinter in weeds",
            ],
        }),
        resource_link: Some("https://example.com/mildew-guide"),
    },
    DiseaseProfile {
        name: "Leaf Curl Virus",
        keywords: &["leaf curl", "curly"],
        timeline: Some(Timeline {
            early: "5-10 days: Slight upward curling of young leaves",
            middle: "2 weeks: Severe leaf thickening and distortion",
            late: "3 weeks: Plant stunting with no fruit production",
            critical: "10 days after first symptoms appear",
            speed_factors: &[
                "High whitefly populations",
                "Temperatures >30°C",
                "Susceptible okra varieties",
            ],
            slow_factors: &["Whitefly control", "Early planting", "Barrier crops"],
            special_notes: &[
                "🔹 There is NO CURE for viral infections - focus on prevention",
                "🔹 Use yellow sticky traps to monitor whitefly populations",
                "🔹 Remove and burn infected plants immediately - do not compost",
                "🔹 Plant resistant varieties like 'Pusa Sawani' and 'Arka Anamika'",
            ],
        }),
        resource_link: Some("https://example.com/leaf-curl-handbook"),
    },
    DiseaseProfile {
        name: "Bhendi Yellow Vein Mosaic Disease",
        keywords: &["yellow vein", "mosaic"],
        timeline: Some(Timeline {
            early: "7-10 days: Yellow vein clearing on young leaves",
            middle: "2 weeks: Complete yellow mosaic pattern develops",
            late: "3 weeks: Severe stunting with malformed fruits",
            critical: "When flowering is affected",
            speed_factors: &[
                "Whitefly transmission",
                "Weed hosts nearby",
                "Warm dry weather",
            ],
            slow_factors: &[
                "Virus-free seeds",
                "Yellow sticky traps",
                "Early whitefly control",
            ],
            special_notes: &[
                "🔹 The virus is transmitted in persistent manner by whiteflies",
                "🔹 Remove and destroy infected plants within 3 days of detection",
                "🔹 Spray systemic insecticides like Imidacloprid for whitefly control",
                "🔹 Grow barrier crops like maize around okra fields",
            ],
        }),
        resource_link: Some("https://example.com/mosaic-guide"),
    },
    DiseaseProfile {
        name: "Phyllosticta Leaf Spot",
        keywords: &["phyllosticta", "reddish margins", "brown margins", "holes"],
        timeline: Some(Timeline {
            early: "5-8 days: Small reddish-brown spots with dark margins",
            middle: "2 weeks: Spots develop light centers and may fall out (shot holes)",
            late: "3 weeks: Severe leaf drop occurs",
            critical: "When 40% of leaves are infected",
            speed_factors: &[
                "Rainy weather",
                "Wounds on leaves",
                "High nitrogen fertilization",
            ],
            slow_factors: &[
                "Copper fungicides",
                "Proper sanitation",
                "Balanced fertilization",
            ],
            special_notes: &[
                "🔹 Fungus spreads through splashing water - avoid overhead irrigation",
                "🔹 Prune affected leaves during dry weather to prevent spread",
                "🔹 Apply Bordeaux mixture (1%) at 15 day intervals as preventive measure",
                "🔹 The pathogen can survive on tools - disinfect after use",
            ],
        }),
        resource_link: Some("https://example.com/phyllosticta-guide"),
    },
    DiseaseProfile {
        name: HEALTHY,
        keywords: &[],
        timeline: None,
        resource_link: None,
    },
];

pub fn profile_by_name(name: &str) -> Option<&'static DiseaseProfile> {
    PROFILES.iter().find(|p| p.name == name)
}

/// Maps a raw vision-model class index to its label.
pub fn label_for_class(class_id: i64) -> Option<&'static str> {
    usize::try_from(class_id)
        .ok()
        .and_then(|idx| CLASS_LABELS.get(idx).copied())
}

/// Authored timeline for `label`, or the generic fallback.
pub fn timeline_for(label: &str) -> &'static Timeline {
    profile_by_name(label)
        .and_then(|p| p.timeline.as_ref())
        .unwrap_or(&DEFAULT_TIMELINE)
}

pub fn resource_link(label: &str) -> Option<&'static str> {
    profile_by_name(label).and_then(|p| p.resource_link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_table_matches_model_output_order() {
        assert_eq!(CLASS_LABELS.len(), 7);
        assert_eq!(CLASS_LABELS[3], HEALTHY);
        assert_eq!(label_for_class(0), Some("Alternaria Leaf Spot"));
        assert_eq!(label_for_class(6), Some("Bhendi Yellow Vein Mosaic Disease"));
        assert_eq!(label_for_class(7), None);
        assert_eq!(label_for_class(-1), None);
    }

    #[test]
    fn every_disease_has_keywords_timeline_and_link() {
        for profile in PROFILES.iter().filter(|p| p.name != HEALTHY) {
            assert!(!profile.keywords.is_empty(), "{} has no keywords", profile.name);
            assert!(profile.timeline.is_some(), "{} has no timeline", profile.name);
            assert!(profile.resource_link.is_some(), "{} has no link", profile.name);
        }
    }

    #[test]
    fn healthy_entry_is_inert() {
        let healthy = profile_by_name(HEALTHY).unwrap();
        assert!(healthy.keywords.is_empty());
        assert!(healthy.resource_link.is_none());
    }

    #[test]
    fn unknown_labels_fall_back_to_default_timeline() {
        let t = timeline_for("Rust Blight");
        assert_eq!(t.early, DEFAULT_TIMELINE.early);
        assert!(resource_link("Rust Blight").is_none());
    }
}
