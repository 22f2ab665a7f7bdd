use std::collections::HashSet;

use crate::model::{
    candidate::{Candidate, VoteCount},
    group::GroupTrip,
};

/// The provider as managed by Rocket and injected into handlers.
pub type SharedCatalog = Box<dyn SuggestionProvider>;

/// Supplies the fixed candidate set for a group once voting opens.
///
/// Candidate generation quality is a collaborator concern, not part of the
/// aggregation core; this trait is the seam where a smarter recommendation
/// service could be plugged in.
pub trait SuggestionProvider: Send + Sync {
    fn suggest(&self, trip: &GroupTrip, limit: usize) -> Vec<Candidate>;
}

/// One destination the catalog knows about.
struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    image: &'static str,
    interests: &'static [&'static str],
    price: &'static str,
}

impl CatalogEntry {
    fn to_candidate(&self) -> Candidate {
        Candidate {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            image: self.image.to_string(),
            interests: self.interests.iter().map(|i| i.to_string()).collect(),
            price: self.price.to_string(),
            votes: VoteCount::default(),
        }
    }
}

/// Built-in destination catalog. Orders its fixed destination list by
/// overlap with the interests the group's members submitted, so the most
/// promising candidates are swiped first; ties break alphabetically to keep
/// the set deterministic.
pub struct BuiltinCatalog;

impl SuggestionProvider for BuiltinCatalog {
    fn suggest(&self, trip: &GroupTrip, limit: usize) -> Vec<Candidate> {
        let group_interests: HashSet<&str> = trip
            .members
            .values()
            .flat_map(|m| m.interests.iter())
            .map(String::as_str)
            .collect();

        let mut entries: Vec<&CatalogEntry> = DESTINATIONS.iter().collect();
        let overlap = |entry: &CatalogEntry| {
            entry
                .interests
                .iter()
                .filter(|i| group_interests.contains(**i))
                .count()
        };
        entries.sort_by(|a, b| {
            overlap(b)
                .cmp(&overlap(a))
                .then_with(|| a.name.cmp(b.name))
        });
        entries
            .into_iter()
            .take(limit)
            .map(CatalogEntry::to_candidate)
            .collect()
    }
}

static DESTINATIONS: &[CatalogEntry] = &[
    CatalogEntry {
        id: "barcelona",
        name: "Barcelona, Spain",
        description: "A vibrant city with stunning architecture, beautiful beaches, and amazing food.",
        image: "https://images.pexels.com/photos/819764/pexels-photo-819764.jpeg",
        interests: &["Culture", "Beach", "Nightlife", "Food"],
        price: "€€",
    },
    CatalogEntry {
        id: "paris",
        name: "Paris, France",
        description: "The city of love with iconic landmarks, world-class museums, and exquisite cuisine.",
        image: "https://images.pexels.com/photos/699466/pexels-photo-699466.jpeg",
        interests: &["Culture", "History", "Food"],
        price: "€€€",
    },
    CatalogEntry {
        id: "rome",
        name: "Rome, Italy",
        description: "Explore ancient ruins, enjoy delicious Italian food, and experience the vibrant atmosphere.",
        image: "https://images.pexels.com/photos/1797161/pexels-photo-1797161.jpeg",
        interests: &["History", "Culture", "Food"],
        price: "€€",
    },
    CatalogEntry {
        id: "amsterdam",
        name: "Amsterdam, Netherlands",
        description: "Picturesque canals, historic buildings, museums, and a laid-back atmosphere.",
        image: "https://images.pexels.com/photos/967292/pexels-photo-967292.jpeg",
        interests: &["Culture", "Nightlife", "History"],
        price: "€€",
    },
    CatalogEntry {
        id: "prague",
        name: "Prague, Czech Republic",
        description: "Stunning architecture, rich history, affordable prices, and great beer.",
        image: "https://images.pexels.com/photos/125137/pexels-photo-125137.jpeg",
        interests: &["History", "Culture", "Nightlife"],
        price: "€",
    },
    CatalogEntry {
        id: "berlin",
        name: "Berlin, Germany",
        description: "A city with a rich history, vibrant arts scene, and legendary nightlife.",
        image: "https://images.pexels.com/photos/2064827/pexels-photo-2064827.jpeg",
        interests: &["History", "Nightlife", "Culture"],
        price: "€€",
    },
    CatalogEntry {
        id: "lisbon",
        name: "Lisbon, Portugal",
        description: "Charming streets, historic buildings, beautiful viewpoints, and delicious food.",
        image: "https://images.pexels.com/photos/1534560/pexels-photo-1534560.jpeg",
        interests: &["Culture", "Food", "History"],
        price: "€",
    },
    CatalogEntry {
        id: "vienna",
        name: "Vienna, Austria",
        description: "Impressive imperial palaces, magnificent museums, and classical music heritage.",
        image: "https://images.pexels.com/photos/2058911/pexels-photo-2058911.jpeg",
        interests: &["Culture", "History", "Food"],
        price: "€€",
    },
    CatalogEntry {
        id: "london",
        name: "London, UK",
        description: "World-class museums, iconic landmarks, diverse food scene, and vibrant cultural life.",
        image: "https://images.pexels.com/photos/460672/pexels-photo-460672.jpeg",
        interests: &["Culture", "History", "Shopping"],
        price: "€€€",
    },
    CatalogEntry {
        id: "budapest",
        name: "Budapest, Hungary",
        description: "Stunning architecture, thermal baths, vibrant nightlife, and affordable prices.",
        image: "https://images.pexels.com/photos/1115804/pexels-photo-1115804.jpeg",
        interests: &["History", "Nightlife", "Culture"],
        price: "€",
    },
];
