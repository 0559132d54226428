//! Snapshot of a store's contents, grouped by category family.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Category, GeneratedItem};

/// Version string stamped into every export.
pub const APP_VERSION: &str = concat!("kimetsu-forge v", env!("CARGO_PKG_VERSION"));

/// Family an exported history entry is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportGroup {
    Items,
    Characters,
    Techniques,
    Locations,
    Conflicts,
    Missions,
}

impl ExportGroup {
    /// `None` for categories with no family (music, visual prompts, scripts);
    /// those only reach an export through favorites.
    pub fn of(category: Category) -> Option<Self> {
        match category {
            Category::Weapon | Category::Accessory => Some(Self::Items),
            Category::Hunter | Category::Npc | Category::Oni => Some(Self::Characters),
            Category::Breathing | Category::Kekkijutsu => Some(Self::Techniques),
            Category::Location
            | Category::Event
            | Category::Mythology
            | Category::AncientHistory => Some(Self::Locations),
            Category::ClanWar => Some(Self::Conflicts),
            Category::Mission => Some(Self::Missions),
            Category::Music | Category::VisualPrompt | Category::Script => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportMetadata {
    pub export_date: DateTime<Utc>,
    pub app_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPayload {
    pub metadata: ExportMetadata,
    pub items: Vec<GeneratedItem>,
    pub characters: Vec<GeneratedItem>,
    pub techniques: Vec<GeneratedItem>,
    pub locations: Vec<GeneratedItem>,
    pub conflicts: Vec<GeneratedItem>,
    pub missions: Vec<GeneratedItem>,
    pub favorites: Vec<GeneratedItem>,
}

impl ExportPayload {
    /// File history entries by family; history order is kept within a group.
    pub fn build(history: Vec<GeneratedItem>, favorites: Vec<GeneratedItem>) -> Self {
        let mut payload = Self {
            metadata: ExportMetadata {
                export_date: Utc::now(),
                app_version: APP_VERSION.to_string(),
            },
            items: Vec::new(),
            characters: Vec::new(),
            techniques: Vec::new(),
            locations: Vec::new(),
            conflicts: Vec::new(),
            missions: Vec::new(),
            favorites,
        };
        for item in history {
            let Some(group) = ExportGroup::of(item.category) else {
                continue;
            };
            let bucket = match group {
                ExportGroup::Items => &mut payload.items,
                ExportGroup::Characters => &mut payload.characters,
                ExportGroup::Techniques => &mut payload.techniques,
                ExportGroup::Locations => &mut payload.locations,
                ExportGroup::Conflicts => &mut payload.conflicts,
                ExportGroup::Missions => &mut payload.missions,
            };
            bucket.push(item);
        }
        payload
    }

    /// Number of history entries filed under a family.
    pub fn grouped_len(&self) -> usize {
        self.items.len()
            + self.characters.len()
            + self.techniques.len()
            + self.locations.len()
            + self.conflicts.len()
            + self.missions.len()
    }
}
