//! Generation request: what the caller asked the forge to create.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

use super::category::{Category, Rarity};

/// Lowest level a request may ask for.
pub const MIN_LEVEL: u8 = 1;
/// Highest level a request may ask for.
pub const MAX_LEVEL: u8 = 20;

/// Battle parameters for `Guerra de Clãs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictOptions {
    pub attacking_clan: String,
    pub defending_clan: String,
    pub terrain: String,
    pub strategy: String,
}

/// Song parameters for `Música/Poesia`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicOptions {
    pub style: Option<String>,
    pub lyrics_theme: Option<String>,
}

/// Immutable description of one generation.
///
/// Example:
/// ```
/// use kimetsu_forge::types::{Category, GenerationRequest, Rarity};
///
/// let request = GenerationRequest::builder()
///     .category(Category::Weapon)
///     .rarity(Rarity::Rare)
///     .level(12)
///     .modifier("feito de obsidiana vulcânica")
///     .build();
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub category: Category,
    /// `None` lets the model pick ("Aleatória").
    pub rarity: Option<Rarity>,
    #[builder(default = MIN_LEVEL)]
    pub level: u8,
    #[builder(default, into)]
    pub modifier: String,
    #[builder(default)]
    pub thematics: Vec<String>,
    #[builder(into)]
    pub country: Option<String>,
    #[builder(into)]
    pub tone: Option<String>,
    pub conflict: Option<ConflictOptions>,
    pub music: Option<MusicOptions>,
    #[builder(into)]
    pub art_style: Option<String>,
    /// Narrative text the model should restructure instead of inventing from scratch.
    #[builder(into)]
    pub expansion_text: Option<String>,
}

impl GenerationRequest {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(ForgeError::InvalidArgument(format!(
                "level must be between {MIN_LEVEL} and {MAX_LEVEL}, got {}",
                self.level
            )));
        }
        if self.category == Category::ClanWar && self.conflict.is_none() {
            return Err(ForgeError::InvalidArgument(
                "clan war requests need attacking and defending clans".into(),
            ));
        }
        Ok(())
    }

    /// Culture filter, ignoring the "random" sentinel.
    pub fn country(&self) -> Option<&str> {
        meaningful(self.country.as_deref())
    }

    /// Tone filter, ignoring the "random" sentinel.
    pub fn tone(&self) -> Option<&str> {
        meaningful(self.tone.as_deref())
    }

    pub fn modifier(&self) -> Option<&str> {
        let trimmed = self.modifier.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

fn meaningful(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !matches!(*v, "Aleatório" | "Aleatória"))
}
