//! Content categories and rarity tiers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Content category; the wire name is the label shown to players.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Category {
    #[serde(rename = "Arma")]
    #[strum(serialize = "Arma")]
    Weapon,
    #[serde(rename = "Acessório")]
    #[strum(serialize = "Acessório")]
    Accessory,
    #[serde(rename = "Caçador")]
    #[strum(serialize = "Caçador")]
    Hunter,
    #[serde(rename = "Inimigo/Oni")]
    #[strum(serialize = "Inimigo/Oni")]
    Oni,
    #[serde(rename = "Kekkijutsu")]
    #[strum(serialize = "Kekkijutsu")]
    Kekkijutsu,
    #[serde(rename = "Respiração")]
    #[strum(serialize = "Respiração")]
    Breathing,
    #[serde(rename = "Missões")]
    #[strum(serialize = "Missões")]
    Mission,
    #[serde(rename = "NPC")]
    #[strum(serialize = "NPC")]
    Npc,
    #[serde(rename = "Evento")]
    #[strum(serialize = "Evento")]
    Event,
    #[serde(rename = "Local/Cenário")]
    #[strum(serialize = "Local/Cenário")]
    Location,
    #[serde(rename = "Mitologia")]
    #[strum(serialize = "Mitologia")]
    Mythology,
    #[serde(rename = "História Antiga")]
    #[strum(serialize = "História Antiga")]
    AncientHistory,
    #[serde(rename = "Guerra de Clãs")]
    #[strum(serialize = "Guerra de Clãs")]
    ClanWar,
    #[serde(rename = "Música/Poesia")]
    #[strum(serialize = "Música/Poesia")]
    Music,
    #[serde(rename = "Prompt Visual")]
    #[strum(serialize = "Prompt Visual")]
    VisualPrompt,
    #[serde(rename = "Roteiro")]
    #[strum(serialize = "Roteiro")]
    Script,
}

impl Category {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Rarity tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Rarity {
    #[serde(rename = "Comum")]
    #[strum(serialize = "Comum")]
    Common,
    #[serde(rename = "Incomum")]
    #[strum(serialize = "Incomum")]
    Uncommon,
    #[serde(rename = "Rara")]
    #[strum(serialize = "Rara")]
    Rare,
    #[serde(rename = "Épica")]
    #[strum(serialize = "Épica")]
    Epic,
    #[serde(rename = "Lendária")]
    #[strum(serialize = "Lendária")]
    Legendary,
}

impl Rarity {
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Case- and accent-tolerant parse of model output ("lendaria", "RARA").
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' | 'à' | 'â' | 'ã' => 'a',
                'é' | 'ê' => 'e',
                'í' => 'i',
                'ó' | 'ô' | 'õ' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();
        match folded.as_str() {
            "comum" | "common" => Some(Self::Common),
            "incomum" | "uncommon" => Some(Self::Uncommon),
            "rara" | "raro" | "rare" => Some(Self::Rare),
            "epica" | "epico" | "epic" => Some(Self::Epic),
            "lendaria" | "lendario" | "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// Label used in prompts when no rarity was requested.
pub const RANDOM_RARITY: &str = "Aleatória";

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn category_labels_round_trip_through_from_str() {
        for category in Category::iter() {
            assert_eq!(Category::from_str(category.label()).unwrap(), category);
        }
    }

    #[test]
    fn category_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Category::ClanWar).unwrap(), "\"Guerra de Clãs\"");
    }

    #[test]
    fn rarity_loose_parse_ignores_case_and_accents() {
        assert_eq!(Rarity::parse_loose("LENDARIA"), Some(Rarity::Legendary));
        assert_eq!(Rarity::parse_loose("Épica"), Some(Rarity::Epic));
        assert_eq!(Rarity::parse_loose("mítica"), None);
    }
}
