//! Generated items: a base shape plus one body per template.

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::prompt::templates::Template;
use crate::util::lenient::{self, FromText};

use super::category::Category;
use super::provenance::ProvenanceEntry;
use super::request::GenerationRequest;

/// Fields shared by every item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseFields {
    #[serde(deserialize_with = "lenient::string")]
    pub nome: String,
    #[serde(deserialize_with = "lenient::string")]
    pub descricao_curta: String,
    #[serde(deserialize_with = "lenient::string")]
    pub descricao: String,
    #[serde(deserialize_with = "lenient::string")]
    pub raridade: String,
    #[serde(deserialize_with = "lenient::number")]
    pub nivel_sugerido: u64,
    #[serde(deserialize_with = "lenient::string_list")]
    pub ganchos_narrativos: Vec<String>,
}

/// Weapons and accessories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentFields {
    #[serde(deserialize_with = "lenient::string")]
    pub dano: String,
    #[serde(deserialize_with = "lenient::string")]
    pub dados: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tipo_de_dano: String,
    #[serde(deserialize_with = "lenient::number")]
    pub preco_sugerido: u64,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub status_aplicado: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub efeitos_secundarios: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterWeapon {
    #[serde(deserialize_with = "lenient::string")]
    pub nome: String,
    #[serde(deserialize_with = "lenient::string")]
    pub dano: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tipo_de_dano: String,
    #[serde(deserialize_with = "lenient::string")]
    pub propriedade: String,
}

impl FromText for HunterWeapon {
    fn from_text(nome: String) -> Self {
        Self {
            nome,
            ..Self::default()
        }
    }
}

/// Hunters and NPCs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterFields {
    #[serde(deserialize_with = "lenient::string")]
    pub classe: String,
    #[serde(deserialize_with = "lenient::string")]
    pub personalidade: String,
    #[serde(deserialize_with = "lenient::string")]
    pub background: String,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub respiracao: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub habilidade_especial: String,
    #[serde(deserialize_with = "lenient::string")]
    pub estilo_de_luta: String,
    #[serde(deserialize_with = "lenient::record_list")]
    pub equipamento: Vec<HunterWeapon>,
}

/// Blood demon art of an antagonist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kekkijutsu {
    #[serde(deserialize_with = "lenient::string")]
    pub nome: String,
    #[serde(deserialize_with = "lenient::string")]
    pub descricao: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tipo: String,
    #[serde(deserialize_with = "lenient::number")]
    pub custo_pc: u64,
}

impl FromText for Kekkijutsu {
    fn from_text(nome: String) -> Self {
        Self {
            nome,
            ..Self::default()
        }
    }
}

/// Demons and other antagonists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntagonistFields {
    #[serde(deserialize_with = "lenient::string")]
    pub power_level: String,
    #[serde(deserialize_with = "lenient::record")]
    pub kekkijutsu: Kekkijutsu,
    #[serde(deserialize_with = "lenient::string_list")]
    pub comportamento_combate: Vec<String>,
}

/// Base-only categories (techniques, places, events, lore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreFields {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattlePhase {
    #[serde(deserialize_with = "lenient::string")]
    pub fase: String,
    #[serde(deserialize_with = "lenient::string")]
    pub descricao: String,
}

impl FromText for BattlePhase {
    fn from_text(descricao: String) -> Self {
        Self {
            descricao,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consequences {
    #[serde(deserialize_with = "lenient::string")]
    pub para_vencedor: String,
    #[serde(deserialize_with = "lenient::string")]
    pub para_perdedor: String,
    #[serde(deserialize_with = "lenient::string")]
    pub para_regiao: String,
}

impl FromText for Consequences {}

/// Clan war battle report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClanWarFields {
    #[serde(deserialize_with = "lenient::string")]
    pub titulo: String,
    #[serde(deserialize_with = "lenient::string")]
    pub resumo_resultado: String,
    #[serde(deserialize_with = "lenient::string")]
    pub narrativa_batalha: String,
    #[serde(deserialize_with = "lenient::record_list")]
    pub fases_batalha: Vec<BattlePhase>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub momentos_chave: Vec<String>,
    #[serde(deserialize_with = "lenient::record")]
    pub consequencias: Consequences,
}

/// Song or poem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongFields {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub style: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lyrics: String,
    #[serde(deserialize_with = "lenient::string")]
    pub context: String,
}

/// Visual description plus an image-model prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualPromptFields {
    #[serde(deserialize_with = "lenient::string")]
    pub visual_description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub generated_prompt: String,
    #[serde(deserialize_with = "lenient::string")]
    pub art_style_used: String,
}

/// Scene script plus a video-model prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptFields {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub script: String,
    #[serde(deserialize_with = "lenient::string")]
    pub video_prompt: String,
    #[serde(deserialize_with = "lenient::string")]
    pub camera_directions: String,
}

/// Category-specific part of an item, discriminated by template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ItemBody {
    Equipment(EquipmentFields),
    Character(CharacterFields),
    Antagonist(AntagonistFields),
    Lore(LoreFields),
    ClanWar(ClanWarFields),
    Song(SongFields),
    VisualPrompt(VisualPromptFields),
    Script(ScriptFields),
}

impl ItemBody {
    /// Decode the body for `template` out of a model-produced object.
    pub fn decode(template: Template, value: &Value) -> Result<Self, serde_json::Error> {
        Ok(match template {
            Template::Default => Self::Lore(LoreFields::default()),
            Template::Equipment => Self::Equipment(EquipmentFields::deserialize(value)?),
            Template::Character => Self::Character(CharacterFields::deserialize(value)?),
            Template::Antagonist => Self::Antagonist(AntagonistFields::deserialize(value)?),
            Template::ClanWar => Self::ClanWar(ClanWarFields::deserialize(value)?),
            Template::Song => Self::Song(SongFields::deserialize(value)?),
            Template::VisualPrompt => Self::VisualPrompt(VisualPromptFields::deserialize(value)?),
            Template::Script => Self::Script(ScriptFields::deserialize(value)?),
        })
    }

    pub fn template(&self) -> Template {
        match self {
            Self::Equipment(_) => Template::Equipment,
            Self::Character(_) => Template::Character,
            Self::Antagonist(_) => Template::Antagonist,
            Self::Lore(_) => Template::Default,
            Self::ClanWar(_) => Template::ClanWar,
            Self::Song(_) => Template::Song,
            Self::VisualPrompt(_) => Template::VisualPrompt,
            Self::Script(_) => Template::Script,
        }
    }

    fn title(&self) -> Option<String> {
        match self {
            Self::ClanWar(b) => Some(b.titulo.clone()),
            Self::Song(b) => Some(b.title.clone()),
            Self::Script(b) => Some(b.title.clone()),
            Self::VisualPrompt(b) => Some(headline(&b.visual_description)),
            _ => None,
        }
    }

    fn summary(&self) -> Option<&str> {
        match self {
            Self::ClanWar(b) => Some(&b.resumo_resultado),
            Self::Song(b) => Some(&b.context),
            Self::Script(b) => Some(&b.camera_directions),
            Self::VisualPrompt(b) => Some(&b.visual_description),
            _ => None,
        }
    }

    fn long_text(&self) -> Option<&str> {
        match self {
            Self::ClanWar(b) => Some(&b.narrativa_batalha),
            Self::Song(b) => Some(&b.lyrics),
            Self::Script(b) => Some(&b.script),
            Self::VisualPrompt(b) => Some(&b.generated_prompt),
            _ => None,
        }
    }
}

/// Longest title derived from free text, in characters.
const HEADLINE_LIMIT: usize = 60;

/// First sentence of `text`, cut at a word boundary past [`HEADLINE_LIMIT`].
fn headline(text: &str) -> String {
    let sentence = text
        .trim()
        .split(['.', '\n'])
        .next()
        .unwrap_or_default()
        .trim();
    if sentence.chars().count() <= HEADLINE_LIMIT {
        return sentence.to_string();
    }
    let cut: String = sentence.chars().take(HEADLINE_LIMIT).collect();
    let head = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
    format!("{}…", head.trim_end_matches([',', ';', ':', ' ']))
}

impl BaseFields {
    /// Fill base fields of shapes that have none (clan war, song, visual
    /// prompt, script) from the body and the request.
    ///
    /// Base-shaped items are left as the model wrote them, so the returned
    /// item agrees with its validation warnings.
    pub fn normalize(&mut self, request: &GenerationRequest, body: &ItemBody) {
        if body.template().has_base_fields() {
            return;
        }
        fill(&mut self.nome, body.title().as_deref());
        fill(&mut self.descricao_curta, body.summary());
        fill(&mut self.descricao, body.long_text());
        if self.raridade.trim().is_empty() {
            if let Some(rarity) = request.rarity {
                self.raridade = rarity.label().to_string();
            }
        }
        if self.nivel_sugerido == 0 {
            self.nivel_sugerido = u64::from(request.level);
        }
        if self.ganchos_narrativos.is_empty() {
            if let ItemBody::ClanWar(war) = body {
                self.ganchos_narrativos = war.momentos_chave.clone();
            }
        }
    }
}

fn fill(target: &mut String, source: Option<&str>) {
    if target.trim().is_empty() {
        if let Some(text) = source.filter(|s| !s.trim().is_empty()) {
            *target = text.to_string();
        }
    }
}

/// Score and warnings attached by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMetadata {
    pub score: u32,
    pub warnings: Vec<String>,
    pub attempts: u32,
    pub timestamp: DateTime<Utc>,
    /// Set when no attempt reached the acceptance threshold and the best one
    /// was returned anyway.
    #[serde(default)]
    pub degraded: bool,
}

/// Final item handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedItem {
    pub id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(flatten)]
    pub base: BaseFields,
    #[serde(flatten)]
    pub body: ItemBody,
    pub provenance: Vec<ProvenanceEntry>,
    #[serde(rename = "_validation", skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationMetadata>,
}

impl GeneratedItem {
    /// True when the validator returned a best-effort result below threshold.
    pub fn is_low_confidence(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.degraded)
    }

    /// Vendor that produced this item.
    pub fn model(&self) -> Option<&str> {
        super::provenance::winning_model(&self.provenance)
    }
}

impl<'de> Deserialize<'de> for GeneratedItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Envelope {
            id: Uuid,
            #[serde(rename = "createdAt")]
            created_at: DateTime<Utc>,
            categoria: Category,
            #[serde(default)]
            provenance: Vec<ProvenanceEntry>,
            #[serde(rename = "_validation", default)]
            validation: Option<ValidationMetadata>,
            #[serde(flatten)]
            rest: serde_json::Map<String, Value>,
        }

        let envelope = Envelope::deserialize(deserializer)?;
        let fields = Value::Object(envelope.rest);
        let base = BaseFields::deserialize(&fields).map_err(D::Error::custom)?;
        let body = ItemBody::decode(Template::for_category(envelope.categoria), &fields)
            .map_err(D::Error::custom)?;

        Ok(Self {
            id: envelope.id,
            created_at: envelope.created_at,
            category: envelope.categoria,
            base,
            body,
            provenance: envelope.provenance,
            validation: envelope.validation,
        })
    }
}
