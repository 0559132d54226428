//! JSON shapes the model is asked to fill, one per template.

use crate::types::Category;

/// Output shape requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Default,
    Equipment,
    Character,
    Antagonist,
    ClanWar,
    Song,
    VisualPrompt,
    Script,
}

impl Template {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Weapon | Category::Accessory => Self::Equipment,
            Category::Hunter | Category::Npc => Self::Character,
            Category::Oni => Self::Antagonist,
            Category::ClanWar => Self::ClanWar,
            Category::Music => Self::Song,
            Category::VisualPrompt => Self::VisualPrompt,
            Category::Script => Self::Script,
            Category::Kekkijutsu
            | Category::Breathing
            | Category::Mission
            | Category::Event
            | Category::Location
            | Category::Mythology
            | Category::AncientHistory => Self::Default,
        }
    }

    /// Whether the shape includes the base item fields.
    pub fn has_base_fields(self) -> bool {
        matches!(
            self,
            Self::Default | Self::Equipment | Self::Character | Self::Antagonist
        )
    }

    /// Body of the JSON object, without the surrounding braces.
    pub fn shape(self) -> &'static str {
        match self {
            Self::Default => DEFAULT_SHAPE,
            Self::Equipment => EQUIPMENT_SHAPE,
            Self::Character => CHARACTER_SHAPE,
            Self::Antagonist => ANTAGONIST_SHAPE,
            Self::ClanWar => CLAN_WAR_SHAPE,
            Self::Song => SONG_SHAPE,
            Self::VisualPrompt => VISUAL_PROMPT_SHAPE,
            Self::Script => SCRIPT_SHAPE,
        }
    }
}

const DEFAULT_SHAPE: &str = r#"
  "nome": "string (nome criativo e temático)",
  "descricao_curta": "string (1-2 frases, máx 220 caracteres)",
  "descricao": "string (lore detalhado e imersivo, 3-5 parágrafos, máx 2000 caracteres)",
  "raridade": "string (Comum, Incomum, Rara, Épica, Lendária)",
  "nivel_sugerido": "number (entre 1 e 20)",
  "ganchos_narrativos": ["string", "string", "string"]
"#;

const EQUIPMENT_SHAPE: &str = r#"
  "nome": "string (nome criativo)",
  "descricao_curta": "string (1-2 frases)",
  "descricao": "string (lore detalhado)",
  "raridade": "string",
  "nivel_sugerido": "number",
  "ganchos_narrativos": ["string", "string", "string"],
  "dano": "string", "dados": "string (XdY)",
  "tipo_de_dano": "string",
  "preco_sugerido": "number",
  "efeitos_secundarios": "string (opcional)"
"#;

const CHARACTER_SHAPE: &str = r#"
  "nome": "string (nome criativo)",
  "descricao_curta": "string (1-2 frases)",
  "descricao": "string (lore detalhado)",
  "raridade": "string",
  "nivel_sugerido": "number",
  "ganchos_narrativos": ["string", "string", "string"],
  "classe": "string",
  "personalidade": "string (detalhada)",
  "background": "string (origem)",
  "respiracao": "string",
  "habilidade_especial": "string",
  "estilo_de_luta": "string",
  "equipamento": [ { "nome": "string", "dano": "string", "tipo_de_dano": "string", "propriedade": "string" } ]
"#;

const ANTAGONIST_SHAPE: &str = r#"
  "nome": "string",
  "descricao_curta": "string",
  "descricao": "string",
  "raridade": "string",
  "nivel_sugerido": "number",
  "ganchos_narrativos": ["string", "string", "string"],
  "power_level": "string",
  "kekkijutsu": { "nome": "string", "descricao": "string", "tipo": "string", "custo_pc": "number" },
  "comportamento_combate": ["string", "string", "string"]
"#;

const CLAN_WAR_SHAPE: &str = r#"
  "titulo": "string",
  "resumo_resultado": "string",
  "narrativa_batalha": "string (narrativa histórica e imersiva)",
  "fases_batalha": [
    { "fase": "Início da Batalha", "descricao": "string" },
    { "fase": "Meio da Batalha", "descricao": "string" },
    { "fase": "Fim da Batalha", "descricao": "string" }
  ],
  "momentos_chave": ["string", "string", "string"],
  "consequencias": {
    "para_vencedor": "string",
    "para_perdedor": "string",
    "para_regiao": "string"
  }
"#;

const SONG_SHAPE: &str = r#"
  "title": "string (Título da Canção/Poema)",
  "style": "string (Ex: Balada Shamisen, Haiku, Canto de Guerra)",
  "lyrics": "string (A letra completa ou poema, formatada com quebras de linha)",
  "context": "string (Breve contexto de onde essa música seria tocada ou encontrada)"
"#;

const VISUAL_PROMPT_SHAPE: &str = r#"
  "visualDescription": "string (Descrição rica e evocativa da aparência do personagem/cena em português)",
  "generatedPrompt": "string (Prompt técnico e detalhado para IA de imagem, EM INGLÊS, com parâmetros como --ar 16:9 --v 6.0 --s 250, câmera, iluminação e engine)",
  "artStyleUsed": "string (O estilo artístico utilizado no prompt)"
"#;

const SCRIPT_SHAPE: &str = r#"
  "title": "string (Título da Cena)",
  "script": "string (Roteiro formatado: Cabeçalho de Cena, Ação, Diálogos)",
  "videoPrompt": "string (Prompt contínuo para IA de vídeo como Veo ou Sora, descrevendo ação, movimento de câmera e atmosfera, EM INGLÊS)",
  "cameraDirections": "string (Ângulos e movimentos de câmera sugeridos)"
"#;
