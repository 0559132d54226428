//! Per-category plausibility checks.
//!
//! Every item starts at 100 points and loses a fixed penalty per failed check.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{
    AntagonistFields, BaseFields, CharacterFields, ClanWarFields, EquipmentFields,
    GenerationRequest, ItemBody, Rarity, ScriptFields, SongFields, VisualPromptFields, MAX_LEVEL,
    MIN_LEVEL,
};

pub const MAX_SCORE: u32 = 100;
/// Longest accepted `descricao_curta`, in characters.
pub const SHORT_DESCRIPTION_LIMIT: usize = 220;
/// Number of narrative hooks the templates ask for.
pub const EXPECTED_HOOKS: usize = 3;
/// Suggested level may drift this far from the requested one without a warning.
pub const LEVEL_TOLERANCE: u64 = 3;

/// Outcome of one assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub score: u32,
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct Checks {
    penalty: u32,
    warnings: Vec<String>,
}

impl Checks {
    fn require(&mut self, ok: bool, points: u32, warning: impl Into<String>) {
        if !ok {
            self.penalty += points;
            self.warnings.push(warning.into());
        }
    }

    fn require_text(&mut self, value: &str, points: u32, field: &str) {
        self.require(!value.trim().is_empty(), points, format!("missing {field}"));
    }

    fn finish(self) -> Assessment {
        Assessment {
            score: MAX_SCORE.saturating_sub(self.penalty),
            warnings: self.warnings,
        }
    }
}

fn dice_pattern() -> &'static Regex {
    static DICE: OnceLock<Regex> = OnceLock::new();
    DICE.get_or_init(|| {
        Regex::new(r"(?i)^\s*\d*d\d+\s*([+-]\s*\d+)?\s*$").expect("dice pattern is valid")
    })
}

/// Score a decoded item against the request it was generated for.
pub fn assess(request: &GenerationRequest, base: &BaseFields, body: &ItemBody) -> Assessment {
    let mut checks = Checks::default();

    if body.template().has_base_fields() {
        check_base(&mut checks, request, base);
    }

    match body {
        ItemBody::Equipment(b) => check_equipment(&mut checks, b),
        ItemBody::Character(b) => check_character(&mut checks, b),
        ItemBody::Antagonist(b) => check_antagonist(&mut checks, b),
        ItemBody::Lore(_) => {}
        ItemBody::ClanWar(b) => check_clan_war(&mut checks, b),
        ItemBody::Song(b) => check_song(&mut checks, b),
        ItemBody::VisualPrompt(b) => check_visual_prompt(&mut checks, b),
        ItemBody::Script(b) => check_script(&mut checks, b),
    }

    checks.finish()
}

fn check_base(checks: &mut Checks, request: &GenerationRequest, base: &BaseFields) {
    checks.require_text(&base.nome, 25, "nome");
    checks.require_text(&base.descricao_curta, 10, "descricao_curta");
    checks.require_text(&base.descricao, 15, "descricao");
    checks.require(
        base.descricao_curta.chars().count() <= SHORT_DESCRIPTION_LIMIT,
        5,
        format!("descricao_curta longer than {SHORT_DESCRIPTION_LIMIT} characters"),
    );

    match Rarity::parse_loose(&base.raridade) {
        None => checks.require(false, 10, format!("unrecognized raridade '{}'", base.raridade)),
        Some(found) => {
            if let Some(wanted) = request.rarity {
                checks.require(
                    found == wanted,
                    5,
                    format!("raridade {found} differs from requested {wanted}"),
                );
            }
        }
    }

    let level = base.nivel_sugerido;
    let in_range = (u64::from(MIN_LEVEL)..=u64::from(MAX_LEVEL)).contains(&level);
    checks.require(
        in_range,
        15,
        format!("nivel_sugerido {level} outside {MIN_LEVEL}-{MAX_LEVEL}"),
    );
    if in_range {
        checks.require(
            level.abs_diff(u64::from(request.level)) <= LEVEL_TOLERANCE,
            5,
            format!("nivel_sugerido {level} far from requested {}", request.level),
        );
    }

    let hooks = base.ganchos_narrativos.len();
    if hooks == 0 {
        checks.require(false, 15, "missing ganchos_narrativos");
    } else {
        checks.require(
            hooks >= EXPECTED_HOOKS,
            5,
            format!("only {hooks} of {EXPECTED_HOOKS} ganchos_narrativos"),
        );
    }
}

fn check_equipment(checks: &mut Checks, body: &EquipmentFields) {
    checks.require_text(&body.dano, 10, "dano");
    checks.require(
        dice_pattern().is_match(&body.dados),
        10,
        format!("dados '{}' is not XdY notation", body.dados),
    );
    checks.require_text(&body.tipo_de_dano, 5, "tipo_de_dano");
    checks.require(body.preco_sugerido > 0, 5, "missing preco_sugerido");
}

fn check_character(checks: &mut Checks, body: &CharacterFields) {
    checks.require_text(&body.classe, 10, "classe");
    checks.require_text(&body.personalidade, 5, "personalidade");
    checks.require_text(&body.background, 5, "background");
    checks.require_text(&body.habilidade_especial, 5, "habilidade_especial");
    checks.require_text(&body.estilo_de_luta, 5, "estilo_de_luta");
    checks.require(!body.equipamento.is_empty(), 10, "missing equipamento");
    checks.require(
        body.equipamento.iter().all(|w| !w.nome.trim().is_empty()),
        5,
        "equipamento entry without nome",
    );
}

fn check_antagonist(checks: &mut Checks, body: &AntagonistFields) {
    checks.require_text(&body.power_level, 5, "power_level");
    checks.require_text(&body.kekkijutsu.nome, 15, "kekkijutsu.nome");
    checks.require_text(&body.kekkijutsu.descricao, 5, "kekkijutsu.descricao");
    checks.require(!body.comportamento_combate.is_empty(), 10, "missing comportamento_combate");
}

fn check_clan_war(checks: &mut Checks, body: &ClanWarFields) {
    checks.require_text(&body.titulo, 25, "titulo");
    checks.require_text(&body.resumo_resultado, 10, "resumo_resultado");
    checks.require_text(&body.narrativa_batalha, 20, "narrativa_batalha");
    checks.require(
        body.fases_batalha.len() == 3,
        10,
        format!("expected 3 fases_batalha, found {}", body.fases_batalha.len()),
    );
    checks.require(!body.momentos_chave.is_empty(), 5, "missing momentos_chave");
    let c = &body.consequencias;
    checks.require(
        [&c.para_vencedor, &c.para_perdedor, &c.para_regiao]
            .iter()
            .all(|s| !s.trim().is_empty()),
        5,
        "incomplete consequencias",
    );
}

fn check_song(checks: &mut Checks, body: &SongFields) {
    checks.require_text(&body.title, 20, "title");
    checks.require_text(&body.lyrics, 40, "lyrics");
    checks.require_text(&body.style, 5, "style");
    checks.require_text(&body.context, 5, "context");
}

fn check_visual_prompt(checks: &mut Checks, body: &VisualPromptFields) {
    checks.require_text(&body.visual_description, 25, "visualDescription");
    checks.require_text(&body.generated_prompt, 40, "generatedPrompt");
    checks.require_text(&body.art_style_used, 5, "artStyleUsed");
}

fn check_script(checks: &mut Checks, body: &ScriptFields) {
    checks.require_text(&body.title, 15, "title");
    checks.require_text(&body.script, 40, "script");
    checks.require_text(&body.video_prompt, 25, "videoPrompt");
    checks.require_text(&body.camera_directions, 5, "cameraDirections");
}
