//! Prompt construction.
//!
//! [`build_prompt`] is pure: the same request always yields the same text.

pub mod templates;

pub use templates::Template;

use crate::types::{Category, GenerationRequest, RANDOM_RARITY};

/// House style shared by every category.
pub const THEMATIC_CONTEXT: &str = r#"
## CONTEXTO VISUAL
Você opera dentro de uma interface inspirada em Demon Slayer com abas temáticas.
Cada aba possui identidade visual única e atmosfera narrativa própria.

## SISTEMA DE ABAS
### CONFLITOS (Guerra)
**Atmosfera:** Tensa, épica, cinematográfica como o arco do Trem Infinito.
### FORJA (Itens)
**Atmosfera:** Artesanal, detalhista, reverência pela forja de Haganezuka.
### MESTRE (Ferramentas)
**Atmosfera:** Sábia, analítica, como Ubuyashiki guiando os Hashira.
### MUNDO (Locações)
**Atmosfera:** Exploratória, misteriosa, como a Fortaleza Infinita.
### PERSONAGENS
**Atmosfera:** Carismática, profunda, backstories como a de Rengoku.
### TÉCNICAS
**Atmosfera:** Explosiva, dinâmica, formas de respiração em ação.
### BARDO (Música)
**Atmosfera:** Melancólica, heróica, sons de shamisen e flauta.
### VISUALIZADOR (Prompts)
**Atmosfera:** Criativa, descritiva, foco em direção de arte.
### ROTEIRISTA (Script)
**Atmosfera:** Cinematográfica, estruturada, foco em ritmo e câmera.

## DIRETRIZES NARRATIVAS
1. Use referências de Demon Slayer quando apropriado.
2. Equilibre mecânicas de RPG com narrativa cinematográfica.
3. Crie momentos dignos de uma animação da Ufotable.
4. Mantenha o tom imersivo e épico.
"#;

const CREATOR_PERSONA: &str = "Você é um mestre de RPG e escritor criativo para o universo \"Kimetsu Forge\". Sua tarefa é gerar um conceito que se encaixe perfeitamente no sistema e na atmosfera descritos abaixo.";

const ARTISAN_PERSONA: &str = "Você é um mestre artesão de RPG. Sua tarefa é pegar o texto narrativo fornecido e estruturá-lo perfeitamente no formato JSON abaixo.";

const CLOSING_DIRECTIVE: &str = "Produza APENAS o objeto JSON.";

/// Build the full instruction text for one request.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let template = Template::for_category(request.category);
    let expansion = request
        .expansion_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let mut prompt = String::with_capacity(4096);
    prompt.push_str(if expansion.is_some() {
        ARTISAN_PERSONA
    } else {
        CREATOR_PERSONA
    });
    prompt.push('\n');
    prompt.push_str(THEMATIC_CONTEXT);
    prompt.push_str(
        "\n\nA resposta DEVE ser um objeto JSON VÁLIDO, sem nenhum texto ou formatação adicional fora do JSON. A estrutura do JSON deve ser a seguinte:\n{",
    );
    prompt.push_str(template.shape());
    prompt.push_str("}\n\n");

    if let Some(text) = expansion {
        prompt.push_str("Use o seguinte texto como material principal:\n---\n");
        prompt.push_str(text);
        prompt.push_str("\n---\n");
    }

    prompt.push_str(&format!(
        "Agora, gere o conteúdo com base nesta solicitação do usuário:\n- **Aba/Categoria Principal:** {}\n",
        request.category
    ));
    prompt.push_str(&specification_lines(request).join("\n"));

    if let Some(modifier) = request.modifier() {
        prompt.push_str(&format!(
            "\n- **Instrução Adicional (Prioridade Alta):** \"{modifier}\". Use isso para guiar a geração."
        ));
    }

    prompt.push_str("\n\n");
    prompt.push_str(CLOSING_DIRECTIVE);
    prompt
}

/// Category-dependent filter lines. Each branch reads a different field set.
fn specification_lines(request: &GenerationRequest) -> Vec<String> {
    let mut lines = Vec::new();

    if request.category == Category::ClanWar {
        let conflict = request.conflict.clone().unwrap_or_default();
        lines.push(format!("- **Clã Atacante:** {}", conflict.attacking_clan));
        lines.push(format!("- **Clã Defensor:** {}", conflict.defending_clan));
        lines.push(format!("- **Terreno:** {}", conflict.terrain));
        lines.push(format!("- **Estratégia:** {}", conflict.strategy));
    } else if request.category == Category::Music {
        let music = request.music.clone().unwrap_or_default();
        lines.push(format!(
            "- **Estilo Musical:** {}",
            music.style.as_deref().unwrap_or("Aleatório")
        ));
        lines.push(format!(
            "- **Tema Lírico:** {}",
            music.lyrics_theme.as_deref().unwrap_or("Épico/Trágico")
        ));
    } else if request.category == Category::VisualPrompt {
        lines.push(format!(
            "- **Estilo de Arte:** {}",
            request.art_style.as_deref().unwrap_or("Anime Ufotable")
        ));
    } else {
        lines.push(format!(
            "- **Raridade:** {}",
            request.rarity.map(|r| r.label()).unwrap_or(RANDOM_RARITY)
        ));
        lines.push(format!("- **Nível:** {}", request.level));
        if !request.thematics.is_empty() {
            lines.push(format!("- **Temática:** {}", request.thematics.join(", ")));
        }
        if let Some(country) = request.country() {
            lines.push(format!("- **Cultura:** {country}"));
        }
        if let Some(tone) = request.tone() {
            lines.push(format!("- **Tom:** {tone}"));
        }
    }

    lines
}
