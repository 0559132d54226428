//! End-to-end tests of the forge using stub adapters.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{dyn_adapter, fenced, weak_weapon_json, weapon_json, StubAdapter};
use kimetsu_forge::config::{ProviderKeySet, TimeoutSettings};
use kimetsu_forge::error::{ErrorCategory, ForgeError};
use kimetsu_forge::models::Vendor;
use kimetsu_forge::store::{CreationStore, MemoryStore};
use kimetsu_forge::types::*;
use kimetsu_forge::validation::ValidationPolicy;
use kimetsu_forge::Forge;
use pretty_assertions::assert_eq;

struct Chain {
    gemini: Arc<StubAdapter>,
    deepseek: Arc<StubAdapter>,
    openai: Arc<StubAdapter>,
}

impl Chain {
    fn new() -> Self {
        Self {
            gemini: StubAdapter::new(Vendor::Gemini),
            deepseek: StubAdapter::new(Vendor::DeepSeek),
            openai: StubAdapter::new(Vendor::OpenAi),
        }
    }

    fn forge(&self) -> Forge {
        self.builder().build().unwrap()
    }

    fn builder(&self) -> kimetsu_forge::ForgeBuilder {
        Forge::builder().adapters(vec![
            dyn_adapter(&self.gemini),
            dyn_adapter(&self.deepseek),
            dyn_adapter(&self.openai),
        ])
    }

    fn total_calls(&self) -> usize {
        self.gemini.calls() + self.deepseek.calls() + self.openai.calls()
    }
}

fn all_keys() -> ProviderKeySet {
    ProviderKeySet::new()
        .with(Vendor::Gemini, "g-key")
        .with(Vendor::DeepSeek, "d-key")
        .with(Vendor::OpenAi, "o-key")
}

fn weapon_request() -> GenerationRequest {
    GenerationRequest::builder()
        .category(Category::Weapon)
        .rarity(Rarity::Rare)
        .level(12)
        .build()
}

#[tokio::test]
async fn deepseek_only_key_produces_weapon_from_fenced_output() {
    let chain = Chain::new();
    chain.deepseek.queue_text(&fenced(&weapon_json()));

    let keys = ProviderKeySet::new().with(Vendor::DeepSeek, "d-key");
    let item = chain.forge().generate(&weapon_request(), &keys).await.unwrap();

    assert_eq!(chain.gemini.calls(), 0);
    assert_eq!(chain.deepseek.calls(), 1);
    assert_eq!(chain.openai.calls(), 0);

    assert_eq!(item.provenance.len(), 1);
    assert_eq!(item.provenance[0].model, "deepseek");
    assert_eq!(item.provenance[0].status, AttemptStatus::Success);
    assert_eq!(item.model(), Some("deepseek"));
    assert_eq!(item.category, Category::Weapon);

    let ItemBody::Equipment(equipment) = &item.body else {
        panic!("expected equipment body, got {:?}", item.body);
    };
    assert_eq!(equipment.dano, "2d6");
    assert_eq!(item.base.nivel_sugerido, 12);

    let validation = item.validation.as_ref().unwrap();
    assert_eq!(validation.attempts, 1);
    assert!(validation.score >= 70);
    assert!(!item.is_low_confidence());

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["categoria"], "Arma");
    assert_eq!(json["dano"], "2d6");
    assert_eq!(json["provenance"][0]["model"], "deepseek");
    assert!(json["_validation"]["score"].is_u64());
}

#[tokio::test]
async fn obsidian_blade_scenario_through_deepseek() {
    let chain = Chain::new();
    chain.deepseek.queue_text(
        "```json\n{\"nome\":\"Lâmina de Obsidiana\",\"descricao_curta\":\"...\",\"descricao\":\"...\",\"raridade\":\"Rara\",\"nivel_sugerido\":12,\"ganchos_narrativos\":[\"a\",\"b\",\"c\"],\"dano\":\"2d6\",\"dados\":\"2d6\",\"tipo_de_dano\":\"corte\",\"preco_sugerido\":500}\n```",
    );
    let request = GenerationRequest::builder()
        .category(Category::Weapon)
        .rarity(Rarity::Rare)
        .level(12)
        .modifier("feito de obsidiana vulcânica")
        .build();
    let keys = ProviderKeySet::new().with(Vendor::DeepSeek, "d-key");

    let item = chain.forge().generate(&request, &keys).await.unwrap();

    assert_eq!(item.provenance[0].model, "deepseek");
    let ItemBody::Equipment(equipment) = &item.body else {
        panic!("expected equipment body, got {:?}", item.body);
    };
    assert_eq!(equipment.dano, "2d6");
    assert_eq!(item.base.nome, "Lâmina de Obsidiana");
    assert_eq!(chain.total_calls(), 1);

    let prompt = chain.deepseek.last_prompt().unwrap();
    assert!(prompt.contains("\"feito de obsidiana vulcânica\""), "{prompt}");
    assert!(prompt.contains("- **Raridade:** Rara"));
    assert!(prompt.contains("- **Nível:** 12"));
}

#[tokio::test]
async fn first_parseable_object_wins_even_with_loose_nested_fields() {
    let chain = Chain::new();
    chain.gemini.queue_text(
        &serde_json::json!({
            "nome": "Kokushibo das Cinzas",
            "descricao_curta": "Um oni que arde sem chama.",
            "descricao": "Vaga pelas vilas queimadas do norte.",
            "raridade": "Épica",
            "nivel_sugerido": 10,
            "ganchos_narrativos": ["a", "b", "c"],
            "power_level": "Lua Inferior",
            "kekkijutsu": "Chamas Negras",
            "comportamento_combate": ["Ataca à distância"]
        })
        .to_string(),
    );
    chain.deepseek.always(&weapon_json());
    let request = GenerationRequest::builder()
        .category(Category::Oni)
        .rarity(Rarity::Epic)
        .level(10)
        .build();
    let keys = ProviderKeySet::new().with(Vendor::Gemini, "g-key");

    let item = chain.forge().generate(&request, &keys).await.unwrap();

    assert_eq!(item.model(), Some("gemini"));
    assert_eq!(item.provenance.len(), 1);
    let ItemBody::Antagonist(oni) = &item.body else {
        panic!("expected antagonist body");
    };
    assert_eq!(oni.kekkijutsu.nome, "Chamas Negras");
    let validation = item.validation.as_ref().unwrap();
    assert!(validation
        .warnings
        .iter()
        .any(|w| w == "missing kekkijutsu.descricao"));
}

#[tokio::test]
async fn no_credentials_fails_without_calling_anyone() {
    let chain = Chain::new();
    let err = chain
        .forge()
        .generate(&weapon_request(), &ProviderKeySet::new())
        .await
        .unwrap_err();

    match &err {
        ForgeError::NoProviderAvailable { attempts } => assert!(attempts.is_empty()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.category(), ErrorCategory::Unavailable);
    assert_eq!(chain.total_calls(), 0);
}

#[tokio::test]
async fn falls_back_in_priority_order() {
    let chain = Chain::new();
    chain.gemini.queue_error(ForgeError::api(503, "overloaded"));
    chain.deepseek.queue_text("Desculpe, não consigo ajudar com isso.");
    chain.openai.queue_text(&weapon_json());

    let item = chain.forge().generate(&weapon_request(), &all_keys()).await.unwrap();

    let trail: Vec<(&str, AttemptStatus)> = item
        .provenance
        .iter()
        .map(|p| (p.model.as_str(), p.status))
        .collect();
    assert_eq!(
        trail,
        vec![
            ("gemini", AttemptStatus::Failed),
            ("deepseek", AttemptStatus::Failed),
            ("openai", AttemptStatus::Success),
        ]
    );
    assert!(item.provenance[0].error.as_deref().unwrap().contains("overloaded"));
    assert_eq!(item.model(), Some("openai"));
}

#[tokio::test]
async fn first_success_stops_the_chain() {
    let chain = Chain::new();
    chain.gemini.queue_text(&weapon_json());

    let item = chain.forge().generate(&weapon_request(), &all_keys()).await.unwrap();
    assert_eq!(item.model(), Some("gemini"));
    assert_eq!(chain.deepseek.calls(), 0);
    assert_eq!(chain.openai.calls(), 0);
}

#[tokio::test]
async fn every_provider_failing_aggregates_all_errors() {
    let chain = Chain::new();
    chain.gemini.queue_error(ForgeError::Authentication("bad key".into()));
    chain.deepseek.queue_text("not json at all");
    chain.openai.queue_error(ForgeError::ContentFiltered("blocked".into()));

    let err = chain
        .forge()
        .generate(&weapon_request(), &all_keys())
        .await
        .unwrap_err();

    let ForgeError::NoProviderAvailable { attempts } = &err else {
        panic!("unexpected error: {err:?}");
    };
    let vendors: Vec<Vendor> = attempts.iter().map(|a| a.vendor).collect();
    assert_eq!(vendors, vec![Vendor::Gemini, Vendor::DeepSeek, Vendor::OpenAi]);

    let text = err.to_string();
    assert!(text.contains("bad key"), "{text}");
    assert!(text.contains("blocked"), "{text}");
}

#[tokio::test]
async fn adapter_order_from_builder_is_respected() {
    let chain = Chain::new();
    chain.openai.queue_text(&weapon_json());
    let forge = Forge::builder()
        .adapters(vec![dyn_adapter(&chain.openai), dyn_adapter(&chain.gemini)])
        .build()
        .unwrap();

    assert_eq!(forge.priority(), vec![Vendor::OpenAi, Vendor::Gemini]);
    let item = forge.generate(&weapon_request(), &all_keys()).await.unwrap();
    assert_eq!(item.model(), Some("openai"));
    assert_eq!(chain.gemini.calls(), 0);
}

#[tokio::test]
async fn low_score_reruns_the_whole_chain() {
    let chain = Chain::new();
    chain.gemini.queue_text(&weak_weapon_json());
    chain.gemini.queue_error(ForgeError::api(500, "flaky"));
    chain.deepseek.queue_text(&weapon_json());

    let item = chain.forge().generate(&weapon_request(), &all_keys()).await.unwrap();

    assert_eq!(chain.gemini.calls(), 2);
    assert_eq!(chain.deepseek.calls(), 1);
    let validation = item.validation.as_ref().unwrap();
    assert_eq!(validation.attempts, 2);
    assert!(!validation.degraded);
    // Provenance describes the accepted run only.
    assert_eq!(item.provenance.len(), 2);
    assert_eq!(item.model(), Some("deepseek"));
}

#[tokio::test]
async fn exhausted_attempts_return_best_result_flagged() {
    let chain = Chain::new();
    chain.gemini.always(&weak_weapon_json());

    let item = chain.forge().generate(&weapon_request(), &all_keys()).await.unwrap();

    assert_eq!(chain.gemini.calls(), 3);
    let validation = item.validation.as_ref().unwrap();
    assert_eq!(validation.attempts, 3);
    assert!(validation.degraded);
    assert!(validation.score < 70);
    assert!(!validation.warnings.is_empty());
    assert!(item.is_low_confidence());
    // Flagged base fields are returned as the model wrote them.
    assert!(item.base.raridade.is_empty());
    assert_eq!(item.base.nivel_sugerido, 0);
    assert!(validation.warnings.iter().any(|w| w.contains("nivel_sugerido 0")));
}

#[tokio::test]
async fn custom_policy_bounds_attempts() {
    let chain = Chain::new();
    chain.gemini.always(&weak_weapon_json());
    let forge = chain
        .builder()
        .validation(ValidationPolicy {
            max_attempts: 1,
            threshold: 70,
        })
        .build()
        .unwrap();

    let item = forge.generate(&weapon_request(), &all_keys()).await.unwrap();
    assert_eq!(chain.gemini.calls(), 1);
    assert!(item.is_low_confidence());
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out_and_next_one_answers() {
    let chain = Chain::new();
    chain
        .gemini
        .queue_delayed(Duration::from_secs(120), &weapon_json());
    chain.deepseek.queue_text(&weapon_json());

    let item = chain.forge().generate(&weapon_request(), &all_keys()).await.unwrap();

    assert_eq!(item.provenance[0].model, "gemini");
    assert_eq!(item.provenance[0].status, AttemptStatus::Failed);
    assert!(item.provenance[0]
        .error
        .as_deref()
        .unwrap()
        .contains("Timeout"));
    assert_eq!(item.model(), Some("deepseek"));
}

#[tokio::test(start_paused = true)]
async fn exhausted_deadline_skips_remaining_providers() {
    let chain = Chain::new();
    chain
        .gemini
        .queue_delayed(Duration::from_secs(100), &weapon_json());
    chain
        .deepseek
        .queue_delayed(Duration::from_secs(100), &weapon_json());
    chain.openai.queue_text(&weapon_json());

    let forge = chain
        .builder()
        .timeouts(TimeoutSettings {
            per_call_secs: 60,
            total_secs: 90,
        })
        .validation(ValidationPolicy {
            max_attempts: 1,
            threshold: 70,
        })
        .build()
        .unwrap();

    let err = forge
        .generate(&weapon_request(), &all_keys())
        .await
        .unwrap_err();
    let ForgeError::NoProviderAvailable { attempts } = err else {
        panic!("expected aggregated failure");
    };
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[2].vendor, Vendor::OpenAi);
    assert!(attempts[2].message.contains("deadline"));
    assert_eq!(chain.openai.calls(), 0);
}

#[tokio::test]
async fn clan_war_without_conflict_is_rejected_before_any_call() {
    let chain = Chain::new();
    let request = GenerationRequest::builder()
        .category(Category::ClanWar)
        .build();

    let err = chain.forge().generate(&request, &all_keys()).await.unwrap_err();
    assert!(matches!(err, ForgeError::InvalidArgument(_)));
    assert_eq!(chain.total_calls(), 0);
}

#[tokio::test]
async fn clan_war_payload_decodes_into_battle_report() {
    let chain = Chain::new();
    chain.gemini.queue_text(
        &serde_json::json!({
            "titulo": "A Queda do Vale Nebuloso",
            "resumo_resultado": "O clã Kamado resistiu.",
            "narrativa_batalha": "Sob a neblina, as lâminas cruzaram-se até o amanhecer.",
            "fases_batalha": [
                {"fase": "Início", "descricao": "Escaramuças nas encostas."},
                {"fase": "Clímax", "descricao": "O portão cede."},
                {"fase": "Desfecho", "descricao": "Retirada ao alvorecer."}
            ],
            "momentos_chave": ["A ponte cai", "O general tomba"],
            "consequencias": {
                "para_vencedor": "Controle do vale.",
                "para_perdedor": "Exílio.",
                "para_regiao": "Comércio interrompido."
            }
        })
        .to_string(),
    );
    let request = GenerationRequest::builder()
        .category(Category::ClanWar)
        .conflict(ConflictOptions {
            attacking_clan: "Clã Shinazugawa".into(),
            defending_clan: "Clã Kamado".into(),
            terrain: "Vale".into(),
            strategy: "Cerco".into(),
        })
        .build();

    let item = chain.forge().generate(&request, &all_keys()).await.unwrap();
    let ItemBody::ClanWar(war) = &item.body else {
        panic!("expected clan war body");
    };
    assert_eq!(war.fases_batalha.len(), 3);
    assert_eq!(item.base.nome, "A Queda do Vale Nebuloso");
    assert!(!item.is_low_confidence());

    let prompt = chain.gemini.last_prompt().unwrap();
    assert!(prompt.contains("Clã Shinazugawa"));
    assert!(prompt.contains("Clã Kamado"));
}

#[tokio::test]
async fn store_records_each_item_of_a_batch() {
    let chain = Chain::new();
    chain.gemini.always(&weapon_json());
    let store = Arc::new(MemoryStore::new());
    let forge = chain.builder().store(store.clone()).build().unwrap();

    let items = forge
        .generate_batch(&weapon_request(), &all_keys(), 3)
        .await
        .unwrap();
    assert_eq!(items.len(), 3);

    let history = store.history(None).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].id, items[2].id);
}

#[tokio::test]
async fn batch_stops_at_first_error() {
    let chain = Chain::new();
    chain.gemini.queue_text(&weapon_json());
    let keys = ProviderKeySet::new().with(Vendor::Gemini, "g-key");

    let err = chain
        .forge()
        .generate_batch(&weapon_request(), &keys, 3)
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::NoProviderAvailable { .. }));
    assert_eq!(chain.gemini.calls(), 2);
}
