//! Shared test helpers and stub adapter.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use kimetsu_forge::error::ForgeError;
use kimetsu_forge::models::Vendor;
use kimetsu_forge::provider::ProviderAdapter;

/// One scripted reply.
pub enum Reply {
    Text(String),
    Error(ForgeError),
    /// Sleep before answering; pair with paused tokio time.
    Delayed(Duration, String),
}

/// Adapter that replays queued replies and counts calls.
///
/// Once the queue is empty the last configured fallback reply is used.
pub struct StubAdapter {
    vendor: Vendor,
    replies: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Option<String>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubAdapter {
    pub fn new(vendor: Vendor) -> Arc<Self> {
        Arc::new(Self {
            vendor,
            replies: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn queue_text(&self, text: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Text(text.to_string()));
        self
    }

    pub fn queue_error(&self, error: ForgeError) -> &Self {
        self.replies.lock().unwrap().push_back(Reply::Error(error));
        self
    }

    pub fn queue_delayed(&self, delay: Duration, text: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Delayed(delay, text.to_string()));
        self
    }

    /// Reply used whenever the queue is empty.
    pub fn always(&self, text: &str) -> &Self {
        *self.fallback.lock().unwrap() = Some(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ProviderAdapter for StubAdapter {
    fn vendor(&self) -> Vendor {
        self.vendor
    }

    fn model_id(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, prompt: &str, _api_key: &str) -> Result<String, ForgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Error(err)) => Err(err),
            Some(Reply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => self
                .fallback
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ForgeError::api(500, "stub has no reply queued")),
        }
    }
}

/// Upcast for `Forge::builder().adapters(..)`.
pub fn dyn_adapter(stub: &Arc<StubAdapter>) -> Arc<dyn ProviderAdapter> {
    stub.clone()
}

/// A weapon payload that passes every validation check at level 12, `Rara`.
pub fn weapon_json() -> String {
    serde_json::json!({
        "nome": "Lâmina do Crepúsculo",
        "descricao_curta": "Uma nichirin de aço escurecido.",
        "descricao": "Forjada em uma noite sem lua, a lâmina absorve a luz ao redor.",
        "raridade": "Rara",
        "nivel_sugerido": 12,
        "ganchos_narrativos": [
            "O ferreiro desapareceu após forjá-la.",
            "Um oni teme o seu brilho.",
            "A bainha traz um brasão apagado."
        ],
        "dano": "2d6",
        "dados": "2d6",
        "tipo_de_dano": "Corte",
        "preco_sugerido": 1200
    })
    .to_string()
}

/// Same payload wrapped in a markdown fence with chatter around it.
pub fn fenced(json: &str) -> String {
    format!("Claro! Aqui está o item:\n```json\n{json}\n```\nBom jogo!")
}

/// A weapon payload missing most fields; scores well below the default threshold.
pub fn weak_weapon_json() -> String {
    serde_json::json!({ "nome": "Faca" }).to_string()
}
