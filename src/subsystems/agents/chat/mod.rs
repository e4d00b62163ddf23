//! Chat agent — intercept rules first, hosted model as fallback, every
//! answered turn persisted to the memory log.
//!
//! ```text
//! message ─▶ rules::intercept ──match──▶ canned reply ─┐
//!               │                                      ├─▶ MindLog::append ─▶ answer
//!               └─no match─▶ prompt + last N turns ─▶ LLM ┘
//!                                            │ error
//!                                            └─▶ apology (not persisted)
//! ```

pub mod rules;

use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::llm::LlmProvider;
use crate::subsystems::agents::core::prompt::PromptBuilder;
use crate::subsystems::memory::{MindLog, Turn};
use crate::subsystems::persona::Persona;

pub use rules::{Emotion, Route};

/// Template file under the prompts directory.
pub const PROMPT_FILE: &str = "nova_chat.txt";

/// Used when [`PROMPT_FILE`] is missing.
pub const DEFAULT_PROMPT: &str = r#"Você é a {{nome}}, uma IA com a seguinte personalidade: {{personalidade}}.
Seu objetivo é: {{objetivo}}.
Seu criador e usuário principal se chama {{usuario}}. Trate-o sempre com familiaridade e positividade.
Seu lema é: "{{lema}}".

Abaixo está um histórico recente da sua conversa com {{usuario}}. Use-o para manter o contexto.
---
{{history}}
---

Agora, responda à nova mensagem de {{usuario}} de forma natural e seguindo sua personalidade.

User: "{{user_input}}"
{{nome}}:"#;

/// Result of one chat request.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub answer: String,
    pub route: Route,
    /// `false` when the model failed and the apology was returned instead.
    pub persisted: bool,
}

pub struct ChatService {
    persona: Persona,
    llm: LlmProvider,
    memory: Mutex<MindLog>,
    prompts_dir: PathBuf,
    context_turns: usize,
}

impl ChatService {
    pub fn new(
        persona: Persona,
        llm: LlmProvider,
        memory: MindLog,
        prompts_dir: impl Into<PathBuf>,
        context_turns: usize,
    ) -> Self {
        Self {
            persona,
            llm,
            memory: Mutex::new(memory),
            prompts_dir: prompts_dir.into(),
            context_turns,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Answer `message` and record the turn.
    ///
    /// A model failure is not an error: it is logged and answered with
    /// [`apology`]. Only a memory write failure surfaces as `Err`.
    pub async fn respond(&self, message: &str) -> Result<ChatOutcome, AppError> {
        let (route, answer) = match rules::intercept(message, &self.persona) {
            Some(hit) => hit,
            None => {
                let history = self.memory.lock().await.recent(self.context_turns)?;
                let prompt = build_prompt(&self.prompts_dir, &self.persona, &history, message);
                debug!(history = history.len(), prompt_len = prompt.len(), "routing to model");

                match self.llm.complete(&prompt).await {
                    Ok(resp) => {
                        if let Some(usage) = resp.usage {
                            debug!(input_tokens = usage.input_tokens, output_tokens = usage.output_tokens, "model usage");
                        }
                        (Route::Model, resp.text)
                    }
                    Err(e) => {
                        warn!(provider = self.llm.name(), error = %e, "model call failed — answering with apology");
                        return Ok(ChatOutcome {
                            answer: apology(&self.persona),
                            route: Route::Model,
                            persisted: false,
                        });
                    }
                }
            }
        };

        let turn = Turn::now(message, answer.as_str());
        let stored = self.memory.lock().await.append(turn)?;

        info!(
            %route,
            stored,
            user = %preview(message),
            reply = %preview(&answer),
            "turn recorded"
        );

        Ok(ChatOutcome { answer, route, persisted: true })
    }
}

/// Fixed reply used when the hosted model cannot be reached.
pub fn apology(persona: &Persona) -> String {
    format!(
        "Uhm, {}, meu cérebro deu um nó aqui. 🧠 Pode tentar de novo?",
        persona.operator()
    )
}

/// Render history turns the way the model sees them, oldest first.
pub fn format_history(persona: &Persona, history: &[Turn]) -> String {
    history
        .iter()
        .map(|t| format!("User: \"{}\"\n{}: \"{}\"", t.user_input, persona.name(), t.reply))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the fallback prompt from the template, persona, history and message.
pub fn build_prompt(
    prompts_dir: impl Into<PathBuf>,
    persona: &Persona,
    history: &[Turn],
    message: &str,
) -> String {
    PromptBuilder::new(prompts_dir)
        .layer_or(PROMPT_FILE, DEFAULT_PROMPT)
        .with_vars([
            ("nome", persona.name()),
            ("usuario", persona.operator()),
            ("objetivo", persona.goal()),
            ("lema", persona.motto()),
            ("user_input", message),
        ])
        .var("personalidade", persona.traits_json())
        .var("history", format_history(persona, history))
        .build()
}

fn preview(text: &str) -> String {
    const MAX: usize = 50;
    if text.chars().count() > MAX {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
