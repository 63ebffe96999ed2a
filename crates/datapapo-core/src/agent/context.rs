//! Agent conversation context.
//!
//! AgentContext holds all the state needed for a conversation: the LLM
//! configuration, the dataset profile, the running conversation history,
//! and the assembled system prompt. Replacing the dataset rebuilds the
//! prompt and clears the history -- the one consistency invariant of the
//! session state.

use datapapo_types::dataset::DatasetProfile;
use datapapo_types::llm::{Message, MessageRole};

use crate::dataset::profile::to_prompt_context;

use super::prompt::AnalystPromptBuilder;

/// LLM configuration for the analysis agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.0,
            max_tokens: 4096,
        }
    }
}

/// Holds all state needed for an agent conversation over one dataset.
#[derive(Debug, Clone)]
pub struct AgentContext {
    /// LLM configuration.
    pub agent_config: AgentConfig,
    /// Profile of the dataset under analysis.
    pub profile: DatasetProfile,
    /// Running conversation history (user + assistant messages).
    pub conversation_history: Vec<Message>,
    /// Pre-built system prompt assembled from protocol + profile.
    pub system_prompt: String,
}

impl AgentContext {
    /// Create a new agent context for a dataset.
    ///
    /// Builds the system prompt immediately from the profile.
    pub fn new(config: AgentConfig, profile: DatasetProfile) -> Self {
        let system_prompt = AnalystPromptBuilder::build(&config, &to_prompt_context(&profile));

        Self {
            agent_config: config,
            profile,
            conversation_history: Vec::new(),
            system_prompt,
        }
    }

    /// Replace the dataset under analysis.
    ///
    /// Rebuilds the system prompt for the new profile and clears the
    /// conversation history: a new upload starts a fresh conversation.
    pub fn replace_dataset(&mut self, profile: DatasetProfile) {
        self.system_prompt =
            AnalystPromptBuilder::build(&self.agent_config, &to_prompt_context(&profile));
        self.profile = profile;
        self.conversation_history.clear();
    }

    /// Add a user message to the conversation history.
    pub fn add_user_message(&mut self, content: String) {
        self.conversation_history.push(Message {
            role: MessageRole::User,
            content,
        });
    }

    /// Add an assistant message to the conversation history.
    pub fn add_assistant_message(&mut self, content: String) {
        self.conversation_history.push(Message {
            role: MessageRole::Assistant,
            content,
        });
    }

    /// Build the message list for an LLM request.
    ///
    /// The system prompt is sent separately, not as a message.
    pub fn build_messages(&self) -> Vec<Message> {
        self.conversation_history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::dataset::{ColumnProfile, ColumnType};

    fn test_profile(source: &str) -> DatasetProfile {
        DatasetProfile {
            source: source.to_string(),
            row_count: 3,
            column_count: 1,
            duplicate_rows: 0,
            columns: vec![ColumnProfile {
                name: "idade".to_string(),
                column_type: ColumnType::Int,
                null_count: 0,
                distinct_count: 3,
                min_value: Some("20".to_string()),
                max_value: Some("40".to_string()),
                numeric: None,
                sample_values: vec!["20".to_string()],
            }],
            head: vec![],
        }
    }

    #[test]
    fn test_context_new_builds_system_prompt() {
        let ctx = AgentContext::new(AgentConfig::default(), test_profile("vendas.csv"));
        assert!(ctx.system_prompt.contains("<protocolo>"));
        assert!(ctx.system_prompt.contains("vendas.csv"));
        assert!(ctx.system_prompt.contains("<instrucoes>"));
        assert!(ctx.conversation_history.is_empty());
    }

    #[test]
    fn test_add_messages() {
        let mut ctx = AgentContext::new(AgentConfig::default(), test_profile("vendas.csv"));
        ctx.add_user_message("Qual a média de idade?".to_string());
        ctx.add_assistant_message("A média é 30 anos.".to_string());

        assert_eq!(ctx.conversation_history.len(), 2);
        assert_eq!(ctx.conversation_history[0].role, MessageRole::User);
        assert_eq!(ctx.conversation_history[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_replace_dataset_clears_history_and_rebuilds_prompt() {
        let mut ctx = AgentContext::new(AgentConfig::default(), test_profile("vendas.csv"));
        ctx.add_user_message("oi".to_string());
        ctx.add_assistant_message("olá".to_string());

        ctx.replace_dataset(test_profile("clientes.csv"));

        assert!(ctx.conversation_history.is_empty());
        assert!(ctx.system_prompt.contains("clientes.csv"));
        assert!(!ctx.system_prompt.contains("vendas.csv"));
        assert_eq!(ctx.profile.source, "clientes.csv");
    }

    #[test]
    fn test_build_messages_clones_history() {
        let mut ctx = AgentContext::new(AgentConfig::default(), test_profile("vendas.csv"));
        ctx.add_user_message("pergunta".to_string());
        let messages = ctx.build_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "pergunta");
    }
}
