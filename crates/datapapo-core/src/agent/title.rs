//! Session title generation via LLM.
//!
//! `generate_title` creates a short, descriptive title for a chat session
//! based on the first user-assistant exchange.

use datapapo_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::llm::box_provider::BoxLlmProvider;

/// System prompt for the title generation LLM call.
const TITLE_SYSTEM_PROMPT: &str = r#"Gere um título curto e descritivo (3 a 7 palavras, em português) para esta conversa de análise de dados, com base na primeira troca de mensagens. Retorne APENAS o texto do título, nada mais.

Exemplos:
- "Distribuição de idade dos clientes"
- "Vendas por região e mês"
- "Correlação entre preço e demanda""#;

/// Generate a session title from the first user-assistant exchange.
///
/// Uses an LLM call at low temperature (0.3) with a strict prompt to
/// produce a concise title. The result is trimmed of whitespace and
/// surrounding quotes.
#[tracing::instrument(
    name = "generate_title",
    skip(provider, first_user_message, first_assistant_message),
    fields(model = %model)
)]
pub async fn generate_title(
    provider: &BoxLlmProvider,
    first_user_message: &str,
    first_assistant_message: &str,
    model: &str,
) -> Result<String, LlmError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![
            Message {
                role: MessageRole::User,
                content: first_user_message.to_string(),
            },
            Message {
                role: MessageRole::Assistant,
                content: first_assistant_message.to_string(),
            },
            Message {
                role: MessageRole::User,
                content: "Com base na troca acima, gere um título.".to_string(),
            },
        ],
        system: Some(TITLE_SYSTEM_PROMPT.to_string()),
        max_tokens: 50,
        temperature: Some(0.3),
        stream: false,
        stop_sequences: None,
    };

    let response = provider.complete(&request).await?;

    // Trim whitespace and surrounding quotes from the title
    let title = response
        .content
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string();

    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimming() {
        let raw = "  \"Distribuição de idade\"  ";
        let title = raw.trim().trim_matches('"').trim_matches('\'').trim();
        assert_eq!(title, "Distribuição de idade");
    }

    #[test]
    fn test_title_trimming_single_quotes() {
        let raw = "'Vendas por região'";
        let title = raw.trim().trim_matches('"').trim_matches('\'').trim();
        assert_eq!(title, "Vendas por região");
    }

    #[test]
    fn test_title_system_prompt_constraints() {
        assert!(TITLE_SYSTEM_PROMPT.contains("3 a 7 palavras"));
        assert!(TITLE_SYSTEM_PROMPT.contains("APENAS o texto do título"));
    }
}
