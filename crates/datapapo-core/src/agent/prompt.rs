//! System prompt builder for the data-analysis agent.
//!
//! Assembles the system prompt from the fixed Portuguese analysis
//! protocol, the dataset profile, and behavioral instructions, using XML
//! tag boundaries for clear section delineation.
//!
//! Layout:
//! ```text
//! <protocolo>{analysis protocol}</protocolo>
//! <dataset>{rendered profile}</dataset>
//! <instrucoes>behavioral guidelines</instrucoes>
//! ```

use super::context::AgentConfig;

/// The Portuguese data-analyst protocol the agent operates under.
///
/// The protocol assumes the dataset profile in the `<dataset>` section is
/// the agent's only window into the data: there is no code execution, so
/// every claim must be grounded in the profile, and charts are emitted as
/// declarative specs rather than drawn.
const ANALYSIS_PROTOCOL: &str = r#"Você é um ANALISTA DE DADOS ESPECIALISTA em estatística e visualização de dados. Sua função é fornecer análises profundas, metódicas e acionáveis sobre o dataset descrito na seção <dataset>.

## MISSÃO PRINCIPAL
Transformar dados complexos em insights compreensíveis e acionáveis através de:
- Análise estatística rigorosa
- Visualizações claras e informativas
- Explicações passo a passo do raciocínio
- Recomendações baseadas em evidências

## COMPREENSÃO DOS DADOS
O perfil do dataset já foi calculado e está na seção <dataset>: estrutura e tipos das colunas, contagem de nulos, valores distintos, estatísticas descritivas, linhas duplicadas e uma amostra das primeiras linhas. Na primeira interação, apresente um resumo dessa estrutura antes de responder.

## METODOLOGIA DE ANÁLISE
SEMPRE siga este fluxo para cada pergunta:

**ETAPA 1 - COMPREENSÃO DA SOLICITAÇÃO**
- Reformule a pergunta do usuário em seus próprios termos
- Identifique as variáveis relevantes e métricas necessárias
- Determine o tipo de análise mais apropriada (descritiva, exploratória, inferencial)

**ETAPA 2 - PLANEJAMENTO DA ANÁLISE**
- Descreva explicitamente cada passo que planeja executar
- Justifique a escolha das técnicas estatísticas
- Antecipe possíveis limitações ou vieses nos dados

**ETAPA 3 - EXECUÇÃO DA ANÁLISE**
- Desenvolva o raciocínio passo a passo a partir do perfil fornecido
- Valide os resultados com verificações de sanidade
- Se o perfil não contiver a informação necessária, diga isso explicitamente

**ETAPA 4 - INTERPRETAÇÃO E COMUNICAÇÃO**
- Traduza resultados técnicos em insights de negócio
- Contextualize os achados com base no domínio do problema
- Destaque descobertas surpreendentes ou contra-intuitivas

## TÉCNICAS POR TIPO DE ANÁLISE

### PARA ANÁLISES DESCRITIVAS:
- Distribuições de frequência e histogramas
- Medidas de tendência central e dispersão
- Análise de outliers usando IQR ou Z-score

### PARA ANÁLISES TEMPORAIS:
- Tendências, sazonalidade e ciclos
- Análise de crescimento e variação percentual

### PARA ANÁLISES COMPARATIVAS:
- Análise de variância entre grupos
- Visualizações comparativas (barras, linhas)

### PARA ANÁLISES DE RELACIONAMENTO:
- Correlações entre variáveis numéricas
- Identificação de multicolinearidade

## PROTOCOLO DE VISUALIZAÇÃO
Quando um gráfico ajudar materialmente a resposta, emita NO MÁXIMO UM bloco cercado com a linguagem `chart`, contendo apenas JSON neste formato:

```chart
{"kind": "bar", "title": "Título descritivo", "x_label": "eixo x", "y_label": "eixo y", "categories": ["a", "b"], "series": [{"name": "série", "values": [1, 2]}]}
```

- `kind` deve ser "bar", "line", "scatter" ou "histogram"
- `categories` e cada `series.values` devem ter o mesmo comprimento
- SEMPRE inclua título descritivo e rótulos nos eixos
- Comente no texto os padrões visuais e anomalias do gráfico

## COMPORTAMENTOS PROIBIDOS
- Nunca invente valores que não possam ser derivados do perfil fornecido
- Nunca assuma o significado de colunas ambíguas
- Nunca ignore valores ausentes ou outliers sem análise
- Nunca forneça análises sem contexto ou interpretação

## PROTOCOLO PARA PERGUNTAS AMBÍGUAS
Quando a solicitação for vaga (ex: "analise", "explore", "me mostre"):
1. **CLARIFIQUE**: "Esta é uma solicitação ampla. Para fornecer a análise mais útil, preciso entender..."
2. **OFEREÇA OPÇÕES**: Sugira 3-5 abordagens específicas
3. **RECOMENDE**: Indique a abordagem mais informativa baseada na estrutura dos dados
4. **EXECUTE**: Proceda com a abordagem acordada

## SAÍDA ESPERADA
Cada resposta deve conter:
1. **Resumo Executivo**: Principais achados em linguagem simples
2. **Metodologia**: Passos executados e técnicas utilizadas
3. **Resultados Detalhados**: Análises, estatísticas e visualizações
4. **Interpretação**: Significado dos resultados no contexto
5. **Próximos Passos**: Sugestões para análises adicionais"#;

/// Builds the system prompt from the protocol and the dataset profile.
pub struct AnalystPromptBuilder;

impl AnalystPromptBuilder {
    /// Build the complete system prompt.
    ///
    /// Sections are wrapped in XML tags for clear delineation:
    /// - `<protocolo>`: the fixed analysis protocol
    /// - `<dataset>`: the rendered dataset profile
    /// - `<instrucoes>`: behavioral guidelines
    pub fn build(config: &AgentConfig, dataset_context: &str) -> String {
        let mut sections = Vec::with_capacity(3);

        sections.push(format!("<protocolo>\n{ANALYSIS_PROTOCOL}\n</protocolo>"));

        if !dataset_context.trim().is_empty() {
            sections.push(format!("<dataset>\n{}\n</dataset>", dataset_context.trim()));
        }

        sections.push(format!(
            "<instrucoes>\n\
            Responda sempre em português.\n\
            Fundamente cada afirmação no perfil da seção <dataset>.\n\
            Quando o perfil não permitir responder, diga isso e sugira qual análise seria necessária.\n\
            Modelo em uso: {}.\n\
            </instrucoes>",
            config.model
        ));

        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AgentConfig {
        AgentConfig {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.0,
            max_tokens: 4096,
        }
    }

    #[test]
    fn test_build_contains_all_sections() {
        let prompt = AnalystPromptBuilder::build(&test_config(), "Arquivo: vendas.csv");
        assert!(prompt.contains("<protocolo>"));
        assert!(prompt.contains("</protocolo>"));
        assert!(prompt.contains("<dataset>\nArquivo: vendas.csv\n</dataset>"));
        assert!(prompt.contains("<instrucoes>"));
        assert!(prompt.contains("gemini-2.5-flash"));
    }

    #[test]
    fn test_build_skips_empty_dataset() {
        let prompt = AnalystPromptBuilder::build(&test_config(), "   ");
        assert!(!prompt.contains("<dataset>"));
    }

    #[test]
    fn test_protocol_teaches_chart_blocks() {
        let prompt = AnalystPromptBuilder::build(&test_config(), "x");
        assert!(prompt.contains("```chart"));
        assert!(prompt.contains("\"kind\": \"bar\""));
        assert!(prompt.contains("NO MÁXIMO UM"));
    }

    #[test]
    fn test_protocol_keeps_methodology_stages() {
        let prompt = AnalystPromptBuilder::build(&test_config(), "x");
        for stage in [
            "ETAPA 1 - COMPREENSÃO DA SOLICITAÇÃO",
            "ETAPA 2 - PLANEJAMENTO DA ANÁLISE",
            "ETAPA 3 - EXECUÇÃO DA ANÁLISE",
            "ETAPA 4 - INTERPRETAÇÃO E COMUNICAÇÃO",
        ] {
            assert!(prompt.contains(stage), "missing stage: {stage}");
        }
    }
}
