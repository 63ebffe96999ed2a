//! Main chat loop orchestration.
//!
//! Coordinates the complete conversation lifecycle: CSV loading and
//! profiling, welcome banner, greeting, input loop with streaming
//! responses, slash commands, chart rendering, and session cleanup.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use console::style;
use futures_util::StreamExt;
use secrecy::SecretString;
use tracing::{info, warn};

use datapapo_core::agent::context::{AgentConfig, AgentContext};
use datapapo_core::agent::engine::{AgentEngine, FALLBACK_GREETING};
use datapapo_core::agent::figure::extract_chart;
use datapapo_core::agent::title::generate_title;
use datapapo_core::chat::session::SessionManager;
use datapapo_core::chat::transcript::Transcript;
use datapapo_core::dataset::profile::profile;
use datapapo_types::chat::{ChatSession, ChatTurn};
use datapapo_types::dataset::DatasetProfile;
use datapapo_types::llm::StreamEvent;
use datapapo_types::secret::SecretProvider;

use crate::cli::dataset::{print_preview, print_profile};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::chart::render_chart;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, StreamingFilter};

/// Rows shown in the preview table after loading a dataset.
const PREVIEW_ROWS: usize = 5;

/// Run the interactive chat loop over a CSV file.
pub async fn run_chat_loop(
    state: &AppState,
    file: &Path,
    model_override: Option<String>,
) -> anyhow::Result<()> {
    let dataset_profile = load_dataset(file)?;

    let model = model_override.unwrap_or_else(|| state.config.model.clone());
    let agent_config = AgentConfig {
        model: model.clone(),
        temperature: state.config.temperature,
        max_tokens: state.config.max_tokens,
    };

    // Resolve the API key; offer to persist it when it was typed in.
    let api_key = resolve_api_key_interactive(state).await?;

    let provider = state.create_provider(api_key.clone(), &model);
    let engine = AgentEngine::new(provider);

    let mut context = AgentContext::new(agent_config, dataset_profile.clone());
    let mut transcript = Transcript::new();
    let mut session_manager =
        SessionManager::new(ChatSession::start(dataset_profile.source.clone(), model.clone()));
    let session_id = session_manager.session().id;

    print_welcome_banner(
        &dataset_profile.source,
        dataset_profile.row_count,
        dataset_profile.column_count,
        &model,
        &session_id.to_string(),
    );
    print_preview(&dataset_profile, PREVIEW_ROWS);
    println!();

    let renderer = ChatRenderer::new();
    greet(&engine, &mut context, &mut transcript, &renderer, session_id).await;

    let mut first_user_message: Option<String> = None;
    let mut title_generated = false;

    let prompt = format!("  {} ", style("Você >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    loop {
        let event = chat_input.read_line().await;
        match event {
            InputEvent::Eof => {
                println!("\n  {}", style("Sessão encerrada.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Ctrl+D para sair, ou continue conversando.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                // Slash commands
                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => {
                            commands::print_help();
                        }
                        ChatCommand::Clear => {
                            chat_input.clear();
                        }
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Sessão encerrada.").dim());
                            break;
                        }
                        ChatCommand::Preview => {
                            println!();
                            print_preview(&context.profile, PREVIEW_ROWS);
                            println!();
                        }
                        ChatCommand::Profile => {
                            print_profile(&context.profile);
                        }
                        ChatCommand::History => {
                            print_history(&transcript);
                        }
                        ChatCommand::Load(path) => {
                            match load_dataset(Path::new(&path)) {
                                Ok(new_profile) => {
                                    // New upload: replace the table, clear history.
                                    context.replace_dataset(new_profile.clone());
                                    transcript.clear();
                                    session_manager.mark_completed();
                                    session_manager = SessionManager::new(ChatSession::start(
                                        new_profile.source.clone(),
                                        context.agent_config.model.clone(),
                                    ));

                                    println!(
                                        "\n  {} Arquivo {} carregado ({} linhas × {} colunas). Histórico limpo.\n",
                                        style("✓").green(),
                                        style(&new_profile.source).cyan(),
                                        new_profile.row_count,
                                        new_profile.column_count,
                                    );
                                    print_preview(&new_profile, PREVIEW_ROWS);
                                    println!();
                                    greet(
                                        &engine,
                                        &mut context,
                                        &mut transcript,
                                        &renderer,
                                        session_manager.session().id,
                                    )
                                    .await;
                                    first_user_message = None;
                                    title_generated = false;
                                }
                                Err(e) => {
                                    println!(
                                        "\n  {} Erro ao carregar o arquivo: {e}\n",
                                        style("!").red().bold()
                                    );
                                }
                            }
                        }
                        ChatCommand::Unknown(cmd_name) => {
                            println!(
                                "\n  {} Comando desconhecido: {}. Digite /help para ver os comandos.\n",
                                style("?").yellow().bold(),
                                style(cmd_name).dim()
                            );
                        }
                    }
                    continue;
                }

                // Send to the agent
                context.add_user_message(text.clone());
                transcript.push(ChatTurn::user(session_manager.session().id, text.clone()));
                if first_user_message.is_none() {
                    first_user_message = Some(text.clone());
                }

                let spinner = thinking_spinner();
                let start_time = Instant::now();
                let mut stream = engine.execute(&context, &text);

                let mut filter = StreamingFilter::new();
                let mut full_response = String::new();
                let mut input_tokens: u32 = 0;
                let mut output_tokens: u32 = 0;
                let mut first_token_received = false;
                let mut had_error = false;

                while let Some(event_result) = stream.next().await {
                    match event_result {
                        Ok(stream_event) => match stream_event {
                            StreamEvent::TextDelta { text: delta } => {
                                if !first_token_received {
                                    spinner.finish_and_clear();
                                    first_token_received = true;
                                    print!("\n  {} ", style("Analista >").cyan().bold());
                                    let _ = std::io::stdout().flush();
                                }
                                renderer.print_streaming_token(&filter.push(&delta));
                                full_response.push_str(&delta);
                            }
                            StreamEvent::Usage(usage) => {
                                input_tokens = usage.input_tokens;
                                output_tokens = usage.output_tokens;
                            }
                            StreamEvent::Done => break,
                            _ => {}
                        },
                        Err(e) => {
                            spinner.finish_and_clear();
                            eprintln!("\n  {} Ocorreu um erro: {e}", style("!").red().bold());
                            eprintln!(
                                "  {}",
                                style("Envie outra mensagem para tentar de novo, /exit para sair.")
                                    .dim()
                            );
                            had_error = true;
                            break;
                        }
                    }
                }

                if !first_token_received && !had_error {
                    spinner.finish_and_clear();
                }
                if had_error {
                    // Drop the failed exchange so a retry doesn't double the question.
                    context.conversation_history.pop();
                    continue;
                }
                renderer.print_streaming_token(&filter.finish());

                let response_ms = start_time.elapsed().as_millis() as u64;
                let (_display_text, chart) = extract_chart(&full_response);
                if let Some(ref spec) = chart {
                    println!("{}", render_chart(spec));
                }

                println!();
                renderer.print_stats_footer(output_tokens, response_ms, &context.agent_config.model);
                println!();

                context.add_assistant_message(full_response.clone());
                transcript.push(
                    ChatTurn::assistant(session_manager.session().id, full_response.clone(), chart)
                        .with_metrics(input_tokens, output_tokens, response_ms),
                );
                session_manager.add_token_usage(input_tokens, output_tokens);
                session_manager.increment_turn();

                // Title generation after the first exchange
                if !title_generated {
                    title_generated = true;
                    if let Some(user_msg) = &first_user_message {
                        let title_provider =
                            state.create_provider(api_key.clone(), &context.agent_config.model);
                        match generate_title(
                            &title_provider,
                            user_msg,
                            &full_response,
                            &context.agent_config.model,
                        )
                        .await
                        {
                            Ok(title) => {
                                info!(title = %title, "session title generated");
                                session_manager.set_title(title);
                            }
                            Err(e) => {
                                warn!(error = %e, "failed to generate session title");
                            }
                        }
                    }
                }
            }
        }
    }

    session_manager.mark_completed();
    info!(
        turns = session_manager.turn_count(),
        input_tokens = session_manager.session().total_input_tokens,
        output_tokens = session_manager.session().total_output_tokens,
        "chat session ended"
    );
    Ok(())
}

/// Load and profile a CSV, printing the encoding warning when relevant.
fn load_dataset(file: &Path) -> anyhow::Result<DatasetProfile> {
    let loaded = datapapo_infra::csv::load_path(file)?;
    if loaded.used_encoding_fallback {
        println!(
            "  {} Decodificação UTF-8 falhou. Utilizando decodificação latin1.",
            style("!").yellow().bold()
        );
    }
    Ok(profile(&loaded.table))
}

/// Resolve the API key; when it came from the interactive prompt, offer to
/// save it to the OS keychain for next time.
async fn resolve_api_key_interactive(state: &AppState) -> anyhow::Result<SecretString> {
    let resolved = state.resolve_api_key().await?;

    if resolved.provider == SecretProvider::Prompt {
        let save = dialoguer::Confirm::new()
            .with_prompt("Salvar a chave no keychain do sistema?")
            .default(true)
            .interact()
            .unwrap_or(false);
        if save {
            use secrecy::ExposeSecret;
            match state
                .secret_service
                .store(&state.config.api_key_secret, resolved.value.expose_secret())
                .await
            {
                Ok(provider) => println!(
                    "  {} Chave salva em {}",
                    style("✓").green(),
                    style(provider.to_string()).dim()
                ),
                Err(e) => warn!(error = %e, "failed to store API key"),
            }
        }
    }

    Ok(resolved.value)
}

/// Generate and display the greeting, seeding it into context and transcript.
async fn greet(
    engine: &AgentEngine,
    context: &mut AgentContext,
    transcript: &mut Transcript,
    renderer: &ChatRenderer,
    session_id: uuid::Uuid,
) {
    let spinner = thinking_spinner();
    let greeting = match engine.generate_greeting(context).await {
        Ok(g) => g,
        Err(e) => {
            warn!(error = %e, "could not generate greeting");
            FALLBACK_GREETING.to_string()
        }
    };
    spinner.finish_and_clear();

    let rendered = renderer.render_final(&greeting);
    println!("  {}", rendered.trim());
    println!();

    context.add_assistant_message(greeting.clone());
    transcript.push(ChatTurn::assistant(session_id, greeting, None));
}

/// Show the most recent transcript turns, truncated for scanability.
fn print_history(transcript: &Transcript) {
    println!();
    for turn in transcript.recent(20) {
        let role_label = match turn.role {
            datapapo_types::llm::MessageRole::User => format!("{}", style("Você").green()),
            datapapo_types::llm::MessageRole::Assistant => {
                format!("{}", style("Analista").cyan())
            }
            _ => "Sistema".to_string(),
        };
        let preview: String = if turn.content.chars().count() > 100 {
            let truncated: String = turn.content.chars().take(97).collect();
            format!("{truncated}...")
        } else {
            turn.content.clone()
        };
        let chart_marker = if turn.chart.is_some() { " [gráfico]" } else { "" };
        println!(
            "  {} {}{}",
            style(role_label).bold(),
            preview.replace('\n', " "),
            style(chart_marker).dim()
        );
    }
    println!();
}

/// Spinner shown while waiting for the model.
fn thinking_spinner() -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is valid"),
    );
    spinner.set_message("Por favor aguarde...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
