//! Slash command parsing and help text for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for dataset
//! inspection, dataset replacement, and session management.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Show the first rows of the dataset.
    Preview,
    /// Show the dataset profile.
    Profile,
    /// Show conversation history for this session.
    History,
    /// Replace the dataset with a new CSV file (clears history).
    Load(String),
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim().to_string());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/preview" | "/head" => Some(ChatCommand::Preview),
        "/profile" | "/perfil" => Some(ChatCommand::Profile),
        "/history" => Some(ChatCommand::History),
        "/load" => match arg {
            Some(path) if !path.is_empty() => Some(ChatCommand::Load(path)),
            _ => Some(ChatCommand::Unknown(
                "/load requires a CSV file path".to_string(),
            )),
        },
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Comandos disponíveis:").bold());
    println!();
    println!("  {}     Mostra esta ajuda", style("/help").cyan());
    println!("  {}    Limpa a tela", style("/clear").cyan());
    println!("  {}     Encerra a sessão", style("/exit").cyan());
    println!("  {}  Primeiras linhas do dataset", style("/preview").cyan());
    println!("  {}  Perfil completo do dataset", style("/profile").cyan());
    println!("  {}  Histórico da conversa", style("/history").cyan());
    println!(
        "  {}     Carrega outro CSV (limpa o histórico)",
        style("/load").cyan()
    );
    println!();
    println!("  {}", style("Ctrl+D para sair").dim());
    println!();
}
