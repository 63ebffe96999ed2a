//! Welcome banner display for chat sessions.
//!
//! Prints a styled banner when a chat session starts, showing the loaded
//! dataset, model, and session information.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(
    dataset: &str,
    rows: usize,
    columns: usize,
    model: &str,
    session_id: &str,
) {
    println!();
    println!("  {}", style(dataset).cyan().bold());
    println!(
        "  {}",
        style(format!("{rows} linhas × {columns} colunas")).dim()
    );
    println!();
    println!("  {}  {}", style("Modelo:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Sessão:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Digite /help para comandos, Ctrl+D para sair").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
