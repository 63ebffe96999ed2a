//! Secret management commands: set, show, delete.

use console::style;

use crate::state::AppState;

/// Store a secret. Prompts with hidden input when no value is given.
pub async fn set_secret(
    state: &AppState,
    key: &str,
    value: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let value = match value {
        Some(v) => v.to_string(),
        None => {
            dialoguer::Password::new()
                .with_prompt(format!("Valor para '{key}'"))
                .interact()?
        }
    };

    if value.trim().is_empty() {
        anyhow::bail!("secret value cannot be empty");
    }

    let provider = state.secret_service.store(key, value.trim()).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "key": key, "provider": provider.to_string() })
        );
    } else {
        println!(
            "  {} Secret {} saved to {}",
            style("✓").green(),
            style(key).cyan(),
            style(provider.to_string()).dim()
        );
    }
    Ok(())
}

/// Show where a secret resolves from, with the value masked.
pub async fn show_secret(state: &AppState, key: &str, json: bool) -> anyhow::Result<()> {
    use datapapo_types::secret::Redacted;

    match state.secret_service.resolve(key).await? {
        Some(resolved) => {
            let masked = Redacted::new(resolved.value).masked();
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "key": key,
                        "provider": resolved.provider.to_string(),
                        "value": masked,
                    })
                );
            } else {
                println!(
                    "  {} {} ({})",
                    style(key).cyan(),
                    style(&masked).dim(),
                    style(resolved.provider.to_string()).dim()
                );
            }
        }
        None => {
            if json {
                println!("{}", serde_json::json!({ "key": key, "provider": null }));
            } else {
                println!("  {} Secret {} not found", style("!").yellow(), style(key).cyan());
            }
        }
    }
    Ok(())
}

/// Delete a secret from every source that has it.
pub async fn delete_secret(state: &AppState, key: &str, json: bool) -> anyhow::Result<()> {
    state.secret_service.delete(key).await?;

    if json {
        println!("{}", serde_json::json!({ "key": key, "deleted": true }));
    } else {
        println!("  {} Secret {} deleted", style("✓").green(), style(key).cyan());
    }
    Ok(())
}
