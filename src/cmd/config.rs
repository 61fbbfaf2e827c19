use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::cmd::prompt::{PromptAction, read_line};
use crate::config::{DEFAULT_NOTION_API_BASE, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    writeln!(stdout, "Configuring ithelp.")?;
    writeln!(stdout, "Press Enter to keep the current value, '-' to clear it.")?;
    writeln!(
        stdout,
        "Secrets are stored in the local config file; protect your filesystem accordingly."
    )?;
    writeln!(stdout)?;

    prompt_settings(&mut cfg, &mut input, &mut stdout)?;
    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn prompt_settings<R: BufRead, W: Write>(
    cfg: &mut StoredConfig,
    input: &mut R,
    output: &mut W,
) -> AppResult<()> {
    apply_prompt("Notion API key", &mut cfg.notion_api_key, true, input, output)?;
    apply_prompt("Notion database id", &mut cfg.database_id, false, input, output)?;
    apply_prompt(
        &format!("Notion API base URL (default {DEFAULT_NOTION_API_BASE})"),
        &mut cfg.notion_api_base,
        false,
        input,
        output,
    )?;
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Notion API key: {}", mask_secret(&cfg.notion_api_key));
    println!("Notion database id: {}", display_value(&cfg.database_id));
    println!(
        "Notion API base URL: {}",
        cfg.notion_api_base
            .as_deref()
            .unwrap_or(DEFAULT_NOTION_API_BASE)
    );

    Ok(())
}

fn apply_prompt<R: BufRead, W: Write>(
    field: &str,
    target: &mut Option<String>,
    secret: bool,
    input: &mut R,
    output: &mut W,
) -> AppResult<()> {
    match (target.as_deref(), secret) {
        (Some(_), true) => write!(output, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(output, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(output, "{field} (Enter to skip): ")?,
    }
    output.flush()?;

    if let Some(line) = read_line(input)? {
        PromptAction::parse(&line).apply_to_option(target);
    }
    Ok(())
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    let chars = value.as_deref().unwrap_or_default().chars().collect::<Vec<_>>();
    match chars.len() {
        0 => "<not set>".to_string(),
        len if len > 6 => {
            let prefix = chars[..3].iter().collect::<String>();
            let suffix = chars[len - 3..].iter().collect::<String>();
            format!("{prefix}***{suffix}")
        }
        _ => "***".to_string(),
    }
}
