//! # avidia - writing assistant CLI
//!
//! Sends text to an AI service for chat, translation, humanizing,
//! proofreading and summarizing, and prints the reply as clean plain text.
//!
//! ## Features
//! - One subcommand per tool, with input from arguments, stdin or files
//! - Interactive chat with transcript export
//! - Prompt templates, run history and persisted consent choices
//! - Local Markdown/HTML normalization (`avidia normalize`)

mod cli;
mod core;
mod run;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use crate::cli::{
    Args, Commands, ConsentAction, HistorySubcommand, TemplatesSubcommand, generate,
};
use crate::core::cli::{self as commands, ConsentChange};
use crate::core::state::Consent;
use crate::core::tools::{HumanizeTool, ProofreadTool, SummarizeTool, ToolId};
use crate::run::ToolRun;

/// Main application entry point
///
/// Handles:
/// - Environment configuration via dotenv
/// - CLI argument parsing and logger setup
/// - Dispatch to the subcommand handlers
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    let Some(command) = args.command else {
        commands::run_tools();
        return Ok(());
    };

    match command {
        Commands::Tools => commands::run_tools(),
        Commands::Tool { id } => commands::run_tool(id.as_deref()),
        Commands::Consent { action } => {
            let change = match action {
                None | Some(ConsentAction::Show) => None,
                Some(ConsentAction::AcceptAll) => Some(ConsentChange::AcceptAll),
                Some(ConsentAction::RejectAll) => Some(ConsentChange::RejectAll),
                Some(ConsentAction::Set {
                    analytics,
                    personalization,
                    training,
                }) => Some(ConsentChange::Set(Consent {
                    essential: true,
                    analytics,
                    personalization,
                    training,
                })),
            };
            commands::run_consent(change);
        }
        Commands::Chat { input, output } => {
            let config = run::load_config();
            run::run_chat(&config, &input, &output).await;
        }
        Commands::Translate {
            input,
            to,
            languages,
            output,
        } => {
            if languages {
                commands::run_languages();
                return Ok(());
            }
            let config = run::load_config();
            run::run_translate(&config, &to, &input, &output).await;
        }
        Commands::Humanize { input, output } => {
            let config = run::load_config();
            let job = ToolRun {
                id: ToolId::AiHumanizer,
                tool: &HumanizeTool,
                label: None,
                text: None,
            };
            run::run_tool(&config, job, &input, &output).await;
        }
        Commands::Proofread {
            input,
            style,
            language,
            output,
        } => {
            let tool = ProofreadTool::new(style, &language).unwrap_or_else(|e| run::fail(e));
            let config = run::load_config();
            let job = ToolRun {
                id: ToolId::Proofreader,
                tool: &tool,
                label: Some(format!("{}, {}", tool.style, tool.language())),
                text: None,
            };
            run::run_tool(&config, job, &input, &output).await;
        }
        Commands::Summarize { input, output } => {
            let config = run::load_config();
            let job = ToolRun {
                id: ToolId::Summarizer,
                tool: &SummarizeTool,
                label: None,
                text: None,
            };
            run::run_tool(&config, job, &input, &output).await;
        }
        Commands::Templates { subcommand } => match subcommand {
            None => commands::run_templates_list(None),
            Some(TemplatesSubcommand::List { query }) => {
                commands::run_templates_list(query.as_deref())
            }
            Some(TemplatesSubcommand::Show { name }) => commands::run_templates_show(&name),
            Some(TemplatesSubcommand::Add {
                name,
                description,
                prompt,
            }) => commands::run_templates_add(&name, &description, &prompt),
            Some(TemplatesSubcommand::Remove { name }) => commands::run_templates_remove(&name),
            Some(TemplatesSubcommand::Run {
                name,
                input,
                output,
            }) => {
                let config = run::load_config();
                run::run_template(&config, &name, &input, &output).await;
            }
        },
        Commands::History { subcommand } => match subcommand {
            HistorySubcommand::List { tool, query, limit } => {
                commands::run_history_list(tool, query.as_deref(), limit)
            }
            HistorySubcommand::Show { id } => commands::run_history_show(&id),
            HistorySubcommand::Delete { id } => commands::run_history_delete(&id),
            HistorySubcommand::Clear => commands::run_history_clear(),
        },
        Commands::Normalize { input, width } => run::run_normalize(&input, width),
        Commands::Status => {
            let config = run::load_config();
            commands::run_status(&config).await;
        }
        Commands::Config => {
            let config = run::load_config();
            commands::run_config(&config);
        }
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}
