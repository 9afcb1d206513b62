//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::tools::{ProofreadStyle, ToolId};

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  avidia                                  List tools (active tool marked)
  avidia chat \"explain borrowing\"         Single chat prompt
  avidia chat                             Interactive chat (/clear, /exit)
  avidia translate --to es \"Good morning\" Translate to Spanish
  avidia proofread --style academic -f essay.md
  avidia summarize - < report.txt         Read text from stdin
  avidia templates run email \"meeting moved to 3pm\"
  avidia history list --tool translate    Past translations
  avidia normalize - < reply.md           Strip Markdown/HTML locally
  avidia status                           Check the AI service
  avidia completions bash                 Generate bash completions

ENVIRONMENT:
  AVIDIA_BASE_URL       AI service address (default http://localhost:9090)
  AVIDIA_TIMEOUT_SECS   Request timeout in seconds (default 60)
  AVIDIA_MAX_HISTORY    History entries kept, 0 = unlimited (default 200)
  AVIDIA_SAVE_HISTORY   Record tool runs in history (default true)
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    name = "avidia",
    author,
    version,
    about = "Writing assistant: chat, translate, humanize, proofread and summarize text with an AI service",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

/// Where a tool reads its text from.
#[derive(clap::Args, Debug, Default)]
pub struct InputArgs {
    /// Text to process ('-' reads stdin)
    pub text: Option<String>,

    /// Read text from a .txt, .md or .doc file
    #[arg(short = 'f', long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

/// How a tool result is displayed.
#[derive(clap::Args, Debug, Default)]
pub struct OutputArgs {
    /// Print the service reply without normalization
    #[arg(long)]
    pub raw: bool,

    /// Wrap output to this many columns
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Print word and character counts on stderr
    #[arg(long)]
    pub stats: bool,

    /// Also write the result to a file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the tools (active tool marked)
    Tools,
    /// Show or switch the active tool
    Tool {
        /// Tool id (ai-chat, translate, ai-humanizer, proofreader, summarizer, templates, history)
        id: Option<String>,
    },
    /// Show or record data-use consent
    Consent {
        #[command(subcommand)]
        action: Option<ConsentAction>,
    },
    /// Chat with the AI (interactive when no text is given)
    Chat {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Translate text into another language
    Translate {
        #[command(flatten)]
        input: InputArgs,
        /// Target language code or name (e.g. es, German)
        #[arg(short = 't', long = "to", default_value = "en")]
        to: String,
        /// List supported languages and exit
        #[arg(long)]
        languages: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rewrite AI-generated text to sound natural
    Humanize {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Correct grammar and style
    Proofread {
        #[command(flatten)]
        input: InputArgs,
        /// Writing style (formal, casual, academic, business, creative)
        #[arg(short = 's', long, default_value = "formal")]
        style: ProofreadStyle,
        /// Language (English, Spanish, French, German, Italian)
        #[arg(short = 'l', long, default_value = "English")]
        language: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Summarize text
    Summarize {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Manage and run prompt templates
    Templates {
        #[command(subcommand)]
        subcommand: Option<TemplatesSubcommand>,
    },
    /// Browse past tool runs
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
    /// Strip Markdown and HTML from text locally (no service call)
    Normalize {
        #[command(flatten)]
        input: InputArgs,
        /// Wrap output to this many columns
        #[arg(short = 'w', long)]
        width: Option<usize>,
    },
    /// Check whether the AI service is reachable
    Status,
    /// Show config, paths, and consent status
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConsentAction {
    /// Show the current choices
    Show,
    /// Allow analytics, personalization and training
    AcceptAll,
    /// Keep only essential data use
    RejectAll,
    /// Record individual choices (unset flags are off)
    Set {
        #[arg(long)]
        analytics: bool,
        #[arg(long)]
        personalization: bool,
        #[arg(long)]
        training: bool,
    },
}

#[derive(Subcommand)]
pub enum TemplatesSubcommand {
    /// List templates (built-in first, then custom)
    List {
        /// Filter by name or description
        #[arg(long)]
        query: Option<String>,
    },
    /// Show a template's prompt
    Show { name: String },
    /// Add a custom template
    Add {
        name: String,
        #[arg(short = 'd', long)]
        description: String,
        /// Prompt text; may contain {text} where the input goes
        #[arg(short = 'p', long)]
        prompt: String,
    },
    /// Remove a custom template
    Remove { name: String },
    /// Generate content with a template
    Run {
        name: String,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// List entries, newest first
    List {
        /// Only entries from this tool
        #[arg(long)]
        tool: Option<ToolId>,
        /// Filter by title or id
        #[arg(long)]
        query: Option<String>,
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show an entry (id or unique id prefix)
    Show { id: String },
    /// Delete an entry (id or unique id prefix)
    Delete { id: String },
    /// Delete all entries
    Clear,
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
