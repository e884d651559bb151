// src/cli/args.rs
use crate::domain::{Difficulty, FlashcardStyle, QuestionType, ReferenceType, Theme};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to the TOML config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Check that the stored API key reaches the generation service
    TestConnection,

    /// Show or set the page theme (light, dark, system)
    Theme {
        #[arg(value_name = "THEME")]
        value: Option<Theme>,
    },

    /// Generate flashcards from source text
    Flashcards {
        /// Source text file, `-` for stdin
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// basic, concept or question
        #[arg(short, long)]
        style: Option<FlashcardStyle>,

        /// easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Number of cards to request
        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate practice questions from source text
    Questions {
        /// Source text file, `-` for stdin
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// multiplechoice, shortanswer, essay or truefalse
        #[arg(short = 't', long = "type")]
        question_type: Option<QuestionType>,

        /// easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Number of questions to request
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Extra context prepended to the prompt
        #[arg(long)]
        context: Option<String>,

        /// Add the stored references to the context
        #[arg(long)]
        with_references: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rewrite text according to an instruction
    Enhance {
        /// Source text file, `-` for stdin
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Editing instruction
        #[arg(short, long, required_unless_present = "beautify", conflicts_with = "beautify")]
        instruction: Option<String>,

        /// Format notes as clean HTML using the stored references
        #[arg(long)]
        beautify: bool,
    },

    /// Ask the assistant a single question
    Ask {
        #[arg(value_name = "PROMPT")]
        prompt: String,

        /// File whose content the question is about, `-` for stdin
        #[arg(long, value_name = "FILE")]
        content: Option<PathBuf>,

        /// Add the stored references to the content prompt
        #[arg(long, requires = "content")]
        with_references: bool,
    },

    /// Interactive chat with the assistant; an empty line ends the session
    Chat,

    /// Generate markdown study notes on a topic
    StudyNotes {
        #[arg(value_name = "TOPIC")]
        topic: String,

        /// Add the stored references to the prompt
        #[arg(long)]
        with_references: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage the reference library
    References {
        #[command(subcommand)]
        action: ReferenceAction,
    },

    /// Synthesize notes from stored references
    Notes {
        /// Reference ids; all references when omitted
        #[arg(value_name = "ID")]
        ids: Vec<i64>,

        /// summary, bulletpoints, detailed, studyguide or custom
        #[arg(short, long)]
        format: Option<String>,

        /// 1 = basic, 2 = standard, 3 = detailed
        #[arg(long)]
        focus_level: Option<u8>,

        #[arg(long)]
        no_summary: bool,

        #[arg(long)]
        no_main_points: bool,

        /// Restrict PDF notes to a page range
        #[arg(long, value_names = ["FROM", "TO"], num_args = 2)]
        pages: Option<Vec<u32>>,

        /// Focus area for custom notes
        #[arg(long)]
        prompt: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeyAction {
    /// Store the API key
    Set {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Show the stored key, masked
    Show,
    /// Delete the stored key
    Remove,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReferenceAction {
    /// Add a reference
    Add {
        /// link, pdf, image, ppt, syllabus or other
        #[arg(short = 't', long = "type", default_value = "link")]
        kind: ReferenceType,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Attached file; only its size is recorded
        #[arg(long)]
        file: Option<PathBuf>,

        /// 1 (low) to 5 (high)
        #[arg(short, long, default_value_t = 3)]
        priority: u8,
    },
    /// List references by priority
    List,
    /// Remove a reference by id
    Remove {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Open the result in the browser
    #[arg(long)]
    pub open: bool,
}
