// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::application::{
    note_synthesizer, Assistant, ChatSession, CredentialStore, FlashcardGenerator, NoteFormat,
    QuestionGenerator, SynthesisOptions, TextEnhancer,
};
use crate::cli::args::{Args, Command, ConfigAction, KeyAction, OutputArgs, ReferenceAction};
use crate::domain::{Reference, ReferenceDraft};
use crate::infrastructure::{
    Config, GeminiClient, LocalStore, PageRenderer, ReferenceStore, ReqwestTransport,
};
use crate::ports::HtmlPresenter;
use crate::util::text::{mask_secret, reference_context_lines};
use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

type Client = GeminiClient<ReqwestTransport, LocalStore>;

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting studyaid with arguments");

    let config_path = config_path(args.config)?;
    // A broken file must not block `config init --force`
    let config = if matches!(args.command, Command::Config { .. }) {
        Config::default()
    } else {
        Config::load_or_default(&config_path)?
    };
    let store = LocalStore::open(config.storage_path()?)?;
    let references = ReferenceStore::new(config.references_path()?);

    match args.command {
        Command::Key { action } => manage_key(store, action),
        Command::Theme { value } => manage_theme(store, value),
        Command::TestConnection => {
            client(&config, store)?.test_connection()?;
            println!("Connection OK");
            Ok(())
        }
        Command::Flashcards {
            source,
            style,
            difficulty,
            count,
            output,
        } => {
            let text = read_source(&source)?;
            let style = style.map_or_else(|| config.flashcards.style.parse(), Ok)?;
            let difficulty = difficulty.map_or_else(|| config.flashcards.difficulty.parse(), Ok)?;
            let count = count.unwrap_or(config.flashcards.count);
            let presenter = HtmlPresenter::with_theme(store.theme());

            let cards = FlashcardGenerator::new(client(&config, store)?)
                .with_model(config.generation.model.as_str())
                .generate(&text, style, difficulty, count)?;
            info!(count = cards.len(), "Flashcards ready");

            if output.json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else {
                for (i, card) in cards.iter().enumerate() {
                    println!("{}. Q: {}\n   A: {}\n", i + 1, card.front, card.back);
                }
            }
            open_page(&output, "flashcards.html", || {
                presenter.render_flashcards("Flashcards", &cards)
            })
        }
        Command::Questions {
            source,
            question_type,
            difficulty,
            count,
            context,
            with_references,
            output,
        } => {
            let text = read_source(&source)?;
            let question_type =
                question_type.map_or_else(|| config.questions.question_type.parse(), Ok)?;
            let difficulty = difficulty.map_or_else(|| config.questions.difficulty.parse(), Ok)?;
            let count = count.unwrap_or(config.questions.count);
            let context = if with_references {
                with_reference_context(context, &references.load()?)
            } else {
                context
            };
            let presenter = HtmlPresenter::with_theme(store.theme());

            let questions = QuestionGenerator::new(client(&config, store)?)
                .with_model(config.generation.model.as_str())
                .generate(&text, question_type, difficulty, count, context.as_deref())?;

            if output.json {
                println!("{}", serde_json::to_string_pretty(&questions)?);
            } else {
                for (i, question) in questions.iter().enumerate() {
                    println!("{}. {}", i + 1, question.question);
                    for (letter, option) in ('A'..='Z').zip(question.options.iter().flatten()) {
                        println!("   {letter}) {option}");
                    }
                    println!("   Answer: {}\n", question.correct_answer);
                }
            }
            open_page(&output, "questions.html", || {
                presenter.render_questions(&format!("{} questions", question_type.label()), &questions)
            })
        }
        Command::Enhance {
            source,
            instruction,
            beautify,
        } => {
            let text = read_source(&source)?;
            let enhancer = TextEnhancer::new(client(&config, store)?)
                .with_model(config.generation.model.as_str());
            let result = match instruction {
                Some(instruction) if !beautify => enhancer.enhance(&text, &instruction)?,
                _ => enhancer.beautify(&text, references.load()?.references())?,
            };
            println!("{result}");
            Ok(())
        }
        Command::Ask {
            prompt,
            content,
            with_references,
        } => {
            let refs = selected_references(&references, with_references)?;
            let assistant =
                Assistant::new(client(&config, store)?).with_model(config.generation.model.as_str());
            let reply = match content {
                Some(path) => assistant.ask_about(&read_source(&path)?, &prompt, &refs)?,
                None => assistant.ask(&prompt)?,
            };
            println!("{reply}");
            Ok(())
        }
        Command::Chat => chat(client(&config, store)?, &config.generation.model),
        Command::StudyNotes {
            topic,
            with_references,
            output,
        } => {
            let refs = selected_references(&references, with_references)?;
            let presenter = HtmlPresenter::with_theme(store.theme());
            let notes = Assistant::new(client(&config, store)?)
                .with_model(config.generation.model.as_str())
                .study_notes(&topic, &refs)?;

            if output.json {
                println!("{}", serde_json::json!({ "topic": topic, "notes": notes }));
            } else {
                println!("{notes}");
            }
            open_page(&output, "study-notes.html", || {
                presenter.render_markdown(&format!("Study notes: {topic}"), &notes)
            })
        }
        Command::References { action } => manage_references(&references, action),
        Command::Notes {
            ids,
            format,
            focus_level,
            no_summary,
            no_main_points,
            pages,
            prompt,
            output,
        } => {
            let library = references.load()?;
            let selected: Vec<Reference> = if ids.is_empty() {
                library.by_priority().into_iter().cloned().collect()
            } else {
                ids.iter()
                    .map(|id| library.get(*id).cloned())
                    .collect::<Result<_, _>>()?
            };

            let format = NoteFormat::from_name(format.as_deref().unwrap_or(&config.notes.format));
            let mut options = SynthesisOptions {
                include_summary: config.notes.include_summary && !no_summary,
                include_main_points: config.notes.include_main_points && !no_main_points,
                focus_level: note_synthesizer::FocusLevel::from_level(
                    focus_level.unwrap_or(config.notes.focus_level),
                ),
                custom_prompt: prompt,
                ..SynthesisOptions::default()
            };
            if let Some([start, end]) = pages.as_deref() {
                options.include_focus_pages = true;
                options.page_start = *start;
                options.page_end = *end;
            }

            let note = match selected.as_slice() {
                [single] => note_synthesizer::synthesize(single, format, &options),
                many => note_synthesizer::synthesize_combined(many, format, &options)?,
            };

            if output.json {
                println!("{}", serde_json::to_string_pretty(&note)?);
            } else {
                println!("{}\n\n{}", note.title, note.content);
            }
            let presenter = HtmlPresenter::with_theme(store.theme());
            open_page(&output, "notes.html", || presenter.render_note(&note))
        }
        Command::Config {
            action: ConfigAction::Init { force },
        } => init_config(&config_path, force),
    }
}

fn client(config: &Config, store: LocalStore) -> Result<Client> {
    Ok(GeminiClient::new(ReqwestTransport::new()?, store)
        .with_base_url(config.generation.base_url.as_str()))
}

/// Read the source text from a file, or stdin for `-`
pub fn read_source(path: &Path) -> Result<String> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read source text from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file {}", path.display()))?
    };
    if text.trim().is_empty() {
        bail!("Source text is empty");
    }
    Ok(text)
}

fn with_reference_context(context: Option<String>, library: &domain::ReferenceLibrary) -> Option<String> {
    if library.is_empty() {
        return context;
    }
    let references: Vec<Reference> = library.by_priority().into_iter().cloned().collect();
    let lines = format!("Reference materials:\n{}", reference_context_lines(&references));
    Some(match context {
        Some(context) if !context.trim().is_empty() => format!("{context}\n\n{lines}"),
        _ => lines,
    })
}

fn selected_references(store: &ReferenceStore, enabled: bool) -> Result<Vec<Reference>> {
    if !enabled {
        return Ok(Vec::new());
    }
    Ok(store.load()?.by_priority().into_iter().cloned().collect())
}

fn open_page(output: &OutputArgs, file_name: &str, render: impl FnOnce() -> String) -> Result<()> {
    if !output.open {
        return Ok(());
    }
    let html = render();
    let mut renderer = PageRenderer::new();
    renderer.show(file_name, &html)?;
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("Config file already exists at {} (use --force to overwrite)", path.display());
    }
    Config::create_default(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn manage_key(mut store: LocalStore, action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Set { key } => {
            if key.trim().is_empty() {
                bail!("API key must not be empty");
            }
            store.save_api_key(&key)?;
            println!("API key saved to {}", store.path().display());
        }
        KeyAction::Show => match store.api_key()? {
            Some(key) => println!("{}", mask_secret(&key)),
            None => println!("No API key stored"),
        },
        KeyAction::Remove => {
            store.remove_api_key()?;
            println!("API key removed");
        }
    }
    Ok(())
}

fn manage_theme(mut store: LocalStore, value: Option<domain::Theme>) -> Result<()> {
    match value {
        Some(theme) => {
            store.set_theme(theme)?;
            println!("Theme set to {theme}");
        }
        None => println!("{}", store.theme()),
    }
    Ok(())
}

fn manage_references(store: &ReferenceStore, action: ReferenceAction) -> Result<()> {
    let mut library = store.load()?;
    match action {
        ReferenceAction::Add {
            kind,
            name,
            description,
            url,
            file,
            priority,
        } => {
            let file_size = file.as_deref().map(file_size).transpose()?;
            let reference = library.add(ReferenceDraft {
                kind,
                name,
                description,
                url,
                file,
                file_size,
                priority,
            })?;
            println!("Added reference {} ({})", reference.id, reference.name);
            store.save(&library)?;
            println!("Storage: {}", library.usage_summary());
        }
        ReferenceAction::List => {
            if library.is_empty() {
                println!("No references");
            }
            for reference in library.by_priority() {
                let location = reference
                    .url()
                    .map(str::to_string)
                    .or_else(|| reference.file.as_ref().map(|f| f.display().to_string()))
                    .unwrap_or_default();
                println!(
                    "{}\t[{}]\tp{}\t{}\t{}",
                    reference.id, reference.kind, reference.priority, reference.name, location
                );
            }
            println!("Storage: {}", library.usage_summary());
        }
        ReferenceAction::Remove { id } => {
            let removed = library.remove(id)?;
            store.save(&library)?;
            println!("Removed reference {} ({})", removed.id, removed.name);
        }
    }
    Ok(())
}

fn file_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len())
}

fn chat(client: Client, model: &str) -> Result<()> {
    let mut session = ChatSession::new(Assistant::new(client).with_model(model));
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }
        match session.send(&line).map(|reply| reply.content.clone()) {
            Ok(reply) => println!("{reply}\n"),
            Err(e) => {
                warn!(error = %e, "Chat turn failed");
                if let Some(reply) = session.messages().last() {
                    println!("{}\n", reply.content);
                }
            }
        }
    }
    info!(messages = session.messages().len(), "Chat ended");
    Ok(())
}

/// Config file path: explicit override or the platform default
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Config::default_path().context("Could not determine the config directory"),
    }
}

#[cfg(test)]
/// must be public to be used from integration tests
mod tests {
    use super::*;
    use crate::domain::{ReferenceLibrary, ReferenceType};
    use crate::util::testing;
    use tempfile::TempDir;

    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }

    #[test]
    fn given_blank_file_when_reading_source_then_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.txt");
        std::fs::write(&path, "  \n").unwrap();

        assert!(read_source(&path).is_err());
    }

    #[test]
    fn given_text_file_when_reading_source_then_returns_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("source.txt");
        std::fs::write(&path, "Photosynthesis").unwrap();

        assert_eq!(read_source(&path).unwrap(), "Photosynthesis");
    }

    #[test]
    fn given_references_when_building_context_then_appends_numbered_lines() {
        let mut library = ReferenceLibrary::new();
        library
            .add(ReferenceDraft {
                kind: ReferenceType::Link,
                name: "Notes".to_string(),
                url: Some("https://example.org".to_string()),
                priority: 3,
                ..Default::default()
            })
            .unwrap();

        let context = with_reference_context(Some("Biology 101".to_string()), &library).unwrap();

        assert!(context.starts_with("Biology 101\n\nReference materials:\n1. Notes"));
    }

    #[test]
    fn given_empty_library_when_building_context_then_keeps_context() {
        assert_eq!(
            with_reference_context(None, &ReferenceLibrary::new()),
            None
        );
    }

    #[test]
    fn given_explicit_path_when_resolving_config_then_uses_it() {
        let explicit = PathBuf::from("/tmp/studyaid.toml");
        assert_eq!(config_path(Some(explicit.clone())).unwrap(), explicit);
    }
}
