// src/ports/html.rs
use crate::application::SynthesizedNote;
use crate::domain::{Flashcard, QuestionItem, Theme};
use html_escape::encode_text;
use pulldown_cmark::{html, Options, Parser};
use tracing::instrument;

const LIGHT_COLORS: &str = "--bg: #f5f5f5; --card: #ffffff; --text: #222222; --muted: #666666; --accent: #3b6fd8;";
const DARK_COLORS: &str = "--bg: #1e1f22; --card: #2b2d31; --text: #e6e6e6; --muted: #a0a0a0; --accent: #7aa2f7;";

/// Renders study material as standalone HTML pages
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    theme: Theme,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    /// Synthesized note; its content is already HTML
    pub fn render_note(&self, note: &SynthesizedNote) -> String {
        self.page(&note.title, &format!(r#"<div class="card">{}</div>"#, note.content))
    }

    pub fn render_flashcards(&self, title: &str, cards: &[Flashcard]) -> String {
        let body: String = cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                format!(
                    r#"<div class="card flashcard">
            <div class="card-front"><h3>Card {n}</h3>{front}</div>
            <details class="card-back"><summary>Show answer</summary>{back}</details>
        </div>
"#,
                    n = i + 1,
                    front = encode_text(&card.front),
                    back = encode_text(&card.back),
                )
            })
            .collect();
        self.page(title, &body)
    }

    pub fn render_questions(&self, title: &str, questions: &[QuestionItem]) -> String {
        let body: String = questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let options = question
                    .options
                    .as_deref()
                    .filter(|options| !options.is_empty())
                    .map(|options| {
                        let items: String = options
                            .iter()
                            .map(|option| format!("<li>{}</li>", encode_text(option)))
                            .collect();
                        format!(r#"<ol class="options" type="A">{items}</ol>"#)
                    })
                    .unwrap_or_default();
                let explanation = question
                    .explanation
                    .as_deref()
                    .filter(|e| !e.trim().is_empty())
                    .map(|e| format!(r#"<p class="explanation">{}</p>"#, encode_text(e)))
                    .unwrap_or_default();
                format!(
                    r#"<div class="card question">
            <h3>Question {n}</h3>
            <p>{text}</p>
            {options}
            <details><summary>Show answer</summary><p><strong>{answer}</strong></p>{explanation}</details>
        </div>
"#,
                    n = i + 1,
                    text = encode_text(&question.question),
                    answer = encode_text(&question.correct_answer),
                )
            })
            .collect();
        self.page(title, &body)
    }

    /// Markdown page, e.g. study notes or an assistant reply
    pub fn render_markdown(&self, title: &str, markdown: &str) -> String {
        self.page(
            title,
            &format!(r#"<div class="card">{}</div>"#, markdown_to_html(markdown)),
        )
    }

    fn page(&self, title: &str, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        {colors}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: var(--bg);
            color: var(--text);
        }}
        .card {{
            background: var(--card);
            border-radius: 8px;
            padding: 2rem;
            margin-bottom: 1rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .card-front {{
            margin-bottom: 1rem;
        }}
        summary {{
            cursor: pointer;
            color: var(--accent);
        }}
        .explanation, .ref-meta {{
            color: var(--muted);
            font-size: 0.9em;
        }}
        pre {{
            white-space: pre-wrap;
            word-wrap: break-word;
            padding: 1rem;
            border-radius: 4px;
            overflow-x: auto;
        }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    {body}
</body>
</html>"#,
            title = encode_text(title),
            colors = self.color_rules(),
            body = body,
        )
    }

    fn color_rules(&self) -> String {
        match self.theme {
            Theme::Light => format!(":root {{ {LIGHT_COLORS} }}"),
            Theme::Dark => format!(":root {{ {DARK_COLORS} }}"),
            Theme::System => format!(
                ":root {{ {LIGHT_COLORS} }}\n        @media (prefers-color-scheme: dark) {{ :root {{ {DARK_COLORS} }} }}"
            ),
        }
    }
}

#[instrument(level = "trace", skip_all)]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
