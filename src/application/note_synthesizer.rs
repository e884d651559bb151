// src/application/note_synthesizer.rs
//! Placeholder HTML notes built from reference metadata.
//!
//! Nothing here reads attached files or calls the model: the output is a
//! deterministic template filled with the reference's name, type and
//! description, meant as a scaffold the user edits afterwards.

use crate::constants::MAX_EXPANDED_REFERENCES;
use crate::domain::{DomainError, Reference, ReferenceType};
use crate::util::text::display_name;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

const TITLE_STYLE: &str = "font-size: 24px; font-weight: bold; margin-bottom: 16px;";
const SECTION_STYLE: &str = "font-size: 20px; font-weight: bold; margin-top: 24px; margin-bottom: 8px;";
const SUBSECTION_STYLE: &str = "font-size: 18px; font-weight: bold; margin-top: 16px; margin-bottom: 8px;";
const PARAGRAPH_STYLE: &str = "margin-bottom: 16px;";
const SUBTITLE_STYLE: &str = "font-style: italic; margin-bottom: 16px;";
const ITEM_STYLE: &str = "margin-bottom: 8px;";
const QUOTE_STYLE: &str = "margin-left: 24px; padding-left: 16px; border-left: 4px solid #808080; font-style: italic; margin-bottom: 16px;";

const POINT_TOPICS: [&str; 6] = [
    "methodology",
    "framework",
    "approach",
    "concept",
    "principle",
    "theory",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteFormat {
    #[default]
    Summary,
    BulletPoints,
    Detailed,
    StudyGuide,
    Custom,
}

impl NoteFormat {
    /// Unknown names fall back to `Summary`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bullet-points" | "bullets" => Self::BulletPoints,
            "detailed" => Self::Detailed,
            "study-guide" => Self::StudyGuide,
            "custom" => Self::Custom,
            _ => Self::Summary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::BulletPoints => "bullet-points",
            Self::Detailed => "detailed",
            Self::StudyGuide => "study-guide",
            Self::Custom => "custom",
        }
    }

    fn title_prefix(&self) -> &'static str {
        match self {
            Self::Summary => "Summary: ",
            Self::BulletPoints => "Key Points: ",
            Self::Detailed => "Detailed Notes: ",
            Self::StudyGuide => "Study Guide: ",
            Self::Custom => "Notes on ",
        }
    }
}

impl fmt::Display for NoteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth of the synthesized notes; scales the number of main points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FocusLevel {
    Basic,
    #[default]
    Standard,
    Detailed,
}

impl FocusLevel {
    /// 1, 2 or 3; anything else is clamped into range
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => Self::Basic,
            2 => Self::Standard,
            _ => Self::Detailed,
        }
    }

    pub fn point_count(&self) -> usize {
        match self {
            Self::Basic => 3,
            Self::Standard => 5,
            Self::Detailed => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    pub include_summary: bool,
    pub include_main_points: bool,
    /// Annotate a page range; only honoured for PDF references
    pub include_focus_pages: bool,
    pub focus_level: FocusLevel,
    pub page_start: u32,
    pub page_end: u32,
    pub custom_prompt: Option<String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            include_summary: true,
            include_main_points: true,
            include_focus_pages: false,
            focus_level: FocusLevel::Standard,
            page_start: 1,
            page_end: 999,
            custom_prompt: None,
        }
    }
}

impl SynthesisOptions {
    fn page_range_for(&self, reference: &Reference) -> Option<(u32, u32)> {
        (self.include_focus_pages && reference.kind == ReferenceType::Pdf)
            .then_some((self.page_start, self.page_end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedNote {
    pub title: String,
    pub content: String,
}

/// Build notes for a single reference
#[instrument(level = "debug", skip(reference, options), fields(reference_id = reference.id))]
pub fn synthesize(
    reference: &Reference,
    format: NoteFormat,
    options: &SynthesisOptions,
) -> SynthesizedNote {
    let name = display_name(&reference.name);
    let title = format!("{}{}", format.title_prefix(), name);
    let content = match format {
        NoteFormat::Summary => summary_format(reference),
        NoteFormat::BulletPoints => bullet_point_format(reference),
        NoteFormat::Detailed => detailed_format(reference, options),
        NoteFormat::StudyGuide => study_guide_format(reference),
        NoteFormat::Custom => custom_format(reference, options),
    };
    debug!(%format, content_len = content.len(), "Synthesized notes");
    SynthesizedNote { title, content }
}

/// Combine several references into one note.
///
/// The highest priority reference provides the body, the next four get a
/// short key-points block each, the rest are only counted.
pub fn synthesize_combined(
    references: &[Reference],
    format: NoteFormat,
    options: &SynthesisOptions,
) -> Result<SynthesizedNote, DomainError> {
    let mut sorted: Vec<&Reference> = references.iter().collect();
    sorted.sort_by(|a, b| b.priority.cmp(&a.priority));

    let main = sorted.first().ok_or(DomainError::NoReferences)?;
    let main_format = match format {
        NoteFormat::Custom => NoteFormat::Summary,
        other => other,
    };
    let SynthesizedNote { title, mut content } = synthesize(main, main_format, options);

    if sorted.len() > 1 {
        content.push_str(
            "\n<div style=\"margin-top: 40px; border-top: 1px solid #ccc; padding-top: 20px;\">\n  \
             <div style=\"font-size: 20px; font-weight: bold; margin-bottom: 16px;\">Additional References</div>\n\
             </div>",
        );
        for reference in sorted.iter().skip(1).take(MAX_EXPANDED_REFERENCES - 1) {
            content.push_str(&additional_reference_block(reference));
        }
    }

    if sorted.len() > MAX_EXPANDED_REFERENCES {
        let remaining = sorted.len() - MAX_EXPANDED_REFERENCES;
        let plural = if remaining > 1 { "s" } else { "" };
        content.push_str(&format!(
            "\n<div style=\"margin-top: 16px; font-style: italic;\">\n  \
             {remaining} additional reference{plural} not processed. \
             Consider reviewing them separately for more complete information.\n</div>"
        ));
    }

    Ok(SynthesizedNote { title, content })
}

fn additional_reference_block(reference: &Reference) -> String {
    let name = encode_text(&display_name(&reference.name)).into_owned();
    let description = reference
        .description()
        .map(|d| format!(": {}", encode_text(d)))
        .unwrap_or_default();
    let mut block = format!(
        "\n<div style=\"margin-top: 24px; margin-bottom: 8px;\">\n  \
         <div style=\"font-size: 18px; font-weight: bold;\">{name}</div>\n  \
         <div style=\"font-style: italic; margin-bottom: 8px;\">{} reference{description}</div>\n\
         </div>\n\n",
        reference.kind
    );
    block.push_str(&paragraph("Key points from this reference:"));
    block.push_str(&list(
        &[
            format!("Main concept from {name}"),
            "Supporting detail or methodology".to_string(),
            "Connection to the primary reference material".to_string(),
        ],
        false,
    ));
    block
}

fn title(text: &str) -> String {
    format!("<div style=\"{TITLE_STYLE}\">{text}</div>\n\n")
}

fn section(text: &str) -> String {
    format!("<div style=\"{SECTION_STYLE}\">{text}</div>\n\n")
}

fn subsection(text: &str) -> String {
    format!("<div style=\"{SUBSECTION_STYLE}\">{text}</div>\n")
}

fn paragraph(text: &str) -> String {
    format!("<div style=\"{PARAGRAPH_STYLE}\">{text}</div>\n\n")
}

fn subtitle(text: &str) -> String {
    format!("<div style=\"{SUBTITLE_STYLE}\">{text}</div>\n\n")
}

fn quote(text: &str) -> String {
    format!("<div style=\"{QUOTE_STYLE}\">\"{text}\"</div>\n\n")
}

fn list(items: &[String], ordered: bool) -> String {
    let tag = if ordered { "ol" } else { "ul" };
    let mut html = format!("<{tag}>\n");
    for item in items {
        html.push_str(&format!("  <li style=\"{ITEM_STYLE}\">{item}</li>\n"));
    }
    html.push_str(&format!("</{tag}>\n\n"));
    html
}

fn labelled(label: &str, text: &str) -> String {
    format!("<span style=\"font-weight: bold;\">{label}:</span> {text}")
}

/// Reference type plus optional description and link
fn reference_info(reference: &Reference, with_url: bool) -> String {
    let mut info = labelled("Reference Type", reference.kind.as_str());
    if let Some(description) = reference.description() {
        info.push_str("<br>");
        info.push_str(&labelled("Description", &encode_text(description)));
    }
    if with_url {
        if let Some(url) = reference.url() {
            info.push_str("<br>");
            info.push_str(&labelled(
                "URL",
                &format!(
                    "<a href=\"{}\">{}</a>",
                    encode_double_quoted_attribute(url),
                    encode_text(url)
                ),
            ));
        }
    }
    paragraph(&info)
}

fn escaped_name(reference: &Reference) -> String {
    encode_text(&display_name(&reference.name)).into_owned()
}

fn subject(reference: &Reference) -> String {
    reference
        .description()
        .map(|d| encode_text(d).into_owned())
        .unwrap_or_else(|| "the subject matter".to_string())
}

fn summary_format(reference: &Reference) -> String {
    let name = escaped_name(reference);
    let mut html = title(&format!("Summary: {name}"));
    html.push_str(&subtitle(&format!(
        "A summary of the key concepts from this {} reference.",
        reference.kind
    )));
    html.push_str(&section("Key Takeaways"));
    html.push_str(&list(
        &[
            "First major concept from the reference material".to_string(),
            "Second important point covered in the material".to_string(),
            "Third significant finding or insight".to_string(),
            "Fourth element needed to understand the topic".to_string(),
        ],
        false,
    ));
    html.push_str(&section("Core Concepts"));
    html.push_str(&paragraph(&format!(
        "The material introduces several concepts central to {name}. \
         Each builds on the previous one to form a coherent framework."
    )));
    html.push_str(&section("Conclusion"));
    html.push_str(&paragraph(
        "This reference lays a foundation for further exploration and application of the subject.",
    ));
    html
}

fn bullet_point_format(reference: &Reference) -> String {
    let name = escaped_name(reference);
    let mut html = title(&format!("Key Points: {name}"));
    html.push_str(&reference_info(reference, false));
    html.push_str(&section("Main Topics"));
    let topics: Vec<String> = (1..=3)
        .map(|n| {
            format!(
                "<span style=\"font-weight: bold;\">Topic {n}</span>\n    \
                 <ul>\n      <li>Subtopic {n}.1</li>\n      <li>Subtopic {n}.2</li>\n    </ul>"
            )
        })
        .collect();
    html.push_str(&list(&topics, false));
    html.push_str(&section("Key Terminology"));
    let terms: Vec<String> = ["first", "second", "third"]
        .iter()
        .enumerate()
        .map(|(i, ordinal)| {
            labelled(
                &format!("Term {}", i + 1),
                &format!("Definition of the {ordinal} important term"),
            )
        })
        .collect();
    html.push_str(&list(&terms, false));
    html
}

fn detailed_format(reference: &Reference, options: &SynthesisOptions) -> String {
    let name = escaped_name(reference);
    let page_range = options
        .page_range_for(reference)
        .map(|(start, end)| format!(" (Pages {start}-{end})"))
        .unwrap_or_default();

    let mut html = title(&format!("Detailed Notes: {name}{page_range}"));
    html.push_str(&subtitle("A thorough examination of the reference material"));
    html.push_str(&section("Introduction"));
    html.push_str(&paragraph(&format!(
        "These notes explore the concepts, methods and applications presented in {name}. \
         The material covers {} in depth, from theoretical foundations to practical use.",
        subject(reference)
    )));
    html.push_str(&section("Core Concepts"));
    html.push_str(&subsection("Concept 1"));
    html.push_str(&paragraph(
        "The first major concept: its origins, development and significance within the field. \
         Later material in the reference builds on it.",
    ));
    html.push_str(&paragraph(
        "Applications and implications of this concept in different contexts, with examples \
         that show its practical relevance.",
    ));
    html.push_str(&subsection("Concept 2"));
    html.push_str(&paragraph(
        "The second key concept, how it relates to the first, and how both fit the broader framework.",
    ));
    html.push_str(&section("Methodological Framework"));
    html.push_str(&paragraph("The methodological approach of the reference covers:"));
    html.push_str(&list(
        &[
            "Principles guiding the methodology".to_string(),
            "Step-by-step procedures for applying it".to_string(),
            "Evaluation criteria and quality checks".to_string(),
        ],
        true,
    ));
    html.push_str(&section("Critical Analysis"));
    html.push_str(&quote(
        "Significant quote from the reference that captures a key insight or principle.",
    ));
    html.push_str(&paragraph(&format!(
        "Strengths and limitations of the material in {name}, including areas of consensus \
         and open debate in the field."
    )));
    html
}

fn study_guide_format(reference: &Reference) -> String {
    let name = escaped_name(reference);
    let mut html = title(&format!("Study Guide: {name}"));
    html.push_str(&subtitle(&format!(
        "A focused study guide based on this {} reference",
        reference.kind
    )));
    html.push_str(&section("Learning Objectives"));
    html.push_str(&paragraph("After studying this material, you should be able to:"));
    html.push_str(&list(
        &[
            format!("Understand and explain the core concepts presented in {name}"),
            "Apply key methods to relevant problems and scenarios".to_string(),
            "Analyze and evaluate different approaches within the subject".to_string(),
            "Synthesize information from several sources into one understanding".to_string(),
        ],
        false,
    ));
    html.push_str(&section("Essential Concepts to Master"));
    let concepts: Vec<String> = (1..=4)
        .map(|n| labelled(&format!("Concept {n}"), "Brief explanation and importance"))
        .collect();
    html.push_str(&list(&concepts, true));
    html.push_str(&section("Study Questions"));
    html.push_str(&list(
        &[
            "How does [key concept] relate to [another concept] within the framework presented?".to_string(),
            "What are the main advantages and limitations of the methods described?".to_string(),
            "How would you apply these principles to solve [specific type of problem]?".to_string(),
            "Compare and contrast the approaches outlined in the reference.".to_string(),
            "What evidence supports the main claims of the reference?".to_string(),
        ],
        true,
    ));
    html.push_str(&section("Study Strategy"));
    html.push_str(&list(
        &[
            "Review the key terminology until each definition is clear.".to_string(),
            "Study the core concepts in depth and connect related ideas.".to_string(),
            "Practice applying the concepts to different problems.".to_string(),
            "Create flashcards to test recall of important information.".to_string(),
            "Discuss the material with others and explain it in your own words.".to_string(),
        ],
        true,
    ));
    html
}

fn point_content(topic: &str, point: usize, focus: FocusLevel) -> String {
    let first = POINT_TOPICS[point % POINT_TOPICS.len()];
    let second = POINT_TOPICS[(point + 2) % POINT_TOPICS.len()];
    match focus {
        FocusLevel::Basic => format!("Brief overview of a key {first} related to {topic}"),
        FocusLevel::Standard => format!(
            "Description of an important {first}, its relationship to the {second} and its practical applications"
        ),
        FocusLevel::Detailed => format!(
            "In-depth analysis of the {first}: theoretical foundations, practical implementations \
             and connections to other {second}s in the field"
        ),
    }
}

fn custom_format(reference: &Reference, options: &SynthesisOptions) -> String {
    let name = escaped_name(reference);
    let mut html = title(&format!("Notes on {name}"));
    html.push_str(&reference_info(reference, true));

    if let Some(prompt) = options
        .custom_prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        html.push_str(&format!(
            "<div style=\"font-style: italic; margin-bottom: 16px; padding: 8px; \
             background-color: #f0f0f0; border-radius: 4px;\">Focus area: {}</div>\n\n",
            encode_text(prompt)
        ));
    }

    if let Some((start, end)) = options.page_range_for(reference) {
        html.push_str(&paragraph(&labelled("Page Range", &format!("{start} - {end}"))));
    }

    if options.include_summary {
        html.push_str(&section("Summary"));
        html.push_str(&paragraph(&format!(
            "{name} explores key concepts and methods related to {}. \
             It presents both theoretical frameworks and practical applications.",
            subject(reference)
        )));
    }

    if options.include_main_points {
        html.push_str(&section("Main Points"));
        let points: Vec<String> = (1..=options.focus_level.point_count())
            .map(|i| format!("Key point {i}: {}", point_content(&name, i, options.focus_level)))
            .collect();
        html.push_str(&list(&points, false));
    }

    if options.focus_level >= FocusLevel::Standard {
        html.push_str(&section("Detailed Analysis"));
        html.push_str(&paragraph(&format!(
            "The material takes a structured approach to {name}, linking theoretical frameworks \
             to practical applications with supporting examples."
        )));
        if options.focus_level >= FocusLevel::Detailed {
            html.push_str(&subsection("Advanced Concepts"));
            html.push_str(&paragraph(
                "Beyond the fundamentals, the reference covers current developments in the field: \
                 emerging methods, new applications and areas of ongoing research.",
            ));
            html.push_str(&quote(
                "Important insight from the reference showing a sophisticated understanding of the subject.",
            ));
        }
    }

    html.push_str(&section("Conclusion"));
    html.push_str(&paragraph(&format!(
        "This reference provides a foundation for understanding {name} and is structured \
         to support progressive learning."
    )));
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn reference(kind: ReferenceType, name: &str) -> Reference {
        Reference {
            id: 7,
            kind,
            name: name.to_string(),
            description: Some("cell biology".to_string()),
            url: None,
            file: None,
            priority: 3,
            date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            file_size: None,
        }
    }

    #[rstest]
    #[case("summary", NoteFormat::Summary)]
    #[case("bullet-points", NoteFormat::BulletPoints)]
    #[case("Detailed", NoteFormat::Detailed)]
    #[case("study-guide", NoteFormat::StudyGuide)]
    #[case("custom", NoteFormat::Custom)]
    #[case("mind-map", NoteFormat::Summary)]
    fn given_format_name_when_resolving_then_falls_back_to_summary(
        #[case] name: &str,
        #[case] expected: NoteFormat,
    ) {
        assert_eq!(NoteFormat::from_name(name), expected);
    }

    #[rstest]
    #[case(NoteFormat::Summary, "Summary: Cells")]
    #[case(NoteFormat::BulletPoints, "Key Points: Cells")]
    #[case(NoteFormat::Detailed, "Detailed Notes: Cells")]
    #[case(NoteFormat::StudyGuide, "Study Guide: Cells")]
    #[case(NoteFormat::Custom, "Notes on Cells")]
    fn given_format_when_synthesizing_then_titles_without_extension(
        #[case] format: NoteFormat,
        #[case] expected: &str,
    ) {
        let note = synthesize(
            &reference(ReferenceType::Pdf, "Cells.pdf"),
            format,
            &SynthesisOptions::default(),
        );
        assert_eq!(note.title, expected);
    }

    #[test]
    fn given_pdf_with_focus_pages_when_detailed_then_annotates_page_range() {
        let options = SynthesisOptions {
            include_focus_pages: true,
            page_start: 3,
            page_end: 9,
            ..Default::default()
        };

        let pdf = synthesize(&reference(ReferenceType::Pdf, "Cells.pdf"), NoteFormat::Detailed, &options);
        let link = synthesize(&reference(ReferenceType::Link, "Cells"), NoteFormat::Detailed, &options);

        assert!(pdf.content.contains("Detailed Notes: Cells (Pages 3-9)"));
        assert!(!link.content.contains("(Pages"));
    }

    #[rstest]
    #[case(1, 3, false)]
    #[case(2, 5, false)]
    #[case(3, 7, true)]
    fn given_focus_level_when_custom_then_scales_points_and_depth(
        #[case] level: u8,
        #[case] points: usize,
        #[case] advanced: bool,
    ) {
        let options = SynthesisOptions {
            focus_level: FocusLevel::from_level(level),
            ..Default::default()
        };

        let note = synthesize(&reference(ReferenceType::Pdf, "Cells.pdf"), NoteFormat::Custom, &options);

        assert_eq!(note.content.matches("Key point ").count(), points);
        assert_eq!(note.content.contains("Advanced Concepts"), advanced);
        assert_eq!(note.content.contains("Detailed Analysis"), level >= 2);
    }

    #[test]
    fn given_sections_disabled_when_custom_then_omits_them() {
        let options = SynthesisOptions {
            include_summary: false,
            include_main_points: false,
            ..Default::default()
        };

        let note = synthesize(&reference(ReferenceType::Pdf, "Cells.pdf"), NoteFormat::Custom, &options);

        assert!(!note.content.contains(">Summary<"));
        assert!(!note.content.contains("Main Points"));
        assert!(note.content.contains("Conclusion"));
    }

    #[test]
    fn given_markup_in_name_when_synthesizing_then_escapes_it() {
        let note = synthesize(
            &reference(ReferenceType::Link, "<script>x</script>"),
            NoteFormat::Summary,
            &SynthesisOptions::default(),
        );

        assert!(!note.content.contains("<script>"));
        assert!(note.content.contains("&lt;script&gt;"));
    }

    #[test]
    fn given_no_references_when_combining_then_fails() {
        let result = synthesize_combined(&[], NoteFormat::Summary, &SynthesisOptions::default());
        assert!(matches!(result, Err(DomainError::NoReferences)));
    }

    #[test]
    fn given_custom_format_when_combining_then_main_body_uses_summary() {
        let refs = vec![reference(ReferenceType::Pdf, "Cells.pdf")];

        let note = synthesize_combined(&refs, NoteFormat::Custom, &SynthesisOptions::default()).unwrap();

        assert_eq!(note.title, "Summary: Cells");
        assert!(!note.content.contains("Additional References"));
    }
}
