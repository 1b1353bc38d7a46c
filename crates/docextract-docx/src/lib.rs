use docx_rs::{Break, BreakType, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

use docextract_core::{BackendError, DocumentReader};

/// [`DocumentReader`] for Office Open XML (`.docx`) files.
///
/// Only body-level paragraphs are returned; tables, headers and footers are
/// skipped. Legacy binary `.doc` files are not OOXML and fail to open.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxReader;

impl DocxReader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for DocxReader {
    fn paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, BackendError> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| BackendError::Open(e.to_string()))?;

        Ok(docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
                _ => None,
            })
            .collect())
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

/// Runs directly in the paragraph and runs nested in hyperlinks both count.
fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, text),
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            // Page and column breaks carry no text.
            RunChild::Break(br) if *br == Break::new(BreakType::TextWrapping) => text.push('\n'),
            _ => {}
        }
    }
}
