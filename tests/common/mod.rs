#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use burnin::{AnnotatedDocument, FlattenOutput, Flattener};
use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrapper around a flattened PDF with helper methods
pub struct FlattenedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub diagnostics: Vec<burnin::Diagnostic>,
}

impl FlattenedPdf {
    pub fn from_output(output: FlattenOutput) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&output.bytes)?;
        Ok(Self {
            bytes: output.bytes,
            doc,
            diagnostics: output.diagnostics,
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Flattens `annotations` into `pdf` with a default flattener.
pub fn flatten(pdf: &[u8], annotations: &AnnotatedDocument) -> Result<FlattenedPdf, Box<dyn std::error::Error>> {
    flatten_with(&Flattener::default(), pdf, annotations)
}

pub fn flatten_with(
    flattener: &Flattener,
    pdf: &[u8],
    annotations: &AnnotatedDocument,
) -> Result<FlattenedPdf, Box<dyn std::error::Error>> {
    init_logging();
    let output = flattener.flatten(pdf, annotations)?;
    FlattenedPdf::from_output(output)
}
