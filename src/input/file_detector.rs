//! Source format detection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Text,
    Markdown,
    /// Recognized but not extractable here; callers convert to PDF or text first
    Docx,
    Unknown,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => SourceFormat::Pdf,
            "txt" | "text" => SourceFormat::Text,
            "md" | "markdown" => SourceFormat::Markdown,
            "docx" | "doc" => SourceFormat::Docx,
            _ => SourceFormat::Unknown,
        }
    }
}
