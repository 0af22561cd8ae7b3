//! Parsing instructions sent to the remote service.
//!
//! Centralising the instruction text here serves two purposes:
//!
//! 1. **Single source of truth** — tuning extraction behaviour (table
//!    naming, dosage notation, image descriptions) means editing exactly
//!    one place.
//!
//! 2. **Testability** — unit tests can inspect the instruction directly
//!    without issuing a real service call.
//!
//! Callers override the default via
//! [`crate::config::BatchConfig::parsing_instruction`]; the constant here is
//! used only when no override is provided.

/// Default parsing instruction describing the clinical-guideline document
/// genre, used when `BatchConfig::parsing_instruction` is `None`.
///
/// The instruction biases the service toward layout fidelity: most guideline
/// pages are double-column, tables must keep their rows and captions, and
/// dosage notation has to survive verbatim.
pub const CLINICAL_PARSING_INSTRUCTION: &str = "\
The document is a clinical medical guidance PDF. The content includes \
structured sections such as titles, subtitles, bulleted lists, numbered \
lists, and paragraphs. Most pages use a double-column layout; take this \
into consideration and parse reading order accurately. Prioritize \
extracting medical terminology, instructions, and procedural steps. \
Accurately extract and name tables (e.g. \"Table 1: Recommended Dosages\", \
\"Table 2: Common Side Effects\") without merging rows or columns, \
retaining the structure and organization as presented. Recognize section \
headers and sub-headers (e.g. \"Introduction\", \"Guidelines\", \"Dosage \
Instructions\") and treat titles as standalone entities. Capture all \
bulleted and numbered lists as distinct elements without merging them with \
adjacent text. Maintain the original sequence of the text, preserving the \
intended flow without reordering content or making assumptions. Preserve \
special characters, medical abbreviations, and dosage notation (e.g. \
\"mg\", \"ml\", \"IV\") exactly as presented. Do not generate any content \
not explicitly present in the document. Ensure text accuracy, especially \
for clinical procedures, drug names, and other critical medical guidance. \
If a section appears incomplete or unclear, extract it as-is without \
hypothesizing missing content. Capture footnotes and references when \
directly related to the content and tag them appropriately. For images and \
diagrams, provide detailed descriptions including labels, colors, shapes, \
and relative positions of elements, for example: \"Image 1: A flowchart \
showing the decision process for prescribing medication, with branches \
labeled 'Mild', 'Moderate', and 'Severe', each leading to specific drug \
recommendations.\" If an image contains text, extract the text and relate \
it clearly to the image description.";
