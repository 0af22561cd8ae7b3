//! The extraction seam: an abstract parser behind an object-safe trait.
//!
//! The entire value of this system — structure-aware PDF extraction — lives
//! inside an external hosted model. The orchestration only ever sees one
//! abstract operation: binary content plus a file name in, an ordered
//! sequence of page texts (or a typed failure) out. Modelling that as a
//! trait keeps the batch logic testable without a network and leaves the
//! wire protocol entirely inside [`remote`].
//!
//! The contract is blocking request/response: the caller awaits one
//! document's result before touching the next. Any parallelism happens on
//! the service side and is invisible here.

pub mod remote;

pub use remote::RemoteParser;

use crate::error::ParseError;
use async_trait::async_trait;
use std::sync::Arc;

/// Shared handle to a document parser.
pub type SharedParser = Arc<dyn DocumentParser>;

/// One extraction request against the external parsing collaborator.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse one PDF into ordered page texts.
    ///
    /// Returns the page segments in document order. An empty vector is a
    /// valid success value at this layer; the batch maps it to
    /// [`ParseError::Empty`] so callers see a uniform skip path.
    async fn parse(&self, pdf_bytes: Vec<u8>, file_name: &str) -> Result<Vec<String>, ParseError>;
}
