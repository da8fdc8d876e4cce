//! Ingestion of the CLEF image-annotation corpus into typed training and
//! test collections of images, segments and segment relations.

pub mod config;
pub mod data;
pub mod error;

pub use config::{CorpusLayout, LoadOptions};
pub use data::loader::{load, load_corpus};
pub use data::model::{Corpus, CorpusSummary};
pub use error::{CorpusError, Result};
