//! Directory checks and document identification

pub mod directory;
pub mod doc_id;
