//! Retrieval-augmented question answering over the vector store.

pub mod chain;
pub mod error;
pub mod generate;
pub mod prompt;

pub use chain::{QaAnswer, QaChain};
pub use error::ChainError;
pub use generate::TextGenerator;
