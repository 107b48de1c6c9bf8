mod config;
mod local;
mod qdrant;
mod repository;
mod similarity;

pub use config::{StoreBackend, StoreConfig, create_vector_store};
pub use local::LocalStore;
pub use qdrant::{QdrantConfig, QdrantStore};
pub use repository::{VectorStore, ensure_collection};
pub use similarity::cosine;

#[cfg(test)]
pub use repository::MockVectorStore;
