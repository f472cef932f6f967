//! Connection registry adapters.
//!
//! - `InMemoryConnectionRegistry` - Single-process registry behind one `RwLock`

mod in_memory;

pub use in_memory::InMemoryConnectionRegistry;
