pub mod fs;
pub mod memory;
pub mod paths;

pub use fs::FsStore;
pub use memory::MemoryStore;

pub mod prelude {
    pub use crate::fs::FsStore;
    pub use crate::memory::MemoryStore;
    pub use crate::paths;
}
