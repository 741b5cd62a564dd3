mod hierarchy;
mod question;
mod stats;

pub use hierarchy::{
    build_hierarchy, Block, Hierarchy, HierarchyCache, Topic, DEFAULT_PROGRAM_ID,
    DEFAULT_PROGRAM_NAME,
};
pub use question::{Question, DEFAULT_BLOCK_ID, DEFAULT_BLOCK_NAME};
pub use stats::{percentage, BlockStats, SelectionKey};
