pub mod board_ops;
pub mod export;
pub mod ids;
pub mod import;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod progress;
pub mod rekey;
