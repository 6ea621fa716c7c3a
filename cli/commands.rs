pub mod init;
pub mod merge;
pub mod path;
pub mod preset;
