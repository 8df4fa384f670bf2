pub mod code_store;
pub mod user_directory;

pub use code_store::CodeStore;
pub use user_directory::UserDirectory;
