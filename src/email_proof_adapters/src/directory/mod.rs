pub mod hashset_user_directory;

pub use hashset_user_directory::HashSetUserDirectory;
