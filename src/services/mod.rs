pub mod file_service;
pub mod folder_service;
pub mod webdav;

pub use file_service::FileService;
pub use folder_service::FolderService;
