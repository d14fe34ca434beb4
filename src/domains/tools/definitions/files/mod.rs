pub mod info;
pub mod list;
pub mod read;
pub mod write;

pub use info::FileInfoTool;
pub use list::ListFilesTool;
pub use read::ReadFileTool;
pub use write::WriteFileTool;
