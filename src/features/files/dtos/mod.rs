mod file_dto;

pub use file_dto::{FileDto, FileEnvelope, FilesEnvelope, UploadFileDto};
