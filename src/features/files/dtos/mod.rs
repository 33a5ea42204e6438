mod file_dto;

pub use file_dto::{
    image_extension, FileUploadResponseDto, UploadProductImageDto, ALLOWED_IMAGE_EXTENSIONS,
};
