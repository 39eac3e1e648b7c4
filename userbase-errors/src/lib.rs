mod app_error;
mod upload_error;

pub use app_error::AppError;
pub use upload_error::UploadError;
