pub mod upload;

pub use upload::ConversionUpload;
