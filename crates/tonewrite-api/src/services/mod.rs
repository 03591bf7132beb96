pub mod conversion;

pub use conversion::{ConversionReply, ToneConversionService};
