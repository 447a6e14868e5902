pub mod color_normalization;
pub mod logger;
