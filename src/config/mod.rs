mod settings;

pub use settings::{LocaleConfig, LogConfig, PreviewConfig, Settings};
