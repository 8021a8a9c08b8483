pub mod date_pattern;

pub use date_pattern::DatePattern;
