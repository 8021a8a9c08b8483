pub mod matcher_settings;

pub use matcher_settings::MatcherSettings;
