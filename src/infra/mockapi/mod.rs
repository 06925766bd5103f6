mod client;

pub use client::RestSurveySource;
