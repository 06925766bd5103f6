pub mod survey_source;
