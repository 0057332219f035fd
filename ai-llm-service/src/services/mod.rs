pub mod answer_provider;
pub mod open_ai_service;
