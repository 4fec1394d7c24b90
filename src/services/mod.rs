pub mod chunker;
pub mod document_service;
pub mod model_service;
pub mod question_validator;
pub mod quiz_attempt_service;
pub mod quiz_generator;
pub mod quiz_service;
pub mod response_repair;
pub mod retention_service;
