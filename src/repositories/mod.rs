pub mod in_memory;
pub mod quiz_attempt_repository;
pub mod quiz_repository;

pub use in_memory::{InMemoryQuizAttemptRepository, InMemoryQuizRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
