pub mod attempt_service;
pub mod candidate_service;
pub mod lifecycle;
pub mod question_service;
pub mod violation_policy;
