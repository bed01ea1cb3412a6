pub mod attempt_dto;
pub mod candidate_dto;
pub mod question_dto;
