pub mod attempt;
pub mod candidate;
pub mod question;
