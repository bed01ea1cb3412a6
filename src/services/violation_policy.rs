//! Maps the running violation count to the action the client must take.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Warn,
    Terminate,
}

pub fn decide(violation_count: u32, max_warnings_allowed: u32) -> PolicyDecision {
    if violation_count <= max_warnings_allowed {
        PolicyDecision::Warn
    } else {
        PolicyDecision::Terminate
    }
}
