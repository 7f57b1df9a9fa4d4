//! Model presets used across the learning platform's generation routes.

/// Deep reasoning and long-form generation: roadmaps, lessons, projects, quizzes.
pub const SMART_MODEL: &str = "llama-3.3-70b-versatile";

/// Conversational, low-latency responses: tutor chat, interview practice.
pub const FAST_MODEL: &str = "llama-3.1-8b-instant";
