// Curriculum and roadmap generation: form validation, prompt building, LLM
// calls, and the handlers that persist or export the results.

pub mod generator;
pub mod handlers;
pub mod options;
pub mod prompts;
