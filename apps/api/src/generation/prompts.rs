// All LLM prompt templates for curriculum, roadmap, quiz, and rubric generation.
// Placeholders are `{name}`; `generator.rs` fills them in a single pass.

/// Teacher curriculum prompt.
/// Replace: {subject}, {level}, {duration}, {skills}, {goal}
pub const CURRICULUM_PROMPT_TEMPLATE: &str = r#"
You are an expert curriculum designer.

Create a detailed academic curriculum.

Subject: {subject}
Level: {level}
Duration: {duration}
Skills: {skills}
Goal: {goal}

Include:
1. Course Overview
2. Learning Outcomes
3. Week-wise Breakdown
4. Teaching Methodology
5. Assessment Strategy
"#;

/// Student roadmap prompt.
/// Replace: {topic}, {level}, {duration}, {goal}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"
You are a personal AI learning coach.

Create a personalized learning roadmap.

Topic: {topic}
Level: {level}
Duration: {duration}
Goal: {goal}

Include:
1. Learning Overview
2. Weekly Learning Plan
3. Skills to Gain
4. Resources Suggestions
5. Final Outcome
"#;

/// Quiz instructions. The source text is appended directly after this block.
pub const QUIZ_PROMPT_PREFIX: &str = r#"
Create 5 MCQs from the curriculum below.

Format:
Q1: Question
A. Option
B. Option
C. Option
D. Option
Answer: A
"#;

/// Rubric prompt. Replace: {text}
pub const RUBRIC_PROMPT_TEMPLATE: &str = r#"
Create a Bloom's Taxonomy aligned rubric for this curriculum:
{text}
"#;
