// Shared prompt fragments for every role-played stage.
// Stage-specific templates live in pipeline::prompts.

/// Appended to every system prompt so the model stays in character.
pub const STAY_IN_ROLE: &str = "Stay fully in the role described above. \
    Write plain prose or markdown only. \
    Do NOT mention that you are an AI model. \
    Do NOT add preambles, disclaimers, or closing remarks.";

/// Renders an agent persona into a system prompt.
pub fn persona_system(role: &str, goal: &str, backstory: &str, expected_output: &str) -> String {
    format!(
        "You are the {role}.\n\
        Your goal: {goal}\n\
        Background: {backstory}\n\n\
        Expected output: {expected_output}\n\n\
        {STAY_IN_ROLE}"
    )
}
