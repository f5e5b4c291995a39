//! Wraps the final answer text in the simulation report banner.

const RULE_WIDTH: usize = 50;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Formats the answer stage's output for display and persistence.
pub fn format_interview_result(answer: &str) -> String {
    let rule = rule();
    format!(
        "INTERVIEW SIMULATION RESULTS\n\
        {rule}\n\
        \n\
        This simulation contains both interview questions and candidate responses.\n\
        The format shows: Q: [Question] followed by A: [Answer]\n\
        \n\
        {rule}\n\
        \n\
        {}\n\
        \n\
        {rule}\n\
        SIMULATION COMPLETE\n",
        answer.trim()
    )
}
