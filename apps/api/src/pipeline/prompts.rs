// Prompt templates and agent personas for the four interview stages.
// Templates are pure functions of (visible stage outputs, static args).

use crate::llm_client::prompts::persona_system;

use super::stage::{StageInputs, StageName, StageSpec, StaticArgs};

/// Recruiter profiling prompt. Replace: {recruiter_text}
pub const RECRUITER_PROMPT_TEMPLATE: &str = r#"Create a personality profile for the recruiter based on:
{recruiter_text}

Describe their values, communication style, what they look for in candidates, and how they are likely to run an interview."#;

/// Candidate profiling prompt. Replace: {resume_text}, {github_url}, {github_profile}
pub const CANDIDATE_PROMPT_TEMPLATE: &str = r#"Given the following resume:
{resume_text}

and GitHub URL: {github_url}

GitHub activity:
{github_profile}

Generate a candidate profile with technical skills, project strengths, and communication style."#;

/// Question generation prompt. Replace: {job_description}, {recruiter_profile}, {candidate_profile}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Generate 15-20 comprehensive interview questions for this job position:

Job Description: {job_description}

Create questions in these categories:
1. Technical Skills (5-6 questions)
2. Problem Solving & System Design (3-4 questions)
3. Experience & Projects (3-4 questions)
4. Behavioral & Cultural Fit (2-3 questions)
5. Role-Specific Scenarios (2-3 questions)

Format each question clearly and number them. Tailor the difficulty and style to match the recruiter's approach and the candidate's experience level.

RECRUITER PROFILE:
{recruiter_profile}

CANDIDATE PROFILE:
{candidate_profile}"#;

/// Answer generation prompt. Replace: {interview_questions}, {candidate_profile}
pub const ANSWER_PROMPT_TEMPLATE: &str = r#"For each interview question below, provide both the QUESTION and the ANSWER in this format:

**Q: [Question number]. [Full question text]**

**A:** [Detailed answer in the candidate's style]

Make sure to include both the original questions and the candidate's responses for a complete interview simulation.

INTERVIEW QUESTIONS:
{interview_questions}

CANDIDATE PROFILE:
{candidate_profile}"#;

/// Single-pass `{key}` substitution. Substituted values are never re-scanned, so user
/// text containing `{...}` is inserted verbatim. Unknown placeholders are left as-is.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

fn recruiter_prompt(_inputs: &StageInputs<'_>, args: &StaticArgs) -> String {
    fill(
        RECRUITER_PROMPT_TEMPLATE,
        &[("recruiter_text", args.recruiter_text.trim())],
    )
}

fn candidate_prompt(_inputs: &StageInputs<'_>, args: &StaticArgs) -> String {
    fill(
        CANDIDATE_PROMPT_TEMPLATE,
        &[
            ("resume_text", args.resume_text.trim()),
            ("github_url", args.github_url.trim()),
            ("github_profile", args.github_profile.as_str()),
        ],
    )
}

fn interview_prompt(inputs: &StageInputs<'_>, args: &StaticArgs) -> String {
    fill(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("job_description", args.job_description.trim()),
            ("recruiter_profile", inputs.text(StageName::Recruiter)),
            ("candidate_profile", inputs.text(StageName::Candidate)),
        ],
    )
}

fn answer_prompt(inputs: &StageInputs<'_>, _args: &StaticArgs) -> String {
    fill(
        ANSWER_PROMPT_TEMPLATE,
        &[
            ("interview_questions", inputs.text(StageName::Interview)),
            ("candidate_profile", inputs.text(StageName::Candidate)),
        ],
    )
}

/// The fixed four-stage table, in execution order.
pub fn default_stages() -> Vec<StageSpec> {
    vec![
        StageSpec {
            name: StageName::Recruiter,
            dependencies: vec![],
            template: recruiter_prompt,
            system: persona_system(
                "Recruiter Research Analyst",
                "Analyze recruiter input and generate a recruiter personality profile",
                "Expert at profiling recruiters to simulate their interview style.",
                "A detailed recruiter character profile based on traits, style, and values.",
            ),
        },
        StageSpec {
            name: StageName::Candidate,
            dependencies: vec![],
            template: candidate_prompt,
            system: persona_system(
                "Candidate Research Analyst",
                "Analyze GitHub and resume to generate a candidate profile",
                "Expert in analyzing resumes and GitHub profiles to identify strengths and skills.",
                "Candidate profile highlighting technical stack, interests, and communication tone.",
            ),
        },
        StageSpec {
            name: StageName::Interview,
            dependencies: vec![StageName::Recruiter, StageName::Candidate],
            template: interview_prompt,
            system: persona_system(
                "Mock Interviewer",
                "Generate a list of questions based on the recruiter and candidate profiles",
                "Simulates the recruiter and prepares technical interview questions tailored to the job.",
                "A numbered list of 15-20 well-structured interview questions organized by category.",
            ),
        },
        StageSpec {
            name: StageName::Answer,
            dependencies: vec![StageName::Interview, StageName::Candidate],
            template: answer_prompt,
            system: persona_system(
                "Mock Candidate",
                "Answer interview questions in the tone of the candidate",
                "Simulates the candidate and answers interview questions accurately and concisely.",
                "Complete interview Q&A pairs with questions clearly stated followed by detailed candidate responses.",
            ),
        },
    ]
}
