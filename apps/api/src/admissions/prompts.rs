// Admissions feature prompt templates.
// Placeholders are substituted with `str::replace`; user-supplied values go in last.

pub const CHANCE_PROMPT: &str = "\
Estimate a realistic admission probability (0-100 integer) for {college}. \
Consider the whole profile holistically including activities, honors, context, interests, \
and college-specific responses. Consider Reach/Target/Safety heuristics implicitly. \
Respond with ONLY the number.

Profile JSON: {profile}
Answers JSON: {answers}";

pub const QUESTIONS_PROMPT: &str = "\
From the following pasted college application questions, produce a compact JSON array of fields \
where each field has: id (slug), label (string), type ('text' or 'textarea' or 'select'), \
optional (boolean). For yes/no questions, use type 'select' with options [\"Yes\", \"No\"]. \
Keep labels short and clear. Only output JSON.

{questions}";

pub const QUESTIONS_PDF_PROMPT: &str = "\
From the following document containing college application questions, produce a compact JSON array of fields \
where each field has: id (slug), label (string), type ('text' or 'textarea' or 'select'), \
optional (boolean). For yes/no questions, use type 'select' with options [\"Yes\", \"No\"]. \
Keep labels short and clear. EXCLUDE questions already covered by Common App \
(GPA, SAT/ACT, AP tests, activities list, honors, additional info, main essay). \
Only output JSON array, nothing else.

Document text:
{document}";

pub const PLAN_PROMPT: &str = "\
Create a step-by-step admissions plan ending by {end_date}. \
Output as lines of 'YYYY-MM-DD: Action'. Include SAT/ACT timeline (if useful), \
2-3 local opportunities based on location and interests, project ideas, and checkpoints.

Student profile: {profile}";

pub const ESSAY_FEEDBACK_PROMPT: &str = "\
Provide concise, actionable feedback for the following college application essay. \
Focus on narrative arc, authenticity, clarity, and specificity. Return 4-8 bullet points.

Essay:
{essay}";

pub const CHAT_PROMPT: &str = "\
You are an AI college admissions copilot. Use the given context and chat history to help the student. \
Context: {context}. Chat: {messages}.";

pub const ESSAY_FEEDBACK_UNAVAILABLE: &str =
    "I couldn't generate feedback right now. Please try again.";
