//! User-facing fixed texts and the prompts sent to collaborators.

pub const ASK_QUESTION: &str = "Please ask a question or describe your symptoms.";
pub const ASK_SYMPTOMS: &str = "Please provide a question or description of your symptoms.";
pub const ASK_PREVENTIVE: &str =
    "Please specify what you want to prevent or ask for preventive tips.";
pub const NO_IMAGE: &str = "No image provided for analysis";
pub const NOTHING_FOUND: &str = "No relevant information found after scraping.";
pub const NO_VIDEOS: &str = "No video links found.";
pub const MISSING_LOCATION: &str = "Location data (latitude and longitude) is missing.";
pub const NO_HOSPITALS: &str = "No hospitals found nearby for your treatment query.";

pub const COMPLETION_APOLOGY: &str = "I'm having trouble processing your request right now.";
pub const VISION_APOLOGY: &str = "Sorry, I couldn't analyze the image at this moment.";
pub const RETRIEVAL_APOLOGY: &str =
    "Sorry, I couldn't look up reference information at this moment.";
pub const SEARCH_APOLOGY: &str = "Sorry, I couldn't search the web at this moment.";
pub const VIDEO_APOLOGY: &str = "Sorry, I couldn't retrieve video links at this moment.";
pub const HOSPITALS_APOLOGY: &str =
    "Sorry, I couldn't retrieve hospital information at this moment.";

/// Substrings that mark a query as asking for prevention advice (matched case-insensitively).
pub const PREVENTIVE_KEYWORDS: [&str; 6] = [
    "prevent",
    "prevention",
    "avoid",
    "reduce risk",
    "stay healthy",
    "tips",
];

pub const PREVENTIVE_HEADER: &str = "Here are some preventive measures:";

/// Prefixed to the patient's words for image analysis.
pub const VISION_PROMPT: &str = "You have to act as a professional doctor, i know you are not but this is for learning purpose. \
What's in this image?. Do you find anything wrong with it medically? \
If you make a differential, suggest some remedies for them. Donot add any numbers or special characters in \
your response. Your response should be in one long paragraph. Also always answer as if you are answering to a real person. \
Donot say 'In the image I see' but say 'With what I see, I think you have ....' \
Dont respond as an AI model in markdown, your answer should mimic that of an actual doctor not an AI bot, \
Keep your answer concise (max 2 sentences). No preamble, start your answer right away please";

/// System message for every completion.
pub const SYSTEM_PROMPT: &str = "You are a helpful medical assistant. Be concise and helpful, \
and defer to doctors for specific symptoms or serious concerns.";

pub fn knowledge_prompt(question: &str) -> String {
    format!(
        "You are a medical assistant. Use the context to answer the user's question. \
         If you don't know the answer, say so. Always recommend consulting a real doctor for \
         serious concerns. Be concise and helpful in your response.\n\n\
         Question: {}\n\nAnswer:",
        question
    )
}

pub fn general_prompt(question: &str) -> String {
    format!(
        "You are a helpful medical assistant. Answer general health questions but defer to \
         doctors for specific symptoms. Be concise and helpful.\n\n{}",
        question
    )
}

pub fn disease_prompt(question: &str) -> String {
    format!(
        "Identify the disease mentioned in this query: '{}'. Reply with the disease name only.",
        question
    )
}

pub fn preventive_answer_prompt(question: &str) -> String {
    format!(
        "Using the context, answer the question in detail.\n\nQuestion: {}\n\nAnswer:",
        question
    )
}

/// True when `query` contains one of [`PREVENTIVE_KEYWORDS`].
pub fn asks_for_prevention(query: &str) -> bool {
    let lower = query.to_lowercase();
    PREVENTIVE_KEYWORDS.iter().any(|k| lower.contains(k))
}
