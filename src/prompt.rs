/// Marker the runtime stops generating at.
pub const STOP_MARKER: &str = "</s>";

pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// A prompt ready to hand to a completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub stop: Vec<String>,
}

/// Sampling knobs sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        SamplingParams {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

impl SamplingParams {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        SamplingParams {
            max_tokens,
            ..Default::default()
        }
    }
}

const PREAMBLE: &str = "You are a helpful assistant.\n\n\
Read the following article and summarize it in exactly 3 to 5 bullet points.\n\n\
Only return bullet points, no explanations or intros.\n\n\
Article:\n\"\"\"\n";

const CLOSING: &str = "\n\"\"\"\n";

/// Wraps already-cleaned article text in the summarization template.
pub fn build_prompt(cleaned: &str) -> Prompt {
    let mut text = String::with_capacity(PREAMBLE.len() + cleaned.len() + CLOSING.len());
    text.push_str(PREAMBLE);
    text.push_str(cleaned);
    text.push_str(CLOSING);

    Prompt {
        text,
        stop: vec![STOP_MARKER.to_string()],
    }
}
