/// Shape the model is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// `{"mcqs": [{"question", "options", "answer"}]}`
    #[default]
    Json,
    /// `Question:` / `Options:` / `Answer:` blocks.
    Lines,
}

impl ResponseFormat {
    #[must_use]
    pub fn from_arg(raw: &str) -> Option<Self> {
        match raw {
            "json" => Some(Self::Json),
            "lines" => Some(Self::Lines),
            _ => None,
        }
    }
}

/// Builds the instruction sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqPrompt {
    question_count: usize,
    option_count: usize,
    format: ResponseFormat,
    max_source_chars: usize,
}

impl Default for McqPrompt {
    fn default() -> Self {
        Self {
            question_count: 5,
            option_count: 4,
            format: ResponseFormat::Json,
            max_source_chars: 12_000,
        }
    }
}

impl McqPrompt {
    pub const MAX_QUESTIONS: usize = 50;
    pub const MAX_OPTIONS: usize = 8;

    /// Number of questions to request, clamped to `1..=MAX_QUESTIONS`.
    #[must_use]
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count.clamp(1, Self::MAX_QUESTIONS);
        self
    }

    /// Options per question, clamped to `2..=MAX_OPTIONS`.
    #[must_use]
    pub fn with_option_count(mut self, count: usize) -> Self {
        self.option_count = count.clamp(2, Self::MAX_OPTIONS);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_max_source_chars(mut self, max: usize) -> Self {
        self.max_source_chars = max;
        self
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.option_count
    }

    #[must_use]
    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Render the full prompt for `source`.
    #[must_use]
    pub fn build(&self, source: &str) -> String {
        let source = truncate_chars(source.trim(), self.max_source_chars);
        let n = self.question_count;
        let k = self.option_count;
        let shape = match self.format {
            ResponseFormat::Json => format!(
                "Return only JSON, with no commentary, in exactly this shape:\n\
                 {{\"mcqs\": [{{\"question\": \"<question>\", \"options\": [{}], \"answer\": \"<correct option>\"}}]}}\n\
                 The answer must be copied exactly from the options.",
                placeholder_options(k)
            ),
            ResponseFormat::Lines => format!(
                "Return each question in exactly this format:\n\
                 Question: <question>\n\
                 Options: [{}]\n\
                 Answer: <correct option>\n\
                 The options line must be a JSON array of strings and the answer must be copied exactly from it.",
                placeholder_options(k)
            ),
        };

        format!(
            "Convert the following text into {n} multiple-choice questions.\n\
             Each question should have {k} options, with only one correct answer.\n\
             {shape}\n\n\
             Text: {source}"
        )
    }
}

fn placeholder_options(count: usize) -> String {
    (1..=count)
        .map(|i| format!("\"option{i}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cut `text` to at most `max` characters without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
