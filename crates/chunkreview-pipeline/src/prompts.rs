//! System instructions and user payload formats

const SUMMARY_PROMPT: &str = "You are an experienced software engineer. Summarize the following \
fragment of a source file in 5-7 bullet points. Describe what the code does: its purpose, \
main types and functions, and how they interact. Do not critique the code and do not suggest \
improvements.";

const REVIEW_PROMPT: &str = "You are an experienced software engineer performing a code review. \
Analyze the following fragment of a source file. Find bugs, anti-patterns and risky \
constructs, and suggest concrete improvements, each with a short code example. Finish with a \
brief final verdict on the quality of the fragment.";

const ARCHITECTURE_PROMPT: &str = "You are a software architect reviewing a project as a whole. \
You receive an overview assembled from per-file summaries. Analyze the files together: find \
problems in how the modules interact, such as tight coupling, duplicated responsibilities or \
unclear boundaries, and suggest refactorings, each with a short example. Finish with a brief \
final verdict on the architecture.";

/// Builds the system instructions for each analysis phase
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompts {
    language: Option<String>,
}

impl Prompts {
    /// Create prompts, optionally asking for answers in `language`
    pub fn new(language: Option<String>) -> Self {
        Self { language }
    }

    /// Instruction for the per-chunk summary pass
    pub fn summary(&self) -> String {
        self.finish(SUMMARY_PROMPT.to_string())
    }

    /// Instruction for single-file review
    pub fn review(&self) -> String {
        self.finish(REVIEW_PROMPT.to_string())
    }

    /// Instruction for the cross-file pass, naming every file in the project
    pub fn architecture(&self, document_names: &[String]) -> String {
        self.finish(format!(
            "{} Project files: {}.",
            ARCHITECTURE_PROMPT,
            document_names.join(", ")
        ))
    }

    fn finish(&self, prompt: String) -> String {
        match &self.language {
            Some(language) => format!("{} Respond in {}.", prompt, language),
            None => prompt,
        }
    }
}

/// User payload for one chunk of a reviewed file
pub fn review_payload(index: usize, document: &str, chunk: &str) -> String {
    format!("Part {} of file {}:\n{}", index, document, chunk)
}

/// User payload for one chunk of the project overview
pub fn overview_payload(index: usize, chunk: &str) -> String {
    format!("Part {} of the project overview:\n{}", index, chunk)
}

/// One labeled line of a document summary
pub fn summary_line(index: usize, result: &str) -> String {
    format!("- Part {}: {}", index, result)
}
