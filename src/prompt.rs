use crate::persona::system_instruction;

pub const EMPTY_INPUT_MESSAGE: &str =
    "テキストが未入力です。何か質問や相談内容を入力してください。";

/// A two-message prompt: the persona's system instruction followed by
/// the user's question.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub human: String,
}

impl Prompt {
    /// Builds the prompt for the persona label and the user's text.
    ///
    /// # Errors
    ///
    /// This function returns an error if the text is empty or only
    /// whitespace.
    pub fn compose(label: &str, user_text: &str) -> Result<Self, String> {
        if user_text.trim().is_empty() {
            return Err(EMPTY_INPUT_MESSAGE.to_string());
        }

        Ok(Self {
            system: system_instruction(label).to_string(),
            human: user_text.to_string(),
        })
    }

    /// Pairs of chat role and content, in the order they are sent.
    pub fn as_messages(&self) -> [(&'static str, &str); 2] {
        [
            ("system", self.system.as_str()),
            ("user", self.human.as_str()),
        ]
    }
}
