use crate::prompt::Prompt;
use crate::server::Completion;

/// The outcome of submitting the form once.
#[derive(Debug, PartialEq)]
pub enum Submission {
    /// The text was blank, so nothing was sent.
    Empty,
    Answered(String),
}

/// Submits one question as the persona with the given label.
///
/// Blank text is reported as [`Submission::Empty`] without calling
/// `completion`.  Otherwise `completion` is called exactly once.
///
/// # Errors
///
/// This function returns an error if the completion fails.
pub fn submit(
    completion: &impl Completion,
    label: &str,
    user_text: &str,
) -> Result<Submission, String> {
    let Ok(prompt) = Prompt::compose(label, user_text) else {
        return Ok(Submission::Empty);
    };

    log::info!("asking as {label:?}");

    completion.complete(&prompt).map(Submission::Answered)
}
