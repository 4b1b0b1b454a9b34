use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::time::Duration;

use crate::config::API_KEY_VAR;
use crate::persona::Persona;

const TITLE: &str = "🤖 LLM 専門家相談";

const USAGE: &str = "\
このアプリでは、次のことができます。

1. 専門家の種類（A/B）を選択
2. 質問や相談内容を入力
3. 送信すると、選んだ専門家として LLM が回答を生成";

const PERSONA_PROMPT: &str =
    "LLM にどんな専門家として振る舞ってほしいですか？";

const QUESTION_PROMPT: &str =
    "質問や相談内容を入力してください（空行で送信）：";

const QUESTION_EXAMPLES: &str = "\
例）筋トレしているのですが、1日のタンパク質量の目安を教えてください。
例）年末年始に3泊4日で行ける海外旅行プランを提案してください。";

const SPINNER_MESSAGE: &str = "LLM に問い合わせ中です…";

const ANSWER_HEADING: &str = "### 🧠 LLM からの回答";

/// What `--output-json` prints for each answer.
#[derive(Debug, Serialize)]
pub struct Answer<'a> {
    pub persona: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
}

pub fn missing_key_warning() -> String {
    format!(
        "環境変数 `{API_KEY_VAR}` が設定されていません。\
         シェルに設定するか、設定ファイルの `api-key` に設定してください。"
    )
}

pub fn render_intro(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{TITLE}\n\n{USAGE}\n")
}

pub fn render_answer(
    out: &mut impl Write,
    answer: &str,
) -> std::io::Result<()> {
    write!(out, "\n{ANSWER_HEADING}\n\n{answer}")?;

    if !answer.ends_with('\n') {
        writeln!(out)?;
    }

    Ok(())
}

pub fn render_json(
    out: &mut impl Write,
    answer: &Answer,
) -> Result<(), String> {
    let json = serde_json::to_string(answer).map_err(|x| x.to_string())?;

    writeln!(out, "{json}").map_err(|x| x.to_string())
}

/// Lets the user pick a persona from the selector.
///
/// # Errors
///
/// This function returns an error if the terminal cannot be used for
/// interaction.
pub fn choose_persona() -> Result<Persona, String> {
    let labels: Vec<&str> =
        Persona::ALL.iter().map(|persona| persona.label()).collect();

    let index = Select::new()
        .with_prompt(PERSONA_PROMPT)
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|x| format!("persona selection failed: {x}"))?;

    Ok(Persona::ALL[index])
}

/// Asks for the question on the terminal.  The question may span
/// several lines and ends at the first empty line.  Blank answers are
/// accepted so that the caller can report them.
///
/// # Errors
///
/// This function returns an error if reading from stdin fails.
pub fn ask_question() -> Result<String, String> {
    eprintln!("{QUESTION_EXAMPLES}\n{QUESTION_PROMPT}");

    gather_lines(std::io::stdin().lock())
}

/// Collects lines up to the first empty line or the end of input.
/// Line breaks between the collected lines are kept.
///
/// # Errors
///
/// This function returns an error if
///
/// - reading fails or
/// - the input is not valid UTF-8.
pub fn gather_lines(reader: impl BufRead) -> Result<String, String> {
    let mut lines = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|x| format!("stdin: {x}"))?;

        if line.trim_end_matches('\r').is_empty() {
            break;
        }

        lines.push(line);
    }

    Ok(lines.join("\n"))
}

/// Reads the whole question from stdin.
///
/// # Errors
///
/// This function returns an error if
///
/// - reading from stdin fails or
/// - the input is not valid UTF-8.
pub fn read_question() -> Result<String, String> {
    std::io::read_to_string(std::io::stdin())
        .map_err(|x| format!("stdin: {x}"))
}

pub fn ask_again() -> Result<bool, String> {
    Confirm::new()
        .with_prompt("続けて質問しますか？")
        .default(false)
        .interact()
        .map_err(|x| format!("input failed: {x}"))
}

/// Runs `f` while a spinner is shown on stderr, if `show` is true.
pub fn with_spinner<T>(show: bool, f: impl FnOnce() -> T) -> T {
    if !show {
        return f();
    }

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .map(|x| x.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    spinner.set_style(style);
    spinner.set_message(SPINNER_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = f();

    spinner.finish_and_clear();

    result
}
