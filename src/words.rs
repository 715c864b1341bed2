use crate::error::{GameError, Result};
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::path::Path;

static LANG_DIR: Dir = include_dir!("src/lang");

/// A word to guess and the clue shown for it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Word {
    #[serde(rename = "word")]
    pub text: String,
    pub clue: String,
}

impl Word {
    pub fn new(text: impl Into<String>, clue: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            clue: clue.into(),
        }
    }
}

/// A named word list as shipped in `src/lang/*.json`.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<Word>,
}

impl WordList {
    /// The French list compiled into the binary.
    pub fn builtin() -> Result<Self> {
        read_word_list("french.json")
    }
}

fn read_word_list(file_name: &str) -> Result<WordList> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| GameError::InvalidInput(format!("word list {file_name} not found")))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| GameError::InvalidInput(format!("word list {file_name} is not UTF-8")))?;

    let list: WordList = serde_json::from_str(file_as_str)?;
    if list.words.is_empty() {
        return Err(GameError::InvalidInput(format!("word list {file_name} is empty")));
    }

    Ok(list)
}

/// Read `word,clue` rows (with a header line) from a CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Word>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut words = Vec::new();
    for (line, row) in reader.deserialize::<Word>().enumerate() {
        let word = row?;
        if word.text.is_empty() || word.clue.is_empty() {
            // +2: header line and 1-based numbering
            return Err(GameError::InvalidInput(format!(
                "row {} has an empty word or clue",
                line + 2
            )));
        }
        words.push(word);
    }
    Ok(words)
}
