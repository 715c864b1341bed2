use crate::error::{GameError, Result};
use crate::normalize::normalize;
use crate::words::{load_csv, Word};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Ask for `count` new words related to (not translations of) `base_words`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionRequest {
    /// Comma-joined, e.g. "soleil, fromage, livre"
    pub base_words: String,
    pub count: usize,
}

impl ExpansionRequest {
    pub fn from_words(words: &[Word], count: usize) -> Self {
        Self {
            base_words: words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(", "),
            count,
        }
    }

    pub fn base_word_list(&self) -> impl Iterator<Item = &str> {
        self.base_words.split(',').map(str::trim).filter(|w| !w.is_empty())
    }
}

/// Raw generator output: two comma-separated lists that must line up.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionResponse {
    pub new_words: String,
    pub new_clues: String,
}

/// Source of extra words for the queue.
pub trait WordExpander {
    fn expand(&self, request: &ExpansionRequest) -> Result<ExpansionResponse>;
}

/// Pair up a response into words. Empty or mismatched lists are rejected.
pub fn parse_expansion(response: &ExpansionResponse) -> Result<Vec<Word>> {
    let split = |s: &str| -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect()
    };
    let words = split(&response.new_words);
    let clues = split(&response.new_clues);

    if words.is_empty() {
        return Err(GameError::InvalidInput("expansion returned no words".into()));
    }
    if words.len() != clues.len() {
        return Err(GameError::InvalidInput(format!(
            "expansion returned {} words but {} clues",
            words.len(),
            clues.len()
        )));
    }

    Ok(words
        .into_iter()
        .zip(clues)
        .map(|(text, clue)| Word { text, clue })
        .collect())
}

/// Offline expander reading candidate words from a `word,clue` CSV file.
///
/// Rows whose word is already a base word (ignoring accents and case) are
/// skipped, as are rows containing commas, which the response format cannot
/// carry.
#[derive(Debug, Clone)]
pub struct CsvExpander {
    path: PathBuf,
}

impl CsvExpander {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl WordExpander for CsvExpander {
    fn expand(&self, request: &ExpansionRequest) -> Result<ExpansionResponse> {
        let candidates = load_csv(&self.path).map_err(|e| {
            GameError::CollaboratorFailure(format!("{}: {e}", self.path.display()))
        })?;
        let known: HashSet<String> = request.base_word_list().map(normalize).collect();

        let picked: Vec<Word> = candidates
            .into_iter()
            .filter(|w| !w.text.contains(',') && !w.clue.contains(','))
            .filter(|w| !known.contains(&normalize(&w.text)))
            .take(request.count)
            .collect();

        Ok(ExpansionResponse {
            new_words: picked.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(", "),
            new_clues: picked.iter().map(|w| w.clue.as_str()).collect::<Vec<_>>().join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn response(words: &str, clues: &str) -> ExpansionResponse {
        ExpansionResponse {
            new_words: words.into(),
            new_clues: clues.into(),
        }
    }

    #[test]
    fn test_parse_pairs_words_and_clues() {
        let words = parse_expansion(&response(
            "compote, verger ,cidre",
            "Dessert de fruits cuits,Terrain d'arbres fruitiers, Boisson de pomme",
        ))
        .unwrap();

        assert_eq!(
            words,
            vec![
                Word::new("compote", "Dessert de fruits cuits"),
                Word::new("verger", "Terrain d'arbres fruitiers"),
                Word::new("cidre", "Boisson de pomme"),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_mismatched_counts() {
        let r = response("a, b, c, d, e", "1, 2, 3, 4");
        assert_matches!(parse_expansion(&r), Err(GameError::InvalidInput(msg)) if msg.contains("5 words but 4 clues"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_matches!(parse_expansion(&response("", "")), Err(GameError::InvalidInput(_)));
        assert_matches!(parse_expansion(&response(" , ,", "")), Err(GameError::InvalidInput(_)));
    }

    #[test]
    fn test_request_from_words() {
        let req = ExpansionRequest::from_words(
            &[Word::new("soleil", "x"), Word::new("livre", "y")],
            5,
        );
        assert_eq!(req.base_words, "soleil, livre");
        assert_eq!(req.base_word_list().collect::<Vec<_>>(), vec!["soleil", "livre"]);
    }

    #[test]
    fn test_csv_expander_skips_known_words() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("extra.csv");
        fs::write(
            &path,
            "word,clue\nRivière,Cours d'eau\ncompote,Dessert de fruits cuits\n\"pomme, poire\",Fruits\nverger,Terrain d'arbres\ncidre,Boisson\n",
        )
        .unwrap();

        let expander = CsvExpander::new(&path);
        let req = ExpansionRequest {
            base_words: "riviere, soleil".into(),
            count: 2,
        };
        let resp = expander.expand(&req).unwrap();
        assert_eq!(resp.new_words, "compote, verger");
        assert_eq!(resp.new_clues, "Dessert de fruits cuits, Terrain d'arbres");
        assert_eq!(parse_expansion(&resp).unwrap().len(), 2);
    }

    #[test]
    fn test_csv_expander_missing_file_is_collaborator_failure() {
        let dir = tempdir().unwrap();
        let expander = CsvExpander::new(dir.path().join("missing.csv"));
        let req = ExpansionRequest {
            base_words: "soleil".into(),
            count: 5,
        };
        assert_matches!(expander.expand(&req), Err(GameError::CollaboratorFailure(_)));
    }
}
