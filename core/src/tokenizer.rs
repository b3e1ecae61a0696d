use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Optional word normalization applied before a document's words reach the corpus.
///
/// Each input word is NFKC-normalized and lowercased, split into letter-led tokens,
/// filtered against the stopword set and, when enabled, reduced with the English
/// Snowball stemmer. Entries holding several words (such as a free-text query tag)
/// yield several tokens.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    stopwords: HashSet<String>,
    stem: bool,
}

impl Preprocessor {
    /// Custom stopword set, stemming on.
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stopwords = stopwords.into_iter().map(|w| w.into().to_lowercase()).collect();
        Self { stopwords, stem: true }
    }

    /// Built-in English stopword list, stemming on.
    pub fn english() -> Self { Self::new(STOPWORDS.iter().copied()) }

    pub fn with_stemming(mut self, stem: bool) -> Self {
        self.stem = stem;
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool { self.stopwords.contains(token) }

    pub fn process<I, S>(&self, words: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for word in words {
            let normalized = word.as_ref().nfkc().collect::<String>().to_lowercase();
            for mat in RE.find_iter(&normalized) {
                let token = mat.as_str();
                if self.is_stopword(token) { continue; }
                if self.stem {
                    out.push(STEMMER.stem(token).into_owned());
                } else {
                    out.push(token.to_string());
                }
            }
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self { Self::english() }
}

/// Tokenize free text with the English stopword list and stemming.
pub fn tokenize(text: &str) -> Vec<String> {
    Preprocessor::english().process(text.split_whitespace())
}
