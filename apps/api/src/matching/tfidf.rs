//! TF-IDF text similarity between a candidate profile and job descriptions.
//!
//! Raw term counts, smooth idf `ln((1 + n) / (1 + df)) + 1`, L2-normalised rows.
//! The vocabulary is capped at the `max_features` most frequent terms.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_MAX_FEATURES: usize = 1000;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").unwrap();
    static ref STOP_WORDS: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "be", "became", "because", "become", "becomes", "becoming", "been",
    "before", "beforehand", "behind", "being", "below", "beside", "besides", "between", "beyond",
    "both", "but", "by", "can", "cannot", "could", "do", "done", "down", "due", "during", "each",
    "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every", "everyone",
    "everything", "everywhere", "except", "few", "for", "former", "formerly", "from", "further",
    "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hers", "herself", "him", "himself", "his", "how", "however", "ie", "if", "in", "inc",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither", "never",
    "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please",
    "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she", "should",
    "since", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "them", "themselves", "then",
    "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "this", "those", "though", "through", "throughout", "thru", "thus", "to", "together",
    "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Lower-cased word tokens of two or more characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    /// Builds the vocabulary from `docs` and returns one dense, L2-normalised row per document.
    pub fn fit_transform<S: AsRef<str>>(&self, docs: &[S]) -> Vec<Vec<f64>> {
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenize(d.as_ref())).collect();
        let vocabulary = self.build_vocabulary(&tokenized);
        let n_docs = docs.len() as f64;

        let mut doc_freq = vec![0usize; vocabulary.len()];
        let counts: Vec<HashMap<usize, f64>> = tokenized
            .iter()
            .map(|tokens| {
                let mut tf: HashMap<usize, f64> = HashMap::new();
                for token in tokens {
                    if let Some(&idx) = vocabulary.get(token.as_str()) {
                        *tf.entry(idx).or_default() += 1.0;
                    }
                }
                for &idx in tf.keys() {
                    doc_freq[idx] += 1;
                }
                tf
            })
            .collect();

        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        counts
            .into_iter()
            .map(|tf| {
                let mut row = vec![0.0; vocabulary.len()];
                for (idx, count) in tf {
                    row[idx] = count * idf[idx];
                }
                l2_normalize(&mut row);
                row
            })
            .collect()
    }

    /// Term → column index, keeping the `max_features` most frequent terms
    /// (ties broken alphabetically). Columns are assigned in alphabetical order.
    fn build_vocabulary<'a>(&self, tokenized: &'a [Vec<String>]) -> HashMap<&'a str, usize> {
        let mut totals: HashMap<&str, usize> = HashMap::new();
        for token in tokenized.iter().flatten() {
            *totals.entry(token.as_str()).or_default() += 1;
        }

        let mut terms: Vec<(&str, usize)> = totals.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.max_features);

        let mut kept: Vec<&str> = terms.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();
        kept.into_iter().enumerate().map(|(i, term)| (term, i)).collect()
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}

pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Similarity of `profile` to each of `job_texts`, in input order.
pub fn profile_similarities<S: AsRef<str>>(profile: &str, job_texts: &[S]) -> Vec<f64> {
    if job_texts.is_empty() {
        return Vec::new();
    }
    let mut corpus: Vec<&str> = Vec::with_capacity(job_texts.len() + 1);
    corpus.push(profile);
    corpus.extend(job_texts.iter().map(AsRef::as_ref));

    let matrix = TfidfVectorizer::default().fit_transform(&corpus);
    let Some((profile_row, job_rows)) = matrix.split_first() else {
        return Vec::new();
    };
    job_rows
        .iter()
        .map(|row| cosine_similarity(profile_row, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("Looking for a Python developer with ML and C experience");
        assert_eq!(tokens, vec!["looking", "python", "developer", "ml", "experience"]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let rows = TfidfVectorizer::default().fit_transform(&["python rust", "rust rust go"]);
        for row in rows {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_document_is_zero_row() {
        let rows = TfidfVectorizer::default().fit_transform(&["", "python"]);
        assert!(rows[0].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let rows = TfidfVectorizer::new(2).fit_transform(&["aa aa bb bb cc", "aa bb dd"]);
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_identical_documents_have_similarity_one() {
        let sims = profile_similarities("python machine learning", &["python machine learning"]);
        assert!((sims[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_relevant_job_ranks_higher() {
        let profile = "Experienced Python developer with skills in machine learning and data analysis";
        let jobs = [
            "Looking for Python developer with machine learning experience",
            "Seeking Java developer with Spring framework experience",
            "Need data scientist with Python and statistics background",
        ];
        let sims = profile_similarities(profile, &jobs);
        assert_eq!(sims.len(), 3);
        assert!(sims[0] > sims[1], "{sims:?}");
        assert!(sims[2] > sims[1], "{sims:?}");
        assert!(sims.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_no_jobs_no_scores() {
        let sims = profile_similarities::<&str>("python", &[]);
        assert!(sims.is_empty());
    }

    #[test]
    fn test_cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
