//! TF-IDF cosine similarity between a résumé and a job description
//!
//! The IDF weights are fitted on exactly the two documents being compared,
//! so a score is only meaningful for its own pair.

use crate::processing::linguistics::LinguisticContext;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Sparse term weights; ordered so floating-point sums are reproducible
pub type TermVector = BTreeMap<String, f64>;

/// Term-frequency / inverse-document-frequency model over a small corpus
#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    idf: BTreeMap<String, f64>,
    documents: usize,
}

impl TfIdfModel {
    /// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`
    pub fn fit(documents: &[&str]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for document in documents {
            let unique: HashSet<&str> = document.split_whitespace().collect();
            for term in unique {
                *document_frequency.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        Self {
            idf,
            documents: documents.len(),
        }
    }

    /// Raw term counts scaled by IDF; terms outside the fitted vocabulary are
    /// ignored
    pub fn transform(&self, document: &str) -> TermVector {
        let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
        for term in document.split_whitespace() {
            *counts.entry(term).or_insert(0.0) += 1.0;
        }

        counts
            .into_iter()
            .filter_map(|(term, count)| self.idf.get(term).map(|idf| (term.to_string(), count * idf)))
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents
    }
}

/// Cosine of the angle between two sparse vectors; 0.0 when either is zero
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot_product: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();

    (dot_product / (norm_a * norm_b)).clamp(0.0, 1.0)
}

pub struct SimilarityScorer {
    processor: TextProcessor,
}

impl SimilarityScorer {
    pub fn new(context: Arc<LinguisticContext>) -> Self {
        Self {
            processor: TextProcessor::new(context),
        }
    }

    /// Match score in [0, 100]. A document with no surviving terms scores 0.
    pub fn score(&self, resume_text: &str, job_text: &str) -> f64 {
        let resume = self.processor.normalize(resume_text);
        let job = self.processor.normalize(job_text);

        let model = TfIdfModel::fit(&[resume.as_str(), job.as_str()]);
        let similarity = cosine_similarity(&model.transform(&resume), &model.transform(&job));

        debug!(
            "TF-IDF similarity {:.4} over {} terms",
            similarity,
            model.vocabulary_size()
        );

        similarity * 100.0
    }
}
