//! Latent Dirichlet allocation fitted with collapsed Gibbs sampling.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::corpus::{DocumentTermMatrix, TopicModel, TopicParams, TopicWeights};

/// LDA with symmetric dirichlet priors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GibbsLda {
    /// Prior of the document-topic distributions.
    pub alpha: f64,
    /// Prior of the topic-word distributions.
    pub eta: f64,
}

impl GibbsLda {
    pub fn new(alpha: f64, eta: f64) -> Self {
        Self { alpha, eta }
    }
}

impl Default for GibbsLda {
    fn default() -> Self {
        GibbsLda::new(0.1, 0.01)
    }
}

/// Count tables of one sampling run.
struct Sampler {
    topics: usize,
    words: usize,
    /// Document of every token.
    doc_of: Vec<usize>,
    /// Word of every token.
    word_of: Vec<usize>,
    /// Current topic of every token.
    topic_of: Vec<usize>,
    /// Tokens per (document, topic).
    doc_topic: Vec<u32>,
    /// Tokens per (topic, word).
    topic_word: Vec<u32>,
    /// Tokens per topic.
    topic_total: Vec<u32>,
}

impl Sampler {
    fn new(matrix: &DocumentTermMatrix, topics: usize, rng: &mut ChaCha8Rng) -> Self {
        let words = matrix.cols();
        let tokens = matrix.total() as usize;
        let mut sampler = Sampler {
            topics,
            words,
            doc_of: Vec::with_capacity(tokens),
            word_of: Vec::with_capacity(tokens),
            topic_of: Vec::with_capacity(tokens),
            doc_topic: vec![0; matrix.rows() * topics],
            topic_word: vec![0; topics * words],
            topic_total: vec![0; topics],
        };

        for doc in 0..matrix.rows() {
            for (word, count) in matrix.row(doc).iter().enumerate() {
                for _ in 0..*count {
                    let topic = rng.gen_range(0..topics);
                    sampler.doc_of.push(doc);
                    sampler.word_of.push(word);
                    sampler.topic_of.push(topic);
                    sampler.add(doc, word, topic);
                }
            }
        }
        sampler
    }

    fn add(&mut self, doc: usize, word: usize, topic: usize) {
        self.doc_topic[doc * self.topics + topic] += 1;
        self.topic_word[topic * self.words + word] += 1;
        self.topic_total[topic] += 1;
    }

    fn remove(&mut self, doc: usize, word: usize, topic: usize) {
        self.doc_topic[doc * self.topics + topic] -= 1;
        self.topic_word[topic * self.words + word] -= 1;
        self.topic_total[topic] -= 1;
    }

    /// Resample the topic of every token once.
    fn sweep(&mut self, alpha: f64, eta: f64, rng: &mut ChaCha8Rng, dist: &mut [f64]) {
        let eta_sum = eta * self.words as f64;
        for token in 0..self.topic_of.len() {
            let (doc, word, old) = (self.doc_of[token], self.word_of[token], self.topic_of[token]);
            self.remove(doc, word, old);

            let mut cumulative = 0.0;
            for (topic, slot) in dist.iter_mut().enumerate() {
                let word_weight = (f64::from(self.topic_word[topic * self.words + word]) + eta)
                    / (f64::from(self.topic_total[topic]) + eta_sum);
                let doc_weight = f64::from(self.doc_topic[doc * self.topics + topic]) + alpha;
                cumulative += word_weight * doc_weight;
                *slot = cumulative;
            }

            let u = rng.gen::<f64>() * cumulative;
            let new = dist
                .iter()
                .position(|c| u < *c)
                .unwrap_or(self.topics - 1);

            self.topic_of[token] = new;
            self.add(doc, word, new);
        }
    }

    /// The smoothed topic-word distributions.
    fn topic_word_distributions(&self, eta: f64) -> TopicWeights {
        let eta_sum = eta * self.words as f64;
        (0..self.topics)
            .map(|topic| {
                let norm = f64::from(self.topic_total[topic]) + eta_sum;
                (0..self.words)
                    .map(|word| (f64::from(self.topic_word[topic * self.words + word]) + eta) / norm)
                    .collect()
            })
            .collect()
    }
}

impl TopicModel for GibbsLda {
    fn fit(&self, matrix: &DocumentTermMatrix, params: &TopicParams) -> TopicWeights {
        let topics = params.topic_count.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut sampler = Sampler::new(matrix, topics, &mut rng);
        let mut dist = vec![0.0; topics];

        debug!(
            "Fitting {} topics to {} tokens over {} words",
            topics,
            sampler.topic_of.len(),
            matrix.cols()
        );
        for _ in 0..params.iterations {
            sampler.sweep(self.alpha, self.eta, &mut rng, &mut dist);
        }

        sampler.topic_word_distributions(self.eta)
    }
}
