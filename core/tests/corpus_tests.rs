use vectorspace::{Corpus, CorpusOptions, DocIdGenerator, Document, Error, Preprocessor, Vector};

fn prototype_corpus(threads: usize) -> Corpus {
    let mut ids = DocIdGenerator::new();
    let exclude = Preprocessor::new(["test"]);
    let docs = vec![
        Document::from_words(&mut ids, "doc1", "Hello My Name is Nathan test".split_whitespace(), Some(&exclude)),
        Document::from_words(&mut ids, "doc2", "This is a test list of words".split_whitespace(), Some(&exclude)),
        Document::from_words(&mut ids, "doc3", "This is a very sunny day it is very nice".split_whitespace(), Some(&exclude)),
    ];
    Corpus::new(docs, CorpusOptions { threads, debug: false }).unwrap()
}

fn reference_tf_idf(tf: usize, df: usize, n: usize) -> f64 {
    (1.0 + tf as f64).log10() * (n as f64 / (1.0 + df as f64)).log10()
}

#[test]
fn computes_terms() {
    let corp = prototype_corpus(1);
    assert!(!corp.terms().is_empty());
    assert!(corp.terms().contains("nathan"));
    assert!(!corp.terms().contains("test"));
}

#[test]
fn computes_document_frequency() {
    let corp = prototype_corpus(1);
    assert_eq!(corp.document_frequency("this"), 2);
    assert_eq!(corp.document_frequency("test"), 0);
    assert_eq!(corp.document_frequency("is"), 3);
}

#[test]
fn computes_dfs() {
    for threads in [1, 2, 8] {
        let corp = prototype_corpus(threads);
        assert_eq!(corp.df("veri"), Some(1));
        assert_eq!(corp.df("is"), Some(3));
        assert_eq!(corp.df("this"), Some(2));
        assert_eq!(corp.dfs().len(), corp.terms().len());
    }
}

#[test]
fn computes_tf_idf() {
    let corp = prototype_corpus(1);
    let score = corp.tf_idf("is", None, Some(2)).unwrap();
    assert_eq!(score, reference_tf_idf(2, 3, 3));
    assert_eq!(score, 3f64.log10() * (3.0f64 / 4.0).log10());
    assert!(score < 0.0);
}

#[test]
fn computes_tf_idf_vector() {
    let corp = prototype_corpus(1);
    let doc3 = corp.get(2).unwrap();
    let expected: Vector = corp
        .terms()
        .iter()
        .map(|t| reference_tf_idf(doc3.tf(t), corp.df(t).unwrap(), corp.len()))
        .collect();
    let vector = corp.tf_idf_vector(None, Some(2)).unwrap();
    assert_eq!(vector, expected);
    assert_eq!(vector.len(), corp.terms().len());
    let is_pos = corp.term_position("is").unwrap();
    assert_eq!(vector.get(is_pos).unwrap(), reference_tf_idf(2, 3, 3));
}

#[test]
fn computes_matrix() {
    let corp = prototype_corpus(1);
    let matrix = corp.tf_idf_matrix();
    assert_eq!(matrix.len(), 3);
    assert_eq!(matrix.keys().map(String::as_str).collect::<Vec<_>>(), vec!["doc1", "doc2", "doc3"]);
    for (i, v) in matrix.values().enumerate() {
        assert_eq!(v.len(), corp.terms().len());
        assert_eq!(*v, corp.tf_idf_vector(None, Some(i)).unwrap());
    }
    assert!(corp.failures().is_empty());
}

#[test]
fn term_index_is_a_bijection() {
    let corp = prototype_corpus(1);
    let n = corp.terms().len();
    let mut positions: Vec<usize> = corp.terms().iter().map(|t| corp.term_position(t).unwrap()).collect();
    positions.sort_unstable();
    assert_eq!(positions, (0..n).collect::<Vec<_>>());
}

#[test]
fn matrix_is_bitwise_equal_across_thread_counts() {
    let baseline = prototype_corpus(1);
    for threads in [0, 2, 3, 16] {
        let other = prototype_corpus(threads);
        for (a, b) in baseline.tf_idf_matrix().values().zip(other.tf_idf_matrix().values()) {
            let a: Vec<u64> = a.iter().map(|x| x.to_bits()).collect();
            let b: Vec<u64> = b.iter().map(|x| x.to_bits()).collect();
            assert_eq!(a, b);
        }
    }
}

#[test]
fn query_vectors_use_the_corpus_term_index() {
    let corp = prototype_corpus(1);
    let mut ids = DocIdGenerator::new();
    let exclude = Preprocessor::new(["test"]);
    let query = Document::query(&mut ids, "sunny Nathan unseenword", Some(&exclude));
    let v = corp.vectorize(&query).unwrap();
    assert_eq!(v.len(), corp.terms().len());
    assert!(!corp.terms().contains("unseenword"));
    assert!(v.get(corp.term_position("sunni").unwrap()).unwrap() > 0.0);
    assert!(v.get(corp.term_position("nathan").unwrap()).unwrap() > 0.0);
    assert_eq!(v.iter().filter(|x| **x != 0.0).count(), 2);
}

#[test]
fn records_build_documents() {
    let mut ids = DocIdGenerator::new();
    let records = serde_json::json!([
        {"title": "rust tips", "description": "ownership and borrowing", "channel": "ferris", "tags": ["rust"]},
        {"title": "cooking", "description": "pasta tonight", "channel": "chef", "tags": ["food", "pasta"]},
        {"description": "missing title", "channel": "x", "tags": []}
    ]);
    let records = records.as_array().unwrap();
    let ok: Vec<Document> = records[..2]
        .iter()
        .map(|r| Document::from_record(&mut ids, None, r.as_object().unwrap(), None).unwrap())
        .collect();
    let err = Document::from_record(&mut ids, None, records[2].as_object().unwrap(), None).unwrap_err();
    assert!(matches!(err, Error::MissingField("title")));

    let corp = Corpus::new(ok, CorpusOptions::default()).unwrap();
    assert_eq!(corp.df("pasta"), Some(1));
    assert_eq!(corp.get(1).unwrap().tf("pasta"), 2);
}
