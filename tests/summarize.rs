use std::io::Write;
use std::sync::Arc;
use std::thread;

use rapid_summarize::embeddings::neighbors;
use rapid_summarize::{
    EmbeddingClusterSummarizer, EmbeddingFile, EmbeddingStore, SelectionStrategy, SimpleAnalyzer,
    SummarizeError, Summarizer, SummarizerSpec, TextAnalyzer, TfIdfSummarizer,
};
use tempfile::NamedTempFile;

const ARTICLE: &str = "\
The city council approved a new budget for public transit on Monday.
Buses will run more often on the busiest routes starting in spring.

Engineers plan to repair three bridges that carry heavy traffic. \
The bridges have needed repair since the floods damaged their foundations.

Local farmers reported a strong harvest of apples and pears this autumn. \
Orchards near the river produced the largest apples in a decade. \
Prices for fruit at the market fell as supply grew.

The library will extend its opening hours during the exam season. \
Students asked for quiet rooms and longer access to the reading halls. \
The council also funded new books for the library.";

const VECTORS: &[&str] = &[
    "council 0.9 0.1 0.0 0.2",
    "budget 0.8 0.2 0.1 0.1",
    "transit 0.7 0.6 0.0 0.0",
    "buses 0.5 0.8 0.0 0.0",
    "routes 0.4 0.8 0.1 0.0",
    "traffic 0.3 0.9 0.1 0.0",
    "engineers 0.2 0.7 0.3 0.0",
    "bridges 0.1 0.8 0.4 0.0",
    "repair 0.2 0.6 0.5 0.0",
    "floods 0.0 0.4 0.7 0.1",
    "foundations 0.1 0.5 0.6 0.0",
    "farmers 0.0 0.1 0.9 0.2",
    "harvest 0.0 0.0 1.0 0.1",
    "apples 0.0 0.0 0.9 0.4",
    "pears 0.0 0.0 0.8 0.5",
    "orchards 0.0 0.1 0.9 0.3",
    "river 0.0 0.3 0.7 0.2",
    "fruit 0.0 0.0 0.8 0.4",
    "market 0.3 0.0 0.6 0.3",
    "prices 0.4 0.0 0.5 0.2",
    "library 0.2 0.0 0.1 0.9",
    "books 0.1 0.0 0.1 1.0",
    "students 0.1 0.1 0.0 0.9",
    "exam 0.0 0.1 0.0 0.8",
    "reading 0.0 0.0 0.1 0.9",
    "halls 0.1 0.2 0.0 0.7",
    "this line is malformed",
];

fn vector_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in VECTORS {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn store(file: &NamedTempFile, capacity: usize) -> Arc<EmbeddingStore> {
    Arc::new(EmbeddingStore::new(EmbeddingFile::new(file.path(), 4), capacity))
}

fn sentences() -> Vec<String> {
    SimpleAnalyzer::new().sentences(ARTICLE)
}

/// Every summary line is an input sentence, in document order, without
/// repeats.
fn assert_ordered_subset(summary: &str) {
    let all = sentences();
    let mut last = None;
    for line in summary.lines() {
        let index = all
            .iter()
            .position(|s| s == line)
            .unwrap_or_else(|| panic!("not an input sentence: {line}"));
        if let Some(prev) = last {
            assert!(index > prev, "out of order: {summary}");
        }
        last = Some(index);
    }
}

#[test]
fn test_article_splits_into_ten_sentences() {
    let all = sentences();
    assert_eq!(all.len(), 10);
    assert_eq!(
        all[1],
        "Buses will run more often on the busiest routes starting in spring."
    );
}

#[test]
fn test_three_line_summary() {
    let file = vector_file();
    for strategy in [SelectionStrategy::FirstFit, SelectionStrategy::CentroidMaximizing] {
        let summarizer = EmbeddingClusterSummarizer::new(store(&file, 1000)).with_strategy(strategy);
        let summary = summarizer.summarize(ARTICLE, 3).unwrap();

        // The four topics are far apart, so 0.95 never blocks a third pick.
        assert_eq!(summary.lines().count(), 3, "{strategy:?}: {summary}");
        assert_ordered_subset(&summary);
    }
}

#[test]
fn test_three_line_summary_without_redundancy_filter() {
    let file = vector_file();
    for strategy in [SelectionStrategy::FirstFit, SelectionStrategy::CentroidMaximizing] {
        let summarizer = EmbeddingClusterSummarizer::new(store(&file, 1000))
            .with_strategy(strategy)
            .with_sim_threshold(1.0);
        let summary = summarizer.summarize(ARTICLE, 3).unwrap();

        assert_eq!(summary.lines().count(), 3, "{strategy:?}: {summary}");
        assert_ordered_subset(&summary);
    }
}

#[test]
fn test_vector_file_with_trailing_delimiters_and_bad_bytes() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"\xff\xfe 0 0 0 1\n").unwrap();
    for line in VECTORS {
        writeln!(file, "{line} ").unwrap();
    }
    file.flush().unwrap();

    let summarizer = EmbeddingClusterSummarizer::new(store(&file, 1000)).with_sim_threshold(1.0);
    let summary = summarizer.summarize(ARTICLE, 3).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(!summarizer.store().is_empty());
}

#[test]
fn test_ratio_summary() {
    let file = vector_file();
    let summarizer = EmbeddingClusterSummarizer::new(store(&file, 1000)).with_sim_threshold(1.0);

    let summary = summarizer.summarize_ratio(ARTICLE, 0.2).unwrap();
    assert_eq!(summary.lines().count(), 2);
    assert_ordered_subset(&summary);
}

#[test]
fn test_more_lines_than_sentences_returns_all() {
    let file = vector_file();
    let summarizer = EmbeddingClusterSummarizer::new(store(&file, 1000)).with_sim_threshold(1.0);

    let summary = summarizer.summarize(ARTICLE, 50).unwrap();
    assert_eq!(summary.lines().collect::<Vec<_>>(), sentences());
}

#[test]
fn test_single_sentence() {
    let file = vector_file();
    let summarizer = EmbeddingClusterSummarizer::new(store(&file, 1000));
    let text = "The library funded new books.";
    assert_eq!(summarizer.summarize(text, 3).unwrap(), text);
}

#[test]
fn test_small_store_gives_same_summary_as_large_store() {
    let file = vector_file();
    let large = EmbeddingClusterSummarizer::new(store(&file, 1000));
    let small = EmbeddingClusterSummarizer::new(store(&file, 4));

    // Warm the small store with unrelated words so summarizing must evict.
    let warm = ["exam", "halls", "river", "prices"].iter().map(|w| w.to_string()).collect();
    small.store().ensure(&warm).unwrap();

    let expected = large.summarize(ARTICLE, 3).unwrap();
    assert_eq!(small.summarize(ARTICLE, 3).unwrap(), expected);
}

#[test]
fn test_shared_store_across_threads() {
    let file = vector_file();
    let shared = store(&file, 6);
    let expected = EmbeddingClusterSummarizer::new(store(&file, 1000))
        .summarize(ARTICLE, 2)
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let summarizer = EmbeddingClusterSummarizer::new(Arc::clone(&shared));
            thread::spawn(move || {
                // Interleave unrelated requests to churn the store.
                let noise = [["farmers", "books"], ["budget", "exam"]][i % 2]
                    .iter()
                    .map(|w| w.to_string())
                    .collect();
                summarizer.store().ensure(&noise).unwrap();
                summarizer.summarize(ARTICLE, 2).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_neighbor_queries_over_loaded_store() {
    let file = vector_file();
    let store = store(&file, 1000);
    let words = ["apples", "pears", "fruit", "buses", "library"]
        .iter()
        .map(|w| w.to_string())
        .collect();
    let report = store.ensure(&words).unwrap();
    assert_eq!(report.loaded, 5);

    let snapshot = store.snapshot();
    let closest = neighbors::distance(&snapshot, &["apples"], 2).unwrap().unwrap();
    assert_eq!(closest.len(), 2);
    assert!(closest.iter().all(|n| n.word != "apples"));
    assert!(["pears", "fruit"].contains(&closest[0].word.as_str()));

    assert!(neighbors::cosine_words(&snapshot, "apples", "unknown").unwrap().is_none());
}

#[test]
fn test_missing_embedding_file() {
    let summarizer = EmbeddingClusterSummarizer::new(Arc::new(EmbeddingStore::new(
        EmbeddingFile::new("/nonexistent/glove.6B.50d.txt", 50),
        100,
    )));
    let err = summarizer.summarize(ARTICLE, 3).unwrap_err();
    assert!(matches!(err, SummarizeError::BackingFileUnavailable { .. }));
}

#[test]
fn test_tf_idf_summary() {
    let summary = TfIdfSummarizer::new().summarize(ARTICLE, 4).unwrap();
    assert_eq!(summary.lines().count(), 4);
    assert_ordered_subset(&summary);
}

#[test]
fn test_summarizer_from_json_spec() {
    let file = vector_file();
    let path = serde_json::to_string(file.path()).unwrap();
    let spec = SummarizerSpec::from_json(&format!(
        r#"{{
            "v": 1,
            "variant": {{
                "kind": "embedding_cluster",
                "strategy": "rossiello",
                "embeddings": {{ "path": {path}, "dimensions": 4, "capacity": 100 }}
            }}
        }}"#
    ))
    .unwrap();

    let summarizer = spec.build().unwrap();
    let summary = summarizer.summarize(ARTICLE, 3).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert_ordered_subset(&summary);
}
