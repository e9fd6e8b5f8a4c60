use record_match::record::records_from;
use record_match::{Matcher, Normalizer, SimilarityBackend};

fn main() {
    let normalizer = Normalizer::new();
    let corpus = records_from(
        [
            Some("Goethestraße 5"),
            Some("Schillerweg 12"),
            Some("Am Markt 1"),
        ],
        &normalizer,
    );
    let queries = records_from(
        [Some("Goethe Str. 5"), Some("Schilerweg 12"), None],
        &normalizer,
    );

    // Matches every query with the normalized edit distance on four threads.
    let outcome = Matcher::new(SimilarityBackend::EditDistance)
        .num_workers(4)
        .unwrap()
        .run(&corpus, &queries)
        .unwrap();

    for result in &outcome.results {
        println!(
            "{:?} -> {:?} ({:?}, {:?})",
            result.query().original(),
            result.best_found().map(|r| r.original()),
            result.score(),
            result.decision(),
        );
    }

    let best: Vec<_> = outcome.results.iter().map(|r| r.best_index()).collect();
    // A missing query has no match.
    assert_eq!(best, vec![Some(0), Some(1), None]);
}
