use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use record_match::record::records_from;
use record_match::{Matcher, Normalizer, Record, Score, SimilarityBackend};

fn random_texts(rng: &mut Xoshiro256StarStar, n: usize) -> Vec<String> {
    const ALPHABET: &[u8] = b"abcde ";
    (0..n)
        .map(|_| {
            let len = rng.gen_range(0..12);
            (0..len)
                .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
                .collect()
        })
        .collect()
}

fn records(texts: &[String]) -> Vec<Record> {
    records_from(texts.iter().map(Some), &Normalizer::new())
}

#[test]
fn test_scores_in_unit_range() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    let corpus = records(&random_texts(&mut rng, 50));
    let queries = records(&random_texts(&mut rng, 50));
    for backend in SimilarityBackend::ALL {
        let outcome = Matcher::new(backend).run(&corpus, &queries).unwrap();
        assert_eq!(outcome.results.len(), queries.len(), "{backend}");
        assert!(outcome.failures.is_empty());
        for result in &outcome.results {
            match result.score() {
                Some(Score::Similarity(s)) => assert!((0. ..=1.).contains(&s), "{backend}: {s}"),
                Some(Score::Contained(_)) => assert!(backend.is_boolean()),
                None => assert!(result.query().is_blank()),
            }
        }
    }
}

#[test]
fn test_identical_strings() {
    let normalizer = Normalizer::new();
    let corpus = records_from([Some("Am Markt 1"), Some("Goethestraße 5")], &normalizer);
    let queries = records_from([Some("Goethestr. 5"), Some("AM MARKT 1")], &normalizer);
    for backend in SimilarityBackend::ALL {
        let outcome = Matcher::new(backend).run(&corpus, &queries).unwrap();
        let best: Vec<_> = outcome.results.iter().map(|r| r.best_index()).collect();
        assert_eq!(best, vec![Some(1), Some(0)], "{backend}");
        for result in &outcome.results {
            match result.score().unwrap() {
                Score::Similarity(s) => assert!((s - 1.).abs() < 1e-9, "{backend}: {s}"),
                Score::Contained(b) => assert!(b),
            }
            assert_eq!(result.decision(), Some(true));
        }
    }
}

#[test]
fn test_empty_query() {
    let normalizer = Normalizer::new();
    let corpus = records_from([Some("main street 5")], &normalizer);
    let queries = records_from([Some(""), None, Some(" ?! ")], &normalizer);
    for backend in SimilarityBackend::ALL {
        let outcome = Matcher::new(backend).run(&corpus, &queries).unwrap();
        assert_eq!(outcome.results.len(), 3);
        for result in &outcome.results {
            assert_eq!(result.best_found(), None, "{backend}");
            assert_eq!(result.score(), None);
            assert_eq!(result.decision(), None);
        }
    }
}

#[test]
fn test_substring_either_direction() {
    let normalizer = Normalizer::new();
    let corpus = records_from(
        [Some("Goethestraße 5"), Some("Main Street 5"), Some("main street")],
        &normalizer,
    );
    let queries = records_from([Some("main street 5"), Some("Street")], &normalizer);
    let outcome = Matcher::new(SimilarityBackend::Substring)
        .run(&corpus, &queries)
        .unwrap();

    let first = &outcome.results[0];
    // The query contains the third record too, but the second comes first.
    assert_eq!(first.best_index(), Some(1));
    assert_eq!(first.best_found().unwrap().original(), "Main Street 5");
    assert_eq!(first.decision(), Some(true));

    let second = &outcome.results[1];
    assert_eq!(second.best_index(), Some(1));
    assert_eq!(second.score(), Some(Score::Contained(true)));
}

#[test]
fn test_deterministic_across_pool_sizes() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(334);
    let corpus = records(&random_texts(&mut rng, 80));
    let queries = records(&random_texts(&mut rng, 300));
    for backend in SimilarityBackend::ALL {
        let single = Matcher::new(backend)
            .num_workers(1)
            .unwrap()
            .run(&corpus, &queries)
            .unwrap();
        let many = Matcher::new(backend)
            .num_workers(8)
            .unwrap()
            .run(&corpus, &queries)
            .unwrap();
        assert_eq!(single.results, many.results, "{backend}");
        let indices: Vec<_> = many.results.iter().map(|r| r.query_index()).collect();
        assert_eq!(indices, (0..queries.len()).collect::<Vec<_>>());
    }
}

#[test]
fn test_threshold_override() {
    let normalizer = Normalizer::new();
    let corpus = records_from([Some("schillerweg")], &normalizer);
    let queries = records_from([Some("schilerweg")], &normalizer);
    let strict = Matcher::new(SimilarityBackend::EditDistance)
        .threshold(0.95)
        .run(&corpus, &queries)
        .unwrap();
    let loose = Matcher::new(SimilarityBackend::EditDistance)
        .run(&corpus, &queries)
        .unwrap();
    // One deletion out of eleven characters.
    assert_eq!(strict.results[0].decision(), Some(false));
    assert_eq!(loose.results[0].decision(), Some(true));
}

#[test]
fn test_featureless_query() {
    let normalizer = Normalizer::new();
    let corpus = records_from([Some("goethe str"), Some("am markt")], &normalizer);
    // A single character has no bigram and is too short to be a word.
    let queries = records_from([Some("a"), Some("7")], &normalizer);
    for backend in SimilarityBackend::ALL {
        if backend.vector_mode().is_none() {
            continue;
        }
        let outcome = Matcher::new(backend).run(&corpus, &queries).unwrap();
        assert!(outcome.failures.is_empty(), "{backend}");
        for result in &outcome.results {
            assert!(!result.query().is_blank());
            assert_eq!(result.best_index(), Some(0), "{backend}");
            assert_eq!(result.score(), Some(Score::Similarity(0.)), "{backend}");
            assert_eq!(result.decision(), Some(false), "{backend}");
        }
    }
}
