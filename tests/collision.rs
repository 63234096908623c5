// tests/collision.rs - Integration tests for the birthday attack collision finder
// Exercises the public library surface end to end against small toy oracles.

use birthdaycrack::attack::finder::verify_collision;
use birthdaycrack::{
    find_multiple_collisions, get_oracle, CollisionFinder, GeneratorKind, InputGenerator,
};

fn msg_index(input: &[u8]) -> u64 {
    String::from_utf8_lossy(input)
        .strip_prefix("msg_")
        .and_then(|s| s.parse().ok())
        .expect("input should look like msg_<i>")
}

#[test]
fn sixteen_bit_sequential_scenario() {
    let oracle = get_oracle(16).unwrap();
    let mut finder = CollisionFinder::new(oracle.clone());
    let result = finder.find_collision(None, GeneratorKind::Sequential, "msg");

    assert!(result.found, "16-bit sequential search must collide");
    assert!(result.attempts <= 2560, "within 10*sqrt(65536) attempts");
    assert_ne!(result.input1, result.input2);
    assert_eq!(oracle.hash(&result.input1), result.hash_value);
    assert_eq!(oracle.hash(&result.input2), result.hash_value);
    assert!((result.hash_value as u128) < oracle.output_space());

    // First-seen tie-break: input1 was generated before input2.
    assert!(msg_index(&result.input1) < msg_index(&result.input2));
}

#[test]
fn sequential_runs_are_bit_for_bit_reproducible() {
    let oracle = get_oracle(16).unwrap();
    let mut first_finder = CollisionFinder::new(oracle.clone());
    let mut second_finder = CollisionFinder::new(oracle);

    let first = first_finder.find_collision(None, GeneratorKind::Sequential, "msg");
    let second = second_finder.find_collision(None, GeneratorKind::Sequential, "msg");

    assert_eq!(first.attempts, second.attempts);
    assert_eq!(first.input1, second.input1);
    assert_eq!(first.input2, second.input2);
    assert_eq!(first.hash_value, second.hash_value);
}

#[test]
fn seeded_random_search_is_reproducible() {
    let oracle = get_oracle(12).unwrap();
    let mut finder = CollisionFinder::new(oracle);

    let first = finder.find_collision_with(
        Some(1000),
        InputGenerator::with_seed(GeneratorKind::Random, "msg", 1234),
    );
    let second = finder.find_collision_with(
        Some(1000),
        InputGenerator::with_seed(GeneratorKind::Random, "msg", 1234),
    );

    assert_eq!(first.found, second.found);
    assert_eq!(first.attempts, second.attempts);
    assert_eq!(first.input1, second.input1);
    assert_eq!(first.input2, second.input2);
}

#[test]
fn exhausted_budget_is_a_result_not_an_error() {
    let oracle = get_oracle(48).unwrap();
    let mut finder = CollisionFinder::new(oracle.clone());
    let result = finder.find_collision(Some(100), GeneratorKind::Sequential, "msg");

    assert!(!result.found);
    assert_eq!(result.attempts, 100);
    assert!(result.input1.is_empty() && result.input2.is_empty());
    assert_eq!(result.hash_value, 0);
    assert!(!verify_collision(oracle.as_ref(), &result).unwrap());
}

#[test]
fn multiple_collisions_stop_at_first_failure() {
    let oracle = get_oracle(20).unwrap();
    // Budget of 3 draws cannot realistically collide in a 2^20 space, so the
    // list stops after the first search.
    let results = find_multiple_collisions(oracle.clone(), 5, Some(3));
    assert!(results.len() <= 5);
    assert_eq!(results.len(), 1);
    assert!(!results[0].found);

    // With the default budget every search succeeds and all are verifiable.
    let results = find_multiple_collisions(oracle.clone(), 5, None);
    assert_eq!(results.len(), 5);
    for result in &results {
        assert!(result.found);
        assert!(verify_collision(oracle.as_ref(), result).unwrap());
    }
}

#[test]
fn distinct_prefixes_give_distinct_collisions() {
    let oracle = get_oracle(12).unwrap();
    let results = find_multiple_collisions(oracle, 3, None);
    assert_eq!(results.len(), 3);
    assert!(results[0].input1.starts_with(b"collision0_"));
    assert!(results[1].input1.starts_with(b"collision1_"));
    assert!(results[2].input1.starts_with(b"collision2_"));
}
