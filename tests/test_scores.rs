use taxi_rush::scores::*;

fn entry(name: &str, score: f64) -> ScoreEntry {
    ScoreEntry {
        name: name.to_string(),
        score,
    }
}

#[test]
fn missing_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.csv");
    assert!(read_scores(&path).unwrap().is_empty());
    assert!(leaderboard(&path, LEADERBOARD_SIZE).unwrap().is_empty());
}

#[test]
fn appends_keep_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.csv");
    append_score(&path, &entry("ada", 120.5)).unwrap();
    append_score(&path, &entry("bo", 80.0)).unwrap();

    let rows = read_scores(&path).unwrap();
    assert_eq!(rows, vec![entry("ada", 120.5), entry("bo", 80.0)]);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 2);
    assert!(raw.starts_with("ada,120.5"));
}

#[test]
fn leaderboard_is_top_five_highest_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.csv");
    let scores = [30.0, 95.0, 10.0, 250.0, 60.0, 95.5, 5.0];
    for (i, score) in scores.iter().enumerate() {
        append_score(&path, &entry(&format!("p{i}"), *score)).unwrap();
    }

    let top = leaderboard(&path, LEADERBOARD_SIZE).unwrap();
    let got: Vec<f64> = top.iter().map(|e| e.score).collect();
    assert_eq!(got, vec![250.0, 95.5, 95.0, 60.0, 30.0]);
    assert_eq!(top[0].name, "p3");
}

#[test]
fn ties_keep_their_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.csv");
    append_score(&path, &entry("first", 40.0)).unwrap();
    append_score(&path, &entry("second", 40.0)).unwrap();

    let top = leaderboard(&path, 1).unwrap();
    assert_eq!(top, vec![entry("first", 40.0)]);
}
