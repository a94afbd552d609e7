use std::fs;

use amsams_bench::config::BenchmarkConfig;
use amsams_bench::runner::SelfPlayRunner;

fn config_yaml(dir: &std::path::Path) -> String {
    format!(
        r#"
run_id: "smoke"
matches:
  seed: 99
  count: 3
  target_score: 5
outputs:
  jsonl: "{0}/out/{{run_id}}/matches.jsonl"
  summary_md: "{0}/out/{{run_id}}/summary.md"
"#,
        dir.display()
    )
}

fn run_once(dir: &std::path::Path) -> (Vec<String>, String) {
    let mut config: BenchmarkConfig =
        serde_yaml::from_str(&config_yaml(dir)).expect("parse config");
    config.validate().expect("valid config");
    let outputs = config.resolved_outputs();

    let runner = SelfPlayRunner::new(config, outputs.clone());
    let summary = runner.run().expect("self-play run succeeds");
    assert_eq!(summary.matches_played, 3);

    let rows: Vec<String> = fs::read_to_string(&outputs.jsonl)
        .expect("jsonl written")
        .lines()
        .map(str::to_string)
        .collect();
    let markdown = fs::read_to_string(&outputs.summary_md).expect("summary written");
    (rows, markdown)
}

#[test]
fn writes_one_row_per_match_and_a_summary() {
    let dir = tempfile::tempdir().unwrap();
    let (rows, markdown) = run_once(dir.path());

    assert_eq!(rows.len(), 3);
    for (index, row) in rows.iter().enumerate() {
        let value: serde_json::Value = serde_json::from_str(row).expect("row parses");
        assert_eq!(value["run_id"], "smoke");
        assert_eq!(value["match_index"], index);
        assert!(value["winner"] == "Computer" || value["winner"] == "Human");
    }
    assert!(markdown.contains("# Self-play summary: smoke"));
    assert!(markdown.contains("- matches: 3"));
}

#[test]
fn runs_are_deterministic_for_a_fixed_seed() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let (rows_a, _) = run_once(dir_a.path());
    let (rows_b, _) = run_once(dir_b.path());
    assert_eq!(rows_a, rows_b);
}
