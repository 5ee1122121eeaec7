use std::fs;
use std::path::Path;

use grit_cli::{generate, inspect, GenerateOptions};
use grit_rule::AlertRulesGroup;
use serde_json::Value;
use tempfile::tempdir;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup(dir: &Path) {
    write(
        dir,
        "environments/prod.toml",
        r#"
name = "prod"
provider = ["aws"]

[datasources]
prometheus = "prom-main"
"#,
    );
    write(
        dir,
        "alerts/aws.toml",
        r#"
[[groups]]
name = "EC2"
folder = "AWS"

[[groups.builders]]
backend = "cloudwatch"
metric_namespace = "AWS/EC2"
dashboard_uid = "uid-ec2-alerts"

[[groups.builders.alerts]]
title = "High CPU"
condition = "$REDUCE_EXPRESSION > 90"
reduce_function = "mean"
summary = "High CPU Utilization"
panel_id = 1
metric = { name = "CPUUtilization", statistics = ["Average"], dimensions = { InstanceId = "*" } }

[[groups.builders]]
backend = "prometheus"

[[groups.builders.alerts]]
title = "Target down"
condition = "$REDUCE_EXPRESSION < 1"
metric = { expr = "up" }
"#,
    );
    write(
        dir,
        "dashboards/main.toml",
        "[[dashboards]]\nuuid = \"dash-main\"\nfolder = \"AWS\"\npath = \"models/main.json\"\n",
    );
    write(dir, "dashboards/models/main.json", r#"{"title": "Main", "panels": []}"#);
}

#[test]
fn test_generate_writes_alerts_and_dashboards() {
    let config_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    setup(config_dir.path());

    let options = GenerateOptions::new(config_dir.path(), "prod").with_out(out_dir.path());
    let paths = generate(&options).unwrap();

    let group_uid = AlertRulesGroup::new("EC2").with_folder("AWS").uid();
    assert_eq!(
        paths,
        vec![
            out_dir.path().join(format!("prod-alerts/AWS/{}.json", group_uid)),
            out_dir.path().join("prod/AWS/dash-main.json"),
        ]
    );

    let doc: Value = serde_json::from_str(&fs::read_to_string(&paths[0]).unwrap()).unwrap();
    let rules = doc["groups"][0]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["title"], "High CPU");
    assert_eq!(rules[0]["condition"], "ALERT_CONDITION");
    assert_eq!(rules[1]["title"], "Target down");
    assert_eq!(rules[1]["data"][0]["datasourceUid"], "prom-main");

    let dashboard: Value = serde_json::from_str(&fs::read_to_string(&paths[1]).unwrap()).unwrap();
    assert_eq!(dashboard["title"], "Main");
}

#[test]
fn test_generate_is_deterministic() {
    let config_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    setup(config_dir.path());
    let options = GenerateOptions::new(config_dir.path(), "prod").with_out(out_dir.path());

    let first = generate(&options).unwrap();
    let before: Vec<Vec<u8>> = first.iter().map(|p| fs::read(p).unwrap()).collect();
    let second = generate(&options).unwrap();
    let after: Vec<Vec<u8>> = second.iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(first, second);
    assert_eq!(before, after);
}

#[test]
fn test_inspect_does_not_write() {
    let config_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    setup(config_dir.path());

    let options = GenerateOptions::new(config_dir.path(), "prod").with_out(out_dir.path());
    let groups = inspect(&options).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "EC2");
    assert_eq!(groups[0].rules, vec!["High CPU", "Target down"]);
    assert!(groups[0].path.starts_with("prod-alerts/AWS"));
    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_invalid_time_token_strict_and_lenient() {
    let config_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    write(config_dir.path(), "environments/dev.toml", "name = \"dev\"\n");
    write(
        config_dir.path(),
        "alerts/bad.toml",
        r#"
[[groups]]
name = "Broken"

[[groups.builders]]
backend = "prometheus"
datasource = "prom"

[[groups.builders.alerts]]
title = "Odd window"
condition = "$REDUCE_EXPRESSION > 1"
time_range = { from = "soon", to = "now" }
metric = { expr = "up" }
"#,
    );

    let options = GenerateOptions::new(config_dir.path(), "dev").with_out(out_dir.path());
    assert!(generate(&options).is_err());

    let paths = generate(&options.with_lenient_time_ranges(true)).unwrap();
    let doc: Value = serde_json::from_str(&fs::read_to_string(&paths[0]).unwrap()).unwrap();
    assert_eq!(doc["groups"][0]["rules"][0]["data"][0]["relativeTimeRange"]["from"], 0);
}

#[test]
fn test_duplicate_rule_titles_rejected() {
    let config_dir = tempdir().unwrap();
    write(config_dir.path(), "environments/dev.toml", "name = \"dev\"\n");
    write(
        config_dir.path(),
        "alerts/dup.toml",
        r#"
[[groups]]
name = "Dup"

[[groups.builders]]
backend = "prometheus"
datasource = "prom"

[[groups.builders.alerts]]
title = "Same"
condition = "$REDUCE_EXPRESSION > 1"
metric = { expr = "a" }

[[groups.builders.alerts]]
title = "Same"
condition = "$REDUCE_EXPRESSION > 2"
metric = { expr = "b" }
"#,
    );

    let options = GenerateOptions::new(config_dir.path(), "dev");
    assert!(inspect(&options).is_err());
}

#[test]
fn test_group_defined_in_two_files_rejected() {
    let config_dir = tempdir().unwrap();
    write(config_dir.path(), "environments/dev.toml", "name = \"dev\"\n");
    write(config_dir.path(), "alerts/a.toml", "[[groups]]\nname = \"Shared\"\n");
    write(config_dir.path(), "alerts/b.toml", "[[groups]]\nname = \"Shared\"\n");

    let options = GenerateOptions::new(config_dir.path(), "dev");
    let err = generate(&options).unwrap_err();
    assert!(err.to_string().contains("defined twice"));
}

#[test]
fn test_nested_folder_and_name_do_not_collide() {
    let config_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    write(config_dir.path(), "environments/dev.toml", "name = \"dev\"\n");
    write(
        config_dir.path(),
        "alerts/nested.toml",
        "[[groups]]\nname = \"c\"\nfolder = \"a/b\"\n\n[[groups]]\nname = \"b/c\"\nfolder = \"a\"\n",
    );

    let options = GenerateOptions::new(config_dir.path(), "dev").with_out(out_dir.path());
    let groups = inspect(&options).unwrap();
    assert_eq!(groups.len(), 2);
    assert_ne!(groups[0].uid, groups[1].uid);
}
