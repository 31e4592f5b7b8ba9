use predicates::prelude::*;
use test_env::TestEnv;

/// Parse the "#" and title columns of a task/lead table
fn order_and_names(stdout: &str, name_col: usize) -> Vec<(i64, String)> {
    stdout
        .lines()
        .skip(2)
        .map(|line| {
            let cells: Vec<&str> = line.split_whitespace().collect();
            (cells[0].parse().unwrap(), cells[name_col].to_string())
        })
        .collect()
}

fn create_user(env: &TestEnv, name: &str) -> String {
    let out = env.run(&["users", "add", name]);
    // "Created user <id>: <name>"
    out.split_whitespace().nth(2).unwrap().trim_end_matches(':').to_string()
}

#[test]
fn test_columns_seeded_on_first_list() {
    let env = TestEnv::new();
    let user = create_user(&env, "Ada");

    let first = env.run(&["--user", &user, "columns", "list"]);
    assert!(first.contains("To-do"));
    assert!(first.contains("In Progress"));
    assert!(first.contains("Done"));

    let second = env.run(&["--user", &user, "columns", "list"]);
    assert_eq!(first, second);
}

#[test]
fn test_task_lifecycle() {
    let env = TestEnv::new();
    let user = create_user(&env, "Ada");
    env.configure(&format!("user={}", user));

    env.run(&["columns", "list"]);
    // Default columns are 1, 2, 3 in a fresh database
    env.run(&["tasks", "add", "1", "Alpha"]);
    env.run(&["tasks", "add", "1", "Bravo", "--priority", "high"]);
    env.run(&["tasks", "add", "1", "Charlie"]);

    env.run(&["tasks", "reorder", "1", "2"]);
    let out = env.run(&["tasks", "list", "1"]);
    assert_eq!(
        order_and_names(&out, 3),
        vec![(0, "Bravo".into()), (1, "Charlie".into()), (2, "Alpha".into())]
    );

    env.run(&["tasks", "move", "3", "2", "0"]);
    let out = env.run(&["tasks", "list", "1"]);
    assert_eq!(order_and_names(&out, 3), vec![(0, "Bravo".into()), (1, "Alpha".into())]);
    let out = env.run(&["tasks", "list", "2"]);
    assert_eq!(order_and_names(&out, 3), vec![(0, "Charlie".into())]);

    env.run(&["tasks", "rm", "2"]);
    let out = env.run(&["tasks", "list", "1"]);
    assert_eq!(order_and_names(&out, 3), vec![(0, "Alpha".into())]);
}

#[test]
fn test_task_list_json() {
    let env = TestEnv::new();
    let user = create_user(&env, "Ada");
    env.run(&["--user", &user, "columns", "list"]);
    env.run(&["--user", &user, "tasks", "add", "1", "Write brief", "--description", "Q3 launch"]);

    let out = env.run(&["--user", &user, "tasks", "list", "1", "--json"]);
    let tasks: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(tasks[0]["title"], "Write brief");
    assert_eq!(tasks[0]["priority"], "medium");
    assert_eq!(tasks[0]["order"], 0);
    assert_eq!(tasks[0]["description"], "Q3 launch");
}

#[test]
fn test_other_user_is_unauthorized() {
    let env = TestEnv::new();
    let owner = create_user(&env, "Ada");
    let intruder = create_user(&env, "Eve");
    env.run(&["--user", &owner, "columns", "list"]);
    env.run(&["--user", &owner, "tasks", "add", "1", "Secret"]);

    env.cmd()
        .args(["--user", &intruder, "tasks", "reorder", "1", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("not authorized"));
}

#[test]
fn test_missing_task_is_not_found() {
    let env = TestEnv::new();
    let user = create_user(&env, "Ada");

    env.cmd()
        .args(["--user", &user, "tasks", "rm", "42"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("task 42 not found"));
}

#[test]
fn test_missing_user_selection() {
    let env = TestEnv::new();

    env.cmd()
        .args(["columns", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No user selected"));
}

#[test]
fn test_invalid_priority_rejected() {
    let env = TestEnv::new();
    let user = create_user(&env, "Ada");
    env.run(&["--user", &user, "columns", "list"]);

    env.cmd()
        .args(["--user", &user, "tasks", "add", "1", "Task", "--priority", "urgent"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid priority"));

    let out = env.run(&["--user", &user, "tasks", "list", "1"]);
    assert!(out.contains("No tasks."));
}

#[test]
fn test_funnel_pipeline() {
    let env = TestEnv::new();
    let user = create_user(&env, "Ada");
    env.configure(&format!("user={}", user));

    env.run(&["funnels", "add", "Inbound", "--description", "Website signups"]);
    let stages = env.run(&["stages", "list", "1"]);
    for stage in ["New Lead", "Contacted", "Qualified", "Proposal", "Closed"] {
        assert!(stages.contains(stage), "missing stage {}", stage);
    }

    env.run(&["leads", "add", "1", "Acme", "--company", "Acme", "--value", "1200"]);
    env.run(&["leads", "add", "1", "Globex", "--email", "sales@globex.com"]);
    env.run(&["leads", "add", "2", "Initech"]);

    // Move Acme in front of Initech
    env.run(&["leads", "move", "1", "2", "0"]);
    let contacted = env.run(&["leads", "list", "2"]);
    assert_eq!(
        order_and_names(&contacted, 2),
        vec![(0, "Acme".into()), (1, "Initech".into())]
    );
    let new_leads = env.run(&["leads", "list", "1"]);
    assert_eq!(order_and_names(&new_leads, 2), vec![(0, "Globex".into())]);

    env.run(&["stages", "reorder", "5", "0"]);
    let stages = env.run(&["stages", "list", "1", "--json"]);
    let stages: serde_json::Value = serde_json::from_str(&stages).unwrap();
    assert_eq!(stages[0]["name"], "Closed");
    assert_eq!(stages[4]["name"], "Proposal");

    env.run(&["funnels", "rm", "1"]);
    let funnels = env.run(&["funnels", "list"]);
    assert!(funnels.contains("No funnels."));
}

#[test]
fn test_invalid_lead_email_rejected() {
    let env = TestEnv::new();
    let user = create_user(&env, "Ada");
    env.run(&["--user", &user, "funnels", "add", "Inbound"]);
    env.run(&["--user", &user, "stages", "list", "1"]);

    env.cmd()
        .args(["--user", &user, "leads", "add", "1", "Acme", "--email", "nobody"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid email"));
}

#[test]
fn test_other_user_cannot_edit_task() {
    let env = TestEnv::new();
    let owner = create_user(&env, "Ada");
    let intruder = create_user(&env, "Eve");
    env.run(&["--user", &owner, "columns", "list"]);
    env.run(&["--user", &owner, "tasks", "add", "1", "Secret"]);

    env.cmd()
        .args(["--user", &intruder, "tasks", "edit", "1", "--title", "Mine"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not authorized to access column 1"));

    let out = env.run(&["--user", &owner, "tasks", "list", "1"]);
    assert_eq!(order_and_names(&out, 3), vec![(0, "Secret".into())]);
}
