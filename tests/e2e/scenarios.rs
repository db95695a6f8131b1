use super::harness::{TestContext, parse_json, read_file, write_file};

pub struct Scenario {
    pub name: &'static str,
    pub run: fn(&TestContext) -> Result<(), String>,
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "help_output",
            run: scenario_help,
        },
        Scenario {
            name: "full_report",
            run: scenario_full_report,
        },
        Scenario {
            name: "json_output",
            run: scenario_json_output,
        },
        Scenario {
            name: "missing_lockfile_fatal",
            run: scenario_missing_lockfile,
        },
        Scenario {
            name: "not_found_does_not_fail",
            run: scenario_not_found_exit_zero,
        },
        Scenario {
            name: "summary_file_idempotent",
            run: scenario_idempotent_summary,
        },
        Scenario {
            name: "config_file_defaults",
            run: scenario_config_defaults,
        },
    ]
}

const PACKAGE_JSON: &str = r#"{
  "name": "fixture-project",
  "dependencies": {
    "react": "^18.0.0",
    "some-lib": "^1.0.0"
  },
  "devDependencies": {
    "@types/node": "^20.0.0"
  }
}"#;

const PACKAGE_LOCK: &str = r#"{
  "name": "fixture-project",
  "lockfileVersion": 3,
  "packages": {
    "": {
      "name": "fixture-project",
      "dependencies": {
        "react": "^18.0.0",
        "some-lib": "^1.0.0"
      }
    },
    "node_modules/react": {
      "version": "18.2.0"
    },
    "node_modules/some-lib": {
      "version": "1.0.0",
      "dependencies": {
        "left-pad": "^1.3.0"
      }
    },
    "node_modules/left-pad": {
      "version": "1.3.0"
    },
    "node_modules/@types/node": {
      "version": "20.11.5"
    }
  }
}"#;

fn write_fixture_project(root: &std::path::Path, packages_list: &str) -> Result<(), String> {
    write_file(&root.join("packages_list.txt"), packages_list)?;
    write_file(&root.join("package.json"), PACKAGE_JSON)?;
    write_file(&root.join("package-lock.json"), PACKAGE_LOCK)?;
    Ok(())
}

fn scenario_help(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("help")?;
    let output = ctx.run_depaudit(&env, &["--help"], &env.root)?;
    output.assert_success()?;
    output.assert_stdout_contains("--lockfile")?;
    Ok(())
}

fn scenario_full_report(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("full-report")?;
    write_fixture_project(&env.root, "react:^18.0.0\nleft-pad\nnot-a-real-pkg\n")?;

    let output = ctx.run_depaudit(&env, &[], &env.root)?;
    output.assert_success()?;
    output.assert_stdout_contains("DIRECT DEPENDENCIES FOUND")?;
    output.assert_stdout_contains("TRANSIENT DEPENDENCIES FOUND")?;
    output.assert_stdout_contains("Required by: some-lib")?;
    output.assert_stdout_contains("Full chain: some-lib → left-pad")?;
    output.assert_stdout_contains("Total packages checked: 3")?;
    output.assert_stdout_contains("Not found in project: 1")?;
    output.assert_stdout_contains("Matching versions: 1")?;

    let summary = parse_json(&read_file(
        &env.root.join("dependency-check-results.json"),
    )?)?;
    let direct = summary["direct"].as_array().ok_or("direct not an array")?;
    if direct.len() != 1 || direct[0]["name"] != "react" {
        return Err(format!("Unexpected direct bucket: {:?}", direct));
    }
    if summary["direct"][0]["versionMatch"] != serde_json::json!(true) {
        return Err("Expected react versionMatch true".to_string());
    }
    if summary["transient"][0]["requiredBy"] != "some-lib" {
        return Err("Expected left-pad required by some-lib".to_string());
    }
    if summary["notFound"][0]["name"] != "not-a-real-pkg" {
        return Err("Expected not-a-real-pkg in notFound".to_string());
    }
    Ok(())
}

fn scenario_json_output(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("json-output")?;
    write_fixture_project(&env.root, "left-pad\n")?;

    let output = ctx.run_depaudit(&env, &["--json"], &env.root)?;
    output.assert_success()?;

    let value = parse_json(&output.stdout)?;
    if value["transient"][0]["name"] != "left-pad" {
        return Err(format!("Unexpected JSON output: {}", output.stdout));
    }
    if output.stdout.contains("SUMMARY") {
        return Err("JSON mode should not print the text report".to_string());
    }
    Ok(())
}

fn scenario_missing_lockfile(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("missing-lockfile")?;
    write_file(&env.root.join("packages_list.txt"), "react\n")?;
    write_file(&env.root.join("package.json"), PACKAGE_JSON)?;

    let output = ctx.run_depaudit(&env, &[], &env.root)?;
    output.assert_failure()?;
    output.assert_stderr_contains("package-lock.json")?;

    if env.root.join("dependency-check-results.json").exists() {
        return Err("No summary file should be written on fatal error".to_string());
    }
    Ok(())
}

fn scenario_not_found_exit_zero(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("not-found")?;
    write_fixture_project(&env.root, "totally-absent:^9.9.9\n")?;

    let output = ctx.run_depaudit(&env, &[], &env.root)?;
    output.assert_success()?;
    output.assert_stdout_contains("Not found in project: 1")?;
    Ok(())
}

fn scenario_idempotent_summary(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("idempotent")?;
    write_fixture_project(&env.root, "react:^18.0.0\nleft-pad:~1.3.0\nabsent\n")?;

    ctx.run_depaudit(&env, &[], &env.root)?.assert_success()?;
    let first = read_file(&env.root.join("dependency-check-results.json"))?;

    ctx.run_depaudit(&env, &[], &env.root)?.assert_success()?;
    let second = read_file(&env.root.join("dependency-check-results.json"))?;

    if first != second {
        return Err("Summary file differs between identical runs".to_string());
    }
    Ok(())
}

fn scenario_config_defaults(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("config-defaults")?;
    write_fixture_project(&env.root, "react\n")?;

    let output_path = env.root.join("out").join("results.json");
    let config = format!(r#"{{ "output": "{}" }}"#, output_path.display());
    write_file(
        &env.xdg_config.join("depaudit").join("config.json"),
        &config,
    )?;
    std::fs::create_dir_all(output_path.parent().unwrap())
        .map_err(|e| format!("Failed to create output dir: {}", e))?;

    let output = ctx.run_depaudit(&env, &[], &env.root)?;
    output.assert_success()?;

    if !output_path.exists() {
        return Err("Summary was not written to the configured path".to_string());
    }

    // CLI flag wins over the config file
    let flag_path = env.root.join("flag-results.json");
    let output = ctx.run_depaudit(
        &env,
        &["--output", flag_path.to_str().unwrap()],
        &env.root,
    )?;
    output.assert_success()?;
    if !flag_path.exists() {
        return Err("Summary was not written to the --output path".to_string());
    }
    Ok(())
}
