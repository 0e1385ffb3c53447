use std::env;

use text_workflow::utils::expand_path;

#[test]
fn test_expand_path_with_env_variables() {
    unsafe {
        env::set_var("TWFLOW_TEST_ROOT", "/srv/pipeline");
    }

    let expanded = expand_path("$TWFLOW_TEST_ROOT/app.py");
    assert_eq!(expanded, "/srv/pipeline/app.py");

    let expanded = expand_path("~/$TWFLOW_TEST_ROOT");
    let home = env::var("HOME").or_else(|_| env::var("USERPROFILE")).unwrap_or_default();
    assert_eq!(expanded, format!("{home}//srv/pipeline"));

    unsafe {
        env::remove_var("TWFLOW_TEST_ROOT");
    }
}

#[test]
fn test_expand_path_with_missing_env_variables() {
    unsafe {
        env::remove_var("TWFLOW_TEST_MISSING");
    }

    // Unknown variables fall back to tilde expansion only
    let expanded = expand_path("$TWFLOW_TEST_MISSING/config");
    assert_eq!(expanded, "$TWFLOW_TEST_MISSING/config");

    let expanded = expand_path("~/$TWFLOW_TEST_MISSING/config");
    let home = env::var("HOME").or_else(|_| env::var("USERPROFILE")).unwrap_or_default();
    assert_eq!(expanded, format!("{home}/$TWFLOW_TEST_MISSING/config"));
}

#[test]
fn test_expand_plain_path() {
    assert_eq!(expand_path("config"), "config");
    assert_eq!(expand_path("/usr/bin/python3"), "/usr/bin/python3");
}
