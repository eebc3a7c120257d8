use super::*;
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn shape_then_files() {
    let config = parse_check_args(&args(&["Patient", "a.json", "b.json"])).unwrap();
    assert_eq!(config.shape, "Patient");
    assert_eq!(config.files, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    assert!(config.parallel);
    assert!(!config.quiet);
    assert_eq!(config.max_depth, 1024);
}

#[test]
fn flags_anywhere() {
    let config = parse_check_args(&args(&[
        "--quiet",
        "Bundle<Patient>",
        "--max-depth=64",
        "a.json",
        "--no-parallel",
        "--json",
    ]))
    .unwrap();
    assert_eq!(
        config,
        CheckConfig {
            shape: "Bundle<Patient>".into(),
            files: vec![PathBuf::from("a.json")],
            max_depth: 64,
            parallel: false,
            quiet: true,
            json: true,
        }
    );
}

#[test]
fn usage_errors() {
    assert_eq!(parse_check_args(&[]), Err(UsageError::MissingShape));
    assert_eq!(
        parse_check_args(&args(&["Patient"])),
        Err(UsageError::MissingFiles)
    );
    assert_eq!(
        parse_check_args(&args(&["Patient", "a.json", "--max-depth=0"])),
        Err(UsageError::BadDepth { value: "0".into() })
    );
    assert_eq!(
        parse_check_args(&args(&["Patient", "a.json", "--max-depth=deep"])),
        Err(UsageError::BadDepth {
            value: "deep".into()
        })
    );
    assert_eq!(
        parse_check_args(&args(&["Patient", "a.json", "--fast"])),
        Err(UsageError::UnknownFlag {
            flag: "--fast".into()
        })
    );
}
