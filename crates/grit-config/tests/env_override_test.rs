//! 单独的测试进程：环境变量只在这里设置，不影响 loader 的单元测试

use std::env;
use std::fs;
use std::path::PathBuf;

use grit_config::ConfigLoader;
use tempfile::tempdir;

#[test]
fn test_grit_env_vars_override_environment_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("environments/prod.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "name = \"prod\"\nprovider = [\"gcp\"]\noutput_dir = \"out\"\n").unwrap();

    env::set_var("GRIT_OUTPUT_DIR", "custom-out");
    env::set_var("GRIT_PROVIDER", "aws,gcp");

    let result = ConfigLoader::new(temp_dir.path()).load_environment("prod");

    env::remove_var("GRIT_OUTPUT_DIR");
    env::remove_var("GRIT_PROVIDER");

    let config = result.unwrap();
    assert_eq!(config.name, "prod");
    assert_eq!(config.output_dir, PathBuf::from("custom-out"));
    assert_eq!(config.provider, vec!["aws", "gcp"]);
    assert!(config.environment().has_provider("aws"));
}
