use pretty_assertions::assert_eq;
use sphere_flyer::{
    agent::{FlyerEnv, FullGameShaping, TrainingStage},
    resources::{ConfigError, ControlMode, EnvConfig, SimulationMode},
};
use std::io::Write;
use tempfile::NamedTempFile;

const YAML: &str = r#"
seed: 42
mode: Interactive
control: Human
planet:
  radius: 30.0
spinner:
  angular_speed_deg: 6.0
curriculum:
  start_stage: FullGame
observation:
  lookahead_gates: 2
reward:
  full_game_shaping: Crossing
agent:
  max_episode_steps: 500
"#;

#[test]
fn test_load_yaml_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(YAML.as_bytes()).unwrap();

    let config = EnvConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.seed, 42);
    assert_eq!(config.mode, SimulationMode::Interactive);
    assert_eq!(config.control, ControlMode::Human);
    assert_eq!(config.planet.radius, 30.0);
    assert_eq!(config.spinner.angular_speed_deg, 6.0);
    assert_eq!(config.curriculum.start_stage, TrainingStage::FullGame);
    assert_eq!(config.reward.full_game_shaping, FullGameShaping::Crossing);
    assert_eq!(config.agent.max_episode_steps, Some(500));
    // Untouched sections keep their defaults.
    assert_eq!(config.bird, EnvConfig::default().bird);

    let env = FlyerEnv::headless(config);
    assert_eq!(env.observation_width(), 15);
    assert_eq!(env.stage(), TrainingStage::FullGame);
}

#[test]
fn test_missing_file_reports_path() {
    let err = EnvConfig::from_yaml_file("/nonexistent/flyer.yaml").unwrap_err();
    match err {
        ConfigError::Io { path, .. } => assert_eq!(path, "/nonexistent/flyer.yaml"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"planet: [1, 2").unwrap();
    assert!(matches!(
        EnvConfig::from_yaml_file(file.path()),
        Err(ConfigError::Yaml(_))
    ));
}

#[test]
fn test_json_value_config_is_sanitized() {
    let value = serde_json::json!({
        "time_step": -1.0,
        "planet": { "radius": 0.0 }
    });
    let config = EnvConfig::from_json(&value).unwrap();
    assert!(config.time_step > 0.0);
    assert!(config.planet.radius > 0.0);
}
