use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use copyutil::{CONFIG_ENV, LogLevel, default_config_path, load_config_from_xml};

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        unsafe {
            std::env::set_var(CONFIG_ENV, value);
        }
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(CONFIG_ENV);
        }
    }
}

#[test]
#[serial]
fn env_override_names_the_config_file() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    let _env = EnvGuard::set(&cfg_path);

    assert_eq!(default_config_path(), Some(cfg_path.clone()));
    // nothing there yet
    assert!(load_config_from_xml().unwrap().is_none());
}

#[test]
#[serial]
fn xml_values_are_loaded_and_trimmed() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        r#"<config>
  <source_path>  /data/photos  </source_path>
  <destination_path>/backup</destination_path>
  <paths_list_file></paths_list_file>
  <rename_files> yes </rename_files>
  <force_overwrite>true</force_overwrite>
  <preserve_timestamps>false</preserve_timestamps>
  <log_level>debug</log_level>
</config>"#,
    )
    .unwrap();
    let _env = EnvGuard::set(&cfg_path);

    let cfg = load_config_from_xml().unwrap().expect("config present");
    assert_eq!(cfg.source_root, Some(PathBuf::from("/data/photos")));
    assert_eq!(cfg.destination_root, Some(PathBuf::from("/backup")));
    assert_eq!(cfg.paths_list_file, None);
    assert!(cfg.rename_files);
    assert!(cfg.force_overwrite);
    assert!(!cfg.preserve_timestamps);
    assert!(!cfg.delete_copied_files);
    assert_eq!(cfg.log_level, LogLevel::Debug);
}

#[test]
#[serial]
fn unknown_xml_fields_are_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><sorce_path>/typo</sorce_path></config>").unwrap();
    let _env = EnvGuard::set(&cfg_path);

    let err = load_config_from_xml().unwrap_err();
    assert!(format!("{err:#}").contains("config.xml"));
}

#[test]
#[serial]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><source_path>/x</config>").unwrap();
    let _env = EnvGuard::set(&cfg_path);

    assert!(load_config_from_xml().is_err());
}
