//! Integration tests for the server config codec
//!
//! Covers the JSON branch (strict, two-space indent) and the key=value
//! dialect (tolerant parse, value-lossless round trip), plus the
//! catalog-driven load/save composition.

use camino::Utf8PathBuf;
use steamkeeper::{
    ConfigFormat, ConfigValue, load_server_config, parse_config, save_server_config,
    serialize_config,
};
use tempfile::TempDir;

#[test]
fn test_ini_sections_and_scalars() {
    let text = "key1=value1\nkey2 = value with spaces\n[section]\nkey3=123\ninvalidline";
    let doc = parse_config(text, ConfigFormat::Ini).unwrap();

    assert_eq!(doc["key1"], ConfigValue::String("value1".to_string()));
    assert_eq!(
        doc["key2"],
        ConfigValue::String("value with spaces".to_string())
    );

    let ConfigValue::Map(section) = &doc["section"] else {
        panic!("expected section map");
    };
    assert_eq!(section["key3"], ConfigValue::Number(123.0));
    // The line with no '=' contributes no key
    assert_eq!(doc.len(), 3);
    assert_eq!(section.len(), 1);
}

#[test]
fn test_ini_comments_and_blank_lines_skipped() {
    let text = "; comment\n\n# another\nname=palworld\n";
    let doc = parse_config(text, ConfigFormat::Ini).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc["name"], ConfigValue::String("palworld".to_string()));
}

#[test]
fn test_ini_compound_values() {
    let text = "list=(a,b,c)\nmapping=(k1=v1,k2=v2)\n";
    let doc = parse_config(text, ConfigFormat::Ini).unwrap();

    assert_eq!(
        doc["list"],
        ConfigValue::List(vec![
            ConfigValue::String("a".to_string()),
            ConfigValue::String("b".to_string()),
            ConfigValue::String("c".to_string()),
        ])
    );

    let ConfigValue::Map(mapping) = &doc["mapping"] else {
        panic!("expected nested mapping");
    };
    assert_eq!(mapping["k1"], ConfigValue::String("v1".to_string()));
    assert_eq!(mapping["k2"], ConfigValue::String("v2".to_string()));
}

#[test]
fn test_ini_palworld_style_option_settings() {
    let text = "[/Script/Pal.PalGameWorldSettings]\nOptionSettings=(Difficulty=None,DayTimeSpeedRate=1.000000,bEnableFastTravel=True,ServerName=\"Default Palworld Server\")\n";
    let doc = parse_config(text, ConfigFormat::Ini).unwrap();

    let ConfigValue::Map(section) = &doc["/Script/Pal.PalGameWorldSettings"] else {
        panic!("expected section");
    };
    let ConfigValue::Map(options) = &section["OptionSettings"] else {
        panic!("expected nested option mapping");
    };
    assert_eq!(options["Difficulty"], ConfigValue::String("None".to_string()));
    assert_eq!(options["DayTimeSpeedRate"], ConfigValue::Number(1.0));
    assert_eq!(options["bEnableFastTravel"], ConfigValue::Bool(true));
    assert_eq!(
        options["ServerName"],
        ConfigValue::String("Default Palworld Server".to_string())
    );
}

#[test]
fn test_ini_round_trip_is_value_lossless() {
    let text = "top=1\n; lost comment\n[server]\nname=my server\nrates=(1.5,2,3)\nflags=(pvp=true,hardcore=false)\n";
    let once = parse_config(text, ConfigFormat::Ini).unwrap();
    let rendered = serialize_config(&once, ConfigFormat::Ini).unwrap();
    let twice = parse_config(&rendered, ConfigFormat::Ini).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_ini_serialize_quotes_compound_strings_when_needed() {
    let mut doc = steamkeeper::ConfigDocument::new();
    doc.insert(
        "names".to_string(),
        ConfigValue::List(vec![
            ConfigValue::String("plain".to_string()),
            ConfigValue::String("with space".to_string()),
            ConfigValue::String("with,comma".to_string()),
        ]),
    );

    let rendered = serialize_config(&doc, ConfigFormat::Ini).unwrap();
    assert_eq!(rendered, "names=(plain,\"with space\",\"with,comma\")\n");

    let reparsed = parse_config(&rendered, ConfigFormat::Ini).unwrap();
    assert_eq!(reparsed, doc);
}

#[test]
fn test_json_parse_and_two_space_indent() {
    let text = r#"{"name":"enshrouded","slotCount":16,"log":{"level":"info"}}"#;
    let doc = parse_config(text, ConfigFormat::Json).unwrap();
    assert_eq!(doc["name"], ConfigValue::String("enshrouded".to_string()));
    assert_eq!(doc["slotCount"], ConfigValue::Number(16.0));

    let rendered = serialize_config(&doc, ConfigFormat::Json).unwrap();
    assert!(rendered.contains("\n  \"name\""));
    assert_eq!(parse_config(&rendered, ConfigFormat::Json).unwrap(), doc);
}

#[test]
fn test_invalid_json_is_a_real_error() {
    assert!(parse_config("{not json", ConfigFormat::Json).is_err());
    assert!(parse_config("[1,2,3]", ConfigFormat::Json).is_err());
}

#[tokio::test]
async fn test_load_save_server_config_end_to_end() {
    let install = TempDir::new().unwrap();
    let install_path = Utf8PathBuf::from_path_buf(install.path().to_path_buf()).unwrap();

    std::fs::write(
        install.path().join("enshrouded_server.json"),
        r#"{"name":"my server","gamePort":15636}"#,
    )
    .unwrap();

    let (mut doc, format) = load_server_config(2278520, &install_path).await.unwrap();
    assert_eq!(format, ConfigFormat::Json);
    assert_eq!(doc["gamePort"], ConfigValue::Number(15636.0));

    doc.insert(
        "name".to_string(),
        ConfigValue::String("renamed".to_string()),
    );
    save_server_config(2278520, &install_path, &doc).await.unwrap();

    let (reloaded, _) = load_server_config(2278520, &install_path).await.unwrap();
    assert_eq!(reloaded["name"], ConfigValue::String("renamed".to_string()));
}

#[tokio::test]
async fn test_config_editing_unsupported_for_valheim() {
    let install = TempDir::new().unwrap();
    let install_path = Utf8PathBuf::from_path_buf(install.path().to_path_buf()).unwrap();
    assert!(load_server_config(892970, &install_path).await.is_err());
}
