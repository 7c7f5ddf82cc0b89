// End-to-end library pipeline: export file -> records -> fixture files

use indicatif::ProgressBar;
use nlu_annotator::{
    process_records, AnnotationDispatcher, FixtureWriter, InterpretationLoader, LoaderConfig,
    WriterConfig, PHATIC_INTENT,
};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{assert_golden_file, export_item, TestFixture};

const DEVICES: &str = "doppler,hendrix,mshop,knight,firetv";

fn writer_for(fixture: &TestFixture) -> FixtureWriter {
    FixtureWriter::new(WriterConfig {
        base_dir: fixture.out_dir(),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_pipeline_writes_rows_per_intent() {
    let fixture = TestFixture::new();
    let export = fixture.create_export(
        "export.json",
        &[
            export_item(
                "HomeAutomation",
                "TurnOnApplianceIntent",
                "テレビ つけ て",
                &[("ActionTrigger", &["つけ", "て"][..]), ("DeviceType", &["テレビ"][..])],
            ),
            export_item(
                "HomeAutomation",
                "TurnOnApplianceIntent",
                "ライト を つけ て",
                &[("ActionTrigger", &["つけ", "て"][..]), ("DeviceType", &["ライト"][..])],
            ),
            export_item("Global", "NextIntent", "次", &[]),
            export_item("Global", PHATIC_INTENT, "お やすみ", &[("Greeting", &["おやすみ"][..])]),
        ],
    );

    let records = InterpretationLoader::new(LoaderConfig::default())
        .load(&export)
        .await
        .expect("Loading should succeed");
    let stats = process_records(
        &records,
        &AnnotationDispatcher::default(),
        &writer_for(&fixture),
        false,
        &ProgressBar::hidden(),
    )
    .await
    .expect("Batch should succeed");

    assert_eq!(stats.records_loaded, 4);
    assert_eq!(stats.rows_written, 4);
    assert!(!stats.has_failures());

    let expected = format!(
        "HomeAutomation\tTurnOnApplianceIntent\tDeviceType,ActionTrigger\t{{テレビ|DeviceType}}{{つけて|ActionTrigger}}\t{DEVICES}\r\n\
         HomeAutomation\tTurnOnApplianceIntent\tDeviceType,ActionTrigger\t{{ライト|DeviceType}}を{{つけて|ActionTrigger}}\t{DEVICES}\r\n"
    );
    // Label order follows the utterance, not slot declaration order
    assert_golden_file(
        &fixture.read_fixture("HomeAutomation", "TurnOnApplianceIntent"),
        &expected,
        "TurnOnApplianceIntent fixture",
    );

    assert_eq!(
        fixture.read_fixture("Global", "NextIntent"),
        format!("Global\tNextIntent\tNULL\t次\t{DEVICES}\r\n")
    );
    assert_eq!(
        fixture.read_fixture("Global", PHATIC_INTENT),
        format!("Global\t{PHATIC_INTENT}\tNULL\tおやすみ\t{DEVICES}\r\n")
    );
}

#[tokio::test]
async fn test_pipeline_with_forced_spanish() {
    let fixture = TestFixture::new();
    let export = fixture.create_export(
        "es/export.json",
        &[export_item(
            "HomeAutomation",
            "TurnOffApplianceIntent",
            "Apaga la luz",
            &[("ActionTrigger", &["Apaga"][..]), ("DeviceType", &["luz"][..]), ("Appliance", &["luz"][..])],
        )],
    );

    let loader = InterpretationLoader::new(LoaderConfig {
        lang: Some("es".to_string()),
        fail_fast: true,
    });
    let records = loader.load(&export).await.expect("Loading should succeed");
    let stats = process_records(
        &records,
        &AnnotationDispatcher::default(),
        &writer_for(&fixture),
        true,
        &ProgressBar::hidden(),
    )
    .await
    .expect("Batch should succeed");

    assert_eq!(stats.rows_written, 1);
    assert_eq!(
        fixture.read_fixture("HomeAutomation", "TurnOffApplianceIntent"),
        format!("HomeAutomation\tTurnOffApplianceIntent\tActionTrigger,DeviceType\tApaga|ActionTrigger la luz|DeviceType\t{DEVICES}\r\n")
    );
}

#[tokio::test]
async fn test_pipeline_skips_unsupported_language() {
    let fixture = TestFixture::new();
    let export = fixture.create_export(
        "export.json",
        &[
            export_item("Global", "HelpIntent", "help please", &[]),
            export_item("Global", "StopIntent", "止め て", &[]),
        ],
    );

    let records = InterpretationLoader::new(LoaderConfig::default())
        .load(&export)
        .await
        .expect("Loading should succeed");
    let stats = process_records(
        &records,
        &AnnotationDispatcher::default(),
        &writer_for(&fixture),
        false,
        &ProgressBar::hidden(),
    )
    .await
    .expect("Batch should continue past unsupported records");

    assert_eq!(stats.records_skipped, 1);
    assert_eq!(stats.rows_written, 1);
    assert!(stats.failures[0].error.contains("language not supported: en"));
    assert!(!fixture.fixture_exists("Global", "HelpIntent"));
    assert!(fixture.fixture_exists("Global", "StopIntent"));
}

#[tokio::test]
async fn test_pipeline_malformed_export_yields_no_records() {
    let fixture = TestFixture::new();
    let export = fixture.root_path.join("broken.json");
    std::fs::write(&export, "[{\"utteranceText\": ").expect("Failed to write export");

    let records = InterpretationLoader::new(LoaderConfig::default())
        .load(&export)
        .await
        .expect("Malformed input is reported, not fatal");
    assert!(records.is_empty());

    let strict = InterpretationLoader::new(LoaderConfig {
        fail_fast: true,
        ..Default::default()
    });
    assert!(strict.load(&export).await.is_err());
}
