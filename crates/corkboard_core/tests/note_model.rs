use corkboard_core::model::rich_text::TextRange;
use corkboard_core::{
    BoardEvent, InteractionConfig, InteractionConfigError, Mark, Note, NoteDraft, Point,
    RichText, StyleType,
};
use serde_json::json;
use uuid::Uuid;

#[test]
fn note_serializes_with_snake_case_fields() {
    let id = Uuid::new_v4();
    let note = Note {
        id,
        position: Point::new(12.5, 40.0),
        rotation: -1.25,
        shadow_depth: 4,
        z_index: 9,
        color: "#ffd1dc".to_string(),
        style_type: StyleType::Lined,
        title: "Groceries".to_string(),
        photo: Some("https://example.test/p.png".to_string()),
        caption: "milk".to_string(),
        rich_content: Some(RichText::plain("eggs")),
        rich_text_enabled: true,
    };

    let value = serde_json::to_value(&note).expect("note should serialize");
    assert_eq!(value["id"], json!(id.to_string()));
    assert_eq!(value["position"], json!({ "x": 12.5, "y": 40.0 }));
    assert_eq!(value["shadow_depth"], json!(4));
    assert_eq!(value["z_index"], json!(9));
    assert_eq!(value["style_type"], json!("lined"));
    assert_eq!(value["rich_content"]["text"], json!("eggs"));
    assert_eq!(value["rich_text_enabled"], json!(true));

    let back: Note = serde_json::from_value(value).expect("note should deserialize");
    assert_eq!(back, note);
}

#[test]
fn capability_defaults_to_enabled_when_missing() {
    let value = json!({
        "id": Uuid::new_v4().to_string(),
        "position": { "x": 0.0, "y": 0.0 },
        "rotation": 0.0,
        "shadow_depth": 2,
        "z_index": 1,
        "color": "#fff59d",
        "style_type": "plain",
        "title": "t",
        "photo": null,
        "caption": "",
        "rich_content": null
    });
    let note: Note = serde_json::from_value(value).expect("legacy note should deserialize");
    assert!(note.supports_rich_text());
}

#[test]
fn stored_rich_content_is_normalized_on_load() {
    let value = json!({
        "text": "hello",
        "spans": [
            { "mark": "bold", "start": 0, "end": 2 },
            { "mark": "bold", "start": 2, "end": 3 },
            { "mark": "italic", "start": 4, "end": 99 }
        ]
    });
    let content: RichText = serde_json::from_value(value).expect("content should deserialize");
    assert!(content.is_marked(Mark::Bold, TextRange::new(0, 3)));
    assert!(content.is_marked(Mark::Italic, TextRange::new(4, 5)));
    assert_eq!(content.spans().len(), 2);
}

#[test]
fn draft_fields_are_optional_except_title() {
    let draft: NoteDraft =
        serde_json::from_value(json!({ "title": "Trip" })).expect("draft should deserialize");
    assert_eq!(draft, NoteDraft::new("Trip"));
    assert_eq!(draft.resolved_color(), "#fff59d");
    assert_eq!(draft.style_type, StyleType::Plain);
}

#[test]
fn events_are_tagged_for_the_host() {
    let id = Uuid::new_v4();
    let value = serde_json::to_value(BoardEvent::NoteMoved {
        id,
        position: Point::new(1.0, 2.0),
    })
    .expect("event should serialize");
    assert_eq!(value["event"], json!("note_moved"));
    assert_eq!(value["position"]["y"], json!(2.0));

    let value = serde_json::to_value(BoardEvent::FormatApplied {
        id,
        mark: Mark::Underline,
        active: true,
    })
    .expect("event should serialize");
    assert_eq!(value["event"], json!("format_applied"));
    assert_eq!(value["mark"], json!("underline"));
}

#[test]
fn config_overrides_from_json() {
    let config = InteractionConfig::from_json_str(r#"{ "overlap_delay_ms": 1500 }"#)
        .expect("partial config should parse");
    assert_eq!(config.overlap_delay_ms, 1500);
    assert_eq!(config.affordance_delay_ms, 3000);
    assert_eq!(config.mostly_covered_ratio, 0.6);

    let err = InteractionConfig::from_json_str(r#"{ "mostly_covered_ratio": 1.5 }"#)
        .expect_err("ratio above one should fail");
    assert_eq!(err, InteractionConfigError::InvalidCoverageRatio(1.5));
}
