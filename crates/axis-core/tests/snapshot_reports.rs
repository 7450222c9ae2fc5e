use axis_core::angle::AngleUnit;
use axis_core::preferences::InMemoryPreferences;
use axis_core::service::{TrigReport, TrigRequest, TrigService};
use axis_core::trig::TrigFunction;
use insta::assert_snapshot;
use serde_json::json;
use std::sync::Arc;

async fn answer(raw: &str, function: Option<TrigFunction>) -> TrigReport {
    let service = TrigService::new(Arc::new(InMemoryPreferences::new()), AngleUnit::Degrees);
    service
        .answer(TrigRequest {
            raw_angle: raw.to_string(),
            function,
            user_id: 1,
        })
        .await
        .expect("angle parses")
}

#[tokio::test]
async fn test_single_function_report_snapshot() {
    let report = answer("30", Some(TrigFunction::Sine)).await;
    assert_snapshot!(report.to_plain_text(), @r"
    sin(30°)
    sin = 1/2 ≈ 0.500000
    angle 30° in Q1, reference 30°, shown in degrees
    ");
}

#[tokio::test]
async fn test_vertical_angle_report_snapshot() {
    let report = answer("-pi/2", None).await;
    assert_snapshot!(report.to_plain_text(), @r"
    -pi/2
    sin = -1 ≈ -1.000000
    cos = 0 ≈ 0.000000
    tan = undefined
    angle 270° in Q4, reference 0°, shown in radians
    ");
}

#[tokio::test]
async fn test_non_standard_angle_report_snapshot() {
    let report = answer("10", Some(TrigFunction::Cosine)).await;
    assert_snapshot!(report.to_plain_text(), @r"
    cos(10°)
    cos ≈ 0.984808
    angle 10° in Q1, reference 10°, shown in degrees
    ");
}

#[tokio::test]
async fn test_numeric_values_serialize_tagged() {
    let report = answer("90", None).await;
    let values = serde_json::to_value(report.rows.iter().map(|r| r.numeric).collect::<Vec<_>>())
        .expect("serializable");
    assert_eq!(
        values,
        json!([
            { "kind": "value", "value": 1.0 },
            { "kind": "value", "value": 0.0 },
            { "kind": "undefined" }
        ])
    );
}
