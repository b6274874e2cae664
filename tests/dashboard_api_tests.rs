use chrono::{DateTime, TimeZone, Utc};
use progress_charts::ChartError;
use progress_charts::aggregate::{MAX_RECENT_DAYS, ZeroReceivedRatio};
use progress_charts::api::{
    ChartPanel, DASHBOARD_FRAME_JSON_SCHEMA_V1, DashboardConfig, DashboardFrame,
    DashboardSnapshot, build_dashboard_in,
};
use progress_charts::chart::MIN_RADAR_CATEGORIES;
use progress_charts::core::{PlotMargins, Viewport};
use progress_charts::model::{DashboardInput, ObjectInfo, Record, ResultRecord, TransactionKind};

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0)
        .single()
        .expect("valid instant")
}

fn xp(amount: f64, created_at: DateTime<Utc>, project: &str) -> Record {
    Record::new(amount, created_at).with_object(ObjectInfo::new(1, project, "project"))
}

fn sample_input() -> DashboardInput {
    let records = vec![
        xp(1_000.0, at(1, 1), "go-reloaded"),
        xp(2_500.0, at(1, 15), "ascii-art"),
        xp(500.0, at(2, 3), "go-reloaded"),
        Record::new(800.0, at(1, 10)).with_kind(TransactionKind::Up),
        Record::new(400.0, at(2, 10)).with_kind(TransactionKind::Down),
        Record::new(20.0, at(1, 2)).with_kind(TransactionKind::Skill("go".to_owned())),
        Record::new(35.0, at(1, 3)).with_kind(TransactionKind::Skill("go".to_owned())),
        Record::new(15.0, at(1, 4)).with_kind(TransactionKind::Skill("js".to_owned())),
        Record::new(25.0, at(1, 5)).with_kind(TransactionKind::Skill("algo".to_owned())),
    ];
    let results = vec![
        ResultRecord::new(1.0, at(1, 2)),
        ResultRecord::new(0.0, at(1, 3)),
        ResultRecord::new(1.0, at(1, 4)),
    ];
    DashboardInput::from_records(records, results)
}

#[test]
fn default_config_is_valid_and_round_trips() {
    let config = DashboardConfig::default().validate().expect("valid config");
    let json = config.to_json_pretty().expect("serialize config");
    let parsed = DashboardConfig::from_json_str(&json).expect("parse config");
    assert_eq!(parsed, config);
}

#[test]
fn partial_config_json_fills_defaults() {
    let config = DashboardConfig::from_json_str(r#"{"max_bars": 4}"#).expect("parse config");
    assert_eq!(config.max_bars, 4);
    assert_eq!(config.viewport, Viewport::default());
    assert_eq!(config.zero_received_ratio, ZeroReceivedRatio::Fixed(1.0));
}

#[test]
fn config_validation_rejects_unusable_layouts() {
    let zero_bars = DashboardConfig::default().with_max_bars(0);
    assert!(zero_bars.validate().is_err());

    let empty_viewport = DashboardConfig::new(Viewport::new(0, 300));
    assert!(matches!(
        empty_viewport.validate(),
        Err(ChartError::InvalidViewport { .. })
    ));

    let crowded = DashboardConfig::new(Viewport::new(100, 100))
        .with_margins(PlotMargins::new(60.0, 60.0, 0.0, 0.0));
    assert!(crowded.validate().is_err());

    let solid_donut = DashboardConfig::default().with_donut_inner_radius_ratio(1.0);
    assert!(solid_donut.validate().is_err());

    let bad_policy =
        DashboardConfig::default().with_zero_received_ratio(ZeroReceivedRatio::ScaledDone(0.0));
    assert!(bad_policy.validate().is_err());
}

#[test]
fn config_validation_bounds_the_recent_window() {
    let oversized = DashboardConfig::default().with_recent_days(20_000_000);
    assert!(matches!(oversized.validate(), Err(ChartError::InvalidData(_))));

    let longest = DashboardConfig::default().with_recent_days(MAX_RECENT_DAYS);
    assert!(longest.validate().is_ok());

    assert!(DashboardConfig::from_json_str(r#"{"recent_days": 100000}"#).is_err());
}

#[test]
fn snapshot_aggregates_every_series() {
    let config = DashboardConfig::default().with_recent_days(7);
    let snapshot = DashboardSnapshot::build_in(&sample_input(), &config, at(2, 5), &Utc);

    assert_eq!(snapshot.xp_total, 4_000.0);
    assert_eq!(snapshot.xp_by_date.len(), 3);
    assert_eq!(snapshot.xp_by_project[0].category, "ascii-art");
    assert_eq!(snapshot.recent_activity.len(), 7);
    assert_eq!(snapshot.recent_activity_total(), 500.0);
    assert_eq!(snapshot.audit.ratio, 2.0);
    assert_eq!(snapshot.pass_rate.passed, 2);

    let go = snapshot
        .skills
        .iter()
        .find(|skill| skill.category == "go")
        .expect("go skill");
    assert_eq!(go.amount, 35.0);
    assert_eq!(snapshot.skills.len(), 3);
}

#[test]
fn frame_marks_every_panel_ready_for_rich_input() {
    let config = DashboardConfig::default();
    let frame = build_dashboard_in(&sample_input(), &config, at(2, 5), &Utc).expect("frame");

    assert_eq!(frame.ready_panel_count(), 7);

    let progress = frame.xp_progress.chart().expect("progress chart");
    assert_eq!(progress.points.len(), 3);
    assert!(progress.path.starts_with("M "));
    let plot = frame.plot_area;
    assert_eq!(progress.points[0].x, plot.left);
    assert_eq!(progress.points[2].x, plot.right);
    assert!(progress.points.windows(2).all(|pair| pair[1].y <= pair[0].y));
    assert!(progress.x_ticks.len() >= 2);

    let bars = frame.xp_by_project.chart().expect("bar chart");
    assert_eq!(bars.bars.len(), 2);
    assert_eq!(bars.hidden_count, 0);

    let pass = frame.pass_rate.chart().expect("pass donut");
    assert_eq!(pass.segments.len(), 2);
    assert_eq!(pass.paths.len(), 2);
    assert_eq!(pass.caption, "66.7%");

    let balance = frame.audit_balance.chart().expect("audit donut");
    assert_eq!(balance.caption, "2.0");

    let radar = frame.skills.chart().expect("radar chart");
    assert_eq!(radar.points.len(), 3);
    assert_eq!(radar.spokes.len(), 3);
    assert!(radar.path.ends_with(" Z"));
}

#[test]
fn sparse_input_reports_missing_panels() {
    let records = vec![
        xp(100.0, at(1, 1), "solo"),
        Record::new(5.0, at(1, 2)).with_kind(TransactionKind::Skill("go".to_owned())),
    ];
    let input = DashboardInput::from_records(records, Vec::new());

    let frame = build_dashboard_in(&input, &DashboardConfig::default(), at(3, 1), &Utc)
        .expect("frame");

    assert_eq!(
        frame.xp_progress,
        ChartPanel::NotEnoughData {
            required: 2,
            available: 1
        }
    );
    assert_eq!(frame.recent_activity, ChartPanel::NoData);
    assert!(frame.xp_by_project.is_ready());
    assert_eq!(frame.audit_history, ChartPanel::NoData);
    assert_eq!(frame.audit_balance, ChartPanel::NoData);
    assert_eq!(frame.pass_rate, ChartPanel::NoData);
    assert_eq!(
        frame.skills,
        ChartPanel::NotEnoughData {
            required: MIN_RADAR_CATEGORIES,
            available: 1
        }
    );
}

#[test]
fn empty_input_builds_an_all_empty_frame() {
    let frame = build_dashboard_in(
        &DashboardInput::default(),
        &DashboardConfig::default(),
        at(3, 1),
        &Utc,
    )
    .expect("frame");
    assert_eq!(frame.ready_panel_count(), 0);
}

#[test]
fn invalid_config_fails_frame_build() {
    let config = DashboardConfig::default().with_axis_tick_spacing_px(0.0);
    let err = build_dashboard_in(&sample_input(), &config, at(2, 5), &Utc)
        .expect_err("must reject config");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn frame_json_contract_round_trips() {
    let config = DashboardConfig::default();
    let frame = build_dashboard_in(&sample_input(), &config, at(2, 5), &Utc).expect("frame");

    let contract = frame.to_json_contract_v1_pretty().expect("serialize contract");
    let value: serde_json::Value = serde_json::from_str(&contract).expect("json value");
    assert_eq!(value["schema_version"], DASHBOARD_FRAME_JSON_SCHEMA_V1);
    assert_eq!(value["frame"]["pass_rate"]["status"], "ready");

    let restored = DashboardFrame::from_json_compat_str(&contract).expect("parse contract");
    assert_eq!(restored, frame);

    let bare = frame.to_json_pretty().expect("serialize frame");
    let restored_bare = DashboardFrame::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(restored_bare, frame);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let frame = build_dashboard_in(&sample_input(), &DashboardConfig::default(), at(2, 5), &Utc)
        .expect("frame");
    let contract = frame
        .to_json_contract_v1_pretty()
        .expect("serialize contract")
        .replacen("\"schema_version\": 1", "\"schema_version\": 99", 1);

    let err = DashboardFrame::from_json_compat_str(&contract).expect_err("must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn snapshot_json_contract_round_trips() {
    let snapshot = DashboardSnapshot::build_in(
        &sample_input(),
        &DashboardConfig::default(),
        at(2, 5),
        &Utc,
    );
    let contract = snapshot.to_json_contract_v1_pretty().expect("serialize");
    let restored = DashboardSnapshot::from_json_compat_str(&contract).expect("parse");
    assert_eq!(restored, snapshot);
}
