use chrono::NaiveDate;
use retro_poster::labels::{LabelConfig, LabelPlacer, collides};
use retro_poster::models::{LabelCandidate, Series};
use retro_poster::scale::{LinearScale, TimeScale};
use retro_poster::stack::StackBuilder;
use retro_poster::viz::StreamLayout;
use retro_poster::PosterConfig;

fn cand(key: &str, x: f64, y: f64, prominence: f64, order: usize) -> LabelCandidate {
    LabelCandidate {
        key: key.into(),
        x,
        y,
        prominence,
        month: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        order,
    }
}

fn keys(placed: &[retro_poster::PlacedLabel]) -> Vec<&str> {
    placed.iter().map(|p| p.key.as_str()).collect()
}

fn candidates_for(series: &Series, placer: &LabelPlacer) -> Vec<LabelCandidate> {
    let bands = StackBuilder::streamgraph().build(series);
    let lo = bands.iter().flat_map(|b| b.points.iter().map(|p| p.0));
    let hi = bands.iter().flat_map(|b| b.points.iter().map(|p| p.1));
    let value_scale = LinearScale::new(
        (LinearScale::extent(lo).0, LinearScale::extent(hi).1),
        (350.0, 2900.0),
    );
    let time_scale = TimeScale::from_extent(series.months(), (150.0, 3920.0));
    placer.candidates(&bands, series.months(), &value_scale, &time_scale)
}

#[test]
fn thin_band_is_labeled_or_dropped_deterministically() {
    let series = Series::from_columns(
        &["2020-01", "2020-02", "2020-03"],
        &[("A", &[10.0, 10.0, 10.0]), ("B", &[1.0, 0.0, 1.0])],
    )
    .unwrap();
    let placer = LabelPlacer::default();
    let cands = candidates_for(&series, &placer);

    assert_eq!(cands.len(), 2);
    assert_eq!(cands[0].key, "A");
    assert_eq!(cands[0].prominence, 10.0);
    assert_eq!(cands[1].key, "B");
    assert_eq!(cands[1].prominence, 1.0);
    // ties on thickness resolve to the earliest month
    let jan = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    assert!(cands.iter().all(|c| c.month == jan));

    let forward = placer.place(cands.clone());
    let mut reversed = cands.clone();
    reversed.reverse();
    assert_eq!(forward, placer.place(reversed));

    let strict = LabelPlacer::new(LabelConfig {
        min_prominence: 1.5,
        ..LabelConfig::default()
    });
    let placed = strict.place(cands);
    assert_eq!(keys(&placed), vec!["A"]);
}

#[test]
fn equal_prominence_ties_break_by_input_order() {
    let placer = LabelPlacer::default();
    // second entity sits higher on screen; input order must still win
    let first = cand("first", 500.0, 900.0, 4.0, 0);
    let second = cand("second", 520.0, 880.0, 4.0, 1);
    let placed = placer.place(vec![second.clone(), first.clone()]);
    assert_eq!(keys(&placed), vec!["first"]);

    let placed = placer.place(vec![first, second]);
    assert_eq!(keys(&placed), vec!["first"]);
}

#[test]
fn all_zero_entity_gets_no_candidate() {
    let series = Series::from_columns(
        &["2020-01", "2020-02"],
        &[("busy", &[3.0, 4.0]), ("idle", &[0.0, 0.0])],
    )
    .unwrap();
    let cands = candidates_for(&series, &LabelPlacer::default());
    assert_eq!(cands.len(), 1);
    assert_eq!(cands[0].key, "busy");
}

#[test]
fn below_threshold_is_never_placed() {
    let placer = LabelPlacer::default();
    let placed = placer.place(vec![cand("tiny", 0.0, 0.0, 0.49, 0), cand("ok", 1000.0, 0.0, 0.5, 1)]);
    assert_eq!(keys(&placed), vec!["ok"]);
}

#[test]
fn rejected_labels_do_not_block_later_ones() {
    let placer = LabelPlacer::default();
    let placed = placer.place(vec![
        cand("big", 0.0, 0.0, 10.0, 0),
        cand("mid", 50.0, 0.0, 5.0, 1),
        cand("small", 120.0, 0.0, 1.0, 2),
    ]);
    // "mid" collides with "big"; "small" only collides with the rejected "mid"
    assert_eq!(keys(&placed), vec!["big", "small"]);
}

#[test]
fn placed_labels_never_collide() {
    let placer = LabelPlacer::default();
    let mut cands = Vec::new();
    for i in 0..12 {
        for j in 0..12 {
            let order = i * 12 + j;
            let prominence = 1.0 + ((order * 37) % 11) as f64;
            cands.push(cand(&format!("r{order}"), i as f64 * 45.0, j as f64 * 35.0, prominence, order));
        }
    }
    let placed = placer.place(cands);
    assert!(!placed.is_empty());
    for (a, pa) in placed.iter().enumerate() {
        for pb in &placed[a + 1..] {
            assert!(
                !collides(pa, pb, placer.config()),
                "{} overlaps {}",
                pa.key,
                pb.key
            );
        }
    }
}

#[test]
fn layout_labels_sit_on_their_bands() {
    let months = ["2019-01", "2019-02", "2019-03", "2019-04", "2019-05", "2019-06"];
    let series = Series::from_columns(
        &months,
        &[
            ("production", &[40.0, 55.0, 30.0, 20.0, 10.0, 5.0]),
            ("shared", &[2.0, 3.0, 8.0, 1.0, 0.0, 0.0]),
            ("python-lib", &[0.0, 0.0, 10.0, 30.0, 45.0, 50.0]),
            ("notes", &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        ],
    )
    .unwrap();
    let config = PosterConfig::default();
    let layout = StreamLayout::compute(&series, &config);

    assert_eq!(layout.bands.len(), 4);
    assert!(layout.labels.iter().all(|l| l.key != "notes"));
    assert!(layout.labels.iter().any(|l| l.key == "production"));
    let (x0, x1) = config.stream_x_range();
    let (y0, y1) = config.stream_y_range();
    for label in &layout.labels {
        assert!(label.x >= x0 - 1e-6 && label.x <= x1 + 1e-6, "{}", label.key);
        assert!(label.y >= y0 - 1e-6 && label.y <= y1 + 1e-6, "{}", label.key);
    }
}
