use retro_poster::models::Series;
use retro_poster::stack::{StackBuilder, StackOffset, StackOrder};

const MONTHS: [&str; 5] = ["2020-01", "2020-02", "2020-03", "2020-04", "2020-05"];

fn sample() -> Series {
    Series::from_columns(
        &MONTHS,
        &[
            ("alpha", &[5.0, 8.0, 2.0, 0.0, 4.0]),
            ("beta", &[1.0, 0.0, 6.0, 9.0, 3.0]),
            ("gamma", &[0.0, 0.0, 0.0, 0.0, 0.0]),
            ("delta", &[2.5, 2.5, 7.0, 1.0, 0.5]),
        ],
    )
    .unwrap()
}

#[test]
fn bands_tile_one_contiguous_interval() {
    let series = sample();
    let mut bands = StackBuilder::streamgraph().build(&series);
    bands.sort_by_key(|b| b.index);

    for t in 0..series.len() {
        for pair in bands.windows(2) {
            assert_eq!(
                pair[0].points[t].1, pair[1].points[t].0,
                "gap between '{}' and '{}' at t={t}",
                pair[0].key, pair[1].key
            );
        }
    }
}

#[test]
fn thickness_equals_raw_value() {
    let series = sample();
    let bands = StackBuilder::streamgraph().build(&series);
    assert_eq!(bands.len(), series.keys().len());

    for (e, band) in bands.iter().enumerate() {
        assert_eq!(band.key, series.keys()[e]);
        for t in 0..series.len() {
            let diff = (band.thickness(t) - series.value(t, e)).abs();
            assert!(diff < 1e-9, "{} at t={t}: off by {diff}", band.key);
        }
    }
}

#[test]
fn all_zero_entity_is_degenerate_but_present() {
    let bands = StackBuilder::streamgraph().build(&sample());
    let gamma = bands.iter().find(|b| b.key == "gamma").unwrap();
    assert!(gamma.is_degenerate());
    assert_eq!(gamma.max_thickness(), 0.0);
    assert!(gamma.points.iter().all(|(lo, hi)| lo == hi));
}

#[test]
fn heaviest_entity_sits_next_to_the_centre() {
    let series = Series::from_columns(
        &["2020-01"],
        &[
            ("a", &[5.0]),
            ("b", &[4.0]),
            ("c", &[3.0]),
            ("d", &[2.0]),
            ("e", &[1.0]),
        ],
    )
    .unwrap();
    let builder = StackBuilder::new(StackOrder::InsideOut, StackOffset::Zero);
    assert_eq!(builder.stack_order(&series), vec![4, 3, 0, 1, 2]);

    let bands = builder.build(&series);
    let indices: Vec<usize> = bands.iter().map(|b| b.index).collect();
    assert_eq!(indices, vec![2, 3, 4, 1, 0]);
}

#[test]
fn input_order_with_zero_offset_starts_at_zero() {
    let series = sample();
    let bands = StackBuilder::new(StackOrder::Input, StackOffset::Zero).build(&series);
    assert_eq!(bands[0].index, 0);
    for t in 0..series.len() {
        assert_eq!(bands[0].points[t].0, 0.0);
        let top = bands.last().unwrap().points[t].1;
        assert!((top - series.row_total(t)).abs() < 1e-9);
    }
}

#[test]
fn wiggle_starts_at_zero_and_moves_against_growth() {
    let series = Series::from_columns(&["2020-01", "2020-02"], &[("a", &[1.0, 3.0])]).unwrap();
    let bands = StackBuilder::streamgraph().build(&series);
    assert_eq!(bands[0].points[0], (0.0, 1.0));
    assert_eq!(bands[0].points[1], (-1.0, 2.0));
}

#[test]
fn permuting_input_keys_keeps_each_band() {
    let alpha = [5.0, 8.0, 2.0, 0.0, 4.0];
    let beta = [1.0, 0.0, 6.0, 9.0, 3.0];
    let delta = [2.5, 2.5, 7.0, 1.0, 0.5];
    let series =
        Series::from_columns(&MONTHS, &[("alpha", &alpha), ("delta", &delta), ("beta", &beta)])
            .unwrap();
    let shuffled =
        Series::from_columns(&MONTHS, &[("delta", &delta), ("alpha", &alpha), ("beta", &beta)])
            .unwrap();

    let builder = StackBuilder::streamgraph();
    let a = builder.build(&series);
    let b = builder.build(&shuffled);
    for band in &a {
        let other = b.iter().find(|o| o.key == band.key).unwrap();
        assert_eq!(band.index, other.index, "{}", band.key);
        for (p, q) in band.points.iter().zip(&other.points) {
            assert!((p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9);
        }
    }
}
