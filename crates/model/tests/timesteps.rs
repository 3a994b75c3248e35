//! Timestep lookups from `timesteps.out` and from `input.txt`

use artistools_model::{
    get_time_range, get_timestep_of_timedays, get_timestep_time, get_timestep_times,
    get_timestep_times_float, TimeLoc, TimeSelection, TimestepTimes,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const TIMESTEPS_OUT: &str = "\
#timestep tstart_days twidth_days tmid_days
0 1.0 1.0 1.5
1 2.0 2.0 3.0
2 4.0 4.0 6.0
3 8.0 8.0 12.0
";

#[fixture]
fn modeldir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("timesteps.out"), TIMESTEPS_OUT).unwrap();
    dir
}

#[fixture]
fn logmodeldir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let input = "1234\n4\n0 3\n1.0 16.0\n0.3 0.001\n80\n3.0 180.0\n1\n";
    std::fs::write(dir.path().join("input.txt"), input).unwrap();
    dir
}

#[rstest]
#[case(1.0, Some(0))]
#[case(1.999, Some(0))]
#[case(2.0, Some(1))]
#[case(7.5, Some(2))]
#[case(15.99, Some(3))]
#[case(16.0, None)]
#[case(0.5, None)]
fn timestep_brackets_time(modeldir: TempDir, #[case] days: f64, #[case] expected: Option<usize>) {
    let found = get_timestep_of_timedays(modeldir.path(), &days.to_string()).ok();
    assert_eq!(found, expected);
}

#[rstest]
#[case(1.0, Some(0))]
#[case(9.0, Some(0))]
#[case(11.0, Some(1))]
#[case(99.0, Some(1))]
#[case(150.0, None)]
#[case(0.5, None)]
fn logarithmic_times_away_from_edges(#[case] days: f64, #[case] expected: Option<usize>) {
    let times = TimestepTimes::logarithmic(1.0, 100.0, 2);
    assert_eq!(times.timestep_of_timedays(days).ok(), expected);
}

#[rstest]
fn every_time_has_a_unique_timestep(#[values(1, 5, 40, 100)] ntstep: usize) {
    let times = TimestepTimes::logarithmic(2.0, 120.0, ntstep);
    for i in 0..200 {
        let t = 2.0 + (120.0 - 2.0) * i as f64 / 200.0;
        let ts = times.timestep_of_timedays(t).unwrap();
        assert!(times.tstarts[ts] <= t && t < times.tends[ts] + 1e-9);
        let matches = (0..ntstep)
            .filter(|&j| times.tstarts[j] <= t && t < times.tstarts.get(j + 1).copied().unwrap_or(times.tends[j]))
            .count();
        assert_eq!(matches, 1);
    }
    assert!(times.timestep_of_timedays(1.999).is_err());
    assert!(times.timestep_of_timedays(120.0 * (1.0 + 1e-9)).is_err());
}

#[rstest]
fn times_from_file(modeldir: TempDir) {
    let path = modeldir.path();
    assert_eq!(
        get_timestep_times_float(path, TimeLoc::End).unwrap(),
        vec![2.0, 4.0, 8.0, 16.0]
    );
    assert_eq!(get_timestep_time(path, 2).unwrap(), 6.0);
    assert!(get_timestep_time(path, 4).is_err());

    // no spectrum in the folder, so the midpoints are formatted
    assert_eq!(
        get_timestep_times(path).unwrap(),
        vec!["1.500", "3.000", "6.000", "12.000"]
    );
}

#[rstest]
fn times_from_input_parameters(logmodeldir: TempDir) {
    let tstarts = get_timestep_times_float(logmodeldir.path(), TimeLoc::Start).unwrap();
    let expected = [1.0, 2.0, 4.0, 8.0];
    for (t, e) in tstarts.iter().zip(expected) {
        assert!((t - e).abs() < 1e-9);
    }
}

#[rstest]
#[case(TimeSelection { timestep_range: Some("1-2".into()), ..Default::default() }, 1, 2)]
#[case(TimeSelection { timedays_range: Some("2-7".into()), ..Default::default() }, 1, 2)]
#[case(TimeSelection { timemin: Some(5.0), timemax: Some(20.0), ..Default::default() }, 2, 3)]
#[case(TimeSelection { timedays_range: Some("9d".into()), ..Default::default() }, 3, 3)]
fn time_range_selection(
    modeldir: TempDir,
    #[case] selection: TimeSelection,
    #[case] timestepmin: i64,
    #[case] timestepmax: i64,
) {
    let range = get_time_range(modeldir.path(), &selection).unwrap();
    assert_eq!((range.timestepmin, range.timestepmax), (timestepmin, timestepmax));
    assert!(!range.is_outside());
}

#[rstest]
fn time_range_outside_simulation(modeldir: TempDir) {
    let selection = TimeSelection {
        timemin: Some(100.0),
        timemax: Some(200.0),
        ..Default::default()
    };
    let range = get_time_range(modeldir.path(), &selection).unwrap();
    assert!(range.is_outside());
    assert!(range.timesteps().is_empty());
    assert_eq!(range.time_days_lower, Some(100.0));
}
