//! Reading per-rank outputs from a temporary two rank model

use std::path::Path;

use artistools_estimators::{
    exportmassfractions, get_cell_estimators, macroatom, nltepops, nonthermal, read_estimators,
    Error,
};
use artistools_utils::Config;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const ESTIMATORS_RANK0: &str = "\
timestep 0 modelgridindex 0 titeration 0 TR 8000.0 Te 7000.0 W 0.3 nne 2e8
populations Z=8 1: 4.0e6 SUM: 4.0e6
populations Z=26 1: 1.0e5 2: 9.0e5 SUM: 1.0e6

timestep 1 modelgridindex 0 titeration 0 TR 7000.0 Te 6000.0 W 0.2 nne 1e8
populations Z=8 1: 2.0e6 SUM: 2.0e6
populations Z=26 2: 1.0e6 SUM: 1.0e6
heating: ff 1e-10 dep 4e-10 heating_dep/total_dep 0.8
";

const ESTIMATORS_RANK1: &str = "\
timestep 0 modelgridindex 1 EMPTYCELL

timestep 1 modelgridindex 1 EMPTYCELL
";

const NLTE_RANK0: &str = "\
timestep modelgridindex Z ion_stage level energy_ev n_LTE n_NLTE ion_popfrac
0 0 26 2 0 0.0 1e5 2e5 0.9
1 0 26 2 0 0.0 1e5 3e5 0.9
1 0 26 2 1 0.05 8e4 5e4 0.9
";

const NONTHERMAL_RANK0: &str = "\
timestep modelgridindex index energy_ev source y
1 0 0 1.0 0 1e10
1 0 1 10.0 0 5e9
0 0 0 1.0 0 2e10
";

const COMPOSITION: &str = "\
2
0
0
8 1 1 1 -1 0.0 16.0
26 3 1 3 -1 0.0 56.0
";

fn input_txt(nprocs: usize) -> String {
    let mut lines = vec!["0"; 21];
    let nprocs_line = format!("{nprocs} # nprocs");
    lines.push(&nprocs_line);
    lines.join("\n")
}

#[fixture]
fn modeldir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, text: &str| std::fs::write(dir.path().join(name), text).unwrap();
    write("model.txt", "2\n");
    write("input.txt", &input_txt(2));
    write("timesteps.out", "#timestep tstart_days twidth_days tmid_days\n0 10 2 11\n1 12 2 13\n");
    write("compositiondata.txt", COMPOSITION);
    write("estimators_0000.out", ESTIMATORS_RANK0);
    write("estimators_0001.out", ESTIMATORS_RANK1);
    write("nlte_0000.out", NLTE_RANK0);
    write("nonthermalspec_0000.out", NONTHERMAL_RANK0);
    dir
}

fn config() -> Config {
    Config {
        num_processes: 2,
        enable_diskcache: false,
        ..Default::default()
    }
}

#[rstest]
fn all_estimators(modeldir: TempDir) {
    let estimators = read_estimators(modeldir.path(), &[], &[], &config()).unwrap();
    assert_eq!(estimators.len(), 4);

    let cell = get_cell_estimators(&estimators, 1, 0).unwrap();
    assert_eq!(cell.get("TR"), Some(7000.0));
    assert_eq!(cell.tdays, Some(13.0));
    assert!((cell.get("total_dep").unwrap() - 5e-10).abs() < 1e-20);
    assert_eq!(cell.total_population(), Some(3.0e6));

    match get_cell_estimators(&estimators, 1, 1) {
        Err(Error::EmptyCell { modelgridindex, .. }) => assert_eq!(modelgridindex, 1),
        other => panic!("expected an empty cell, got {other:?}"),
    }
}

#[rstest]
#[case(&[1], &[0], 1)]
#[case(&[0, 1], &[0], 2)]
#[case(&[1], &[-1], 2)]
#[case(&[], &[1], 2)]
fn selected_estimators(
    modeldir: TempDir,
    #[case] timesteps: &[usize],
    #[case] cells: &[i64],
    #[case] expected: usize,
) {
    let estimators = read_estimators(modeldir.path(), timesteps, cells, &config()).unwrap();
    assert_eq!(estimators.len(), expected);
}

#[rstest]
fn cached_estimators_match(modeldir: TempDir) {
    let cached = Config {
        enable_diskcache: true,
        ..config()
    };
    let first = read_estimators(modeldir.path(), &[1], &[0], &cached).unwrap();
    let second = read_estimators(modeldir.path(), &[1], &[0], &cached).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn nlte_populations(modeldir: TempDir) {
    let pops = nltepops::read_files(modeldir.path(), Some(1), Some(0), &config()).unwrap();
    assert_eq!(pops.len(), 2);
    assert!(pops.iter().all(|p| p.timestep == 1));

    let ionpops = nltepops::ion_populations(&pops);
    assert_eq!(ionpops[&(26, 2)], 3.5e5);

    let all = nltepops::read_files(modeldir.path(), None, None, &config()).unwrap();
    assert_eq!(all.len(), 3);
}

#[rstest]
fn nonthermal_spectrum(modeldir: TempDir) {
    let spectrum = nonthermal::read_files(modeldir.path(), Some(1), Some(0)).unwrap();
    assert_eq!(spectrum.column("energy_ev").unwrap(), vec![1.0, 10.0]);
}

#[rstest]
fn macroatom_without_files(modeldir: TempDir) {
    let files = macroatom::find_macroatom_files(modeldir.path()).unwrap();
    assert!(files.is_empty());
}

#[rstest]
fn mass_fractions_file(modeldir: TempDir) {
    let outputpath = modeldir.path().join("massfracs.txt");
    exportmassfractions(modeldir.path(), 1, &[0], &outputpath, &config()).unwrap();

    let text = std::fs::read_to_string(Path::new(&outputpath)).unwrap();
    let lines = text.lines().collect::<Vec<&str>>();
    assert_eq!(lines[0], "13.0d shell 0");
    assert_eq!(lines[1], "8 O 0.36363636363636365");
    assert!(lines[2].starts_with("26 Fe 0.636363"));
}

#[rstest]
fn empty_cells_cannot_be_exported(modeldir: TempDir) {
    let outputpath = modeldir.path().join("massfracs.txt");
    assert!(exportmassfractions(modeldir.path(), 1, &[1], &outputpath, &config()).is_err());
}
