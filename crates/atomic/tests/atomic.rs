//! Reading the atomic data files of a model folder

use std::collections::BTreeMap;
use std::path::Path;

use artistools_atomic::{
    add_lte_pops, find_ion, generate_ion_spectrum, get_ionrecombratecalibration, get_levels,
    get_line_transitions, upper_pops_from_levels, LevelPopulation, LineSpectrumOptions,
    SUPERLEVEL,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const ADATA: &str = "\
26 2 3 16.19
1 0.0 10.0 2 'a6Dd[9/2]'
2 2.0 8.0 0 'a6Dd[7/2]'
3 2.5 6.0 0 'b4Pe[5/2]'

27 3 1 33.5
1 0.0 10.0 0 a4Fe[9/2]
";

const TRANSITIONS: &str = "\
26 2 2
1 2 0.1 -1.0 1
1 3 2.0 0.5 0

27 3 0
";

const PHIXS: &str = "\
2
0.5
27 4 1 3 1 33.5
3.0
1.5
";

const RECOMBRATES: &str = "\
26 3 2
3.0 1.0e-12 1.5e-12
3.5 0.8e-12 1.2e-12
";

#[fixture]
fn modeldir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, text: &str| std::fs::write(dir.path().join(name), text).unwrap();
    write("adata.txt", ADATA);
    write("transitiondata.txt", TRANSITIONS);
    write("phixsdata_v2.txt", PHIXS);
    write("recombrates.txt", RECOMBRATES);
    dir
}

fn population(level: i64, n_nlte: f64) -> LevelPopulation {
    LevelPopulation {
        timestep: 10,
        modelgridindex: 3,
        atomic_number: 26,
        ion_stage: 2,
        level,
        energy_ev: 0.0,
        n_lte: 0.0,
        n_nlte,
        ion_popfrac: 0.9,
        lte: BTreeMap::new(),
    }
}

#[rstest]
fn levels_with_transitions(modeldir: TempDir) {
    let ions = get_levels(modeldir.path(), &[], true, true).unwrap();
    assert_eq!(ions.len(), 2);

    let fe2 = find_ion(&ions, 26, 2).unwrap();
    assert_eq!(fe2.levels.len(), 3);
    assert_eq!(fe2.levels[2].levelname, "b4Pe[5/2]");
    assert_eq!(fe2.transitions.len(), 2);
    assert!(fe2.transitions[0].forbidden);
    assert_eq!((fe2.transitions[1].lower, fe2.transitions[1].upper), (0, 2));

    let co3 = find_ion(&ions, 27, 3).unwrap();
    assert_eq!(co3.levels[0].phixstable.len(), 2);
    let (x, sigma) = co3.levels[0].phixstable[1];
    assert_eq!(x, 1.5);
    assert!((sigma - 1.5e-18).abs() < 1e-30);
    assert!(find_ion(&ions, 28, 2).is_err());
}

#[rstest]
fn selected_ions_only(modeldir: TempDir) {
    let ions = get_levels(modeldir.path(), &[(27, 3)], true, false).unwrap();
    assert_eq!(ions.len(), 1);
    assert_eq!(ions[0].id(), (27, 3));
    assert!(ions[0].levels[0].phixstable.is_empty());
}

#[rstest]
fn missing_files_are_errors(
    modeldir: TempDir,
    #[values("adata.txt", "transitiondata.txt")] name: &str,
) {
    std::fs::remove_file(modeldir.path().join(name)).unwrap();
    assert!(get_levels(modeldir.path(), &[], true, false).is_err());
}

#[rstest]
fn recombination_rates(modeldir: TempDir) {
    let rates = get_ionrecombratecalibration(modeldir.path()).unwrap();
    let fe3 = &rates[&(26, 3)];
    assert_eq!(fe3.rrc_total, vec![1.5e-12, 1.2e-12]);
    assert!((fe3.t_e[0] - 1000.0).abs() < 1e-9);
}

#[rstest]
fn lte_columns_for_nlte_populations(modeldir: TempDir) {
    let ions = get_levels(modeldir.path(), &[(26, 2)], false, false).unwrap();
    let mut pops = vec![population(0, 1.0), population(1, 1e-3), population(SUPERLEVEL, 1e-5)];

    add_lte_pops(&ions, &mut pops, &[("n_LTE_T_e", 5000.0), ("n_LTE_T_R", 8000.0)], None).unwrap();

    assert_eq!(pops[0].lte["n_LTE_T_e"], 1.0);
    assert!(pops[1].lte["n_LTE_T_R"] > pops[1].lte["n_LTE_T_e"]);
    assert_eq!(pops[2].level, 4);
    assert!(pops[2].lte["n_LTE_T_e"] > 0.0);
}

#[rstest]
#[case(Some(1), false)]
#[case(Some(2), true)]
#[case(None, true)]
fn superlevel_respects_maxlevel(
    modeldir: TempDir,
    #[case] maxlevel: Option<usize>,
    #[case] has_value: bool,
) {
    let ions = get_levels(modeldir.path(), &[(26, 2)], false, false).unwrap();
    let mut pops = vec![population(0, 1.0), population(1, 1e-3), population(SUPERLEVEL, 1e-5)];
    add_lte_pops(&ions, &mut pops, &[("lte", 6000.0)], maxlevel).unwrap();
    assert_eq!(pops[2].lte.contains_key("lte"), has_value);
}

#[rstest]
fn forbidden_line_spectrum(modeldir: TempDir) {
    let ions = get_levels(modeldir.path(), &[(26, 2)], true, false).unwrap();
    let fe2 = find_ion(&ions, 26, 2).unwrap();

    let options = LineSpectrumOptions::default();
    let lines = get_line_transitions(fe2, &options).unwrap();
    assert_eq!(lines.len(), 1);
    assert!((lines[0].lambda_angstroms - 6199.2).abs() < 0.1);

    let levelpops = BTreeMap::from([(1, 2.0)]);
    let upper_pops = upper_pops_from_levels(&lines, &levelpops);
    let xvalues = options.xvalues();
    let flux = generate_ion_spectrum(&lines, &upper_pops, &xvalues, &options);

    let peak_index = (0..flux.len())
        .max_by(|&a, &b| flux[a].total_cmp(&flux[b]))
        .unwrap();
    assert!((xvalues[peak_index] - lines[0].lambda_angstroms).abs() <= options.plot_resolution());
    assert!(flux.iter().all(|f| *f >= 0.0));
}

#[test]
fn compressed_adata_is_found() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let file = std::fs::File::create(dir.path().join("adata.txt.gz")).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(ADATA.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let ions = get_levels(Path::new(dir.path()), &[], false, false).unwrap();
    assert_eq!(ions.len(), 2);
}
