//! Reading workshop files of other codes and exporting an ARTIS model

use std::path::Path;

use artistools_codecomparison::{
    get_spectra, get_timestep_times_float, read_reference_estimators, writecomparisondata, Error,
};
use artistools_model::TimeLoc;
use artistools_utils::Config;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const REFERENCE: &str = "codecomparison/DDC10/cmfgen";

const PHYS: &str = "\
#NTIMES: 2
#TIMES[d]: 100.0 150.0
#TIME: 100.0
#NVEL: 2
#vel_mid[km/s] temp[K] rho[gcc] ne[/cm^3] natom[/cm^3]
1000.0 5000.0 1e-14 1e8 2e8
2000.0 4000.0 1e-15 1e7 2e7
#TIME: 150.0
#NVEL: 2
#vel_mid[km/s] temp[K] rho[gcc] ne[/cm^3] natom[/cm^3]
1000.0 4500.0 3e-15 5e7 6e7
2000.0 3500.0 3e-16 5e6 6e6
";

const IONFRAC_FE: &str = "\
#NTIMES: 2
#NSTAGES: 3
#TIMES[d]: 100.0 150.0
#
#TIME: 100.0
#NVEL: 2
#vel_mid[km/s]  fe0  fe1  fe2
1000.0 0.1 0.9 0.0
2000.0 0.2 0.8 --
#TIME: 150.0
#NVEL: 2
#vel_mid[km/s]  fe0  fe1  fe2
1000.0 0.0 0.5 0.5
2000.0 0.0 1.0 0.0
";

const SPECTRA: &str = "\
#NTIMES: 2
#NWAVE: 3
#TIMES[d]: 100.0 150.0
#wavelength[Ang] flux_t0[erg/s/Ang] flux_t1[erg/s/Ang]
3000.0 1e38 2e38
4000.0 3e38 4e38
5000.0 5e38 6e38
";

const MODEL: &str = "\
2
1.0
1 5000.0 -10.0 0.0 0.5 0.0 0.0 0.0
2 10000.0 -10.0 0.0 0.5 0.0 0.0 0.0
";

const COMPOSITION: &str = "\
1
0
0
26 3 1 3 -1 0.0 56.0
";

const ESTIMATORS: &str = "\
timestep 0 modelgridindex 0 titeration 0 TR 8000.0 Te 7000.0 W 0.3 nne 2e8
populations Z=26 1: 1e5 2: 9e5 SUM: 1e6
heating: ff 1e-10 dep 4e-10 heating_dep/total_dep 0.8

timestep 0 modelgridindex 1 titeration 0 TR 8000.0 Te 6000.0 W 0.3 nne 1e8
populations Z=26 1: 5e5 2: 5e5 SUM: 1e6
heating: ff 1e-10 dep 2e-10 heating_dep/total_dep 0.8

timestep 1 modelgridindex 0 titeration 0 TR 7500.0 Te 6500.0 W 0.3 nne 1.5e8
populations Z=26 1: 1e5 2: 9e5 SUM: 1e6
heating: ff 1e-10 dep 3e-10 heating_dep/total_dep 0.8

timestep 2 modelgridindex 0 titeration 0 TR 7000.0 Te 6000.0 W 0.3 nne 1e8
populations Z=26 2: 5e5 3: 5e5 SUM: 1e6
heating: ff 1e-10 dep 2e-10 heating_dep/total_dep 0.8

timestep 2 modelgridindex 1 titeration 0 TR 7000.0 Te 5000.0 W 0.3 nne 5e7
populations Z=26 2: 1e6 SUM: 1e6
heating: ff 1e-10 dep 1e-10 heating_dep/total_dep 0.8
";

fn config(datapath: &Path) -> Config {
    Config {
        num_processes: 1,
        enable_diskcache: false,
        codecomparison_data_path: datapath.to_path_buf(),
        ..Default::default()
    }
}

#[fixture]
fn datadir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("DDC10");
    std::fs::create_dir(&folder).unwrap();
    let write = |name: &str, text: &str| std::fs::write(folder.join(name), text).unwrap();
    write("phys_DDC10_cmfgen.txt", PHYS);
    write("ionfrac_fe_DDC10_cmfgen.txt", IONFRAC_FE);
    write("spectra_DDC10_cmfgen.txt", SPECTRA);
    // another code must not be mixed in
    write("ionfrac_fe_DDC10_sedona.txt", "#NTIMES: 7\n");
    dir
}

/// An ARTIS model folder whose name starts with the model id
#[fixture]
fn artismodel() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let modelpath = dir.path().join("DDC10_nebular");
    std::fs::create_dir(&modelpath).unwrap();

    let mut input = vec!["0"; 21];
    input.push("1 # nprocs");

    let write = |name: &str, text: &str| std::fs::write(modelpath.join(name), text).unwrap();
    write("model.txt", MODEL);
    write("input.txt", &input.join("\n"));
    write(
        "timesteps.out",
        "#timestep tstart_days twidth_days tmid_days\n0 9 2 10\n1 11 2 12\n2 13 2 14\n",
    );
    write("compositiondata.txt", COMPOSITION);
    write("estimators_0000.out", ESTIMATORS);
    write("spec.out", "0 10.0 12.0 14.0\n1e15 1e-13 2e-13 3e-13\n2e15 4e-13 5e-13 6e-13\n");
    dir
}

#[rstest]
#[case(TimeLoc::Mid, [100.0, 150.0])]
#[case(TimeLoc::Start, [75.0, 125.0])]
#[case(TimeLoc::End, [125.0, 175.0])]
#[case(TimeLoc::Delta, [50.0, 50.0])]
fn reference_timesteps(datadir: TempDir, #[case] loc: TimeLoc, #[case] expected: [f64; 2]) {
    let times = get_timestep_times_float(REFERENCE, loc, &config(datadir.path())).unwrap();
    assert_eq!(times, expected);
}

#[rstest]
fn reference_estimators(datadir: TempDir) {
    let estimators = read_reference_estimators(REFERENCE, &config(datadir.path())).unwrap();
    assert_eq!(estimators.len(), 4);

    let cell = &estimators[&(0, 0)];
    assert_eq!(cell.get("Te"), Some(5000.0));
    assert_eq!(cell.get("velocity_outer"), Some(1000.0));
    assert_eq!(cell.tdays, Some(100.0));
    assert!((cell.ion("populations", 26, 2).unwrap() - 1.8e8).abs() < 1.0);
    assert!((cell.element("populations", 26).unwrap() - 2e8).abs() < 1.0);

    // zero fractions are dropped, unreadable ones kept as NaN
    assert_eq!(cell.ion("populations", 26, 3), None);
    assert!(estimators[&(0, 1)].ion("populations", 26, 3).unwrap().is_nan());

    assert_eq!(estimators[&(1, 1)].get("Te"), Some(3500.0));
}

#[rstest]
fn mismatched_reference_velocity(datadir: TempDir) {
    let path = datadir.path().join("DDC10/ionfrac_fe_DDC10_cmfgen.txt");
    std::fs::write(&path, IONFRAC_FE.replace("2000.0 0.2", "2500.0 0.2")).unwrap();

    let result = read_reference_estimators(REFERENCE, &config(datadir.path()));
    assert!(matches!(
        result,
        Err(Error::VelocityMismatch { timestep: 0, modelgridindex: 1, .. })
    ));
}

#[rstest]
fn reference_spectra(datadir: TempDir) {
    let spectra = get_spectra(REFERENCE, &config(datadir.path())).unwrap();
    assert_eq!(spectra.times, vec![100.0, 150.0]);
    assert_eq!(spectra.lambda.len(), 3);

    let (time, spectrum) = spectra.closest_spectrum(140.0).unwrap();
    assert_eq!(time, 150.0);
    assert!(spectrum.f_lambda[2] > spectrum.f_lambda[0]);

    assert!(matches!(
        spectra.closest_spectrum(300.0),
        Err(Error::TimeNotFound { closest, .. }) if closest == 150.0
    ));
}

#[rstest]
fn not_a_virtual_path(datadir: TempDir) {
    let result = read_reference_estimators("models/DDC10", &config(datadir.path()));
    assert!(matches!(result, Err(Error::NotCodeComparisonPath(_))));
}

#[rstest]
fn exported_model_reads_back(artismodel: TempDir) {
    let modelpath = artismodel.path().join("DDC10_nebular");
    let datapath = artismodel.path().join("cc");
    let outputpath = datapath.join("DDC10");
    let config = config(&datapath);

    let outfiles = writecomparisondata(&modelpath, &[0, 1, 2], &outputpath, true, &config).unwrap();
    let names = outfiles
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect::<Vec<String>>();
    assert_eq!(
        names,
        vec![
            "spectra_DDC10_artisnebular.txt",
            "eden_DDC10_artisnebular.txt",
            "edep_DDC10_artisnebular.txt",
            "tgas_DDC10_artisnebular.txt",
            "phys_DDC10_artisnebular.txt",
            "ionfrac_fe_DDC10_artisnebular.txt",
        ]
    );

    // the missing cell at timestep 1 is averaged from its neighbours
    let tgas = std::fs::read_to_string(outputpath.join("tgas_DDC10_artisnebular.txt")).unwrap();
    let lines = tgas.lines().collect::<Vec<&str>>();
    assert_eq!(lines[0], "#NTIMES 3");
    assert_eq!(lines[2], "#TIMES[d] 10.00 12.00 14.00");
    assert_eq!(lines[5], "7500.00 6.00e+03 5.50e+03 5.00e+03");

    let spectra = std::fs::read_to_string(outputpath.join("spectra_DDC10_artisnebular.txt")).unwrap();
    assert_eq!(spectra.lines().count(), 6);

    let reference = read_reference_estimators("codecomparison/DDC10/artisnebular", &config).unwrap();
    assert_eq!(reference.len(), 6);
    assert_eq!(reference[&(1, 1)].get("Te"), Some(5500.0));
    assert!((reference[&(0, 0)].ion("populations", 26, 2).unwrap() - 9e5).abs() < 1.0);
}
