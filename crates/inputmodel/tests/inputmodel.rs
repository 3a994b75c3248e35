//! Round trips of model folders on disk

use artistools_inputmodel::{
    fully_mix, get_modeldata, get_wid_init_at_tmin, save_initialabundances, save_modeldata,
    scale_velocity, write_tardis_csvy, AbundanceType, Error, TardisOptions, VelocityScale,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const MODEL: &str = "\
3
2.0
1 4000.0 -9.5 0.1 0.6 0.0 0.0 0.0 0.01 0.0
2 8000.0 -10.5 0.0 0.2 0.0 0.0 0.0 0.0 0.0
3 16000.0 -12.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
";

const ABUNDANCES: &str = "\
1 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.4 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.6
2 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.8 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.2
3 0.0 0.0 0.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
";

#[fixture]
fn modeldir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("model.txt"), MODEL).unwrap();
    std::fs::write(dir.path().join("abundances.txt"), ABUNDANCES).unwrap();
    dir
}

#[rstest]
fn read_with_abundances(modeldir: TempDir) {
    let model = get_modeldata(modeldir.path(), true).unwrap();
    assert_eq!(model.isotopes.len(), 7);
    assert_eq!(model.isotope_index("Co57"), Some(6));

    let abundances = model.abundances.as_ref().unwrap();
    assert_eq!(abundances.rows.len(), 3);
    assert_eq!(abundances.rows[0].massfraction(8), 0.4);
    assert_eq!(abundances.rows[0].massfraction(28), 0.6);
}

#[rstest]
fn mismatched_abundances_are_rejected(modeldir: TempDir) {
    std::fs::write(modeldir.path().join("abundances.txt"), "1 1.0\n").unwrap();
    assert!(matches!(
        get_modeldata(modeldir.path(), true),
        Err(Error::AbundanceCountMismatch { cells: 3, abundances: 1 })
    ));
}

#[rstest]
#[case(VelocityScale::Velocity(2.0), 8000.0)]
#[case(VelocityScale::KineticEnergy(0.25), 2000.0)]
fn scaled_model_round_trips(modeldir: TempDir, #[case] scale: VelocityScale, #[case] v0: f64) {
    let mut model = get_modeldata(modeldir.path(), false).unwrap();
    let masses = model
        .cells
        .iter()
        .map(|c| c.cellmass_grams)
        .collect::<Vec<f64>>();

    scale_velocity(&mut model, scale).unwrap();
    assert!((model.cells[0].velocity_outer - v0).abs() < 1e-9);

    let outfile = modeldir.path().join("model_scaled.txt");
    save_modeldata(&model, &outfile).unwrap();
    let reread = get_modeldata(&outfile, false).unwrap();

    // logrho is written with 8 decimal places
    for (cell, mass) in reread.cells.iter().zip(masses) {
        assert!((cell.cellmass_grams / mass - 1.0).abs() < 1e-6);
    }
}

#[rstest]
fn mixed_model_is_uniform(modeldir: TempDir) {
    let mut model = get_modeldata(modeldir.path(), true).unwrap();
    fully_mix(&mut model).unwrap();

    let outpath = modeldir.path().join("mixed");
    std::fs::create_dir(&outpath).unwrap();
    save_modeldata(&model, outpath.join("model.txt")).unwrap();
    save_initialabundances(model.abundances.as_ref().unwrap(), outpath.join("abundances.txt"))
        .unwrap();

    let reread = get_modeldata(&outpath, true).unwrap();
    let rows = &reread.abundances.as_ref().unwrap().rows;
    assert!(rows.windows(2).all(|w| w[0].massfractions == w[1].massfractions));
    let total = rows[0].massfractions.iter().sum::<f64>();
    assert!((total - 1.0).abs() < 1e-9);
}

#[rstest]
#[case(AbundanceType::Elemental, "H,He,Li", 4 + 28)]
#[case(AbundanceType::Nuclear, "Ni56,Co56,Fe52,Cr48,Ni57,Co57", 4 + 6)]
fn tardis_export(
    modeldir: TempDir,
    #[case] abundtype: AbundanceType,
    #[case] species: &str,
    #[case] ncolumns: usize,
) {
    let model = get_modeldata(modeldir.path(), true).unwrap();
    let options = TardisOptions {
        abundtype,
        ..Default::default()
    };

    let path = write_tardis_csvy(&model, "testmodel", &options, modeldir.path()).unwrap();
    assert_eq!(path, modeldir.path().join("testmodel.csvy"));

    let text = std::fs::read_to_string(&path).unwrap();
    let mut sections = text.splitn(3, "---\n");
    assert_eq!(sections.next(), Some(""));

    let meta: serde_yaml::Value = serde_yaml::from_str(sections.next().unwrap()).unwrap();
    assert_eq!(meta["name"].as_str(), Some("testmodel"));
    assert_eq!(meta["model_density_time_0"].as_str(), Some("2 day"));

    let body = sections.next().unwrap();
    let mut lines = body.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with(&format!("velocity,density,t_rad,dilution_factor,{species}")));
    assert_eq!(header.split(',').count(), ncolumns);
    let first = lines.next().unwrap();
    assert!(first.starts_with("4000.0,3.1623e-10,10000,1,"));
    assert_eq!(lines.count(), 2);
}

#[rstest]
fn cell_width_at_tmin(modeldir: TempDir) {
    std::fs::write(
        modeldir.path().join("timesteps.out"),
        "#timestep tstart_days twidth_days tmid_days\n0 1.0 1.0 1.5\n",
    )
    .unwrap();

    let wid = get_wid_init_at_tmin(modeldir.path()).unwrap();
    let expected = 2.0 * 16000.0e5 * 86400.0 / 50.0;
    assert!((wid / expected - 1.0).abs() < 1e-12);
}
