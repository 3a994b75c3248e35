//! Cell to rank assignment over many grid and process counts

use artistools_model::{get_cellsofmpirank, get_mpiranklist, get_mpirankofcell, RankPartition};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[rstest]
fn ranks_cover_every_cell_once(
    #[values(1, 2, 7, 10, 64, 101)] npts: usize,
    #[values(1, 3, 4, 16, 128)] nprocs: usize,
) {
    let partition = RankPartition::new(npts, nprocs).unwrap();

    let mut cells = Vec::new();
    let mut previous_end = 0;
    for rank in 0..nprocs {
        let range = partition.cells_of_rank(rank).unwrap();
        assert_eq!(range.start, previous_end, "ranges are contiguous");
        previous_end = range.end;
        cells.extend(range);
    }

    assert_eq!(cells, (0..npts).collect::<Vec<usize>>());

    let sizes = (0..nprocs)
        .map(|rank| partition.cells_of_rank(rank).unwrap().len())
        .collect::<Vec<usize>>();
    let (smallest, largest) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
    assert!(largest - smallest <= 1);
}

#[rstest]
fn more_ranks_than_cells_gives_one_cell_each(#[values(1, 4, 9)] npts: usize) {
    let partition = RankPartition::new(npts, npts + 5).unwrap();
    for cell in 0..npts {
        assert_eq!(partition.rank_of_cell(cell).unwrap(), cell);
    }
    assert!(partition.cells_of_rank(npts + 4).unwrap().is_empty());
}

#[rstest]
fn cell_lookup_agrees_with_rank_ranges(
    #[values(1, 5, 10, 33, 100)] npts: usize,
    #[values(1, 2, 3, 8, 40, 200)] nprocs: usize,
) {
    let partition = RankPartition::new(npts, nprocs).unwrap();
    for cell in 0..npts {
        let rank = partition.rank_of_cell(cell).unwrap();
        assert!(partition.cells_of_rank(rank).unwrap().contains(&cell));
    }
}

#[rstest]
#[case(10, 3, &[4, 5, 6], false, vec![1])]
#[case(10, 3, &[0, 9], false, vec![0, 2])]
#[case(10, 3, &[], false, vec![0, 1, 2])]
#[case(4, 8, &[-1], true, vec![0, 1, 2, 3])]
#[case(4, 8, &[-1], false, vec![0, 1, 2, 3, 4, 5, 6, 7])]
fn ranks_to_read(
    #[case] npts: usize,
    #[case] nprocs: usize,
    #[case] cells: &[i64],
    #[case] only_ranks_withgridcells: bool,
    #[case] expected: Vec<usize>,
) {
    let partition = RankPartition::new(npts, nprocs).unwrap();
    assert_eq!(
        partition.rank_list(cells, only_ranks_withgridcells).unwrap(),
        expected
    );
}

#[rstest]
fn out_of_range_requests_fail() {
    let partition = RankPartition::new(10, 3).unwrap();
    assert!(partition.cells_of_rank(3).is_err());
    assert!(partition.rank_of_cell(10).is_err());
    assert!(RankPartition::new(10, 0).is_err());
}

#[fixture]
fn modeldir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();

    let model = "10\n200.0\n1 5000 -1.0 0.0 0.0 0.0 0.0\n";
    std::fs::write(dir.path().join("model.txt"), model).unwrap();

    // the process count is read from the 22nd line
    let mut input = vec!["0"; 21];
    input.push("3 # nprocs");
    std::fs::write(dir.path().join("input.txt"), input.join("\n")).unwrap();

    dir
}

#[rstest]
fn partition_from_model_folder(modeldir: TempDir) {
    let path = modeldir.path();
    assert_eq!(RankPartition::read(path).unwrap(), RankPartition::new(10, 3).unwrap());
    assert_eq!(get_cellsofmpirank(1, path).unwrap(), vec![4, 5, 6]);
    assert_eq!(get_mpirankofcell(9, path).unwrap(), 2);
    assert_eq!(get_mpiranklist(path, &[3, 7], false).unwrap(), vec![0, 2]);
}
