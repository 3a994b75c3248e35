//! Distribution of model grid cells over MPI ranks
//!
//! ARTIS splits `npts` model cells into `nprocs` contiguous blocks. The first
//! `npts % nprocs` ranks update one extra cell each. With more ranks than
//! cells every cell gets its own rank and the remaining ranks only propagate
//! packets.

// standard library
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::inputparams::{get_nprocs, get_npts_model};

/// Block partition of model cells over MPI ranks
///
/// ```rust
/// # use artistools_model::RankPartition;
/// let partition = RankPartition::new(10, 3).unwrap();
/// assert_eq!(partition.cells_of_rank(0).unwrap(), 0..4);
/// assert_eq!(partition.cells_of_rank(1).unwrap(), 4..7);
/// assert_eq!(partition.cells_of_rank(2).unwrap(), 7..10);
/// assert_eq!(partition.rank_of_cell(5).unwrap(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankPartition {
    /// Number of model grid cells
    pub npts: usize,
    /// Number of MPI processes
    pub nprocs: usize,
}

impl RankPartition {
    /// Partition of `npts` cells over `nprocs` ranks
    pub fn new(npts: usize, nprocs: usize) -> Result<Self> {
        match nprocs {
            0 => Err(Error::NoProcesses),
            _ => Ok(Self { npts, nprocs }),
        }
    }

    /// Partition for a model folder, from `model.txt` and `input.txt`
    pub fn read<P: AsRef<Path>>(modelpath: P) -> Result<Self> {
        let modelpath = modelpath.as_ref();
        Self::new(get_npts_model(modelpath)?, get_nprocs(modelpath)?)
    }

    fn nblock(&self) -> usize {
        self.npts / self.nprocs
    }

    fn n_leftover(&self) -> usize {
        self.npts % self.nprocs
    }

    /// Contiguous cells updated by a rank, possibly empty
    pub fn cells_of_rank(&self, mpirank: usize) -> Result<Range<usize>> {
        if mpirank >= self.nprocs {
            return Err(Error::RankOutOfRange {
                rank: mpirank,
                nprocs: self.nprocs,
            });
        }

        let (nblock, n_leftover) = (self.nblock(), self.n_leftover());
        let (ndo, nstart) = match mpirank < n_leftover {
            true => (nblock + 1, mpirank * (nblock + 1)),
            false => (nblock, n_leftover + mpirank * nblock),
        };

        Ok(nstart..nstart + ndo)
    }

    /// Rank responsible for updating and writing out a cell
    pub fn rank_of_cell(&self, modelgridindex: usize) -> Result<usize> {
        if modelgridindex >= self.npts {
            return Err(Error::CellOutOfRange {
                cell: modelgridindex,
                npts: self.npts,
            });
        }

        let mpirank = if self.nprocs > self.npts {
            modelgridindex
        } else {
            let (nblock, n_leftover) = (self.nblock(), self.n_leftover());
            let boundary = n_leftover * (nblock + 1);
            match modelgridindex < boundary {
                true => modelgridindex / (nblock + 1),
                false => n_leftover + (modelgridindex - boundary) / nblock,
            }
        };

        match self.cells_of_rank(mpirank)?.contains(&modelgridindex) {
            true => Ok(mpirank),
            false => Err(Error::CellNotInRank {
                cell: modelgridindex,
                rank: mpirank,
            }),
        }
    }

    /// Number of ranks that update at least one cell
    pub fn ranks_with_cells(&self) -> usize {
        self.nprocs.min(self.npts)
    }

    /// Ranks to read for a set of cells
    ///
    /// With no cells, or any negative cell meaning all cells, every rank is
    /// returned, or only those with grid cells if requested. Otherwise the
    /// sorted unique ranks of the given cells.
    pub fn rank_list(
        &self,
        modelgridindices: &[i64],
        only_ranks_withgridcells: bool,
    ) -> Result<Vec<usize>> {
        let all = || -> Vec<usize> {
            match only_ranks_withgridcells {
                true => (0..self.ranks_with_cells()).collect(),
                false => (0..self.nprocs).collect(),
            }
        };

        if modelgridindices.is_empty() || modelgridindices.iter().any(|&mgi| mgi < 0) {
            return Ok(all());
        }

        let ranks = modelgridindices
            .iter()
            .map(|&mgi| self.rank_of_cell(mgi as usize))
            .collect::<Result<BTreeSet<usize>>>()?;

        Ok(ranks.into_iter().collect())
    }
}

/// Cells updated by an MPI rank of a model
pub fn get_cellsofmpirank<P: AsRef<Path>>(mpirank: usize, modelpath: P) -> Result<Vec<usize>> {
    Ok(RankPartition::read(modelpath)?.cells_of_rank(mpirank)?.collect())
}

/// MPI rank responsible for a model grid cell
pub fn get_mpirankofcell<P: AsRef<Path>>(modelgridindex: usize, modelpath: P) -> Result<usize> {
    RankPartition::read(modelpath)?.rank_of_cell(modelgridindex)
}

/// MPI ranks to read for the given cells, see [RankPartition::rank_list]
pub fn get_mpiranklist<P: AsRef<Path>>(
    modelpath: P,
    modelgridindices: &[i64],
    only_ranks_withgridcells: bool,
) -> Result<Vec<usize>> {
    RankPartition::read(modelpath)?.rank_list(modelgridindices, only_ranks_withgridcells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_ranks_than_cells() {
        let partition = RankPartition::new(3, 5).unwrap();
        assert_eq!(partition.rank_of_cell(2).unwrap(), 2);
        assert!(partition.cells_of_rank(4).unwrap().is_empty());
        assert_eq!(partition.ranks_with_cells(), 3);
    }

    #[test]
    fn out_of_range_requests() {
        let partition = RankPartition::new(10, 3).unwrap();
        assert!(matches!(
            partition.cells_of_rank(3),
            Err(Error::RankOutOfRange { rank: 3, nprocs: 3 })
        ));
        assert!(matches!(
            partition.rank_of_cell(10),
            Err(Error::CellOutOfRange { cell: 10, npts: 10 })
        ));
        assert!(RankPartition::new(10, 0).is_err());
    }

    #[test]
    fn rank_lists() {
        let partition = RankPartition::new(4, 6).unwrap();
        assert_eq!(partition.rank_list(&[], false).unwrap(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(partition.rank_list(&[-1], true).unwrap(), vec![0, 1, 2, 3]);

        let partition = RankPartition::new(10, 3).unwrap();
        assert_eq!(partition.rank_list(&[9, 0, 5, 6], false).unwrap(), vec![0, 1, 2]);
    }
}
