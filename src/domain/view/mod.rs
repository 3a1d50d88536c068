mod chunk;
mod copy_ops;
mod owned;
mod slice;

pub use chunk::*;
pub use copy_ops::*;
pub use owned::*;
pub use slice::*;

use crate::util::*;
use rayon::prelude::*;

pub trait DomainView<NumType: NumTrait, const GRID_DIMENSION: usize>: Sync {
    fn region(&self) -> &Region<GRID_DIMENSION>;

    fn buffer(&self) -> &[NumType];

    fn buffer_mut(&mut self) -> &mut [NumType];

    fn region_buffer_mut(&mut self) -> (&Region<GRID_DIMENSION>, &mut [NumType]);

    fn view(&self, world_coord: &Coord<GRID_DIMENSION>) -> NumType;

    fn set_coord(&mut self, world_coord: &Coord<GRID_DIMENSION>, value: NumType);

    fn par_modify_access<'a>(
        &'a mut self,
        chunk_size: usize,
    ) -> impl ParallelIterator<Item = DomainChunk<'a, NumType, GRID_DIMENSION>> {
        let (region, buffer) = self.region_buffer_mut();
        par_modify_access_impl(buffer, region, chunk_size)
    }

    fn par_set_values<
        F: FnOnce(Coord<GRID_DIMENSION>) -> NumType + Send + Sync + Copy,
    >(
        &mut self,
        f: F,
        chunk_size: usize,
    ) {
        self.par_modify_access(chunk_size).for_each(
            |mut d: DomainChunk<'_, NumType, GRID_DIMENSION>| {
                d.coord_iter_mut().for_each(|(world_coord, value_mut)| {
                    *value_mut = f(world_coord);
                })
            },
        );
    }
}

/// Why not just put this into DomainView::par_modify_access?
/// Rust compiler can't figure out how to borrow region and buffer
/// at the same time in this way.
/// By putting their borrows into one function call first we work around it.
fn par_modify_access_impl<'a, NumType: NumTrait, const GRID_DIMENSION: usize>(
    buffer: &'a mut [NumType],
    region: &'a Region<GRID_DIMENSION>,
    chunk_size: usize,
) -> impl ParallelIterator<Item = DomainChunk<'a, NumType, GRID_DIMENSION>> + 'a {
    buffer[0..region.buffer_size()]
        .par_chunks_mut(chunk_size)
        .enumerate()
        .map(move |(i, buffer_chunk): (usize, &mut [NumType])| {
            let offset = i * chunk_size;
            DomainChunk::new(offset, region, buffer_chunk)
        })
}
