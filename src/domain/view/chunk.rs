use crate::util::*;

pub struct DomainChunk<'a, NumType: NumTrait, const GRID_DIMENSION: usize> {
    offset: usize,
    region: &'a Region<GRID_DIMENSION>,
    buffer: &'a mut [NumType],
}

impl<'a, NumType: NumTrait, const GRID_DIMENSION: usize>
    DomainChunk<'a, NumType, GRID_DIMENSION>
{
    pub fn new(
        offset: usize,
        region: &'a Region<GRID_DIMENSION>,
        buffer: &'a mut [NumType],
    ) -> Self {
        DomainChunk {
            offset,
            region,
            buffer,
        }
    }

    pub fn coord_iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (Coord<GRID_DIMENSION>, &mut NumType)> {
        self.buffer
            .iter_mut()
            .enumerate()
            .map(|(i, v): (usize, &mut NumType)| {
                let linear_index = self.offset + i;
                let coord = self.region.linear_to_coord(linear_index);
                (coord, v)
            })
    }
}
