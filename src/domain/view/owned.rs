use super::*;
use crate::util::*;

pub struct OwnedDomain<NumType: NumTrait, const GRID_DIMENSION: usize> {
    region: Region<GRID_DIMENSION>,
    buffer: Vec<NumType>,
}

impl<NumType: NumTrait, const GRID_DIMENSION: usize>
    OwnedDomain<NumType, GRID_DIMENSION>
{
    /// Allocate a zero filled buffer covering `region`.
    pub fn new(region: Region<GRID_DIMENSION>) -> Self {
        let buffer = vec![NumType::zero(); region.buffer_size()];
        OwnedDomain { region, buffer }
    }

    pub fn as_slice_domain(&mut self) -> SliceDomain<'_, NumType, GRID_DIMENSION> {
        SliceDomain::new(self.region, &mut self.buffer)
    }
}

impl<NumType: NumTrait, const GRID_DIMENSION: usize>
    DomainView<NumType, GRID_DIMENSION> for OwnedDomain<NumType, GRID_DIMENSION>
{
    fn region(&self) -> &Region<GRID_DIMENSION> {
        &self.region
    }

    fn buffer(&self) -> &[NumType] {
        let range = 0..self.region.buffer_size();
        &self.buffer[range]
    }

    fn buffer_mut(&mut self) -> &mut [NumType] {
        let range = 0..self.region.buffer_size();
        &mut self.buffer[range]
    }

    fn region_buffer_mut(&mut self) -> (&Region<GRID_DIMENSION>, &mut [NumType]) {
        let range = 0..self.region.buffer_size();
        (&self.region, &mut self.buffer[range])
    }

    #[track_caller]
    fn view(&self, world_coord: &Coord<GRID_DIMENSION>) -> NumType {
        debug_assert!(
            self.region.contains(world_coord),
            "{} does not contain {:?}",
            self.region,
            world_coord
        );
        let index = self.region.coord_to_linear(world_coord);
        self.buffer[index]
    }

    #[track_caller]
    fn set_coord(&mut self, world_coord: &Coord<GRID_DIMENSION>, value: NumType) {
        debug_assert!(
            self.region.contains(world_coord),
            "{} does not contain {:?}",
            self.region,
            world_coord
        );
        let index = self.region.coord_to_linear(world_coord);
        self.buffer[index] = value;
    }
}
