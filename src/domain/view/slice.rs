use super::*;
use crate::util::*;

pub struct SliceDomain<'a, NumType: NumTrait, const GRID_DIMENSION: usize> {
    region: Region<GRID_DIMENSION>,
    buffer: &'a mut [NumType],
}

impl<'a, NumType: NumTrait, const GRID_DIMENSION: usize>
    SliceDomain<'a, NumType, GRID_DIMENSION>
{
    pub fn new(region: Region<GRID_DIMENSION>, buffer: &'a mut [NumType]) -> Self {
        debug_assert!(buffer.len() >= region.buffer_size());
        SliceDomain { region, buffer }
    }
}

impl<'a, NumType: NumTrait, const GRID_DIMENSION: usize>
    DomainView<NumType, GRID_DIMENSION>
    for SliceDomain<'a, NumType, GRID_DIMENSION>
{
    fn region(&self) -> &Region<GRID_DIMENSION> {
        &self.region
    }

    fn buffer(&self) -> &[NumType] {
        &self.buffer[0..self.region.buffer_size()]
    }

    fn buffer_mut(&mut self) -> &mut [NumType] {
        let range = 0..self.region.buffer_size();
        &mut self.buffer[range]
    }

    fn region_buffer_mut(&mut self) -> (&Region<GRID_DIMENSION>, &mut [NumType]) {
        (&self.region, self.buffer)
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

#[cfg(test)]
mod unit_tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn slice_domain_test() {
        let region = Region::new(vector![0, 0], vector![4, 4]);
        let mut buffer = vec![0.0; region.buffer_size()];
        {
            let mut domain = SliceDomain::new(region, &mut buffer);
            domain.par_set_values(|coord: Coord<2>| coord[1] as f64, 3);
            assert_eq!(domain.view(&vector![2, 3]), 3.0);
        }
        assert_eq!(buffer[region.coord_to_linear(&vector![1, 2])], 2.0);
    }
}
