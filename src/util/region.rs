use crate::util::indexing;
use crate::util::*;

/// Axis-aligned integer region over `DIMENSION` axes,
/// stored as a lower corner `index` and a per-axis extent `size`.
/// The upper corner is exclusive.
/// Any axis with a non-positive extent denotes the empty region.
/// This class is responsible for alot of indexing operations,
/// where we map between a linear buffer and coordinates.
#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Region<const DIMENSION: usize> {
    pub index: Coord<DIMENSION>,
    pub size: Coord<DIMENSION>,
}

impl<const GRID_DIMENSION: usize> std::fmt::Display for Region<GRID_DIMENSION> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        write!(f, "({:?}, {:?})", self.index, self.size)
    }
}

impl<const DIMENSION: usize> Region<DIMENSION> {
    /// Create region from lower corner and extents.
    #[inline]
    pub fn new(index: Coord<DIMENSION>, size: Coord<DIMENSION>) -> Self {
        Region { index, size }
    }

    /// Create region with the given extents and the lower corner
    /// at the origin.
    pub fn from_size(size: Coord<DIMENSION>) -> Self {
        Region {
            index: Coord::zero(),
            size,
        }
    }

    /// Exclusive upper corner.
    #[inline]
    pub fn end(&self) -> Coord<DIMENSION> {
        self.index + self.size
    }

    /// Check whether any axis has a non-positive extent.
    pub fn is_empty(&self) -> bool {
        for d in 0..DIMENSION {
            if self.size[d] <= 0 {
                return true;
            }
        }
        false
    }

    /// Return the number of coordinates contained in the instance.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        indexing::buffer_size(&self.size)
    }

    /// Return the linear index for a world coord in the instance.
    pub fn coord_to_linear(&self, coord: &Coord<DIMENSION>) -> usize {
        indexing::coord_to_linear(&(coord - self.index), &self.size)
    }

    /// Return the world coordinate in the instance for a given linear index.
    pub fn linear_to_coord(&self, index: usize) -> Coord<DIMENSION> {
        indexing::linear_to_coord(index, &self.size) + self.index
    }

    /// Check whether the instance contains a coordinate.
    pub fn contains(&self, coord: &Coord<DIMENSION>) -> bool {
        for d in 0..DIMENSION {
            if coord[d] < self.index[d] || coord[d] >= self.index[d] + self.size[d] {
                return false;
            }
        }
        true
    }

    /// Check whether another region is contained in the instance.
    /// The empty region is contained in everything.
    pub fn contains_region(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        for d in 0..DIMENSION {
            if other.index[d] < self.index[d]
                || other.index[d] + other.size[d] > self.index[d] + self.size[d]
            {
                return false;
            }
        }
        true
    }

    /// Crop the instance against another region.
    /// Per axis the result takes the larger lower corner and the
    /// smaller upper corner; extents clamp at zero, so disjoint
    /// inputs produce an empty region rather than an error.
    /// Negative extents on either input behave as empty.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut result = Region::new(Coord::zero(), Coord::zero());
        for d in 0..DIMENSION {
            let min = self.index[d].max(other.index[d]);
            let max = (self.index[d] + self.size[d])
                .min(other.index[d] + other.size[d]);
            result.index[d] = min;
            result.size[d] = (max - min).max(0);
        }
        result
    }

    /// Translate the instance by an offset, extents unchanged.
    pub fn translate(&self, offset: &Coord<DIMENSION>) -> Self {
        Region::new(self.index + offset, self.size)
    }

    /// Return iterator over contained coords in linear ordering.
    #[allow(clippy::needless_lifetimes)]
    pub fn coord_iter<'a>(
        &'a self,
    ) -> impl Iterator<Item = Coord<DIMENSION>> + use<'a, DIMENSION> {
        (0..self.buffer_size()).map(|i| self.linear_to_coord(i))
    }

    /// Partition the instance along one axis into at most `pieces`
    /// near-equal slabs that exactly tile it, disjoint and gap free.
    /// Axes with fewer coordinates than `pieces` yield fewer slabs.
    pub fn split_axis(&self, axis: usize, pieces: usize) -> Vec<Self> {
        debug_assert!(axis < DIMENSION);
        debug_assert!(pieces > 0);
        let extent = self.size[axis].max(0);
        let pieces = (pieces as i32).min(extent).max(1);
        let base = extent / pieces;
        let remainder = extent % pieces;

        let mut result = Vec::with_capacity(pieces as usize);
        let mut start = self.index[axis];
        for p in 0..pieces {
            let len = base + if p < remainder { 1 } else { 0 };
            let mut slab = *self;
            slab.index[axis] = start;
            slab.size[axis] = len;
            result.push(slab);
            start += len;
        }
        result
    }
}
