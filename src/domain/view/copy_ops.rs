use crate::domain::view::*;
use crate::util::indexing;
use crate::util::*;

/// Copy `src_region` of `src` into `dst_region` of `dst`.
/// The two regions must have identical extents;
/// they may sit at different corners of their arrays.
/// Rows along the last axis are contiguous in the buffers
/// and move with `copy_from_slice`.
/// Empty regions are a no-op.
pub fn copy_region<NumType, SrcType, DstType, const GRID_DIMENSION: usize>(
    src: &SrcType,
    dst: &mut DstType,
    src_region: &Region<GRID_DIMENSION>,
    dst_region: &Region<GRID_DIMENSION>,
) where
    NumType: NumTrait,
    SrcType: DomainView<NumType, GRID_DIMENSION>,
    DstType: DomainView<NumType, GRID_DIMENSION>,
{
    profiling::scope!("copy_region");
    debug_assert_eq!(src_region.size, dst_region.size);
    if src_region.is_empty() {
        return;
    }
    debug_assert!(src.region().contains_region(src_region));
    debug_assert!(dst.region().contains_region(dst_region));

    let row_len = src_region.size[GRID_DIMENSION - 1] as usize;
    let mut row_shape = src_region.size;
    row_shape[GRID_DIMENSION - 1] = 1;
    let rows = indexing::buffer_size(&row_shape);

    for r in 0..rows {
        let offset = indexing::linear_to_coord(r, &row_shape);
        let src_index = src.region().coord_to_linear(&(src_region.index + offset));
        let dst_index = dst.region().coord_to_linear(&(dst_region.index + offset));
        let src_slice = &src.buffer()[src_index..src_index + row_len];
        dst.buffer_mut()[dst_index..dst_index + row_len]
            .copy_from_slice(src_slice);
    }
}
