//! Paste a region of a source array into a destination array.
//!
//! The filter copies the configured `source_region` of the source
//! onto the destination at `destination_index`, writing the result
//! into an output array with the destination's extent.
//! Work is split into disjoint work units, each handled
//! independently: a unit is either untouched by the paste, fully
//! covered by it, or partially covered, and the unit's copies follow
//! from that classification alone.

use crate::domain::*;
use crate::util::*;
use rayon::prelude::*;

/// Relationship between the paste placement and one work unit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Overlap<const GRID_DIMENSION: usize> {
    /// The paste does not reach the work unit.
    None,
    /// The paste covers the work unit completely.
    Full,
    /// The paste covers part of the work unit.
    /// Carries the cropped destination-space region
    /// to be sourced from the paste.
    Partial(Region<GRID_DIMENSION>),
}

/// Paste filter configuration.
/// Set up once before an execution, immutable while units run.
///
/// When `in_place` is enabled the output buffer is expected to
/// already hold the destination contents (typically because it *is*
/// the destination buffer), and destination copies are skipped.
#[derive(Debug, Copy, Clone)]
pub struct PasteFilter<const GRID_DIMENSION: usize> {
    source_region: Region<GRID_DIMENSION>,
    destination_index: Coord<GRID_DIMENSION>,
    in_place: bool,
}

impl<const GRID_DIMENSION: usize> PasteFilter<GRID_DIMENSION> {
    pub fn new(
        source_region: Region<GRID_DIMENSION>,
        destination_index: Coord<GRID_DIMENSION>,
    ) -> Self {
        PasteFilter {
            source_region,
            destination_index,
            in_place: false,
        }
    }

    /// Paste at the destination origin, in-place off.
    pub fn with_source_region(source_region: Region<GRID_DIMENSION>) -> Self {
        Self::new(source_region, Coord::zero())
    }

    pub fn source_region(&self) -> &Region<GRID_DIMENSION> {
        &self.source_region
    }

    pub fn set_source_region(&mut self, source_region: Region<GRID_DIMENSION>) {
        self.source_region = source_region;
    }

    pub fn destination_index(&self) -> &Coord<GRID_DIMENSION> {
        &self.destination_index
    }

    pub fn set_destination_index(
        &mut self,
        destination_index: Coord<GRID_DIMENSION>,
    ) {
        self.destination_index = destination_index;
    }

    pub fn in_place(&self) -> bool {
        self.in_place
    }

    pub fn set_in_place(&mut self, in_place: bool) {
        self.in_place = in_place;
    }

    /// The paste placement in destination space.
    pub fn paste_region_in_destination(&self) -> Region<GRID_DIMENSION> {
        Region::new(self.destination_index, self.source_region.size)
    }

    /// Offset from destination space to source space.
    pub fn source_offset(&self) -> Coord<GRID_DIMENSION> {
        self.source_region.index - self.destination_index
    }

    /// Translate a destination-space region into source space,
    /// extents unchanged.
    pub fn map_to_source(
        &self,
        region: &Region<GRID_DIMENSION>,
    ) -> Region<GRID_DIMENSION> {
        region.translate(&self.source_offset())
    }

    /// The source must supply exactly the paste region.
    pub fn required_source_region(&self) -> Region<GRID_DIMENSION> {
        self.source_region
    }

    /// The destination must supply whatever the output needs.
    pub fn required_destination_region(
        &self,
        output_region: &Region<GRID_DIMENSION>,
    ) -> Region<GRID_DIMENSION> {
        *output_region
    }

    /// Classify a work unit against the paste placement.
    /// The three outcomes are mutually exclusive and exhaustive.
    pub fn classify(
        &self,
        work_unit: &Region<GRID_DIMENSION>,
    ) -> Overlap<GRID_DIMENSION> {
        let overlap = self.paste_region_in_destination().intersect(work_unit);
        if overlap.is_empty() {
            Overlap::None
        } else if overlap == *work_unit {
            Overlap::Full
        } else {
            Overlap::Partial(overlap)
        }
    }

    /// Run one work unit, writing only within `work_unit` of `output`.
    ///
    /// A partially covered unit copies the whole destination unit
    /// first and then overwrites the overlap from the source.
    /// Decomposing the unit into source-only and destination-only
    /// pieces would avoid the double write, but the paste region is
    /// assumed small relative to the destination, and in-place
    /// callers depend on the exact write pattern.
    pub fn execute_unit<NumType, DestType, SourceType, OutputType>(
        &self,
        dest: &DestType,
        source: &SourceType,
        output: &mut OutputType,
        work_unit: &Region<GRID_DIMENSION>,
    ) where
        NumType: NumTrait,
        DestType: DomainView<NumType, GRID_DIMENSION>,
        SourceType: DomainView<NumType, GRID_DIMENSION>,
        OutputType: DomainView<NumType, GRID_DIMENSION>,
    {
        match self.classify(work_unit) {
            Overlap::None => {
                if !self.in_place {
                    copy_region(dest, output, work_unit, work_unit);
                }
            }
            Overlap::Full => {
                copy_region(
                    source,
                    output,
                    &self.map_to_source(work_unit),
                    work_unit,
                );
            }
            Overlap::Partial(cropped) => {
                if !self.in_place {
                    copy_region(dest, output, work_unit, work_unit);
                }
                copy_region(
                    source,
                    output,
                    &self.map_to_source(&cropped),
                    &cropped,
                );
            }
        }
    }

    /// Run one work unit when `output` is the destination storage.
    /// Destination data is already resident, so only source copies
    /// remain.
    pub fn execute_unit_in_place<NumType, SourceType, OutputType>(
        &self,
        source: &SourceType,
        output: &mut OutputType,
        work_unit: &Region<GRID_DIMENSION>,
    ) where
        NumType: NumTrait,
        SourceType: DomainView<NumType, GRID_DIMENSION>,
        OutputType: DomainView<NumType, GRID_DIMENSION>,
    {
        debug_assert!(self.in_place);
        match self.classify(work_unit) {
            Overlap::None => {}
            Overlap::Full => {
                copy_region(
                    source,
                    output,
                    &self.map_to_source(work_unit),
                    work_unit,
                );
            }
            Overlap::Partial(cropped) => {
                copy_region(
                    source,
                    output,
                    &self.map_to_source(&cropped),
                    &cropped,
                );
            }
        }
    }

    /// Paste into `output` with one worker per work unit,
    /// calling `unit_complete` once per finished unit.
    /// The hook is observational only.
    pub fn par_execute_with_progress<
        NumType,
        DestType,
        SourceType,
        OutputType,
        F,
    >(
        &self,
        dest: &DestType,
        source: &SourceType,
        output: &mut OutputType,
        units: usize,
        unit_complete: F,
    ) where
        NumType: NumTrait,
        DestType: DomainView<NumType, GRID_DIMENSION>,
        SourceType: DomainView<NumType, GRID_DIMENSION>,
        OutputType: DomainView<NumType, GRID_DIMENSION>,
        F: Fn(&Region<GRID_DIMENSION>) + Send + Sync,
    {
        profiling::scope!("paste::par_execute");
        self.check_source_contract(source);
        assert_eq!(
            dest.region(),
            output.region(),
            "output extent must match destination extent"
        );

        let work_units = output.region().split_axis(0, units);
        let const_output_ref: &OutputType = output;
        work_units.par_iter().for_each(move |work_unit| {
            profiling::scope!("paste::execute_unit");
            // Work units tile the output region,
            // so write sets are disjoint across workers.
            let output_ptr = const_output_ref as *const OutputType;
            let output_mut: &mut OutputType =
                unsafe { &mut *(output_ptr as *mut OutputType) };
            self.execute_unit(dest, source, output_mut, work_unit);
            unit_complete(work_unit);
        });
    }

    pub fn par_execute<NumType, DestType, SourceType, OutputType>(
        &self,
        dest: &DestType,
        source: &SourceType,
        output: &mut OutputType,
        units: usize,
    ) where
        NumType: NumTrait,
        DestType: DomainView<NumType, GRID_DIMENSION>,
        SourceType: DomainView<NumType, GRID_DIMENSION>,
        OutputType: DomainView<NumType, GRID_DIMENSION>,
    {
        self.par_execute_with_progress(
            dest,
            source,
            output,
            units,
            |_: &Region<GRID_DIMENSION>| {},
        );
    }

    /// Paste into `output`, which is the destination storage,
    /// with one worker per work unit.
    /// Requires the in-place flag.
    pub fn par_execute_in_place_with_progress<NumType, SourceType, OutputType, F>(
        &self,
        source: &SourceType,
        output: &mut OutputType,
        units: usize,
        unit_complete: F,
    ) where
        NumType: NumTrait,
        SourceType: DomainView<NumType, GRID_DIMENSION>,
        OutputType: DomainView<NumType, GRID_DIMENSION>,
        F: Fn(&Region<GRID_DIMENSION>) + Send + Sync,
    {
        profiling::scope!("paste::par_execute_in_place");
        assert!(
            self.in_place,
            "in-place execution requires the in-place flag"
        );
        self.check_source_contract(source);

        let work_units = output.region().split_axis(0, units);
        let const_output_ref: &OutputType = output;
        work_units.par_iter().for_each(move |work_unit| {
            profiling::scope!("paste::execute_unit");
            // Write sets are disjoint across workers, see par_execute.
            let output_ptr = const_output_ref as *const OutputType;
            let output_mut: &mut OutputType =
                unsafe { &mut *(output_ptr as *mut OutputType) };
            self.execute_unit_in_place(source, output_mut, work_unit);
            unit_complete(work_unit);
        });
    }

    pub fn par_execute_in_place<NumType, SourceType, OutputType>(
        &self,
        source: &SourceType,
        output: &mut OutputType,
        units: usize,
    ) where
        NumType: NumTrait,
        SourceType: DomainView<NumType, GRID_DIMENSION>,
        OutputType: DomainView<NumType, GRID_DIMENSION>,
    {
        self.par_execute_in_place_with_progress(
            source,
            output,
            units,
            |_: &Region<GRID_DIMENSION>| {},
        );
    }

    /// A paste region hanging outside the source's allocated extent
    /// is a misconfigured pipeline, not a recoverable condition.
    fn check_source_contract<NumType, SourceType>(&self, source: &SourceType)
    where
        NumType: NumTrait,
        SourceType: DomainView<NumType, GRID_DIMENSION>,
    {
        assert!(
            source.region().contains_region(&self.source_region),
            "paste region {} not resident in source {}",
            self.source_region,
            source.region()
        );
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use nalgebra::vector;
    use rand::Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ones_source(region: Region<2>) -> OwnedDomain<f64, 2> {
        let mut source = OwnedDomain::new(region);
        source.par_set_values(|_| 1.0, 8);
        source
    }

    #[test]
    fn classify_test() {
        // 4x4 paste placed at (3, 3) of a 10x10 destination.
        let filter = PasteFilter::new(
            Region::new(vector![0, 0], vector![4, 4]),
            vector![3, 3],
        );

        {
            let unit = Region::new(vector![0, 0], vector![5, 5]);
            let expected = Region::new(vector![3, 3], vector![2, 2]);
            assert_eq!(filter.classify(&unit), Overlap::Partial(expected));
        }

        {
            let unit = Region::new(vector![3, 3], vector![4, 4]);
            assert_eq!(filter.classify(&unit), Overlap::Full);
        }

        {
            let unit = Region::new(vector![0, 0], vector![3, 3]);
            assert_eq!(filter.classify(&unit), Overlap::None);
        }

        // A unit strictly inside the placement is also full.
        {
            let unit = Region::new(vector![4, 4], vector![2, 2]);
            assert_eq!(filter.classify(&unit), Overlap::Full);
        }
    }

    #[test]
    fn classify_random_test() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let filter = PasteFilter::new(
                Region::new(
                    vector![rng.gen_range(-5..5), rng.gen_range(-5..5)],
                    vector![rng.gen_range(0..8), rng.gen_range(0..8)],
                ),
                vector![rng.gen_range(-10..10), rng.gen_range(-10..10)],
            );
            let unit = Region::new(
                vector![rng.gen_range(-10..10), rng.gen_range(-10..10)],
                vector![rng.gen_range(0..8), rng.gen_range(0..8)],
            );

            let overlap = filter.paste_region_in_destination().intersect(&unit);
            match filter.classify(&unit) {
                Overlap::None => assert!(overlap.is_empty()),
                Overlap::Full => assert_eq!(overlap, unit),
                Overlap::Partial(cropped) => {
                    assert!(!cropped.is_empty());
                    assert_ne!(cropped, unit);
                    assert_eq!(cropped, overlap);
                    assert!(unit.contains_region(&cropped));
                }
            }
        }
    }

    #[test]
    fn map_to_source_round_trip_test() {
        let filter = PasteFilter::new(
            Region::new(vector![2, -1], vector![4, 4]),
            vector![7, 3],
        );
        let region = Region::new(vector![8, 3], vector![2, 3]);
        let mapped = filter.map_to_source(&region);
        assert_eq!(mapped.size, region.size);
        assert_eq!(mapped.translate(&-filter.source_offset()), region);
    }

    #[test]
    fn requested_regions_test() {
        let source_region = Region::new(vector![1, 1], vector![4, 4]);
        let filter = PasteFilter::new(source_region, vector![3, 3]);

        assert_eq!(filter.required_source_region(), source_region);

        let output_region = Region::new(vector![0, 0], vector![10, 10]);
        assert_eq!(
            filter.required_destination_region(&output_region),
            output_region
        );
    }

    #[test]
    fn concrete_scenario_test() {
        // 10x10 destination of zeros, 4x4 source of ones pasted at (3, 3).
        let dest_region = Region::new(vector![0, 0], vector![10, 10]);
        let dest: OwnedDomain<f64, 2> = OwnedDomain::new(dest_region);
        let source = ones_source(Region::new(vector![0, 0], vector![4, 4]));
        let filter =
            PasteFilter::new(*source.region(), vector![3, 3]);
        let paste_placement = Region::new(vector![3, 3], vector![4, 4]);

        let mut output = OwnedDomain::new(dest_region);

        // Partial unit: ones exactly on [3, 5) x [3, 5).
        let unit = Region::new(vector![0, 0], vector![5, 5]);
        filter.execute_unit(&dest, &source, &mut output, &unit);
        for c in unit.coord_iter() {
            if paste_placement.contains(&c) {
                assert_eq!(output.view(&c), 1.0);
            } else {
                assert_eq!(output.view(&c), 0.0);
            }
        }

        // Full unit: entirely ones.
        let unit = Region::new(vector![3, 3], vector![4, 4]);
        assert_eq!(filter.classify(&unit), Overlap::Full);
        filter.execute_unit(&dest, &source, &mut output, &unit);
        for c in unit.coord_iter() {
            assert_eq!(output.view(&c), 1.0);
        }

        // Untouched unit: stays zero.
        let unit = Region::new(vector![0, 0], vector![3, 3]);
        assert_eq!(filter.classify(&unit), Overlap::None);
        filter.execute_unit(&dest, &source, &mut output, &unit);
        for c in unit.coord_iter() {
            assert_eq!(output.view(&c), 0.0);
        }
    }

    #[test]
    fn source_region_subset_test() {
        // Paste only the inner 2x2 of a 4x4 source.
        let mut source: OwnedDomain<i32, 2> =
            OwnedDomain::new(Region::new(vector![0, 0], vector![4, 4]));
        source.par_set_values(|c: Coord<2>| c[0] * 10 + c[1], 4);

        let dest_region = Region::new(vector![0, 0], vector![6, 6]);
        let dest: OwnedDomain<i32, 2> = OwnedDomain::new(dest_region);
        let mut output = OwnedDomain::new(dest_region);

        let mut filter = PasteFilter::with_source_region(Region::new(
            vector![1, 1],
            vector![2, 2],
        ));
        filter.set_destination_index(vector![4, 0]);

        filter.par_execute(&dest, &source, &mut output, 3);

        assert_eq!(output.view(&vector![4, 0]), 11);
        assert_eq!(output.view(&vector![4, 1]), 12);
        assert_eq!(output.view(&vector![5, 0]), 21);
        assert_eq!(output.view(&vector![5, 1]), 22);
        let placement = filter.paste_region_in_destination();
        for c in dest_region.coord_iter() {
            if !placement.contains(&c) {
                assert_eq!(output.view(&c), 0);
            }
        }
    }

    #[test]
    fn progress_hook_test() {
        let dest_region = Region::new(vector![0, 0], vector![12, 7]);
        let mut dest: OwnedDomain<f64, 2> = OwnedDomain::new(dest_region);
        dest.par_set_values(|_| 5.0, 16);
        let source = ones_source(Region::new(vector![0, 0], vector![3, 3]));
        let filter = PasteFilter::new(*source.region(), vector![2, 2]);

        let units = 4;
        let completed = AtomicUsize::new(0);
        let mut output = OwnedDomain::new(dest_region);
        filter.par_execute_with_progress(
            &dest,
            &source,
            &mut output,
            units,
            |work_unit: &Region<2>| {
                assert!(dest_region.contains_region(work_unit));
                completed.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert_eq!(completed.load(Ordering::SeqCst), units);

        // The hook changes nothing about the result.
        let mut silent_output = OwnedDomain::new(dest_region);
        filter.par_execute(&dest, &source, &mut silent_output, units);
        assert_eq!(output.buffer(), silent_output.buffer());
    }

    #[test]
    fn empty_source_region_test() {
        let dest_region = Region::new(vector![0, 0], vector![5, 5]);
        let mut dest: OwnedDomain<f64, 2> = OwnedDomain::new(dest_region);
        dest.par_set_values(|c: Coord<2>| (c[0] + c[1]) as f64, 8);
        let source = ones_source(Region::new(vector![0, 0], vector![4, 4]));

        let mut filter = PasteFilter::new(
            Region::new(vector![2, 2], vector![0, 2]),
            vector![1, 1],
        );

        // Everything classifies none, output is a copy of the destination.
        let mut output = OwnedDomain::new(dest_region);
        filter.par_execute(&dest, &source, &mut output, 2);
        assert_eq!(output.buffer(), dest.buffer());

        // And the in-place path leaves the buffer untouched.
        filter.set_in_place(true);
        let mut in_place = OwnedDomain::new(dest_region);
        copy_region(&dest, &mut in_place, &dest_region, &dest_region);
        filter.par_execute_in_place(&source, &mut in_place, 2);
        assert_eq!(in_place.buffer(), dest.buffer());
    }
}
