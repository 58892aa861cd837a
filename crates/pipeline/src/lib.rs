//! The preview generation step pipeline.
//!
//! A pipeline run executes the steps of a [`GeneratorDef`] that survive the
//! request's name filter, in declared order, against an isolated region,
//! then appends a synthetic terminal step that resolves one color per cell
//! into a pixel buffer and finishes with the bevel post-pass.
//!
//! Determinism contract: for a fixed `(seed, region, filter)`, two runs
//! produce byte-identical pixel buffers. Each step draws from a private
//! [`CounterRng`] seeded from `(seed, declared ordinal)`, so filtering steps
//! out never perturbs the draws of the steps that remain.
//!
//! [`CounterRng`]: ssc_rng::CounterRng

use ssc_core::PixelBuffer;
use ssc_region::Region;
use ssc_rng::{utility, CounterRng};

mod classify;
pub use classify::*;

mod colorize;
pub use colorize::{colors, HIGH_ELEVATION};

mod palette;
pub use palette::*;

mod step;
pub use step::*;

/// The output of a pipeline run.
///
/// The colored pixels land in the buffer passed to [`run`]; this structure
/// carries the intermediate grids (kept for introspection) and the
/// partial-failure accounting.
#[derive(Debug)]
pub struct PipelineOutput {
    /// The intermediate grids populated by the run's steps.
    pub grids: Grids,
    /// The number of cells whose classification could not be resolved.
    pub invalid_cells: u32,
    /// Whether the run produced a degraded result.
    pub errored: bool,
}

/// Runs the filtered step pipeline of `def` against `region`, writing one
/// color per region cell into `buffer`.
///
/// Cells of `buffer` outside the region's size are left untouched; callers
/// clip by the region size, not the buffer size.
///
/// Unresolvable cell classifications are not fatal: the offending cells are
/// painted with [`colors::CLASSIFY_ERROR`] and counted, and the run keeps
/// going.
///
/// # Panics
///
/// Panics if `buffer` is smaller than the region in either dimension; the
/// request layer validates this at construction.
#[profiling::function]
#[allow(clippy::too_many_arguments)]
pub fn run(
    region: &Region,
    def: &GeneratorDef,
    filter: &dyn Fn(&str) -> bool,
    seed: u64,
    classifier: &dyn TerrainClassifier,
    palette: &Palette,
    options: StepOptions,
    buffer: &mut PixelBuffer,
) -> PipelineOutput {
    let size = region.size();
    assert!(
        size.x <= buffer.size().x && size.y <= buffer.size().y,
        "region size exceeds the pixel buffer size",
    );

    let mut grids = Grids::new(size);

    for (ordinal, named) in def.steps.iter().enumerate() {
        if !filter(named.name) {
            continue;
        }

        // Seed from the declared ordinal, not the filtered position.
        let mut rng = CounterRng::from_seed(utility::combine(seed, ordinal as u64));
        log::trace!("running generation step `{}`", named.name);
        named.step.run(&mut StepCtx {
            region,
            grids: &mut grids,
            rng: &mut rng,
            options,
        });
    }

    let (rock, invalid_cells) = colorize::colorize(region, &grids, classifier, palette, buffer);
    colorize::bevel_pass(buffer, &rock, size);

    if invalid_cells > 0 {
        log::warn!(
            "preview of location {} has {invalid_cells} unresolved cells",
            region.location_id(),
        );
    }

    PipelineOutput {
        grids,
        invalid_cells,
        errored: invalid_cells > 0,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use glam::UVec2;
    use ssc_core::{Color, TerrainFlags, TerrainId, TerrainKind};
    use ssc_region::LocationInfo;

    use super::*;

    const PLAIN: TerrainId = TerrainId(1);
    const RIVER: TerrainId = TerrainId(2);
    const PLAIN_COLOR: Color = Color::rgb(120, 150, 80);
    const RIVER_COLOR: Color = Color::rgb(60, 100, 180);

    /// Classifies every cell as plain terrain, except an optional set of
    /// river cells and an optional unresolvable cell.
    struct StubClassifier {
        river_cells: Vec<(u32, u32)>,
        failing_cell: Option<(u32, u32)>,
    }

    impl StubClassifier {
        fn plain() -> Self {
            Self {
                river_cells: Vec::new(),
                failing_cell: None,
            }
        }
    }

    impl TerrainClassifier for StubClassifier {
        fn classify(&self, _: &Region, x: u32, y: u32) -> Result<TerrainKind, ClassifyError> {
            if self.failing_cell == Some((x, y)) {
                return Err(ClassifyError { x, y });
            }
            if self.river_cells.contains(&(x, y)) {
                return Ok(TerrainKind {
                    id: RIVER,
                    flags: TerrainFlags::RIVER,
                });
            }
            Ok(TerrainKind::plain(PLAIN))
        }
    }

    fn test_palette() -> Palette {
        Palette::new(Color::MAGENTA)
            .with_color(PLAIN, PLAIN_COLOR)
            .with_color(RIVER, RIVER_COLOR)
    }

    fn test_region(size: UVec2) -> Region {
        Region::build(size, 1, &LocationInfo::default())
    }

    fn all_steps(_: &str) -> bool {
        true
    }

    /// A step raising every cell's elevation above the solid-rock cutoff.
    fn raise_all(ctx: &mut StepCtx) {
        ctx.grids.elevation.fill(1.0);
    }

    #[test]
    fn identical_runs_produce_identical_buffers() {
        let region = test_region(UVec2::new(8, 8));
        let def = GeneratorDef::new(GeneratorId("test"))
            .with_step("elevation", |ctx: &mut StepCtx| {
                let size = ctx.region.size();
                for y in 0..size.y {
                    for x in 0..size.x {
                        ctx.grids.elevation.set(x, y, ctx.rng.next_f32());
                    }
                }
            })
            .with_step("caves", |ctx: &mut StepCtx| {
                let size = ctx.region.size();
                for y in 0..size.y {
                    for x in 0..size.x {
                        ctx.grids.caves.set(x, y, ctx.rng.next_f32_signed());
                    }
                }
            });

        let render = || {
            let mut buffer = PixelBuffer::new(UVec2::new(8, 8));
            run(
                &region,
                &def,
                &all_steps,
                0xDEAD_BEEF,
                &StubClassifier::plain(),
                &test_palette(),
                StepOptions::default(),
                &mut buffer,
            );
            buffer
        };

        assert_eq!(render().as_colors(), render().as_colors());
    }

    #[test]
    fn excluded_steps_do_not_perturb_included_ones() {
        let def = || {
            GeneratorDef::new(GeneratorId("test"))
                .with_step("first", |ctx: &mut StepCtx| {
                    let v = ctx.rng.next_f32();
                    ctx.grids.fertility.set(0, 0, v);
                })
                .with_step("second", |ctx: &mut StepCtx| {
                    let v = ctx.rng.next_f32();
                    ctx.grids.fertility.set(1, 0, v);
                })
        };

        let region = test_region(UVec2::new(2, 1));
        let run_with = |filter: &dyn Fn(&str) -> bool| {
            let mut buffer = PixelBuffer::new(UVec2::new(2, 1));
            run(
                &region,
                &def(),
                filter,
                7,
                &StubClassifier::plain(),
                &test_palette(),
                StepOptions::default(),
                &mut buffer,
            )
        };

        let both = run_with(&all_steps);
        let only_second = run_with(&|name| name == "second");

        // `second` is seeded from its declared ordinal, so dropping `first`
        // leaves its draws untouched.
        assert_eq!(
            both.grids.fertility.get(1, 0),
            only_second.grids.fertility.get(1, 0),
        );
        assert_eq!(only_second.grids.fertility.get(0, 0), 0.0);
    }

    #[test]
    fn steps_run_in_declared_order() {
        let order = std::sync::Arc::new(Mutex::new(Vec::new()));

        let mut def = GeneratorDef::new(GeneratorId("test"));
        for name in ["alpha", "beta", "gamma"] {
            let order = order.clone();
            def = def.with_step(name, move |_: &mut StepCtx| {
                order.lock().unwrap().push(name);
            });
        }

        let region = test_region(UVec2::new(1, 1));
        let mut buffer = PixelBuffer::new(UVec2::new(1, 1));
        run(
            &region,
            &def,
            &|name| name != "beta",
            0,
            &StubClassifier::plain(),
            &test_palette(),
            StepOptions::default(),
            &mut buffer,
        );

        assert_eq!(*order.lock().unwrap(), vec!["alpha", "gamma"]);
    }

    #[test]
    fn bevel_shades_a_rock_band() {
        // 3x3, all solid rock except a river cell in the middle.
        let region = test_region(UVec2::new(3, 3));
        let def = GeneratorDef::new(GeneratorId("test")).with_step("elevation", raise_all);
        let classifier = StubClassifier {
            river_cells: vec![(1, 1)],
            failing_cell: None,
        };

        let mut buffer = PixelBuffer::new(UVec2::new(3, 3));
        let output = run(
            &region,
            &def,
            &all_steps,
            0,
            &classifier,
            &test_palette(),
            StepOptions::default(),
            &mut buffer,
        );
        assert!(!output.errored);

        // Top row: nothing above, all highlighted.
        assert_eq!(buffer.pixel(0, 0), colors::ROCK_HIGHLIGHT);
        assert_eq!(buffer.pixel(1, 0), colors::ROCK_HIGHLIGHT);
        assert_eq!(buffer.pixel(2, 0), colors::ROCK_HIGHLIGHT);

        // Middle row: rock above and rock below on the outer columns, so
        // they stay plain; the center keeps its river color.
        assert_eq!(buffer.pixel(0, 1), colors::SOLID_ROCK);
        assert_eq!(buffer.pixel(1, 1), RIVER_COLOR);
        assert_eq!(buffer.pixel(2, 1), colors::SOLID_ROCK);

        // Bottom row: the outer columns have rock above and the image edge
        // below, so they are shadowed; the center has the river above it,
        // so it is highlighted.
        assert_eq!(buffer.pixel(0, 2), colors::ROCK_SHADOW);
        assert_eq!(buffer.pixel(1, 2), colors::ROCK_HIGHLIGHT);
        assert_eq!(buffer.pixel(2, 2), colors::ROCK_SHADOW);
    }

    #[test]
    fn bevel_reads_original_classification_not_the_buffer() {
        // A full column of rock: the naive implementation that re-reads the
        // mutated buffer sees the highlighted top cell as "not rock" and
        // wrongly highlights the cell under it.
        let region = test_region(UVec2::new(1, 3));
        let def = GeneratorDef::new(GeneratorId("test")).with_step("elevation", raise_all);

        let mut buffer = PixelBuffer::new(UVec2::new(1, 3));
        run(
            &region,
            &def,
            &all_steps,
            0,
            &StubClassifier::plain(),
            &test_palette(),
            StepOptions::default(),
            &mut buffer,
        );

        assert_eq!(buffer.pixel(0, 0), colors::ROCK_HIGHLIGHT);
        assert_eq!(buffer.pixel(0, 1), colors::SOLID_ROCK);
        assert_eq!(buffer.pixel(0, 2), colors::ROCK_SHADOW);
    }

    #[test]
    fn bevel_ignores_coincidental_palette_colors() {
        // A terrain colored exactly like a bevel shade must not suppress
        // the shadow of the rock cell above it.
        let region = test_region(UVec2::new(1, 3));
        let def =
            GeneratorDef::new(GeneratorId("test")).with_step("elevation", |ctx: &mut StepCtx| {
                ctx.grids.elevation.set(0, 0, 1.0);
                ctx.grids.elevation.set(0, 1, 1.0);
            });
        let palette = Palette::new(Color::MAGENTA).with_color(PLAIN, colors::ROCK_HIGHLIGHT);

        let mut buffer = PixelBuffer::new(UVec2::new(1, 3));
        run(
            &region,
            &def,
            &all_steps,
            0,
            &StubClassifier::plain(),
            &palette,
            StepOptions::default(),
            &mut buffer,
        );

        assert_eq!(buffer.pixel(0, 0), colors::ROCK_HIGHLIGHT);
        assert_eq!(buffer.pixel(0, 1), colors::ROCK_SHADOW);
        assert_eq!(buffer.pixel(0, 2), colors::ROCK_HIGHLIGHT);
    }

    #[test]
    fn high_elevation_rules() {
        let region = test_region(UVec2::new(4, 1));
        let def = GeneratorDef::new(GeneratorId("test")).with_step("grids", |ctx: &mut StepCtx| {
            ctx.grids.elevation.set(0, 0, HIGH_ELEVATION);
            ctx.grids.elevation.set(1, 0, HIGH_ELEVATION - 0.01);
            ctx.grids.elevation.set(2, 0, 1.0);
            ctx.grids.caves.set(2, 0, 0.5);
            ctx.grids.elevation.set(3, 0, 1.0);
        });
        let classifier = StubClassifier {
            river_cells: vec![(3, 0)],
            failing_cell: None,
        };

        let mut buffer = PixelBuffer::new(UVec2::new(4, 1));
        run(
            &region,
            &def,
            &all_steps,
            0,
            &classifier,
            &test_palette(),
            StepOptions::default(),
            &mut buffer,
        );

        // Exactly at the cutoff: solid rock (beveled as a lone rock cell).
        assert_eq!(buffer.pixel(0, 0), colors::ROCK_HIGHLIGHT);
        // Below the cutoff: the palette color.
        assert_eq!(buffer.pixel(1, 0), PLAIN_COLOR);
        // Above the cutoff with a positive cave grid: cave.
        assert_eq!(buffer.pixel(2, 0), colors::CAVE);
        // Rivers are exempt from the rock rule regardless of elevation.
        assert_eq!(buffer.pixel(3, 0), RIVER_COLOR);
    }

    #[test]
    fn unresolved_cells_degrade_but_do_not_abort() {
        let region = test_region(UVec2::new(3, 1));
        let def = GeneratorDef::new(GeneratorId("test"));
        let classifier = StubClassifier {
            river_cells: Vec::new(),
            failing_cell: Some((1, 0)),
        };

        let mut buffer = PixelBuffer::new(UVec2::new(3, 1));
        let output = run(
            &region,
            &def,
            &all_steps,
            0,
            &classifier,
            &test_palette(),
            StepOptions::default(),
            &mut buffer,
        );

        assert!(output.errored);
        assert_eq!(output.invalid_cells, 1);
        assert_eq!(buffer.pixel(0, 0), PLAIN_COLOR);
        assert_eq!(buffer.pixel(1, 0), colors::CLASSIFY_ERROR);
        assert_eq!(buffer.pixel(2, 0), PLAIN_COLOR);
    }

    #[test]
    fn unknown_classifications_use_the_palette_missing_color() {
        struct UnknownKind;
        impl TerrainClassifier for UnknownKind {
            fn classify(&self, _: &Region, _: u32, _: u32) -> Result<TerrainKind, ClassifyError> {
                Ok(TerrainKind::plain(TerrainId(999)))
            }
        }

        // The fallback comes from the palette, not a fixed sentinel.
        let missing = Color::rgb(11, 22, 33);
        let region = test_region(UVec2::new(1, 1));
        let def = GeneratorDef::new(GeneratorId("test"));
        let mut buffer = PixelBuffer::new(UVec2::new(1, 1));
        run(
            &region,
            &def,
            &all_steps,
            0,
            &UnknownKind,
            &Palette::new(missing),
            StepOptions::default(),
            &mut buffer,
        );

        assert_eq!(buffer.pixel(0, 0), missing);
    }

    #[test]
    fn cells_outside_the_region_are_untouched() {
        let region = test_region(UVec2::new(2, 2));
        let def = GeneratorDef::new(GeneratorId("test"));

        let mut buffer = PixelBuffer::new(UVec2::new(4, 4));
        buffer.set_pixel(3, 3, Color::WHITE);
        run(
            &region,
            &def,
            &all_steps,
            0,
            &StubClassifier::plain(),
            &test_palette(),
            StepOptions::default(),
            &mut buffer,
        );

        assert_eq!(buffer.pixel(0, 0), PLAIN_COLOR);
        assert_eq!(buffer.pixel(3, 3), Color::WHITE);
        assert_eq!(buffer.pixel(2, 2), Color::TRANSPARENT);
    }

    #[test]
    fn step_options_reach_the_steps() {
        let region = test_region(UVec2::new(1, 1));
        let def =
            GeneratorDef::new(GeneratorId("test")).with_step("probe", |ctx: &mut StepCtx| {
                assert!(ctx.options.skip_expensive_substep);
            });

        let mut buffer = PixelBuffer::new(UVec2::new(1, 1));
        run(
            &region,
            &def,
            &all_steps,
            0,
            &StubClassifier::plain(),
            &test_palette(),
            StepOptions {
                skip_expensive_substep: true,
            },
            &mut buffer,
        );
    }
}
