use glam::UVec2;
use ssc_core::Grid;
use ssc_region::Region;
use ssc_rng::CounterRng;

/// Identifies a generator definition within the consumer's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorId(pub &'static str);

/// Options forwarded to every step of a pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepOptions {
    /// Requests steps to skip their expensive sub-computations, trading
    /// fidelity for preview latency. Steps are free to ignore this.
    pub skip_expensive_substep: bool,
}

/// The intermediate per-cell grids a pipeline run populates.
#[derive(Debug)]
pub struct Grids {
    /// Normalized elevation, in `[0.0, 1.0]`.
    pub elevation: Grid<f32>,
    /// Normalized fertility, in `[0.0, 1.0]`.
    pub fertility: Grid<f32>,
    /// Cave-ness; any positive value marks the cell as part of a cave.
    pub caves: Grid<f32>,
}

impl Grids {
    /// Creates zeroed grids of the provided size.
    pub fn new(size: UVec2) -> Self {
        Self {
            elevation: Grid::new(size),
            fertility: Grid::new(size),
            caves: Grid::new(size),
        }
    }
}

/// Everything a generation step may touch during its run.
pub struct StepCtx<'a> {
    /// The isolated region the step runs against.
    pub region: &'a Region,
    /// The intermediate grids shared by all steps of the run.
    pub grids: &'a mut Grids,
    /// The step's private, deterministically seeded random source.
    pub rng: &'a mut CounterRng,
    /// The options of the run.
    pub options: StepOptions,
}

/// A single named unit of the terrain-synthesis pipeline.
///
/// Steps read and write the per-cell grids of a run. The real synthesis
/// algorithms live with the consumer; this crate only defines the seam.
pub trait GenStep: Send + Sync {
    /// Runs the step.
    fn run(&self, ctx: &mut StepCtx);
}

impl<F: Fn(&mut StepCtx) + Send + Sync> GenStep for F {
    #[inline]
    fn run(&self, ctx: &mut StepCtx) {
        self(ctx)
    }
}

/// A [`GenStep`] together with the name the filter predicate sees.
pub struct NamedStep {
    /// The name of the step.
    pub name: &'static str,
    /// The step itself.
    pub step: Box<dyn GenStep>,
}

/// An ordered list of named generation steps belonging to one generator.
///
/// The declared order is authoritative: a pipeline run executes the steps
/// that survive the request's filter in exactly this order, and each step's
/// random draws are seeded from its *declared* position, so excluding a step
/// never perturbs the draws of the steps that remain.
pub struct GeneratorDef {
    /// The identifier of the generator.
    pub id: GeneratorId,
    /// The steps of the generator, in declared order.
    pub steps: Vec<NamedStep>,
}

impl GeneratorDef {
    /// Creates a new, empty [`GeneratorDef`].
    pub fn new(id: GeneratorId) -> Self {
        Self {
            id,
            steps: Vec::new(),
        }
    }

    /// Appends a step to the generator, preserving declaration order.
    pub fn with_step(mut self, name: &'static str, step: impl GenStep + 'static) -> Self {
        self.steps.push(NamedStep {
            name,
            step: Box::new(step),
        });
        self
    }
}
