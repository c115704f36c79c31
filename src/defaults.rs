//! Default settings (device units are millimetres for the stock hoop)

/// Device units per drawing unit: a 1500 mm hoop mapped onto a 150-unit drawing grid.
pub const SCALE_MM: f64 = 1500.0 / 150.0;
/// Longest stitch the pipeline will emit, in device units.
pub const MAX_STITCH_MM: f64 = 3.0;
/// Ceiling on the number of stitches a single design may produce.
pub const MAX_STITCHES: usize = 1_000_000;
/// Largest literal accepted by `range(n)`.
pub const MAX_LOOP_COUNT: u32 = 10_000;
/// Ceiling on the number of commands a script may unroll to.
pub const MAX_COMMANDS: usize = 1_000_000;
/// A stitch line needs at least this many points.
pub const MIN_POINTS: usize = 2;
