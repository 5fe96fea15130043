//! Scene database handle.

/// Runtime scene data (entity tables, geometry and texture buffers).
///
/// The loading pipeline builds and owns it. Generated programs bind against
/// it at runtime; the generator never looks inside, it only requires that the
/// database exists before emission starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneDatabase {
    pub entity_count: usize,
    pub shape_count: usize,
}

impl SceneDatabase {
    #[must_use]
    pub fn new(entity_count: usize, shape_count: usize) -> Self {
        Self {
            entity_count,
            shape_count,
        }
    }
}
