pub mod design_usecase;
pub mod session;

pub use design_usecase::{
    DEFAULT_GENERATION_PROMPT, DesignSessionUseCase, FurniturePlacement, FurnitureRemoval,
    GenerationOutcome, SearchReport, SelectionSearch,
};
