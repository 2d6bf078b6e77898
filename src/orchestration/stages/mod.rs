//! Concrete pipeline stages

pub mod decompose_package;
pub mod input_parameters;

pub use decompose_package::{
    DecomposePackageStage, DecompositionReport, DecompositionState, DECOMPOSE_SUCCESS_MESSAGE,
};
pub use input_parameters::{InputParametersStage, RequestAction};
