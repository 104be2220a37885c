//! What-if simulation of hypothetical link edits.

pub mod simulator;

pub use simulator::{EditPlan, Evaluation, WhatIfSimulator};
